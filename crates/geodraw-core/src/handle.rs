//! Typed element handles.
//!
//! Vertices, halfedges, edges and faces are addressed by `u32`-backed newtypes so
//! that a face property can never be indexed by a vertex and vice versa.

use std::fmt;

/// Common behaviour of all element handles.
pub trait Handle: Copy + Eq + Ord + std::hash::Hash + fmt::Debug {
    /// Creates a handle from a dense element index.
    fn from_idx(idx: usize) -> Self;

    /// Returns the dense element index.
    fn idx(self) -> usize;
}

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates a handle from a dense element index.
            #[inline]
            pub fn new(idx: usize) -> Self {
                debug_assert!(idx < u32::MAX as usize, "index {idx} too large for a handle");
                Self(idx as u32)
            }

            /// Returns the dense element index.
            #[inline]
            pub fn idx(self) -> usize {
                self.0 as usize
            }
        }

        impl Handle for $name {
            #[inline]
            fn from_idx(idx: usize) -> Self {
                Self::new(idx)
            }

            #[inline]
            fn idx(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

define_handle!(
    /// A vertex of a point cloud, surface mesh or graph.
    Vertex,
    "v"
);
define_handle!(
    /// A directed side of a surface mesh edge.
    Halfedge,
    "h"
);
define_handle!(
    /// An edge of a surface mesh or graph.
    Edge,
    "e"
);
define_handle!(
    /// A polygonal face of a surface mesh.
    Face,
    "f"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_roundtrip() {
        let v = Vertex::new(7);
        assert_eq!(v.idx(), 7);
        assert_eq!(<Face as Handle>::from_idx(3).idx(), 3);
    }

    #[test]
    fn test_handle_formatting() {
        assert_eq!(format!("{:?}", Halfedge::new(4)), "h4");
        assert_eq!(Edge::new(2).to_string(), "e2");
    }

    #[test]
    fn test_handle_ordering() {
        assert!(Vertex::new(1) < Vertex::new(2));
    }
}
