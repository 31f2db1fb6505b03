//! Per-face triangle ranges.

use serde::{Deserialize, Serialize};

/// Inclusive `[first, last]` interval of triangle indices that originated from one face.
///
/// A face that produced no triangles holds an empty range `[next, next - 1]`,
/// where `next` is the first unused triangle index at the time it was visited.
/// Ranges of all faces of a mesh partition `[0, total_triangles)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TriangleRange {
    pub first: i64,
    pub last: i64,
}

impl TriangleRange {
    /// Creates a range from inclusive bounds.
    pub fn new(first: i64, last: i64) -> Self {
        Self { first, last }
    }

    /// Creates the range covering `count` triangles starting at `start`.
    pub fn from_count(start: usize, count: usize) -> Self {
        let first = start as i64;
        Self {
            first,
            last: first + count as i64 - 1,
        }
    }

    /// Creates an empty range anchored at the next unused triangle index.
    pub fn empty_at(next: usize) -> Self {
        Self::from_count(next, 0)
    }

    /// Number of triangles in the range.
    pub fn len(&self) -> usize {
        usize::try_from(self.last - self.first + 1).unwrap_or(0)
    }

    /// Returns true if the range holds no triangle.
    pub fn is_empty(&self) -> bool {
        self.last < self.first
    }

    /// Returns true if `triangle` lies in the range.
    pub fn contains(&self, triangle: usize) -> bool {
        let t = triangle as i64;
        self.first <= t && t <= self.last
    }

    /// Returns the half-open equivalent `first..last + 1`.
    pub fn to_range(&self) -> std::ops::Range<usize> {
        let start = usize::try_from(self.first).unwrap_or(0);
        start..start + self.len()
    }
}

impl From<(i64, i64)> for TriangleRange {
    fn from((first, last): (i64, i64)) -> Self {
        Self { first, last }
    }
}
