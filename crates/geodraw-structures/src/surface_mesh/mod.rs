//! Polygonal surface mesh with halfedge connectivity.
//!
//! Each edge `e` owns the two halfedges `2e` and `2e + 1` pointing in opposite
//! directions. Halfedges on a face know their successor and predecessor around it;
//! halfedges without a face are boundary halfedges, whose neighbours are found
//! through the outgoing halfedges of their endpoints.

mod geometry;

use std::collections::{HashMap, HashSet};

use geodraw_core::{Edge, Face, GeodrawError, Halfedge, PropertyContainer, Result, Vertex};
use glam::Vec3;

use crate::{Model, POINT};

/// Name of the per-face triangle range property written by triangle marshalling.
pub const TRIANGLE_RANGE: &str = "f:triangle_range";
/// Name of the per-face color property.
pub const FACE_COLOR: &str = "f:color";
/// Name of the per-face normal property.
pub const FACE_NORMAL: &str = "f:normal";

#[derive(Debug, Clone, Copy)]
struct HalfedgeConnectivity {
    to: Vertex,
    face: Option<Face>,
    next: Option<Halfedge>,
    prev: Option<Halfedge>,
}

/// A polygonal surface mesh.
#[derive(Debug, Clone)]
pub struct SurfaceMesh {
    name: String,

    // Connectivity
    outgoing: Vec<Vec<Halfedge>>,
    hconn: Vec<HalfedgeConnectivity>,
    fconn: Vec<Halfedge>,
    edge_lookup: HashMap<(Vertex, Vertex), Edge>,

    // Properties
    vprops: PropertyContainer,
    hprops: PropertyContainer,
    eprops: PropertyContainer,
    fprops: PropertyContainer,
}

impl SurfaceMesh {
    /// Creates an empty mesh.
    pub fn empty(name: impl Into<String>) -> Self {
        let mut vprops = PropertyContainer::new();
        let _ = vprops.add(POINT, Vec3::ZERO);
        Self {
            name: name.into(),
            outgoing: Vec::new(),
            hconn: Vec::new(),
            fconn: Vec::new(),
            edge_lookup: HashMap::new(),
            vprops,
            hprops: PropertyContainer::new(),
            eprops: PropertyContainer::new(),
            fprops: PropertyContainer::new(),
        }
    }

    /// Creates a mesh from vertex positions and polygon faces.
    ///
    /// Each face is a list of vertex indices in boundary order. Triangles have 3
    /// indices, quads have 4, etc.
    pub fn new(name: impl Into<String>, points: Vec<Vec3>, faces: &[Vec<u32>]) -> Result<Self> {
        let mut mesh = Self::empty(name);
        for p in points {
            mesh.add_vertex(p);
        }
        for face in faces {
            let vertices: Vec<Vertex> = face.iter().map(|&i| Vertex::new(i as usize)).collect();
            mesh.add_face(&vertices)?;
        }
        log::debug!(
            "built surface mesh '{}': {} vertices, {} edges, {} faces",
            mesh.name,
            mesh.n_vertices(),
            mesh.n_edges(),
            mesh.n_faces()
        );
        Ok(mesh)
    }

    /// Creates a mesh from triangles (convenience method).
    pub fn from_triangles(
        name: impl Into<String>,
        points: Vec<Vec3>,
        triangles: &[[u32; 3]],
    ) -> Result<Self> {
        let faces: Vec<Vec<u32>> = triangles.iter().map(|t| t.to_vec()).collect();
        Self::new(name, points, &faces)
    }

    /// Appends a vertex at `position`.
    pub fn add_vertex(&mut self, position: Vec3) -> Vertex {
        self.vprops.push();
        self.outgoing.push(Vec::new());
        let v = Vertex::new(self.vprops.len() - 1);
        if let Ok(points) = self.vprops.get_or_add(POINT, Vec3::ZERO) {
            points[v.idx()] = position;
        }
        v
    }

    /// Appends a polygonal face given its vertices in boundary order.
    ///
    /// A face needs at least two distinct vertices; two-vertex faces are kept as
    /// degenerate faces that produce no triangles. Every directed edge may be used
    /// by one face only.
    pub fn add_face(&mut self, vertices: &[Vertex]) -> Result<Face> {
        let n = vertices.len();
        if n < 2 {
            return Err(GeodrawError::Topology(format!(
                "face needs at least 2 vertices, got {n}"
            )));
        }
        if let Some(v) = vertices.iter().find(|v| v.idx() >= self.n_vertices()) {
            return Err(GeodrawError::Topology(format!(
                "face references missing vertex {v}"
            )));
        }

        // Validate all directed edges before touching the connectivity.
        let mut seen = HashSet::with_capacity(n);
        for i in 0..n {
            let (a, b) = (vertices[i], vertices[(i + 1) % n]);
            if a == b {
                return Err(GeodrawError::Topology(format!(
                    "face repeats vertex {a} consecutively"
                )));
            }
            if !seen.insert((a, b)) {
                return Err(GeodrawError::Topology(format!(
                    "face uses halfedge {a} -> {b} twice"
                )));
            }
            if let Some(h) = self.find_halfedge(a, b) {
                if self.hconn[h.idx()].face.is_some() {
                    return Err(GeodrawError::Topology(format!(
                        "halfedge {a} -> {b} already belongs to a face"
                    )));
                }
            }
        }

        let face = Face::new(self.fconn.len());
        let halfedges: Vec<Halfedge> = (0..n)
            .map(|i| self.find_or_create_halfedge(vertices[i], vertices[(i + 1) % n]))
            .collect();
        for (i, &h) in halfedges.iter().enumerate() {
            let conn = &mut self.hconn[h.idx()];
            conn.face = Some(face);
            conn.next = Some(halfedges[(i + 1) % n]);
            conn.prev = Some(halfedges[(i + n - 1) % n]);
        }
        // The face halfedge is the one arriving at the first vertex, so face
        // traversal visits the vertices in the order they were given.
        self.fconn.push(halfedges[n - 1]);
        self.fprops.push();
        Ok(face)
    }

    fn find_or_create_halfedge(&mut self, from: Vertex, to: Vertex) -> Halfedge {
        if let Some(h) = self.find_halfedge(from, to) {
            return h;
        }
        let e = Edge::new(self.edge_lookup.len());
        self.edge_lookup.insert(edge_key(from, to), e);
        let h0 = Halfedge::new(2 * e.idx());
        let h1 = Halfedge::new(2 * e.idx() + 1);
        for to_vertex in [to, from] {
            self.hconn.push(HalfedgeConnectivity {
                to: to_vertex,
                face: None,
                next: None,
                prev: None,
            });
        }
        self.outgoing[from.idx()].push(h0);
        self.outgoing[to.idx()].push(h1);
        self.hprops.resize(self.hconn.len());
        self.eprops.push();
        h0
    }

    /// Returns the halfedge from `from` to `to`, if the two vertices are connected.
    pub fn find_halfedge(&self, from: Vertex, to: Vertex) -> Option<Halfedge> {
        let e = *self.edge_lookup.get(&edge_key(from, to))?;
        let h = self.edge_halfedge(e, 0);
        Some(if self.to_vertex(h) == to {
            h
        } else {
            self.opposite_halfedge(h)
        })
    }

    // === Counts and iteration ===

    /// Returns the number of halfedges.
    pub fn n_halfedges(&self) -> usize {
        self.hconn.len()
    }

    /// Returns the number of edges.
    pub fn n_edges(&self) -> usize {
        self.hconn.len() / 2
    }

    /// Returns the number of faces.
    pub fn n_faces(&self) -> usize {
        self.fconn.len()
    }

    /// Iterates over all vertices.
    pub fn vertices(&self) -> impl Iterator<Item = Vertex> {
        (0..self.n_vertices()).map(Vertex::new)
    }

    /// Iterates over all halfedges.
    pub fn halfedges(&self) -> impl Iterator<Item = Halfedge> {
        (0..self.n_halfedges()).map(Halfedge::new)
    }

    /// Iterates over all edges.
    pub fn edges(&self) -> impl Iterator<Item = Edge> {
        (0..self.n_edges()).map(Edge::new)
    }

    /// Iterates over all faces.
    pub fn faces(&self) -> impl Iterator<Item = Face> {
        (0..self.n_faces()).map(Face::new)
    }

    /// Iterates over the halfedges of `face` in boundary order, starting at
    /// [`face_halfedge`](Self::face_halfedge).
    pub fn halfedges_around_face(&self, face: Face) -> HalfedgesAroundFace<'_> {
        let start = self.face_halfedge(face);
        HalfedgesAroundFace {
            mesh: self,
            start,
            current: Some(start),
        }
    }

    /// Iterates over the vertices of `face` in boundary order.
    pub fn vertices_around_face(&self, face: Face) -> impl Iterator<Item = Vertex> + '_ {
        self.halfedges_around_face(face)
            .map(move |h| self.to_vertex(h))
    }

    /// Returns the number of vertices of `face`.
    pub fn face_valence(&self, face: Face) -> usize {
        self.halfedges_around_face(face).count()
    }

    /// Returns the halfedges leaving `v`.
    pub fn outgoing_halfedges(&self, v: Vertex) -> &[Halfedge] {
        &self.outgoing[v.idx()]
    }

    /// Returns the number of edges incident to `v`.
    pub fn vertex_valence(&self, v: Vertex) -> usize {
        self.outgoing[v.idx()].len()
    }

    // === Connectivity queries ===

    /// Returns the vertex `h` points to.
    pub fn to_vertex(&self, h: Halfedge) -> Vertex {
        self.hconn[h.idx()].to
    }

    /// Returns the vertex `h` emanates from.
    pub fn from_vertex(&self, h: Halfedge) -> Vertex {
        self.to_vertex(self.opposite_halfedge(h))
    }

    /// Returns the halfedge of the same edge pointing the other way.
    pub fn opposite_halfedge(&self, h: Halfedge) -> Halfedge {
        Halfedge::new(h.idx() ^ 1)
    }

    /// Returns the face `h` belongs to, or `None` for a boundary halfedge.
    pub fn face(&self, h: Halfedge) -> Option<Face> {
        self.hconn[h.idx()].face
    }

    /// Returns true if `h` has no face.
    pub fn is_boundary(&self, h: Halfedge) -> bool {
        self.hconn[h.idx()].face.is_none()
    }

    /// Returns the halfedge following `h` around its face or boundary loop.
    ///
    /// For a boundary halfedge whose end vertex has no outgoing boundary
    /// halfedge (a non-manifold configuration) `h` itself is returned.
    pub fn next_halfedge(&self, h: Halfedge) -> Halfedge {
        if let Some(next) = self.hconn[h.idx()].next {
            return next;
        }
        self.outgoing[self.to_vertex(h).idx()]
            .iter()
            .copied()
            .find(|&o| self.is_boundary(o))
            .unwrap_or(h)
    }

    /// Returns the halfedge preceding `h` around its face or boundary loop.
    pub fn prev_halfedge(&self, h: Halfedge) -> Halfedge {
        if let Some(prev) = self.hconn[h.idx()].prev {
            return prev;
        }
        self.outgoing[self.from_vertex(h).idx()]
            .iter()
            .map(|&o| self.opposite_halfedge(o))
            .find(|&i| self.is_boundary(i))
            .unwrap_or(h)
    }

    /// Returns the edge of `h`.
    pub fn edge(&self, h: Halfedge) -> Edge {
        Edge::new(h.idx() >> 1)
    }

    /// Returns halfedge `i` (0 or 1) of edge `e`.
    pub fn edge_halfedge(&self, e: Edge, i: usize) -> Halfedge {
        debug_assert!(i < 2);
        Halfedge::new(2 * e.idx() + i)
    }

    /// Returns endpoint `i` (0 or 1) of edge `e`.
    pub fn edge_vertex(&self, e: Edge, i: usize) -> Vertex {
        self.to_vertex(self.edge_halfedge(e, i))
    }

    /// Returns the halfedge of `face` that points to its first vertex.
    pub fn face_halfedge(&self, face: Face) -> Halfedge {
        self.fconn[face.idx()]
    }

    /// Returns true if the edge has a boundary halfedge.
    pub fn is_boundary_edge(&self, e: Edge) -> bool {
        self.is_boundary(self.edge_halfedge(e, 0)) || self.is_boundary(self.edge_halfedge(e, 1))
    }

    // === Properties ===

    property_accessors! {
        Vertex, vprops,
        get: vertex_property,
        get_mut: vertex_property_mut,
        add: add_vertex_property,
        get_or_add: get_or_add_vertex_property,
        set: set_vertex_property,
        remove: remove_vertex_property,
        has: has_vertex_property,
        container: vertex_properties,
    }

    property_accessors! {
        Halfedge, hprops,
        get: halfedge_property,
        get_mut: halfedge_property_mut,
        add: add_halfedge_property,
        get_or_add: get_or_add_halfedge_property,
        set: set_halfedge_property,
        remove: remove_halfedge_property,
        has: has_halfedge_property,
        container: halfedge_properties,
    }

    property_accessors! {
        Edge, eprops,
        get: edge_property,
        get_mut: edge_property_mut,
        add: add_edge_property,
        get_or_add: get_or_add_edge_property,
        set: set_edge_property,
        remove: remove_edge_property,
        has: has_edge_property,
        container: edge_properties,
    }

    property_accessors! {
        Face, fprops,
        get: face_property,
        get_mut: face_property_mut,
        add: add_face_property,
        get_or_add: get_or_add_face_property,
        set: set_face_property,
        remove: remove_face_property,
        has: has_face_property,
        container: face_properties,
    }
}

impl Model for SurfaceMesh {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        "SurfaceMesh"
    }

    fn vertex_properties(&self) -> &PropertyContainer {
        &self.vprops
    }
}

fn edge_key(a: Vertex, b: Vertex) -> (Vertex, Vertex) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Iterator over the halfedges of one face.
pub struct HalfedgesAroundFace<'a> {
    mesh: &'a SurfaceMesh,
    start: Halfedge,
    current: Option<Halfedge>,
}

impl Iterator for HalfedgesAroundFace<'_> {
    type Item = Halfedge;

    fn next(&mut self) -> Option<Halfedge> {
        let h = self.current?;
        let next = self.mesh.next_halfedge(h);
        self.current = (next != self.start).then_some(next);
        Some(h)
    }
}
