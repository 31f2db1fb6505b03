//! Graph model: vertices connected by directed edges, no faces.

use geodraw_core::{Edge, GeodrawError, PropertyContainer, Result, Vertex};
use glam::Vec3;

use crate::{Model, POINT};

/// A vertex/edge graph.
#[derive(Debug, Clone)]
pub struct Graph {
    name: String,
    edges: Vec<(Vertex, Vertex)>,
    vprops: PropertyContainer,
    eprops: PropertyContainer,
}

impl Graph {
    /// Creates a graph from vertex positions and `[from, to]` index pairs.
    pub fn new(name: impl Into<String>, points: Vec<Vec3>, edges: &[[u32; 2]]) -> Result<Self> {
        let mut vprops = PropertyContainer::new();
        vprops.resize(points.len());
        let _ = vprops.set(POINT, points);
        let mut graph = Self {
            name: name.into(),
            edges: Vec::with_capacity(edges.len()),
            vprops,
            eprops: PropertyContainer::new(),
        };
        for &[from, to] in edges {
            graph.add_edge(Vertex::new(from as usize), Vertex::new(to as usize))?;
        }
        Ok(graph)
    }

    /// Appends a vertex at `position`.
    pub fn add_vertex(&mut self, position: Vec3) -> Vertex {
        self.vprops.push();
        let v = Vertex::new(self.vprops.len() - 1);
        if let Ok(points) = self.vprops.get_or_add(POINT, Vec3::ZERO) {
            points[v.idx()] = position;
        }
        v
    }

    /// Appends an edge from `from` to `to`.
    pub fn add_edge(&mut self, from: Vertex, to: Vertex) -> Result<Edge> {
        for v in [from, to] {
            if v.idx() >= self.n_vertices() {
                return Err(GeodrawError::Topology(format!(
                    "edge references missing vertex {v}"
                )));
            }
        }
        self.edges.push((from, to));
        self.eprops.push();
        Ok(Edge::new(self.edges.len() - 1))
    }

    /// Returns the number of edges.
    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    /// Iterates over all vertices.
    pub fn vertices(&self) -> impl Iterator<Item = Vertex> {
        (0..self.n_vertices()).map(Vertex::new)
    }

    /// Iterates over all edges.
    pub fn edges(&self) -> impl Iterator<Item = Edge> {
        (0..self.edges.len()).map(Edge::new)
    }

    /// Returns the start vertex of `e`.
    pub fn from_vertex(&self, e: Edge) -> Vertex {
        self.edges[e.idx()].0
    }

    /// Returns the end vertex of `e`.
    pub fn to_vertex(&self, e: Edge) -> Vertex {
        self.edges[e.idx()].1
    }

    /// Returns the position of `v`.
    pub fn position(&self, v: Vertex) -> Option<Vec3> {
        self.points().and_then(|p| p.get(v.idx()).copied())
    }

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
}

impl Model for Graph {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        "Graph"
    }

    fn vertex_properties(&self) -> &PropertyContainer {
        &self.vprops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_graph() {
        let g = Graph::new("g", vec![Vec3::ZERO, Vec3::X, Vec3::Y], &[[0, 1], [1, 2]]).unwrap();
        assert_eq!(g.n_vertices(), 3);
        assert_eq!(g.n_edges(), 2);
        let e = Edge::new(1);
        assert_eq!(g.from_vertex(e), Vertex::new(1));
        assert_eq!(g.to_vertex(e), Vertex::new(2));
    }

    #[test]
    fn test_edge_to_missing_vertex_fails() {
        assert!(matches!(
            Graph::new("g", vec![Vec3::ZERO], &[[0, 3]]),
            Err(GeodrawError::Topology(_))
        ));
    }

    #[test]
    fn test_edge_properties_grow() {
        let mut g = Graph::new("g", vec![Vec3::ZERO, Vec3::X], &[]).unwrap();
        g.add_edge_property("e:weight", 1.0_f32).unwrap();
        let e = g.add_edge(Vertex::new(0), Vertex::new(1)).unwrap();
        assert_eq!(g.edge_property::<f32>("e:weight").unwrap()[e], 1.0);
        let v = g.add_vertex(Vec3::Z);
        assert_eq!(g.position(v), Some(Vec3::Z));
    }
}
