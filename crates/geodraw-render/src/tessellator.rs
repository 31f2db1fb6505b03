//! Polygon tessellation.
//!
//! [`Tessellator`] is a session object in the style of the GLU tessellator: a
//! polygon is described as one or more contours of vertex payloads, and after
//! [`end_polygon`](Tessellator::end_polygon) the result is a list of triangles
//! indexing into the array of unique payloads.
//!
//! A payload is any number of `f32` values whose first three are the position.
//! The remaining values (normals, colors, ...) travel with the vertex.
//!
//! Contours are projected onto the plane of the polygon normal. Wherever two
//! edges cross, a new vertex is inserted whose payload is interpolated along
//! both edges, and the contours are reconnected at it so that no two loops
//! cross any more. Which regions are filled then follows the [`WindingRule`]:
//! each loop is classified as an outer boundary or a hole from the winding
//! numbers on its two sides, and every outer boundary is triangulated together
//! with the holes directly inside it by ear clipping (`earcutr`).

use std::collections::HashMap;

use glam::{DVec2, DVec3, Vec3};

use crate::error::TessellationError;

/// Rule deciding which winding numbers are inside the polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindingRule {
    /// Inside if the winding number is odd.
    #[default]
    Odd,
    /// Inside if the winding number is not zero.
    NonZero,
    /// Inside if the winding number is positive.
    Positive,
    /// Inside if the winding number is negative.
    Negative,
    /// Inside if the absolute winding number is at least two.
    AbsGeqTwo,
}

impl WindingRule {
    /// Returns true if a region with this winding number is filled.
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            Self::Odd => winding % 2 != 0,
            Self::NonZero => winding != 0,
            Self::Positive => winding > 0,
            Self::Negative => winding < 0,
            Self::AbsGeqTwo => winding.abs() >= 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Polygon,
    Contour,
    Done,
}

impl Phase {
    fn describe(self) -> &'static str {
        match self {
            Self::Idle => "no polygon is open",
            Self::Polygon => "a polygon is open",
            Self::Contour => "a contour is open",
            Self::Done => "the polygon is finished",
        }
    }
}

/// A closed loop of vertex ids projected onto the polygon plane.
struct Ring {
    ids: Vec<usize>,
    points: Vec<DVec2>,
    area: f64,
}

impl Ring {
    fn new(ids: Vec<usize>, plane: &[DVec2]) -> Self {
        let points: Vec<DVec2> = ids.iter().map(|&id| plane[id]).collect();
        let area = signed_area(&points);
        Self { ids, points, area }
    }

    fn edge(&self, i: usize) -> (DVec2, DVec2) {
        (self.points[i], self.points[(i + 1) % self.points.len()])
    }

    /// Winding number around `p`, positive for counter-clockwise loops.
    fn winding(&self, p: DVec2) -> i32 {
        let mut winding = 0;
        for i in 0..self.points.len() {
            let (a, b) = self.edge(i);
            let side = (b - a).perp_dot(p - a);
            if a.y <= p.y {
                if b.y > p.y && side > 0.0 {
                    winding += 1;
                }
            } else if b.y <= p.y && side < 0.0 {
                winding -= 1;
            }
        }
        winding
    }

    /// A point just beside the middle of the longest edge, to its left or right.
    fn probe(&self, left: bool) -> DVec2 {
        let mut longest = 0;
        let mut longest_len = 0.0;
        for i in 0..self.points.len() {
            let (a, b) = self.edge(i);
            let len = a.distance_squared(b);
            if len > longest_len {
                longest = i;
                longest_len = len;
            }
        }
        let (a, b) = self.edge(longest);
        let offset = (b - a).perp() * 1e-6;
        let mid = (a + b) * 0.5;
        if left {
            mid + offset
        } else {
            mid - offset
        }
    }

    /// Point just inside the loop.
    fn inner_probe(&self) -> DVec2 {
        self.probe(self.area > 0.0)
    }
}

/// Edge `i` of ring `a` properly crosses edge `j` of ring `b` (`a <= b`), at
/// parameter `t` along the first edge and `s` along the second.
struct Crossing {
    a: usize,
    i: usize,
    t: f64,
    b: usize,
    j: usize,
    s: f64,
}

fn signed_area(points: &[DVec2]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum::<f64>()
        * 0.5
}

/// Intersection parameters of two segments crossing away from their endpoints.
fn segment_crossing(p: (DVec2, DVec2), q: (DVec2, DVec2)) -> Option<(f64, f64)> {
    const EPS: f64 = 1e-9;
    let r = p.1 - p.0;
    let d = q.1 - q.0;
    let denom = r.perp_dot(d);
    // Parallel pieces, including the two halves of an already split edge.
    if denom.abs() <= 1e-12 * r.length() * d.length() {
        return None;
    }
    let w = q.0 - p.0;
    let t = w.perp_dot(d) / denom;
    let s = w.perp_dot(r) / denom;
    let interior = |x: f64| x > EPS && x < 1.0 - EPS;
    (interior(t) && interior(s)).then_some((t, s))
}

fn find_crossing(rings: &[Ring]) -> Option<Crossing> {
    for a in 0..rings.len() {
        for b in a..rings.len() {
            let (na, nb) = (rings[a].ids.len(), rings[b].ids.len());
            for i in 0..na {
                // Adjacent edges of one loop only meet at their shared vertex.
                let first = if a == b { i + 2 } else { 0 };
                for j in first..nb {
                    if a == b && i == 0 && j == na - 1 {
                        continue;
                    }
                    if let Some((t, s)) = segment_crossing(rings[a].edge(i), rings[b].edge(j)) {
                        return Some(Crossing { a, i, t, b, j, s });
                    }
                }
            }
        }
    }
    None
}

/// Polygon tessellator session.
#[derive(Debug)]
pub struct Tessellator {
    phase: Phase,
    normal: DVec3,
    rule: WindingRule,
    stride: usize,
    data: Vec<f64>,
    lookup: HashMap<Vec<u64>, usize>,
    contours: Vec<Vec<usize>>,
    current: Vec<usize>,
    triangles: Vec<[usize; 3]>,
}

impl Default for Tessellator {
    fn default() -> Self {
        Self::new()
    }
}

impl Tessellator {
    /// Creates an idle tessellator.
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            normal: DVec3::ZERO,
            rule: WindingRule::default(),
            stride: 0,
            data: Vec::new(),
            lookup: HashMap::new(),
            contours: Vec::new(),
            current: Vec::new(),
            triangles: Vec::new(),
        }
    }

    /// Discards all vertices and triangles and restores the default winding rule.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.normal = DVec3::ZERO;
        self.rule = WindingRule::default();
        self.clear_polygon();
    }

    fn clear_polygon(&mut self) {
        self.stride = 0;
        self.data.clear();
        self.lookup.clear();
        self.contours.clear();
        self.current.clear();
        self.triangles.clear();
    }

    fn expect_phase(&self, call: &'static str, phase: Phase) -> Result<(), TessellationError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(TessellationError::InvalidState {
                call,
                state: self.phase.describe(),
            })
        }
    }

    /// Starts a polygon whose contours lie (roughly) in the plane with `normal`.
    ///
    /// A zero normal lets the tessellator compute one from the contours.
    pub fn begin_polygon(&mut self, normal: Vec3) -> Result<(), TessellationError> {
        if !matches!(self.phase, Phase::Idle | Phase::Done) {
            return Err(TessellationError::InvalidState {
                call: "begin_polygon",
                state: self.phase.describe(),
            });
        }
        self.clear_polygon();
        self.normal = normal.as_dvec3();
        self.phase = Phase::Polygon;
        Ok(())
    }

    /// Sets the winding rule used by the next [`end_polygon`](Self::end_polygon).
    pub fn set_winding_rule(&mut self, rule: WindingRule) {
        self.rule = rule;
    }

    /// Returns the current winding rule.
    pub fn winding_rule(&self) -> WindingRule {
        self.rule
    }

    /// Starts a new contour of the open polygon.
    pub fn begin_contour(&mut self) -> Result<(), TessellationError> {
        self.expect_phase("begin_contour", Phase::Polygon)?;
        self.current.clear();
        self.phase = Phase::Contour;
        Ok(())
    }

    /// Adds a vertex to the open contour.
    ///
    /// The payload stride is its length; all payloads of a polygon must share it.
    /// Payloads identical to an earlier one are merged into the same vertex.
    pub fn add_vertex(&mut self, payload: &[f32]) -> Result<(), TessellationError> {
        self.expect_phase("add_vertex", Phase::Contour)?;
        if payload.len() < 3 {
            return Err(TessellationError::PayloadTooShort(payload.len()));
        }
        if self.stride == 0 {
            self.stride = payload.len();
        } else if payload.len() != self.stride {
            return Err(TessellationError::StrideMismatch {
                expected: self.stride,
                actual: payload.len(),
            });
        }
        if !payload[..3].iter().all(|x| x.is_finite()) {
            return Err(TessellationError::NonFinite);
        }

        let id = self.intern(payload.iter().map(|&x| f64::from(x)).collect());
        if self.current.last() != Some(&id) {
            self.current.push(id);
        }
        Ok(())
    }

    /// Closes the open contour. Contours with fewer than three distinct
    /// consecutive vertices are dropped.
    pub fn end_contour(&mut self) -> Result<(), TessellationError> {
        self.expect_phase("end_contour", Phase::Contour)?;
        let mut contour = std::mem::take(&mut self.current);
        if contour.len() > 1 && contour.first() == contour.last() {
            contour.pop();
        }
        if contour.len() >= 3 {
            self.contours.push(contour);
        }
        self.phase = Phase::Polygon;
        Ok(())
    }

    /// Closes the polygon and computes its triangles.
    pub fn end_polygon(&mut self) -> Result<(), TessellationError> {
        self.expect_phase("end_polygon", Phase::Polygon)?;
        self.phase = Phase::Done;
        self.triangulate()
    }

    /// Returns the number of triangles produced by the last polygon.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Returns the vertex ids of triangle `i`.
    pub fn triangle(&self, i: usize) -> Option<[usize; 3]> {
        self.triangles.get(i).copied()
    }

    /// Returns all triangles as vertex id triples.
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Returns the number of unique vertices.
    pub fn num_vertices(&self) -> usize {
        if self.stride == 0 {
            0
        } else {
            self.data.len() / self.stride
        }
    }

    /// Returns the payload of vertex `id`.
    pub fn vertex(&self, id: usize) -> &[f64] {
        &self.data[id * self.stride..(id + 1) * self.stride]
    }

    /// Iterates over all vertex payloads in id order.
    pub fn vertices(&self) -> std::slice::ChunksExact<'_, f64> {
        self.data.chunks_exact(self.stride.max(1))
    }

    /// Returns the payload stride of the current polygon (0 before any vertex).
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the id of `values`, storing it as a new vertex if unseen.
    fn intern(&mut self, values: Vec<f64>) -> usize {
        let key: Vec<u64> = values.iter().map(|x| x.to_bits()).collect();
        if let Some(&id) = self.lookup.get(&key) {
            return id;
        }
        let id = self.data.len() / self.stride;
        self.data.extend_from_slice(&values);
        self.lookup.insert(key, id);
        id
    }

    /// Adds the vertex at parameter `t` from `a` to `b`, interpolating the whole payload.
    fn split_vertex(&mut self, a: usize, b: usize, t: f64) -> usize {
        let values = self
            .vertex(a)
            .iter()
            .zip(self.vertex(b))
            .map(|(x, y)| x + (y - x) * t)
            .collect();
        self.intern(values)
    }

    fn position(&self, id: usize) -> DVec3 {
        let p = &self.data[id * self.stride..id * self.stride + 3];
        DVec3::new(p[0], p[1], p[2])
    }

    /// Newell sum over all contours.
    fn contour_normal(&self) -> DVec3 {
        let mut n = DVec3::ZERO;
        for contour in &self.contours {
            for (i, &a) in contour.iter().enumerate() {
                let b = contour[(i + 1) % contour.len()];
                n += self.position(a).cross(self.position(b));
            }
        }
        n
    }

    /// Largest cross product of two consecutive edges.
    fn corner_normal(&self) -> DVec3 {
        let mut best = DVec3::ZERO;
        for contour in &self.contours {
            let n = contour.len();
            for i in 0..n {
                let a = self.position(contour[i]);
                let b = self.position(contour[(i + 1) % n]);
                let c = self.position(contour[(i + 2) % n]);
                let corner = (b - a).cross(c - b);
                if corner.length_squared() > best.length_squared() {
                    best = corner;
                }
            }
        }
        best
    }

    /// The given normal, else the Newell normal. Lobes of opposite orientation
    /// can cancel the Newell sum, so a vanishing one falls back to the largest
    /// corner.
    fn plane_normal(&self) -> Option<DVec3> {
        if let Some(normal) = self.normal.try_normalize() {
            return Some(normal);
        }
        let newell = self.contour_normal();
        let corner = self.corner_normal();
        if newell.length() > 1e-6 * corner.length() {
            newell.try_normalize()
        } else {
            corner.try_normalize()
        }
    }

    /// Reconnects the contours at every crossing until no two loops cross.
    ///
    /// At a crossing the incoming half of each edge is joined to the outgoing
    /// half of the other, which splits one loop in two or merges two loops
    /// into one. Winding numbers are unchanged.
    fn resolve_crossings(
        &mut self,
        plane: &mut Vec<DVec2>,
        u: DVec3,
        v: DVec3,
    ) -> Result<Vec<Ring>, TessellationError> {
        let mut rings: Vec<Ring> = self
            .contours
            .iter()
            .map(|ids| Ring::new(ids.clone(), plane.as_slice()))
            .collect();
        let edges: usize = rings.iter().map(|ring| ring.ids.len()).sum();
        for _ in 0..=edges * edges {
            let Some(c) = find_crossing(&rings) else {
                return Ok(rings);
            };
            let (first, second) = (&rings[c.a].ids, &rings[c.b].ids);
            let (a0, a1) = (first[c.i], first[(c.i + 1) % first.len()]);
            let (b0, b1) = (second[c.j], second[(c.j + 1) % second.len()]);
            let x = self.split_vertex(a0, a1, c.t);
            let y = self.split_vertex(b0, b1, c.s);
            for id in plane.len()..self.num_vertices() {
                let p = self.position(id);
                plane.push(DVec2::new(p.dot(u), p.dot(v)));
            }

            if c.a == c.b {
                let ids = rings.swap_remove(c.a).ids;
                let mut inner = vec![x];
                inner.extend_from_slice(&ids[c.i + 1..=c.j]);
                let mut outer = vec![y];
                outer.extend(ids[c.j + 1..].iter().chain(&ids[..=c.i]));
                rings.push(Ring::new(inner, plane.as_slice()));
                rings.push(Ring::new(outer, plane.as_slice()));
            } else {
                let second = rings.swap_remove(c.b).ids;
                let first = rings.swap_remove(c.a).ids;
                let mut merged = vec![x];
                merged.extend(first[c.i + 1..].iter().chain(&first[..=c.i]));
                merged.push(y);
                merged.extend(second[c.j + 1..].iter().chain(&second[..=c.j]));
                rings.push(Ring::new(merged, plane.as_slice()));
            }
        }
        Err(TessellationError::Backend("crossing contours did not resolve".to_owned()))
    }

    fn triangulate(&mut self) -> Result<(), TessellationError> {
        if self.contours.is_empty() {
            return Ok(());
        }
        let Some(normal) = self.plane_normal() else {
            log::debug!("skipping degenerate polygon with zero area");
            return Ok(());
        };
        let u = normal.any_orthogonal_vector().normalize();
        let v = normal.cross(u);

        let mut plane: Vec<DVec2> = (0..self.num_vertices())
            .map(|id| {
                let p = self.position(id);
                DVec2::new(p.dot(u), p.dot(v))
            })
            .collect();
        let rings: Vec<Ring> = self
            .resolve_crossings(&mut plane, u, v)?
            .into_iter()
            .filter(|ring| ring.ids.len() >= 3 && ring.area != 0.0)
            .collect();
        let winding = |p: DVec2| rings.iter().map(|ring| ring.winding(p)).sum::<i32>();

        // Classify every ring from the winding numbers on both of its sides.
        let mut outers = Vec::new();
        let mut holes = Vec::new();
        for (i, ring) in rings.iter().enumerate() {
            let left = self.rule.is_inside(winding(ring.probe(true)));
            let right = self.rule.is_inside(winding(ring.probe(false)));
            let (inside, outside) = if ring.area > 0.0 { (left, right) } else { (right, left) };
            match (inside, outside) {
                (true, false) => outers.push(i),
                (false, true) => holes.push(i),
                _ => {}
            }
        }

        let mut groups: Vec<(usize, Vec<usize>)> = outers.iter().map(|&o| (o, Vec::new())).collect();
        for &h in &holes {
            let probe = rings[h].inner_probe();
            let parent = groups
                .iter_mut()
                .filter(|(o, _)| {
                    rings[*o].area.abs() > rings[h].area.abs() && rings[*o].winding(probe) != 0
                })
                .min_by(|(a, _), (b, _)| rings[*a].area.abs().total_cmp(&rings[*b].area.abs()));
            if let Some((_, hole_list)) = parent {
                hole_list.push(h);
            }
        }

        let mut triangles = Vec::new();
        for (outer, hole_list) in &groups {
            let mut coords = Vec::new();
            let mut ids = Vec::new();
            let mut hole_starts = Vec::with_capacity(hole_list.len());
            for (k, &r) in std::iter::once(outer).chain(hole_list.iter()).enumerate() {
                if k > 0 {
                    hole_starts.push(ids.len());
                }
                for (p, &id) in rings[r].points.iter().zip(&rings[r].ids) {
                    coords.extend_from_slice(&[p.x, p.y]);
                    ids.push(id);
                }
            }
            let points: Vec<DVec2> = coords.chunks_exact(2).map(|c| DVec2::new(c[0], c[1])).collect();
            let indices = earcutr::earcut(&coords, &hole_starts, 2)
                .map_err(|err| TessellationError::Backend(format!("{err:?}")))?;
            for tri in indices.chunks_exact(3) {
                let (a, mut b, mut c) = (tri[0], tri[1], tri[2]);
                if (points[b] - points[a]).perp_dot(points[c] - points[a]) < 0.0 {
                    std::mem::swap(&mut b, &mut c);
                }
                triangles.push([ids[a], ids[b], ids[c]]);
            }
        }
        self.triangles = triangles;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tessellate(contours: &[Vec<[f32; 3]>], normal: Vec3, rule: WindingRule) -> Tessellator {
        let mut tess = Tessellator::new();
        tess.begin_polygon(normal).unwrap();
        tess.set_winding_rule(rule);
        for contour in contours {
            tess.begin_contour().unwrap();
            for p in contour {
                tess.add_vertex(p).unwrap();
            }
            tess.end_contour().unwrap();
        }
        tess.end_polygon().unwrap();
        tess
    }

    fn square(min: f32, max: f32) -> Vec<[f32; 3]> {
        vec![[min, min, 0.0], [max, min, 0.0], [max, max, 0.0], [min, max, 0.0]]
    }

    fn reversed(mut contour: Vec<[f32; 3]>) -> Vec<[f32; 3]> {
        contour.reverse();
        contour
    }

    /// Sum of the signed xy areas of all triangles.
    fn total_area(tess: &Tessellator) -> f64 {
        tess.triangles()
            .iter()
            .map(|t| {
                let p = |i: usize| DVec2::new(tess.vertex(t[i])[0], tess.vertex(t[i])[1]);
                (p(1) - p(0)).perp_dot(p(2) - p(0)) * 0.5
            })
            .sum()
    }

    #[test]
    fn test_single_triangle() {
        let tess = tessellate(
            &[vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]],
            Vec3::Z,
            WindingRule::NonZero,
        );
        assert_eq!(tess.num_triangles(), 1);
        assert_eq!(tess.num_vertices(), 3);
        assert!((total_area(&tess) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_non_convex_polygon() {
        let l_shape = vec![
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [2.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
            [1.0, 2.0, 0.0],
            [0.0, 2.0, 0.0],
        ];
        let tess = tessellate(&[l_shape], Vec3::Z, WindingRule::NonZero);
        assert_eq!(tess.num_triangles(), 4);
        // Every triangle is counter-clockwise, so the signed sum is the polygon area.
        assert!((total_area(&tess) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_triangles_follow_the_normal() {
        let tess = tessellate(&[square(0.0, 1.0)], -Vec3::Z, WindingRule::NonZero);
        assert_eq!(tess.num_triangles(), 2);
        // Seen from -z every triangle is counter-clockwise, i.e. clockwise in xy.
        assert!((total_area(&tess) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_hole_with_opposite_orientation() {
        let contours = [square(0.0, 4.0), reversed(square(1.0, 3.0))];
        for rule in [WindingRule::NonZero, WindingRule::Odd] {
            let tess = tessellate(&contours, Vec3::Z, rule);
            assert!((total_area(&tess) - 12.0).abs() < 1e-9, "{rule:?}");
        }
    }

    #[test]
    fn test_nested_same_orientation() {
        let contours = [square(0.0, 4.0), square(1.0, 3.0)];
        let nonzero = tessellate(&contours, Vec3::Z, WindingRule::NonZero);
        assert!((total_area(&nonzero) - 16.0).abs() < 1e-9);
        let odd = tessellate(&contours, Vec3::Z, WindingRule::Odd);
        assert!((total_area(&odd) - 12.0).abs() < 1e-9);
        let abs_geq_two = tessellate(&contours, Vec3::Z, WindingRule::AbsGeqTwo);
        assert!((total_area(&abs_geq_two) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_orientation_rules() {
        let clockwise = [reversed(square(0.0, 1.0))];
        assert_eq!(tessellate(&clockwise, Vec3::Z, WindingRule::Positive).num_triangles(), 0);
        assert_eq!(tessellate(&clockwise, Vec3::Z, WindingRule::Negative).num_triangles(), 2);
    }

    fn unsigned_area(tess: &Tessellator) -> f64 {
        tess.triangles()
            .iter()
            .map(|t| {
                let p = |i: usize| DVec2::new(tess.vertex(t[i])[0], tess.vertex(t[i])[1]);
                ((p(1) - p(0)).perp_dot(p(2) - p(0)) * 0.5).abs()
            })
            .sum()
    }

    fn pentagram() -> Vec<[f32; 3]> {
        (0..5_u8)
            .map(|k| {
                let angle = std::f64::consts::FRAC_PI_2 + f64::from(k) * 0.8 * std::f64::consts::PI;
                [angle.cos() as f32, angle.sin() as f32, 0.0]
            })
            .collect()
    }

    // Areas of the unit pentagram outline and of its inner pentagon.
    const STAR_AREA: f64 = 1.122_569_94;
    const PENTAGON_AREA: f64 = 0.346_893_19;

    #[test]
    fn test_bowtie_fills_both_lobes() {
        let bowtie = vec![[0.0, 0.0, 0.0], [4.0, 2.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0]];
        let tess = tessellate(&[bowtie], Vec3::ZERO, WindingRule::NonZero);
        assert_eq!(tess.num_triangles(), 2);
        assert!((unsigned_area(&tess) - 20.0 / 3.0).abs() < 1e-6);
        let crossing = DVec2::new(8.0 / 3.0, 4.0 / 3.0);
        assert!(tess
            .vertices()
            .any(|p| DVec2::new(p[0], p[1]).distance(crossing) < 1e-6));
    }

    #[test]
    fn test_balanced_bowtie_is_not_dropped() {
        // The two lobes cancel in the Newell sum.
        let bowtie = vec![[0.0, 0.0, 0.0], [2.0, 2.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]];
        let tess = tessellate(&[bowtie], Vec3::ZERO, WindingRule::NonZero);
        assert_eq!(tess.num_triangles(), 2);
        assert!((unsigned_area(&tess) - 2.0).abs() < 1e-9);
        assert_eq!(tess.num_vertices(), 5);
    }

    #[test]
    fn test_crossing_vertices_interpolate_payload() {
        let mut tess = Tessellator::new();
        tess.begin_polygon(Vec3::Z).unwrap();
        tess.set_winding_rule(WindingRule::NonZero);
        tess.begin_contour().unwrap();
        for [x, y] in [[0.0, 0.0], [4.0, 2.0], [4.0, 0.0], [0.0, 4.0]] {
            tess.add_vertex(&[x, y, 0.0, x + 2.0 * y]).unwrap();
        }
        tess.end_contour().unwrap();
        tess.end_polygon().unwrap();
        assert!(tess.num_vertices() > 4);
        for p in tess.vertices() {
            assert!((p[3] - (p[0] + 2.0 * p[1])).abs() < 1e-9);
        }
    }

    #[test]
    fn test_pentagram() {
        let nonzero = tessellate(&[pentagram()], Vec3::Z, WindingRule::NonZero);
        assert!((total_area(&nonzero) - STAR_AREA).abs() < 1e-5);
        let center = tessellate(&[pentagram()], Vec3::Z, WindingRule::AbsGeqTwo);
        assert_eq!(center.num_triangles(), 3);
        assert!((total_area(&center) - PENTAGON_AREA).abs() < 1e-5);
    }

    #[test]
    fn test_overlapping_contours() {
        let contours = [square(0.0, 2.0), square(1.0, 3.0)];
        let nonzero = tessellate(&contours, Vec3::Z, WindingRule::NonZero);
        assert!((total_area(&nonzero) - 7.0).abs() < 1e-9);
        let twice = tessellate(&contours, Vec3::Z, WindingRule::AbsGeqTwo);
        assert!((total_area(&twice) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_normal_is_computed() {
        let tess = tessellate(&[square(0.0, 2.0)], Vec3::ZERO, WindingRule::Positive);
        assert_eq!(tess.num_triangles(), 2);
        assert!((total_area(&tess) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_payload_travels_with_vertices() {
        let mut tess = Tessellator::new();
        tess.begin_polygon(Vec3::Z).unwrap();
        tess.set_winding_rule(WindingRule::NonZero);
        tess.begin_contour().unwrap();
        for (i, p) in square(0.0, 1.0).iter().enumerate() {
            let tag = i as f32;
            tess.add_vertex(&[p[0], p[1], p[2], 0.0, 0.0, 1.0, tag]).unwrap();
        }
        tess.end_contour().unwrap();
        tess.end_polygon().unwrap();
        assert_eq!(tess.stride(), 7);
        for id in tess.triangles().iter().flatten() {
            let payload = tess.vertex(*id);
            assert_eq!(&payload[3..6], &[0.0, 0.0, 1.0]);
            assert_eq!(payload[6], *id as f64);
        }
        assert_eq!(tess.vertices().count(), 4);
    }

    #[test]
    fn test_duplicate_payloads_merge() {
        let mut contour = square(0.0, 1.0);
        contour.push(contour[0]);
        let tess = tessellate(&[contour], Vec3::Z, WindingRule::NonZero);
        assert_eq!(tess.num_vertices(), 4);
        assert_eq!(tess.num_triangles(), 2);
    }

    #[test]
    fn test_degenerate_contours() {
        let collinear = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        assert_eq!(tessellate(&[collinear], Vec3::Z, WindingRule::NonZero).num_triangles(), 0);
        let two = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        assert_eq!(tessellate(&[two], Vec3::Z, WindingRule::NonZero).num_triangles(), 0);
        assert_eq!(tessellate(&[], Vec3::Z, WindingRule::NonZero).num_triangles(), 0);
    }

    #[test]
    fn test_call_order_is_checked() {
        let mut tess = Tessellator::new();
        assert!(matches!(
            tess.add_vertex(&[0.0, 0.0, 0.0]),
            Err(TessellationError::InvalidState { call: "add_vertex", .. })
        ));
        tess.begin_polygon(Vec3::Z).unwrap();
        assert!(tess.end_contour().is_err());
        tess.begin_contour().unwrap();
        assert!(tess.end_polygon().is_err());
    }

    #[test]
    fn test_payload_checks() {
        let mut tess = Tessellator::new();
        tess.begin_polygon(Vec3::Z).unwrap();
        tess.begin_contour().unwrap();
        assert_eq!(
            tess.add_vertex(&[0.0, 1.0]),
            Err(TessellationError::PayloadTooShort(2))
        );
        tess.add_vertex(&[0.0, 0.0, 0.0, 1.0]).unwrap();
        assert_eq!(
            tess.add_vertex(&[0.0, 0.0, 0.0]),
            Err(TessellationError::StrideMismatch {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            tess.add_vertex(&[f32::NAN, 0.0, 0.0, 0.0]),
            Err(TessellationError::NonFinite)
        );
    }

    #[test]
    fn test_reset_clears_results() {
        let mut tess = tessellate(&[square(0.0, 1.0)], Vec3::Z, WindingRule::NonZero);
        tess.reset();
        assert_eq!(tess.num_triangles(), 0);
        assert_eq!(tess.num_vertices(), 0);
        assert_eq!(tess.winding_rule(), WindingRule::Odd);
    }

    proptest! {
        #[test]
        fn convex_polygons_fan_into_n_minus_two(
            mut angles in proptest::collection::vec(0.0f64..std::f64::consts::TAU, 3..12)
        ) {
            angles.sort_by(f64::total_cmp);
            angles.dedup_by(|a, b| (*a - *b).abs() < 0.05);
            prop_assume!(angles.len() >= 3);
            prop_assume!(angles[0] + std::f64::consts::TAU - angles[angles.len() - 1] > 0.05);
            let contour: Vec<[f32; 3]> = angles
                .iter()
                .map(|a| [a.cos() as f32, a.sin() as f32, 0.0])
                .collect();
            let points: Vec<DVec2> = contour
                .iter()
                .map(|p| DVec2::new(f64::from(p[0]), f64::from(p[1])))
                .collect();
            let expected = signed_area(&points);
            prop_assume!(expected > 1e-3);
            let tess = tessellate(&[contour.clone()], Vec3::Z, WindingRule::NonZero);
            prop_assert_eq!(tess.num_triangles(), contour.len() - 2);
            prop_assert!((total_area(&tess) - expected).abs() < 1e-6);
        }
    }
}
