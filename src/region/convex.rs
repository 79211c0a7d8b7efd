use super::Region;
use crate::block_position::BlockPosition;
use crate::bounding_box::BoundingBox;
use crate::error::EditError;
use serde::{Deserialize, Serialize};

type Vec3 = (f64, f64, f64);

fn sub(a: Vec3, b: Vec3) -> Vec3 {
    (a.0 - b.0, a.1 - b.1, a.2 - b.2)
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    (
        a.1 * b.2 - a.2 * b.1,
        a.2 * b.0 - a.0 * b.2,
        a.0 * b.1 - a.1 * b.0,
    )
}

fn dot(a: Vec3, b: Vec3) -> f64 {
    a.0 * b.0 + a.1 * b.1 + a.2 * b.2
}

/// One face of the hull mesh, winding kept so the normal points outward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Triangle {
    vertices: [Vec3; 3],
    normal: Vec3,
    offset: f64,
}

impl Triangle {
    fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let normal = cross(sub(v1, v0), sub(v2, v0));
        Triangle {
            vertices: [v0, v1, v2],
            normal,
            offset: dot(normal, v0),
        }
    }

    /// True when the point lies strictly on the outside of this face's
    /// plane. Points on the plane itself count as inside the hull.
    fn above(&self, point: Vec3) -> bool {
        dot(self.normal, point) > self.offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edge {
    start: BlockPosition,
    end: BlockPosition,
}

impl Edge {
    fn matches(&self, other: &Edge) -> bool {
        (self.start == other.start && self.end == other.end)
            || (self.start == other.end && self.end == other.start)
    }
}

/// The convex hull of a set of chosen vertices, built incrementally: each
/// new outside vertex removes the faces it can see and re-fans the horizon
/// edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvexPolyhedronRegion {
    vertices: Vec<BlockPosition>,
    triangles: Vec<Triangle>,
    bbox: Option<BoundingBox>,
}

impl Default for ConvexPolyhedronRegion {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvexPolyhedronRegion {
    pub fn new() -> Self {
        ConvexPolyhedronRegion {
            vertices: Vec::new(),
            triangles: Vec::new(),
            bbox: None,
        }
    }

    pub fn from_vertices(vertices: impl IntoIterator<Item = BlockPosition>) -> Self {
        let mut region = ConvexPolyhedronRegion::new();
        for vertex in vertices {
            region.add_vertex(vertex);
        }
        region
    }

    /// True once at least one face exists (three or more vertices).
    pub fn is_defined(&self) -> bool {
        !self.triangles.is_empty()
    }

    pub fn vertices(&self) -> &[BlockPosition] {
        &self.vertices
    }

    /// Add a defining vertex. Returns false when the vertex is a duplicate
    /// or already inside the hull and therefore changes nothing.
    pub fn add_vertex(&mut self, vertex: BlockPosition) -> bool {
        if self.vertices.contains(&vertex) {
            return false;
        }
        let point = vertex.to_f64();
        if self.vertices.len() >= 3 && self.contains_raw(point) {
            return false;
        }

        self.vertices.push(vertex);
        match &mut self.bbox {
            Some(bbox) => bbox.grow_to_fit(vertex),
            None => self.bbox = Some(BoundingBox::new(vertex, vertex)),
        }

        match self.vertices.len() {
            1 | 2 => return true,
            3 => {
                // Minimal closed mesh: the same triangle with both windings.
                let v0 = self.vertices[0].to_f64();
                let v1 = self.vertices[1].to_f64();
                let v2 = self.vertices[2].to_f64();
                self.triangles.push(Triangle::new(v0, v1, v2));
                self.triangles.push(Triangle::new(v0, v2, v1));
                return true;
            }
            _ => {}
        }

        // Remove every face the new vertex can see. Edges shared by two
        // removed faces cancel out; the survivors form the horizon loop.
        let mut border: Vec<(Edge, Vec3, Vec3)> = Vec::new();
        let mut kept = Vec::with_capacity(self.triangles.len());
        for triangle in self.triangles.drain(..) {
            if !triangle.above(point) {
                kept.push(triangle);
                continue;
            }
            let corners = [
                BlockPosition::from_rounded(
                    triangle.vertices[0].0,
                    triangle.vertices[0].1,
                    triangle.vertices[0].2,
                ),
                BlockPosition::from_rounded(
                    triangle.vertices[1].0,
                    triangle.vertices[1].1,
                    triangle.vertices[1].2,
                ),
                BlockPosition::from_rounded(
                    triangle.vertices[2].0,
                    triangle.vertices[2].1,
                    triangle.vertices[2].2,
                ),
            ];
            for i in 0..3 {
                let edge = Edge {
                    start: corners[i],
                    end: corners[(i + 1) % 3],
                };
                if let Some(found) = border.iter().position(|(e, _, _)| e.matches(&edge)) {
                    border.remove(found);
                } else {
                    border.push((
                        edge,
                        triangle.vertices[i],
                        triangle.vertices[(i + 1) % 3],
                    ));
                }
            }
        }
        self.triangles = kept;

        for (_, start, end) in border {
            self.triangles.push(Triangle::new(start, end, point));
        }
        true
    }

    fn contains_raw(&self, point: Vec3) -> bool {
        self.triangles.iter().all(|t| !t.above(point))
    }
}

impl Region for ConvexPolyhedronRegion {
    fn contains(&self, position: BlockPosition) -> bool {
        if !self.is_defined() {
            return false;
        }
        self.contains_raw(position.to_f64())
    }

    fn minimum_point(&self) -> BlockPosition {
        self.bbox.map(|b| b.min).unwrap_or(BlockPosition::ZERO)
    }

    fn maximum_point(&self) -> BlockPosition {
        self.bbox.map(|b| b.max).unwrap_or(BlockPosition::ZERO)
    }

    fn blocks(&self) -> Box<dyn Iterator<Item = BlockPosition> + '_> {
        Box::new(super::scan_box(self.bounding_box()).filter(move |p| self.contains(*p)))
    }

    fn expand(&mut self, _deltas: &[BlockPosition]) -> Result<(), EditError> {
        Err(EditError::geometry(
            "convex polyhedra cannot be expanded, add vertices instead",
        ))
    }

    fn contract(&mut self, _deltas: &[BlockPosition]) -> Result<(), EditError> {
        Err(EditError::geometry("convex polyhedra cannot be contracted"))
    }

    fn shift(&mut self, offset: BlockPosition) -> Result<(), EditError> {
        let vertices: Vec<BlockPosition> = self.vertices.iter().map(|v| *v + offset).collect();
        *self = ConvexPolyhedronRegion::from_vertices(vertices);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Region;

    fn tetrahedron() -> ConvexPolyhedronRegion {
        ConvexPolyhedronRegion::from_vertices([
            BlockPosition::new(0, 0, 0),
            BlockPosition::new(8, 0, 0),
            BlockPosition::new(0, 0, 8),
            BlockPosition::new(0, 8, 0),
        ])
    }

    #[test]
    fn test_tetrahedron_contains() {
        let region = tetrahedron();
        assert!(region.is_defined());
        assert!(region.contains(BlockPosition::new(1, 1, 1)));
        assert!(region.contains(BlockPosition::new(0, 0, 0)));
        assert!(!region.contains(BlockPosition::new(7, 7, 7)));
        assert!(!region.contains(BlockPosition::new(-1, 0, 0)));
    }

    #[test]
    fn test_interior_vertex_is_rejected() {
        let mut region = tetrahedron();
        assert!(!region.add_vertex(BlockPosition::new(1, 1, 1)));
        assert_eq!(region.vertices().len(), 4);
    }

    #[test]
    fn test_cube_from_eight_corners() {
        let region = ConvexPolyhedronRegion::from_vertices([
            BlockPosition::new(0, 0, 0),
            BlockPosition::new(4, 0, 0),
            BlockPosition::new(0, 4, 0),
            BlockPosition::new(0, 0, 4),
            BlockPosition::new(4, 4, 0),
            BlockPosition::new(4, 0, 4),
            BlockPosition::new(0, 4, 4),
            BlockPosition::new(4, 4, 4),
        ]);
        assert_eq!(region.volume(), 125);
        assert_eq!(region.blocks().count(), 125);
    }
}
