use super::Region;
use crate::block_position::BlockPosition;
use crate::error::EditError;
use serde::{Deserialize, Serialize};

/// An ellipsoid (sphere when all radii agree) around a center block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipsoidRegion {
    center: BlockPosition,
    radius_x: f64,
    radius_y: f64,
    radius_z: f64,
}

impl EllipsoidRegion {
    pub fn new(center: BlockPosition, radius_x: f64, radius_y: f64, radius_z: f64) -> Self {
        EllipsoidRegion {
            center,
            radius_x: radius_x.max(0.0),
            radius_y: radius_y.max(0.0),
            radius_z: radius_z.max(0.0),
        }
    }

    pub fn sphere(center: BlockPosition, radius: f64) -> Self {
        EllipsoidRegion::new(center, radius, radius, radius)
    }

    pub fn center(&self) -> BlockPosition {
        self.center
    }

    pub fn radii(&self) -> (f64, f64, f64) {
        (self.radius_x, self.radius_y, self.radius_z)
    }
}

impl Region for EllipsoidRegion {
    fn contains(&self, position: BlockPosition) -> bool {
        if self.radius_x == 0.0 || self.radius_y == 0.0 || self.radius_z == 0.0 {
            return false;
        }
        let dx = (position.x - self.center.x) as f64 / self.radius_x;
        let dy = (position.y - self.center.y) as f64 / self.radius_y;
        let dz = (position.z - self.center.z) as f64 / self.radius_z;
        dx * dx + dy * dy + dz * dz <= 1.0
    }

    fn minimum_point(&self) -> BlockPosition {
        BlockPosition::new(
            self.center.x - self.radius_x.ceil() as i32,
            self.center.y - self.radius_y.ceil() as i32,
            self.center.z - self.radius_z.ceil() as i32,
        )
    }

    fn maximum_point(&self) -> BlockPosition {
        BlockPosition::new(
            self.center.x + self.radius_x.ceil() as i32,
            self.center.y + self.radius_y.ceil() as i32,
            self.center.z + self.radius_z.ceil() as i32,
        )
    }

    fn blocks(&self) -> Box<dyn Iterator<Item = BlockPosition> + '_> {
        Box::new(super::scan_box(self.bounding_box()).filter(move |p| self.contains(*p)))
    }

    fn expand(&mut self, deltas: &[BlockPosition]) -> Result<(), EditError> {
        for delta in deltas {
            let d = delta.abs();
            self.radius_x += d.x as f64;
            self.radius_y += d.y as f64;
            self.radius_z += d.z as f64;
        }
        Ok(())
    }

    fn contract(&mut self, deltas: &[BlockPosition]) -> Result<(), EditError> {
        let (mut rx, mut ry, mut rz) = (self.radius_x, self.radius_y, self.radius_z);
        for delta in deltas {
            let d = delta.abs();
            rx -= d.x as f64;
            ry -= d.y as f64;
            rz -= d.z as f64;
        }
        if rx < 0.0 || ry < 0.0 || rz < 0.0 {
            return Err(EditError::geometry(
                "contracting ellipsoid past zero radius",
            ));
        }
        self.radius_x = rx;
        self.radius_y = ry;
        self.radius_z = rz;
        Ok(())
    }

    fn shift(&mut self, offset: BlockPosition) -> Result<(), EditError> {
        self.center += offset;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_boundary_exact() {
        let region = EllipsoidRegion::sphere(BlockPosition::ZERO, 3.0);
        assert!(region.contains(BlockPosition::new(3, 0, 0)));
        assert!(region.contains(BlockPosition::new(0, -3, 0)));
        assert!(!region.contains(BlockPosition::new(3, 1, 0)));
    }

    #[test]
    fn test_volume_matches_iteration() {
        let region = EllipsoidRegion::new(BlockPosition::new(1, 2, 3), 2.0, 3.0, 4.0);
        assert_eq!(region.volume(), region.blocks().count() as u64);
    }
}
