use super::{FlatRegion, Region};
use crate::block_position::{BlockColumn, BlockPosition};
use crate::error::EditError;
use serde::{Deserialize, Serialize};

/// A vertical cylinder (optionally elliptical) between two Y levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CylinderRegion {
    center: BlockColumn,
    radius_x: f64,
    radius_z: f64,
    min_y: i32,
    max_y: i32,
}

impl CylinderRegion {
    pub fn new(center: BlockColumn, radius_x: f64, radius_z: f64, min_y: i32, max_y: i32) -> Self {
        CylinderRegion {
            center,
            radius_x: radius_x.max(0.0),
            radius_z: radius_z.max(0.0),
            min_y: min_y.min(max_y),
            max_y: min_y.max(max_y),
        }
    }

    pub fn center(&self) -> BlockColumn {
        self.center
    }

    fn contains_column(&self, column: BlockColumn) -> bool {
        if self.radius_x == 0.0 || self.radius_z == 0.0 {
            return false;
        }
        let dx = (column.x - self.center.x) as f64 / self.radius_x;
        let dz = (column.z - self.center.z) as f64 / self.radius_z;
        // Exact at the defining radii: boundary cells satisfying equality
        // are inside.
        dx * dx + dz * dz <= 1.0
    }

    fn footprint(&self) -> u64 {
        let rx = self.radius_x.ceil() as i32;
        let rz = self.radius_z.ceil() as i32;
        let mut count = 0u64;
        for z in (self.center.z - rz)..=(self.center.z + rz) {
            for x in (self.center.x - rx)..=(self.center.x + rx) {
                if self.contains_column(BlockColumn::new(x, z)) {
                    count += 1;
                }
            }
        }
        count
    }
}

impl Region for CylinderRegion {
    fn contains(&self, position: BlockPosition) -> bool {
        if position.y < self.min_y || position.y > self.max_y {
            return false;
        }
        self.contains_column(position.column())
    }

    fn minimum_point(&self) -> BlockPosition {
        BlockPosition::new(
            self.center.x - self.radius_x.ceil() as i32,
            self.min_y,
            self.center.z - self.radius_z.ceil() as i32,
        )
    }

    fn maximum_point(&self) -> BlockPosition {
        BlockPosition::new(
            self.center.x + self.radius_x.ceil() as i32,
            self.max_y,
            self.center.z + self.radius_z.ceil() as i32,
        )
    }

    fn volume(&self) -> u64 {
        self.footprint() * (self.max_y - self.min_y + 1) as u64
    }

    fn blocks(&self) -> Box<dyn Iterator<Item = BlockPosition> + '_> {
        Box::new(super::scan_box(self.bounding_box()).filter(move |p| self.contains(*p)))
    }

    fn expand(&mut self, deltas: &[BlockPosition]) -> Result<(), EditError> {
        for delta in deltas {
            if delta.x != 0 || delta.z != 0 {
                return Err(EditError::geometry(
                    "cylinders can only be expanded vertically",
                ));
            }
            if delta.y > 0 {
                self.max_y += delta.y;
            } else {
                self.min_y += delta.y;
            }
        }
        Ok(())
    }

    fn contract(&mut self, deltas: &[BlockPosition]) -> Result<(), EditError> {
        let (mut min_y, mut max_y) = (self.min_y, self.max_y);
        for delta in deltas {
            if delta.x != 0 || delta.z != 0 {
                return Err(EditError::geometry(
                    "cylinders can only be contracted vertically",
                ));
            }
            if delta.y > 0 {
                min_y += delta.y;
            } else {
                max_y += delta.y;
            }
        }
        if min_y > max_y {
            return Err(EditError::geometry("contracting cylinder past zero height"));
        }
        self.min_y = min_y;
        self.max_y = max_y;
        Ok(())
    }

    fn shift(&mut self, offset: BlockPosition) -> Result<(), EditError> {
        self.center = self.center + BlockColumn::new(offset.x, offset.z);
        self.min_y += offset.y;
        self.max_y += offset.y;
        Ok(())
    }
}

impl FlatRegion for CylinderRegion {
    fn y_range(&self) -> (i32, i32) {
        (self.min_y, self.max_y)
    }

    fn columns(&self) -> Box<dyn Iterator<Item = BlockColumn> + '_> {
        Box::new(
            super::scan_columns(self.bounding_box()).filter(move |c| self.contains_column(*c)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Region;

    #[test]
    fn test_boundary_cells_at_radius_are_inside() {
        let region = CylinderRegion::new(BlockColumn::new(0, 0), 4.0, 4.0, 0, 0);
        assert!(region.contains(BlockPosition::new(4, 0, 0)));
        assert!(region.contains(BlockPosition::new(0, 0, -4)));
        assert!(!region.contains(BlockPosition::new(4, 0, 1)));
        assert!(!region.contains(BlockPosition::new(5, 0, 0)));
    }

    #[test]
    fn test_volume_matches_iteration() {
        let region = CylinderRegion::new(BlockColumn::new(3, -2), 3.5, 2.5, -1, 4);
        assert_eq!(region.volume(), region.blocks().count() as u64);
    }

    #[test]
    fn test_horizontal_expand_rejected() {
        let mut region = CylinderRegion::new(BlockColumn::new(0, 0), 2.0, 2.0, 0, 5);
        assert!(region.expand(&[BlockPosition::new(1, 0, 0)]).is_err());
        assert!(region.expand(&[BlockPosition::new(0, 2, 0)]).is_ok());
        assert_eq!(region.y_range(), (0, 7));
    }
}
