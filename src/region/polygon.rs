use super::{FlatRegion, Region};
use crate::block_position::{BlockColumn, BlockPosition};
use crate::error::EditError;
use serde::{Deserialize, Serialize};

/// A 2D polygon extruded between two Y levels. Containment is an even-odd
/// crossing test on the footprint, evaluated independently per layer; cells
/// on an edge or vertex count as inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polygonal2DRegion {
    points: Vec<BlockColumn>,
    min_y: i32,
    max_y: i32,
}

impl Polygonal2DRegion {
    pub fn new(points: Vec<BlockColumn>, min_y: i32, max_y: i32) -> Self {
        Polygonal2DRegion {
            points,
            min_y: min_y.min(max_y),
            max_y: min_y.max(max_y),
        }
    }

    pub fn points(&self) -> &[BlockColumn] {
        &self.points
    }

    pub fn add_point(&mut self, point: BlockColumn) {
        self.points.push(point);
    }

    fn contains_column(&self, column: BlockColumn) -> bool {
        if self.points.len() < 3 {
            return false;
        }
        let target_x = column.x;
        let target_z = column.z;

        let mut inside = false;
        let npoints = self.points.len();
        let mut x_old = self.points[npoints - 1].x;
        let mut z_old = self.points[npoints - 1].z;

        for point in &self.points {
            let x_new = point.x;
            let z_new = point.z;
            if x_new == target_x && z_new == target_z {
                return true;
            }
            let (x1, z1, x2, z2) = if x_new > x_old {
                (x_old, z_old, x_new, z_new)
            } else {
                (x_new, z_new, x_old, z_old)
            };
            if x1 <= target_x && target_x <= x2 {
                let crossproduct = (target_z as i64 - z1 as i64) * (x2 - x1) as i64
                    - (z2 as i64 - z1 as i64) * (target_x - x1) as i64;
                if crossproduct == 0 {
                    if (z1 <= target_z) == (target_z <= z2) {
                        return true;
                    }
                } else if crossproduct < 0 && x1 != target_x {
                    inside = !inside;
                }
            }
            x_old = x_new;
            z_old = z_new;
        }

        inside
    }

    fn footprint_bounds(&self) -> (BlockColumn, BlockColumn) {
        let mut min = self.points.first().copied().unwrap_or(BlockColumn::new(0, 0));
        let mut max = min;
        for p in &self.points {
            min.x = min.x.min(p.x);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.z = max.z.max(p.z);
        }
        (min, max)
    }
}

impl Region for Polygonal2DRegion {
    fn contains(&self, position: BlockPosition) -> bool {
        if position.y < self.min_y || position.y > self.max_y {
            return false;
        }
        self.contains_column(position.column())
    }

    fn minimum_point(&self) -> BlockPosition {
        let (min, _) = self.footprint_bounds();
        BlockPosition::new(min.x, self.min_y, min.z)
    }

    fn maximum_point(&self) -> BlockPosition {
        let (_, max) = self.footprint_bounds();
        BlockPosition::new(max.x, self.max_y, max.z)
    }

    fn volume(&self) -> u64 {
        let footprint = self.columns().count() as u64;
        footprint * (self.max_y - self.min_y + 1) as u64
    }

    fn blocks(&self) -> Box<dyn Iterator<Item = BlockPosition> + '_> {
        Box::new(super::scan_box(self.bounding_box()).filter(move |p| self.contains(*p)))
    }

    fn expand(&mut self, deltas: &[BlockPosition]) -> Result<(), EditError> {
        for delta in deltas {
            if delta.x != 0 || delta.z != 0 {
                return Err(EditError::geometry(
                    "polygons can only be expanded vertically",
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
                    "polygons can only be contracted vertically",
                ));
            }
            if delta.y > 0 {
                min_y += delta.y;
            } else {
                max_y += delta.y;
            }
        }
        if min_y > max_y {
            return Err(EditError::geometry("contracting polygon past zero height"));
        }
        self.min_y = min_y;
        self.max_y = max_y;
        Ok(())
    }

    fn shift(&mut self, offset: BlockPosition) -> Result<(), EditError> {
        let delta = BlockColumn::new(offset.x, offset.z);
        for point in &mut self.points {
            *point = *point + delta;
        }
        self.min_y += offset.y;
        self.max_y += offset.y;
        Ok(())
    }
}

impl FlatRegion for Polygonal2DRegion {
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

    fn square() -> Polygonal2DRegion {
        Polygonal2DRegion::new(
            vec![
                BlockColumn::new(0, 0),
                BlockColumn::new(4, 0),
                BlockColumn::new(4, 4),
                BlockColumn::new(0, 4),
            ],
            0,
            2,
        )
    }

    #[test]
    fn test_square_footprint() {
        let region = square();
        assert!(region.contains(BlockPosition::new(2, 1, 2)));
        assert!(region.contains(BlockPosition::new(0, 0, 0)));
        assert!(region.contains(BlockPosition::new(4, 2, 4)));
        assert!(!region.contains(BlockPosition::new(5, 0, 2)));
        assert!(!region.contains(BlockPosition::new(2, 3, 2)));
        assert_eq!(region.volume(), 25 * 3);
        assert_eq!(region.blocks().count() as u64, region.volume());
    }

    #[test]
    fn test_l_shape_excludes_notch() {
        // L-shaped footprint: 5x5 square with the 2x2 corner at (3..4, 3..4)
        // cut out.
        let region = Polygonal2DRegion::new(
            vec![
                BlockColumn::new(0, 0),
                BlockColumn::new(4, 0),
                BlockColumn::new(4, 2),
                BlockColumn::new(2, 2),
                BlockColumn::new(2, 4),
                BlockColumn::new(0, 4),
            ],
            0,
            0,
        );
        assert!(region.contains(BlockPosition::new(1, 0, 3)));
        assert!(!region.contains(BlockPosition::new(4, 0, 4)));
        assert_eq!(region.volume(), region.blocks().count() as u64);
    }
}
