use super::{scan_box, scan_columns, FlatRegion, Region};
use crate::block_position::{BlockColumn, BlockPosition};
use crate::bounding_box::BoundingBox;
use crate::error::EditError;
use serde::{Deserialize, Serialize};

/// The workhorse region: an axis-aligned box defined by two corners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuboidRegion {
    min: BlockPosition,
    max: BlockPosition,
}

impl CuboidRegion {
    /// Corners may be given in any order; they are normalized on entry.
    pub fn new(a: BlockPosition, b: BlockPosition) -> Self {
        CuboidRegion {
            min: a.minimum(b),
            max: a.maximum(b),
        }
    }

    pub fn from_bounding_box(bbox: BoundingBox) -> Self {
        CuboidRegion {
            min: bbox.min,
            max: bbox.max,
        }
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x + 1
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y + 1
    }

    pub fn length(&self) -> i32 {
        self.max.z - self.min.z + 1
    }

    /// The four vertical side slabs, non-overlapping, covering every cell
    /// that touches a side face.
    pub fn walls(&self) -> Vec<CuboidRegion> {
        let mut walls = vec![CuboidRegion::new(
            BlockPosition::new(self.min.x, self.min.y, self.min.z),
            BlockPosition::new(self.min.x, self.max.y, self.max.z),
        )];
        if self.max.x > self.min.x {
            walls.push(CuboidRegion::new(
                BlockPosition::new(self.max.x, self.min.y, self.min.z),
                BlockPosition::new(self.max.x, self.max.y, self.max.z),
            ));
        }
        // The Z walls shrink in X so corners are not visited twice.
        if self.max.x - self.min.x >= 2 {
            walls.push(CuboidRegion::new(
                BlockPosition::new(self.min.x + 1, self.min.y, self.min.z),
                BlockPosition::new(self.max.x - 1, self.max.y, self.min.z),
            ));
            if self.max.z > self.min.z {
                walls.push(CuboidRegion::new(
                    BlockPosition::new(self.min.x + 1, self.min.y, self.max.z),
                    BlockPosition::new(self.max.x - 1, self.max.y, self.max.z),
                ));
            }
        }
        walls
    }

    /// The six face slabs (walls plus floor and ceiling), non-overlapping.
    pub fn faces(&self) -> Vec<CuboidRegion> {
        let mut faces = vec![CuboidRegion::new(
            BlockPosition::new(self.min.x, self.min.y, self.min.z),
            BlockPosition::new(self.max.x, self.min.y, self.max.z),
        )];
        if self.max.y > self.min.y {
            faces.push(CuboidRegion::new(
                BlockPosition::new(self.min.x, self.max.y, self.min.z),
                BlockPosition::new(self.max.x, self.max.y, self.max.z),
            ));
        }
        if self.max.y - self.min.y >= 2 {
            let trimmed = CuboidRegion::new(
                BlockPosition::new(self.min.x, self.min.y + 1, self.min.z),
                BlockPosition::new(self.max.x, self.max.y - 1, self.max.z),
            );
            faces.extend(trimmed.walls());
        }
        faces
    }
}

impl Region for CuboidRegion {
    fn contains(&self, position: BlockPosition) -> bool {
        self.bounding_box().contains(position)
    }

    fn minimum_point(&self) -> BlockPosition {
        self.min
    }

    fn maximum_point(&self) -> BlockPosition {
        self.max
    }

    fn volume(&self) -> u64 {
        self.width() as u64 * self.height() as u64 * self.length() as u64
    }

    fn blocks(&self) -> Box<dyn Iterator<Item = BlockPosition> + '_> {
        Box::new(scan_box(self.bounding_box()))
    }

    fn expand(&mut self, deltas: &[BlockPosition]) -> Result<(), EditError> {
        for delta in deltas {
            if delta.x > 0 {
                self.max.x += delta.x;
            } else {
                self.min.x += delta.x;
            }
            if delta.y > 0 {
                self.max.y += delta.y;
            } else {
                self.min.y += delta.y;
            }
            if delta.z > 0 {
                self.max.z += delta.z;
            } else {
                self.min.z += delta.z;
            }
        }
        Ok(())
    }

    fn contract(&mut self, deltas: &[BlockPosition]) -> Result<(), EditError> {
        let (mut min, mut max) = (self.min, self.max);
        for delta in deltas {
            if delta.x > 0 {
                min.x += delta.x;
            } else {
                max.x += delta.x;
            }
            if delta.y > 0 {
                min.y += delta.y;
            } else {
                max.y += delta.y;
            }
            if delta.z > 0 {
                min.z += delta.z;
            } else {
                max.z += delta.z;
            }
        }
        if min.x > max.x || min.y > max.y || min.z > max.z {
            return Err(EditError::geometry(format!(
                "contracting cuboid past zero size ({} > {})",
                min, max
            )));
        }
        self.min = min;
        self.max = max;
        Ok(())
    }

    fn shift(&mut self, offset: BlockPosition) -> Result<(), EditError> {
        self.min += offset;
        self.max += offset;
        Ok(())
    }
}

impl FlatRegion for CuboidRegion {
    fn y_range(&self) -> (i32, i32) {
        (self.min.y, self.max.y)
    }

    fn columns(&self) -> Box<dyn Iterator<Item = BlockColumn> + '_> {
        Box::new(scan_columns(self.bounding_box()))
    }
}
