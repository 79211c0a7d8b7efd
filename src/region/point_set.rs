use super::Region;
use crate::block_position::BlockPosition;
use crate::bounding_box::BoundingBox;
use crate::error::EditError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An arbitrary set of cells, used for unions of other regions and for
/// rasterized shapes (lines, splines). The ordered set keeps iteration
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointSetRegion {
    points: BTreeSet<BlockPosition>,
}

impl PointSetRegion {
    pub fn new() -> Self {
        PointSetRegion::default()
    }

    pub fn from_points(points: impl IntoIterator<Item = BlockPosition>) -> Self {
        PointSetRegion {
            points: points.into_iter().collect(),
        }
    }

    /// The union of several regions.
    pub fn union(regions: &[&dyn Region]) -> Self {
        let mut points = BTreeSet::new();
        for region in regions {
            points.extend(region.blocks());
        }
        PointSetRegion { points }
    }

    pub fn insert(&mut self, position: BlockPosition) -> bool {
        self.points.insert(position)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    fn bounds(&self) -> Option<BoundingBox> {
        let mut iter = self.points.iter();
        let first = *iter.next()?;
        let mut bbox = BoundingBox::new(first, first);
        for p in iter {
            bbox.grow_to_fit(*p);
        }
        Some(bbox)
    }
}

impl Region for PointSetRegion {
    fn contains(&self, position: BlockPosition) -> bool {
        self.points.contains(&position)
    }

    fn minimum_point(&self) -> BlockPosition {
        self.bounds().map(|b| b.min).unwrap_or(BlockPosition::ZERO)
    }

    fn maximum_point(&self) -> BlockPosition {
        self.bounds().map(|b| b.max).unwrap_or(BlockPosition::ZERO)
    }

    fn volume(&self) -> u64 {
        self.points.len() as u64
    }

    fn blocks(&self) -> Box<dyn Iterator<Item = BlockPosition> + '_> {
        Box::new(self.points.iter().copied())
    }

    fn expand(&mut self, _deltas: &[BlockPosition]) -> Result<(), EditError> {
        Err(EditError::geometry("point sets cannot be expanded"))
    }

    fn contract(&mut self, _deltas: &[BlockPosition]) -> Result<(), EditError> {
        Err(EditError::geometry("point sets cannot be contracted"))
    }

    fn shift(&mut self, offset: BlockPosition) -> Result<(), EditError> {
        self.points = self.points.iter().map(|p| *p + offset).collect();
        Ok(())
    }
}
