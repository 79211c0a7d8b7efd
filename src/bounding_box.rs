use crate::block_position::BlockPosition;
use serde::{Deserialize, Serialize};

/// An axis-aligned box of blocks, inclusive on every face.
/// Invariant: `min <= max` component-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: BlockPosition,
    pub max: BlockPosition,
}

impl BoundingBox {
    pub fn new(a: BlockPosition, b: BlockPosition) -> Self {
        BoundingBox {
            min: a.minimum(b),
            max: a.maximum(b),
        }
    }

    pub fn contains(&self, position: BlockPosition) -> bool {
        position.x >= self.min.x
            && position.x <= self.max.x
            && position.y >= self.min.y
            && position.y <= self.max.y
            && position.z >= self.min.z
            && position.z <= self.max.z
    }

    /// Width (x), height (y), length (z) in blocks.
    pub fn dimensions(&self) -> (i32, i32, i32) {
        (
            self.max.x - self.min.x + 1,
            self.max.y - self.min.y + 1,
            self.max.z - self.min.z + 1,
        )
    }

    pub fn volume(&self) -> u64 {
        let (w, h, l) = self.dimensions();
        w as u64 * h as u64 * l as u64
    }

    pub fn grow_to_fit(&mut self, position: BlockPosition) {
        self.min = self.min.minimum(position);
        self.max = self.max.maximum(position);
    }

    /// Continuous center of the box, for selection-relative coordinate
    /// frames.
    pub fn center(&self) -> (f64, f64, f64) {
        (
            (self.min.x + self.max.x) as f64 / 2.0,
            (self.min.y + self.max.y) as f64 / 2.0,
            (self.min.z + self.max.z) as f64 / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::BoundingBox;
    use crate::block_position::BlockPosition;

    #[test]
    fn test_normalizes_corners() {
        let bbox = BoundingBox::new(BlockPosition::new(5, -1, 2), BlockPosition::new(-3, 4, 2));
        assert_eq!(bbox.min, BlockPosition::new(-3, -1, 2));
        assert_eq!(bbox.max, BlockPosition::new(5, 4, 2));
        assert_eq!(bbox.dimensions(), (9, 6, 1));
        assert_eq!(bbox.volume(), 54);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let bbox = BoundingBox::new(BlockPosition::ZERO, BlockPosition::new(2, 2, 2));
        assert!(bbox.contains(BlockPosition::ZERO));
        assert!(bbox.contains(BlockPosition::new(2, 2, 2)));
        assert!(!bbox.contains(BlockPosition::new(3, 2, 2)));
    }
}
