mod convex;
mod cuboid;
mod cylinder;
mod ellipsoid;
mod point_set;
mod polygon;

pub use convex::ConvexPolyhedronRegion;
pub use cuboid::CuboidRegion;
pub use cylinder::CylinderRegion;
pub use ellipsoid::EllipsoidRegion;
pub use point_set::PointSetRegion;
pub use polygon::Polygonal2DRegion;

use crate::block_position::{BlockColumn, BlockPosition};
use crate::bounding_box::BoundingBox;
use crate::error::EditError;

/// A 3D shape that defines which cells an operation touches.
///
/// `blocks()` yields every contained cell exactly once, lazily, in a
/// deterministic order; callers must not rely on any order beyond that.
/// `volume()` always equals the length of that sequence.
pub trait Region {
    fn contains(&self, position: BlockPosition) -> bool;

    fn minimum_point(&self) -> BlockPosition;

    fn maximum_point(&self) -> BlockPosition;

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            min: self.minimum_point(),
            max: self.maximum_point(),
        }
    }

    /// Exact count of contained cells.
    fn volume(&self) -> u64 {
        self.blocks().count() as u64
    }

    /// Fresh, restartable iteration over every contained cell.
    fn blocks(&self) -> Box<dyn Iterator<Item = BlockPosition> + '_>;

    /// Grow the region. Positive delta components push the maximum side out,
    /// negative components push the minimum side out.
    fn expand(&mut self, deltas: &[BlockPosition]) -> Result<(), EditError>;

    /// Shrink the region; the inverse of `expand`. Errors when the result
    /// would be degenerate, leaving the region untouched.
    fn contract(&mut self, deltas: &[BlockPosition]) -> Result<(), EditError>;

    fn shift(&mut self, offset: BlockPosition) -> Result<(), EditError>;
}

/// Regions with a well-defined 2D footprint, supporting column-wise
/// (biome, height map) operations.
pub trait FlatRegion: Region {
    /// Inclusive vertical range of the region.
    fn y_range(&self) -> (i32, i32);

    /// Fresh iteration over the 2D footprint, one entry per column.
    fn columns(&self) -> Box<dyn Iterator<Item = BlockColumn> + '_>;
}

/// Row-major scan of an inclusive box, Y-major so vertical slices stay
/// contiguous.
pub(crate) fn scan_box(bbox: BoundingBox) -> impl Iterator<Item = BlockPosition> {
    let min = bbox.min;
    let max = bbox.max;
    (min.y..=max.y).flat_map(move |y| {
        (min.z..=max.z)
            .flat_map(move |z| (min.x..=max.x).map(move |x| BlockPosition::new(x, y, z)))
    })
}

/// 2D scan of a box footprint.
pub(crate) fn scan_columns(bbox: BoundingBox) -> impl Iterator<Item = BlockColumn> {
    let min = bbox.min;
    let max = bbox.max;
    (min.z..=max.z).flat_map(move |z| (min.x..=max.x).map(move |x| BlockColumn::new(x, z)))
}
