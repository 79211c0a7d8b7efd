//! voxedit: a transactional bulk-editing engine for voxel block worlds.
//!
//! The crate applies bulk changes to a 3D block grid through a single choke
//! point, the [`EditSession`]: resolve coordinates from a [`Region`], filter
//! them through a [`Mask`], compute each cell's block with a [`Pattern`] and
//! write it through an [`Extent`], journalling every applied change so the
//! whole edit can be undone. Long-running edits decompose into cancellable
//! [`Operation`]s tracked by a registry.
//!
//! ```
//! use voxedit::{
//!     BlockPosition, BlockState, CuboidRegion, EditConfig, EditSession, MemoryExtent,
//!     SingleBlockPattern,
//! };
//!
//! let extent = MemoryExtent::cube(16);
//! let mut session = EditSession::new(Box::new(extent), &EditConfig::default());
//! let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(2, 2, 2));
//! let stone = SingleBlockPattern::new(BlockState::new("minecraft:stone"));
//!
//! let affected = session.set_blocks(&region, &stone).unwrap();
//! assert_eq!(affected, 27);
//! ```

pub mod biome;
pub mod block_position;
pub mod block_state;
pub mod bounding_box;
pub mod clipboard;
pub mod config;
pub mod entity;
pub mod error;
pub mod expr;
pub mod extent;
pub mod heightmap;
pub mod history;
pub mod mask;
pub mod nbt;
pub mod operation;
pub mod pattern;
pub mod region;
pub mod selector;
pub mod session;

pub use biome::BiomeId;
pub use block_position::{BlockColumn, BlockPosition};
pub use block_state::{BaseBlock, BlockState};
pub use bounding_box::BoundingBox;
pub use clipboard::Clipboard;
pub use config::EditConfig;
pub use entity::Entity;
pub use error::EditError;
pub use expr::{ExprError, Expression};
pub use extent::{Extent, MemoryExtent};
pub use heightmap::{GaussianKernel, HeightMap};
pub use history::{ChangeJournal, SessionHistory};
pub use mask::{
    BlockTypeMask, ExistingBlockMask, Mask, MaskIntersection, MaskUnion, Negate, OffsetsMask,
    RegionMask,
};
pub use nbt::NbtValue;
pub use operation::{
    complete, CancelToken, Executor, FillOperation, Operation, OperationHandle, OperationQueue,
    OperationRegistry, OperationState, Progress, RunContext,
};
pub use pattern::{ClipboardPattern, NoisePattern, Pattern, RandomPattern, SingleBlockPattern};
pub use region::{
    ConvexPolyhedronRegion, CuboidRegion, CylinderRegion, EllipsoidRegion, FlatRegion,
    PointSetRegion, Polygonal2DRegion, Region,
};
pub use selector::{ConvexSelector, CuboidSelector, Polygonal2DSelector};
pub use session::EditSession;
