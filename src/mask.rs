use crate::block_position::BlockPosition;
use crate::block_state::BlockState;
use crate::extent::Extent;
use crate::region::Region;

/// A per-coordinate predicate gating whether an edit applies. Masks are
/// called millions of times per edit, so implementations avoid per-call
/// allocation. Masks that inspect world contents read through the extent
/// handed in at test time, which is the state before the cell about to be
/// written is touched.
pub trait Mask: Send {
    fn test(&self, position: BlockPosition, extent: &dyn Extent) -> bool;
}

/// Matches cells whose existing block is one of the given states. With
/// `match_properties` off, only the block type is compared and property
/// state is ignored (wildcard matching).
pub struct BlockTypeMask {
    states: Vec<BlockState>,
    match_properties: bool,
}

impl BlockTypeMask {
    pub fn new(states: Vec<BlockState>) -> Self {
        BlockTypeMask {
            states,
            match_properties: true,
        }
    }

    pub fn fuzzy(states: Vec<BlockState>) -> Self {
        BlockTypeMask {
            states,
            match_properties: false,
        }
    }
}

impl Mask for BlockTypeMask {
    fn test(&self, position: BlockPosition, extent: &dyn Extent) -> bool {
        let existing = extent.get_block(position);
        self.states.iter().any(|s| {
            if self.match_properties {
                *s == existing.state
            } else {
                s.same_type(&existing.state)
            }
        })
    }
}

/// Matches cells that already hold something other than air.
pub struct ExistingBlockMask;

impl Mask for ExistingBlockMask {
    fn test(&self, position: BlockPosition, extent: &dyn Extent) -> bool {
        !extent.get_block(position).is_air()
    }
}

/// Restricts an operation to cells inside a region.
pub struct RegionMask {
    region: Box<dyn Region + Send>,
}

impl RegionMask {
    pub fn new(region: Box<dyn Region + Send>) -> Self {
        RegionMask { region }
    }
}

impl Mask for RegionMask {
    fn test(&self, position: BlockPosition, _extent: &dyn Extent) -> bool {
        self.region.contains(position)
    }
}

/// Logical AND; short-circuits on the first failing sub-mask.
pub struct MaskIntersection {
    masks: Vec<Box<dyn Mask>>,
}

impl MaskIntersection {
    pub fn new(masks: Vec<Box<dyn Mask>>) -> Self {
        MaskIntersection { masks }
    }
}

impl Mask for MaskIntersection {
    fn test(&self, position: BlockPosition, extent: &dyn Extent) -> bool {
        self.masks.iter().all(|m| m.test(position, extent))
    }
}

/// Logical OR; short-circuits on the first passing sub-mask.
pub struct MaskUnion {
    masks: Vec<Box<dyn Mask>>,
}

impl MaskUnion {
    pub fn new(masks: Vec<Box<dyn Mask>>) -> Self {
        MaskUnion { masks }
    }
}

impl Mask for MaskUnion {
    fn test(&self, position: BlockPosition, extent: &dyn Extent) -> bool {
        self.masks.iter().any(|m| m.test(position, extent))
    }
}

/// Logical NOT.
pub struct Negate {
    mask: Box<dyn Mask>,
}

impl Negate {
    pub fn new(mask: Box<dyn Mask>) -> Self {
        Negate { mask }
    }
}

impl Mask for Negate {
    fn test(&self, position: BlockPosition, extent: &dyn Extent) -> bool {
        !self.mask.test(position, extent)
    }
}

/// Matches when the wrapped mask matches at any of the given offsets from
/// the tested cell. An offset of (0,1,0) with an air mask selects cells
/// directly below open space.
pub struct OffsetsMask {
    mask: Box<dyn Mask>,
    offsets: Vec<BlockPosition>,
}

impl OffsetsMask {
    pub fn new(mask: Box<dyn Mask>, offsets: Vec<BlockPosition>) -> Self {
        OffsetsMask { mask, offsets }
    }

    /// The six face-adjacent offsets.
    pub fn adjacent(mask: Box<dyn Mask>) -> Self {
        OffsetsMask::new(
            mask,
            vec![
                BlockPosition::new(1, 0, 0),
                BlockPosition::new(-1, 0, 0),
                BlockPosition::new(0, 1, 0),
                BlockPosition::new(0, -1, 0),
                BlockPosition::new(0, 0, 1),
                BlockPosition::new(0, 0, -1),
            ],
        )
    }
}

impl Mask for OffsetsMask {
    fn test(&self, position: BlockPosition, extent: &dyn Extent) -> bool {
        self.offsets
            .iter()
            .any(|o| self.mask.test(position + *o, extent))
    }
}
