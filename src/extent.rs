use crate::biome::BiomeId;
use crate::block_position::{BlockColumn, BlockPosition};
use crate::block_state::{BaseBlock, BlockState};
use crate::bounding_box::BoundingBox;
use crate::entity::Entity;
use crate::nbt::NbtValue;
use rustc_hash::FxHashMap;

/// The get/set-block abstraction shared by live worlds and in-memory
/// buffers. Every bulk algorithm operates through this interface only.
pub trait Extent {
    fn get_block(&self, position: BlockPosition) -> BaseBlock;

    /// Store a block. Returns true iff the stored value actually changed;
    /// writes outside the extent's bounds are rejected as a no-op, not an
    /// error.
    fn set_block(&mut self, position: BlockPosition, block: BaseBlock) -> bool;

    fn get_biome(&self, column: BlockColumn) -> Option<BiomeId>;

    fn set_biome(&mut self, column: BlockColumn, biome: BiomeId) -> bool;

    /// The writable bounds of this extent (world height limits, or a
    /// buffer's allocation).
    fn bounds(&self) -> BoundingBox;

    /// Hint that a cell changed, for implementations that propagate
    /// lighting/physics to neighbours. Buffers ignore it; fast mode skips
    /// the call entirely.
    fn propagate_update(&mut self, _position: BlockPosition) {}

    /// Entities intersecting the given box. Buffers that do not track
    /// entities return nothing.
    fn entities_in(&self, _bounds: BoundingBox) -> Vec<Entity> {
        Vec::new()
    }

    fn create_entity(&mut self, _entity: Entity) -> bool {
        false
    }

    fn remove_entity(&mut self, _entity: &Entity) -> bool {
        false
    }
}

/// A fixed-size in-memory extent backed by a flat palette-indexed array,
/// used for clipboards, history buffers and tests. Auxiliary NBT payloads
/// live in a side map keyed by position so the palette stays small and
/// hashable.
pub struct MemoryExtent {
    bbox: BoundingBox,
    palette: Vec<BlockState>,
    palette_index: FxHashMap<BlockState, u32>,
    blocks: Vec<u32>,
    data: FxHashMap<BlockPosition, NbtValue>,
    biomes: FxHashMap<BlockColumn, BiomeId>,
    entities: Vec<Entity>,
    width: i32,
    length: i32,
    width_x_length: i32,
}

impl MemoryExtent {
    pub fn new(bbox: BoundingBox) -> Self {
        let (w, _, l) = bbox.dimensions();
        let volume = bbox.volume() as usize;

        let air = BlockState::air();
        let palette = vec![air.clone()];
        let mut palette_index = FxHashMap::default();
        palette_index.insert(air, 0);

        MemoryExtent {
            bbox,
            palette,
            palette_index,
            blocks: vec![0; volume],
            data: FxHashMap::default(),
            biomes: FxHashMap::default(),
            entities: Vec::new(),
            width: w,
            length: l,
            width_x_length: w * l,
        }
    }

    /// A cube spanning `(0,0,0)..=(size-1, size-1, size-1)`, handy in tests.
    pub fn cube(size: i32) -> Self {
        MemoryExtent::new(BoundingBox::new(
            BlockPosition::ZERO,
            BlockPosition::new(size - 1, size - 1, size - 1),
        ))
    }

    #[inline(always)]
    fn linear_index(&self, position: BlockPosition) -> usize {
        let dx = position.x - self.bbox.min.x;
        let dy = position.y - self.bbox.min.y;
        let dz = position.z - self.bbox.min.z;
        (dx + dz * self.width + dy * self.width_x_length) as usize
    }

    fn get_or_insert_in_palette(&mut self, state: &BlockState) -> u32 {
        match self.palette_index.get(state) {
            Some(&index) => index,
            None => {
                let index = self.palette.len() as u32;
                self.palette.push(state.clone());
                self.palette_index.insert(state.clone(), index);
                index
            }
        }
    }

}

impl Extent for MemoryExtent {
    fn get_block(&self, position: BlockPosition) -> BaseBlock {
        if !self.bbox.contains(position) {
            return BaseBlock::air();
        }
        let state = self.palette[self.blocks[self.linear_index(position)] as usize].clone();
        BaseBlock {
            state,
            data: self.data.get(&position).cloned(),
        }
    }

    fn set_block(&mut self, position: BlockPosition, block: BaseBlock) -> bool {
        if !self.bbox.contains(position) {
            return false;
        }
        let index = self.linear_index(position);
        let palette_index = self.get_or_insert_in_palette(&block.state);
        let state_changed = self.blocks[index] != palette_index;
        let data_changed = self.data.get(&position) != block.data.as_ref();
        if !state_changed && !data_changed {
            return false;
        }
        self.blocks[index] = palette_index;
        match block.data {
            Some(data) => {
                self.data.insert(position, data);
            }
            None => {
                self.data.remove(&position);
            }
        }
        true
    }

    fn get_biome(&self, column: BlockColumn) -> Option<BiomeId> {
        self.biomes.get(&column).cloned()
    }

    fn set_biome(&mut self, column: BlockColumn, biome: BiomeId) -> bool {
        if column.x < self.bbox.min.x
            || column.x > self.bbox.max.x
            || column.z < self.bbox.min.z
            || column.z > self.bbox.max.z
        {
            return false;
        }
        match self.biomes.insert(column, biome.clone()) {
            Some(previous) => previous != biome,
            None => true,
        }
    }

    fn bounds(&self) -> BoundingBox {
        self.bbox
    }

    fn entities_in(&self, bounds: BoundingBox) -> Vec<Entity> {
        self.entities
            .iter()
            .filter(|e| {
                bounds.contains(BlockPosition::from_floored(
                    e.position.0,
                    e.position.1,
                    e.position.2,
                ))
            })
            .cloned()
            .collect()
    }

    fn create_entity(&mut self, entity: Entity) -> bool {
        self.entities.push(entity);
        true
    }

    fn remove_entity(&mut self, entity: &Entity) -> bool {
        if let Some(index) = self.entities.iter().position(|e| e == entity) {
            self.entities.swap_remove(index);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_block_reports_change() {
        let mut extent = MemoryExtent::cube(4);
        let stone = BaseBlock::new(BlockState::new("minecraft:stone"));
        let pos = BlockPosition::new(1, 2, 3);

        assert!(extent.set_block(pos, stone.clone()));
        // Same value again is not a change.
        assert!(!extent.set_block(pos, stone.clone()));
        assert_eq!(extent.get_block(pos), stone);
    }

    #[test]
    fn test_out_of_bounds_is_noop() {
        let mut extent = MemoryExtent::cube(2);
        let stone = BaseBlock::new(BlockState::new("minecraft:stone"));
        assert!(!extent.set_block(BlockPosition::new(0, 5, 0), stone));
        assert!(extent.get_block(BlockPosition::new(0, 5, 0)).is_air());
    }

    #[test]
    fn test_data_payload_change_detection() {
        let mut extent = MemoryExtent::cube(2);
        let pos = BlockPosition::ZERO;
        let sign = BlockState::new("minecraft:oak_sign");

        let mut text = crate::nbt::NbtValue::compound();
        text.insert("Text1", crate::nbt::NbtValue::String("hello".into()));

        assert!(extent.set_block(pos, BaseBlock::with_data(sign.clone(), text.clone())));
        assert!(!extent.set_block(pos, BaseBlock::with_data(sign.clone(), text)));

        let mut other = crate::nbt::NbtValue::compound();
        other.insert("Text1", crate::nbt::NbtValue::String("bye".into()));
        assert!(extent.set_block(pos, BaseBlock::with_data(sign, other)));
    }
}
