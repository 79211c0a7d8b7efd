use crate::block_position::BlockPosition;
use crate::block_state::{BaseBlock, BlockState};
use crate::bounding_box::BoundingBox;
use crate::entity::Entity;
use crate::error::EditError;
use crate::extent::Extent;
use crate::nbt::NbtValue;
use crate::region::Region;
use crate::session::EditSession;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

const MAGIC: &[u8; 4] = b"VXCB";
const VERSION: u32 = 1;

/// An in-memory snapshot of a region's contents, relocatable on paste.
///
/// The snapshot covers the region's bounding cuboid; cells outside the
/// region itself are captured as air. The origin is the reference point the
/// copy was made from, so pasting at a new point reproduces the original
/// spatial relationship.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clipboard {
    bbox: BoundingBox,
    origin: BlockPosition,
    palette: Vec<BlockState>,
    blocks: Vec<u32>,
    data: Vec<(BlockPosition, NbtValue)>,
    entities: Vec<Entity>,
}

impl Clipboard {
    /// Snapshot `region`'s contents out of `extent`, remembering `origin`
    /// as the placement reference point.
    pub fn copy(extent: &dyn Extent, region: &dyn Region, origin: BlockPosition) -> Clipboard {
        let bbox = region.bounding_box();
        let volume = bbox.volume() as usize;

        let air = BlockState::air();
        let mut palette = vec![air.clone()];
        let mut palette_index: FxHashMap<BlockState, u32> = FxHashMap::default();
        palette_index.insert(air, 0);

        let mut blocks = vec![0u32; volume];
        let mut data = Vec::new();

        let (w, _, l) = bbox.dimensions();
        for position in region.blocks() {
            let block = extent.get_block(position);
            let index = match palette_index.get(&block.state) {
                Some(&i) => i,
                None => {
                    let i = palette.len() as u32;
                    palette.push(block.state.clone());
                    palette_index.insert(block.state.clone(), i);
                    i
                }
            };
            let dx = position.x - bbox.min.x;
            let dy = position.y - bbox.min.y;
            let dz = position.z - bbox.min.z;
            blocks[(dx + dz * w + dy * w * l) as usize] = index;
            if let Some(payload) = block.data {
                data.push((position, payload));
            }
        }

        Clipboard {
            bbox,
            origin,
            palette,
            blocks,
            data,
            entities: extent.entities_in(bbox),
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bbox
    }

    pub fn origin(&self) -> BlockPosition {
        self.origin
    }

    pub fn set_origin(&mut self, origin: BlockPosition) {
        self.origin = origin;
    }

    pub fn dimensions(&self) -> (i32, i32, i32) {
        self.bbox.dimensions()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// The captured block at an absolute (copy-time) coordinate; air for
    /// anything outside the snapshot.
    pub fn block_at(&self, position: BlockPosition) -> BaseBlock {
        if !self.bbox.contains(position) {
            return BaseBlock::air();
        }
        let (w, _, l) = self.bbox.dimensions();
        let dx = position.x - self.bbox.min.x;
        let dy = position.y - self.bbox.min.y;
        let dz = position.z - self.bbox.min.z;
        let state = self.palette[self.blocks[(dx + dz * w + dy * w * l) as usize] as usize].clone();
        let data = self
            .data
            .iter()
            .find(|(p, _)| *p == position)
            .map(|(_, d)| d.clone());
        BaseBlock { state, data }
    }

    /// Paste into `session` so that the clipboard's origin lands on `to`.
    /// With `skip_air` set, captured air cells leave the target untouched.
    /// Returns the number of cells changed.
    pub fn paste(
        &self,
        session: &mut EditSession,
        to: BlockPosition,
        skip_air: bool,
    ) -> Result<u64, EditError> {
        let offset = to - self.origin;
        let mut affected = 0u64;
        for position in crate::region::scan_box(self.bbox) {
            let block = self.block_at(position);
            if skip_air && block.is_air() {
                continue;
            }
            session.check_cancelled()?;
            if session.set_block(position + offset, &block)? {
                affected += 1;
            }
        }
        for entity in &self.entities {
            session.create_entity(entity.offset_by(offset.x, offset.y, offset.z));
        }
        Ok(affected)
    }

    /// Encode for storage or transport: magic, version, then a gzipped
    /// bincode payload. The byte layout beyond this framing is an internal
    /// detail of the crate version that wrote it.
    pub fn serialize(&self) -> Result<Vec<u8>, EditError> {
        let payload =
            bincode::serialize(self).map_err(|e| EditError::Codec(e.to_string()))?;
        let mut buf = Vec::with_capacity(16);
        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&VERSION.to_le_bytes());
        let mut encoder = GzEncoder::new(buf, Compression::default());
        encoder
            .write_all(&payload)
            .map_err(|e| EditError::Codec(e.to_string()))?;
        encoder.finish().map_err(|e| EditError::Codec(e.to_string()))
    }

    pub fn deserialize(data: &[u8]) -> Result<Clipboard, EditError> {
        if data.len() < 8 {
            return Err(EditError::Codec("clipboard data too short".to_string()));
        }
        if &data[0..4] != MAGIC {
            return Err(EditError::Codec("invalid clipboard magic bytes".to_string()));
        }
        let version = u32::from_le_bytes(
            data[4..8]
                .try_into()
                .map_err(|_| EditError::Codec("truncated version field".to_string()))?,
        );
        if version != VERSION {
            return Err(EditError::Codec(format!(
                "unsupported clipboard version: {}",
                version
            )));
        }
        let mut decoder = GzDecoder::new(&data[8..]);
        let mut payload = Vec::new();
        decoder
            .read_to_end(&mut payload)
            .map_err(|e| EditError::Codec(e.to_string()))?;
        bincode::deserialize(&payload).map_err(|e| EditError::Codec(e.to_string()))
    }
}
