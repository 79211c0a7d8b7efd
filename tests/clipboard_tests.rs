use std::sync::Arc;
use voxedit::{
    BaseBlock, BlockPosition, BlockState, Clipboard, ClipboardPattern, CuboidRegion, EditConfig,
    EditSession, Entity, Extent, MemoryExtent, NbtValue, Pattern, Region, SingleBlockPattern,
};

fn checkered_extent() -> MemoryExtent {
    let mut extent = MemoryExtent::cube(16);
    for x in 0..4 {
        for z in 0..4 {
            if (x + z) % 2 == 0 {
                extent.set_block(
                    BlockPosition::new(x, 0, z),
                    BaseBlock::new(BlockState::new("minecraft:stone")),
                );
            }
        }
    }
    extent
}

#[test]
fn test_copy_paste_preserves_spatial_relationship() {
    let extent = checkered_extent();
    let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(3, 0, 3));
    let origin = BlockPosition::new(0, 0, 0);
    let clipboard = Clipboard::copy(&extent, &region, origin);

    let mut session = EditSession::new(Box::new(extent), &EditConfig::default());
    let affected = clipboard
        .paste(&mut session, BlockPosition::new(8, 0, 8), true)
        .unwrap();
    assert_eq!(affected, 8);

    for x in 0..4 {
        for z in 0..4 {
            let expected = (x + z) % 2 == 0;
            let pasted = session.get_block(BlockPosition::new(8 + x, 0, 8 + z));
            assert_eq!(!pasted.is_air(), expected, "mismatch at {x},{z}");
        }
    }
}

#[test]
fn test_paste_without_skip_air_overwrites() {
    let extent = checkered_extent();
    let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(3, 0, 3));
    let clipboard = Clipboard::copy(&extent, &region, BlockPosition::new(0, 0, 0));

    let mut session = EditSession::new(Box::new(extent), &EditConfig::default());
    // Fill the paste target first; air cells in the clipboard must clear it.
    let target = CuboidRegion::new(BlockPosition::new(8, 0, 8), BlockPosition::new(11, 0, 11));
    session
        .set_blocks(&target, &SingleBlockPattern::new(BlockState::new("minecraft:dirt")))
        .unwrap();

    clipboard
        .paste(&mut session, BlockPosition::new(8, 0, 8), false)
        .unwrap();
    assert!(session.get_block(BlockPosition::new(9, 0, 8)).is_air());
    assert_eq!(
        session.get_block(BlockPosition::new(8, 0, 8)).state.name,
        "minecraft:stone"
    );
}

#[test]
fn test_clipboard_carries_nbt_payloads() {
    let mut extent = MemoryExtent::cube(8);
    let mut text = NbtValue::compound();
    text.insert("Text1", NbtValue::String("landmark".into()));
    extent.set_block(
        BlockPosition::new(1, 0, 1),
        BaseBlock::with_data(BlockState::new("minecraft:oak_sign"), text.clone()),
    );

    let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(2, 0, 2));
    let clipboard = Clipboard::copy(&extent, &region, BlockPosition::new(0, 0, 0));

    let mut session = EditSession::new(Box::new(extent), &EditConfig::default());
    clipboard
        .paste(&mut session, BlockPosition::new(4, 0, 4), true)
        .unwrap();

    let pasted = session.get_block(BlockPosition::new(5, 0, 5));
    assert_eq!(pasted.data, Some(text));
}

#[test]
fn test_clipboard_carries_entities() {
    let mut extent = MemoryExtent::cube(8);
    extent.create_entity(Entity::new("minecraft:armor_stand", (1.5, 0.0, 1.5)));

    let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(3, 3, 3));
    let clipboard = Clipboard::copy(&extent, &region, BlockPosition::new(0, 0, 0));
    assert_eq!(clipboard.entities().len(), 1);

    let mut session = EditSession::new(Box::new(extent), &EditConfig::default());
    clipboard
        .paste(&mut session, BlockPosition::new(4, 0, 4), true)
        .unwrap();

    let (extent, journal) = session.finish();
    let moved = extent.entities_in(extent.bounds());
    assert_eq!(moved.len(), 2);
    assert!(moved.iter().any(|e| e.position.0 == 5.5));

    // Undo removes the pasted entity again.
    let mut extent = extent;
    journal.undo(extent.as_mut());
    assert_eq!(extent.entities_in(extent.bounds()).len(), 1);
}

#[test]
fn test_serialize_round_trip() {
    let extent = checkered_extent();
    let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(3, 0, 3));
    let clipboard = Clipboard::copy(&extent, &region, BlockPosition::new(2, 0, 2));

    let bytes = clipboard.serialize().unwrap();
    assert_eq!(&bytes[0..4], b"VXCB");

    let mut restored = Clipboard::deserialize(&bytes).unwrap();
    assert_eq!(restored.origin(), clipboard.origin());
    assert_eq!(restored.dimensions(), clipboard.dimensions());
    for position in region.blocks() {
        assert_eq!(restored.block_at(position), clipboard.block_at(position));
    }

    // The paste anchor can be re-pointed after restore.
    restored.set_origin(BlockPosition::new(3, 0, 3));
    assert_eq!(restored.origin(), BlockPosition::new(3, 0, 3));
}

#[test]
fn test_deserialize_rejects_garbage() {
    assert!(Clipboard::deserialize(b"nope").is_err());
    assert!(Clipboard::deserialize(b"XXXX\x01\x00\x00\x00rest").is_err());
}

#[test]
fn test_clipboard_pattern_tiles() {
    let extent = checkered_extent();
    let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(1, 0, 1));
    let clipboard = Arc::new(Clipboard::copy(&extent, &region, BlockPosition::new(0, 0, 0)));
    let pattern = ClipboardPattern::new(clipboard);

    // The 2x1x2 checker tile repeats with period 2.
    for x in 0..8 {
        for z in 0..8 {
            let expected = (x + z) % 2 == 0;
            let block = pattern.apply(BlockPosition::new(x, 0, z));
            assert_eq!(!block.is_air(), expected, "tile mismatch at {x},{z}");
        }
    }
}
