use voxedit::{
    BaseBlock, BiomeId, BlockColumn, BlockPosition, BlockState, CancelToken, CuboidRegion,
    EditConfig, EditError, EditSession, ExistingBlockMask, Extent, GaussianKernel, MemoryExtent,
    Negate, SingleBlockPattern,
};

fn stone() -> BlockState {
    BlockState::new("minecraft:stone")
}

fn dirt() -> BlockState {
    BlockState::new("minecraft:dirt")
}

fn session(size: i32) -> EditSession {
    EditSession::new(Box::new(MemoryExtent::cube(size)), &EditConfig::default())
}

#[test]
fn test_fill_cuboid_counts_changes() {
    let mut session = session(8);
    let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(2, 2, 2));
    let pattern = SingleBlockPattern::new(stone());

    let affected = session.set_blocks(&region, &pattern).unwrap();
    assert_eq!(affected, 27);

    // A second identical pass changes nothing.
    let affected = session.set_blocks(&region, &pattern).unwrap();
    assert_eq!(affected, 0);
}

#[test]
fn test_replace_is_idempotent() {
    let mut session = session(8);
    let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(3, 0, 3));

    session
        .set_blocks(&region, &SingleBlockPattern::new(stone()))
        .unwrap();

    let pattern = SingleBlockPattern::new(dirt());
    let first = session.replace_blocks(&region, None, true, &pattern).unwrap();
    assert_eq!(first, 16);
    let second = session.replace_blocks(&region, None, true, &pattern).unwrap();
    assert_eq!(second, 0);
}

#[test]
fn test_replace_from_set_wildcard() {
    let mut session = session(8);
    let log_x = BlockState::new("minecraft:oak_log").with_property("axis", "x");
    let log_y = BlockState::new("minecraft:oak_log").with_property("axis", "y");
    session
        .set_block(BlockPosition::new(0, 0, 0), &BaseBlock::new(log_x))
        .unwrap();
    session
        .set_block(BlockPosition::new(1, 0, 0), &BaseBlock::new(log_y.clone()))
        .unwrap();

    let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(1, 0, 0));
    let from = vec![BlockState::new("minecraft:oak_log")];

    // Exact property matching misses both placed logs.
    let exact = session
        .replace_blocks(&region, Some(&from), true, &SingleBlockPattern::new(stone()))
        .unwrap();
    assert_eq!(exact, 0);

    // Wildcard matching ignores the axis property.
    let fuzzy = session
        .replace_blocks(&region, Some(&from), false, &SingleBlockPattern::new(stone()))
        .unwrap();
    assert_eq!(fuzzy, 2);
}

#[test]
fn test_global_mask_limits_edit_to_existing_blocks() {
    let mut extent = MemoryExtent::cube(8);
    // 5 stone cells, the other 10 in the region stay air.
    for x in 0..5 {
        extent.set_block(BlockPosition::new(x, 0, 0), BaseBlock::new(stone()));
    }

    let mut session = EditSession::new(Box::new(extent), &EditConfig::default())
        .with_mask(Box::new(ExistingBlockMask));
    let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(14, 0, 0));

    let affected = session
        .set_blocks(&region, &SingleBlockPattern::new(dirt()))
        .unwrap();
    assert_eq!(affected, 5);

    // An all-air region under the same mask changes nothing.
    let empty = CuboidRegion::new(BlockPosition::new(0, 3, 0), BlockPosition::new(14, 3, 0));
    let affected = session
        .set_blocks(&empty, &SingleBlockPattern::new(dirt()))
        .unwrap();
    assert_eq!(affected, 0);
}

#[test]
fn test_negated_mask() {
    let mut extent = MemoryExtent::cube(4);
    extent.set_block(BlockPosition::new(0, 0, 0), BaseBlock::new(stone()));

    let mut session = EditSession::new(Box::new(extent), &EditConfig::default())
        .with_mask(Box::new(Negate::new(Box::new(ExistingBlockMask))));
    let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(3, 0, 0));

    // Only the three air cells receive the pattern.
    let affected = session
        .set_blocks(&region, &SingleBlockPattern::new(dirt()))
        .unwrap();
    assert_eq!(affected, 3);
    assert_eq!(
        session.get_block(BlockPosition::new(0, 0, 0)).state,
        stone()
    );
}

#[test]
fn test_change_limit_stops_partially() {
    let mut session = session(8).with_change_limit(Some(10));
    let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(7, 0, 7));

    let err = session
        .set_blocks(&region, &SingleBlockPattern::new(stone()))
        .unwrap_err();
    match err {
        EditError::LimitExceeded { limit, affected } => {
            assert_eq!(limit, 10);
            assert_eq!(affected, 10);
        }
        other => panic!("expected LimitExceeded, got {other:?}"),
    }
    // The partial edit stands and is journalled.
    assert_eq!(session.affected(), 10);
    assert_eq!(session.change_count(), 10);
}

#[test]
fn test_line_thickness_zero_visits_exact_cells() {
    let mut session = session(8);
    let affected = session
        .draw_line(
            &SingleBlockPattern::new(stone()),
            &[BlockPosition::new(0, 0, 0), BlockPosition::new(3, 0, 0)],
            0.0,
            true,
        )
        .unwrap();
    assert_eq!(affected, 4);
    for x in 0..=3 {
        assert_eq!(session.get_block(BlockPosition::new(x, 0, 0)).state, stone());
    }
    assert!(session.get_block(BlockPosition::new(4, 0, 0)).is_air());
    assert!(session.get_block(BlockPosition::new(0, 1, 0)).is_air());
}

#[test]
fn test_diagonal_line_has_no_gaps() {
    let mut session = session(16);
    session
        .draw_line(
            &SingleBlockPattern::new(stone()),
            &[BlockPosition::new(0, 0, 0), BlockPosition::new(7, 3, 5)],
            0.0,
            true,
        )
        .unwrap();

    // Every consecutive pair of rasterized cells must touch (Chebyshev
    // distance 1).
    let mut cells: Vec<BlockPosition> = Vec::new();
    for x in 0..8 {
        for y in 0..4 {
            for z in 0..6 {
                let p = BlockPosition::new(x, y, z);
                if !session.get_block(p).is_air() {
                    cells.push(p);
                }
            }
        }
    }
    cells.sort_by_key(|p| p.x);
    for pair in cells.windows(2) {
        let d = pair[1] - pair[0];
        assert!(d.x.abs() <= 1 && d.y.abs() <= 1 && d.z.abs() <= 1, "gap at {:?}", pair);
    }
}

#[test]
fn test_move_region_overlapping_preserves_data() {
    let mut session = session(16);
    // Distinct block per cell so shifts are detectable.
    for x in 0..=5 {
        let block = BaseBlock::new(BlockState::new(format!("minecraft:cell_{x}")));
        session
            .set_block(BlockPosition::new(x, 0, 0), &block)
            .unwrap();
    }

    let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(5, 0, 0));
    session
        .move_region(&region, BlockPosition::new(1, 0, 0), 1, true, None)
        .unwrap();

    // Every source value survived the overlapping shift.
    for x in 0..=5 {
        assert_eq!(
            session.get_block(BlockPosition::new(x + 1, 0, 0)).state.name,
            format!("minecraft:cell_{x}").as_str()
        );
    }
    // The vacated cell is air.
    assert!(session.get_block(BlockPosition::new(0, 0, 0)).is_air());
}

#[test]
fn test_move_fills_vacated_cells_with_replacement() {
    let mut session = session(16);
    let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(1, 0, 0));
    session
        .set_blocks(&region, &SingleBlockPattern::new(stone()))
        .unwrap();

    session
        .move_region(
            &region,
            BlockPosition::new(0, 0, 4),
            1,
            false,
            Some(&SingleBlockPattern::new(dirt())),
        )
        .unwrap();

    assert_eq!(session.get_block(BlockPosition::new(0, 0, 0)).state, dirt());
    assert_eq!(session.get_block(BlockPosition::new(0, 0, 4)).state, stone());
}

#[test]
fn test_stack_region_repeats_contents() {
    let mut session = session(16);
    let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(1, 0, 0));
    session
        .set_blocks(&region, &SingleBlockPattern::new(stone()))
        .unwrap();

    let affected = session
        .stack_region(&region, BlockPosition::new(1, 0, 0), 3, false)
        .unwrap();
    assert_eq!(affected, 6);
    for x in 0..8 {
        assert_eq!(session.get_block(BlockPosition::new(x, 0, 0)).state, stone());
    }
}

#[test]
fn test_stack_intersecting_offset_is_geometry_error() {
    let mut session = session(8);
    let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(3, 3, 3));
    let err = session
        .stack_region_block_units(&region, BlockPosition::new(2, 0, 0), 2, true)
        .unwrap_err();
    assert!(matches!(err, EditError::Geometry(_)));
    // Nothing was written.
    assert_eq!(session.affected(), 0);
}

#[test]
fn test_walls_and_faces() {
    let mut session = session(8);
    let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(4, 4, 4));

    let affected = session
        .make_cuboid_walls(&region, &SingleBlockPattern::new(stone()))
        .unwrap();
    assert_eq!(affected, 16 * 5);
    // The interior stays untouched.
    assert!(session.get_block(BlockPosition::new(2, 2, 2)).is_air());

    let affected = session
        .make_cuboid_faces(&region, &SingleBlockPattern::new(stone()))
        .unwrap();
    // Walls are already stone; only floor and ceiling interiors change.
    assert_eq!(affected, 9 * 2);
}

#[test]
fn test_smooth_levels_a_spike() {
    let mut session = session(16);
    // Flat floor at y=0 with a single tall column.
    let floor = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(15, 0, 15));
    session
        .set_blocks(&floor, &SingleBlockPattern::new(stone()))
        .unwrap();
    for y in 1..=6 {
        session
            .set_block(BlockPosition::new(8, y, 8), &BaseBlock::new(stone()))
            .unwrap();
    }

    let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(15, 8, 15));
    session
        .smooth(&region, &GaussianKernel::new(5, 1.0), 1)
        .unwrap();

    let spike_top = session.highest_terrain_block(8, 8, 0, 8);
    assert!(spike_top < 6, "spike should be lowered, still at {spike_top}");
}

#[test]
fn test_cancelled_session_reports_partial_count() {
    let token = CancelToken::new();
    token.cancel();
    let mut session = session(8).with_cancel_token(token);
    let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(7, 7, 7));

    let err = session
        .set_blocks(&region, &SingleBlockPattern::new(stone()))
        .unwrap_err();
    assert!(matches!(err, EditError::Cancelled { affected: 0 }));
    assert_eq!(session.affected(), 0);
}

#[test]
fn test_set_biomes_journalled() {
    let mut session = session(8);
    let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(3, 0, 3));
    let plains = BiomeId::new("minecraft:plains");
    let jungle = BiomeId::new("minecraft:jungle");

    assert_eq!(session.set_biomes(&region, &plains).unwrap(), 16);
    // Re-painting the same biome changes nothing.
    assert_eq!(session.set_biomes(&region, &plains).unwrap(), 0);
    assert_eq!(session.set_biomes(&region, &jungle).unwrap(), 16);

    let (mut extent, journal) = session.finish();
    assert_eq!(extent.get_biome(BlockColumn::new(1, 1)), Some(jungle));

    // Undo walks the biome deltas back to the first paint.
    journal.undo(extent.as_mut());
    assert_eq!(extent.get_biome(BlockColumn::new(1, 1)), Some(plains));
}

#[test]
fn test_count_blocks() {
    let mut session = session(8);
    let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(3, 0, 3));
    session
        .set_blocks(
            &CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(1, 0, 1)),
            &SingleBlockPattern::new(stone()),
        )
        .unwrap();
    assert_eq!(session.count_blocks(&region, &ExistingBlockMask), 4);
}
