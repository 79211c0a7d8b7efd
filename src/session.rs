use crate::biome::BiomeId;
use crate::block_position::BlockPosition;
use crate::block_state::{BaseBlock, BlockState};
use crate::config::EditConfig;
use crate::entity::Entity;
use crate::error::EditError;
use crate::expr::Expression;
use crate::extent::Extent;
use crate::heightmap::{GaussianKernel, HeightMap};
use crate::history::ChangeJournal;
use crate::mask::Mask;
use crate::operation::CancelToken;
use crate::pattern::Pattern;
use crate::region::{CuboidRegion, FlatRegion, Region};
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;
use tracing::debug;

/// The single choke point for region-affecting edits.
///
/// Every bulk method resolves coordinates from a region, filters them
/// through the session's global mask, computes the pattern's block and
/// writes it through the target extent, journalling each applied change.
/// Writes are strictly sequential per session; later writes to a cell
/// overwrite earlier ones within the same operation.
pub struct EditSession {
    extent: Box<dyn Extent + Send>,
    mask: Option<Box<dyn Mask>>,
    journal: ChangeJournal,
    affected: u64,
    limit: Option<u64>,
    fast_mode: bool,
    cancel: CancelToken,
    expression_node_cap: u64,
}

impl EditSession {
    pub fn new(extent: Box<dyn Extent + Send>, config: &EditConfig) -> Self {
        EditSession {
            extent,
            mask: None,
            journal: ChangeJournal::new(config.journal_budget),
            affected: 0,
            limit: config.change_limit,
            fast_mode: false,
            cancel: CancelToken::new(),
            expression_node_cap: config.expression_node_cap,
        }
    }

    pub fn with_mask(mut self, mask: Box<dyn Mask>) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn with_change_limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    /// Fast mode skips the post-write neighbour notification hint. It never
    /// affects what is stored or journalled.
    pub fn with_fast_mode(mut self, fast_mode: bool) -> Self {
        self.fast_mode = fast_mode;
        self
    }

    /// Attach a cancellation token checked cooperatively between cell
    /// steps. Cancelling from another thread stops the edit after the cell
    /// in flight; everything already applied stays journalled.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn extent(&self) -> &dyn Extent {
        self.extent.as_ref()
    }

    pub fn affected(&self) -> u64 {
        self.affected
    }

    pub fn change_count(&self) -> usize {
        self.journal.change_count()
    }

    pub fn journal(&self) -> &ChangeJournal {
        &self.journal
    }

    /// Tear down the session, handing the extent back together with the
    /// completed journal for the caller's history stack.
    pub fn finish(self) -> (Box<dyn Extent + Send>, ChangeJournal) {
        (self.extent, self.journal)
    }

    pub fn check_cancelled(&self) -> Result<(), EditError> {
        if self.cancel.is_cancelled() {
            Err(EditError::Cancelled {
                affected: self.affected,
            })
        } else {
            Ok(())
        }
    }

    pub fn get_block(&self, position: BlockPosition) -> BaseBlock {
        self.extent.get_block(position)
    }

    /// Write one block through the mask, limit and journal. Returns whether
    /// the stored value actually changed; equal values are not counted
    /// against the limit.
    pub fn set_block(
        &mut self,
        position: BlockPosition,
        block: &BaseBlock,
    ) -> Result<bool, EditError> {
        if let Some(mask) = &self.mask {
            if !mask.test(position, self.extent.as_ref()) {
                return Ok(false);
            }
        }
        let previous = self.extent.get_block(position);
        if previous == *block {
            return Ok(false);
        }
        if let Some(limit) = self.limit {
            if self.affected >= limit {
                return Err(EditError::LimitExceeded {
                    limit,
                    affected: self.affected,
                });
            }
        }
        if !self.extent.set_block(position, block.clone()) {
            return Ok(false);
        }
        if !self.fast_mode {
            self.extent.propagate_update(position);
        }
        // Record only after the write succeeded, never intent.
        self.journal.record(position, previous, block.clone());
        self.affected += 1;
        Ok(true)
    }

    /// Paint the biome across every column of a flat region's footprint.
    pub fn set_biomes(
        &mut self,
        region: &dyn FlatRegion,
        biome: &BiomeId,
    ) -> Result<u64, EditError> {
        let mut affected = 0;
        for column in region.columns() {
            self.check_cancelled()?;
            let previous = self.extent.get_biome(column);
            if previous.as_ref() == Some(biome) {
                continue;
            }
            if let Some(limit) = self.limit {
                if self.affected >= limit {
                    return Err(EditError::LimitExceeded {
                        limit,
                        affected: self.affected,
                    });
                }
            }
            if self.extent.set_biome(column, biome.clone()) {
                self.journal.record_biome(column, previous, biome.clone());
                self.affected += 1;
                affected += 1;
            }
        }
        Ok(affected)
    }

    pub fn create_entity(&mut self, entity: Entity) -> bool {
        if self.extent.create_entity(entity.clone()) {
            self.journal.record_entity_created(entity);
            true
        } else {
            false
        }
    }

    /// Fill every cell of the region with the pattern's output.
    pub fn set_blocks(
        &mut self,
        region: &dyn Region,
        pattern: &dyn Pattern,
    ) -> Result<u64, EditError> {
        let mut affected = 0;
        // Fixed patterns skip the per-coordinate indirection.
        if let Some(single) = pattern.as_single() {
            let block = single.clone();
            for position in region.blocks() {
                self.check_cancelled()?;
                if self.set_block(position, &block)? {
                    affected += 1;
                }
            }
        } else {
            for position in region.blocks() {
                self.check_cancelled()?;
                let block = pattern.apply(position);
                if self.set_block(position, &block)? {
                    affected += 1;
                }
            }
        }
        debug!(affected, "set_blocks complete");
        Ok(affected)
    }

    /// Replace cells whose current block passes the from-set test. `None`
    /// replaces every non-air cell; with `match_properties` off the from-set
    /// matches on block type alone.
    pub fn replace_blocks(
        &mut self,
        region: &dyn Region,
        filter: Option<&[BlockState]>,
        match_properties: bool,
        pattern: &dyn Pattern,
    ) -> Result<u64, EditError> {
        let mut affected = 0;
        for position in region.blocks() {
            self.check_cancelled()?;
            let existing = self.extent.get_block(position);
            let from_matches = match filter {
                None => !existing.is_air(),
                Some(states) => states.iter().any(|s| {
                    if match_properties {
                        *s == existing.state
                    } else {
                        s.same_type(&existing.state)
                    }
                }),
            };
            if !from_matches {
                continue;
            }
            let block = pattern.apply(position);
            if self.set_block(position, &block)? {
                affected += 1;
            }
        }
        debug!(affected, "replace_blocks complete");
        Ok(affected)
    }

    /// Count region cells matching a mask, without mutating anything.
    pub fn count_blocks(&self, region: &dyn Region, mask: &dyn Mask) -> u64 {
        region
            .blocks()
            .filter(|p| mask.test(*p, self.extent.as_ref()))
            .count() as u64
    }

    /// The four vertical side slabs of a cuboid.
    pub fn make_cuboid_walls(
        &mut self,
        region: &CuboidRegion,
        pattern: &dyn Pattern,
    ) -> Result<u64, EditError> {
        let mut affected = 0;
        for wall in region.walls() {
            affected += self.set_blocks(&wall, pattern)?;
        }
        Ok(affected)
    }

    /// All six face slabs of a cuboid.
    pub fn make_cuboid_faces(
        &mut self,
        region: &CuboidRegion,
        pattern: &dyn Pattern,
    ) -> Result<u64, EditError> {
        let mut affected = 0;
        for face in region.faces() {
            affected += self.set_blocks(&face, pattern)?;
        }
        Ok(affected)
    }

    /// Repeat the region's contents `count` times along `direction`, where
    /// the direction is in units of the region's own size.
    pub fn stack_region(
        &mut self,
        region: &dyn Region,
        direction: BlockPosition,
        count: u32,
        copy_air: bool,
    ) -> Result<u64, EditError> {
        let bbox = region.bounding_box();
        let (w, h, l) = bbox.dimensions();
        let offset = BlockPosition::new(direction.x * w, direction.y * h, direction.z * l);
        self.stack_region_block_units(region, offset, count, copy_air)
    }

    /// Repeat the region's contents with an explicit per-repetition block
    /// offset. The offset must clear the region in at least one axis,
    /// otherwise repetitions would overlap their own source.
    pub fn stack_region_block_units(
        &mut self,
        region: &dyn Region,
        offset: BlockPosition,
        count: u32,
        copy_air: bool,
    ) -> Result<u64, EditError> {
        if count == 0 {
            return Ok(0);
        }
        let bbox = region.bounding_box();
        let (w, h, l) = bbox.dimensions();
        let abs = offset.abs();
        if abs.x < w && abs.y < h && abs.z < l {
            return Err(EditError::geometry(
                "stack offset would intersect the source region",
            ));
        }

        // Read fully before the first write so later repetitions can't
        // observe earlier ones.
        let source: Vec<(BlockPosition, BaseBlock)> = region
            .blocks()
            .map(|p| (p, self.extent.get_block(p)))
            .filter(|(_, b)| copy_air || !b.is_air())
            .collect();

        let mut affected = 0;
        for i in 1..=count as i32 {
            let step = offset * i;
            for (position, block) in &source {
                self.check_cancelled()?;
                if self.set_block(*position + step, block)? {
                    affected += 1;
                }
            }
        }
        debug!(affected, count, "stack_region complete");
        Ok(affected)
    }

    /// Move the region's contents by `offset * multiplier`, filling vacated
    /// source cells with `replacement` (air when `None`). The source is
    /// fully buffered before any write, so overlapping moves never read
    /// their own output. Returns the number of destination cells changed.
    pub fn move_region(
        &mut self,
        region: &dyn Region,
        offset: BlockPosition,
        multiplier: i32,
        copy_air: bool,
        replacement: Option<&dyn Pattern>,
    ) -> Result<u64, EditError> {
        if multiplier < 1 {
            return Err(EditError::geometry("move multiplier must be at least 1"));
        }
        let total = offset * multiplier;
        if total == BlockPosition::ZERO {
            return Err(EditError::geometry("move offset must be non-zero"));
        }

        // Read phase: complete before any write.
        let source: Vec<(BlockPosition, BaseBlock)> = region
            .blocks()
            .map(|p| (p, self.extent.get_block(p)))
            .filter(|(_, b)| copy_air || !b.is_air())
            .collect();

        // Vacate the source, then lay the buffer down at the destination;
        // destination writes win in the overlap zone.
        for (position, _) in &source {
            self.check_cancelled()?;
            let fill = match replacement {
                Some(pattern) => pattern.apply(*position),
                None => BaseBlock::air(),
            };
            self.set_block(*position, &fill)?;
        }

        let mut affected = 0;
        for (position, block) in &source {
            self.check_cancelled()?;
            if self.set_block(*position + total, block)? {
                affected += 1;
            }
        }
        debug!(affected, "move_region complete");
        Ok(affected)
    }

    /// Rasterize a polyline through the given points. Thickness dilates
    /// every rasterized cell into a sphere of that radius; `filled == false`
    /// keeps only the shell of the result.
    pub fn draw_line(
        &mut self,
        pattern: &dyn Pattern,
        points: &[BlockPosition],
        radius: f64,
        filled: bool,
    ) -> Result<u64, EditError> {
        let mut cells = BTreeSet::new();
        for pair in points.windows(2) {
            rasterize_segment(pair[0], pair[1], &mut cells);
        }
        if points.len() == 1 {
            cells.insert(points[0]);
        }
        let cells = balloon(cells, radius);
        let cells = if filled { cells } else { hollow(cells) };
        self.set_cells(&cells, pattern)
    }

    /// Draw a Catmull-Rom spline through the control points, then dilate
    /// like a line. Higher `quality` samples the curve more densely.
    pub fn draw_spline(
        &mut self,
        pattern: &dyn Pattern,
        nodes: &[BlockPosition],
        quality: f64,
        radius: f64,
        filled: bool,
    ) -> Result<u64, EditError> {
        if nodes.len() < 2 {
            return self.draw_line(pattern, nodes, radius, filled);
        }
        let quality = quality.max(1.0);

        // Sample at block centers, like the points the player targeted.
        let centers: Vec<(f64, f64, f64)> = nodes
            .iter()
            .map(|p| (p.x as f64 + 0.5, p.y as f64 + 0.5, p.z as f64 + 0.5))
            .collect();

        let mut cells = BTreeSet::new();
        for i in 0..centers.len() - 1 {
            let p0 = centers[i.saturating_sub(1)];
            let p1 = centers[i];
            let p2 = centers[i + 1];
            let p3 = centers[(i + 2).min(centers.len() - 1)];

            let segment_length = distance(p1, p2).max(1.0);
            let steps = (segment_length * quality).ceil() as usize;
            for step in 0..=steps {
                let t = step as f64 / steps as f64;
                let (x, y, z) = catmull_rom(p0, p1, p2, p3, t);
                cells.insert(BlockPosition::from_floored(x, y, z));
            }
        }

        let cells = balloon(cells, radius);
        let cells = if filled { cells } else { hollow(cells) };
        self.set_cells(&cells, pattern)
    }

    /// Smooth the region's terrain height map with a Gaussian kernel.
    pub fn smooth(
        &mut self,
        region: &dyn Region,
        kernel: &GaussianKernel,
        iterations: usize,
    ) -> Result<u64, EditError> {
        let height_map = HeightMap::from_session(self, region);
        let affected = height_map.apply_filter(self, kernel, iterations)?;
        debug!(affected, iterations, "smooth complete");
        Ok(affected)
    }

    /// The topmost non-air Y in a column, or `min_y` when the column is
    /// empty.
    pub fn highest_terrain_block(&self, x: i32, z: i32, min_y: i32, max_y: i32) -> i32 {
        for y in (min_y..=max_y).rev() {
            if !self.extent.get_block(BlockPosition::new(x, y, z)).is_air() {
                return y;
            }
        }
        min_y
    }

    /// Generate a procedural shape: cells where the expression over the
    /// normalized coordinates evaluates positive receive the pattern's
    /// block. The whole region is evaluated before the first write, so an
    /// expression failure aborts with nothing committed.
    pub fn make_shape(
        &mut self,
        region: &dyn Region,
        zero: (f64, f64, f64),
        unit: (f64, f64, f64),
        pattern: &dyn Pattern,
        expression: &str,
        hollow_shell: bool,
    ) -> Result<u64, EditError> {
        check_unit(unit)?;
        let compiled = Expression::compile(expression, &["x", "y", "z"])?;

        let mut inside: FxHashSet<BlockPosition> = FxHashSet::default();
        let mut ordered = Vec::new();
        for position in region.blocks() {
            self.check_cancelled()?;
            let scaled = normalize(position, zero, unit);
            let value = compiled.evaluate(
                &[scaled.0, scaled.1, scaled.2],
                self.expression_node_cap,
            )?;
            if value > 0.0 {
                inside.insert(position);
                ordered.push(position);
            }
        }

        let mut affected = 0;
        for position in ordered {
            self.check_cancelled()?;
            if hollow_shell && face_neighbors(position).iter().all(|n| inside.contains(n)) {
                continue;
            }
            let block = pattern.apply(position);
            if self.set_block(position, &block)? {
                affected += 1;
            }
        }
        debug!(affected, "make_shape complete");
        Ok(affected)
    }

    /// Deform the region: the expression rewrites x/y/z to a source
    /// coordinate and each cell takes whatever block currently sits there.
    /// Reads complete fully before the first write.
    pub fn deform(
        &mut self,
        region: &dyn Region,
        zero: (f64, f64, f64),
        unit: (f64, f64, f64),
        expression: &str,
    ) -> Result<u64, EditError> {
        check_unit(unit)?;
        let compiled = Expression::compile(expression, &["x", "y", "z"])?;
        let x_slot = compiled.slot("x").unwrap_or(0);
        let y_slot = compiled.slot("y").unwrap_or(1);
        let z_slot = compiled.slot("z").unwrap_or(2);

        let mut queue: Vec<(BlockPosition, BaseBlock)> = Vec::new();
        for position in region.blocks() {
            self.check_cancelled()?;
            let scaled = normalize(position, zero, unit);
            let (_, slots) = compiled.evaluate_full(
                &[scaled.0, scaled.1, scaled.2],
                self.expression_node_cap,
            )?;
            let source = BlockPosition::from_floored(
                slots[x_slot] * unit.0 + zero.0,
                slots[y_slot] * unit.1 + zero.1,
                slots[z_slot] * unit.2 + zero.2,
            );
            queue.push((position, self.extent.get_block(source)));
        }

        let mut affected = 0;
        for (position, block) in queue {
            self.check_cancelled()?;
            if self.set_block(position, &block)? {
                affected += 1;
            }
        }
        debug!(affected, "deform complete");
        Ok(affected)
    }

    fn set_cells(
        &mut self,
        cells: &BTreeSet<BlockPosition>,
        pattern: &dyn Pattern,
    ) -> Result<u64, EditError> {
        let mut affected = 0;
        for position in cells {
            self.check_cancelled()?;
            let block = pattern.apply(*position);
            if self.set_block(*position, &block)? {
                affected += 1;
            }
        }
        Ok(affected)
    }
}

fn check_unit(unit: (f64, f64, f64)) -> Result<(), EditError> {
    if unit.0 == 0.0 || unit.1 == 0.0 || unit.2 == 0.0 {
        return Err(EditError::geometry("coordinate unit must be non-zero"));
    }
    Ok(())
}

fn normalize(position: BlockPosition, zero: (f64, f64, f64), unit: (f64, f64, f64)) -> (f64, f64, f64) {
    (
        (position.x as f64 - zero.0) / unit.0,
        (position.y as f64 - zero.1) / unit.1,
        (position.z as f64 - zero.2) / unit.2,
    )
}

fn face_neighbors(position: BlockPosition) -> [BlockPosition; 6] {
    [
        BlockPosition::new(position.x + 1, position.y, position.z),
        BlockPosition::new(position.x - 1, position.y, position.z),
        BlockPosition::new(position.x, position.y + 1, position.z),
        BlockPosition::new(position.x, position.y - 1, position.z),
        BlockPosition::new(position.x, position.y, position.z + 1),
        BlockPosition::new(position.x, position.y, position.z - 1),
    ]
}

/// Dominant-axis stepping with rounded minor axes: no gaps, every integer
/// cell the segment crosses is visited.
fn rasterize_segment(from: BlockPosition, to: BlockPosition, out: &mut BTreeSet<BlockPosition>) {
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    let dz = (to.z - from.z).abs();

    if dx + dy + dz == 0 {
        out.insert(from);
        return;
    }

    let sx = if to.x > from.x { 1 } else { -1 };
    let sy = if to.y > from.y { 1 } else { -1 };
    let sz = if to.z > from.z { 1 } else { -1 };

    let d_max = dx.max(dy).max(dz);
    if d_max == dx {
        for step in 0..=dx {
            let tip_x = from.x + step * sx;
            let tip_y = (from.y as f64 + step as f64 * dy as f64 / dx as f64 * sy as f64).round();
            let tip_z = (from.z as f64 + step as f64 * dz as f64 / dx as f64 * sz as f64).round();
            out.insert(BlockPosition::new(tip_x, tip_y as i32, tip_z as i32));
        }
    } else if d_max == dy {
        for step in 0..=dy {
            let tip_y = from.y + step * sy;
            let tip_x = (from.x as f64 + step as f64 * dx as f64 / dy as f64 * sx as f64).round();
            let tip_z = (from.z as f64 + step as f64 * dz as f64 / dy as f64 * sz as f64).round();
            out.insert(BlockPosition::new(tip_x as i32, tip_y, tip_z as i32));
        }
    } else {
        for step in 0..=dz {
            let tip_z = from.z + step * sz;
            let tip_x = (from.x as f64 + step as f64 * dx as f64 / dz as f64 * sx as f64).round();
            let tip_y = (from.y as f64 + step as f64 * dy as f64 / dz as f64 * sy as f64).round();
            out.insert(BlockPosition::new(tip_x as i32, tip_y as i32, tip_z));
        }
    }
}

/// Dilate each cell into a sphere of the given radius.
fn balloon(cells: BTreeSet<BlockPosition>, radius: f64) -> BTreeSet<BlockPosition> {
    if radius <= 0.0 {
        return cells;
    }
    let ceil_radius = radius.ceil() as i32;
    let radius_sq = radius * radius;
    let mut out = BTreeSet::new();
    for cell in &cells {
        for dx in -ceil_radius..=ceil_radius {
            for dy in -ceil_radius..=ceil_radius {
                for dz in -ceil_radius..=ceil_radius {
                    if (dx * dx + dy * dy + dz * dz) as f64 <= radius_sq {
                        out.insert(BlockPosition::new(cell.x + dx, cell.y + dy, cell.z + dz));
                    }
                }
            }
        }
    }
    out
}

/// Keep only cells with at least one missing face neighbour.
fn hollow(cells: BTreeSet<BlockPosition>) -> BTreeSet<BlockPosition> {
    cells
        .iter()
        .filter(|cell| !face_neighbors(**cell).iter().all(|n| cells.contains(n)))
        .copied()
        .collect()
}

fn catmull_rom(
    p0: (f64, f64, f64),
    p1: (f64, f64, f64),
    p2: (f64, f64, f64),
    p3: (f64, f64, f64),
    t: f64,
) -> (f64, f64, f64) {
    let t2 = t * t;
    let t3 = t2 * t;
    let component = |a: f64, b: f64, c: f64, d: f64| {
        0.5 * ((2.0 * b)
            + (-a + c) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (-a + 3.0 * b - 3.0 * c + d) * t3)
    };
    (
        component(p0.0, p1.0, p2.0, p3.0),
        component(p0.1, p1.1, p2.1, p3.1),
        component(p0.2, p1.2, p2.2, p3.2),
    )
}

fn distance(a: (f64, f64, f64), b: (f64, f64, f64)) -> f64 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let dz = b.2 - a.2;
    (dx * dx + dy * dy + dz * dz).sqrt()
}
