use crate::biome::BiomeId;
use crate::block_position::{BlockColumn, BlockPosition};
use crate::block_state::BaseBlock;
use crate::entity::Entity;
use crate::extent::Extent;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One recorded block mutation. Replaying `current` values in order
/// reproduces the edit; replaying `previous` values in reverse order
/// restores the pre-edit state exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockChange {
    pub position: BlockPosition,
    pub previous: BaseBlock,
    pub current: BaseBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeChange {
    pub column: BlockColumn,
    pub previous: Option<BiomeId>,
    pub current: BiomeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityChange {
    Created(Entity),
    Removed(Entity),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum ChangeRecord {
    Block(BlockChange),
    Biome(BiomeChange),
    Entity(EntityChange),
}

/// The ordered delta log of one edit session. Changes are appended in
/// application order, only after the underlying write succeeded, so the
/// journal never records intent.
///
/// Memory policy: the journal holds at most `budget` records. On overflow it
/// drops everything it has and becomes untracked: the session completes but
/// can no longer be undone. Truncating oldest records instead would produce
/// a silently wrong partial undo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeJournal {
    records: Vec<ChangeRecord>,
    budget: usize,
    overflowed: bool,
}

impl ChangeJournal {
    pub fn new(budget: usize) -> Self {
        ChangeJournal {
            records: Vec::new(),
            budget,
            overflowed: false,
        }
    }

    pub fn record(&mut self, position: BlockPosition, previous: BaseBlock, current: BaseBlock) {
        self.push(ChangeRecord::Block(BlockChange {
            position,
            previous,
            current,
        }));
    }

    pub fn record_biome(
        &mut self,
        column: BlockColumn,
        previous: Option<BiomeId>,
        current: BiomeId,
    ) {
        self.push(ChangeRecord::Biome(BiomeChange {
            column,
            previous,
            current,
        }));
    }

    pub fn record_entity_created(&mut self, entity: Entity) {
        self.push(ChangeRecord::Entity(EntityChange::Created(entity)));
    }

    pub fn record_entity_removed(&mut self, entity: Entity) {
        self.push(ChangeRecord::Entity(EntityChange::Removed(entity)));
    }

    fn push(&mut self, record: ChangeRecord) {
        if self.overflowed {
            return;
        }
        if self.records.len() >= self.budget {
            warn!(
                budget = self.budget,
                "change journal budget exceeded, session can no longer be undone"
            );
            self.records.clear();
            self.records.shrink_to_fit();
            self.overflowed = true;
            return;
        }
        self.records.push(record);
    }

    /// False once the budget was exceeded; such a journal cannot undo.
    pub fn is_tracked(&self) -> bool {
        !self.overflowed
    }

    pub fn change_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn block_changes(&self) -> impl Iterator<Item = &BlockChange> {
        self.records.iter().filter_map(|r| match r {
            ChangeRecord::Block(c) => Some(c),
            _ => None,
        })
    }

    /// Apply every recorded previous value in reverse chronological order.
    /// Reverse order is required: a cell overwritten twice must end at its
    /// oldest value. Returns the number of cells that changed.
    pub fn undo(&self, target: &mut dyn Extent) -> usize {
        let mut applied = 0;
        for record in self.records.iter().rev() {
            match record {
                ChangeRecord::Block(change) => {
                    if target.set_block(change.position, change.previous.clone()) {
                        applied += 1;
                    }
                }
                ChangeRecord::Biome(change) => {
                    if let Some(previous) = &change.previous {
                        if target.set_biome(change.column, previous.clone()) {
                            applied += 1;
                        }
                    }
                }
                ChangeRecord::Entity(EntityChange::Created(entity)) => {
                    if target.remove_entity(entity) {
                        applied += 1;
                    }
                }
                ChangeRecord::Entity(EntityChange::Removed(entity)) => {
                    if target.create_entity(entity.clone()) {
                        applied += 1;
                    }
                }
            }
        }
        applied
    }

    /// Re-apply every recorded new value in forward chronological order.
    pub fn redo(&self, target: &mut dyn Extent) -> usize {
        let mut applied = 0;
        for record in &self.records {
            match record {
                ChangeRecord::Block(change) => {
                    if target.set_block(change.position, change.current.clone()) {
                        applied += 1;
                    }
                }
                ChangeRecord::Biome(change) => {
                    if target.set_biome(change.column, change.current.clone()) {
                        applied += 1;
                    }
                }
                ChangeRecord::Entity(EntityChange::Created(entity)) => {
                    if target.create_entity(entity.clone()) {
                        applied += 1;
                    }
                }
                ChangeRecord::Entity(EntityChange::Removed(entity)) => {
                    if target.remove_entity(entity) {
                        applied += 1;
                    }
                }
            }
        }
        applied
    }
}

/// A per-player stack of completed edit journals backing multi-step
/// undo/redo. The cursor sits after the last applied edit; undone entries
/// stay until a new forward edit discards the redo branch.
#[derive(Debug, Default)]
pub struct SessionHistory {
    stack: Vec<ChangeJournal>,
    cursor: usize,
    max_size: usize,
}

impl SessionHistory {
    pub fn new(max_size: usize) -> Self {
        SessionHistory {
            stack: Vec::new(),
            cursor: 0,
            max_size: max_size.max(1),
        }
    }

    /// Store a completed journal. Empty journals are not worth remembering
    /// and untracked journals cannot be undone, so both are dropped.
    pub fn remember(&mut self, journal: ChangeJournal) {
        if journal.is_empty() || !journal.is_tracked() {
            return;
        }
        self.stack.truncate(self.cursor);
        self.stack.push(journal);
        while self.stack.len() > self.max_size {
            self.stack.remove(0);
        }
        self.cursor = self.stack.len();
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Undo the most recent not-yet-undone edit against `target`. Returns
    /// the number of cells restored, or None when there is nothing to undo.
    pub fn undo(&mut self, target: &mut dyn Extent) -> Option<usize> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.stack[self.cursor].undo(target))
    }

    /// Redo the most recently undone edit against `target`. Returns the
    /// number of cells re-applied, or None when there is nothing to redo.
    pub fn redo(&mut self, target: &mut dyn Extent) -> Option<usize> {
        if self.cursor >= self.stack.len() {
            return None;
        }
        let applied = self.stack[self.cursor].redo(target);
        self.cursor += 1;
        Some(applied)
    }

    pub fn clear(&mut self) {
        self.stack.clear();
        self.cursor = 0;
    }
}
