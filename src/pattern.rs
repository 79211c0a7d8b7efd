use crate::block_position::BlockPosition;
use crate::block_state::BaseBlock;
use crate::clipboard::Clipboard;
use noise::{NoiseFn, Perlin};
use rand::Rng;
use std::sync::Arc;

/// A per-coordinate function producing the block to place. Stateless per
/// query; a pattern may be consulted for the same coordinate any number of
/// times.
pub trait Pattern: Send {
    fn apply(&self, position: BlockPosition) -> BaseBlock;

    /// The fixed block for patterns that always return the same value.
    /// Callers special-case this to skip per-coordinate indirection.
    fn as_single(&self) -> Option<&BaseBlock> {
        None
    }
}

/// The common case: one fixed block everywhere.
pub struct SingleBlockPattern {
    block: BaseBlock,
}

impl SingleBlockPattern {
    pub fn new(block: impl Into<BaseBlock>) -> Self {
        SingleBlockPattern {
            block: block.into(),
        }
    }
}

impl Pattern for SingleBlockPattern {
    fn apply(&self, _position: BlockPosition) -> BaseBlock {
        self.block.clone()
    }

    fn as_single(&self) -> Option<&BaseBlock> {
        Some(&self.block)
    }
}

/// Picks among sub-patterns with the given relative weights, independently
/// per coordinate.
pub struct RandomPattern {
    choices: Vec<(f64, Box<dyn Pattern>)>,
    total_weight: f64,
}

impl RandomPattern {
    pub fn new() -> Self {
        RandomPattern {
            choices: Vec::new(),
            total_weight: 0.0,
        }
    }

    pub fn add(mut self, weight: f64, pattern: Box<dyn Pattern>) -> Self {
        let weight = weight.max(0.0);
        self.total_weight += weight;
        self.choices.push((weight, pattern));
        self
    }
}

impl Default for RandomPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl Pattern for RandomPattern {
    fn apply(&self, position: BlockPosition) -> BaseBlock {
        if self.choices.is_empty() || self.total_weight <= 0.0 {
            return BaseBlock::air();
        }
        let mut roll = rand::thread_rng().gen_range(0.0..self.total_weight);
        for (weight, pattern) in &self.choices {
            if roll < *weight {
                return pattern.apply(position);
            }
            roll -= weight;
        }
        // Floating point may leave a sliver at the top of the range.
        self.choices[self.choices.len() - 1].1.apply(position)
    }
}

/// Chooses between two patterns by thresholding smooth 3D noise, giving
/// coherent patches instead of per-cell speckle.
pub struct NoisePattern {
    noise: Perlin,
    scale: f64,
    threshold: f64,
    above: Box<dyn Pattern>,
    below: Box<dyn Pattern>,
}

impl NoisePattern {
    pub fn new(
        seed: u32,
        scale: f64,
        threshold: f64,
        above: Box<dyn Pattern>,
        below: Box<dyn Pattern>,
    ) -> Self {
        NoisePattern {
            noise: Perlin::new(seed),
            scale: if scale > 0.0 { scale } else { 1.0 },
            threshold,
            above,
            below,
        }
    }
}

impl Pattern for NoisePattern {
    fn apply(&self, position: BlockPosition) -> BaseBlock {
        let value = self.noise.get([
            position.x as f64 / self.scale,
            position.y as f64 / self.scale,
            position.z as f64 / self.scale,
        ]);
        if value >= self.threshold {
            self.above.apply(position)
        } else {
            self.below.apply(position)
        }
    }
}

/// Repeats a clipboard's contents across space, tiling from its minimum
/// corner.
pub struct ClipboardPattern {
    clipboard: Arc<Clipboard>,
}

impl ClipboardPattern {
    pub fn new(clipboard: Arc<Clipboard>) -> Self {
        ClipboardPattern { clipboard }
    }
}

impl Pattern for ClipboardPattern {
    fn apply(&self, position: BlockPosition) -> BaseBlock {
        let (w, h, l) = self.clipboard.dimensions();
        let min = self.clipboard.bounds().min;
        let cell = BlockPosition::new(
            min.x + (position.x - min.x).rem_euclid(w),
            min.y + (position.y - min.y).rem_euclid(h),
            min.z + (position.z - min.z).rem_euclid(l),
        );
        self.clipboard.block_at(cell)
    }
}
