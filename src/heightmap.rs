use crate::block_position::BlockPosition;
use crate::block_state::BaseBlock;
use crate::error::EditError;
use crate::region::Region;
use crate::session::EditSession;
use rayon::prelude::*;

/// A normalized 2D Gaussian convolution kernel.
#[derive(Debug, Clone)]
pub struct GaussianKernel {
    radius: usize,
    weights: Vec<f64>,
}

impl GaussianKernel {
    pub fn new(radius: usize, sigma: f64) -> Self {
        let size = radius * 2 + 1;
        let mut weights = vec![0.0; size * size];
        let sigma = if sigma > 0.0 { sigma } else { 1.0 };
        let mut total = 0.0;
        for dz in 0..size {
            for dx in 0..size {
                let x = dx as f64 - radius as f64;
                let z = dz as f64 - radius as f64;
                let weight = (-(x * x + z * z) / (2.0 * sigma * sigma)).exp();
                weights[dz * size + dx] = weight;
                total += weight;
            }
        }
        for weight in &mut weights {
            *weight /= total;
        }
        GaussianKernel { radius, weights }
    }

    /// Convolve a height grid once. Samples outside the grid clamp to the
    /// nearest edge so borders do not sag toward zero.
    pub fn filter(&self, data: &[i32], width: usize, length: usize) -> Vec<i32> {
        let radius = self.radius as i32;
        let size = self.radius * 2 + 1;
        let mut output = vec![0i32; data.len()];

        output
            .par_chunks_mut(width.max(1))
            .enumerate()
            .for_each(|(z, row)| {
                for (x, out) in row.iter_mut().enumerate() {
                    let mut sum = 0.0;
                    for dz in -radius..=radius {
                        for dx in -radius..=radius {
                            let sx = (x as i32 + dx).clamp(0, width as i32 - 1);
                            let sz = (z as i32 + dz).clamp(0, length as i32 - 1);
                            let weight = self.weights
                                [(dz + radius) as usize * size + (dx + radius) as usize];
                            sum += data[sz as usize * width + sx as usize] as f64 * weight;
                        }
                    }
                    *out = sum.round() as i32;
                }
            });
        output
    }
}

/// The terrain height map of a region's footprint: the topmost non-air Y
/// per column. Smoothing convolves it and rewrites each column to the new
/// height.
pub struct HeightMap {
    data: Vec<i32>,
    width: usize,
    length: usize,
    origin: BlockPosition,
    max_y: i32,
}

impl HeightMap {
    pub fn from_session(session: &EditSession, region: &dyn Region) -> HeightMap {
        let min = region.minimum_point();
        let max = region.maximum_point();
        let width = (max.x - min.x + 1) as usize;
        let length = (max.z - min.z + 1) as usize;

        let mut data = vec![0i32; width * length];
        for z in 0..length {
            for x in 0..width {
                data[z * width + x] = session.highest_terrain_block(
                    min.x + x as i32,
                    min.z + z as i32,
                    min.y,
                    max.y,
                );
            }
        }

        HeightMap {
            data,
            width,
            length,
            origin: min,
            max_y: max.y,
        }
    }

    /// Convolve `iterations` times and write the result back. Returns the
    /// number of cells changed.
    pub fn apply_filter(
        &self,
        session: &mut EditSession,
        kernel: &GaussianKernel,
        iterations: usize,
    ) -> Result<u64, EditError> {
        let mut smoothed = self.data.clone();
        for _ in 0..iterations {
            smoothed = kernel.filter(&smoothed, self.width, self.length);
        }
        self.apply(session, &smoothed)
    }

    /// Rewrite every column to match the target heights, keeping the
    /// topmost original block on top and rescaling the strata beneath it.
    pub fn apply(&self, session: &mut EditSession, heights: &[i32]) -> Result<u64, EditError> {
        let origin = self.origin;
        let mut affected = 0u64;

        for z in 0..self.length {
            for x in 0..self.width {
                session.check_cancelled()?;
                let index = z * self.width + x;
                let cur_height = self.data[index];
                // Clamp inside the selection so smoothing cannot grow
                // terrain past the region ceiling.
                let new_height = heights[index].min(self.max_y);

                let xr = origin.x + x as i32;
                let zr = origin.z + z as i32;

                // The topmost original layer keeps its identity, the rest
                // of the column is resampled proportionally.
                let scale = (cur_height - origin.y) as f64 / (new_height - origin.y).max(1) as f64;

                if new_height > cur_height {
                    let top = session.get_block(BlockPosition::new(xr, cur_height, zr));
                    if is_fluid(&top) {
                        continue;
                    }
                    if session.set_block(BlockPosition::new(xr, new_height, zr), &top)? {
                        affected += 1;
                    }
                    for y in (0..new_height - origin.y).rev() {
                        let copy_from = (y as f64 * scale) as i32;
                        let source =
                            session.get_block(BlockPosition::new(xr, origin.y + copy_from, zr));
                        if session.set_block(BlockPosition::new(xr, origin.y + y, zr), &source)? {
                            affected += 1;
                        }
                    }
                } else if cur_height > new_height {
                    for y in 0..new_height - origin.y {
                        let copy_from = (y as f64 * scale) as i32;
                        let source =
                            session.get_block(BlockPosition::new(xr, origin.y + copy_from, zr));
                        if session.set_block(BlockPosition::new(xr, origin.y + y, zr), &source)? {
                            affected += 1;
                        }
                    }
                    let top = session.get_block(BlockPosition::new(xr, cur_height, zr));
                    if session.set_block(BlockPosition::new(xr, new_height, zr), &top)? {
                        affected += 1;
                    }
                    // Clear everything above the new surface.
                    for y in new_height + 1..=cur_height {
                        if session.set_block(BlockPosition::new(xr, y, zr), &BaseBlock::air())? {
                            affected += 1;
                        }
                    }
                }
            }
        }

        Ok(affected)
    }
}

fn is_fluid(block: &BaseBlock) -> bool {
    block.state.name == "minecraft:water" || block.state.name == "minecraft:lava"
}

#[cfg(test)]
mod tests {
    use super::GaussianKernel;

    #[test]
    fn test_kernel_is_normalized() {
        let kernel = GaussianKernel::new(5, 1.0);
        let total: f64 = kernel.weights.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_terrain_stays_flat() {
        let kernel = GaussianKernel::new(2, 1.0);
        let data = vec![7i32; 6 * 4];
        let filtered = kernel.filter(&data, 6, 4);
        assert!(filtered.iter().all(|&h| h == 7));
    }

    #[test]
    fn test_spike_is_flattened() {
        let kernel = GaussianKernel::new(1, 1.0);
        let mut data = vec![0i32; 5 * 5];
        data[2 * 5 + 2] = 10;
        let filtered = kernel.filter(&data, 5, 5);
        assert!(filtered[2 * 5 + 2] < 10);
    }
}
