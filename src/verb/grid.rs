use std::collections::HashMap;

use crate::Point;
use crate::verb::eigenverb::Eigenverb;

/// Spatial bin grid over eigenverb footprints in the horizontal plane.
///
/// Each eigenverb is binned by the cell containing its impact position.
/// As long as `step` is at least the largest acceptance distance between
/// any candidate pair, searching a cell plus its 8 neighbors finds every
/// footprint within that distance, avoiding the full |S| x |R| pair
/// enumeration.
pub struct FootprintGrid {
    grid: HashMap<(i32, i32), Vec<usize>>,
    step: f64,
}

impl FootprintGrid {
    pub fn new(verbs: &[Eigenverb], step: f64) -> Self {
        // A degenerate step would put everything in one row of cells
        let step = step.max(1e-6);
        let mut grid: HashMap<(i32, i32), Vec<usize>> = HashMap::new();

        for (idx, verb) in verbs.iter().enumerate() {
            let i = (verb.position.x / step).floor() as i32;
            let j = (verb.position.y / step).floor() as i32;
            grid.entry((i, j)).or_default().push(idx);
        }

        Self { grid, step }
    }

    /// Returns indices of eigenverbs binned in the cell containing `pos`
    /// plus its 8 neighbors, sorted ascending.
    pub fn find_nearby(&self, pos: Point) -> Vec<usize> {
        let ci = (pos.x / self.step).floor() as i32;
        let cj = (pos.y / self.step).floor() as i32;

        let mut result = Vec::new();
        for di in -1..=1 {
            for dj in -1..=1 {
                if let Some(indices) = self.grid.get(&(ci + di, cj + dj)) {
                    result.extend_from_slice(indices);
                }
            }
        }

        // Sorted so that downstream accumulation order does not depend
        // on hash map iteration order.
        result.sort_unstable();
        result
    }
}
