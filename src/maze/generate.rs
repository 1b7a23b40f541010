//! Seeded random maze generation.
//!
//! Carves a perfect maze (exactly one route between any two floor cells)
//! with an iterative recursive-backtracker over the odd cells of the grid.
//! The start is placed top-left and the goal bottom-right.

use crate::error::MazeError;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Generate a map of `width` x `height` characters.
///
/// Even dimensions are rounded down to the next odd size so the outer wall is
/// closed. The same seed always yields the same map; `None` draws a seed from
/// the OS.
pub fn generate(width: usize, height: usize, seed: Option<u64>) -> Result<String, MazeError> {
    if width < 3 || height < 3 {
        return Err(MazeError::TooSmall { width, height });
    }
    let width = if width % 2 == 0 { width - 1 } else { width };
    let height = if height % 2 == 0 { height - 1 } else { height };

    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };

    let mut grid = vec![vec!['*'; width]; height];
    let mut stack = vec![(1usize, 1usize)];
    grid[1][1] = ' ';

    while let Some(&(row, col)) = stack.last() {
        let mut options: Vec<(usize, usize, usize, usize)> = Vec::with_capacity(4);
        if row >= 3 {
            options.push((row - 2, col, row - 1, col));
        }
        if col + 2 < width {
            options.push((row, col + 2, row, col + 1));
        }
        if row + 2 < height {
            options.push((row + 2, col, row + 1, col));
        }
        if col >= 3 {
            options.push((row, col - 2, row, col - 1));
        }
        options.retain(|&(r, c, _, _)| grid[r][c] == '*');

        match options.choose(&mut rng) {
            Some(&(r, c, wall_r, wall_c)) => {
                grid[wall_r][wall_c] = ' ';
                grid[r][c] = ' ';
                stack.push((r, c));
            }
            None => {
                stack.pop();
            }
        }
    }

    grid[1][1] = '@';
    grid[height - 2][width - 2] = '$';

    let mut out = String::with_capacity((width + 1) * height);
    for row in grid {
        out.extend(row);
        out.push('\n');
    }
    Ok(out)
}
