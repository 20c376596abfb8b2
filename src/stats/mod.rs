//! Per-pixel window statistics.
//!
//! The disparity search evaluates `O(width * height * max_disparity)` window
//! correlations; recomputing each window walk from the grid would repeat the
//! same clamped addressing work per candidate. `WindowStats` precomputes, for
//! every pixel, the window mean and a padded copy of the raw window samples
//! sized for the reduction kernels, so the search touches flat buffers only.

use crate::grid::GreyGrid;
use crate::kernel;
use crate::util::{StereoError, StereoResult};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Precomputed window statistics for one source grid.
///
/// Built once per image before the search begins and read-only afterwards.
/// Borrows the source grid for its whole lifetime.
pub struct WindowStats<'a> {
    source: &'a GreyGrid,
    means: Vec<f32>,
    windows: Vec<f32>,
    window: usize,
    padded_len: usize,
}

impl<'a> WindowStats<'a> {
    /// Computes means and cached window samples for every pixel of `source`.
    ///
    /// `window` must be odd and positive. The cache stores each pixel's
    /// samples in row-major window order, zero-padded to the smallest
    /// multiple of [`kernel::LANES`] at or above `window * window`.
    pub fn compute(source: &'a GreyGrid, window: usize) -> StereoResult<Self> {
        if window == 0 || window % 2 == 0 {
            return Err(StereoError::InvalidConfig(
                "window size must be positive and odd",
            ));
        }

        let width = source.width();
        let height = source.height();
        let area = window * window;
        let padded_len = area.div_ceil(kernel::LANES) * kernel::LANES;

        let build_row = |row: usize| -> (Vec<f32>, Vec<f32>) {
            let mut row_means = Vec::with_capacity(width);
            let mut row_windows = Vec::with_capacity(width * padded_len);
            for col in 0..width {
                let start = row_windows.len();
                source.for_each_window(row as isize, col as isize, window, |value| {
                    row_windows.push(value);
                });
                row_windows.resize(start + padded_len, 0.0);
                let total = kernel::sum(&row_windows[start..start + padded_len]);
                row_means.push(total / area as f32);
            }
            (row_means, row_windows)
        };

        #[cfg(feature = "rayon")]
        let rows: Vec<(Vec<f32>, Vec<f32>)> = (0..height).into_par_iter().map(build_row).collect();
        #[cfg(not(feature = "rayon"))]
        let rows: Vec<(Vec<f32>, Vec<f32>)> = (0..height).map(build_row).collect();

        let mut means = Vec::with_capacity(width * height);
        let mut windows = Vec::with_capacity(width * height * padded_len);
        for (row_means, row_windows) in rows {
            means.extend_from_slice(&row_means);
            windows.extend_from_slice(&row_windows);
        }

        Ok(Self {
            source,
            means,
            windows,
            window,
            padded_len,
        })
    }

    /// Returns the source grid these statistics were computed from.
    pub fn source(&self) -> &'a GreyGrid {
        self.source
    }

    /// Returns the window size.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Returns the number of real samples per window (`window * window`).
    pub fn sample_count(&self) -> usize {
        self.window * self.window
    }

    /// Returns the padded per-pixel cache length.
    pub fn padded_len(&self) -> usize {
        self.padded_len
    }

    /// Returns the window mean at an in-range pixel.
    pub fn mean(&self, row: usize, col: usize) -> f32 {
        self.means[row * self.source.width() + col]
    }

    /// Returns the padded window samples of an in-range pixel.
    pub fn window_samples(&self, row: usize, col: usize) -> &[f32] {
        let start = (row * self.source.width() + col) * self.padded_len;
        &self.windows[start..start + self.padded_len]
    }
}

/// Arithmetic mean of the `window * window` clamped samples around a pixel.
pub fn window_mean(grid: &GreyGrid, row: isize, col: isize, window: usize) -> f32 {
    let mut total = 0.0f32;
    grid.for_each_window(row, col, window, |value| total += value);
    total / (window * window) as f32
}

/// Deviation magnitude of a window: the square root of the sum of squared
/// deviations from the window mean. Deliberately not divided by the window
/// area; the correlation score depends on this scaling.
pub fn window_deviation(grid: &GreyGrid, row: isize, col: isize, window: usize) -> f32 {
    let mean = window_mean(grid, row, col, window);
    let mut total = 0.0f32;
    grid.for_each_window(row, col, window, |value| {
        let dev = value - mean;
        total += dev * dev;
    });
    total.sqrt()
}

#[cfg(test)]
mod tests {
    use super::WindowStats;
    use crate::grid::PixelGrid;

    #[test]
    fn rejects_even_window() {
        let grid = PixelGrid::new(vec![0.0; 9], 3, 3).unwrap();
        assert!(WindowStats::compute(&grid, 4).is_err());
        assert!(WindowStats::compute(&grid, 0).is_err());
    }

    #[test]
    fn cache_is_padded_window_copy() {
        let data: Vec<f32> = (0..9).map(|v| v as f32).collect();
        let grid = PixelGrid::new(data, 3, 3).unwrap();
        let stats = WindowStats::compute(&grid, 3).unwrap();

        // 9 samples rounded up to two 8-lane chunks.
        assert_eq!(stats.padded_len(), 16);

        let mut expected = Vec::new();
        grid.for_each_window(1, 1, 3, |v| expected.push(v));
        expected.resize(16, 0.0);
        assert_eq!(stats.window_samples(1, 1), expected.as_slice());
    }

    #[test]
    fn cached_mean_matches_direct_mean() {
        let data: Vec<f32> = (0..20).map(|v| (v * 3 % 17) as f32).collect();
        let grid = PixelGrid::new(data, 5, 4).unwrap();
        let stats = WindowStats::compute(&grid, 3).unwrap();
        for row in 0..4 {
            for col in 0..5 {
                let direct = super::window_mean(&grid, row as isize, col as isize, 3);
                assert!((stats.mean(row, col) - direct).abs() < 1e-5);
            }
        }
    }
}
