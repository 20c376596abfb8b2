//! Disparity map post-processing: normalization, cross-check, occlusion fill.

use crate::grid::{DepthGrid, PixelGrid};
use crate::progress::Progress;
use crate::util::StereoResult;

/// Rescales raw disparities onto 0-255 for storage and visualization.
///
/// `max_disparity` must match the search that produced the map and be at
/// least 2; `max_disparity - 1` maps exactly to 255.
pub fn normalize(input: &DepthGrid, max_disparity: usize) -> DepthGrid {
    debug_assert!(max_disparity >= 2);
    let scale = max_disparity as i32 - 1;
    let data = input.as_slice().iter().map(|&v| v * 255 / scale).collect();
    PixelGrid::from_raw(data, input.width(), input.height())
}

/// Masks pixels whose two directional disparities disagree.
///
/// Where `|a - b|` exceeds `threshold` the output is 0 (occluded or
/// unreliable); elsewhere it is the truncating integer average of the two.
pub fn cross_check(
    map1: &DepthGrid,
    map2: &DepthGrid,
    threshold: i32,
) -> StereoResult<DepthGrid> {
    map1.check_same_shape(map2)?;
    let data = map1
        .as_slice()
        .iter()
        .zip(map2.as_slice())
        .map(|(&a, &b)| if (a - b).abs() > threshold { 0 } else { (a + b) / 2 })
        .collect();
    Ok(PixelGrid::from_raw(data, map1.width(), map1.height()))
}

fn nearest_non_zero(input: &DepthGrid, row: isize, col: isize, radius: isize) -> Option<i32> {
    for r in (row - radius)..(row + radius) {
        for c in (col - radius)..(col + radius) {
            let value = input.get(r, c);
            if value != 0 {
                return Some(value);
            }
        }
    }
    None
}

/// Replaces zero pixels with the nearest non-zero neighbor.
///
/// For each zero pixel the radius grows from 1 to `max_radius`; at each step
/// the square of half-open row and column ranges `center - radius ..
/// center + radius` is scanned in row-major order with clamped addressing,
/// and the first non-zero value found wins. Pixels with no non-zero neighbor
/// within the maximum radius stay 0.
pub fn occlusion_fill(
    input: &DepthGrid,
    max_radius: usize,
    progress: &mut dyn Progress,
) -> DepthGrid {
    progress.start("occlusion fill");
    let width = input.width();
    let height = input.height();
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let mut value = input.get(row as isize, col as isize);
            if value == 0 {
                for radius in 1..=max_radius as isize {
                    if let Some(found) = nearest_non_zero(input, row as isize, col as isize, radius)
                    {
                        value = found;
                        break;
                    }
                }
            }
            data.push(value);
        }
        progress.update((row + 1) as f32 / height as f32);
    }
    progress.end();
    PixelGrid::from_raw(data, width, height)
}
