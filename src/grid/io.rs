//! PNG loading and saving via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Full-resolution RGB
//! captures are reduced to working resolution here: luma weighting followed by
//! 4x decimation in both axes, which is where the rest of the pipeline expects
//! its inputs to come from.

use crate::grid::{DepthGrid, GreyGrid, PixelGrid};
use crate::util::{StereoError, StereoResult};
use std::path::Path;

const LUMA_R: f32 = 0.2126;
const LUMA_G: f32 = 0.7152;
const LUMA_B: f32 = 0.0722;

/// Decimation factor applied by [`load_grey`] in both axes.
pub const DECIMATION: usize = 4;

fn io_error(err: image::ImageError) -> StereoError {
    StereoError::ImageIo {
        reason: err.to_string(),
    }
}

/// Loads an RGB image, converts it to luma-weighted greyscale and decimates it
/// by [`DECIMATION`] in both axes (every 4th pixel is kept, no averaging).
pub fn load_grey<P: AsRef<Path>>(path: P) -> StereoResult<GreyGrid> {
    let rgb = image::open(path).map_err(io_error)?.to_rgb8();
    let width = rgb.width() as usize;
    let height = rgb.height() as usize;
    if width == 0 || height == 0 {
        return Err(StereoError::InvalidDimensions { width, height });
    }

    let out_width = width.div_ceil(DECIMATION);
    let out_height = height.div_ceil(DECIMATION);
    let mut data = Vec::with_capacity(out_width * out_height);
    for row in (0..height).step_by(DECIMATION) {
        for col in (0..width).step_by(DECIMATION) {
            let pixel = rgb.get_pixel(col as u32, row as u32);
            let [r, g, b] = pixel.0;
            data.push(r as f32 * LUMA_R + g as f32 * LUMA_G + b as f32 * LUMA_B);
        }
    }
    PixelGrid::new(data, out_width, out_height)
}

/// Loads a greyscale image 1:1 into an integer grid.
pub fn load<P: AsRef<Path>>(path: P) -> StereoResult<DepthGrid> {
    let grey = image::open(path).map_err(io_error)?.to_luma8();
    let width = grey.width() as usize;
    let height = grey.height() as usize;
    let data = grey.as_raw().iter().map(|&v| v as i32).collect();
    PixelGrid::new(data, width, height)
}

/// Saves an integer grid as an 8-bit greyscale PNG.
///
/// Values are truncated to `u8`; pipeline outputs are already in 0-255.
pub fn save<P: AsRef<Path>>(grid: &DepthGrid, path: P) -> StereoResult<()> {
    let data: Vec<u8> = grid.as_slice().iter().map(|&v| v as u8).collect();
    let buffer = image::GrayImage::from_raw(grid.width() as u32, grid.height() as u32, data)
        .ok_or(StereoError::BufferSizeMismatch {
            width: grid.width(),
            height: grid.height(),
            got: grid.as_slice().len(),
        })?;
    buffer.save(path).map_err(io_error)
}
