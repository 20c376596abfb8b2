//! End-to-end depth map pipeline.

use crate::config::PipelineConfig;
use crate::grid::{DepthGrid, GreyGrid};
use crate::post;
use crate::progress::Progress;
use crate::search;
use crate::util::StereoResult;

/// Computes the final depth map from a rectified greyscale stereo pair.
///
/// Runs the disparity search in both reference directions, cross-checks the
/// two raw maps, rescales to 0-255 and fills occluded pixels. Callers that
/// need the intermediate maps can compose [`search::compute_depth_maps`] and
/// the [`post`] stages directly.
pub fn depth_map(
    left: &GreyGrid,
    right: &GreyGrid,
    config: &PipelineConfig,
    progress: &mut dyn Progress,
) -> StereoResult<DepthGrid> {
    let (left_map, right_map) = search::compute_depth_maps(left, right, config, progress)?;
    let checked = post::cross_check(&left_map, &right_map, config.cross_threshold)?;
    let normalized = post::normalize(&checked, config.max_disparity);
    Ok(post::occlusion_fill(
        &normalized,
        config.fill_radius,
        progress,
    ))
}
