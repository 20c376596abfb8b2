//! Pipeline configuration.

use crate::util::{StereoError, StereoResult};

/// Tunable parameters for the depth map pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Worker thread count for the disparity search.
    pub threads: usize,
    /// Correlation window side length; must be odd.
    pub window: usize,
    /// Number of disparity candidates; the search scans `0..max_disparity`.
    pub max_disparity: usize,
    /// Cross-check tolerance on raw disparity values.
    pub cross_threshold: i32,
    /// Maximum occlusion-fill search radius.
    pub fill_radius: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threads: 4,
            window: 9,
            max_disparity: 65,
            cross_threshold: 8,
            fill_radius: 50,
        }
    }
}

impl PipelineConfig {
    /// Validates the configuration, returning the first violation found.
    pub fn validate(&self) -> StereoResult<()> {
        if self.threads == 0 {
            return Err(StereoError::InvalidConfig("thread count must be positive"));
        }
        if self.window == 0 || self.window % 2 == 0 {
            return Err(StereoError::InvalidConfig(
                "window size must be positive and odd",
            ));
        }
        if self.max_disparity < 2 {
            return Err(StereoError::InvalidConfig(
                "max disparity must be at least 2",
            ));
        }
        if self.cross_threshold < 0 {
            return Err(StereoError::InvalidConfig(
                "cross-check threshold must be non-negative",
            ));
        }
        Ok(())
    }
}
