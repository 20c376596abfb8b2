//! Progress reporting handle.
//!
//! The long-running stages accept a reporter owned by the caller instead of
//! writing to any process-wide state. Reporters are purely observational;
//! they never affect results.

/// Receives named-phase start, percentage and end notifications.
pub trait Progress {
    /// A named phase has started.
    fn start(&mut self, _label: &str) {}

    /// The current phase advanced to `fraction` (0.0 to 1.0).
    fn update(&mut self, _fraction: f32) {}

    /// The current phase finished.
    fn end(&mut self) {}
}

/// Reporter that discards every notification.
pub struct NoProgress;

impl Progress for NoProgress {}
