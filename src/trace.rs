//! Conditional tracing events (zero-cost when the feature is disabled).

/// Emit an info-level event for key measurements.
///
/// With the `tracing` feature enabled this forwards to `tracing::info!`;
/// without it, the values are evaluated and discarded so call sites need no
/// conditional compilation.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
}

pub(crate) use trace_event;
