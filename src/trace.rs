//! Conditional tracing macros.
//!
//! With the `tracing` feature every span and event is emitted under the
//! `loopalign` target and tagged with the pipeline `stage` it belongs to;
//! without it they expand to no-ops so call sites need no `cfg` attributes.

/// Target shared by all spans and events, matched by `loopalign=info` filters.
#[cfg(feature = "tracing")]
pub(crate) const TARGET: &str = "loopalign";

/// Opens an info-level span for one pipeline stage.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($stage:expr $(, $($field:tt)*)?) => {
        tracing::info_span!(target: $crate::trace::TARGET, "stage", stage = $stage $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($stage:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Emits an info-level event describing one step inside the current stage.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($step:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(target: $crate::trace::TARGET, step = $step, $($key = $value),+)
    };
    ($step:expr) => {
        tracing::info!(target: $crate::trace::TARGET, step = $step)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($step:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($step, $($value,)+);
    };
    ($step:expr) => {
        let _ = $step;
    };
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Stand-in for an entered `tracing::Span` when the feature is off.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{trace_event, trace_span};

    #[test]
    fn macros_accept_stage_fields_and_bare_steps() {
        let _span = trace_span!("align", images = 3usize, rotate = false).entered();
        trace_event!("translation", index = 1usize, dx = -4i64, dy = 0i64);
        trace_event!("done");
    }
}
