//! General utility code that didn't fit anywhere else
// (c) 2026 oqctl developers

mod tracing;
pub use tracing::TimeFormat;
pub(crate) use tracing::{
    ConsoleLog, LogSettings, is_initialized as tracing_is_initialised, setup as setup_tracing,
    trace_level,
};
