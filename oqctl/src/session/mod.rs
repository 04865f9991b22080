//! Device sessions: discovery, command execution and uploads
// (c) 2026 oqctl developers

mod device;
mod discovery;
mod queue;
mod retry;
mod upload;

pub use device::Device;
pub use discovery::{DeviceAddress, find_session};
pub use retry::{RetryObserver, RetryPolicy, with_retry};
pub use upload::{
    DEFAULT_RETRY_THRESHOLD, SizeExceeded, UploadOutcome, UploadPlan, UploadPolicy, UploadReceipt, parse_free_memory,
    safe_budget,
};

/// The client's record of a successful discovery.
///
/// A session has no counterpart on the device; it exists only while we consider ourselves
/// connected. It is immutable: reconnecting always produces a new one.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Constructor, derive_more::Display)]
#[display("{base_url}")]
pub struct Session {
    base_url: String,
    separator: String,
}

impl Session {
    /// The command endpoint, e.g. `http://10.10.5.1:80/c2`
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The negotiated separator (may be empty)
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }
}
