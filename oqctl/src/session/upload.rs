//! Memory-aware payload upload
// (c) 2026 oqctl developers

use bytes::Bytes;
use human_repr::HumanCount as _;
use tracing::{debug, info, warn};

use super::{Device, RetryObserver, RetryPolicy, with_retry};
use crate::error::{Error, Result};
use crate::protocol::{Classifier, Command, CommandOutcome, has_payload_extension};

/// Uploads at or below this size (in bytes) get a single attempt
pub const DEFAULT_RETRY_THRESHOLD: u64 = 50_000;

/// Fraction of free memory an upload may use, as numerator / denominator
const BUDGET_FRACTION: (u64, u64) = (3, 4);

/// Computes the safe upload budget: three quarters of the free memory, rounded down.
#[must_use]
pub fn safe_budget(free_memory: u64) -> u64 {
    let (num, den) = BUDGET_FRACTION;
    // Split so the multiplication cannot overflow
    (free_memory / den) * num + (free_memory % den) * num / den
}

/// Interprets a `FREE_MEM` reply
pub fn parse_free_memory(raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| Error::InvalidMemoryResponse {
            raw: raw.to_string(),
        })
}

/// A payload waiting to be uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPlan {
    filename: String,
    content: Bytes,
    forced: bool,
}

impl UploadPlan {
    /// Constructor. The plan is not forced.
    #[must_use]
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            forced: false,
        }
    }

    /// The same plan, marked to go ahead regardless of the memory budget
    #[must_use]
    pub fn forced(self) -> Self {
        Self {
            forced: true,
            ..self
        }
    }

    /// Accessor
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }
    /// Accessor
    #[must_use]
    pub fn content(&self) -> &Bytes {
        &self.content
    }
    /// Size of the content in bytes
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        self.content.len() as u64
    }
    /// Has the user overridden the memory check?
    #[must_use]
    pub fn is_forced(&self) -> bool {
        self.forced
    }
}

/// The payload is bigger than the device can safely take
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display(
    "file size {} exceeds safe limit of {}",
    size.human_count_bytes(),
    budget.human_count_bytes()
)]
pub struct SizeExceeded {
    /// Payload size, bytes
    pub size: u64,
    /// Safe budget at the time of the check, bytes
    pub budget: u64,
}

/// What happened to a completed upload attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Name the payload was written as
    pub filename: String,
    /// Bytes sent
    pub size: u64,
    /// The classified reply to the final `WRITE`
    pub outcome: CommandOutcome,
    /// Attempts allowed by the retry policy (1 for small payloads)
    pub max_attempts: u32,
    /// Whether the memory check was overridden
    pub forced: bool,
}

/// Result of [`Device::plan_and_upload`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// A `WRITE` was sent; see the receipt for how it went
    Completed(UploadReceipt),
    /// Nothing was sent. The caller decides whether to go ahead anyway,
    /// by passing `plan` to [`Device::retry_upload`].
    SizeExceeded {
        /// The sizes involved
        decision: SizeExceeded,
        /// The plan that was refused
        plan: UploadPlan,
    },
}

/// Upload tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Payloads larger than this many bytes use the retry policy
    pub retry_threshold: u64,
    /// Retry policy for large payloads
    pub retry: RetryPolicy,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            retry_threshold: DEFAULT_RETRY_THRESHOLD,
            retry: RetryPolicy::default(),
        }
    }
}

impl UploadPolicy {
    /// The retry policy that applies to a payload of the given size
    #[must_use]
    pub fn attempts_for(&self, size: u64) -> RetryPolicy {
        if size > self.retry_threshold {
            self.retry
        } else {
            RetryPolicy::single()
        }
    }
}

impl Device {
    /// Uploads a payload, checking first that the device has room for it.
    pub async fn upload(
        &self,
        filename: &str,
        content: Bytes,
        observer: Option<&dyn RetryObserver>,
    ) -> Result<UploadOutcome> {
        self.plan_and_upload(UploadPlan::new(filename, content), observer)
            .await
    }

    /// Uploads a plan that was previously refused, skipping the memory check.
    pub async fn retry_upload(
        &self,
        plan: UploadPlan,
        observer: Option<&dyn RetryObserver>,
    ) -> Result<UploadOutcome> {
        self.plan_and_upload(plan.forced(), observer).await
    }

    /// The upload pipeline.
    ///
    /// 1. The filename must end in `.oqs`; otherwise [`Error::InvalidFileType`], and nothing
    ///    is sent.
    /// 2. Unless the plan is forced, `FREE_MEM` is queried and the payload compared against
    ///    [`safe_budget`]. Too big gives [`UploadOutcome::SizeExceeded`].
    /// 3. `WRITE` is sent, with retries if the payload is larger than the policy threshold.
    pub async fn plan_and_upload(
        &self,
        plan: UploadPlan,
        observer: Option<&dyn RetryObserver>,
    ) -> Result<UploadOutcome> {
        if !has_payload_extension(plan.filename()) {
            return Err(Error::InvalidFileType {
                filename: plan.filename().to_string(),
            });
        }
        let size = plan.size_bytes();

        if plan.is_forced() {
            info!("size check overridden for {}", plan.filename());
        } else {
            let free = self.free_memory().await?;
            let budget = safe_budget(free);
            debug!(
                "free memory {}, budget {}, payload {}",
                free.human_count_bytes(),
                budget.human_count_bytes(),
                size.human_count_bytes()
            );
            if size > budget {
                let decision = SizeExceeded { size, budget };
                warn!("{}: {decision}", plan.filename());
                return Ok(UploadOutcome::SizeExceeded { decision, plan });
            }
        }

        let policy = self.upload_policy().attempts_for(size);
        let command = Command::write(plan.filename(), plan.content());
        info!(
            "uploading {} ({})",
            plan.filename(),
            size.human_count_bytes()
        );
        let reply = if policy.max_attempts > 1 {
            with_retry(|| self.execute(command.clone()), policy, observer).await
        } else {
            self.execute(command).await
        };
        let outcome = Classifier::WRITE.classify(reply);
        debug!("upload outcome: {outcome:?}");
        Ok(UploadOutcome::Completed(UploadReceipt {
            filename: plan.filename,
            size,
            outcome,
            max_attempts: policy.max_attempts,
            forced: plan.forced,
        }))
    }
}
