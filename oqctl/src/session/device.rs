//! A connected device
// (c) 2026 oqctl developers

use std::sync::Arc;

use tracing::{debug, info};

use super::queue::CommandQueue;
use super::{DeviceAddress, Session, UploadPolicy, find_session};
use crate::error::{Error, Result};
use crate::protocol::{Classifier, Command, CommandOutcome, parse_listing};
use crate::transport::Transport;

/// A device we have a session with.
///
/// All commands go through a single queue, so they reach the device one at a time and
/// in the order they were issued. Dropping the `Device` (or calling
/// [`Device::disconnect`]) cancels anything still outstanding.
#[derive(Debug)]
pub struct Device {
    session: Session,
    queue: CommandQueue,
    upload_policy: UploadPolicy,
}

impl Device {
    /// Finds the device and negotiates a session with it
    pub async fn connect(
        transport: Arc<dyn Transport>,
        address: &DeviceAddress,
        upload_policy: UploadPolicy,
    ) -> Result<Self> {
        let session = find_session(transport.as_ref(), address).await?;
        Ok(Self::with_session(transport, session, upload_policy))
    }

    /// Uses an already negotiated session, skipping discovery.
    #[must_use]
    pub fn with_session(
        transport: Arc<dyn Transport>,
        session: Session,
        upload_policy: UploadPolicy,
    ) -> Self {
        let queue = CommandQueue::start(transport, session.clone());
        Self {
            session,
            queue,
            upload_policy,
        }
    }

    /// Accessor
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Accessor
    #[must_use]
    pub fn upload_policy(&self) -> &UploadPolicy {
        &self.upload_policy
    }

    /// Sends a command and returns the raw reply, or `None` if there was none.
    pub async fn execute(&self, command: Command) -> Option<String> {
        debug!("-> {command}");
        let reply = self.queue.submit(command).await;
        match &reply {
            Some(r) => debug!("<- {} bytes", r.len()),
            None => debug!("<- no reply"),
        }
        reply
    }

    async fn classified(&self, command: Command) -> CommandOutcome {
        let classifier: Classifier = command.verb().classifier();
        classifier.classify(self.execute(command).await)
    }

    /// Lists the payloads on the device, in device order.
    ///
    /// An empty reply is an empty list.
    pub async fn list_payloads(&self) -> Result<Vec<String>> {
        let raw = self
            .execute(Command::ls())
            .await
            .ok_or(Error::TransportFailure)?;
        Ok(parse_listing(&raw))
    }

    /// Runs a payload
    pub async fn run(&self, name: &str) -> CommandOutcome {
        self.classified(Command::run(name)).await
    }

    /// Fetches the content of a payload
    pub async fn read(&self, name: &str) -> CommandOutcome {
        self.classified(Command::read(name)).await
    }

    /// Deletes a payload
    pub async fn delete(&self, name: &str) -> CommandOutcome {
        self.classified(Command::delete(name)).await
    }

    /// Asks how much memory the device has free, in bytes
    pub async fn free_memory(&self) -> Result<u64> {
        let raw = self
            .execute(Command::free_mem())
            .await
            .ok_or(Error::MemoryQueryFailed)?;
        super::parse_free_memory(&raw)
    }

    /// Forgets the session. Nothing is sent to the device.
    ///
    /// Commands still queued or in flight resolve as having had no reply.
    pub async fn disconnect(self) {
        info!("disconnecting from {}", self.session);
        self.queue.shutdown().await;
    }
}
