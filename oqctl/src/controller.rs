// (c) 2026 oqctl developers

//! 🎛️ The caller-facing surface
//!
//! A [`Controller`] holds at most one connected [`Device`]. Every operation other than
//! [`connect`](Controller::connect) needs one, and returns [`Error::NotConnected`] if there
//! isn't.
//!
//! ```no_run
//! # async fn demo() -> oqctl::Result<()> {
//! use std::sync::Arc;
//! use oqctl::{Controller, transport::{HttpTransport, DEFAULT_TIMEOUT}};
//! use oqctl::session::{DeviceAddress, UploadPolicy};
//!
//! let transport = Arc::new(HttpTransport::new(DEFAULT_TIMEOUT).expect("http client"));
//! let address = DeviceAddress {
//!     host: "10.10.5.1".into(),
//!     ports: vec![80, 8000, 8080],
//!     path: "/c2".into(),
//! };
//! let mut controller = Controller::new(transport, address, UploadPolicy::default());
//! controller.connect().await?;
//! for name in controller.list_payloads().await? {
//!     println!("{name}");
//! }
//! controller.disconnect().await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::protocol::CommandOutcome;
use crate::session::{
    Device, DeviceAddress, RetryObserver, Session, UploadOutcome, UploadPlan, UploadPolicy,
};
use crate::transport::Transport;

/// Owns the (optional) connection to the device
#[derive(derive_more::Debug)]
pub struct Controller {
    #[debug(skip)]
    transport: Arc<dyn Transport>,
    address: DeviceAddress,
    upload_policy: UploadPolicy,
    device: Option<Device>,
}

impl Controller {
    /// Constructor. Does not connect.
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        address: DeviceAddress,
        upload_policy: UploadPolicy,
    ) -> Self {
        Self {
            transport,
            address,
            upload_policy,
            device: None,
        }
    }

    /// Runs discovery and, if it succeeds, replaces any existing connection.
    ///
    /// On failure the existing connection (if any) is kept.
    pub async fn connect(&mut self) -> Result<&Session> {
        let device = Device::connect(
            self.transport.clone(),
            &self.address,
            self.upload_policy,
        )
        .await?;
        if let Some(old) = self.device.replace(device) {
            old.disconnect().await;
        }
        self.session().ok_or(Error::NotConnected)
    }

    /// Drops the connection, cancelling anything outstanding. Harmless if not connected.
    pub async fn disconnect(&mut self) {
        if let Some(device) = self.device.take() {
            device.disconnect().await;
        }
    }

    /// Are we connected?
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.device.is_some()
    }

    /// The current session, if connected
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.device.as_ref().map(Device::session)
    }

    fn device(&self) -> Result<&Device> {
        self.device.as_ref().ok_or(Error::NotConnected)
    }

    /// See [`Device::list_payloads`]
    pub async fn list_payloads(&self) -> Result<Vec<String>> {
        self.device()?.list_payloads().await
    }

    /// See [`Device::run`]
    pub async fn run(&self, name: &str) -> Result<CommandOutcome> {
        Ok(self.device()?.run(name).await)
    }

    /// See [`Device::read`]
    pub async fn read(&self, name: &str) -> Result<CommandOutcome> {
        Ok(self.device()?.read(name).await)
    }

    /// See [`Device::delete`]
    pub async fn delete(&self, name: &str) -> Result<CommandOutcome> {
        Ok(self.device()?.delete(name).await)
    }

    /// See [`Device::free_memory`]
    pub async fn free_memory(&self) -> Result<u64> {
        self.device()?.free_memory().await
    }

    /// See [`Device::upload`]
    pub async fn upload(
        &self,
        filename: &str,
        content: Bytes,
        observer: Option<&dyn RetryObserver>,
    ) -> Result<UploadOutcome> {
        self.device()?.upload(filename, content, observer).await
    }

    /// See [`Device::retry_upload`]
    pub async fn retry_upload(
        &self,
        plan: UploadPlan,
        observer: Option<&dyn RetryObserver>,
    ) -> Result<UploadOutcome> {
        self.device()?.retry_upload(plan, observer).await
    }
}
