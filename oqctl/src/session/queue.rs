//! Per-session serialized command queue
// (c) 2026 oqctl developers

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::Session;
use crate::protocol::Command;
use crate::transport::Transport;

#[derive(Debug)]
struct Job {
    command: Command,
    reply: oneshot::Sender<Option<String>>,
}

/// Sends commands to the device one at a time, in submission order.
///
/// A single worker task owns the send side of the transport. Cancelling the queue
/// abandons the request in flight and resolves every pending submission as `None`
/// without touching the network.
#[derive(Debug)]
pub(crate) struct CommandQueue {
    tx: mpsc::UnboundedSender<Job>,
    cancel: CancellationToken,
    worker: Option<JoinHandle<()>>,
}

impl CommandQueue {
    /// Starts the worker task. Must be called within a tokio runtime.
    pub(crate) fn start(transport: Arc<dyn Transport>, session: Session) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let worker = tokio::spawn(worker(transport, session, rx, cancel.clone()));
        Self {
            tx,
            cancel,
            worker: Some(worker),
        }
    }

    /// Queues a command and waits for its reply.
    ///
    /// `None` means no reply: the transport failed, or the queue was cancelled.
    pub(crate) async fn submit(&self, command: Command) -> Option<String> {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(Job { command, reply }).is_err() {
            trace!("command queue is closed");
            return None;
        }
        rx.await.ok().flatten()
    }

    /// Cancels outstanding work and waits for the worker to finish.
    pub(crate) async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(worker) = self.worker.take() {
            let _ = worker.await;
        }
    }
}

impl Drop for CommandQueue {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn worker(
    transport: Arc<dyn Transport>,
    session: Session,
    mut rx: mpsc::UnboundedReceiver<Job>,
    cancel: CancellationToken,
) {
    loop {
        let job = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            job = rx.recv() => match job {
                Some(job) => job,
                None => break,
            },
        };
        let verb = job.command.verb();
        let body = job.command.encode(session.separator());
        trace!("sending {verb} ({} bytes)", body.len());
        let reply = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("{verb} abandoned by disconnect");
                let _ = job.reply.send(None);
                break;
            }
            r = transport.post(session.base_url(), body) => r.ok(),
        };
        // The submitter may have gone away; that's fine.
        let _ = job.reply.send(reply);
    }

    rx.close();
    let mut drained = 0usize;
    while let Ok(job) = rx.try_recv() {
        let _ = job.reply.send(None);
        drained += 1;
    }
    if drained > 0 {
        debug!("{drained} queued command(s) cancelled");
    }
}
