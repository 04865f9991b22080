// (c) 2026 oqctl developers

//! 🚚 HTTP transport to the device
//!
//! The transport knows nothing of the command protocol. It moves an opaque text body to a URL
//! and hands back whatever text comes back.
//!
//! All failures (refused connections, timeouts, malformed HTTP, unreadable bodies) collapse
//! into a single [`TransportFailure`]. The underlying cause is logged at debug level and
//! goes no further.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONNECTION, CONTENT_TYPE, HeaderValue};
use tracing::{debug, trace, warn};

/// The one failure a [`Transport`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("transport failure")]
pub struct TransportFailure;

impl From<TransportFailure> for crate::Error {
    fn from(_: TransportFailure) -> Self {
        crate::Error::TransportFailure
    }
}

/// Moves request bodies to the device.
///
/// This is a trait so that alternative HTTP stacks (and test doubles) can be supplied.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Reachability check: a bare `GET`. Succeeds only on a 2xx status.
    async fn probe(&self, url: &str) -> Result<(), TransportFailure>;

    /// Sends `body` as `text/plain` by `POST` and returns the response body.
    async fn post(&self, url: &str, body: Bytes) -> Result<String, TransportFailure>;
}

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// [`Transport`] implementation using `reqwest`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Constructor. `timeout` applies to each request as a whole (connect, send and receive).
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn probe(&self, url: &str) -> Result<(), TransportFailure> {
        trace!("probe {url}");
        let response = self.client.get(url).send().await.map_err(|e| {
            debug!("probe {url}: {e}");
            TransportFailure
        })?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            debug!("probe {url}: status {status}");
            Err(TransportFailure)
        }
    }

    async fn post(&self, url: &str, body: Bytes) -> Result<String, TransportFailure> {
        trace!("POST {url} ({} bytes)", body.len());
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .header(CONNECTION, HeaderValue::from_static("keep-alive"))
            .body(body)
            .send()
            .await
            .map_err(|e| {
                debug!("POST {url}: {e}");
                TransportFailure
            })?;
        let status = response.status();
        if !status.is_success() {
            // The device has no status envelope; its reply text is all we have to go on.
            warn!("device replied with HTTP status {status}");
        }
        response.text().await.map_err(|e| {
            debug!("POST {url}: reading body: {e}");
            TransportFailure
        })
    }
}

#[cfg(test)]
pub(crate) mod test {
    use std::time::Duration;

    use assertables::assert_contains;
    use bytes::Bytes;
    use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::{HttpTransport, Transport as _, TransportFailure};

    /// Serves exactly one HTTP request on a loopback port.
    /// The join handle yields the request as received (headers and body).
    pub(crate) async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/c2", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            drop(listener);
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            let header_end = loop {
                let n = sock.read(&mut buf).await.unwrap();
                assert!(n > 0, "client hung up early");
                request.extend_from_slice(&buf[..n]);
                if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let headers = String::from_utf8_lossy(&request[..header_end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .map_or(0, |v| v.trim().parse::<usize>().unwrap());
            while request.len() < header_end + content_length {
                let n = sock.read(&mut buf).await.unwrap();
                assert!(n > 0, "client hung up early");
                request.extend_from_slice(&buf[..n]);
            }
            sock.write_all(response.as_bytes()).await.unwrap();
            sock.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });
        (url, handle)
    }

    fn transport() -> HttpTransport {
        HttpTransport::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn post_sends_text_with_keepalive() {
        let (url, server) = serve_once("200 OK", "|").await;
        let reply = transport()
            .post(&url, Bytes::from_static(b"SEP"))
            .await
            .unwrap();
        assert_eq!(reply, "|");

        let request = server.await.unwrap();
        let lower = request.to_lowercase();
        assert!(request.starts_with("POST /c2 HTTP/1.1\r\n"));
        assert_contains!(lower, "content-type: text/plain\r\n");
        assert_contains!(lower, "connection: keep-alive\r\n");
        assert!(request.ends_with("\r\n\r\nSEP"));
    }

    #[tokio::test]
    async fn post_returns_body_despite_error_status() {
        let (url, server) = serve_once("500 Internal Server Error", "write failed").await;
        let reply = transport()
            .post(&url, Bytes::from_static(b"WRITE|x.oqs|\nhi"))
            .await
            .unwrap();
        assert_eq!(reply, "write failed");
        let _ = server.await.unwrap();
    }

    #[tokio::test]
    async fn probe_needs_success_status() {
        let (url, server) = serve_once("200 OK", "").await;
        assert_eq!(transport().probe(&url).await, Ok(()));
        assert!(server.await.unwrap().starts_with("GET /c2 HTTP/1.1\r\n"));

        let (url, server) = serve_once("404 Not Found", "").await;
        assert_eq!(transport().probe(&url).await, Err(TransportFailure));
        let _ = server.await.unwrap();
    }

    #[tokio::test]
    async fn refused_connection_is_transport_failure() {
        // Bind then drop, so the port is (almost certainly) closed
        let port = {
            let l = TcpListener::bind("127.0.0.1:0").await.unwrap();
            l.local_addr().unwrap().port()
        };
        let url = format!("http://127.0.0.1:{port}/c2");
        let t = transport();
        assert_eq!(t.probe(&url).await, Err(TransportFailure));
        assert_eq!(
            t.post(&url, Bytes::from_static(b"LS")).await,
            Err(TransportFailure)
        );
    }
}
