//! Locating the device and negotiating a session
// (c) 2026 oqctl developers

use tracing::{debug, info, warn};

use super::Session;
use crate::error::{Error, Result};
use crate::protocol::Command;
use crate::transport::Transport;

/// Where to look for the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAddress {
    /// Hostname or IP address
    pub host: String,
    /// Candidate ports, in priority order
    pub ports: Vec<u16>,
    /// Command endpoint path, including the leading `/`
    pub path: String,
}

impl DeviceAddress {
    /// The command URL for a given port
    #[must_use]
    pub fn url_for(&self, port: u16) -> String {
        format!("http://{}:{port}{}", self.host, self.path)
    }
}

/// Finds the device and negotiates a session with it.
///
/// Ports are probed strictly in the order given; the first one that answers wins and no
/// further ports are tried. The session separator is then requested from that endpoint with
/// `SEP`. If `SEP` gets no reply we carry on with an empty separator.
///
/// If no port answers, every port has been probed exactly once and the result is
/// [`Error::NoReachableEndpoint`]. Retrying the scan is up to the caller.
pub async fn find_session(transport: &dyn Transport, address: &DeviceAddress) -> Result<Session> {
    for &port in &address.ports {
        let url = address.url_for(port);
        debug!("probing {url}");
        if transport.probe(&url).await.is_err() {
            continue;
        }
        // No separator is known yet, so SEP goes out bare.
        let separator = match transport.post(&url, Command::sep().encode("")).await {
            Ok(sep) => sep,
            Err(_) => {
                warn!("{url} did not answer SEP; continuing without a separator");
                String::new()
            }
        };
        info!("found device at {url}");
        debug!("separator is {separator:?}");
        return Ok(Session::new(url, separator));
    }
    Err(Error::NoReachableEndpoint {
        ports: address.ports.clone(),
    })
}

#[cfg(test)]
mod test {
    use bytes::Bytes;
    use mockall::{Sequence, predicate::eq};
    use pretty_assertions::assert_eq;

    use super::{DeviceAddress, find_session};
    use crate::error::Error;
    use crate::transport::{MockTransport, TransportFailure};

    fn address(ports: &[u16]) -> DeviceAddress {
        DeviceAddress {
            host: "10.10.5.1".into(),
            ports: ports.to_vec(),
            path: "/c2".into(),
        }
    }

    #[tokio::test]
    async fn probes_in_order_and_stops_at_first_success() {
        let mut mock = MockTransport::new();
        let mut seq = Sequence::new();
        let _ = mock
            .expect_probe()
            .with(eq("http://10.10.5.1:80/c2"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(TransportFailure));
        let _ = mock
            .expect_probe()
            .with(eq("http://10.10.5.1:8000/c2"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        let _ = mock
            .expect_post()
            .withf(|url, body| url == "http://10.10.5.1:8000/c2" && &body[..] == b"SEP")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok("|".into()));
        // 8080 must never be probed; mockall panics on an unexpected call.

        let session = find_session(&mock, &address(&[80, 8000, 8080]))
            .await
            .unwrap();
        assert_eq!(session.base_url(), "http://10.10.5.1:8000/c2");
        assert_eq!(session.separator(), "|");
    }

    #[tokio::test]
    async fn no_reachable_port_probes_each_once() {
        let mut mock = MockTransport::new();
        let mut seq = Sequence::new();
        for port in [80, 8000, 8080] {
            let url = format!("http://10.10.5.1:{port}/c2");
            let _ = mock
                .expect_probe()
                .withf(move |u| u == url)
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Err(TransportFailure));
        }
        let _ = mock.expect_post().never();

        let err = find_session(&mock, &address(&[80, 8000, 8080]))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::NoReachableEndpoint {
                ports: vec![80, 8000, 8080]
            }
        );
    }

    #[tokio::test]
    async fn empty_or_missing_separator_is_allowed() {
        for reply in [Ok(String::new()), Err(TransportFailure)] {
            let mut mock = MockTransport::new();
            let _ = mock.expect_probe().times(1).returning(|_| Ok(()));
            let _ = mock
                .expect_post()
                .times(1)
                .return_once(move |_, _: Bytes| reply);
            let session = find_session(&mock, &address(&[8080])).await.unwrap();
            assert_eq!(session.separator(), "");
            assert_eq!(session.to_string(), "http://10.10.5.1:8080/c2");
        }
    }

    #[tokio::test]
    async fn against_a_real_listener() {
        let (url, server) = crate::transport::test::serve_once("200 OK", "").await;
        // serve_once only answers one request, so probe success is all we can observe here.
        let t = crate::transport::HttpTransport::new(std::time::Duration::from_secs(5)).unwrap();
        let port: u16 = url
            .trim_start_matches("http://127.0.0.1:")
            .trim_end_matches("/c2")
            .parse()
            .unwrap();
        let addr = DeviceAddress {
            host: "127.0.0.1".into(),
            ports: vec![port],
            path: "/c2".into(),
        };
        let session = find_session(&t, &addr).await.unwrap();
        assert_eq!(session.base_url(), url);
        // The SEP post found nobody listening, so the separator defaulted to empty.
        assert_eq!(session.separator(), "");
        let _ = server.await.unwrap();
    }
}
