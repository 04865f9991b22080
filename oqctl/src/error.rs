//! Error taxonomy for device operations
// (c) 2026 oqctl developers

use crate::protocol::Verb;

/// Failures a device operation can report.
///
/// None of these is fatal; every operation may simply be invoked again.
/// The variants carry enough structure for a front end to render a message
/// without picking apart a string.
///
/// Note that an upload which exceeds the safe memory budget is _not_ an error;
/// see [`UploadOutcome::SizeExceeded`](crate::session::UploadOutcome::SizeExceeded).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The request did not complete. Connection refused, timeouts and malformed
    /// HTTP responses all end up here; the cause is only logged.
    #[error("no response from device")]
    TransportFailure,

    /// Discovery probed every candidate port without reaching the device.
    #[error("could not reach device on any of ports {ports:?}")]
    NoReachableEndpoint {
        /// The ports that were probed, in order
        ports: Vec<u16>,
    },

    /// The device replied, but we could not tell whether it meant success.
    #[error("{verb} reply was ambiguous: {raw}")]
    ProtocolAmbiguous {
        /// The command concerned
        verb: Verb,
        /// The reply text
        raw: String,
    },

    /// The device replied with nothing at all.
    #[error("{verb} failed: device sent an empty reply")]
    EmptyResponse {
        /// The command concerned
        verb: Verb,
    },

    /// FREE_MEM got no reply, so no upload budget can be computed.
    #[error("failed to get free memory from device")]
    MemoryQueryFailed,

    /// FREE_MEM replied with something that isn't a byte count.
    #[error("invalid memory response from device: {raw:?}")]
    InvalidMemoryResponse {
        /// The reply text
        raw: String,
    },

    /// Only `.oqs` payloads may be uploaded. Detected locally.
    #[error("{filename} is not a .oqs payload")]
    InvalidFileType {
        /// The rejected filename
        filename: String,
    },

    /// The operation needs a connected device.
    #[error("not connected to a device")]
    NotConnected,
}

/// Result alias for device operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::Error;
    use crate::protocol::Verb;

    #[test]
    fn messages_carry_detail() {
        let e = Error::NoReachableEndpoint {
            ports: vec![80, 8000],
        };
        assert_eq!(
            e.to_string(),
            "could not reach device on any of ports [80, 8000]"
        );
        let e = Error::EmptyResponse { verb: Verb::Delete };
        assert_eq!(e.to_string(), "DELETE failed: device sent an empty reply");
        let e = Error::InvalidMemoryResponse { raw: "lots".into() };
        assert!(e.to_string().contains("\"lots\""));
    }
}
