//! Command verbs and their wire encoding
// (c) 2026 oqctl developers

use bytes::{BufMut as _, Bytes, BytesMut};

/// A command verb understood by the device.
///
/// The wire representation is the upper-case name (`FREE_MEM` for [`Verb::FreeMem`]).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::VariantArray,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Verb {
    /// Negotiates the session separator. The reply _is_ the separator.
    Sep,
    /// Lists the payloads stored on the device
    Ls,
    /// Executes a payload
    Run,
    /// Returns the content of a payload
    Read,
    /// Removes a payload
    Delete,
    /// Stores a payload
    Write,
    /// Reports the device's free memory, in bytes
    FreeMem,
}

impl Verb {
    /// Does this verb take an argument on the wire?
    #[must_use]
    pub fn takes_argument(self) -> bool {
        matches!(self, Verb::Run | Verb::Read | Verb::Delete | Verb::Write)
    }

    /// The verb as sent on the wire
    #[must_use]
    pub fn as_wire(self) -> &'static str {
        self.into()
    }
}

/// A single command, ready to be encoded against a session separator.
///
/// Commands are ephemeral: constructed, sent, discarded.
/// Arguments are kept as separate parts; on the wire every part is preceded by the separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    verb: Verb,
    parts: Vec<Bytes>,
}

impl Command {
    fn bare(verb: Verb) -> Self {
        debug_assert!(!verb.takes_argument());
        Self {
            verb,
            parts: Vec::new(),
        }
    }

    fn with_name(verb: Verb, name: &str) -> Self {
        Self {
            verb,
            parts: vec![Bytes::copy_from_slice(name.as_bytes())],
        }
    }

    /// `SEP`
    #[must_use]
    pub fn sep() -> Self {
        Self::bare(Verb::Sep)
    }
    /// `LS`
    #[must_use]
    pub fn ls() -> Self {
        Self::bare(Verb::Ls)
    }
    /// `FREE_MEM`
    #[must_use]
    pub fn free_mem() -> Self {
        Self::bare(Verb::FreeMem)
    }
    /// `RUN <name>`
    #[must_use]
    pub fn run(name: &str) -> Self {
        Self::with_name(Verb::Run, name)
    }
    /// `READ <name>`
    #[must_use]
    pub fn read(name: &str) -> Self {
        Self::with_name(Verb::Read, name)
    }
    /// `DELETE <name>`
    #[must_use]
    pub fn delete(name: &str) -> Self {
        Self::with_name(Verb::Delete, name)
    }

    /// `WRITE <filename> \n<content>`
    ///
    /// The content follows a literal newline, so the separator appears exactly once
    /// between the verb and filename and once between the filename and the newline.
    #[must_use]
    pub fn write(filename: &str, content: &[u8]) -> Self {
        let mut body = BytesMut::with_capacity(content.len() + 1);
        body.put_u8(b'\n');
        body.put_slice(content);
        Self {
            verb: Verb::Write,
            parts: vec![Bytes::copy_from_slice(filename.as_bytes()), body.freeze()],
        }
    }

    /// Accessor
    #[must_use]
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Encodes this command for the wire
    #[must_use]
    pub fn encode(&self, separator: &str) -> Bytes {
        let verb = self.verb.as_wire();
        let len = verb.len()
            + self
                .parts
                .iter()
                .map(|p| separator.len() + p.len())
                .sum::<usize>();
        let mut out = BytesMut::with_capacity(len);
        out.put_slice(verb.as_bytes());
        for part in &self.parts {
            out.put_slice(separator.as_bytes());
            out.put_slice(part);
        }
        out.freeze()
    }

    /// Number of bytes in the command's arguments
    #[must_use]
    pub fn argument_len(&self) -> usize {
        self.parts.iter().map(Bytes::len).sum()
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.parts.first() {
            None => write!(f, "{}", self.verb),
            Some(first) if self.parts.len() == 1 => {
                write!(f, "{} {}", self.verb, String::from_utf8_lossy(first))
            }
            Some(first) => write!(
                f,
                "{} {} (+{} bytes)",
                self.verb,
                String::from_utf8_lossy(first),
                self.argument_len() - first.len()
            ),
        }
    }
}
