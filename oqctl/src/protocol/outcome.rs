//! Interpretation of device replies
// (c) 2026 oqctl developers

use super::Verb;
use crate::error::{Error, Result};

/// A device reply, classified.
///
/// The wire protocol has no status field, so the best we can do is look for
/// tell-tale words. Each operation supplies its own [`Classifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The reply contained a positive keyword (or, for `READ`, any content at all)
    Success(String),
    /// The reply had content, but nothing that confirms success.
    ///
    /// Device error messages land here too.
    AmbiguousNonEmpty(String),
    /// The device replied with an empty body
    Empty,
    /// No reply: the transport failed or the request was cancelled
    TransportFailed,
}

impl CommandOutcome {
    /// Permissive success test.
    ///
    /// **Caution:** any non-empty reply counts as success. The protocol gives us no way to tell a
    /// device-side error message from a confirmation, so this deliberately errs on the side of
    /// success. Use [`CommandOutcome::is_confirmed`] or [`CommandOutcome::into_strict_result`]
    /// where that matters.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_) | Self::AmbiguousNonEmpty(_))
    }

    /// Strict success test: only a reply containing a positive keyword qualifies.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The reply text, if there was any
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Success(s) | Self::AmbiguousNonEmpty(s) => Some(s.as_str()),
            Self::Empty => Some(""),
            Self::TransportFailed => None,
        }
    }

    /// Converts to a Result using the permissive rule
    pub fn into_result(self, verb: Verb) -> Result<String> {
        match self {
            Self::Success(s) | Self::AmbiguousNonEmpty(s) => Ok(s),
            Self::Empty => Err(Error::EmptyResponse { verb }),
            Self::TransportFailed => Err(Error::TransportFailure),
        }
    }

    /// Converts to a Result, treating an unconfirmed reply as [`Error::ProtocolAmbiguous`]
    pub fn into_strict_result(self, verb: Verb) -> Result<String> {
        match self {
            Self::AmbiguousNonEmpty(raw) => Err(Error::ProtocolAmbiguous { verb, raw }),
            other => other.into_result(verb),
        }
    }
}

/// Reply classification rules for one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    /// Words that confirm success, matched case-insensitively anywhere in the reply
    keywords: &'static [&'static str],
    /// If set, any non-empty reply is a confirmed success
    content_is_success: bool,
}

impl Classifier {
    const fn keywords(keywords: &'static [&'static str]) -> Self {
        Self {
            keywords,
            content_is_success: false,
        }
    }

    /// `RUN`
    pub const RUN: Self = Self::keywords(&["success", "executed"]);
    /// `DELETE`
    pub const DELETE: Self = Self::keywords(&["success", "deleted"]);
    /// `WRITE`
    pub const WRITE: Self = Self::keywords(&["success", "uploaded", "written"]);
    /// Commands whose reply _is_ the data (`READ`, `LS`, `FREE_MEM`, `SEP`)
    pub const CONTENT: Self = Self {
        keywords: &[],
        content_is_success: true,
    };

    /// Classifies a raw reply (`None` means there was no reply)
    #[must_use]
    pub fn classify(&self, raw: Option<String>) -> CommandOutcome {
        let Some(raw) = raw else {
            return CommandOutcome::TransportFailed;
        };
        if raw.is_empty() {
            return CommandOutcome::Empty;
        }
        if self.content_is_success {
            return CommandOutcome::Success(raw);
        }
        let lower = raw.to_lowercase();
        if self.keywords.iter().any(|kw| lower.contains(kw)) {
            CommandOutcome::Success(raw)
        } else {
            CommandOutcome::AmbiguousNonEmpty(raw)
        }
    }
}

impl Verb {
    /// The classification rules that apply to this verb's replies
    #[must_use]
    pub fn classifier(self) -> Classifier {
        match self {
            Verb::Run => Classifier::RUN,
            Verb::Delete => Classifier::DELETE,
            Verb::Write => Classifier::WRITE,
            Verb::Read | Verb::Ls | Verb::FreeMem | Verb::Sep => Classifier::CONTENT,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Classifier, CommandOutcome};
    use crate::{error::Error, protocol::Verb};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[rstest]
    #[case(Verb::Run, "Payload EXECUTED")]
    #[case(Verb::Run, "Success")]
    #[case(Verb::Delete, "file deleted")]
    #[case(Verb::Write, "Uploaded 10 bytes")]
    #[case(Verb::Write, "written OK")]
    #[case(Verb::Read, "STRING hello")]
    fn confirmed(#[case] verb: Verb, #[case] reply: &str) {
        let out = verb.classifier().classify(some(reply));
        assert_eq!(out, CommandOutcome::Success(reply.into()));
        assert!(out.is_confirmed());
        assert!(out.is_success());
    }

    #[rstest]
    #[case(Verb::Run, "file deleted")]
    #[case(Verb::Delete, "Error: no such file")]
    #[case(Verb::Write, "GPIO5 not connected")]
    fn ambiguous_is_still_success(#[case] verb: Verb, #[case] reply: &str) {
        let out = verb.classifier().classify(some(reply));
        assert_eq!(out, CommandOutcome::AmbiguousNonEmpty(reply.into()));
        assert!(out.is_success());
        assert!(!out.is_confirmed());
        assert_eq!(out.clone().into_result(verb).unwrap(), reply);
        assert_eq!(
            out.into_strict_result(verb).unwrap_err(),
            Error::ProtocolAmbiguous {
                verb,
                raw: reply.into()
            }
        );
    }

    #[test]
    fn empty_and_absent() {
        let c = Classifier::DELETE;
        let empty = c.classify(some(""));
        assert_eq!(empty, CommandOutcome::Empty);
        assert!(!empty.is_success());
        assert_eq!(empty.raw(), Some(""));
        assert_eq!(
            empty.into_result(Verb::Delete).unwrap_err(),
            Error::EmptyResponse { verb: Verb::Delete }
        );

        let none = c.classify(None);
        assert_eq!(none, CommandOutcome::TransportFailed);
        assert!(!none.is_success());
        assert_eq!(none.raw(), None);
        assert_eq!(
            none.into_strict_result(Verb::Delete).unwrap_err(),
            Error::TransportFailure
        );
    }
}
