// (c) 2026 oqctl developers

//! 📖 The device command protocol
//!
//! ## Transport
//!
//! Every command is a single HTTP `POST` to `http://{host}:{port}/c2` with
//! `Content-Type: text/plain` and `Connection: keep-alive`.
//! The request body is the encoded command; the response body is the reply.
//! There is no authentication, no status envelope and no framing beyond HTTP itself.
//!
//! ## Session separator
//!
//! Before anything else, the client sends `SEP` (with no separator, since none is known yet).
//! The reply is the separator string the device wants between a verb and its argument.
//! It may be empty, in which case verb and argument are simply concatenated.
//!
//! ## Commands
//!
//! | Operation | Wire form |
//! |---|---|
//! | negotiate separator | `SEP` |
//! | list payloads | `LS` |
//! | run payload | `RUN{sep}{name}` |
//! | read payload content | `READ{sep}{name}` |
//! | delete payload | `DELETE{sep}{name}` |
//! | upload payload | `WRITE{sep}{name}{sep}\n{content}` |
//! | query free memory | `FREE_MEM` |
//!
//! Payload names end in `.oqs`.
//!
//! ## Replies
//!
//! Replies are free text. `LS` returns names separated by commas or line breaks
//! (see [`parse_listing`]); `FREE_MEM` returns a decimal byte count; `READ` returns the payload.
//! For the other commands the device says something human-readable, and the client has to
//! guess whether it worked; see [`CommandOutcome`] for how that guess is made.

mod command;
pub use command::{Command, Verb};

mod listing;
pub use listing::parse_listing;

mod outcome;
pub use outcome::{Classifier, CommandOutcome};

mod payload;
pub use payload::{PAYLOAD_EXTENSION, has_payload_extension, is_valid_payload_name, upload_name};
