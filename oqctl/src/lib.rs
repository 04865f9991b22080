// (c) 2026 oqctl developers

#![allow(clippy::doc_markdown)]
//! `oqctl` talks to an OverQuack device: a small command-execution gadget that sits on the
//! local network and runs stored scripts ("payloads", `.oqs` files) on demand.
//!
//! ## 📖 Documentation
//!
//! * [Configuring oqctl](config)
//! * [The wire protocol](protocol)
//! * [Using it as a library](controller)
//!
//! ## Overview
//!
//! - 🔎 Finds the device by probing a short list of HTTP ports on a known host
//! - 🤝 Negotiates a session separator, which delimits every command thereafter
//! - 📜 Lists, runs, reads and deletes payloads
//! - 📦 Uploads payloads, checking first that the device has room and retrying large ones
//!
//! ## 🧰 Getting Started
//!
//! * Join the device's network (by default it lives at `10.10.5.1`).
//! * `oqctl ls` lists what's on it.
//! * `oqctl put hello.oqs` uploads a payload; `oqctl run hello.oqs` runs it.
//! * `oqctl --help` lists everything else.
//!
//! Each invocation connects, does one thing and disconnects. Nothing is persisted.
//!
//! ## How it works
//!
//! 1. [Discovery](session::find_session) probes each candidate port in order with a `GET`.
//!    The first that answers wins.
//! 1. A `SEP` command fetches the separator. The device may reply with nothing, in which case
//!    commands are sent undelimited.
//! 1. Every subsequent command is a `POST` of `VERB<sep>argument` to the same endpoint, sent
//!    through a per-device queue so commands never overlap.
//! 1. The reply is plain text with no status field, so it is [classified](protocol::CommandOutcome)
//!    by looking for tell-tale words.
//!
//! #### Limitations
//!
//! - The device's replies are free text. A reply which doesn't say "success" (or similar) may
//!   still mean success, or may be an error message; oqctl cannot tell the two apart.
//!   By default such replies count as success. `--strict` makes them failures.
//! - There is no authentication. Anyone on the network can talk to the device.
//!
//! #### MSRV policy
//!
//! As this is an application crate, the MSRV is not guaranteed to remain stable.
//! The MSRV may be upgraded from time to time to take advantage of new language features.

pub(crate) mod cli;
pub use cli::cli as main;
pub use cli::styles;
pub(crate) mod client;
pub use client::Parameters;

pub mod config;
pub use config::Configuration;

pub mod controller;
pub use controller::Controller;

pub mod error;
pub use error::{Error, Result};

pub mod protocol;
pub mod session;
pub mod transport;
pub(crate) mod util;

mod version;
