//! Client mode: the command-line front end to a [`Controller`](crate::Controller)
// (c) 2026 oqctl developers

mod options;
pub use options::Parameters;

mod commands;
mod main_loop;
pub(crate) mod progress;

pub(crate) use main_loop::client_main;

pub(crate) use progress::MAX_UPDATE_FPS;
