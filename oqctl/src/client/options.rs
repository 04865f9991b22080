//! Options that apply to a single invocation
// (c) 2026 oqctl developers

use clap::Parser;

#[derive(Debug, Parser, Clone, Default)]
/// Options which may be given on the command line, but are not persistent configuration.
pub struct Parameters {
    /// Enable detailed debug output
    ///
    /// This has the same effect as setting `RUST_LOG=oqctl=debug` in the environment.
    /// If present, `RUST_LOG` overrides this option.
    #[arg(short, long, action, help_heading("Debug"), display_order(0))]
    pub debug: bool,

    /// Log to a file
    ///
    /// By default the log receives everything printed to stderr.
    /// To override this behaviour, set the environment variable `RUST_LOG_FILE_DETAIL` (same semantics as `RUST_LOG`).
    #[arg(
        short('l'),
        long,
        action,
        value_name("FILE"),
        help_heading("Output"),
        next_line_help(true),
        display_order(0)
    )]
    pub log_file: Option<String>,

    /// Quiet mode
    ///
    /// Switches off the spinner; reports only errors
    #[arg(short, long, action, conflicts_with("debug"), help_heading("Output"))]
    pub quiet: bool,

    /// Treat replies the device did not clearly confirm as failures
    ///
    /// The device protocol has no status field. By default any non-empty reply to
    /// `run`, `rm` or `put` counts as success; with this option it must also mention
    /// success (e.g. "executed", "deleted", "uploaded").
    #[arg(long, action, help_heading("Device"))]
    pub strict: bool,
}
