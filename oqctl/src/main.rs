//! oqctl utility - main entrypoint
// (c) 2026 oqctl developers

use std::process::ExitCode;

fn main() -> ExitCode {
    oqctl::main(std::env::args_os())
}
