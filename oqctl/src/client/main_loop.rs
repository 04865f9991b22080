//! Client mode: connect, run one command, disconnect
// (c) 2026 oqctl developers

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use indicatif::{MultiProgress, ProgressBar};
use tracing::{debug, trace_span};

use super::Parameters;
use super::commands::{Frontend, confirm_on_terminal};
use super::progress::spinner_style;
use crate::{
    Controller,
    cli::{DeviceCommand, styles::use_colours},
    config::Configuration,
    transport::HttpTransport,
    util::{self, ConsoleLog, LogSettings},
};

fn setup_tracing(
    display: &MultiProgress,
    parameters: &Parameters,
    config: &Configuration,
) -> anyhow::Result<()> {
    util::setup_tracing(&LogSettings {
        level: util::trace_level(parameters),
        console: ConsoleLog::Progress(display.clone()),
        file: parameters.log_file.as_ref().map(Into::into),
        time_format: config.time_format,
        ansi: use_colours(),
    }) // to provoke error: set RUST_LOG=.
}

/// Main client entrypoint
///
/// # Return value
/// `true` if the requested operation succeeded.
///
// Caution: As we are using ProgressBar, anything to be printed to console should go through it
pub(crate) async fn client_main(
    config: Configuration,
    display: MultiProgress,
    parameters: Parameters,
    command: DeviceCommand,
) -> anyhow::Result<bool> {
    setup_tracing(&display, &parameters, &config)?;
    let _guard = trace_span!("CLIENT").entered();

    let spinner = if parameters.quiet {
        ProgressBar::hidden()
    } else {
        display.add(ProgressBar::new_spinner().with_style(spinner_style()?))
    };
    spinner.enable_steady_tick(Duration::from_millis(150));

    spinner.set_message("Looking for device");
    let transport = Arc::new(HttpTransport::new(config.timeout_duration())?);
    let mut controller = Controller::new(
        transport,
        config.device_address(),
        config.upload_policy(),
    );
    let session = controller
        .connect()
        .await
        .with_context(|| format!("connecting to {}", config.host))?;
    debug!("session {session} (separator {:?})", session.separator());

    let mut frontend = Frontend {
        out: std::io::stdout(),
        spinner: spinner.clone(),
        strict: parameters.strict,
        confirm: &confirm_on_terminal,
    };
    let result = frontend.dispatch(&controller, command).await;

    spinner.set_message("Disconnecting");
    controller.disconnect().await;
    spinner.finish_and_clear();
    result
}
