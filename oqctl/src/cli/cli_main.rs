//! Main CLI for oqctl
// (c) 2026 oqctl developers

use std::ffi::OsString;
use std::process::ExitCode;

use super::args::{CliArgs, MainMode};
use crate::{
    cli::styles::{configure_colours, error, use_colours},
    client::{MAX_UPDATE_FPS, Parameters},
    config::{Configuration, Manager},
};

use anyhow::Result;
use indicatif::{MultiProgress, ProgressDrawTarget};

/// Main CLI entrypoint
///
/// Call this from `main`, passing the arguments to use.
/// Normally you will call `cli(std::env::args_os())` but you can pass in alternate arguments for CLI testing.
///
/// # Safety
/// - This function starts a tokio runtime and performs work in it.
/// - This function is not safe to call from multi-threaded code.
#[must_use]
pub fn cli<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    #[allow(clippy::match_bool)] // improved readability
    cli_inner(args)
        .inspect_err(|e| {
            if crate::util::tracing_is_initialised() {
                tracing::error!("{e:#}");
            } else {
                let style = error();
                eprintln!("{style}Error:{style:#} {e:#}");
            }
        })
        .map_or(ExitCode::FAILURE, |success| match success {
            true => ExitCode::SUCCESS,
            false => ExitCode::FAILURE,
        })
}

/// Inner CLI logic
///
/// # Return
/// true indicates success. false indicates a failure where the callee has output to stderr.
fn cli_inner<I, T>(args: I) -> Result<bool>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let Some(args) = parse_args(args)? else {
        return Ok(true); // help/version shown; exit
    };

    // Now fold the arguments in with the config sources (which may fail)
    // (to provoke an error here: `OQCTL_TIMEOUT=soon oqctl ls`)
    let config_manager = Manager::try_from(&*args)?;
    setup_colours(&config_manager)?;

    let mode = args.mode()?;
    handle_mode(mode, config_manager, args.client_params)
}

fn parse_args<I, T>(args: I) -> Result<Option<Box<CliArgs>>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    use clap::error::ErrorKind::{DisplayHelp, DisplayVersion};
    match CliArgs::custom_parse(args) {
        Ok(args) => Ok(Some(Box::new(args))),
        Err(e) if matches!(e.kind(), DisplayHelp | DisplayVersion) => {
            let message = e.render();
            if use_colours() {
                println!("{}", message.ansi());
            } else {
                println!("{message}");
            }
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn setup_colours(manager: &Manager) -> Result<()> {
    let colour_mode = manager.get_color(Some(Configuration::system_default().color))?;
    configure_colours(colour_mode);
    Ok(())
}

// MODE HANDLERS ///////////////////////////////////////////////////////////

#[tokio::main(flavor = "current_thread")]
async fn handle_mode(
    mode: MainMode,
    config_manager: Manager,
    client_params: Parameters,
) -> Result<bool> {
    match mode {
        MainMode::ShowConfigFiles => {
            println!("{:?}", Manager::config_files());
            Ok(true)
        }
        MainMode::ShowConfig => show_config(&config_manager),
        MainMode::Device(command) => {
            let config = config_manager.configuration()?;
            let progress =
                MultiProgress::with_draw_target(ProgressDrawTarget::stderr_with_hz(MAX_UPDATE_FPS));
            crate::client::client_main(config, progress, client_params, command).await
        }
    }
}

fn show_config(config_manager: &Manager) -> Result<bool> {
    println!("{}", show_config_data(config_manager));
    let _ = config_manager.configuration()?;
    Ok(true)
}
fn show_config_data(config_manager: &Manager) -> String {
    let mut mgr = config_manager.clone();
    mgr.apply_system_default();
    format!("Configuration:\n{}", mgr.to_display_adapter())
}
