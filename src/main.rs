use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use std::io::Write;
use std::process::ExitCode;

mod cli;
mod config;
mod dispatch;
mod error;
mod logging;
mod model;
mod portal;
mod resources;
mod vocab;

use config::PortalConfig;
use dispatch::{render_error, Dispatcher};
use model::Envelope;
use portal::http::HttpPortal;

fn main() -> ExitCode {
    let args = match cli::Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => return finish(&Envelope::Error(err.to_string().trim_end().to_string())),
    };
    let log_settings = args.log_settings();
    logging::init(log_settings);

    let envelope = match connect(&args) {
        Ok(portal) => Dispatcher::new(&portal, log_settings).dispatch(
            args.subcommand.as_deref().unwrap_or_default(),
            &args.params(),
        ),
        Err(err) => Envelope::Error(render_error(&err)),
    };
    finish(&envelope)
}

/// Print the envelope and map it to the process exit code.
fn finish(envelope: &Envelope) -> ExitCode {
    if let Err(err) = emit(envelope) {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }
    if envelope.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn connect(args: &cli::Args) -> Result<HttpPortal> {
    let config = PortalConfig::resolve(&args.config_inputs())?;
    tracing::debug!(?config, "resolved portal config");
    let portal = HttpPortal::login(&config).context("log in to the developer portal")?;
    tracing::info!("logged in");
    Ok(portal)
}

/// Write the envelope as a single JSON line on stdout.
fn emit(envelope: &Envelope) -> Result<()> {
    let text = serde_json::to_string(envelope).context("serialize response envelope")?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}").context("write response envelope")?;
    stdout.flush().context("flush stdout")?;
    Ok(())
}
