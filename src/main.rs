// SPDX-License-Identifier: MPL-2.0
use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use viewer_session::application::port::SurfaceHandle;
use viewer_session::config::{self, paths, Config};
use viewer_session::infrastructure::{CapabilityScript, EngineScript, SimulatedEngine};
use viewer_session::session::{LocalFile, ViewerSession};

struct Flags {
    config_dir: Option<String>,
    file: Option<PathBuf>,
    capability_after: Option<u32>,
}

fn parse_flags() -> Result<Flags, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    let flags = Flags {
        config_dir: args.opt_value_from_str("--config-dir")?,
        file: args.opt_value_from_str("--file")?,
        capability_after: args.opt_value_from_str("--capability-after")?,
    };
    for unused in args.finish() {
        tracing::warn!(argument = ?unused, "ignoring unknown argument");
    }
    Ok(flags)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let flags = match parse_flags() {
        Ok(flags) => flags,
        Err(err) => {
            eprintln!("viewer-session: {err}");
            return ExitCode::FAILURE;
        }
    };

    paths::init_cli_override(flags.config_dir.clone());
    let (config, warning) = config::load();
    if let Some(key) = warning {
        tracing::warn!(key = %key, "using default configuration");
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("viewer-session: {err}");
            return ExitCode::FAILURE;
        }
    };
    runtime.block_on(run(config, flags))
}

async fn run(config: Config, flags: Flags) -> ExitCode {
    let capability = flags
        .capability_after
        .map_or_else(CapabilityScript::ready, CapabilityScript::after_queries);
    let engine = SimulatedEngine::new(
        EngineScript::new()
            .with_capability(capability)
            .with_annotations(),
    );
    let mut session = ViewerSession::from_config(engine, &config, SurfaceHandle::new("viewer"));

    let mut status = ExitCode::SUCCESS;
    match session.start().await {
        Ok(()) => {
            session.settle().await;
            if let Some(path) = flags.file {
                let loaded = match LocalFile::read(&path) {
                    Ok(file) => session.on_file_selected(file).await.map(|_| ()),
                    Err(err) => Err(err),
                };
                if let Err(err) = loaded {
                    eprintln!("viewer-session: {err}");
                    status = ExitCode::FAILURE;
                }
                session.settle().await;
            }
            tracing::info!(state = %session.state(), "session settled");
            session.teardown();
        }
        Err(err) => {
            eprintln!("viewer-session: {err}");
            status = ExitCode::FAILURE;
        }
    }

    match session.journal().export_json() {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("viewer-session: {err}");
            status = ExitCode::FAILURE;
        }
    }
    status
}
