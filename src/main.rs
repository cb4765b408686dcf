//! kwinjump - activate, cycle or launch from a keyboard shortcut
//!
//! Loads a generated script into KWin to focus the windows matching the
//! given filter, and launches a fallback command when none match.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use kwinjump::backend;
use kwinjump::cli::Args;
use kwinjump::error::JumpError;
use kwinjump::orchestrator::Orchestrator;
use kwinjump::script::{self, ScriptParams};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // stderr only: stdout belongs to the fallback command and --print-script
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> anyhow::Result<()> {
    // Reject bad arguments before touching the bus
    args.validate()?;
    let invocation = args.invocation();

    if args.print_script {
        let callback = invocation.fallback.as_ref().map(|_| ":1.0");
        let source = script::render(&ScriptParams::new(&invocation.filter, callback))
            .map_err(JumpError::from)?;
        print!("{}", source);
        return Ok(());
    }

    let host = backend::connect().await.map_err(JumpError::Connect)?;
    let orchestrator = Orchestrator::new(Arc::new(host), args.orchestrator_config());

    tracing::debug!(?invocation, "Starting invocation");
    let outcome = orchestrator.run(&invocation).await?;

    if let Some(e) = &outcome.launch_error {
        eprintln!("ERROR: launch command: {}", e);
    }

    outcome.settle().await;
    Ok(())
}
