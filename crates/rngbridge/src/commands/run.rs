//! `rngbridge run`: the long-running bridge service.

use tracing::{info, warn};

use rngbridge_core::{Bridge, BridgeConfig, CycleOutcome};

use crate::bus;
use crate::cli::RunArgs;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: &RunArgs, config: BridgeConfig) -> Result<(), CliError> {
    let endpoint = config.base_url.clone();
    let mut bridge =
        Bridge::connect(config).map_err(|e| CliError::at_endpoint(e, endpoint.as_str()))?;

    if args.once {
        let outcome = bridge.run_once().await?;
        let rows = output::property_rows(
            bridge.store(),
            bridge.store().paths().iter().map(String::as_str),
        )?;
        output::print_output(&format!(
            "{}\n{}",
            describe(outcome),
            output::render_table(&rows)
        ));
        return Ok(());
    }

    let adapter = bus::spawn(bridge.store(), bridge.service_name());
    bridge.start()?;
    info!(service = %bridge.service_name(), "bridge running; Ctrl-C to stop");

    shutdown_signal().await;
    info!("shutdown requested");

    bridge.shutdown().await;
    adapter.abort();
    Ok(())
}

fn describe(outcome: CycleOutcome) -> String {
    match outcome {
        CycleOutcome::Published { update_index } => {
            format!("Cycle published device values (update index {update_index})")
        }
        CycleOutcome::Recovered {
            fault,
            update_index,
        } => format!("Device unavailable ({fault}); published defaults (update index {update_index})"),
        CycleOutcome::Aborted => "Cycle aborted; nothing published".into(),
    }
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "could not listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
