//! CLI smoke entry point.
//!
//! # Responsibility
//! - Seed the bundled fixtures and print the pipeline board.
//! - Verify `crm_core` linkage outside of any UI shell.

use crm_core::{
    init_from_config, CrmConfig, CrmServices, EntityStore, StageTransitionEngine, SystemClock,
};
use log::info;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("crm: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), String> {
    let config = CrmConfig::default().with_env_overrides()?;
    if init_from_config(&config)? {
        info!("event=cli_start module=cli status=ok");
    }

    let store = EntityStore::seeded(Arc::new(SystemClock)).map_err(|err| err.to_string())?;
    let services = CrmServices::new(Arc::new(store), config.latency);
    let engine = StageTransitionEngine::new(services.deals.clone());

    println!("crm_core version={}", crm_core::core_version());
    let board = engine.board().await;
    for column in &board.columns {
        println!(
            "{:<12} deals={:<3} total={:.2}",
            column.label, column.count, column.total_value
        );
    }
    println!("pipeline total={:.2}", services.deals.get_total_value().await);
    Ok(())
}
