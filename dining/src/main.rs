use dining::{spawn_table, SimulationConfig};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "dining=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SimulationConfig::from_env()?;
    info!(
        seats = config.seats,
        tick_limit = config.tick_limit,
        seed = ?config.seed,
        "Seating the table"
    );

    let table = spawn_table(&config).await?;
    let conductor = table.conductor.clone();
    table.start().await?;

    let wait = table.wait();
    tokio::pin!(wait);
    let report = tokio::select! {
        report = &mut wait => report?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Ctrl-C received, stopping the table");
            dining::shutdown(&conductor);
            wait.await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.outcome.is_clean() {
        anyhow::bail!("run {} ended with {:?}", report.run_id, report.outcome);
    }
    Ok(())
}
