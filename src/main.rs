use espflow::configuration::get_configuration;
use espflow::telemetry::get_subscriber;
use espflow::telemetry::init_subscriber;
use espflow::workflow::WorkflowRunner;

/// Initialise telemetry, load config, run the fifteen steps once, exit zero.
/// Step failures are printed by the runner and never propagate; the only
/// fatal error is unusable configuration.
#[tokio::main] // requires tokio features: macros, rt-multi-thread
async fn main() -> Result<(), anyhow::Error> {
    // the step summaries go to stdout via plain prints; the subscriber is
    // kept at `warn` so bunyan lines only show up for failures and skips
    // (override with RUST_LOG)
    let subscriber = get_subscriber("espflow", "warn", std::io::stdout);
    init_subscriber(subscriber);

    let cfg = get_configuration()?;

    let mut runner = WorkflowRunner::new(cfg.esp.client());
    runner.run().await;

    Ok(())
}
