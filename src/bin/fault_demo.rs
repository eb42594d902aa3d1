use anyhow::Context;
use fault_demonstrator::{init_logging, DemoConfig, Demonstrator};
use std::io::{self, IsTerminal, Write};

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = DemoConfig::load().context("loading configuration")?;
    let stdout = io::stdout();
    let colors = config.use_colors(stdout.is_terminal());

    let mut out = stdout.lock();
    let summary = Demonstrator::new(config)
        .with_colors(colors)
        .run_all(&mut out)
        .context("running fault demonstrations")?;
    out.flush()?;

    tracing::info!(
        scenarios = summary.scenario_count(),
        cleanup = summary.cleanup_count(),
        "demonstration finished"
    );
    Ok(())
}
