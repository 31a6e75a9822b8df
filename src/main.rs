//! Run the built-in page routines once each and print their timings.

use std::io::{self, Write};

use anyhow::Context;
use tracing::info;

use page_bench::routines::DEFAULT_CASES;
use page_bench::{Config, Harness, Registry};

fn main() -> anyhow::Result<()> {
    let config = Config::default();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(config.log_level)
        .with_target(false)
        .init();

    let registry = Registry::from_cases(DEFAULT_CASES).context("invalid built-in registry")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = Harness::with_config(config)
        .run(&registry, &mut out)
        .context("benchmark run failed")?;
    out.flush().context("failed to flush stdout")?;

    info!(
        tests = report.records.len(),
        counter = %report.counter,
        "done"
    );
    Ok(())
}
