use anyhow::{Context, Result};
use logframe::{DataProcessor, Dataset, ProcessorConfig};

fn main() -> Result<()> {
    env_logger::init();

    let dataset = Dataset::from_columns([
        ("A", vec![1, 2, 3, 4, 5]),
        ("B", vec![10, 20, 30, 40, 50]),
    ])
    .context("building the initial dataset")?;

    let config = ProcessorConfig::default();
    let mut processor =
        DataProcessor::from_config(dataset, &config).context("opening the log file")?;

    let report = processor.run();
    log::debug!(
        "run finished: {} steps, {} recoverable, {} fatal",
        report.steps().len(),
        report.recoverable_count(),
        report.fatal_count()
    );
    Ok(())
}
