use std::path::PathBuf;

use env_logger::WriteStyle;

use crate::logging::Severity;

/// Construction parameters for a [`DataProcessor`](crate::processor::DataProcessor).
///
/// All values are fixed in code; there is no file or environment lookup.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    pub logger_name: String,
    /// Plain-text log file; `None` logs to the console only.
    pub log_file: Option<PathBuf>,
    /// Destination of the final persist step of `run`.
    pub output_file: PathBuf,
    pub min_severity: Severity,
    pub console_style: WriteStyle,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            logger_name: "DataProcessorLogger".to_string(),
            log_file: Some(PathBuf::from("data_processing.log")),
            output_file: PathBuf::from("output_data.csv"),
            min_severity: Severity::Debug,
            console_style: WriteStyle::Auto,
        }
    }
}
