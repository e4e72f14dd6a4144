//! Guarded operations over a single owned [`Dataset`].
//!
//! Every public operation runs its body, turns any failure into an
//! [`Outcome`] and logs it on the processor's channel. Nothing propagates
//! past an operation and nothing aborts the process.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ProcessorConfig;
use crate::data::{writer, DataError, Dataset, Transform, Value};
use crate::logging::{LogChannel, Severity};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Failures an operation can report.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,

    #[error("transform panicked: {0}")]
    Panicked(String),
}

/// Result of one guarded operation.
#[must_use]
#[derive(Debug)]
pub enum Outcome {
    Success,
    /// Logged at `WARNING`; the run carries on.
    Recoverable(StepError),
    /// Logged at `CRITICAL`; the run still carries on.
    Fatal(StepError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, Outcome::Recoverable(_))
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Outcome::Fatal(_))
    }

    pub fn error(&self) -> Option<&StepError> {
        match self {
            Outcome::Success => None,
            Outcome::Recoverable(err) | Outcome::Fatal(err) => Some(err),
        }
    }
}

/// One entry of a [`RunReport`].
#[derive(Debug)]
pub struct StepReport {
    pub step: &'static str,
    pub outcome: Outcome,
}

/// Per-step outcomes of [`DataProcessor::run`], in execution order.
#[derive(Debug, Default)]
pub struct RunReport {
    steps: Vec<StepReport>,
}

impl RunReport {
    fn record(&mut self, step: &'static str, outcome: Outcome) {
        self.steps.push(StepReport { step, outcome });
    }

    pub fn steps(&self) -> &[StepReport] {
        &self.steps
    }

    pub fn recoverable_count(&self) -> usize {
        self.steps.iter().filter(|s| s.outcome.is_recoverable()).count()
    }

    pub fn fatal_count(&self) -> usize {
        self.steps.iter().filter(|s| s.outcome.is_fatal()).count()
    }
}

// ---------------------------------------------------------------------------
// Operation – what gets logged around each guarded body
// ---------------------------------------------------------------------------

enum Operation<'a> {
    AddColumn { column: &'a str },
    Transform { column: &'a str, function: &'a str },
    Persist { path: &'a Path },
    ForcedFault,
}

impl Operation<'_> {
    fn started(&self) -> String {
        match self {
            Operation::AddColumn { column } => format!("Adding column '{column}'."),
            Operation::Transform { column, function } => {
                format!("Applying function '{function}' to column '{column}'.")
            }
            Operation::Persist { path } => format!("Saving dataset to '{}'.", path.display()),
            Operation::ForcedFault => "Forcing a critical error: division by zero.".to_string(),
        }
    }

    fn succeeded(&self) -> String {
        match self {
            Operation::AddColumn { column } => format!("Column '{column}' added."),
            Operation::Transform { column, function } => {
                format!("Function '{function}' applied to column '{column}'.")
            }
            Operation::Persist { path } => format!("Dataset saved to '{}'.", path.display()),
            Operation::ForcedFault => "Forced fault did not trigger.".to_string(),
        }
    }

    /// `WARNING` for failures the operation anticipates, `CRITICAL` otherwise.
    fn severity_of(&self, err: &StepError) -> Severity {
        match (self, err) {
            (Operation::AddColumn { .. }, _) => Severity::Warning,
            (Operation::Transform { .. }, StepError::Data(DataError::ColumnNotFound(_))) => {
                Severity::Warning
            }
            (Operation::Persist { .. }, StepError::Data(e)) if e.is_permission_denied() => {
                Severity::Warning
            }
            _ => Severity::Critical,
        }
    }

    fn failed(&self, err: &StepError, severity: Severity) -> String {
        match self {
            Operation::AddColumn { column } => format!("Could not add column '{column}': {err}"),
            Operation::Transform { column, .. } if severity < Severity::Critical => {
                format!("Column '{column}' not found: {err}")
            }
            Operation::Transform { column, function } => {
                format!("Critical error applying function '{function}' to column '{column}': {err}")
            }
            Operation::Persist { .. } if severity < Severity::Critical => {
                format!("Could not save file (permission denied): {err}")
            }
            Operation::Persist { path } => {
                format!("Critical error saving '{}': {err}", path.display())
            }
            Operation::ForcedFault => format!("Forced critical error: {err}"),
        }
    }
}

// ---------------------------------------------------------------------------
// DataProcessor
// ---------------------------------------------------------------------------

/// Owns one dataset and one log channel; every mutation is guarded.
pub struct DataProcessor {
    dataset: Dataset,
    channel: LogChannel,
    output_path: PathBuf,
}

impl fmt::Debug for DataProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataProcessor")
            .field("columns", &self.dataset.column_names())
            .field("rows", &self.dataset.len())
            .field("channel", &self.channel)
            .field("output_path", &self.output_path)
            .finish()
    }
}

impl DataProcessor {
    pub fn new(dataset: Dataset, channel: LogChannel) -> Self {
        channel.info(format!(
            "DataProcessor initialised with {} columns and {} rows.",
            dataset.num_columns(),
            dataset.len()
        ));
        Self {
            dataset,
            channel,
            output_path: ProcessorConfig::default().output_file,
        }
    }

    /// Build the console (and optional file) channel described by `config`.
    pub fn from_config(dataset: Dataset, config: &ProcessorConfig) -> std::io::Result<Self> {
        let mut builder = LogChannel::builder(config.logger_name.clone())
            .min_severity(config.min_severity)
            .console(config.console_style);
        if let Some(log_file) = &config.log_file {
            builder = builder.file(log_file)?;
        }
        Ok(Self::new(dataset, builder.build()).with_output_path(config.output_file.clone()))
    }

    /// Destination used by the persist step of [`run`](Self::run).
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }

    pub fn channel(&self) -> &LogChannel {
        &self.channel
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Assign `values` to column `name`; a failed assignment leaves the
    /// dataset unchanged.
    pub fn add_column<V: Into<Value>>(&mut self, name: &str, values: Vec<V>) -> Outcome {
        let op = Operation::AddColumn { column: name };
        self.channel.debug(op.started());
        let values = values.into_iter().map(Into::into).collect();
        let result = self.dataset.set_column(name, values).map_err(StepError::from);
        self.report(op, result)
    }

    /// Write `transform` applied to column `name` into `<name>_transformed`.
    pub fn apply_transform(&mut self, name: &str, transform: &Transform) -> Outcome {
        let op = Operation::Transform {
            column: name,
            function: transform.name(),
        };
        self.channel.debug(op.started());
        let result = transform_column(&mut self.dataset, name, transform);
        self.report(op, result)
    }

    /// Serialize the dataset as CSV at `path`.
    pub fn persist(&mut self, path: &Path) -> Outcome {
        let op = Operation::Persist { path };
        self.channel.debug(op.started());
        let result = writer::write_csv(&self.dataset, path).map_err(StepError::from);
        self.report(op, result)
    }

    /// Evaluate `1 / 0` under the guard. Always reported as fatal.
    pub fn provoke_division_by_zero(&mut self) -> Outcome {
        let op = Operation::ForcedFault;
        self.channel.debug(op.started());
        let result = checked_divide(1, 0).map(|_| ());
        self.report(op, result)
    }

    /// The demonstration sequence. Every step runs regardless of the
    /// outcome of the previous one; persisting is always the last step.
    pub fn run(&mut self) -> RunReport {
        self.channel.info("Starting data processing.");
        let mut report = RunReport::default();

        let outcome = self.add_column("NewColumn", vec![1, 2, 3, 4, 5]);
        report.record("add_column", outcome);

        let outcome = self.apply_transform("NewColumn", &Transform::sqrt());
        report.record("apply_transform", outcome);

        let outcome = self.apply_transform("NonExistentColumn", &Transform::ln());
        report.record("apply_transform_missing", outcome);

        let outcome = self.provoke_division_by_zero();
        report.record("division_by_zero", outcome);

        let output = self.output_path.clone();
        let outcome = self.persist(&output);
        report.record("persist", outcome);

        self.channel.info("Data processing finished.");
        report
    }

    fn report(&mut self, op: Operation<'_>, result: Result<(), StepError>) -> Outcome {
        match result {
            Ok(()) => {
                self.channel.info(op.succeeded());
                Outcome::Success
            }
            Err(err) => {
                let severity = op.severity_of(&err);
                self.channel.log(severity, op.failed(&err, severity));
                if severity >= Severity::Critical {
                    Outcome::Fatal(err)
                } else {
                    Outcome::Recoverable(err)
                }
            }
        }
    }
}

fn transform_column(
    dataset: &mut Dataset,
    column: &str,
    transform: &Transform,
) -> Result<(), StepError> {
    let values = dataset.column(column)?;
    let transformed = panic::catch_unwind(AssertUnwindSafe(|| transform.apply(column, values)))
        .map_err(|payload| StepError::Panicked(panic_message(payload.as_ref())))??;
    dataset.set_column(&format!("{column}_transformed"), transformed)?;
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn checked_divide(numerator: i64, denominator: i64) -> Result<i64, StepError> {
    if denominator == 0 {
        return Err(StepError::DivisionByZero);
    }
    numerator.checked_div(denominator).ok_or(StepError::Overflow)
}
