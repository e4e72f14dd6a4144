//! Guarded tabular data processing with colourised, multi-sink logging.
//!
//! * [`logging`] – explicitly owned log channels (console, file, writer)
//! * [`data`] – the dataset model, numeric transforms and CSV I/O
//! * [`processor`] – guarded operations that log instead of propagating

pub mod color;
pub mod config;
pub mod data;
pub mod logging;
pub mod processor;

pub use config::ProcessorConfig;
pub use data::{Dataset, Transform, Value};
pub use logging::{ChannelBuilder, LogChannel, Severity};
pub use processor::{DataProcessor, Outcome, RunReport};
