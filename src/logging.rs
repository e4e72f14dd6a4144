use std::fmt;
use std::io::{self, IsTerminal};
use std::path::Path;

use chrono::Local;
use env_logger::WriteStyle;
use tracing::{Dispatch, Event, Subscriber};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields, MakeWriter},
    layer::SubscriberExt as _,
    registry::LookupSpan,
    Layer, Registry,
};

use crate::color::SeverityPalette;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Target of every event a [`LogChannel`] emits.
const CHANNEL_TARGET: &str = "logframe::channel";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Ordered log level; `Critical` is the highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        [
            Severity::Debug,
            Severity::Info,
            Severity::Warning,
            Severity::Error,
            Severity::Critical,
        ]
        .into_iter()
        .find(|s| s.label() == label)
    }

    /// `tracing` has no level above `ERROR`; `Critical` shares it and is
    /// told apart by the `severity` field.
    fn from_level(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::ERROR => Severity::Error,
            tracing::Level::WARN => Severity::Warning,
            tracing::Level::INFO => Severity::Info,
            _ => Severity::Debug,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Formatter
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ChannelVisitor {
    message: String,
    severity: Option<Severity>,
}

impl tracing::field::Visit for ChannelVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "severity" => self.severity = Severity::from_label(value),
            _ => {}
        }
    }
}

/// `<timestamp> - <SEVERITY> - <message>`, painted when the layer writes ANSI.
struct ChannelFormatter {
    palette: SeverityPalette,
}

impl<S, N> FormatEvent<S, N> for ChannelFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = ChannelVisitor::default();
        event.record(&mut visitor);
        let severity = visitor
            .severity
            .unwrap_or_else(|| Severity::from_level(event.metadata().level()));

        let line = format_line(
            &Local::now().format(TIMESTAMP_FORMAT),
            severity,
            &visitor.message,
        );
        if writer.has_ansi_escapes() {
            writeln!(writer, "{}", self.palette.paint(severity, &line))
        } else {
            writeln!(writer, "{line}")
        }
    }
}

fn format_line(
    timestamp: &impl fmt::Display,
    severity: Severity,
    message: &impl fmt::Display,
) -> String {
    format!("{timestamp} - {} - {message}", severity.label())
}

// ---------------------------------------------------------------------------
// LogChannel
// ---------------------------------------------------------------------------

/// A named logging channel: a minimum severity plus its sink layers.
///
/// The channel owns its own `tracing` dispatcher and only enters it for the
/// duration of each call, so nothing is installed globally and building the
/// same name twice yields two independent channels.
pub struct LogChannel {
    name: String,
    min_severity: Severity,
    dispatch: Dispatch,
    sinks: Vec<String>,
}

impl fmt::Debug for LogChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogChannel")
            .field("name", &self.name)
            .field("min_severity", &self.min_severity)
            .field("sinks", &self.sinks)
            .finish()
    }
}

impl LogChannel {
    pub fn builder(name: impl Into<String>) -> ChannelBuilder {
        ChannelBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_severity(&self) -> Severity {
        self.min_severity
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.min_severity
    }

    /// Emit `message` to every sink of this channel.
    pub fn log(&self, severity: Severity, message: impl fmt::Display) {
        if !self.enabled(severity) {
            return;
        }
        tracing::dispatcher::with_default(&self.dispatch, || emit(severity, &message));
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Severity::Debug, message);
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.log(Severity::Info, message);
    }

    pub fn warning(&self, message: impl fmt::Display) {
        self.log(Severity::Warning, message);
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.log(Severity::Error, message);
    }

    pub fn critical(&self, message: impl fmt::Display) {
        self.log(Severity::Critical, message);
    }
}

fn emit(severity: Severity, message: &dyn fmt::Display) {
    let label = severity.label();
    match severity {
        Severity::Debug => tracing::debug!(target: CHANNEL_TARGET, severity = label, "{message}"),
        Severity::Info => tracing::info!(target: CHANNEL_TARGET, severity = label, "{message}"),
        Severity::Warning => tracing::warn!(target: CHANNEL_TARGET, severity = label, "{message}"),
        Severity::Error | Severity::Critical => {
            tracing::error!(target: CHANNEL_TARGET, severity = label, "{message}")
        }
    }
}

// ---------------------------------------------------------------------------
// ChannelBuilder
// ---------------------------------------------------------------------------

/// Builder for [`LogChannel`]. Each sink becomes one `fmt` layer on a
/// private registry.
pub struct ChannelBuilder {
    name: String,
    min_severity: Severity,
    palette: SeverityPalette,
    layers: Vec<BoxedLayer>,
    sinks: Vec<String>,
}

impl ChannelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_severity: Severity::Debug,
            palette: SeverityPalette::default(),
            layers: Vec::new(),
            sinks: Vec::new(),
        }
    }

    pub fn min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    /// Styles for sinks attached after this call.
    pub fn palette(mut self, palette: SeverityPalette) -> Self {
        self.palette = palette;
        self
    }

    /// Log to stderr. With `WriteStyle::Auto`, colour is used only when
    /// stderr is a terminal.
    pub fn console(self, style: WriteStyle) -> Self {
        let colored = match style {
            WriteStyle::Always => true,
            WriteStyle::Never => false,
            _ => io::stderr().is_terminal(),
        };
        self.writer("console", io::stderr, colored)
    }

    /// Append plain-text lines to `path`, creating it if needed.
    pub fn file(self, path: &Path) -> io::Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| io::Error::other(format!("invalid log file path {}", path.display())))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name)
            .build(dir)
            .map_err(io::Error::other)?;
        Ok(self.writer(&path.display().to_string(), appender, false))
    }

    /// Attach any `MakeWriter` as a sink.
    pub fn writer<W>(mut self, label: &str, make_writer: W, colored: bool) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let layer: BoxedLayer = tracing_subscriber::fmt::layer()
            .with_writer(make_writer)
            .with_ansi(colored)
            .event_format(ChannelFormatter {
                palette: self.palette.clone(),
            })
            .boxed();
        self.layers.push(layer);
        self.sinks.push(label.to_string());
        self
    }

    pub fn build(self) -> LogChannel {
        log::debug!(
            "channel '{}' built with {} sink(s) at {}",
            self.name,
            self.sinks.len(),
            self.min_severity
        );
        let subscriber = tracing_subscriber::registry().with(self.layers);
        LogChannel {
            name: self.name,
            min_severity: self.min_severity,
            dispatch: Dispatch::new(subscriber),
            sinks: self.sinks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Capture {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn captured(min: Severity, colored: bool) -> (LogChannel, Capture) {
        let buf = Capture::default();
        let channel = LogChannel::builder("test")
            .min_severity(min)
            .writer("capture", buf.clone(), colored)
            .build();
        (channel, buf)
    }

    #[test]
    fn severities_are_ordered() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Critical);
    }

    #[test]
    fn line_format() {
        assert_eq!(
            format_line(&"2024-01-01 00:00:00", Severity::Warning, &"careful"),
            "2024-01-01 00:00:00 - WARNING - careful"
        );
    }

    #[test]
    fn critical_label_survives_shared_error_level() {
        let (channel, buf) = captured(Severity::Debug, false);
        channel.error("bad");
        channel.critical("boom");
        let out = buf.contents();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - ERROR - bad"));
        assert!(lines[1].ends_with(" - CRITICAL - boom"));
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn colored_sink_wraps_line() {
        let (channel, buf) = captured(Severity::Debug, true);
        channel.info("hi");
        let out = buf.contents();
        assert!(out.starts_with('\u{1b}'));
        assert!(out.contains(" - INFO - hi"));
    }

    #[test]
    fn below_minimum_is_dropped() {
        let (channel, buf) = captured(Severity::Warning, false);
        channel.debug("quiet");
        channel.info("quiet");
        channel.warning("loud");
        channel.error("louder");
        let out = buf.contents();
        assert_eq!(out.lines().count(), 2);
        assert!(!out.contains("quiet"));
    }

    #[test]
    fn same_name_channels_are_independent() {
        let (first, first_buf) = captured(Severity::Debug, false);
        let (_second, second_buf) = captured(Severity::Debug, false);
        first.info("once");
        assert_eq!(first_buf.contents().matches("once").count(), 1);
        assert!(second_buf.contents().is_empty());
    }

    #[test]
    fn file_sink_appends_across_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        for run in ["first", "second"] {
            let channel = LogChannel::builder("file").file(&path).unwrap().build();
            channel.info(run);
        }
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("INFO - first"));
        assert!(lines[1].ends_with("INFO - second"));
        assert!(!text.contains('\u{1b}'));
    }
}
