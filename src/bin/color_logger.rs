use env_logger::fmt::style::AnsiColor;
use env_logger::WriteStyle;
use logframe::color::SeverityPalette;
use logframe::{LogChannel, Severity};

/// Styles of the standalone logger: like the processor's, except that
/// CRITICAL is plain bold red.
fn palette() -> SeverityPalette {
    SeverityPalette::default().with(Severity::Critical, AnsiColor::Red.on_default().bold())
}

fn main() {
    env_logger::init();

    let logger = LogChannel::builder("color_logger")
        .min_severity(Severity::Debug)
        .palette(palette())
        .console(WriteStyle::Auto)
        .build();

    logger.info("This is an INFO message in color.");
}
