use std::collections::BTreeMap;

use env_logger::fmt::style::{AnsiColor, Style};

use crate::logging::Severity;

// ---------------------------------------------------------------------------
// Severity palette: severity → terminal style
// ---------------------------------------------------------------------------

/// Maps each severity to the style used on a colour-capable console.
#[derive(Debug, Clone)]
pub struct SeverityPalette {
    mapping: BTreeMap<Severity, Style>,
    default_style: Style,
}

impl Default for SeverityPalette {
    /// cyan, green, yellow, red, and bold red on white for `CRITICAL`.
    fn default() -> Self {
        let mapping = BTreeMap::from([
            (Severity::Debug, AnsiColor::Cyan.on_default()),
            (Severity::Info, AnsiColor::Green.on_default()),
            (Severity::Warning, AnsiColor::Yellow.on_default()),
            (Severity::Error, AnsiColor::Red.on_default()),
            (Severity::Critical, AnsiColor::Red.on(AnsiColor::White).bold()),
        ]);
        SeverityPalette {
            mapping,
            default_style: Style::new(),
        }
    }
}

impl SeverityPalette {
    /// Replace the style of one severity.
    pub fn with(mut self, severity: Severity, style: Style) -> Self {
        self.mapping.insert(severity, style);
        self
    }

    /// Look up the style for a given severity.
    pub fn style_for(&self, severity: Severity) -> Style {
        self.mapping
            .get(&severity)
            .copied()
            .unwrap_or(self.default_style)
    }

    /// Wrap `line` in the severity's escape sequences.
    pub fn paint(&self, severity: Severity, line: &str) -> String {
        let style = self.style_for(severity);
        format!("{}{line}{}", style.render(), style.render_reset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_distinguishes_severities() {
        let palette = SeverityPalette::default();
        let info = palette.paint(Severity::Info, "hello");
        let critical = palette.paint(Severity::Critical, "hello");
        assert!(info.starts_with('\u{1b}'));
        assert!(info.contains("hello"));
        assert_ne!(info, critical);
    }

    #[test]
    fn override_replaces_one_entry() {
        let plain = SeverityPalette::default().with(Severity::Debug, Style::new());
        assert_eq!(plain.paint(Severity::Debug, "x"), "x");
    }
}
