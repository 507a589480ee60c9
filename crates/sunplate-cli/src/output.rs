//! User-facing output.
//!
//! Everything the user is meant to read goes through [`OutputManager`] on
//! stdout; diagnostics go through `tracing` on stderr.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::{AnsiColors, OwoColorize};
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Status glyph shown in front of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Done,
    Caution,
    Note,
}

impl Marker {
    fn glyph(self) -> char {
        match self {
            Self::Done => '\u{2713}',
            Self::Caution => '\u{26a0}',
            Self::Note => '\u{2139}',
        }
    }

    fn color(self) -> AnsiColors {
        match self {
            Self::Done => AnsiColors::Green,
            Self::Caution => AnsiColors::Yellow,
            Self::Note => AnsiColors::Blue,
        }
    }
}

/// Writes scaffold reports and watch progress in the selected format.
pub struct OutputManager {
    format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// `--output-format` wins over `output.format` unless it is left at
    /// `auto`; `auto` then becomes `human` on a terminal and `plain`
    /// otherwise.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let requested = match args.output_format {
            OutputFormat::Auto => config.output.format,
            explicit => explicit,
        };
        let format = match requested {
            OutputFormat::Auto if io::stdout().is_terminal() => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            resolved => resolved,
        };

        Self {
            format,
            // A JSON run prints exactly one document.
            quiet: args.quiet || format == OutputFormat::Json,
            no_color: args.no_color || config.output.no_color || format == OutputFormat::Plain,
            term: Term::stdout(),
        }
    }

    pub fn print(&self, msg: &str) -> io::Result<()> {
        self.line(msg.to_owned())
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.marked(Marker::Done, msg)
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.marked(Marker::Caution, msg)
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.marked(Marker::Note, msg)
    }

    /// Bold section title.
    pub fn header(&self, text: &str) -> io::Result<()> {
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.line(line)
    }

    /// Pretty-printed JSON document. Written even when quiet.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    fn marked(&self, marker: Marker, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("{} {msg}", marker.glyph())
        } else {
            let color = marker.color();
            format!(
                "{} {}",
                marker.glyph().color(color).bold(),
                msg.color(color)
            )
        };
        self.line(line)
    }

    fn line(&self, line: String) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(&line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(quiet: bool, no_color: bool, format: OutputFormat) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color,
            config: None,
            output_format: format,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn quiet_suppresses_lines() {
        let out = manager(true, true, OutputFormat::Plain);
        assert!(out.quiet);
        assert!(out.print("hello").is_ok());
        assert!(out.warning("careful").is_ok());
    }

    #[test]
    fn plain_format_disables_color() {
        assert!(!manager(false, false, OutputFormat::Human).no_color);
        assert!(manager(false, true, OutputFormat::Human).no_color);
        assert!(manager(false, false, OutputFormat::Plain).no_color);
    }

    #[test]
    fn json_run_is_quiet() {
        let out = manager(false, false, OutputFormat::Json);
        assert!(out.is_json());
        assert!(out.quiet);
    }

    #[test]
    fn config_format_applies_when_flag_is_auto() {
        let mut config = AppConfig::default();
        config.output.format = OutputFormat::Json;
        let args = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: false,
            config: None,
            output_format: OutputFormat::Auto,
        };
        assert!(OutputManager::new(&args, &config).is_json());
    }

    #[test]
    fn markers_have_distinct_glyphs() {
        assert_ne!(Marker::Done.glyph(), Marker::Caution.glyph());
        assert_ne!(Marker::Caution.glyph(), Marker::Note.glyph());
    }
}
