//! User-facing progress report (made by FontLab https://www.fontlab.com/)

use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};

/// Prints progress lines unless silenced.
///
/// Writes to any `io::Write`; the `Generated` prefix is coloured only when
/// colour was requested.
#[derive(Debug)]
pub struct Reporter<W: Write> {
    out: W,
    silent: bool,
    color: bool,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, silent: bool, color: bool) -> Self {
        Reporter { out, silent, color }
    }

    /// Print `message` on its own line.
    pub fn log(&mut self, message: &str) -> Result<()> {
        if self.silent {
            return Ok(());
        }
        writeln!(self.out, "{message}").map_err(Error::Report)
    }

    /// Print `Generated <path>`.
    pub fn log_output(&mut self, path: &Path) -> Result<()> {
        let prefix = apply_color("Generated", self.color, AnsiColor::Green);
        self.log(&format!("{prefix} {}", path.display()))
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[derive(Clone, Copy, Debug)]
enum AnsiColor {
    Green,
}

fn apply_color(text: &str, color: bool, code: AnsiColor) -> String {
    if !color {
        return text.to_string();
    }

    let code_str = match code {
        AnsiColor::Green => "32",
    };

    format!("\u{1b}[{}m{}\u{1b}[0m", code_str, text)
}
