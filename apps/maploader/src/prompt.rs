//! Terminal stand-ins for native dialogs.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use maploader_file_ops::{PickKind, Picker, expand_home};
use maploader_package::AdvisorySink;

/// Reads paths from a line-based input. An empty line or end of input
/// cancels.
pub struct PromptPicker<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptPicker<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Picker for PromptPicker<R, W> {
    fn pick(&mut self, kind: PickKind) -> std::io::Result<Option<PathBuf>> {
        let what = match kind {
            PickKind::Folder => "folder",
            PickKind::File => "file",
        };
        write!(self.output, "Enter {what} path (empty to cancel): ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        Ok(Some(expand_home(line)))
    }

    fn notify(&mut self, title: &str, message: &str) {
        let _ = writeln!(self.output, "{title}: {message}");
    }
}

/// Prints advisory notices to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrAdvisory;

impl AdvisorySink for StderrAdvisory {
    fn advise(&self, title: &str, message: &str) {
        tracing::warn!(title, "{message}");
        eprintln!("{title}: {message}");
    }
}
