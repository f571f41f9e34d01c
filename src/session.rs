use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Context;

use crate::clip::ClipSession;
use crate::clipboard::{copy_to_clipboard, ClipboardPath};
use crate::outline::ParagraphRecord;
use crate::progress::ConsoleProgress;

/// One logical session over an indexed document: owns the accumulation,
/// runs one Collector pass per copy action.
pub struct Session<'a> {
    index: &'a [ParagraphRecord],
    clip: ClipSession,
    progress: &'a ConsoleProgress,
    use_clipboard: bool,
}

impl<'a> Session<'a> {
    pub fn new(
        index: &'a [ParagraphRecord],
        progress: &'a ConsoleProgress,
        use_clipboard: bool,
    ) -> Self {
        Self {
            index,
            clip: ClipSession::new(),
            progress,
            use_clipboard,
        }
    }

    /// One copy action: match, merge, sort, serialize, deliver. Unmatched
    /// paragraphs and clipboard failures are reported, never fatal. Returns
    /// true when the block ended up on the system clipboard.
    pub fn copy_pass(&mut self, selection: &[String]) -> bool {
        let outcome = self.clip.collect(selection, self.index);
        for text in &outcome.unmatched {
            self.progress.info(format!("no match found for: {text}"));
        }
        if outcome.added == 0 {
            self.progress.info("no new paragraphs to add");
            return false;
        }

        let block = self.clip.render_block();
        self.progress.info(format!(
            "added {} entr{} ({} total)",
            outcome.added,
            if outcome.added == 1 { "y" } else { "ies" },
            self.clip.entries().len()
        ));

        if !self.use_clipboard {
            println!("{block}");
            return false;
        }
        match copy_to_clipboard(&block) {
            Ok(ClipboardPath::Arboard) => {
                self.progress.info("copied to clipboard");
                true
            }
            Ok(ClipboardPath::PlatformCommand) => {
                self.progress.info("copied to clipboard (platform command)");
                true
            }
            Err(err) => {
                // Accumulated state stays; the block goes to stdout so the
                // user can still grab it by hand.
                self.progress.info(format!("clipboard write failed: {err:#}"));
                println!("{block}");
                false
            }
        }
    }

    pub fn clear(&mut self) {
        self.clip.clear();
        self.progress.info("accumulation cleared");
    }

    pub fn show(&self) {
        if self.clip.is_empty() {
            println!("(nothing accumulated)");
            return;
        }
        for entry in self.clip.entries() {
            println!("{}: {}", entry.key, entry.value);
        }
    }

    fn show_keys(&self) {
        for rec in self.index {
            let kind = if rec.is_list_item { "list" } else { "text" };
            println!("[{kind}] {}: {}", rec.key, rec.value);
        }
    }

    /// Read selections from stdin until EOF: non-command lines buffer a
    /// selection, an empty line closes the block and runs one copy pass.
    pub fn run_interactive(&mut self) -> anyhow::Result<()> {
        self.progress.info(
            "paste paragraph text, empty line to copy; :show :keys :clear :quit",
        );

        let stdin = io::stdin();
        let mut selection: Vec<String> = Vec::new();
        for line in stdin.lock().lines() {
            let line = line.context("read stdin")?;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                if !selection.is_empty() {
                    let block = std::mem::take(&mut selection);
                    self.copy_pass(&block);
                }
                continue;
            }

            match trimmed {
                ":quit" | ":q" => break,
                ":clear" => {
                    selection.clear();
                    self.clear();
                }
                ":show" => self.show(),
                ":keys" => self.show_keys(),
                _ => selection.push(line),
            }
            io::stdout().flush().ok();
        }

        if !selection.is_empty() {
            let block = std::mem::take(&mut selection);
            self.copy_pass(&block);
        }
        Ok(())
    }

    /// One-shot mode: every non-empty line of the file is a selected
    /// paragraph; run a single pass and print the block.
    pub fn run_select_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read selection file: {}", path.display()))?;
        let selection: Vec<String> = text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.to_string())
            .collect();
        if self.copy_pass(&selection) {
            // Echo what landed on the clipboard.
            println!("{}", self.clip.render_block());
        }
        Ok(())
    }
}
