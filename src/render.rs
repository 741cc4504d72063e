use omnibot_core::transcript::Renderer;
use omnibot_core::{DisplayMessage, Transcript};
use std::io::{self, IsTerminal, Write};

const USER_LABEL: &str = "\x1b[1;32myou\x1b[0m";
const BOT_LABEL: &str = "\x1b[1;33momnibot\x1b[0m";
const LINK: &str = "\x1b[4;36m";
const RESET: &str = "\x1b[0m";
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Draws chat bubbles to a terminal while keeping the transcript model.
pub struct TerminalRenderer<W: Write + Send> {
    out: W,
    transcript: Transcript,
    color: bool,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::detect(io::stdout())
    }
}

impl<W: Write + IsTerminal + Send> TerminalRenderer<W> {
    /// Colour only when `out` is an interactive terminal, never into pipes
    /// or files.
    pub fn detect(out: W) -> Self {
        let color = out.is_terminal();
        Self::new(out, color)
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            transcript: Transcript::new(),
            color,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn color(&self) -> bool {
        self.color
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn label(&self, styled: &'static str, plain: &'static str) -> &'static str {
        if self.color {
            styled
        } else {
            plain
        }
    }

    fn link(&self, url: &str) -> String {
        if self.color {
            format!("{}{}{}", LINK, url, RESET)
        } else {
            url.to_string()
        }
    }

    fn emit(&mut self, text: &str) {
        let result = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush());
        if let Err(e) = result {
            tracing::warn!("Failed to write to terminal: {}", e);
        }
    }

    fn bubble(&self, message: &DisplayMessage) -> String {
        let mut s = format!("{}: ", self.label(BOT_LABEL, "omnibot"));
        match &message.text {
            Some(text) => s.push_str(text),
            None => s.push('…'),
        }
        s.push('\n');

        for line in message.lines.iter().flatten() {
            s.push_str(&format!("  • {}\n", line));
        }
        if let Some(url) = &message.image_url {
            s.push_str(&format!("  [image] {}\n", self.link(url)));
        }
        if let Some(url) = &message.map_url {
            s.push_str(&format!("  View on map: {}\n", self.link(url)));
        }
        if let Some(suggestions) = &message.suggestions {
            s.push_str("  You can try:\n");
            for suggestion in suggestions {
                s.push_str(&format!("    • {}\n", suggestion));
            }
        }
        s
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn append_user(&mut self, text: &str) {
        self.transcript.append_user(text);
    }

    fn append(&mut self, message: DisplayMessage) {
        let drawn = self.bubble(&message);
        self.emit(&drawn);
        self.transcript.append(message);
    }

    fn show_pending(&mut self) -> String {
        let already_showing = self.transcript.pending_id().is_some();
        let id = self.transcript.show_pending();
        if !already_showing {
            let line = format!("{}: …", self.label(BOT_LABEL, "omnibot"));
            self.emit(&line);
        }
        id
    }

    fn clear_pending(&mut self) -> bool {
        let removed = self.transcript.clear_pending();
        if removed {
            if self.color {
                self.emit(CLEAR_LINE);
            } else {
                self.emit("\n");
            }
        }
        removed
    }
}

/// Echo of the user's line, for one-shot mode where no prompt shows it.
pub fn user_line(text: &str, color: bool) -> String {
    let label = if color { USER_LABEL } else { "you" };
    format!("{}: {}\n", label, text)
}
