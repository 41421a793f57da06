// Clipboard backends: system copy command with an OSC 52 fallback

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use base64::Engine;
use welcomer_config::Settings;
use welcomer_engine::{ClipboardError, ClipboardWriter};

type Candidate = (&'static str, &'static [&'static str]);

const NO_ARGS: &[&str] = &[];

/// Copy commands tried in order when none is configured.
fn candidates() -> Vec<Candidate> {
    if cfg!(target_os = "macos") {
        vec![("pbcopy", NO_ARGS)]
    } else if cfg!(windows) {
        vec![("clip.exe", NO_ARGS)]
    } else {
        let mut list: Vec<Candidate> = Vec::new();
        if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            list.push(("wl-copy", NO_ARGS));
        }
        list.push(("xclip", &["-selection", "clipboard"]));
        list.push(("xsel", &["--clipboard", "--input"]));
        // WSL
        list.push(("clip.exe", NO_ARGS));
        list
    }
}

/// External program that reads the text on stdin (pbcopy, wl-copy, xclip...).
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: PathBuf,
    args: Vec<String>,
    label: String,
}

impl CommandClipboard {
    /// Resolve an explicit command line such as `"xclip -selection clipboard"`.
    pub fn from_command_line(command: &str) -> Result<Self, ClipboardError> {
        let mut parts = command.split_whitespace();
        let name = parts
            .next()
            .ok_or_else(|| ClipboardError::Unavailable("comando vacio".into()))?;
        let program = which::which(name)
            .map_err(|e| ClipboardError::Unavailable(format!("{}: {}", name, e)))?;
        Ok(Self {
            program,
            args: parts.map(str::to_string).collect(),
            label: name.to_string(),
        })
    }

    /// First known copy command present on PATH.
    pub fn detect() -> Result<Self, ClipboardError> {
        for (name, args) in candidates() {
            if let Ok(program) = which::which(name) {
                log::debug!("clipboard command: {}", program.display());
                return Ok(Self {
                    program,
                    args: args.iter().map(|a| a.to_string()).collect(),
                    label: name.to_string(),
                });
            }
        }
        Err(ClipboardError::Unavailable(
            "no se encontro pbcopy, wl-copy, xclip, xsel ni clip.exe".into(),
        ))
    }
}

impl ClipboardWriter for CommandClipboard {
    fn name(&self) -> &str {
        &self.label
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let failed = |e: std::io::Error| ClipboardError::WriteFailed(format!("{}: {}", self.label, e));

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(failed)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).map_err(failed)?;
        }
        let status = child.wait().map_err(failed)?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::WriteFailed(format!("{} salio con {}", self.label, status)))
        }
    }
}

/// Terminal clipboard via the OSC 52 escape sequence.
///
/// Works over SSH when the terminal emulator supports it; there is no way to
/// tell whether it did, so a write only fails when the sequence can't be sent.
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

pub fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{}\x07", encoded)
}

impl<W: Write> ClipboardWriter for Osc52Clipboard<W> {
    fn name(&self) -> &str {
        "osc52"
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if !atty::is(atty::Stream::Stdout) {
            return Err(ClipboardError::Unavailable("la salida no es un terminal".into()));
        }
        self.out
            .write_all(osc52_sequence(text).as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(|e| ClipboardError::WriteFailed(format!("osc52: {}", e)))
    }
}

/// Placeholder writer that always reports why it can't copy.
pub struct NoClipboard {
    reason: ClipboardError,
}

impl ClipboardWriter for NoClipboard {
    fn name(&self) -> &str {
        "none"
    }

    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(self.reason.clone())
    }
}

/// Primary and fallback writers configured from settings.
pub struct Clipboards {
    pub primary: Box<dyn ClipboardWriter>,
    pub fallback: Box<dyn ClipboardWriter>,
}

impl Clipboards {
    pub fn from_settings(settings: &Settings) -> Self {
        let command = match settings.clipboard_command.as_deref() {
            Some(cmd) => CommandClipboard::from_command_line(cmd),
            None => CommandClipboard::detect(),
        };
        let primary: Box<dyn ClipboardWriter> = match command {
            Ok(cmd) => Box::new(cmd),
            Err(reason) => {
                log::info!("{}", reason);
                Box::new(NoClipboard { reason })
            }
        };
        let fallback: Box<dyn ClipboardWriter> = if settings.osc52_fallback {
            Box::new(Osc52Clipboard::new(std::io::stdout()))
        } else {
            Box::new(NoClipboard {
                reason: ClipboardError::Unavailable("OSC 52 desactivado en la configuracion".into()),
            })
        };
        Self { primary, fallback }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn osc52_encodes_utf8() {
        assert_eq!(osc52_sequence("hola"), "\x1b]52;c;aG9sYQ==\x07");
        // "¡" is two bytes; base64 must cover the raw UTF-8
        assert_eq!(osc52_sequence("¡"), "\x1b]52;c;wqE=\x07");
    }

    #[test]
    fn empty_command_is_unavailable() {
        let err = CommandClipboard::from_command_line("   ").unwrap_err();
        assert!(matches!(err, ClipboardError::Unavailable(_)));
    }

    #[test]
    fn unknown_command_is_unavailable() {
        let err = CommandClipboard::from_command_line("welcomer-no-such-copy-tool").unwrap_err();
        assert!(matches!(err, ClipboardError::Unavailable(_)));
    }

    #[test]
    fn no_clipboard_reports_reason() {
        let mut none = NoClipboard { reason: ClipboardError::Unavailable("x".into()) };
        assert_eq!(none.write_text("hola"), Err(ClipboardError::Unavailable("x".into())));
    }

    #[cfg(unix)]
    #[test]
    fn command_clipboard_pipes_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("copied.txt");
        let mut cmd = CommandClipboard {
            program: PathBuf::from("/bin/sh"),
            args: vec!["-c".into(), format!("cat > '{}'", out.display())],
            label: "sh".into(),
        };
        cmd.write_text("Bienvenida Ana").unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "Bienvenida Ana");
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_is_write_failed() {
        let mut cmd = CommandClipboard {
            program: PathBuf::from("/bin/sh"),
            args: vec!["-c".into(), "exit 3".into()],
            label: "sh".into(),
        };
        assert!(matches!(cmd.write_text("x"), Err(ClipboardError::WriteFailed(_))));
    }
}
