// Clipboard capability used by the session's copy action

use crate::error::ClipboardError;

/// Something that can put text on the user's clipboard.
pub trait ClipboardWriter {
    /// Short backend name for logs and status lines.
    fn name(&self) -> &str;

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Which writer accepted the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyChannel {
    Primary,
    Fallback,
}

/// Write `text` through `primary`, retrying once with `fallback`.
///
/// Returns `ClipboardWriteFailure` only when both writers fail.
pub fn write_with_fallback(
    text: &str,
    primary: &mut dyn ClipboardWriter,
    fallback: &mut dyn ClipboardWriter,
) -> Result<CopyChannel, ClipboardError> {
    let primary_err = match primary.write_text(text) {
        Ok(()) => return Ok(CopyChannel::Primary),
        Err(e) => e,
    };
    log::warn!(
        "clipboard backend '{}' failed: {}; trying '{}'",
        primary.name(),
        primary_err,
        fallback.name()
    );
    match fallback.write_text(text) {
        Ok(()) => Ok(CopyChannel::Fallback),
        Err(fallback_err) => Err(ClipboardError::ClipboardWriteFailure {
            primary: Box::new(primary_err),
            fallback: Box::new(fallback_err),
        }),
    }
}
