//! CLI Exit Code Registry
//!
//! Single source of truth for the exit codes of `welcomer`. Scripts rely on
//! them, so existing values never change meaning.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-9     | import           | Workbook / sheet could not become contacts |
//! | 10-19   | clipboard        | Copying the message failed               |
//! | 20-29   | terminal         | Interactive session / settings problems  |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Update the table above
//! 3. Map it in the matching `*_exit_code` function

use welcomer_engine::{ClipboardError, ImportError};

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unreadable template file, index out of range.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Import (3-9)
// =============================================================================

/// Extension is not a supported spreadsheet format.
pub const EXIT_IMPORT_FILE_TYPE: u8 = 3;

/// File exists but could not be parsed (or could not be read at all).
pub const EXIT_IMPORT_UNREADABLE: u8 = 4;

/// Workbook has no sheets.
pub const EXIT_IMPORT_EMPTY_WORKBOOK: u8 = 5;

/// `--sheet` names a sheet that does not exist.
pub const EXIT_IMPORT_SHEET_NOT_FOUND: u8 = 6;

/// Selected sheet has no data rows.
pub const EXIT_IMPORT_EMPTY_SHEET: u8 = 7;

/// Name or phone column could not be identified.
pub const EXIT_IMPORT_MISSING_COLUMNS: u8 = 8;

/// Import produced no contacts.
pub const EXIT_IMPORT_NO_CONTACTS: u8 = 9;

// =============================================================================
// Clipboard (10-19)
// =============================================================================

/// No clipboard command found and no fallback allowed.
pub const EXIT_CLIPBOARD_UNAVAILABLE: u8 = 10;

/// Every clipboard writer failed.
pub const EXIT_CLIPBOARD_FAILED: u8 = 11;

// =============================================================================
// Terminal (20-29)
// =============================================================================

/// `run` needs an interactive terminal on stdin and stdout.
pub const EXIT_NOT_A_TTY: u8 = 20;

/// Raw mode / alternate screen / drawing failed.
pub const EXIT_TERMINAL: u8 = 21;

/// Settings file could not be written.
pub const EXIT_CONFIG_WRITE: u8 = 22;

pub fn import_exit_code(err: &ImportError) -> u8 {
    match err {
        ImportError::InvalidFileType { .. } => EXIT_IMPORT_FILE_TYPE,
        ImportError::UnreadableWorkbook(_) => EXIT_IMPORT_UNREADABLE,
        ImportError::EmptyWorkbook => EXIT_IMPORT_EMPTY_WORKBOOK,
        ImportError::SheetNotFound { .. } => EXIT_IMPORT_SHEET_NOT_FOUND,
        ImportError::EmptySheet => EXIT_IMPORT_EMPTY_SHEET,
        ImportError::MissingColumns { .. } => EXIT_IMPORT_MISSING_COLUMNS,
        ImportError::NoContacts => EXIT_IMPORT_NO_CONTACTS,
    }
}

pub fn clipboard_exit_code(err: &ClipboardError) -> u8 {
    if err.is_unavailable() {
        EXIT_CLIPBOARD_UNAVAILABLE
    } else {
        EXIT_CLIPBOARD_FAILED
    }
}
