//! `welcomer-engine` — contact import and outreach session core.
//!
//! Pure engine crate: receives raw sheets, returns contacts and session views.
//! No terminal, clipboard backend or file IO dependencies.

pub mod clipboard;
pub mod compose;
pub mod contact;
pub mod error;
pub mod headers;
pub mod import;
pub mod normalize;
pub mod progress;
pub mod raw;
pub mod session;

pub use clipboard::{ClipboardWriter, CopyChannel};
pub use compose::{compose_message, Variant};
pub use contact::{Contact, Field};
pub use error::{ClipboardError, ImportError};
pub use headers::{normalize_header, resolve_headers, HeaderMap};
pub use import::{import_sheet, import_sheet_detailed, ImportedSheet};
pub use progress::{ContactStatus, Progress};
pub use raw::{RawCell, RawRow, RawSheet};
pub use session::{Session, SessionView};
