// Workbook reading: spreadsheet files -> raw sheets for the engine

pub mod csv;
pub mod sheet;
pub mod xlsx;

use std::path::Path;

use welcomer_engine::{ImportError, RawSheet};

/// File formats the reader understands, keyed by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    /// xlsx, xlsm, xlsb, xls, ods (read through calamine)
    Spreadsheet,
    Csv,
    Tsv,
}

impl WorkbookFormat {
    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Spreadsheet),
            "csv" => Ok(Self::Csv),
            "tsv" | "tab" => Ok(Self::Tsv),
            _ => Err(ImportError::InvalidFileType {
                extension: if ext.is_empty() { "sin extension".to_string() } else { format!(".{ext}") },
            }),
        }
    }
}

/// All sheets of one file, read eagerly.
#[derive(Debug, Clone)]
pub struct LoadedWorkbook {
    pub format: WorkbookFormat,
    pub sheets: Vec<RawSheet>,
}

impl LoadedWorkbook {
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    /// Sheet by exact name.
    pub fn sheet(&self, name: &str) -> Result<&RawSheet, ImportError> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ImportError::SheetNotFound {
                name: name.to_string(),
                available: self.sheet_names(),
            })
    }

    /// The only sheet when there is exactly one, otherwise `None` and the
    /// caller has to ask the user.
    pub fn single_sheet(&self) -> Option<&RawSheet> {
        match self.sheets.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Resolve a sheet choice: by name if given, the single sheet otherwise,
    /// or the first sheet as a last resort.
    pub fn select(&self, name: Option<&str>) -> Result<&RawSheet, ImportError> {
        match name {
            Some(name) => self.sheet(name),
            None => self
                .single_sheet()
                .or_else(|| self.sheets.first())
                .ok_or(ImportError::EmptyWorkbook),
        }
    }
}

/// Open any supported file.
///
/// Unsupported extensions fail with `InvalidFileType` before touching the
/// file; parse failures map to `UnreadableWorkbook`; zero sheets to
/// `EmptyWorkbook`.
pub fn open(path: &Path) -> Result<LoadedWorkbook, ImportError> {
    let format = WorkbookFormat::from_path(path)?;
    let sheets = match format {
        WorkbookFormat::Spreadsheet => xlsx::read(path)?,
        WorkbookFormat::Csv => vec![csv::read(path, None)?],
        WorkbookFormat::Tsv => vec![csv::read(path, Some(b'\t'))?],
    };
    if sheets.is_empty() {
        return Err(ImportError::EmptyWorkbook);
    }
    log::info!("opened {} ({} sheets)", path.display(), sheets.len());
    Ok(LoadedWorkbook { format, sheets })
}
