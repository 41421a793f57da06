use welcomer_engine::{import_sheet_detailed, ImportError, ImportedSheet};
use welcomer_io::LoadedWorkbook;

/// One row of the sheet picker, with the import already attempted.
pub struct SheetEntry {
    pub name: String,
    pub rows: usize,
    pub import: Result<ImportedSheet, ImportError>,
}

impl SheetEntry {
    /// Short text shown next to the sheet name.
    pub fn summary(&self) -> String {
        match &self.import {
            Ok(imported) => {
                let sent = imported.welcome_sent_count();
                if sent > 0 {
                    format!("{} contactos, {} ya enviados", imported.contacts.len(), sent)
                } else {
                    format!("{} contactos", imported.contacts.len())
                }
            }
            Err(ImportError::EmptySheet) => "vacia".to_string(),
            Err(ImportError::MissingColumns { missing, .. }) => format!(
                "faltan columnas: {}",
                missing.iter().map(|f| f.label()).collect::<Vec<_>>().join(", ")
            ),
            Err(e) => e.to_string(),
        }
    }

    pub fn is_usable(&self) -> bool {
        self.import.is_ok()
    }
}

pub fn entries(wb: &LoadedWorkbook) -> Vec<SheetEntry> {
    wb.sheets
        .iter()
        .map(|sheet| SheetEntry {
            name: sheet.name.clone(),
            rows: sheet.rows.len(),
            import: import_sheet_detailed(sheet),
        })
        .collect()
}
