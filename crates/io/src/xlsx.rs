// Excel / OpenDocument reading via calamine

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use welcomer_engine::{ImportError, RawCell, RawSheet};

use crate::sheet::build_sheet;

/// Map one calamine cell to a raw cell.
///
/// Dates come through as their serial number so the engine can format them;
/// error cells (`#N/A`, `#REF!`) read as empty.
pub fn convert_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Float(n) => RawCell::Number(*n),
        Data::Int(n) => RawCell::Number(*n as f64),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::DateTime(dt) => RawCell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(e) => {
            log::debug!("error cell read as empty: {:?}", e);
            RawCell::Empty
        }
    }
}

/// Read every sheet of an xlsx/xlsm/xlsb/xls/ods file, in workbook order.
pub fn read(path: &Path) -> Result<Vec<RawSheet>, ImportError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| ImportError::UnreadableWorkbook(e.to_string()))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(ImportError::EmptyWorkbook);
    }

    let mut sheets = Vec::with_capacity(sheet_names.len());
    for sheet_name in &sheet_names {
        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| ImportError::UnreadableWorkbook(format!("hoja '{}': {}", sheet_name, e)))?;

        let (height, width) = range.get_size();
        log::debug!("sheet '{}': {}x{} cells", sheet_name, height, width);

        let rows = range
            .rows()
            .map(|row| row.iter().map(convert_cell).collect::<Vec<_>>());
        sheets.push(build_sheet(sheet_name, rows));
    }
    Ok(sheets)
}
