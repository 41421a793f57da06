// Grid -> RawSheet: header naming and blank-row skipping shared by all readers

use std::collections::HashSet;

use welcomer_engine::{RawCell, RawSheet};

/// Name used for header cells with no text.
pub const EMPTY_HEADER: &str = "__EMPTY";

/// Turn a header row into unique column names.
///
/// Blank cells become `__EMPTY`, later duplicates get `_1`, `_2`... appended
/// (so a second blank header is `__EMPTY_1`). `width` pads the row when data
/// rows are wider than the header.
pub fn header_names(cells: &[RawCell], width: usize) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(width.max(cells.len()));

    for i in 0..width.max(cells.len()) {
        let text = cells.get(i).map(RawCell::to_display_string).unwrap_or_default();
        let base = if text.trim().is_empty() { EMPTY_HEADER.to_string() } else { text };

        let mut name = base.clone();
        let mut n = 1;
        while seen.contains(&name) {
            name = format!("{base}_{n}");
            n += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }
    names
}

fn is_blank(row: &[RawCell]) -> bool {
    row.iter().all(|c| match c {
        RawCell::Empty => true,
        RawCell::Text(s) => s.trim().is_empty(),
        _ => false,
    })
}

/// Build a sheet from rows of cells. The first row is the header; blank rows
/// after it are dropped.
pub fn build_sheet<I>(name: &str, rows: I) -> RawSheet
where
    I: IntoIterator<Item = Vec<RawCell>>,
{
    let mut rows = rows.into_iter();
    let header = match rows.next() {
        Some(h) => h,
        None => return RawSheet::new(name, Vec::new()),
    };

    let mut data: Vec<Vec<RawCell>> = Vec::new();
    let mut skipped = 0usize;
    for row in rows {
        if is_blank(&row) {
            skipped += 1;
            continue;
        }
        data.push(row);
    }
    if skipped > 0 {
        log::debug!("sheet '{}': skipped {} blank rows", name, skipped);
    }

    let width = data.iter().map(Vec::len).max().unwrap_or(0);
    let mut sheet = RawSheet::new(name, header_names(&header, width));
    for row in data {
        sheet.push_row(row);
    }
    sheet
}
