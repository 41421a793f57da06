// CSV/TSV reading

use std::io::Read;
use std::path::Path;

use welcomer_engine::{ImportError, RawCell, RawSheet};

use crate::sheet::build_sheet;

/// Read a delimited text file as a single sheet named after the file stem.
///
/// `delimiter` of `None` sniffs it from the content. All cells are text.
pub fn read(path: &Path, delimiter: Option<u8>) -> Result<RawSheet, ImportError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(&content));
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Hoja1");
    parse(name, &content, delimiter)
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        let target = counts.first().copied().unwrap_or(0);
        if target <= 1 {
            continue;
        }

        // Lines agreeing with the header, weighted by column count
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (Excel exports are often Windows-1252).
pub fn read_file_as_utf8(path: &Path) -> Result<String, ImportError> {
    let unreadable = |e: std::io::Error| ImportError::UnreadableWorkbook(e.to_string());
    let mut file = std::fs::File::open(path).map_err(unreadable)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(unreadable)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(s)),
        Err(e) => {
            let bytes = e.into_bytes();
            log::debug!("{} is not UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

fn parse(name: &str, content: &str, delimiter: u8) -> Result<RawSheet, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| ImportError::UnreadableWorkbook(e.to_string()))?;
        rows.push(
            record
                .iter()
                .map(|field| if field.is_empty() { RawCell::Empty } else { RawCell::from(field) })
                .collect::<Vec<_>>(),
        );
    }
    Ok(build_sheet(name, rows))
}
