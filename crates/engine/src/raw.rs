// Raw sheet data as handed over by a workbook reader

use std::collections::HashMap;

/// One spreadsheet cell before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl RawCell {
    /// Spreadsheet-style falsiness: empty, `""`, `0`, `NaN` and `false`.
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            Self::Number(n) => *n == 0.0 || n.is_nan(),
            Self::Bool(b) => !b,
        }
    }

    /// Display form of the cell value.
    ///
    /// Integral numbers print without a fractional part so phone numbers
    /// stored as numbers come out as `612345678`.
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number(*n),
            Self::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for RawCell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawCell {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for RawCell {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for RawCell {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for RawCell {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        // Exponent form with an explicit sign, as in `1e+21` or `1.5e-7`
        let exp = format!("{:e}", n);
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        }
    } else {
        format!("{}", n)
    }
}

/// Original header text -> cell value.
pub type RawRow = HashMap<String, RawCell>;

/// One sheet: ordered header row plus ordered data rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a row given as cells in header order. Extra cells are dropped,
    /// missing trailing cells are stored as [`RawCell::Empty`].
    pub fn push_row<I, C>(&mut self, cells: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<RawCell>,
    {
        let mut row = RawRow::with_capacity(self.headers.len());
        let mut cells = cells.into_iter();
        for header in &self.headers {
            let cell = cells.next().map(Into::into).unwrap_or(RawCell::Empty);
            row.insert(header.clone(), cell);
        }
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
