// Row normalization: one raw row -> one Contact

use chrono::{Days, NaiveDate};

use crate::contact::{Contact, Field, MISSING};
use crate::headers::HeaderMap;
use crate::raw::{format_number, RawCell, RawRow};

/// Text values (compared case-insensitively) that mark a welcome as sent.
const TRUTHY_TEXT: &[&str] = &["si", "sí", "true", "x"];

/// Largest serial in the 1900 date system (31/12/9999).
const MAX_DATE_SERIAL: f64 = 2_958_465.0;

/// Normalize one row. Never fails: unusable cells degrade to defaults.
pub fn normalize_row(row: &RawRow, headers: &HeaderMap) -> Contact {
    let cell = |field: Field| lookup(row, headers, field);

    Contact {
        date: date_value(cell(Field::Date)),
        first_name: text_or(cell(Field::FirstName), MISSING),
        last_name: text_or(cell(Field::LastName), ""),
        phone: text_or(cell(Field::Phone), MISSING),
        welcome_sent: welcome_flag(cell(Field::WelcomeSent)),
        agent: text_or(cell(Field::Agent), MISSING),
    }
}

fn lookup<'a>(row: &'a RawRow, headers: &HeaderMap, field: Field) -> &'a RawCell {
    const EMPTY: &RawCell = &RawCell::Empty;
    headers
        .get(field)
        .and_then(|h| row.get(h))
        .unwrap_or(EMPTY)
}

/// Coerce a welcome-sent cell to a boolean.
///
/// Booleans pass through, numbers are true only when exactly `1`, text is
/// true for `si`/`sí`/`true`/`x` in any case or the literal `"1"`.
pub fn welcome_flag(cell: &RawCell) -> bool {
    match cell {
        RawCell::Bool(b) => *b,
        RawCell::Number(n) => *n == 1.0,
        RawCell::Text(s) => {
            let lower = s.to_lowercase();
            s == "1" || TRUTHY_TEXT.contains(&lower.as_str())
        }
        RawCell::Empty => false,
    }
}

fn text_or(cell: &RawCell, default: &str) -> String {
    if cell.is_falsy() {
        default.to_string()
    } else {
        cell.to_display_string()
    }
}

fn date_value(cell: &RawCell) -> String {
    match cell {
        _ if cell.is_falsy() => MISSING.to_string(),
        RawCell::Number(n) => serial_to_display_date(*n).unwrap_or_else(|| {
            log::debug!("date serial {} out of range, keeping raw value", n);
            format_number(*n)
        }),
        other => other.to_display_string(),
    }
}

/// Render a spreadsheet date serial as `DD/MM/YYYY`.
///
/// Uses the 1900 date system including its phantom 29/02/1900 (serial 60):
/// serials below 60 count from 31/12/1899, later ones from 30/12/1899. Day
/// zero renders as `00/01/1900`. The time-of-day fraction is dropped.
/// Returns `None` for negative serials, serials past 31/12/9999 and
/// non-finite values.
pub fn serial_to_display_date(serial: f64) -> Option<String> {
    if !serial.is_finite() || serial < 0.0 || serial >= MAX_DATE_SERIAL + 1.0 {
        return None;
    }
    let days = serial.floor() as u64;
    match days {
        0 => return Some("00/01/1900".to_string()),
        60 => return Some("29/02/1900".to_string()),
        _ => {}
    }
    let epoch = if days < 60 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let date = epoch.checked_add_days(Days::new(days))?;
    Some(date.format("%d/%m/%Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::resolve_headers;

    fn row(pairs: &[(&str, RawCell)]) -> RawRow {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn welcome_flag_coercion() {
        assert!(welcome_flag(&RawCell::Text("Sí".into())));
        assert!(welcome_flag(&RawCell::Text("SI".into())));
        assert!(welcome_flag(&RawCell::Text("x".into())));
        assert!(welcome_flag(&RawCell::Text("X".into())));
        assert!(welcome_flag(&RawCell::Text("True".into())));
        assert!(welcome_flag(&RawCell::Text("1".into())));
        assert!(welcome_flag(&RawCell::Number(1.0)));
        assert!(welcome_flag(&RawCell::Bool(true)));

        assert!(!welcome_flag(&RawCell::Text("no".into())));
        assert!(!welcome_flag(&RawCell::Text(" si".into())));
        assert!(!welcome_flag(&RawCell::Text("01".into())));
        assert!(!welcome_flag(&RawCell::Number(0.0)));
        assert!(!welcome_flag(&RawCell::Number(2.0)));
        assert!(!welcome_flag(&RawCell::Bool(false)));
        assert!(!welcome_flag(&RawCell::Empty));
    }

    #[test]
    fn serial_dates() {
        assert_eq!(serial_to_display_date(44927.0).as_deref(), Some("01/01/2023"));
        assert_eq!(serial_to_display_date(44927.75).as_deref(), Some("01/01/2023"));
        assert_eq!(serial_to_display_date(1.0).as_deref(), Some("01/01/1900"));
        assert_eq!(serial_to_display_date(59.0).as_deref(), Some("28/02/1900"));
        assert_eq!(serial_to_display_date(60.0).as_deref(), Some("29/02/1900"));
        assert_eq!(serial_to_display_date(61.0).as_deref(), Some("01/03/1900"));
        assert_eq!(serial_to_display_date(2_958_465.0).as_deref(), Some("31/12/9999"));
    }

    #[test]
    fn fractional_serial_below_one_is_day_zero() {
        assert_eq!(serial_to_display_date(0.5).as_deref(), Some("00/01/1900"));
        assert_eq!(date_value(&RawCell::Number(0.25)), "00/01/1900");
        assert_eq!(date_value(&RawCell::Number(0.0)), "-");
    }

    #[test]
    fn serial_out_of_range() {
        assert_eq!(serial_to_display_date(-5.0), None);
        assert_eq!(serial_to_display_date(-0.5), None);
        assert_eq!(serial_to_display_date(2_958_466.0), None);
        assert_eq!(serial_to_display_date(f64::NAN), None);
        assert_eq!(serial_to_display_date(f64::INFINITY), None);
    }

    #[test]
    fn full_row() {
        let headers = resolve_headers(&["Fecha", "Nombre", "Apellidos", "Teléfono", "Bienvenida", "Comercial"]);
        let raw = row(&[
            ("Fecha", RawCell::Number(44927.0)),
            ("Nombre", RawCell::Text("Ana".into())),
            ("Apellidos", RawCell::Text("Lopez".into())),
            ("Teléfono", RawCell::Number(612345678.0)),
            ("Bienvenida", RawCell::Text("sí".into())),
            ("Comercial", RawCell::Text("Luis".into())),
        ]);
        let contact = normalize_row(&raw, &headers);
        assert_eq!(
            contact,
            Contact {
                date: "01/01/2023".into(),
                first_name: "Ana".into(),
                last_name: "Lopez".into(),
                phone: "612345678".into(),
                welcome_sent: true,
                agent: "Luis".into(),
            }
        );
    }

    #[test]
    fn missing_cells_get_defaults() {
        let headers = resolve_headers(&["Nombre", "Telefono"]);
        let raw = row(&[
            ("Nombre", RawCell::Text(String::new())),
            ("Telefono", RawCell::Empty),
        ]);
        let contact = normalize_row(&raw, &headers);
        assert_eq!(contact.first_name, "-");
        assert_eq!(contact.phone, "-");
        assert_eq!(contact.last_name, "");
        assert_eq!(contact.date, "-");
        assert_eq!(contact.agent, "-");
        assert!(!contact.welcome_sent);
    }

    #[test]
    fn text_dates_pass_through() {
        let headers = resolve_headers(&["Fecha", "Nombre", "Telefono"]);
        let raw = row(&[("Fecha", RawCell::Text("2024-03-05".into()))]);
        assert_eq!(normalize_row(&raw, &headers).date, "2024-03-05");
    }

    #[test]
    fn unconvertible_serial_keeps_raw_number() {
        let headers = resolve_headers(&["Fecha", "Nombre", "Telefono"]);
        let raw = row(&[("Fecha", RawCell::Number(-12.5))]);
        assert_eq!(normalize_row(&raw, &headers).date, "-12.5");
    }

    #[test]
    fn zero_date_is_missing() {
        let headers = resolve_headers(&["Fecha", "Nombre", "Telefono"]);
        let raw = row(&[("Fecha", RawCell::Number(0.0))]);
        assert_eq!(normalize_row(&raw, &headers).date, "-");
    }

    #[test]
    fn zero_and_false_are_missing() {
        let headers = resolve_headers(&["Nombre", "Telefono", "Comercial"]);
        let raw = row(&[
            ("Nombre", RawCell::Bool(false)),
            ("Telefono", RawCell::Number(0.0)),
            ("Comercial", RawCell::Bool(true)),
        ]);
        let contact = normalize_row(&raw, &headers);
        assert_eq!(contact.first_name, "-");
        assert_eq!(contact.phone, "-");
        assert_eq!(contact.agent, "true");
    }
}
