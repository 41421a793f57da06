use serde::Serialize;

use crate::contact::Contact;
use crate::error::ImportError;
use crate::headers::{resolve_headers, HeaderMap};
use crate::normalize::normalize_row;
use crate::raw::RawSheet;

/// Result of a successful sheet import, with the header resolution kept for
/// diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct ImportedSheet {
    pub sheet: String,
    pub headers: HeaderMap,
    pub contacts: Vec<Contact>,
}

impl ImportedSheet {
    /// Contacts the source data already marks as welcomed.
    pub fn welcome_sent_count(&self) -> usize {
        self.contacts.iter().filter(|c| c.welcome_sent).count()
    }
}

/// Turn a raw sheet into an ordered contact list.
pub fn import_sheet(sheet: &RawSheet) -> Result<Vec<Contact>, ImportError> {
    import_sheet_detailed(sheet).map(|imported| imported.contacts)
}

/// Like [`import_sheet`], also returning the resolved [`HeaderMap`].
///
/// Checks run in order: empty sheet, missing required columns, empty result.
pub fn import_sheet_detailed(sheet: &RawSheet) -> Result<ImportedSheet, ImportError> {
    if sheet.rows.is_empty() {
        return Err(ImportError::EmptySheet);
    }

    let headers = resolve_headers(&sheet.headers);
    let missing = headers.missing_required();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns {
            missing,
            found: sheet.headers.clone(),
            resolved: headers.resolved_headers(),
        });
    }

    let contacts: Vec<Contact> = sheet
        .rows
        .iter()
        .map(|row| normalize_row(row, &headers))
        .collect();

    if contacts.is_empty() {
        return Err(ImportError::NoContacts);
    }

    log::info!(
        "imported {} contacts from sheet '{}' ({} of {} headers recognised)",
        contacts.len(),
        sheet.name,
        headers.len(),
        sheet.headers.len()
    );

    Ok(ImportedSheet {
        sheet: sheet.name.clone(),
        headers,
        contacts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::Field;
    use crate::raw::RawCell;

    fn sheet(headers: &[&str]) -> RawSheet {
        RawSheet::new("Hoja1", headers.iter().map(|h| h.to_string()).collect())
    }

    #[test]
    fn empty_sheet_is_rejected_first() {
        // Even with unusable headers, zero rows reports EmptySheet
        let s = sheet(&["Ciudad"]);
        assert_eq!(import_sheet(&s), Err(ImportError::EmptySheet));
    }

    #[test]
    fn missing_phone_column() {
        let mut s = sheet(&["Nombre"]);
        s.push_row(["Ana"]);
        match import_sheet(&s) {
            Err(ImportError::MissingColumns { missing, found, resolved }) => {
                assert_eq!(missing, vec![Field::Phone]);
                assert_eq!(found, vec!["Nombre".to_string()]);
                assert_eq!(resolved, vec!["Nombre".to_string()]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn missing_both_required_columns() {
        let mut s = sheet(&["Fecha", "Ciudad"]);
        s.push_row([RawCell::Number(44927.0), RawCell::from("Madrid")]);
        let err = import_sheet(&s).unwrap_err();
        assert_eq!(
            err,
            ImportError::MissingColumns {
                missing: vec![Field::FirstName, Field::Phone],
                found: vec!["Fecha".into(), "Ciudad".into()],
                resolved: vec!["Fecha".into()],
            }
        );
    }

    #[test]
    fn recognised_columns_are_listed_in_sheet_order() {
        let mut s = sheet(&["Comercial", "Apellidos", "Fecha"]);
        s.push_row(["Luis", "Gil", "hoy"]);
        let err = import_sheet(&s).unwrap_err();
        assert!(err
            .to_string()
            .contains("Columnas reconocidas: Comercial, Apellidos, Fecha."));
    }

    #[test]
    fn keeps_row_order() {
        let mut s = sheet(&["Nombre", "Móvil / Tel"]);
        s.push_row(["Ana", "600"]);
        s.push_row(["Bea", "601"]);
        s.push_row(["Carla", "602"]);
        let contacts = import_sheet(&s).unwrap();
        let names: Vec<_> = contacts.iter().map(|c| c.first_name.as_str()).collect();
        assert_eq!(names, ["Ana", "Bea", "Carla"]);
        assert_eq!(contacts[2].phone, "602");
    }

    #[test]
    fn detailed_import_reports_headers() {
        let mut s = sheet(&["Nombre", "Telefono", "Bienvenida"]);
        s.push_row(["Ana", "600", "si"]);
        s.push_row(["Bea", "601", "no"]);
        let imported = import_sheet_detailed(&s).unwrap();
        assert_eq!(imported.sheet, "Hoja1");
        assert_eq!(imported.headers.get(Field::WelcomeSent), Some("Bienvenida"));
        assert_eq!(imported.welcome_sent_count(), 1);
    }
}
