// Header resolution: free-text spreadsheet headers -> semantic fields

use std::collections::BTreeMap;

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::contact::Field;

/// Keyword rules, checked in order. The first rule that matches a header
/// decides its field, so "Apellidos del nombre" resolves to `LastName`.
const RULES: &[(&[&str], Field)] = &[
    (&["fecha"], Field::Date),
    (&["apellido"], Field::LastName),
    (&["nombre"], Field::FirstName),
    (&["telefono", "tel"], Field::Phone),
    (&["bienvenida", "mensaje"], Field::WelcomeSent),
    (&["comercial"], Field::Agent),
];

/// Lowercase, strip accents (combining marks after NFD) and trim.
///
/// `normalize_header(normalize_header(h)) == normalize_header(h)`.
pub fn normalize_header(header: &str) -> String {
    header
        .to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Field a single header resolves to, if any.
pub fn classify_header(header: &str) -> Option<Field> {
    let norm = normalize_header(header);
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| norm.contains(k)))
        .map(|(_, field)| *field)
}

/// Semantic field -> original header text, built once per sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HeaderMap {
    columns: BTreeMap<Field, String>,
    /// Fields in the order their first header appeared in the row
    #[serde(skip)]
    order: Vec<Field>,
}

impl HeaderMap {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.columns.contains_key(&field)
    }

    /// Required fields with no matching header, in declaration order.
    pub fn missing_required(&self) -> Vec<Field> {
        Field::REQUIRED
            .iter()
            .copied()
            .filter(|f| !self.contains(*f))
            .collect()
    }

    pub fn is_usable(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Original header texts that were recognised, ordered by where each
    /// field was first matched in the header row.
    pub fn resolved_headers(&self) -> Vec<String> {
        self.order
            .iter()
            .filter_map(|f| self.columns.get(f).cloned())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.columns.iter().map(|(f, h)| (*f, h.as_str()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn insert(&mut self, field: Field, header: &str) -> Option<String> {
        let previous = self.columns.insert(field, header.to_string());
        if previous.is_none() {
            self.order.push(field);
        }
        previous
    }
}

/// Resolve a header row into a [`HeaderMap`].
///
/// Unknown headers are ignored. When two headers resolve to the same field
/// the later one wins.
pub fn resolve_headers<S: AsRef<str>>(headers: &[S]) -> HeaderMap {
    let mut map = HeaderMap::default();
    for header in headers {
        let header = header.as_ref();
        match classify_header(header) {
            Some(field) => {
                if let Some(previous) = map.insert(field, header) {
                    log::warn!(
                        "headers '{}' and '{}' both resolve to {}; using '{}'",
                        previous,
                        header,
                        field.key(),
                        header
                    );
                }
            }
            None => log::debug!("ignoring unrecognised header '{}'", header),
        }
    }
    map
}
