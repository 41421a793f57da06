use crate::contact::Field;

/// Reasons a workbook or sheet cannot become a contact list.
///
/// All variants are recoverable: the caller reports them and keeps whatever
/// session was loaded before.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ImportError {
    /// File extension is not a supported spreadsheet format.
    #[error("Formato no valido ({extension}). Sube un archivo .xlsx, .xls, .ods o .csv")]
    InvalidFileType { extension: String },

    /// The reader could not parse the file.
    #[error("Error al leer el archivo: {0}. Asegurate de que es un Excel valido.")]
    UnreadableWorkbook(String),

    /// The workbook has no sheets at all.
    #[error("El archivo no contiene hojas.")]
    EmptyWorkbook,

    /// A sheet was requested by name and does not exist.
    #[error("La hoja '{name}' no existe. Hojas disponibles: {}", .available.join(", "))]
    SheetNotFound { name: String, available: Vec<String> },

    /// The selected sheet has no data rows.
    #[error("La hoja seleccionada esta vacia.")]
    EmptySheet,

    /// Required semantic fields could not be resolved from the header row.
    #[error(
        "El archivo no tiene las columnas requeridas: {}. Columnas encontradas: {}. Columnas reconocidas: {}.",
        labels(.missing),
        .found.join(", "),
        resolved_or_none(.resolved)
    )]
    MissingColumns {
        missing: Vec<Field>,
        found: Vec<String>,
        resolved: Vec<String>,
    },

    /// Normalization produced no contacts.
    ///
    /// Unreachable today: `EmptySheet` already rejects zero rows and every row
    /// yields a contact. Kept for normalizers that may drop rows.
    #[error("No se encontraron contactos en la hoja.")]
    NoContacts,
}

impl ImportError {
    /// Suggestion for the user on how to fix the spreadsheet, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingColumns { .. } => Some(
                "Asegurate de que el Excel contiene al menos: fecha, nombre, apellidos, telefono, mensaje bienvenida, comercial.",
            ),
            Self::InvalidFileType { .. } => Some("formatos admitidos: xlsx, xlsm, xlsb, xls, ods, csv, tsv"),
            _ => None,
        }
    }
}

fn labels(fields: &[Field]) -> String {
    fields.iter().map(Field::label).collect::<Vec<_>>().join(", ")
}

fn resolved_or_none(resolved: &[String]) -> String {
    if resolved.is_empty() {
        "ninguna reconocida".to_string()
    } else {
        resolved.join(", ")
    }
}

/// Clipboard write failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    /// No backend is available on this system.
    #[error("portapapeles no disponible: {0}")]
    Unavailable(String),

    /// The backend was found but the write failed.
    #[error("no se pudo escribir en el portapapeles: {0}")]
    WriteFailed(String),

    /// Both the primary writer and the fallback failed.
    #[error("no se pudo copiar el mensaje ({primary}; alternativa: {fallback})")]
    ClipboardWriteFailure {
        primary: Box<ClipboardError>,
        fallback: Box<ClipboardError>,
    },
}

impl ClipboardError {
    /// True when no backend could even be reached, as opposed to a backend
    /// that was found and then failed.
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::Unavailable(_) => true,
            Self::WriteFailed(_) => false,
            Self::ClipboardWriteFailure { primary, fallback } => {
                primary.is_unavailable() && fallback.is_unavailable()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_message_lists_everything() {
        let err = ImportError::MissingColumns {
            missing: vec![Field::Phone],
            found: vec!["Nombre".into(), "Ciudad".into()],
            resolved: vec!["Nombre".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("columnas requeridas: Telefono."));
        assert!(msg.contains("Columnas encontradas: Nombre, Ciudad."));
        assert!(msg.contains("Columnas reconocidas: Nombre."));
    }

    #[test]
    fn missing_columns_without_resolved_headers() {
        let err = ImportError::MissingColumns {
            missing: vec![Field::FirstName, Field::Phone],
            found: vec!["Ciudad".into()],
            resolved: vec![],
        };
        let msg = err.to_string();
        assert!(msg.contains("Nombre, Telefono"));
        assert!(msg.contains("ninguna reconocida"));
        assert!(err.hint().is_some());
    }

    #[test]
    fn write_failure_is_unavailable_only_when_both_sides_are() {
        let none = || Box::new(ClipboardError::Unavailable("x".into()));
        let both_missing = ClipboardError::ClipboardWriteFailure { primary: none(), fallback: none() };
        assert!(both_missing.is_unavailable());
        assert_eq!(
            both_missing.to_string(),
            "no se pudo copiar el mensaje (portapapeles no disponible: x; alternativa: portapapeles no disponible: x)"
        );

        let one_broke = ClipboardError::ClipboardWriteFailure {
            primary: Box::new(ClipboardError::WriteFailed("xclip salio con 1".into())),
            fallback: none(),
        };
        assert!(!one_broke.is_unavailable());
        assert!(!ClipboardError::WriteFailed("x".into()).is_unavailable());
    }
}
