use serde::{Deserialize, Serialize};

/// Placeholder shown for fields the sheet did not provide.
pub const MISSING: &str = "-";

/// One outreach target, normalized from a spreadsheet row.
///
/// Contacts are never mutated after import; session tracking lives in
/// [`crate::Session`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub date: String,
    pub first_name: String,
    /// Empty when the sheet has no last name (never `"-"`).
    pub last_name: String,
    pub phone: String,
    /// Prior welcome message recorded in the source data.
    pub welcome_sent: bool,
    pub agent: String,
}

impl Contact {
    /// First and last name joined by a single space, empty parts omitted.
    pub fn full_name(&self) -> String {
        [self.first_name.as_str(), self.last_name.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Name for list rows and headings; `"-"` when both parts are empty.
    pub fn display_name(&self) -> String {
        let name = self.full_name();
        if name.is_empty() {
            MISSING.to_string()
        } else {
            name
        }
    }
}

// ---------------------------------------------------------------------------
// Semantic fields
// ---------------------------------------------------------------------------

/// Semantic column a spreadsheet header can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Date,
    FirstName,
    LastName,
    Phone,
    WelcomeSent,
    Agent,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Date,
        Field::FirstName,
        Field::LastName,
        Field::Phone,
        Field::WelcomeSent,
        Field::Agent,
    ];

    /// Fields a sheet must provide for the import to succeed.
    pub const REQUIRED: [Field; 2] = [Field::FirstName, Field::Phone];

    /// Label shown to users in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Date => "Fecha",
            Self::FirstName => "Nombre",
            Self::LastName => "Apellidos",
            Self::Phone => "Telefono",
            Self::WelcomeSent => "Bienvenida",
            Self::Agent => "Comercial",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Phone => "phone",
            Self::WelcomeSent => "welcomeSent",
            Self::Agent => "agent",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
