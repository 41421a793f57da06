// Message composition: template + contact + variant -> personalized text

use std::borrow::Cow;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::contact::Contact;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^{}]*)\}").expect("token regex"));

/// Grammatical form used for the salutation placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Femenino,
    Masculino,
}

impl Variant {
    /// Literal substituted for `{bienvenida}`.
    pub fn salutation(&self) -> &'static str {
        match self {
            Self::Femenino => "Bienvenida",
            Self::Masculino => "Bienvenido",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Femenino => Self::Masculino,
            Self::Masculino => Self::Femenino,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Femenino => "femenino",
            Self::Masculino => "masculino",
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "femenino" | "f" => Ok(Self::Femenino),
            "masculino" | "m" => Ok(Self::Masculino),
            other => Err(format!("unknown variant '{other}' (expected femenino or masculino)")),
        }
    }
}

/// Placeholders recognised inside `{...}`, matched case-insensitively.
pub const PLACEHOLDERS: &[&str] = &[
    "bienvenida",
    "nombre",
    "apellidos",
    "nombre_completo",
    "telefono",
    "fecha",
    "comercial",
];

fn substitution<'a>(key: &str, contact: &'a Contact, variant: Variant) -> Option<Cow<'a, str>> {
    let value = match key.to_lowercase().as_str() {
        "bienvenida" => Cow::Borrowed(variant.salutation()),
        "nombre" => Cow::Borrowed(contact.first_name.as_str()),
        "apellidos" => Cow::Borrowed(contact.last_name.as_str()),
        "nombre_completo" => Cow::Owned(contact.full_name()),
        "telefono" => Cow::Borrowed(contact.phone.as_str()),
        "fecha" => Cow::Borrowed(contact.date.as_str()),
        "comercial" => Cow::Borrowed(contact.agent.as_str()),
        _ => return None,
    };
    Some(value)
}

/// Replace every recognised placeholder in `template`.
///
/// Unknown `{tokens}` are kept verbatim. Substitution is a single pass over
/// the template, so placeholder-looking text inside contact values is never
/// expanded again.
pub fn compose_message(template: &str, contact: &Contact, variant: Variant) -> String {
    TOKEN
        .replace_all(template, |caps: &Captures| {
            match substitution(&caps[1], contact, variant) {
                Some(value) => value.into_owned(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Placeholders in `template` that [`compose_message`] will leave untouched.
pub fn unknown_placeholders(template: &str) -> Vec<String> {
    TOKEN
        .captures_iter(template)
        .filter(|caps| !PLACEHOLDERS.contains(&caps[1].to_lowercase().as_str()))
        .map(|caps| caps[0].to_string())
        .collect()
}
