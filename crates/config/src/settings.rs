// User settings

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use welcomer_engine::Variant;

/// Message used until the user sets their own.
pub const DEFAULT_TEMPLATE: &str = "Hola {nombre}! {bienvenida} a la familia. Soy {comercial}, \
tu comercial de referencia. Para cualquier duda puedes escribirme a este numero.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Message
    pub template: String,
    pub variant: Variant,

    // Clipboard
    /// Explicit copy command (e.g. "wl-copy"); `None` = auto-detect
    #[serde(rename = "clipboard.command")]
    pub clipboard_command: Option<String>,

    #[serde(rename = "clipboard.osc52Fallback")]
    pub osc52_fallback: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            variant: Variant::default(),
            clipboard_command: None,
            osc52_fallback: true,
        }
    }
}

/// Strip comment lines (lines starting with //) so the file can be parsed as JSON.
fn strip_comments(contents: &str) -> String {
    contents
        .lines()
        .filter(|line| !line.trim().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("welcomer");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load from an explicit path. A missing file is created with defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(path);
            return settings;
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&strip_comments(&contents)) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("error parsing {}: {}; using default settings", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Create default settings file with comments
    fn create_default_file(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("error creating config directory: {}", e);
                return;
            }
        }

        // serde_json quoting keeps the template valid JSON
        let template = serde_json::to_string(&self.template).unwrap_or_else(|_| "\"\"".into());
        let default_config = format!(
            r#"{{
    // Message template. Placeholders: {{bienvenida}} {{nombre}} {{apellidos}}
    // {{nombre_completo}} {{telefono}} {{fecha}} {{comercial}}
    "template": {template},

    // "femenino" (Bienvenida) or "masculino" (Bienvenido)
    "variant": "{variant}",

    // Clipboard: explicit command (null = pbcopy / wl-copy / xclip / xsel / clip.exe)
    "clipboard.command": null,
    // Fall back to the terminal's OSC 52 clipboard when the command fails
    "clipboard.osc52Fallback": {osc52}
}}
"#,
            variant = self.variant,
            osc52 = self.osc52_fallback,
        );

        match fs::write(path, default_config) {
            Ok(()) => log::info!("wrote default settings to {}", path.display()),
            Err(e) => log::warn!("error writing default settings.json: {}", e),
        }
    }

    /// Get the config file path for display/opening
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_load_writes_parseable_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("welcomer").join("settings.json");

        let settings = Settings::load_from(&path);
        assert_eq!(settings, Settings::default());
        assert!(path.exists());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("// Message template"));
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            "{\n  // mine\n  \"variant\": \"masculino\",\n  \"clipboard.command\": \"wl-copy\"\n}",
        )
        .unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.variant, Variant::Masculino);
        assert_eq!(settings.clipboard_command.as_deref(), Some("wl-copy"));
        assert_eq!(settings.template, DEFAULT_TEMPLATE);
        assert!(settings.osc52_fallback);
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ \"variant\": ").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());

        fs::write(&path, "{ \"variant\": \"neutro\" }").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            template: "Hola {nombre}".into(),
            variant: Variant::Masculino,
            clipboard_command: None,
            osc52_fallback: false,
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn json_keys() {
        let value = serde_json::to_value(Settings::default()).unwrap();
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["clipboard.command", "clipboard.osc52Fallback", "template", "variant"]
        );
        assert_eq!(value["variant"], "femenino");
    }

    #[test]
    fn config_path_ends_with_app_dir() {
        let path = Settings::config_path();
        assert!(path.ends_with("welcomer/settings.json"));
    }
}
