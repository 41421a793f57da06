// welcomer - import a contact spreadsheet and walk through welcome messages

mod clipboard;
mod exit_codes;
mod tui;
mod util;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use welcomer_config::Settings;
use welcomer_engine::compose::unknown_placeholders;
use welcomer_engine::{
    import_sheet_detailed, ClipboardError, Field, ImportError, ImportedSheet, RawSheet, Session,
    Variant,
};
use welcomer_io::LoadedWorkbook;

use exit_codes::{
    clipboard_exit_code, import_exit_code, EXIT_CONFIG_WRITE, EXIT_ERROR, EXIT_NOT_A_TTY,
    EXIT_SUCCESS, EXIT_TERMINAL, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "welcomer")]
#[command(about = "Walk through a contact spreadsheet sending personalised welcome messages")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sheets of a workbook
    #[command(after_help = "\
Examples:
  welcomer sheets altas.xlsx
  welcomer sheets altas.xlsx --json")]
    Sheets {
        /// Spreadsheet file (xlsx, xlsm, xlsb, xls, ods, csv, tsv)
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import a sheet and report how its columns were recognised
    #[command(after_help = "\
Examples:
  welcomer check altas.xlsx
  welcomer check altas.xlsx --sheet Enero --json")]
    Check {
        file: PathBuf,

        /// Sheet name or 1-based number (default: first sheet)
        #[arg(long, short = 's')]
        sheet: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the composed message for one contact
    #[command(after_help = "\
Examples:
  welcomer preview altas.xlsx
  welcomer preview altas.xlsx --index 3 --variant masculino
  welcomer preview altas.csv --template 'Hola {nombre}, soy {comercial}'
  welcomer preview altas.csv --index 2 --copy")]
    Preview {
        file: PathBuf,

        /// Sheet name or 1-based number (default: first sheet)
        #[arg(long, short = 's')]
        sheet: Option<String>,

        /// Contact number, 1-based
        #[arg(long, short = 'i', default_value_t = 1)]
        index: usize,

        /// Salutation form for {bienvenida}
        #[arg(long, env = "WELCOMER_VARIANT")]
        variant: Option<VariantArg>,

        /// Template text (overrides settings)
        #[arg(long, short = 't', conflicts_with = "template_file")]
        template: Option<String>,

        /// Read the template from a file (overrides settings)
        #[arg(long, env = "WELCOMER_TEMPLATE_FILE")]
        template_file: Option<PathBuf>,

        /// Also copy the message to the clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Interactive outreach session in the terminal
    #[command(after_help = "\
Keys:
  <- / ->   previous / next contact (next marks the current one as sent)
  up / dn   move in the contact list, Enter to jump
  c         copy message      v  toggle femenino/masculino
  e         edit template     r  reset and choose another sheet
  ?         help              q  quit")]
    Run {
        file: PathBuf,

        /// Sheet name or 1-based number (default: ask when there are several)
        #[arg(long, short = 's')]
        sheet: Option<String>,

        /// Salutation form for {bienvenida}
        #[arg(long, env = "WELCOMER_VARIANT")]
        variant: Option<VariantArg>,

        /// Read the template from a file (overrides settings)
        #[arg(long, env = "WELCOMER_TEMPLATE_FILE")]
        template_file: Option<PathBuf>,
    },

    /// Show or change the settings file
    #[command(after_help = "\
Examples:
  welcomer config
  welcomer config --path
  welcomer config --variant masculino --template-file plantilla.txt")]
    Config {
        /// Print only the settings file path
        #[arg(long)]
        path: bool,

        /// Store a new default variant
        #[arg(long)]
        variant: Option<VariantArg>,

        /// Store the contents of this file as the default template
        #[arg(long)]
        template_file: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantArg {
    #[value(alias = "f")]
    Femenino,
    #[value(alias = "m")]
    Masculino,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Femenino => Variant::Femenino,
            VariantArg::Masculino => Variant::Masculino,
        }
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  welcomer-engine ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

/// Logs go to stderr; inside the terminal UI they would draw over the screen,
/// so the interactive session stays silent unless RUST_LOG asks otherwise.
fn init_logging(interactive: bool) {
    let default = if interactive { "off" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(matches!(cli.command, Some(Commands::Run { .. })));

    let result = match cli.command {
        None => {
            eprintln!("Usage: welcomer <command> [options]");
            eprintln!("       welcomer --help for more information");
            Ok(())
        }
        Some(Commands::Sheets { file, json }) => cmd_sheets(file, json),
        Some(Commands::Check { file, sheet, json }) => cmd_check(file, sheet, json),
        Some(Commands::Preview { file, sheet, index, variant, template, template_file, copy }) => {
            cmd_preview(file, sheet, index, variant, template, template_file, copy)
        }
        Some(Commands::Run { file, sheet, variant, template_file }) => {
            cmd_run(file, sheet, variant, template_file)
        }
        Some(Commands::Config { path, variant, template_file }) => {
            cmd_config(path, variant, template_file)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn terminal(msg: impl Into<String>) -> Self {
        Self { code: EXIT_TERMINAL, message: msg.into(), hint: None }
    }

    /// Import failure with its exit code and spreadsheet hint.
    pub fn import(err: ImportError) -> Self {
        Self {
            code: import_exit_code(&err),
            hint: err.hint().map(str::to_string),
            message: err.to_string(),
        }
    }

    pub fn clipboard(err: ClipboardError) -> Self {
        let hint = err.is_unavailable().then(|| {
            "instala wl-copy, xclip o xsel, o define \"clipboard.command\" en la configuracion"
                .to_string()
        });
        Self { code: clipboard_exit_code(&err), message: err.to_string(), hint }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

fn open_workbook(file: &Path) -> Result<LoadedWorkbook, CliError> {
    welcomer_io::open(file).map_err(CliError::import)
}

/// Pick a sheet by name, falling back to a 1-based number. Without a choice
/// the first sheet is used.
fn choose_sheet<'a>(wb: &'a LoadedWorkbook, choice: Option<&str>) -> Result<&'a RawSheet, CliError> {
    let Some(choice) = choice else {
        if wb.sheets.len() > 1 {
            log::info!("{} sheets, using the first one", wb.sheets.len());
        }
        return wb.select(None).map_err(CliError::import);
    };
    match wb.sheet(choice) {
        Ok(sheet) => Ok(sheet),
        Err(err) => match choice.parse::<usize>() {
            Ok(n) if (1..=wb.sheets.len()).contains(&n) => Ok(&wb.sheets[n - 1]),
            _ => Err(CliError::import(err)),
        },
    }
}

fn import(file: &Path, sheet: Option<&str>) -> Result<ImportedSheet, CliError> {
    let wb = open_workbook(file)?;
    let raw = choose_sheet(&wb, sheet)?;
    import_sheet_detailed(raw).map_err(CliError::import)
}

fn read_template_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path)
        .map(|s| s.trim_end_matches(['\r', '\n']).to_string())
        .map_err(|e| CliError::args(format!("cannot read template file {}: {}", path.display(), e)))
}

fn warn_unknown_placeholders(template: &str) {
    let unknown = unknown_placeholders(template);
    if !unknown.is_empty() {
        eprintln!("aviso: marcadores desconocidos (se dejan tal cual): {}", unknown.join(", "));
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })?;
    println!("{}", json);
    Ok(())
}

// ============================================================================
// sheets
// ============================================================================

#[derive(Serialize)]
struct SheetSummary<'a> {
    name: &'a str,
    rows: usize,
}

fn cmd_sheets(file: PathBuf, json: bool) -> Result<(), CliError> {
    let wb = open_workbook(&file)?;
    let summaries: Vec<SheetSummary> = wb
        .sheets
        .iter()
        .map(|s| SheetSummary { name: &s.name, rows: s.rows.len() })
        .collect();

    if json {
        return print_json(&summaries);
    }
    for (i, s) in summaries.iter().enumerate() {
        println!("{:>3}  {}  ({} filas)", i + 1, s.name, s.rows);
    }
    Ok(())
}

// ============================================================================
// check
// ============================================================================

#[derive(Serialize)]
struct CheckReport<'a> {
    file: String,
    sheet: &'a str,
    columns: &'a welcomer_engine::HeaderMap,
    ignored: Vec<&'a str>,
    contacts: usize,
    welcome_sent: usize,
}

fn cmd_check(file: PathBuf, sheet: Option<String>, json: bool) -> Result<(), CliError> {
    let wb = open_workbook(&file)?;
    let raw = choose_sheet(&wb, sheet.as_deref())?;
    let imported = import_sheet_detailed(raw).map_err(CliError::import)?;

    let resolved = imported.headers.resolved_headers();
    let report = CheckReport {
        file: file.display().to_string(),
        sheet: &imported.sheet,
        columns: &imported.headers,
        ignored: raw
            .headers
            .iter()
            .filter(|h| !resolved.contains(*h))
            .map(String::as_str)
            .collect(),
        contacts: imported.contacts.len(),
        welcome_sent: imported.welcome_sent_count(),
    };

    if json {
        return print_json(&report);
    }

    println!("archivo:    {}", report.file);
    println!("hoja:       {}", report.sheet);
    println!("columnas:");
    for field in Field::ALL {
        match imported.headers.get(field) {
            Some(header) => println!("  {}  <- {:?}", util::pad_right(field.label(), 11), header),
            None => println!("  {}  (no encontrada)", util::pad_right(field.label(), 11)),
        }
    }
    if !report.ignored.is_empty() {
        println!("ignoradas:  {}", report.ignored.join(", "));
    }
    println!("contactos:  {}", report.contacts);
    println!("bienvenida: {} ya enviadas", report.welcome_sent);
    Ok(())
}

// ============================================================================
// preview
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn cmd_preview(
    file: PathBuf,
    sheet: Option<String>,
    index: usize,
    variant: Option<VariantArg>,
    template: Option<String>,
    template_file: Option<PathBuf>,
    copy: bool,
) -> Result<(), CliError> {
    let settings = Settings::load();
    let template = match (template, template_file) {
        (Some(t), _) => t,
        (None, Some(path)) => read_template_file(&path)?,
        (None, None) => settings.template.clone(),
    };
    let variant = variant.map(Variant::from).unwrap_or(settings.variant);
    warn_unknown_placeholders(&template);

    let imported = import(&file, sheet.as_deref())?;
    let total = imported.contacts.len();
    if index == 0 || index > total {
        return Err(CliError::args(format!("index {} out of range", index))
            .with_hint(format!("the sheet has {} contacts (1..={})", total, total)));
    }

    let mut session = Session::new(template, variant);
    session.load(imported.contacts);
    let view = session.jump_to(index - 1);
    let message = view.message.unwrap_or_default();
    println!("{}", message);

    if copy {
        let mut boards = clipboard::Clipboards::from_settings(&settings);
        session
            .copy_current(boards.primary.as_mut(), boards.fallback.as_mut())
            .map_err(CliError::clipboard)?;
        eprintln!("copiado al portapapeles");
    }
    Ok(())
}

// ============================================================================
// run
// ============================================================================

fn cmd_run(
    file: PathBuf,
    sheet: Option<String>,
    variant: Option<VariantArg>,
    template_file: Option<PathBuf>,
) -> Result<(), CliError> {
    if !atty::is(atty::Stream::Stdin) || !atty::is(atty::Stream::Stdout) {
        return Err(CliError {
            code: EXIT_NOT_A_TTY,
            message: "run needs an interactive terminal".to_string(),
            hint: Some("use `welcomer preview` or `welcomer check` in scripts".to_string()),
        });
    }

    let settings = Settings::load();
    let template = match template_file {
        Some(path) => read_template_file(&path)?,
        None => settings.template.clone(),
    };
    let variant = variant.map(Variant::from).unwrap_or(settings.variant);

    let wb = open_workbook(&file)?;
    let initial = match sheet.as_deref() {
        Some(choice) => {
            let name = choose_sheet(&wb, Some(choice))?.name.clone();
            wb.sheets.iter().position(|s| s.name == name)
        }
        None => wb.single_sheet().map(|_| 0),
    };

    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file.display().to_string());
    let clipboards = clipboard::Clipboards::from_settings(&settings);

    let app = tui::App::new(file_name, wb, Session::new(template, variant), clipboards);
    tui::run(app, initial).map_err(CliError::terminal)
}

// ============================================================================
// config
// ============================================================================

fn cmd_config(
    path_only: bool,
    variant: Option<VariantArg>,
    template_file: Option<PathBuf>,
) -> Result<(), CliError> {
    if path_only {
        println!("{}", Settings::config_path_display());
        return Ok(());
    }

    let mut settings = Settings::load();
    if variant.is_some() || template_file.is_some() {
        if let Some(v) = variant {
            settings.variant = v.into();
        }
        if let Some(path) = template_file {
            settings.template = read_template_file(&path)?;
            warn_unknown_placeholders(&settings.template);
        }
        settings.save().map_err(|e| CliError {
            code: EXIT_CONFIG_WRITE,
            message: format!("cannot write {}: {}", Settings::config_path_display(), e),
            hint: None,
        })?;
        eprintln!("guardado en {}", Settings::config_path_display());
    }

    print_json(&settings)
}
