pub mod editor;
pub mod sheets;

use std::io::stdout;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};

use welcomer_engine::compose::unknown_placeholders;
use welcomer_engine::{compose_message, ContactStatus, CopyChannel, Session, SessionView};
use welcomer_io::LoadedWorkbook;

use crate::clipboard::Clipboards;
use crate::util;
use editor::TemplateEditor;
use sheets::SheetEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Picker,
    Session,
    Editor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Success,
    Error,
}

pub struct App {
    file_name: String,
    sheets: Vec<SheetEntry>,
    picker_selected: usize,
    /// Index into `sheets` of the sheet the session was loaded from
    loaded_sheet: Option<usize>,
    session: Session,
    view: SessionView,
    /// Highlighted row of the contact list; Enter jumps there
    list_selected: usize,
    screen: Screen,
    editor: TemplateEditor,
    status: Option<(String, StatusKind)>,
    clipboards: Clipboards,
    should_quit: bool,
    show_help: bool,
}

fn status_color(status: ContactStatus) -> Color {
    match status {
        ContactStatus::WelcomeSent => Color::Green,
        ContactStatus::Sent => Color::Cyan,
        ContactStatus::Copied => Color::Blue,
        ContactStatus::None => Color::DarkGray,
    }
}

impl App {
    pub fn new(file_name: String, wb: LoadedWorkbook, session: Session, clipboards: Clipboards) -> Self {
        let view = session.view();
        Self {
            file_name,
            sheets: sheets::entries(&wb),
            picker_selected: 0,
            loaded_sheet: None,
            session,
            view,
            list_selected: 0,
            screen: Screen::Picker,
            editor: TemplateEditor::default(),
            status: None,
            clipboards,
            should_quit: false,
            show_help: false,
        }
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some((text.into(), kind));
    }

    /// Load the contacts of sheet `idx` into the session. A sheet that failed
    /// to import leaves the current session as it was.
    fn load_sheet(&mut self, idx: usize) {
        let Some(entry) = self.sheets.get(idx) else {
            return;
        };
        match &entry.import {
            Ok(imported) => {
                let contacts = imported.contacts.clone();
                let text = format!("Hoja '{}': {} contactos", entry.name, contacts.len());
                self.view = self.session.load(contacts);
                self.loaded_sheet = Some(idx);
                self.picker_selected = idx;
                self.list_selected = 0;
                self.screen = Screen::Session;
                self.set_status(text, StatusKind::Info);
            }
            Err(e) => {
                let text = e.to_string();
                self.set_status(text, StatusKind::Error);
            }
        }
    }

    fn update(&mut self, view: SessionView) {
        self.list_selected = view.position;
        self.view = view;
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            self.show_help = false;
            return;
        }

        match self.screen {
            Screen::Picker => self.handle_picker_key(key),
            Screen::Session => self.handle_session_key(key),
            Screen::Editor => self.handle_editor_key(key),
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                if self.loaded_sheet.is_some() {
                    self.screen = Screen::Session;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.picker_selected = self.picker_selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.picker_selected + 1 < self.sheets.len() {
                    self.picker_selected += 1;
                }
            }
            KeyCode::Enter => self.load_sheet(self.picker_selected),
            KeyCode::Char(c @ '1'..='9') => {
                let idx = (c as usize) - ('1' as usize);
                self.load_sheet(idx);
            }
            _ => {}
        }
    }

    fn handle_session_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Left | KeyCode::Char('h') => {
                let view = self.session.go_prev();
                self.update(view);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.view.can_go_next {
                    let name = self.view.current.as_ref().map(|c| c.display_name()).unwrap_or_default();
                    let view = self.session.advance_and_mark_sent();
                    self.update(view);
                    self.set_status(format!("{} marcado como enviado", name), StatusKind::Info);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.list_selected = self.list_selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.list_selected + 1 < self.view.total {
                    self.list_selected += 1;
                }
            }
            KeyCode::Enter => {
                let view = self.session.jump_to(self.list_selected);
                self.update(view);
            }
            KeyCode::Char('c') | KeyCode::Char('C') if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.copy_current();
            }
            KeyCode::Char('v') => {
                let view = self.session.set_variant(self.session.variant().toggled());
                self.update(view);
                self.set_status(format!("Variante: {}", self.view.variant), StatusKind::Info);
            }
            KeyCode::Char('e') => {
                self.editor = TemplateEditor::new(self.session.template());
                self.screen = Screen::Editor;
            }
            KeyCode::Char('r') => {
                let view = self.session.reset();
                self.update(view);
                self.loaded_sheet = None;
                self.screen = Screen::Picker;
                self.set_status("Sesion reiniciada", StatusKind::Info);
            }
            KeyCode::Char('s') => self.screen = Screen::Picker,
            _ => {}
        }
    }

    fn copy_current(&mut self) {
        let result = self
            .session
            .copy_current(self.clipboards.primary.as_mut(), self.clipboards.fallback.as_mut());
        match result {
            Ok(Some(CopyChannel::Primary)) => self.set_status("Copiado!", StatusKind::Success),
            Ok(Some(CopyChannel::Fallback)) => {
                let via = self.clipboards.fallback.name().to_string();
                self.set_status(format!("Copiado! (via {})", via), StatusKind::Success);
            }
            Ok(None) => {}
            Err(e) => self.set_status(e.to_string(), StatusKind::Error),
        }
        let view = self.session.view();
        self.update(view);
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.screen = Screen::Session;
                self.set_status("Edicion cancelada", StatusKind::Info);
            }
            KeyCode::Char('s') if ctrl => {
                let view = self.session.set_template(self.editor.text());
                self.update(view);
                self.screen = Screen::Session;
                self.set_status("Plantilla actualizada", StatusKind::Success);
            }
            KeyCode::Char(c) if !ctrl => self.editor.insert(c),
            KeyCode::Enter => self.editor.insert('\n'),
            KeyCode::Backspace => self.editor.backspace(),
            KeyCode::Delete => self.editor.delete(),
            KeyCode::Left => self.editor.left(),
            KeyCode::Right => self.editor.right(),
            KeyCode::Home => self.editor.home(),
            KeyCode::End => self.editor.end(),
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

        self.draw_title(frame, chunks[0]);
        match self.screen {
            Screen::Picker => self.draw_picker(frame, chunks[1]),
            Screen::Session => self.draw_session(frame, chunks[1]),
            Screen::Editor => self.draw_editor(frame, chunks[1]),
        }
        self.draw_status(frame, chunks[2]);

        if self.show_help {
            self.draw_help(frame, area);
        }
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let sheet_info = match self.loaded_sheet.and_then(|i| self.sheets.get(i)) {
            Some(entry) => format!(" | hoja: {}", entry.name),
            None => String::new(),
        };
        let title = format!(
            " welcomer: {}{} | variante: {} ",
            self.file_name, sheet_info, self.view.variant
        );
        let para = Paragraph::new(Line::from(vec![Span::styled(
            title,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]))
        .style(Style::default().bg(Color::Cyan));
        frame.render_widget(para, area);
    }

    fn draw_picker(&self, frame: &mut Frame, area: Rect) {
        let name_width = self
            .sheets
            .iter()
            .map(|s| util::display_width(&s.name))
            .max()
            .unwrap_or(0)
            .clamp(6, 30);

        let items: Vec<ListItem> = self
            .sheets
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let summary_style = if entry.is_usable() {
                    Style::default().fg(Color::Gray)
                } else {
                    Style::default().fg(Color::Red)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {:>2} ", i + 1), Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        util::pad_right(&entry.name, name_width),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("  {:>5} filas  ", entry.rows), Style::default().fg(Color::DarkGray)),
                    Span::styled(entry.summary(), summary_style),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(" Elige una hoja "),
            )
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(self.picker_selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_session(&self, frame: &mut Frame, area: Rect) {
        if self.view.total == 0 {
            let msg = Paragraph::new("(sin contactos: pulsa r para elegir otra hoja)")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(msg, area);
            return;
        }

        let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Min(3)]).split(area);
        self.draw_progress(frame, rows[0], rows[1]);

        let cols = Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)]).split(rows[2]);
        self.draw_contact_list(frame, cols[0]);

        let right = Layout::vertical([Constraint::Length(7), Constraint::Min(3)]).split(cols[1]);
        self.draw_contact_card(frame, right[0]);
        self.draw_message(frame, right[1], self.view.message.as_deref().unwrap_or(""), " Mensaje ");
    }

    fn draw_progress(&self, frame: &mut Frame, gauge_area: Rect, summary_area: Rect) {
        let position = self.view.position + 1;
        let total = self.view.total.max(1);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
            .ratio(position as f64 / total as f64)
            .label(format!("{} de {}", position, self.view.total));
        frame.render_widget(gauge, gauge_area);

        let progress = &self.view.progress;
        let mut spans = vec![Span::styled(
            format!(" {}", progress.summary()),
            Style::default().fg(Color::Gray),
        )];
        if progress.all_done {
            spans.push(Span::styled(
                "  Todos los contactos completados",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), summary_area);
    }

    fn draw_contact_list(&self, frame: &mut Frame, area: Rect) {
        let inner_width = (area.width as usize).saturating_sub(6);
        let items: Vec<ListItem> = self
            .session
            .contacts()
            .iter()
            .zip(&self.view.statuses)
            .enumerate()
            .map(|(i, (contact, status))| {
                let marker = if i == self.view.position { ">" } else { " " };
                let name = util::single_line(&contact.display_name());
                let phone_width = util::display_width(&contact.phone).min(inner_width / 2);
                let name_width = inner_width.saturating_sub(phone_width + 1);
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Yellow)),
                    Span::styled("● ", Style::default().fg(status_color(*status))),
                    Span::raw(util::pad_right(&name, name_width)),
                    Span::styled(
                        format!(" {}", util::truncate_display(&contact.phone, phone_width)),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(format!(" Contactos ({}) ", self.view.total)),
            )
            .highlight_style(Style::default().bg(Color::DarkGray));
        let mut state = ListState::default().with_selected(Some(self.list_selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_contact_card(&self, frame: &mut Frame, area: Rect) {
        let Some(contact) = &self.view.current else {
            return;
        };
        let label = |text: &'static str| Span::styled(format!("{:<11}", text), Style::default().fg(Color::DarkGray));
        let mut lines = vec![
            Line::from(vec![
                label("Nombre"),
                Span::styled(contact.display_name(), Style::default().add_modifier(Modifier::BOLD)),
            ]),
            Line::from(vec![label("Telefono"), Span::raw(contact.phone.clone())]),
            Line::from(vec![label("Fecha"), Span::raw(contact.date.clone())]),
            Line::from(vec![label("Comercial"), Span::raw(contact.agent.clone())]),
        ];
        if let Some(status) = self.view.current_status.filter(|s| *s != ContactStatus::None) {
            lines.push(Line::from(Span::styled(
                format!(" {} ", status.label()),
                Style::default().fg(Color::Black).bg(status_color(status)),
            )));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Contacto ");
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_message(&self, frame: &mut Frame, area: Rect, message: &str, title: &str) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title.to_string());
        let para = Paragraph::new(message.to_string())
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(para, area);
    }

    fn draw_editor(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([Constraint::Percentage(50), Constraint::Length(1), Constraint::Min(3)]).split(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Plantilla (Ctrl+S guardar, Esc cancelar) ");
        frame.render_widget(Paragraph::new(self.editor.text().to_string()).block(block), rows[0]);

        let (line, col) = self.editor.cursor_line_col();
        let x = rows[0].x + 1 + col as u16;
        let y = rows[0].y + 1 + line as u16;
        if x < rows[0].right().saturating_sub(1) && y < rows[0].bottom().saturating_sub(1) {
            frame.set_cursor_position((x, y));
        }

        let unknown = unknown_placeholders(self.editor.text());
        let hint = if unknown.is_empty() {
            Span::styled(
                " {bienvenida} {nombre} {apellidos} {nombre_completo} {telefono} {fecha} {comercial}",
                Style::default().fg(Color::DarkGray),
            )
        } else {
            Span::styled(
                format!(" Marcadores desconocidos: {}", unknown.join(", ")),
                Style::default().fg(Color::Yellow),
            )
        };
        frame.render_widget(Paragraph::new(Line::from(hint)), rows[1]);

        let preview = self
            .view
            .current
            .as_ref()
            .map(|c| compose_message(self.editor.text(), c, self.view.variant))
            .unwrap_or_default();
        self.draw_message(frame, rows[2], &preview, " Vista previa ");
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let (left, style) = match &self.status {
            Some((text, StatusKind::Error)) => (text.as_str(), Style::default().fg(Color::White).bg(Color::Red)),
            Some((text, StatusKind::Success)) => (text.as_str(), Style::default().fg(Color::Black).bg(Color::Green)),
            Some((text, StatusKind::Info)) => (text.as_str(), Style::default().fg(Color::Black).bg(Color::DarkGray)),
            None => ("", Style::default().fg(Color::Black).bg(Color::DarkGray)),
        };
        let right = match self.screen {
            Screen::Picker => "Enter: abrir  ?: ayuda  q: salir ",
            Screen::Session => "<-/->  c: copiar  v: variante  ?: ayuda ",
            Screen::Editor => "Ctrl+S: guardar  Esc: cancelar ",
        };

        let width = area.width as usize;
        let right_width = util::display_width(right);
        let left = util::truncate_display(&format!(" {}", util::single_line(left)), width.saturating_sub(right_width));
        let padding = width.saturating_sub(util::display_width(&left) + right_width);

        let line = Line::from(vec![
            Span::styled(format!("{}{:pad$}", left, "", pad = padding), style),
            Span::styled(right, Style::default().fg(Color::Black).bg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(line).style(Style::default().bg(Color::DarkGray)), area);
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let help_lines = [
            "",
            "  Contactos",
            "  ---------",
            "  <- / h            Anterior",
            "  -> / l            Siguiente (marca enviado)",
            "  arriba / abajo    Mover en la lista",
            "  Enter             Ir al contacto marcado",
            "",
            "  Mensaje",
            "  -------",
            "  c                 Copiar al portapapeles",
            "  v                 Femenino / masculino",
            "  e                 Editar plantilla",
            "",
            "  General",
            "  -------",
            "  s                 Cambiar de hoja",
            "  r                 Reiniciar sesion",
            "  q / Esc           Salir",
            "  ?                 Esta ayuda",
            "",
        ];
        let help_width: u16 = 48;
        let help_height: u16 = help_lines.len() as u16 + 2;

        let x = area.width.saturating_sub(help_width) / 2;
        let y = area.height.saturating_sub(help_height) / 2;
        let popup = Rect::new(
            area.x + x,
            area.y + y,
            help_width.min(area.width),
            help_height.min(area.height),
        );

        let lines: Vec<Line> = help_lines
            .iter()
            .map(|s| Line::from(Span::styled(*s, Style::default().fg(Color::White))))
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Teclas ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(Color::Black));

        frame.render_widget(Clear, popup);
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }
}

/// Run the interactive session. `initial` preselects a sheet and skips the
/// picker when that sheet imports cleanly.
pub fn run(mut app: App, initial: Option<usize>) -> Result<(), String> {
    if let Some(idx) = initial {
        app.load_sheet(idx);
    }

    terminal::enable_raw_mode().map_err(|e| format!("failed to enable raw mode: {}", e))?;
    stdout()
        .execute(EnterAlternateScreen)
        .map_err(|e| format!("failed to enter alternate screen: {}", e))?;

    struct Cleanup;
    impl Drop for Cleanup {
        fn drop(&mut self) {
            let _ = stdout().execute(LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
        }
    }
    let _cleanup = Cleanup;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend).map_err(|e| format!("failed to create terminal: {}", e))?;

    loop {
        terminal
            .draw(|frame| app.draw(frame))
            .map_err(|e| format!("draw error: {}", e))?;

        if event::poll(Duration::from_millis(100)).map_err(|e| format!("event poll error: {}", e))? {
            if let Event::Key(key) = event::read().map_err(|e| format!("event read error: {}", e))? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
