use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState,
    Wrap,
};
use ratatui::Frame;
use tracing::{debug, info};

use crate::db::RecordStore;

use super::forms::FormState;
use super::helpers::{centered_rect, key_hints, surface_error};
use super::screens::{MenuAction, MenuScreen, PatientTable};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
const APP_TITLE: &str = "Hospital Management System";
const PATIENT_COLUMNS: [&str; 5] = ["ID", "Name", "Age", "Gender", "Phone"];

/// Top-level screens behind any popup.
enum Screen {
    Menu(MenuScreen),
    Patients(PatientTable),
}

/// Popups layered over the current screen.
enum Mode {
    Normal,
    Form(FormState),
    Notice(Notice),
}

/// Blocking message box. Any dismissal key closes it; an error notice hands
/// focus back to the form that raised it.
struct Notice {
    kind: StatusKind,
    message: String,
    resume: Option<FormState>,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer and on notices.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }

    fn title(&self) -> &'static str {
        match self {
            StatusKind::Info => "Success",
            StatusKind::Error => "Error",
        }
    }
}

/// Application shell: menu, patient list, and whatever popup is open. All
/// records live in the store; nothing here caches them beyond a list snapshot.
pub struct App {
    store: RecordStore,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            screen: Screen::Menu(MenuScreen::default()),
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Process one key press. Returns `true` when the user asked to exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Form(form) => self.handle_form_key(code, form),
            Mode::Notice(notice) => self.handle_notice_key(code, notice),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::Menu(ref mut menu) => {
                let action = match code {
                    KeyCode::Char('q') | KeyCode::Esc => Some(MenuAction::Exit),
                    KeyCode::Up => {
                        menu.move_selection(-1);
                        None
                    }
                    KeyCode::Down => {
                        menu.move_selection(1);
                        None
                    }
                    KeyCode::Enter => Some(menu.current()),
                    KeyCode::Char(ch) => {
                        let action = MenuAction::from_digit(ch);
                        if let Some(action) = action {
                            menu.selected = menu_index(action);
                        }
                        action
                    }
                    _ => None,
                };

                match action {
                    Some(action) => self.activate(action, exit),
                    None => Ok(Mode::Normal),
                }
            }
            Screen::Patients(ref mut table) => {
                let mut back_to_menu = false;
                match code {
                    KeyCode::Char('q') => *exit = true,
                    KeyCode::Esc | KeyCode::Backspace => back_to_menu = true,
                    KeyCode::Up => table.move_selection(-1),
                    KeyCode::Down => table.move_selection(1),
                    KeyCode::PageUp => table.move_selection(-10),
                    KeyCode::PageDown => table.move_selection(10),
                    _ => {}
                }

                if back_to_menu {
                    self.screen = Screen::Menu(MenuScreen {
                        selected: menu_index(MenuAction::ViewPatients),
                    });
                    self.clear_status();
                }
                Ok(Mode::Normal)
            }
        }
    }

    fn activate(&mut self, action: MenuAction, exit: &mut bool) -> Result<Mode> {
        debug!(action = action.label(), "menu action");
        if let Some(spec) = action.form() {
            self.clear_status();
            return Ok(Mode::Form(FormState::new(spec)));
        }

        match action {
            MenuAction::ViewPatients => {
                match PatientTable::load(&self.store) {
                    Ok(table) => {
                        self.set_status(
                            format!("{} patient(s) on record.", table.patients.len()),
                            StatusKind::Info,
                        );
                        self.screen = Screen::Patients(table);
                    }
                    Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
                }
                Ok(Mode::Normal)
            }
            MenuAction::Exit => {
                info!("exit requested");
                *exit = true;
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::Normal),
        }
    }

    fn handle_form_key(&mut self, code: KeyCode, mut form: FormState) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status(format!("{} cancelled.", form.title()), StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                return match form.submit(&self.store) {
                    Ok(submission) => {
                        let message = submission.message();
                        self.set_status(message.clone(), StatusKind::Info);
                        Mode::Notice(Notice {
                            kind: StatusKind::Info,
                            message,
                            resume: None,
                        })
                    }
                    Err(err) => {
                        let reason = surface_error(&err);
                        self.set_status(reason.clone(), StatusKind::Error);
                        Mode::Notice(Notice {
                            kind: StatusKind::Error,
                            message: format!("Invalid input.\n{reason}"),
                            resume: Some(form),
                        })
                    }
                };
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::Form(form)
    }

    fn handle_notice_key(&mut self, code: KeyCode, notice: Notice) -> Mode {
        match code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => {
                notice.resume.map(Mode::Form).unwrap_or(Mode::Normal)
            }
            _ => Mode::Notice(notice),
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Menu(menu) => self.draw_menu(frame, content_area, menu),
            Screen::Patients(table) => self.draw_patients(frame, content_area, table),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Form(form) => self.draw_form(frame, area, form),
            Mode::Notice(notice) => self.draw_notice(frame, area, notice),
            Mode::Normal => {}
        }
    }

    fn draw_menu(&self, frame: &mut Frame, area: Rect, menu: &MenuScreen) {
        let block = Block::default()
            .title(APP_TITLE)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let items: Vec<ListItem> = MenuAction::ALL
            .iter()
            .enumerate()
            .map(|(idx, action)| ListItem::new(format!("{}. {}", idx + 1, action.label())))
            .collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let list_area = centered_rect(50, 60, inner);
        let mut state = ListState::default().with_selected(Some(menu.selected));
        frame.render_stateful_widget(list, list_area, &mut state);
    }

    fn draw_patients(&self, frame: &mut Frame, area: Rect, table: &PatientTable) {
        let title = format!("All Patients ({})", table.patients.len());
        let block = Block::default().title(title).borders(Borders::ALL);

        if table.patients.is_empty() {
            let message = Paragraph::new("No patients on record yet.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(
            PATIENT_COLUMNS
                .iter()
                .map(|title| Cell::from(*title).style(Style::default().add_modifier(Modifier::BOLD))),
        );

        let rows = table
            .patients
            .iter()
            .map(|patient| Row::new(PatientTable::row_cells(patient).map(Cell::from)));

        let widget = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Percentage(35),
                Constraint::Length(5),
                Constraint::Length(8),
                Constraint::Percentage(30),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().fg(Color::Yellow))
        .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(Some(table.selected));
        frame.render_stateful_widget(widget, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph =
            Paragraph::new(vec![status_line, self.footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        match (&self.screen, &self.mode) {
            (_, Mode::Form(_)) => key_hints(&[
                ("Enter", "Submit"),
                ("Tab", "Next field"),
                ("Esc", "Cancel"),
            ]),
            (_, Mode::Notice(_)) => key_hints(&[("Enter", "Dismiss")]),
            (Screen::Patients(_), _) => key_hints(&[
                ("↑↓", "Scroll"),
                ("Esc", "Back"),
                ("q", "Quit"),
            ]),
            (Screen::Menu(_), _) => key_hints(&[
                ("↑↓", "Navigate"),
                ("Enter", "Open"),
                ("1-6", "Shortcut"),
                ("q", "Quit"),
            ]),
        }
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, form: &FormState) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(form.title()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = (0..form.fields().len())
            .map(|idx| form.build_line(idx))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to submit • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);

        if let Some(position) = form_cursor(inner, form) {
            frame.set_cursor_position(position);
        }
    }

    fn draw_notice(&self, frame: &mut Frame, area: Rect, notice: &Notice) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(notice.kind.title())
            .borders(Borders::ALL)
            .border_style(notice.kind.style());

        let mut lines: Vec<Line> = notice
            .message
            .lines()
            .map(|line| Line::from(line.to_string()))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Enter to continue",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(paragraph, popup_area);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

/// Cursor cell for the active field, or `None` when it falls outside `inner`.
fn form_cursor(inner: Rect, form: &FormState) -> Option<(u16, u16)> {
    let x = u16::try_from(form.cursor_offset())
        .ok()
        .and_then(|offset| inner.x.checked_add(offset))?;
    let y = u16::try_from(form.active)
        .ok()
        .and_then(|row| inner.y.checked_add(row))?;
    (x < inner.right() && y < inner.bottom()).then_some((x, y))
}

fn menu_index(action: MenuAction) -> usize {
    MenuAction::ALL
        .iter()
        .position(|candidate| *candidate == action)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tempfile::{tempdir, TempDir};

    fn test_app() -> (TempDir, App) {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("hospital.db"));
        store.initialize().unwrap();
        (dir, App::new(store))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn menu_lists_all_six_actions() {
        let (_dir, app) = test_app();
        let screen = render(&app);
        assert!(screen.contains(APP_TITLE));
        for action in MenuAction::ALL {
            assert!(screen.contains(action.label()), "missing {}", action.label());
        }
    }

    #[test]
    fn exit_entry_and_q_both_quit() {
        let (_dir, mut app) = test_app();
        assert!(app.handle_key(KeyCode::Char('6')).unwrap());

        let (_dir, mut app) = test_app();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn add_patient_flow_writes_and_notifies() {
        let (_dir, mut app) = test_app();
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(app.mode, Mode::Form(_)));

        type_text(&mut app, "Alice");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "34");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "F");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "555-1111");
        assert!(!app.handle_key(KeyCode::Enter).unwrap());

        match &app.mode {
            Mode::Notice(notice) => {
                assert_eq!(notice.kind, StatusKind::Info);
                assert_eq!(notice.message, "Add Patient successful! (id 1)");
                assert!(notice.resume.is_none());
            }
            _ => panic!("expected a success notice"),
        }
        assert!(render(&app).contains("Success"));

        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.store.list_patients().unwrap().len(), 1);
    }

    #[test]
    fn bad_age_keeps_form_open_after_error() {
        let (_dir, mut app) = test_app();
        app.handle_key(KeyCode::Char('1')).unwrap();
        type_text(&mut app, "Alice");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "abc");
        app.handle_key(KeyCode::Enter).unwrap();

        match &app.mode {
            Mode::Notice(notice) => {
                assert_eq!(notice.kind, StatusKind::Error);
                assert!(notice.message.starts_with("Invalid input.\n"));
                assert!(notice.resume.is_some());
            }
            _ => panic!("expected an error notice"),
        }
        assert!(render(&app).contains("Error"));

        app.handle_key(KeyCode::Enter).unwrap();
        match &app.mode {
            Mode::Form(form) => {
                assert_eq!(form.input(0), "Alice");
                assert_eq!(form.input(1), "abc");
            }
            _ => panic!("form should be open again"),
        }
        assert!(app.store.list_patients().unwrap().is_empty());
    }

    #[test]
    fn form_cursor_follows_input_and_clips() {
        let inner = Rect::new(10, 5, 40, 6);
        let mut form = FormState::new(crate::ui::features::ADD_DOCTOR);
        form.push_char('A');
        assert_eq!(form_cursor(inner, &form), Some((10 + 7, 5)));

        form.next_field();
        assert_eq!(form_cursor(inner, &form), Some((10 + 16, 6)));

        for _ in 0..70_000 {
            form.push_char('x');
        }
        assert_eq!(form_cursor(inner, &form), None);
    }

    #[test]
    fn very_long_input_still_renders() {
        let (_dir, mut app) = test_app();
        app.handle_key(KeyCode::Char('2')).unwrap();
        type_text(&mut app, &"y".repeat(70_000));
        assert!(render(&app).contains("Add Doctor"));
    }

    #[test]
    fn escape_cancels_form_without_writing() {
        let (_dir, mut app) = test_app();
        app.handle_key(KeyCode::Char('2')).unwrap();
        type_text(&mut app, "Dr. Ada");
        app.handle_key(KeyCode::Esc).unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        assert!(app.store.list_doctors().unwrap().is_empty());
        assert_eq!(app.status.as_ref().unwrap().text, "Add Doctor cancelled.");
    }

    #[test]
    fn view_patients_shows_rows_in_insertion_order() {
        let (_dir, mut app) = test_app();
        app.store.insert_patient("Alice", 34, "F", "555-1111").unwrap();
        app.store.insert_patient("Bob", 40, "M", "555-2222").unwrap();

        app.handle_key(KeyCode::Char('5')).unwrap();
        let screen = render(&app);
        let alice = screen.find("Alice").unwrap();
        let bob = screen.find("Bob").unwrap();
        assert!(alice < bob);
        assert!(screen.contains("Phone"));

        app.handle_key(KeyCode::Esc).unwrap();
        assert!(matches!(app.screen, Screen::Menu(_)));
    }
}
