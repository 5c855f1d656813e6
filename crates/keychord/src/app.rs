//! Reference host: a single-buffer terminal editor driven by the modal
//! dispatcher.

use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
use tui_textarea::{CursorMove, TextArea};

use keychord::{
    format_sequence, translate, ActionRegistry, Config, Dispatch, EditingSurface, Keymap,
    ModalDispatcher, Mode,
};

/// The editable surface actions run against.
pub struct Editor {
    pub textarea: TextArea<'static>,
    path: Option<PathBuf>,
    /// Last yanked or deleted line
    register: Option<String>,
    half_page_lines: usize,
    /// Mode an action asked for, applied after dispatch
    mode_request: Option<Mode>,
    status: Option<String>,
    show_help: bool,
}

impl Editor {
    pub fn new(lines: Vec<String>, path: Option<PathBuf>) -> Self {
        let mut textarea = if lines.is_empty() {
            TextArea::default()
        } else {
            TextArea::new(lines)
        };
        textarea.set_cursor_line_style(Style::default().add_modifier(Modifier::UNDERLINED));

        Self {
            textarea,
            path,
            register: None,
            half_page_lines: 10,
            mode_request: None,
            status: None,
            show_help: false,
        }
    }

    /// Open `path`, starting empty if it does not exist yet.
    pub fn open(path: PathBuf) -> Result<Self> {
        let lines = if path.exists() {
            std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?
                .lines()
                .map(str::to_string)
                .collect()
        } else {
            Vec::new()
        };
        Ok(Self::new(lines, Some(path)))
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    fn current_line(&self) -> Option<&String> {
        let (row, _) = self.textarea.cursor();
        self.textarea.lines().get(row)
    }

    fn take_mode_request(&mut self) -> Option<Mode> {
        self.mode_request.take()
    }

    fn repeat(&mut self, motion: CursorMove, times: usize) {
        for _ in 0..times {
            self.textarea.move_cursor(motion);
        }
    }

    /// Remove the cursor line as a single edit, so one undo restores it.
    fn delete_line(&mut self) {
        let (row, _) = self.textarea.cursor();
        let rows = self.textarea.lines().len();
        self.register = self.current_line().cloned();

        if row + 1 < rows {
            // Line head through the head of the next line
            self.textarea.move_cursor(CursorMove::Head);
            self.textarea.start_selection();
            self.textarea.move_cursor(CursorMove::Down);
            self.textarea.move_cursor(CursorMove::Head);
        } else if row > 0 {
            // Last line takes the newline before it
            self.textarea.move_cursor(CursorMove::Up);
            self.textarea.move_cursor(CursorMove::End);
            self.textarea.start_selection();
            self.textarea.move_cursor(CursorMove::Down);
            self.textarea.move_cursor(CursorMove::End);
        } else {
            self.textarea.move_cursor(CursorMove::Head);
            self.textarea.start_selection();
            self.textarea.move_cursor(CursorMove::End);
        }

        if !self.textarea.cut() {
            self.textarea.cancel_selection();
        }
        self.textarea.move_cursor(CursorMove::Head);
    }

    fn delete_to_end(&mut self) {
        let (_, col) = self.textarea.cursor();
        let len = self.current_line().map_or(0, |line| line.chars().count());
        if col < len {
            self.textarea.delete_line_by_end();
        }
    }

    fn open_line_below(&mut self) {
        self.textarea.move_cursor(CursorMove::End);
        self.textarea.insert_newline();
        self.mode_request = Some(Mode::Insert);
    }

    fn open_line_above(&mut self) {
        self.textarea.move_cursor(CursorMove::Head);
        self.textarea.insert_newline();
        self.textarea.move_cursor(CursorMove::Up);
        self.mode_request = Some(Mode::Insert);
    }

    fn paste_after(&mut self) {
        let Some(line) = self.register.clone() else {
            return;
        };
        self.textarea.move_cursor(CursorMove::End);
        self.textarea.insert_newline();
        self.textarea.insert_str(line);
        self.textarea.move_cursor(CursorMove::Head);
    }

    fn write(&mut self) {
        let Some(path) = self.path.clone() else {
            self.status = Some("No file name".to_string());
            return;
        };
        let mut text = self.text();
        text.push('\n');
        match std::fs::write(&path, text) {
            Ok(()) => {
                self.status = Some(format!("Wrote {}", path.display()));
            }
            Err(err) => {
                tracing::warn!(%err, path = %path.display(), "write failed");
                self.status = Some(format!("Write failed: {err}"));
            }
        }
    }
}

impl EditingSurface for Editor {
    fn select_caret(&mut self) {
        self.textarea.cancel_selection();
    }

    fn collapse_selection(&mut self) {
        self.textarea.cancel_selection();
    }

    fn move_right(&mut self) {
        self.textarea.move_cursor(CursorMove::Forward);
    }
}

/// Register every action the default command set names.
pub fn register_actions(actions: &mut ActionRegistry<Editor>) -> keychord::Result<()> {
    actions.register("move_left", |ed: &mut Editor| ed.textarea.move_cursor(CursorMove::Back))?;
    actions.register("move_down", |ed: &mut Editor| ed.textarea.move_cursor(CursorMove::Down))?;
    actions.register("move_up", |ed: &mut Editor| ed.textarea.move_cursor(CursorMove::Up))?;
    actions.register("move_right", |ed: &mut Editor| {
        ed.textarea.move_cursor(CursorMove::Forward)
    })?;
    actions.register("word_forward", |ed: &mut Editor| {
        ed.textarea.move_cursor(CursorMove::WordForward)
    })?;
    actions.register("word_back", |ed: &mut Editor| {
        ed.textarea.move_cursor(CursorMove::WordBack)
    })?;
    actions.register("line_start", |ed: &mut Editor| ed.textarea.move_cursor(CursorMove::Head))?;
    actions.register("line_end", |ed: &mut Editor| ed.textarea.move_cursor(CursorMove::End))?;
    actions.register("document_start", |ed: &mut Editor| {
        ed.textarea.move_cursor(CursorMove::Top)
    })?;
    actions.register("document_end", |ed: &mut Editor| {
        ed.textarea.move_cursor(CursorMove::Bottom)
    })?;
    actions.register("half_page_down", |ed: &mut Editor| {
        ed.repeat(CursorMove::Down, ed.half_page_lines)
    })?;
    actions.register("half_page_up", |ed: &mut Editor| {
        ed.repeat(CursorMove::Up, ed.half_page_lines)
    })?;

    actions.register("delete_char", |ed: &mut Editor| {
        ed.textarea.delete_next_char();
    })?;
    actions.register("delete_line", Editor::delete_line)?;
    actions.register("delete_to_end", Editor::delete_to_end)?;
    actions.register("open_line_below", Editor::open_line_below)?;
    actions.register("open_line_above", Editor::open_line_above)?;
    actions.register("yank_line", |ed: &mut Editor| {
        ed.register = ed.current_line().cloned();
    })?;
    actions.register("paste_after", Editor::paste_after)?;

    actions.register("undo", |ed: &mut Editor| {
        ed.textarea.undo();
    })?;
    actions.register("redo", |ed: &mut Editor| {
        ed.textarea.redo();
    })?;

    actions.register("write", Editor::write)?;
    actions.register("show_help", |ed: &mut Editor| ed.show_help = true)?;
    Ok(())
}

pub struct App {
    dispatcher: ModalDispatcher<Editor>,
    editor: Editor,
    show_pending_keys: bool,
    should_quit: bool,
}

impl App {
    pub fn with_config(config: &Config, mut editor: Editor) -> Result<Self> {
        let mut actions = ActionRegistry::new();
        register_actions(&mut actions).context("failed to register editor actions")?;

        let keymap = Keymap::from_config(&config.keymap).context("invalid keymap binding")?;
        let trie = keymap
            .build(&actions)
            .context("failed to build command keymap")?;

        editor.half_page_lines = config.editor.half_page_lines;
        let dispatcher = ModalDispatcher::new(Arc::new(trie), Arc::new(actions))
            .with_mode(config.editor.initial_mode);

        Ok(Self {
            dispatcher,
            editor,
            show_pending_keys: config.editor.show_pending_keys,
            should_quit: false,
        })
    }

    pub fn mode(&self) -> Mode {
        self.dispatcher.mode()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Route one key press through the dispatcher.
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Any key closes the help popup and is otherwise ignored
        if self.editor.show_help {
            self.editor.show_help = false;
            return;
        }

        self.editor.status = None;
        let outcome = self
            .dispatcher
            .handle_key(translate(&key), &mut self.editor);

        if let Some(mode) = self.editor.take_mode_request() {
            self.dispatcher.set_mode(mode);
        }

        // Untranslated keys in normal mode are swallowed, never typed
        if outcome == Dispatch::Passthrough && self.dispatcher.mode().is_insert() {
            self.editor.textarea.input(key);
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        while !self.should_quit() {
            terminal.draw(|frame| self.render(frame))?;

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key);
                }
            }
        }
        Ok(())
    }

    fn render(&self, frame: &mut Frame<'_>) {
        let [body, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

        frame.render_widget(&self.editor.textarea, body);
        frame.render_widget(Paragraph::new(self.status_line()), status);

        if self.editor.show_help {
            self.render_help(frame);
        }
    }

    /// One line per normal mode command, in key order.
    fn help_lines(&self) -> Vec<Line<'static>> {
        let actions = self.dispatcher.actions();
        self.dispatcher
            .matcher()
            .trie()
            .bindings()
            .into_iter()
            .map(|(sequence, action)| {
                Line::from(vec![
                    Span::styled(
                        format!("{:>12}  ", format_sequence(&sequence)),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::raw(actions.name(action).unwrap_or("?").to_string()),
                ])
            })
            .collect()
    }

    fn render_help(&self, frame: &mut Frame<'_>) {
        let lines = self.help_lines();
        let area = frame.area();
        let height = (lines.len() as u16 + 2).min(area.height);
        let popup = centered_rect(40, height, area);

        frame.render_widget(Clear, popup);
        let block = Block::default()
            .title(" Keys ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }

    fn status_line(&self) -> Line<'static> {
        let mode = self.dispatcher.mode();
        let mut spans = vec![Span::styled(
            format!(" {} ", mode.label()),
            Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD),
        )];

        let name = self
            .editor
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "[scratch]".to_string());
        spans.push(Span::raw(format!(" {name}")));

        let pending = self.dispatcher.pending();
        if self.show_pending_keys && !pending.is_empty() {
            spans.push(Span::styled(
                format!("  {}", format_sequence(pending)),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        }

        if let Some(status) = &self.editor.status {
            spans.push(Span::raw(format!("  {status}")));
        }

        Line::from(spans)
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
