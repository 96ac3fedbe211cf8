//! Interactive editor: a form over the eight mapping rows, a raw text
//! pane, and one-key SysEx upload.
//!
//! The Map tab is a master-detail form: the left pane lists the gates
//! with their mode, the right pane lists the selected gate's mode control
//! plus one control per meaningful field. Enter opens a selector popup
//! over the field's domain; +/- steps the value in place. Every edit is
//! persisted before the next event is processed.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use view::list::{ListItem, ListSpan, ListState};
use view::text_area::TextAreaState;
use view::{List, TabBar, TextArea, centered_rect};

use crate::catalog;
use crate::codec;
use crate::config;
use crate::midi;
use crate::store::Store;
use crate::sysex;
use crate::table::{ROW_COUNT, Table};

const TAB_NAMES: &[&str] = &["(1) Map", "(2) Text", "(3) Help"];
const TAB_MAP: usize = 0;
const TAB_TEXT: usize = 1;
const TAB_HELP: usize = 2;

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

struct Status {
    text: String,
    error: bool,
}

/// Popup for picking a value out of a field's domain (or a mode out of
/// the catalog, when `col` is the mode slot).
struct SelectorState {
    row: usize,
    col: usize,
    title: String,
    items: Vec<String>,
    list: ListState,
}

struct State {
    active_tab: usize,
    table: Table,
    store: Store,
    /// Left pane: one entry per gate.
    gate_state: ListState,
    /// Right pane: mode entry plus one entry per field of the selected gate.
    field_state: ListState,
    focus_fields: bool,
    selector: Option<SelectorState>,
    text: TextAreaState,
    status: Option<Status>,
    quit: bool,
}

impl State {
    /// Re-derive the field pane length after a gate or mode change.
    fn sync_field_state(&mut self) {
        let row = self.gate_state.selected;
        self.field_state.set_len(1 + self.table.mode_of(row).fields.len());
    }

    fn set_status(&mut self, text: String, error: bool) {
        self.status = Some(Status { text, error });
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.table) {
            log::error!("Failed to save table: {e}");
            self.set_status(format!("Save failed: {e}"), true);
        }
    }

    /// Rewrite the text pane from the stored table, dropping any
    /// unapplied edits.
    fn refresh_text(&mut self) {
        self.text.set_text(&codec::encode(&self.table));
    }

    fn open_selector(&mut self) {
        let row = self.gate_state.selected;
        let col = self.field_state.selected;
        let (title, items, selected) = if col == 0 {
            let items: Vec<String> = catalog::MODES.iter().map(|m| m.name.to_string()).collect();
            let selected = self.table.row(row)[0] as usize;
            (" Mode ".to_string(), items, selected)
        } else {
            let field = &self.table.mode_of(row).fields[col - 1];
            let domain = field.domain;
            let items: Vec<String> = (0..domain.count())
                .map(|i| domain.label(domain.value_at(i)))
                .collect();
            let selected = domain.index_of(self.table.row(row)[col]).unwrap_or(0);
            (format!(" {} ", field.label), items, selected)
        };
        let mut list = ListState::new(items.len());
        list.selected = selected;
        self.selector = Some(SelectorState {
            row,
            col,
            title,
            items,
            list,
        });
    }

    fn confirm_selector(&mut self) {
        let Some(sel) = self.selector.take() else {
            return;
        };
        if sel.col == 0 {
            self.table.set_mode(sel.row, sel.list.selected as u16);
            self.sync_field_state();
        } else {
            let domain = self.table.mode_of(sel.row).fields[sel.col - 1].domain;
            self.table
                .set_field(sel.row, sel.col, domain.value_at(sel.list.selected));
        }
        self.persist();
        self.refresh_text();
    }

    /// Step the focused field through its domain (mode slot included).
    fn bump(&mut self, delta: isize) {
        if !self.focus_fields {
            return;
        }
        let row = self.gate_state.selected;
        let col = self.field_state.selected;
        if col == 0 {
            let count = catalog::MODES.len() as isize;
            let id = self.table.row(row)[0] as isize;
            self.table.set_mode(row, (id + delta).rem_euclid(count) as u16);
            self.sync_field_state();
        } else {
            let domain = self.table.mode_of(row).fields[col - 1].domain;
            let count = domain.count() as isize;
            let idx = domain.index_of(self.table.row(row)[col]).unwrap_or(0) as isize;
            let value = domain.value_at((idx + delta).rem_euclid(count) as usize);
            self.table.set_field(row, col, value);
        }
        self.persist();
        self.refresh_text();
    }

    fn send_table(&mut self) {
        let bytes = sysex::pack(&self.table);
        match midi::send(&bytes, config::midi_port()) {
            Ok(name) => self.set_status(format!("Sent {} bytes to {name}", bytes.len()), false),
            Err(e) => {
                log::warn!("SysEx send failed: {e}");
                self.set_status(format!("Send failed: {e}"), true);
            }
        }
    }

    /// Apply the text pane to the table. On a validation error the table
    /// is left untouched and the edit stays in the pane for fixing.
    fn apply_text(&mut self) {
        match codec::decode(&self.text.value()) {
            Ok(table) => {
                self.table = table;
                self.persist();
                self.refresh_text();
                self.sync_field_state();
                self.set_status("Applied text edits".to_string(), false);
            }
            Err(e) => {
                log::warn!("Rejected table text: {e:#}");
                self.set_status(format!("Invalid table: {e:#}"), true);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point and event loop
// ---------------------------------------------------------------------------

pub fn run(store: Store) -> anyhow::Result<()> {
    let table = store.load();
    let text = TextAreaState::new(&codec::encode(&table));
    let mut s = State {
        active_tab: TAB_MAP,
        table,
        store,
        gate_state: ListState::new(ROW_COUNT),
        field_state: ListState::new(0),
        focus_fields: false,
        selector: None,
        text,
        status: None,
        quit: false,
    };
    s.sync_field_state();

    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // When stderr is redirected (e.g. `tram8map 2> debug.log`), keep logging
    // enabled. When stderr is a terminal, suppress it so log lines don't
    // corrupt the alternate screen.
    let prev_log_level = log::max_level();
    if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        log::set_max_level(log::LevelFilter::Off);
    }

    let result = event_loop(&mut terminal, &mut s);

    log::set_max_level(prev_log_level);
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    crossterm::terminal::disable_raw_mode()?;
    result.map_err(Into::into)
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    s: &mut State,
) -> io::Result<()> {
    loop {
        render(terminal, s)?;
        if s.quit {
            break;
        }
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        process_event(s, event::read()?);
        while event::poll(Duration::ZERO)? {
            process_event(s, event::read()?);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Event processing
// ---------------------------------------------------------------------------

fn process_event(s: &mut State, ev: Event) {
    let Event::Key(key) = ev else { return };
    if key.kind != KeyEventKind::Press {
        return;
    }
    s.status = None;
    if s.selector.is_some() {
        handle_selector_key(s, key.code);
    } else if s.active_tab == TAB_TEXT {
        handle_text_key(s, key.code, key.modifiers);
    } else {
        handle_key(s, key.code, key.modifiers);
    }
}

fn handle_key(s: &mut State, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Char('q') | KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            s.quit = true;
        }
        KeyCode::Char('q') => s.quit = true,
        KeyCode::Char('1') => s.active_tab = TAB_MAP,
        KeyCode::Char('2') => s.active_tab = TAB_TEXT,
        KeyCode::Char('3') => s.active_tab = TAB_HELP,
        KeyCode::Tab => s.active_tab = (s.active_tab + 1) % TAB_NAMES.len(),
        KeyCode::BackTab => {
            s.active_tab = (s.active_tab + TAB_NAMES.len() - 1) % TAB_NAMES.len();
        }
        KeyCode::Char('s') => s.send_table(),
        _ if s.active_tab == TAB_MAP => handle_map_key(s, code),
        _ => {}
    }
}

fn handle_map_key(s: &mut State, code: KeyCode) {
    match code {
        KeyCode::Up | KeyCode::Char('k') => {
            if s.focus_fields {
                s.field_state.up();
            } else {
                s.gate_state.up();
                s.sync_field_state();
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if s.focus_fields {
                s.field_state.down();
            } else {
                s.gate_state.down();
                s.sync_field_state();
            }
        }
        KeyCode::Left | KeyCode::Char('h') => s.focus_fields = false,
        KeyCode::Right | KeyCode::Char('l') => s.focus_fields = true,
        KeyCode::Enter | KeyCode::Char(' ') => {
            if s.focus_fields {
                s.open_selector();
            } else {
                s.focus_fields = true;
            }
        }
        KeyCode::Char('+') | KeyCode::Char('=') => s.bump(1),
        KeyCode::Char('-') => s.bump(-1),
        _ => {}
    }
}

fn handle_text_key(s: &mut State, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Char('q') | KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            s.quit = true;
        }
        KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => s.apply_text(),
        KeyCode::Char('r') if modifiers.contains(KeyModifiers::CONTROL) => {
            s.refresh_text();
            s.set_status("Reverted to stored table".to_string(), false);
        }
        KeyCode::Char(_) if modifiers.contains(KeyModifiers::CONTROL) => {}
        KeyCode::Esc => s.active_tab = TAB_MAP,
        KeyCode::Enter => s.text.newline(),
        KeyCode::Backspace => s.text.backspace(),
        KeyCode::Delete => s.text.delete(),
        KeyCode::Left => s.text.move_left(),
        KeyCode::Right => s.text.move_right(),
        KeyCode::Up => s.text.move_up(),
        KeyCode::Down => s.text.move_down(),
        KeyCode::Home => s.text.home(),
        KeyCode::End => s.text.end(),
        KeyCode::Char(ch) => s.text.insert(ch),
        _ => {}
    }
}

fn handle_selector_key(s: &mut State, code: KeyCode) {
    let Some(sel) = s.selector.as_mut() else {
        return;
    };
    match code {
        KeyCode::Esc => s.selector = None,
        KeyCode::Enter => s.confirm_selector(),
        KeyCode::Up | KeyCode::Char('k') => sel.list.up(),
        KeyCode::Down | KeyCode::Char('j') => sel.list.down(),
        KeyCode::PageUp => sel.list.page_up(12),
        KeyCode::PageDown => sel.list.page_down(12),
        KeyCode::Home => sel.list.home(),
        KeyCode::End => sel.list.end(),
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    s: &mut State,
) -> io::Result<()> {
    terminal.draw(|frame| {
        let area = frame.area();
        let [tab_area, content_area, action_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(TabBar::new(TAB_NAMES, s.active_tab), tab_area);

        // Table path on the right side of the tab bar.
        let path_text = s.store.path().display().to_string();
        let path_width = path_text.chars().count() as u16;
        if tab_area.width > path_width + 20 {
            let path_area = Rect {
                x: tab_area.right() - path_width - 1,
                y: tab_area.y,
                width: path_width + 1,
                height: 1,
            };
            frame.render_widget(
                Paragraph::new(path_text).style(Style::default().fg(Color::DarkGray)),
                path_area,
            );
        }

        match s.active_tab {
            TAB_MAP => render_map(frame, content_area, s),
            TAB_TEXT => render_text(frame, content_area, s),
            _ => render_help(frame, content_area),
        }

        render_action_bar(frame, action_area, s);

        if let Some(sel) = &mut s.selector {
            render_selector_popup(frame, area, sel);
        }
    })?;
    Ok(())
}

fn render_map(frame: &mut ratatui::Frame, area: Rect, s: &mut State) {
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(42), Constraint::Fill(1)]).areas(area);

    // Gate pane.
    let left_style = if s.focus_fields {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    let left_block = Block::default()
        .borders(Borders::ALL)
        .border_style(left_style)
        .title(" Gates ");
    let left_inner = left_block.inner(left);
    frame.render_widget(left_block, left);

    let gate_prefixes: Vec<String> = (0..ROW_COUNT).map(|i| format!("Gate {}  ", i + 1)).collect();
    let items: Vec<ListItem> = s
        .table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            ListItem::spans(vec![
                ListSpan::new(&gate_prefixes[i], Style::default()),
                ListSpan::new(catalog::mode(row[0]).name, Style::default()),
            ])
        })
        .collect();
    let gate_selected_style = if s.focus_fields {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };
    s.gate_state.ensure_visible(left_inner.height as usize);
    frame.render_widget(
        List::new(&items, &s.gate_state).selected_style(gate_selected_style),
        left_inner,
    );

    // Field pane for the selected gate.
    let row_idx = s.gate_state.selected;
    let mode = s.table.mode_of(row_idx);
    let right_style = if s.focus_fields {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let right_block = Block::default()
        .borders(Borders::ALL)
        .border_style(right_style)
        .title(format!(" Gate {} ", row_idx + 1));
    let right_inner = right_block.inner(right);
    frame.render_widget(right_block, right);

    let mut entries: Vec<(String, String)> =
        vec![(format!("{:<20}", "Mode"), mode.name.to_string())];
    for (i, field) in mode.fields.iter().enumerate() {
        entries.push((
            format!("{:<20}", field.label),
            field.domain.label(s.table.row(row_idx)[i + 1]),
        ));
    }
    let items: Vec<ListItem> = entries
        .iter()
        .map(|(label, value)| {
            ListItem::spans(vec![
                ListSpan::new(label, Style::default()),
                ListSpan::new(value, Style::default().add_modifier(Modifier::BOLD)),
            ])
        })
        .collect();
    s.field_state.ensure_visible(right_inner.height as usize);
    let cursor = if s.focus_fields { "▸ " } else { "  " };
    frame.render_widget(List::new(&items, &s.field_state).cursor(cursor), right_inner);
}

fn render_text(frame: &mut ratatui::Frame, area: Rect, s: &mut State) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Table text ");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    s.text.ensure_visible(inner.height as usize);
    frame.render_widget(
        TextArea::new(&s.text).style(Style::default().fg(Color::White)),
        inner,
    );
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Help ");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let help = "\
Map tab
  Up/Down, j/k     select gate or field
  Left/Right, h/l  switch pane
  Enter, Space     open value selector
  +/-              step the focused value
  s                send the table over SysEx

Text tab
  Ctrl+S           apply edits to the table
  Ctrl+R           revert the pane to the stored table
  Esc              back to the map

Global
  1/2/3, Tab       switch tabs
  q, Ctrl+Q        quit

Edits are saved immediately. The text pane shows the masked table:
slots a mode does not use always render as zero.";
    frame.render_widget(Paragraph::new(help), inner);
}

fn render_action_bar(frame: &mut ratatui::Frame, area: Rect, s: &State) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    if let Some(status) = &s.status {
        let style = if status.error {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        frame.render_widget(Paragraph::new(status.text.as_str()).style(style), area);
        return;
    }
    let hints = match s.active_tab {
        TAB_MAP => " enter select · +/- step · s send · tab next · q quit",
        TAB_TEXT => " ctrl+s apply · ctrl+r revert · esc back",
        _ => " q quit",
    };
    frame.render_widget(
        Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn render_selector_popup(frame: &mut ratatui::Frame, area: Rect, sel: &mut SelectorState) {
    let h = (sel.items.len() as u16 + 2)
        .min(area.height.saturating_sub(2))
        .max(5);
    let w = 44.min(area.width);
    let popup = centered_rect(w, h, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(sel.title.as_str());
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let items: Vec<ListItem> = sel.items.iter().map(|l| ListItem::raw(l)).collect();
    sel.list.ensure_visible(inner.height as usize);
    frame.render_widget(List::new(&items, &sel.list), inner);
}
