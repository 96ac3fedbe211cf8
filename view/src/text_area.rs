use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;

/// State for a multi-line text editor.
///
/// The cursor is a (row, byte-column) pair into `lines`; columns always
/// sit on a char boundary.
#[derive(Clone)]
pub struct TextAreaState {
    pub lines: Vec<String>,
    pub row: usize,
    pub col: usize,
    pub scroll: usize,
}

impl TextAreaState {
    pub fn new(text: &str) -> Self {
        // split always yields at least one element, so `lines` is never empty.
        let lines: Vec<String> = text.split('\n').map(String::from).collect();
        Self {
            lines,
            row: 0,
            col: 0,
            scroll: 0,
        }
    }

    /// The buffer contents as one string.
    pub fn value(&self) -> String {
        self.lines.join("\n")
    }

    /// Replace the contents, resetting the cursor to the start.
    pub fn set_text(&mut self, text: &str) {
        *self = Self::new(text);
    }

    pub fn insert(&mut self, ch: char) {
        self.lines[self.row].insert(self.col, ch);
        self.col += ch.len_utf8();
    }

    /// Split the current line at the cursor.
    pub fn newline(&mut self) {
        let rest = self.lines[self.row].split_off(self.col);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            let prev = self.prev_boundary();
            self.lines[self.row].remove(prev);
            self.col = prev;
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.lines[self.row].len();
            self.lines[self.row].push_str(&line);
        }
    }

    pub fn delete(&mut self) {
        if self.col < self.lines[self.row].len() {
            self.lines[self.row].remove(self.col);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col = self.prev_boundary();
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.lines[self.row].len();
        }
    }

    pub fn move_right(&mut self) {
        let line = &self.lines[self.row];
        if self.col < line.len() {
            self.col += line[self.col..].chars().next().map_or(0, |c| c.len_utf8());
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.clamp_col();
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.clamp_col();
        }
    }

    pub fn home(&mut self) {
        self.col = 0;
    }

    pub fn end(&mut self) {
        self.col = self.lines[self.row].len();
    }

    /// Adjust the scroll offset so the cursor row is visible.
    pub fn ensure_visible(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.row < self.scroll {
            self.scroll = self.row;
        } else if self.row >= self.scroll + visible_height {
            self.scroll = self.row - visible_height + 1;
        }
    }

    fn prev_boundary(&self) -> usize {
        self.lines[self.row][..self.col]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn clamp_col(&mut self) {
        let line = &self.lines[self.row];
        if self.col > line.len() {
            self.col = line.len();
        }
        while !line.is_char_boundary(self.col) {
            self.col -= 1;
        }
    }
}

/// Multi-line text editor widget.
///
/// Renders the visible window of lines with the cursor as a
/// reverse-video block.
pub struct TextArea<'a> {
    state: &'a TextAreaState,
    style: Style,
    cursor_style: Style,
}

impl<'a> TextArea<'a> {
    pub fn new(state: &'a TextAreaState) -> Self {
        Self {
            state,
            style: Style::default(),
            cursor_style: Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn cursor_style(mut self, style: Style) -> Self {
        self.cursor_style = style;
        self
    }
}

impl Widget for TextArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        for row in 0..area.height as usize {
            let line_idx = self.state.scroll + row;
            let Some(line) = self.state.lines.get(line_idx) else {
                break;
            };
            let y = area.y + row as u16;
            let on_cursor_row = line_idx == self.state.row;

            let mut x = area.x;
            for (i, ch) in line.char_indices() {
                if x >= area.right() {
                    break;
                }
                let style = if on_cursor_row && i == self.state.col {
                    self.cursor_style
                } else {
                    self.style
                };
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_char(ch);
                    cell.set_style(style);
                }
                x += 1;
            }

            // Cursor at end of line: show block on empty space.
            if on_cursor_row
                && self.state.col >= line.len()
                && x < area.right()
                && let Some(cell) = buf.cell_mut((x, y))
            {
                cell.set_char(' ');
                cell.set_style(self.cursor_style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_round_trips() {
        let state = TextAreaState::new("ab\ncd\n");
        assert_eq!(state.lines.len(), 3);
        assert_eq!(state.value(), "ab\ncd\n");
    }

    #[test]
    fn insert_and_newline() {
        let mut state = TextAreaState::new("ab");
        state.move_right();
        state.insert('x');
        assert_eq!(state.value(), "axb");
        state.newline();
        assert_eq!(state.value(), "ax\nb");
        assert_eq!((state.row, state.col), (1, 0));
    }

    #[test]
    fn backspace_joins_lines() {
        let mut state = TextAreaState::new("ab\ncd");
        state.move_down();
        state.backspace();
        assert_eq!(state.value(), "abcd");
        assert_eq!((state.row, state.col), (0, 2));
    }

    #[test]
    fn delete_at_line_end_joins_next() {
        let mut state = TextAreaState::new("ab\ncd");
        state.end();
        state.delete();
        assert_eq!(state.value(), "abcd");
    }

    #[test]
    fn vertical_moves_clamp_column() {
        let mut state = TextAreaState::new("long line\nx");
        state.end();
        state.move_down();
        assert_eq!((state.row, state.col), (1, 1));
        state.move_up();
        assert_eq!((state.row, state.col), (0, 1));
    }

    #[test]
    fn left_and_right_cross_line_boundaries() {
        let mut state = TextAreaState::new("a\nb");
        state.move_right();
        state.move_right();
        assert_eq!((state.row, state.col), (1, 0));
        state.move_left();
        assert_eq!((state.row, state.col), (0, 1));
    }
}
