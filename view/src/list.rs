use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;

/// A keyboard-navigable list with a selected item and vertical scrolling.
///
/// Renders the visible window of items, with a cursor prefix on the
/// selected row and a scrollbar on the right edge when content overflows.
pub struct List<'a> {
    items: &'a [ListItem<'a>],
    selected: usize,
    offset: usize,
    style: Style,
    selected_style: Style,
    cursor: &'a str,
}

/// A single item: one or more styled spans on a row.
pub struct ListItem<'a> {
    pub spans: Vec<ListSpan<'a>>,
}

pub struct ListSpan<'a> {
    pub text: &'a str,
    pub style: Style,
}

impl<'a> ListItem<'a> {
    pub fn raw(text: &'a str) -> Self {
        Self {
            spans: vec![ListSpan {
                text,
                style: Style::default(),
            }],
        }
    }

    pub fn spans(spans: Vec<ListSpan<'a>>) -> Self {
        Self { spans }
    }
}

impl<'a> ListSpan<'a> {
    pub fn new(text: &'a str, style: Style) -> Self {
        Self { text, style }
    }
}

/// Selection and scroll offset for a [`List`].
#[derive(Default, Clone)]
pub struct ListState {
    pub selected: usize,
    pub offset: usize,
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            len,
        }
    }

    /// Move selection down, wrapping at the end.
    pub fn down(&mut self) {
        if self.len > 0 {
            self.selected = (self.selected + 1) % self.len;
        }
    }

    /// Move selection up, wrapping at the start.
    pub fn up(&mut self) {
        if self.len > 0 {
            self.selected = (self.selected + self.len - 1) % self.len;
        }
    }

    /// Move selection down by `n` items without wrapping.
    pub fn page_down(&mut self, n: usize) {
        if self.len > 0 {
            self.selected = (self.selected + n).min(self.len - 1);
        }
    }

    /// Move selection up by `n` items without wrapping.
    pub fn page_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn home(&mut self) {
        self.selected = 0;
    }

    pub fn end(&mut self) {
        self.selected = self.len.saturating_sub(1);
    }

    /// Set the total number of items, clamping the selection.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Adjust the scroll offset so the selected item is visible.
    pub fn ensure_visible(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + visible_height {
            self.offset = self.selected - visible_height + 1;
        }
    }
}

impl<'a> List<'a> {
    pub fn new(items: &'a [ListItem<'a>], state: &ListState) -> Self {
        Self {
            items,
            selected: state.selected,
            offset: state.offset,
            style: Style::default().fg(Color::DarkGray),
            selected_style: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            cursor: "▸ ",
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn selected_style(mut self, style: Style) -> Self {
        self.selected_style = style;
        self
    }

    pub fn cursor(mut self, cursor: &'a str) -> Self {
        self.cursor = cursor;
        self
    }
}

impl Widget for List<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let visible = area.height as usize;
        let has_scrollbar = self.items.len() > visible;
        let content_right = if has_scrollbar {
            area.right().saturating_sub(1)
        } else {
            area.right()
        };
        let cursor_width = self.cursor.chars().count() as u16;

        for row in 0..visible {
            let item_idx = self.offset + row;
            if item_idx >= self.items.len() {
                break;
            }
            let y = area.y + row as u16;
            let is_selected = item_idx == self.selected;
            let base_style = if is_selected {
                self.selected_style
            } else {
                self.style
            };

            let mut x = area.x;
            if is_selected {
                for ch in self.cursor.chars() {
                    if x >= content_right {
                        break;
                    }
                    if let Some(cell) = buf.cell_mut((x, y)) {
                        cell.set_char(ch);
                        cell.set_style(base_style);
                    }
                    x += 1;
                }
            } else {
                x += cursor_width;
            }

            for span in &self.items[item_idx].spans {
                let style = base_style.patch(span.style);
                for ch in span.text.chars() {
                    if x >= content_right {
                        break;
                    }
                    if let Some(cell) = buf.cell_mut((x, y)) {
                        cell.set_char(ch);
                        cell.set_style(style);
                    }
                    x += 1;
                }
            }
        }

        if has_scrollbar {
            let sb_x = area.right() - 1;
            let total = self.items.len();
            let thumb_size = ((visible * visible) / total).max(1);
            let max_offset = total - visible;
            let thumb_start = if max_offset > 0 {
                (self.offset * (visible - thumb_size)) / max_offset
            } else {
                0
            };
            for row in 0..visible {
                let y = area.y + row as u16;
                let in_thumb = row >= thumb_start && row < thumb_start + thumb_size;
                let (ch, style) = if in_thumb {
                    ('┃', Style::default().fg(Color::White))
                } else {
                    ('│', Style::default().fg(Color::DarkGray))
                };
                if let Some(cell) = buf.cell_mut((sb_x, y)) {
                    cell.set_char(ch);
                    cell.set_style(style);
                }
            }
        }
    }
}
