use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;

/// A horizontal tab bar rendered as a single row, active tab highlighted.
pub struct TabBar<'a> {
    tabs: &'a [&'a str],
    active: usize,
    style: Style,
    active_style: Style,
    separator: &'a str,
}

impl<'a> TabBar<'a> {
    pub fn new(tabs: &'a [&'a str], active: usize) -> Self {
        Self {
            tabs,
            active,
            style: Style::default().fg(Color::DarkGray),
            active_style: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            separator: " │ ",
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn active_style(mut self, style: Style) -> Self {
        self.active_style = style;
        self
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let mut x = area.x;
        let y = area.y;

        for (i, &label) in self.tabs.iter().enumerate() {
            if i > 0 {
                for ch in self.separator.chars() {
                    if x >= area.right() {
                        break;
                    }
                    if let Some(cell) = buf.cell_mut((x, y)) {
                        cell.set_char(ch);
                        cell.set_style(self.style);
                    }
                    x += 1;
                }
            }

            let style = if i == self.active {
                self.active_style
            } else {
                self.style
            };
            for ch in label.chars() {
                if x >= area.right() {
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
}
