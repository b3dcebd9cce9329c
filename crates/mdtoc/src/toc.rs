//! The table-of-contents sidebar.

use crate::outline::HeadingItem;
use mdtoc_core::render;
use mdtoc_core::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Span;

const TITLE: &str = "Contents";
// Title row plus a separating blank row.
const HEADER_ROWS: u16 = 2;

/// Sidebar listing the outline, one row per entry, indented by level. The
/// entry matching the active section is highlighted; a selection cursor
/// (keyboard navigation) is drawn when the sidebar has focus.
#[derive(Clone, Debug, Default)]
pub struct TocView {
    selected: usize,
    offset: u32,
}

impl TocView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_id<'a>(&self, outline: &'a [HeadingItem]) -> Option<&'a str> {
        outline.get(self.selected).map(|item| item.id.as_str())
    }

    pub fn select(&mut self, index: usize, outline_len: usize) {
        self.selected = index.min(outline_len.saturating_sub(1));
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self, outline_len: usize) {
        self.selected = (self.selected + 1).min(outline_len.saturating_sub(1));
    }

    /// Moves the selection cursor to the entry whose id is `active`, so the
    /// cursor follows the reading position.
    pub fn follow_active(&mut self, outline: &[HeadingItem], active: Option<&str>) {
        let Some(active) = active else {
            return;
        };
        if let Some(idx) = outline.iter().position(|item| item.id == active) {
            self.selected = idx;
        }
    }

    /// Maps a click at `(x, y)` to an outline entry index.
    pub fn hit_test(&self, area: Rect, outline: &[HeadingItem], x: u16, y: u16) -> Option<usize> {
        if !area.contains(ratatui::layout::Position { x, y }) {
            return None;
        }
        if y < area.y + HEADER_ROWS {
            return None;
        }
        let row = (y - area.y - HEADER_ROWS) as u32 + self.offset;
        let idx = row as usize;
        (idx < outline.len()).then_some(idx)
    }

    pub fn render(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        outline: &[HeadingItem],
        active: Option<&str>,
        theme: &Theme,
        focused: bool,
    ) {
        if area.width == 0 || area.height == 0 || outline.is_empty() {
            return;
        }

        buf.set_style(area, theme.text_primary);
        render::render_spans_clipped(
            area.x,
            area.y,
            area.width,
            buf,
            &[Span::styled(TITLE, theme.toc_title)],
            theme.text_primary,
        );

        let list_h = area.height.saturating_sub(HEADER_ROWS);
        if list_h == 0 {
            return;
        }
        self.selected = self.selected.min(outline.len().saturating_sub(1));
        self.scroll_selected_into_view(list_h);

        for row in 0..list_h {
            let idx = self.offset as usize + row as usize;
            let Some(item) = outline.get(idx) else {
                break;
            };
            let y = area.y + HEADER_ROWS + row;

            let is_active = active == Some(item.id.as_str());
            let style = if is_active {
                theme.toc_active
            } else {
                match item.level {
                    1 => theme.heading,
                    2 => theme.text_primary,
                    _ => theme.text_muted,
                }
            };

            let cursor = if focused && idx == self.selected {
                "› "
            } else {
                "  "
            };
            let indent = "  ".repeat((item.level - 1) as usize);
            let spans = [
                Span::styled(cursor, theme.accent),
                Span::styled(format!("{indent}{}", item.text), style),
            ];
            render::render_spans_clipped(area.x, y, area.width, buf, &spans, theme.text_primary);
        }
    }

    fn scroll_selected_into_view(&mut self, list_h: u16) {
        let selected = self.selected as u32;
        if selected < self.offset {
            self.offset = selected;
        } else if selected >= self.offset + list_h as u32 {
            self.offset = selected - list_h as u32 + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::extract_headings;

    fn outline() -> Vec<HeadingItem> {
        extract_headings("# A\n## B\n### C\n## D\n")
    }

    #[test]
    fn selection_clamps_to_outline() {
        let items = outline();
        let mut toc = TocView::new();
        toc.move_up();
        assert_eq!(toc.selected(), 0);
        for _ in 0..10 {
            toc.move_down(items.len());
        }
        assert_eq!(toc.selected(), 3);
        assert_eq!(toc.selected_id(&items), Some("d"));
    }

    #[test]
    fn hit_test_accounts_for_header_rows() {
        let items = outline();
        let toc = TocView::new();
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(toc.hit_test(area, &items, 2, 0), None);
        assert_eq!(toc.hit_test(area, &items, 2, 2), Some(0));
        assert_eq!(toc.hit_test(area, &items, 2, 5), Some(3));
        assert_eq!(toc.hit_test(area, &items, 2, 6), None);
        assert_eq!(toc.hit_test(area, &items, 25, 2), None);
    }

    #[test]
    fn follow_active_moves_cursor() {
        let items = outline();
        let mut toc = TocView::new();
        toc.follow_active(&items, Some("c"));
        assert_eq!(toc.selected(), 2);
        toc.follow_active(&items, None);
        assert_eq!(toc.selected(), 2);
    }

    #[test]
    fn renders_active_entry_distinctly() {
        let items = outline();
        let mut toc = TocView::new();
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);
        let theme = Theme::default();
        toc.render(area, &mut buf, &items, Some("b"), &theme, false);

        // Row 3 holds "B" (header rows 0-1, entries from row 2).
        let active_cell = buf.cell((4, 3)).cloned().unwrap();
        let idle_cell = buf.cell((2, 2)).cloned().unwrap();
        assert_eq!(active_cell.symbol(), "B");
        assert_eq!(idle_cell.symbol(), "A");
        assert_ne!(active_cell.style(), idle_cell.style());
    }
}
