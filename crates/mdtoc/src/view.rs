//! The composed document view: markdown pane + TOC sidebar, kept in sync.

use crate::anchors::AnchorMap;
use crate::document::Document;
use crate::document::DocumentOptions;
use crate::document::RenderedLine;
use crate::outline::HeadingItem;
use crate::outline::Outline;
use crate::spy::ScrollSpy;
use crate::toc::TocView;
use mdtoc_core::input::InputEvent;
use mdtoc_core::input::KeyCode;
use mdtoc_core::input::MouseButton;
use mdtoc_core::input::MouseEventKind;
use mdtoc_core::render;
use mdtoc_core::scroll::ScrollBindings;
use mdtoc_core::theme::Theme;
use mdtoc_core::viewport::ViewportState;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Span;
use std::sync::Arc;

/// Content lifecycle of the view. `Loading` (no source assigned yet) and
/// `Empty` (a source was assigned but holds nothing) are distinct states and
/// render distinct placeholders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocState {
    Loading,
    Empty,
    Ready,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Toc,
    Document,
}

#[derive(Clone, Debug)]
pub struct DocViewOptions {
    /// Sidebar width in columns. The sidebar is omitted entirely when the
    /// outline is empty, or when the area is too narrow to split.
    pub toc_width: u16,
    pub show_scrollbar: bool,
    pub lookahead: u32,
    pub scroll: ScrollBindings,
    pub document: DocumentOptions,
    pub loading_text: String,
    pub empty_text: String,
}

impl Default for DocViewOptions {
    fn default() -> Self {
        Self {
            toc_width: 28,
            show_scrollbar: true,
            lookahead: crate::spy::DEFAULT_LOOKAHEAD,
            scroll: ScrollBindings::default(),
            document: DocumentOptions::default(),
            loading_text: "Loading document…".to_string(),
            empty_text: "No document content configured".to_string(),
        }
    }
}

/// Scroll-synchronized markdown viewer with outline navigation.
///
/// The view owns everything derived from the source snapshot: the parsed
/// document, the memoized outline, the per-width line layout, the anchor map
/// stamped from that layout, and the scroll-spy state. Replacing the source
/// invalidates all of it at once; dropping the view drops it all, so no
/// callback or timer can outlive the view.
pub struct DocView {
    options: DocViewOptions,
    doc: Option<Document>,
    outline: Outline,
    rendered: Vec<RenderedLine>,
    cached_width: Option<u16>,
    anchors: AnchorMap,
    pub viewport: ViewportState,
    spy: ScrollSpy,
    toc: TocView,
    focus: Focus,
    toc_area: Option<Rect>,
    doc_area: Option<Rect>,
}

impl Default for DocView {
    fn default() -> Self {
        Self::with_options(DocViewOptions::default())
    }
}

impl DocView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DocViewOptions) -> Self {
        let mut spy = ScrollSpy::new();
        spy.lookahead = options.lookahead;
        Self {
            options,
            doc: None,
            outline: Outline::new(),
            rendered: Vec::new(),
            cached_width: None,
            anchors: AnchorMap::new(),
            viewport: ViewportState::default(),
            spy,
            toc: TocView::new(),
            focus: Focus::Document,
            toc_area: None,
            doc_area: None,
        }
    }

    /// Replaces the document source. The outline is recomputed, the layout
    /// and anchor map are invalidated (restamped on the next render), and any
    /// in-flight scroll animation is cancelled.
    pub fn set_markdown(&mut self, input: &str) {
        let source: Arc<str> = Arc::from(input);
        self.outline.sync(&source);
        self.doc = Some(Document::parse(source, &self.options.document));
        self.rendered.clear();
        self.cached_width = None;
        self.anchors = AnchorMap::new();
        self.viewport.cancel_glide();
        if self.outline.is_empty() {
            self.spy.reset();
            self.focus = Focus::Document;
        }
    }

    pub fn doc_state(&self) -> DocState {
        match &self.doc {
            None => DocState::Loading,
            Some(doc) if doc.is_empty() => DocState::Empty,
            Some(_) => DocState::Ready,
        }
    }

    pub fn outline_items(&self) -> &[HeadingItem] {
        self.outline.items()
    }

    /// Id of the heading currently considered in view, if any.
    pub fn active_section(&self) -> Option<&str> {
        self.spy.active()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Activates the TOC entry (or fragment target) `id`: starts an eased
    /// scroll that aligns the heading row with the top of the viewport and
    /// marks the section active immediately, without waiting for the
    /// animation to produce a scroll change. Unknown ids are ignored.
    ///
    /// Anchors are stamped at render time, so navigation only resolves after
    /// the first render for the current source and width.
    pub fn navigate(&mut self, id: &str) -> bool {
        let Some(offset) = self.anchors.offset(id) else {
            return false;
        };
        self.viewport.glide_to(offset);
        self.spy.set_active(id);
        self.toc.follow_active(self.outline.items(), Some(id));
        true
    }

    /// Jumps straight to the heading stamped with `id`, as following a
    /// same-page `#fragment` link would. Unknown ids are ignored.
    pub fn goto_fragment(&mut self, id: &str) -> bool {
        let Some(offset) = self.anchors.offset(id) else {
            return false;
        };
        self.viewport.cancel_glide();
        self.viewport.y = offset;
        self.viewport.clamp();
        self.spy.set_active(id);
        self.toc.follow_active(self.outline.items(), Some(id));
        true
    }

    /// Advances the scroll animation by one frame and recomputes the active
    /// section if the offset moved. Returns `true` when a redraw is needed.
    pub fn tick(&mut self) -> bool {
        if !self.viewport.tick() {
            return false;
        }
        self.update_spy();
        true
    }

    /// Handles a key or mouse event. Returns `true` when a redraw is needed.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Key(key) => {
                if key.code == KeyCode::Tab && !self.outline.is_empty() {
                    self.focus = match self.focus {
                        Focus::Toc => Focus::Document,
                        Focus::Document => Focus::Toc,
                    };
                    return true;
                }
                if self.focus == Focus::Toc {
                    match key.code {
                        KeyCode::Up | KeyCode::Char('k') => {
                            self.toc.move_up();
                            return true;
                        }
                        KeyCode::Down | KeyCode::Char('j') => {
                            self.toc.move_down(self.outline.len());
                            return true;
                        }
                        KeyCode::Enter => {
                            if let Some(id) = self
                                .toc
                                .selected_id(self.outline.items())
                                .map(str::to_string)
                            {
                                return self.navigate(&id);
                            }
                            return false;
                        }
                        _ => {}
                    }
                }
                let Some(action) = self.options.scroll.action_for(&key) else {
                    return false;
                };
                self.options.scroll.apply(&mut self.viewport, action);
                self.update_spy();
                true
            }
            InputEvent::Mouse(m) => match m.kind {
                MouseEventKind::ScrollUp => {
                    self.viewport.scroll_y_by(-3);
                    self.update_spy();
                    true
                }
                MouseEventKind::ScrollDown => {
                    self.viewport.scroll_y_by(3);
                    self.update_spy();
                    true
                }
                MouseEventKind::Down(MouseButton::Left) => {
                    let Some(toc_area) = self.toc_area else {
                        return false;
                    };
                    let Some(idx) =
                        self.toc.hit_test(toc_area, self.outline.items(), m.x, m.y)
                    else {
                        return false;
                    };
                    self.toc.select(idx, self.outline.len());
                    self.focus = Focus::Toc;
                    if let Some(id) = self
                        .toc
                        .selected_id(self.outline.items())
                        .map(str::to_string)
                    {
                        self.navigate(&id);
                    }
                    true
                }
                _ => false,
            },
        }
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        self.toc_area = None;
        self.doc_area = None;
        if area.width == 0 || area.height == 0 {
            return;
        }

        match self.doc_state() {
            DocState::Loading => {
                self.render_placeholder(area, buf, theme, &self.options.loading_text.clone());
                return;
            }
            DocState::Empty => {
                self.render_placeholder(area, buf, theme, &self.options.empty_text.clone());
                return;
            }
            DocState::Ready => {}
        }

        // The sidebar is omitted when there is nothing to list or no room.
        let show_toc =
            !self.outline.is_empty() && area.width > self.options.toc_width.saturating_add(20);
        let (toc_area, doc_area) = if show_toc {
            let toc = Rect::new(area.x, area.y, self.options.toc_width, area.height);
            let sep_x = area.x + self.options.toc_width;
            let doc = Rect::new(
                sep_x + 1,
                area.y,
                area.width - self.options.toc_width - 1,
                area.height,
            );
            for dy in 0..area.height {
                buf.set_stringn(sep_x, area.y + dy, "│", 1, theme.text_muted);
            }
            (Some(toc), doc)
        } else {
            (None, area)
        };

        let (content_area, scrollbar_x) = if self.options.show_scrollbar && doc_area.width >= 2 {
            (
                Rect::new(doc_area.x, doc_area.y, doc_area.width - 1, doc_area.height),
                Some(doc_area.x + doc_area.width - 1),
            )
        } else {
            (doc_area, None)
        };

        self.viewport.set_viewport(content_area.height);
        self.ensure_layout(content_area.width, theme);

        for row in 0..content_area.height {
            let y = content_area.y + row;
            let idx = (self.viewport.y as usize).saturating_add(row as usize);
            buf.set_style(
                Rect::new(content_area.x, y, content_area.width, 1),
                theme.text_primary,
            );
            if let Some(line) = self.rendered.get(idx) {
                render::render_spans_clipped(
                    content_area.x,
                    y,
                    content_area.width,
                    buf,
                    &line.spans,
                    theme.text_primary,
                );
            }
        }

        if let Some(sb_x) = scrollbar_x {
            render::render_scrollbar(
                Rect::new(sb_x, doc_area.y, 1, doc_area.height),
                buf,
                &self.viewport,
                theme.text_muted,
            );
        }

        if let Some(toc_area) = toc_area {
            let active = self.spy.active().map(str::to_string);
            self.toc.render(
                toc_area,
                buf,
                self.outline.items(),
                active.as_deref(),
                theme,
                self.focus == Focus::Toc,
            );
        }

        self.toc_area = toc_area;
        self.doc_area = Some(doc_area);
    }

    fn render_placeholder(&self, area: Rect, buf: &mut Buffer, theme: &Theme, text: &str) {
        buf.set_style(area, theme.text_primary);
        let y = area.y + area.height / 2;
        let w = unicode_width::UnicodeWidthStr::width(text) as u16;
        let x = area.x + area.width.saturating_sub(w) / 2;
        render::render_spans_clipped(
            x,
            y,
            area.width,
            buf,
            &[Span::styled(text.to_string(), theme.placeholder)],
            theme.text_primary,
        );
    }

    /// Re-renders lines and restamps anchors when the source or width changed;
    /// no-op otherwise. Runs the spy once eagerly after a restamp so the
    /// active section is correct before any scroll event arrives.
    fn ensure_layout(&mut self, width: u16, theme: &Theme) {
        if self.cached_width == Some(width) {
            return;
        }
        let Some(doc) = &self.doc else {
            return;
        };
        self.cached_width = Some(width);
        self.rendered = doc.layout(width, theme);
        self.anchors = AnchorMap::stamp(&self.rendered);
        self.viewport.set_content(self.rendered.len() as u32);
        self.update_spy();
    }

    fn update_spy(&mut self) {
        if self
            .spy
            .update(self.viewport.y, self.outline.items(), &self.anchors)
        {
            self.toc
                .follow_active(self.outline.items(), self.spy.active().map(str::to_string).as_deref());
        }
    }
}
