//! End-to-end: extract -> layout -> stamp -> spy -> navigate, through the
//! public `DocView` API only.

use mdtoc::view::{DocState, DocView};
use mdtoc_core::input::{InputEvent, KeyCode, KeyEvent};
use mdtoc_core::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

const AREA: Rect = Rect {
    x: 0,
    y: 0,
    width: 90,
    height: 20,
};

fn manual() -> String {
    let mut md = String::from(
        "# User Guide\n\n\
         Welcome paragraph.\n\n\
         ## Installation\n\n",
    );
    for _ in 0..40 {
        md.push_str("Install instructions continue at length here.\n\n");
    }
    md.push_str("## 配置说明\n\n");
    for _ in 0..40 {
        md.push_str("Configuration detail paragraph.\n\n");
    }
    md.push_str("### Advanced Topics\n\n");
    for _ in 0..20 {
        md.push_str("Closing remarks keep the last section scrollable.\n\n");
    }
    md.push_str("Final words.\n");
    md
}

fn draw(view: &mut DocView) -> Buffer {
    let mut buf = Buffer::empty(AREA);
    view.render(AREA, &mut buf, &Theme::default());
    buf
}

fn buffer_text(buf: &Buffer) -> String {
    let mut out = String::new();
    for y in 0..AREA.height {
        for x in 0..AREA.width {
            if let Some(cell) = buf.cell((x, y)) {
                out.push_str(cell.symbol());
            }
        }
        out.push('\n');
    }
    out
}

#[test]
fn toc_lists_headings_in_order_with_cjk_ids() {
    let mut view = DocView::new();
    view.set_markdown(&manual());
    let text = buffer_text(&draw(&mut view));

    assert!(text.contains("Contents"));
    assert!(text.contains("User Guide"));
    assert!(text.contains("Installation"));
    assert!(text.contains("配置说明"));

    let ids: Vec<&str> = view.outline_items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["user-guide", "installation", "配置说明", "advanced-topics"]
    );
}

#[test]
fn reading_position_tracks_through_the_document() {
    let mut view = DocView::new();
    view.set_markdown(&manual());
    draw(&mut view);
    assert_eq!(view.active_section(), Some("user-guide"));

    // Page down through the whole document; the active section should pass
    // through every heading in order, never backwards.
    let order = ["user-guide", "installation", "配置说明", "advanced-topics"];
    let mut reached = 0;
    for _ in 0..200 {
        view.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::PageDown)));
        let active = view.active_section().unwrap();
        let idx = order.iter().position(|id| *id == active).unwrap();
        assert!(idx >= reached, "active section moved backwards");
        reached = idx;
    }
    assert_eq!(reached, order.len() - 1);
}

#[test]
fn navigation_round_trip_converges() {
    let mut view = DocView::new();
    view.set_markdown(&manual());
    draw(&mut view);

    assert!(view.navigate("配置说明"));
    assert_eq!(view.active_section(), Some("配置说明"));
    while view.tick() {}
    assert_eq!(view.active_section(), Some("配置说明"));

    // Back up to the top.
    assert!(view.navigate("user-guide"));
    while view.tick() {}
    assert_eq!(view.viewport.y, 0);
    assert_eq!(view.active_section(), Some("user-guide"));
}

#[test]
fn headingless_document_renders_without_sidebar() {
    let mut view = DocView::new();
    view.set_markdown("Just prose.\n\nNothing else.\n");
    assert_eq!(view.doc_state(), DocState::Ready);
    let text = buffer_text(&draw(&mut view));
    assert!(!text.contains("Contents"));
    assert!(text.contains("Just prose."));
    assert_eq!(view.active_section(), None);
}

#[test]
fn loading_and_empty_placeholders_differ() {
    let mut view = DocView::new();
    let loading = buffer_text(&draw(&mut view));
    assert!(loading.contains("Loading document…"));

    view.set_markdown("");
    let empty = buffer_text(&draw(&mut view));
    assert!(empty.contains("No document content configured"));
    assert_ne!(loading, empty);
}

#[test]
fn width_change_restamps_anchors() {
    let mut view = DocView::new();
    view.set_markdown(&manual());
    draw(&mut view);
    assert!(view.navigate("advanced-topics"));
    while view.tick() {}
    let wide_y = view.viewport.y;

    // Re-render at a much narrower width: rows shift, ids do not.
    let narrow = Rect::new(0, 0, 40, 20);
    let mut buf = Buffer::empty(narrow);
    view.render(narrow, &mut buf, &Theme::default());
    assert!(view.navigate("advanced-topics"));
    while view.tick() {}
    assert!(view.viewport.y >= wide_y);
    assert_eq!(view.active_section(), Some("advanced-topics"));
}
