//! Scroll-synchronized markdown document view with outline navigation.
//!
//! `mdtoc` renders a long-form markdown document next to a table of contents
//! that tracks the reading position:
//!
//! - [`outline`]: heading extraction and slug generation (the TOC data).
//! - [`document`]: markdown parsing and line layout for a terminal width.
//! - [`anchors`]: the `id -> row` map stamped onto the rendered document.
//! - [`spy`]: scroll-spy, deciding which heading is currently "active".
//! - [`toc`]: the sidebar widget.
//! - [`view::DocView`]: the composed two-pane view.
//!
//! ## Minimal example
//!
//! ```rust,no_run
//! use mdtoc::view::DocView;
//! use mdtoc_core::theme::Theme;
//! use ratatui::buffer::Buffer;
//! use ratatui::layout::Rect;
//!
//! let mut view = DocView::new();
//! view.set_markdown("# Intro\n\nHello.\n\n## Details\n\nMore.");
//!
//! let area = Rect::new(0, 0, 80, 24);
//! let mut buf = Buffer::empty(area);
//! view.render(area, &mut buf, &Theme::default());
//! assert_eq!(view.active_section(), Some("intro"));
//! ```
pub mod anchors;
pub mod document;
pub mod outline;
pub mod spy;
pub mod toc;
pub mod view;

pub use outline::HeadingItem;
pub use view::DocView;
