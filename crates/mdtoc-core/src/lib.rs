//! `mdtoc-core` provides the UI primitives the `mdtoc` document view is built on.
//!
//! This crate is deliberately small and event-loop agnostic: the app drives
//! input and rendering, widgets only hold state.
//!
//! - [`viewport::ViewportState`]: vertical scroll state with an optional eased
//!   glide target (animated scroll-to-heading).
//! - [`scroll::ScrollBindings`]: key bindings mapped to scroll actions.
//! - [`input`]: backend-neutral key/mouse events (crossterm bridge behind the
//!   `crossterm` feature).
//! - [`theme::Theme`]: styles shared by the document pane and the TOC sidebar.
//!
//! Most users should depend on `mdtoc` and only reach into this crate for
//! custom layouts.
pub mod theme;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub mod input;
pub mod keymap;
pub mod render;
pub mod scroll;
pub mod viewport;
