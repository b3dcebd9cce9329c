use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::keymap;
use crate::viewport::ViewportState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollAction {
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
}

/// Key bindings for vertical document scrolling.
///
/// Defaults are Vim-flavored, matching the rest of the workspace.
#[derive(Clone, Debug)]
pub struct ScrollBindings {
    pub line_step: i32,
    pub up: Vec<KeyEvent>,
    pub down: Vec<KeyEvent>,
    pub page_up: Vec<KeyEvent>,
    pub page_down: Vec<KeyEvent>,
    pub top: Vec<KeyEvent>,
    pub bottom: Vec<KeyEvent>,
}

impl Default for ScrollBindings {
    fn default() -> Self {
        Self {
            line_step: 1,
            up: vec![KeyEvent::new(KeyCode::Up), keymap::key_char('k')],
            down: vec![KeyEvent::new(KeyCode::Down), keymap::key_char('j')],
            page_up: vec![KeyEvent::new(KeyCode::PageUp), keymap::key_ctrl('u')],
            page_down: vec![KeyEvent::new(KeyCode::PageDown), keymap::key_ctrl('d')],
            top: vec![KeyEvent::new(KeyCode::Home), keymap::key_char('g')],
            bottom: vec![KeyEvent::new(KeyCode::End), keymap::key_char('G')],
        }
    }
}

impl ScrollBindings {
    pub fn action_for(&self, key: &KeyEvent) -> Option<ScrollAction> {
        if self.up.iter().any(|p| keymap::key_event_matches(p, key)) {
            return Some(ScrollAction::Up);
        }
        if self.down.iter().any(|p| keymap::key_event_matches(p, key)) {
            return Some(ScrollAction::Down);
        }
        if self
            .page_up
            .iter()
            .any(|p| keymap::key_event_matches(p, key))
        {
            return Some(ScrollAction::PageUp);
        }
        if self
            .page_down
            .iter()
            .any(|p| keymap::key_event_matches(p, key))
        {
            return Some(ScrollAction::PageDown);
        }
        if self.top.iter().any(|p| keymap::key_event_matches(p, key)) {
            return Some(ScrollAction::Top);
        }
        if self
            .bottom
            .iter()
            .any(|p| keymap::key_event_matches(p, key))
        {
            return Some(ScrollAction::Bottom);
        }
        None
    }

    pub fn apply(&self, state: &mut ViewportState, action: ScrollAction) {
        match action {
            ScrollAction::Up => state.scroll_y_by(-self.line_step),
            ScrollAction::Down => state.scroll_y_by(self.line_step),
            ScrollAction::PageUp => state.page_up(),
            ScrollAction::PageDown => state.page_down(),
            ScrollAction::Top => state.to_top(),
            ScrollAction::Bottom => state.to_bottom(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_map_vim_keys() {
        let b = ScrollBindings::default();
        assert_eq!(b.action_for(&keymap::key_char('j')), Some(ScrollAction::Down));
        assert_eq!(b.action_for(&keymap::key_char('k')), Some(ScrollAction::Up));
        assert_eq!(b.action_for(&keymap::key_char('G')), Some(ScrollAction::Bottom));
        assert_eq!(b.action_for(&keymap::key_char('x')), None);
    }
}
