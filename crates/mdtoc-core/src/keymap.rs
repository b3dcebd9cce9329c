use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;

pub fn key_event_matches(pattern: &KeyEvent, event: &KeyEvent) -> bool {
    pattern.code == event.code && pattern.modifiers == event.modifiers
}

pub fn key_char(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c))
}

pub fn key_ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c)).with_modifiers(KeyModifiers {
        shift: false,
        ctrl: true,
        alt: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_require_exact_modifiers() {
        assert!(key_event_matches(&key_char('g'), &key_char('g')));
        assert!(!key_event_matches(&key_char('g'), &key_ctrl('g')));
    }
}
