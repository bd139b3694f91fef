//! Keyboard text buffer.
//!
//! Turns individual key releases into [`KeyEvent`] snapshots of the whole
//! text typed so far. Enter/Return terminates the entry; Escape wipes it.

use lb_core::{KeyCode, KeyEvent};

#[derive(Debug, Clone, Default)]
pub struct KeyBuffer {
    buffer: String,
}

impl KeyBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Feed one key. `text` is the printable text the key produced, if the
    /// platform reported any; `Char` keys fall back to their own character.
    pub fn press(&mut self, key: KeyCode, text: Option<&str>) -> KeyEvent {
        if key.is_accept() {
            let buffer = std::mem::take(&mut self.buffer);
            log::debug!("accepted buffer {buffer:?}");
            return KeyEvent {
                key,
                buffer,
                finished: true,
            };
        }

        match key {
            KeyCode::Escape => self.buffer.clear(),
            KeyCode::Backspace => {
                self.buffer.pop();
            }
            KeyCode::Char(c) => match text {
                Some(t) => self.push_printable(t),
                None => self.push_printable(c.encode_utf8(&mut [0; 4])),
            },
            _ => {
                if let Some(t) = text {
                    self.push_printable(t);
                }
            }
        }
        KeyEvent::typing(key, self.buffer.clone())
    }

    fn push_printable(&mut self, text: &str) {
        self.buffer.extend(text.chars().filter(|c| !c.is_control()));
    }
}
