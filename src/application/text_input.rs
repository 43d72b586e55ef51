//! Single-line text input bound to the focused node's value.
//!
//! This is the default behaviour for keys the outline handler leaves alone:
//! typing, Backspace on a non-empty value, Delete and caret movement. The caret
//! counts grapheme clusters so combined characters move and delete as one.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::domain::{Key, KeyEvent};

/// What applying a key did to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEffect {
    /// The value changed
    Edited,
    /// Only the caret moved
    Moved,
    /// Nothing to do for this key
    Unchanged,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextInput {
    /// Caret position in grapheme clusters from the start of the value
    caret: usize,
}

impl TextInput {
    /// Input with the caret after the last grapheme of `value`.
    pub fn at_end(value: &str) -> Self {
        Self {
            caret: grapheme_count(value),
        }
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Terminal column of the caret relative to the start of the value.
    pub fn display_column(&self, value: &str) -> usize {
        value[..byte_offset(value, self.caret)].width()
    }

    pub fn apply(&mut self, value: &mut String, event: &KeyEvent) -> InputEffect {
        self.caret = self.caret.min(grapheme_count(value));
        if event.ctrl || event.alt {
            return InputEffect::Unchanged;
        }
        match event.key {
            Key::Char(c) => {
                let at = byte_offset(value, self.caret);
                value.insert(at, c);
                // A combining mark merges into the preceding cluster
                self.caret = grapheme_count(&value[..at + c.len_utf8()]);
                InputEffect::Edited
            }
            Key::Backspace if self.caret > 0 => {
                let start = byte_offset(value, self.caret - 1);
                let end = byte_offset(value, self.caret);
                value.replace_range(start..end, "");
                self.caret -= 1;
                InputEffect::Edited
            }
            Key::Delete if self.caret < grapheme_count(value) => {
                let start = byte_offset(value, self.caret);
                let end = byte_offset(value, self.caret + 1);
                value.replace_range(start..end, "");
                InputEffect::Edited
            }
            Key::ArrowLeft if self.caret > 0 => {
                self.caret -= 1;
                InputEffect::Moved
            }
            Key::ArrowRight if self.caret < grapheme_count(value) => {
                self.caret += 1;
                InputEffect::Moved
            }
            Key::Home if self.caret > 0 => {
                self.caret = 0;
                InputEffect::Moved
            }
            Key::End => {
                let end = grapheme_count(value);
                if self.caret == end {
                    return InputEffect::Unchanged;
                }
                self.caret = end;
                InputEffect::Moved
            }
            _ => InputEffect::Unchanged,
        }
    }
}

fn grapheme_count(value: &str) -> usize {
    value.graphemes(true).count()
}

fn byte_offset(value: &str, grapheme: usize) -> usize {
    value
        .grapheme_indices(true)
        .nth(grapheme)
        .map(|(i, _)| i)
        .unwrap_or(value.len())
}
