//! User-facing construction prompts.
//!
//! A prompt describes the next input an in-progress element needs. Prompts
//! are ordinary `build` output, not errors.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Prompt {
    BoxPosition,
    BoxName,
    FirstBox,
    SecondBox,
    LinkName,
    SelectStart,
    SelectEnd,
    /// Informational: the marquee is complete.
    SelectionReady,
    /// Informational: the null element needs nothing.
    NullDrawable,
}

impl Prompt {
    pub fn as_str(self) -> &'static str {
        match self {
            Prompt::BoxPosition => "Choose the Box Position",
            Prompt::BoxName => "Choose the Box Name",
            Prompt::FirstBox => "Choose the First Box",
            Prompt::SecondBox => "Choose the Second Box",
            // Link names share the box wording.
            Prompt::LinkName => "Choose the Box Name",
            Prompt::SelectStart => "select start point",
            Prompt::SelectEnd => "select end point",
            Prompt::SelectionReady => "selection window ready",
            Prompt::NullDrawable => "null drawable",
        }
    }

    /// Blocking prompts keep a construction incomplete.
    pub fn is_blocking(self) -> bool {
        !matches!(self, Prompt::SelectionReady | Prompt::NullDrawable)
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
