//! Prompt Templates
//!
//! A prompt template string is compiled once into literal fragments and
//! dynamic slots. Slots are resolved on every render so the prompt always
//! reflects the current input counter and the active evaluator.
//!
//! | directive | renders as |
//! |-----------|------------|
//! | `$$`      | `$` |
//! | `$i`      | input counter, zero-padded to 3 digits |
//! | `$e`      | engine name of the active evaluator |
//! | `$l`      | language name of the active evaluator |
//! | `$S`      | a space |

use std::fmt::Write;

use super::error::{ReplError, ReplResult, TemplateFault};

/// Default prompt: `<language>:<input counter>> `
pub const DEFAULT_PROMPT: &str = "$l:$i> ";

/// Escape character introducing a directive
const ESCAPE: char = '$';

/// Dynamic slot kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    InputCount,
    EngineName,
    LanguageName,
}

/// Template fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Literal(String),
    Slot(Slot),
}

/// Values available to dynamic slots at render time
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub input_count: usize,
    pub engine_name: &'a str,
    pub language_name: &'a str,
}

/// Compiled prompt template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
    fragments: Vec<Fragment>,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            source: DEFAULT_PROMPT.to_string(),
            fragments: vec![
                Fragment::Slot(Slot::LanguageName),
                Fragment::Literal(":".to_string()),
                Fragment::Slot(Slot::InputCount),
                Fragment::Literal("> ".to_string()),
            ],
        }
    }
}

impl PromptTemplate {
    /// Compile a prompt template string
    pub fn compile(text: &str) -> ReplResult<Self> {
        let mut fragments = Vec::new();
        let mut literal = String::new();
        let mut chars = text.chars().enumerate();

        while let Some((position, c)) = chars.next() {
            if c != ESCAPE {
                literal.push(c);
                continue;
            }

            let directive = chars.next().map(|(_, d)| d);
            let slot = match directive {
                Some('$') => {
                    literal.push('$');
                    continue;
                }
                Some('S') => {
                    literal.push(' ');
                    continue;
                }
                Some('i') => Slot::InputCount,
                Some('e') => Slot::EngineName,
                Some('l') => Slot::LanguageName,
                Some(other) => {
                    return Err(ReplError::InvalidTemplate {
                        reason: TemplateFault::UnknownDirective(other),
                        position,
                    })
                }
                None => {
                    return Err(ReplError::InvalidTemplate {
                        reason: TemplateFault::DanglingEscape,
                        position,
                    })
                }
            };

            if !literal.is_empty() {
                fragments.push(Fragment::Literal(std::mem::take(&mut literal)));
            }
            fragments.push(Fragment::Slot(slot));
        }

        if !literal.is_empty() {
            fragments.push(Fragment::Literal(literal));
        }

        Ok(Self {
            source: text.to_string(),
            fragments,
        })
    }

    /// The text this template was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Compiled fragments
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Render the prompt against the current session state
    pub fn render(
        &self,
        ctx: &PromptContext<'_>,
    ) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Literal(text) => out.push_str(text),
                Fragment::Slot(Slot::InputCount) => {
                    let _ = write!(out, "{:03}", ctx.input_count);
                }
                Fragment::Slot(Slot::EngineName) => out.push_str(ctx.engine_name),
                Fragment::Slot(Slot::LanguageName) => out.push_str(ctx.language_name),
            }
        }
        out
    }
}
