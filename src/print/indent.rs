//! Output buffer that carries indentation changes as out-of-band markers.
//!
//! Producers append text and [`IndentedText::indent`]/[`IndentedText::dedent`] markers without
//! tracking depth themselves. [`IndentedText::finish`] resolves the markers in one pass: every
//! newline in the text is followed by `depth * width` spaces.
use std::fmt;
use thiserror::Error;

/// Spaces per nesting level in the rendered document.
pub const INDENT_WIDTH: usize = 2;

#[derive(Debug, PartialEq, Clone)]
enum Segment {
    Text(String),
    Indent,
    Dedent,
}

#[derive(Debug, Default)]
pub struct IndentedText {
    segments: Vec<Segment>,
}

/// A dedent marker with no indent left to close.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("dedent at marker {position} has no matching indent")]
pub struct IndentUnderflow {
    pub position: usize,
}

impl IndentedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(Segment::Text(last)) => last.push_str(text),
            _ => self.segments.push(Segment::Text(text.to_owned())),
        }
    }

    pub fn indent(&mut self) {
        self.segments.push(Segment::Indent);
    }

    pub fn dedent(&mut self) {
        self.segments.push(Segment::Dedent);
    }

    /// Resolves the markers into padding after each newline.
    pub fn finish(self, width: usize) -> Result<String, IndentUnderflow> {
        let mut out = String::new();
        let mut depth: usize = 0;

        for (position, segment) in self.segments.into_iter().enumerate() {
            match segment {
                Segment::Indent => depth += 1,
                Segment::Dedent => {
                    depth = depth.checked_sub(1).ok_or(IndentUnderflow { position })?;
                }
                Segment::Text(text) => {
                    for (i, line) in text.split('\n').enumerate() {
                        if i > 0 {
                            out.push('\n');
                            out.extend(std::iter::repeat_n(' ', depth * width));
                        }
                        out.push_str(line);
                    }
                }
            }
        }

        Ok(out)
    }
}

impl fmt::Write for IndentedText {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn newlines_pick_up_current_depth() {
        let mut text = IndentedText::new();
        text.push_str("(a");
        text.indent();
        text.push_str("\n(b");
        text.indent();
        text.push_str("\nc");
        text.dedent();
        text.push_str(")");
        text.dedent();
        text.push_str("\n)");

        assert_eq!(text.finish(INDENT_WIDTH).unwrap(), "(a\n  (b\n    c)\n)");
    }

    #[test]
    fn markers_inside_a_line_do_not_emit_padding() {
        let mut text = IndentedText::new();
        text.indent();
        text.push_str("x");
        text.dedent();
        text.push_str("y\nz");

        assert_eq!(text.finish(4).unwrap(), "xy\nz");
    }

    #[test]
    fn unmatched_dedent_is_an_error() {
        let mut text = IndentedText::new();
        text.push_str("a");
        text.indent();
        text.dedent();
        text.dedent();

        assert_eq!(
            text.finish(INDENT_WIDTH),
            Err(IndentUnderflow { position: 3 })
        );
    }
}
