use std::ops::Range;

use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::selection::Selection;

/// Plain-text edit commands. Every change to a [`LiveDocument`](super::LiveDocument)
/// goes through one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    InsertText { at: usize, text: String },
    DeleteRange { range: Range<usize> },
    ReplaceRange { range: Range<usize>, text: String },
}

impl Cmd {
    /// Source range the command removes (empty for a pure insertion).
    pub fn range(&self) -> Range<usize> {
        match self {
            Cmd::InsertText { at, .. } => *at..*at,
            Cmd::DeleteRange { range } | Cmd::ReplaceRange { range, .. } => range.clone(),
        }
    }

    pub fn inserted(&self) -> &str {
        match self {
            Cmd::InsertText { text, .. } | Cmd::ReplaceRange { text, .. } => text,
            Cmd::DeleteRange { .. } => "",
        }
    }
}

/// Compile a command into a delta against a buffer of `len` bytes.
/// Bounds are the caller's responsibility.
pub(crate) fn compile_command(len: usize, cmd: &Cmd) -> Delta<RopeInfo> {
    match cmd {
        Cmd::InsertText { at, text } => {
            let mut builder = Builder::new(len);
            builder.replace(*at..*at, Rope::from(text));
            builder.build()
        }
        Cmd::DeleteRange { range } => {
            let mut builder = Builder::new(len);
            builder.delete(range.clone());
            builder.build()
        }
        Cmd::ReplaceRange { range, text } => {
            let mut builder = Builder::new(len);
            builder.replace(range.clone(), Rope::from(text));
            builder.build()
        }
    }
}

/// Carry a selection through an edit.
pub(crate) fn transform_selection(selection: Selection, cmd: &Cmd) -> Selection {
    let (from, to) = (selection.from(), selection.to());
    match cmd {
        Cmd::InsertText { at, text } => {
            let n = text.len();
            if *at <= from {
                Selection::new(from + n, to + n)
            } else if *at < to {
                // Inside the selection: grow it
                Selection::new(from, to + n)
            } else {
                selection
            }
        }
        Cmd::DeleteRange { range } => {
            if range.end <= from {
                Selection::new(from - range.len(), to - range.len())
            } else if range.start >= to {
                selection
            } else {
                Selection::cursor(range.start)
            }
        }
        Cmd::ReplaceRange { range, text } => {
            if range.end <= from {
                let shift = |offset: usize| offset + text.len() - range.len();
                Selection::new(shift(from), shift(to))
            } else if range.start >= to {
                selection
            } else {
                // Overlap: land after the replacement text
                Selection::cursor(range.start + text.len())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn insert(at: usize, text: &str) -> Cmd {
        Cmd::InsertText {
            at,
            text: text.to_string(),
        }
    }

    #[test]
    fn compiled_delta_applies_to_rope() {
        let rope = Rope::from("Hello World");
        let cases = [
            (insert(5, ","), "Hello, World"),
            (Cmd::DeleteRange { range: 5..11 }, "Hello"),
            (
                Cmd::ReplaceRange {
                    range: 6..11,
                    text: "Rust".to_string(),
                },
                "Hello Rust",
            ),
        ];
        for (cmd, expected) in cases {
            let delta = compile_command(rope.len(), &cmd);
            assert_eq!(delta.apply(&rope).to_string(), expected, "{cmd:?}");
        }
    }

    #[rstest]
    #[case::before(insert(0, "ab"), Selection::new(4, 6), Selection::new(6, 8))]
    #[case::at_start(insert(4, "ab"), Selection::new(4, 6), Selection::new(6, 8))]
    #[case::inside(insert(5, "ab"), Selection::new(4, 6), Selection::new(4, 8))]
    #[case::at_end(insert(6, "ab"), Selection::new(4, 6), Selection::new(4, 6))]
    #[case::cursor(insert(3, "x"), Selection::cursor(3), Selection::cursor(4))]
    fn insert_moves_selection(#[case] cmd: Cmd, #[case] before: Selection, #[case] after: Selection) {
        assert_eq!(transform_selection(before, &cmd), after);
    }

    #[rstest]
    #[case::before(0..2, Selection::new(4, 6), Selection::new(2, 4))]
    #[case::after(6..8, Selection::new(4, 6), Selection::new(4, 6))]
    #[case::overlapping(3..5, Selection::new(4, 6), Selection::cursor(3))]
    fn delete_moves_selection(
        #[case] range: Range<usize>,
        #[case] before: Selection,
        #[case] after: Selection,
    ) {
        assert_eq!(
            transform_selection(before, &Cmd::DeleteRange { range }),
            after
        );
    }

    #[rstest]
    #[case::shrinking_before(0..3, "x", Selection::cursor(5), Selection::cursor(3))]
    #[case::growing_before(0..1, "xyz", Selection::cursor(5), Selection::cursor(7))]
    #[case::overlapping(4..6, "xyz", Selection::cursor(5), Selection::cursor(7))]
    fn replace_moves_selection(
        #[case] range: Range<usize>,
        #[case] text: &str,
        #[case] before: Selection,
        #[case] after: Selection,
    ) {
        let cmd = Cmd::ReplaceRange {
            range,
            text: text.to_string(),
        };
        assert_eq!(transform_selection(before, &cmd), after);
    }
}
