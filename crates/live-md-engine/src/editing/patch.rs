use crate::selection::Selection;

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Byte ranges of inserted text, in post-edit coordinates
    pub changed: Vec<std::ops::Range<usize>>,
    pub new_selection: Selection,
    pub version: u64,
}
