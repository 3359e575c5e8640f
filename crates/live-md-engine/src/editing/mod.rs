/*!
 * # Live Editing Model
 *
 * The edit-surface side of the engine: a document that is edited as plain
 * text while the decoration pass keeps its rendered view in sync.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: xi-rope Buffer
 * - The document is one **`xi_rope::Rope`**; every edit is a **Delta**
 * - Saving writes the rope bytes verbatim, so there is no formatting drift
 *
 * ### 2. Command-Based Editing
 * - Edits are **Commands** (`Cmd`) compiled to Deltas and applied at once
 * - The selection is carried through each edit
 *
 * ### 3. Re-parse, then Re-decorate
 * - After an edit the rope is parsed again into a flat [`Tree`](crate::Tree)
 * - Decorations are recomputed only when something they depend on changed:
 *   the text, the viewport, or the selection (see [`ViewUpdate`])
 *
 * ### 4. Click-to-edit
 * - A rendered preview maps a click back to a source selection through
 *   [`PreviewRenderer::on_activate`](crate::render::PreviewRenderer::on_activate)
 *
 * ## Usage Pattern
 *
 * ```rust
 * use live_md_engine::editing::{Cmd, LiveDocument, ViewUpdate};
 * use live_md_engine::Selection;
 *
 * // The cursor starts at the end, outside the emphasis: markers are hidden
 * let mut doc = LiveDocument::new("*hello* world");
 * assert_eq!(doc.decorations().hidden_spans().count(), 2);
 *
 * // Move into the emphasis: its markers are shown again
 * let update = doc.set_selection(Selection::cursor(3));
 * doc.update(update);
 * assert_eq!(doc.decorations().hidden_spans().count(), 0);
 *
 * let patch = doc.apply(Cmd::InsertText { at: 0, text: "# ".to_string() }).unwrap();
 * assert_eq!(doc.text(), "# *hello* world");
 * assert!(doc.update(ViewUpdate::doc_changed()));
 * assert_eq!(patch.version, 1);
 * ```
 */

pub mod commands;
pub mod document;
pub mod patch;

pub use commands::Cmd;
pub use document::{DocumentError, LiveDocument, ViewUpdate};
pub use patch::Patch;
