//! Balanced raw-markup tag resolution.
//!
//! Raw HTML tags are flat tokens in the tree, so `<div>` and its `</div>`
//! are siblings (or cousins) rather than parent and child. The resolver pairs
//! them with a nesting counter over the tags that follow the opener inside a
//! scope node.

use std::collections::HashSet;
use std::sync::OnceLock;

use live_md_syntax::SyntaxKind;
use regex::Regex;

use crate::text::{Span, TextSource};
use crate::tree::{NodeId, Tree};

/// A raw tag as written: `<name ...>`, `</name>` or `<name ... />`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub name: String,
    pub closing: bool,
    pub self_closing: bool,
}

impl TagInfo {
    pub fn is_opening(&self) -> bool {
        !self.closing && !self.self_closing
    }

    fn same_name(&self, other: &TagInfo) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }
}

pub fn parse_tag(text: &str) -> Option<TagInfo> {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = TAG_REGEX.get_or_init(|| {
        Regex::new(r"^<\s*(/)?\s*([A-Za-z][A-Za-z0-9-]*)[^>]*?(/)?\s*>$")
            .expect("Invalid tag regex")
    });

    let captures = regex.captures(text.trim())?;
    Some(TagInfo {
        name: captures.get(2)?.as_str().to_string(),
        closing: captures.get(1).is_some(),
        self_closing: captures.get(3).is_some(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("{0:?} is not a raw markup tag")]
    NotATag(String),
    #[error("<{0}> is a closing or self-closing tag")]
    NotOpening(String),
    #[error("no closing tag for <{name}> before byte {scope_end}")]
    Unbalanced { name: String, scope_end: usize },
}

/// Start offsets of the tags already paired during one pass.
#[derive(Debug, Clone, Default)]
pub struct ConsumedTags(HashSet<usize>);

impl ConsumedTags {
    pub fn insert(&mut self, start: usize) -> bool {
        self.0.insert(start)
    }

    pub fn contains(&self, start: usize) -> bool {
        self.0.contains(&start)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An opening tag paired with its closing tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTag {
    pub open: Span,
    pub close: Span,
}

impl ResolvedTag {
    /// From the `<` of the opener to the `>` of the closer.
    pub fn span(&self) -> Span {
        Span::new(self.open.start, self.close.end)
    }

    /// Between the two tags.
    pub fn inner(&self) -> Span {
        Span::new(self.open.end, self.close.start)
    }
}

/// Find the tag closing `open` among the `HTML_TAG` nodes under `scope`.
///
/// On success every tag from the opener to the matched closer, whatever its
/// name, is added to `consumed`. On failure nothing is.
pub fn resolve<T: TextSource + ?Sized>(
    tree: &Tree,
    open: NodeId,
    text: &T,
    scope: NodeId,
    consumed: &mut ConsumedTags,
) -> Result<ResolvedTag, ResolveError> {
    let open_span = tree.span(open);
    let open_text = text.slice_text(open_span);
    let opener = parse_tag(&open_text).ok_or_else(|| ResolveError::NotATag(open_text.to_string()))?;
    if !opener.is_opening() {
        return Err(ResolveError::NotOpening(opener.name));
    }

    let mut depth = 1usize;
    let mut paired = vec![open_span.start];

    for id in tree.descendants(scope) {
        let span = tree.span(id);
        if tree.kind(id) != SyntaxKind::HTML_TAG || span.start <= open_span.start {
            continue;
        }
        paired.push(span.start);

        let Some(tag) = parse_tag(&text.slice_text(span)) else {
            continue;
        };
        if !tag.same_name(&opener) || tag.self_closing {
            continue;
        }
        if tag.closing {
            depth -= 1;
        } else {
            depth += 1;
        }

        if depth == 0 {
            for start in paired {
                consumed.insert(start);
            }
            return Ok(ResolvedTag {
                open: open_span,
                close: span,
            });
        }
    }

    Err(ResolveError::Unbalanced {
        name: opener.name,
        scope_end: tree.span(scope).end,
    })
}
