use live_md_engine::{
    Cmd, HtmlRenderer, LiveDocument, PreviewRenderer, Selection, Span, TextSource, ViewUpdate,
};
use log::debug;
use xi_rope::Rope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

pub struct App {
    pub doc: LiveDocument,
    pub title: String,
    /// Index of the first source line on screen
    pub scroll: usize,
    pub status: Option<String>,
    renderer: HtmlRenderer,
}

impl App {
    pub fn new(doc: LiveDocument, title: impl Into<String>) -> Self {
        Self {
            doc,
            title: title.into(),
            scroll: 0,
            status: None,
            renderer: HtmlRenderer,
        }
    }

    pub fn cursor(&self) -> usize {
        self.doc.selection().to()
    }

    /// Type `text` over the selection.
    pub fn insert(&mut self, text: &str) {
        let selection = self.doc.selection();
        let cmd = if selection.is_collapsed() {
            Cmd::InsertText {
                at: selection.from(),
                text: text.to_string(),
            }
        } else {
            Cmd::ReplaceRange {
                range: selection.from()..selection.to(),
                text: text.to_string(),
            }
        };
        self.edit(cmd);
    }

    pub fn backspace(&mut self) {
        let selection = self.doc.selection();
        if !selection.is_collapsed() {
            return self.edit(Cmd::DeleteRange {
                range: selection.from()..selection.to(),
            });
        }
        let at = selection.from();
        if at > 0 {
            let start = prev_boundary(self.doc.rope(), at);
            self.edit(Cmd::DeleteRange { range: start..at });
        }
    }

    pub fn delete_forward(&mut self) {
        let selection = self.doc.selection();
        if !selection.is_collapsed() {
            return self.edit(Cmd::DeleteRange {
                range: selection.from()..selection.to(),
            });
        }
        let at = selection.from();
        if at < self.doc.len() {
            let end = next_boundary(self.doc.rope(), at);
            self.edit(Cmd::DeleteRange { range: at..end });
        }
    }

    fn edit(&mut self, cmd: Cmd) {
        match self.doc.apply(cmd) {
            Ok(_) => {
                self.status = None;
                self.doc.update(ViewUpdate::doc_changed());
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    pub fn move_cursor(&mut self, motion: Motion) {
        let target = {
            let rope = self.doc.rope();
            let at = self.cursor();
            match motion {
                Motion::Left if at > 0 => prev_boundary(rope, at),
                Motion::Left => at,
                Motion::Right if at < rope.len() => next_boundary(rope, at),
                Motion::Right => at,
                Motion::Home => rope.line_at(at).span.start,
                Motion::End => rope.line_at(at).span.end,
                Motion::Up => vertical(rope, at, false),
                Motion::Down => vertical(rope, at, true),
            }
        };
        let update = self.doc.set_selection(Selection::cursor(target));
        self.doc.update(update);
    }

    /// Click-equivalent on the preview under the cursor.
    pub fn activate_preview(&mut self) {
        let Some(preview) = self
            .doc
            .widget_at(self.cursor())
            .map(|(_, widget)| widget.preview.clone())
        else {
            self.status = Some("No preview under the cursor".to_string());
            return;
        };
        let handle = self.renderer.render(&preview);
        debug!("activated preview: {}", handle.html);
        let update = self.doc.activate(&self.renderer, &handle);
        self.doc.update(update);
    }

    /// Keep the cursor line on screen and decorate only what is shown.
    pub fn scroll_into_view(&mut self, height: usize) {
        let height = height.max(1);
        let viewport = {
            let rope = self.doc.rope();
            let line = rope.line_at(self.cursor()).number - 1;
            if line < self.scroll {
                self.scroll = line;
            } else if line >= self.scroll + height {
                self.scroll = line + 1 - height;
            }

            let last_line = rope.line_at(rope.len()).number;
            let first = rope.line(self.scroll + 1).map_or(0, |l| l.span.start);
            let end = rope
                .line((self.scroll + height).min(last_line))
                .map_or(rope.len(), |l| l.span.end);
            Span::new(first, end)
        };
        let update = self.doc.set_viewport(Some(vec![viewport]));
        self.doc.update(update);
    }
}

fn prev_boundary(rope: &Rope, at: usize) -> usize {
    let mut offset = at.saturating_sub(1);
    while offset > 0 && !rope.is_codepoint_boundary(offset) {
        offset -= 1;
    }
    offset
}

fn next_boundary(rope: &Rope, at: usize) -> usize {
    let mut offset = (at + 1).min(rope.len());
    while offset < rope.len() && !rope.is_codepoint_boundary(offset) {
        offset += 1;
    }
    offset
}

/// Same byte column on the neighbouring line, clamped to its length.
fn vertical(rope: &Rope, at: usize, down: bool) -> usize {
    let line = rope.line_at(at);
    let target = if down {
        rope.line(line.number + 1)
    } else if line.number > 1 {
        rope.line(line.number - 1)
    } else {
        None
    };
    let Some(target) = target else {
        return at;
    };

    let mut offset = (target.span.start + (at - line.span.start)).min(target.span.end);
    while !rope.is_codepoint_boundary(offset) {
        offset -= 1;
    }
    offset
}
