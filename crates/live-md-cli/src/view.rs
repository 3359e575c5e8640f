//! Decorated source lines for the terminal.
//!
//! Hidden ranges are dropped, replaced ranges show a bracketed label, and
//! previews placed after a construct are appended as labels. The cursor is
//! drawn as a reversed cell.

use std::collections::HashMap;

use live_md_engine::text::span::merge_spans;
use live_md_engine::{LineClass, LiveDocument, MarkStyle, Placement, Preview, Span, TextSource};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text;

/// Source lines `first..first + count` (0-based) as styled terminal lines.
pub fn document_lines(doc: &LiveDocument, first: usize, count: usize) -> Vec<text::Line<'static>> {
    let rope = doc.rope();
    let decorations = doc.decorations();
    let cursor = doc.selection().to();

    let hidden = merge_spans(&decorations.hidden_spans().collect::<Vec<_>>());
    let mut replaced: Vec<(Span, String)> = Vec::new();
    let mut after: Vec<(usize, String)> = Vec::new();
    for (span, widget) in decorations.widgets() {
        let label = preview_label(&widget.preview);
        match widget.placement {
            Placement::Replace => replaced.push((span, label)),
            Placement::After => after.push((span.end, label)),
        }
    }
    let marks: Vec<(Span, MarkStyle)> = decorations.marks().collect();
    let mut line_classes: HashMap<usize, Vec<&LineClass>> = HashMap::new();
    for (start, class) in decorations.lines() {
        line_classes.entry(start).or_default().push(class);
    }

    let mut lines = Vec::new();
    for number in first + 1..=first + count {
        let Some(line) = rope.line(number) else {
            break;
        };
        let classes = line_classes
            .get(&line.span.start)
            .map(Vec::as_slice)
            .unwrap_or_default();
        if classes.contains(&&LineClass::HiddenLine) {
            continue;
        }
        // Inner lines of a multi-line replacement
        if replaced
            .iter()
            .any(|(span, _)| span.start < line.span.start && line.span.end <= span.end)
        {
            continue;
        }

        let base = line_style(classes);
        let labels_at = |at: usize| after.iter().filter(move |(end, _)| *end == at);
        let mut builder = LineBuilder::default();
        let mut skip_until = line.span.start;
        let mut pending_cursor = false;

        for (i, ch) in rope.slice_text(line.span).char_indices() {
            let at = line.span.start + i;
            if at > line.span.start {
                for (_, label) in labels_at(at) {
                    builder.push_str(label, base.patch(preview_style()));
                }
            }
            if at == cursor {
                pending_cursor = true;
            }
            if at < skip_until {
                continue;
            }
            if let Some((span, label)) = replaced.iter().find(|(span, _)| span.start == at) {
                builder.push_str(label, base.patch(preview_style()));
                skip_until = span.end;
                continue;
            }
            if hidden.iter().any(|h| h.start <= at && at < h.end) {
                continue;
            }

            let mut style = marks
                .iter()
                .filter(|(span, _)| span.start <= at && at < span.end)
                .fold(base, |style, (_, mark)| style.patch(mark_style(*mark)));
            if pending_cursor {
                style = style.add_modifier(Modifier::REVERSED);
                pending_cursor = false;
            }
            builder.push(ch, style);
        }

        for (_, label) in labels_at(line.span.end) {
            builder.push_str(label, base.patch(preview_style()));
        }
        if pending_cursor || cursor == line.span.end {
            builder.push(' ', base.add_modifier(Modifier::REVERSED));
        }
        lines.push(builder.finish());
    }
    lines
}

/// Short text standing in for a rendered preview.
pub fn preview_label(preview: &Preview) -> String {
    match preview {
        Preview::Image(image) => {
            let name = if image.alt.is_empty() {
                &image.url
            } else {
                &image.alt
            };
            format!("[image: {name}]")
        }
        Preview::Math(math) => {
            let content: Vec<&str> = math.content.split_whitespace().collect();
            format!("[math: {}]", content.join(" "))
        }
        Preview::Markup(markup) => format!("[html: {}]", strip_tags(&markup.html)),
    }
}

fn strip_tags(html: &str) -> String {
    let mut text = String::new();
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text.trim().to_string()
}

fn preview_style() -> Style {
    Style::default().fg(Color::LightMagenta)
}

fn line_style(classes: &[&LineClass]) -> Style {
    classes
        .iter()
        .fold(Style::default(), |style, class| match class {
            LineClass::CodeLine | LineClass::CodeStart { .. } | LineClass::CodeEnd => {
                style.bg(Color::Indexed(236))
            }
            LineClass::Blockquote => style.fg(Color::Gray).add_modifier(Modifier::ITALIC),
            LineClass::ListFocused => style.bg(Color::Indexed(234)),
            _ => style,
        })
}

fn mark_style(mark: MarkStyle) -> Style {
    let style = Style::default();
    match mark {
        MarkStyle::ToHide | MarkStyle::HeaderMark { .. } | MarkStyle::CodeFence => {
            style.fg(Color::DarkGray)
        }
        MarkStyle::Heading(_) => style.fg(Color::Cyan).add_modifier(Modifier::BOLD),
        MarkStyle::InlineCode => style.fg(Color::Yellow),
        MarkStyle::Emphasis => style.add_modifier(Modifier::ITALIC),
        MarkStyle::Strong => style.add_modifier(Modifier::BOLD),
        MarkStyle::Link => style.fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        MarkStyle::Strikethrough => style.add_modifier(Modifier::CROSSED_OUT),
        MarkStyle::Subscript | MarkStyle::Superscript => style.fg(Color::Magenta),
        MarkStyle::FencedCode => style.fg(Color::Green),
        MarkStyle::ListMark => style.fg(Color::Cyan),
        MarkStyle::TaskMarker { checked: true } => style.fg(Color::Green),
        MarkStyle::TaskMarker { checked: false } => style.fg(Color::Red),
        MarkStyle::MathInline | MarkStyle::MathBlock => style.fg(Color::Magenta),
        MarkStyle::Tag => style.fg(Color::Yellow).add_modifier(Modifier::ITALIC),
    }
}

/// Groups runs of equally styled characters into spans.
#[derive(Default)]
struct LineBuilder {
    spans: Vec<text::Span<'static>>,
    buf: String,
    style: Style,
}

impl LineBuilder {
    fn push(&mut self, ch: char, style: Style) {
        if style != self.style {
            self.flush();
            self.style = style;
        }
        self.buf.push(ch);
    }

    fn push_str(&mut self, s: &str, style: Style) {
        self.flush();
        self.spans.push(text::Span::styled(s.to_string(), style));
    }

    fn flush(&mut self) {
        if !self.buf.is_empty() {
            self.spans
                .push(text::Span::styled(std::mem::take(&mut self.buf), self.style));
        }
    }

    fn finish(mut self) -> text::Line<'static> {
        self.flush();
        text::Line::from(self.spans)
    }
}
