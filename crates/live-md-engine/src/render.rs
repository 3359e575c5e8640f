//! Turning preview payloads into something visible.
//!
//! The engine only produces [`Preview`] values. A front end implements
//! [`PreviewRenderer`] for its own surface; [`HtmlRenderer`] is the reference
//! backend and produces HTML fragments (math as MathML via pulldown-latex).

use pulldown_latex::config::{DisplayMode, RenderConfig};
use pulldown_latex::mathml::push_mathml;
use pulldown_latex::{Parser, Storage};

use crate::payload::{ImagePayload, MarkupPayload, MathPayload, Preview};
use crate::selection::Selection;

/// Materializes previews and maps clicks on them back to the source.
pub trait PreviewRenderer {
    type Handle;

    /// Never fails: a payload that cannot be rendered falls back to its raw
    /// text.
    fn render(&mut self, preview: &Preview) -> Self::Handle;

    /// Selection to set when the rendered handle is clicked.
    fn on_activate(&self, handle: &Self::Handle) -> Selection;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedHtml {
    pub html: String,
    pub activation: Selection,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl PreviewRenderer for HtmlRenderer {
    type Handle = RenderedHtml;

    fn render(&mut self, preview: &Preview) -> RenderedHtml {
        let html = match preview {
            Preview::Image(image) => image_html(image),
            Preview::Math(math) => math_html(math),
            Preview::Markup(markup) => markup_html(markup),
        };
        RenderedHtml {
            html,
            activation: preview.activation_selection(),
        }
    }

    fn on_activate(&self, handle: &RenderedHtml) -> Selection {
        handle.activation
    }
}

fn attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

fn image_html(image: &ImagePayload) -> String {
    let width = attr(image.width.as_deref().unwrap_or("auto"));
    let alt = if image.alt.is_empty() { "Image" } else { &image.alt };

    let mut html = format!(
        r#"<figure class="cm-markdoc-image-figure" style="width: {width}"><img class="cm-markdoc-image" src="{}" alt="{}" style="width: {width}""#,
        attr(&image.url),
        attr(alt),
    );
    if let Some(title) = image.title.as_deref().filter(|t| !t.is_empty()) {
        html.push_str(&format!(
            r#" title="{}"><figcaption class="cm-markdoc-image-caption">{}</figcaption>"#,
            attr(title),
            html_escape::encode_text(title)
        ));
    } else {
        html.push('>');
    }
    html.push_str("</figure>");
    html
}

fn math_html(math: &MathPayload) -> String {
    let class = if math.display_block {
        "cm-markdoc-math-block"
    } else {
        "cm-markdoc-math-inline"
    };
    match render_mathml(&math.content, math.display_block) {
        Ok(mathml) => format!(r#"<span class="{class}">{mathml}</span>"#),
        Err(message) => {
            log::debug!("math at {}: {message}", math.span.start);
            format!(
                r#"<span class="{class} cm-markdoc-math-error" title="{}"><code>{}</code></span>"#,
                attr(&message),
                html_escape::encode_text(&math.content)
            )
        }
    }
}

/// LaTeX to MathML, or the parse errors joined.
fn render_mathml(latex: &str, display_block: bool) -> Result<String, String> {
    let storage = Storage::new();
    let parser = Parser::new(latex, &storage);
    let config = RenderConfig {
        display_mode: if display_block {
            DisplayMode::Block
        } else {
            DisplayMode::Inline
        },
        ..Default::default()
    };

    let events: Vec<_> = parser.collect();
    let errors: Vec<String> = events
        .iter()
        .filter_map(|e| e.as_ref().err().map(|err| err.to_string()))
        .collect();
    if !errors.is_empty() {
        return Err(errors.join("; "));
    }

    let mut mathml = String::new();
    push_mathml(&mut mathml, events.into_iter(), config).map_err(|e| e.to_string())?;
    Ok(mathml)
}

fn markup_html(markup: &MarkupPayload) -> String {
    let display = if markup.is_block {
        "block"
    } else {
        "inline-block"
    };
    format!(
        r#"<span class="cm-mark-render-block" style="display: {display}; white-space: normal">{}</span>"#,
        markup.html
    )
}
