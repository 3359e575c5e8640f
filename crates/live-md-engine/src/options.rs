/// Image shown when an image has no URL.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://placehold.co/560x350/667EEA/FFFFFF?text=Something+Went+Wrong";

/// `data-lang` of a fenced block without an info string.
pub const DEFAULT_CODE_LANGUAGE: &str = "plane";

/// Knobs for a decoration pass that do not come from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationOptions {
    pub placeholder_image_url: String,
    pub default_code_language: String,
    /// CSS width given to rendered images; the renderer uses `auto` when unset.
    pub image_width: Option<String>,
}

impl Default for DecorationOptions {
    fn default() -> Self {
        Self {
            placeholder_image_url: PLACEHOLDER_IMAGE_URL.to_string(),
            default_code_language: DEFAULT_CODE_LANGUAGE.to_string(),
            image_width: None,
        }
    }
}
