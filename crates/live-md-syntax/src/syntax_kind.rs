//! SyntaxKind enum for all tokens and nodes in the Markdown CST.
//!
//! Following the rust-analyzer model, all tokens and nodes share a single enum.
//! Every byte in the source must appear as a token in the tree.
//!
//! Kinds fall into three groups:
//!
//! - **raw tokens** straight from the lexer (`TEXT`, `STAR`, `DOLLAR`, ...)
//! - **marker tokens** the parser produces by re-labelling (or merging) raw
//!   tokens once it knows what they mean (`EMPHASIS_MARK`, `URL`, `MATH_MARK`, ...)
//! - **composite nodes** (`HEADING`, `IMAGE`, `BLOCK_MATH`, ...)
//!
//! Marker tokens and composite nodes are the "named" kinds: they are what a
//! consumer of the tree walks and decorates. Raw tokens are just text.

/// All syntax kinds for the Markdown CST.
///
/// The `repr(u16)` ensures efficient storage in rowan's green tree.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for SyntaxKind.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Raw tokens (lexer output) ===
    /// Horizontal whitespace (spaces, tabs)
    WHITESPACE,
    /// Line ending
    NEWLINE,
    /// Plain text content
    TEXT,
    /// `>` for blockquotes and the end of raw HTML tags
    GT,
    /// `<` for raw HTML tags
    LT,
    /// `-` for lists and thematic breaks
    DASH,
    /// `*` for lists, emphasis, and thematic breaks
    STAR,
    /// `+` for lists
    PLUS,
    /// `_` for emphasis
    UNDERSCORE,
    /// Single backtick for code spans and fences
    BACKTICK,
    /// `~` for fences, strikethrough and subscript
    TILDE,
    /// `^` for superscript
    CARET,
    /// `$` for math
    DOLLAR,
    /// `!` for images
    EXCLAIM,
    /// `\` for escapes and hard breaks
    BACKSLASH,
    /// `[` for links
    LBRACKET,
    /// `]` for links
    RBRACKET,
    /// `(` for link destinations
    LPAREN,
    /// `)` for link destinations
    RPAREN,
    /// `#` for headings
    HASH,

    // === Marker tokens (parser output) ===
    /// `#` run opening an ATX heading
    HEADER_MARK,
    /// `>` opening a blockquote line
    QUOTE_MARK,
    /// Bullet or ordinal of a list item
    LIST_MARK,
    /// `[ ]` / `[x]` checkbox of a task list item
    TASK_MARKER,
    /// `*`, `_`, `**` or `__` delimiting emphasis
    EMPHASIS_MARK,
    /// Backtick run of a code span or fence line
    CODE_MARK,
    /// Info string after an opening code fence
    CODE_INFO,
    /// `[`, `]`, `(`, `)` or `![` of a link or image
    LINK_MARK,
    /// Link or image destination
    URL,
    /// Optional link or image title
    LINK_TITLE,
    /// Backslash or double-space line break
    HARD_BREAK,
    /// Backslash escape (`\*`)
    ESCAPE,
    /// `~~` delimiting strikethrough
    STRIKETHROUGH_MARK,
    /// `~` delimiting subscript
    SUBSCRIPT_MARK,
    /// `^` delimiting superscript
    SUPERSCRIPT_MARK,
    /// `$` or `$$` delimiting math
    MATH_MARK,
    /// A complete raw HTML tag (`<div class="x">`, `</div>`, `<br/>`)
    HTML_TAG,
    /// End of file marker
    EOF,

    // === Composite Nodes (parser output) ===
    /// Root document node
    ROOT,
    /// Paragraph block
    PARAGRAPH,
    /// ATX heading (`# ...`)
    HEADING,
    /// Blockquote container (`> ...`)
    BLOCK_QUOTE,
    /// Unordered list (`-`, `*`, `+`)
    BULLET_LIST,
    /// Ordered list (`1.`, `1)`)
    ORDERED_LIST,
    /// Individual list item
    LIST_ITEM,
    /// Thematic break (`---`, `***`, etc.)
    THEMATIC_BREAK,
    /// Fenced code block
    FENCED_CODE,
    /// Raw HTML block
    HTML_BLOCK,
    /// Single-line `{% ... %}` tag block
    CUSTOM_TAG,
    /// `$$` ... `$$` math block
    BLOCK_MATH,
    /// `$...$` inline math
    INLINE_MATH,
    /// Inline code span
    CODE_SPAN,
    /// Emphasis `*text*`
    EMPHASIS,
    /// Strong emphasis `**text**`
    STRONG,
    /// Strikethrough `~~text~~`
    STRIKETHROUGH,
    /// Subscript `~text~`
    SUBSCRIPT,
    /// Superscript `^text^`
    SUPERSCRIPT,
    /// Standard link `[text](url)`
    LINK,
    /// Image `![alt](url "title")`
    IMAGE,

    /// Error recovery node
    ERROR,
}

impl SyntaxKind {
    /// Returns true if this kind represents a token (lexer or parser output).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns true if this kind is trivia (whitespace/newlines).
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::NEWLINE)
    }

    /// Returns true for tokens the parser assigned a meaning to.
    pub fn is_marker(self) -> bool {
        (self as u16) >= (Self::HEADER_MARK as u16) && (self as u16) < (Self::EOF as u16)
    }

    /// Composite nodes and marker tokens: the kinds worth walking.
    pub fn is_named(self) -> bool {
        self.is_node() || self.is_marker()
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkdownLang {}

impl rowan::Language for MarkdownLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ERROR as u16);
        // SAFETY: We check bounds above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for our syntax nodes.
pub type SyntaxNode = rowan::SyntaxNode<MarkdownLang>;
/// Type alias for our syntax tokens.
pub type SyntaxToken = rowan::SyntaxToken<MarkdownLang>;
/// Type alias for syntax elements (node or token).
pub type SyntaxElement = rowan::SyntaxElement<MarkdownLang>;
