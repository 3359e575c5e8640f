// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with *emphasis*, **strong**, `code` and $x^2$.\n\n- Bullet point\n  - [x] Nested task\n- Another item\n\n> Quoted\n\n![chart](http://x/chart.png \"Chart\")\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n$$\n\\frac{a}{b}\n$$\n\n<div><span>raw</span></div>\n\n{% note %}\n\n";
    base.repeat(size)
}

/// Byte offset of the middle of the `n`th quarter of `content`.
#[allow(dead_code)]
pub fn offset_in_quarter(content: &str, n: usize) -> usize {
    let mut offset = content.len() * (2 * n + 1) / 8;
    while !content.is_char_boundary(offset) {
        offset += 1;
    }
    offset
}
