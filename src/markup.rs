//! Constrained text-to-markup transform for answer rendering.
//!
//! The backend emits a small Markdown subset: paragraph breaks (blank
//! lines), hard line breaks, `**bold**`, `*italic*`, and `- ` bullet
//! items. The transform parses that subset into a block tree of styled
//! spans; nothing is ever spliced back into raw markup, so untrusted
//! answer text cannot inject formatting or escape sequences.

use once_cell::sync::Lazy;
use regex::Regex;

/// Shown when the backend returns no usable answer text.
pub const NO_ANSWER_FALLBACK: &str = "Sorry, no answer is available right now.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    Bold,
    Italic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::Plain,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::Bold,
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::Italic,
        }
    }
}

pub type Line = Vec<Span>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Lines separated by hard breaks.
    Paragraph(Vec<Line>),
    /// One line per bullet item.
    List(Vec<Line>),
}

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").expect("static regex"));

/// Parse answer text into blocks. Empty or whitespace-only input yields a
/// single fallback paragraph.
pub fn parse(text: &str) -> Vec<Block> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return vec![Block::Paragraph(vec![vec![Span::plain(NO_ANSWER_FALLBACK)]])];
    }

    PARAGRAPH_BREAK
        .split(trimmed)
        .filter(|segment| !segment.trim().is_empty())
        .flat_map(parse_segment)
        .collect()
}

/// A segment (no blank lines inside) can still mix prose and bullets;
/// consecutive bullet lines form a list block, the rest form paragraphs.
fn parse_segment(segment: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut prose: Vec<Line> = Vec::new();
    let mut bullets: Vec<Line> = Vec::new();

    for line in segment.lines() {
        let trimmed = line.trim();
        if let Some(item) = trimmed.strip_prefix("- ") {
            if !prose.is_empty() {
                blocks.push(Block::Paragraph(std::mem::take(&mut prose)));
            }
            bullets.push(parse_inline(item.trim()));
        } else {
            if !bullets.is_empty() {
                blocks.push(Block::List(std::mem::take(&mut bullets)));
            }
            if !trimmed.is_empty() {
                prose.push(parse_inline(trimmed));
            }
        }
    }
    if !prose.is_empty() {
        blocks.push(Block::Paragraph(prose));
    }
    if !bullets.is_empty() {
        blocks.push(Block::List(bullets));
    }
    blocks
}

/// Left-to-right, non-nesting scan for `**bold**` and `*italic*` spans.
/// Unterminated markers stay literal; marked text is taken verbatim.
fn parse_inline(text: &str) -> Line {
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("**") {
            match after.find("**") {
                Some(end) if end > 0 => {
                    flush_plain(&mut spans, &mut plain);
                    spans.push(Span::bold(&after[..end]));
                    rest = &after[end + 2..];
                }
                _ => {
                    plain.push_str("**");
                    rest = after;
                }
            }
            continue;
        }
        if let Some(after) = rest.strip_prefix('*') {
            match after.find('*') {
                Some(end) if end > 0 => {
                    flush_plain(&mut spans, &mut plain);
                    spans.push(Span::italic(&after[..end]));
                    rest = &after[end + 1..];
                }
                _ => {
                    plain.push('*');
                    rest = after;
                }
            }
            continue;
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        plain.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    flush_plain(&mut spans, &mut plain);
    spans
}

fn flush_plain(spans: &mut Vec<Span>, plain: &mut String) {
    if !plain.is_empty() {
        spans.push(Span::plain(std::mem::take(plain)));
    }
}

const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_ITALIC: &str = "\x1b[3m";
const ANSI_RESET: &str = "\x1b[0m";

/// Render blocks for the terminal, styling spans with ANSI attributes.
pub fn render_ansi(blocks: &[Block]) -> String {
    render_with(blocks, |span| match span.style {
        Style::Plain => span.text.clone(),
        Style::Bold => format!("{ANSI_BOLD}{}{ANSI_RESET}", span.text),
        Style::Italic => format!("{ANSI_ITALIC}{}{ANSI_RESET}", span.text),
    })
}

/// Render blocks without styling. Used by tests and log output.
pub fn render_plain(blocks: &[Block]) -> String {
    render_with(blocks, |span| span.text.clone())
}

fn render_with(blocks: &[Block], style_span: impl Fn(&Span) -> String) -> String {
    let mut rendered = Vec::with_capacity(blocks.len());
    for block in blocks {
        match block {
            Block::Paragraph(lines) => {
                let paragraph = lines
                    .iter()
                    .map(|line| render_line(line, &style_span))
                    .collect::<Vec<_>>()
                    .join("\n");
                rendered.push(paragraph);
            }
            Block::List(items) => {
                let list = items
                    .iter()
                    .map(|item| format!("  • {}", render_line(item, &style_span)))
                    .collect::<Vec<_>>()
                    .join("\n");
                rendered.push(list);
            }
        }
    }
    rendered.join("\n\n")
}

fn render_line(line: &Line, style_span: &impl Fn(&Span) -> String) -> String {
    line.iter().map(style_span).collect()
}
