//! Markdown parsing and line layout.
//!
//! [`Document::parse`] turns markdown into a flat block list once;
//! [`Document::layout`] materializes styled lines for a terminal width.
//! Heading blocks tag their first rendered row with a [`HeadingMark`] so the
//! anchor map can be stamped from the laid-out lines (see [`crate::anchors`]).
//!
//! Block coverage is intentionally modest: headings, paragraphs with inline
//! emphasis/code/links, bullet and ordered lists, block quotes, fenced and
//! indented code, and rules. The outline never depends on this module; it
//! scans the raw source.

use pulldown_cmark::CodeBlockKind;
use pulldown_cmark::CowStr;
use pulldown_cmark::Event;
use pulldown_cmark::HeadingLevel;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::Tag;
use pulldown_cmark::TagEnd;
use ratatui::style::Style;
use ratatui::text::Span;
use mdtoc_core::theme::Theme;
use std::sync::Arc;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;
use url::Url;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct InlineFlags {
    emphasis: bool,
    strong: bool,
    strike: bool,
    code: bool,
    link: bool,
}

#[derive(Clone, Debug)]
struct Segment {
    text: String,
    flags: InlineFlags,
}

#[derive(Clone, Debug)]
enum Block {
    Heading {
        level: u8,
        segments: Vec<Segment>,
    },
    Prose {
        segments: Vec<Segment>,
        initial_prefix: String,
        subsequent_prefix: String,
    },
    Code {
        language: Option<String>,
        lines: Vec<String>,
    },
    Rule,
    Blank,
}

#[derive(Clone, Debug)]
pub struct DocumentOptions {
    /// Base URL that relative link destinations resolve against when
    /// `show_link_destinations` is on.
    pub base_url: Option<String>,
    /// Append ` (url)` after link text; terminals cannot make links
    /// clickable so the destination is shown inline instead.
    pub show_link_destinations: bool,
    pub code_block_indent: u16,
    pub blockquote_prefix: String,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            show_link_destinations: false,
            code_block_indent: 4,
            blockquote_prefix: "| ".to_string(),
        }
    }
}

/// Marker carried by the first rendered row of a heading block. `text` is the
/// full visible heading text even when the heading wraps across rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadingMark {
    pub level: u8,
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct RenderedLine {
    pub spans: Vec<Span<'static>>,
    pub plain: String,
    pub heading: Option<HeadingMark>,
}

/// A parsed markdown document, independent of width and theme.
#[derive(Clone, Debug)]
pub struct Document {
    source: Arc<str>,
    blocks: Vec<Block>,
    code_block_indent: u16,
}

impl Document {
    pub fn parse(source: Arc<str>, options: &DocumentOptions) -> Self {
        let blocks = parse_blocks(&source, options);
        Self {
            source,
            blocks,
            code_block_indent: options.code_block_indent,
        }
    }

    pub fn source(&self) -> &Arc<str> {
        &self.source
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Renders the document to lines for `width` columns. The result is meant
    /// to be cached by the caller and invalidated on width or source changes.
    pub fn layout(&self, width: u16, theme: &Theme) -> Vec<RenderedLine> {
        if width == 0 {
            return Vec::new();
        }
        let mut out: Vec<RenderedLine> = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Heading { level, segments } => {
                    let text = segments
                        .iter()
                        .map(|s| s.text.as_str())
                        .collect::<String>()
                        .trim()
                        .to_string();
                    let style = heading_style(*level, theme);
                    let pieces: Vec<Piece> = segments
                        .iter()
                        .map(|s| Piece {
                            text: s.text.clone(),
                            style: style.patch(inline_style(s.flags, theme)),
                        })
                        .collect();
                    let start = out.len();
                    wrap_into(&mut out, &pieces, "", "", width);
                    if let Some(first) = out.get_mut(start) {
                        first.heading = Some(HeadingMark {
                            level: *level,
                            text,
                        });
                    }
                }
                Block::Prose {
                    segments,
                    initial_prefix,
                    subsequent_prefix,
                } => {
                    let pieces: Vec<Piece> = segments
                        .iter()
                        .map(|s| Piece {
                            text: s.text.clone(),
                            style: inline_style(s.flags, theme),
                        })
                        .collect();
                    wrap_into(&mut out, &pieces, initial_prefix, subsequent_prefix, width);
                }
                Block::Code { language, lines } => {
                    let indent = " ".repeat(self.code_block_indent as usize);
                    if let Some(lang) = language {
                        let plain = format!("{indent}[{lang}]");
                        out.push(RenderedLine {
                            spans: vec![
                                Span::raw(indent.clone()),
                                Span::styled(format!("[{lang}]"), theme.text_muted),
                            ],
                            plain,
                            heading: None,
                        });
                    }
                    for line in lines {
                        let plain = format!("{indent}{line}");
                        out.push(RenderedLine {
                            spans: vec![
                                Span::raw(indent.clone()),
                                Span::styled(line.clone(), theme.code_inline),
                            ],
                            plain,
                            heading: None,
                        });
                    }
                }
                Block::Rule => {
                    let rule = "─".repeat(width as usize);
                    out.push(RenderedLine {
                        spans: vec![Span::styled(rule.clone(), theme.text_muted)],
                        plain: rule,
                        heading: None,
                    });
                }
                Block::Blank => out.push(RenderedLine {
                    spans: Vec::new(),
                    plain: String::new(),
                    heading: None,
                }),
            }
        }
        out
    }
}

fn heading_style(level: u8, theme: &Theme) -> Style {
    match level {
        1 => theme.heading.patch(theme.accent),
        2 => theme.heading,
        _ => theme.heading.patch(theme.text_muted),
    }
}

fn inline_style(flags: InlineFlags, theme: &Theme) -> Style {
    use ratatui::style::Modifier;

    let mut style = if flags.code {
        theme.code_inline
    } else if flags.link {
        theme.link
    } else {
        Style::default()
    };
    if flags.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if flags.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if flags.strike {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    style
}

#[derive(Clone, Debug)]
struct Piece {
    text: String,
    style: Style,
}

/// Greedy word wrap over styled pieces. Words may span piece boundaries when
/// no whitespace separates them (`**bold**suffix`). A word wider than the
/// available columns is hard-broken.
fn wrap_into(
    out: &mut Vec<RenderedLine>,
    pieces: &[Piece],
    initial_prefix: &str,
    subsequent_prefix: &str,
    width: u16,
) {
    let words = split_words(pieces);

    let mut first = true;
    let mut line: Vec<Piece> = Vec::new();
    let mut line_w = 0usize;

    let avail_for = |first: bool| {
        let prefix = if first { initial_prefix } else { subsequent_prefix };
        (width as usize).saturating_sub(UnicodeWidthStr::width(prefix)).max(1)
    };

    let mut flush = |line: &mut Vec<Piece>, first: &mut bool, out: &mut Vec<RenderedLine>| {
        let prefix = if *first { initial_prefix } else { subsequent_prefix };
        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut plain = String::new();
        if !prefix.is_empty() {
            spans.push(Span::raw(prefix.to_string()));
            plain.push_str(prefix);
        }
        for p in line.drain(..) {
            plain.push_str(&p.text);
            spans.push(Span::styled(p.text, p.style));
        }
        out.push(RenderedLine {
            spans,
            plain,
            heading: None,
        });
        *first = false;
    };

    for word in &words {
        let word_w: usize = word
            .iter()
            .map(|p| UnicodeWidthStr::width(p.text.as_str()))
            .sum();
        let avail = avail_for(first);
        let sep = usize::from(!line.is_empty());

        if line_w + sep + word_w <= avail {
            if sep == 1 {
                line.push(Piece {
                    text: " ".to_string(),
                    style: Style::default(),
                });
            }
            line.extend(word.iter().cloned());
            line_w += sep + word_w;
            continue;
        }

        if !line.is_empty() {
            flush(&mut line, &mut first, out);
            line_w = 0;
        }

        if word_w <= avail_for(first) {
            line.extend(word.iter().cloned());
            line_w = word_w;
            continue;
        }

        // Oversized word: hard-break by character.
        for p in word {
            for ch in p.text.chars() {
                let w = UnicodeWidthChar::width(ch).unwrap_or(0);
                if line_w + w > avail_for(first) && !line.is_empty() {
                    flush(&mut line, &mut first, out);
                    line_w = 0;
                }
                match line.last_mut() {
                    Some(last) if last.style == p.style => last.text.push(ch),
                    _ => line.push(Piece {
                        text: ch.to_string(),
                        style: p.style,
                    }),
                }
                line_w += w;
            }
        }
    }

    if !line.is_empty() || (first && !initial_prefix.is_empty()) {
        flush(&mut line, &mut first, out);
    }
}

fn split_words(pieces: &[Piece]) -> Vec<Vec<Piece>> {
    let mut words: Vec<Vec<Piece>> = Vec::new();
    let mut current: Vec<Piece> = Vec::new();

    for piece in pieces {
        let mut run = String::new();
        for ch in piece.text.chars() {
            if ch.is_whitespace() {
                if !run.is_empty() {
                    current.push(Piece {
                        text: std::mem::take(&mut run),
                        style: piece.style,
                    });
                }
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            } else {
                run.push(ch);
            }
        }
        if !run.is_empty() {
            current.push(Piece {
                text: run,
                style: piece.style,
            });
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

struct Builder<'a> {
    options: &'a DocumentOptions,
    blocks: Vec<Block>,
    inline: InlineFlags,
    segments: Vec<Segment>,
    list_stack: Vec<ListCtx>,
    blockquote_depth: usize,
    in_code_block: bool,
    code_language: Option<String>,
    code_lines: Vec<String>,
    code_current: String,
    link_dest: Option<String>,
    wants_blank: bool,
}

#[derive(Clone, Copy, Debug)]
struct ListCtx {
    ordered: bool,
    index: u64,
}

impl<'a> Builder<'a> {
    fn new(options: &'a DocumentOptions) -> Self {
        Self {
            options,
            blocks: Vec::new(),
            inline: InlineFlags::default(),
            segments: Vec::new(),
            list_stack: Vec::new(),
            blockquote_depth: 0,
            in_code_block: false,
            code_language: None,
            code_lines: Vec::new(),
            code_current: String::new(),
            link_dest: None,
            wants_blank: false,
        }
    }

    fn maybe_blank(&mut self) {
        if self.wants_blank && !matches!(self.blocks.last(), None | Some(Block::Blank)) {
            self.blocks.push(Block::Blank);
        }
        self.wants_blank = false;
    }

    fn quote_prefix(&self) -> String {
        self.options.blockquote_prefix.repeat(self.blockquote_depth)
    }

    fn item_marker(&mut self) -> (String, String) {
        let quote = self.quote_prefix();
        let depth = self.list_stack.len().saturating_sub(1);
        let indent = "  ".repeat(depth);
        let marker = match self.list_stack.last_mut() {
            Some(list) if list.ordered => {
                let m = format!("{}. ", list.index);
                list.index += 1;
                m
            }
            Some(_) => "• ".to_string(),
            None => String::new(),
        };
        let pad = " ".repeat(UnicodeWidthStr::width(marker.as_str()));
        (
            format!("{quote}{indent}{marker}"),
            format!("{quote}{indent}{pad}"),
        )
    }

    fn push_text(&mut self, text: &str) {
        if self.in_code_block {
            for (i, part) in text.split('\n').enumerate() {
                if i > 0 {
                    self.code_lines
                        .push(std::mem::take(&mut self.code_current));
                }
                self.code_current.push_str(part);
            }
            return;
        }
        let flags = self.inline;
        match self.segments.last_mut() {
            Some(last) if last.flags == flags => last.text.push_str(text),
            _ => self.segments.push(Segment {
                text: text.to_string(),
                flags,
            }),
        }
    }

    fn flush_prose(&mut self, initial_prefix: String, subsequent_prefix: String) {
        let segments = std::mem::take(&mut self.segments);
        if segments.iter().all(|s| s.text.trim().is_empty()) {
            return;
        }
        self.maybe_blank();
        self.blocks.push(Block::Prose {
            segments,
            initial_prefix,
            subsequent_prefix,
        });
        self.wants_blank = self.list_stack.is_empty();
    }

    fn flush_heading(&mut self, level: u8) {
        let segments = std::mem::take(&mut self.segments);
        if segments.iter().all(|s| s.text.trim().is_empty()) {
            return;
        }
        self.maybe_blank();
        self.blocks.push(Block::Heading { level, segments });
        self.wants_blank = true;
    }

    fn flush_code(&mut self) {
        if !self.in_code_block {
            return;
        }
        if !self.code_current.is_empty() {
            self.code_lines
                .push(std::mem::take(&mut self.code_current));
        }
        if self.code_lines.last().is_some_and(|l| l.is_empty()) {
            self.code_lines.pop();
        }
        self.maybe_blank();
        self.blocks.push(Block::Code {
            language: self.code_language.take(),
            lines: std::mem::take(&mut self.code_lines),
        });
        self.in_code_block = false;
        self.wants_blank = self.list_stack.is_empty();
    }

    fn resolve_dest(&self, dest: &str) -> String {
        resolve_url(self.options.base_url.as_deref(), dest)
    }
}

fn parse_blocks(input: &str, doc_options: &DocumentOptions) -> Vec<Block> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(input, options);

    let mut b = Builder::new(doc_options);

    for ev in parser {
        match ev {
            Event::Start(tag) => match tag {
                Tag::Paragraph => {}
                Tag::Heading { .. } => {}
                Tag::BlockQuote(_) => {
                    b.blockquote_depth += 1;
                }
                Tag::List(start) => {
                    b.list_stack.push(ListCtx {
                        ordered: start.is_some(),
                        index: start.unwrap_or(1),
                    });
                }
                Tag::Item => {}
                Tag::Emphasis => b.inline.emphasis = true,
                Tag::Strong => b.inline.strong = true,
                Tag::Strikethrough => b.inline.strike = true,
                Tag::Link { dest_url, .. } => {
                    b.inline.link = true;
                    b.link_dest = Some(b.resolve_dest(dest_url.as_ref()));
                }
                Tag::Image { .. } => {}
                Tag::CodeBlock(kind) => {
                    b.in_code_block = true;
                    b.code_lines.clear();
                    b.code_current.clear();
                    b.code_language = match kind {
                        CodeBlockKind::Fenced(lang) => normalize_fenced_lang(&lang),
                        CodeBlockKind::Indented => None,
                    };
                }
                _ => {}
            },
            Event::End(tag) => match tag {
                TagEnd::Paragraph => {
                    let (initial, subsequent) = if b.list_stack.is_empty() {
                        let quote = b.quote_prefix();
                        (quote.clone(), quote)
                    } else {
                        b.item_marker()
                    };
                    b.flush_prose(initial, subsequent);
                }
                TagEnd::Heading(level) => {
                    b.flush_heading(heading_level(level));
                }
                TagEnd::BlockQuote(_) => {
                    b.blockquote_depth = b.blockquote_depth.saturating_sub(1);
                    b.wants_blank = true;
                }
                TagEnd::List(_) => {
                    b.list_stack.pop();
                    if b.list_stack.is_empty() {
                        b.wants_blank = true;
                    }
                }
                TagEnd::Item => {
                    // Tight list items produce no paragraph events.
                    if !b.segments.is_empty() {
                        let (initial, subsequent) = b.item_marker();
                        b.flush_prose(initial, subsequent);
                    }
                }
                TagEnd::Emphasis => b.inline.emphasis = false,
                TagEnd::Strong => b.inline.strong = false,
                TagEnd::Strikethrough => b.inline.strike = false,
                TagEnd::Link => {
                    b.inline.link = false;
                    if let Some(dest) = b.link_dest.take()
                        && b.options.show_link_destinations
                        && !dest.is_empty()
                    {
                        b.push_text(&format!(" ({dest})"));
                    }
                }
                TagEnd::CodeBlock => b.flush_code(),
                _ => {}
            },
            Event::Text(text) => b.push_text(&text),
            Event::Code(code) => {
                let saved = b.inline;
                b.inline.code = true;
                // force a fresh segment for the style boundary
                b.segments.push(Segment {
                    text: code.to_string(),
                    flags: b.inline,
                });
                b.inline = saved;
            }
            Event::SoftBreak | Event::HardBreak => b.push_text(" "),
            Event::Rule => {
                b.maybe_blank();
                b.blocks.push(Block::Rule);
                b.wants_blank = true;
            }
            Event::TaskListMarker(checked) => {
                b.push_text(if checked { "[x] " } else { "[ ] " });
            }
            _ => {}
        }
    }

    // Orphan inline content (e.g. bare HTML context) flushes as plain prose.
    if !b.segments.is_empty() {
        let quote = b.quote_prefix();
        b.flush_prose(quote.clone(), quote);
    }
    while matches!(b.blocks.last(), Some(Block::Blank)) {
        b.blocks.pop();
    }
    b.blocks
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn normalize_fenced_lang(lang: &CowStr<'_>) -> Option<String> {
    let first = lang.trim().split_whitespace().next().unwrap_or("");
    let first = first.split(',').next().unwrap_or("").trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

fn resolve_url(base_url: Option<&str>, dest: &str) -> String {
    let dest = dest.trim();
    if dest.is_empty() || dest.starts_with('#') {
        return dest.to_string();
    }
    if Url::parse(dest).is_ok() {
        return dest.to_string();
    }
    let Some(base) = base_url.map(str::trim).filter(|s| !s.is_empty()) else {
        return dest.to_string();
    };
    match Url::parse(base) {
        Ok(base) => base
            .join(dest)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| dest.to_string()),
        Err(_) => dest.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(md: &str, width: u16) -> Vec<RenderedLine> {
        let doc = Document::parse(Arc::from(md), &DocumentOptions::default());
        doc.layout(width, &Theme::default())
    }

    fn plains(lines: &[RenderedLine]) -> Vec<&str> {
        lines.iter().map(|l| l.plain.as_str()).collect()
    }

    #[test]
    fn headings_carry_marks_on_first_row_only() {
        let lines = layout("# Intro\n\nbody text\n\n## Overview\n", 40);
        let marks: Vec<_> = lines
            .iter()
            .enumerate()
            .filter_map(|(i, l)| l.heading.as_ref().map(|m| (i, m.level, m.text.as_str())))
            .collect();
        assert_eq!(marks, vec![(0, 1, "Intro"), (4, 2, "Overview")]);
    }

    #[test]
    fn wrapped_heading_keeps_full_text_in_mark() {
        let lines = layout("## A Rather Long Heading That Wraps", 12);
        let marked: Vec<_> = lines.iter().filter(|l| l.heading.is_some()).collect();
        assert_eq!(marked.len(), 1);
        assert_eq!(
            marked[0].heading.as_ref().map(|m| m.text.as_str()),
            Some("A Rather Long Heading That Wraps")
        );
        assert!(lines.len() > 1);
    }

    #[test]
    fn paragraphs_word_wrap() {
        let lines = layout("alpha beta gamma delta", 11);
        assert_eq!(plains(&lines), vec!["alpha beta", "gamma delta"]);
    }

    #[test]
    fn lists_render_markers_and_hang_indent() {
        let lines = layout("- first item wraps here\n- second\n", 14);
        let p = plains(&lines);
        assert_eq!(p[0], "• first item");
        assert_eq!(p[1], "  wraps here");
        assert_eq!(p[2], "• second");
    }

    #[test]
    fn ordered_lists_count_up() {
        let lines = layout("1. one\n2. two\n", 20);
        assert_eq!(plains(&lines), vec!["1. one", "2. two"]);
    }

    #[test]
    fn code_blocks_are_indented_verbatim() {
        let lines = layout("```rust\nfn main() {}\n```\n", 40);
        assert_eq!(plains(&lines), vec!["    [rust]", "    fn main() {}"]);
    }

    #[test]
    fn bare_code_blocks_have_no_language_tag() {
        let lines = layout("```\nplain\n```\n", 40);
        assert_eq!(plains(&lines), vec!["    plain"]);
    }

    #[test]
    fn blockquotes_carry_prefix() {
        let lines = layout("> quoted words\n", 40);
        assert_eq!(plains(&lines), vec!["| quoted words"]);
    }

    #[test]
    fn empty_source_lays_out_to_nothing() {
        assert!(layout("", 40).is_empty());
        assert!(layout("\n\n", 40).is_empty());
    }

    #[test]
    fn cjk_heading_text_survives_layout() {
        let lines = layout("## API 接口文档\n", 40);
        assert_eq!(
            lines[0].heading.as_ref().map(|m| m.text.as_str()),
            Some("API 接口文档")
        );
    }

    #[test]
    fn fragment_links_are_left_untouched() {
        assert_eq!(resolve_url(Some("https://e.com/docs/"), "#anchor"), "#anchor");
        assert_eq!(
            resolve_url(Some("https://e.com/docs/"), "guide.md"),
            "https://e.com/docs/guide.md"
        );
        assert_eq!(
            resolve_url(None, "https://other.com/x"),
            "https://other.com/x"
        );
    }
}
