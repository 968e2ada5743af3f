//! Building natural-language trees from markdown and plain text.
//!
//! Uses pulldown-cmark with source offsets so every word in the tree
//! points back at its exact place in the original file. Code blocks,
//! front matter, raw HTML and image alt text are left out; inline code
//! becomes a `Source` node so that it breaks phrases around it.

use std::ops::Range;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::diagnostic::Position;
use crate::tree::{Node, NodeKind, Span};

/// Words that end with a period without ending the sentence.
const ABBREVIATIONS: &[&str] = &[
    "approx", "co", "corp", "dept", "dr", "eg", "est", "etc", "fig", "ie", "inc", "jr", "ltd",
    "mr", "mrs", "ms", "no", "prof", "sr", "st", "vol", "vs",
];

/// Maps byte offsets to line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    /// Indexes the line starts of `source`.
    pub fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// Position of a byte offset. The offset must be a char boundary.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        let column = self.source[line_start..offset].chars().count() + 1;
        Position::new(line, column, offset)
    }

    /// Span of a byte range.
    pub fn span(&self, range: &Range<usize>) -> Span {
        Span::new(self.position(range.start), self.position(range.end))
    }
}

/// Input flavour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceFormat {
    /// CommonMark with tables, footnotes and front matter.
    #[default]
    Markdown,
    /// Plain text; paragraphs are separated by blank lines.
    Text,
}

impl SourceFormat {
    /// Guesses the format from a file extension. Unknown means markdown.
    pub fn from_extension(ext: Option<&str>) -> Self {
        match ext.map(str::to_ascii_lowercase).as_deref() {
            Some("txt" | "text") => Self::Text,
            _ => Self::Markdown,
        }
    }
}

/// Builds a tree for `source` in the given format.
pub fn parse(source: &str, format: SourceFormat) -> Node {
    match format {
        SourceFormat::Markdown => parse_markdown(source),
        SourceFormat::Text => parse_text(source),
    }
}

/// Markdown extensions enabled for every parse of a document.
pub(crate) fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
}

/// Builds a tree from markdown.
#[tracing::instrument(skip_all, fields(input_len = source.len()))]
pub fn parse_markdown(source: &str) -> Node {
    let index = LineIndex::new(source);
    let mut builder = TreeBuilder::new(source, &index);
    let mut skip_depth: usize = 0;

    for (event, range) in Parser::new_ext(source, markdown_options()).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(_) | Tag::MetadataBlock(_) | Tag::HtmlBlock | Tag::Image { .. }) => {
                builder.flush_text();
                skip_depth += 1;
            }
            Event::End(TagEnd::CodeBlock | TagEnd::MetadataBlock(_) | TagEnd::HtmlBlock | TagEnd::Image) => {
                skip_depth = skip_depth.saturating_sub(1);
            }
            _ if skip_depth > 0 => {}

            Event::Start(
                Tag::Paragraph | Tag::Heading { .. } | Tag::TableCell | Tag::Item | Tag::FootnoteDefinition(_),
            )
            | Event::End(
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::TableCell | TagEnd::Item | TagEnd::FootnoteDefinition,
            ) => builder.end_paragraph(),

            Event::Text(_) => builder.text(range),
            Event::Code(_) | Event::InlineHtml(_) | Event::FootnoteReference(_) => {
                builder.opaque(range);
            }
            Event::SoftBreak | Event::HardBreak => builder.space(range),
            _ => {}
        }
    }

    builder.finish()
}

/// Builds a tree from plain text.
#[tracing::instrument(skip_all, fields(input_len = source.len()))]
pub fn parse_text(source: &str) -> Node {
    let index = LineIndex::new(source);
    let mut builder = TreeBuilder::new(source, &index);
    let mut offset = 0;

    for line in source.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        if line.trim().is_empty() {
            builder.end_paragraph();
        } else {
            builder.text(start..offset);
        }
    }

    builder.finish()
}

/// Lexical category of a piece of paragraph text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece {
    Word,
    Punctuation,
    Symbol,
    Space,
    Source,
}

/// Accumulates pieces per paragraph and turns them into nodes.
struct TreeBuilder<'s, 'i> {
    source: &'s str,
    index: &'i LineIndex<'s>,
    paragraphs: Vec<Node>,
    pieces: Vec<(Piece, Range<usize>)>,
    /// Contiguous text not yet scanned, so words split across events
    /// are scanned whole.
    pending: Option<Range<usize>>,
}

impl<'s, 'i> TreeBuilder<'s, 'i> {
    const fn new(source: &'s str, index: &'i LineIndex<'s>) -> Self {
        Self {
            source,
            index,
            paragraphs: Vec::new(),
            pieces: Vec::new(),
            pending: None,
        }
    }

    fn text(&mut self, range: Range<usize>) {
        match self.pending {
            Some(ref mut pending) if pending.end == range.start => pending.end = range.end,
            _ => {
                self.flush_text();
                self.pending = Some(range);
            }
        }
    }

    fn space(&mut self, range: Range<usize>) {
        self.flush_text();
        self.pieces.push((Piece::Space, range));
    }

    fn opaque(&mut self, range: Range<usize>) {
        self.flush_text();
        self.pieces.push((Piece::Source, range));
    }

    fn flush_text(&mut self) {
        if let Some(range) = self.pending.take() {
            let base = range.start;
            self.pieces.extend(
                scan(&self.source[range])
                    .into_iter()
                    .map(|(piece, r)| (piece, base + r.start..base + r.end)),
            );
        }
    }

    fn end_paragraph(&mut self) {
        self.flush_text();
        if self.pieces.iter().all(|(piece, _)| *piece == Piece::Space) {
            self.pieces.clear();
            return;
        }
        let pieces = std::mem::take(&mut self.pieces);
        let paragraph = self.paragraph(pieces);
        self.paragraphs.push(paragraph);
    }

    fn finish(mut self) -> Node {
        self.end_paragraph();
        let span = (!self.source.is_empty()).then(|| self.index.span(&(0..self.source.len())));
        Node::parent(NodeKind::Root, span, self.paragraphs)
    }

    fn paragraph(&self, pieces: Vec<(Piece, Range<usize>)>) -> Node {
        let first = pieces.first().map_or(0, |(_, r)| r.start);
        let last = pieces.last().map_or(0, |(_, r)| r.end);

        let mut children = Vec::new();
        let mut sentence: Vec<Node> = Vec::new();
        let mut sentence_start = first;
        let mut prev_word: Option<&str> = None;

        let mut iter = pieces.iter().peekable();
        while let Some((piece, range)) = iter.next() {
            if sentence.is_empty() {
                if *piece == Piece::Space {
                    children.push(self.leaf(NodeKind::WhiteSpace, range));
                    continue;
                }
                sentence_start = range.start;
            }

            let text = &self.source[range.clone()];
            sentence.push(self.node(*piece, range));

            let ends_sentence = *piece == Piece::Punctuation
                && matches!(text, "." | "!" | "?")
                && iter.peek().is_none_or(|(next, _)| *next == Piece::Space)
                && !(text == "." && prev_word.is_some_and(is_abbreviation));

            match piece {
                Piece::Word => prev_word = Some(text),
                Piece::Punctuation if text == "." => {}
                _ => prev_word = None,
            }

            if ends_sentence {
                let span = self.index.span(&(sentence_start..range.end));
                children.push(Node::parent(NodeKind::Sentence, Some(span), std::mem::take(&mut sentence)));
                prev_word = None;
            }
        }

        if !sentence.is_empty() {
            let end = pieces.iter().rev().find(|(p, _)| *p != Piece::Space).map_or(last, |(_, r)| r.end);
            let span = self.index.span(&(sentence_start..end));
            children.push(Node::parent(NodeKind::Sentence, Some(span), sentence));
        }

        Node::parent(NodeKind::Paragraph, Some(self.index.span(&(first..last))), children)
    }

    fn node(&self, piece: Piece, range: &Range<usize>) -> Node {
        match piece {
            Piece::Word => Node::parent(
                NodeKind::Word,
                Some(self.index.span(range)),
                vec![self.leaf(NodeKind::Text, range)],
            ),
            Piece::Punctuation => self.leaf(NodeKind::Punctuation, range),
            Piece::Symbol => self.leaf(NodeKind::Symbol, range),
            Piece::Space => self.leaf(NodeKind::WhiteSpace, range),
            Piece::Source => self.leaf(NodeKind::Source, range),
        }
    }

    fn leaf(&self, kind: NodeKind, range: &Range<usize>) -> Node {
        Node::leaf(kind, self.index.span(range), &self.source[range.clone()])
    }
}

/// `true` for a word that, followed by a period, does not end a sentence.
fn is_abbreviation(word: &str) -> bool {
    let lower = word.to_lowercase();
    lower.chars().count() == 1 || ABBREVIATIONS.contains(&lower.as_str())
}

/// Splits text into words, punctuation, symbols and white space runs.
///
/// A word is a run of alphanumerics, joined across `'`, `’` and `-` when
/// an alphanumeric follows on both sides (`don't`, `e-mail`).
fn scan(text: &str) -> Vec<(Piece, Range<usize>)> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let end_of = |i: usize| chars.get(i).map_or(text.len(), |&(offset, _)| offset);

    let mut pieces = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let (start, ch) = chars[i];
        let mut j = i + 1;

        let piece = if ch.is_alphanumeric() {
            while j < chars.len() {
                let c = chars[j].1;
                let joins = matches!(c, '\'' | '’' | '-')
                    && chars.get(j + 1).is_some_and(|&(_, n)| n.is_alphanumeric());
                if c.is_alphanumeric() {
                    j += 1;
                } else if joins {
                    j += 2;
                } else {
                    break;
                }
            }
            Piece::Word
        } else if ch.is_whitespace() {
            while j < chars.len() && chars[j].1.is_whitespace() {
                j += 1;
            }
            Piece::Space
        } else if is_symbol(ch) {
            Piece::Symbol
        } else {
            Piece::Punctuation
        };

        pieces.push((piece, start..end_of(j)));
        i = j;
    }
    pieces
}

const fn is_symbol(ch: char) -> bool {
    matches!(
        ch,
        '#' | '$' | '%' | '&' | '*' | '+' | '/' | '<' | '=' | '>' | '@' | '\\' | '^' | '_' | '`' | '|' | '~'
    )
}
