//! Natural-language syntax tree.
//!
//! The shape follows nlcst: a root holds paragraphs, paragraphs hold
//! sentences, sentences hold words, punctuation, symbols and white space.
//! Words hold text (and sometimes punctuation) children. Every leaf and
//! every word carries its source span.
//!
//! Trees are usually built by [`crate::prose`], but any producer that
//! honours this shape works; the types deserialize from JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diagnostic::Position;

/// Node type.
///
/// Serialized in PascalCase. The `...Node` spellings used by nlcst
/// (`WordNode`, `WhiteSpaceNode`) are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum NodeKind {
    /// Document root.
    #[serde(alias = "RootNode")]
    Root,
    /// A paragraph (or heading, table cell, list item text).
    #[serde(alias = "ParagraphNode")]
    Paragraph,
    /// A sentence.
    #[serde(alias = "SentenceNode")]
    Sentence,
    /// A word, made of `Text` and in-word `Punctuation` children.
    #[serde(alias = "WordNode")]
    Word,
    /// Literal text inside a word.
    #[serde(alias = "TextNode")]
    Text,
    /// Punctuation mark.
    #[serde(alias = "PunctuationNode")]
    Punctuation,
    /// Symbol (`&`, `+`, `/`, ...).
    #[serde(alias = "SymbolNode")]
    Symbol,
    /// Run of white space.
    #[serde(alias = "WhiteSpaceNode")]
    WhiteSpace,
    /// Embedded source (inline code) that is not prose.
    #[serde(alias = "SourceNode")]
    Source,
}

impl NodeKind {
    /// Lowercase display name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Paragraph => "paragraph",
            Self::Sentence => "sentence",
            Self::Word => "word",
            Self::Text => "text",
            Self::Punctuation => "punctuation",
            Self::Symbol => "symbol",
            Self::WhiteSpace => "white-space",
            Self::Source => "source",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source range of a node. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// First character.
    pub start: Position,
    /// One past the last character.
    pub end: Position,
}

impl Span {
    /// Creates a new span.
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// A node of the natural-language tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Node type.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Source range; required on words and leaves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Span>,
    /// Literal value of a leaf.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Child nodes in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// A parent node with children.
    pub const fn parent(kind: NodeKind, position: Option<Span>, children: Vec<Self>) -> Self {
        Self {
            kind,
            position,
            value: None,
            children,
        }
    }

    /// A leaf node with a literal value.
    pub fn leaf(kind: NodeKind, span: Span, value: impl Into<String>) -> Self {
        Self {
            kind,
            position: Some(span),
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    /// An empty document.
    pub const fn empty_root() -> Self {
        Self::parent(NodeKind::Root, None, Vec::new())
    }

    /// Concatenated literal text of this node and its descendants.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(ref value) = self.value {
            out.push_str(value);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }
}
