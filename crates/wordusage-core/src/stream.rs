//! Token stream over a natural-language tree.
//!
//! Flattens the tree into positioned tokens in document order. Words are
//! normalized by lowercasing only; in-word punctuation stays inside the
//! word (`don't` is one token when the tree says it is one word).

use std::borrow::Cow;

use crate::diagnostic::Position;
use crate::error::{LintError, LintResult};
use crate::tree::{Node, NodeKind};

/// Token category, as far as matching cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A word; the only kind patterns match against.
    Word,
    /// Punctuation, symbols and embedded source. Breaks phrase adjacency.
    Punctuation,
    /// White space between words.
    Whitespace,
}

/// A positioned token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// Lowercased text.
    pub text: String,
    /// Text as written; borrowed from the tree when stored contiguously.
    pub raw: Cow<'a, str>,
    /// First character (inclusive).
    pub start: Position,
    /// One past the last character.
    pub end: Position,
    /// Token category.
    pub kind: TokenKind,
    /// Sentence ordinal. Equal ordinals mean the same sentence.
    pub sentence: usize,
    /// Paragraph ordinal. Equal ordinals mean the same paragraph.
    pub paragraph: usize,
}

impl Token<'_> {
    /// Returns `true` for word tokens.
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }
}

/// Lazy, single-pass iterator of tokens over a tree.
///
/// Create a new stream to start over. After the first error the stream
/// is exhausted.
#[derive(Debug)]
pub struct TokenStream<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
    sentence: usize,
    paragraph: usize,
    last: Option<Position>,
    failed: bool,
}

impl<'a> TokenStream<'a> {
    /// Starts a stream at the given tree root.
    pub fn new(root: &'a Node) -> Self {
        Self {
            stack: vec![std::slice::from_ref(root).iter()],
            sentence: 0,
            paragraph: 0,
            last: None,
            failed: false,
        }
    }

    fn token(&mut self, node: &'a Node, kind: TokenKind) -> LintResult<Token<'a>> {
        let Some(span) = node.position else {
            self.failed = true;
            return Err(LintError::MalformedTree {
                kind: node.kind,
                near: self.last,
            });
        };
        self.last = Some(span.end);

        let raw = raw_text(node);
        Ok(Token {
            text: raw.to_lowercase(),
            raw,
            start: span.start,
            end: span.end,
            kind,
            sentence: self.sentence,
            paragraph: self.paragraph,
        })
    }
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = LintResult<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let Some(node) = self.stack.last_mut()?.next() else {
                self.stack.pop();
                continue;
            };

            match node.kind {
                NodeKind::Root => {}
                // A paragraph opens a fresh sentence too, so phrases never
                // span paragraphs even when a producer omits sentence nodes.
                NodeKind::Paragraph => {
                    self.paragraph += 1;
                    self.sentence += 1;
                }
                NodeKind::Sentence => self.sentence += 1,
                NodeKind::Word | NodeKind::Text => return Some(self.token(node, TokenKind::Word)),
                NodeKind::Punctuation | NodeKind::Symbol | NodeKind::Source => {
                    return Some(self.token(node, TokenKind::Punctuation));
                }
                NodeKind::WhiteSpace => return Some(self.token(node, TokenKind::Whitespace)),
            }
            self.stack.push(node.children.iter());
        }
    }
}

/// Original text of a token node, borrowed when it sits in one place.
fn raw_text(node: &Node) -> Cow<'_, str> {
    if let Some(ref value) = node.value {
        return Cow::Borrowed(value.as_str());
    }
    match node.children.as_slice() {
        [only] if only.children.is_empty() => {
            Cow::Borrowed(only.value.as_deref().unwrap_or_default())
        }
        _ => Cow::Owned(node.to_text()),
    }
}

/// Collects a whole tree into a token vector.
///
/// # Errors
///
/// Returns [`LintError::MalformedTree`] if a token node has no position.
#[tracing::instrument(skip_all)]
pub fn tokenize_tree(root: &Node) -> LintResult<Vec<Token<'_>>> {
    let tokens = TokenStream::new(root).collect::<LintResult<Vec<_>>>()?;
    tracing::debug!(tokens = tokens.len(), "flattened tree");
    Ok(tokens)
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Hand-built single-line trees for tests.

    use crate::diagnostic::Position;
    use crate::tree::{Node, NodeKind, Span};

    /// Builds a one-line root → paragraph → sentence tree from pieces.
    ///
    /// Each piece becomes a word when it starts with an alphanumeric,
    /// white space when it is blank, and punctuation otherwise. A piece
    /// equal to `"|"` starts a new sentence and produces no node.
    pub fn line(pieces: &[&str]) -> Node {
        let mut sentences = Vec::new();
        let mut current = Vec::new();
        let mut offset = 0;
        for piece in pieces {
            if *piece == "|" {
                sentences.push(Node::parent(NodeKind::Sentence, None, std::mem::take(&mut current)));
                continue;
            }
            let len = piece.chars().count();
            let span = Span::new(
                Position::new(1, offset + 1, offset),
                Position::new(1, offset + len + 1, offset + len),
            );
            offset += len;
            let kind = if piece.trim().is_empty() {
                NodeKind::WhiteSpace
            } else if piece.starts_with(char::is_alphanumeric) {
                NodeKind::Word
            } else {
                NodeKind::Punctuation
            };
            let node = if kind == NodeKind::Word {
                Node::parent(kind, Some(span), vec![Node::leaf(NodeKind::Text, span, *piece)])
            } else {
                Node::leaf(kind, span, *piece)
            };
            current.push(node);
        }
        sentences.push(Node::parent(NodeKind::Sentence, None, current));
        Node::parent(
            NodeKind::Root,
            None,
            vec![Node::parent(NodeKind::Paragraph, None, sentences)],
        )
    }
}
