//! Inline suppression directives.
//!
//! Parses HTML comments in the form:
//! - `<!-- wordusage disable his whitelist -->` suppress rules until re-enabled
//! - `<!-- wordusage enable his -->` re-enable previously suppressed rules
//! - `<!-- wordusage ignore his -->` suppress in the next block only
//!
//! Rule ids may be separated by spaces or commas. A directive without ids
//! applies to every rule. Comments are taken from the markdown event
//! stream, so a directive shown inside a code block is just code.

use std::collections::HashMap;
use std::sync::LazyLock;

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use regex::Regex;

use crate::diagnostic::{Position, SOURCE};
use crate::filter::SuppressionOracle;
use crate::prose::{self, LineIndex};

/// Key standing for "every rule".
const ALL_RULES: &str = "*";

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"<!--\s*{SOURCE}\s+(disable|enable|ignore)\b([^>]*?)\s*-->"
    ))
    .expect("valid regex")
});

/// Rule ids mapped to their suppressed line ranges (1-based, inclusive).
#[derive(Debug, Clone, Default)]
pub struct DirectiveMap {
    suppressed: HashMap<String, Vec<(usize, usize)>>,
}

impl DirectiveMap {
    /// Returns `true` if `rule_id` is suppressed on `line`.
    pub fn is_suppressed_on(&self, rule_id: &str, line: usize) -> bool {
        [rule_id, ALL_RULES].iter().any(|key| {
            self.suppressed
                .get(*key)
                .is_some_and(|ranges| ranges.iter().any(|&(start, end)| (start..=end).contains(&line)))
        })
    }

    /// Returns `true` if no directives were found.
    pub fn is_empty(&self) -> bool {
        self.suppressed.is_empty()
    }

    fn add(&mut self, rule_id: &str, start: usize, end: usize) {
        self.suppressed
            .entry(rule_id.to_string())
            .or_default()
            .push((start, end));
    }
}

impl SuppressionOracle for DirectiveMap {
    fn is_suppressed(&self, rule_id: &str, position: Position) -> bool {
        self.is_suppressed_on(rule_id, position.line)
    }
}

/// Directive state while walking a document.
#[derive(Default)]
struct Collector {
    map: DirectiveMap,
    open: HashMap<String, usize>,
    pending_ignore: Vec<String>,
}

impl Collector {
    /// Applies every directive found in an HTML fragment whose first
    /// line is `first_line`.
    fn html(&mut self, html: &str, first_line: usize) {
        for cap in DIRECTIVE.captures_iter(html) {
            let offset = cap.get(0).map_or(0, |m| m.start());
            let line = first_line + html[..offset].matches('\n').count();
            let mut ids: Vec<String> = cap[2]
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if ids.is_empty() {
                ids.push(ALL_RULES.to_string());
            }

            match &cap[1] {
                "disable" => {
                    for id in ids {
                        self.open.entry(id).or_insert(line);
                    }
                }
                "enable" => {
                    let closing: Vec<String> = if ids.iter().any(|id| id == ALL_RULES) {
                        self.open.keys().cloned().collect()
                    } else {
                        ids
                    };
                    for id in closing {
                        if let Some(start) = self.open.remove(&id) {
                            self.map.add(&id, start, line);
                        }
                    }
                }
                "ignore" => self.pending_ignore.extend(ids),
                _ => {}
            }
        }
    }

    /// A block starts on `start..=end`; pending ignores cover it.
    fn block(&mut self, start: usize, end: usize) {
        for id in std::mem::take(&mut self.pending_ignore) {
            self.map.add(&id, start, end);
        }
    }

    fn finish(mut self) -> DirectiveMap {
        // Unclosed disable runs to the end of the file.
        for (id, start) in self.open {
            self.map.add(&id, start, usize::MAX);
        }
        self.map
    }
}

/// Parses suppression directives from markdown.
#[tracing::instrument(skip_all, fields(input_len = input.len()))]
pub fn parse_directives(input: &str) -> DirectiveMap {
    let index = LineIndex::new(input);
    let mut collector = Collector::default();
    // HTML block lines, joined, with the block's first line.
    let mut html_block: Option<(String, usize)> = None;

    for (event, range) in Parser::new_ext(input, prose::markdown_options()).into_offset_iter() {
        let line = index.position(range.start).line;
        match event {
            Event::Start(Tag::HtmlBlock) => html_block = Some((String::new(), line)),
            Event::End(TagEnd::HtmlBlock) => {
                if let Some((html, first_line)) = html_block.take() {
                    collector.html(&html, first_line);
                }
            }
            Event::Html(html) => match html_block {
                Some((ref mut buf, _)) => buf.push_str(&html),
                None => collector.html(&html, line),
            },
            Event::InlineHtml(html) => collector.html(&html, line),
            Event::Start(
                Tag::Paragraph
                | Tag::Heading { .. }
                | Tag::BlockQuote(_)
                | Tag::CodeBlock(_)
                | Tag::List(_)
                | Tag::Item
                | Tag::Table(_)
                | Tag::FootnoteDefinition(_),
            ) => {
                let end = line + input[range].trim_end().matches('\n').count();
                collector.block(line, end);
            }
            _ => {}
        }
    }

    let map = collector.finish();
    tracing::debug!(rules = map.suppressed.len(), "parsed directives");
    map
}
