//! Core library for wordusage.
//!
//! Finds insensitive, inconsiderate or needlessly wordy phrases in prose
//! and reports each one with its exact position, a message and suggested
//! replacements. The `wordusage` CLI is a thin layer over this crate.
//!
//! # Pipeline
//!
//! - [`prose`] - markdown / plain text to a natural-language tree
//! - [`stream`] - tree to positioned tokens
//! - [`matcher`] - longest-match search for rule patterns
//! - [`filter`] - allow lists and directive suppression
//! - [`sink`] - ordering and de-duplication
//! - [`lint`] - the pipeline end to end
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use wordusage_core::{LintOptions, Linter, Matcher, RuleTable, SourceFormat};
//!
//! let table = Arc::new(RuleTable::builtin().expect("bundled rules are valid"));
//! let matcher = Arc::new(Matcher::new(table).expect("bundled rules index"));
//! let linter = Linter::new(matcher, LintOptions::default());
//!
//! let found = linter
//!     .check_source("His network looks good.", SourceFormat::Text)
//!     .expect("well-formed input");
//! assert_eq!(found[0].rule_id, "his");
//! assert_eq!(found[0].span_label(), "1:1-1:4");
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod diagnostic;
pub mod directives;
pub mod error;
pub mod filter;
pub mod lint;
pub mod matcher;
pub mod prose;
pub mod rules;
pub mod sink;
pub mod stream;
pub mod tree;

pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use diagnostic::{Diagnostic, Position, Severity};
pub use error::{ConfigError, ConfigResult, LintError, LintResult};
pub use filter::{NoSuppression, SuppressionOracle, SuppressionSet};
pub use lint::{LintOptions, Linter};
pub use matcher::Matcher;
pub use prose::SourceFormat;
pub use rules::{Rule, RuleSpec, RuleTable};
pub use tree::{Node, NodeKind, Span};

/// Default maximum input size: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
