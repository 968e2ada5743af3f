//! Check command: lint prose files for word usage issues.
//!
//! Files are checked in parallel against one shared [`Linter`]. Each
//! file additionally honours the `allow` lists of config files between
//! its directory and the project root.

use std::collections::HashMap;
use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use rayon::prelude::*;
use tracing::{debug, instrument, warn};

use wordusage_core::config::{self, Config, ConfigSources};
use wordusage_core::filter::{self, SuppressionSet};
use wordusage_core::{Linter, Matcher, RuleTable, SourceFormat};

use super::{read_input_file, read_stdin};
use crate::files::FileFinder;
use crate::report::{self, FileReport, Totals};

/// Label used for standard input in reports.
const STDIN_LABEL: &str = "<stdin>";

/// Arguments for the `check` subcommand.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Files, directories or globs, `!glob` excludes [default: prose files in ., docs/ and doc/]
    pub paths: Vec<String>,

    /// Treat input as plain text instead of markdown
    #[arg(short, long)]
    pub text: bool,

    /// Read from standard input
    #[arg(long, conflicts_with = "paths")]
    pub stdin: bool,

    /// Show suggested replacements for each issue
    #[arg(short, long)]
    pub why: bool,

    /// Allow a rule id or phrase (repeatable)
    #[arg(short, long, value_name = "ID")]
    pub allow: Vec<String>,

    /// Standard input is a pipe or file and no paths were given.
    #[arg(skip)]
    pub piped: bool,
}

impl CheckArgs {
    /// Marks piped standard input for checking when no paths are given.
    pub fn detect_piped_stdin(&mut self) {
        self.piped = self.paths.is_empty() && !self.stdin && !std::io::stdin().is_terminal();
    }
}

/// Check files (or standard input) for word usage issues.
///
/// Fails when an error-severity issue remains, when an input cannot be
/// read, or on any issue at all when `frail` is set.
#[instrument(name = "cmd_check", skip_all, fields(paths = args.paths.len(), stdin = args.stdin))]
pub fn cmd_check(
    args: CheckArgs,
    global_json: bool,
    quiet: bool,
    config: &Config,
    sources: &ConfigSources,
    cwd: &Utf8Path,
) -> anyhow::Result<()> {
    debug!(?args, "executing check command");

    let table = Arc::new(RuleTable::builtin().context("bundled rule table is invalid")?);
    let matcher = Arc::new(Matcher::new(Arc::clone(&table)).context("failed to index rules")?);

    let mut options = config.lint_options();
    let cli_allow: SuppressionSet = args.allow.iter().map(String::as_str).collect();
    options.allow = options.allow.merged(&cli_allow);
    let linter = Linter::new(matcher, options);

    let plain = args.text || config.text;
    let limit = config.input_limit();

    let stdin_input = if args.stdin {
        Some(read_stdin(limit))
    } else if args.piped {
        // Empty piped input (e.g. /dev/null) falls back to file discovery.
        match read_stdin(limit) {
            Ok(content) if content.trim().is_empty() => None,
            other => Some(other),
        }
    } else {
        None
    };

    let reports = if let Some(input) = stdin_input {
        debug!(explicit = args.stdin, "checking standard input");
        vec![check_stdin(&linter, input, plain)]
    } else {
        let files = FileFinder::new(cwd, &config.extensions).find(&args.paths)?;
        if files.is_empty() {
            if global_json {
                println!("{}", report::render_json(&[])?);
            } else if !quiet {
                println!("no files to check");
            }
            return Ok(());
        }

        let root = sources.project_root.as_deref().unwrap_or(cwd);
        let dir_allow = directory_allow_lists(&files, cwd, root, &table)?;

        files
            .par_iter()
            .map(|rel| {
                let allow = rel
                    .parent()
                    .and_then(|dir| dir_allow.get(dir))
                    .filter(|set| !set.is_empty());
                check_file(&linter, cwd, rel, plain, limit, allow)
            })
            .collect::<Vec<_>>()
    };

    if global_json {
        println!("{}", report::render_json(&reports)?);
    } else {
        print!("{}", report::render_text(&reports, args.why, quiet));
    }

    let totals = Totals::of(&reports);
    debug!(?totals, frail = config.frail, "check finished");
    if totals.fails(config.frail) {
        bail!(
            "word usage check failed ({} errors, {} warnings, {} unreadable)",
            totals.errors,
            totals.warnings,
            totals.failed
        );
    }
    Ok(())
}

/// Checks standard input; failures become a failed report.
fn check_stdin(linter: &Linter, input: anyhow::Result<String>, plain: bool) -> FileReport {
    let format = if plain { SourceFormat::Text } else { SourceFormat::Markdown };
    let result = input.and_then(|content| {
        linter
            .check_source(&content, format)
            .context("failed to check standard input")
    });
    match result {
        Ok(diagnostics) => FileReport::checked(STDIN_LABEL.to_string(), diagnostics),
        Err(err) => FileReport::failed(STDIN_LABEL.to_string(), format!("{err:#}")),
    }
}

/// Checks one file; failures become a failed report.
fn check_file(
    linter: &Linter,
    cwd: &Utf8Path,
    rel: &Utf8Path,
    plain: bool,
    limit: Option<usize>,
    dir_allow: Option<&SuppressionSet>,
) -> FileReport {
    let format = if plain {
        SourceFormat::Text
    } else {
        SourceFormat::from_extension(rel.extension())
    };

    let result = read_input_file(&cwd.join(rel), limit).and_then(|content| {
        linter
            .check_source(&content, format)
            .with_context(|| format!("failed to check {rel}"))
    });

    match result {
        Ok(diagnostics) => {
            let diagnostics = match dir_allow {
                Some(allow) => filter::filter(diagnostics, allow),
                None => diagnostics,
            };
            FileReport::checked(rel.to_string(), diagnostics)
        }
        Err(err) => {
            warn!(file = %rel, error = %err, "file not checked");
            FileReport::failed(rel.to_string(), format!("{err:#}"))
        }
    }
}

/// Allow lists per directory, resolved against the rule table.
fn directory_allow_lists(
    files: &[Utf8PathBuf],
    cwd: &Utf8Path,
    root: &Utf8Path,
    table: &RuleTable,
) -> anyhow::Result<HashMap<Utf8PathBuf, SuppressionSet>> {
    let mut lists = HashMap::new();
    for rel in files {
        let Some(dir) = rel.parent() else { continue };
        if lists.contains_key(dir) {
            continue;
        }
        let allow = config::directory_allow(&cwd.join(dir), root)
            .with_context(|| format!("failed to load configuration for {dir}"))?;
        let (allow, unknown) = allow.resolve(table);
        for warning in unknown {
            warn!(%warning, dir = %dir, "ignoring configuration entry");
        }
        lists.insert(dir.to_path_buf(), allow);
    }
    Ok(lists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> (TempDir, Utf8PathBuf) {
        let tmp = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        (tmp, root)
    }

    fn quiet_config() -> Config {
        Config {
            frail: false,
            ..Config::default()
        }
    }

    #[test]
    fn clean_file_passes() {
        let (_tmp, root) = project();
        fs::write(root.join("readme.md"), "Their network looks good.\n").unwrap();
        let args = CheckArgs::default();
        assert!(cmd_check(args, false, false, &Config::default(), &ConfigSources::default(), &root).is_ok());
    }

    #[test]
    fn warning_fails_only_when_frail() {
        let (_tmp, root) = project();
        fs::write(root.join("readme.md"), "His network looks good.\n").unwrap();

        let result = cmd_check(CheckArgs::default(), true, false, &Config::default(), &ConfigSources::default(), &root);
        assert!(result.is_err());

        let result = cmd_check(CheckArgs::default(), true, false, &quiet_config(), &ConfigSources::default(), &root);
        assert!(result.is_ok());
    }

    #[test]
    fn cli_allow_suppresses() {
        let (_tmp, root) = project();
        fs::write(root.join("readme.md"), "His network looks good.\n").unwrap();
        let args = CheckArgs {
            allow: vec!["his".to_string()],
            ..CheckArgs::default()
        };
        assert!(cmd_check(args, true, false, &Config::default(), &ConfigSources::default(), &root).is_ok());
    }

    #[test]
    fn directory_config_adds_allow() {
        let (_tmp, root) = project();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("docs/guide.md"), "His network looks good.\n").unwrap();
        fs::write(root.join("docs/.wordusagerc"), "allow: [his]\n").unwrap();
        assert!(cmd_check(CheckArgs::default(), true, false, &Config::default(), &ConfigSources::default(), &root).is_ok());
    }

    fn builtin_linter() -> Linter {
        Linter::new(
            Arc::new(Matcher::new(Arc::new(RuleTable::builtin().unwrap())).unwrap()),
            Default::default(),
        )
    }

    #[test]
    fn stdin_report_uses_stdin_label() {
        let report = check_stdin(&builtin_linter(), Ok("His network looks good.".to_string()), false);
        assert_eq!(report.file, STDIN_LABEL);
        assert_eq!(report.diagnostics[0].rule_id, "his");
    }

    #[test]
    fn stdin_read_failure_becomes_failed_report() {
        let report = check_stdin(&builtin_linter(), Err(anyhow::anyhow!("input too large")), false);
        assert!(report.error.unwrap().contains("input too large"));
    }

    #[test]
    fn piped_stdin_is_not_detected_with_paths() {
        let mut args = CheckArgs {
            paths: vec!["readme.md".to_string()],
            ..CheckArgs::default()
        };
        args.detect_piped_stdin();
        assert!(!args.piped);
    }

    #[test]
    fn file_reports_use_relative_paths() {
        let (_tmp, root) = project();
        fs::write(root.join("notes.txt"), "Please note the details.").unwrap();
        let linter = Linter::new(
            Arc::new(Matcher::new(Arc::new(RuleTable::builtin().unwrap())).unwrap()),
            Default::default(),
        );
        let report = check_file(&linter, &root, Utf8Path::new("notes.txt"), false, None, None);
        assert_eq!(report.file, "notes.txt");
        assert!(report.error.is_none());
        assert_eq!(report.diagnostics[0].rule_id, "please-note");
    }

    #[test]
    fn oversized_file_is_reported_not_fatal_to_others() {
        let (_tmp, root) = project();
        fs::write(root.join("big.md"), "x".repeat(64)).unwrap();
        let linter = Linter::new(
            Arc::new(Matcher::new(Arc::new(RuleTable::builtin().unwrap())).unwrap()),
            Default::default(),
        );
        let report = check_file(&linter, &root, Utf8Path::new("big.md"), false, Some(8), None);
        assert!(report.error.unwrap().contains("input too large"));
    }
}
