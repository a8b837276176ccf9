//! Update orchestrator for coordinating the entire update workflow
//!
//! This module provides:
//! - Workflow coordination: read → join → parse → fetch → judge → rewrite → write
//! - Recursion into nested requirement and constraint files, each file once
//! - Per-file caching of index answers
//! - Dry-run mode support
//! - Warnings for packages the index cannot resolve, with partial continuation

use crate::cli::CliArgs;
use crate::domain::{
    ConstraintSummary, CurrentVersion, IncludeKind, ParsedLine, Requirement, UpdateRecord,
    UpdateReport, Version,
};
use crate::error::{AppError, IoError, ManifestError, RegistryError};
use crate::manifest::{
    is_remote_target, logical_lines, pin_requirement_line, read_manifest,
    update_requirement_line, LogicalLine, ManifestWriter,
};
use crate::parser::parse_line;
use crate::progress::Progress;
use crate::registry::{HttpClient, PyPIAdapter, RegistryAdapter};
use crate::update::{Decision, Prompter, TerminalPrompter, UpdateJudge, UpdatePolicy};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tracing::{debug, info};

/// Configuration for one run
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Root requirements file
    pub requirement: PathBuf,
    /// Destination for the root file's content (defaults to the file itself)
    pub output: Option<PathBuf>,
    /// Compute everything but write nothing
    pub dry_run: bool,
    /// Leave `-r`/`-c` includes alone
    pub no_recursive: bool,
    /// Show a spinner while querying the index
    pub show_progress: bool,
}

impl OrchestratorConfig {
    pub fn new(requirement: impl Into<PathBuf>) -> Self {
        Self {
            requirement: requirement.into(),
            output: None,
            dry_run: false,
            no_recursive: false,
            show_progress: false,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_no_recursive(mut self, no_recursive: bool) -> Self {
        self.no_recursive = no_recursive;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}

/// A package that was skipped because the index had nothing usable for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub package: String,
    pub path: PathBuf,
    pub line_number: usize,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Skipping {} ({} line {}): {}",
            self.package,
            self.path.display(),
            self.line_number,
            self.message
        )
    }
}

/// Outcome for one processed requirements file
#[derive(Debug, Clone, Serialize)]
pub struct ManifestOutcome {
    /// File that was read
    pub path: PathBuf,
    /// File that was (or would have been) written
    pub output: PathBuf,
    /// Finished content
    #[serde(skip)]
    pub content: String,
    /// New text of every logical line that changed
    pub changed_lines: Vec<String>,
    /// Whether the file was actually written
    pub written: bool,
}

impl ManifestOutcome {
    pub fn is_modified(&self) -> bool {
        !self.changed_lines.is_empty()
    }
}

/// Result of running the orchestrator
#[derive(Debug, Default)]
pub struct OrchestratorResult {
    /// Update records keyed by package
    pub report: UpdateReport,
    /// Processed files, nested files before the file including them
    pub manifests: Vec<ManifestOutcome>,
    /// Packages skipped because the index could not resolve them
    pub warnings: Vec<Warning>,
    /// The user quit an interactive session
    pub aborted: bool,
    /// Nothing was written
    pub dry_run: bool,
}

/// State shared across every file of one run
#[derive(Default)]
struct RunContext {
    seen: HashSet<PathBuf>,
    report: UpdateReport,
    manifests: Vec<ManifestOutcome>,
    warnings: Vec<Warning>,
    stopped: bool,
}

/// Index answers for one file, keyed by canonical name; `Err` holds the warning text
type VersionCache = HashMap<String, Result<Vec<Version>, String>>;

/// Orchestrator for coordinating the update workflow
pub struct Orchestrator {
    config: OrchestratorConfig,
    judge: UpdateJudge,
    registry: Box<dyn RegistryAdapter>,
    prompter: Box<dyn Prompter>,
    writer: ManifestWriter,
    progress: Progress,
}

impl Orchestrator {
    /// Create an orchestrator using the given index adapter
    pub fn new(
        config: OrchestratorConfig,
        policy: UpdatePolicy,
        registry: Box<dyn RegistryAdapter>,
    ) -> Self {
        let progress = Progress::new(config.show_progress && !policy.interactive);
        let writer = ManifestWriter::new(config.dry_run);
        Self {
            config,
            judge: UpdateJudge::new(policy),
            registry,
            prompter: Box::new(TerminalPrompter),
            writer,
            progress,
        }
    }

    /// Create an orchestrator from CLI arguments, querying the configured indexes
    pub fn from_cli(args: &CliArgs) -> Result<Self, AppError> {
        let mut config = OrchestratorConfig::new(&args.requirement)
            .with_dry_run(args.is_dry_run())
            .with_no_recursive(args.no_recursive)
            .with_progress(!args.quiet && !args.json);
        if let Some(output) = &args.output {
            config = config.with_output(output);
        }

        let client = HttpClient::new()?;
        let registry = PyPIAdapter::with_index_urls(client, args.index_urls()?);
        Ok(Self::new(config, args.build_policy(), Box::new(registry)))
    }

    /// Replace the source of interactive answers
    pub fn with_prompter(mut self, prompter: Box<dyn Prompter>) -> Self {
        self.prompter = prompter;
        self
    }

    /// Run the update workflow
    pub async fn run(&mut self) -> Result<OrchestratorResult, AppError> {
        let root = self.config.requirement.clone();
        let output = self.config.output.clone().unwrap_or_else(|| root.clone());
        let mut ctx = RunContext::default();

        self.update_manifest(&root, &output, &mut ctx).await?;
        self.progress.finish_and_clear();

        Ok(OrchestratorResult {
            report: ctx.report,
            manifests: ctx.manifests,
            warnings: ctx.warnings,
            aborted: ctx.stopped,
            dry_run: self.config.dry_run,
        })
    }

    /// Process one file and, through its includes, every file it pulls in.
    ///
    /// Boxed because includes recurse back into it.
    fn update_manifest<'a>(
        &'a mut self,
        path: &'a Path,
        output: &'a Path,
        ctx: &'a mut RunContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), AppError>> + 'a>> {
        Box::pin(async move {
            let original = read_manifest(path)?;
            ctx.seen.insert(canonical_path(path)?);
            debug!("Processing {}", path.display());

            let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
            let mut cache = VersionCache::new();
            let mut content = String::with_capacity(original.len());
            let mut changed_lines = Vec::new();

            for line in logical_lines(&original) {
                let text = if ctx.stopped {
                    line.original_text.clone()
                } else {
                    self.process_line(path, base_dir, &line, &mut cache, ctx)
                        .await?
                };
                if text != line.original_text {
                    changed_lines.push(text.clone());
                }
                content.push_str(&text);
                content.push_str(line.terminator);
            }

            let result = self.writer.write(path, output, &original, &content)?;
            if result.written {
                info!("Wrote {}", result.path.display());
            }
            ctx.manifests.push(ManifestOutcome {
                path: path.to_path_buf(),
                output: result.path,
                content,
                changed_lines,
                written: result.written,
            });
            Ok(())
        })
    }

    /// Produce the finished text of one logical line
    async fn process_line(
        &mut self,
        path: &Path,
        base_dir: &Path,
        line: &LogicalLine,
        cache: &mut VersionCache,
        ctx: &mut RunContext,
    ) -> Result<String, AppError> {
        match parse_line(&line.joined_text) {
            ParsedLine::Include { kind, target } => {
                self.follow_include(base_dir, kind, &target, ctx).await?;
                Ok(line.original_text.clone())
            }
            ParsedLine::Requirement(requirement) => {
                self.update_requirement(path, line, &requirement, cache, ctx)
                    .await
            }
            ParsedLine::Blank | ParsedLine::Comment | ParsedLine::Other => {
                Ok(line.original_text.clone())
            }
        }
    }

    async fn follow_include(
        &mut self,
        base_dir: &Path,
        kind: IncludeKind,
        target: &str,
        ctx: &mut RunContext,
    ) -> Result<(), AppError> {
        if self.config.no_recursive {
            return Ok(());
        }
        if is_remote_target(target) {
            debug!("Not following remote {:?} include {}", kind, target);
            return Ok(());
        }

        let nested = base_dir.join(target);
        if ctx.seen.contains(&canonical_path(&nested)?) {
            debug!("Already processed {}", nested.display());
            return Ok(());
        }

        self.update_manifest(&nested, &nested, ctx).await
    }

    async fn update_requirement(
        &mut self,
        path: &Path,
        line: &LogicalLine,
        requirement: &Requirement,
        cache: &mut VersionCache,
        ctx: &mut RunContext,
    ) -> Result<String, AppError> {
        let unchanged = line.original_text.clone();
        let summary = ConstraintSummary::from_specifiers(&requirement.specifiers);

        if !self.judge.should_check(requirement, &summary)
            || !self.judge.needs_candidates(requirement, &summary)
        {
            return Ok(unchanged);
        }

        let candidates = match self.candidates(requirement, cache).await? {
            Ok(candidates) => candidates,
            Err(message) => {
                ctx.warnings.push(Warning {
                    package: requirement.name.clone(),
                    path: path.to_path_buf(),
                    line_number: line.line_number,
                    message,
                });
                return Ok(unchanged);
            }
        };

        let latest = self.judge.select(requirement, &summary, candidates).cloned();
        let decision = self
            .judge
            .decide(requirement, &summary, latest.as_ref(), self.prompter.as_mut())
            .map_err(IoError::prompt)?;

        let latest = match (decision, latest) {
            (Decision::Update, Some(latest)) => latest,
            (Decision::Abort, _) => {
                debug!("Stopping at {} line {}", path.display(), line.line_number);
                ctx.stopped = true;
                return Ok(unchanged);
            }
            _ => return Ok(unchanged),
        };

        let rewritten = if summary.has_constraint() {
            update_requirement_line(&line.original_text, &requirement.name, &summary, &latest)
        } else {
            pin_requirement_line(&line.original_text, &requirement.name, &latest)
        };

        let current = CurrentVersion::from(summary.old_version());
        let record = if rewritten != line.original_text {
            UpdateRecord::updated(&requirement.name, current, latest)
        } else {
            UpdateRecord::prohibited(&requirement.name, current, latest, &line.joined_text)
        };
        debug!("{}", record.message);
        ctx.report.push(record);

        Ok(rewritten)
    }

    /// Candidate versions for a requirement, asking the index once per file.
    ///
    /// The inner `Err` carries the warning text for packages the index
    /// cannot resolve; any other index failure aborts the run.
    async fn candidates<'c>(
        &mut self,
        requirement: &Requirement,
        cache: &'c mut VersionCache,
    ) -> Result<Result<&'c [Version], String>, RegistryError> {
        let key = requirement.canonical_name();
        if !cache.contains_key(&key) {
            self.progress
                .spinner(&format!("Checking {}", requirement.name));
            let fetched = self.registry.fetch_versions(&requirement.name).await;
            self.progress.finish_and_clear();

            let entry = match fetched {
                Ok(versions) => Ok(versions),
                Err(e) if e.is_unresolvable() => Err(e.to_string()),
                Err(e) => return Err(e),
            };
            cache.insert(key.clone(), entry);
        }

        Ok(match cache.get(&key) {
            Some(Ok(versions)) => Ok(versions.as_slice()),
            Some(Err(message)) => Err(message.clone()),
            None => Ok(&[]),
        })
    }
}

/// Resolve a requirements file path for cycle detection
fn canonical_path(path: &Path) -> Result<PathBuf, AppError> {
    fs::canonicalize(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ManifestError::not_found(path).into(),
        _ => IoError::generic(path, e).into(),
    })
}
