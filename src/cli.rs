//! CLI argument parsing module for requp

use crate::error::ConfigError;
use crate::registry::DEFAULT_INDEX_URL;
use crate::update::{PackageSet, UpdatePolicy};
use clap::{ArgAction, Parser};
use reqwest::Url;
use std::path::PathBuf;

/// Exit status with `-z` when nothing was updated
pub const EXIT_NOTHING_UPDATED: u8 = 10;

/// Exit status with `-z` when at least one line was updated
pub const EXIT_UPDATED: u8 = 11;

/// Update pinned package versions in pip requirements files
#[derive(Parser, Debug, Clone)]
#[command(
    name = "requp",
    version,
    about = "Update pinned package versions in pip requirements files"
)]
pub struct CliArgs {
    /// Requirements file to update
    #[arg(short = 'r', long, default_value = "requirements.txt")]
    pub requirement: PathBuf,

    /// Write the updated requirements file here instead of in place
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Ask before each update
    #[arg(long)]
    pub interactive: bool,

    /// Pin unpinned packages to their latest version
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Print the updated files instead of writing them
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Like --dry-run, but print only the lines that changed
    #[arg(long)]
    pub dry_run_changed: bool,

    /// Do not follow -r/-c includes into other requirements files
    #[arg(short = 'n', long)]
    pub no_recursive: bool,

    // Package policies
    /// Packages to leave alone (comma separated, repeatable)
    #[arg(long, value_name = "PKGS", value_delimiter = ',', action = ArgAction::Append)]
    pub skip: Vec<String>,

    /// Leave packages constrained with > or >= alone
    #[arg(long)]
    pub skip_gt: bool,

    /// Update only these packages (comma separated, repeatable)
    #[arg(long, value_name = "PKGS", value_delimiter = ',', action = ArgAction::Append)]
    pub only: Vec<String>,

    /// Stay within the current major version for these packages (* for all)
    #[arg(long, value_name = "PKGS", value_delimiter = ',', action = ArgAction::Append)]
    pub minor: Vec<String>,

    /// Stay within the current major.minor version for these packages (* for all)
    #[arg(long, value_name = "PKGS", value_delimiter = ',', action = ArgAction::Append)]
    pub patch: Vec<String>,

    /// Allow pre-release versions for these packages (* for all)
    #[arg(long, value_name = "PKGS", value_delimiter = ',', action = ArgAction::Append)]
    pub pre: Vec<String>,

    /// Exit with 10 when nothing was updated and 11 when something was
    #[arg(short = 'z', long)]
    pub nonzero_exit_code: bool,

    // Package index
    /// Base URL of the package index (Simple API)
    #[arg(long, value_name = "URL", env = "PIP_INDEX_URL")]
    pub index_url: Option<String>,

    /// Additional package indexes (repeatable)
    #[arg(
        long,
        value_name = "URL",
        env = "PIP_EXTRA_INDEX_URL",
        value_delimiter = ' ',
        action = ArgAction::Append
    )]
    pub extra_index_url: Vec<String>,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl CliArgs {
    /// True for either dry-run flavour
    pub fn is_dry_run(&self) -> bool {
        self.dry_run || self.dry_run_changed
    }

    /// Reject option combinations that make no sense together
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quiet && self.verbose {
            return Err(ConfigError::ConflictingOptions {
                message: "--quiet and --verbose cannot be used together".to_string(),
            });
        }
        if self.interactive && self.json {
            return Err(ConfigError::ConflictingOptions {
                message: "--interactive and --json cannot be used together".to_string(),
            });
        }
        Ok(())
    }

    /// Index URLs to query, in order, each checked for validity
    pub fn index_urls(&self) -> Result<Vec<String>, ConfigError> {
        let primary = self
            .index_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_INDEX_URL);

        std::iter::once(primary)
            .chain(self.extra_index_url.iter().map(String::as_str))
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| {
                Url::parse(url)
                    .map(|_| url.to_string())
                    .map_err(|e| ConfigError::InvalidIndexUrl {
                        url: url.to_string(),
                        message: e.to_string(),
                    })
            })
            .collect()
    }

    /// Build the update policy from the package options
    pub fn build_policy(&self) -> UpdatePolicy {
        UpdatePolicy::new()
            .with_skip(package_set(&self.skip))
            .with_only(package_set(&self.only))
            .with_minor(package_set(&self.minor))
            .with_patch(package_set(&self.patch))
            .with_pre(package_set(&self.pre))
            .with_skip_gt(self.skip_gt)
            .with_force(self.force)
            .with_interactive(self.interactive)
    }
}

fn package_set(names: &[String]) -> PackageSet {
    names.iter().collect()
}
