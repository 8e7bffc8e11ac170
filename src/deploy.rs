//! The deploy step: publishes the finished output directory to a GitHub
//! repository by committing it to a fresh git history and force-pushing to
//! the configured branch. This module only invokes `git` and surfaces its
//! success or failure; the hosting side is GitHub Pages' problem.

use crate::config::DeployConfig;
use std::fmt;
use std::path::Path;
use std::process::Command;

/// Publishes `output_dir` to the configured GitHub repository. Any git
/// command exiting unsuccessfully aborts the deploy.
pub fn deploy(output_dir: &Path, config: &DeployConfig) -> Result<()> {
    let remote = remote_url(&config.github);
    log::info!("deploying to {} ({})", config.github, config.branch);

    // The output directory is regenerated from scratch each build, so its
    // git history carries no information; a single commit per deploy keeps
    // the hosting repository small.
    git(output_dir, &["init", "--quiet"])?;
    git(output_dir, &["checkout", "-B", &config.branch])?;
    git(output_dir, &["add", "--all"])?;
    git(output_dir, &["commit", "--quiet", "-m", "publish"])?;
    git(
        output_dir,
        &["push", "--force", &remote, &format!("HEAD:{}", config.branch)],
    )?;
    Ok(())
}

fn remote_url(github: &str) -> String {
    format!("git@github.com:{}.git", github)
}

fn git(dir: &Path, args: &[&str]) -> Result<()> {
    let output = Command::new("git").current_dir(dir).args(args).output()?;
    if output.status.success() {
        Ok(())
    } else {
        Err(Error::Git {
            args: args.iter().map(|s| s.to_string()).collect(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// The result of a deploy operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failure publishing the output directory.
#[derive(Debug)]
pub enum Error {
    /// Returned when a git command can't be spawned.
    Io(std::io::Error),

    /// Returned when a git command exits unsuccessfully.
    Git { args: Vec<String>, stderr: String },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "running git: {}", err),
            Error::Git { args, stderr } => {
                write!(f, "git {} failed: {}", args.join(" "), stderr.trim())
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Git { .. } => None,
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. This allows us to
    /// use the `?` operator when spawning git.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
