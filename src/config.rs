//! Defines the [`SiteConfig`] type, which carries everything the pipeline
//! needs to know about the site: its name, base URL, language, favicon, the
//! project directory layout, and the optional deploy target. Loaded once
//! from a `site.yaml` project file and never mutated afterwards.

use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

/// The site configuration, deserialized from `site.yaml`. Directory fields
/// are relative to the project root (the directory containing `site.yaml`);
/// use the accessor methods to get absolute paths.
#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    /// The site's display name, used for the header link and the feed title.
    pub name: String,

    /// A short description of the site, used for meta tags and the feed.
    pub description: String,

    /// The absolute base URL of the published site (e.g.
    /// `https://example.com/`). Feed links and sitemap entries are resolved
    /// against it.
    pub base_url: Url,

    /// BCP-47 language tag for the `<html lang>` attribute and the feed.
    #[serde(default = "default_language")]
    pub language: String,

    /// Site-relative path to the favicon.
    #[serde(default = "default_favicon")]
    pub favicon: String,

    /// Directory containing one subdirectory of markdown sources per
    /// section.
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Directory of static resources copied verbatim into the output's
    /// `static/` directory.
    #[serde(default = "default_resources_dir")]
    pub resources_dir: PathBuf,

    /// Directory the generated site is written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Extra files copied verbatim into the output root (e.g. a donation
    /// page maintained by hand).
    #[serde(default)]
    pub copy_files: Vec<PathBuf>,

    /// Where to publish the finished site. When absent, the deploy step is
    /// skipped.
    #[serde(default)]
    pub deploy: Option<DeployConfig>,

    /// The directory containing `site.yaml`. Not part of the file itself.
    #[serde(skip)]
    pub project_root: PathBuf,
}

/// The deploy target: a GitHub repository receiving the output directory.
#[derive(Debug, Deserialize, Clone)]
pub struct DeployConfig {
    /// `owner/repo` of the GitHub repository to push to.
    pub github: String,

    /// Branch to publish to.
    #[serde(default = "default_branch")]
    pub branch: String,
}

fn default_language() -> String {
    "en".to_owned()
}

fn default_favicon() -> String {
    "/static/images/favicon.png".to_owned()
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

fn default_resources_dir() -> PathBuf {
    PathBuf::from("resources")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_branch() -> String {
    "main".to_owned()
}

impl SiteConfig {
    /// Searches `dir` and its ancestors for a `site.yaml` file and loads the
    /// configuration from the first one found.
    pub fn from_directory(dir: &Path) -> Result<SiteConfig> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            SiteConfig::from_project_file(&path)
        } else {
            match dir.parent() {
                Some(parent) => SiteConfig::from_directory(parent),
                None => Err(Error::ProjectFileNotFound),
            }
        }
    }

    /// Loads the configuration from a specific `site.yaml` path. The file's
    /// parent directory becomes the project root.
    pub fn from_project_file(path: &Path) -> Result<SiteConfig> {
        let file = File::open(path).map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;
        let mut config: SiteConfig = serde_yaml::from_reader(file)?;
        config.project_root = match path.parent() {
            Some(parent) => parent.to_owned(),
            None => Err(Error::ProjectFileNotFound)?,
        };
        Ok(config)
    }

    /// The absolute path of the content directory.
    pub fn content_dir(&self) -> PathBuf {
        self.project_root.join(&self.content_dir)
    }

    /// The absolute path of the static resources directory.
    pub fn resources_dir(&self) -> PathBuf {
        self.project_root.join(&self.resources_dir)
    }

    /// The absolute path of the output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.project_root.join(&self.output_dir)
    }
}

const PROJECT_FILE: &str = "site.yaml";

/// The result of loading a [`SiteConfig`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading the site configuration.
#[derive(Debug)]
pub enum Error {
    /// Returned when no `site.yaml` exists in the given directory or any of
    /// its ancestors.
    ProjectFileNotFound,

    /// Returned for I/O problems opening the project file.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when the project file isn't valid YAML or is missing
    /// required fields.
    DeserializeYaml(serde_yaml::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ProjectFileNotFound => {
                write!(f, "Could not find `{}` in any parent directory", PROJECT_FILE)
            }
            Error::Open { path, err } => {
                write!(f, "Opening project file '{}': {}", path.display(), err)
            }
            Error::DeserializeYaml(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ProjectFileNotFound => None,
            Error::Open { path: _, err } => Some(err),
            Error::DeserializeYaml(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() -> std::result::Result<(), serde_yaml::Error> {
        let config: SiteConfig = serde_yaml::from_str(
            "name: Example\ndescription: An example site\nbase_url: https://example.com/\n",
        )?;
        assert_eq!(config.language, "en");
        assert_eq!(config.content_dir, PathBuf::from("content"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert!(config.copy_files.is_empty());
        assert!(config.deploy.is_none());
        Ok(())
    }

    #[test]
    fn test_deploy_target() -> std::result::Result<(), serde_yaml::Error> {
        let config: SiteConfig = serde_yaml::from_str(
            "name: Example\n\
             description: An example site\n\
             base_url: https://example.com/\n\
             deploy:\n  github: example/site\n",
        )?;
        let deploy = config.deploy.expect("deploy table should be present");
        assert_eq!(deploy.github, "example/site");
        assert_eq!(deploy.branch, "main");
        Ok(())
    }

    #[test]
    fn test_missing_project_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = SiteConfig::from_project_file(&dir.path().join("site.yaml"))
            .expect_err("missing file should fail");
        assert!(matches!(err, Error::Open { .. }));
    }
}
