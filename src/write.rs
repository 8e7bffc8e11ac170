//! Output emission: mapping routes to files, serializing markup trees, and
//! copying static resources and verbatim files into the output directory.

use maud::Markup;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Maps a directory-style route onto its output file. `/` becomes
/// `index.html`, `/posts/foo/` becomes `posts/foo/index.html`.
pub fn page_path(output_dir: &Path, route: &str) -> PathBuf {
    let mut path = output_dir.to_owned();
    for component in route.split('/').filter(|c| !c.is_empty()) {
        path.push(component);
    }
    path.join("index.html")
}

/// Serializes one composed page to its route's `index.html`, creating
/// parent directories as needed.
pub fn write_page(output_dir: &Path, route: &str, markup: Markup) -> Result<()> {
    let path = page_path(output_dir, route);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, markup.into_string()).map_err(|err| Error::Write {
        path: path.clone(),
        err,
    })
}

/// Recursively copies the static resources directory into the output's
/// `static/` directory, verbatim.
pub fn copy_resources(src: &Path, dst: &Path) -> Result<()> {
    for result in WalkDir::new(src) {
        let entry = result?;
        // strip_prefix can't fail: every entry is under `src`
        let relative = entry.path().strip_prefix(src).unwrap();
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|err| Error::Copy {
                path: entry.path().to_owned(),
                err,
            })?;
        }
    }
    Ok(())
}

/// Copies a single file into the output directory, keeping its file name.
pub fn copy_file(src: &Path, output_dir: &Path) -> Result<()> {
    let file_name = src.file_name().ok_or_else(|| Error::Copy {
        path: src.to_owned(),
        err: io::Error::new(io::ErrorKind::InvalidInput, "not a file path"),
    })?;
    fs::copy(src, output_dir.join(file_name)).map_err(|err| Error::Copy {
        path: src.to_owned(),
        err,
    })?;
    Ok(())
}

/// Removes an output directory so the build starts from a clean slate. A
/// directory that doesn't exist yet is fine.
pub fn clean_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) => match e.kind() {
            io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}

/// The result of a fallible output operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error emitting output files.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while cleaning output directories.
    Clean { path: PathBuf, err: io::Error },

    /// Returned for I/O problems writing a generated file.
    Write { path: PathBuf, err: io::Error },

    /// Returned for I/O problems copying a static resource.
    Copy { path: PathBuf, err: io::Error },

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),

    /// Returned for other I/O errors.
    Io(io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::Write { path, err } => {
                write!(f, "Writing '{}': {}", path.display(), err)
            }
            Error::Copy { path, err } => {
                write!(f, "Copying '{}': {}", path.display(), err)
            }
            Error::WalkDir(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Clean { path: _, err } => Some(err),
            Error::Write { path: _, err } => Some(err),
            Error::Copy { path: _, err } => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. This allows us to
    /// use the `?` operator while walking the resources directory.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}
