//! Raw byte inputs shared by properties and structured sources.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use url::Url;

use crate::{ConfigError, ConfigResult, ConfigResultExt};

/// Where the bytes of a source come from.
///
/// Nothing is read until [`ByteSource::read`] is called, so files and URLs
/// reflect their contents at build time.
#[derive(Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ByteSource {
    /// Bytes held in memory.
    Bytes(Arc<[u8]>),
    /// A file on the local filesystem.
    Path(PathBuf),
    /// A `file:`, `http:` or `https:` URL.
    Url(Url),
    /// A string naming either a URL or a filesystem path.
    PathOrUrl(String),
}

/// A [`ByteSource::PathOrUrl`] after resolution.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Location {
    Path(PathBuf),
    Url(Url),
}

impl ByteSource {
    /// In-memory bytes.
    #[must_use]
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(Arc::from(bytes.into()))
    }

    /// Human-readable identity used in errors and logs.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Bytes(bytes) => format!("<{} in-memory bytes>", bytes.len()),
            Self::Path(path) => path.display().to_string(),
            Self::Url(url) => url.to_string(),
            Self::PathOrUrl(location) => location.clone(),
        }
    }

    /// Read the complete contents.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SourceUnreadable`] when the file or URL cannot
    /// be opened or read.
    pub fn read(&self) -> ConfigResult<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Ok(bytes.to_vec()),
            Self::Path(path) => read_path(path),
            Self::Url(url) => read_url(url),
            Self::PathOrUrl(location) => match resolve(location) {
                Location::Path(path) => read_path(&path),
                Location::Url(url) => read_url(&url),
            },
        }
    }
}

impl fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ByteSource").field(&self.describe()).finish()
    }
}

/// Resolve a path-or-URL string.
///
/// The string is a URL only when it parses as an absolute `file`, `http` or
/// `https` URL. Anything else, including drive letters and names such as
/// `dev:app.json`, is a filesystem path.
pub(crate) fn resolve(location: &str) -> Location {
    match Url::parse(location) {
        Ok(url) if matches!(url.scheme(), "file" | "http" | "https") => Location::Url(url),
        _ => Location::Path(PathBuf::from(location)),
    }
}

fn read_path(path: &Path) -> ConfigResult<Vec<u8>> {
    let id = path.display().to_string();
    let utf8 = Utf8Path::from_path(path).ok_or_else(|| {
        ConfigError::unreadable(
            &id,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path is not valid UTF-8"),
        )
        .shared()
    })?;
    // Symlinks may leave the parent directory, so open the resolved target.
    let resolved = utf8.canonicalize_utf8().unreadable(&id)?;
    let (dir, name) = open_parent_dir_and_name(&resolved).unreadable(&id)?;
    tracing::trace!(path = %utf8, resolved = %resolved, "reading configuration file");
    dir.read(name).unreadable(&id)
}

/// Return the parent directory of `path`, falling back to `"."` when the path
/// has no parent or the parent is empty.
fn parent_or_dot(path: &Utf8Path) -> &Utf8Path {
    path.parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."))
}

/// Open the parent directory of `path` via `cap-std` and extract the file name.
fn open_parent_dir_and_name(path: &Utf8Path) -> std::io::Result<(Dir, String)> {
    let parent = parent_or_dot(path);
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::other("cannot determine file name for configuration path")
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name.to_owned()))
}

fn read_url(url: &Url) -> ConfigResult<Vec<u8>> {
    match url.scheme() {
        "file" => {
            let path = url.to_file_path().map_err(|()| {
                ConfigError::unreadable(url.as_str(), "file URL does not name a local path")
                    .shared()
            })?;
            read_path(&path)
        }
        "http" | "https" => fetch(url),
        other => Err(ConfigError::unreadable(
            url.as_str(),
            format!("unsupported URL scheme '{other}'"),
        )
        .shared()),
    }
}

#[cfg(feature = "remote")]
fn fetch(url: &Url) -> ConfigResult<Vec<u8>> {
    let id = url.as_str();
    tracing::debug!(url = id, "fetching remote configuration");
    let response = reqwest::blocking::get(url.clone()).unreadable(id)?;
    let body = response
        .error_for_status()
        .and_then(reqwest::blocking::Response::bytes)
        .unreadable(id)?;
    Ok(body.to_vec())
}

#[cfg(not(feature = "remote"))]
fn fetch(url: &Url) -> ConfigResult<Vec<u8>> {
    Err(ConfigError::unreadable(
        url.as_str(),
        "remote feature disabled: enable the 'remote' feature to fetch HTTP sources",
    )
    .shared())
}
