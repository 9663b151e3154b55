//! Artifact path resolution and relative path helpers.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::options::{FontType, Options};

/// A generated output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Css,
    Html,
    Json,
    Font(FontType),
}

impl Artifact {
    pub fn extension(self) -> &'static str {
        match self {
            Artifact::Css => "css",
            Artifact::Html => "html",
            Artifact::Json => "json",
            Artifact::Font(font_type) => font_type.extension(),
        }
    }

    fn explicit_path(self, options: &Options) -> Option<&Path> {
        match self {
            Artifact::Css => options.css_path.as_deref(),
            Artifact::Html => options.html_path.as_deref(),
            Artifact::Json => options.json_path.as_deref(),
            Artifact::Font(_) => None,
        }
    }
}

/// Absolute destination of `artifact`.
///
/// An explicit `<type>_path` option wins; otherwise the file lands at
/// `<output_dir>/<font_name>.<ext>`.
pub fn resolved_path(options: &Options, artifact: Artifact) -> Result<PathBuf> {
    if let Some(explicit) = artifact.explicit_path(options) {
        return absolutize(explicit);
    }

    let dir = options.output_dir.as_deref().unwrap_or(Path::new("."));
    absolutize(&dir.join(format!("{}.{}", options.font_name, artifact.extension())))
}

/// Make `path` absolute against the working directory and fold `.`/`..` lexically.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| Error::io(path, e))?
            .join(path)
    };
    Ok(normalize(&joined))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Path leading from directory `from` to `to`; both must be absolute and normalized.
///
/// Returns an empty path when they are the same location.
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component<'_>> = from.components().collect();
    let to: Vec<Component<'_>> = to.components().collect();

    let shared = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in shared..from.len() {
        rel.push("..");
    }
    for component in &to[shared..] {
        rel.push(component);
    }
    rel
}

/// Render a relative path as a URL directory prefix: forward slashes and a
/// trailing `/`, or an empty string for the current directory.
pub fn url_dir_prefix(rel: &Path) -> String {
    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    with_trailing_slash(joined)
}

pub(crate) fn with_trailing_slash(mut prefix: String) -> String {
    if !prefix.is_empty() && !prefix.ends_with('/') {
        prefix.push('/');
    }
    prefix
}
