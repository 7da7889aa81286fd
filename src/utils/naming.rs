//! Public id derivation
//!
//! Remote assets are addressed by a slash-separated public id derived from
//! the local file path. The combination
//!
//! ```text
//! path        = /tmp/css/default.css
//! base_path   = /tmp/
//! prepend     = new
//! ```
//!
//! yields `new/css/default`.

use std::path::{Component, Path, PathBuf};

/// Derive the remote public id for a local file.
///
/// An empty `base_path` resolves to the current working directory, so files
/// outside of it keep their full path (minus the root) as id. When neither
/// can be resolved only the parent directory and file name are kept.
pub fn derive_public_id(path: &str, base_path: &str, prepend_path: &str) -> String {
    let (path, base_path, prepend_path) = (path.trim(), base_path.trim(), prepend_path.trim());

    let full_path = absolutize(path).unwrap_or_else(|| PathBuf::from(path));
    let base = absolutize(base_path);

    let segments: Vec<String> = match base {
        Some(base) => match full_path.strip_prefix(&base) {
            Ok(relative) => normal_segments(relative),
            Err(_) => normal_segments(&full_path),
        },
        None => {
            let all = normal_segments(&full_path);
            let skip = all.len().saturating_sub(2);
            all.into_iter().skip(skip).collect()
        }
    };

    let mut name = strip_extension(&segments.join("/"));

    let prepend = prepend_path.trim_start_matches(['/', std::path::MAIN_SEPARATOR]);
    if !prepend.is_empty() {
        name = format!("{}{}", ensure_trailing_slash(prepend), name);
    }

    name.replace(std::path::MAIN_SEPARATOR, "/")
}

/// Add a missing trailing `/` at the end of a directory name
pub fn ensure_trailing_slash(dirname: &str) -> String {
    if dirname.ends_with('/') {
        dirname.to_string()
    } else {
        format!("{dirname}/")
    }
}

/// True when the path designates a remote http(s) source
pub fn is_http(path: &str) -> bool {
    let lower = path.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Public id used for remote sources: last URL segment, query string dropped
pub fn public_id_from_url(source: &str) -> String {
    let without_query = source.split(['?', '#']).next().unwrap_or_default();
    without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Extension of the file name in `path`, dot included, or empty
pub fn extension_of(path: &str) -> String {
    Path::new(path.trim())
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

fn absolutize(path: &str) -> Option<PathBuf> {
    let resolved = if path.is_empty() {
        std::env::current_dir().ok()?
    } else {
        std::path::absolute(path).ok()?
    };
    Some(resolved.components().collect())
}

fn normal_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect()
}

fn strip_extension(name: &str) -> String {
    let (dir, file) = match name.rfind('/') {
        Some(idx) => (&name[..=idx], &name[idx + 1..]),
        None => ("", name),
    };
    match Path::new(file).file_stem() {
        Some(stem) if Path::new(file).extension().is_some() => {
            format!("{}{}", dir, stem.to_string_lossy())
        }
        _ => name.to_string(),
    }
}
