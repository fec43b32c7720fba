// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Path resolution — maps a manifest-declared frame path to the image on disk.
//
// Manifests usually omit the image extension because the canonical format is
// PNG. Cleanup and split both locate files through `PathResolver::resolve`,
// so the two can never disagree about where a frame's image lives.

use std::path::{Component, Path, PathBuf};

use framekit_core::{ResolvedPath, ToolConfig};

/// Resolves declared frame paths, filling in a default extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    /// Extension with its leading dot, e.g. `.png`.
    default_extension: String,
}

impl PathResolver {
    /// Build a resolver. A missing leading dot on `default_extension` is added.
    pub fn new(default_extension: impl Into<String>) -> Self {
        let ext = default_extension.into();
        let default_extension = if ext.starts_with('.') {
            ext
        } else {
            format!(".{ext}")
        };
        Self { default_extension }
    }

    pub fn from_config(config: &ToolConfig) -> Self {
        Self::new(config.default_extension.clone())
    }

    pub fn default_extension(&self) -> &str {
        &self.default_extension
    }

    /// Resolve `declared` relative to `base_folder`.
    ///
    /// The disk path is `normalize(base_folder / directory / name + ext)`.
    /// An explicit extension is kept as written; only a missing one is
    /// replaced by the default.
    pub fn resolve(&self, declared: &str, base_folder: impl AsRef<Path>) -> ResolvedPath {
        let (directory, file_name) = split_declared(declared);
        let (name, ext) = split_extension(file_name);
        let extension = if ext.is_empty() {
            self.default_extension.clone()
        } else {
            ext.to_owned()
        };

        let disk_path = normalize(
            &base_folder
                .as_ref()
                .join(directory)
                .join(format!("{name}{extension}")),
        );

        ResolvedPath {
            directory: directory.to_owned(),
            name: name.to_owned(),
            extension,
            disk_path,
        }
    }

    /// Manifest path for a frame whose image now lives in `destination`.
    ///
    /// The destination is expressed relative to `base_folder` so the path
    /// resolves again under the same base. When the two cannot be compared
    /// lexically (an absolute base with a relative destination, or a base
    /// that starts with `..`) both are anchored at the working directory
    /// first. The extension is left off when it is the default one, and kept
    /// otherwise.
    pub fn relocated_path(
        &self,
        resolved: &ResolvedPath,
        destination: &Path,
        base_folder: &Path,
    ) -> String {
        let leaf = if resolved.extension == self.default_extension {
            resolved.name.clone()
        } else {
            resolved.file_name()
        };

        if let Some(rel) = relative_to(destination, base_folder) {
            return join_relative(&rel, &leaf);
        }
        if !destination.is_absolute() {
            // One side is absolute or the base climbs above its start: compare
            // both from the working directory.
            if let (Ok(dest), Ok(base)) = (
                std::path::absolute(destination),
                std::path::absolute(base_folder),
            ) {
                match relative_to(&dest, &base) {
                    Some(rel) => return join_relative(&rel, &leaf),
                    None => return format!("{}/{leaf}", to_manifest_string(&normalize(&dest))),
                }
            }
        }
        format!("{}/{leaf}", to_manifest_string(&normalize(destination)))
    }
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::from_config(&ToolConfig::default())
    }
}

/// Split a declared path into `(directory, file_name)` at its last `/`.
///
/// Trailing slashes on the directory part are dropped unless the directory
/// is nothing but slashes (the root).
pub fn split_declared(declared: &str) -> (&str, &str) {
    match declared.rfind('/') {
        Some(idx) => {
            let head = &declared[..=idx];
            let trimmed = head.trim_end_matches('/');
            let directory = if trimmed.is_empty() { head } else { trimmed };
            (directory, &declared[idx + 1..])
        }
        None => ("", declared),
    }
}

/// Split a file name into `(name, extension)` at its last dot.
///
/// Leading dots never start an extension, so `.hidden` has none, while
/// `a.b.png` splits into `a.b` and `.png`.
pub fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(dot) if file_name[..dot].chars().any(|c| c != '.') => {
            (&file_name[..dot], &file_name[dot..])
        }
        _ => (file_name, ""),
    }
}

/// Lexically normalise a path without touching the filesystem.
///
/// Drops `.` components and redundant separators and folds `dir/..` pairs.
/// Leading `..` on a relative path is kept; `..` directly under the root is
/// dropped. An empty result becomes `.`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Express `path` relative to `base`, lexically.
///
/// Returns `None` when one path is absolute and the other is not, or when
/// `base` climbs above its starting point with `..` past the shared prefix.
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    let path = normalize(path);
    let base = normalize(base);
    if path.is_absolute() != base.is_absolute() {
        return None;
    }

    let path_parts: Vec<_> = path
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();
    let base_parts: Vec<_> = base
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();

    let common = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let base_rest = &base_parts[common..];
    if base_rest.iter().any(|c| *c == Component::ParentDir) {
        return None;
    }

    let mut rel = PathBuf::new();
    for _ in base_rest {
        rel.push("..");
    }
    for part in &path_parts[common..] {
        rel.push(part.as_os_str());
    }
    Some(rel)
}

/// `./rel/leaf`, or `../rel/leaf` when `rel` leaves the base.
fn join_relative(rel: &Path, leaf: &str) -> String {
    let rel = to_manifest_string(rel);
    if rel.is_empty() {
        format!("./{leaf}")
    } else if rel.starts_with("..") {
        format!("{rel}/{leaf}")
    } else {
        format!("./{rel}/{leaf}")
    }
}

/// Render a path with forward slashes, the separator manifests use.
fn to_manifest_string(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::RootDir => out.push('/'),
            Component::Prefix(prefix) => out.push_str(&prefix.as_os_str().to_string_lossy()),
            other => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    out
}
