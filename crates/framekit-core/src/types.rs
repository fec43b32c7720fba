// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: manifests, frames, and resolved frame paths.

use std::path::PathBuf;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{FramekitError, Result};

/// Key of the frame list inside a manifest document.
pub const FRAMES_KEY: &str = "frames";

/// One manifest entry referencing a single image file.
///
/// `file_path` is the declared path, with or without an extension. An entry
/// without one reads as an empty path, which never names an existing image,
/// and is written back without the key. Every other key of the entry is
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_path: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Frame {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            extra: Map::new(),
        }
    }

    /// Attach a passthrough key (builder style, mostly for tests and tools).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A dataset manifest: an ordered frame list plus opaque top-level metadata.
///
/// Metadata keys keep their insertion order and are written back verbatim.
/// On output the `frames` key always comes last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    metadata: Map<String, Value>,
    frames: Vec<Frame>,
}

impl Manifest {
    pub fn new(metadata: Map<String, Value>, frames: Vec<Frame>) -> Self {
        Self { metadata, frames }
    }

    /// Build a manifest from a parsed JSON document.
    ///
    /// A missing `frames` key is an empty frame list. Anything other than a
    /// JSON object at the top level, or a `frames` value that is not an array
    /// of frames, is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut metadata) = value else {
            return Err(FramekitError::InvalidManifest(
                "top level must be a JSON object".into(),
            ));
        };

        let frames = match metadata.remove(FRAMES_KEY) {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    serde_json::from_value::<Frame>(item).map_err(|err| {
                        FramekitError::InvalidManifest(format!("frame {index}: {err}"))
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(FramekitError::InvalidManifest(format!(
                    "`frames` must be an array, found {}",
                    json_kind(&other)
                )));
            }
        };

        Ok(Self { metadata, frames })
    }

    /// Render the manifest back into a JSON document.
    pub fn to_value(&self) -> Value {
        let mut doc = self.metadata.clone();
        let frames = self
            .frames
            .iter()
            .map(|frame| serde_json::to_value(frame).unwrap_or(Value::Null))
            .collect();
        doc.insert(FRAMES_KEY.to_owned(), Value::Array(frames));
        Value::Object(doc)
    }

    /// A new manifest sharing this one's metadata but holding `frames`.
    pub fn with_frames(&self, frames: Vec<Frame>) -> Self {
        Self {
            metadata: self.metadata.clone(),
            frames,
        }
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut Vec<Frame> {
        &mut self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Split into metadata and frames.
    pub fn into_parts(self) -> (Map<String, Value>, Vec<Frame>) {
        (self.metadata, self.frames)
    }
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.metadata.len() + 1))?;
        for (key, value) in &self.metadata {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry(FRAMES_KEY, &self.frames)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Manifest::from_value(value).map_err(serde::de::Error::custom)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// The concrete location of a frame's image, derived from its declared path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Directory component of the declared path, as written (may be empty).
    pub directory: String,
    /// File name without extension.
    pub name: String,
    /// Extension including the leading dot; the default is filled in when the
    /// declared path has none.
    pub extension: String,
    /// Normalised path of the image on disk.
    pub disk_path: PathBuf,
}

impl ResolvedPath {
    /// File name on disk (`name` + `extension`).
    pub fn file_name(&self) -> String {
        format!("{}{}", self.name, self.extension)
    }

    /// The declared path with its extension dropped, in manifest form.
    pub fn json_stub(&self) -> String {
        if self.directory.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.directory, self.name)
        }
    }
}

/// Which subset a split produces. Both roles share one protocol; the role
/// only picks defaults and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitRole {
    Test,
    Val,
}

impl SplitRole {
    /// Folder the role's images are moved into when none is given.
    pub fn default_folder(&self) -> &'static str {
        match self {
            Self::Test => "./test",
            Self::Val => "./val",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Val => "val",
        }
    }
}

impl std::fmt::Display for SplitRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SplitRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "test" => Ok(Self::Test),
            "val" | "validation" => Ok(Self::Val),
            other => Err(format!("unknown split role '{other}' (expected 'test' or 'val')")),
        }
    }
}

/// What a split does when a selected frame's image is not on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingFilePolicy {
    /// Warn, skip the move, and still rewrite the frame's path.
    #[default]
    Tolerant,
    /// Refuse the whole split before moving anything.
    Strict,
}
