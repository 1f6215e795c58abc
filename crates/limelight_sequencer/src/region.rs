// SPDX-License-Identifier: MIT OR Apache-2.0
//! Region definitions for highlight playback.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionId(pub Uuid);

impl RegionId {
    /// Create a new random region ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RegionId {
    fn default() -> Self {
        Self::new()
    }
}

/// The four edge offsets of a highlight hole, in percent of the container box.
///
/// `top` is the distance from the container's top edge, `right` from the
/// right edge, and so on. Values are nominally 0-100 but are never clamped
/// or validated; inverted input (e.g. `left + right >= 100`) produces a
/// degenerate hole and is the caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offsets {
    /// Distance from the top edge (percent)
    pub top: f32,
    /// Distance from the right edge (percent)
    pub right: f32,
    /// Distance from the bottom edge (percent)
    pub bottom: f32,
    /// Distance from the left edge (percent)
    pub left: f32,
}

impl Offsets {
    /// Create offsets from the four edge distances
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// One step in a highlight script: a hole configuration plus a hold duration.
///
/// Regions are immutable once enqueued; the sequencer only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Unique region ID; generated when a hand-written script omits it
    #[serde(default)]
    pub id: RegionId,
    /// Edge offsets applied while this region is active
    pub offsets: Offsets,
    /// Hold duration in milliseconds before advancing
    pub duration_ms: u64,
}

impl Region {
    /// Create a new region
    pub fn new(offsets: Offsets, duration_ms: u64) -> Self {
        Self {
            id: RegionId::new(),
            offsets,
            duration_ms,
        }
    }

    /// Hold duration as a [`Duration`]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Errors from loading or saving a region script
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Script file could not be read or written
    #[error("script IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Script could not be serialized
    #[error("script serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// Script could not be parsed
    #[error("script parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// A named, ordered playback script of regions.
///
/// Order is significant: regions are applied strictly front to back. The
/// list may be empty, in which case playback never starts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionScript {
    /// Script name
    pub name: String,
    /// Regions in playback order
    pub regions: Vec<Region>,
}

impl RegionScript {
    /// Create an empty script
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            regions: Vec::new(),
        }
    }

    /// Append a region, returning its ID
    pub fn push(&mut self, region: Region) -> RegionId {
        let id = region.id;
        self.regions.push(region);
        id
    }

    /// Number of regions in the script
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the script has no regions
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Total hold time of the script in milliseconds
    pub fn total_duration_ms(&self) -> u64 {
        self.regions.iter().map(|r| r.duration_ms).sum()
    }

    /// Serialize to RON format
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from RON format
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    /// Save the script to a file
    pub fn save(&self, path: &Path) -> Result<(), ScriptError> {
        let ron_str = self.to_ron()?;
        std::fs::write(path, ron_str)?;
        Ok(())
    }

    /// Load a script from a file
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::from_ron(&contents)?)
    }
}
