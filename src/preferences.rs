use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::provision::{ProvisioningRequest, RequestError};
use crate::strands::{PresetTuning, SizeBucket, StrandSystemType};

/// Per-preset choices remembered between runs
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PresetPreferences {
    /// Material slot name (empty = no material)
    pub material: String,
    pub length: Option<SizeBucket>,
    pub thickness: Option<SizeBucket>,
    /// Segment override (None = preset default)
    pub segments: Option<u32>,
    pub parent_count: Option<u32>,
    pub child_count: Option<u32>,
    pub hair_dynamics: Option<bool>,
}

impl Default for PresetPreferences {
    fn default() -> Self {
        Self {
            material: String::new(),
            length: Some(SizeBucket::M),
            thickness: Some(SizeBucket::M),
            segments: None,
            parent_count: None,
            child_count: None,
            hair_dynamics: None,
        }
    }
}

impl PresetPreferences {
    fn tuning(&self) -> PresetTuning {
        PresetTuning {
            parent_count: self.parent_count,
            child_count: self.child_count,
            segments: self.segments,
            hair_dynamics: self.hair_dynamics,
        }
    }
}

/// Hair system preferences that persist to disk
#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HairSystemPreferences {
    /// Object that receives the new system
    #[serde(default)]
    pub object_name: String,
    /// Vertex group limiting where strands grow (empty = whole object)
    #[serde(default)]
    pub vertex_group_name: String,
    #[serde(default)]
    pub system_type: StrandSystemType,
    #[serde(default)]
    pub presets: HashMap<StrandSystemType, PresetPreferences>,
}

impl Default for HairSystemPreferences {
    fn default() -> Self {
        Self {
            object_name: String::new(),
            vertex_group_name: String::new(),
            system_type: StrandSystemType::Hair,
            presets: StrandSystemType::ALL
                .into_iter()
                .map(|system| (system, PresetPreferences::default()))
                .collect(),
        }
    }
}

impl HairSystemPreferences {
    /// Get the preferences file path
    fn file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("bevy_hair_system");
            p.push("preferences.ron");
            p
        })
    }

    /// Load preferences from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(content) => ron::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring unreadable hair system preferences {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save preferences to disk
    pub fn save(&self) {
        let Some(path) = Self::file_path() else {
            error!("Could not determine config directory");
            return;
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {}", e);
                return;
            }
        }

        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(content) => {
                if let Err(e) = fs::write(&path, content) {
                    error!("Failed to save hair system preferences: {}", e);
                } else {
                    info!("Hair system preferences saved to: {:?}", path);
                }
            }
            Err(e) => {
                error!("Failed to serialize hair system preferences: {}", e);
            }
        }
    }

    /// Choices for one preset, falling back to defaults when never stored
    pub fn preset(&self, system: StrandSystemType) -> PresetPreferences {
        self.presets.get(&system).cloned().unwrap_or_default()
    }

    /// Build a validated request for the selected system type.
    pub fn to_request(&self) -> Result<ProvisioningRequest, RequestError> {
        let preset = self.preset(self.system_type);
        let request = ProvisioningRequest::new(self.system_type, self.object_name.clone())
            .with_sizes(preset.length, preset.thickness)
            .with_tuning(preset.tuning())
            .with_material(preset.material)
            .with_vertex_group(self.vertex_group_name.clone());
        request.validate()?;
        Ok(request)
    }
}
