use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::strands::{
    catalog, CatalogError, PresetTuning, SizeBucket, StrandParameters, StrandSystemType,
};

/// Errors in a request that make it unusable before the host is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("no target object given")]
    MissingObject,

    #[error("{field} of {value} exceeds the host limit of {}", i32::MAX)]
    CountOutOfRange { field: &'static str, value: u32 },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Everything one provisioning run needs, decoupled from where it came from.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Reflect)]
pub struct ProvisioningRequest {
    pub system_type: StrandSystemType,
    /// Ignored by presets that fix their length.
    pub length: Option<SizeBucket>,
    /// Ignored by presets that fix their thickness.
    pub thickness: Option<SizeBucket>,
    pub tuning: PresetTuning,
    /// Material slot name. Empty means no material.
    pub material: String,
    pub target_object: String,
    pub vertex_group: Option<String>,
}

impl ProvisioningRequest {
    /// A request with medium sizes, catalog defaults and no vertex group.
    pub fn new(system_type: StrandSystemType, target_object: impl Into<String>) -> Self {
        Self {
            system_type,
            length: Some(SizeBucket::M),
            thickness: Some(SizeBucket::M),
            tuning: PresetTuning::default(),
            material: String::new(),
            target_object: target_object.into(),
            vertex_group: None,
        }
    }

    pub fn with_sizes(mut self, length: Option<SizeBucket>, thickness: Option<SizeBucket>) -> Self {
        self.length = length;
        self.thickness = thickness;
        self
    }

    /// An empty name clears the vertex group.
    pub fn with_vertex_group(mut self, group: impl Into<String>) -> Self {
        let group = group.into();
        self.vertex_group = (!group.is_empty()).then_some(group);
        self
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = material.into();
        self
    }

    pub fn with_tuning(mut self, tuning: PresetTuning) -> Self {
        self.tuning = tuning;
        self
    }

    fn vertex_group(&self) -> Option<&str> {
        self.vertex_group.as_deref().filter(|g| !g.is_empty())
    }

    /// Check the request and derive its parameters from the built-in catalog.
    pub fn validate(&self) -> Result<StrandParameters, RequestError> {
        if self.target_object.is_empty() {
            return Err(RequestError::MissingObject);
        }
        let params =
            catalog().derive(self.system_type, self.length, self.thickness, &self.tuning)?;

        for (field, value) in [
            ("parent count", params.parent_count),
            ("child count", params.child_count),
        ] {
            if i32::try_from(value).is_err() {
                return Err(RequestError::CountOutOfRange { field, value });
            }
        }
        Ok(params)
    }

    /// Name given to the new system and its settings block.
    pub fn display_name(&self) -> String {
        match self.vertex_group() {
            Some(group) => format!("{} ({group})", self.system_type.id()),
            None => self.system_type.id().to_string(),
        }
    }

    /// Base name handed to the cache name resolver.
    pub fn cache_seed(&self) -> String {
        match self.vertex_group() {
            Some(group) => format!("{} {group}", self.target_object),
            None => self.target_object.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strands::SizeAxis;

    #[test]
    fn names_follow_vertex_group() {
        let plain = ProvisioningRequest::new(StrandSystemType::ArmHair, "Body");
        assert_eq!(plain.display_name(), "arm_hair");
        assert_eq!(plain.cache_seed(), "Body");

        let scoped = plain.with_vertex_group("Forearm");
        assert_eq!(scoped.display_name(), "arm_hair (Forearm)");
        assert_eq!(scoped.cache_seed(), "Body Forearm");

        let cleared = scoped.with_vertex_group("");
        assert_eq!(cleared.vertex_group, None);
    }

    #[test]
    fn validation_fails_closed() {
        let request = ProvisioningRequest::new(StrandSystemType::Hair, "");
        assert_eq!(request.validate(), Err(RequestError::MissingObject));

        let request = ProvisioningRequest::new(StrandSystemType::Eyebrows, "Head")
            .with_sizes(Some(SizeBucket::S), None);
        assert_eq!(
            request.validate(),
            Err(RequestError::Catalog(CatalogError::MissingSize {
                system: StrandSystemType::Eyebrows,
                axis: SizeAxis::Thickness,
            }))
        );
    }

    #[test]
    fn counts_must_fit_the_host() {
        let request = ProvisioningRequest::new(StrandSystemType::Fur, "Body").with_tuning(
            PresetTuning {
                child_count: Some(u32::MAX),
                ..default()
            },
        );
        assert_eq!(
            request.validate(),
            Err(RequestError::CountOutOfRange {
                field: "child count",
                value: u32::MAX,
            })
        );

        let request = ProvisioningRequest::new(StrandSystemType::Fur, "Body").with_tuning(
            PresetTuning {
                parent_count: Some(i32::MAX as u32),
                ..default()
            },
        );
        assert_eq!(request.validate().unwrap().parent_count, i32::MAX as u32);
    }

    #[test]
    fn body_hair_needs_no_sizes() {
        let request =
            ProvisioningRequest::new(StrandSystemType::Stubble, "Head").with_sizes(None, None);
        let params = request.validate().unwrap();
        assert_eq!(params.system_type, StrandSystemType::Stubble);
    }
}
