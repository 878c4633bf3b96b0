//! Capability contract between the provisioning transaction and the scene host.
//!
//! The orchestrator never touches scene data directly. It reads and writes a
//! fixed vocabulary of named fields through [`StrandHost`], which keeps the
//! transaction independent of how the scene is stored. [`WorldHost`] is the
//! adapter over a Bevy `World`.

mod scene;
mod world;

pub use scene::*;
pub use world::*;

use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical type identifier used when adding a collision modifier.
pub const COLLISION_MODIFIER: &str = "COLLISION";

pub type HostResult<T> = Result<T, HostError>;

/// Failures reported by the host for a single call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("object '{0}' not found")]
    ObjectNotFound(String),

    #[error("object '{object}' has no particle system at index {index}")]
    ParticleSystemNotFound { object: String, index: usize },

    #[error("particle system {index} on '{object}' has no point cache")]
    NoPointCache { object: String, index: usize },

    #[error("particle system {index} on '{object}' has no dynamics block")]
    NoCloth { object: String, index: usize },

    #[error("object '{0}' has no collision settings")]
    NoCollision(String),

    #[error("modifier '{modifier}' not found on '{object}'")]
    ModifierNotFound { object: String, modifier: String },

    #[error("object '{object}' already has a {kind} modifier")]
    DuplicateModifier { object: String, kind: String },

    #[error("vertex group '{group}' not found on '{object}'")]
    VertexGroupNotFound { object: String, group: String },

    #[error("material slot '{slot}' not found on '{object}'")]
    MaterialSlotNotFound { object: String, slot: String },

    #[error("field '{field}' expects a {expected} value")]
    TypeMismatch { field: String, expected: &'static str },

    #[error("value '{value}' is not valid for field '{field}'")]
    InvalidValue { field: String, value: String },
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// Dynamically typed field value exchanged with the host.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Reflect)]
pub enum HostValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    /// Strings and enum identifiers.
    Text(String),
}

impl HostValue {
    pub fn as_bool(&self, field: impl fmt::Debug) -> HostResult<bool> {
        match self {
            Self::Bool(v) => Ok(*v),
            _ => Err(mismatch(field, "bool")),
        }
    }

    pub fn as_int(&self, field: impl fmt::Debug) -> HostResult<i32> {
        match self {
            Self::Int(v) => Ok(*v),
            _ => Err(mismatch(field, "int")),
        }
    }

    /// Ints widen to floats; the host does the same for float properties.
    pub fn as_float(&self, field: impl fmt::Debug) -> HostResult<f32> {
        match self {
            Self::Float(v) => Ok(*v),
            Self::Int(v) => Ok(*v as f32),
            _ => Err(mismatch(field, "float")),
        }
    }

    pub fn as_text(&self, field: impl fmt::Debug) -> HostResult<&str> {
        match self {
            Self::Text(v) => Ok(v),
            _ => Err(mismatch(field, "text")),
        }
    }
}

fn mismatch(field: impl fmt::Debug, expected: &'static str) -> HostError {
    HostError::TypeMismatch {
        field: format!("{field:?}"),
        expected,
    }
}

impl From<bool> for HostValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for HostValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

/// Counts above `i32::MAX` have no host representation.
impl TryFrom<u32> for HostValue {
    type Error = HostError;

    fn try_from(v: u32) -> Result<Self, Self::Error> {
        i32::try_from(v)
            .map(Self::Int)
            .map_err(|_| HostError::InvalidValue {
                field: "count".into(),
                value: v.to_string(),
            })
    }
}

impl From<f32> for HostValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for HostValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for HostValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

// ---------------------------------------------------------------------------
// Field vocabulary
// ---------------------------------------------------------------------------

/// Object interaction mode.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect)]
pub enum InteractionMode {
    #[default]
    Object,
    Edit,
    Sculpt,
    VertexPaint,
    WeightPaint,
    TexturePaint,
    ParticleEdit,
}

/// Fields on an object's collision settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollisionField {
    Absorption,
    Permeability,
    Stickiness,
    UseParticleKill,
    DampingFactor,
    DampingRandom,
    FrictionFactor,
    FrictionRandom,
    Damping,
    ClothFriction,
    UseCulling,
    UseNormal,
    ThicknessInner,
    ThicknessOuter,
}

impl CollisionField {
    /// Fields carried across a collision modifier swap.
    pub const PRESERVED: [Self; 13] = [
        Self::Absorption,
        Self::Permeability,
        Self::Stickiness,
        Self::UseParticleKill,
        Self::DampingFactor,
        Self::DampingRandom,
        Self::FrictionFactor,
        Self::FrictionRandom,
        Self::Damping,
        Self::ClothFriction,
        Self::UseCulling,
        Self::UseNormal,
        Self::ThicknessInner,
    ];
}

/// Fields on a particle system itself (as opposed to its settings block).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SystemField {
    Name,
    VertexGroupDensity,
    VertexGroupLength,
    UseHairDynamics,
}

/// Fields on a particle system's settings block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SettingsField {
    Name,
    /// `EMITTER` or `HAIR`.
    Type,
    UseAdvancedHair,
    Count,
    HairLength,
    HairStep,
    UseEmitRandom,
    UseEvenDistribution,
    UserJit,
    JitterFactor,
    /// `NONE`, `SIMPLE` or `INTERPOLATED`.
    ChildType,
    ChildDisplayCount,
    ChildRenderCount,
    ChildLength,
    ChildLengthThreshold,
    ClumpFactor,
    ClumpShape,
    ChildRadius,
    DisplayStep,
    MaterialSlot,
    UseHairBspline,
    RenderStep,
    Shape,
    RootRadius,
    TipRadius,
    /// `NO` or a kink type identifier.
    Kink,
    KinkAmplitude,
    KinkAmplitudeClump,
    KinkFlat,
    KinkFrequency,
    KinkShape,
    FactorRandom,
}

/// Fields on the dynamics (cloth) block of a hair system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClothField {
    Mass,
    BendingStiffness,
    BendingDamping,
    CollisionDistanceMin,
}

/// Fields on a point cache entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointCacheField {
    Name,
    FrameStart,
    FrameEnd,
    UseDiskCache,
    /// `NO`, `LIGHT` or `HEAVY`.
    Compression,
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// Everything the provisioning transaction needs from the scene host.
///
/// Objects are addressed by name and particle systems by their index on the
/// object. Calls are synchronous; the caller is assumed to have exclusive
/// access to the target object for the duration of a transaction.
pub trait StrandHost {
    /// Whether the project has been saved, giving caches a stable location.
    fn has_save_identity(&self) -> bool;

    fn object_exists(&self, object: &str) -> bool;

    fn vertex_groups(&self, object: &str) -> HostResult<Vec<String>>;

    fn mode(&self, object: &str) -> HostResult<InteractionMode>;

    fn set_mode(&mut self, object: &str, mode: InteractionMode) -> HostResult<()>;

    /// Deselect everything, then select `object` and make it active.
    fn select_exclusive(&mut self, object: &str) -> HostResult<()>;

    fn modifier_names(&self, object: &str) -> HostResult<Vec<String>>;

    /// Name of the modifier carrying the object's collision settings, found by type.
    fn collision_modifier(&self, object: &str) -> HostResult<Option<String>>;

    fn remove_modifier(&mut self, object: &str, name: &str) -> HostResult<()>;

    /// Append a modifier of type `kind` and return the name the host gave it.
    ///
    /// Fails with [`HostError::DuplicateModifier`] for a second collision modifier.
    fn add_modifier(&mut self, object: &str, kind: &str) -> HostResult<String>;

    fn collision_field(&self, object: &str, field: CollisionField) -> HostResult<HostValue>;

    fn set_collision_field(
        &mut self,
        object: &str,
        field: CollisionField,
        value: HostValue,
    ) -> HostResult<()>;

    /// Append a particle system and return its index.
    fn add_particle_system(&mut self, object: &str) -> HostResult<usize>;

    fn set_system_field(
        &mut self,
        object: &str,
        system: usize,
        field: SystemField,
        value: HostValue,
    ) -> HostResult<()>;

    fn set_settings_field(
        &mut self,
        object: &str,
        system: usize,
        field: SettingsField,
        value: HostValue,
    ) -> HostResult<()>;

    /// Fails with [`HostError::NoCloth`] while dynamics is disabled.
    fn set_cloth_field(
        &mut self,
        object: &str,
        system: usize,
        field: ClothField,
        value: HostValue,
    ) -> HostResult<()>;

    /// Cache names across every particle system on `object`.
    fn cache_names(&self, object: &str) -> HostResult<Vec<String>>;

    /// Write a field on the most recently created point cache of `system`.
    fn set_point_cache_field(
        &mut self,
        object: &str,
        system: usize,
        field: PointCacheField,
        value: HostValue,
    ) -> HostResult<()>;

    /// Scene `(frame_start, frame_end)`.
    fn frame_range(&self) -> (i32, i32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_conversions() {
        assert_eq!(HostValue::try_from(3_u32), Ok(HostValue::Int(3)));
        assert_eq!(
            HostValue::try_from(u32::MAX),
            Err(HostError::InvalidValue {
                field: "count".into(),
                value: u32::MAX.to_string(),
            })
        );
        assert_eq!(HostValue::Int(2).as_float(SettingsField::ChildLength), Ok(2.0));
        assert_eq!(
            HostValue::Float(0.5).as_bool(SystemField::UseHairDynamics),
            Err(HostError::TypeMismatch {
                field: "UseHairDynamics".into(),
                expected: "bool",
            })
        );
    }

    #[test]
    fn preserved_collision_fields_exclude_outer_thickness() {
        assert!(!CollisionField::PRESERVED.contains(&CollisionField::ThicknessOuter));
    }
}
