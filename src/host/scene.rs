//! Scene-side data the Bevy host adapter reads and writes.

use std::path::PathBuf;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::*;
use crate::strands::KinkType;

// ---------------------------------------------------------------------------
// Scene data
// ---------------------------------------------------------------------------

/// Interaction mode of a scene object. Missing means [`InteractionMode::Object`].
#[derive(Component, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct ObjectMode(pub InteractionMode);

/// Marker component for selected objects
#[derive(Component, Default)]
pub struct Selected;

/// The object most recently made active by an exclusive selection
#[derive(Resource, Default, Debug)]
pub struct ActiveObject(pub Option<Entity>);

/// Scene playback range used for simulation caches
#[derive(Resource, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Reflect)]
#[reflect(Resource)]
pub struct SceneFrameRange {
    pub start: i32,
    pub end: i32,
}

impl Default for SceneFrameRange {
    fn default() -> Self {
        Self { start: 1, end: 250 }
    }
}

/// Where the current project is saved. Caches need a saved project to live next to.
#[derive(Resource, Default, Clone, Debug)]
pub struct ProjectFile {
    pub path: Option<PathBuf>,
}

/// Physics collision settings carried by a collision modifier.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Reflect)]
pub struct CollisionSettings {
    pub absorption: f32,
    pub permeability: f32,
    pub stickiness: f32,
    pub use_particle_kill: bool,
    pub damping_factor: f32,
    pub damping_random: f32,
    pub friction_factor: f32,
    pub friction_random: f32,
    pub damping: f32,
    pub cloth_friction: f32,
    /// Single sided.
    pub use_culling: bool,
    /// Override normals.
    pub use_normal: bool,
    pub thickness_inner: f32,
    pub thickness_outer: f32,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            absorption: 0.0,
            permeability: 0.1,
            stickiness: 0.1,
            use_particle_kill: false,
            damping_factor: 0.0,
            damping_random: 0.0,
            friction_factor: 0.0,
            friction_random: 0.0,
            damping: 0.1,
            cloth_friction: 5.0,
            use_culling: true,
            use_normal: false,
            thickness_inner: 0.2,
            thickness_outer: 0.02,
        }
    }
}

impl CollisionSettings {
    pub(super) fn get(&self, field: CollisionField) -> HostValue {
        match field {
            CollisionField::Absorption => self.absorption.into(),
            CollisionField::Permeability => self.permeability.into(),
            CollisionField::Stickiness => self.stickiness.into(),
            CollisionField::UseParticleKill => self.use_particle_kill.into(),
            CollisionField::DampingFactor => self.damping_factor.into(),
            CollisionField::DampingRandom => self.damping_random.into(),
            CollisionField::FrictionFactor => self.friction_factor.into(),
            CollisionField::FrictionRandom => self.friction_random.into(),
            CollisionField::Damping => self.damping.into(),
            CollisionField::ClothFriction => self.cloth_friction.into(),
            CollisionField::UseCulling => self.use_culling.into(),
            CollisionField::UseNormal => self.use_normal.into(),
            CollisionField::ThicknessInner => self.thickness_inner.into(),
            CollisionField::ThicknessOuter => self.thickness_outer.into(),
        }
    }

    pub(super) fn set(&mut self, field: CollisionField, value: &HostValue) -> HostResult<()> {
        match field {
            CollisionField::Absorption => self.absorption = value.as_float(field)?,
            CollisionField::Permeability => self.permeability = value.as_float(field)?,
            CollisionField::Stickiness => self.stickiness = value.as_float(field)?,
            CollisionField::UseParticleKill => self.use_particle_kill = value.as_bool(field)?,
            CollisionField::DampingFactor => self.damping_factor = value.as_float(field)?,
            CollisionField::DampingRandom => self.damping_random = value.as_float(field)?,
            CollisionField::FrictionFactor => self.friction_factor = value.as_float(field)?,
            CollisionField::FrictionRandom => self.friction_random = value.as_float(field)?,
            CollisionField::Damping => self.damping = value.as_float(field)?,
            CollisionField::ClothFriction => self.cloth_friction = value.as_float(field)?,
            CollisionField::UseCulling => self.use_culling = value.as_bool(field)?,
            CollisionField::UseNormal => self.use_normal = value.as_bool(field)?,
            CollisionField::ThicknessInner => self.thickness_inner = value.as_float(field)?,
            CollisionField::ThicknessOuter => self.thickness_outer = value.as_float(field)?,
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Reflect)]
pub enum ModifierKind {
    Collision(CollisionSettings),
    /// Any modifier the provisioning code does not inspect, by type name.
    Other(String),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Reflect)]
pub struct Modifier {
    pub name: String,
    pub kind: ModifierKind,
}

impl Modifier {
    pub fn collision(name: impl Into<String>, settings: CollisionSettings) -> Self {
        Self {
            name: name.into(),
            kind: ModifierKind::Collision(settings),
        }
    }
}

/// Ordered modifier stack of an object.
#[derive(Component, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Modifiers(pub Vec<Modifier>);

impl Modifiers {
    pub fn collision(&self) -> Option<&CollisionSettings> {
        self.0.iter().find_map(|m| match &m.kind {
            ModifierKind::Collision(settings) => Some(settings),
            ModifierKind::Other(_) => None,
        })
    }

    pub(super) fn collision_mut(&mut self) -> Option<&mut CollisionSettings> {
        self.0.iter_mut().find_map(|m| match &mut m.kind {
            ModifierKind::Collision(settings) => Some(settings),
            ModifierKind::Other(_) => None,
        })
    }
}

/// Vertex group names defined on an object.
#[derive(Component, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct VertexGroups(pub Vec<String>);

/// Material slot names defined on an object.
#[derive(Component, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MaterialSlots(pub Vec<String>);

// ---------------------------------------------------------------------------
// Particle systems
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum ParticleType {
    #[default]
    Emitter,
    Hair,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum ChildMode {
    #[default]
    None,
    Simple,
    Interpolated,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum CacheCompression {
    #[default]
    No,
    Light,
    Heavy,
}

pub(super) fn parse_id<T: Copy>(
    field: impl std::fmt::Debug,
    value: &HostValue,
    options: &[(&str, T)],
) -> HostResult<T> {
    let id = value.as_text(&field)?;
    options
        .iter()
        .find(|(name, _)| *name == id)
        .map(|(_, v)| *v)
        .ok_or_else(|| HostError::InvalidValue {
            field: format!("{field:?}"),
            value: id.to_string(),
        })
}

fn parse_kink(value: &HostValue) -> HostResult<Option<KinkType>> {
    let id = value.as_text(SettingsField::Kink)?;
    if id == "NO" {
        return Ok(None);
    }
    KinkType::ALL
        .into_iter()
        .find(|k| k.id() == id)
        .map(Some)
        .ok_or_else(|| HostError::InvalidValue {
            field: "Kink".into(),
            value: id.to_string(),
        })
}

/// Settings block of a particle system.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Reflect)]
pub struct ParticleSettings {
    pub name: String,
    pub particle_type: ParticleType,
    pub use_advanced_hair: bool,
    pub count: i32,
    pub hair_length: f32,
    pub hair_step: i32,
    pub use_emit_random: bool,
    pub use_even_distribution: bool,
    pub userjit: i32,
    pub jitter_factor: f32,
    pub child_type: ChildMode,
    pub child_display_count: i32,
    pub child_render_count: i32,
    pub child_length: f32,
    pub child_length_threshold: f32,
    pub clump_factor: f32,
    pub clump_shape: f32,
    pub child_radius: f32,
    pub display_step: i32,
    pub material_slot: Option<String>,
    pub use_hair_bspline: bool,
    pub render_step: i32,
    pub shape: f32,
    pub root_radius: f32,
    pub tip_radius: f32,
    pub kink: Option<KinkType>,
    pub kink_amplitude: f32,
    pub kink_amplitude_clump: f32,
    pub kink_flat: f32,
    pub kink_frequency: f32,
    pub kink_shape: f32,
    pub factor_random: f32,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            name: "ParticleSettings".into(),
            particle_type: ParticleType::Emitter,
            use_advanced_hair: false,
            count: 1000,
            hair_length: 4.0,
            hair_step: 5,
            use_emit_random: true,
            use_even_distribution: true,
            userjit: 0,
            jitter_factor: 1.0,
            child_type: ChildMode::None,
            child_display_count: 10,
            child_render_count: 100,
            child_length: 1.0,
            child_length_threshold: 0.0,
            clump_factor: 0.0,
            clump_shape: 0.0,
            child_radius: 0.2,
            display_step: 3,
            material_slot: None,
            use_hair_bspline: false,
            render_step: 3,
            shape: 0.0,
            root_radius: 1.0,
            tip_radius: 0.0,
            kink: None,
            kink_amplitude: 0.2,
            kink_amplitude_clump: 1.0,
            kink_flat: 0.0,
            kink_frequency: 2.0,
            kink_shape: 0.0,
            factor_random: 0.0,
        }
    }
}

impl ParticleSettings {
    pub(super) fn set(&mut self, field: SettingsField, value: &HostValue) -> HostResult<()> {
        use SettingsField as F;
        match field {
            F::Name => self.name = value.as_text(field)?.to_string(),
            F::Type => {
                self.particle_type = parse_id(
                    field,
                    value,
                    &[("EMITTER", ParticleType::Emitter), ("HAIR", ParticleType::Hair)],
                )?
            }
            F::UseAdvancedHair => self.use_advanced_hair = value.as_bool(field)?,
            F::Count => self.count = value.as_int(field)?,
            F::HairLength => self.hair_length = value.as_float(field)?,
            F::HairStep => self.hair_step = value.as_int(field)?,
            F::UseEmitRandom => self.use_emit_random = value.as_bool(field)?,
            F::UseEvenDistribution => self.use_even_distribution = value.as_bool(field)?,
            F::UserJit => self.userjit = value.as_int(field)?,
            F::JitterFactor => self.jitter_factor = value.as_float(field)?,
            F::ChildType => {
                self.child_type = parse_id(
                    field,
                    value,
                    &[
                        ("NONE", ChildMode::None),
                        ("SIMPLE", ChildMode::Simple),
                        ("INTERPOLATED", ChildMode::Interpolated),
                    ],
                )?
            }
            F::ChildDisplayCount => self.child_display_count = value.as_int(field)?,
            F::ChildRenderCount => self.child_render_count = value.as_int(field)?,
            F::ChildLength => self.child_length = value.as_float(field)?,
            F::ChildLengthThreshold => self.child_length_threshold = value.as_float(field)?,
            F::ClumpFactor => self.clump_factor = value.as_float(field)?,
            F::ClumpShape => self.clump_shape = value.as_float(field)?,
            F::ChildRadius => self.child_radius = value.as_float(field)?,
            F::DisplayStep => self.display_step = value.as_int(field)?,
            F::MaterialSlot => {
                let slot = value.as_text(field)?;
                self.material_slot = (!slot.is_empty()).then(|| slot.to_string());
            }
            F::UseHairBspline => self.use_hair_bspline = value.as_bool(field)?,
            F::RenderStep => self.render_step = value.as_int(field)?,
            F::Shape => self.shape = value.as_float(field)?,
            F::RootRadius => self.root_radius = value.as_float(field)?,
            F::TipRadius => self.tip_radius = value.as_float(field)?,
            F::Kink => self.kink = parse_kink(value)?,
            F::KinkAmplitude => self.kink_amplitude = value.as_float(field)?,
            F::KinkAmplitudeClump => self.kink_amplitude_clump = value.as_float(field)?,
            F::KinkFlat => self.kink_flat = value.as_float(field)?,
            F::KinkFrequency => self.kink_frequency = value.as_float(field)?,
            F::KinkShape => self.kink_shape = value.as_float(field)?,
            F::FactorRandom => self.factor_random = value.as_float(field)?,
        }
        Ok(())
    }
}

/// Hair dynamics block, present once dynamics has been enabled.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Reflect)]
pub struct ClothSettings {
    pub mass: f32,
    pub bending_stiffness: f32,
    pub bending_damping: f32,
    pub distance_min: f32,
}

impl Default for ClothSettings {
    fn default() -> Self {
        Self {
            mass: 0.3,
            bending_stiffness: 0.5,
            bending_damping: 0.5,
            distance_min: 0.015,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Reflect)]
pub struct PointCache {
    pub name: String,
    pub frame_start: i32,
    pub frame_end: i32,
    pub use_disk_cache: bool,
    pub compression: CacheCompression,
}

impl Default for PointCache {
    fn default() -> Self {
        Self {
            name: String::new(),
            frame_start: 1,
            frame_end: 250,
            use_disk_cache: false,
            compression: CacheCompression::No,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Reflect)]
pub struct ParticleSystem {
    pub name: String,
    pub settings: ParticleSettings,
    pub vertex_group_density: Option<String>,
    pub vertex_group_length: Option<String>,
    pub use_hair_dynamics: bool,
    pub cloth: Option<ClothSettings>,
    pub point_caches: Vec<PointCache>,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self {
            name: "ParticleSystem".into(),
            settings: ParticleSettings::default(),
            vertex_group_density: None,
            vertex_group_length: None,
            use_hair_dynamics: false,
            cloth: None,
            point_caches: vec![PointCache::default()],
        }
    }
}

impl ParticleSystem {
    /// Dynamics block while dynamics is enabled.
    pub fn active_cloth(&self) -> Option<&ClothSettings> {
        self.cloth.as_ref().filter(|_| self.use_hair_dynamics)
    }
}

/// Particle systems attached to an object, in creation order.
#[derive(Component, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ParticleSystems(pub Vec<ParticleSystem>);
