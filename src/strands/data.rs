//! Value types for strand presets.
//!
//! Everything here is plain data: the catalog in `presets` produces
//! [`StrandParameters`] from a [`StrandSystemType`] and a pair of
//! [`SizeBucket`]s, and the provisioning code only ever reads them.

use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// System type
// ---------------------------------------------------------------------------

/// The kind of strand system to create. Each member owns exactly one catalog entry.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect)]
pub enum StrandSystemType {
    #[default]
    Hair,
    Fur,
    Eyelashes,
    Eyebrows,
    ArmHair,
    BackHair,
    ChestHair,
    LegHair,
    Stubble,
}

impl StrandSystemType {
    pub const ALL: [Self; 9] = [
        Self::Hair,
        Self::Fur,
        Self::Eyelashes,
        Self::Eyebrows,
        Self::ArmHair,
        Self::BackHair,
        Self::ChestHair,
        Self::LegHair,
        Self::Stubble,
    ];

    /// Stable identifier, also used as the particle system name.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Hair => "hair",
            Self::Fur => "fur",
            Self::Eyelashes => "eyelashes",
            Self::Eyebrows => "eyebrows",
            Self::ArmHair => "arm_hair",
            Self::BackHair => "back_hair",
            Self::ChestHair => "chest_hair",
            Self::LegHair => "leg_hair",
            Self::Stubble => "stubble",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hair => "Hair",
            Self::Fur => "Fur",
            Self::Eyelashes => "Eyelashes",
            Self::Eyebrows => "Eyebrows",
            Self::ArmHair => "Male Arm Hair",
            Self::BackHair => "Male Back Hair",
            Self::ChestHair => "Male Chest Hair",
            Self::LegHair => "Male Leg Hair",
            Self::Stubble => "Male Stubble",
        }
    }

    /// Whether length and thickness are picked from size buckets.
    ///
    /// The body-hair presets fix both and vary their kink instead.
    pub fn is_sizable(&self) -> bool {
        matches!(
            self,
            Self::Hair | Self::Fur | Self::Eyelashes | Self::Eyebrows
        )
    }
}

impl fmt::Display for StrandSystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for StrandSystemType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.id() == s)
            .ok_or_else(|| CatalogError::UnknownSystemType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Size buckets
// ---------------------------------------------------------------------------

/// Ordered size selection, used independently for length and thickness.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Reflect,
)]
pub enum SizeBucket {
    XS,
    S,
    #[default]
    M,
    L,
    XL,
}

impl SizeBucket {
    pub const ALL: [Self; 5] = [Self::XS, Self::S, Self::M, Self::L, Self::XL];

    /// Position in [`SizeBucket::ALL`], used to index the size tables.
    pub fn index(&self) -> usize {
        match self {
            Self::XS => 0,
            Self::S => 1,
            Self::M => 2,
            Self::L => 3,
            Self::XL => 4,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::XS => "xs",
            Self::S => "s",
            Self::M => "m",
            Self::L => "l",
            Self::XL => "xl",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::XS => "XS",
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::XL => "XL",
        }
    }
}

impl fmt::Display for SizeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SizeBucket {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::UnknownBucket(s.to_string()))
    }
}

/// Which size table a bucket is looked up in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SizeAxis {
    Length,
    Thickness,
}

impl fmt::Display for SizeAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length => f.write_str("length"),
            Self::Thickness => f.write_str("thickness"),
        }
    }
}

// ---------------------------------------------------------------------------
// Derived parameters
// ---------------------------------------------------------------------------

/// How child strands are distributed around their parents.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum ChildType {
    #[default]
    Simple,
    Interpolated,
}

impl ChildType {
    /// Host enum identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Simple => "SIMPLE",
            Self::Interpolated => "INTERPOLATED",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum KinkType {
    #[default]
    Curl,
    Radial,
    Wave,
    Braid,
    Spiral,
}

impl KinkType {
    pub const ALL: [Self; 5] = [
        Self::Curl,
        Self::Radial,
        Self::Wave,
        Self::Braid,
        Self::Spiral,
    ];

    /// Host enum identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Curl => "CURL",
            Self::Radial => "RADIAL",
            Self::Wave => "WAVE",
            Self::Braid => "BRAID",
            Self::Spiral => "SPIRAL",
        }
    }
}

/// Procedural curl applied along the strand. Only body-hair presets carry one.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Reflect)]
pub struct KinkSettings {
    pub kind: KinkType,
    pub amplitude: f32,
    pub clump: f32,
    pub flatness: f32,
    pub frequency: f32,
    pub shape: f32,
}

/// Complete parameter record for one strand system.
///
/// Recomputed from the catalog for every request; never patched in place.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Reflect)]
pub struct StrandParameters {
    pub system_type: StrandSystemType,
    /// Emission -> Number.
    pub parent_count: u32,
    /// Children display and render amount (always equal).
    pub child_count: u32,
    /// Emission segments; display and render steps follow it.
    pub segments: u32,
    /// Strand taper curvature. Negative is a concave, hair-like taper.
    pub taper_shape: f32,
    /// Emission hair length.
    pub hair_length: f32,
    /// Children length. With a zero length threshold this is the rendered length.
    pub child_length: f32,
    /// Root radius.
    pub thickness: f32,
    pub tip_thickness: f32,
    pub clump_factor: f32,
    pub clump_shape: f32,
    pub child_type: ChildType,
    /// Only read by the host when `child_type` is [`ChildType::Simple`].
    pub child_radius: f32,
    pub use_emit_random: bool,
    pub use_even_distribution: bool,
    /// Particles per face.
    pub jitter_per_face: u32,
    pub jitter_factor: f32,
    /// Whether strand length follows the painted weight of the requested vertex group.
    pub use_length_vertex_group: bool,
    /// Dynamics state the system is left in after provisioning.
    pub hair_dynamics: bool,
    pub kink: Option<KinkSettings>,
}

impl StrandParameters {
    /// Children length threshold. Must stay zero so `child_length` is the effective length.
    pub const CHILD_LENGTH_THRESHOLD: f32 = 0.0;
}

/// Per-request overrides for the tunable catalog defaults.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub struct PresetTuning {
    pub parent_count: Option<u32>,
    pub child_count: Option<u32>,
    pub segments: Option<u32>,
    pub hair_dynamics: Option<bool>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while deriving parameters from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown strand system type '{0}'")]
    UnknownSystemType(String),

    #[error("unknown size bucket '{0}'")]
    UnknownBucket(String),

    #[error("{system} requires a {axis} size")]
    MissingSize {
        system: StrandSystemType,
        axis: SizeAxis,
    },

    #[error("no catalog entry for {0}")]
    MissingEntry(StrandSystemType),

    #[error("{system} does not support {segments} segments")]
    UnsupportedSegments {
        system: StrandSystemType,
        segments: u32,
    },
}
