//! # Bevy Hair System
//!
//! Provisions strand (hair and fur) particle systems on scene objects from a
//! catalog of presets.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_hair_system::{CreateHairSystemEvent, HairSystemPlugin};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(MinimalPlugins)
//!         .add_plugins(HairSystemPlugin::default())
//!         .run();
//! }
//! ```
//!
//! Write a [`CreateHairSystemEvent`] to run a provisioning transaction. The
//! result lands in [`LastProvisioningOutcome`].
//!
//! ## Scene Objects
//!
//! Objects are entities with a `Name`. Modifiers, vertex groups, material
//! slots and particle systems live in components from [`host`]:
//!
//! ```ignore
//! commands.spawn((
//!     Name::new("Body"),
//!     VertexGroups(vec!["Scalp".into()]),
//!     MaterialSlots(vec!["Hair".into()]),
//! ));
//! ```
//!
//! The project must have a save location ([`ProjectFile`]) before any system
//! is created, since point caches are written next to it.
//!
//! ## Without the Plugin
//!
//! [`provision()`] runs against anything implementing [`StrandHost`], and
//! [`strands::derive`] gives the parameters for a preset on its own.

pub mod host;
pub mod plugin;
pub mod preferences;
pub mod provision;
pub mod strands;

// Re-export the plugin and its events
pub use plugin::{
    CreateHairSystemEvent, HairSystemPlugin, LastProvisioningOutcome, ProvisionHairSystemCommand,
};

// Re-export the host contract and scene components
pub use host::{
    MaterialSlots, Modifier, Modifiers, ParticleSystems, ProjectFile, SceneFrameRange,
    StrandHost, VertexGroups, WorldHost,
};

// Re-export provisioning types
pub use provision::{provision, FailureKind, ProvisioningOutcome, ProvisioningRequest};

pub use preferences::HairSystemPreferences;

pub use strands::{SizeBucket, StrandParameters, StrandSystemType};
