//! Strand presets and the pure helpers the provisioning transaction relies on.

mod cache_name;
pub mod data;
pub mod presets;

pub use cache_name::*;
pub use data::*;
pub use presets::{catalog, derive, PresetCatalog};
