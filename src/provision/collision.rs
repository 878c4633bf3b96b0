//! Collision modifier swap.
//!
//! A collision modifier must not be present while strand dynamics is first
//! enabled on the same object, so it is captured and removed up front, then
//! recreated with the captured values once the new system is configured.

use crate::host::{CollisionField, HostResult, HostValue, StrandHost};

/// Outer thickness written onto the recreated modifier, captured or not.
pub const OUTER_THICKNESS: f32 = 0.015;

/// Snapshot of the preserved collision fields of one object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionState {
    values: Vec<(CollisionField, HostValue)>,
}

impl CollisionState {
    pub fn capture<H: StrandHost + ?Sized>(host: &H, object: &str) -> HostResult<Self> {
        let values = CollisionField::PRESERVED
            .into_iter()
            .map(|field| Ok((field, host.collision_field(object, field)?)))
            .collect::<HostResult<Vec<_>>>()?;
        Ok(Self { values })
    }

    pub fn get(&self, field: CollisionField) -> Option<&HostValue> {
        self.values
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Write every captured field back onto the object's collision modifier.
    pub fn restore<H: StrandHost + ?Sized>(&self, host: &mut H, object: &str) -> HostResult<()> {
        for (field, value) in &self.values {
            host.set_collision_field(object, *field, value.clone())?;
        }
        Ok(())
    }
}
