//! The provisioning transaction.
//!
//! Runs `Idle -> CollisionCaptured -> CollisionRemoved -> SystemCreated ->
//! ParametersApplied -> CollisionRestored -> Done` against a [`StrandHost`],
//! one host call at a time. Validation happens before the first mutation.
//! Host failures after that end the run without rollback, and the outcome
//! log lists what was left behind.

use super::collision::{CollisionState, OUTER_THICKNESS};
use super::outcome::*;
use super::request::{ProvisioningRequest, RequestError};
use crate::host::*;
use crate::strands::{resolve_cache_name, ChildType, StrandParameters};

/// Hair dynamics vertex mass.
pub const VERTEX_MASS: f32 = 0.001;
pub const BENDING_STIFFNESS: f32 = 1.0;
pub const BENDING_DAMPING: f32 = 0.0;
/// Minimum distance kept between strands and colliders.
pub const COLLISION_DISTANCE_MIN: f32 = 0.001;
/// Velocity randomisation written on every new system.
pub const FACTOR_RANDOM: f32 = 0.01;

/// Step names used in [`ProvisioningOutcome::steps`].
pub const MATERIAL_STEP: &str = "material";
pub const DYNAMICS_STEP: &str = "dynamics block";

enum Abort {
    Precondition(String),
    Host(HostError),
}

impl From<HostError> for Abort {
    fn from(err: HostError) -> Self {
        Self::Host(err)
    }
}

impl From<RequestError> for Abort {
    fn from(err: RequestError) -> Self {
        Self::Precondition(err.to_string())
    }
}

/// Provision one strand system on `request.target_object`.
///
/// Never panics on host errors; every failure is reported in the outcome.
pub fn provision<H: StrandHost + ?Sized>(
    host: &mut H,
    request: &ProvisioningRequest,
) -> ProvisioningOutcome {
    let mut transaction = Transaction {
        host,
        request,
        phase: ProvisionPhase::Idle,
        log: PhaseLog::default(),
        committed: Vec::new(),
        steps: Vec::new(),
    };
    transaction.info(format!(
        "creating '{}' on '{}'",
        request.system_type.label(),
        request.target_object
    ));

    match transaction.run() {
        Ok((display_name, cache_name)) => transaction.succeed(display_name, cache_name),
        Err(abort) => transaction.fail(abort),
    }
}

struct Transaction<'a, H: ?Sized> {
    host: &'a mut H,
    request: &'a ProvisioningRequest,
    phase: ProvisionPhase,
    log: PhaseLog,
    /// Mutations that stay in place if a later step fails.
    committed: Vec<String>,
    steps: Vec<(&'static str, StepResult)>,
}

impl<H: StrandHost + ?Sized> Transaction<'_, H> {
    fn info(&mut self, message: impl Into<String>) {
        self.log.push(LogLevel::Info, self.phase, message);
    }

    fn enter(&mut self, phase: ProvisionPhase) {
        self.phase = phase;
    }

    fn commit(&mut self, change: impl Into<String>) {
        self.committed.push(change.into());
    }

    fn record(&mut self, step: &'static str, result: StepResult) {
        match &result {
            StepResult::Applied => self.info(format!("{step}: applied")),
            StepResult::Skipped(reason) => {
                self.log
                    .push(LogLevel::Warn, self.phase, format!("{step}: skipped, {reason}"))
            }
        }
        self.steps.push((step, result));
    }

    fn run(&mut self) -> Result<(String, String), Abort> {
        let request = self.request;
        let object = request.target_object.as_str();
        let params = self.validate()?;
        let display_name = request.display_name();

        let mode = self.host.mode(object)?;
        if mode != InteractionMode::Object {
            self.host.set_mode(object, InteractionMode::Object)?;
            self.commit(format!("'{object}' switched from {mode:?} to Object mode"));
        }

        let captured = self.swap_out_collision(object)?;
        let index = self.create_system(object, &display_name)?;
        self.apply_parameters(object, index, &params)?;
        self.configure_dynamics(object, index)?;
        let cache_name = self.configure_cache(object, index)?;

        if !params.hair_dynamics {
            self.host
                .set_system_field(object, index, SystemField::UseHairDynamics, false.into())?;
            self.info("hair dynamics turned off, its settings are kept");
        }
        self.enter(ProvisionPhase::ParametersApplied);
        self.info(format!(
            "{} parents, {} children, {} segments",
            params.parent_count, params.child_count, params.segments
        ));

        self.restore_collision(object, captured)?;

        if mode != InteractionMode::Object {
            self.host.set_mode(object, mode)?;
            self.info(format!("returned to {mode:?} mode"));
        }
        self.enter(ProvisionPhase::Done);
        Ok((display_name, cache_name))
    }

    /// Checks that need no mutation. Everything here fails with zero changes made.
    fn validate(&mut self) -> Result<StrandParameters, Abort> {
        if !self.host.has_save_identity() {
            return Err(Abort::Precondition(
                "the project must be saved before adding a hair system".into(),
            ));
        }
        let params = self.request.validate()?;

        let object = self.request.target_object.as_str();
        if !self.host.object_exists(object) {
            return Err(HostError::ObjectNotFound(object.to_string()).into());
        }
        if let Some(group) = self.request.vertex_group.as_deref().filter(|g| !g.is_empty()) {
            if !self.host.vertex_groups(object)?.iter().any(|g| g == group) {
                return Err(HostError::VertexGroupNotFound {
                    object: object.to_string(),
                    group: group.to_string(),
                }
                .into());
            }
        }
        Ok(params)
    }

    fn swap_out_collision(&mut self, object: &str) -> Result<Option<CollisionState>, Abort> {
        let Some(name) = self.host.collision_modifier(object)? else {
            self.info("no collision modifier present");
            return Ok(None);
        };

        let state = CollisionState::capture(&*self.host, object)?;
        self.enter(ProvisionPhase::CollisionCaptured);
        self.info(format!("stored {} fields of '{name}'", state.len()));

        self.host.remove_modifier(object, &name)?;
        self.commit(format!("collision modifier '{name}' removed"));
        self.enter(ProvisionPhase::CollisionRemoved);
        self.info("collision modifier removed until the system is configured");
        Ok(Some(state))
    }

    fn create_system(&mut self, object: &str, display_name: &str) -> Result<usize, Abort> {
        self.host.select_exclusive(object)?;
        self.commit(format!("selection replaced by '{object}'"));

        let index = self.host.add_particle_system(object)?;
        self.commit(format!("particle system {index} added to '{object}'"));

        self.host
            .set_system_field(object, index, SystemField::Name, display_name.into())?;
        self.host
            .set_settings_field(object, index, SettingsField::Name, display_name.into())?;
        self.host
            .set_settings_field(object, index, SettingsField::Type, "HAIR".into())?;

        self.enter(ProvisionPhase::SystemCreated);
        self.info(format!("added particle system '{display_name}'"));
        Ok(index)
    }

    fn apply_parameters(
        &mut self,
        object: &str,
        index: usize,
        params: &StrandParameters,
    ) -> Result<(), Abort> {
        use SettingsField as F;

        let parents = HostValue::try_from(params.parent_count)?;
        let children = HostValue::try_from(params.child_count)?;
        let segments = HostValue::try_from(params.segments)?;

        let mut writes: Vec<(SettingsField, HostValue)> = vec![
            (F::UseAdvancedHair, true.into()),
            // Emission
            (F::Count, parents),
            (F::HairLength, params.hair_length.into()),
            (F::HairStep, segments.clone()),
            (F::UseEmitRandom, params.use_emit_random.into()),
            (F::UseEvenDistribution, params.use_even_distribution.into()),
            (F::UserJit, HostValue::try_from(params.jitter_per_face)?),
            (F::JitterFactor, params.jitter_factor.into()),
            // Children
            (F::ChildType, params.child_type.id().into()),
            (F::ChildDisplayCount, children.clone()),
            (F::ChildRenderCount, children),
            (F::ChildLength, params.child_length.into()),
            (
                F::ChildLengthThreshold,
                StrandParameters::CHILD_LENGTH_THRESHOLD.into(),
            ),
            (F::ClumpFactor, params.clump_factor.into()),
            (F::ClumpShape, params.clump_shape.into()),
            // Display and render
            (F::DisplayStep, segments.clone()),
            (F::UseHairBspline, true.into()),
            (F::RenderStep, segments),
            // Shape
            (F::Shape, params.taper_shape.into()),
            (F::RootRadius, params.thickness.into()),
            (F::TipRadius, params.tip_thickness.into()),
        ];
        if params.child_type == ChildType::Simple {
            writes.push((F::ChildRadius, params.child_radius.into()));
        }
        if let Some(kink) = params.kink {
            let kink_writes: [(SettingsField, HostValue); 6] = [
                (F::Kink, kink.kind.id().into()),
                (F::KinkAmplitude, kink.amplitude.into()),
                (F::KinkAmplitudeClump, kink.clump.into()),
                (F::KinkFlat, kink.flatness.into()),
                (F::KinkFrequency, kink.frequency.into()),
                (F::KinkShape, kink.shape.into()),
            ];
            writes.extend(kink_writes);
        }
        for (field, value) in writes {
            self.host.set_settings_field(object, index, field, value)?;
        }

        self.assign_material(object, index)?;

        if let Some(group) = self.request.vertex_group.as_deref().filter(|g| !g.is_empty()) {
            self.host
                .set_system_field(object, index, SystemField::VertexGroupDensity, group.into())?;
            if params.use_length_vertex_group {
                self.host
                    .set_system_field(object, index, SystemField::VertexGroupLength, group.into())?;
            }
            self.info(format!("bound to vertex group '{group}'"));
        }
        Ok(())
    }

    fn assign_material(&mut self, object: &str, index: usize) -> Result<(), Abort> {
        let material = self.request.material.as_str();
        let result = if material.is_empty() {
            StepResult::Skipped("no material requested".into())
        } else {
            match self
                .host
                .set_settings_field(object, index, SettingsField::MaterialSlot, material.into())
            {
                Ok(()) => StepResult::Applied,
                Err(err @ HostError::MaterialSlotNotFound { .. }) => {
                    StepResult::Skipped(err.to_string())
                }
                Err(err) => return Err(err.into()),
            }
        };
        self.record(MATERIAL_STEP, result);
        Ok(())
    }

    /// Dynamics is switched on so its block exists to configure, whatever the preset asks for.
    fn configure_dynamics(&mut self, object: &str, index: usize) -> Result<(), Abort> {
        self.host
            .set_system_field(object, index, SystemField::UseHairDynamics, true.into())?;
        self.host.set_settings_field(
            object,
            index,
            SettingsField::FactorRandom,
            FACTOR_RANDOM.into(),
        )?;

        let result = match self.write_cloth(object, index) {
            Ok(()) => StepResult::Applied,
            Err(HostError::NoCloth { .. }) => {
                StepResult::Skipped("host exposed no dynamics block".into())
            }
            Err(err) => return Err(err.into()),
        };
        self.record(DYNAMICS_STEP, result);
        Ok(())
    }

    fn write_cloth(&mut self, object: &str, index: usize) -> HostResult<()> {
        for (field, value) in [
            (ClothField::Mass, VERTEX_MASS),
            (ClothField::BendingStiffness, BENDING_STIFFNESS),
            (ClothField::BendingDamping, BENDING_DAMPING),
            (ClothField::CollisionDistanceMin, COLLISION_DISTANCE_MIN),
        ] {
            self.host.set_cloth_field(object, index, field, value.into())?;
        }
        Ok(())
    }

    fn configure_cache(&mut self, object: &str, index: usize) -> Result<String, Abort> {
        let existing = self.host.cache_names(object)?;
        let cache_name = resolve_cache_name(&self.request.cache_seed(), &existing);
        let (start, end) = self.host.frame_range();

        for (field, value) in [
            (PointCacheField::Name, HostValue::from(cache_name.as_str())),
            (PointCacheField::FrameStart, start.into()),
            (PointCacheField::FrameEnd, end.into()),
            (PointCacheField::UseDiskCache, true.into()),
            (PointCacheField::Compression, "HEAVY".into()),
        ] {
            self.host.set_point_cache_field(object, index, field, value)?;
        }
        self.info(format!("cache '{cache_name}' covers frames {start}..={end}"));
        Ok(cache_name)
    }

    fn restore_collision(
        &mut self,
        object: &str,
        captured: Option<CollisionState>,
    ) -> Result<(), Abort> {
        let name = self.host.add_modifier(object, COLLISION_MODIFIER)?;
        self.commit(format!("collision modifier '{name}' added"));

        match captured {
            Some(state) => {
                state.restore(&mut *self.host, object)?;
                self.info(format!("restored {} collision fields", state.len()));
            }
            None => self.info("collision modifier added with host defaults"),
        }
        self.host.set_collision_field(
            object,
            CollisionField::ThicknessOuter,
            OUTER_THICKNESS.into(),
        )?;

        self.enter(ProvisionPhase::CollisionRestored);
        self.info(format!("outer thickness set to {OUTER_THICKNESS}"));
        Ok(())
    }

    fn succeed(mut self, display_name: String, cache_name: String) -> ProvisioningOutcome {
        self.info(format!("'{display_name}' ready"));
        ProvisioningOutcome {
            status: ProvisioningStatus::Succeeded {
                display_name,
                cache_name,
            },
            reached: self.phase,
            log: self.log.into_entries(),
            steps: self.steps,
        }
    }

    fn fail(mut self, abort: Abort) -> ProvisioningOutcome {
        let reached = self.phase;
        let (kind, message) = match abort {
            Abort::Precondition(message) => (FailureKind::PreconditionFailure, message),
            Abort::Host(err) => (FailureKind::HostStateFailure, err.to_string()),
        };

        self.enter(ProvisionPhase::Failed);
        self.log.push(
            LogLevel::Error,
            self.phase,
            format!("stopped after '{reached}': {message}"),
        );
        if !self.committed.is_empty() {
            let left = self.committed.join("; ");
            self.log
                .push(LogLevel::Warn, self.phase, format!("not rolled back: {left}"));
        }

        ProvisioningOutcome {
            status: ProvisioningStatus::Failed { kind, message },
            reached,
            log: self.log.into_entries(),
            steps: self.steps,
        }
    }
}
