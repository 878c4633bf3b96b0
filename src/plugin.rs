use bevy::prelude::*;

use crate::host::{
    ActiveObject, MaterialSlots, Modifiers, ObjectMode, ParticleSystems, ProjectFile,
    SceneFrameRange, VertexGroups, WorldHost,
};
use crate::preferences::HairSystemPreferences;
use crate::provision::{provision, ProvisioningOutcome, ProvisioningRequest};

/// Event to create a hair system
#[derive(Message, Clone, Debug, Default)]
pub struct CreateHairSystemEvent {
    /// Request to run. None builds one from [`HairSystemPreferences`].
    pub request: Option<ProvisioningRequest>,
}

/// Outcome of the most recent provisioning run
#[derive(Resource, Default, Debug)]
pub struct LastProvisioningOutcome(pub Option<ProvisioningOutcome>);

/// Runs one provisioning transaction against the world
pub struct ProvisionHairSystemCommand {
    pub request: ProvisioningRequest,
}

impl Command for ProvisionHairSystemCommand {
    fn apply(self, world: &mut World) {
        let outcome = provision(&mut WorldHost::new(world), &self.request);
        if let Some(cache_name) = outcome.cache_name() {
            info!(
                "Created hair system on '{}' with cache '{}'",
                self.request.target_object, cache_name
            );
        }
        world.insert_resource(LastProvisioningOutcome(Some(outcome)));
    }
}

/// Adds hair system provisioning to an app
pub struct HairSystemPlugin {
    /// Load preferences from the config directory and save them when they change
    pub persist_preferences: bool,
}

impl Default for HairSystemPlugin {
    fn default() -> Self {
        Self {
            persist_preferences: true,
        }
    }
}

impl Plugin for HairSystemPlugin {
    fn build(&self, app: &mut App) {
        let preferences = if self.persist_preferences {
            HairSystemPreferences::load()
        } else {
            HairSystemPreferences::default()
        };

        app.register_type::<ObjectMode>()
            .register_type::<Modifiers>()
            .register_type::<VertexGroups>()
            .register_type::<MaterialSlots>()
            .register_type::<ParticleSystems>()
            .register_type::<SceneFrameRange>()
            .insert_resource(preferences)
            .init_resource::<SceneFrameRange>()
            .init_resource::<ProjectFile>()
            .init_resource::<ActiveObject>()
            .init_resource::<LastProvisioningOutcome>()
            .add_message::<CreateHairSystemEvent>()
            .add_systems(Update, handle_create_hair_system);

        if self.persist_preferences {
            app.add_systems(Update, save_preferences_on_change);
        }
    }
}

fn handle_create_hair_system(
    mut events: MessageReader<CreateHairSystemEvent>,
    preferences: Res<HairSystemPreferences>,
    mut commands: Commands,
) {
    for event in events.read() {
        let request = match &event.request {
            Some(request) => request.clone(),
            None => match preferences.to_request() {
                Ok(request) => request,
                Err(e) => {
                    error!("Cannot create hair system: {}", e);
                    continue;
                }
            },
        };
        commands.queue(ProvisionHairSystemCommand { request });
    }
}

fn save_preferences_on_change(preferences: Res<HairSystemPreferences>) {
    if preferences.is_changed() && !preferences.is_added() {
        preferences.save();
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::provision::FailureKind;
    use crate::strands::StrandSystemType;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(HairSystemPlugin {
            persist_preferences: false,
        });
        app.insert_resource(ProjectFile {
            path: Some(PathBuf::from("/projects/character.scn.ron")),
        });
        app.world_mut().spawn(Name::new("Body"));
        app
    }

    #[test]
    fn event_uses_preferences() {
        let mut app = app();
        {
            let mut prefs = app.world_mut().resource_mut::<HairSystemPreferences>();
            prefs.object_name = "Body".into();
            prefs.system_type = StrandSystemType::Eyelashes;
        }
        app.world_mut().write_message(CreateHairSystemEvent::default());
        app.update();

        let outcome = app.world().resource::<LastProvisioningOutcome>();
        let outcome = outcome.0.as_ref().unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.display_name(), Some("eyelashes"));
    }

    #[test]
    fn invalid_preferences_queue_nothing() {
        let mut app = app();
        app.world_mut().write_message(CreateHairSystemEvent::default());
        app.update();
        assert!(app.world().resource::<LastProvisioningOutcome>().0.is_none());
    }

    #[test]
    fn command_records_failures() {
        let mut app = app();
        app.insert_resource(ProjectFile::default());

        let request = ProvisioningRequest::new(StrandSystemType::Hair, "Body");
        ProvisionHairSystemCommand { request }.apply(app.world_mut());

        let outcome = app.world().resource::<LastProvisioningOutcome>();
        assert_eq!(
            outcome.0.as_ref().and_then(ProvisioningOutcome::failure_kind),
            Some(FailureKind::PreconditionFailure)
        );
    }
}
