//! Headless demo: provisions a hair system on a sample object and logs the outcome.
//!
//! For using the crate as a library in your own app, see `HairSystemPlugin`.

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_hair_system::host::CollisionSettings;
use bevy_hair_system::provision::LogLevel;
use bevy_hair_system::{
    CreateHairSystemEvent, HairSystemPlugin, LastProvisioningOutcome, MaterialSlots, Modifier,
    Modifiers, ProjectFile, ProvisioningRequest, SizeBucket, StrandSystemType, VertexGroups,
};

fn main() {
    App::new()
        .add_plugins((MinimalPlugins, LogPlugin::default()))
        .add_plugins(HairSystemPlugin {
            persist_preferences: false,
        })
        .insert_resource(ProjectFile {
            path: Some("demo.scn.ron".into()),
        })
        .add_systems(Startup, spawn_demo_object)
        .add_systems(Update, report_outcome)
        .run();
}

fn spawn_demo_object(mut commands: Commands, mut events: MessageWriter<CreateHairSystemEvent>) {
    commands.spawn((
        Name::new("Body"),
        VertexGroups(vec!["Scalp".into()]),
        MaterialSlots(vec!["Skin".into(), "Hair".into()]),
        Modifiers(vec![Modifier::collision(
            "Collision",
            CollisionSettings {
                stickiness: 0.3,
                ..default()
            },
        )]),
    ));

    let request = ProvisioningRequest::new(StrandSystemType::Hair, "Body")
        .with_sizes(Some(SizeBucket::L), Some(SizeBucket::S))
        .with_vertex_group("Scalp")
        .with_material("Hair");
    events.write(CreateHairSystemEvent {
        request: Some(request),
    });
}

fn report_outcome(outcome: Res<LastProvisioningOutcome>, mut exit: MessageWriter<AppExit>) {
    let Some(outcome) = &outcome.0 else {
        return;
    };

    let warnings = outcome.entries(LogLevel::Warn).count();
    info!(
        "Provisioning finished in '{}' with {} warning(s): {:?}",
        outcome.reached, warnings, outcome.status
    );
    exit.write(if outcome.is_success() {
        AppExit::Success
    } else {
        AppExit::error()
    });
}
