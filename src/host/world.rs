use bevy::prelude::*;

use super::scene::parse_id;
use super::*;

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// [`StrandHost`] over a Bevy `World`.
///
/// Objects are entities with a `Name`. Scene components that are missing on
/// an object are treated as empty and inserted on first write.
pub struct WorldHost<'w> {
    world: &'w mut World,
}

impl<'w> WorldHost<'w> {
    pub fn new(world: &'w mut World) -> Self {
        Self { world }
    }

    fn find(&self, object: &str) -> HostResult<Entity> {
        let world: &World = &*self.world;
        let not_found = || HostError::ObjectNotFound(object.to_string());
        let mut names = world.try_query::<(Entity, &Name)>().ok_or_else(not_found)?;
        names
            .iter(world)
            .find(|(_, name)| name.as_str() == object)
            .map(|(entity, _)| entity)
            .ok_or_else(not_found)
    }

    fn modifiers_mut(&mut self, object: &str) -> HostResult<Mut<'_, Modifiers>> {
        let entity = self.find(object)?;
        if self.world.get::<Modifiers>(entity).is_none() {
            self.world.entity_mut(entity).insert(Modifiers::default());
        }
        self.world
            .get_mut::<Modifiers>(entity)
            .ok_or_else(|| HostError::ObjectNotFound(object.to_string()))
    }

    fn systems_mut(&mut self, object: &str) -> HostResult<Mut<'_, ParticleSystems>> {
        let entity = self.find(object)?;
        if self.world.get::<ParticleSystems>(entity).is_none() {
            self.world.entity_mut(entity).insert(ParticleSystems::default());
        }
        self.world
            .get_mut::<ParticleSystems>(entity)
            .ok_or_else(|| HostError::ObjectNotFound(object.to_string()))
    }

    fn with_system<R>(
        &mut self,
        object: &str,
        index: usize,
        f: impl FnOnce(&mut ParticleSystem) -> HostResult<R>,
    ) -> HostResult<R> {
        let mut systems = self.systems_mut(object)?;
        let system = systems
            .0
            .get_mut(index)
            .ok_or_else(|| HostError::ParticleSystemNotFound {
                object: object.to_string(),
                index,
            })?;
        f(system)
    }

    fn material_slots(&self, object: &str) -> HostResult<Vec<String>> {
        let entity = self.find(object)?;
        Ok(self
            .world
            .get::<MaterialSlots>(entity)
            .map(|slots| slots.0.clone())
            .unwrap_or_default())
    }

    fn require_vertex_group(
        &self,
        object: &str,
        value: &HostValue,
        field: SystemField,
    ) -> HostResult<Option<String>> {
        let group = value.as_text(field)?;
        if group.is_empty() {
            return Ok(None);
        }
        if !self.vertex_groups(object)?.iter().any(|g| g == group) {
            return Err(HostError::VertexGroupNotFound {
                object: object.to_string(),
                group: group.to_string(),
            });
        }
        Ok(Some(group.to_string()))
    }
}

impl StrandHost for WorldHost<'_> {
    fn has_save_identity(&self) -> bool {
        self.world
            .get_resource::<ProjectFile>()
            .and_then(|project| project.path.as_ref())
            .and_then(|path| path.file_name())
            .is_some_and(|name| !name.is_empty())
    }

    fn object_exists(&self, object: &str) -> bool {
        self.find(object).is_ok()
    }

    fn vertex_groups(&self, object: &str) -> HostResult<Vec<String>> {
        let entity = self.find(object)?;
        Ok(self
            .world
            .get::<VertexGroups>(entity)
            .map(|groups| groups.0.clone())
            .unwrap_or_default())
    }

    fn mode(&self, object: &str) -> HostResult<InteractionMode> {
        let entity = self.find(object)?;
        Ok(self
            .world
            .get::<ObjectMode>(entity)
            .map(|mode| mode.0)
            .unwrap_or_default())
    }

    fn set_mode(&mut self, object: &str, mode: InteractionMode) -> HostResult<()> {
        let entity = self.find(object)?;
        self.world.entity_mut(entity).insert(ObjectMode(mode));
        Ok(())
    }

    fn select_exclusive(&mut self, object: &str) -> HostResult<()> {
        let entity = self.find(object)?;

        let selected: Vec<Entity> = {
            let mut query = self.world.query_filtered::<Entity, With<Selected>>();
            query.iter(self.world).collect()
        };
        for other in selected {
            self.world.entity_mut(other).remove::<Selected>();
        }

        self.world.entity_mut(entity).insert(Selected);
        self.world.insert_resource(ActiveObject(Some(entity)));
        Ok(())
    }

    fn modifier_names(&self, object: &str) -> HostResult<Vec<String>> {
        let entity = self.find(object)?;
        Ok(self
            .world
            .get::<Modifiers>(entity)
            .map(|stack| stack.0.iter().map(|m| m.name.clone()).collect())
            .unwrap_or_default())
    }

    fn collision_modifier(&self, object: &str) -> HostResult<Option<String>> {
        let entity = self.find(object)?;
        Ok(self.world.get::<Modifiers>(entity).and_then(|stack| {
            stack
                .0
                .iter()
                .find(|m| matches!(m.kind, ModifierKind::Collision(_)))
                .map(|m| m.name.clone())
        }))
    }

    fn remove_modifier(&mut self, object: &str, name: &str) -> HostResult<()> {
        let mut stack = self.modifiers_mut(object)?;
        let index = stack
            .0
            .iter()
            .position(|m| m.name == name)
            .ok_or_else(|| HostError::ModifierNotFound {
                object: object.to_string(),
                modifier: name.to_string(),
            })?;
        stack.0.remove(index);
        Ok(())
    }

    fn add_modifier(&mut self, object: &str, kind: &str) -> HostResult<String> {
        let modifier = if kind.eq_ignore_ascii_case(COLLISION_MODIFIER) {
            if self.collision_modifier(object)?.is_some() {
                return Err(HostError::DuplicateModifier {
                    object: object.to_string(),
                    kind: COLLISION_MODIFIER.to_string(),
                });
            }
            Modifier::collision(kind, CollisionSettings::default())
        } else {
            Modifier {
                name: kind.to_string(),
                kind: ModifierKind::Other(kind.to_string()),
            }
        };
        let name = modifier.name.clone();
        self.modifiers_mut(object)?.0.push(modifier);
        Ok(name)
    }

    fn collision_field(&self, object: &str, field: CollisionField) -> HostResult<HostValue> {
        let entity = self.find(object)?;
        self.world
            .get::<Modifiers>(entity)
            .and_then(Modifiers::collision)
            .map(|settings| settings.get(field))
            .ok_or_else(|| HostError::NoCollision(object.to_string()))
    }

    fn set_collision_field(
        &mut self,
        object: &str,
        field: CollisionField,
        value: HostValue,
    ) -> HostResult<()> {
        let mut stack = self.modifiers_mut(object)?;
        let settings = stack
            .collision_mut()
            .ok_or_else(|| HostError::NoCollision(object.to_string()))?;
        settings.set(field, &value)
    }

    fn add_particle_system(&mut self, object: &str) -> HostResult<usize> {
        let mut systems = self.systems_mut(object)?;
        systems.0.push(ParticleSystem::default());
        Ok(systems.0.len() - 1)
    }

    fn set_system_field(
        &mut self,
        object: &str,
        system: usize,
        field: SystemField,
        value: HostValue,
    ) -> HostResult<()> {
        match field {
            SystemField::Name => {
                let name = value.as_text(field)?.to_string();
                self.with_system(object, system, |s| {
                    s.name = name;
                    Ok(())
                })
            }
            SystemField::VertexGroupDensity => {
                let group = self.require_vertex_group(object, &value, field)?;
                self.with_system(object, system, |s| {
                    s.vertex_group_density = group;
                    Ok(())
                })
            }
            SystemField::VertexGroupLength => {
                let group = self.require_vertex_group(object, &value, field)?;
                self.with_system(object, system, |s| {
                    s.vertex_group_length = group;
                    Ok(())
                })
            }
            SystemField::UseHairDynamics => {
                let enabled = value.as_bool(field)?;
                self.with_system(object, system, |s| {
                    s.use_hair_dynamics = enabled;
                    if enabled {
                        s.cloth.get_or_insert_with(ClothSettings::default);
                    }
                    Ok(())
                })
            }
        }
    }

    fn set_settings_field(
        &mut self,
        object: &str,
        system: usize,
        field: SettingsField,
        value: HostValue,
    ) -> HostResult<()> {
        if field == SettingsField::MaterialSlot {
            let slot = value.as_text(field)?;
            if !slot.is_empty() && !self.material_slots(object)?.iter().any(|s| s == slot) {
                return Err(HostError::MaterialSlotNotFound {
                    object: object.to_string(),
                    slot: slot.to_string(),
                });
            }
        }
        self.with_system(object, system, |s| s.settings.set(field, &value))
    }

    fn set_cloth_field(
        &mut self,
        object: &str,
        system: usize,
        field: ClothField,
        value: HostValue,
    ) -> HostResult<()> {
        let amount = value.as_float(field)?;
        self.with_system(object, system, |s| {
            let cloth = s
                .cloth
                .as_mut()
                .filter(|_| s.use_hair_dynamics)
                .ok_or_else(|| HostError::NoCloth {
                    object: object.to_string(),
                    index: system,
                })?;
            match field {
                ClothField::Mass => cloth.mass = amount,
                ClothField::BendingStiffness => cloth.bending_stiffness = amount,
                ClothField::BendingDamping => cloth.bending_damping = amount,
                ClothField::CollisionDistanceMin => cloth.distance_min = amount,
            }
            Ok(())
        })
    }

    fn cache_names(&self, object: &str) -> HostResult<Vec<String>> {
        let entity = self.find(object)?;
        Ok(self
            .world
            .get::<ParticleSystems>(entity)
            .map(|systems| {
                systems
                    .0
                    .iter()
                    .flat_map(|s| s.point_caches.iter().map(|c| c.name.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn set_point_cache_field(
        &mut self,
        object: &str,
        system: usize,
        field: PointCacheField,
        value: HostValue,
    ) -> HostResult<()> {
        self.with_system(object, system, |s| {
            let cache = s
                .point_caches
                .last_mut()
                .ok_or_else(|| HostError::NoPointCache {
                    object: object.to_string(),
                    index: system,
                })?;
            match field {
                PointCacheField::Name => cache.name = value.as_text(field)?.to_string(),
                PointCacheField::FrameStart => cache.frame_start = value.as_int(field)?,
                PointCacheField::FrameEnd => cache.frame_end = value.as_int(field)?,
                PointCacheField::UseDiskCache => cache.use_disk_cache = value.as_bool(field)?,
                PointCacheField::Compression => {
                    cache.compression = parse_id(
                        field,
                        &value,
                        &[
                            ("NO", CacheCompression::No),
                            ("LIGHT", CacheCompression::Light),
                            ("HEAVY", CacheCompression::Heavy),
                        ],
                    )?
                }
            }
            Ok(())
        })
    }

    fn frame_range(&self) -> (i32, i32) {
        let range = self
            .world
            .get_resource::<SceneFrameRange>()
            .copied()
            .unwrap_or_default();
        (range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn scene() -> World {
        let mut world = World::new();
        world.spawn((
            Name::new("Body"),
            VertexGroups(vec!["Scalp".into()]),
            MaterialSlots(vec!["Skin".into()]),
        ));
        world.spawn((Name::new("Prop"), Selected));
        world
    }

    #[test]
    fn missing_object_is_reported() {
        let mut world = scene();
        let mut host = WorldHost::new(&mut world);
        assert!(!host.object_exists("Ghost"));
        assert_eq!(
            host.add_particle_system("Ghost"),
            Err(HostError::ObjectNotFound("Ghost".into()))
        );
    }

    #[test]
    fn save_identity_needs_a_file_name() {
        let mut world = scene();
        assert!(!WorldHost::new(&mut world).has_save_identity());

        world.insert_resource(ProjectFile {
            path: Some(PathBuf::from("/")),
        });
        assert!(!WorldHost::new(&mut world).has_save_identity());

        world.insert_resource(ProjectFile {
            path: Some(PathBuf::from("/projects/character.scn.ron")),
        });
        assert!(WorldHost::new(&mut world).has_save_identity());
    }

    #[test]
    fn exclusive_selection_clears_others() {
        let mut world = scene();
        WorldHost::new(&mut world).select_exclusive("Body").unwrap();

        let selected: Vec<String> = world
            .query_filtered::<&Name, With<Selected>>()
            .iter(&world)
            .map(|n| n.as_str().to_string())
            .collect();
        assert_eq!(selected, vec!["Body".to_string()]);
        assert!(world.resource::<ActiveObject>().0.is_some());
    }

    #[test]
    fn collision_modifier_round_trip() {
        let mut world = scene();
        let mut host = WorldHost::new(&mut world);

        assert_eq!(
            host.collision_field("Body", CollisionField::Stickiness),
            Err(HostError::NoCollision("Body".into()))
        );
        let name = host.add_modifier("Body", COLLISION_MODIFIER).unwrap();
        assert_eq!(name, "COLLISION");
        host.set_collision_field("Body", CollisionField::Stickiness, HostValue::Float(0.3))
            .unwrap();
        assert_eq!(
            host.collision_field("Body", CollisionField::Stickiness),
            Ok(HostValue::Float(0.3))
        );
        assert_eq!(
            host.set_collision_field("Body", CollisionField::UseCulling, HostValue::Float(1.0)),
            Err(HostError::TypeMismatch {
                field: "UseCulling".into(),
                expected: "bool",
            })
        );

        host.remove_modifier("Body", "COLLISION").unwrap();
        assert!(host.modifier_names("Body").unwrap().is_empty());
    }

    #[test]
    fn collision_modifier_is_found_by_type() {
        let mut world = scene();
        let mut host = WorldHost::new(&mut world);
        host.add_modifier("Body", "SUBSURF").unwrap();
        assert_eq!(host.collision_modifier("Body"), Ok(None));

        host.add_modifier("Body", COLLISION_MODIFIER).unwrap();
        assert_eq!(
            host.collision_modifier("Body"),
            Ok(Some(COLLISION_MODIFIER.to_string()))
        );
        assert_eq!(
            host.add_modifier("Body", "collision"),
            Err(HostError::DuplicateModifier {
                object: "Body".into(),
                kind: COLLISION_MODIFIER.into(),
            })
        );
        assert_eq!(host.modifier_names("Body").unwrap().len(), 2);
    }

    #[test]
    fn material_and_vertex_group_names_are_checked() {
        let mut world = scene();
        let mut host = WorldHost::new(&mut world);
        let index = host.add_particle_system("Body").unwrap();

        assert!(
            host.set_settings_field("Body", index, SettingsField::MaterialSlot, "Skin".into())
                .is_ok()
        );
        assert_eq!(
            host.set_settings_field("Body", index, SettingsField::MaterialSlot, "Fur".into()),
            Err(HostError::MaterialSlotNotFound {
                object: "Body".into(),
                slot: "Fur".into(),
            })
        );
        assert!(matches!(
            host.set_system_field("Body", index, SystemField::VertexGroupDensity, "Chin".into()),
            Err(HostError::VertexGroupNotFound { .. })
        ));
    }

    #[test]
    fn cloth_exists_only_with_dynamics() {
        let mut world = scene();
        let mut host = WorldHost::new(&mut world);
        let index = host.add_particle_system("Body").unwrap();

        assert!(matches!(
            host.set_cloth_field("Body", index, ClothField::Mass, HostValue::Float(0.001)),
            Err(HostError::NoCloth { .. })
        ));

        host.set_system_field("Body", index, SystemField::UseHairDynamics, true.into())
            .unwrap();
        host.set_cloth_field("Body", index, ClothField::Mass, HostValue::Float(0.001))
            .unwrap();
        host.set_system_field("Body", index, SystemField::UseHairDynamics, false.into())
            .unwrap();

        let mut query = world.query::<&ParticleSystems>();
        let systems = query.single(&world).unwrap();
        let system = &systems.0[index];
        assert!(system.active_cloth().is_none());
        assert_eq!(system.cloth.as_ref().map(|c| c.mass), Some(0.001));
    }

    #[test]
    fn point_cache_writes_hit_the_latest_entry() {
        let mut world = scene();
        let mut host = WorldHost::new(&mut world);
        let first = host.add_particle_system("Body").unwrap();
        host.set_point_cache_field("Body", first, PointCacheField::Name, "Body".into())
            .unwrap();
        let second = host.add_particle_system("Body").unwrap();
        host.set_point_cache_field("Body", second, PointCacheField::Compression, "HEAVY".into())
            .unwrap();

        assert_eq!(host.cache_names("Body").unwrap(), vec!["Body".to_string(), String::new()]);
        assert!(matches!(
            host.set_point_cache_field("Body", second, PointCacheField::Compression, "ZIP".into()),
            Err(HostError::InvalidValue { .. })
        ));
    }
}
