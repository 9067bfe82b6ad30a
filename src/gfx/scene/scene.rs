use std::collections::HashMap;

use crate::error::InitError;

use super::entity::{Entity, FrameContext, InitContext};
use super::light::Light;

/// Builds an uninitialized entity of a registered kind.
pub type EntityFactory = Box<dyn Fn() -> Box<dyn Entity>>;

/// Generational reference to an entity owned by a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    index: u32,
    generation: u32,
}

/// Generational reference to a light owned by a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightHandle {
    index: u32,
    generation: u32,
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot storage that reuses freed indices under a new generation.
struct Slots<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> Slots<T> {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    fn insert(&mut self, value: T) -> (u32, u32) {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation += 1;
            slot.value = Some(value);
            (index, slot.generation)
        } else {
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
            });
            ((self.slots.len() - 1) as u32, 0)
        }
    }

    fn get(&self, index: u32, generation: u32) -> Option<&T> {
        self.slots
            .get(index as usize)
            .filter(|s| s.generation == generation)
            .and_then(|s| s.value.as_ref())
    }

    fn get_mut(&mut self, index: u32, generation: u32) -> Option<&mut T> {
        self.slots
            .get_mut(index as usize)
            .filter(|s| s.generation == generation)
            .and_then(|s| s.value.as_mut())
    }

    fn remove(&mut self, index: u32, generation: u32) -> Option<T> {
        let slot = self
            .slots
            .get_mut(index as usize)
            .filter(|s| s.generation == generation)?;
        let value = slot.value.take()?;
        self.free.push(index);
        Some(value)
    }

    fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|s| s.value.as_ref())
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter_map(|s| s.value.as_mut())
    }

    fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

/// Entity and light registry.
///
/// Entity kinds are registered by name with a factory. Entities are only
/// inserted once their initialization succeeded, so a failed entity is never
/// reachable through a handle.
pub struct Scene {
    factories: HashMap<String, EntityFactory>,
    entities: Slots<Box<dyn Entity>>,
    lights: Slots<Light>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            entities: Slots::new(),
            lights: Slots::new(),
        }
    }

    /// Registers `factory` under `name`, replacing any previous registration.
    pub fn register_type(
        &mut self,
        name: &str,
        factory: impl Fn() -> Box<dyn Entity> + 'static,
    ) {
        self.factories.insert(name.to_string(), Box::new(factory));
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Builds and initializes an entity of the registered kind `type_name`.
    pub fn create(
        &mut self,
        type_name: &str,
        ctx: &mut InitContext<'_>,
    ) -> Result<EntityHandle, InitError> {
        let factory = self
            .factories
            .get(type_name)
            .ok_or_else(|| InitError::UnknownEntityType(type_name.to_string()))?;
        let entity = factory();
        self.insert(entity, ctx)
    }

    /// Initializes an already configured entity and takes ownership of it.
    pub fn insert(
        &mut self,
        mut entity: Box<dyn Entity>,
        ctx: &mut InitContext<'_>,
    ) -> Result<EntityHandle, InitError> {
        if let Err(err) = entity.initialize(ctx) {
            log::warn!("Failed to initialize `{}`: {}", entity.type_name(), err);
            return Err(err);
        }

        log::debug!("Created entity `{}`", entity.type_name());
        let (index, generation) = self.entities.insert(entity);
        Ok(EntityHandle { index, generation })
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&dyn Entity> {
        self.entities
            .get(handle.index, handle.generation)
            .map(|e| e.as_ref())
    }

    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut (dyn Entity + 'static)> {
        self.entities
            .get_mut(handle.index, handle.generation)
            .map(|e| e.as_mut())
    }

    /// Drops the entity and everything it owns. Returns false for stale handles.
    pub fn release(&mut self, handle: EntityHandle) -> bool {
        self.entities
            .remove(handle.index, handle.generation)
            .is_some()
    }

    pub fn entities(&self) -> impl Iterator<Item = &dyn Entity> {
        self.entities.iter().map(|e| e.as_ref())
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Updates every entity and returns how many reported a change.
    pub fn update(&mut self, frame: &FrameContext) -> usize {
        self.entities
            .iter_mut()
            .map(|e| e.update(frame))
            .filter(|&changed| changed)
            .count()
    }

    pub fn create_light(&mut self, light: Light) -> LightHandle {
        let (index, generation) = self.lights.insert(light);
        LightHandle { index, generation }
    }

    pub fn get_light(&self, handle: LightHandle) -> Option<&Light> {
        self.lights.get(handle.index, handle.generation)
    }

    pub fn get_light_mut(&mut self, handle: LightHandle) -> Option<&mut Light> {
        self.lights.get_mut(handle.index, handle.generation)
    }

    pub fn release_light(&mut self, handle: LightHandle) -> bool {
        self.lights.remove(handle.index, handle.generation).is_some()
    }

    /// Active lights, in creation order of their slots.
    pub fn lights(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    pub fn get_statistics(&self) -> SceneStatistics {
        SceneStatistics {
            entity_count: self.entity_count(),
            light_count: self.light_count(),
            registered_types: self.factories.len(),
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Scene statistics for logging and captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub entity_count: usize,
    pub light_count: usize,
    pub registered_types: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InitError, RenderError};
    use crate::gfx::device::headless::HeadlessDevice;
    use crate::gfx::resources::ResourceManager;
    use crate::gfx::scene::entity::PassContext;
    use cgmath::Vector3;

    struct Counter {
        fail: bool,
        ticks: u32,
    }

    impl Entity for Counter {
        fn type_name(&self) -> &'static str {
            "counter"
        }

        fn initialize(&mut self, _ctx: &mut InitContext<'_>) -> Result<(), InitError> {
            if self.fail {
                Err(InitError::InvalidParameter {
                    name: "fail",
                    reason: "asked to fail".into(),
                })
            } else {
                Ok(())
            }
        }

        fn update(&mut self, _frame: &FrameContext) -> bool {
            self.ticks += 1;
            self.ticks % 2 == 0
        }

        fn render(&self, _pass: &mut PassContext<'_>) -> Result<(), RenderError> {
            Ok(())
        }
    }

    #[test]
    fn test_create_registered_type() {
        let mut device = HeadlessDevice::new(8, 8);
        let mut resources = ResourceManager::new();
        let mut ctx = InitContext::new(&mut device, &mut resources);
        let mut scene = Scene::new();
        scene.register_type("counter", || Box::new(Counter { fail: false, ticks: 0 }));

        let handle = scene.create("counter", &mut ctx).unwrap();
        assert_eq!(scene.get(handle).unwrap().type_name(), "counter");
        assert!(matches!(
            scene.create("missing", &mut ctx),
            Err(InitError::UnknownEntityType(_))
        ));
    }

    #[test]
    fn test_failed_initialization_is_not_inserted() {
        let mut device = HeadlessDevice::new(8, 8);
        let mut resources = ResourceManager::new();
        let mut ctx = InitContext::new(&mut device, &mut resources);
        let mut scene = Scene::new();
        let result = scene.insert(Box::new(Counter { fail: true, ticks: 0 }), &mut ctx);
        assert!(result.is_err());
        assert_eq!(scene.entity_count(), 0);
    }

    #[test]
    fn test_stale_handles_are_rejected() {
        let mut device = HeadlessDevice::new(8, 8);
        let mut resources = ResourceManager::new();
        let mut ctx = InitContext::new(&mut device, &mut resources);
        let mut scene = Scene::new();
        let first = scene
            .insert(Box::new(Counter { fail: false, ticks: 0 }), &mut ctx)
            .unwrap();
        assert!(scene.release(first));
        assert!(!scene.release(first));

        let second = scene
            .insert(Box::new(Counter { fail: false, ticks: 0 }), &mut ctx)
            .unwrap();
        assert!(scene.get(first).is_none());
        assert!(scene.get(second).is_some());
        assert_eq!(scene.entity_count(), 1);
    }

    #[test]
    fn test_update_counts_changes() {
        let mut device = HeadlessDevice::new(8, 8);
        let mut resources = ResourceManager::new();
        let mut ctx = InitContext::new(&mut device, &mut resources);
        let mut scene = Scene::new();
        for _ in 0..3 {
            scene
                .insert(Box::new(Counter { fail: false, ticks: 0 }), &mut ctx)
                .unwrap();
        }
        let frame = FrameContext::default();
        assert_eq!(scene.update(&frame), 0);
        assert_eq!(scene.update(&frame), 3);
    }

    #[test]
    fn test_light_lifecycle() {
        let mut scene = Scene::new();
        let light = scene.create_light(Light::white(Vector3::new(0.0, 0.0, -1.0)));
        assert_eq!(scene.light_count(), 1);
        scene.get_light_mut(light).unwrap().position.x = 2.0;
        assert_eq!(scene.get_light(light).unwrap().position.x, 2.0);
        assert!(scene.release_light(light));
        assert!(scene.get_light(light).is_none());
        assert_eq!(scene.lights().count(), 0);
    }
}
