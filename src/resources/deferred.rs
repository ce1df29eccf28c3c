//! End-of-tick deferred actions.
//!
//! Frame actions and systems run while entities are being iterated, so
//! anything that spawns, despawns or switches animations on other entities
//! is queued here instead. [`Game::tick`](crate::game::Game::tick) drains the
//! queue once per host frame, after every timeline has advanced.

use bevy_ecs::prelude::{Resource, World};

/// Work to run against the world after the current tick.
pub type DeferredAction = Box<dyn FnOnce(&mut World) + Send + Sync>;

#[derive(Resource, Default)]
pub struct DeferredActions {
    queue: Vec<DeferredAction>,
}

impl DeferredActions {
    /// Queue `action` for the end of the tick.
    pub fn defer(&mut self, action: impl FnOnce(&mut World) + Send + Sync + 'static) {
        self.queue.push(Box::new(action));
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Take every queued action, oldest first.
    pub fn take(&mut self) -> Vec<DeferredAction> {
        std::mem::take(&mut self.queue)
    }
}

impl std::fmt::Debug for DeferredActions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredActions")
            .field("queued", &self.queue.len())
            .finish()
    }
}
