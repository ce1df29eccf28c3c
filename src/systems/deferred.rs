//! Deferred action drain.

use bevy_ecs::prelude::*;

use crate::resources::deferred::DeferredActions;

/// Run every action queued in [`DeferredActions`], oldest first.
///
/// The queue is taken before anything runs, so actions queued by these
/// actions wait for the next call. Returns the number of actions run.
pub fn drain_deferred_actions(world: &mut World) -> usize {
    let actions = match world.get_resource_mut::<DeferredActions>() {
        Some(mut queue) => queue.take(),
        None => return 0,
    };
    let count = actions.len();
    if count > 0 {
        log::debug!("running {count} deferred actions");
    }
    for action in actions {
        action(world);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Resource, Default)]
    struct Trace(Vec<&'static str>);

    #[test]
    fn test_drain_runs_in_order() {
        let mut world = World::new();
        world.init_resource::<Trace>();
        let mut queue = DeferredActions::default();
        queue.defer(|w| w.resource_mut::<Trace>().0.push("a"));
        queue.defer(|w| w.resource_mut::<Trace>().0.push("b"));
        world.insert_resource(queue);

        assert_eq!(drain_deferred_actions(&mut world), 2);
        assert_eq!(world.resource::<Trace>().0, vec!["a", "b"]);
        assert!(world.resource::<DeferredActions>().is_empty());
    }

    #[test]
    fn test_actions_queued_while_draining_wait() {
        let mut world = World::new();
        world.init_resource::<Trace>();
        let mut queue = DeferredActions::default();
        queue.defer(|w| {
            w.resource_mut::<Trace>().0.push("first");
            w.resource_mut::<DeferredActions>()
                .defer(|w| w.resource_mut::<Trace>().0.push("second"));
        });
        world.insert_resource(queue);

        drain_deferred_actions(&mut world);
        assert_eq!(world.resource::<Trace>().0, vec!["first"]);
        assert_eq!(world.resource::<DeferredActions>().len(), 1);

        drain_deferred_actions(&mut world);
        assert_eq!(world.resource::<Trace>().0, vec!["first", "second"]);
    }

    #[test]
    fn test_drain_without_queue_is_noop() {
        let mut world = World::new();
        assert_eq!(drain_deferred_actions(&mut world), 0);
    }
}
