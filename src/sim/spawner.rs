//! Obstacle and item spawners
//!
//! Both are repeating world timers: they fire as soon as they are armed and
//! then once per interval. Every spawned entity gets a one-shot despawn
//! timer for its travel time, so removal is time-based, never a bounds
//! check.

use glam::Vec2;

use super::entity::{EntityId, EntityKind, Item, ObstaclePair};
use super::event::GameEvent;
use super::geom::{uniform_in_band, uniform_in_box};
use super::state::GameState;
use super::timer::{Clock, TimerKind};
use crate::persistence::BestScoreStore;

pub fn arm_obstacle_spawner<S: BestScoreStore>(state: &mut GameState<S>) {
    state.scheduler.cancel(TimerKind::SpawnObstacle);
    state.scheduler.repeat_now(
        TimerKind::SpawnObstacle,
        Clock::World,
        state.config.obstacle_interval_secs,
    );
}

pub fn arm_item_spawner<S: BestScoreStore>(state: &mut GameState<S>) {
    state.scheduler.cancel(TimerKind::SpawnItem);
    state.scheduler.repeat_now(
        TimerKind::SpawnItem,
        Clock::World,
        state.config.item_interval_secs,
    );
}

/// Spawn a pair with a random gap center around mid-screen
pub fn spawn_obstacle<S: BestScoreStore>(state: &mut GameState<S>) -> EntityId {
    let gap_center = uniform_in_band(
        &mut state.rng,
        state.config.center_y(),
        state.config.gap_band(),
    );
    spawn_obstacle_with_gap(state, gap_center)
}

/// Spawn a pair just past the right edge with the given gap center
pub fn spawn_obstacle_with_gap<S: BestScoreStore>(
    state: &mut GameState<S>,
    gap_center: f32,
) -> EntityId {
    let config = &state.config;
    let id = state.registry.next_entity_id();
    let pair = ObstaclePair {
        id,
        x: config.screen_width + config.obstacle_width / 2.0,
        vel_x: -config.obstacle_speed(),
        gap_center,
        gap_height: config.gap_height(),
        width: config.obstacle_width,
        top: config.screen_height,
    };
    let travel = config.obstacle_travel_secs;

    log::debug!("Spawned obstacle {} (gap center {:.1})", id, gap_center);
    let created = GameEvent::EntityCreated {
        id,
        kind: EntityKind::Obstacle,
        pos: pair.pos(),
        extent: pair.extent(),
    };
    state.registry.insert_obstacle(pair);
    state
        .scheduler
        .once(TimerKind::Despawn(id), Clock::World, travel);
    state.emit(created);
    id
}

/// Spawn an item with a random offset in the middle half of the screen
pub fn spawn_item<S: BestScoreStore>(state: &mut GameState<S>) -> EntityId {
    let config = &state.config;
    let center = Vec2::new(config.screen_width / 2.0, config.center_y());
    let range = Vec2::new(config.screen_width, config.screen_height) * config.item_spread_fraction;
    let offset = uniform_in_box(&mut state.rng, center, range);
    spawn_item_at(state, offset)
}

/// Spawn an item whose container starts just past the right edge
pub fn spawn_item_at<S: BestScoreStore>(state: &mut GameState<S>, offset: Vec2) -> EntityId {
    let config = &state.config;
    let id = state.registry.next_entity_id();
    let item = Item {
        id,
        anchor_x: config.screen_width + config.item_size / 2.0,
        vel_x: -config.item_speed(),
        offset,
        size: config.item_size,
    };
    let travel = config.item_travel_secs;

    log::debug!("Spawned item {} at {:?}", id, item.pos());
    let created = GameEvent::EntityCreated {
        id,
        kind: EntityKind::Item,
        pos: item.pos(),
        extent: Vec2::splat(item.size),
    };
    state.registry.insert_item(item);
    state
        .scheduler
        .once(TimerKind::Despawn(id), Clock::World, travel);
    state.emit(created);
    id
}

/// Drop every live item and restart the item schedule from now
pub fn restart_item_batch<S: BestScoreStore>(state: &mut GameState<S>) {
    let removed = state.registry.clear_items();
    log::debug!("Item batch reset ({} removed)", removed.len());
    for id in removed {
        state.scheduler.cancel_owned(id);
        state.emit(GameEvent::EntityRemoved { id });
    }
    arm_item_spawner(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::persistence::MemoryStore;
    use crate::sim::geom::Rect;
    use proptest::prelude::*;

    fn state_with_seed(seed: u64) -> GameState {
        let config = GameConfig {
            seed: Some(seed),
            ..Default::default()
        };
        GameState::new(config, MemoryStore::new()).unwrap()
    }

    #[test]
    fn test_obstacle_starts_off_screen_with_despawn_timer() {
        let mut state = state_with_seed(1);
        let id = spawn_obstacle(&mut state);
        let pair = state.registry.obstacle(id).unwrap();
        assert!(pair.x - pair.width / 2.0 >= state.config.screen_width);
        assert!(pair.vel_x < 0.0);
        assert_eq!(
            state.scheduler.remaining(TimerKind::Despawn(id)),
            Some(state.config.obstacle_travel_secs)
        );
    }

    #[test]
    fn test_obstacle_crosses_screen_in_travel_time() {
        let state = state_with_seed(1);
        let config = &state.config;
        let distance = config.obstacle_speed() * config.obstacle_travel_secs;
        assert!((distance - (config.screen_width + config.obstacle_width)).abs() < 1e-3);
    }

    #[test]
    fn test_restart_item_batch_clears_all_items() {
        let mut state = state_with_seed(2);
        let a = spawn_item(&mut state);
        let b = spawn_item(&mut state);
        state.drain_events();

        restart_item_batch(&mut state);

        assert!(state.registry.items().is_empty());
        assert!(!state.scheduler.is_pending(TimerKind::Despawn(a)));
        assert!(!state.scheduler.is_pending(TimerKind::Despawn(b)));
        assert_eq!(state.scheduler.remaining(TimerKind::SpawnItem), Some(0.0));
        let removed = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::EntityRemoved { .. }))
            .count();
        assert_eq!(removed, 2);
    }

    proptest! {
        #[test]
        fn prop_gap_center_within_band(seed in any::<u64>()) {
            let mut state = state_with_seed(seed);
            let h = state.config.screen_height;
            let range = h / 4.0;
            for _ in 0..8 {
                let id = spawn_obstacle(&mut state);
                let pair = state.registry.obstacle(id).unwrap();
                prop_assert!(pair.gap_center >= h / 2.0 - range / 2.0 - 1e-3);
                prop_assert!(pair.gap_center <= h / 2.0 + range / 2.0 + 1e-3);
                prop_assert!((pair.gap_height - h / 6.0).abs() < 1e-3);
                // Both segments fully within [0, H] and non-empty
                let column = Rect::new(
                    Vec2::new(pair.x - pair.width, 0.0),
                    Vec2::new(pair.x + pair.width, h),
                );
                for segment in [pair.lower(), pair.upper()] {
                    prop_assert!(column.contains_rect(&segment));
                    prop_assert!(segment.size().y > 0.0);
                }
            }
        }

        #[test]
        fn prop_item_offset_within_bands(seed in any::<u64>()) {
            let mut state = state_with_seed(seed);
            let w = state.config.screen_width;
            let h = state.config.screen_height;
            for _ in 0..8 {
                let id = spawn_item(&mut state);
                let item = state.registry.item(id).unwrap();
                prop_assert!(item.offset.x >= w / 4.0 - 1e-3 && item.offset.x <= 3.0 * w / 4.0 + 1e-3);
                prop_assert!(item.offset.y >= h / 4.0 - 1e-3 && item.offset.y <= 3.0 * h / 4.0 + 1e-3);
            }
        }
    }
}
