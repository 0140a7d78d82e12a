//! Contact detection, physical response and contact resolution
//!
//! Physics produces a queue of contact *begin* events (the bird started
//! touching a region it was not touching on the previous step). The
//! resolver drains that queue at the end of the tick and classifies each
//! contact by category:
//!
//! 1. score trigger: +1 score, maybe a new best
//! 2. item trigger: +1 item score, pickup cue, item batch reset
//! 3. anything else: terminal collision, the run ends
//!
//! Only `Playing` resolves contacts, so a finished run can't end twice.

use std::collections::BTreeSet;
use std::f32::consts::PI;

use super::entity::{Bird, Category, CategorySet, Region, RegionId};
use super::event::{Cue, GameEvent};
use super::spawner;
use super::state::{GamePhase, GameState};
use super::timer::{Clock, TimerKind};
use crate::consts::CONTACT_SLOP;
use crate::persistence::BestScoreStore;

/// One participant of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactSide {
    pub region: RegionId,
    pub category: Category,
}

/// A contact begin between two regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: ContactSide,
    pub b: ContactSide,
}

impl Contact {
    /// Whether either side carries `category`
    pub fn involves(&self, category: Category) -> bool {
        self.a.category == category || self.b.category == category
    }
}

/// Push the bird out of every solid region it bounces off
///
/// Velocity into the surface is removed, so resting on the ground is stable.
pub fn respond(bird: &mut Bird, regions: &[Region]) {
    for region in regions {
        if region.category.is_trigger() || !bird.response.contains(region.category) {
            continue;
        }
        if let Some(push) = region.rect.circle_push_out(bird.pos, bird.radius) {
            bird.pos += push;
            let normal = push.normalize_or_zero();
            let into = bird.vel.dot(normal);
            if into < 0.0 {
                bird.vel -= normal * into;
            }
        }
    }
}

/// Find regions the bird started touching since the last step
///
/// A contact begins only on a real touch. Once begun it lasts until the bird
/// is more than `CONTACT_SLOP` away, so resting contacts don't flicker.
/// `touching` is replaced by the regions touched now.
pub fn detect_contacts(
    bird: &Bird,
    regions: &[Region],
    touching: &mut BTreeSet<RegionId>,
) -> Vec<Contact> {
    let bird_side = ContactSide {
        region: RegionId {
            owner: bird.id,
            part: 0,
        },
        category: Category::Bird,
    };

    let mut now = BTreeSet::new();
    let mut contacts = Vec::new();
    for region in regions {
        let was_touching = touching.contains(&region.id);
        let slop = if was_touching { CONTACT_SLOP } else { 0.0 };
        if !region.rect.touches_circle(bird.pos, bird.radius, slop) {
            continue;
        }
        now.insert(region.id);
        if !was_touching {
            contacts.push(Contact {
                a: bird_side,
                b: ContactSide {
                    region: region.id,
                    category: region.category,
                },
            });
        }
    }

    *touching = now;
    contacts
}

/// Resolve every queued contact in detection order
///
/// Contacts whose region owner was destroyed earlier in the drain (an item
/// batch reset, say) are dropped.
pub fn drain_contacts<S: BestScoreStore>(state: &mut GameState<S>) {
    let contacts = std::mem::take(&mut state.contacts);
    for contact in &contacts {
        let live = [contact.a, contact.b]
            .iter()
            .all(|side| state.registry.kind_of(side.region.owner).is_some());
        if !live {
            log::trace!("Dropping contact with a removed entity: {:?}", contact);
            continue;
        }
        resolve_contact(state, contact);
    }
}

/// Apply the effect of a single contact
pub fn resolve_contact<S: BestScoreStore>(state: &mut GameState<S>, contact: &Contact) {
    if state.phase != GamePhase::Playing {
        return;
    }

    if contact.involves(Category::ScoreTrigger) {
        if state.scores.record_pass() {
            log::info!("New best score: {}", state.scores.best_score());
        }
        log::debug!("Score up ({})", state.scores.score());
        state.emit_score();
    } else if contact.involves(Category::ItemTrigger) {
        state.scores.record_pickup();
        log::debug!("Item collected ({})", state.scores.item_score());
        state.emit(GameEvent::PlayCue(Cue::Pickup));
        state.emit_score();
        spawner::restart_item_batch(state);
    } else {
        terminal_collision(state);
    }
}

/// End the run: freeze the world and start the bird's roll
fn terminal_collision<S: BestScoreStore>(state: &mut GameState<S>) {
    log::info!(
        "Game over (score {}, items {})",
        state.scores.score(),
        state.scores.item_score()
    );
    state.emit(GameEvent::PlayCue(Cue::Terminal));
    state.emit(GameEvent::StopMusic);

    state.run_speed = 0.0;

    let roll_secs = state.config.roll_secs;
    let roll_factor = state.config.roll_factor;
    let bird = &mut state.registry.bird;
    bird.alive = false;
    bird.response = CategorySet::of(&[Category::Ground]);

    let angle = PI * bird.pos.y * roll_factor;
    bird.roll_target = bird.rotation + angle;
    bird.roll_rate = angle / roll_secs;
    state.scheduler.cancel(TimerKind::BirdRoll);
    state.scheduler.once(TimerKind::BirdRoll, Clock::Bird, roll_secs);

    state.set_phase(GamePhase::GameOver);
}

/// Rotation of a rolling bird given the time left on its roll
pub fn roll_rotation(bird: &Bird, remaining: f32) -> f32 {
    bird.roll_target - bird.roll_rate * remaining.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::persistence::MemoryStore;
    use crate::sim::entity::{EntityId, bird_default_response};
    use crate::sim::geom::Rect;
    use glam::Vec2;

    fn bird_at(pos: Vec2) -> Bird {
        let mut bird = Bird::new(EntityId(1), &GameConfig::default());
        bird.pos = pos;
        bird
    }

    fn region(owner: u32, category: Category, rect: Rect) -> Region {
        Region {
            id: RegionId {
                owner: EntityId(owner),
                part: 0,
            },
            category,
            rect,
        }
    }

    fn contact_with(category: Category) -> Contact {
        Contact {
            a: ContactSide {
                region: RegionId {
                    owner: EntityId(1),
                    part: 0,
                },
                category: Category::Bird,
            },
            b: ContactSide {
                region: RegionId {
                    owner: EntityId(50),
                    part: 0,
                },
                category,
            },
        }
    }

    fn playing_state() -> GameState {
        let config = GameConfig {
            seed: Some(3),
            ..Default::default()
        };
        let mut state = GameState::new(config, MemoryStore::new()).unwrap();
        state.activate();
        state.drain_events();
        state
    }

    #[test]
    fn test_contact_reported_once_while_touching() {
        let bird = bird_at(Vec2::new(50.0, 50.0));
        let regions = [region(
            9,
            Category::ScoreTrigger,
            Rect::new(Vec2::new(40.0, 0.0), Vec2::new(60.0, 100.0)),
        )];
        let mut touching = BTreeSet::new();

        assert_eq!(detect_contacts(&bird, &regions, &mut touching).len(), 1);
        assert!(detect_contacts(&bird, &regions, &mut touching).is_empty());

        // Leave and re-enter
        let away = bird_at(Vec2::new(200.0, 50.0));
        assert!(detect_contacts(&away, &regions, &mut touching).is_empty());
        assert!(touching.is_empty());
        assert_eq!(detect_contacts(&bird, &regions, &mut touching).len(), 1);
    }

    #[test]
    fn test_near_miss_does_not_begin_contact() {
        let wall = [region(
            9,
            Category::Obstacle,
            Rect::new(Vec2::new(40.0, 0.0), Vec2::new(60.0, 100.0)),
        )];
        let mut touching = BTreeSet::new();

        // 0.3 px clear of the left face
        let bird = bird_at(Vec2::new(40.0 - 12.3, 50.0));
        assert!(detect_contacts(&bird, &wall, &mut touching).is_empty());
        assert!(touching.is_empty());

        // Real touch begins the contact
        let bird = bird_at(Vec2::new(40.0 - 11.9, 50.0));
        assert_eq!(detect_contacts(&bird, &wall, &mut touching).len(), 1);

        // Drifting back within the slop keeps it without a new begin
        let bird = bird_at(Vec2::new(40.0 - 12.3, 50.0));
        assert!(detect_contacts(&bird, &wall, &mut touching).is_empty());
        assert_eq!(touching.len(), 1);

        // Past the slop it ends
        let bird = bird_at(Vec2::new(40.0 - 13.0, 50.0));
        assert!(detect_contacts(&bird, &wall, &mut touching).is_empty());
        assert!(touching.is_empty());
    }

    #[test]
    fn test_respond_rests_on_ground() {
        let mut bird = bird_at(Vec2::new(50.0, 105.0));
        bird.vel = Vec2::new(0.0, -200.0);
        let ground = [region(
            2,
            Category::Ground,
            Rect::new(Vec2::new(0.0, 0.0), Vec2::new(400.0, 100.0)),
        )];
        respond(&mut bird, &ground);
        assert!((bird.pos.y - (100.0 + bird.radius)).abs() < 1e-4);
        assert_eq!(bird.vel.y, 0.0);
    }

    #[test]
    fn test_respond_ignores_categories_outside_mask() {
        let mut bird = bird_at(Vec2::new(50.0, 50.0));
        bird.response = CategorySet::of(&[Category::Ground]);
        let wall = [region(
            7,
            Category::Obstacle,
            Rect::new(Vec2::new(40.0, 0.0), Vec2::new(60.0, 100.0)),
        )];
        respond(&mut bird, &wall);
        assert_eq!(bird.pos, Vec2::new(50.0, 50.0));

        bird.response = bird_default_response();
        respond(&mut bird, &wall);
        assert_ne!(bird.pos, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_score_trigger_increments_score() {
        let mut state = playing_state();
        resolve_contact(&mut state, &contact_with(Category::ScoreTrigger));
        assert_eq!(state.scores.score(), 1);
        assert_eq!(state.scores.best_score(), 1);
        assert_eq!(state.scores.store().writes(), 1);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_score_priority_over_item() {
        let mut state = playing_state();
        let contact = Contact {
            a: contact_with(Category::ItemTrigger).b,
            b: contact_with(Category::ScoreTrigger).b,
        };
        resolve_contact(&mut state, &contact);
        assert_eq!(state.scores.score(), 1);
        assert_eq!(state.scores.item_score(), 0);
    }

    #[test]
    fn test_terminal_collision_freezes_world() {
        let mut state = playing_state();
        let y = state.registry.bird.pos.y;
        resolve_contact(&mut state, &contact_with(Category::Obstacle));

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.run_speed, 0.0);
        let bird = &state.registry.bird;
        assert!(!bird.alive);
        assert!(bird.response.contains(Category::Ground));
        assert!(!bird.response.contains(Category::Obstacle));
        assert!((bird.roll_target - PI * y * 0.01).abs() < 1e-3);
        assert!(state.scheduler.is_pending(TimerKind::BirdRoll));

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::PlayCue(Cue::Terminal)));
        assert!(events.contains(&GameEvent::StopMusic));
        assert!(events.contains(&GameEvent::RunStateChanged(GamePhase::GameOver)));
    }

    #[test]
    fn test_contacts_ignored_after_game_over() {
        let mut state = playing_state();
        resolve_contact(&mut state, &contact_with(Category::Ground));
        state.drain_events();

        resolve_contact(&mut state, &contact_with(Category::Ground));
        resolve_contact(&mut state, &contact_with(Category::ScoreTrigger));
        resolve_contact(&mut state, &contact_with(Category::ItemTrigger));

        assert_eq!(state.scores.score(), 0);
        assert_eq!(state.scores.item_score(), 0);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_roll_rotation_interpolates() {
        let mut bird = bird_at(Vec2::new(0.0, 100.0));
        bird.roll_target = 2.0;
        bird.roll_rate = 2.0;
        assert!((roll_rotation(&bird, 1.0) - 0.0).abs() < 1e-6);
        assert!((roll_rotation(&bird, 0.25) - 1.5).abs() < 1e-6);
        assert!((roll_rotation(&bird, -0.1) - 2.0).abs() < 1e-6);
    }
}
