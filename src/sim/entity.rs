//! Entities and the registry that owns them
//!
//! The registry is an arena: every live entity sits in a per-kind vector
//! sorted by `EntityId`. Other systems refer to entities only by ID.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::config::GameConfig;

/// Stable, opaque entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Bird,
    Obstacle,
    Item,
    Ground,
    /// Decorative, never collides
    Cloud,
}

/// Collision capability tag carried by every collidable region
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Bird,
    Ground,
    Obstacle,
    ScoreTrigger,
    ItemTrigger,
}

impl Category {
    /// Trigger regions only notify; they never push anything
    pub fn is_trigger(self) -> bool {
        matches!(self, Category::ScoreTrigger | Category::ItemTrigger)
    }
}

/// Small set of categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategorySet {
    members: [bool; 5],
}

impl CategorySet {
    pub const fn empty() -> Self {
        Self {
            members: [false; 5],
        }
    }

    pub fn of(categories: &[Category]) -> Self {
        categories.iter().copied().collect()
    }

    pub fn contains(&self, category: Category) -> bool {
        self.members[category as usize]
    }

    pub fn insert(&mut self, category: Category) {
        self.members[category as usize] = true;
    }

}

impl FromIterator<Category> for CategorySet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut set = Self::empty();
        for category in iter {
            set.insert(category);
        }
        set
    }
}

/// Categories that physically stop the bird during a run
pub fn bird_default_response() -> CategorySet {
    CategorySet::of(&[Category::Ground, Category::Obstacle])
}

/// The single player-controlled entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bird {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Radians, counter-clockwise
    pub rotation: f32,
    pub radius: f32,
    pub alive: bool,
    /// Categories the bird bounces off (others pass through)
    pub response: CategorySet,
    /// Speed of the bird's own animations; 0 once the game-over roll ends
    pub speed: f32,
    /// Rotation reached when the roll finishes
    pub roll_target: f32,
    /// Radians per second while rolling
    pub roll_rate: f32,
}

impl Bird {
    pub fn new(id: EntityId, config: &GameConfig) -> Self {
        Self {
            id,
            pos: config.bird_start(),
            vel: Vec2::ZERO,
            rotation: 0.0,
            radius: config.bird_radius,
            alive: true,
            response: bird_default_response(),
            speed: 1.0,
            roll_target: 0.0,
            roll_rate: 0.0,
        }
    }

    /// Return to the start of a run, keeping the ID
    pub fn reset(&mut self, config: &GameConfig) {
        *self = Self::new(self.id, config);
    }

    /// Replace any velocity with a straight upward kick
    pub fn flap(&mut self, flap_velocity: f32) {
        self.vel = Vec2::ZERO;
        self.vel.y += flap_velocity;
    }

    /// Semi-implicit Euler step under gravity
    pub fn integrate(&mut self, gravity: f32, dt: f32) {
        self.vel.y -= gravity * dt;
        self.pos += self.vel * dt;
    }

    /// Whether the game-over roll has finished
    pub fn is_settled(&self) -> bool {
        self.speed == 0.0
    }

    pub fn extent(&self) -> Vec2 {
        Vec2::splat(self.radius * 2.0)
    }
}

/// Two solid segments with a passable gap and a score trigger inside it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstaclePair {
    pub id: EntityId,
    /// Horizontal center
    pub x: f32,
    pub vel_x: f32,
    pub gap_center: f32,
    pub gap_height: f32,
    pub width: f32,
    /// Top of the upper segment (screen height)
    pub top: f32,
}

impl ObstaclePair {
    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_center - self.gap_height / 2.0
    }

    #[inline]
    pub fn gap_top(&self) -> f32 {
        self.gap_center + self.gap_height / 2.0
    }

    /// Lower segment, from the bottom of the screen up to the gap
    pub fn lower(&self) -> Rect {
        Rect::new(
            Vec2::new(self.x - self.width / 2.0, 0.0),
            Vec2::new(self.x + self.width / 2.0, self.gap_bottom()),
        )
    }

    /// Upper segment, from the gap to the top of the screen
    pub fn upper(&self) -> Rect {
        Rect::new(
            Vec2::new(self.x - self.width / 2.0, self.gap_top()),
            Vec2::new(self.x + self.width / 2.0, self.top),
        )
    }

    /// Intangible region filling the gap
    pub fn score_trigger(&self) -> Rect {
        Rect::new(
            Vec2::new(self.x - self.width / 2.0, self.gap_bottom()),
            Vec2::new(self.x + self.width / 2.0, self.gap_top()),
        )
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.gap_center)
    }

    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.width, self.top)
    }
}

/// Collectible bonus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: EntityId,
    /// Origin of the item's container, starts just past the right edge
    pub anchor_x: f32,
    pub vel_x: f32,
    /// Drawn position relative to the container
    pub offset: Vec2,
    pub size: f32,
}

impl Item {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.anchor_x + self.offset.x, self.offset.y)
    }

    /// Pickup trigger, coincident with the visual bounds
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.pos(), Vec2::splat(self.size))
    }
}

/// Static ground tile, scrolled visually by the ground layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundSegment {
    pub id: EntityId,
    /// Center x with zero scroll
    pub base_x: f32,
    pub width: f32,
    pub height: f32,
}

impl GroundSegment {
    pub fn bounds(&self, scroll: f32) -> Rect {
        Rect::from_center_size(
            Vec2::new(self.base_x - scroll, self.height / 2.0),
            Vec2::new(self.width, self.height),
        )
    }
}

/// Background cloud tile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub id: EntityId,
    pub base_x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Cloud {
    pub fn pos(&self, scroll: f32) -> Vec2 {
        Vec2::new(self.base_x - scroll, self.y)
    }
}

/// Endless left scroll of a tiled layer: one tile per period, then wrap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scroller {
    pub offset: f32,
    pub tile_width: f32,
    pub period_secs: f32,
}

impl Scroller {
    pub fn new(tile_width: f32, period_secs: f32) -> Self {
        Self {
            offset: 0.0,
            tile_width,
            period_secs,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.offset += self.tile_width / self.period_secs * dt;
        self.offset = self.offset.rem_euclid(self.tile_width);
    }

    pub fn reset(&mut self) {
        self.offset = 0.0;
    }
}

/// Identifies one collidable region of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegionId {
    pub owner: EntityId,
    pub part: u8,
}

/// Collidable region exposed to contact detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub id: RegionId,
    pub category: Category,
    pub rect: Rect,
}

/// Owner of every live entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    pub bird: Bird,
    obstacles: Vec<ObstaclePair>,
    items: Vec<Item>,
    ground: Vec<GroundSegment>,
    clouds: Vec<Cloud>,
    pub ground_scroll: Scroller,
    pub cloud_scroll: Scroller,
    next_id: u32,
}

impl Registry {
    /// Build the static scene: bird, ground tiles and clouds
    pub fn new(config: &GameConfig) -> Self {
        let mut registry = Self {
            bird: Bird::new(EntityId(0), config),
            obstacles: Vec::new(),
            items: Vec::new(),
            ground: Vec::new(),
            clouds: Vec::new(),
            ground_scroll: Scroller::new(config.ground_tile_width, config.ground_scroll_secs),
            cloud_scroll: Scroller::new(config.cloud_tile_width, config.cloud_scroll_secs),
            next_id: 1,
        };

        registry.bird.id = registry.next_entity_id();

        for i in 0..config.ground_tile_count() {
            let id = registry.next_entity_id();
            registry.ground.push(GroundSegment {
                id,
                base_x: config.ground_tile_width * (i as f32 + 0.5),
                width: config.ground_tile_width,
                height: config.ground_height,
            });
        }

        for i in 0..config.cloud_tile_count() {
            let id = registry.next_entity_id();
            registry.clouds.push(Cloud {
                id,
                base_x: config.cloud_tile_width * (i as f32 + 0.5),
                y: config.screen_height - config.cloud_tile_height / 2.0,
                width: config.cloud_tile_width,
                height: config.cloud_tile_height,
            });
        }

        registry
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn obstacles(&self) -> &[ObstaclePair] {
        &self.obstacles
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn ground(&self) -> &[GroundSegment] {
        &self.ground
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    pub fn obstacle(&self, id: EntityId) -> Option<&ObstaclePair> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn item(&self, id: EntityId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn insert_obstacle(&mut self, pair: ObstaclePair) {
        self.obstacles.push(pair);
        self.obstacles.sort_by_key(|o| o.id);
    }

    pub fn insert_item(&mut self, item: Item) {
        self.items.push(item);
        self.items.sort_by_key(|i| i.id);
    }

    /// Kind of a live entity
    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        if self.bird.id == id {
            Some(EntityKind::Bird)
        } else if self.obstacles.iter().any(|o| o.id == id) {
            Some(EntityKind::Obstacle)
        } else if self.items.iter().any(|i| i.id == id) {
            Some(EntityKind::Item)
        } else if self.ground.iter().any(|g| g.id == id) {
            Some(EntityKind::Ground)
        } else if self.clouds.iter().any(|c| c.id == id) {
            Some(EntityKind::Cloud)
        } else {
            None
        }
    }

    /// Remove a spawned entity; the bird and static scenery are never removed
    pub fn remove(&mut self, id: EntityId) -> Option<EntityKind> {
        if let Some(idx) = self.obstacles.iter().position(|o| o.id == id) {
            self.obstacles.remove(idx);
            return Some(EntityKind::Obstacle);
        }
        if let Some(idx) = self.items.iter().position(|i| i.id == id) {
            self.items.remove(idx);
            return Some(EntityKind::Item);
        }
        None
    }

    /// Remove every obstacle pair, returning their IDs
    pub fn clear_obstacles(&mut self) -> Vec<EntityId> {
        self.obstacles.drain(..).map(|o| o.id).collect()
    }

    /// Remove every item, returning their IDs
    pub fn clear_items(&mut self) -> Vec<EntityId> {
        self.items.drain(..).map(|i| i.id).collect()
    }

    /// Move scrolling entities by their velocity
    pub fn advance_world(&mut self, dt: f32) {
        for pair in &mut self.obstacles {
            pair.x += pair.vel_x * dt;
        }
        for item in &mut self.items {
            item.anchor_x += item.vel_x * dt;
        }
        self.ground_scroll.advance(dt);
        self.cloud_scroll.advance(dt);
    }

    /// All collidable regions except the bird, in stable ID order
    pub fn regions(&self) -> Vec<Region> {
        let mut regions =
            Vec::with_capacity(self.ground.len() + self.obstacles.len() * 3 + self.items.len());

        for segment in &self.ground {
            regions.push(Region {
                id: RegionId {
                    owner: segment.id,
                    part: 0,
                },
                category: Category::Ground,
                rect: segment.bounds(self.ground_scroll.offset),
            });
        }

        for pair in &self.obstacles {
            let parts = [
                (Category::Obstacle, pair.lower()),
                (Category::Obstacle, pair.upper()),
                (Category::ScoreTrigger, pair.score_trigger()),
            ];
            for (part, (category, rect)) in parts.into_iter().enumerate() {
                regions.push(Region {
                    id: RegionId {
                        owner: pair.id,
                        part: part as u8,
                    },
                    category,
                    rect,
                });
            }
        }

        for item in &self.items {
            regions.push(Region {
                id: RegionId {
                    owner: item.id,
                    part: 0,
                },
                category: Category::ItemTrigger,
                rect: item.bounds(),
            });
        }

        regions.sort_by_key(|r| r.id);
        regions
    }
}
