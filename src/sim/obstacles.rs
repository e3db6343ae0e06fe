//! Obstacle lifecycle: collision checks, pruning and spawning
//!
//! The field listens for `frame-complete`. Each pass tests the avatar
//! against every live obstacle, drops obstacles that have left the arena and
//! spawns a new one when the spawn interval has elapsed.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{Aabb, Entity, Obstacle};
use crate::events::{EventBus, GameEnd, GameEvent, Handler, handler, topics};
use crate::settings::ObstacleTier;

/// Live obstacle set plus spawn bookkeeping
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    tier: ObstacleTier,
    rng: Pcg32,
    since_spawn: f32,
    next_id: u32,
    bus: Weak<EventBus>,
}

impl ObstacleField {
    pub fn new(tier: ObstacleTier, seed: u64, bus: &Rc<EventBus>) -> Self {
        Self {
            obstacles: Vec::new(),
            tier,
            rng: Pcg32::seed_from_u64(seed),
            since_spawn: 0.0,
            next_id: 1,
            bus: Rc::downgrade(bus),
        }
    }

    /// Subscribe `field` to `frame-complete` on `bus`. The returned handler
    /// can be used to unsubscribe.
    pub fn attach(field: &Rc<RefCell<Self>>, bus: &EventBus) -> Handler<GameEvent> {
        let field = Rc::downgrade(field);
        let on_frame = handler(move |event: Option<&GameEvent>| {
            let Some(GameEvent::FrameComplete { frame, dt, avatar }) = event else {
                return;
            };
            let Some(field) = field.upgrade() else {
                return;
            };
            // Game-over subscribers may borrow the field; publish unborrowed
            let (end, bus) = {
                let mut field = field.borrow_mut();
                (field.on_frame(*frame, *dt, avatar), field.bus.upgrade())
            };
            if let (Some(end), Some(bus)) = (end, bus) {
                bus.publish(topics::GAME_OVER, Some(&GameEvent::GameOver(end)));
            }
        });
        bus.subscribe(topics::FRAME_COMPLETE, on_frame.clone());
        on_frame
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Move every obstacle. Obstacles are never clamped.
    pub fn advance_all(&mut self, dt: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.advance(dt);
        }
    }

    /// Add an obstacle directly (used for scripted setups)
    pub fn insert(&mut self, mut obstacle: Obstacle) {
        obstacle.id = self.next_entity_id();
        self.obstacles.push(obstacle);
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.since_spawn = 0.0;
    }

    /// One lifecycle pass. Returns the game end on a collision, which the
    /// `frame-complete` handler publishes as `game-over`.
    pub fn on_frame(&mut self, frame: u64, dt: f32, avatar: &Aabb) -> Option<GameEnd> {
        if let Some(hit) = self.obstacles.iter().find(|o| o.bounds().overlaps(avatar)) {
            log::info!("Avatar hit by obstacle {} on frame {frame}", hit.id);
            return Some(GameEnd::Collision);
        }

        let before = self.obstacles.len();
        self.obstacles.retain(|o| !o.has_left_arena());
        let pruned = before - self.obstacles.len();
        if pruned > 0 {
            log::trace!("Pruned {pruned} obstacles");
        }

        self.since_spawn += dt;
        if frame == 1 || self.since_spawn >= self.tier.spawn_interval_seconds {
            self.since_spawn = 0.0;
            self.spawn();
        }
        None
    }

    fn spawn(&mut self) {
        let id = self.next_entity_id();
        let obstacle = Obstacle::spawn(id, None, &self.tier, &mut self.rng);
        log::trace!("Spawned obstacle {id} heading {:?}", obstacle.direction);
        self.obstacles.push(obstacle);
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
