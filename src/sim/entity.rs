//! Continuous-time bodies: the player avatar and obstacles
//!
//! Positions are the top-left corner of the body in arena space (y grows
//! downward). Velocities are in units per second.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::ObstacleTier;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// Overlap test. Boxes are disjoint only when one lies strictly above,
    /// below, left of or right of the other, so touching edges overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min, self.max());
        let (b_min, b_max) = (other.min, other.max());

        !(a_max.y < b_min.y || a_min.y > b_max.y || a_max.x < b_min.x || a_min.x > b_max.x)
    }

    /// True once the box lies entirely outside the arena on some side
    pub fn is_outside_arena(&self) -> bool {
        let max = self.max();
        max.x <= 0.0 || self.min.x >= ARENA_SIZE || max.y <= 0.0 || self.min.y >= ARENA_SIZE
    }
}

/// Shared interface for simulated bodies
pub trait Entity {
    /// Top-left corner
    fn position(&self) -> Vec2;
    fn size(&self) -> Vec2;
    /// Apply velocity for `dt` seconds
    fn advance(&mut self, dt: f32);

    fn bounds(&self) -> Aabb {
        Aabb::new(self.position(), self.size())
    }

    fn intersects(&self, other: &dyn Entity) -> bool {
        self.bounds().overlaps(&other.bounds())
    }
}

/// The player-controlled square
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    pub pos: Vec2,
    pub size: f32,
    pub vel: Vec2,
    pub speed: f32,
}

impl Default for Avatar {
    fn default() -> Self {
        // Start centered on the middle cell
        let start = (ARENA_SIZE - AVATAR_SIZE) / 2.0;
        Self {
            pos: Vec2::splat(start),
            size: AVATAR_SIZE,
            vel: Vec2::ZERO,
            speed: AVATAR_SPEED,
        }
    }
}

impl Avatar {
    /// Set velocity from held movement keys. With both keys of an axis held,
    /// right/down win.
    pub fn steer(&mut self, left: bool, right: bool, up: bool, down: bool) {
        self.vel = Vec2::ZERO;
        if left {
            self.vel.x = -self.speed;
        }
        if right {
            self.vel.x = self.speed;
        }
        if up {
            self.vel.y = -self.speed;
        }
        if down {
            self.vel.y = self.speed;
        }
    }

    /// Keep the whole avatar inside the arena
    pub fn clamp_to_arena(&mut self) {
        let max = ARENA_SIZE - self.size;
        self.pos = self.pos.clamp(Vec2::ZERO, Vec2::splat(max));
    }

    /// Center point, which decides the avatar's current cell
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }
}

impl Entity for Avatar {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        Vec2::splat(self.size)
    }

    fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

/// Heading of an obstacle. It enters from the opposite edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Top,
    Bottom,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Top,
        Direction::Bottom,
    ];

    /// Unit vector of travel (`Top` moves toward y = 0)
    pub fn unit(&self) -> Vec2 {
        match self {
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
            Direction::Top => Vec2::NEG_Y,
            Direction::Bottom => Vec2::Y,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A square hazard crossing the arena in a straight line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    /// Edge length
    pub size: f32,
    pub vel: Vec2,
    pub direction: Direction,
}

impl Obstacle {
    /// Spawn on the entry edge for `direction` (random when `None`), at a
    /// uniformly random point along that edge, with a random size and
    /// inward speed from `tier`.
    pub fn spawn<R: Rng + ?Sized>(
        id: u32,
        direction: Option<Direction>,
        tier: &ObstacleTier,
        rng: &mut R,
    ) -> Self {
        let direction = direction.unwrap_or_else(|| Direction::random(rng));
        let size = uniform(rng, tier.min_size, tier.max_size);
        let speed = uniform(rng, tier.min_speed, tier.max_speed);
        let along = uniform(rng, 0.0, ARENA_SIZE - size);

        let pos = match direction {
            Direction::Right => Vec2::new(0.0, along),
            Direction::Left => Vec2::new(ARENA_SIZE - size, along),
            Direction::Bottom => Vec2::new(along, 0.0),
            Direction::Top => Vec2::new(along, ARENA_SIZE - size),
        };

        Self {
            id,
            pos,
            size,
            vel: direction.unit() * speed,
            direction,
        }
    }

    pub fn has_left_arena(&self) -> bool {
        self.bounds().is_outside_arena()
    }
}

impl Entity for Obstacle {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        Vec2::splat(self.size)
    }

    fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

/// Uniform sample in `[lo, hi]`, tolerating a degenerate range
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..=hi)
    } else {
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ObstacleDifficulty;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn square(x: f32, y: f32, s: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::splat(s))
    }

    #[test]
    fn test_touching_edges_overlap() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(10.0, 0.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_separated_boxes_do_not_overlap() {
        let a = square(0.0, 0.0, 10.0);
        assert!(!a.overlaps(&square(10.5, 0.0, 10.0)));
        assert!(!a.overlaps(&square(0.0, 10.5, 10.0)));
        assert!(!a.overlaps(&square(-20.0, 0.0, 10.0)));
        assert!(!a.overlaps(&square(0.0, -20.0, 10.0)));
    }

    #[test]
    fn test_entity_intersects_uses_bounds() {
        let avatar = Avatar::default();
        let tier = ObstacleDifficulty::Medium.tier();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut obstacle = Obstacle::spawn(1, Some(Direction::Right), &tier, &mut rng);
        obstacle.pos = avatar.pos + Vec2::splat(5.0);
        assert!(avatar.intersects(&obstacle));
        assert!(obstacle.intersects(&avatar));
    }

    #[test]
    fn test_avatar_clamp() {
        let mut avatar = Avatar {
            pos: Vec2::new(-50.0, ARENA_SIZE + 10.0),
            ..Default::default()
        };
        avatar.clamp_to_arena();
        assert_eq!(avatar.pos, Vec2::new(0.0, ARENA_SIZE - AVATAR_SIZE));
    }

    #[test]
    fn test_avatar_steer_and_advance() {
        let mut avatar = Avatar::default();
        let start = avatar.pos;
        avatar.steer(false, true, true, false);
        avatar.advance(0.5);
        assert_eq!(avatar.pos, start + Vec2::new(AVATAR_SPEED, -AVATAR_SPEED) * 0.5);

        avatar.steer(false, false, false, false);
        assert_eq!(avatar.vel, Vec2::ZERO);
    }

    #[test]
    fn test_spawn_edges_and_velocity() {
        let tier = ObstacleDifficulty::Medium.tier();
        let mut rng = Pcg32::seed_from_u64(42);
        for direction in Direction::ALL {
            for id in 0..50 {
                let o = Obstacle::spawn(id, Some(direction), &tier, &mut rng);
                assert!(o.size >= tier.min_size && o.size <= tier.max_size);
                let speed = o.vel.length();
                assert!(speed >= tier.min_speed - 1e-3 && speed <= tier.max_speed + 1e-3);
                assert!(o.vel.normalize().dot(direction.unit()) > 0.999);
                match direction {
                    Direction::Right => assert_eq!(o.pos.x, 0.0),
                    Direction::Left => assert_eq!(o.pos.x, ARENA_SIZE - o.size),
                    Direction::Bottom => assert_eq!(o.pos.y, 0.0),
                    Direction::Top => assert_eq!(o.pos.y, ARENA_SIZE - o.size),
                }
                // Fully inside on spawn
                assert!(o.pos.x >= 0.0 && o.pos.x + o.size <= ARENA_SIZE + 1e-3);
                assert!(o.pos.y >= 0.0 && o.pos.y + o.size <= ARENA_SIZE + 1e-3);
            }
        }
    }

    #[test]
    fn test_spawn_without_direction_picks_one() {
        let tier = ObstacleDifficulty::Easy.tier();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for id in 0..200 {
            seen.insert(Obstacle::spawn(id, None, &tier, &mut rng).direction);
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_obstacle_leaves_arena() {
        let tier = ObstacleDifficulty::Medium.tier();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut o = Obstacle::spawn(1, Some(Direction::Left), &tier, &mut rng);
        assert!(!o.has_left_arena());
        o.pos.x = -o.size - 0.1;
        assert!(o.has_left_arena());
        o.pos.x = -o.size + 0.1;
        assert!(!o.has_left_arena());
    }

    fn arb_box() -> impl Strategy<Value = Aabb> {
        (-100.0f32..600.0, -100.0f32..600.0, 1.0f32..80.0, 1.0f32..80.0)
            .prop_map(|(x, y, w, h)| Aabb::new(Vec2::new(x, y), Vec2::new(w, h)))
    }

    proptest! {
        #[test]
        fn prop_overlap_symmetric(a in arb_box(), b in arb_box()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_box_overlaps_itself(a in arb_box()) {
            prop_assert!(a.overlaps(&a));
        }

        #[test]
        fn prop_gap_on_x_never_overlaps(a in arb_box(), gap in 0.01f32..50.0, h in 1.0f32..80.0) {
            let b = Aabb::new(Vec2::new(a.max().x + gap, a.min.y), Vec2::new(10.0, h));
            prop_assert!(!a.overlaps(&b));
        }
    }
}
