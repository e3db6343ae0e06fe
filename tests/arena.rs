//! Arena lifecycle driven through the public tick

use std::cell::RefCell;
use std::rc::Rc;

use bullet_tac_toe::consts::{ARENA_SIZE, AVATAR_SIZE};
use bullet_tac_toe::events::{EventBus, GameEnd, GameEvent, handler, topics};
use bullet_tac_toe::renderer::{Recorder, colors};
use bullet_tac_toe::settings::{ObstacleDifficulty, Settings};
use bullet_tac_toe::sim::{
    Aabb, Direction, GameSession, Obstacle, ObstacleField, SessionPhase, TickInput, tick,
};
use glam::Vec2;

const DT: f32 = 1.0 / 120.0;

fn running(seed: u64) -> GameSession {
    let mut session = GameSession::new(Settings::default(), seed);
    session.start();
    session
}

#[test]
fn first_frame_spawns_and_draws_an_obstacle() {
    let mut session = running(3);
    let mut rec = Recorder::new();
    tick(&mut session, &TickInput::default(), DT, &mut rec);

    assert_eq!(session.frame, 1);
    assert_eq!(rec.frames(), 1);
    assert_eq!(session.obstacles().borrow().len(), 1);
    // Spawned after drawing, so it shows up on the next frame
    assert_eq!(rec.count_fills(colors::OBSTACLE), 0);

    tick(&mut session, &TickInput::default(), DT, &mut rec);
    assert_eq!(rec.count_fills(colors::OBSTACLE), 1);
    assert_eq!(rec.count_fills(colors::AVATAR), 1);
}

#[test]
fn obstacle_heading_at_avatar_ends_the_game() {
    let mut session = running(5);
    let mut rec = Recorder::new();
    let y = session.avatar.pos.y;
    session.obstacles().borrow_mut().insert(Obstacle {
        id: 0,
        pos: Vec2::new(0.0, y),
        size: 20.0,
        vel: Direction::Right.unit() * 400.0,
        direction: Direction::Right,
    });

    let mut frames = 0;
    while !session.is_ended() && frames < 600 {
        tick(&mut session, &TickInput::default(), DT, &mut rec);
        frames += 1;
    }

    assert_eq!(session.phase, SessionPhase::Ended(GameEnd::Collision));
    assert!(session.obstacles().borrow().is_empty());
    assert!(!session.turns.computer_thinking());

    // Terminal: further ticks are no-ops
    let frame = session.frame;
    tick(&mut session, &TickInput::default(), DT, &mut rec);
    assert_eq!(session.frame, frame);
}

#[test]
fn game_over_listener_can_inspect_obstacles() {
    let mut session = running(5);
    let mut rec = Recorder::new();
    let field = session.obstacles().clone();
    let at_hit = Rc::new(RefCell::new(Vec::new()));
    let sink = at_hit.clone();
    session.bus().subscribe(
        topics::GAME_OVER,
        handler(move |_: Option<&GameEvent>| {
            sink.borrow_mut().extend(field.borrow().obstacles().iter().map(|o| o.id));
        }),
    );

    let pos = session.avatar.pos;
    session.obstacles().borrow_mut().insert(Obstacle {
        id: 0,
        pos,
        size: 20.0,
        vel: Vec2::ZERO,
        direction: Direction::Right,
    });
    tick(&mut session, &TickInput::default(), DT, &mut rec);

    assert_eq!(session.phase, SessionPhase::Ended(GameEnd::Collision));
    assert_eq!(at_hit.borrow().len(), 1);
}

#[test]
fn avatar_stays_inside_arena() {
    let mut session = running(9);
    let mut rec = Recorder::new();
    let input = TickInput {
        left: true,
        up: true,
        ..Default::default()
    };
    for _ in 0..240 {
        session.obstacles().borrow_mut().clear();
        tick(&mut session, &input, DT, &mut rec);
    }
    assert!(session.is_running());
    assert_eq!(session.avatar.pos, Vec2::ZERO);

    let input = TickInput {
        right: true,
        down: true,
        ..Default::default()
    };
    for _ in 0..240 {
        session.obstacles().borrow_mut().clear();
        tick(&mut session, &input, DT, &mut rec);
    }
    assert_eq!(session.avatar.pos, Vec2::splat(ARENA_SIZE - AVATAR_SIZE));
}

#[test]
fn obstacles_leave_and_are_pruned() {
    let bus = Rc::new(EventBus::new());
    let field = Rc::new(RefCell::new(ObstacleField::new(
        ObstacleDifficulty::Easy.tier(),
        11,
        &bus,
    )));
    ObstacleField::attach(&field, &bus);
    // Parked outside the arena so nothing can reach it
    let avatar = Aabb::new(Vec2::splat(-1000.0), Vec2::splat(AVATAR_SIZE));

    let mut peak = 0;
    for frame in 1..=1200 {
        field.borrow_mut().advance_all(DT);
        let event = GameEvent::FrameComplete { frame, dt: DT, avatar };
        bus.publish(topics::FRAME_COMPLETE, Some(&event));

        let field = field.borrow();
        peak = peak.max(field.len());
        assert!(field.obstacles().iter().all(|o| !o.has_left_arena()));
    }
    // Ten seconds at one spawn per half second; the slowest crossing is
    // under seven
    assert!(peak > 0);
    assert!(peak < 20, "obstacles are not being pruned (peak {peak})");
}
