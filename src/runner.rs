//! Fixed-rate driver
//!
//! Owns the current session and turns real frame time into fixed simulation
//! steps. Stops stepping once the session ends; the pause key then starts a
//! fresh session.

use std::cell::RefCell;
use std::rc::Rc;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};
use crate::input::{Key, KeySource, Keyboard};
use crate::renderer::DrawSurface;
use crate::scoreboard::Scoreboard;
use crate::settings::Settings;
use crate::sim::{GameSession, TickInput, tick};

pub struct Runner {
    settings: Settings,
    session: GameSession,
    keyboard: Keyboard,
    scoreboard: Rc<RefCell<Scoreboard>>,
    accumulator: f32,
    seed: u64,
    /// Let the autopilot play the human's side
    pub autopilot: bool,
}

impl Runner {
    /// Build and start the first session
    pub fn new(settings: Settings, seed: u64) -> Self {
        let scoreboard = Rc::new(RefCell::new(Scoreboard::new()));
        let session = Self::start_session(&settings, seed, &scoreboard);
        Self {
            settings,
            session,
            keyboard: Keyboard::new(),
            scoreboard,
            accumulator: 0.0,
            seed,
            autopilot: false,
        }
    }

    fn start_session(
        settings: &Settings,
        seed: u64,
        scoreboard: &Rc<RefCell<Scoreboard>>,
    ) -> GameSession {
        let mut session = GameSession::new(settings.clone(), seed);
        Scoreboard::attach(scoreboard, session.bus(), settings.marker);
        session.start();
        session
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn keyboard_mut(&mut self) -> &mut Keyboard {
        &mut self.keyboard
    }

    pub fn scoreboard(&self) -> &Rc<RefCell<Scoreboard>> {
        &self.scoreboard
    }

    /// Throw the current session away and start another
    pub fn restart(&mut self) {
        self.seed = self.seed.wrapping_add(1);
        self.session = Self::start_session(&self.settings, self.seed, &self.scoreboard);
        self.accumulator = 0.0;
        self.keyboard.reset();
        log::info!("Restarted with seed: {}", self.seed);
    }

    /// Run as many fixed steps as `real_dt` covers. Returns the number of
    /// ticks run.
    pub fn update(&mut self, real_dt: f32, surface: &mut dyn DrawSurface) -> u32 {
        if self.session.is_ended() {
            self.accumulator = 0.0;
            if self.keyboard.take_press(Key::Pause) {
                self.restart();
            }
            return 0;
        }

        if !real_dt.is_finite() {
            log::warn!("Ignoring non-finite frame delta: {real_dt}");
            return 0;
        }
        let step = self.settings.sim_dt();
        self.accumulator += real_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= step && substeps < MAX_SUBSTEPS {
            let input = self.next_input();
            tick(&mut self.session, &input, step, surface);
            self.accumulator -= step;
            substeps += 1;

            if self.session.is_ended() {
                self.accumulator = 0.0;
                break;
            }
        }
        substeps
    }

    /// Held keys plus one-shot presses, which are consumed here
    fn next_input(&mut self) -> TickInput {
        let place = self.keyboard.take_press(Key::Place);
        let pause = self.keyboard.take_press(Key::Pause);
        let kb = &self.keyboard;
        TickInput {
            left: kb.is_held(Key::Left),
            right: kb.is_held(Key::Right),
            up: kb.is_held(Key::Up),
            down: kb.is_held(Key::Down),
            place,
            pause,
            autopilot: self.autopilot,
        }
    }
}
