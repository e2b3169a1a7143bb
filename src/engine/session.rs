//! Session - the single-writer play state machine.
//!
//! Owns the world (level, player, camera) plus attempt/pause/crash/practice/
//! completion bookkeeping. `advance` is pure with respect to wall-clock: the
//! game loop feeds it deltas, tests feed it synthetic time. State changes
//! worth reacting to (sound, persistence, redraws) come back as events.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::core::camera::Camera;
use crate::core::catalog::ObjectCatalog;
use crate::core::checkpoint::Checkpoint;
use crate::core::collision::{run_collision_effect, Collision};
use crate::core::level::Level;
use crate::core::player::{Player, SpawnState};
use crate::types::{
    GameAction, AUTO_CHECKPOINT_MS, EARLY_CRASH_WINDOW_MS, END_PADDING, RESPAWN_COOLDOWN_MS,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayState {
    Idle,
    Running,
    Paused,
    Crashed { at_ms: u64 },
    Complete,
}

/// Emitted by `advance`/`apply_action` for the loop to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Crashed,
    Respawned,
    Completed,
    Paused,
    Resumed,
}

pub struct Session {
    pub level: Level,
    pub catalog: ObjectCatalog,
    pub player: Player,
    pub camera: Camera,
    pub state: PlayState,
    pub practice: bool,
    pub checkpoints: Vec<Checkpoint>,
    pub attempts: u32,
    pub normal_percent: f64,
    pub practice_percent: f64,
    pub level_name: String,
    spawn: SpawnState,
    clock_ms: f64,
    attempt_started_ms: f64,
    last_auto_checkpoint_ms: f64,
    view_h_blocks: f64,
}

impl Session {
    pub fn new(
        level: Level,
        spawn: SpawnState,
        level_name: String,
        normal_percent: f64,
        practice_percent: f64,
    ) -> Self {
        Self {
            player: Player::new(spawn),
            level,
            catalog: ObjectCatalog::new(),
            camera: Camera::new(),
            state: PlayState::Idle,
            practice: false,
            checkpoints: Vec::new(),
            attempts: 0,
            normal_percent,
            practice_percent,
            level_name,
            spawn,
            clock_ms: 0.0,
            attempt_started_ms: 0.0,
            last_auto_checkpoint_ms: 0.0,
            view_h_blocks: 12.0,
        }
    }

    /// Start the first attempt.
    pub fn begin(&mut self) {
        if self.state != PlayState::Idle {
            return;
        }
        self.state = PlayState::Running;
        self.attempts = 1;
        self.attempt_started_ms = self.clock_ms;
        self.last_auto_checkpoint_ms = self.clock_ms;
        self.camera.reset(self.player.x, self.player.y, self.view_h_blocks);
    }

    /// Viewport height in blocks, supplied by the render side.
    pub fn set_view_height(&mut self, blocks: f64) {
        if blocks > 0.0 {
            self.view_h_blocks = blocks;
        }
    }

    /// Current attempt progress through the level, 0..=100.
    pub fn percent(&self) -> f64 {
        (self.player.x / self.level.length() * 100.0).clamp(0.0, 100.0)
    }

    pub fn is_active(&self) -> bool {
        self.state == PlayState::Running
    }

    /// Paused and crashed frames render dimmed.
    pub fn is_dimmed(&self) -> bool {
        matches!(self.state, PlayState::Paused | PlayState::Crashed { .. })
    }

    /// Advance by `dt` seconds of wall-clock time.
    pub fn advance(&mut self, dt: f64, jump_held: bool) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        // Session time freezes with physics while paused, so the crash
        // cooldown and the attempt clock ignore time spent in the menu.
        if self.state != PlayState::Paused {
            self.clock_ms += dt * 1000.0;
        }

        match self.state {
            PlayState::Running => {
                if self.practice
                    && self.clock_ms - self.last_auto_checkpoint_ms >= AUTO_CHECKPOINT_MS as f64
                {
                    self.checkpoints.push(Checkpoint::capture(&self.player));
                    self.last_auto_checkpoint_ms = self.clock_ms;
                }

                self.level.advance_triggers(self.player.x);
                self.player.tick(dt, jump_held, &self.level, &self.catalog);

                let collisions = self.player.collisions.clone();
                for c in &collisions {
                    self.run_auto_effect(c);
                }

                if self.player.crashed {
                    self.crash(&mut events);
                } else if self.player.x > self.level.length() + END_PADDING {
                    self.complete(&mut events);
                } else {
                    self.camera.track(self.player.x, self.player.y, self.view_h_blocks);
                }
            }
            PlayState::Crashed { at_ms } => {
                if self.clock_ms - at_ms as f64 >= RESPAWN_COOLDOWN_MS as f64 {
                    self.respawn();
                    events.push(SessionEvent::Respawned);
                }
            }
            PlayState::Idle | PlayState::Paused | PlayState::Complete => {}
        }

        events
    }

    /// Apply one discrete input event.
    pub fn apply_action(&mut self, action: GameAction) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        match action {
            GameAction::Jump => {
                if self.state == PlayState::Running {
                    self.jump_pressed();
                }
            }
            GameAction::Pause => match self.state {
                PlayState::Running => {
                    self.state = PlayState::Paused;
                    events.push(SessionEvent::Paused);
                }
                PlayState::Paused => {
                    self.state = PlayState::Running;
                    events.push(SessionEvent::Resumed);
                }
                _ => {}
            },
            GameAction::CheckpointAdd => {
                if self.practice && self.state == PlayState::Running {
                    self.checkpoints.push(Checkpoint::capture(&self.player));
                }
            }
            GameAction::CheckpointRemove => {
                self.checkpoints.pop();
            }
            GameAction::TogglePractice => {
                self.practice = !self.practice;
                if !self.practice {
                    self.checkpoints.clear();
                }
            }
            GameAction::Restart => {
                if matches!(self.state, PlayState::Running | PlayState::Paused) {
                    self.record_best_percent();
                    self.checkpoints.clear();
                    self.respawn_from(None);
                    events.push(SessionEvent::Respawned);
                }
            }
            GameAction::Quit => {}
        }
        events
    }

    /// A jump press first tries to activate a clickable effect in this
    /// tick's collision list; only the first eligible one fires per press.
    /// With nothing to activate, the jump intent is queued for physics.
    fn jump_pressed(&mut self) {
        let clickable = self
            .player
            .collisions
            .iter()
            .copied()
            .find(|c| c.side.is_none() && self.effect_eligible(c, true));
        match clickable {
            Some(c) => run_collision_effect(&c, &mut self.level, &self.catalog, &mut self.player),
            None => self.player.request_jump(),
        }
    }

    /// Sided records only carry the wrong-gravity crash check; unsided ones
    /// run their catalog effect if the activation gate allows it.
    fn run_auto_effect(&mut self, c: &Collision) {
        if c.side.is_some() || self.effect_eligible(c, false) {
            run_collision_effect(c, &mut self.level, &self.catalog, &mut self.player);
        }
    }

    fn effect_eligible(&self, c: &Collision, click: bool) -> bool {
        let Some(obj) = self.level.object_at(c.x, c.y) else {
            return false;
        };
        let entry = self.catalog.get(obj.object_type());
        entry.effect.is_some()
            && entry.requires_click == click
            && (!obj.activated || entry.multi_activate)
    }

    fn crash(&mut self, events: &mut Vec<SessionEvent>) {
        events.push(SessionEvent::Crashed);

        // A crash moments into a fresh attempt means the latest checkpoint
        // was unintentional; drop it before the respawn.
        let early = self.clock_ms - self.attempt_started_ms < EARLY_CRASH_WINDOW_MS as f64;
        if self.practice && early && !self.checkpoints.is_empty() {
            self.checkpoints.pop();
        }

        self.record_best_percent();
        self.state = PlayState::Crashed { at_ms: self.clock_ms as u64 };
    }

    fn complete(&mut self, events: &mut Vec<SessionEvent>) {
        self.record_best_percent();
        self.state = PlayState::Complete;
        events.push(SessionEvent::Completed);
    }

    fn respawn(&mut self) {
        let target = if self.practice { self.checkpoints.last().copied() } else { None };
        self.respawn_from(target);
    }

    fn respawn_from(&mut self, checkpoint: Option<Checkpoint>) {
        match checkpoint {
            Some(cp) => cp.apply(&mut self.player),
            None => self.player.reset(self.spawn),
        }
        self.level.clear_activated();
        self.attempts += 1;
        self.attempt_started_ms = self.clock_ms;
        self.last_auto_checkpoint_ms = self.clock_ms;
        self.camera.reset(self.player.x, self.player.y, self.view_h_blocks);
        self.state = PlayState::Running;
    }

    /// Best progress per mode class, monotonically non-decreasing.
    fn record_best_percent(&mut self) {
        let p = self.percent();
        if self.practice {
            self.practice_percent = self.practice_percent.max(p);
        } else {
            self.normal_percent = self.normal_percent.max(p);
        }
    }

    /// Cheap scene identity for render throttling while static.
    pub fn fingerprint(&self) -> u64 {
        let mut h = DefaultHasher::new();
        ((self.player.x * 16.0) as i64).hash(&mut h);
        ((self.player.y * 16.0) as i64).hash(&mut h);
        std::mem::discriminant(&self.state).hash(&mut h);
        self.level.colors_version().hash(&mut h);
        self.attempts.hash(&mut h);
        self.checkpoints.len().hash(&mut h);
        self.practice.hash(&mut h);
        h.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::ObjectType;
    use crate::core::level::LevelObject;
    use crate::types::{Gamemode, SpeedClass};

    const TICK: f64 = 1.0 / 240.0;

    fn session_with(objects: &[(i64, i64, ObjectType)]) -> Session {
        let mut level = Level::new(60, 12);
        for &(x, y, ty) in objects {
            level.set_object_at(x, y, Some(LevelObject::new(ty)));
        }
        let spawn = SpawnState {
            x: 0.0,
            y: 0.0,
            mode: Gamemode::Cube,
            speed: SpeedClass::Normal,
            gravity_sign: 1.0,
        };
        let mut s = Session::new(level, spawn, "test".to_string(), 0.0, 0.0);
        s.begin();
        s
    }

    fn run_for(s: &mut Session, seconds: f64, held: bool) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        let ticks = (seconds / TICK).ceil() as usize;
        for _ in 0..ticks {
            events.extend(s.advance(TICK, held));
        }
        events
    }

    /// Advance until `event` fires; panics if `max_secs` elapse first.
    fn run_until(s: &mut Session, held: bool, event: SessionEvent, max_secs: f64) {
        let ticks = (max_secs / TICK).ceil() as usize;
        for _ in 0..ticks {
            if s.advance(TICK, held).contains(&event) {
                return;
            }
        }
        panic!("{event:?} did not occur within {max_secs}s");
    }

    #[test]
    fn spike_crash_then_cooldown_then_respawn() {
        // Spikes right ahead of the spawn point.
        let mut s = session_with(&[(2, 0, ObjectType::Spike)]);
        run_until(&mut s, false, SessionEvent::Crashed, 0.5);
        assert!(matches!(s.state, PlayState::Crashed { .. }));
        let crash_x = s.player.x;
        let attempts_before = s.attempts;

        // Physics stays frozen through the cooldown.
        run_for(&mut s, 0.5, false);
        assert_eq!(s.player.x, crash_x);

        // Cooldown passes, attempt restarts from the level start.
        run_until(&mut s, false, SessionEvent::Respawned, 1.0);
        assert_eq!(s.state, PlayState::Running);
        assert_eq!(s.attempts, attempts_before + 1);
        assert!(s.player.x < 1.0);
    }

    #[test]
    fn early_practice_crash_drops_latest_checkpoint() {
        let mut s = session_with(&[(3, 0, ObjectType::Spike)]);
        s.practice = true;
        s.apply_action(GameAction::CheckpointAdd);
        s.apply_action(GameAction::CheckpointAdd);
        assert_eq!(s.checkpoints.len(), 2);

        // Crash happens well inside the 2-second window.
        let events = run_for(&mut s, 0.6, false);
        assert!(events.contains(&SessionEvent::Crashed));
        assert_eq!(s.checkpoints.len(), 1, "unintentional checkpoint removed");
    }

    #[test]
    fn late_practice_crash_keeps_checkpoints() {
        // Spike far enough that the crash lands after the window.
        let mut s = session_with(&[(25, 0, ObjectType::Spike)]);
        s.practice = true;
        s.apply_action(GameAction::CheckpointAdd);

        let events = run_for(&mut s, 3.0, false);
        assert!(events.contains(&SessionEvent::Crashed));
        assert_eq!(s.checkpoints.len(), 1);
    }

    #[test]
    fn practice_respawn_uses_latest_checkpoint() {
        let mut s = session_with(&[(30, 0, ObjectType::Spike)]);
        s.practice = true;

        // Travel a bit, then drop a checkpoint by hand.
        run_for(&mut s, 1.0, false);
        s.apply_action(GameAction::CheckpointAdd);

        // Crash into the spike; the latest checkpoint (manual or a later
        // auto one) is the respawn target.
        run_until(&mut s, false, SessionEvent::Crashed, 4.0);
        let expected_x = s.checkpoints.last().unwrap().x;
        assert!(expected_x > 5.0);

        run_until(&mut s, false, SessionEvent::Respawned, 1.5);
        assert!(
            (s.player.x - expected_x).abs() < 1.0,
            "respawned near the checkpoint, not the level start"
        );
    }

    #[test]
    fn auto_checkpoints_appear_in_practice() {
        let mut s = session_with(&[]);
        s.practice = true;
        run_for(&mut s, (AUTO_CHECKPOINT_MS as f64 / 1000.0) * 2.5, false);
        assert!(s.checkpoints.len() >= 2);
    }

    #[test]
    fn crash_clears_activated_flags_on_respawn() {
        let mut s = session_with(&[(2, 0, ObjectType::YellowPad)]);
        s.level.mark_activated(2, 0);
        assert!(s.level.object_at(2, 0).unwrap().activated);

        s.player.crashed = true;
        run_until(&mut s, false, SessionEvent::Crashed, 0.1);
        run_until(&mut s, false, SessionEvent::Respawned, 1.5);
        assert!(!s.level.object_at(2, 0).unwrap().activated, "flags reset for new attempt");
    }

    #[test]
    fn pad_fires_once_per_attempt() {
        let mut s = session_with(&[(2, 0, ObjectType::YellowPad)]);
        run_for(&mut s, 0.4, false);
        assert!(s.player.velocity_y > 0.0 || s.player.y > 0.5, "pad launched the player");
        assert!(s.level.object_at(2, 0).unwrap().activated);
    }

    #[test]
    fn orb_requires_click_and_activates_once() {
        let mut s = session_with(&[(2, 0, ObjectType::YellowOrb)]);
        // Walk into orb range without pressing anything: no effect.
        run_for(&mut s, 0.18, false);
        assert!(!s.level.object_at(2, 0).unwrap().activated);

        // Press while overlapping: orb fires instead of a plain jump.
        s.apply_action(GameAction::Jump);
        assert!(s.level.object_at(2, 0).unwrap().activated);
        assert!(s.player.velocity_y > 0.0);

        // Second press on the same (still overlapping) orb: plain jump only.
        let vy = s.player.velocity_y;
        s.advance(TICK, false);
        s.apply_action(GameAction::Jump);
        assert!(s.player.jump_requested || s.player.velocity_y <= vy);
    }

    #[test]
    fn completion_freezes_and_records_best_percent() {
        let mut s = session_with(&[]);
        s.normal_percent = 40.0;
        let events = run_for(&mut s, 8.0, false);
        assert!(events.contains(&SessionEvent::Completed));
        assert_eq!(s.state, PlayState::Complete);
        assert_eq!(s.normal_percent, 100.0);
        assert_eq!(s.practice_percent, 0.0, "normal run does not touch practice best");

        // Frozen: further time changes nothing.
        let x = s.player.x;
        run_for(&mut s, 1.0, false);
        assert_eq!(s.player.x, x);
    }

    #[test]
    fn crash_records_progress_high_water_mark() {
        let mut s = session_with(&[(20, 0, ObjectType::Spike)]);
        run_for(&mut s, 3.0, false);
        assert!(s.normal_percent > 30.0);
        let best = s.normal_percent;

        // Crashing earlier on a later attempt never lowers the best.
        run_for(&mut s, 1.1, false);
        s.player.crashed = true;
        run_for(&mut s, 0.1, false);
        assert!(s.normal_percent >= best);
    }

    #[test]
    fn pause_toggles_and_freezes_physics() {
        let mut s = session_with(&[]);
        run_for(&mut s, 0.2, false);
        let events = s.apply_action(GameAction::Pause);
        assert_eq!(events, vec![SessionEvent::Paused]);

        let x = s.player.x;
        run_for(&mut s, 0.5, false);
        assert_eq!(s.player.x, x, "paused physics must not advance");

        let events = s.apply_action(GameAction::Pause);
        assert_eq!(events, vec![SessionEvent::Resumed]);
        run_for(&mut s, 0.1, false);
        assert!(s.player.x > x);
    }

    #[test]
    fn leaving_practice_clears_checkpoints() {
        let mut s = session_with(&[]);
        s.apply_action(GameAction::TogglePractice);
        s.apply_action(GameAction::CheckpointAdd);
        assert_eq!(s.checkpoints.len(), 1);
        s.apply_action(GameAction::TogglePractice);
        assert!(s.checkpoints.is_empty());
    }

    #[test]
    fn fingerprint_changes_with_motion_and_state() {
        let mut s = session_with(&[]);
        let a = s.fingerprint();
        run_for(&mut s, 0.2, false);
        let b = s.fingerprint();
        assert_ne!(a, b);

        s.apply_action(GameAction::Pause);
        let c = s.fingerprint();
        assert_ne!(b, c);
        assert_eq!(c, s.fingerprint(), "stable while nothing changes");
    }
}
