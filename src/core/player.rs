//! Player physics
//!
//! Continuous state advanced by a per-mode tick function. All five modes
//! share the ground-catch helper, which exists in two call patterns: the
//! usual one infers the probe direction from the instantaneous gravity sign,
//! ship mode passes an explicit direction derived from its control
//! acceleration (which disagrees with gravity while reversing).

use arrayvec::ArrayVec;

use crate::core::catalog::ObjectCatalog;
use crate::core::collision::{
    generate_collisions, highest_solid_beneath, lowest_solid_above, Collision, VerticalSide,
    MAX_COLLISIONS,
};
use crate::core::level::Level;
use crate::types::{
    Gamemode, SpeedClass, CUBE_JUMP_VELOCITY, CUBE_TERMINAL_VELOCITY, GRAVITY_ACCEL, PLAYER_SIZE,
    SHIP_ACCEL, SHIP_TERMINAL_VELOCITY, UFO_JUMP_VELOCITY, WAVE_RATE,
};

/// Spawn configuration, from level metadata or a practice checkpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnState {
    pub x: f64,
    pub y: f64,
    pub mode: Gamemode,
    pub speed: SpeedClass,
    pub gravity_sign: f64,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub velocity_y: f64,
    /// +1 = normal (pull toward -y), -1 = reversed.
    pub gravity_sign: f64,
    pub mode: Gamemode,
    pub speed: SpeedClass,
    pub in_air: bool,
    pub jump_requested: bool,
    /// Set by a fatal collision or effect; consumed by the session.
    pub crashed: bool,
    /// Replaced wholesale every tick; never valid across tick boundaries.
    pub collisions: ArrayVec<Collision, MAX_COLLISIONS>,
    /// Wave pivot points. Cleared on mode change.
    pub trail: Vec<(f64, f64)>,
    wave_held_last: bool,
}

impl Player {
    pub fn new(spawn: SpawnState) -> Self {
        let mut player = Self {
            x: 0.0,
            y: 0.0,
            velocity_y: 0.0,
            gravity_sign: 1.0,
            mode: Gamemode::Cube,
            speed: SpeedClass::Normal,
            in_air: true,
            jump_requested: false,
            crashed: false,
            collisions: ArrayVec::new(),
            trail: Vec::new(),
            wave_held_last: false,
        };
        player.reset(spawn);
        player
    }

    /// Restore spawn state (attempt start or checkpoint respawn).
    pub fn reset(&mut self, spawn: SpawnState) {
        self.x = spawn.x;
        self.y = spawn.y;
        self.velocity_y = 0.0;
        self.gravity_sign = spawn.gravity_sign;
        self.mode = spawn.mode;
        self.speed = spawn.speed;
        self.in_air = true;
        self.jump_requested = false;
        self.crashed = false;
        self.collisions.clear();
        self.trail.clear();
        self.wave_held_last = false;
        if self.mode == Gamemode::Wave {
            self.trail.push((self.x, self.y));
        }
    }

    /// Record jump intent; consumed on the next qualifying tick.
    pub fn request_jump(&mut self) {
        self.jump_requested = true;
    }

    /// Switch movement mode, resetting mode-specific state.
    pub fn change_mode(&mut self, mode: Gamemode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.trail.clear();
        self.jump_requested = false;
        self.wave_held_last = false;
        if mode == Gamemode::Wave {
            self.trail.push((self.x, self.y));
        }
    }

    /// Advance physics by exactly `dt` seconds.
    pub fn tick(&mut self, dt: f64, held: bool, level: &Level, catalog: &ObjectCatalog) {
        debug_assert!(dt > 0.0);
        self.x += self.speed.blocks_per_sec() * dt;
        self.collisions = generate_collisions(level, catalog, self.x, self.y);

        match self.mode {
            Gamemode::Cube => self.tick_cube(dt, level, catalog),
            Gamemode::Ship => self.tick_ship(dt, held, level, catalog),
            Gamemode::Ball => self.tick_ball(dt, level, catalog),
            Gamemode::Ufo => self.tick_ufo(dt, level, catalog),
            Gamemode::Wave => self.tick_wave(dt, held, level, catalog),
        }

        // The world floor holds under every gravity sign and probe
        // direction; y >= 0 is a player invariant.
        if self.y < 0.0 {
            self.y = 0.0;
            if self.velocity_y < 0.0 {
                self.velocity_y = 0.0;
            }
        }
    }

    fn tick_cube(&mut self, dt: f64, level: &Level, catalog: &ObjectCatalog) {
        let sign = self.gravity_sign;
        self.apply_gravity(dt, CUBE_TERMINAL_VELOCITY);

        let grounded = self.settle_on_contact(sign);
        self.in_air = !grounded;

        if self.jump_requested && grounded {
            self.velocity_y = CUBE_JUMP_VELOCITY * sign;
            self.jump_requested = false;
            self.in_air = true;
        }

        if self.catch_and_integrate(dt, level, catalog) {
            self.in_air = false;
        }
    }

    fn tick_ship(&mut self, dt: f64, held: bool, level: &Level, catalog: &ObjectCatalog) {
        // Holding thrusts against gravity, releasing with it.
        let accel = if held {
            SHIP_ACCEL * self.gravity_sign
        } else {
            -SHIP_ACCEL * self.gravity_sign
        };
        self.velocity_y =
            (self.velocity_y + accel * dt).clamp(-SHIP_TERMINAL_VELOCITY, SHIP_TERMINAL_VELOCITY);

        // Ship glides along both floors and ceilings.
        let mut resting = false;
        if let Some(top) = self.top_contact_surface() {
            if self.velocity_y <= 0.0 {
                self.y = top;
                self.velocity_y = 0.0;
                resting = true;
            }
        }
        if !resting {
            if let Some(bottom) = self.bottom_contact_surface() {
                if self.velocity_y >= 0.0 {
                    self.y = bottom - PLAYER_SIZE;
                    self.velocity_y = 0.0;
                    resting = true;
                }
            }
        }
        if !resting && self.y <= 0.0 && self.velocity_y <= 0.0 {
            self.y = 0.0;
            self.velocity_y = 0.0;
            resting = true;
        }
        self.in_air = !resting;

        // Probe side follows the control acceleration, not gravity: during a
        // reversal the ship can still be moving toward the old side.
        if self.catch_and_integrate_directed(dt, level, catalog, accel < 0.0) {
            self.in_air = false;
        }
    }

    fn tick_ball(&mut self, dt: f64, level: &Level, catalog: &ObjectCatalog) {
        let sign = self.gravity_sign;
        self.apply_gravity(dt, CUBE_TERMINAL_VELOCITY);

        let grounded = self.settle_on_contact(sign);
        self.in_air = !grounded;

        // Rolling jump: flip gravity instead of translating velocity.
        if self.jump_requested && grounded {
            self.gravity_sign = -sign;
            self.jump_requested = false;
            self.in_air = true;
        }

        if self.catch_and_integrate(dt, level, catalog) {
            self.in_air = false;
        }
    }

    fn tick_ufo(&mut self, dt: f64, level: &Level, catalog: &ObjectCatalog) {
        let sign = self.gravity_sign;
        self.apply_gravity(dt, CUBE_TERMINAL_VELOCITY);

        let grounded = self.settle_on_contact(sign);
        self.in_air = !grounded;

        // Honored on every qualifying tick, airborne or not.
        if self.jump_requested {
            self.velocity_y = UFO_JUMP_VELOCITY * sign;
            self.jump_requested = false;
            self.in_air = true;
        }

        // Airborne detection ignores the ground-catch override: the catch
        // still snaps and zeroes velocity, but `in_air` stays with the
        // contact-based answer so repeated activation keeps working.
        self.catch_and_integrate(dt, level, catalog);
    }

    fn tick_wave(&mut self, dt: f64, held: bool, level: &Level, catalog: &ObjectCatalog) {
        if held != self.wave_held_last {
            self.trail.push((self.x, self.y));
            self.wave_held_last = held;
        }

        // Binary velocity, no gravity.
        self.velocity_y = if held {
            WAVE_RATE * self.gravity_sign
        } else {
            -WAVE_RATE * self.gravity_sign
        };

        let caught =
            self.catch_and_integrate_directed(dt, level, catalog, self.velocity_y < 0.0);
        self.in_air = !caught;
    }

    /// Integrate gravity into velocity, clamping the fall direction only so
    /// pad/orb boosts may exceed the terminal speed away from gravity.
    fn apply_gravity(&mut self, dt: f64, terminal: f64) {
        self.velocity_y -= GRAVITY_ACCEL * self.gravity_sign * dt;
        if self.gravity_sign > 0.0 {
            self.velocity_y = self.velocity_y.max(-terminal);
        } else {
            self.velocity_y = self.velocity_y.min(terminal);
        }
    }

    /// Glide-land on the face the gravity sign rests on, using this tick's
    /// collision list; also treats the world floor as ground under normal
    /// gravity. Returns whether the player is grounded afterwards.
    fn settle_on_contact(&mut self, sign: f64) -> bool {
        if sign > 0.0 {
            if let Some(top) = self.top_contact_surface() {
                if self.velocity_y <= 0.0 {
                    self.y = top;
                    self.velocity_y = 0.0;
                    return true;
                }
            }
            if self.y <= 0.0 && self.velocity_y <= 0.0 {
                self.y = 0.0;
                self.velocity_y = 0.0;
                return true;
            }
        } else if let Some(bottom) = self.bottom_contact_surface() {
            if self.velocity_y >= 0.0 {
                self.y = bottom - PLAYER_SIZE;
                self.velocity_y = 0.0;
                return true;
            }
        }
        false
    }

    /// Highest stood-on face in this tick's collision list.
    fn top_contact_surface(&self) -> Option<f64> {
        self.collisions
            .iter()
            .filter(|c| c.side == Some(VerticalSide::Top))
            .filter_map(|c| c.surface_y)
            .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.max(s))))
    }

    /// Lowest head-side face in this tick's collision list.
    fn bottom_contact_surface(&self) -> Option<f64> {
        self.collisions
            .iter()
            .filter(|c| c.side == Some(VerticalSide::Bottom))
            .filter_map(|c| c.surface_y)
            .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.min(s))))
    }

    /// Ground catch, probe direction inferred from the gravity sign.
    fn catch_and_integrate(&mut self, dt: f64, level: &Level, catalog: &ObjectCatalog) -> bool {
        self.catch_and_integrate_directed(dt, level, catalog, self.gravity_sign > 0.0)
    }

    /// Ground catch with an explicit probe direction.
    ///
    /// Finalizes `y += velocity_y * dt`. When the moving edge crosses an
    /// integer grid line, the nearest solid face within
    /// `ceil(|velocity_y| * dt)` rows (restricted to the spanned columns) is
    /// looked up; if the projection has passed it, the player snaps to the
    /// surface with zeroed velocity instead of integrating through it.
    fn catch_and_integrate_directed(
        &mut self,
        dt: f64,
        level: &Level,
        catalog: &ObjectCatalog,
        downward: bool,
    ) -> bool {
        let rows = (self.velocity_y.abs() * dt).ceil() as usize;

        if downward {
            let old = self.y;
            let new = old + self.velocity_y * dt;
            if boundary_crossed(old, new) {
                if let Some(top) = highest_solid_beneath(level, catalog, self.x, old, rows) {
                    if new <= top {
                        self.y = top;
                        self.velocity_y = 0.0;
                        return true;
                    }
                }
                // The world floor is always solid.
                if new < 0.0 {
                    self.y = 0.0;
                    self.velocity_y = 0.0;
                    return true;
                }
            }
            self.y = new;
        } else {
            let old_top = self.y + PLAYER_SIZE;
            let new_top = old_top + self.velocity_y * dt;
            if boundary_crossed(old_top, new_top) {
                if let Some(bottom) = lowest_solid_above(level, catalog, self.x, old_top, rows) {
                    if new_top >= bottom {
                        self.y = bottom - PLAYER_SIZE;
                        self.velocity_y = 0.0;
                        return true;
                    }
                }
            }
            self.y += self.velocity_y * dt;
        }
        false
    }
}

/// Does the move from `a` to `b` cross an integer grid line? Landing exactly
/// on a line (or leaving one) counts as crossing.
pub fn boundary_crossed(a: f64, b: f64) -> bool {
    let a_exact = a.fract() == 0.0;
    let b_exact = b.fract() == 0.0;
    a.floor() != b.floor() || (a_exact != b_exact)
}
