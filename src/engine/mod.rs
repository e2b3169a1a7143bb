//! Game loop orchestration.
//!
//! Three parties share one `Session` behind a mutex: the physics task
//! (hundreds of Hz, wall-clock deltas), the render task (tens of Hz, always
//! reads the latest state — lossy by design), and the input pump on the
//! calling thread. Cross-task flags are atomics; `exiting` is polled at the
//! top of every iteration and no task blocks uninterruptibly.

pub mod session;

pub use session::{PlayState, Session, SessionEvent};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use crossterm::event::{self, Event, KeyEventKind};

use crate::input::{should_quit, HandlerSet, InputHandler};
use crate::term::game_view::Scene;
use crate::term::{GameView, PixelBuffer, RenderThrottle, TerminalRenderer, PX_PER_BLOCK};
use crate::types::{PHYSICS_TICK_MS, RENDER_TICK_MS};

/// Keep-alive interval for static (paused/crashed) frames.
const STATIC_FLUSH_MS: u64 = 500;

/// External audio collaborator. The engine only signals cues.
pub trait SoundCue: Send {
    fn crash(&mut self) {}
    fn complete(&mut self) {}
    /// Called once during teardown.
    fn stop(&mut self) {}
}

/// Silent default.
pub struct NoopSound;

impl SoundCue for NoopSound {}

/// External persistence collaborator for best-completion percentages.
pub trait ProgressSink: Send {
    fn persist(&mut self, normal_percent: f64, practice_percent: f64) -> Result<()>;
}

pub struct GameLoop {
    session: Arc<Mutex<Session>>,
    exiting: Arc<AtomicBool>,
    force_redraw: Arc<AtomicBool>,
    jump_held: Arc<AtomicBool>,
}

fn lock<'a>(session: &'a Arc<Mutex<Session>>) -> Result<MutexGuard<'a, Session>> {
    session.lock().map_err(|_| anyhow!("session mutex poisoned"))
}

impl GameLoop {
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            exiting: Arc::new(AtomicBool::new(false)),
            force_redraw: Arc::new(AtomicBool::new(false)),
            jump_held: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn session(&self) -> Arc<Mutex<Session>> {
        Arc::clone(&self.session)
    }

    /// Run until quit or a task failure. Spawns the physics and render
    /// tasks and pumps input on the calling thread.
    pub fn run(
        &self,
        sound: Box<dyn SoundCue>,
        progress: Box<dyn ProgressSink>,
    ) -> Result<()> {
        lock(&self.session)?.begin();

        let physics = {
            let session = Arc::clone(&self.session);
            let exiting = Arc::clone(&self.exiting);
            let jump_held = Arc::clone(&self.jump_held);
            thread::spawn(move || {
                let result = physics_task(&session, &exiting, &jump_held, sound, progress);
                // Any exit, clean or not, stops the other tasks.
                exiting.store(true, Ordering::Release);
                result
            })
        };

        let render = {
            let session = Arc::clone(&self.session);
            let exiting = Arc::clone(&self.exiting);
            let force_redraw = Arc::clone(&self.force_redraw);
            thread::spawn(move || {
                let result = render_task(&session, &exiting, &force_redraw);
                exiting.store(true, Ordering::Release);
                result
            })
        };

        let pump_result = self.input_pump();
        self.exiting.store(true, Ordering::Release);

        let physics_result =
            physics.join().unwrap_or_else(|_| Err(anyhow!("physics task panicked")));
        let render_result =
            render.join().unwrap_or_else(|_| Err(anyhow!("render task panicked")));

        pump_result?;
        physics_result?;
        render_result?;
        Ok(())
    }

    /// Input pump. Exactly one handler set is active at a time: gameplay
    /// keys normally, the pause-menu set while paused.
    fn input_pump(&self) -> Result<()> {
        let mut handler = InputHandler::new();

        while !self.exiting.load(Ordering::Acquire) {
            if event::poll(Duration::from_millis(25))? {
                match event::read()? {
                    Event::Key(key) => match key.kind {
                        KeyEventKind::Press => {
                            if should_quit(key) {
                                break;
                            }
                            let set = if lock(&self.session)?.state == PlayState::Paused {
                                HandlerSet::PauseMenu
                            } else {
                                HandlerSet::Gameplay
                            };
                            if let Some(action) = handler.handle_key_press(set, key.code) {
                                let events = lock(&self.session)?.apply_action(action);
                                if events.contains(&SessionEvent::Resumed) {
                                    // Unpausing repaints from scratch.
                                    self.force_redraw.store(true, Ordering::Release);
                                }
                            }
                        }
                        KeyEventKind::Repeat => handler.handle_key_repeat(key.code),
                        KeyEventKind::Release => handler.handle_key_release(key.code),
                    },
                    Event::Resize(..) => self.force_redraw.store(true, Ordering::Release),
                    _ => {}
                }
            }
            self.jump_held.store(handler.jump_held(), Ordering::Relaxed);
        }
        Ok(())
    }
}

fn physics_task(
    session: &Arc<Mutex<Session>>,
    exiting: &Arc<AtomicBool>,
    jump_held: &Arc<AtomicBool>,
    mut sound: Box<dyn SoundCue>,
    mut progress: Box<dyn ProgressSink>,
) -> Result<()> {
    let tick = Duration::from_millis(PHYSICS_TICK_MS);
    let mut last = Instant::now();

    while !exiting.load(Ordering::Acquire) {
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f64();
        last = now;

        if dt > 0.0 {
            let events = lock(session)?.advance(dt, jump_held.load(Ordering::Relaxed));
            for event in events {
                match event {
                    SessionEvent::Crashed => sound.crash(),
                    SessionEvent::Completed => {
                        sound.complete();
                        let (normal, practice) = {
                            let s = lock(session)?;
                            (s.normal_percent, s.practice_percent)
                        };
                        progress.persist(normal, practice)?;
                    }
                    SessionEvent::Respawned | SessionEvent::Paused | SessionEvent::Resumed => {}
                }
            }
        }

        thread::sleep(tick);
    }

    // Teardown: persist whatever progress this session reached, stop audio.
    let (normal, practice) = {
        let s = lock(session)?;
        (s.normal_percent, s.practice_percent)
    };
    progress.persist(normal, practice)?;
    sound.stop();
    Ok(())
}

fn render_task(
    session: &Arc<Mutex<Session>>,
    exiting: &Arc<AtomicBool>,
    force_redraw: &Arc<AtomicBool>,
) -> Result<()> {
    let mut term = TerminalRenderer::new();
    term.enter()?;
    let result = render_loop(session, exiting, force_redraw, &mut term);
    // Always restore the terminal, even on error.
    let restore = term.exit();
    result.and(restore)
}

fn render_loop(
    session: &Arc<Mutex<Session>>,
    exiting: &Arc<AtomicBool>,
    force_redraw: &Arc<AtomicBool>,
    term: &mut TerminalRenderer,
) -> Result<()> {
    let mut view = GameView::new();
    let mut fb = PixelBuffer::new(0, 0);
    let mut throttle = RenderThrottle::new(STATIC_FLUSH_MS);
    let started = Instant::now();

    while !exiting.load(Ordering::Acquire) {
        let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
        let (w, h) = (cols as usize, rows as usize * 2);
        if fb.width() != w || fb.height() != h {
            fb.resize(w, h);
            term.invalidate();
        }
        if force_redraw.swap(false, Ordering::AcqRel) {
            term.invalidate();
        }

        let (fingerprint, active) = {
            let mut s = lock(session)?;
            s.set_view_height(h as f64 / PX_PER_BLOCK as f64);
            let scene = Scene {
                level: &s.level,
                catalog: &s.catalog,
                player: &s.player,
                camera: &s.camera,
                checkpoints: &s.checkpoints,
                attempts: s.attempts,
                percent: s.percent(),
                practice: s.practice,
                dimmed: s.is_dimmed(),
            };
            view.render_into(&scene, &mut fb);
            (s.fingerprint(), s.is_active())
        };

        let now_ms = started.elapsed().as_millis() as u64;
        if throttle.should_flush(now_ms, fingerprint, active) {
            term.draw_swap(&mut fb)?;
        }

        thread::sleep(Duration::from_millis(RENDER_TICK_MS));
    }
    Ok(())
}
