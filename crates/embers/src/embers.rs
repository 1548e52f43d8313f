//! The embers themselves: the simulation, the canvas it's drawn on and the frame loop that
//! ties them to the user's terminal.

use std::collections::VecDeque;

use color_eyre::eyre::Result;
use embers_simulation::prelude::*;
use termwiz::input::{InputEvent, KeyCode, Modifiers};
use termwiz::terminal::Terminal as TermwizTerminal;

use crate::renderer::Renderer;
use crate::surface::Surface;

/// The slowest the simulation can be made to run, relative to the wall clock.
const MIN_SPEED: f64 = 1.0 / 16.0;

/// The fastest the simulation can be made to run, relative to the wall clock.
const MAX_SPEED: f64 = 16.0;

/// How many frame durations to average over for the FPS readout.
const FPS_SAMPLE_SIZE: usize = 30;

/// How wide the stats overlay is.
const STATS_WIDTH: usize = 20;

/// What the frame loop should do after handling some input.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Control {
    /// Carry on drawing frames
    Continue,
    /// Leave the frame loop
    Quit,
}

/// `Embers`
pub(crate) struct Embers {
    /// The user's config
    config: crate::config::main::Config,
    /// All the particles and the rules they follow
    simulation: Simulation<ThreadRandom>,
    /// Decides how many simulation steps each frame needs
    clock: Clock,
    /// The pixels that the embers are drawn on
    canvas: Canvas,
    /// The origin of the simulation clock's timestamps
    started: std::time::Instant,
    /// Timestamp of the last frame tick
    last_frame_tick: std::time::Instant,
    /// The start of the previous frame, for measuring the frame rate
    previous_frame: Option<std::time::Instant>,
    /// Recent durations between frames
    durations: VecDeque<f64>,
    /// The speed to go back to when unpausing. `None` when not paused.
    paused_speed: Option<f64>,
}

impl Embers {
    /// Create the embers in the middle of a terminal of the given size and then fast-forward
    /// them so that they're not all born at the same moment.
    pub fn new(config: crate::config::main::Config, width: usize, height: usize) -> Result<Self> {
        let canvas = Canvas::new(width, height * 2, config.scale);
        let mut simulation = Simulation::new(
            config.simulation.clone(),
            canvas.dimensions(),
            ThreadRandom::default(),
        )?;
        simulation.fast_forward(config.simulation.warmup, canvas.dimensions());
        let clock = Clock::new(&config.simulation, 0.0);

        let now = std::time::Instant::now();
        Ok(Self {
            config,
            simulation,
            clock,
            canvas,
            started: now,
            last_frame_tick: now,
            previous_frame: None,
            durations: VecDeque::default(),
            paused_speed: None,
        })
    }

    /// Our main entrypoint.
    pub async fn run<T: TermwizTerminal>(&mut self, renderer: &mut Renderer<T>) -> Result<()> {
        tracing::debug!("Starting frame loop");
        loop {
            if self.handle_waiting_input(renderer)? == Control::Quit {
                break;
            }

            if renderer.handle_resize()? {
                let (width, height) = renderer.size();
                self.resize(width, height);
            }

            let frame = self.frame()?;
            renderer.render(&frame)?;
            self.sleep_until_next_frame_tick().await;
        }
        tracing::debug!("Exited frame loop");

        Ok(())
    }

    /// Handle all the input that has arrived since the last frame.
    fn handle_waiting_input<T: TermwizTerminal>(
        &mut self,
        renderer: &mut Renderer<T>,
    ) -> Result<Control> {
        while let Some(event) = renderer.poll_input()? {
            if self.handle_input(&event) == Control::Quit {
                return Ok(Control::Quit);
            }
        }

        Ok(Control::Continue)
    }

    /// React to a single input event from the user.
    #[expect(
        clippy::wildcard_enum_match_arm,
        reason = "We only care about a handful of keys"
    )]
    pub fn handle_input(&mut self, event: &InputEvent) -> Control {
        let InputEvent::Key(key_event) = event else {
            return Control::Continue;
        };
        let is_ctrl = key_event.modifiers.contains(Modifiers::CTRL);

        match key_event.key {
            KeyCode::Char('q') | KeyCode::Escape => return Control::Quit,
            KeyCode::Char('c' | 'C') if is_ctrl => return Control::Quit,
            KeyCode::Char('+' | '=') => self.change_speed(2.0),
            KeyCode::Char('-') => self.change_speed(0.5),
            KeyCode::Char(' ') => self.toggle_pause(),
            _ => (),
        }

        Control::Continue
    }

    /// Multiply the speed of the simulation. When paused it's the speed that will be resumed
    /// that changes.
    fn change_speed(&mut self, factor: f64) {
        match self.paused_speed.as_mut() {
            Some(paused_speed) => {
                *paused_speed = Self::scaled_speed(*paused_speed, factor);
                tracing::info!("Speed on resume changed to {paused_speed}x");
            }
            None => {
                let speed = Self::scaled_speed(self.clock.time_multiplier(), factor);
                self.clock.set_time_multiplier(speed);
                tracing::info!("Speed changed to {speed}x");
            }
        }
    }

    /// Keep the speed within sensible limits.
    fn scaled_speed(speed: f64, factor: f64) -> f64 {
        (speed * factor).clamp(MIN_SPEED, MAX_SPEED)
    }

    /// Stop time, or restart it at the speed it was before being stopped.
    fn toggle_pause(&mut self) {
        match self.paused_speed.take() {
            Some(speed) => {
                self.clock.set_time_multiplier(speed);
                tracing::info!("Resumed at {speed}x");
            }
            None => {
                self.paused_speed = Some(self.clock.time_multiplier());
                self.clock.set_time_multiplier(0.0);
                tracing::info!("Paused");
            }
        }
    }

    /// Match the canvas to a new terminal size. Existing embers stay where they are, only new
    /// spawns use the new centre.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.canvas.resize(width, height * 2);
        tracing::debug!("Canvas resized to {}", self.canvas.dimensions());
    }

    /// Catch the simulation up with the wall clock and draw it.
    pub fn frame(&mut self) -> Result<Surface> {
        self.record_frame_duration();

        let now = self.started.elapsed().as_secs_f64();
        let steps = self
            .simulation
            .advance(&mut self.clock, now, self.canvas.dimensions());
        tracing::trace!("Simulated {steps} steps");

        self.draw();
        let mut surface = Surface::from_canvas(&self.canvas)?;
        if self.config.show_stats {
            self.add_stats(&mut surface);
        }

        Ok(surface)
    }

    /// Paint the background and then every ember on top of it.
    fn draw(&mut self) {
        let config = self.simulation.config();
        let size = self.canvas.dimensions();
        self.canvas
            .fill_rect(Vec2::ZERO, size, &Fill::Solid(config.background));

        // Embers rise, so y needs to go up the screen.
        let mut flipped = self.canvas.flip_vertical();
        draw_particles(&self.simulation.particles, &mut *flipped, config);
    }

    /// Keep a short history of how long frames are taking.
    fn record_frame_duration(&mut self) {
        let now = std::time::Instant::now();
        if let Some(previous) = self.previous_frame {
            self.durations
                .push_front(now.duration_since(previous).as_secs_f64());
            if self.durations.len() > FPS_SAMPLE_SIZE {
                self.durations.pop_back();
            }
        }
        self.previous_frame = Some(now);
    }

    /// The lines of text in the stats overlay.
    fn stats(&self) -> [String; 3] {
        let count = self.simulation.particles.len();
        let speed = if self.paused_speed.is_some() {
            "paused".to_owned()
        } else {
            format!("{:.3}x", self.clock.time_multiplier())
        };

        #[expect(
            clippy::as_conversions,
            clippy::cast_precision_loss,
            reason = "This is just debugging output"
        )]
        let fps = if self.durations.is_empty() {
            0.0
        } else {
            let average_tick = self.durations.iter().sum::<f64>() / self.durations.len() as f64;
            1.0 / average_tick
        };

        [
            format!("Particles: {count}"),
            format!("Speed: {speed}"),
            format!("FPS: {fps:.1}"),
        ]
    }

    /// Overlay the stats in the top-right corner.
    fn add_stats(&self, surface: &mut Surface) {
        let column = surface.width.saturating_sub(STATS_WIDTH);
        for (row, line) in self.stats().into_iter().enumerate() {
            if row >= surface.height {
                break;
            }
            surface.add_text(column, row, line, None, None);
        }
    }

    /// Sleep until it's time for the next frame.
    pub async fn sleep_until_next_frame_tick(&mut self) {
        let target = crate::renderer::ONE_MICROSECOND.wrapping_div(self.config.frame_rate.into());
        let target_frame_rate_micro = std::time::Duration::from_micros(target);
        if let Some(wait) = target_frame_rate_micro.checked_sub(self.last_frame_tick.elapsed()) {
            tokio::time::sleep(wait).await;
        }
        self.last_frame_tick = std::time::Instant::now();
    }
}

#[cfg(test)]
#[expect(clippy::indexing_slicing, reason = "Tests aren't so strict")]
mod test {
    use super::*;

    fn key(key: KeyCode) -> InputEvent {
        InputEvent::Key(termwiz::input::KeyEvent {
            key,
            modifiers: Modifiers::NONE,
        })
    }

    fn embers() -> Embers {
        let mut config = crate::config::main::Config::default();
        config.simulation.particle_count = 10;
        config.simulation.warmup = 1.0;
        Embers::new(config, 40, 10).unwrap()
    }

    fn assert_speed(embers: &Embers, expected: f64) {
        let speed = embers.clock.time_multiplier();
        assert!((speed - expected).abs() < 1e-9, "{speed} != {expected}");
    }

    #[test]
    fn starts_warmed_up() {
        let embers = embers();
        assert_eq!(embers.simulation.particles.len(), 10);
        assert_eq!(embers.canvas.pixel_dimensions(), (40, 20));
        assert!(embers
            .simulation
            .particles
            .iter()
            .any(|particle| particle.time > 0.0));
    }

    #[test]
    fn quitting() {
        let mut embers = embers();
        assert_eq!(embers.handle_input(&key(KeyCode::Char('q'))), Control::Quit);
        assert_eq!(embers.handle_input(&key(KeyCode::Escape)), Control::Quit);
        let ctrl_c = InputEvent::Key(termwiz::input::KeyEvent {
            key: KeyCode::Char('c'),
            modifiers: Modifiers::CTRL,
        });
        assert_eq!(embers.handle_input(&ctrl_c), Control::Quit);
        assert_eq!(
            embers.handle_input(&key(KeyCode::Char('c'))),
            Control::Continue
        );
    }

    #[test]
    fn speed_changes_are_clamped() {
        let mut embers = embers();
        embers.handle_input(&key(KeyCode::Char('+')));
        assert_speed(&embers, 2.0);
        embers.handle_input(&key(KeyCode::Char('=')));
        assert_speed(&embers, 4.0);
        for _ in 0..10 {
            embers.handle_input(&key(KeyCode::Char('+')));
        }
        assert_speed(&embers, MAX_SPEED);
        for _ in 0..20 {
            embers.handle_input(&key(KeyCode::Char('-')));
        }
        assert_speed(&embers, MIN_SPEED);
    }

    #[test]
    fn pausing_restores_previous_speed() {
        let mut embers = embers();
        embers.handle_input(&key(KeyCode::Char('+')));
        embers.handle_input(&key(KeyCode::Char(' ')));
        assert_speed(&embers, 0.0);

        embers.handle_input(&key(KeyCode::Char('-')));
        embers.handle_input(&key(KeyCode::Char('-')));
        assert_speed(&embers, 0.0);

        embers.handle_input(&key(KeyCode::Char(' ')));
        assert_speed(&embers, 0.5);
    }

    #[test]
    fn paused_embers_dont_move() {
        let mut embers = embers();
        embers.handle_input(&key(KeyCode::Char(' ')));
        let before = embers.simulation.particles.clone();
        std::thread::sleep(std::time::Duration::from_millis(20));
        embers.frame().unwrap();
        assert_eq!(embers.simulation.particles, before);
    }

    #[test]
    fn frames_fill_the_terminal() {
        let mut embers = embers();
        let mut surface = embers.frame().unwrap();
        assert_eq!((surface.width, surface.height), (40, 10));
        let cells = surface.surface.screen_cells();
        assert_eq!(cells[0][0].str(), "▀");
        assert_eq!(cells[9][39].str(), "▀");
    }

    #[test]
    fn stats_overlay() {
        let mut embers = embers();
        embers.config.show_stats = true;
        embers.frame().unwrap();
        let mut surface = embers.frame().unwrap();
        let cells = surface.surface.screen_cells();
        let first_line: String = cells[0][20..]
            .iter()
            .map(termwiz::cell::Cell::str)
            .collect();
        assert!(first_line.starts_with("Particles: 10"), "{first_line}");
        let third_line: String = cells[2][20..]
            .iter()
            .map(termwiz::cell::Cell::str)
            .collect();
        assert!(third_line.starts_with("FPS: "), "{third_line}");
    }

    #[test]
    fn resizing_keeps_particles() {
        let mut embers = embers();
        let before = embers.simulation.particles.clone();
        embers.resize(80, 30);
        assert_eq!(embers.canvas.pixel_dimensions(), (80, 60));
        assert_eq!(embers.simulation.particles, before);
        let surface = embers.frame().unwrap();
        assert_eq!((surface.width, surface.height), (80, 30));
    }

    #[tokio::test]
    async fn sleeps_until_next_frame() {
        let mut embers = embers();
        embers.config.frame_rate = 20;
        embers.last_frame_tick = std::time::Instant::now();
        let start = std::time::Instant::now();
        embers.sleep_until_next_frame_tick().await;
        assert!(start.elapsed() >= std::time::Duration::from_millis(40));
    }
}
