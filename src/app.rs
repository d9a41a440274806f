//! Native window and game loop
//!
//! A winit `ApplicationHandler` owns the window, the GPU renderer and
//! whichever demo is running. Every redraw measures the frame, steps the
//! simulation with the configured timestep strategy and renders.

use std::sync::Arc;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::config::{Backend, Config, Demo, RulesConfig, TimestepConfig};
use crate::consts::CHECKERBOARD_SIZE;
use crate::error::{PongError, Result};
use crate::input::{Action, Keyboard, map_key};
use crate::renderer::shapes::{Ortho, fullscreen_quad, scene_vertices, textured_quad};
use crate::renderer::vertex::colors;
use crate::renderer::{
    Batch, Framebuffer, GpuRenderer, Scene, Texture, TextureSlot, checkerboard,
};
use crate::sim::{
    FixedTimestep, FpsCounter, FrameClock, GameEvent, GamePhase, GameState, Side, Snapshot,
    TickInput, TimestepMode, tick,
};

/// Open the window and run until it closes
pub fn run(config: Config) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App {
    config: Config,
    state: Option<AppState>,
    /// Fatal error raised inside a callback, returned from `run`
    error: Option<PongError>,
}

impl App {
    fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: PongError) {
        log::error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }
}

struct AppState {
    window: Arc<Window>,
    gpu: GpuRenderer,
    keyboard: Keyboard,
    clock: FrameClock,
    fps: FpsCounter,
    backend: Backend,
    demo: DemoState,
}

enum DemoState {
    Pong(Box<PongLoop>),
    Checkerboard {
        texture: Texture,
        /// Window-sized buffer for the software backend
        framebuffer: Option<Framebuffer>,
    },
}

impl AppState {
    fn new(event_loop: &ActiveEventLoop, config: &Config) -> Result<Self> {
        let attributes = Window::default_attributes()
            .with_title(config.window.title.clone())
            .with_inner_size(PhysicalSize::new(config.window.width, config.window.height));
        let window = Arc::new(event_loop.create_window(attributes)?);
        log::info!(
            "Window created: {}x{}",
            config.window.width,
            config.window.height
        );

        let mut gpu = pollster::block_on(GpuRenderer::new(window.clone(), config.window.vsync))?;

        let demo = match config.demo {
            Demo::Pong => {
                let seed = config.seed.unwrap_or_else(rand::random);
                log::info!("Seed: {}", seed);
                DemoState::Pong(Box::new(PongLoop::new(
                    &config.rules,
                    &config.timestep,
                    seed,
                    config.backend,
                )))
            }
            Demo::Checkerboard => {
                let texture = checkerboard(CHECKERBOARD_SIZE);
                let framebuffer = match config.backend {
                    Backend::Gpu => {
                        gpu.upload_image(texture.width, texture.height, texture.as_bytes());
                        None
                    }
                    Backend::Software => Some(Framebuffer::new(gpu.size.0, gpu.size.1)),
                };
                DemoState::Checkerboard {
                    texture,
                    framebuffer,
                }
            }
        };

        log::info!(
            "Running {} demo on the {} backend ({} timestep)",
            config.demo.as_str(),
            config.backend.as_str(),
            config.timestep.mode.as_str()
        );

        Ok(Self {
            window,
            gpu,
            keyboard: Keyboard::new(),
            clock: FrameClock::new(),
            fps: FpsCounter::new(),
            backend: config.backend,
            demo,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        if let DemoState::Checkerboard {
            framebuffer: Some(framebuffer),
            ..
        } = &mut self.demo
        {
            framebuffer.resize(width, height);
        }
    }

    /// One frame: step, then render. Returns false once the game has quit.
    fn redraw(&mut self) -> std::result::Result<bool, wgpu::SurfaceError> {
        let frame_time = self.clock.tick();
        if let Some(fps) = self.fps.frame(frame_time) {
            log::debug!("FPS: {}", fps);
        }

        let input = self.keyboard.tick_input();
        self.keyboard.begin_frame();

        match &mut self.demo {
            DemoState::Pong(pong) => {
                let snapshot = pong.step(frame_time.as_micros() as u64, &input);
                if let Some(title) = pong.title_update() {
                    self.window.set_title(&title);
                }
                let running = pong.game.program_running;
                pong.render(&mut self.gpu, self.backend, &snapshot)?;
                Ok(running)
            }
            DemoState::Checkerboard {
                texture,
                framebuffer,
            } => {
                render_checkerboard(&mut self.gpu, texture, framebuffer.as_mut())?;
                Ok(true)
            }
        }
    }
}

/// Simulation plus everything needed to draw it
struct PongLoop {
    game: GameState,
    rules: RulesConfig,
    mode: TimestepMode,
    timestep: FixedTimestep,
    max_frame_time: f32,
    /// State before the most recent fixed step
    previous: Snapshot,
    /// Arena-sized buffer for the software backend
    framebuffer: Framebuffer,
    title: String,
}

impl PongLoop {
    fn new(rules: &RulesConfig, timestep: &TimestepConfig, seed: u64, backend: Backend) -> Self {
        let game = GameState::new(rules, seed);
        let framebuffer = match backend {
            Backend::Software => Framebuffer::new(rules.arena_width, rules.arena_height),
            Backend::Gpu => Framebuffer::new(0, 0),
        };
        Self {
            previous: game.snapshot(),
            title: String::new(),
            game,
            rules: rules.clone(),
            mode: timestep.mode,
            timestep: FixedTimestep::new(
                timestep.sim_dt(),
                timestep.max_substeps,
                timestep.max_frame_time,
            ),
            max_frame_time: timestep.max_frame_time,
            framebuffer,
        }
    }

    /// Advance the simulation for one rendered frame and return what to draw
    fn step(&mut self, frame_micros: u64, input: &TickInput) -> Snapshot {
        let frame_dt = frame_micros as f32 / 1_000_000.0;
        let mut events = Vec::new();

        let snapshot = match self.mode {
            TimestepMode::Fixed => {
                let steps = self.timestep.advance(frame_dt);
                for _ in 0..steps {
                    self.previous = self.game.snapshot();
                    let step_events = tick(&mut self.game, input, &self.rules, self.timestep.dt());
                    // The ball teleported to the centre; don't blend across the jump
                    if step_events
                        .iter()
                        .any(|e| matches!(e, GameEvent::Scored(_) | GameEvent::NewMatch))
                    {
                        self.previous = self.game.snapshot();
                    }
                    events.extend(step_events);
                }
                Snapshot::interpolate(&self.previous, &self.game.snapshot(), self.timestep.alpha())
            }
            TimestepMode::Variable => {
                let dt = frame_dt.min(self.max_frame_time);
                events = tick(&mut self.game, input, &self.rules, dt);
                self.game.snapshot()
            }
            TimestepMode::VsyncLocked => {
                events = tick(&mut self.game, input, &self.rules, self.timestep.dt());
                self.game.snapshot()
            }
        };

        for event in &events {
            log::debug!("{:?}", event);
            if let GameEvent::MatchWon(side) = event {
                log::info!("{} player wins", side_name(*side));
            }
        }

        snapshot
    }

    /// New window title when the score or phase changed since the last call
    fn title_update(&mut self) -> Option<String> {
        let title = window_title(&self.game);
        if title == self.title {
            return None;
        }
        self.title = title.clone();
        Some(title)
    }

    fn render(
        &mut self,
        gpu: &mut GpuRenderer,
        backend: Backend,
        snapshot: &Snapshot,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let scene = Scene::from_snapshot(snapshot, self.game.arena_width, self.game.arena_height);
        match backend {
            Backend::Gpu => {
                let vertices = scene_vertices(&scene);
                gpu.render(
                    scene.clear,
                    &[Batch {
                        slot: TextureSlot::White,
                        vertices: &vertices,
                    }],
                )
            }
            Backend::Software => {
                self.framebuffer.draw_scene(&scene);
                gpu.upload_image(
                    self.framebuffer.width,
                    self.framebuffer.height,
                    self.framebuffer.as_bytes(),
                );
                let vertices = fullscreen_quad();
                gpu.render(
                    scene.clear,
                    &[Batch {
                        slot: TextureSlot::Image,
                        vertices: &vertices,
                    }],
                )
            }
        }
    }
}

fn render_checkerboard(
    gpu: &mut GpuRenderer,
    texture: &Texture,
    framebuffer: Option<&mut Framebuffer>,
) -> std::result::Result<(), wgpu::SurfaceError> {
    let (width, height) = gpu.size;
    let (x, y) = texture.centered_in(width, height);

    let vertices = match framebuffer {
        Some(framebuffer) => {
            framebuffer.clear(colors::BACKGROUND);
            framebuffer.blit(texture, x.round() as i32, y.round() as i32);
            gpu.upload_image(framebuffer.width, framebuffer.height, framebuffer.as_bytes());
            fullscreen_quad()
        }
        None => textured_quad(
            &Ortho::new(width, height),
            Vec2::new(x, y),
            Vec2::new(texture.width as f32, texture.height as f32),
        ),
    };

    gpu.render(
        colors::BACKGROUND,
        &[Batch {
            slot: TextureSlot::Image,
            vertices: &vertices,
        }],
    )
}

fn side_name(side: Side) -> &'static str {
    match side {
        Side::Left => "Left",
        Side::Right => "Right",
    }
}

/// Window title showing the score, or the winner once the match is over
fn window_title(game: &GameState) -> String {
    let [left, right] = [game.players[0].score, game.players[1].score];
    match game.phase {
        GamePhase::GameOver { winner } => format!(
            "Pong  {} - {}  {} player wins! Space to play again",
            left,
            right,
            side_name(winner)
        ),
        _ => format!("Pong  {} - {}", left, right),
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match AppState::new(event_loop, &self.config) {
            Ok(state) => self.state = Some(state),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let (w, h) = (physical_size.width, physical_size.height);
                if w > 0 && h > 0 {
                    state.resize(w, h);
                    log::debug!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::Focused(false) => state.keyboard.release_all(),

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(action) = map_key(key_code) {
                        let is_down = event.state == ElementState::Pressed;
                        state.keyboard.key_event(action, is_down);
                        if action == Action::Quit && is_down {
                            log::info!("Escape pressed, exiting");
                            event_loop.exit();
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                match state.redraw() {
                    Ok(true) => {}
                    Ok(false) => {
                        log::info!("Game stopped, exiting");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        state.gpu.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of GPU memory, exiting");
                        event_loop.exit();
                    }
                    Err(e) => log::warn!("Surface error: {:?}", e),
                }
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PlayerInput;

    fn pong(mode: TimestepMode) -> PongLoop {
        let timestep = TimestepConfig {
            mode,
            ..Default::default()
        };
        PongLoop::new(&RulesConfig::default(), &timestep, 3, Backend::Software)
    }

    fn serve() -> TickInput {
        TickInput {
            serve: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_window_title() {
        let mut game = GameState::new(&RulesConfig::default(), 0);
        assert_eq!(window_title(&game), "Pong  0 - 0");

        game.players[0].score = 11;
        game.players[1].score = 4;
        game.phase = GamePhase::GameOver { winner: Side::Left };
        assert_eq!(
            window_title(&game),
            "Pong  11 - 4  Left player wins! Space to play again"
        );
    }

    #[test]
    fn test_title_update_only_on_change() {
        let mut pong = pong(TimestepMode::Fixed);
        assert_eq!(pong.title_update().as_deref(), Some("Pong  0 - 0"));
        assert_eq!(pong.title_update(), None);

        pong.game.players[1].score = 1;
        assert_eq!(pong.title_update().as_deref(), Some("Pong  0 - 1"));
    }

    #[test]
    fn test_fixed_mode_interpolates_between_steps() {
        let mut pong = pong(TimestepMode::Fixed);

        // Serve on the first step
        pong.step(16_833, &serve());
        let start = pong.game.ball.pos;

        // One more step, then half a step of leftover time
        let snapshot = pong.step(24_833, &TickInput::default());
        let prev = pong.previous.ball.center;
        let curr = pong.game.ball.pos;
        assert_ne!(prev, curr);
        assert_eq!(prev, start);
        let x = snapshot.ball.center.x;
        assert!(x > prev.x.min(curr.x) && x < prev.x.max(curr.x));
    }

    #[test]
    fn test_score_is_drawn_at_the_reset_position() {
        let mut pong = pong(TimestepMode::Fixed);
        pong.game.phase = GamePhase::Playing;
        pong.game.ball.pos = Vec2::new(2.0, 100.0);
        pong.game.ball.velocity = Vec2::new(-800.0, 0.0);

        // One and a half steps: the point is scored and alpha is mid-step
        let snapshot = pong.step(25_000, &TickInput::default());
        assert_eq!(pong.game.players[1].score, 1);
        assert_eq!(snapshot.ball.center, pong.game.ball.pos);
        assert_eq!(snapshot.ball.center, Vec2::new(640.0, 360.0));
    }

    #[test]
    fn test_new_match_is_drawn_without_blending() {
        let mut pong = pong(TimestepMode::Fixed);
        pong.game.phase = GamePhase::GameOver { winner: Side::Left };
        pong.game.players[0].pos.y = 100.0;
        pong.previous = pong.game.snapshot();

        let snapshot = pong.step(25_000, &serve());
        assert_eq!(pong.game.phase, GamePhase::Serve);
        assert_eq!(snapshot.paddles[0].center, pong.game.players[0].pos);
    }

        #[test]
    fn test_fixed_mode_without_step_keeps_state() {
        let mut pong = pong(TimestepMode::Fixed);
        let before = pong.game.snapshot();
        let snapshot = pong.step(100, &TickInput::default());
        assert_eq!(pong.game.time_ticks, 0);
        assert_eq!(snapshot.ball, before.ball);
    }

    #[test]
    fn test_vsync_locked_ticks_once_with_fixed_dt() {
        let mut pong = pong(TimestepMode::VsyncLocked);
        let input = TickInput {
            players: [
                PlayerInput::default(),
                PlayerInput {
                    down: crate::sim::ButtonState {
                        ended_down: true,
                        half_transition_count: 1,
                    },
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let y = pong.game.players[1].pos.y;
        // A long frame still advances exactly one fixed step
        pong.step(100_000, &input);
        assert_eq!(pong.game.time_ticks, 1);
        let moved = pong.game.players[1].pos.y - y;
        assert!((moved - pong.rules.paddle_speed * pong.timestep.dt()).abs() < 1e-3);
    }

    #[test]
    fn test_variable_mode_clamps_frame_time() {
        let mut pong = pong(TimestepMode::Variable);
        let input = TickInput {
            players: [
                PlayerInput {
                    up: crate::sim::ButtonState {
                        ended_down: true,
                        half_transition_count: 1,
                    },
                    ..Default::default()
                },
                PlayerInput::default(),
            ],
            ..Default::default()
        };
        let y = pong.game.players[0].pos.y;
        pong.step(5_000_000, &input);
        assert_eq!(pong.game.time_ticks, 1);
        let moved = y - pong.game.players[0].pos.y;
        assert!((moved - pong.rules.paddle_speed * pong.max_frame_time).abs() < 1e-3);
    }

    #[test]
    fn test_software_framebuffer_matches_arena() {
        let pong = pong(TimestepMode::Fixed);
        assert_eq!(pong.framebuffer.width, 1280);
        assert_eq!(pong.framebuffer.height, 720);
    }
}
