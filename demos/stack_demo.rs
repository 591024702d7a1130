//=========================================================================
// Stack Demo
//=========================================================================
//
// Walks through the state stack: splash → menu → gameplay ⇄ pause.
//
// Controls:
//   any key      skip splash
//   Enter        start (menu)
//   Arrows / pad move the marker (gameplay)
//   P            pause / unpause
//   Escape       back / quit
//   F3           throughput overlay
//
// The render target only logs, so the window stays blank; watch the log.
// Pass `--headless` to replay a scripted session without a window.
//
// Run with: RUST_LOG=debug cargo run --example stack_demo
//
//=========================================================================

use std::any::Any;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use env_logger::{Builder, Env};
use log::{error, info};

use fixed_kernel::core::platform_bridge::HeadlessPlatform;
use fixed_kernel::prelude::*;
use fixed_kernel::winit::window::Window;

//=== LogTarget ===========================================================

/// Render target that collects a frame's text and logs one frame per
/// second.
struct LogTarget {
    window: Option<Arc<Window>>,
    background: Color,
    lines: Vec<String>,
    frames: u64,
}

impl LogTarget {
    fn new(window: Option<Arc<Window>>) -> Self {
        Self { window, background: Color::BLACK, lines: Vec::new(), frames: 0 }
    }

    fn label(&mut self, text: String) {
        self.lines.push(text);
    }
}

impl RenderTarget for LogTarget {
    fn clear(&mut self, color: Color) {
        self.background = color;
        self.lines.clear();
    }

    fn draw_debug_text(&mut self, text: &str, _position: (f32, f32)) {
        self.lines.push(format!("[overlay] {}", text));
    }

    fn present(&mut self) {
        self.frames += 1;
        if self.frames % 60 == 1 {
            info!(target: "demo", "frame {} bg={:?}: {}", self.frames, self.background, self.lines.join(" / "));
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Writes a label if the target is the demo's own.
fn label(target: &mut dyn RenderTarget, text: String) {
    if let Some(log) = target.as_any_mut().downcast_mut::<LogTarget>() {
        log.label(text);
    }
}

//=== States ==============================================================

struct Splash {
    shown_for: Duration,
}

impl State for Splash {
    fn settings(&self) -> StateSettings {
        StateSettings { background_color: Color::WHITE, ..Default::default() }
    }

    fn handle_input(&mut self, ctx: &mut GlobalContext) {
        if !ctx.input().keys_pressed().is_empty() {
            ctx.request_swap(Menu);
        }
    }

    fn update(&mut self, ctx: &mut GlobalContext, dt: Duration) {
        self.shown_for += dt;
        if self.shown_for >= Duration::from_millis(1500) {
            ctx.request_swap(Menu);
        }
    }

    fn draw(&mut self, target: &mut dyn RenderTarget, _ctx: &GlobalContext, _alpha: f64) {
        label(target, format!("splash {:.1}s", self.shown_for.as_secs_f32()));
    }
}

struct Menu;

impl State for Menu {
    fn handle_input(&mut self, ctx: &mut GlobalContext) {
        let input = ctx.input();
        if input.key_descending(KeyCode::Enter) || input.joystick_button_descending(0, 9) {
            ctx.request_push(Gameplay::default());
        } else if input.key_descending(KeyCode::Escape) {
            ctx.request_quit();
        }
    }

    fn update(&mut self, _ctx: &mut GlobalContext, _dt: Duration) {}

    fn draw(&mut self, target: &mut dyn RenderTarget, _ctx: &GlobalContext, _alpha: f64) {
        label(target, "menu: Enter to play, Escape to quit".to_owned());
    }

    fn resume(&mut self, _ctx: &mut GlobalContext) {
        info!(target: "demo", "Back at the menu");
    }
}

#[derive(Default)]
struct Gameplay {
    position: (f32, f32),
    previous: (f32, f32),
    velocity: (f32, f32),
}

impl Gameplay {
    const SPEED: f32 = 120.0;
}

impl State for Gameplay {
    fn settings(&self) -> StateSettings {
        StateSettings { background_color: Color::rgb(20, 30, 60), ..Default::default() }
    }

    fn handle_input(&mut self, ctx: &mut GlobalContext) {
        let input = ctx.input();

        let axis = |negative: KeyCode, positive: KeyCode| {
            f32::from(u8::from(input.key_held(positive))) - f32::from(u8::from(input.key_held(negative)))
        };
        let mut dir = (axis(KeyCode::ArrowLeft, KeyCode::ArrowRight), axis(KeyCode::ArrowUp, KeyCode::ArrowDown));
        let stick = (input.joystick_axis(0, JoystickAxis::LeftX), input.joystick_axis(0, JoystickAxis::LeftY));
        if stick != (0.0, 0.0) {
            dir = (stick.0 / 100.0, -stick.1 / 100.0);
        }
        self.velocity = (dir.0 * Self::SPEED, dir.1 * Self::SPEED);

        if input.key_descending(KeyCode::KeyP) {
            ctx.request_push(Pause);
        } else if input.key_descending(KeyCode::Escape) {
            ctx.request_pop(1);
        }
    }

    fn update(&mut self, _ctx: &mut GlobalContext, dt: Duration) {
        self.previous = self.position;
        let secs = dt.as_secs_f32();
        self.position.0 += self.velocity.0 * secs;
        self.position.1 += self.velocity.1 * secs;
    }

    fn draw(&mut self, target: &mut dyn RenderTarget, ctx: &GlobalContext, alpha: f64) {
        let a = alpha as f32;
        let x = self.previous.0 + (self.position.0 - self.previous.0) * a;
        let y = self.previous.1 + (self.position.1 - self.previous.1) * a;
        let (w, h) = ctx.window_size();
        label(target, format!("marker at ({:.1}, {:.1}) in {}x{}", x, y, w, h));
    }

    fn pause(&mut self, _ctx: &mut GlobalContext) {
        info!(target: "demo", "Gameplay paused");
    }

    fn resume(&mut self, _ctx: &mut GlobalContext) {
        info!(target: "demo", "Gameplay resumed");
    }

    fn on_resize(&mut self, _ctx: &GlobalContext, width: u32, height: u32) {
        info!(target: "demo", "Playfield now {}x{}", width, height);
    }
}

/// Overlay drawn on top of the frozen game. Closing the window while
/// paused only unpauses.
struct Pause;

impl State for Pause {
    fn settings(&self) -> StateSettings {
        StateSettings { is_closeable: false, background_color: Color::rgb(20, 30, 60), ..Default::default() }
    }

    fn handle_input(&mut self, ctx: &mut GlobalContext) {
        if ctx.input().key_descending(KeyCode::KeyP) {
            ctx.request_pop(1);
        } else if ctx.input().key_descending(KeyCode::Escape) {
            // Back to the menu in one request
            ctx.request_pop(2);
        }
    }

    fn update(&mut self, _ctx: &mut GlobalContext, _dt: Duration) {}

    fn draw(&mut self, target: &mut dyn RenderTarget, _ctx: &GlobalContext, _alpha: f64) {
        label(target, "PAUSED".to_owned());
    }

    fn on_close_requested(&mut self, ctx: &mut GlobalContext) {
        info!(target: "demo", "Close while paused, unpausing instead");
        ctx.request_pop(1);
    }

    fn draws_state_below(&self) -> bool {
        true
    }
}

//=== Entry Point =========================================================

fn main() {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let engine = EngineBuilder::new()
        .with_window_title("Fixed Kernel - stack demo")
        .with_debug_overlay(true)
        .build();
    let splash = Splash { shown_for: Duration::ZERO };

    if std::env::args().any(|arg| arg == "--headless") {
        run_headless(engine, splash);
        return;
    }

    if let Err(err) = engine.run_windowed(splash, |window| LogTarget::new(Some(window))) {
        error!(target: "demo", "Engine failed: {}", err);
        std::process::exit(1);
    }
}

/// Scripted session: skip splash, play, pause, close while paused, quit.
fn run_headless(engine: Engine, splash: Splash) {
    let (mut platform, events) = HeadlessPlatform::new(1280, 720);

    let script = thread::spawn(move || {
        let press = |key: KeyCode| {
            for event in [PlatformEvent::KeyPressed { key, repeat: false }, PlatformEvent::KeyReleased { key }] {
                if events.send(event).is_err() {
                    return;
                }
                thread::sleep(Duration::from_millis(50));
            }
        };

        thread::sleep(Duration::from_millis(200));
        press(KeyCode::Space);
        press(KeyCode::Enter);
        let _ = events.send(PlatformEvent::KeyPressed { key: KeyCode::ArrowRight, repeat: false });
        thread::sleep(Duration::from_millis(500));
        press(KeyCode::KeyP);
        let _ = events.send(PlatformEvent::CloseRequested);
        thread::sleep(Duration::from_millis(200));
        press(KeyCode::Escape);
        press(KeyCode::Escape);
        // Dropping the sender reads as a final close request
    });

    engine.run_with(splash, &mut platform, &mut LogTarget::new(None), &WallClock::new());
    let _ = script.join();
}
