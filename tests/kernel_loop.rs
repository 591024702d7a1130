//=========================================================================
// Kernel Loop Integration Tests
//=========================================================================
//
// Drives the whole loop headlessly: ManualTime for the clock and a
// HeadlessPlatform fed through its channel.
//
//=========================================================================

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use approx::assert_relative_eq;
use crossbeam_channel::Sender;

use fixed_kernel::core::platform_bridge::HeadlessPlatform;
use fixed_kernel::core::Kernel;
use fixed_kernel::prelude::*;

//=== Test Helpers ========================================================

type Journal = Rc<RefCell<Vec<String>>>;

#[derive(Default)]
struct NullTarget {
    presented: u32,
}

impl RenderTarget for NullTarget {
    fn clear(&mut self, _color: Color) {}

    fn present(&mut self) {
        self.presented += 1;
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Scriptable state: logs lifecycle calls and runs an optional action on
/// each update.
struct Scripted {
    name: &'static str,
    journal: Journal,
    closeable: bool,
    on_update: Option<Box<dyn FnMut(&mut GlobalContext, u32)>>,
    ticks: u32,
}

impl Scripted {
    fn new(name: &'static str, journal: &Journal) -> Self {
        Self { name, journal: Rc::clone(journal), closeable: true, on_update: None, ticks: 0 }
    }

    fn on_update(mut self, f: impl FnMut(&mut GlobalContext, u32) + 'static) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    fn log(&self, what: &str) {
        self.journal.borrow_mut().push(format!("{}:{}", self.name, what));
    }
}

impl Drop for Scripted {
    fn drop(&mut self) {
        self.log("drop");
    }
}

impl State for Scripted {
    fn settings(&self) -> StateSettings {
        StateSettings { is_closeable: self.closeable, ..Default::default() }
    }

    fn update(&mut self, ctx: &mut GlobalContext, _dt: Duration) {
        self.ticks += 1;
        let tick = self.ticks;
        if let Some(f) = self.on_update.as_mut() {
            f(ctx, tick);
        }
    }

    fn draw(&mut self, _target: &mut dyn RenderTarget, _ctx: &GlobalContext, _alpha: f64) {}

    fn pause(&mut self, _ctx: &mut GlobalContext) {
        self.log("pause");
    }

    fn resume(&mut self, _ctx: &mut GlobalContext) {
        self.log("resume");
    }

    fn on_close_requested(&mut self, _ctx: &mut GlobalContext) {
        self.log("close");
    }
}

struct Harness {
    kernel: Kernel,
    platform: HeadlessPlatform,
    events: Sender<PlatformEvent>,
    target: NullTarget,
    time: ManualTime,
}

impl Harness {
    fn new(initial: impl State + 'static) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let (platform, events) = HeadlessPlatform::new(800, 600);
        let kernel = EngineBuilder::new()
            .with_update_rate(100.0)
            .with_draw_rate(50.0)
            .with_power_saving(false)
            .build()
            .into_kernel(initial, (800, 600));

        let mut harness = Self { kernel, platform, events, target: NullTarget::default(), time: ManualTime::new() };
        harness.iterate();
        harness
    }

    fn iterate(&mut self) -> bool {
        self.kernel.iterate(&mut self.platform, &mut self.target, &self.time)
    }

    /// Advances 10 ms (one tick) and iterates.
    fn step(&mut self) -> bool {
        self.time.advance(Duration::from_millis(10));
        self.iterate()
    }

    fn send(&self, event: PlatformEvent) {
        self.events.send(event).unwrap();
    }
}

fn entries(journal: &Journal) -> Vec<String> {
    journal.borrow().clone()
}

//=== Scheduling ==========================================================

#[test]
fn n_intervals_run_n_ticks() {
    let counter = Rc::new(RefCell::new(0u32));
    let seen = Rc::clone(&counter);
    let journal = Journal::default();
    let mut h = Harness::new(Scripted::new("a", &journal).on_update(move |_, _| *seen.borrow_mut() += 1));

    for _ in 0..500 {
        h.step();
    }

    assert_eq!(*counter.borrow(), 500);
    assert_eq!(h.target.presented, 250);
    assert_relative_eq!(h.kernel.clock().ups(), 100.0, epsilon = 1e-6);
    // A 250 ms window holds 12 or 13 of the 20 ms draws
    assert_relative_eq!(h.kernel.clock().fps(), 50.0, epsilon = 2.5);
}

#[test]
fn uneven_frames_keep_tick_count() {
    let journal = Journal::default();
    let mut h = Harness::new(Scripted::new("a", &journal));

    for ms in [3, 17, 1, 29, 10, 40] {
        h.time.advance(Duration::from_millis(ms));
        h.iterate();
    }

    assert_eq!(h.kernel.clock().total_ticks(), 10);
}

//=== Stack ===============================================================

#[test]
fn push_then_pop_in_one_tick_leaves_original() {
    let journal = Journal::default();
    let inner = Rc::clone(&journal);
    let mut h = Harness::new(Scripted::new("a", &journal).on_update(move |ctx, tick| {
        if tick == 1 {
            ctx.request_push(Scripted::new("b", &inner));
            ctx.request_pop(1);
        }
    }));
    let a = h.kernel.stack().top_id();

    h.step();

    assert_eq!(h.kernel.stack().depth(), 1);
    assert_eq!(h.kernel.stack().top_id(), a);
    assert_eq!(entries(&journal), vec!["a:pause", "b:drop", "a:resume"]);
}

#[test]
fn pushed_state_takes_over_next_tick() {
    let journal = Journal::default();
    let inner = Rc::clone(&journal);
    let mut h = Harness::new(Scripted::new("menu", &journal).on_update(move |ctx, tick| {
        if tick == 1 {
            let again = Rc::clone(&inner);
            ctx.request_push(Scripted::new("game", &inner).on_update(move |ctx, _| {
                again.borrow_mut().push("game:update".to_owned());
                ctx.request_pop(5);
            }));
        }
    }));

    h.step();
    h.step();

    assert_eq!(h.kernel.stack().depth(), 1);
    assert_eq!(entries(&journal), vec!["menu:pause", "game:update", "game:drop", "menu:resume"]);
}

#[test]
fn quit_tears_down_lifo() {
    let journal = Journal::default();
    let inner = Rc::clone(&journal);
    let mut h = Harness::new(Scripted::new("a", &journal).on_update(move |ctx, tick| {
        if tick == 1 {
            ctx.request_push(Scripted::new("b", &inner));
            ctx.request_push(Scripted::new("c", &inner).on_update(|ctx, _| ctx.request_quit()));
        }
    }));

    assert!(h.step());
    assert!(!h.step());
    h.kernel.shutdown();

    assert!(h.kernel.stack().is_empty());
    assert_eq!(
        entries(&journal),
        vec!["a:pause", "b:pause", "c:drop", "b:drop", "a:drop"]
    );
}

//=== Input ===============================================================

#[test]
fn held_key_yields_one_press_and_one_release() {
    let presses = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&presses);
    let journal = Journal::default();
    let mut h = Harness::new(Scripted::new("a", &journal).on_update(move |ctx, tick| {
        let input = ctx.input();
        if input.key_descending(KeyCode::Space) {
            seen.borrow_mut().push(format!("down@{}", tick));
        }
        if input.key_ascending(KeyCode::Space) {
            seen.borrow_mut().push(format!("up@{}", tick));
        }
    }));

    h.send(PlatformEvent::KeyPressed { key: KeyCode::Space, repeat: false });
    h.step();
    for _ in 0..5 {
        h.send(PlatformEvent::KeyPressed { key: KeyCode::Space, repeat: true });
        h.step();
    }
    h.send(PlatformEvent::KeyReleased { key: KeyCode::Space });
    h.step();

    assert_eq!(*presses.borrow(), vec!["down@1", "up@7"]);
}

#[test]
fn joystick_axis_respects_dead_zone() {
    let readings = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&readings);
    let journal = Journal::default();
    let mut h = Harness::new(Scripted::new("a", &journal).on_update(move |ctx, _| {
        seen.borrow_mut().push(ctx.input().joystick_axis(0, JoystickAxis::LeftX));
    }));

    h.send(PlatformEvent::JoystickConnected(0));
    h.step();
    h.platform.set_joystick_axis(0, JoystickAxis::LeftX, 60.0);
    h.step();
    h.platform.set_joystick_axis(0, JoystickAxis::LeftX, 5.0);
    h.step();

    assert_eq!(*readings.borrow(), vec![0.0, 60.0, 0.0]);
}

//=== Window ==============================================================

#[test]
fn close_on_non_closeable_state_is_forwarded() {
    let journal = Journal::default();
    let mut editor = Scripted::new("editor", &journal);
    editor.closeable = false;
    let mut h = Harness::new(editor);

    h.send(PlatformEvent::CloseRequested);

    assert!(h.step());
    assert_eq!(entries(&journal), vec!["editor:close"]);
}

#[test]
fn dropping_event_source_closes_engine() {
    let journal = Journal::default();
    let mut h = Harness::new(Scripted::new("a", &journal));

    let (replacement, _) = crossbeam_channel::unbounded();
    drop(std::mem::replace(&mut h.events, replacement));

    assert!(!h.step());
}

#[test]
fn resize_updates_shared_layout() {
    let journal = Journal::default();
    let mut h = Harness::new(Scripted::new("a", &journal));

    h.send(PlatformEvent::Resized { width: 1024, height: 576 });
    h.send(PlatformEvent::CursorMoved { x: 100.0, y: 50.0 });
    h.step();

    assert_eq!(h.kernel.context().window_size(), (1024, 576));
    assert_eq!(h.kernel.context().pointer_position(), (100.0, 50.0));
}
