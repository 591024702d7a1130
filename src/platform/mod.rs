//=========================================================================
// Platform Subsystem
//
// Winit window and device layer behind the core's `Platform` trait.
//
// Architecture:
// ```text
//  Kernel::iterate()
//    └─ tick → InputSampler::begin_frame()
//                 └─ WinitPlatform::poll_frame_events()
//                      ├─ pump_app_events(0)  ─► WindowHandler
//                      │                           └─ InputProcessor
//                      │                                ├─ SnapshotTracker (held state)
//                      │                                └─ channel
//                      ├─ EventCollector drains channel
//                      └─ GamepadPoller::poll() (feature "gamepad")
// ```
//
// Key Design Decisions:
// - **Pumped, not run**: the kernel owns the loop and pumps Winit once
//   per tick with a zero timeout, so the fixed-timestep clock stays in
//   charge of pacing
// - **Window created lazily**: Winit only allows window creation once the
//   loop reports `resumed`; `WinitPlatform::open_window` pumps until then
// - **Close is an event**: the OS close button becomes
//   `PlatformEvent::CloseRequested`, and the top state decides
//
//=========================================================================

//=== Submodules ==========================================================

#[cfg(feature = "gamepad")]
mod gamepad;
mod input_processor;

//=== External Crates =====================================================

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::bounded;
use log::{debug, error, info, trace};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    error::OsError,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::input::DeviceSnapshot;
use crate::core::platform_bridge::{EventCollector, Platform, PlatformEvent, TickControl};
use crate::engine::EngineError;
use input_processor::InputProcessor;

#[cfg(feature = "gamepad")]
use gamepad::GamepadPoller;

//=== WindowSettings ======================================================

/// Window creation parameters.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WindowSettings {
    pub title: String,
    pub size: (u32, u32),
}

//=== WindowHandler =======================================================

/// Winit callback target. Owns the window once created.
struct WindowHandler {
    settings: WindowSettings,
    window: Option<Arc<Window>>,
    creation_error: Option<OsError>,
    processor: InputProcessor,
}

impl ApplicationHandler for WindowHandler {
    /// Creates the window on first resume. Later resumes (mobile) reuse it.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.settings.title.clone())
            .with_inner_size(LogicalSize::new(self.settings.size.0, self.settings.size.1));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                self.window = Some(Arc::new(window));
            }
            Err(err) => {
                error!(target: "platform", "Window creation failed: {}", err);
                self.creation_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let WindowEvent::CloseRequested = event {
            info!(target: "platform", "Window close requested");
        }
        self.processor.process(&event);
    }
}

//=== WinitPlatform =======================================================

/// [`Platform`] backed by a Winit window.
///
/// Not `Send`: Winit requires the main thread on macOS/iOS, so this lives
/// on the thread that called `Engine::run_windowed`.
pub(crate) struct WinitPlatform {
    event_loop: EventLoop<()>,
    handler: WindowHandler,
    collector: EventCollector,
    exited: bool,
    #[cfg(feature = "gamepad")]
    gamepads: Option<GamepadPoller>,
}

impl WinitPlatform {
    /// Time each pump waits while the window is still being created.
    const OPEN_POLL: Duration = Duration::from_millis(10);

    //--- Construction -----------------------------------------------------

    pub(crate) fn new(settings: WindowSettings, channel_capacity: usize) -> Result<Self, EngineError> {
        let event_loop = EventLoop::new()?;
        let (tx, rx) = bounded(channel_capacity);

        info!(target: "platform", "Platform subsystem initialized (channel: {})", channel_capacity);
        Ok(Self {
            event_loop,
            handler: WindowHandler {
                settings,
                window: None,
                creation_error: None,
                processor: InputProcessor::new(tx),
            },
            collector: EventCollector::new(rx),
            exited: false,
            #[cfg(feature = "gamepad")]
            gamepads: GamepadPoller::new(),
        })
    }

    /// Pumps Winit until the window exists and returns it.
    pub(crate) fn open_window(&mut self) -> Result<Arc<Window>, EngineError> {
        loop {
            if let Some(window) = &self.handler.window {
                return Ok(Arc::clone(window));
            }
            if let Some(err) = self.handler.creation_error.take() {
                return Err(EngineError::Window(err));
            }

            if let PumpStatus::Exit(code) = self.event_loop.pump_app_events(Some(Self::OPEN_POLL), &mut self.handler) {
                self.exited = true;
                if let Some(err) = self.handler.creation_error.take() {
                    return Err(EngineError::Window(err));
                }
                return Err(EngineError::ExitedBeforeWindow(code));
            }
        }
    }
}

impl Platform for WinitPlatform {
    fn poll_frame_events(&mut self, events: &mut Vec<PlatformEvent>) {
        if !self.exited {
            if let PumpStatus::Exit(code) = self.event_loop.pump_app_events(Some(Duration::ZERO), &mut self.handler) {
                info!(
                    target: "platform",
                    "Event loop exited with code {} ({} events dropped on a full channel)",
                    code,
                    self.handler.processor.dropped()
                );
                self.exited = true;
                self.handler.processor.emit(PlatformEvent::CloseRequested);
            }
        }

        if let TickControl::Exit = self.collector.collect_frame(events) {
            trace!(target: "platform", "Event channel disconnected");
        }

        #[cfg(feature = "gamepad")]
        if let Some(gamepads) = self.gamepads.as_mut() {
            let first_pad = events.len();
            gamepads.poll(events);
            self.handler.processor.tracker_mut().apply_all(&events[first_pad..]);
        }
    }

    fn read_device_state(&mut self, snapshot: &mut DeviceSnapshot) {
        #[cfg(feature = "gamepad")]
        if let Some(gamepads) = self.gamepads.as_ref() {
            gamepads.read_axes(self.handler.processor.tracker_mut().snapshot_mut());
        }

        snapshot.copy_from(self.handler.processor.tracker().snapshot());
    }

    fn window_size(&self) -> (u32, u32) {
        match &self.handler.window {
            Some(window) => {
                let size = window.inner_size();
                (size.width, size.height)
            }
            None => self.handler.settings.size,
        }
    }
}
