//=========================================================================
// Fixed Kernel Engine
//
// Main entry point and configuration for the engine.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run_windowed()──>  [Winit loop]
//         │                          │
//         ├─ with_update_rate()      ├─ run_with()  (any Platform/TimeSource)
//         ├─ with_draw_rate()        └─ into_kernel() (drive iterate() yourself)
//         └─ ...
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;
use std::time::Duration;

use log::info;
use thiserror::Error;
use winit::error::{EventLoopError, OsError};
use winit::window::Window;

//=== Internal Dependencies ===============================================

use crate::core::clock::{FrameClock, TimeSource, WallClock};
use crate::core::input::AXIS_RANGE;
use crate::core::platform_bridge::{Platform, RenderTarget};
use crate::core::state::State;
use crate::core::{Kernel, KernelConfig};
use crate::platform::{WindowSettings, WinitPlatform};

//=== EngineError =========================================================

/// Failures that stop the engine before its loop starts.
///
/// Once the loop runs nothing is fatal: clamping and dropped requests are
/// logged, never returned.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The platform event loop could not be created.
    #[error("event loop creation failed: {0}")]
    EventLoop(#[from] EventLoopError),

    /// The OS refused to create the window.
    #[error("window creation failed: {0}")]
    Window(#[from] OsError),

    /// The event loop stopped before a window existed.
    #[error("event loop exited with code {0} before a window was created")]
    ExitedBeforeWindow(i32),
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Update rate**: 60 Hz
/// - **Draw rate**: 60 Hz
/// - **Power saving**: on
/// - **Sampling window**: 250 ms
/// - **Key repeat as press**: off
/// - **Joystick dead zone**: 10 (of 100)
/// - **Debug overlay**: hidden (toggle with F3)
/// - **Window**: "Fixed Kernel", 1280×720
/// - **Channel capacity**: 128 events
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use fixed_kernel::prelude::*;
///
/// struct Title;
///
/// impl State for Title {
///     fn update(&mut self, _ctx: &mut GlobalContext, _dt: Duration) {}
///     fn draw(&mut self, _target: &mut dyn RenderTarget, _ctx: &GlobalContext, _alpha: f64) {}
/// }
///
/// struct NullTarget;
///
/// impl RenderTarget for NullTarget {
///     fn clear(&mut self, _color: Color) {}
///     fn present(&mut self) {}
///     fn as_any_mut(&mut self) -> &mut dyn std::any::Any { self }
/// }
///
/// EngineBuilder::new()
///     .with_update_rate(120.0)     // Simulation steps per second
///     .with_draw_rate(60.0)
///     .with_debug_overlay(true)
///     .build()
///     .run_windowed(Title, |_window| NullTarget)
///     .expect("engine failed to start");
/// ```
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    kernel: KernelConfig,
    window: WindowSettings,
    channel_capacity: usize,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            kernel: KernelConfig::default(),
            window: WindowSettings {
                title: "Fixed Kernel".to_owned(),
                size: (1280, 720),
            },
            channel_capacity: 128,
        }
    }

    /// Sets the fixed simulation rate.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `hz` is outside `1.0..=1_000_000.0`.
    pub fn with_update_rate(mut self, hz: f64) -> Self {
        assert!(
            (FrameClock::MIN_RATE..=FrameClock::MAX_RATE).contains(&hz),
            "Update rate must be within 1 Hz..=1 MHz, got {}",
            hz
        );
        self.kernel.update_rate = hz;
        self
    }

    /// Sets the target draw rate.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `hz` is outside `1.0..=1_000_000.0`.
    pub fn with_draw_rate(mut self, hz: f64) -> Self {
        assert!(
            (FrameClock::MIN_RATE..=FrameClock::MAX_RATE).contains(&hz),
            "Draw rate must be within 1 Hz..=1 MHz, got {}",
            hz
        );
        self.kernel.draw_rate = hz;
        self
    }

    /// Sleep between iterations when nothing is due.
    ///
    /// Default: true
    pub fn with_power_saving(mut self, enabled: bool) -> Self {
        self.kernel.power_saving = enabled;
        self
    }

    /// Sets how often UPS/FPS/strain are recomputed.
    ///
    /// # Panics
    ///
    /// Panics if `window` is zero.
    pub fn with_sampling_window(mut self, window: Duration) -> Self {
        assert!(!window.is_zero(), "Sampling window must be positive");
        self.kernel.sampling_window = window;
        self
    }

    /// Whether OS key auto-repeat counts as a renewed key press.
    ///
    /// Default: false
    pub fn with_key_repeat(mut self, enabled: bool) -> Self {
        self.kernel.key_repeat = enabled;
        self
    }

    /// Axis magnitude below which joystick axes read as zero.
    ///
    /// # Panics
    ///
    /// Panics if `dead_zone` is outside `[0, 100]`.
    pub fn with_joystick_dead_zone(mut self, dead_zone: f32) -> Self {
        assert!(
            (0.0..=AXIS_RANGE).contains(&dead_zone),
            "Dead zone must be within [0, {}], got {}",
            AXIS_RANGE,
            dead_zone
        );
        self.kernel.joystick_dead_zone = dead_zone;
        self
    }

    /// Shows the throughput overlay from the first frame.
    ///
    /// Default: false
    pub fn with_debug_overlay(mut self, visible: bool) -> Self {
        self.kernel.debug_overlay = visible;
        self
    }

    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    /// Sets the initial window size in logical pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be positive, got {}x{}", width, height);
        self.window.size = (width, height);
        self
    }

    /// Sets the capacity of the platform event channel.
    ///
    /// Events beyond this many per frame are dropped with a warning.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Builds the engine instance.
    pub fn build(self) -> Engine {
        info!(
            target: "kernel",
            "Building engine (update: {} Hz, draw: {} Hz, channel: {})",
            self.kernel.update_rate,
            self.kernel.draw_rate,
            self.channel_capacity
        );

        Engine {
            kernel: self.kernel,
            window: self.window,
            channel_capacity: self.channel_capacity,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Configured engine, ready to run an initial state.
///
/// Create via [`EngineBuilder`] with `EngineBuilder::new().build()`.
#[derive(Debug, Clone)]
pub struct Engine {
    kernel: KernelConfig,
    window: WindowSettings,
    channel_capacity: usize,
}

impl Engine {
    /// Loop settings this engine will run with.
    pub fn config(&self) -> &KernelConfig {
        &self.kernel
    }

    //--- Execution --------------------------------------------------------

    /// Opens a window and runs `initial` in real time until quit.
    ///
    /// `make_target` receives the window once it exists and returns the
    /// render target draws go to.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the Winit event loop and pumps it until the window opens
    /// 2. Builds the render target
    /// 3. Pushes `initial` and runs the fixed-timestep loop
    /// 4. On quit: tears the stack down LIFO and returns
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the event loop or window cannot be
    /// created. Nothing after the loop starts is fatal.
    pub fn run_windowed<S, T, F>(self, initial: S, make_target: F) -> Result<(), EngineError>
    where
        S: State + 'static,
        T: RenderTarget,
        F: FnOnce(Arc<Window>) -> T,
    {
        info!(target: "kernel", "Starting windowed engine");

        let mut platform = WinitPlatform::new(self.window.clone(), self.channel_capacity)?;
        let window = platform.open_window()?;
        let mut target = make_target(window);

        self.run_with(initial, &mut platform, &mut target, &WallClock::new());

        info!(target: "kernel", "Engine shutdown complete");
        Ok(())
    }

    /// Runs `initial` against any platform, target and time source until
    /// quit, then tears down.
    pub fn run_with<S, P, T>(self, initial: S, platform: &mut P, target: &mut dyn RenderTarget, time: &T)
    where
        S: State + 'static,
        P: Platform + ?Sized,
        T: TimeSource + ?Sized,
    {
        let mut kernel = self.into_kernel(initial, platform.window_size());
        kernel.run(platform, target, time);
    }

    /// Builds a started kernel for callers that drive
    /// [`Kernel::iterate`] themselves.
    pub fn into_kernel<S: State + 'static>(self, initial: S, window_size: (u32, u32)) -> Kernel {
        let mut kernel = Kernel::new(&self.kernel, window_size);
        kernel.start(Box::new(initial));
        kernel
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
