//=========================================================================
// Debug Overlay
//=========================================================================
//
// Displays the frame clock's throughput figures in a screen corner.
//
// The text is rebuilt only when the clock publishes a new sampling
// window, so drawing it costs a single text call per pass.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::clock::ClockMetrics;
use crate::core::platform_bridge::RenderTarget;

//=== DebugOverlay ========================================================

/// Throughput readout drawn on top of every other state.
#[derive(Debug, Clone)]
pub struct DebugOverlay {
    visible: bool,
    text: String,
    window: Option<u64>,
}

impl DebugOverlay {
    /// Screen position of the readout's top-left corner.
    pub const POSITION: (f32, f32) = (8.0, 8.0);

    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            text: String::new(),
            window: None,
        }
    }

    //--- Visibility -------------------------------------------------------

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flips visibility and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        debug!(target: "kernel", "Debug overlay {}", if self.visible { "shown" } else { "hidden" });
        self.visible
    }

    //--- Content ----------------------------------------------------------

    /// Reformats the readout if `metrics` belongs to a window not yet
    /// shown. Returns true if the text changed.
    pub fn refresh(&mut self, metrics: &ClockMetrics) -> bool {
        if self.window == Some(metrics.window) {
            return false;
        }

        self.window = Some(metrics.window);
        self.text = format!(
            "UPS: {:.1} | FPS: {:.1} | Strain: {:.1}%",
            metrics.ups, metrics.fps, metrics.strain
        );
        true
    }

    /// Current readout text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Draws the readout when visible.
    pub fn draw(&self, target: &mut dyn RenderTarget) {
        if self.visible && !self.text.is_empty() {
            target.draw_debug_text(&self.text, Self::POSITION);
        }
    }
}

impl Default for DebugOverlay {
    fn default() -> Self {
        Self::new(false)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
