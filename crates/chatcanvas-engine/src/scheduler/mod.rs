//! Render loop scheduling.
//!
//! The host (winit) calls [`LoopScheduler::tick`] once per redraw. The
//! scheduler waits for the device, configures the surface, runs `on_ready`
//! once and then `on_tick` on every later tick.

mod callbacks;
mod state;

pub use callbacks::PendingCallbacks;
pub use state::{LoopScheduler, LoopState, Stage};
