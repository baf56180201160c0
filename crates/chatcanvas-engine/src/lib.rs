//! Chatcanvas engine crate.
//!
//! GPU bring-up and per-frame submission for the chat widget surface:
//! capability negotiation, adapter/device acquisition, swapchain management,
//! and the render loop scheduler driven by the host event loop.

pub mod caps;
pub mod coords;
pub mod device;
pub mod logging;
pub mod scheduler;
#[cfg(not(target_arch = "wasm32"))]
pub mod time;
pub mod window;
