//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance and the Surface bound to the display target
//! - negotiating the adapter, capabilities and Device/Queue
//! - configuring the surface (swapchain) and rebuilding it on resize
//! - acquiring frames and submitting one render pass per tick

mod adapter;
mod backend;
mod bootstrap;
mod context;
mod error;
mod events;
mod frame;
mod init;
mod negotiate;
mod renderer;
mod surface;

#[cfg(test)]
mod testing;

pub use adapter::{negotiate_adapter, AdapterReport};
pub use backend::{AdapterDescription, AdapterProfile, GpuBackend, WgpuBackend};
pub use bootstrap::{bootstrap_surface, DisplayTarget};
#[cfg(target_arch = "wasm32")]
pub use bootstrap::{browser_viewport, find_canvas, follow_browser_window};
pub use context::GraphicsContext;
pub use error::GpuError;
pub use events::{ContextHealth, ContextId, ContextRegistry, DeviceEvent, DeviceEventSink};
pub use frame::{DrawPayload, GpuFrame, RenderCtx};
pub use init::RendererConfig;
pub use negotiate::{negotiate, negotiate_device, Negotiated, NegotiationPlan};
pub use renderer::Renderer;
pub use surface::{
    SurfaceBinding, SurfaceConfigurator, SurfacePreferences, SurfaceSettings, Swapchain,
    SwapchainTarget,
};
