use crate::coords::ViewportSize;

/// Represents a single acquired frame.
///
/// This object is short-lived and must be finalized promptly. Holding the surface
/// texture prevents acquisition of subsequent frames.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// Read-only view of the device handed to draw payloads.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub viewport: ViewportSize,
}

/// Draw data producer (the UI layer) as seen by the frame submitter.
///
/// The submitter owns the pass; a payload only records into it.
pub trait DrawPayload {
    /// Uploads buffers before the pass opens.
    fn prepare(&mut self, _ctx: &RenderCtx<'_>) {}

    fn record(&mut self, ctx: &RenderCtx<'_>, pass: &mut wgpu::RenderPass<'_>);
}
