use super::surface::{SurfaceBinding, SurfacePreferences};
use super::{
    AdapterProfile, ContextId, GpuError, GpuFrame, Negotiated, SurfaceConfigurator, Swapchain,
    WgpuBackend,
};
use crate::caps::NegotiatedCapabilities;
use crate::coords::ViewportSize;

/// Owns wgpu core objects and the surface configuration.
///
/// Only exists once negotiation succeeded, so adapter, device and queue are
/// always present. The swapchain is the only replaceable part.
pub struct GraphicsContext {
    instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,

    /// Preferred format reported by the adapter negotiator.
    surface_format: wgpu::TextureFormat,

    swapchain: SurfaceConfigurator,
    capabilities: NegotiatedCapabilities,
    profile: AdapterProfile,
    id: ContextId,
}

impl GraphicsContext {
    pub(crate) fn from_negotiated(negotiated: Negotiated<WgpuBackend>, id: ContextId) -> Self {
        let Negotiated {
            backend,
            adapter,
            device,
            queue,
            report,
            capabilities,
        } = negotiated;

        Self {
            instance: backend.instance,
            surface: backend.surface,
            adapter,
            device,
            queue,
            surface_format: report.surface_format,
            swapchain: SurfaceConfigurator::new(),
            capabilities,
            profile: report.profile,
            id,
        }
    }

    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    pub fn capabilities(&self) -> &NegotiatedCapabilities {
        &self.capabilities
    }

    pub fn profile(&self) -> &AdapterProfile {
        &self.profile
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn swapchain(&self) -> Option<&Swapchain> {
        self.swapchain.swapchain()
    }

    pub(crate) fn configure_surface(&mut self, prefs: SurfacePreferences, viewport: ViewportSize) {
        let binding = SurfaceBinding {
            surface: &self.surface,
            adapter: &self.adapter,
            device: &self.device,
        };
        self.swapchain
            .configure(&binding, self.surface_format, prefs, viewport);
    }

    pub(crate) fn rebuild_swapchain(&mut self, viewport: ViewportSize) -> Result<(), GpuError> {
        let binding = SurfaceBinding {
            surface: &self.surface,
            adapter: &self.adapter,
            device: &self.device,
        };
        self.swapchain.rebuild(&binding, viewport)?;
        Ok(())
    }

    /// Acquires the next surface texture and creates an encoder.
    ///
    /// `Ok(None)` means there is no swapchain (empty viewport) and the frame is
    /// skipped. A lost or outdated surface is rebuilt at `viewport` and
    /// acquisition retried once.
    pub(crate) fn begin_frame(&mut self, viewport: ViewportSize) -> Result<Option<GpuFrame>, GpuError> {
        if self.swapchain.swapchain().is_none() {
            return Ok(None);
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::warn!("surface {err}, rebuilding swapchain");
                self.rebuild_swapchain(viewport)?;
                if self.swapchain.swapchain().is_none() {
                    return Ok(None);
                }
                self.surface
                    .get_current_texture()
                    .map_err(|e| GpuError::Presentation(e.to_string()))?
            }
            Err(err) => return Err(GpuError::Presentation(err.to_string())),
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("chatcanvas frame encoder"),
            });

        Ok(Some(GpuFrame {
            surface_texture,
            view,
            encoder,
        }))
    }
}
