use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::{FutureExt, LocalBoxFuture};
use winit::window::Window;

use super::bootstrap::bootstrap_surface;
use super::surface::SurfacePreferences;
use super::{
    negotiate, DeviceEventSink, DisplayTarget, DrawPayload, GpuError, GpuFrame, GraphicsContext,
    Negotiated, RenderCtx, RendererConfig, WgpuBackend,
};
use crate::coords::ViewportSize;
use crate::scheduler::Stage;

type Negotiation = LocalBoxFuture<'static, Result<Negotiated<WgpuBackend>, GpuError>>;

enum Phase {
    SurfaceReady(WgpuBackend),
    Negotiating(Negotiation),
    Ready(GraphicsContext),
    Failed(GpuError),
}

/// The renderer: owns the graphics context through its whole bring-up.
pub struct Renderer {
    window: Arc<Window>,
    config: RendererConfig,
    sink: DeviceEventSink,
    viewport: ViewportSize,
    phase: Phase,
}

impl Renderer {
    /// Runs surface bootstrap. Negotiation starts on the first poll.
    pub fn bootstrap(
        target: DisplayTarget,
        config: RendererConfig,
        sink: DeviceEventSink,
    ) -> Result<Self, GpuError> {
        let backend = bootstrap_surface(&target, config.backends)?;
        let viewport = ViewportSize::from(target.window.inner_size());

        Ok(Self {
            window: target.window,
            config,
            sink,
            viewport,
            phase: Phase::SurfaceReady(backend),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn graphics(&self) -> Option<&GraphicsContext> {
        match &self.phase {
            Phase::Ready(ctx) => Some(ctx),
            _ => None,
        }
    }

    fn surface_preferences(&self) -> SurfacePreferences {
        SurfacePreferences {
            present_mode: self.config.present_mode,
            alpha_mode: self.config.alpha_mode,
            desired_maximum_frame_latency: self.config.desired_maximum_frame_latency,
        }
    }

    /// Encodes and submits one frame.
    ///
    /// One render pass clears the swapchain texture and hands the pass to
    /// `payload`. Skipped while the viewport is empty.
    pub fn draw(&mut self, payload: &mut dyn DrawPayload) -> Result<(), GpuError> {
        let viewport = self.viewport;
        let clear_color = self.config.clear_color;
        let Phase::Ready(ctx) = &mut self.phase else {
            return Err(GpuError::NotConfigured);
        };

        let Some(frame) = ctx.begin_frame(viewport)? else {
            log::trace!("no swapchain, skipping frame");
            return Ok(());
        };
        let GpuFrame {
            surface_texture,
            view,
            mut encoder,
        } = frame;

        let render_ctx = RenderCtx {
            device: ctx.device(),
            queue: ctx.queue(),
            surface_format: ctx.surface_format(),
            viewport,
        };
        payload.prepare(&render_ctx);

        encoder.push_debug_group("chatcanvas frame");
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("chatcanvas frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            payload.record(&render_ctx, &mut pass);
        }
        encoder.pop_debug_group();

        ctx.queue().submit(std::iter::once(encoder.finish()));

        self.window.pre_present_notify();
        surface_texture.present();
        Ok(())
    }
}

impl Stage for Renderer {
    type Context = GraphicsContext;

    fn poll_device(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), GpuError>> {
        loop {
            match &mut self.phase {
                Phase::SurfaceReady(_) => {
                    let Phase::SurfaceReady(backend) =
                        std::mem::replace(&mut self.phase, Phase::Failed(GpuError::NotConfigured))
                    else {
                        continue;
                    };
                    log::info!("negotiating device for {}", self.config.display_target);
                    let negotiation = negotiate(
                        backend,
                        self.config.negotiation_plan(),
                        self.sink.clone(),
                    );
                    self.phase = Phase::Negotiating(negotiation.boxed_local());
                }
                Phase::Negotiating(negotiation) => {
                    let outcome = std::task::ready!(negotiation.as_mut().poll(cx));
                    match outcome {
                        Ok(negotiated) => {
                            let ctx = GraphicsContext::from_negotiated(negotiated, self.sink.id());
                            self.phase = Phase::Ready(ctx);
                            return Poll::Ready(Ok(()));
                        }
                        Err(e) => {
                            self.phase = Phase::Failed(e.clone());
                            return Poll::Ready(Err(e));
                        }
                    }
                }
                Phase::Ready(_) => return Poll::Ready(Ok(())),
                Phase::Failed(e) => return Poll::Ready(Err(e.clone())),
            }
        }
    }

    fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
    }

    fn configure(&mut self) -> Result<(), GpuError> {
        let prefs = self.surface_preferences();
        let viewport = self.viewport;
        match &mut self.phase {
            Phase::Ready(ctx) => {
                ctx.configure_surface(prefs, viewport);
                Ok(())
            }
            _ => Err(GpuError::NotConfigured),
        }
    }

    fn rebuild_swapchain(&mut self) -> Result<(), GpuError> {
        let viewport = self.viewport;
        match &mut self.phase {
            Phase::Ready(ctx) => ctx.rebuild_swapchain(viewport),
            _ => Err(GpuError::NotConfigured),
        }
    }

    fn context(&self) -> Option<&GraphicsContext> {
        self.graphics()
    }
}
