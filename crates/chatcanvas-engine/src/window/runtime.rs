use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::coords::ViewportSize;
use crate::device::{ContextId, ContextRegistry, DisplayTarget, Renderer, RendererConfig};
use crate::scheduler::{LoopScheduler, PendingCallbacks};
#[cfg(not(target_arch = "wasm32"))]
use crate::time::{FramePacer, Pace};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,

    /// Desktop window size. In the browser the canvas fills the browser window.
    pub initial_size: LogicalSize<f64>,

    /// Redraws per second; 0 follows the host's natural cadence.
    ///
    /// The browser always uses animation frames.
    pub frame_rate: u32,

    /// Ticks to wait for the device before giving up. `None` waits forever.
    pub negotiation_tick_budget: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "chatcanvas".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            frame_rate: 0,
            negotiation_tick_budget: None,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs the event loop until the window closes or the render loop fails.
    ///
    /// In the browser the loop is handed to the page and this returns at once;
    /// failures are then only logged.
    pub fn run<T: 'static>(
        config: RuntimeConfig,
        renderer: RendererConfig,
        callbacks: PendingCallbacks<Renderer, T>,
    ) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let state = AppState::new(config, renderer, callbacks);

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(state);
            Ok(())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut state = state;
            event_loop
                .run_app(&mut state)
                .context("winit event loop terminated with error")?;

            match state.fatal.take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }
}

struct Active<T: 'static> {
    window: Arc<Window>,
    context: ContextId,
    scheduler: LoopScheduler<Renderer, T>,
}

struct AppState<T: 'static> {
    config: RuntimeConfig,
    renderer: RendererConfig,
    callbacks: Option<PendingCallbacks<Renderer, T>>,

    registry: ContextRegistry,
    active: Option<Active<T>>,

    #[cfg(not(target_arch = "wasm32"))]
    pacer: FramePacer,

    fatal: Option<anyhow::Error>,
}

impl<T: 'static> AppState<T> {
    fn new(
        config: RuntimeConfig,
        renderer: RendererConfig,
        callbacks: PendingCallbacks<Renderer, T>,
    ) -> Self {
        #[cfg(target_arch = "wasm32")]
        if config.frame_rate != 0 {
            log::warn!(
                "frame_rate {} ignored in the browser, using animation frames",
                config.frame_rate
            );
        }

        Self {
            #[cfg(not(target_arch = "wasm32"))]
            pacer: FramePacer::new(config.frame_rate),
            config,
            renderer,
            callbacks: Some(callbacks),
            registry: ContextRegistry::new(),
            active: None,
            fatal: None,
        }
    }

    fn window_attributes(&self) -> Result<WindowAttributes> {
        let attrs = Window::default_attributes().with_title(self.config.title.as_str());

        #[cfg(target_arch = "wasm32")]
        let attrs = {
            use winit::platform::web::WindowAttributesExtWebSys;
            let canvas = crate::device::find_canvas(&self.renderer.display_target)?;
            attrs
                .with_canvas(Some(canvas))
                .with_inner_size(crate::device::browser_viewport()?)
        };

        #[cfg(not(target_arch = "wasm32"))]
        let attrs = attrs.with_inner_size(self.config.initial_size);

        Ok(attrs)
    }

    /// Window, surface bootstrap and the first negotiation poll.
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let callbacks = self
            .callbacks
            .take()
            .context("render loop was already started")?;

        let window = event_loop
            .create_window(self.window_attributes()?)
            .context("failed to create window")?;
        let window = Arc::new(window);

        #[cfg(target_arch = "wasm32")]
        crate::device::follow_browser_window(Arc::clone(&window))
            .context("failed to follow browser window size")?;

        let sink = self.registry.register(self.renderer.display_target.clone());
        let context = sink.id();
        let target = DisplayTarget {
            selector: self.renderer.display_target.clone(),
            window: Arc::clone(&window),
        };
        let renderer = Renderer::bootstrap(target, self.renderer.clone(), sink)
            .context("surface bootstrap failed")?;

        let mut scheduler = LoopScheduler::new(renderer, callbacks)
            .with_tick_budget(self.config.negotiation_tick_budget);
        scheduler.start()?;

        window.request_redraw();
        self.active = Some(Active {
            window,
            context,
            scheduler,
        });
        Ok(())
    }

    fn shutdown(&mut self) {
        if let Some(active) = self.active.take() {
            self.registry.retire(active.context);
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("fatal: {err:#}");
        self.fatal = Some(err);
        self.shutdown();
        event_loop.exit();
    }

    fn resize(&mut self, viewport: ViewportSize) -> Result<()> {
        if let Some(active) = self.active.as_mut() {
            active.scheduler.resize(viewport)?;
            active.window.request_redraw();
        }
        Ok(())
    }
}

impl<T: 'static> ApplicationHandler for AppState<T> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.active.is_some() || self.fatal.is_some() {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(active) = &self.active else {
            return;
        };

        #[cfg(target_arch = "wasm32")]
        active.window.request_redraw();

        #[cfg(not(target_arch = "wasm32"))]
        match self.pacer.poll(std::time::Instant::now()) {
            Pace::Continuous => {
                event_loop.set_control_flow(ControlFlow::Wait);
                active.window.request_redraw();
            }
            Pace::Redraw { next } => {
                event_loop.set_control_flow(ControlFlow::WaitUntil(next));
                active.window.request_redraw();
            }
            Pace::Wait { until } => event_loop.set_control_flow(ControlFlow::WaitUntil(until)),
        }

        #[cfg(target_arch = "wasm32")]
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let outcome = match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                self.shutdown();
                event_loop.exit();
                Ok(())
            }

            WindowEvent::Resized(size) => self.resize(size.into()),

            WindowEvent::ScaleFactorChanged { .. } => match &self.active {
                Some(active) => {
                    let size = active.window.inner_size();
                    self.resize(size.into())
                }
                None => Ok(()),
            },

            WindowEvent::RedrawRequested => {
                self.registry.drain();
                match self.active.as_mut() {
                    Some(active) => active.scheduler.tick().map(|_| ()),
                    None => Ok(()),
                }
            }

            _ => Ok(()),
        };

        if let Err(e) = outcome {
            self.fail(event_loop, e);
        }
    }
}
