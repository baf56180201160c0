use std::task::{Context, Poll};

use anyhow::{anyhow, Context as _};

use super::PendingCallbacks;
use crate::coords::ViewportSize;
use crate::device::GpuError;

/// What the scheduler drives: device bring-up plus swapchain management.
pub trait Stage {
    /// Handed to `on_ready` once the device exists.
    type Context;

    /// Advances device negotiation. Ready once the device exists or failed.
    fn poll_device(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), GpuError>>;

    fn viewport(&self) -> ViewportSize;

    fn set_viewport(&mut self, viewport: ViewportSize);

    /// First surface configuration at the current viewport.
    fn configure(&mut self) -> Result<(), GpuError>;

    /// Swapchain rebuild at the current viewport.
    fn rebuild_swapchain(&mut self) -> Result<(), GpuError>;

    fn context(&self) -> Option<&Self::Context>;
}

/// Lifecycle of the render loop.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    /// Created, `start` not called yet.
    Uninitialized,
    /// Surface exists; no request issued yet.
    SurfaceReady,
    /// Adapter/device requests in flight; ticks only poll.
    Negotiating,
    /// Surface configured, `on_ready` running.
    Configured,
    /// `on_tick` runs every tick.
    Running,
    /// Terminal.
    Failed,
}

/// Drives a [`Stage`] from host ticks.
pub struct LoopScheduler<S: Stage, T> {
    stage: S,
    state: LoopState,
    callbacks: PendingCallbacks<S, T>,
    app: Option<T>,

    waiting_ticks: u64,
    tick_budget: Option<u64>,
}

impl<S: Stage, T> LoopScheduler<S, T> {
    pub fn new(stage: S, callbacks: PendingCallbacks<S, T>) -> Self {
        Self {
            stage,
            state: LoopState::Uninitialized,
            callbacks,
            app: None,
            waiting_ticks: 0,
            tick_budget: None,
        }
    }

    /// Fails negotiation once it has waited `ticks` ticks. Unbounded by default.
    pub fn with_tick_budget(mut self, ticks: Option<u64>) -> Self {
        self.tick_budget = ticks;
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    /// Issues the device requests by polling negotiation once.
    pub fn start(&mut self) -> anyhow::Result<LoopState> {
        if self.state != LoopState::Uninitialized {
            return Ok(self.state);
        }

        self.state = LoopState::SurfaceReady;
        match poll_stage(&mut self.stage) {
            Poll::Ready(Err(e)) => return Err(self.fail(e)),
            // A device that is already there is picked up by the next tick.
            Poll::Pending | Poll::Ready(Ok(())) => self.state = LoopState::Negotiating,
        }

        Ok(self.state)
    }

    /// One host tick. Returns the state after the tick.
    pub fn tick(&mut self) -> anyhow::Result<LoopState> {
        match self.state {
            LoopState::Uninitialized | LoopState::SurfaceReady => {
                self.start()?;
            }
            LoopState::Negotiating => self.wait_for_device()?,
            LoopState::Configured | LoopState::Running => self.run_tick()?,
            LoopState::Failed => return Err(anyhow!("render loop has already failed")),
        }
        Ok(self.state)
    }

    /// Records a new viewport; rebuilds the swapchain once configured.
    ///
    /// Every notification rebuilds, even one repeating the current size.
    pub fn resize(&mut self, viewport: ViewportSize) -> anyhow::Result<()> {
        log::debug!("viewport resized to {}x{}", viewport.width, viewport.height);
        self.stage.set_viewport(viewport);

        if matches!(self.state, LoopState::Configured | LoopState::Running) {
            if let Err(e) = self.stage.rebuild_swapchain() {
                return Err(self.fail(e));
            }
        }
        Ok(())
    }

    fn wait_for_device(&mut self) -> anyhow::Result<()> {
        match poll_stage(&mut self.stage) {
            Poll::Pending => {
                self.waiting_ticks += 1;
                if let Some(budget) = self.tick_budget {
                    if self.waiting_ticks >= budget {
                        return Err(self.fail(GpuError::NegotiationTimeout { ticks: budget }));
                    }
                }
                Ok(())
            }
            Poll::Ready(Err(e)) => Err(self.fail(e)),
            Poll::Ready(Ok(())) => self.enter_running(),
        }
    }

    fn enter_running(&mut self) -> anyhow::Result<()> {
        log::info!("device ready after {} waiting ticks", self.waiting_ticks);

        if let Err(e) = self.stage.configure() {
            return Err(self.fail(e));
        }
        self.state = LoopState::Configured;

        let Some(on_ready) = self.callbacks.on_ready.take() else {
            return Err(self.fail_with(anyhow!("on_ready already consumed")));
        };
        let Some(context) = self.stage.context() else {
            return Err(self.fail_with(anyhow!("stage reported ready without a context")));
        };

        match on_ready(context).context("on_ready failed") {
            Ok(app) => {
                self.app = Some(app);
                self.state = LoopState::Running;
                Ok(())
            }
            Err(e) => Err(self.fail_with(e)),
        }
    }

    fn run_tick(&mut self) -> anyhow::Result<()> {
        let Some(app) = self.app.as_mut() else {
            return Err(self.fail_with(anyhow!("running without application state")));
        };

        if let Err(e) = (self.callbacks.on_tick)(app, &mut self.stage) {
            return Err(self.fail_with(e.context("on_tick failed")));
        }
        Ok(())
    }

    fn fail(&mut self, err: GpuError) -> anyhow::Error {
        self.fail_with(err.into())
    }

    fn fail_with(&mut self, err: anyhow::Error) -> anyhow::Error {
        log::error!("render loop failed: {err:#}");
        self.state = LoopState::Failed;
        err
    }
}

fn poll_stage<S: Stage>(stage: &mut S) -> Poll<Result<(), GpuError>> {
    let mut cx = Context::from_waker(futures::task::noop_waker_ref());
    stage.poll_device(&mut cx)
}
