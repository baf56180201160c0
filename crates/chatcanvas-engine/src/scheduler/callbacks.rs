use super::Stage;

type OnReady<S, T> = Box<dyn FnOnce(&<S as Stage>::Context) -> anyhow::Result<T>>;
type OnTick<S, T> = Box<dyn FnMut(&mut T, &mut S) -> anyhow::Result<()>>;

/// Application hooks driven by the scheduler.
///
/// `on_ready` builds the per-tick state `T` from the live context and runs at
/// most once; `on_tick` receives that state on every following tick.
pub struct PendingCallbacks<S: Stage, T> {
    pub(super) on_ready: Option<OnReady<S, T>>,
    pub(super) on_tick: OnTick<S, T>,
}

impl<S: Stage, T> PendingCallbacks<S, T> {
    pub fn new(
        on_ready: impl FnOnce(&S::Context) -> anyhow::Result<T> + 'static,
        on_tick: impl FnMut(&mut T, &mut S) -> anyhow::Result<()> + 'static,
    ) -> Self {
        Self {
            on_ready: Some(Box::new(on_ready)),
            on_tick: Box::new(on_tick),
        }
    }

    /// Whether `on_ready` has not run yet.
    pub fn is_pending(&self) -> bool {
        self.on_ready.is_some()
    }
}
