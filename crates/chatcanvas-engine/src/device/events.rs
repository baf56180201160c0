//! Device event routing.
//!
//! wgpu invokes device-lost and uncaptured-error handlers on its own schedule,
//! possibly from another thread. Handlers never touch the renderer: they carry
//! a [`ContextId`] and push onto a channel that the host drains once per tick.

use std::sync::mpsc;

/// Index of a graphics context in a [`ContextRegistry`].
///
/// Ids are never reused, so an id outliving its context simply stops matching.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ContextId(usize);

impl ContextId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Non-fatal notification raised by a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    Lost { reason: String, message: String },
    Uncaptured { kind: &'static str, message: String },
}

/// Sending half handed to device handlers.
#[derive(Debug, Clone)]
pub struct DeviceEventSink {
    id: ContextId,
    tx: mpsc::Sender<(ContextId, DeviceEvent)>,
}

impl DeviceEventSink {
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// Sends are best effort; a dropped registry means nobody is listening.
    pub fn send(&self, event: DeviceEvent) {
        let _ = self.tx.send((self.id, event));
    }
}

/// Health recorded for one registered context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextHealth {
    pub label: String,
    pub lost: bool,
    pub uncaptured_errors: u64,
}

/// Arena of graphics contexts that can receive device events.
pub struct ContextRegistry {
    slots: Vec<Option<ContextHealth>>,
    tx: mpsc::Sender<(ContextId, DeviceEvent)>,
    rx: mpsc::Receiver<(ContextId, DeviceEvent)>,
}

impl ContextRegistry {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            slots: Vec::new(),
            tx,
            rx,
        }
    }

    /// Allocates a slot and returns the sink its device handlers should use.
    pub fn register(&mut self, label: impl Into<String>) -> DeviceEventSink {
        let id = ContextId(self.slots.len());
        self.slots.push(Some(ContextHealth {
            label: label.into(),
            ..ContextHealth::default()
        }));
        DeviceEventSink {
            id,
            tx: self.tx.clone(),
        }
    }

    /// Releases a slot. Events still queued for it are discarded on drain.
    pub fn retire(&mut self, id: ContextId) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            *slot = None;
        }
    }

    pub fn health(&self, id: ContextId) -> Option<&ContextHealth> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Applies every queued event. Returns how many reached a live context.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;

        while let Ok((id, event)) = self.rx.try_recv() {
            let Some(health) = self.slots.get_mut(id.0).and_then(Option::as_mut) else {
                log::trace!("dropping device event for retired context {}", id.0);
                continue;
            };

            match event {
                DeviceEvent::Lost { reason, message } => {
                    log::error!("device lost on {}: {reason}: {message}", health.label);
                    health.lost = true;
                }
                DeviceEvent::Uncaptured { kind, message } => {
                    log::error!("uncaptured {kind} error on {}: {message}", health.label);
                    health.uncaptured_errors += 1;
                }
            }
            applied += 1;
        }

        applied
    }
}

impl Default for ContextRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_reach_their_context() {
        let mut registry = ContextRegistry::new();
        let a = registry.register("a");
        let b = registry.register("b");

        a.send(DeviceEvent::Uncaptured {
            kind: "validation",
            message: "bad bind group".into(),
        });
        b.send(DeviceEvent::Lost {
            reason: "Destroyed".into(),
            message: "gone".into(),
        });

        assert_eq!(registry.drain(), 2);
        let ha = registry.health(a.id()).unwrap();
        assert_eq!(ha.uncaptured_errors, 1);
        assert!(!ha.lost);
        assert!(registry.health(b.id()).unwrap().lost);
    }

    #[test]
    fn retired_context_drops_late_events() {
        let mut registry = ContextRegistry::new();
        let sink = registry.register("canvas");
        registry.retire(sink.id());

        sink.send(DeviceEvent::Lost {
            reason: "Unknown".into(),
            message: "late".into(),
        });

        assert_eq!(registry.drain(), 0);
        assert!(registry.health(sink.id()).is_none());
    }

    #[test]
    fn ids_are_not_reused_after_retire() {
        let mut registry = ContextRegistry::new();
        let first = registry.register("first");
        registry.retire(first.id());
        let second = registry.register("second");

        assert_ne!(first.id(), second.id());
        assert_eq!(registry.health(second.id()).unwrap().label, "second");
    }

    #[test]
    fn sending_from_another_thread() {
        let mut registry = ContextRegistry::new();
        let sink = registry.register("canvas");

        std::thread::spawn(move || {
            sink.send(DeviceEvent::Uncaptured {
                kind: "out-of-memory",
                message: "oom".into(),
            })
        })
        .join()
        .unwrap();

        assert_eq!(registry.drain(), 1);
        assert_eq!(registry.drain(), 0);
    }
}
