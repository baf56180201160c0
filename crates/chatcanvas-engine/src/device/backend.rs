use std::fmt;
use std::future::Future;
use std::sync::Arc;

use super::{DeviceEvent, DeviceEventSink};
use crate::caps::{names, NegotiatedCapabilities};

/// Adapter identity kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterProfile {
    pub name: String,
    pub backend: wgpu::Backend,
    pub vendor: u32,
    pub driver: String,
}

impl fmt::Display for AdapterProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:?}, vendor {}, driver {})",
            self.name,
            self.backend,
            names::vendor_name(self.vendor),
            if self.driver.is_empty() { "n/a" } else { self.driver.as_str() },
        )
    }
}

/// Everything the adapter reports that negotiation needs.
#[derive(Debug, Clone)]
pub struct AdapterDescription {
    pub profile: AdapterProfile,
    pub features: wgpu::Features,
    pub limits: wgpu::Limits,

    /// Surface formats in the surface's order of preference.
    pub surface_formats: Vec<wgpu::TextureFormat>,
}

/// The host GPU API seen by the negotiators.
///
/// Both requests are asynchronous: in the browser they resolve between host
/// ticks, on desktop wgpu resolves them immediately.
pub trait GpuBackend {
    type Adapter;
    type Device;
    type Queue;

    fn request_adapter(
        &self,
        power: wgpu::PowerPreference,
    ) -> impl Future<Output = Result<Self::Adapter, String>>;

    fn describe_adapter(&self, adapter: &Self::Adapter) -> AdapterDescription;

    fn request_device(
        &self,
        adapter: &Self::Adapter,
        capabilities: &NegotiatedCapabilities,
    ) -> impl Future<Output = Result<(Self::Device, Self::Queue), String>>;

    /// Routes device-lost and uncaptured-error notifications into `sink`.
    fn install_handlers(&self, device: &Self::Device, sink: DeviceEventSink);

    fn device_features(&self, device: &Self::Device) -> wgpu::Features;
}

/// Instance plus the surface bound to the display target.
pub struct WgpuBackend {
    pub(crate) instance: wgpu::Instance,
    pub(crate) surface: wgpu::Surface<'static>,
}

impl GpuBackend for WgpuBackend {
    type Adapter = wgpu::Adapter;
    type Device = wgpu::Device;
    type Queue = wgpu::Queue;

    async fn request_adapter(
        &self,
        power: wgpu::PowerPreference,
    ) -> Result<wgpu::Adapter, String> {
        self.instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: power,
                compatible_surface: Some(&self.surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| e.to_string())
    }

    fn describe_adapter(&self, adapter: &wgpu::Adapter) -> AdapterDescription {
        let info = adapter.get_info();
        AdapterDescription {
            profile: AdapterProfile {
                name: info.name,
                backend: info.backend,
                vendor: info.vendor,
                driver: info.driver,
            },
            features: adapter.features(),
            limits: adapter.limits(),
            surface_formats: self.surface.get_capabilities(adapter).formats,
        }
    }

    async fn request_device(
        &self,
        adapter: &wgpu::Adapter,
        capabilities: &NegotiatedCapabilities,
    ) -> Result<(wgpu::Device, wgpu::Queue), String> {
        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("chatcanvas device"),
                required_features: capabilities.wgpu_features(),
                required_limits: capabilities.wgpu_limits().clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| e.to_string())
    }

    fn install_handlers(&self, device: &wgpu::Device, sink: DeviceEventSink) {
        let lost = sink.clone();
        device.set_device_lost_callback(move |reason, message| {
            lost.send(DeviceEvent::Lost {
                reason: format!("{reason:?}"),
                message,
            });
        });

        device.on_uncaptured_error(Arc::new(move |error: wgpu::Error| {
            let kind = match &error {
                wgpu::Error::OutOfMemory { .. } => "out-of-memory",
                wgpu::Error::Validation { .. } => "validation",
                _ => "internal",
            };
            sink.send(DeviceEvent::Uncaptured {
                kind,
                message: error.to_string(),
            });
        }));
    }

    fn device_features(&self, device: &wgpu::Device) -> wgpu::Features {
        device.features()
    }
}
