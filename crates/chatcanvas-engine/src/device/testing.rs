//! In-memory backend for negotiation tests.

use std::cell::{Cell, RefCell};
use std::future::{ready, Future};
use std::rc::Rc;

use super::{AdapterDescription, AdapterProfile, DeviceEventSink, GpuBackend};
use crate::caps::NegotiatedCapabilities;

pub(crate) struct FakeBackend {
    adapter: Result<(), String>,
    device: Result<(), String>,
    description: AdapterDescription,

    pub adapter_requests: Rc<Cell<u32>>,
    pub device_requests: Rc<Cell<u32>>,
    pub requested: Rc<RefCell<Option<(wgpu::Features, wgpu::Limits)>>>,
    pub installed: Rc<RefCell<Option<DeviceEventSink>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            adapter: Ok(()),
            device: Ok(()),
            description: AdapterDescription {
                profile: AdapterProfile {
                    name: "fake adapter".to_string(),
                    backend: wgpu::Backend::Vulkan,
                    vendor: 0x10de,
                    driver: String::new(),
                },
                features: wgpu::Features::empty(),
                limits: wgpu::Limits::default(),
                surface_formats: vec![
                    wgpu::TextureFormat::Rgba8Unorm,
                    wgpu::TextureFormat::Bgra8UnormSrgb,
                ],
            },
            adapter_requests: Rc::default(),
            device_requests: Rc::default(),
            requested: Rc::default(),
            installed: Rc::default(),
        }
    }

    pub fn without_adapter(mut self, message: &str) -> Self {
        self.adapter = Err(message.to_string());
        self
    }

    pub fn without_device(mut self, message: &str) -> Self {
        self.device = Err(message.to_string());
        self
    }

    pub fn with_features(mut self, features: wgpu::Features) -> Self {
        self.description.features = features;
        self
    }

    pub fn with_limits(mut self, limits: wgpu::Limits) -> Self {
        self.description.limits = limits;
        self
    }
}

/// Device stand-in: just the features it was created with.
#[derive(Debug)]
pub(crate) struct FakeDevice(wgpu::Features);

impl GpuBackend for FakeBackend {
    type Adapter = ();
    type Device = FakeDevice;
    type Queue = ();

    fn request_adapter(
        &self,
        _power: wgpu::PowerPreference,
    ) -> impl Future<Output = Result<(), String>> {
        self.adapter_requests.set(self.adapter_requests.get() + 1);
        ready(self.adapter.clone())
    }

    fn describe_adapter(&self, _adapter: &()) -> AdapterDescription {
        self.description.clone()
    }

    fn request_device(
        &self,
        _adapter: &(),
        capabilities: &NegotiatedCapabilities,
    ) -> impl Future<Output = Result<(FakeDevice, ()), String>> {
        self.device_requests.set(self.device_requests.get() + 1);
        let features = capabilities.wgpu_features();
        *self.requested.borrow_mut() = Some((features, capabilities.wgpu_limits().clone()));
        ready(self.device.clone().map(|()| (FakeDevice(features), ())))
    }

    fn install_handlers(&self, _device: &FakeDevice, sink: DeviceEventSink) {
        *self.installed.borrow_mut() = Some(sink);
    }

    fn device_features(&self, device: &FakeDevice) -> wgpu::Features {
        device.0
    }
}
