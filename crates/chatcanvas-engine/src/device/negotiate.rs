use super::adapter::negotiate_adapter;
use super::{AdapterReport, DeviceEventSink, GpuBackend, GpuError, RendererConfig};
use crate::caps::{names, CapabilityWants, NegotiatedCapabilities};

/// Inputs of the adapter and device negotiators.
#[derive(Debug, Clone)]
pub struct NegotiationPlan {
    pub power_preference: wgpu::PowerPreference,
    pub fallback_format: wgpu::TextureFormat,
    pub prefer_srgb: bool,
    pub capabilities: CapabilityWants,
}

impl Default for NegotiationPlan {
    fn default() -> Self {
        RendererConfig::default().negotiation_plan()
    }
}

impl RendererConfig {
    pub fn negotiation_plan(&self) -> NegotiationPlan {
        NegotiationPlan {
            power_preference: self.power_preference,
            fallback_format: self.fallback_format,
            prefer_srgb: self.prefer_srgb,
            capabilities: self.capabilities.clone(),
        }
    }
}

/// Result of a completed negotiation. Hands the backend back to its owner.
pub struct Negotiated<B: GpuBackend> {
    pub backend: B,
    pub adapter: B::Adapter,
    pub device: B::Device,
    pub queue: B::Queue,
    pub report: AdapterReport,
    pub capabilities: NegotiatedCapabilities,
}

/// Resolves capabilities against `report` and issues the single device request.
///
/// Handlers are installed on the new device before it is returned, so no
/// event raised after creation is missed.
pub async fn negotiate_device<B: GpuBackend>(
    backend: &B,
    adapter: &B::Adapter,
    report: &AdapterReport,
    wants: &CapabilityWants,
    sink: DeviceEventSink,
) -> Result<(B::Device, B::Queue, NegotiatedCapabilities), GpuError> {
    let capabilities = NegotiatedCapabilities::negotiate(report.features, &report.limits, wants)
        .inspect_err(|e| log::error!("capability negotiation failed: {e}"))?;

    log::debug!("requesting device");
    let (device, queue) = backend
        .request_device(adapter, &capabilities)
        .await
        .map_err(|message| {
            log::error!("device request failed: {message}");
            GpuError::DeviceRequest(message)
        })?;

    backend.install_handlers(&device, sink);

    for feature in names::describe_features(backend.device_features(&device)) {
        log::info!("device feature: {feature}");
    }
    log::info!("device ready");

    Ok((device, queue, capabilities))
}

/// Adapter then device, as one future that owns the backend.
pub async fn negotiate<B: GpuBackend>(
    backend: B,
    plan: NegotiationPlan,
    sink: DeviceEventSink,
) -> Result<Negotiated<B>, GpuError> {
    let (adapter, report) = negotiate_adapter(&backend, &plan).await?;
    let (device, queue, capabilities) =
        negotiate_device(&backend, &adapter, &report, &plan.capabilities, sink).await?;

    Ok(Negotiated {
        backend,
        adapter,
        device,
        queue,
        report,
        capabilities,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::caps::{FeatureId, LimitId, LimitSet, UnsatisfiableConstraint};
    use crate::device::testing::FakeBackend;
    use crate::device::ContextRegistry;

    fn run(
        backend: FakeBackend,
        plan: NegotiationPlan,
    ) -> Result<Negotiated<FakeBackend>, GpuError> {
        let mut registry = ContextRegistry::new();
        let sink = registry.register("test");
        pollster::block_on(negotiate(backend, plan, sink))
    }

    // ── scenarios ─────────────────────────────────────────────────────────

    #[test]
    fn no_adapter_means_no_device_request() {
        let backend = FakeBackend::new().without_adapter("no compatible adapter");
        let device_requests = backend.device_requests.clone();

        let err = run(backend, NegotiationPlan::default()).err().unwrap();

        assert_eq!(err, GpuError::AdapterRequest("no compatible adapter".to_string()));
        assert_eq!(device_requests.get(), 0);
    }

    #[test]
    fn required_limit_above_adapter_is_unsatisfiable() {
        let backend = FakeBackend::new().with_limits(wgpu::Limits {
            max_texture_dimension_2d: 4096,
            ..wgpu::Limits::default()
        });
        let device_requests = backend.device_requests.clone();

        let mut plan = NegotiationPlan::default();
        plan.capabilities.required_limits = LimitSet::from([(LimitId::MaxTextureDimension2D, 8192)]);

        let err = run(backend, plan).err().unwrap();
        match err {
            GpuError::Unsatisfiable(UnsatisfiableConstraint::BelowRequirement { limit, .. }) => {
                assert_eq!(limit, "maxTextureDimension2D")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(device_requests.get(), 0);
    }

    #[test]
    fn device_receives_negotiated_descriptor() {
        let backend = FakeBackend::new()
            .with_features(wgpu::Features::SHADER_F16)
            .with_limits(wgpu::Limits {
                max_texture_dimension_2d: 16384,
                ..wgpu::Limits::default()
            });
        let requested = backend.requested.clone();

        let mut plan = NegotiationPlan::default();
        plan.capabilities.desired_features =
            BTreeSet::from([FeatureId::ShaderF16, FeatureId::TimestampQuery]);

        let negotiated = run(backend, plan).unwrap();

        let (features, limits) = requested.borrow().clone().unwrap();
        assert_eq!(features, wgpu::Features::SHADER_F16);
        assert_eq!(limits.max_texture_dimension_2d, 8192);
        assert_eq!(negotiated.capabilities.dropped_features().len(), 1);
        assert_eq!(negotiated.backend.adapter_requests.get(), 1);
        assert_eq!(negotiated.backend.device_requests.get(), 1);
    }

    #[test]
    fn handlers_are_installed_with_the_context_sink() {
        let mut registry = ContextRegistry::new();
        let sink = registry.register("canvas");
        let id = sink.id();

        let negotiated =
            pollster::block_on(negotiate(FakeBackend::new(), NegotiationPlan::default(), sink))
                .unwrap();

        let installed = negotiated.backend.installed.borrow().clone();
        assert_eq!(installed.map(|s| s.id()), Some(id));
    }

    #[test]
    fn device_refusal_is_fatal() {
        let backend = FakeBackend::new().without_device("device limits exceeded");
        let err = run(backend, NegotiationPlan::default()).err().unwrap();
        assert_eq!(err, GpuError::DeviceRequest("device limits exceeded".to_string()));
    }
}
