use super::{AdapterProfile, GpuBackend, GpuError, NegotiationPlan};
use crate::caps::names;

/// What the adapter negotiator records once an adapter is granted.
#[derive(Debug, Clone)]
pub struct AdapterReport {
    pub profile: AdapterProfile,
    pub features: wgpu::Features,
    pub limits: wgpu::Limits,
    pub surface_format: wgpu::TextureFormat,
}

/// Issues the single adapter request and records what the adapter offers.
pub async fn negotiate_adapter<B: GpuBackend>(
    backend: &B,
    plan: &NegotiationPlan,
) -> Result<(B::Adapter, AdapterReport), GpuError> {
    log::debug!("requesting adapter ({:?})", plan.power_preference);

    let adapter = backend
        .request_adapter(plan.power_preference)
        .await
        .map_err(|message| {
            log::error!("adapter request failed: {message}");
            GpuError::AdapterRequest(message)
        })?;

    let description = backend.describe_adapter(&adapter);
    log::info!("adapter: {}", description.profile);
    for feature in names::describe_features(description.features) {
        log::debug!("adapter feature: {feature}");
    }

    let surface_format = choose_surface_format(
        &description.surface_formats,
        plan.prefer_srgb,
        plan.fallback_format,
    );
    log::info!("preferred surface format: {surface_format:?}");

    Ok((
        adapter,
        AdapterReport {
            profile: description.profile,
            features: description.features,
            limits: description.limits,
            surface_format,
        },
    ))
}

/// Picks the surface's preferred format, optionally favouring sRGB.
///
/// An empty list yields `fallback`.
pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
    fallback: wgpu::TextureFormat,
) -> wgpu::TextureFormat {
    if formats.is_empty() {
        log::warn!("surface reports no formats, using {fallback:?}");
        return fallback;
    }

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        for f in preferred {
            if formats.contains(&f) {
                return f;
            }
        }
    }

    formats[0]
}
