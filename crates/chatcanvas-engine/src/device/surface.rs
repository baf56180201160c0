use super::GpuError;
use crate::coords::ViewportSize;

/// Surface-level settings, fixed at configure time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSettings {
    pub format: wgpu::TextureFormat,
    pub usage: wgpu::TextureUsages,
    pub present_mode: wgpu::PresentMode,
    pub alpha_mode: wgpu::CompositeAlphaMode,
    pub desired_maximum_frame_latency: u32,
}

/// Requested presentation behaviour; unsupported values fall back.
#[derive(Debug, Clone, Copy)]
pub struct SurfacePreferences {
    pub present_mode: wgpu::PresentMode,
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub desired_maximum_frame_latency: u32,
}

/// One built swapchain. A new value is produced by every rebuild.
#[derive(Debug, Clone)]
pub struct Swapchain {
    pub config: wgpu::SurfaceConfiguration,
    pub generation: u64,
}

impl Swapchain {
    pub fn size(&self) -> ViewportSize {
        ViewportSize::new(self.config.width, self.config.height)
    }
}

/// Something a swapchain configuration can be applied to.
pub trait SwapchainTarget {
    fn capabilities(&self) -> wgpu::SurfaceCapabilities;

    fn apply(&self, config: &wgpu::SurfaceConfiguration);
}

/// The live surface together with the objects configuring it needs.
pub struct SurfaceBinding<'a> {
    pub surface: &'a wgpu::Surface<'static>,
    pub adapter: &'a wgpu::Adapter,
    pub device: &'a wgpu::Device,
}

impl SwapchainTarget for SurfaceBinding<'_> {
    fn capabilities(&self) -> wgpu::SurfaceCapabilities {
        self.surface.get_capabilities(self.adapter)
    }

    fn apply(&self, config: &wgpu::SurfaceConfiguration) {
        self.surface.configure(self.device, config);
    }
}

/// Owns surface settings and the current swapchain.
///
/// wgpu has no separate swapchain object; building one means configuring the
/// surface with the full configuration at the new size.
#[derive(Debug, Default)]
pub struct SurfaceConfigurator {
    settings: Option<SurfaceSettings>,
    swapchain: Option<Swapchain>,
    generation: u64,
}

impl SurfaceConfigurator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes surface settings for `format` and builds the swapchain at `viewport`.
    pub fn configure(
        &mut self,
        target: &impl SwapchainTarget,
        format: wgpu::TextureFormat,
        prefs: SurfacePreferences,
        viewport: ViewportSize,
    ) -> Option<&Swapchain> {
        let caps = target.capabilities();

        let settings = SurfaceSettings {
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            present_mode: choose_present_mode(&caps, prefs.present_mode),
            alpha_mode: choose_alpha_mode(&caps, prefs.alpha_mode),
            desired_maximum_frame_latency: prefs.desired_maximum_frame_latency,
        };
        log::info!(
            "surface configured: {:?}, {:?}, {:?}",
            settings.format,
            settings.present_mode,
            settings.alpha_mode
        );

        self.settings = Some(settings);
        self.build(target, viewport)
    }

    /// Rebuilds the swapchain at `viewport` with the settings chosen by `configure`.
    pub fn rebuild(
        &mut self,
        target: &impl SwapchainTarget,
        viewport: ViewportSize,
    ) -> Result<Option<&Swapchain>, GpuError> {
        if self.settings.is_none() {
            return Err(GpuError::NotConfigured);
        }
        Ok(self.build(target, viewport))
    }

    pub fn settings(&self) -> Option<&SurfaceSettings> {
        self.settings.as_ref()
    }

    /// The current swapchain; `None` while the viewport is zero-area.
    pub fn swapchain(&self) -> Option<&Swapchain> {
        self.swapchain.as_ref()
    }

    fn build(&mut self, target: &impl SwapchainTarget, viewport: ViewportSize) -> Option<&Swapchain> {
        let settings = self.settings.as_ref()?;

        // wgpu rejects 0x0 configurations; defer until a real size arrives.
        if viewport.is_empty() {
            log::debug!("viewport {}x{} is empty, deferring swapchain", viewport.width, viewport.height);
            self.swapchain = None;
            return None;
        }

        let config = wgpu::SurfaceConfiguration {
            usage: settings.usage,
            format: settings.format,
            width: viewport.width,
            height: viewport.height,
            present_mode: settings.present_mode,
            alpha_mode: settings.alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: settings.desired_maximum_frame_latency,
        };
        target.apply(&config);

        self.generation += 1;
        log::debug!(
            "swapchain #{} built at {}x{}",
            self.generation,
            viewport.width,
            viewport.height
        );

        self.swapchain = Some(Swapchain {
            config,
            generation: self.generation,
        });
        self.swapchain.as_ref()
    }
}

pub(crate) fn choose_present_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: wgpu::PresentMode,
) -> wgpu::PresentMode {
    if caps.present_modes.contains(&requested) {
        requested
    } else {
        log::warn!("present mode {requested:?} unsupported, using Fifo");
        wgpu::PresentMode::Fifo
    }
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct FakeTarget {
        caps: wgpu::SurfaceCapabilities,
        applied: RefCell<Vec<wgpu::SurfaceConfiguration>>,
    }

    impl FakeTarget {
        fn new() -> Self {
            Self {
                caps: wgpu::SurfaceCapabilities {
                    formats: vec![wgpu::TextureFormat::Bgra8Unorm],
                    present_modes: vec![wgpu::PresentMode::Fifo, wgpu::PresentMode::Mailbox],
                    alpha_modes: vec![
                        wgpu::CompositeAlphaMode::Opaque,
                        wgpu::CompositeAlphaMode::PreMultiplied,
                    ],
                    usages: wgpu::TextureUsages::RENDER_ATTACHMENT,
                },
                applied: RefCell::new(Vec::new()),
            }
        }
    }

    impl SwapchainTarget for FakeTarget {
        fn capabilities(&self) -> wgpu::SurfaceCapabilities {
            wgpu::SurfaceCapabilities {
                formats: self.caps.formats.clone(),
                present_modes: self.caps.present_modes.clone(),
                alpha_modes: self.caps.alpha_modes.clone(),
                usages: self.caps.usages,
            }
        }

        fn apply(&self, config: &wgpu::SurfaceConfiguration) {
            self.applied.borrow_mut().push(config.clone());
        }
    }

    fn prefs() -> SurfacePreferences {
        SurfacePreferences {
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            desired_maximum_frame_latency: 2,
        }
    }

    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8Unorm;

    // ── configure ─────────────────────────────────────────────────────────

    #[test]
    fn swapchain_matches_viewport() {
        let target = FakeTarget::new();
        let mut sc = SurfaceConfigurator::new();

        let chain = sc
            .configure(&target, FORMAT, prefs(), ViewportSize::new(800, 600))
            .unwrap();
        assert_eq!(chain.size(), ViewportSize::new(800, 600));
        assert_eq!(chain.config.usage, wgpu::TextureUsages::RENDER_ATTACHMENT);
        assert_eq!(target.applied.borrow().len(), 1);
    }

    #[test]
    fn configure_is_idempotent_in_dimensions() {
        let target = FakeTarget::new();
        let mut sc = SurfaceConfigurator::new();
        let viewport = ViewportSize::new(640, 480);

        sc.configure(&target, FORMAT, prefs(), viewport);
        sc.configure(&target, FORMAT, prefs(), viewport);

        assert_eq!(sc.swapchain().unwrap().size(), viewport);
        let applied = target.applied.borrow();
        assert_eq!((applied[0].width, applied[0].height), (applied[1].width, applied[1].height));
    }

    #[test]
    fn unsupported_preferences_fall_back() {
        let target = FakeTarget::new();
        let mut sc = SurfaceConfigurator::new();
        let prefs = SurfacePreferences {
            present_mode: wgpu::PresentMode::Immediate,
            alpha_mode: Some(wgpu::CompositeAlphaMode::PostMultiplied),
            desired_maximum_frame_latency: 2,
        };

        sc.configure(&target, FORMAT, prefs, ViewportSize::new(10, 10));

        let settings = sc.settings().unwrap();
        assert_eq!(settings.present_mode, wgpu::PresentMode::Fifo);
        assert_eq!(settings.alpha_mode, wgpu::CompositeAlphaMode::Opaque);
    }

    #[test]
    fn supported_preferences_are_kept() {
        let target = FakeTarget::new();
        let mut sc = SurfaceConfigurator::new();
        let prefs = SurfacePreferences {
            present_mode: wgpu::PresentMode::Mailbox,
            alpha_mode: Some(wgpu::CompositeAlphaMode::PreMultiplied),
            desired_maximum_frame_latency: 3,
        };

        sc.configure(&target, FORMAT, prefs, ViewportSize::new(10, 10));

        let config = &sc.swapchain().unwrap().config;
        assert_eq!(config.present_mode, wgpu::PresentMode::Mailbox);
        assert_eq!(config.alpha_mode, wgpu::CompositeAlphaMode::PreMultiplied);
        assert_eq!(config.desired_maximum_frame_latency, 3);
    }

    // ── rebuild ───────────────────────────────────────────────────────────

    #[test]
    fn rebuild_before_configure_is_an_error() {
        let target = FakeTarget::new();
        let mut sc = SurfaceConfigurator::new();
        let err = sc.rebuild(&target, ViewportSize::new(1, 1)).unwrap_err();
        assert_eq!(err, GpuError::NotConfigured);
        assert!(target.applied.borrow().is_empty());
    }

    #[test]
    fn resize_keeps_format_and_usage() {
        let target = FakeTarget::new();
        let mut sc = SurfaceConfigurator::new();
        sc.configure(&target, FORMAT, prefs(), ViewportSize::new(800, 600));

        let chain = sc.rebuild(&target, ViewportSize::new(1024, 768)).unwrap().unwrap();
        assert_eq!(chain.size(), ViewportSize::new(1024, 768));
        assert_eq!(chain.config.format, FORMAT);
        assert_eq!(chain.config.usage, wgpu::TextureUsages::RENDER_ATTACHMENT);
        assert_eq!(chain.generation, 2);
    }

    #[test]
    fn empty_viewport_defers_until_real_size() {
        let target = FakeTarget::new();
        let mut sc = SurfaceConfigurator::new();
        sc.configure(&target, FORMAT, prefs(), ViewportSize::new(800, 600));

        assert!(sc.rebuild(&target, ViewportSize::new(0, 0)).unwrap().is_none());
        assert!(sc.swapchain().is_none());
        assert_eq!(target.applied.borrow().len(), 1);

        let chain = sc.rebuild(&target, ViewportSize::new(300, 200)).unwrap().unwrap();
        assert_eq!(chain.size(), ViewportSize::new(300, 200));
    }

    #[test]
    fn configure_at_zero_size_keeps_settings() {
        let target = FakeTarget::new();
        let mut sc = SurfaceConfigurator::new();

        assert!(sc.configure(&target, FORMAT, prefs(), ViewportSize::new(0, 0)).is_none());
        assert!(sc.settings().is_some());
        assert!(sc.rebuild(&target, ViewportSize::new(5, 5)).unwrap().is_some());
    }
}
