use crate::caps::CapabilityWants;

/// Initialization parameters for the GPU layer.
///
/// Plain data built by the application before the runtime starts. The
/// defaults describe a single chat widget surface in a browser canvas.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Selector of the canvas element the surface binds to.
    ///
    /// Used for the element lookup in the browser and as a log label elsewhere.
    pub display_target: String,

    /// Backends the instance may use.
    pub backends: wgpu::Backends,

    pub power_preference: wgpu::PowerPreference,

    /// Required and desired features and limits.
    pub capabilities: CapabilityWants,

    /// Surface format used when the surface reports none.
    pub fallback_format: wgpu::TextureFormat,

    /// Prefer an sRGB surface format when one is listed.
    ///
    /// Off by default so the surface's own first preference wins.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    ///
    /// Falls back to FIFO when the surface does not list it.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,

    /// Colour the frame pass clears to before the payload records.
    pub clear_color: wgpu::Color,
}

impl RendererConfig {
    #[cfg(target_arch = "wasm32")]
    fn default_backends() -> wgpu::Backends {
        wgpu::Backends::BROWSER_WEBGPU
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn default_backends() -> wgpu::Backends {
        wgpu::Backends::PRIMARY
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            display_target: "#canvas".to_string(),
            backends: Self::default_backends(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            capabilities: CapabilityWants::default(),
            fallback_format: wgpu::TextureFormat::Bgra8Unorm,
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            desired_maximum_frame_latency: 2,
            clear_color: wgpu::Color {
                r: 0.0,
                g: 0.5,
                b: 0.5,
                a: 1.0,
            },
        }
    }
}
