use crate::caps::UnsatisfiableConstraint;

/// Fatal failures of the GPU pipeline.
///
/// Every variant stops the render loop. Device loss and uncaptured device
/// errors are not here: they arrive as [`super::DeviceEvent`]s and are only
/// logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GpuError {
    /// Instance or surface creation failed during bootstrap.
    #[error("failed to create graphics context: {0}")]
    ContextCreation(String),

    /// The backend returned no usable adapter.
    #[error("adapter request failed: {0}")]
    AdapterRequest(String),

    /// The backend refused the negotiated device descriptor.
    #[error("device request failed: {0}")]
    DeviceRequest(String),

    #[error(transparent)]
    Unsatisfiable(#[from] UnsatisfiableConstraint),

    /// No drawable texture could be obtained for the frame.
    #[error("presentation failed: {0}")]
    Presentation(String),

    /// A swapchain rebuild was requested before the surface was configured.
    #[error("swapchain rebuild requested before the surface was configured")]
    NotConfigured,

    #[error("device negotiation did not complete within {ticks} ticks")]
    NegotiationTimeout { ticks: u64 },
}
