use std::sync::Arc;

use winit::window::Window;

use super::{GpuError, WgpuBackend};
#[cfg(target_arch = "wasm32")]
use crate::coords::ViewportSize;

/// Where frames are presented: the window bound to the selected canvas.
#[derive(Debug, Clone)]
pub struct DisplayTarget {
    pub selector: String,
    pub window: Arc<Window>,
}

/// Creates the instance and the surface bound to `target`.
///
/// Synchronous. Any failure is fatal for the context.
pub fn bootstrap_surface(
    target: &DisplayTarget,
    backends: wgpu::Backends,
) -> Result<WgpuBackend, GpuError> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends,
        ..Default::default()
    });

    let surface = instance
        .create_surface(Arc::clone(&target.window))
        .map_err(|e| GpuError::ContextCreation(format!("surface for {}: {e}", target.selector)))?;

    log::info!("surface created for {} ({backends:?})", target.selector);

    Ok(WgpuBackend { instance, surface })
}

/// Finds the canvas element named by `selector` in the current document.
#[cfg(target_arch = "wasm32")]
pub fn find_canvas(selector: &str) -> Result<web_sys::HtmlCanvasElement, GpuError> {
    use wasm_bindgen::JsCast;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| GpuError::ContextCreation("no document available".to_string()))?;

    let element = document
        .query_selector(selector)
        .map_err(|_| GpuError::ContextCreation(format!("invalid selector {selector}")))?
        .ok_or_else(|| GpuError::ContextCreation(format!("no element matches {selector}")))?;

    element
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| GpuError::ContextCreation(format!("{selector} is not a canvas element")))
}

/// Inner size of the browser window in device pixels.
#[cfg(target_arch = "wasm32")]
pub fn browser_viewport() -> Result<winit::dpi::PhysicalSize<u32>, GpuError> {
    let window = web_sys::window()
        .ok_or_else(|| GpuError::ContextCreation("no browser window available".to_string()))?;

    let css_px = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    let viewport = ViewportSize::from_css(
        css_px(window.inner_width()),
        css_px(window.inner_height()),
        window.device_pixel_ratio(),
    );

    Ok(winit::dpi::PhysicalSize::new(viewport.width, viewport.height))
}

/// Keeps the canvas behind `window` sized to the browser window.
///
/// The canvas resize reaches the event loop as `WindowEvent::Resized`.
#[cfg(target_arch = "wasm32")]
pub fn follow_browser_window(window: Arc<Window>) -> Result<(), GpuError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    let on_resize = Closure::wrap(Box::new(move || match browser_viewport() {
        Ok(size) => {
            let _ = window.request_inner_size(size);
        }
        Err(e) => log::warn!("browser resize ignored: {e}"),
    }) as Box<dyn FnMut()>);

    web_sys::window()
        .ok_or_else(|| GpuError::ContextCreation("no browser window available".to_string()))?
        .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
        .map_err(|e| GpuError::ContextCreation(format!("resize listener: {e:?}")))?;
    on_resize.forget();

    Ok(())
}
