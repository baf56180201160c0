mod strip;

use anyhow::Result;
use chatcanvas_engine::device::{GraphicsContext, Renderer, RendererConfig};
use chatcanvas_engine::logging::{init_logging, LoggingConfig};
use chatcanvas_engine::scheduler::PendingCallbacks;
use chatcanvas_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

use strip::StripPayload;

const HEADER_HEIGHT_PX: u32 = 48;

/// Per-tick state built once the device is ready.
struct ChatSurface {
    header: StripPayload,
    frames: u64,
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let runtime = RuntimeConfig {
        title: "chatcanvas".to_string(),
        initial_size: LogicalSize::new(820.0, 560.0),
        ..RuntimeConfig::default()
    };

    let callbacks = PendingCallbacks::<Renderer, ChatSurface>::new(
        |ctx: &GraphicsContext| {
            log::info!("rendering on {} as {:?}", ctx.profile(), ctx.surface_format());
            Ok(ChatSurface {
                header: StripPayload::new(ctx, HEADER_HEIGHT_PX),
                frames: 0,
            })
        },
        |surface: &mut ChatSurface, renderer: &mut Renderer| {
            renderer.draw(&mut surface.header)?;
            surface.frames += 1;
            if surface.frames % 600 == 0 {
                log::debug!("{} frames submitted", surface.frames);
            }
            Ok(())
        },
    );

    Runtime::run(runtime, RendererConfig::default(), callbacks)
}
