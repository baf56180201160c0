use bytemuck::{Pod, Zeroable};
use chatcanvas_engine::coords::ViewportSize;
use chatcanvas_engine::device::{DrawPayload, GraphicsContext, RenderCtx};

/// Header band across the top of the chat surface, fixed height in device pixels.
pub struct StripPayload {
    height_px: u32,
    pipeline: wgpu::RenderPipeline,
    vertices: wgpu::Buffer,
    uploaded_for: Option<ViewportSize>,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct StripVertex {
    position: [f32; 2],
}

impl StripVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StripVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const VERTEX_COUNT: u32 = 6;

impl StripPayload {
    pub fn new(ctx: &GraphicsContext, height_px: u32) -> Self {
        let device = ctx.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("strip shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/strip.wgsl").into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("strip pipeline layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("strip pipeline"),
            layout: Some(&layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[StripVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format(),
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertices = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("strip vertices"),
            size: (std::mem::size_of::<StripVertex>() as u64) * u64::from(VERTEX_COUNT),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            height_px,
            pipeline,
            vertices,
            uploaded_for: None,
        }
    }
}

/// Two triangles covering the top `height_px` rows, in clip space.
fn strip_vertices(viewport: ViewportSize, height_px: u32) -> [StripVertex; 6] {
    let frac = (height_px as f32 / viewport.height.max(1) as f32).min(1.0);
    let bottom = 1.0 - 2.0 * frac;
    let v = |x: f32, y: f32| StripVertex { position: [x, y] };

    [
        v(-1.0, 1.0),
        v(-1.0, bottom),
        v(1.0, bottom),
        v(-1.0, 1.0),
        v(1.0, bottom),
        v(1.0, 1.0),
    ]
}

impl DrawPayload for StripPayload {
    fn prepare(&mut self, ctx: &RenderCtx<'_>) {
        if self.uploaded_for == Some(ctx.viewport) {
            return;
        }
        let vertices = strip_vertices(ctx.viewport, self.height_px);
        ctx.queue
            .write_buffer(&self.vertices, 0, bytemuck::cast_slice(&vertices));
        self.uploaded_for = Some(ctx.viewport);
    }

    fn record(&mut self, _ctx: &RenderCtx<'_>, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_vertex_buffer(0, self.vertices.slice(..));
        pass.draw(0..VERTEX_COUNT, 0..1);
    }
}
