#[cfg(target_arch = "wasm32")]
mod imp {
    use ::wgpu::util::DeviceExt;
    use std::borrow::Cow;
    use wasm_bindgen::prelude::*;

    use crate::frame_data::{BufferCapacities, FrameData};

    #[derive(Debug)]
    pub struct WgpuContext {
        pub _instance: &'static ::wgpu::Instance,
        pub surface: ::wgpu::Surface<'static>,
        pub device: ::wgpu::Device,
        pub queue: ::wgpu::Queue,
        pub config: ::wgpu::SurfaceConfiguration,
        pub _canvas: web_sys::HtmlCanvasElement,
        pub globe_pipeline: ::wgpu::RenderPipeline,
        pub globe_dot_pipeline: ::wgpu::RenderPipeline,
        pub line_pipeline: ::wgpu::RenderPipeline,
        pub line_dot_pipeline: ::wgpu::RenderPipeline,
        pub globals_buffer: ::wgpu::Buffer,
        pub globals_bind_group: ::wgpu::BindGroup,
        pub depth_view: ::wgpu::TextureView,
        pub sphere_vertex_buffer: ::wgpu::Buffer,
        pub sphere_index_buffer: ::wgpu::Buffer,
        pub sphere_index_count: u32,
        pub quad_buffer: ::wgpu::Buffer,
        pub globe_dot_buffer: ::wgpu::Buffer,
        pub line_buffer: ::wgpu::Buffer,
        pub line_dot_buffer: ::wgpu::Buffer,
        pub capacities: BufferCapacities,
    }

    // WebGL2 has no storage buffers in vertex shaders, so globals are a uniform.
    const GLOBALS_WGSL: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    camera_right: vec4<f32>,
    camera_up: vec4<f32>,
    globe_color: vec4<f32>,
    // rgb + sprite size
    globe_dot: vec4<f32>,
    line_color: vec4<f32>,
    // rgb + radius
    line_dot: vec4<f32>,
    // x: globe body radius
    body: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;
"#;

    const GLOBE_SHADER: &str = r#"
@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return globals.view_proj * vec4<f32>(position * globals.body.x, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return globals.globe_color;
}
"#;

    const DOTS_SHADER: &str = r#"
struct DotOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) corner: vec2<f32>,
    @location(1) color: vec3<f32>,
};

fn billboard(center: vec3<f32>, corner: vec2<f32>, half_size: f32) -> vec4<f32> {
    let offset = globals.camera_right.xyz * (corner.x * half_size)
        + globals.camera_up.xyz * (corner.y * half_size);
    return globals.view_proj * vec4<f32>(center + offset, 1.0);
}

@vertex
fn vs_globe_dot(@location(0) corner: vec2<f32>, @location(1) center: vec3<f32>) -> DotOut {
    return DotOut(
        billboard(center, corner, globals.globe_dot.w * 0.5),
        corner,
        globals.globe_dot.xyz,
    );
}

@vertex
fn vs_line_dot(@location(0) corner: vec2<f32>, @location(1) center: vec3<f32>) -> DotOut {
    return DotOut(
        billboard(center, corner, globals.line_dot.w),
        corner,
        globals.line_dot.xyz,
    );
}

@fragment
fn fs_main(v: DotOut) -> @location(0) vec4<f32> {
    if (dot(v.corner, v.corner) > 1.0) {
        discard;
    }
    return vec4<f32>(v.color, 1.0);
}
"#;

    const LINES_SHADER: &str = r#"
struct LineOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) alpha: f32,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) alpha: f32) -> LineOut {
    return LineOut(globals.view_proj * vec4<f32>(position, 1.0), alpha);
}

@fragment
fn fs_main(v: LineOut) -> @location(0) vec4<f32> {
    return vec4<f32>(globals.line_color.xyz, v.alpha);
}
"#;

    const QUAD_CORNERS: [[f32; 2]; 6] = [
        [-1.0, -1.0],
        [1.0, -1.0],
        [1.0, 1.0],
        [-1.0, -1.0],
        [1.0, 1.0],
        [-1.0, 1.0],
    ];

    #[repr(C)]
    #[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct SphereVertex {
        position: [f32; 3],
    }

    #[repr(C)]
    #[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct Globals {
        view_proj: [[f32; 4]; 4],
        camera_right: [f32; 4],
        camera_up: [f32; 4],
        globe_color: [f32; 4],
        globe_dot: [f32; 4],
        line_color: [f32; 4],
        line_dot: [f32; 4],
        body: [f32; 4],
    }

    impl Globals {
        fn from_frame(frame: &FrameData) -> Self {
            let xyzw = |v: [f32; 3], w: f32| [v[0], v[1], v[2], w];
            Self {
                view_proj: frame.view_proj,
                camera_right: xyzw(frame.camera_right, 0.0),
                camera_up: xyzw(frame.camera_up, 0.0),
                globe_color: frame.globe_color,
                globe_dot: xyzw(frame.globe_dot_color, frame.globe_dot_size),
                line_color: xyzw(frame.line_color, 1.0),
                line_dot: xyzw(frame.line_dot_color, frame.line_dot_radius),
                body: [frame.globe_radius, 0.0, 0.0, 0.0],
            }
        }
    }

    fn create_depth_view(
        device: &::wgpu::Device,
        config: &::wgpu::SurfaceConfiguration,
    ) -> ::wgpu::TextureView {
        let tex = device.create_texture(&::wgpu::TextureDescriptor {
            label: Some("globe-depth"),
            size: ::wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: ::wgpu::TextureDimension::D2,
            format: ::wgpu::TextureFormat::Depth24Plus,
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        tex.create_view(&::wgpu::TextureViewDescriptor::default())
    }

    /// Unit sphere; the shader scales it to the globe body radius.
    fn generate_sphere_mesh(lat_segments: u32, lon_segments: u32) -> (Vec<SphereVertex>, Vec<u16>) {
        let lat_segments = lat_segments.max(3);
        let lon_segments = lon_segments.max(3);

        let mut vertices = Vec::with_capacity(((lat_segments + 1) * (lon_segments + 1)) as usize);
        for lat in 0..=lat_segments {
            let theta = lat as f32 / lat_segments as f32 * std::f32::consts::PI;
            let (sin_t, cos_t) = theta.sin_cos();
            for lon in 0..=lon_segments {
                let phi = lon as f32 / lon_segments as f32 * std::f32::consts::TAU;
                let (sin_p, cos_p) = phi.sin_cos();
                vertices.push(SphereVertex {
                    position: [sin_t * cos_p, cos_t, sin_t * sin_p],
                });
            }
        }

        let stride = lon_segments + 1;
        let mut indices = Vec::with_capacity((lat_segments * lon_segments * 6) as usize);
        for lat in 0..lat_segments {
            for lon in 0..lon_segments {
                let i0 = lat * stride + lon;
                let i1 = i0 + 1;
                let i2 = i0 + stride;
                let i3 = i2 + 1;
                for i in [i0, i2, i1, i1, i2, i3] {
                    indices.push(i as u16);
                }
            }
        }

        (vertices, indices)
    }

    fn vertex_buffer(device: &::wgpu::Device, label: &str, bytes: u64) -> ::wgpu::Buffer {
        device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some(label),
            size: bytes.max(16),
            usage: ::wgpu::BufferUsages::VERTEX | ::wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn primitive(topology: ::wgpu::PrimitiveTopology) -> ::wgpu::PrimitiveState {
        ::wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: ::wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: ::wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        }
    }

    fn depth_state(write: bool, compare: ::wgpu::CompareFunction) -> Option<::wgpu::DepthStencilState> {
        Some(::wgpu::DepthStencilState {
            format: ::wgpu::TextureFormat::Depth24Plus,
            depth_write_enabled: write,
            depth_compare: compare,
            stencil: ::wgpu::StencilState::default(),
            bias: ::wgpu::DepthBiasState::default(),
        })
    }

    const QUAD_LAYOUT: ::wgpu::VertexBufferLayout<'static> = ::wgpu::VertexBufferLayout {
        array_stride: 8,
        step_mode: ::wgpu::VertexStepMode::Vertex,
        attributes: &[::wgpu::VertexAttribute {
            format: ::wgpu::VertexFormat::Float32x2,
            offset: 0,
            shader_location: 0,
        }],
    };

    const INSTANCE_LAYOUT: ::wgpu::VertexBufferLayout<'static> = ::wgpu::VertexBufferLayout {
        array_stride: 12,
        step_mode: ::wgpu::VertexStepMode::Instance,
        attributes: &[::wgpu::VertexAttribute {
            format: ::wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: 1,
        }],
    };

    fn dot_pipeline(
        device: &::wgpu::Device,
        layout: &::wgpu::PipelineLayout,
        module: &::wgpu::ShaderModule,
        entry_point: &str,
        format: ::wgpu::TextureFormat,
        label: &str,
    ) -> ::wgpu::RenderPipeline {
        device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: ::wgpu::VertexState {
                module,
                entry_point: Some(entry_point),
                compilation_options: Default::default(),
                buffers: &[QUAD_LAYOUT, INSTANCE_LAYOUT],
            },
            fragment: Some(::wgpu::FragmentState {
                module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format,
                    blend: Some(::wgpu::BlendState::REPLACE),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: primitive(::wgpu::PrimitiveTopology::TriangleList),
            depth_stencil: depth_state(true, ::wgpu::CompareFunction::Less),
            multisample: ::wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }

    fn shader(device: &::wgpu::Device, label: &str, body: &str) -> ::wgpu::ShaderModule {
        let source = format!("{GLOBALS_WGSL}{body}");
        device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Owned(source)),
        })
    }

    pub async fn init_wgpu_from_canvas(
        canvas: web_sys::HtmlCanvasElement,
        capacities: BufferCapacities,
    ) -> Result<WgpuContext, JsValue> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        // `wgpu::Surface` must not outlive its `wgpu::Instance`; the instance
        // is leaked for the lifetime of the page.
        let instance: &'static ::wgpu::Instance = Box::leak(Box::new(::wgpu::Instance::new(
            &::wgpu::InstanceDescriptor {
                backends: ::wgpu::Backends::BROWSER_WEBGPU | ::wgpu::Backends::GL,
                ..Default::default()
            },
        )));

        let surface = instance
            .create_surface(::wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("surface error: {e}")))?;

        let adapter = instance
            .request_adapter(&::wgpu::RequestAdapterOptions {
                power_preference: ::wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("adapter error: {e}")))?;

        let (device, queue) = adapter
            .request_device(&::wgpu::DeviceDescriptor {
                label: Some("globe-wgpu-device"),
                required_features: ::wgpu::Features::empty(),
                required_limits: ::wgpu::Limits::downlevel_webgl2_defaults(),
                ..Default::default()
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("device error: {e}")))?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Colours are authored as plain sRGB hex, so skip the sRGB-encoding formats.
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| JsValue::from_str("surface reports no formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(::wgpu::CompositeAlphaMode::Auto);

        let config = ::wgpu::SurfaceConfiguration {
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            desired_maximum_frame_latency: 2,
            present_mode: ::wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, &config);

        let globe_shader = shader(&device, "globe-body-shader", GLOBE_SHADER);
        let dots_shader = shader(&device, "globe-dots-shader", DOTS_SHADER);
        let lines_shader = shader(&device, "globe-lines-shader", LINES_SHADER);

        let globals_buffer = device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some("globe-globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: ::wgpu::BufferUsages::UNIFORM | ::wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let globals_bind_group_layout =
            device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
                label: Some("globe-globals-bgl"),
                entries: &[::wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ::wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: ::wgpu::BindingType::Buffer {
                        ty: ::wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let globals_bind_group = device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some("globe-globals-bg"),
            layout: &globals_bind_group_layout,
            entries: &[::wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
            label: Some("globe-pipeline-layout"),
            bind_group_layouts: &[&globals_bind_group_layout],
            immediate_size: 0,
        });

        // Translucent body: blended over the dots behind it, but still writes
        // depth so the far side of the connectors is hidden.
        let globe_pipeline = device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some("globe-body-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: ::wgpu::VertexState {
                module: &globe_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[::wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<SphereVertex>() as ::wgpu::BufferAddress,
                    step_mode: ::wgpu::VertexStepMode::Vertex,
                    attributes: &[::wgpu::VertexAttribute {
                        format: ::wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 0,
                    }],
                }],
            },
            fragment: Some(::wgpu::FragmentState {
                module: &globe_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(::wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: primitive(::wgpu::PrimitiveTopology::TriangleList),
            depth_stencil: depth_state(true, ::wgpu::CompareFunction::Less),
            multisample: ::wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let globe_dot_pipeline = dot_pipeline(
            &device,
            &pipeline_layout,
            &dots_shader,
            "vs_globe_dot",
            config.format,
            "globe-dots-pipeline",
        );
        let line_dot_pipeline = dot_pipeline(
            &device,
            &pipeline_layout,
            &dots_shader,
            "vs_line_dot",
            config.format,
            "line-dots-pipeline",
        );

        let line_pipeline = device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some("globe-lines-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: ::wgpu::VertexState {
                module: &lines_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[::wgpu::VertexBufferLayout {
                    array_stride: 16,
                    step_mode: ::wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        ::wgpu::VertexAttribute {
                            format: ::wgpu::VertexFormat::Float32x3,
                            offset: 0,
                            shader_location: 0,
                        },
                        ::wgpu::VertexAttribute {
                            format: ::wgpu::VertexFormat::Float32,
                            offset: 12,
                            shader_location: 1,
                        },
                    ],
                }],
            },
            fragment: Some(::wgpu::FragmentState {
                module: &lines_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(::wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: primitive(::wgpu::PrimitiveTopology::LineList),
            depth_stencil: depth_state(false, ::wgpu::CompareFunction::LessEqual),
            multisample: ::wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let (vertices, indices) = generate_sphere_mesh(48, 96);
        let sphere_vertex_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("globe-sphere-vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: ::wgpu::BufferUsages::VERTEX,
        });
        let sphere_index_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("globe-sphere-indices"),
            contents: bytemuck::cast_slice(&indices),
            usage: ::wgpu::BufferUsages::INDEX,
        });
        let quad_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("globe-dot-quad"),
            contents: bytemuck::cast_slice(&QUAD_CORNERS),
            usage: ::wgpu::BufferUsages::VERTEX,
        });

        let globe_dot_buffer = vertex_buffer(
            &device,
            "globe-dot-instances",
            capacities.globe_dots as u64 * 12,
        );
        let line_buffer = vertex_buffer(
            &device,
            "globe-line-vertices",
            capacities.line_vertices as u64 * 16,
        );
        let line_dot_buffer = vertex_buffer(
            &device,
            "line-dot-instances",
            capacities.line_dots as u64 * 12,
        );

        Ok(WgpuContext {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            _canvas: canvas,
            globe_pipeline,
            globe_dot_pipeline,
            line_pipeline,
            line_dot_pipeline,
            globals_buffer,
            globals_bind_group,
            depth_view,
            sphere_vertex_buffer,
            sphere_index_buffer,
            sphere_index_count: indices.len() as u32,
            quad_buffer,
            globe_dot_buffer,
            line_buffer,
            line_dot_buffer,
            capacities,
        })
    }

    pub fn resize_wgpu(ctx: &mut WgpuContext, width: u32, height: u32) {
        ctx.config.width = width.max(1);
        ctx.config.height = height.max(1);
        ctx.surface.configure(&ctx.device, &ctx.config);
        ctx.depth_view = create_depth_view(&ctx.device, &ctx.config);
    }

    /// Uploads at most `capacity` items and returns how many were written.
    fn upload<T: bytemuck::Pod>(
        queue: &::wgpu::Queue,
        buffer: &::wgpu::Buffer,
        items: &[T],
        capacity: u32,
    ) -> u32 {
        let count = items.len().min(capacity as usize);
        if count > 0 {
            queue.write_buffer(buffer, 0, bytemuck::cast_slice(&items[..count]));
        }
        count as u32
    }

    pub fn render_globe(ctx: &WgpuContext, frame: &FrameData) -> Result<(), JsValue> {
        let surface_frame = ctx
            .surface
            .get_current_texture()
            .map_err(|e| JsValue::from_str(&format!("surface acquire failed: {e}")))?;
        let view = surface_frame
            .texture
            .create_view(&::wgpu::TextureViewDescriptor::default());

        ctx.queue.write_buffer(
            &ctx.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals::from_frame(frame)),
        );
        let caps = ctx.capacities;
        let globe_dots = upload(&ctx.queue, &ctx.globe_dot_buffer, &frame.globe_dots, caps.globe_dots);
        let line_vertices = upload(&ctx.queue, &ctx.line_buffer, &frame.lines, caps.line_vertices);
        let line_dots = upload(&ctx.queue, &ctx.line_dot_buffer, &frame.line_dots, caps.line_dots);

        let mut encoder = ctx
            .device
            .create_command_encoder(&::wgpu::CommandEncoderDescriptor {
                label: Some("globe-encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&::wgpu::RenderPassDescriptor {
                label: Some("globe-pass"),
                color_attachments: &[Some(::wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: ::wgpu::Operations {
                        load: ::wgpu::LoadOp::Clear(::wgpu::Color::TRANSPARENT),
                        store: ::wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(::wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_view,
                    depth_ops: Some(::wgpu::Operations {
                        load: ::wgpu::LoadOp::Clear(1.0),
                        store: ::wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });
            rpass.set_bind_group(0, &ctx.globals_bind_group, &[]);

            // Dots first so the translucent body can blend over the far side.
            if globe_dots > 0 {
                rpass.set_pipeline(&ctx.globe_dot_pipeline);
                rpass.set_vertex_buffer(0, ctx.quad_buffer.slice(..));
                rpass.set_vertex_buffer(1, ctx.globe_dot_buffer.slice(..));
                rpass.draw(0..QUAD_CORNERS.len() as u32, 0..globe_dots);
            }

            rpass.set_pipeline(&ctx.globe_pipeline);
            rpass.set_vertex_buffer(0, ctx.sphere_vertex_buffer.slice(..));
            rpass.set_index_buffer(ctx.sphere_index_buffer.slice(..), ::wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..ctx.sphere_index_count, 0, 0..1);

            if line_vertices > 0 {
                rpass.set_pipeline(&ctx.line_pipeline);
                rpass.set_vertex_buffer(0, ctx.line_buffer.slice(..));
                rpass.draw(0..line_vertices, 0..1);
            }

            if line_dots > 0 {
                rpass.set_pipeline(&ctx.line_dot_pipeline);
                rpass.set_vertex_buffer(0, ctx.quad_buffer.slice(..));
                rpass.set_vertex_buffer(1, ctx.line_dot_buffer.slice(..));
                rpass.draw(0..QUAD_CORNERS.len() as u32, 0..line_dots);
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        surface_frame.present();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use wasm_bindgen::prelude::JsValue;

    use crate::frame_data::{BufferCapacities, FrameData};

    #[derive(Debug, Default)]
    pub struct WgpuContext;

    pub async fn init_wgpu_from_canvas(
        _canvas: web_sys::HtmlCanvasElement,
        _capacities: BufferCapacities,
    ) -> Result<WgpuContext, JsValue> {
        Err(JsValue::from_str(
            "wgpu initialization is only available on wasm32 targets",
        ))
    }

    pub fn resize_wgpu(_ctx: &mut WgpuContext, _width: u32, _height: u32) {}

    pub fn render_globe(_ctx: &WgpuContext, _frame: &FrameData) -> Result<(), JsValue> {
        Err(JsValue::from_str(
            "wgpu rendering is only available on wasm32 targets",
        ))
    }
}

pub use imp::{WgpuContext, init_wgpu_from_canvas, render_globe, resize_wgpu};
