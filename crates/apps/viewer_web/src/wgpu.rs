#[cfg(target_arch = "wasm32")]
mod imp {
    use ::wgpu::util::DeviceExt;
    use std::borrow::Cow;
    use wasm_bindgen::prelude::*;

    use gpu::{
        BASE_SHADER, DOT_SHADER, Globals, InstanceBuffers, Mesh, MeshVertex, RenderCommand,
        RenderFrame, disc_mesh, sphere_mesh,
    };
    use scene::GlobeScene;

    #[derive(Debug)]
    pub struct WgpuContext {
        pub _instance: &'static ::wgpu::Instance,
        pub surface: ::wgpu::Surface<'static>,
        pub device: ::wgpu::Device,
        pub queue: ::wgpu::Queue,
        pub config: ::wgpu::SurfaceConfiguration,
        pub _canvas: web_sys::HtmlCanvasElement,
        pub dot_pipeline: ::wgpu::RenderPipeline,
        pub base_pipeline: ::wgpu::RenderPipeline,
        pub uniform_buffer: ::wgpu::Buffer,
        pub uniform_bind_group: ::wgpu::BindGroup,
        pub depth_view: ::wgpu::TextureView,
        pub sphere: GpuMesh,
        pub disc: GpuMesh,
        pub instance_transforms: ::wgpu::Buffer,
        pub instance_offsets: ::wgpu::Buffer,
        pub instance_count: u32,
    }

    #[derive(Debug)]
    pub struct GpuMesh {
        pub vertex_buffer: ::wgpu::Buffer,
        pub index_buffer: ::wgpu::Buffer,
        pub index_count: u32,
    }

    fn upload_mesh(device: &::wgpu::Device, label: &str, mesh: &Mesh) -> GpuMesh {
        let vertex_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: ::wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: ::wgpu::BufferUsages::INDEX,
        });
        GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
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

    const MESH_ATTRIBUTES: [::wgpu::VertexAttribute; 2] =
        ::wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
    const TRANSFORM_ATTRIBUTES: [::wgpu::VertexAttribute; 4] = ::wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4
    ];
    const OFFSET_ATTRIBUTES: [::wgpu::VertexAttribute; 1] =
        ::wgpu::vertex_attr_array![6 => Float32];

    fn mesh_layout() -> ::wgpu::VertexBufferLayout<'static> {
        ::wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as ::wgpu::BufferAddress,
            step_mode: ::wgpu::VertexStepMode::Vertex,
            attributes: &MESH_ATTRIBUTES,
        }
    }

    fn primitive() -> ::wgpu::PrimitiveState {
        ::wgpu::PrimitiveState {
            topology: ::wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: ::wgpu::FrontFace::Ccw,
            // Dots are single-sided discs seen edge-on at the limb; keep both
            // faces.
            cull_mode: None,
            polygon_mode: ::wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        }
    }

    pub async fn init_wgpu_from_canvas(
        canvas: web_sys::HtmlCanvasElement,
        scene: &GlobeScene,
    ) -> Result<WgpuContext, JsValue> {
        let width = canvas.width();
        let height = canvas.height();

        // `wgpu::Surface` must not outlive its `wgpu::Instance`; leak the
        // instance for the lifetime of the page.
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
                label: Some("globe-device"),
                required_features: ::wgpu::Features::empty(),
                required_limits: ::wgpu::Limits::downlevel_webgl2_defaults(),
                ..Default::default()
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("device error: {e}")))?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Shader colors are written as-is, without an sRGB encode.
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| JsValue::from_str("surface has no formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .iter()
            .copied()
            .find(|m| *m == ::wgpu::CompositeAlphaMode::PreMultiplied)
            .or_else(|| surface_caps.alpha_modes.first().copied())
            .unwrap_or(::wgpu::CompositeAlphaMode::Auto);

        let config = ::wgpu::SurfaceConfiguration {
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            desired_maximum_frame_latency: 2,
            present_mode: ::wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, &config);

        let dot_shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some("globe-dot-shader"),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Borrowed(DOT_SHADER)),
        });
        let base_shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some("globe-base-shader"),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Borrowed(BASE_SHADER)),
        });

        let uniform_buffer = device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some("globe-globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: ::wgpu::BufferUsages::UNIFORM | ::wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
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

        let uniform_bind_group = device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some("globe-globals-bg"),
            layout: &uniform_bind_group_layout,
            entries: &[::wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
            label: Some("globe-pipeline-layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            immediate_size: 0,
        });

        let dot_pipeline = device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some("globe-dot-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: ::wgpu::VertexState {
                module: &dot_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    mesh_layout(),
                    ::wgpu::VertexBufferLayout {
                        array_stride: 64,
                        step_mode: ::wgpu::VertexStepMode::Instance,
                        attributes: &TRANSFORM_ATTRIBUTES,
                    },
                    ::wgpu::VertexBufferLayout {
                        array_stride: 4,
                        step_mode: ::wgpu::VertexStepMode::Instance,
                        attributes: &OFFSET_ATTRIBUTES,
                    },
                ],
            },
            fragment: Some(::wgpu::FragmentState {
                module: &dot_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(::wgpu::BlendState::REPLACE),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: primitive(),
            depth_stencil: Some(::wgpu::DepthStencilState {
                format: ::wgpu::TextureFormat::Depth24Plus,
                depth_write_enabled: true,
                depth_compare: ::wgpu::CompareFunction::Less,
                stencil: ::wgpu::StencilState::default(),
                bias: ::wgpu::DepthBiasState::default(),
            }),
            multisample: ::wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let base_pipeline = device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some("globe-base-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: ::wgpu::VertexState {
                module: &base_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[mesh_layout()],
            },
            fragment: Some(::wgpu::FragmentState {
                module: &base_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(::wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: ::wgpu::PrimitiveState {
                cull_mode: Some(::wgpu::Face::Back),
                ..primitive()
            },
            depth_stencil: Some(::wgpu::DepthStencilState {
                format: ::wgpu::TextureFormat::Depth24Plus,
                depth_write_enabled: true,
                depth_compare: ::wgpu::CompareFunction::Less,
                stencil: ::wgpu::StencilState::default(),
                bias: ::wgpu::DepthBiasState::default(),
            }),
            multisample: ::wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let sphere = upload_mesh(
            &device,
            "globe-base",
            &sphere_mesh(
                scene.base.radius as f32,
                scene.base.segments,
                scene.base.segments,
            ),
        );
        let disc = upload_mesh(
            &device,
            "globe-dot",
            &disc_mesh(scene.dot.radius, scene.dot.segments),
        );

        // Placeholders until the dot field arrives.
        let instance_transforms = device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some("globe-dot-transforms"),
            size: 64,
            usage: ::wgpu::BufferUsages::VERTEX,
            mapped_at_creation: false,
        });
        let instance_offsets = device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some("globe-dot-offsets"),
            size: 4,
            usage: ::wgpu::BufferUsages::VERTEX,
            mapped_at_creation: false,
        });

        queue.write_buffer(
            &uniform_buffer,
            0,
            bytemuck::bytes_of(&<Globals as bytemuck::Zeroable>::zeroed()),
        );

        tracing::info!(width, height, ?format, "wgpu surface ready");

        Ok(WgpuContext {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            _canvas: canvas,
            dot_pipeline,
            base_pipeline,
            uniform_buffer,
            uniform_bind_group,
            depth_view,
            sphere,
            disc,
            instance_transforms,
            instance_offsets,
            instance_count: 0,
        })
    }

    pub fn set_dot_instances(ctx: &mut WgpuContext, buffers: &InstanceBuffers) {
        if buffers.is_empty() {
            ctx.instance_count = 0;
            return;
        }

        ctx.instance_transforms =
            ctx.device
                .create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                    label: Some("globe-dot-transforms"),
                    contents: buffers.transform_bytes(),
                    usage: ::wgpu::BufferUsages::VERTEX,
                });
        ctx.instance_offsets = ctx
            .device
            .create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                label: Some("globe-dot-offsets"),
                contents: buffers.offset_bytes(),
                usage: ::wgpu::BufferUsages::VERTEX,
            });
        ctx.instance_count = buffers.len() as u32;
    }

    pub fn resize_wgpu(ctx: &mut WgpuContext, width: u32, height: u32) {
        ctx.config.width = width.max(1);
        ctx.config.height = height.max(1);
        ctx.surface.configure(&ctx.device, &ctx.config);
        ctx.depth_view = create_depth_view(&ctx.device, &ctx.config);
    }

    pub fn render_globe(ctx: &WgpuContext, frame: &RenderFrame) -> Result<(), JsValue> {
        let Some(globals) = frame.globals else {
            return Ok(());
        };

        let output = ctx
            .surface
            .get_current_texture()
            .map_err(|e| JsValue::from_str(&format!("surface acquire failed: {e}")))?;
        let view = output
            .texture
            .create_view(&::wgpu::TextureViewDescriptor::default());

        ctx.queue
            .write_buffer(&ctx.uniform_buffer, 0, bytemuck::bytes_of(&globals));

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

            rpass.set_bind_group(0, &ctx.uniform_bind_group, &[]);
            for command in &frame.commands {
                match *command {
                    RenderCommand::Dots { instances } => {
                        let instances = instances.min(ctx.instance_count);
                        if instances == 0 {
                            continue;
                        }
                        rpass.set_pipeline(&ctx.dot_pipeline);
                        rpass.set_vertex_buffer(0, ctx.disc.vertex_buffer.slice(..));
                        rpass.set_vertex_buffer(1, ctx.instance_transforms.slice(..));
                        rpass.set_vertex_buffer(2, ctx.instance_offsets.slice(..));
                        rpass.set_index_buffer(
                            ctx.disc.index_buffer.slice(..),
                            ::wgpu::IndexFormat::Uint16,
                        );
                        rpass.draw_indexed(0..ctx.disc.index_count, 0, 0..instances);
                    }
                    RenderCommand::BaseSphere => {
                        rpass.set_pipeline(&ctx.base_pipeline);
                        rpass.set_vertex_buffer(0, ctx.sphere.vertex_buffer.slice(..));
                        rpass.set_index_buffer(
                            ctx.sphere.index_buffer.slice(..),
                            ::wgpu::IndexFormat::Uint16,
                        );
                        rpass.draw_indexed(0..ctx.sphere.index_count, 0, 0..1);
                    }
                }
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use wasm_bindgen::prelude::JsValue;

    use gpu::{InstanceBuffers, RenderFrame};
    use scene::GlobeScene;

    #[derive(Debug, Default)]
    pub struct WgpuContext;

    #[allow(dead_code)]
    pub async fn init_wgpu_from_canvas(
        _canvas: web_sys::HtmlCanvasElement,
        _scene: &GlobeScene,
    ) -> Result<WgpuContext, JsValue> {
        Err(JsValue::from_str(
            "wgpu initialization is only available on wasm32 targets",
        ))
    }

    #[allow(dead_code)]
    pub fn set_dot_instances(_ctx: &mut WgpuContext, _buffers: &InstanceBuffers) {}

    #[allow(dead_code)]
    pub fn resize_wgpu(_ctx: &mut WgpuContext, _width: u32, _height: u32) {}

    #[allow(dead_code)]
    pub fn render_globe(_ctx: &WgpuContext, _frame: &RenderFrame) -> Result<(), JsValue> {
        Err(JsValue::from_str(
            "wgpu rendering is only available on wasm32 targets",
        ))
    }
}

#[allow(unused_imports)]
pub use imp::{WgpuContext, init_wgpu_from_canvas, render_globe, resize_wgpu, set_dot_instances};
