use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::foundation::core::Resolution;
use crate::foundation::error::{FoldError, FoldResult};
use crate::render::backend::{
    FrameRGB, ReadOrigin, Readback, RenderBackend, RenderSettings, SampleFilter, TextureId,
};
use crate::render::passes::{DrawPass, PassBackend, PassSource};
use crate::render::shader::FOLD_WGSL;

const VERTEX_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

struct GpuTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

struct Target {
    width: u32,
    height: u32,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    readback: wgpu::Buffer,
    bytes_per_row: u32,
}

/// Offscreen `wgpu` renderer.
///
/// The device, pipeline and every texture live exactly as long as this value; dropping it
/// releases all of them.
pub struct GpuBackend {
    settings: RenderSettings,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white: GpuTexture,
    textures: HashMap<TextureId, GpuTexture>,
    next_texture: u32,
    target: Option<Target>,
    pending_clear: Option<[u8; 3]>,
    frame_open: bool,
}

impl GpuBackend {
    pub fn new(settings: RenderSettings) -> FoldResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .map_err(|e| match e {
            wgpu::RequestAdapterError::NotFound { .. } => {
                FoldError::gpu_context("no gpu adapter available")
            }
            other => FoldError::gpu_context(format!("wgpu request_adapter failed: {other:?}")),
        })?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("origami_device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: wgpu::ExperimentalFeatures::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| FoldError::gpu_context(format!("wgpu request_device failed: {e:?}")))?;

        tracing::debug!(adapter = ?adapter.get_info().name, "gpu context acquired");

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("origami_fold_shader"),
            source: wgpu::ShaderSource::Wgsl(FOLD_WGSL.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("origami_fold_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("origami_fold_pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("origami_fold_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 5]>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &VERTEX_ATTRS,
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: wgpu::TextureFormat::Rgba8Unorm,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // No culling and no depth test: draw order decides visibility.
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(FoldError::shader_compile(err.to_string()));
        }

        let filter = match settings.filter {
            SampleFilter::Nearest => wgpu::FilterMode::Nearest,
            SampleFilter::Bilinear => wgpu::FilterMode::Linear,
        };
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("origami_fold_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let white = create_rgba_texture(&device, &queue, 1, 1, &[255; 4], "origami_white");

        Ok(Self {
            settings,
            device,
            queue,
            pipeline,
            bind_group_layout,
            sampler,
            white,
            textures: HashMap::new(),
            next_texture: 0,
            target: None,
            pending_clear: None,
            frame_open: false,
        })
    }

    fn ensure_target(&mut self, width: u32, height: u32) -> FoldResult<()> {
        if let Some(t) = &self.target
            && t.width == width
            && t.height == height
        {
            return Ok(());
        }

        let unpadded = width
            .checked_mul(4)
            .ok_or_else(|| FoldError::gpu_context("render target width overflow"))?;
        let bytes_per_row = align_to(unpadded, wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);
        let size = (bytes_per_row as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| FoldError::gpu_context("readback buffer size overflow"))?;

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("origami_target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let readback = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("origami_readback"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        self.target = Some(Target {
            width,
            height,
            texture,
            view,
            readback,
            bytes_per_row,
        });
        Ok(())
    }

    fn load_op(&mut self) -> wgpu::LoadOp<wgpu::Color> {
        match self.pending_clear.take() {
            Some([r, g, b]) => wgpu::LoadOp::Clear(wgpu::Color {
                r: (r as f64) / 255.0,
                g: (g as f64) / 255.0,
                b: (b as f64) / 255.0,
                a: 1.0,
            }),
            None => wgpu::LoadOp::Load,
        }
    }

    fn flush_clear(&mut self) -> FoldResult<()> {
        if self.pending_clear.is_none() {
            return Ok(());
        }
        let load = self.load_op();
        let target = self
            .target
            .as_ref()
            .ok_or_else(|| FoldError::render("gpu frame target missing"))?;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("origami_clear_encoder"),
            });
        {
            let _rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("origami_clear_rp"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        self.queue.submit(Some(encoder.finish()));
        Ok(())
    }
}

impl PassBackend for GpuBackend {
    fn begin_frame(&mut self, resolution: Resolution, clear_rgb: [u8; 3]) -> FoldResult<()> {
        resolution.validate()?;
        self.ensure_target(resolution.width, resolution.height)?;
        self.pending_clear = Some(clear_rgb);
        self.frame_open = true;
        Ok(())
    }

    fn exec_pass(&mut self, pass: &DrawPass) -> FoldResult<()> {
        if !self.frame_open {
            return Err(FoldError::render("exec_pass called outside of a frame"));
        }
        pass.mesh
            .validate()
            .map_err(|e| FoldError::render(format!("{:?} pass mesh rejected: {e}", pass.role)))?;

        let load = self.load_op();
        let (view, solid) = match pass.source {
            PassSource::Texture(id) => (
                &self
                    .textures
                    .get(&id)
                    .ok_or_else(|| FoldError::render(format!("texture {id:?} is not resident")))?
                    .view,
                None,
            ),
            PassSource::Solid(rgb) => (&self.white.view, Some(rgb)),
        };
        let target = self
            .target
            .as_ref()
            .ok_or_else(|| FoldError::render("gpu frame target missing"))?;

        let block = pass.uniforms.to_gpu_block(solid);
        let uniforms = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("origami_fold_uniforms"),
                contents: bytemuck::cast_slice(&block),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let vertices: Vec<[f32; 5]> = pass
            .mesh
            .positions
            .iter()
            .zip(&pass.mesh.uvs)
            .map(|(p, uv)| [p[0], p[1], p[2], uv[0], uv[1]])
            .collect();
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("origami_vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("origami_indices"),
                contents: bytemuck::cast_slice(&pass.mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("origami_fold_bg"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let index_count = u32::try_from(pass.mesh.indices.len())
            .map_err(|_| FoldError::render("mesh index count overflow"))?;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("origami_pass_encoder"),
            });
        {
            let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("origami_pass_rp"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rp.set_pipeline(&self.pipeline);
            rp.set_bind_group(0, &bind_group, &[]);
            rp.set_vertex_buffer(0, vertex_buffer.slice(..));
            rp.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            rp.draw_indexed(0..index_count, 0, 0..1);
        }
        self.queue.submit(Some(encoder.finish()));
        Ok(())
    }

    fn readback(&mut self) -> FoldResult<Readback> {
        if !self.frame_open {
            return Err(FoldError::render("readback called outside of a frame"));
        }
        self.flush_clear()?;
        self.frame_open = false;

        let target = self
            .target
            .as_ref()
            .ok_or_else(|| FoldError::render("gpu frame target missing"))?;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("origami_readback_encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &target.readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(target.bytes_per_row),
                    rows_per_image: Some(target.height),
                },
            },
            wgpu::Extent3d {
                width: target.width,
                height: target.height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(Some(encoder.finish()));

        let slice = target.readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| FoldError::render(format!("wgpu poll failed: {e:?}")))?;
        rx.recv()
            .map_err(|_| FoldError::render("readback channel closed"))?
            .map_err(|e| FoldError::render(format!("readback map failed: {e:?}")))?;

        let mapped = slice.get_mapped_range();
        let row_px = target.width as usize;
        let padded = target.bytes_per_row as usize;
        let mut rows = Vec::with_capacity(row_px * 3 * target.height as usize);
        for row in 0..target.height as usize {
            let start = row * padded;
            for px in mapped[start..start + row_px * 4].chunks_exact(4) {
                rows.extend_from_slice(&px[..3]);
            }
        }
        drop(mapped);
        target.readback.unmap();

        Ok(Readback {
            width: target.width,
            height: target.height,
            rows,
            origin: ReadOrigin::TopLeft,
        })
    }
}

impl RenderBackend for GpuBackend {
    fn name(&self) -> &'static str {
        "gpu"
    }

    fn upload_texture(&mut self, image: &FrameRGB) -> FoldResult<TextureId> {
        let mut rgba = Vec::with_capacity((image.width as usize) * (image.height as usize) * 4);
        for px in image.data.chunks_exact(3) {
            rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        let texture = create_rgba_texture(
            &self.device,
            &self.queue,
            image.width,
            image.height,
            &rgba,
            "origami_source",
        );
        let id = TextureId(self.next_texture);
        self.next_texture = self
            .next_texture
            .checked_add(1)
            .ok_or_else(|| FoldError::gpu_context("texture id overflow"))?;
        self.textures.insert(id, texture);
        Ok(id)
    }

    fn release_texture(&mut self, id: TextureId) -> FoldResult<()> {
        self.textures
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| FoldError::render(format!("texture {id:?} released twice")))
    }

    fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn settings(&self) -> &RenderSettings {
        &self.settings
    }
}

impl Drop for GpuBackend {
    fn drop(&mut self) {
        tracing::debug!(textures = self.textures.len(), "gpu context released");
    }
}

fn create_rgba_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    width: u32,
    height: u32,
    rgba: &[u8],
    label: &'static str,
) -> GpuTexture {
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        rgba,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    GpuTexture {
        _texture: texture,
        view,
    }
}

fn align_to(value: u32, alignment: u32) -> u32 {
    let mask = alignment - 1;
    (value + mask) & !mask
}
