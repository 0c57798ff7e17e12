use std::borrow::Cow;

use pollster::block_on;
use wgpu::util::DeviceExt;

use crate::backend::{scissor_rect, Backend};
use crate::batch::{Batch, DEFAULT_CAPACITY, MAX_CAPACITY};
use crate::error::RenderError;
use crate::texture_atlas::AtlasImage;
use crate::utils::{Color, Rectangle};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ViewportUniform {
    size: [f32; 2],
    _padding: [f32; 2],
}

// One vertex buffer per parallel batch array.
const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
const TEX_COORD_ATTRIBUTES: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![1 => Float32x2];
const COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Unorm8x4];

const POSITION_STRIDE: u64 = std::mem::size_of::<[f32; 2]>() as u64;
const COLOR_STRIDE: u64 = std::mem::size_of::<Color>() as u64;
const INDEX_STRIDE: u64 = std::mem::size_of::<u32>() as u64;

// Quads whose largest per-quad buffer (positions) fits the device limit.
fn max_quads(device: &wgpu::Device) -> usize {
    let per_quad = 4 * POSITION_STRIDE;
    (device.limits().max_buffer_size / per_quad).min(MAX_CAPACITY as u64) as usize
}

struct Frame {
    texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

struct QuadBuffers {
    quads: usize,
    positions: wgpu::Buffer,
    tex_coords: wgpu::Buffer,
    colors: wgpu::Buffer,
    indices: wgpu::Buffer,
}

impl QuadBuffers {
    fn new(device: &wgpu::Device, quads: usize) -> Self {
        let vertices = quads as u64 * 4;
        let create = |label: &str, size: u64, usage: wgpu::BufferUsages| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage: usage | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        Self {
            quads,
            positions: create(
                "Batch Position Buffer",
                vertices * POSITION_STRIDE,
                wgpu::BufferUsages::VERTEX,
            ),
            tex_coords: create(
                "Batch TexCoord Buffer",
                vertices * POSITION_STRIDE,
                wgpu::BufferUsages::VERTEX,
            ),
            colors: create(
                "Batch Color Buffer",
                vertices * COLOR_STRIDE,
                wgpu::BufferUsages::VERTEX,
            ),
            indices: create(
                "Batch Index Buffer",
                quads as u64 * 6 * INDEX_STRIDE,
                wgpu::BufferUsages::INDEX,
            ),
        }
    }
}

/// wgpu submission shim: one render pass and one indexed draw per flush.
pub struct WgpuBackend<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    scale_factor: f32,
    render_pipeline: wgpu::RenderPipeline,
    viewport_buffer: wgpu::Buffer,
    viewport_bind_group: wgpu::BindGroup,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    atlas_texture: Option<wgpu::Texture>,
    atlas_bind_group: Option<wgpu::BindGroup>,
    buffers: QuadBuffers,
    clip: Option<Rectangle>,
    frame: Option<Frame>,
}

impl<'a> WgpuBackend<'a> {
    /// Requests an adapter and device for `surface` and builds the quad
    /// pipeline. `capacity` is the expected batch size in quads; the GPU
    /// buffers start at most [`DEFAULT_CAPACITY`] quads large and grow on demand.
    pub fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'a>,
        width: u32,
        height: u32,
        scale_factor: f32,
        vsync: bool,
        capacity: usize,
    ) -> Result<Self, RenderError> {
        let adapter = block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        }))
        .ok_or(RenderError::NoAdapter)?;
        log::info!("using adapter {:?}", adapter.get_info());

        let (device, queue) = block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits:
                    wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        ))?;

        // The toolkit's colors are plain bytes, so prefer a non-sRGB target.
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|format| !format.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(RenderError::NoAdapter)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: if vsync {
                wgpu::PresentMode::Fifo
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            desired_maximum_frame_latency: 2,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let viewport_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("viewport_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<ViewportUniform>() as _,
                        ),
                    },
                    count: None,
                }],
            });

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("texture_bind_group_layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let viewport_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Viewport Uniform Buffer"),
            contents: bytemuck::bytes_of(&ViewportUniform {
                size: [config.width as f32, config.height as f32],
                _padding: [0.0; 2],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let viewport_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Viewport Bind Group"),
            layout: &viewport_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Quad Shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("../shaders/quad.wgsl"))),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Quad Pipeline Layout"),
            bind_group_layouts: &[&viewport_bind_group_layout, &texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Quad Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: POSITION_STRIDE,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &POSITION_ATTRIBUTES,
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: POSITION_STRIDE,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &TEX_COORD_ATTRIBUTES,
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: COLOR_STRIDE,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &COLOR_ATTRIBUTES,
                    },
                ],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // Larger batches grow the buffers on first use.
        let initial = capacity.clamp(1, DEFAULT_CAPACITY).min(max_quads(&device));
        let buffers = QuadBuffers::new(&device, initial);

        log::info!(
            "wgpu backend ready: {}x{} {:?}, {} quad buffers",
            config.width,
            config.height,
            format,
            buffers.quads
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            scale_factor,
            render_pipeline,
            viewport_buffer,
            viewport_bind_group,
            texture_bind_group_layout,
            atlas_texture: None,
            atlas_bind_group: None,
            buffers,
            clip: None,
            frame: None,
        })
    }

    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        self.scale_factor = scale_factor;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn ensure_frame(&mut self) -> Result<(), RenderError> {
        if self.frame.is_some() {
            return Ok(());
        }
        let texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                self.surface.get_current_texture()?
            }
            Err(err) => return Err(err.into()),
        };
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.frame = Some(Frame { texture, view });
        Ok(())
    }

    fn ensure_buffer_capacity(&mut self, quads: usize) -> Result<(), RenderError> {
        if quads <= self.buffers.quads {
            return Ok(());
        }
        let max = max_quads(&self.device);
        if quads > max {
            return Err(RenderError::BatchCapacity {
                requested: quads,
                max,
            });
        }
        log::debug!("growing quad buffers {} -> {}", self.buffers.quads, quads);
        self.buffers = QuadBuffers::new(&self.device, quads);
        Ok(())
    }
}

impl Backend for WgpuBackend<'_> {
    fn upload_atlas(&mut self, image: &AtlasImage) -> Result<(), RenderError> {
        let size = wgpu::Extent3d {
            width: image.width(),
            height: image.height(),
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Atlas Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.pixels(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width()),
                rows_per_image: Some(image.height()),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Atlas Sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Atlas Bind Group"),
            layout: &self.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        self.atlas_texture = Some(texture);
        self.atlas_bind_group = Some(bind_group);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        // Minimized windows report zero; keep the last usable configuration.
        if width == 0 || height == 0 {
            return;
        }
        self.frame = None;
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    fn set_clip(&mut self, clip: Option<Rectangle>) {
        self.clip = clip;
    }

    fn clear(&mut self, color: Color) -> Result<(), RenderError> {
        self.ensure_frame()?;
        let Some(frame) = self.frame.as_ref() else {
            return Ok(());
        };
        let [r, g, b, a] = color.to_f64_array();

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Clear Encoder"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn submit(&mut self, batch: &Batch<'_>) -> Result<(), RenderError> {
        if self.atlas_bind_group.is_none() {
            return Err(RenderError::AtlasNotUploaded);
        }
        let (width, height) = (self.config.width, self.config.height);
        let Some(scissor) = scissor_rect(self.clip, width, height, self.scale_factor) else {
            log::trace!("clip is empty, dropping {} quads", batch.quad_count());
            return Ok(());
        };

        self.ensure_buffer_capacity(batch.quad_count())?;
        self.ensure_frame()?;

        let viewport = ViewportUniform {
            size: [
                self.config.width as f32 / self.scale_factor,
                self.config.height as f32 / self.scale_factor,
            ],
            _padding: [0.0; 2],
        };
        self.queue
            .write_buffer(&self.viewport_buffer, 0, bytemuck::bytes_of(&viewport));
        self.queue.write_buffer(
            &self.buffers.positions,
            0,
            bytemuck::cast_slice(batch.positions),
        );
        self.queue.write_buffer(
            &self.buffers.tex_coords,
            0,
            bytemuck::cast_slice(batch.tex_coords),
        );
        self.queue
            .write_buffer(&self.buffers.colors, 0, bytemuck::cast_slice(batch.colors));
        self.queue
            .write_buffer(&self.buffers.indices, 0, bytemuck::cast_slice(batch.indices));

        let (Some(frame), Some(atlas_bind_group)) =
            (self.frame.as_ref(), self.atlas_bind_group.as_ref())
        else {
            return Ok(());
        };

        let vertex_count = batch.positions.len() as u64;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Batch Encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Batch Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.render_pipeline);
            rpass.set_bind_group(0, &self.viewport_bind_group, &[]);
            rpass.set_bind_group(1, atlas_bind_group, &[]);
            rpass.set_vertex_buffer(
                0,
                self.buffers.positions.slice(..vertex_count * POSITION_STRIDE),
            );
            rpass.set_vertex_buffer(
                1,
                self.buffers.tex_coords.slice(..vertex_count * POSITION_STRIDE),
            );
            rpass.set_vertex_buffer(
                2,
                self.buffers.colors.slice(..vertex_count * COLOR_STRIDE),
            );
            rpass.set_index_buffer(
                self.buffers
                    .indices
                    .slice(..batch.indices.len() as u64 * INDEX_STRIDE),
                wgpu::IndexFormat::Uint32,
            );
            rpass.set_scissor_rect(
                scissor.x as u32,
                scissor.y as u32,
                scissor.width as u32,
                scissor.height as u32,
            );
            rpass.draw_indexed(0..batch.indices.len() as u32, 0, 0..1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.ensure_frame()?;
        if let Some(frame) = self.frame.take() {
            frame.texture.present();
        }
        Ok(())
    }
}
