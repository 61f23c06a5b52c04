use std::num::NonZeroU64;

use starfield_engine::render::RenderTarget;
use wgpu::util::DeviceExt;

use super::{DrawCmd, Frame, GpuBackend};
use crate::error::{BufferError, BufferKind, ShaderError, StageKind};
use crate::shader::{CompiledStage, ProgramLayout};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Size of one `translation` value (vec4<f32>).
const TRANSLATION_SIZE: u64 = 16;

pub struct WgpuStage {
    kind: StageKind,
    entry_point: String,
    module: wgpu::ShaderModule,
}

pub struct WgpuProgram {
    layout: ProgramLayout,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,
}

pub struct WgpuBuffer {
    buffer: wgpu::Buffer,
}

/// `vPosition` is fed as Float32x4; the pipeline's vertex layout is fixed to it.
const POSITION_FORMAT: wgpu::VertexFormat = wgpu::VertexFormat::Float32x4;
const POSITION_COMPONENTS: u32 = 4;

/// Runs `f` inside a device error scope and returns what the scope caught.
fn scoped<T>(
    device: &wgpu::Device,
    filter: wgpu::ErrorFilter,
    f: impl FnOnce() -> T,
) -> (T, Option<wgpu::Error>) {
    let scope = device.push_error_scope(filter);
    let value = f();
    let err = pollster::block_on(scope.pop());
    (value, err)
}

struct DepthTarget {
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

/// `GpuBackend` over wgpu.
///
/// Per-draw `translation` values are packed into one uniform buffer, one
/// aligned slot per draw, and selected with a dynamic offset. The buffer grows
/// on demand and is reused across frames.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_format: wgpu::TextureFormat,

    depth: Option<DepthTarget>,

    uniforms: Option<wgpu::Buffer>,
    uniform_capacity: usize,
    uniform_stride: u64,
    scratch: Vec<u8>,
}

impl WgpuBackend {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        Self {
            device: device.clone(),
            queue: queue.clone(),
            surface_format,
            depth: None,
            uniforms: None,
            uniform_capacity: 0,
            uniform_stride: TRANSLATION_SIZE.next_multiple_of(alignment.max(1)),
            scratch: Vec::new(),
        }
    }

    fn ensure_depth(&mut self, width: u32, height: u32) {
        if let Some(depth) = &self.depth {
            if depth.width == width && depth.height == height {
                return;
            }
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("starfield depth"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        self.depth = Some(DepthTarget {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            width,
            height,
        });
    }

    fn ensure_uniform_capacity(&mut self, required: usize) {
        if required <= self.uniform_capacity && self.uniforms.is_some() {
            return;
        }

        let new_cap = required.next_power_of_two().max(64);
        self.uniforms = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("starfield translation ubo"),
            size: new_cap as u64 * self.uniform_stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.uniform_capacity = new_cap;
    }

    /// Writes every translation of `frame` into its slot and returns the bind
    /// group that exposes one slot at a time.
    fn upload_translations(
        &mut self,
        frame: &Frame<'_, Self>,
        program: &WgpuProgram,
    ) -> Option<wgpu::BindGroup> {
        let count = frame.translations().count();
        if count == 0 {
            return None;
        }

        self.ensure_uniform_capacity(count);

        let stride = self.uniform_stride as usize;
        self.scratch.clear();
        self.scratch.resize(count * stride, 0);
        for (i, t) in frame.translations().enumerate() {
            let at = i * stride;
            self.scratch[at..at + TRANSLATION_SIZE as usize]
                .copy_from_slice(bytemuck::cast_slice(&t.to_array()));
        }

        let uniforms = self.uniforms.as_ref()?;
        self.queue.write_buffer(uniforms, 0, &self.scratch);

        Some(self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("starfield translation bind group"),
            layout: &program.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: program.layout.translation_binding,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: uniforms,
                    offset: 0,
                    size: NonZeroU64::new(TRANSLATION_SIZE),
                }),
            }],
        }))
    }
}

impl GpuBackend for WgpuBackend {
    type Stage = WgpuStage;
    type Program = WgpuProgram;
    type Buffer = WgpuBuffer;
    type Target<'t> = RenderTarget<'t>;

    fn create_stage(&mut self, stage: &CompiledStage) -> Result<WgpuStage, ShaderError> {
        let (module, err) = scoped(&self.device, wgpu::ErrorFilter::Validation, || {
            self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&stage.label),
                source: wgpu::ShaderSource::Wgsl(stage.source.as_str().into()),
            })
        });
        if let Some(err) = err {
            return Err(ShaderError::Compile {
                stage: stage.kind,
                log: format!("{}: rejected by the device: {err}", stage.label),
            });
        }

        Ok(WgpuStage {
            kind: stage.kind,
            entry_point: stage.entry_point.clone(),
            module,
        })
    }

    fn create_program(
        &mut self,
        layout: &ProgramLayout,
        vertex: &WgpuStage,
        fragment: &WgpuStage,
    ) -> Result<WgpuProgram, ShaderError> {
        if vertex.kind != StageKind::Vertex || fragment.kind != StageKind::Fragment {
            return Err(ShaderError::Link {
                log: format!(
                    "stage order mismatch: got {} + {}",
                    vertex.kind, fragment.kind
                ),
            });
        }

        let device = &self.device;
        let surface_format = self.surface_format;
        let ((bind_group_layout, pipeline), err) = scoped(device, wgpu::ErrorFilter::Validation, || {
            let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("starfield translation bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: layout.translation_binding,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: NonZeroU64::new(TRANSLATION_SIZE),
                    },
                    count: None,
                }],
            });

            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("starfield pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

            let attributes = [wgpu::VertexAttribute {
                format: POSITION_FORMAT,
                offset: 0,
                shader_location: layout.position_location,
            }];

            let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("starfield pipeline"),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &vertex.module,
                    entry_point: Some(&vertex.entry_point),
                    compilation_options: Default::default(),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: POSITION_FORMAT.size(),
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &attributes,
                    }],
                },

                fragment: Some(wgpu::FragmentState {
                    module: &fragment.module,
                    entry_point: Some(&fragment.entry_point),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
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

                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),

                multiview_mask: None,
                cache: None,
            });
            (bind_group_layout, pipeline)
        });
        if let Some(err) = err {
            return Err(ShaderError::Link {
                log: format!("pipeline rejected by the device: {err}"),
            });
        }

        Ok(WgpuProgram {
            layout: layout.clone(),
            bind_group_layout,
            pipeline,
        })
    }

    fn create_static_buffer(
        &mut self,
        kind: BufferKind,
        contents: &[u8],
    ) -> Result<WgpuBuffer, BufferError> {
        let (label, usage) = match kind {
            BufferKind::Vertex => ("starfield quad vbo", wgpu::BufferUsages::VERTEX),
            BufferKind::Index => ("starfield quad ibo", wgpu::BufferUsages::INDEX),
        };

        let (buffer, err) = scoped(&self.device, wgpu::ErrorFilter::OutOfMemory, || {
            self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            })
        });
        if let Some(err) = err {
            return Err(BufferError::Allocation {
                kind,
                reason: err.to_string(),
            });
        }

        Ok(WgpuBuffer { buffer })
    }

    fn submit(&mut self, target: &mut RenderTarget<'_>, frame: &Frame<'_, Self>) {
        self.ensure_depth(target.width, target.height);

        let program = frame.commands.iter().find_map(|c| match c {
            DrawCmd::BindProgram(p) => Some(*p),
            _ => None,
        });
        let bind_group = program.and_then(|p| self.upload_translations(frame, p));

        let Some(depth) = self.depth.as_ref() else { return };
        let stride = self.uniform_stride;

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("starfield pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(frame.clear_color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if frame.is_clear_only() {
            return;
        }

        let Some(viewport) = frame.viewport.clamped_to(target.width, target.height) else {
            return;
        };
        rpass.set_viewport(
            viewport.x as f32,
            viewport.y as f32,
            viewport.width as f32,
            viewport.height as f32,
            0.0,
            1.0,
        );

        let mut slot = 0u64;
        let mut vertices_ok = true;
        for cmd in &frame.commands {
            match cmd {
                DrawCmd::BindProgram(p) => rpass.set_pipeline(&p.pipeline),
                DrawCmd::BindVertexBuffer { buffer, attribute } => {
                    vertices_ok = attribute.components == POSITION_COMPONENTS
                        && attribute.effective_stride() == POSITION_FORMAT.size();
                    if vertices_ok {
                        rpass.set_vertex_buffer(0, buffer.buffer.slice(attribute.offset..));
                    } else {
                        log::warn!(
                            "vertex binding {attribute:?} does not match the {POSITION_FORMAT:?} layout; skipping draws"
                        );
                    }
                }
                DrawCmd::BindIndexBuffer(b) => {
                    rpass.set_index_buffer(b.buffer.slice(..), wgpu::IndexFormat::Uint32);
                }
                DrawCmd::SetTranslation(_) => {
                    if let Some(bg) = &bind_group {
                        rpass.set_bind_group(0, bg, &[(slot * stride) as u32]);
                    }
                    slot += 1;
                }
                DrawCmd::DrawIndexed { index_count } => {
                    if vertices_ok && bind_group.is_some() {
                        rpass.draw_indexed(0..*index_count, 0, 0..1);
                    }
                }
                // Pass state ends with the pass.
                DrawCmd::ReleaseIndexBuffer
                | DrawCmd::ReleaseVertexBuffer
                | DrawCmd::ReleaseProgram => {}
            }
        }
    }
}
