//! Puts CPU-rendered frames on screen as a textured full-screen quad.

use wgpu::util::DeviceExt;

use crate::application::Screen;
use crate::renderer::Frame;
use crate::texture::Texture;

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

// texture rows run top-down, clip space y runs bottom-up
#[rustfmt::skip]
pub const QUAD_VERTICES: &[Vertex] = &[
    Vertex { position: [-1.0,  1.0, 0.0], tex_coords: [0.0, 0.0] },
    Vertex { position: [-1.0, -1.0, 0.0], tex_coords: [0.0, 1.0] },
    Vertex { position: [ 1.0, -1.0, 0.0], tex_coords: [1.0, 1.0] },
    Vertex { position: [ 1.0,  1.0, 0.0], tex_coords: [1.0, 0.0] },
];

pub const QUAD_INDICES: &[u16] = &[0, 1, 2, 0, 2, 3];

pub struct VertexBuffer(wgpu::Buffer);

impl VertexBuffer {
    pub fn init_immediate(device: &wgpu::Device, content: &[u8], label: Option<&str>) -> Self {
        let init_descriptor = wgpu::util::BufferInitDescriptor {
            label,
            contents: content,
            usage: wgpu::BufferUsages::VERTEX,
        };
        Self(device.create_buffer_init(&init_descriptor))
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.0
    }
}

pub struct IndexBuffer {
    buffer: wgpu::Buffer,
    format: wgpu::IndexFormat,
}

impl IndexBuffer {
    pub fn init_immediate_u16(device: &wgpu::Device, content: &[u16], label: Option<&str>) -> Self {
        let init_descriptor = wgpu::util::BufferInitDescriptor {
            label,
            contents: bytemuck::cast_slice(content),
            usage: wgpu::BufferUsages::INDEX,
        };
        Self {
            buffer: device.create_buffer_init(&init_descriptor),
            format: wgpu::IndexFormat::Uint16,
        }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn format(&self) -> wgpu::IndexFormat {
        self.format
    }

    pub fn count(&self) -> u32 {
        (self.buffer.size() / Self::format_size(self.format) as u64) as u32
    }

    /// Return the index byte size from the index format
    #[inline(always)]
    pub fn format_size(format: wgpu::IndexFormat) -> u8 {
        match format {
            wgpu::IndexFormat::Uint16 => 2,
            wgpu::IndexFormat::Uint32 => 4,
        }
    }
}

pub struct Presenter {
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: VertexBuffer,
    index_buffer: IndexBuffer,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    texture: Texture,
    frame_bind_group: wgpu::BindGroup,
}

impl Presenter {
    pub fn new(screen: &Screen, width: u32, height: u32) -> Self {
        let shader = screen
            .device
            .create_shader_module(wgpu::include_wgsl!("asset/shader/present.wgsl"));

        let vertex_buffer = VertexBuffer::init_immediate(
            &screen.device,
            bytemuck::cast_slice(QUAD_VERTICES),
            Some("Quad Vertex Buffer"),
        );
        let index_buffer =
            IndexBuffer::init_immediate_u16(&screen.device, QUAD_INDICES, Some("Quad Index Buffer"));

        let texture_bind_group_layout =
            screen
                .device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
                    label: Some("frame_bind_group_layout"),
                });

        let format = Texture::frame_format(screen.config.format);
        tracing::debug!(surface = ?screen.config.format, frame = ?format, "frame texture format");
        let texture = Texture::new(&screen.device, width, height, format, Some("Frame Texture"));
        let frame_bind_group =
            create_frame_bind_group(&screen.device, &texture_bind_group_layout, &texture);

        let render_pipeline_layout =
            screen
                .device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("Present Pipeline Layout"),
                    bind_group_layouts: &[&texture_bind_group_layout],
                    push_constant_ranges: &[],
                });

        let render_pipeline =
            screen
                .device
                .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("Present Pipeline"),
                    layout: Some(&render_pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &shader,
                        entry_point: "vs_main",
                        buffers: &[Vertex::layout()],
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &shader,
                        entry_point: "fs_main",
                        targets: &[Some(wgpu::ColorTargetState {
                            format: screen.config.format,
                            blend: Some(wgpu::BlendState::REPLACE),
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        strip_index_format: None,
                        front_face: wgpu::FrontFace::Ccw,
                        cull_mode: Some(wgpu::Face::Back),
                        polygon_mode: wgpu::PolygonMode::Fill,
                        unclipped_depth: false,
                        conservative: false,
                    },
                    depth_stencil: None,
                    multisample: wgpu::MultisampleState {
                        count: 1,
                        mask: !0,
                        alpha_to_coverage_enabled: false,
                    },
                    multiview: None,
                });

        Self {
            render_pipeline,
            vertex_buffer,
            index_buffer,
            texture_bind_group_layout,
            texture,
            frame_bind_group,
        }
    }

    /// Copies `frame` to the GPU, recreating the texture when its size changed.
    pub fn upload(&mut self, screen: &Screen, frame: &Frame) {
        if frame.width() == 0 || frame.height() == 0 {
            return;
        }
        if frame.width() != self.texture.width() || frame.height() != self.texture.height() {
            tracing::debug!(width = frame.width(), height = frame.height(), "resizing frame texture");
            self.texture = Texture::new(
                &screen.device,
                frame.width(),
                frame.height(),
                self.texture.format(),
                Some("Frame Texture"),
            );
            self.frame_bind_group = create_frame_bind_group(
                &screen.device,
                &self.texture_bind_group_layout,
                &self.texture,
            );
        }
        self.texture.update_data(&screen.queue, &frame.to_rgba_image());
    }

    pub fn draw(&self, screen: &Screen) -> Result<(), wgpu::SurfaceError> {
        let output = screen.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = screen
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Present Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Present Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.buffer().slice(..));
            render_pass.set_index_buffer(
                self.index_buffer.buffer().slice(..),
                self.index_buffer.format(),
            );
            render_pass.draw_indexed(0..self.index_buffer.count(), 0, 0..1);
        }

        screen.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_frame_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
        label: Some("frame_bind_group"),
    })
}
