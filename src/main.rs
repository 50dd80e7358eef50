use std::path::PathBuf;

use canvas_raytracer_lib::{
    application::{AppState, Application, Layer, Screen, WindowConfig},
    config::RenderConfig,
    render::Frame,
    renderer::{IndexBuffer, Vertex, VertexBuffer, QUAD_INDICES, QUAD_VERTICES},
    texture::{check_texture_size, Texture},
};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wgpu::{
    include_wgsl, CommandEncoderDescriptor, PipelineLayoutDescriptor, RenderPassColorAttachment,
    RenderPassDescriptor, RenderPipelineDescriptor, TextureViewDescriptor,
};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent},
};

const WINDOW_TITLE: &str = "Canvas Raytracer";

/// Flat-color sphere ray tracer.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML scene and view configuration; the built-in scene is used when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the rendered canvas to this PNG file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Render without opening a window
    #[arg(long)]
    headless: bool,

    /// Override the canvas width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Override the canvas height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Trace pixels on a single thread
    #[arg(long)]
    sequential: bool,
}

struct CanvasPresenter {
    frame: Frame,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: VertexBuffer,
    index_buffer: IndexBuffer,
    texture: Texture,
    canvas_bind_group: wgpu::BindGroup,
}

impl Layer for CanvasPresenter {
    type Config = Frame;
    type LayerErr = ();

    fn check_config(frame: &Frame, screen: &Screen) -> canvas_raytracer_lib::Result<()> {
        check_texture_size(
            frame.canvas.width(),
            frame.canvas.height(),
            &screen.device.limits(),
        )
    }

    fn start(frame: Frame, screen: &mut Screen, _app: &AppState) -> Self {
        let shader = screen
            .device
            .create_shader_module(include_wgsl!("asset/shader/present.wgsl"));

        let vertex_buffer = VertexBuffer::init_immediate(
            &screen.device,
            bytemuck::cast_slice(QUAD_VERTICES),
            Some("Vertex Buffer"),
        );
        let index_buffer =
            IndexBuffer::init_immediate_u16(&screen.device, QUAD_INDICES, Some("Index Buffer"));

        let texture = Texture::from_image(
            &screen.device,
            &screen.queue,
            frame.canvas.image(),
            Some("Canvas texture"),
        );

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
                    label: Some("texture_bind_group_layout"),
                });

        let canvas_bind_group = screen.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &texture_bind_group_layout,
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
            label: Some("canvas_bind_group"),
        });

        let render_pipeline_layout =
            screen
                .device
                .create_pipeline_layout(&PipelineLayoutDescriptor {
                    label: Some("Render Pipeline Layout"),
                    bind_group_layouts: &[&texture_bind_group_layout],
                    push_constant_ranges: &[],
                });

        let render_pipeline = screen
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some("Render Pipeline"),
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
            frame,
            render_pipeline,
            vertex_buffer,
            index_buffer,
            texture,
            canvas_bind_group,
        }
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>, _state: &AppState, _screen: &mut Screen) {
        tracing::debug!(
            width = new_size.width,
            height = new_size.height,
            "window resized, canvas is stretched"
        );
    }

    fn process_event(&mut self, event: &Event<()>, screen: &mut Screen) {
        if let Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(VirtualKeyCode::F5),
                            ..
                        },
                    ..
                },
            ..
        } = event
        {
            self.frame.render();
            self.texture.update_data(&screen.queue, self.frame.canvas.image());
        }
    }

    fn update(&mut self, _app: &AppState, _screen: &mut Screen) {}

    fn render(&mut self, _app: &AppState, screen: &mut Screen) -> Result<(), wgpu::SurfaceError> {
        let output = screen.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&TextureViewDescriptor::default());
        let mut encoder = screen
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.canvas_bind_group, &[]);
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

    fn fps_updated(&mut self, fps: f32, screen: &mut Screen) {
        tracing::debug!(fps, "frame rate");
        screen
            .window()
            .set_title(&format!("{WINDOW_TITLE} - {fps:.0} FPS"));
    }

    fn shutdown(&mut self, _app: &AppState, _screen: &mut Screen) -> Result<(), Self::LayerErr> {
        tracing::info!("exiting");
        Ok(())
    }
}

fn run(args: Args) -> canvas_raytracer_lib::Result<()> {
    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    if let Some(width) = args.width {
        config.canvas.width = width;
    }
    if let Some(height) = args.height {
        config.canvas.height = height;
    }
    config.validate()?;
    if !args.headless {
        check_texture_size(
            config.canvas.width,
            config.canvas.height,
            &wgpu::Limits::default(),
        )?;
    }

    let mut frame = Frame::from_config(&config);
    frame.sequential = args.sequential;
    frame.render();

    if let Some(path) = &args.output {
        frame.canvas.save(path)?;
    }
    if args.headless {
        return Ok(());
    }

    let window = WindowConfig {
        title: WINDOW_TITLE.to_owned(),
        size: PhysicalSize::new(config.canvas.width, config.canvas.height),
    };
    pollster::block_on(Application::<CanvasPresenter>::init(window, frame))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Args::parse()) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
