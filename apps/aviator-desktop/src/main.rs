use anyhow::{Context, Result};
use aviator_common::SceneConfig;
use aviator_input::PointerPosition;
use aviator_render_wgpu::WgpuRenderer;
use aviator_runtime::{AppState, FrameLoop};
use aviator_tools::SceneInspector;
use clap::Parser;
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "aviator-desktop", about = "Fly a low-poly airplane over the sea")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene configuration file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the layout seed
    #[arg(long)]
    seed: Option<u64>,
}

/// Window, surface and device, created once the event loop resumes.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Aviator")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("find adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("aviator_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface has no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    /// Paint the overlay on top of the frame already in `view`.
    fn draw_egui(&mut self, egui_ctx: &EguiContext, view: &wgpu::TextureView, output: egui::FullOutput) {
        self.egui_winit
            .handle_platform_output(&self.window, output.platform_output);

        let paint_jobs = egui_ctx.tessellate(output.shapes, output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: output.pixels_per_point,
        };

        for (id, image_delta) in &output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

struct GpuApp {
    app: AppState,
    frame_loop: FrameLoop,
    show_inspector: bool,
    egui_ctx: EguiContext,
    gpu: Option<Gpu>,
}

impl GpuApp {
    fn new(app: AppState) -> Self {
        Self {
            app,
            frame_loop: FrameLoop::new(),
            show_inspector: true,
            egui_ctx: EguiContext::default(),
            gpu: None,
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut frame = gpu.renderer.frame(&gpu.device, &gpu.queue, &view);
        if let Err(e) = self.frame_loop.step(&mut self.app, &mut frame) {
            tracing::error!("stopping: {e}");
            event_loop.exit();
            return;
        }

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let app = &self.app;
        let frame_loop = &self.frame_loop;
        let show = self.show_inspector;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if show {
                draw_overlay(ctx, app, frame_loop);
            }
        });
        gpu.draw_egui(&self.egui_ctx, &view, full_output);

        output.present();
        gpu.window.request_redraw();
    }
}

fn draw_overlay(ctx: &EguiContext, app: &AppState, frame_loop: &FrameLoop) {
    let summary = SceneInspector::summary(app);
    let timer = frame_loop.timer();
    let [x, y, _] = summary.airplane_position;

    egui::Window::new("Aviator")
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.label(format!("Frame: {}  Seed: {}", summary.frame, summary.seed));
            ui.label(format!(
                "Frame time: {:.2} ms avg ({:.0} fps), {:.2} max",
                timer.average().as_secs_f64() * 1000.0,
                timer.fps(),
                timer.max().as_secs_f64() * 1000.0
            ));
            ui.separator();
            ui.label(format!(
                "Nodes: {}  Renderables: {}",
                summary.node_count, summary.renderable_count
            ));
            ui.label(format!(
                "Meshes: {}  Vertices: {}  Sea: {}",
                summary.mesh_count, summary.vertex_count, summary.sea_vertices
            ));
            ui.separator();
            ui.label(format!("Airplane: ({x:.1}, {y:.1})"));
            ui.label(format!(
                "Sea: {:.3} rad  Sky: {:.3} rad",
                summary.sea_rotation, summary.sky_rotation
            ));
            ui.label(format!("Hair phase: {:.3}", summary.hair_phase));
            ui.label(format!("Hash: {:016x}", summary.state_hash));
            ui.separator();
            ui.small("F1: Toggle overlay | Esc: Quit | Move the pointer to fly");
        });
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx) {
            Ok(gpu) => {
                self.app
                    .view_mut()
                    .set_viewport(gpu.config.width, gpu.config.height);
                gpu.window.request_redraw();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to initialize GPU: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
                self.app
                    .view_mut()
                    .set_viewport(new_size.width, new_size.height);
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(gpu) = &self.gpu {
                    self.app.set_pointer(PointerPosition::from_viewport(
                        position.x,
                        position.y,
                        gpu.config.width,
                        gpu.config.height,
                    ));
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match key {
                KeyCode::F1 => self.show_inspector = !self.show_inspector,
                KeyCode::Escape => event_loop.exit(),
                _ => {}
            },
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn load_config(path: Option<PathBuf>, seed: Option<u64>) -> Result<SceneConfig> {
    let mut config = match path {
        Some(path) => SceneConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("aviator-desktop starting");

    let config = load_config(cli.config, cli.seed)?;
    let app = AppState::new(config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut gpu_app = GpuApp::new(app);
    event_loop.run_app(&mut gpu_app)?;

    tracing::info!(frames = gpu_app.app.frame(), "aviator-desktop exiting");
    Ok(())
}
