use anyhow::{Context as _, Result};
use beachfire_assets::{SandParams, TextureId, TextureStore, generate_sand, load_or_placeholder};
use beachfire_input::Action;
use beachfire_record::{DirectorySink, FfmpegCapture, RecordingController};
use beachfire_render::{DrawList, RenderView, TextureKey};
use beachfire_render_wgpu::{WgpuRenderer, read_rgba};
use beachfire_scene::characters::{SHEET_COLUMNS, SHEET_ROWS};
use beachfire_scene::{
    CharacterPreset, FrameLoop, Preferences, PreferencesStore, SceneRoot, SceneSummary,
    resolve_config,
};
use clap::Parser;
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "beachfire-desktop", about = "Night-time beach campfire vignette")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Query string overriding the sprite count, e.g. "sprites=3"
    #[arg(long)]
    query: Option<String>,

    /// Preferences file
    #[arg(long, default_value = "beachfire-prefs.json")]
    prefs: PathBuf,

    /// Seed for every random choice in the scene
    #[arg(long)]
    seed: Option<u64>,

    /// Directory holding images/PeteSprite.png and images/AndySprite.png
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Directory finished recordings are written to
    #[arg(long, default_value = "recordings")]
    recordings: PathBuf,
}

/// Application state.
struct AppState {
    scene: SceneRoot,
    frame_loop: FrameLoop,
    prefs: PreferencesStore,
    textures: TextureStore,
    texture_keys: Vec<(TextureKey, TextureId)>,
    recorder: RecordingController<FfmpegCapture, DirectorySink>,
    alerts: Vec<String>,
    show_overlay: bool,
    last_frame: Instant,
}

impl AppState {
    fn new(cli: &Cli) -> Result<Self> {
        let prefs = PreferencesStore::new(&cli.prefs);
        let persisted = prefs.load();
        let mut config = resolve_config(cli.query.as_deref(), Some(&persisted));
        if let Some(seed) = cli.seed {
            config = config.with_seed(seed);
        }
        tracing::info!(?config, "configuration resolved");

        let mut textures = TextureStore::new();
        let mut texture_keys = Vec::new();
        let sand = generate_sand(&SandParams::default(), config.seed);
        texture_keys.push((TextureKey::Sand, textures.register(sand)?));
        for preset in CharacterPreset::ALL {
            let sheet = load_or_placeholder(
                cli.assets.join(preset.sheet),
                SHEET_COLUMNS,
                SHEET_ROWS,
                preset.tint,
            );
            let id = textures
                .register(sheet)
                .with_context(|| format!("registering sheet for {}", preset.name))?;
            texture_keys.push((TextureKey::Character(preset.name), id));
        }

        let recorder = RecordingController::new(
            FfmpegCapture::detect("ffmpeg"),
            DirectorySink::new(&cli.recordings),
        );

        Ok(Self {
            scene: SceneRoot::start(config),
            frame_loop: FrameLoop::new(),
            prefs,
            textures,
            texture_keys,
            recorder,
            alerts: Vec::new(),
            show_overlay: false,
            last_frame: Instant::now(),
        })
    }

    fn handle_action(&mut self, action: Action, frame_size: (u32, u32)) {
        match action {
            Action::StartRecording => {
                if let Err(e) = self.recorder.start(frame_size.0, frame_size.1) {
                    tracing::error!("recording not started: {e}");
                }
            }
            Action::StopRecording => self.stop_recording(),
            Action::ToggleOverlay => self.show_overlay = !self.show_overlay,
            Action::SelectSpriteCount(_) => match self.scene.apply(&action) {
                Ok(_) => {
                    let prefs = Preferences {
                        sprite_count: Some(self.scene.config().sprite_count),
                    };
                    if let Err(e) = self.prefs.save(&prefs) {
                        tracing::warn!("failed to save preferences: {e}");
                    }
                }
                Err(e) => tracing::error!("failed to change sprite count: {e}"),
            },
            Action::Resize { .. } => {
                if self.recorder.is_recording() {
                    tracing::info!("window resized, finishing recording");
                    self.stop_recording();
                }
                if let Err(e) = self.scene.apply(&action) {
                    tracing::error!("resize failed: {e}");
                }
            }
            Action::Zoom(_) | Action::Noop => {
                if let Err(e) = self.scene.apply(&action) {
                    tracing::error!("action failed: {e}");
                }
            }
        }
        self.alerts.extend(self.recorder.take_alerts());
    }

    fn stop_recording(&mut self) {
        match self.recorder.stop() {
            Ok(Some(name)) => tracing::info!("saved {name}"),
            Ok(None) => {}
            Err(e) => tracing::error!("recording failed: {e}"),
        }
    }

    /// Draw the recording buttons, the overlay and pending alerts. Returns
    /// the actions chosen through the UI.
    fn draw_ui(&mut self, ctx: &EguiContext) -> Vec<Action> {
        let mut actions = Vec::new();
        let buttons = self.recorder.buttons();

        egui::Window::new("Recording")
            .title_bar(false)
            .resizable(false)
            .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let start = egui::Button::new("Start Recording");
                    if ui.add_enabled(buttons.start_enabled, start).clicked() {
                        actions.push(Action::StartRecording);
                    }
                    let stop = egui::Button::new("Stop Recording");
                    if ui.add_enabled(buttons.stop_enabled, stop).clicked() {
                        actions.push(Action::StopRecording);
                    }
                });
                if let Some(mime) = self.recorder.mime() {
                    ui.small(format!("recording {mime}"));
                }
            });

        if self.show_overlay {
            let summary = SceneSummary::of(&self.scene);
            egui::SidePanel::right("overlay")
                .default_width(260.0)
                .show(ctx, |ui| {
                    ui.heading("Beachfire");
                    ui.separator();
                    ui.label(format!("Time: {:.1}s  Seed: {}", summary.elapsed, summary.seed));
                    ui.label(format!("Source: {:?}", self.scene.config().source));
                    ui.label(format!("Camera distance: {:.2}", summary.camera_distance));
                    ui.label(format!("Particles: {}", summary.particles));
                    if let Some(intensity) = summary.light_intensity {
                        ui.label(format!("Fire light: {intensity:.2}"));
                    }
                    ui.label(format!(
                        "Characters: {}  frames {:?}",
                        summary.characters, summary.character_frames
                    ));
                    ui.label(format!("Props: {}", summary.props));
                    ui.label(format!(
                        "Frames: {} ({} failed)",
                        self.frame_loop.frame_count(),
                        self.frame_loop.failed_frames()
                    ));
                    if let Some(e) = self.scene.startup_error() {
                        ui.colored_label(egui::Color32::LIGHT_RED, format!("Startup: {e}"));
                    }
                    ui.separator();
                    ui.small("F1: Overlay | Wheel: Zoom | 0-8: Characters");
                });
        }

        if let Some(message) = self.alerts.first().cloned() {
            let mut dismissed = false;
            egui::Window::new("Alert")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(message);
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            if dismissed {
                self.alerts.remove(0);
            }
        }

        actions
    }
}

/// Everything that exists only once a window is up.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    /// Surface textures can be copied out for recording.
    can_capture: bool,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext, state: &AppState) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Beachfire")
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
                label: Some("beachfire_device"),
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
            .or(surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let can_capture = surface_caps.usages.contains(wgpu::TextureUsages::COPY_SRC);
        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;
        if can_capture {
            usage |= wgpu::TextureUsages::COPY_SRC;
        } else {
            tracing::warn!("surface cannot be copied, recording disabled");
        }

        let config = wgpu::SurfaceConfiguration {
            usage,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let mut renderer =
            WgpuRenderer::new(&device, &queue, surface_format, config.width, config.height);
        for (key, id) in &state.texture_keys {
            let texture = state.textures.get(*id)?;
            renderer.upload_texture(&device, &queue, *key, texture);
        }

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
            can_capture,
        })
    }

    fn frame_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn action(&mut self, action: Action) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        if action == Action::StartRecording && !gpu.can_capture {
            self.state
                .alerts
                .push("This display surface does not support capture.".into());
            return;
        }
        let size = gpu.frame_size();
        self.state.handle_action(action, size);
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let wall = (now - self.state.last_frame).as_secs_f32();
        let dt = wall.min(0.1);
        self.state.last_frame = now;
        self.state.frame_loop.tick(&mut self.state.scene, dt);

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

        let scene = &self.state.scene;
        let list = DrawList::build(scene, &RenderView::from_camera(&scene.camera));
        gpu.renderer.render(&gpu.device, &gpu.queue, &view, &list);

        // Captured before the UI pass so the buttons stay out of the video.
        // Paced on wall time so slow frames are repeated, not shortened.
        let copies = self.state.recorder.frame_due(wall);
        if gpu.can_capture && copies > 0 {
            match read_rgba(&gpu.device, &gpu.queue, &output.texture) {
                Ok(pixels) => {
                    if let Err(e) = self.state.recorder.capture_frame(&pixels, copies) {
                        tracing::error!("recording stopped: {e}");
                    }
                }
                Err(e) => tracing::error!("frame readback failed: {e}"),
            }
            self.state.alerts.extend(self.state.recorder.take_alerts());
        }

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let mut ui_actions = Vec::new();
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            ui_actions = self.state.draw_ui(ctx);
        });

        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        {
            let egui_renderer = &mut gpu.egui_renderer;
            for (id, image_delta) in &full_output.textures_delta.set {
                egui_renderer.update_texture(&gpu.device, &gpu.queue, *id, image_delta);
            }
            let mut encoder = gpu
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("egui_encoder"),
                });
            egui_renderer.update_buffers(
                &gpu.device,
                &gpu.queue,
                &mut encoder,
                &paint_jobs,
                &screen_descriptor,
            );
            {
                let mut pass = encoder
                    .begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("egui_pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
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
                egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
            }
            gpu.queue.submit(std::iter::once(encoder.finish()));
            for id in &full_output.textures_delta.free {
                egui_renderer.free_texture(id);
            }
        }

        output.present();
        gpu.window.request_redraw();

        for action in ui_actions {
            self.action(action);
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx, &self.state) {
            Ok(gpu) => {
                let (width, height) = gpu.frame_size();
                self.gpu = Some(gpu);
                self.action(Action::from_resize(width, height));
            }
            Err(e) => {
                tracing::error!("failed to initialise graphics: {e:#}");
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
                if self.state.recorder.is_recording() {
                    self.state.stop_recording();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
                self.action(Action::from_resize(new_size.width, new_size.height));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports scrolling up as positive; `from_wheel` takes
                // DOM-style deltas where scrolling down is positive.
                let y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32,
                };
                self.action(Action::from_wheel(-y));
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                let action = match logical_key {
                    Key::Named(NamedKey::F1) => Action::ToggleOverlay,
                    Key::Character(text) => text
                        .chars()
                        .next()
                        .map(Action::from_char)
                        .unwrap_or(Action::Noop),
                    _ => Action::Noop,
                };
                self.action(action);
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("beachfire-desktop starting");

    let state = AppState::new(&cli)?;
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state);
    event_loop.run_app(&mut app)?;

    Ok(())
}
