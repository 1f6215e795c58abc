// SPDX-License-Identifier: MIT OR Apache-2.0
//! Demo application setup and event loop.

use egui_wgpu::wgpu;
use limelight_overlay::{to_color32, HighlightRect, OverlayStyle};
use limelight_sequencer::{Offsets, RegionScript, SequencerState};
use std::sync::Arc;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Demo application errors
#[derive(Debug, Error)]
#[allow(dead_code)] // Error variants defined for future use
pub enum DemoError {
    /// Window creation failed
    #[error("Failed to create window: {0}")]
    WindowCreation(String),

    /// Event loop error
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Result type for demo operations
pub type Result<T> = std::result::Result<T, DemoError>;

/// The script played when the demo starts, hand-written RON; region ids
/// are generated on load.
const DEFAULT_SCRIPT: &str = r#"(
    name: "feature tour",
    regions: [
        (offsets: (top: 12.0, right: 58.0, bottom: 68.0, left: 6.0), duration_ms: 1500),
        (offsets: (top: 12.0, right: 6.0, bottom: 68.0, left: 46.0), duration_ms: 1500),
        (offsets: (top: 44.0, right: 6.0, bottom: 8.0, left: 6.0), duration_ms: 2000),
    ],
)"#;

/// Demo UI state: the overlay widget plus its control panel
struct DemoInner {
    highlight: HighlightRect,
    script_name: String,
    finish_count: u32,
    color_input: String,
    color_error: Option<String>,
}

impl DemoInner {
    fn new() -> Self {
        let script = RegionScript::from_ron(DEFAULT_SCRIPT).unwrap_or_else(|e| {
            tracing::warn!("default script failed to parse: {e}");
            RegionScript::new("empty")
        });
        tracing::info!(
            script = %script.name,
            regions = script.len(),
            total_ms = script.total_duration_ms(),
            "loaded demo script"
        );

        let highlight = HighlightRect::new()
            .with_offsets(Offsets::new(12.0, 58.0, 68.0, 6.0))
            .with_regions(script.regions.clone());

        Self {
            highlight,
            script_name: script.name,
            finish_count: 0,
            color_input: OverlayStyle::default().color,
            color_error: None,
        }
    }

    fn update(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("controls")
            .default_width(260.0)
            .show(ctx, |ui| self.controls_ui(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            let content_rect = ui.max_rect();
            Self::page_ui(ui);
            self.highlight.show(ui, content_rect);
        });

        if self.highlight.take_finished() {
            self.finish_count += 1;
            tracing::info!(script = %self.script_name, "highlight script finished");
        }
    }

    fn controls_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Highlight");
        ui.separator();

        ui.label("Static offsets (percent)");
        let offsets = self.highlight.offsets_mut();
        ui.add(egui::Slider::new(&mut offsets.top, 0.0..=100.0).text("top"));
        ui.add(egui::Slider::new(&mut offsets.right, 0.0..=100.0).text("right"));
        ui.add(egui::Slider::new(&mut offsets.bottom, 0.0..=100.0).text("bottom"));
        ui.add(egui::Slider::new(&mut offsets.left, 0.0..=100.0).text("left"));

        ui.separator();
        ui.label("Style");
        let style = self.highlight.style_mut();
        ui.add(egui::Slider::new(&mut style.opacity, 0.0..=1.0).text("opacity"));
        ui.add(egui::Slider::new(&mut style.border_width, 0.5..=8.0).text("border"));
        ui.add(egui::Slider::new(&mut style.corner_size, 2.0..=40.0).text("corners"));

        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.color_input);
            if ui.button("Apply color").clicked() {
                self.apply_color();
            }
        });
        if let Some(error) = &self.color_error {
            ui.colored_label(egui::Color32::LIGHT_RED, error);
        }

        ui.separator();
        ui.label(format!("Script: {}", self.script_name));
        ui.horizontal(|ui| {
            if ui.button("Start").clicked() {
                self.highlight.start();
            }
            if ui.button("Stop").clicked() {
                self.highlight.stop();
            }
        });
        ui.label(format!(
            "State: {}",
            playback_label(self.highlight.playback_state())
        ));
        ui.label(format!("Finished runs: {}", self.finish_count));
    }

    fn apply_color(&mut self) {
        let opacity = self.highlight.style().opacity;
        match to_color32(&self.color_input, opacity) {
            Ok(_) => {
                self.highlight.style_mut().color = self.color_input.clone();
                self.color_error = None;
            }
            Err(e) => {
                tracing::warn!("color input rejected: {e}");
                self.color_error = Some(e.to_string());
            }
        }
    }

    /// Sample page content for the overlay to highlight
    fn page_ui(ui: &mut egui::Ui) {
        ui.add_space(16.0);
        ui.heading("Release notes");
        ui.add_space(8.0);
        ui.label("Everything on this page is plain content; the highlight is painted over it.");
        ui.add_space(16.0);

        ui.columns(2, |columns| {
            columns[0].group(|ui| {
                ui.heading("Navigation");
                ui.label("Switch between projects from the sidebar.");
                ui.label("Recent files appear at the top.");
            });
            columns[1].group(|ui| {
                ui.heading("Search");
                ui.label("Press Ctrl+K to search across the workspace.");
                ui.label("Filters narrow results by file type.");
            });
        });

        ui.add_space(16.0);
        ui.group(|ui| {
            ui.heading("Shortcuts");
            ui.label("The usual suspects: Ctrl+S saves, Ctrl+Z undoes, Ctrl+Shift+P opens the palette.");
        });
    }
}

fn playback_label(state: SequencerState) -> String {
    match state {
        SequencerState::Idle => "idle".to_string(),
        SequencerState::Playing { index } => format!("playing region {index}"),
        SequencerState::Finished => "finished".to_string(),
    }
}

/// Graphics state for wgpu rendering
struct GraphicsState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    egui_renderer: egui_wgpu::Renderer,
}

impl GraphicsState {
    fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone()).expect("Failed to create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("Failed to find suitable GPU adapter");

        tracing::info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Limelight Demo Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
            None,
        ))
        .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        Self {
            surface,
            device,
            queue,
            config,
            egui_renderer,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    #[allow(unsafe_code)] // Workaround for wgpu 23 lifetime issue with RenderPass
    fn render(
        &mut self,
        egui_ctx: &egui::Context,
        full_output: egui::FullOutput,
        window: &Window,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Demo Encoder"),
        });

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        // wgpu 23 has a 'static lifetime bound issue with RenderPass
        // We work around this using raw pointers
        let encoder_ptr = Box::into_raw(Box::new(encoder));

        {
            // SAFETY: encoder_ptr is valid and we'll properly reclaim it after the render_pass is dropped
            let encoder_ref: &'static mut wgpu::CommandEncoder = unsafe { &mut *encoder_ptr };

            let mut render_pass = encoder_ref.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Demo Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.1,
                            b: 0.1,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
            // render_pass is dropped here
        }

        // SAFETY: We're reclaiming the Box after render_pass is dropped
        let encoder = unsafe { Box::from_raw(encoder_ptr) };

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        Ok(())
    }
}

/// Running state of the demo
struct DemoRunning {
    window: Arc<Window>,
    graphics: GraphicsState,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    demo: DemoInner,
}

/// Main demo application
pub struct DemoApp {
    running: Option<DemoRunning>,
}

impl DemoApp {
    /// Create a new demo application
    pub fn new() -> Self {
        Self { running: None }
    }

    /// Run the demo application
    pub fn run() -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = DemoApp::new();
        event_loop.run_app(&mut app)?;

        Ok(())
    }
}

impl Default for DemoApp {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        tracing::info!("Creating demo window...");

        let window_attrs = Window::default_attributes()
            .with_title("Limelight Demo")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800))
            .with_min_inner_size(winit::dpi::LogicalSize::new(640, 480));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        tracing::info!("Initializing graphics...");

        let graphics = GraphicsState::new(window.clone());
        let egui_ctx = egui::Context::default();

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2 * 1024), // max texture side
        );

        tracing::info!("Demo initialized");

        self.running = Some(DemoRunning {
            window,
            graphics,
            egui_ctx,
            egui_state,
            demo: DemoInner::new(),
        });
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };

        let response = running.egui_state.on_window_event(&running.window, &event);

        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                tracing::debug!("Window resized to {:?}", new_size);
                running.graphics.resize(new_size);
                running.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let raw_input = running.egui_state.take_egui_input(&running.window);
                let full_output = running.egui_ctx.run(raw_input, |ctx| {
                    running.demo.update(ctx);
                });

                running
                    .egui_state
                    .handle_platform_output(&running.window, full_output.platform_output.clone());

                match running.graphics.render(&running.egui_ctx, full_output, &running.window) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = running.window.inner_size();
                        running.graphics.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("Out of GPU memory!");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        tracing::warn!("Surface timeout");
                    }
                }

                running.window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }
}
