use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use winit::{
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{ElementState, Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowBuilder},
};

use crate::{
    canvas::EguiCanvas,
    context::GfxContext,
    input::{self, MouseButton, MouseEvent},
    Flow, Visualiser,
};

struct Host {
    gfx: GfxContext,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    frame_tex: Option<egui::TextureHandle>,
    cursor: PhysicalPosition<f64>,
    menu_at: Option<egui::Pos2>,
    fullscreen: bool,
}

impl Host {
    async fn new(window: Arc<Window>) -> Result<Self> {
        let gfx = GfxContext::new(window.clone()).await?;
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &*window,
            Some(window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&gfx.device, gfx.config.format, None, 1);
        Ok(Self {
            gfx,
            egui_ctx,
            egui_state,
            egui_renderer,
            frame_tex: None,
            cursor: PhysicalPosition::new(0.0, 0.0),
            menu_at: None,
            fullscreen: false,
        })
    }

    /// Window size in egui points.
    fn points(&self, window: &Window) -> (f32, f32) {
        let scale = window.scale_factor() as f32;
        (
            self.gfx.size.width as f32 / scale,
            self.gfx.size.height as f32 / scale,
        )
    }

    /// Cursor in canvas coordinates, origin bottom-left.
    fn cursor_canvas(&self, window: &Window) -> (f32, f32) {
        let scale = window.scale_factor();
        let (_, h) = self.points(window);
        let x = (self.cursor.x / scale) as f32;
        let y = (self.cursor.y / scale) as f32;
        (x, h - y)
    }

    fn cursor_points(&self, window: &Window) -> egui::Pos2 {
        let scale = window.scale_factor();
        egui::pos2((self.cursor.x / scale) as f32, (self.cursor.y / scale) as f32)
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.gfx.resize(size);
    }

    fn sync_fullscreen(&mut self, window: &Window, wanted: bool) {
        if wanted != self.fullscreen {
            self.fullscreen = wanted;
            window.set_fullscreen(wanted.then_some(Fullscreen::Borderless(None)));
        }
    }

    /// Draws one frame. Returns the menu entry picked this frame, if any.
    fn render<V: Visualiser>(
        &mut self,
        window: &Window,
        vis: &mut V,
        dt: Duration,
    ) -> Result<Option<usize>, wgpu::SurfaceError> {
        let frame = self.gfx.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let input = self.egui_state.take_egui_input(window);
        self.egui_ctx.begin_frame(input);

        let painter = self.egui_ctx.layer_painter(egui::LayerId::background());
        vis.render(&mut EguiCanvas::new(painter, &mut self.frame_tex), dt);

        let mut picked = None;
        if let Some(pos) = self.menu_at {
            let entries = vis.menu();
            let area = egui::Area::new(egui::Id::new("context-menu"))
                .order(egui::Order::Foreground)
                .fixed_pos(pos)
                .show(&self.egui_ctx, |ui| {
                    egui::Frame::menu(ui.style()).show(ui, |ui| {
                        for entry in &entries {
                            if ui.button(entry.label.as_str()).clicked() {
                                picked = Some(entry.id);
                            }
                        }
                    });
                });
            if picked.is_some() || area.response.clicked_elsewhere() {
                self.menu_at = None;
            }
        }

        let output = self.egui_ctx.end_frame();
        self.egui_state
            .handle_platform_output(window, output.platform_output);
        let shapes = self
            .egui_ctx
            .tessellate(output.shapes, self.egui_ctx.pixels_per_point());
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gfx.config.width, self.gfx.config.height],
            pixels_per_point: self.egui_ctx.pixels_per_point(),
        };

        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });
        for (id, delta) in &output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.gfx.device, &self.gfx.queue, *id, delta);
        }
        self.egui_renderer.update_buffers(
            &self.gfx.device,
            &self.gfx.queue,
            &mut encoder,
            &shapes,
            &screen,
        );
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("canvas pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui_renderer.render(&mut pass, &shapes, &screen);
        }
        for id in &output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(picked)
    }
}

/// Opens the window and runs `vis` until it asks to exit or the window closes.
pub fn run<V: Visualiser + 'static>(mut vis: V) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let (w, h) = vis.initial_size();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(vis.title())
            .with_inner_size(LogicalSize::new(w, h))
            .build(&event_loop)?,
    );

    let mut host = pollster::block_on(Host::new(window.clone()))?;
    let (pw, ph) = host.points(&window);
    vis.reshape(pw, ph);

    let frame_time = Duration::from_secs_f64(1.0 / vis.frame_rate().max(1.0));
    let mut next_frame = Instant::now();
    let mut last_frame = Instant::now();
    let mut exiting = false;

    event_loop.run(move |event, elwt| {
        let mut flow = Flow::Continue;
        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                if let WindowEvent::CursorMoved { position, .. } = &event {
                    host.cursor = *position;
                }
                if host.egui_state.on_window_event(&window, &event).consumed {
                    return;
                }
                match event {
                    WindowEvent::CloseRequested => flow = Flow::Exit,
                    WindowEvent::Resized(size) => {
                        host.resize(size);
                        let (pw, ph) = host.points(&window);
                        vis.reshape(pw, ph);
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        if let Some((key, state)) = input::translate_key(&event) {
                            flow = vis.on_key(key, state);
                        }
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        let Some(button) = input::from_button(button) else {
                            return;
                        };
                        let (x, y) = host.cursor_canvas(&window);
                        let pressed = state == ElementState::Pressed;
                        if pressed && button == MouseButton::Right && !vis.menu().is_empty() {
                            host.menu_at = Some(host.cursor_points(&window));
                        } else if host.menu_at.is_none() {
                            flow = vis.on_mouse(if pressed {
                                MouseEvent::Press { button, x, y }
                            } else {
                                MouseEvent::Release { button, x, y }
                            });
                        }
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        let (x, y) = host.cursor_canvas(&window);
                        let delta = input::scroll_lines(&delta);
                        flow = vis.on_mouse(MouseEvent::Scroll { delta, x, y });
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        let dt = now - last_frame;
                        last_frame = now;
                        match host.render(&window, &mut vis, dt) {
                            Ok(Some(id)) => flow = vis.on_menu(id),
                            Ok(None) => {}
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                host.gfx.reconfigure();
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                tracing::error!("GPU out of memory, exiting");
                                flow = Flow::Exit;
                            }
                            Err(e) => tracing::warn!(error = ?e, "frame dropped"),
                        }
                        host.sync_fullscreen(&window, vis.fullscreen());
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                let now = Instant::now();
                if now >= next_frame {
                    window.request_redraw();
                    next_frame = now + frame_time;
                }
                elwt.set_control_flow(ControlFlow::WaitUntil(next_frame));
            }
            _ => {}
        }

        if flow == Flow::Exit && !exiting {
            exiting = true;
            vis.on_exit();
            elwt.exit();
        }
    })?;

    Ok(())
}
