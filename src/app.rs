//! Application shell: window, event loop, input routing, frame driving
//!
//! One thread runs everything: winit event dispatch, camera/scene updates,
//! UI building and GPU submission. Each redraw takes a snapshot of the
//! UI-tunable settings, renders the frame from that snapshot, and lets the
//! UI overlay mutate the live settings for the next frame.

use std::{path::Path, sync::Arc, time::Instant};

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowAttributes},
};

use crate::{
    config,
    gfx::{
        rendering::{frame_state::SceneSettings, render_engine::RenderEngine},
        resources::{CubeMapTexture, Texture2D},
        scene::{Model, Scene},
    },
    ui::{controls, UiManager},
};

pub struct BrumeApp {
    event_loop: Option<EventLoop<()>>,
    state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    settings: SceneSettings,
    // Kept alive for the lifetime of the bind groups referencing them.
    diffuse_texture: Option<Texture2D>,
    skybox_texture: Option<CubeMapTexture>,
    last_frame: Option<Instant>,
    startup_error: Option<anyhow::Error>,
}

impl BrumeApp {
    /// Creates the application with the default demo scene settings
    pub fn new() -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;

        Ok(Self {
            event_loop: Some(event_loop),
            state: AppState {
                window: None,
                render_engine: None,
                ui_manager: None,
                scene: Scene::new(),
                settings: SceneSettings::default(),
                diffuse_texture: None,
                skybox_texture: None,
                last_frame: None,
                startup_error: None,
            },
        })
    }

    /// Runs the event loop until shutdown
    ///
    /// Window or GPU creation failure surfaces here as an error, which the
    /// binary turns into a non-zero exit status.
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self.event_loop.take().expect("event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.state)
            .context("event loop terminated abnormally")?;

        if let Some(error) = self.state.startup_error.take() {
            return Err(error);
        }
        Ok(())
    }
}

impl AppState {
    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(config::WINDOW_TITLE)
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        config::WINDOW_WIDTH,
                        config::WINDOW_HEIGHT,
                    )),
            )
            .context("failed to create window")?;

        let window = Arc::new(window);
        let (width, height) = window.inner_size().into();

        let mut engine =
            pollster::block_on(RenderEngine::new(window.clone(), width, height))?;

        // Scene assets. Missing files degrade to blank visuals, never abort.
        let mut diffuse = Texture2D::new(config::DIFFUSE_TEXTURE);
        diffuse.load(engine.device(), engine.queue());

        let mut skybox = CubeMapTexture::new(config::SKYBOX_DIR);
        let faces = skybox.load(engine.device(), engine.queue());
        if faces < 6 {
            log::warn!("skybox loaded {}/6 faces", faces);
        }

        let models_dir = Path::new(config::MODELS_DIR);
        let mut plane = Model::from_obj(models_dir.join("plane.obj"));
        let mut cube = Model::from_obj(models_dir.join("cube.obj"));
        let mut sphere = Model::from_obj(models_dir.join("sphere.obj"));
        plane.init_gpu_resources(engine.device());
        cube.init_gpu_resources(engine.device());
        sphere.init_gpu_resources(engine.device());

        self.scene
            .populate_demo(Arc::new(plane), Arc::new(cube), Arc::new(sphere));
        self.scene
            .init_gpu_resources(engine.device(), engine.object_layout());

        engine.create_scene_bindings(&diffuse, &skybox);

        let ui_manager = UiManager::new(
            engine.device(),
            engine.queue(),
            engine.surface_format(),
            &window,
        );

        grab_cursor(&window, true);

        self.diffuse_texture = Some(diffuse);
        self.skybox_texture = Some(skybox);
        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(engine);
        self.window = Some(window);
        Ok(())
    }

    fn select_phase_by_index(&mut self, index: usize) {
        let Some(engine) = self.render_engine.as_ref() else {
            return;
        };
        match engine.phase_registry().select(index) {
            Ok(phase) => {
                self.settings.phase_function = phase;
                log::info!("current phase function: {}", phase.label());
            }
            Err(err) => {
                // Selection out of range: keep the previous phase function.
                log::debug!("{}", err);
            }
        }
    }

    fn toggle_mouse_capture(&mut self) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let detached = !self.scene.controller.mouse_detached();
        self.scene.controller.set_mouse_detached(detached);
        grab_cursor(window, !detached);
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(error) = self.initialize(event_loop) {
            log::error!("startup failed: {:#}", error);
            self.startup_error = Some(error);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let window = window.clone();

        // The UI gets first refusal on input events.
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(&window, &ui_event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                if key_event.state == ElementState::Pressed && !key_event.repeat {
                    match key_event.physical_key {
                        PhysicalKey::Code(KeyCode::Escape) => {
                            event_loop.exit();
                            return;
                        }
                        PhysicalKey::Code(KeyCode::Space) => self.toggle_mouse_capture(),
                        PhysicalKey::Code(code) => {
                            if let Some(index) = digit_index(code) {
                                self.select_phase_by_index(index);
                            }
                        }
                        _ => {}
                    }
                }
                self.scene.controller.process_keyboard_event(&key_event);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(engine) = self.render_engine.as_mut() {
                    engine.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = self
                    .last_frame
                    .map(|last| (now - last).as_secs_f32())
                    .unwrap_or(0.0);
                self.last_frame = Some(now);

                self.scene.update(dt);

                // Snapshot read once: the whole frame renders from these
                // values while the UI edits the live copy for next frame.
                let snapshot = self.settings;

                let Some(engine) = self.render_engine.as_mut() else {
                    return;
                };
                let scene = &mut self.scene;
                let settings = &mut self.settings;

                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    engine.render_frame(
                        scene,
                        &snapshot,
                        Some(
                            |device: &wgpu::Device,
                             queue: &wgpu::Queue,
                             encoder: &mut wgpu::CommandEncoder,
                             view: &wgpu::TextureView| {
                                ui_manager.draw(device, queue, encoder, &window, view, |ui| {
                                    controls::draw_tools_window(ui, settings);
                                });
                            },
                        ),
                    );
                } else {
                    engine.render_frame(
                        scene,
                        &snapshot,
                        None::<
                            fn(
                                &wgpu::Device,
                                &wgpu::Queue,
                                &mut wgpu::CommandEncoder,
                                &wgpu::TextureView,
                            ),
                        >,
                    );
                }
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        if let Some(ui_manager) = self.ui_manager.as_ref() {
            if ui_manager.wants_input() {
                return;
            }
        }

        self.scene
            .controller
            .process_device_event(&event, &mut self.scene.camera);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

/// Maps the 1..9 number row to phase selection indices 0..8
fn digit_index(code: KeyCode) -> Option<usize> {
    match code {
        KeyCode::Digit1 => Some(0),
        KeyCode::Digit2 => Some(1),
        KeyCode::Digit3 => Some(2),
        KeyCode::Digit4 => Some(3),
        KeyCode::Digit5 => Some(4),
        KeyCode::Digit6 => Some(5),
        KeyCode::Digit7 => Some(6),
        KeyCode::Digit8 => Some(7),
        KeyCode::Digit9 => Some(8),
        _ => None,
    }
}

fn grab_cursor(window: &Window, grab: bool) {
    if grab {
        let result = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        if let Err(err) = result {
            log::warn!("failed to grab cursor: {}", err);
        }
        window.set_cursor_visible(false);
    } else {
        if let Err(err) = window.set_cursor_grab(CursorGrabMode::None) {
            log::warn!("failed to release cursor: {}", err);
        }
        window.set_cursor_visible(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_row_maps_to_zero_based_indices() {
        assert_eq!(digit_index(KeyCode::Digit1), Some(0));
        assert_eq!(digit_index(KeyCode::Digit4), Some(3));
        assert_eq!(digit_index(KeyCode::Digit9), Some(8));
        assert_eq!(digit_index(KeyCode::KeyW), None);
    }
}
