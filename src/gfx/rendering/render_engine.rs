//! WGPU-based render engine: the per-frame pass orchestrator
//!
//! Owns the surface, device, all pass pipelines and the uniform plumbing,
//! and drives the fixed per-frame sequence:
//!
//! shadow (6 cube faces) -> illumination -> skybox (fog or participating
//! media) -> debug axis -> UI overlay -> present.
//!
//! The sequence is unconditional and single-threaded; every pass reads the
//! same frame snapshot of the UI-tunable settings. A missing pipeline or
//! not-yet-uploaded drawable skips its draws and the frame carries on.

use std::sync::Arc;

use anyhow::Context;
use cgmath::Matrix4;
use wgpu::TextureFormat;

use crate::{
    config,
    gfx::{
        resources::{CubeMapTexture, ShadowCubeMap, Texture2D, TextureResource},
        scene::{model::DrawModel, scene::Scene},
    },
    wgpu_utils::{binding_types, UniformBuffer},
};

use super::{
    frame_state::{perspective_projection, GlobalUniforms, SceneSettings, SkyboxTechnique},
    phase::PhaseRegistry,
    pipeline_manager::{PipelineConfig, PipelineManager, VertexLayout},
    shadow::{cube_face_matrices, ShadowFaceUniforms},
};

/// Core rendering engine managing GPU resources and the pass sequence
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    depth_texture: TextureResource,
    pub pipeline_manager: PipelineManager,

    globals: UniformBuffer<GlobalUniforms>,
    globals_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,

    // Shadow mapping resources: one cube depth target shared by the media
    // passes, one small uniform buffer + bind group per face.
    shadow_cube: ShadowCubeMap,
    shadow_face_buffers: Vec<UniformBuffer<ShadowFaceUniforms>>,
    shadow_face_bind_groups: Vec<wgpu::BindGroup>,

    // Texture bind group layouts, kept for `create_scene_bindings`.
    illumination_texture_layout: wgpu::BindGroupLayout,
    skybox_media_texture_layout: wgpu::BindGroupLayout,
    skybox_fog_texture_layout: wgpu::BindGroupLayout,

    // Texture bind groups, created once the scene textures are loaded.
    illumination_textures: Option<wgpu::BindGroup>,
    skybox_fog_textures: Option<wgpu::BindGroup>,
    skybox_media_textures: Option<wgpu::BindGroup>,

    phase_registry: PhaseRegistry,
    projection: Matrix4<f32>,
}

impl RenderEngine {
    /// Creates the engine for a window surface
    ///
    /// Adapter, device or surface failure here is fatal; everything after
    /// startup degrades instead of failing. A phase-function mismatch
    /// between the media shaders is also fatal, since it would silently
    /// shade the sky with a different phase function than the scene.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create rendering surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to request a graphics adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to request a graphics device")?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");
        let shadow_cube = ShadowCubeMap::new(&device, config::SHADOW_MAP_SIZE);

        // Group 0 of every pipeline: the per-frame global uniform block.
        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: binding_types::uniform(),
                count: None,
            }],
        });

        let globals: UniformBuffer<GlobalUniforms> = UniformBuffer::new(&device);
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals.binding_resource(),
            }],
        });

        // Per-object transforms (model + normal matrix).
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: binding_types::uniform(),
                count: None,
            }],
        });

        // Shadow pass: one uniform block per cube face.
        let shadow_face_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Shadow Face Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: binding_types::uniform(),
                    count: None,
                }],
            });

        let mut shadow_face_buffers = Vec::with_capacity(6);
        let mut shadow_face_bind_groups = Vec::with_capacity(6);
        for face in 0..6 {
            let buffer: UniformBuffer<ShadowFaceUniforms> = UniformBuffer::new(&device);
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("Shadow Face {} Bind Group", face)),
                layout: &shadow_face_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.binding_resource(),
                }],
            });
            shadow_face_buffers.push(buffer);
            shadow_face_bind_groups.push(bind_group);
        }

        // Texture layouts of the illumination and skybox passes.
        let illumination_texture_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Illumination Texture Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: binding_types::texture_2d(),
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: binding_types::depth_cube(),
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 3,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: binding_types::sampler(wgpu::SamplerBindingType::NonFiltering),
                        count: None,
                    },
                ],
            });

        let skybox_media_texture_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Skybox Media Texture Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: binding_types::texture_cube(),
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: binding_types::depth_cube(),
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 3,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: binding_types::sampler(wgpu::SamplerBindingType::NonFiltering),
                        count: None,
                    },
                ],
            });

        let skybox_fog_texture_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Skybox Fog Texture Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: binding_types::texture_cube(),
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let device_handle: Arc<wgpu::Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        // Load shaders; a validation failure is logged and its pipelines are
        // skipped at draw time.
        for (name, source) in [
            ("shadow", include_str!("shaders/shadow.wgsl")),
            ("illumination", include_str!("shaders/illumination.wgsl")),
            ("skybox_fog", include_str!("shaders/skybox_fog.wgsl")),
            ("skybox_media", include_str!("shaders/skybox_media.wgsl")),
            ("flat", include_str!("shaders/flat.wgsl")),
        ] {
            if let Err(e) = pipeline_manager.load_shader(name, source) {
                log::error!("{}", e);
            }
        }

        let phase_registry = PhaseRegistry::from_sources([
            (
                "illumination",
                pipeline_manager.shader_source("illumination").unwrap_or(""),
            ),
            (
                "skybox_media",
                pipeline_manager.shader_source("skybox_media").unwrap_or(""),
            ),
        ])
        .context("media shaders disagree on phase function implementations")?;

        log::info!(
            "phase function implementations: {}",
            phase_registry.names().join(", ")
        );

        pipeline_manager.register_pipeline(
            "Shadow",
            PipelineConfig::default()
                .with_label("SHADOW")
                .with_shader("shadow")
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_cull_mode(None) // both faces cast, prevents light leaks
                .with_bind_group_layouts(vec![shadow_face_layout, object_layout.clone()])
                .with_color_targets(vec![]), // depth only
        );

        pipeline_manager.register_pipeline(
            "Illumination",
            PipelineConfig::default()
                .with_label("ILLUMINATION")
                .with_shader("illumination")
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_cull_mode(None) // walls are visible from both sides
                .with_bind_group_layouts(vec![
                    globals_layout.clone(),
                    object_layout.clone(),
                    illumination_texture_layout.clone(),
                ])
                .with_color_targets(vec![Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })]),
        );

        // The skybox cube sits at the far plane; LessEqual keeps it from
        // being discarded against the cleared depth. The relaxation is
        // scoped to these two pipelines, everything else stays Less.
        for (pipeline, shader, layout) in [
            ("SkyboxFog", "skybox_fog", &skybox_fog_texture_layout),
            ("SkyboxMedia", "skybox_media", &skybox_media_texture_layout),
        ] {
            pipeline_manager.register_pipeline(
                pipeline,
                PipelineConfig::default()
                    .with_label(pipeline)
                    .with_shader(shader)
                    .with_depth_format(TextureResource::DEPTH_FORMAT)
                    .with_depth_compare(wgpu::CompareFunction::LessEqual)
                    .with_depth_write(false)
                    .with_cull_mode(None) // the cube is seen from inside
                    .with_bind_group_layouts(vec![globals_layout.clone(), layout.clone()])
                    .with_color_targets(vec![Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })]),
            );
        }

        // Axis arrows: alpha-blended flat shading, one pipeline per
        // topology (the shaft is a line list, the head a triangle list).
        for (pipeline, topology) in [
            ("AxisLines", wgpu::PrimitiveTopology::LineList),
            ("AxisHeads", wgpu::PrimitiveTopology::TriangleList),
        ] {
            pipeline_manager.register_pipeline(
                pipeline,
                PipelineConfig::default()
                    .with_label(pipeline)
                    .with_shader("flat")
                    .with_primitive_topology(topology)
                    .with_vertex_layout(VertexLayout::Line)
                    .with_depth_format(TextureResource::DEPTH_FORMAT)
                    .with_cull_mode(None)
                    .with_bind_group_layouts(vec![globals_layout.clone()])
                    .with_color_targets(vec![Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })]),
            );
        }

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for error in errors {
                log::error!("{}", error);
            }
        }

        let projection = perspective_projection(width as f32 / height as f32);

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            format,
            depth_texture,
            pipeline_manager,
            globals,
            globals_bind_group,
            object_layout,
            shadow_cube,
            shadow_face_buffers,
            shadow_face_bind_groups,
            illumination_texture_layout,
            skybox_media_texture_layout,
            skybox_fog_texture_layout,
            illumination_textures: None,
            skybox_fog_textures: None,
            skybox_media_textures: None,
            phase_registry,
            projection,
        })
    }

    /// Builds the texture bind groups once the scene textures are loaded
    ///
    /// Both textures carry placeholder resources after a failed load, so
    /// this never fails; a blank texture just renders blank.
    pub fn create_scene_bindings(&mut self, diffuse: &Texture2D, skybox: &CubeMapTexture) {
        let (Some(diffuse_view), Some(diffuse_sampler)) = (diffuse.view(), diffuse.sampler())
        else {
            log::warn!("diffuse texture not loaded, illumination pass will be skipped");
            return;
        };
        let (Some(sky_view), Some(sky_sampler)) = (skybox.view(), skybox.sampler()) else {
            log::warn!("skybox cube-map not loaded, skybox pass will be skipped");
            return;
        };

        self.illumination_textures = Some(self.device.create_bind_group(
            &wgpu::BindGroupDescriptor {
                label: Some("Illumination Textures"),
                layout: &self.illumination_texture_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(diffuse_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(diffuse_sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(&self.shadow_cube.cube_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::Sampler(&self.shadow_cube.sampler),
                    },
                ],
            },
        ));

        self.skybox_media_textures = Some(self.device.create_bind_group(
            &wgpu::BindGroupDescriptor {
                label: Some("Skybox Media Textures"),
                layout: &self.skybox_media_texture_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(sky_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sky_sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(&self.shadow_cube.cube_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::Sampler(&self.shadow_cube.sampler),
                    },
                ],
            },
        ));

        self.skybox_fog_textures = Some(self.device.create_bind_group(
            &wgpu::BindGroupDescriptor {
                label: Some("Skybox Fog Textures"),
                layout: &self.skybox_fog_texture_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(sky_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sky_sampler),
                    },
                ],
            },
        ));
    }

    /// Renders one frame: shadow, illumination, skybox, axis, UI, present
    ///
    /// `settings` is this frame's snapshot of the UI-tunable state; the UI
    /// callback may mutate the live copy for the next frame.
    pub fn render_frame<F>(
        &mut self,
        scene: &mut Scene,
        settings: &SceneSettings,
        ui_callback: Option<F>,
    ) where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err) => {
                // A lost or outdated surface heals on the next configure;
                // this frame is simply dropped.
                log::warn!("skipping frame, no surface texture: {}", err);
                self.surface.configure(&self.device, &self.config);
                return;
            }
        };

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Per-frame uniform plumbing, written before any pass is encoded.
        let view = scene.camera.view_matrix();
        let phase_index = self
            .phase_registry
            .index(settings.phase_function)
            .unwrap_or(0);
        let globals_content = GlobalUniforms::build(
            view,
            self.projection,
            scene.camera.position,
            settings,
            phase_index,
            self.config.width,
            self.config.height,
        );
        self.globals.update_content(&self.queue, globals_content);

        let light_position = cgmath::Point3::new(
            settings.light_position[0],
            settings.light_position[1],
            settings.light_position[2],
        );
        let face_matrices = cube_face_matrices(light_position);
        for (buffer, matrix) in self.shadow_face_buffers.iter_mut().zip(face_matrices) {
            buffer.update_content(&self.queue, ShadowFaceUniforms::new(matrix, light_position));
        }

        for object in scene.objects.iter_mut() {
            object.update_frame_uniforms(&self.queue, view);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.encode_shadow_pass(&mut encoder, scene);
        self.encode_illumination_pass(&mut encoder, &surface_view, scene);
        self.encode_skybox_pass(&mut encoder, &surface_view, scene, settings.skybox_technique);
        self.encode_axis_pass(&mut encoder, &surface_view, scene);

        if let Some(ui_callback) = ui_callback {
            ui_callback(&self.device, &self.queue, &mut encoder, &surface_view);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    /// Depth-only rendering of every object into the shadow cube-map
    ///
    /// wgpu has no geometry stage to project to all six faces in one draw,
    /// so each face gets its own sub-pass into its layer of the shared cube
    /// texture. Every sub-pass clears its face; objects without uploaded
    /// meshes are skipped inside the draw helpers.
    fn encode_shadow_pass(&mut self, encoder: &mut wgpu::CommandEncoder, scene: &Scene) {
        for face in 0..6 {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Face Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_cube.face_views[face],
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let Some(pipeline) = self.pipeline_manager.get_pipeline("Shadow") else {
                log::warn!("shadow pipeline unavailable, skipping face {}", face);
                continue;
            };
            shadow_pass.set_pipeline(pipeline);
            shadow_pass.set_bind_group(0, &self.shadow_face_bind_groups[face], &[]);

            for object in scene.objects.iter() {
                if let Some(bind_group) = object.bind_group() {
                    shadow_pass.set_bind_group(1, bind_group, &[]);
                    shadow_pass.draw_model(object.model());
                }
            }
        }
    }

    /// Full-resolution lit rendering of every object with media attenuation
    fn encode_illumination_pass(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
        scene: &Scene,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Illumination Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(config::CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        let Some(textures) = self.illumination_textures.as_ref() else {
            return;
        };
        let Some(pipeline) = self.pipeline_manager.get_pipeline("Illumination") else {
            return;
        };

        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &self.globals_bind_group, &[]);
        render_pass.set_bind_group(2, textures, &[]);

        for object in scene.objects.iter() {
            if let Some(bind_group) = object.bind_group() {
                render_pass.set_bind_group(1, bind_group, &[]);
                render_pass.draw_model(object.model());
            }
        }
    }

    /// Environment rendering with the runtime-selected technique
    fn encode_skybox_pass(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
        scene: &Scene,
        technique: SkyboxTechnique,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Skybox Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        let (pipeline_name, textures) = match technique {
            SkyboxTechnique::Fog => ("SkyboxFog", self.skybox_fog_textures.as_ref()),
            SkyboxTechnique::ParticipatingMedia => {
                ("SkyboxMedia", self.skybox_media_textures.as_ref())
            }
        };

        let Some(textures) = textures else {
            return;
        };
        let Some(pipeline) = self.pipeline_manager.get_pipeline(pipeline_name) else {
            return;
        };

        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &self.globals_bind_group, &[]);
        render_pass.set_bind_group(1, textures, &[]);
        render_pass.draw_model(&scene.skybox_cube);
    }

    /// Alpha-blended world-axis arrows, purely diagnostic
    fn encode_axis_pass(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
        scene: &Scene,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Axis Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        if let Some(pipeline) = self.pipeline_manager.get_pipeline("AxisLines") {
            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(0, &self.globals_bind_group, &[]);
            for arrow in &scene.axis_arrows {
                arrow.draw_shaft(&mut render_pass);
            }
        }

        if let Some(pipeline) = self.pipeline_manager.get_pipeline("AxisHeads") {
            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(0, &self.globals_bind_group, &[]);
            for arrow in &scene.axis_arrows {
                arrow.draw_head(&mut render_pass);
            }
        }
    }

    /// Resizes the surface and recreates the depth buffer and projection
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
        self.projection = perspective_projection(width as f32 / height as f32);
        // The shadow cube keeps its fixed resolution.
    }

    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Layout for per-object uniform bind groups, needed at scene init
    pub fn object_layout(&self) -> &wgpu::BindGroupLayout {
        &self.object_layout
    }

    /// The startup-built phase dispatch table
    pub fn phase_registry(&self) -> &PhaseRegistry {
        &self.phase_registry
    }
}
