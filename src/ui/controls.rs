// src/ui/controls.rs
//! Parameter-tuning panel
//!
//! Sliders and radio buttons over the live [`SceneSettings`] block: media
//! coefficients, phase function, point light position, and the skybox
//! technique. The render engine reads the values fresh at the top of the
//! next frame.

use crate::gfx::rendering::{
    frame_state::{SceneSettings, SkyboxTechnique},
    phase::PhaseFunction,
};

/// Builds the "Tools" window
pub fn draw_tools_window(ui: &imgui::Ui, settings: &mut SceneSettings) {
    ui.window("Tools")
        .size([640.0, 470.0], imgui::Condition::FirstUseEver)
        .position([20.0, 20.0], imgui::Condition::FirstUseEver)
        .build(|| {
            draw_media_section(ui, settings);
            draw_light_section(ui, settings);
            draw_skybox_section(ui, settings);
        });
}

fn draw_media_section(ui: &imgui::Ui, settings: &mut SceneSettings) {
    ui.child_window("Participating media rendering")
        .size([600.0, 270.0])
        .border(true)
        .build(|| {
            ui.text_colored([0.0, 1.0, 0.0, 1.0], "Participating media coefficients:");
            ui.indent();

            ui.slider("absorption R", 0.0, 1.0, &mut settings.absorption[0]);
            ui.slider("absorption G", 0.0, 1.0, &mut settings.absorption[1]);
            ui.slider("absorption B", 0.0, 1.0, &mut settings.absorption[2]);
            ui.separator();

            ui.slider("scattering R", 0.0, 1.0, &mut settings.scattering[0]);
            ui.slider("scattering G", 0.0, 1.0, &mut settings.scattering[1]);
            ui.slider("scattering B", 0.0, 1.0, &mut settings.scattering[2]);
            ui.separator();

            ui.slider("g coefficient", -1.0, 1.0, &mut settings.asymmetry);
            ui.separator();

            ui.text("Phase function:");
            ui.radio_button("Mie", &mut settings.phase_function, PhaseFunction::Mie);
            ui.same_line();
            ui.radio_button(
                "Rayleigh",
                &mut settings.phase_function,
                PhaseFunction::Rayleigh,
            );
            ui.radio_button(
                "Schlick",
                &mut settings.phase_function,
                PhaseFunction::Schlick,
            );
            ui.same_line();
            ui.radio_button(
                "Uniform",
                &mut settings.phase_function,
                PhaseFunction::Uniform,
            );
        });
}

fn draw_light_section(ui: &imgui::Ui, settings: &mut SceneSettings) {
    ui.child_window("Point light")
        .size([600.0, 100.0])
        .border(true)
        .build(|| {
            ui.text_colored([1.0, 1.0, 0.0, 1.0], "Point light");
            ui.indent();
            ui.slider("light x", -100.0, 100.0, &mut settings.light_position[0]);
            ui.slider("light y", -100.0, 100.0, &mut settings.light_position[1]);
            ui.slider("light z", -100.0, 100.0, &mut settings.light_position[2]);
        });
}

fn draw_skybox_section(ui: &imgui::Ui, settings: &mut SceneSettings) {
    ui.child_window("Skybox options")
        .size([600.0, 80.0])
        .border(true)
        .build(|| {
            ui.text_colored([0.0, 1.0, 1.0, 1.0], "Skybox rendering technique");
            ui.indent();
            ui.radio_button(
                "Volumetric Fog Skybox",
                &mut settings.skybox_technique,
                SkyboxTechnique::Fog,
            );
            ui.radio_button(
                "Participating Media Skybox",
                &mut settings.skybox_technique,
                SkyboxTechnique::ParticipatingMedia,
            );
        });
}
