//! Scene container: camera, objects, and debug geometry
//!
//! The scene owns the FPS camera, the object list, the skybox cube volume,
//! and the world-axis arrows. Shared models are uploaded by the caller
//! before objects are created, then referenced through `Arc`.

use std::sync::Arc;

use cgmath::{Deg, Point3, Rad, Vector3};
use wgpu::Device;

use crate::gfx::{
    camera::{CameraController, FpsCamera},
    geometry::generate_cube,
};

use super::{
    line::{create_axis_arrows, ArrowBatch},
    model::Model,
    object::SceneObject,
};

pub struct Scene {
    pub camera: FpsCamera,
    pub controller: CameraController,
    pub objects: Vec<SceneObject>,
    /// Unit cube drawn by the skybox passes, generated procedurally.
    pub skybox_cube: Model,
    pub axis_arrows: [ArrowBatch; 3],
}

impl Scene {
    /// Creates an empty scene with the camera at the demo start position
    pub fn new() -> Self {
        Self {
            camera: FpsCamera::new(Point3::new(0.0, 0.0, 7.0), false),
            controller: CameraController::new(),
            objects: Vec::new(),
            skybox_cube: Model::from_geometry("skybox_cube", &generate_cube()),
            axis_arrows: create_axis_arrows(),
        }
    }

    /// Builds the demo object layout: a floor, two walls, two cubes and a
    /// sphere
    ///
    /// Models are shared; the plane model backs all three flat surfaces.
    pub fn populate_demo(
        &mut self,
        plane: Arc<Model>,
        cube: Arc<Model>,
        sphere: Arc<Model>,
    ) {
        let mut floor = SceneObject::new("Floor", plane.clone());
        floor.transform_mut().scale_uniform(2.0);
        self.objects.push(floor);

        let mut neg_z_wall = SceneObject::new("NegZWall", plane.clone());
        {
            let transform = neg_z_wall.transform_mut();
            transform.set_position(Vector3::new(0.0, 0.0, -15.0));
            transform.rotate(Vector3::unit_x(), Rad::from(Deg(-90.0)));
            transform.scale_uniform(2.0);
        }
        self.objects.push(neg_z_wall);

        let mut pos_x_wall = SceneObject::new("PosXWall", plane);
        {
            let transform = pos_x_wall.transform_mut();
            transform.set_position(Vector3::new(15.0, 0.0, 0.0));
            transform.rotate(Vector3::unit_z(), Rad::from(Deg(90.0)));
            transform.scale_uniform(2.0);
        }
        self.objects.push(pos_x_wall);

        let mut cube1 = SceneObject::new("Cube 1", cube.clone());
        {
            let transform = cube1.transform_mut();
            transform.set_position(Vector3::new(0.0, 4.0, -3.5));
            transform.scale_uniform(0.5);
        }
        self.objects.push(cube1);

        let mut cube2 = SceneObject::new("Cube 2", cube);
        {
            let transform = cube2.transform_mut();
            transform.set_position(Vector3::new(-5.0, 4.0, -1.5));
            transform.scale_uniform(0.2);
        }
        self.objects.push(cube2);

        let mut sphere1 = SceneObject::new("Sphere 1", sphere);
        {
            let transform = sphere1.transform_mut();
            transform.set_position(Vector3::new(5.0, 4.0, -6.0));
            transform.scale_uniform(0.5);
        }
        self.objects.push(sphere1);
    }

    /// Uploads scene-owned geometry and creates per-object uniform resources
    ///
    /// Shared models referenced by the objects must already be uploaded.
    pub fn init_gpu_resources(&mut self, device: &Device, object_layout: &wgpu::BindGroupLayout) {
        self.skybox_cube.init_gpu_resources(device);
        for arrow in &mut self.axis_arrows {
            arrow.init_gpu_resources(device);
        }
        for object in &mut self.objects {
            object.init_gpu_resources(device, object_layout);
        }
    }

    /// Advances camera movement by the frame delta
    pub fn update(&mut self, dt: f32) {
        self.controller.apply_movement(&mut self.camera, dt);
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::{generate_plane, generate_sphere};

    fn demo_scene() -> Scene {
        let plane = Arc::new(Model::from_geometry("plane", &generate_plane(25.0, 25.0, 1, 1)));
        let cube = Arc::new(Model::from_geometry("cube", &generate_cube()));
        let sphere = Arc::new(Model::from_geometry("sphere", &generate_sphere(16, 12)));

        let mut scene = Scene::new();
        scene.populate_demo(plane, cube, sphere);
        scene
    }

    #[test]
    fn demo_scene_has_six_objects_with_models() {
        let scene = demo_scene();
        assert_eq!(scene.object_count(), 6);

        let names: Vec<&str> = scene.objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(
            names,
            ["Floor", "NegZWall", "PosXWall", "Cube 1", "Cube 2", "Sphere 1"]
        );

        for object in &scene.objects {
            assert!(
                !object.model().is_empty(),
                "object '{}' has no geometry",
                object.name
            );
        }
    }

    #[test]
    fn demo_transforms_match_the_documented_layout() {
        let scene = demo_scene();

        let wall = &scene.objects[1];
        assert_eq!(wall.transform().position(), Vector3::new(0.0, 0.0, -15.0));
        assert_eq!(wall.transform().scale_factors(), Vector3::new(2.0, 2.0, 2.0));

        let cube2 = &scene.objects[4];
        assert_eq!(cube2.transform().position(), Vector3::new(-5.0, 4.0, -1.5));
        assert_eq!(
            cube2.transform().scale_factors(),
            Vector3::new(0.2, 0.2, 0.2)
        );
    }

    #[test]
    fn flat_surfaces_share_one_plane_model() {
        let scene = demo_scene();
        assert!(Arc::ptr_eq(
            scene.objects[0].model(),
            scene.objects[1].model()
        ));
        assert!(Arc::ptr_eq(
            scene.objects[0].model(),
            scene.objects[2].model()
        ));
    }

    #[test]
    fn skybox_cube_is_ready_before_upload() {
        let scene = Scene::new();
        assert!(!scene.skybox_cube.is_empty());
    }
}
