use foundation::math::Vec3;
use runtime::Frame;
use scene::{GlobeScene, PerspectiveCamera};

use crate::shader::Globals;

/// Camera pose for one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    /// Instanced dot discs; opaque, drawn first.
    Dots { instances: u32 },
    /// Translucent base sphere, blended over the dots behind it.
    BaseSphere,
}

#[derive(Debug, Default)]
pub struct RenderFrame {
    pub globals: Option<Globals>,
    pub commands: Vec<RenderCommand>,
}

pub struct Renderer;

impl Renderer {
    pub fn globals(
        scene: &GlobeScene,
        camera: &PerspectiveCamera,
        pose: CameraPose,
        frame: Frame,
        max_extrusion: f64,
    ) -> Globals {
        let eye = pose.eye.to_f32();
        let p = scene.point_light;
        let h = scene.hemisphere;
        let b = scene.base;
        Globals {
            view_proj: camera.view_proj(pose.eye, pose.target),
            camera_pos: [eye[0], eye[1], eye[2], 1.0],
            base_color: [b.color[0], b.color[1], b.color[2], b.opacity],
            point_light_pos: [p.position[0], p.position[1], p.position[2], p.range],
            point_light_color: [p.color[0], p.color[1], p.color[2], p.intensity],
            sky_color: [h.sky[0], h.sky[1], h.sky[2], h.intensity],
            ground_color: [h.ground[0], h.ground[1], h.ground[2], 0.0],
            time: frame.phase as f32,
            max_extrusion: max_extrusion as f32,
            _pad: [0.0; 2],
        }
    }

    pub fn collect(
        scene: &GlobeScene,
        camera: &PerspectiveCamera,
        pose: CameraPose,
        frame: Frame,
        max_extrusion: f64,
        dot_instances: u32,
    ) -> RenderFrame {
        let mut out = RenderFrame {
            globals: Some(Self::globals(scene, camera, pose, frame, max_extrusion)),
            commands: Vec::with_capacity(2),
        };
        if dot_instances > 0 {
            out.commands.push(RenderCommand::Dots {
                instances: dot_instances,
            });
        }
        out.commands.push(RenderCommand::BaseSphere);
        out
    }
}
