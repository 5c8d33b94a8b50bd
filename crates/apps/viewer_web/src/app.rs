//! Platform-neutral globe state. The DOM layer feeds it pointer, resize and
//! frame events with timestamps and applies what comes back.

use foundation::Time;
use foundation::math::Vec3;
use gpu::{CameraPose, InstanceBuffers, RenderFrame, Renderer};
use rand::Rng;
use runtime::{Easing, Frame, FrameClock, Tweened};
use scene::{
    Cursor, DotField, DotFieldParams, Effect, GlobeConfig, GlobeScene, Interaction, MapSample,
    OrbitControls, PerspectiveCamera, ResizeOutcome, Viewport, pick_sphere, pointer_ndc,
    sample_dot_field,
};

pub struct GlobeApp {
    cfg: GlobeConfig,
    scene: GlobeScene,
    camera: PerspectiveCamera,
    orbit: OrbitControls,
    interaction: Interaction,
    extrusion: Tweened,
    dots: Option<DotField>,
    instances: Option<InstanceBuffers>,
    instances_dirty: bool,
    window_size: (f64, f64),
}

impl GlobeApp {
    pub fn new(cfg: GlobeConfig) -> Self {
        let scene = GlobeScene::from_config(&cfg);
        let camera = PerspectiveCamera::new(&cfg.camera);
        let orbit = OrbitControls::new(cfg.orbit, camera.distance);
        Self {
            scene,
            camera,
            orbit,
            interaction: Interaction::new(cfg.interaction),
            extrusion: Tweened::new(cfg.interaction.rest_extrusion),
            dots: None,
            instances: None,
            instances_dirty: false,
            window_size: (1.0, 1.0),
            cfg,
        }
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.cfg
    }

    pub fn scene(&self) -> &GlobeScene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn orbit(&self) -> &OrbitControls {
        &self.orbit
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn extrusion(&self) -> f64 {
        self.extrusion.value()
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.cfg.clock.start_phase, self.cfg.clock.phase_per_frame)
    }

    pub fn dot_count(&self) -> usize {
        self.dots.as_ref().map_or(0, DotField::len)
    }

    pub fn has_dot_field(&self) -> bool {
        self.dots.is_some()
    }

    pub fn resize(&mut self, viewport: Viewport, window_height: f64) -> ResizeOutcome {
        self.window_size = (viewport.window_width, window_height);
        let outcome = self.camera.apply_resize(&viewport, &self.cfg.camera);
        self.orbit.set_distance(outcome.distance);
        self.orbit.set_viewport_height(viewport.height);
        if outcome.distance_changed {
            tracing::info!(distance = outcome.distance, "camera distance changed");
        }
        outcome
    }

    /// Sample the dot field from a decoded map. Replaces any previous field.
    pub fn set_map<R: Rng + ?Sized>(&mut self, map: &MapSample, rng: &mut R) -> usize {
        let params = DotFieldParams::from(&self.cfg.dots);
        let field = sample_dot_field(map, &params, rng);
        let count = field.len();
        self.instances = Some(InstanceBuffers::from_dot_field(&field));
        self.instances_dirty = true;
        self.dots = Some(field);
        tracing::info!(dots = count, "dot field ready");
        count
    }

    /// Instance data not yet handed to the GPU, if any.
    pub fn take_instance_upload(&mut self) -> Option<&InstanceBuffers> {
        if !self.instances_dirty {
            return None;
        }
        self.instances_dirty = false;
        self.instances.as_ref()
    }

    /// Force the next `take_instance_upload` to return the current buffers,
    /// e.g. after the GPU context came up.
    pub fn mark_instances_dirty(&mut self) {
        self.instances_dirty = self.instances.is_some();
    }

    fn pointer_hits_globe(&self, client_x: f64, client_y: f64) -> bool {
        let (w, h) = self.window_size;
        let ndc = pointer_ndc(client_x, client_y, w, h);
        let ray = self
            .camera
            .ray_from_ndc(self.orbit.eye(), self.orbit.target, ndc);
        pick_sphere(ray, self.scene.pick_sphere()).is_some()
    }

    pub fn pointer_move(&mut self, client_x: f64, client_y: f64, now: Time) -> Option<Cursor> {
        self.orbit.drag_to([client_x, client_y]);
        let hit = self.pointer_hits_globe(client_x, client_y);
        let effects = self.interaction.pointer_move(hit, now);
        self.apply(effects)
    }

    pub fn pointer_down(&mut self, now: Time) -> Option<Cursor> {
        let effects = self.interaction.pointer_down(now);
        self.apply(effects)
    }

    pub fn pointer_up(&mut self, now: Time) -> Option<Cursor> {
        self.orbit.end_drag();
        let effects = self.interaction.pointer_up(now);
        self.apply(effects)
    }

    /// Pointer went down on the canvas itself: start an orbit drag.
    pub fn begin_orbit_drag(&mut self, client_x: f64, client_y: f64) {
        self.orbit.begin_drag([client_x, client_y]);
    }

    /// Advance timers, tweens and the orbit, then describe the frame.
    pub fn frame(&mut self, frame: Frame, now: Time) -> (RenderFrame, Option<Cursor>) {
        let effects = self.interaction.advance(now);
        let cursor = self.apply(effects);
        let extrusion = self.extrusion.update(now);
        let eye = self.orbit.update();

        for event in self.interaction.events().drain() {
            tracing::debug!(kind = event.kind, "{}", event.message);
        }

        let pose = CameraPose {
            eye,
            target: self.orbit.target,
        };
        let instances = self.instances.as_ref().map_or(0, |b| b.len() as u32);
        let render = Renderer::collect(&self.scene, &self.camera, pose, frame, extrusion, instances);
        (render, cursor)
    }

    pub fn eye(&self) -> Vec3 {
        self.orbit.eye()
    }

    pub fn dispose(&mut self) {
        self.interaction.dispose();
        self.extrusion.stop();
    }

    fn apply(&mut self, effects: Vec<Effect>) -> Option<Cursor> {
        let mut cursor = None;
        for effect in effects {
            match effect {
                Effect::AnimateExtrusion {
                    target,
                    duration_s,
                    at,
                } => {
                    self.extrusion
                        .animate_to(target, duration_s, Easing::Power1Out, at);
                }
                Effect::SetCursor(c) => cursor = Some(c),
            }
        }
        cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn mounted(window_width: f64) -> GlobeApp {
        let mut app = GlobeApp::new(GlobeConfig::default());
        app.resize(
            Viewport {
                width: window_width,
                height: 600.0,
                window_width,
                device_pixel_ratio: 1.0,
            },
            600.0,
        );
        app
    }

    fn center(app: &GlobeApp) -> (f64, f64) {
        (app.window_size.0 / 2.0, app.window_size.1 / 2.0)
    }

    #[test]
    fn starts_without_dots() {
        let mut app = mounted(1024.0);
        assert!(!app.has_dot_field());
        assert_eq!(app.dot_count(), 0);
        assert!(app.take_instance_upload().is_none());

        let frame = app.frame_clock().tick();
        let (render, _) = app.frame(frame, Time(0.0));
        assert_eq!(render.commands, vec![gpu::RenderCommand::BaseSphere]);
    }

    #[test]
    fn white_map_gives_empty_field() {
        let mut app = mounted(1024.0);
        let map = MapSample::filled(32, 16, [255; 4]);
        assert_eq!(app.set_map(&map, &mut StdRng::seed_from_u64(3)), 0);
        assert!(app.has_dot_field());
        assert_eq!(app.take_instance_upload().map(|b| b.len()), Some(0));
    }

    #[test]
    fn dot_field_upload_happens_once() {
        let mut app = mounted(1024.0);
        let map = MapSample::filled(16, 8, [0, 0, 0, 255]);
        let count = app.set_map(&map, &mut StdRng::seed_from_u64(3));
        assert!(count > 0);
        assert_eq!(app.take_instance_upload().map(|b| b.len()), Some(count));
        assert!(app.take_instance_upload().is_none());
        app.mark_instances_dirty();
        assert!(app.take_instance_upload().is_some());
    }

    #[test]
    fn resize_drives_orbit_distance() {
        let mut app = mounted(1024.0);
        assert_eq!(app.orbit().distance(), 100.0);
        app.resize(
            Viewport {
                width: 500.0,
                height: 600.0,
                window_width: 500.0,
                device_pixel_ratio: 2.0,
            },
            600.0,
        );
        assert_eq!(app.orbit().distance(), 140.0);
        assert_eq!(app.camera().distance, 140.0);
    }

    #[test]
    fn tap_on_globe_holds_extrusion_for_minimum_press() {
        let mut app = mounted(800.0);
        let (cx, cy) = center(&app);
        assert_eq!(app.pointer_move(cx, cy, Time(0.0)), Some(Cursor::Pointer));
        assert_eq!(app.pointer_down(Time(0.0)), Some(Cursor::Grabbing));
        assert_eq!(app.pointer_up(Time(0.05)), None);

        let mut clock = app.frame_clock();
        app.frame(clock.tick(), Time(0.25));
        assert!(app.extrusion() > 1.0);

        // Still fully pressed right before the guard.
        app.frame(clock.tick(), Time(0.499));
        assert!((app.extrusion() - 1.07).abs() < 1e-3);

        let (_, cursor) = app.frame(clock.tick(), Time(0.5));
        assert_eq!(cursor, Some(Cursor::Pointer));

        app.frame(clock.tick(), Time(0.65));
        assert!((app.extrusion() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn pressing_beside_globe_is_ignored() {
        let mut app = mounted(800.0);
        assert_eq!(app.pointer_move(1.0, 1.0, Time(0.0)), None);
        assert_eq!(app.pointer_down(Time(0.1)), None);

        let (_, cursor) = app.frame(app.frame_clock().tick(), Time(0.2));
        assert_eq!(cursor, None);
        assert_eq!(app.extrusion(), 1.0);
    }

    #[test]
    fn frames_carry_clock_phase() {
        let mut app = mounted(1024.0);
        let mut clock = app.frame_clock();
        clock.tick();
        let (render, _) = app.frame(clock.tick(), Time(0.0));
        let g = render.globals.expect("globals");
        assert!((g.time - 1.06).abs() < 1e-6);
        assert_eq!(g.max_extrusion, 1.0);
    }

    #[test]
    fn dispose_stops_pending_release() {
        let mut app = mounted(800.0);
        let (cx, cy) = center(&app);
        app.pointer_move(cx, cy, Time(0.0));
        app.pointer_down(Time(0.0));
        app.pointer_up(Time(0.1));
        app.dispose();

        let (_, cursor) = app.frame(app.frame_clock().tick(), Time(1.0));
        assert_eq!(cursor, None);
        assert!(app.interaction().is_disposed());
    }
}
