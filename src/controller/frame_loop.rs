use slotmap::SlotMap;

use crate::assets::AssetQueue;
use crate::config::SceneConfig;
use crate::controller::camera_controller::CameraController;
use crate::controller::input::{InputEvent, InputState, KeyOutcome};
use crate::model::{
    Camera, ModelKey, NoVideo, OrbitingBillboard, ParticleField, SpinningObject, VideoFeed,
};

/// Main per-frame update: camera kinematics plus procedural animation of
/// every object in the scene
pub struct FrameUpdater {
    pub camera: Camera,
    pub input: InputState,
    pub camera_controller: CameraController,
    pub models: SlotMap<ModelKey, SpinningObject>,
    pub billboard: OrbitingBillboard,
    pub particles: ParticleField,
    assets: AssetQueue,
    video: Box<dyn VideoFeed>,
    has_video: bool,
    ticks: u64,
}

impl FrameUpdater {
    pub fn new(config: &SceneConfig, width: u32, height: u32) -> Self {
        let mut camera = Camera::new(config.home_pose(), width, height);
        camera.fov_y = config.fov_y_degrees.to_radians();
        camera.z_near = config.z_near;
        camera.z_far = config.z_far;

        Self {
            camera,
            input: InputState::new(config.bindings.clone()),
            camera_controller: CameraController::new(config.move_speed, config.look_sensitivity),
            models: SlotMap::with_key(),
            billboard: OrbitingBillboard::new(
                config.billboard.radius,
                config.billboard.height,
                config.billboard.angular_speed,
            ),
            particles: ParticleField::generate(
                config.particles.count,
                config.particles.spread,
                config.particles.drift_speed,
                config.particles.seed,
            ),
            assets: AssetQueue::new(),
            video: Box::new(NoVideo),
            has_video: false,
            ticks: 0,
        }
    }

    pub fn assets(&self) -> &AssetQueue {
        &self.assets
    }

    pub fn set_video(&mut self, video: Box<dyn VideoFeed>) {
        self.video = video;
        self.has_video = true;
    }

    pub fn has_video(&self) -> bool {
        self.has_video
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Feed one input event. A reset key resets the camera right here rather
    /// than on the next tick.
    pub fn handle_event(&mut self, event: &InputEvent) -> KeyOutcome {
        let outcome = self.input.process_event(event);
        if outcome == KeyOutcome::Reset {
            self.reset_camera();
        }
        outcome
    }

    /// Restore the home pose. Look motion still pending from before the
    /// reset is dropped so it cannot turn the camera on the next tick.
    pub fn reset_camera(&mut self) {
        self.camera.reset();
        self.input.consume_look();
        tracing::debug!(eye = ?self.camera.eye, "camera reset");
    }

    pub fn add_model(&mut self, object: SpinningObject) -> ModelKey {
        self.models.insert(object)
    }

    pub fn remove_model(&mut self, key: ModelKey) -> Option<SpinningObject> {
        self.models.remove(key)
    }

    /// Move arrived assets into the animated set.
    fn collect_assets(&mut self) {
        for loaded in self.assets.drain() {
            let key = self.models.insert(loaded.object);
            tracing::debug!(?key, name = %self.models[key].name, "model added to scene");
        }
    }

    /// Advance the scene by one tick
    pub fn update(&mut self) {
        self.ticks += 1;
        self.collect_assets();

        for model in self.models.values_mut() {
            model.tick();
        }

        if self.input.is_engaged() {
            let (dx, dy) = self.input.consume_look();
            self.camera_controller.apply_look(&mut self.camera, dx, dy);
            self.camera_controller.fly_move(&mut self.camera, &self.input.intent);
        }

        self.particles.tick();

        self.billboard.tick(self.camera.eye);
        self.billboard.refresh_texture(self.video.as_ref());
    }
}
