// CONTROLLER: Input, camera movement, and update loop
pub mod input;
pub mod camera_controller;
pub mod frame_loop;

pub use input::{InputEvent, InputState, KeyBindings, KeyOutcome, MovementIntent};
pub use camera_controller::CameraController;
pub use frame_loop::FrameUpdater;
