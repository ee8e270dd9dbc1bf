use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::math::EulerRot;
use bevy::prelude::*;
use choreography::manifest::BoundsData;

const YAW_SENSITIVITY: f32 = 0.0035;
const PITCH_SENSITIVITY: f32 = 0.0030;
const PITCH_LIMIT: f32 = 1.55;

#[derive(Resource, Debug, Clone)]
pub struct ShowCamera {
    pub position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    /// Show extent, scales movement speed.
    pub extent: f32,
}

impl Default for ShowCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 400.0, 2000.0),
            pitch: -0.15,
            yaw: 0.0,
            extent: 1000.0,
        }
    }
}

impl ShowCamera {
    /// Back off along +z until the whole show fits the view.
    pub fn with_bounds(bounds: &BoundsData) -> Self {
        let center = bounds.center();
        let extent = bounds.size().length().max(1.0);
        let position = center + Vec3::new(0.0, extent * 0.25, extent * 1.2);
        let to_center = center - position;
        let pitch = (to_center.y / to_center.length()).asin();

        Self {
            position,
            pitch,
            yaw: 0.0,
            extent,
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(self.rotation())
    }
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut show_camera: ResMut<ShowCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    // Right drag looks around
    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    if mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
        show_camera.yaw -= mouse_delta.x * YAW_SENSITIVITY;
        show_camera.pitch = (show_camera.pitch - mouse_delta.y * PITCH_SENSITIVITY)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    let scroll: f32 = scroll_events
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        })
        .sum();

    let rotation = show_camera.rotation();
    let forward = rotation * Vec3::NEG_Z;
    let right = rotation * Vec3::X;

    if scroll.abs() > f32::EPSILON {
        let dolly = show_camera.extent * 0.05;
        show_camera.position += forward * scroll * dolly;
    }

    let mut input = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        input.z += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        input.z -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        input.x += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        input.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyE) {
        input.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyQ) {
        input.y -= 1.0;
    }

    if input != Vec3::ZERO {
        let mut speed = show_camera.extent * 0.3;
        if keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
            speed *= 3.5;
        }
        if keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]) {
            speed *= 0.25;
        }
        let delta = right * input.x + Vec3::Y * input.y + forward * input.z;
        show_camera.position += delta.normalize() * speed * time.delta_secs();
    }

    let target = show_camera.transform();
    let lerp = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(target.translation, lerp);
    camera_transform.rotation = camera_transform.rotation.slerp(target.rotation, lerp);
}
