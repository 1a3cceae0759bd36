//! Fly camera producing the `Globals` transform.

use std::f32::consts::TAU;

use glam::{Mat4, Quat, Vec3, Vec3A};

use crate::render::Globals;

pub const NEAR: f32 = 0.001;
pub const FAR: f32 = 100.0;

/// Perspective camera with yaw (about +Y) then pitch (about +X).
///
/// Looks down -Z when yaw and pitch are zero.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub pos: Vec3A,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_rad: f32,
    pub aspect: f32,
}

/// Held directional input, applied once per frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CameraMotion {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
    PitchUp,
    PitchDown,
    YawLeft,
    YawRight,
}

/// Per-frame step sizes for `Camera::apply_motion`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraSpeed {
    /// World units per frame.
    pub linear: f32,
    /// Radians per frame.
    pub angular: f32,
}

impl Default for CameraSpeed {
    fn default() -> Self {
        Self { linear: 0.01, angular: 0.003 }
    }
}

impl Camera {
    pub fn default_from_aspect(aspect: f32) -> Self {
        Self {
            pos: Vec3A::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            fov_rad: TAU / 4.0,
            aspect,
        }
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        Quat::from_axis_angle(Vec3::Y, self.yaw) * Quat::from_axis_angle(Vec3::X, self.pitch)
    }

    /// World-to-view transform.
    pub fn view(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation(), self.pos.into()).inverse()
    }

    /// Right-handed perspective, depth mapped to [0, 1].
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_rad, self.aspect, NEAR, FAR)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Uniform block for a draw seen through this camera (model = identity).
    pub fn globals(&self) -> Globals {
        Globals::from_mat4(self.view_projection())
    }

    /// World-space right, forward and up vectors.
    pub fn right_forward_up(&self) -> [Vec3A; 3] {
        let rot = self.rotation();
        [rot * Vec3A::X, rot * -Vec3A::Z, rot * Vec3A::Y]
    }

    /// Applies every held motion once, using the basis from before the step.
    pub fn apply_motion<I>(&mut self, motions: I, speed: CameraSpeed)
    where
        I: IntoIterator<Item = CameraMotion>,
    {
        let [r, f, u] = self.right_forward_up();
        let (step, turn) = (speed.linear, speed.angular);

        for motion in motions {
            match motion {
                CameraMotion::Forward => self.pos += f * step,
                CameraMotion::Back => self.pos -= f * step,
                CameraMotion::Left => self.pos -= r * step,
                CameraMotion::Right => self.pos += r * step,
                CameraMotion::Up => self.pos += u * step,
                CameraMotion::Down => self.pos -= u * step,
                CameraMotion::PitchUp => self.pitch += turn,
                CameraMotion::PitchDown => self.pitch -= turn,
                CameraMotion::YawLeft => self.yaw += turn,
                CameraMotion::YawRight => self.yaw -= turn,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn close(a: Vec3A, b: Vec3A) -> bool {
        (a - b).length() < 1e-5
    }

    // ── transforms ────────────────────────────────────────────────────────

    #[test]
    fn default_view_is_identity() {
        let cam = Camera::default_from_aspect(1.0);
        assert!(cam.view().abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn point_ahead_lands_in_clip_volume() {
        let cam = Camera::default_from_aspect(16.0 / 9.0);
        let clip = cam.view_projection() * Vec4::new(0.0, 0.0, -2.0, 1.0);
        assert!((clip.w - 2.0).abs() < 1e-5);
        let ndc_z = clip.z / clip.w;
        assert!((0.0..=1.0).contains(&ndc_z));
        assert!(clip.x.abs() < 1e-6 && clip.y.abs() < 1e-6);
    }

    #[test]
    fn point_behind_has_negative_w() {
        let cam = Camera::default_from_aspect(1.0);
        let clip = cam.view_projection() * Vec4::new(0.0, 0.0, 2.0, 1.0);
        assert!(clip.w < 0.0);
    }

    #[test]
    fn view_undoes_translation() {
        let mut cam = Camera::default_from_aspect(1.0);
        cam.pos = Vec3A::new(1.0, 2.0, 3.0);
        let p = cam.view().transform_point3(Vec3::new(1.0, 2.0, 3.0));
        assert!(p.length() < 1e-6);
    }

    #[test]
    fn globals_carry_view_projection() {
        let cam = Camera::default_from_aspect(2.0);
        assert_eq!(cam.globals().mat4(), cam.view_projection());
    }

    // ── basis ─────────────────────────────────────────────────────────────

    #[test]
    fn default_basis() {
        let [r, f, u] = Camera::default_from_aspect(1.0).right_forward_up();
        assert!(close(r, Vec3A::X));
        assert!(close(f, -Vec3A::Z));
        assert!(close(u, Vec3A::Y));
    }

    #[test]
    fn quarter_yaw_left_faces_neg_x() {
        let mut cam = Camera::default_from_aspect(1.0);
        cam.yaw = TAU / 4.0;
        let [_, f, _] = cam.right_forward_up();
        assert!(close(f, -Vec3A::X));
    }

    // ── motion ────────────────────────────────────────────────────────────

    #[test]
    fn forward_moves_down_neg_z() {
        let mut cam = Camera::default_from_aspect(1.0);
        cam.apply_motion([CameraMotion::Forward], CameraSpeed { linear: 0.5, angular: 0.0 });
        assert!(close(cam.pos, Vec3A::new(0.0, 0.0, -0.5)));
    }

    #[test]
    fn opposite_motions_cancel() {
        let mut cam = Camera::default_from_aspect(1.0);
        cam.apply_motion(
            [CameraMotion::Left, CameraMotion::Right, CameraMotion::Up, CameraMotion::Down],
            CameraSpeed::default(),
        );
        assert!(close(cam.pos, Vec3A::ZERO));
    }

    #[test]
    fn rotations_use_angular_speed() {
        let mut cam = Camera::default_from_aspect(1.0);
        let speed = CameraSpeed::default();
        cam.apply_motion([CameraMotion::YawLeft, CameraMotion::PitchDown], speed);
        assert_eq!(cam.yaw, speed.angular);
        assert_eq!(cam.pitch, -speed.angular);
    }
}
