/// Camera and projection utilities
use xmodl_core::{SceneModel, Transform, Vector};

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 0.5;

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vector,
    pub target: Vector,
    pub up: Vector,
    /// Vertical field of view in degrees
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Vector::point(0.0, 0.0, 5.0),
            target: Vector::point(0.0, 0.0, 0.0),
            up: Vector::direction(0.0, 1.0, 0.0),
            fov: 45.0,
            aspect: width as f64 / height.max(1) as f64 * CELL_ASPECT,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Default camera, moved to the eye and target the model declares
    pub fn for_model(model: &mut SceneModel, width: u32, height: u32) -> Self {
        let mut camera = Self::new(width, height);
        let position = model.camera_position();
        if position.is_specified() {
            camera.position = position;
        }
        let target = model.camera_target();
        if target.is_specified() {
            camera.target = target;
        }
        camera
    }

    /// World to eye space
    pub fn view_transform(&self) -> Transform {
        Transform::look_at(&self.position, &self.target, &self.up)
    }

    /// Eye to clip space
    pub fn projection_transform(&self) -> Transform {
        Transform::perspective(self.fov, self.aspect, self.near, self.far)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f64 / height.max(1) as f64 * CELL_ASPECT;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

/// Accumulated user rotation of the model, in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationState {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Rotate by delta amounts (in degrees)
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    pub fn transform(&self) -> Transform {
        Transform::euler_xyz(self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmodl_core::{Bone, Transform};

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(80, 40);
        assert!((camera.aspect - 1.0).abs() < 1e-12);
        assert_eq!(camera.position, Vector::point(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_view_puts_target_ahead() {
        let camera = Camera::new(80, 24);
        let target = camera.view_transform() * camera.target;
        assert!(target.x.abs() < 1e-12);
        assert!((target.z + 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_camera_from_model_bones() {
        let mut model = SceneModel::new();
        model.add_bone(Bone::new(0, "Camera.Position", None, Transform::translate(1.0, 2.0, 8.0)));

        let camera = Camera::for_model(&mut model, 80, 24);
        assert_eq!(camera.position, Vector::point(1.0, 2.0, 8.0));
        assert_eq!(camera.target, Vector::point(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_rotation_accumulates() {
        let mut rotation = RotationState::default();
        rotation.rotate(10.0, 0.0, 0.0);
        rotation.rotate(5.0, 20.0, 0.0);
        assert_eq!(rotation, RotationState::new(15.0, 20.0, 0.0));
        assert_eq!(rotation.transform(), Transform::euler_xyz(15.0, 20.0, 0.0));
    }
}
