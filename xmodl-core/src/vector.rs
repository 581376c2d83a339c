/// Homogeneous 4-component vector
use nalgebra::{Point3, Vector3, Vector4};
use std::ops::{Add, Mul, Neg, Sub};

/// A homogeneous vector. `w = 1` marks a point, `w = 0` a direction.
///
/// Optional values (such as a camera position that the model file may not
/// declare) use `w = 0` to mean "not specified".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// A point (`w = 1`)
    pub const fn point(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, 1.0)
    }

    /// A direction (`w = 0`)
    pub const fn direction(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, 0.0)
    }

    /// True when the vector carries a value, i.e. `w != 0`
    pub fn is_specified(&self) -> bool {
        self.w != 0.0
    }

    pub fn dot3(&self, other: &Vector) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product of the xyz parts. The result is a direction.
    pub fn cross3(&self, other: &Vector) -> Vector {
        Vector::direction(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length_squared3(&self) -> f64 {
        self.dot3(self)
    }

    pub fn length3(&self) -> f64 {
        self.length_squared3().sqrt()
    }

    /// Normalize the xyz part, leaving w untouched. A zero-length vector is
    /// returned unchanged.
    pub fn normalize3(&self) -> Vector {
        let len = self.length3();
        if len == 0.0 {
            return *self;
        }
        Vector::new(self.x / len, self.y / len, self.z / len, self.w)
    }

    pub fn xyz(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl Default for Vector {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, s: f64) -> Vector {
        Vector::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

impl From<Vector4<f64>> for Vector {
    fn from(v: Vector4<f64>) -> Self {
        Vector::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Vector> for Vector4<f64> {
    fn from(v: Vector) -> Self {
        Vector4::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Point3<f32>> for Vector {
    fn from(p: Point3<f32>) -> Self {
        Vector::point(p.x as f64, p.y as f64, p.z as f64)
    }
}

impl From<Vector> for Point3<f32> {
    fn from(v: Vector) -> Self {
        Point3::new(v.x as f32, v.y as f32, v.z as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_follows_right_hand_rule() {
        let x = Vector::direction(1.0, 0.0, 0.0);
        let y = Vector::direction(0.0, 1.0, 0.0);
        let z = x.cross3(&y);
        assert_eq!(z, Vector::direction(0.0, 0.0, 1.0));
        assert_eq!(y.cross3(&x), Vector::direction(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_normalize_keeps_w() {
        let v = Vector::point(3.0, 0.0, 4.0).normalize3();
        assert!((v.length3() - 1.0).abs() < 1e-12);
        assert!((v.x - 0.6).abs() < 1e-12);
        assert_eq!(v.w, 1.0);
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(Vector::ZERO.normalize3(), Vector::ZERO);
    }

    #[test]
    fn test_presence_flag() {
        assert!(!Vector::default().is_specified());
        assert!(Vector::point(0.0, 0.0, 0.0).is_specified());
    }
}
