/// 4x4 homogeneous transformation matrices
///
/// All builders produce row-major matrices meant to post-multiply column
/// vectors, so `a * b` applies `b` first and then `a`. Angles are in degrees.
use nalgebra::Matrix4;
use std::ops::{Index, IndexMut, Mul, MulAssign};

use crate::vector::Vector;

/// Value substituted for an exactly-zero determinant in both inverses.
pub const SINGULAR_DETERMINANT: f64 = 1e-6;

/// Threshold below which the image of the X axis counts as vertical in
/// Euler extraction.
const GIMBAL_EPSILON: f64 = 1e-6;

/// A 4x4 homogeneous transformation matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    m: Matrix4<f64>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            m: Matrix4::identity(),
        }
    }

    pub fn zero() -> Self {
        Self {
            m: Matrix4::zeros(),
        }
    }

    /// Build from rows in reading order
    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        let mut t = Self::zero();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                t.m[(r, c)] = *value;
            }
        }
        t
    }

    /// Build from 16 values in row-major reading order
    pub fn from_row_major(values: &[f64; 16]) -> Self {
        let mut t = Self::zero();
        for (i, value) in values.iter().enumerate() {
            t.m[(i / 4, i % 4)] = *value;
        }
        t
    }

    /// Build from 16 values stored column by column
    pub fn from_column_major(values: &[f64; 16]) -> Self {
        let mut t = Self::zero();
        for (i, value) in values.iter().enumerate() {
            t.m[(i % 4, i / 4)] = *value;
        }
        t
    }

    /// Export column by column, the layout most graphics APIs expect
    pub fn to_column_major(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        for (i, value) in out.iter_mut().enumerate() {
            *value = self.m[(i % 4, i / 4)];
        }
        out
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.m[(row, col)] = value;
    }

    pub fn translate(x: f64, y: f64, z: f64) -> Self {
        let mut t = Self::identity();
        t.m[(0, 3)] = x;
        t.m[(1, 3)] = y;
        t.m[(2, 3)] = z;
        t
    }

    pub fn translate_by(v: &Vector) -> Self {
        Self::translate(v.x, v.y, v.z)
    }

    /// The translation column as a point
    pub fn translation(&self) -> Vector {
        Vector::point(self.m[(0, 3)], self.m[(1, 3)], self.m[(2, 3)])
    }

    /// Replace only the translation column
    pub fn set_translation(&mut self, v: &Vector) -> &mut Self {
        self.m[(0, 3)] = v.x;
        self.m[(1, 3)] = v.y;
        self.m[(2, 3)] = v.z;
        self
    }

    pub fn scale(s: f64) -> Self {
        Self::scale_xyz(s, s, s)
    }

    pub fn scale_xyz(x: f64, y: f64, z: f64) -> Self {
        let mut t = Self::identity();
        t.m[(0, 0)] = x;
        t.m[(1, 1)] = y;
        t.m[(2, 2)] = z;
        t
    }

    pub fn rotate_x(degrees: f64) -> Self {
        let r = degrees.to_radians();
        Self::rotate_x_cs(r.cos(), r.sin())
    }

    /// Rotation about X from a cosine/sine pair
    pub fn rotate_x_cs(c: f64, s: f64) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotate_y(degrees: f64) -> Self {
        let r = degrees.to_radians();
        Self::rotate_y_cs(r.cos(), r.sin())
    }

    /// Rotation about Y from a cosine/sine pair
    pub fn rotate_y_cs(c: f64, s: f64) -> Self {
        Self::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotate_z(degrees: f64) -> Self {
        let r = degrees.to_radians();
        Self::rotate_z_cs(r.cos(), r.sin())
    }

    /// Rotation about Z from a cosine/sine pair
    pub fn rotate_z_cs(c: f64, s: f64) -> Self {
        Self::from_rows([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation by `degrees` around an arbitrary axis. The axis is normalized
    /// here; a zero-length axis yields the identity.
    pub fn rotate(degrees: f64, axis: &Vector) -> Self {
        let len = axis.length3();
        if len == 0.0 {
            return Self::identity();
        }

        let r = degrees.to_radians();
        let (s, c) = r.sin_cos();
        let t = 1.0 - c;
        let x = axis.x / len;
        let y = axis.y / len;
        let z = axis.z / len;

        Self::from_rows([
            [t * x * x + c, t * x * y - s * z, t * x * z + s * y, 0.0],
            [t * x * y + s * z, t * y * y + c, t * y * z - s * x, 0.0],
            [t * x * z - s * y, t * y * z + s * x, t * z * z + c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation whose rows are the given orthonormal axes. Maps that frame
    /// onto the coordinate axes.
    pub fn from_axes(x: &Vector, y: &Vector, z: &Vector) -> Self {
        Self::from_rows([
            [x.x, x.y, x.z, 0.0],
            [y.x, y.y, y.z, 0.0],
            [z.x, z.y, z.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation from the quaternion `a + bi + cj + dk`
    pub fn from_quaternion(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self::from_rows([
            [
                a * a + b * b - c * c - d * d,
                2.0 * b * c - 2.0 * a * d,
                2.0 * a * c + 2.0 * b * d,
                0.0,
            ],
            [
                2.0 * a * d + 2.0 * b * c,
                a * a - b * b + c * c - d * d,
                2.0 * c * d - 2.0 * a * b,
                0.0,
            ],
            [
                2.0 * b * d - 2.0 * a * c,
                2.0 * a * b + 2.0 * c * d,
                a * a - b * b - c * c + d * d,
                0.0,
            ],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation applying X first, then Y, then Z (`Rz * Ry * Rx`)
    pub fn euler_xyz(x: f64, y: f64, z: f64) -> Self {
        Self::rotate_z(z) * Self::rotate_y(y) * Self::rotate_x(x)
    }

    /// Extract `(x, y, z)` Euler angles for the XYZ application order.
    ///
    /// When the X axis maps onto the Z axis the decomposition is not unique;
    /// y is then fixed at -90 and z at 0, and the remaining rotation is
    /// attributed to x.
    pub fn to_euler_xyz(&self) -> (f64, f64, f64) {
        let xx = self.m[(0, 0)];
        let xy = self.m[(1, 0)];
        let xz = self.m[(2, 0)];

        let (y, z) = if xx.abs() < GIMBAL_EPSILON && xy.abs() < GIMBAL_EPSILON {
            (-90.0, 0.0)
        } else {
            (
                (-xz).clamp(-1.0, 1.0).asin().to_degrees(),
                xy.atan2(xx).to_degrees(),
            )
        };

        // Cancel the known z and y rotations; what is left is about X
        let residual = Self::rotate_y(-y) * Self::rotate_z(-z) * *self;
        let x = residual.m[(2, 1)].atan2(residual.m[(1, 1)]).to_degrees();

        (x, y, z)
    }

    /// Camera transform equivalent to `gluLookAt`: puts the eye at the origin
    /// looking down -Z with `up` along +Y.
    pub fn look_at(eye: &Vector, center: &Vector, up: &Vector) -> Self {
        let camera_z = (*eye - *center).normalize3();
        let camera_x = up.cross3(&camera_z).normalize3();
        let camera_y = camera_z.cross3(&camera_x);

        Self::from_axes(&camera_x, &camera_y, &camera_z) * Self::translate_by(&-*eye)
    }

    /// Symmetric-frustum perspective projection, `fov_y` in degrees
    pub fn perspective(fov_y: f64, aspect: f64, near: f64, far: f64) -> Self {
        let range = (fov_y.to_radians() / 2.0).tan() * near;

        let mut t = Self::zero();
        t.m[(0, 0)] = (2.0 * near) / (range * aspect - (-range * aspect));
        t.m[(1, 1)] = (2.0 * near) / (2.0 * range);
        t.m[(2, 2)] = -(far + near) / (far - near);
        t.m[(3, 2)] = -1.0;
        t.m[(2, 3)] = -(2.0 * far * near) / (far - near);
        t
    }

    /// Transpose in place
    pub fn transpose(&mut self) -> &mut Self {
        for r in 0..4 {
            for c in (r + 1)..4 {
                self.m.swap((r, c), (c, r));
            }
        }
        self
    }

    pub fn transposed(&self) -> Self {
        let mut t = *self;
        t.transpose();
        t
    }

    /// Scale factor of the first column. Only meaningful for uniform,
    /// non-shearing transforms.
    pub fn uniform_scale(&self) -> f64 {
        (self.m[(0, 0)] * self.m[(0, 0)]
            + self.m[(1, 0)] * self.m[(1, 0)]
            + self.m[(2, 0)] * self.m[(2, 0)])
            .sqrt()
    }

    /// Apply the full matrix, translation included when `v.w` is non-zero
    pub fn transform_point(&self, v: &Vector) -> Vector {
        *self * *v
    }

    pub fn compose(&self, other: &Transform) -> Self {
        *self * *other
    }

    /// Determinant by cofactor expansion along the first row
    pub fn determinant(&self) -> f64 {
        let m = self.row_major();
        let inv = cofactors(&m);
        m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12]
    }

    /// Inverse of an affine transform (bottom row `0 0 0 1`).
    ///
    /// The 3x3 block is inverted with its adjoint and the translation becomes
    /// `-R⁻¹ t`. A zero determinant is replaced with [`SINGULAR_DETERMINANT`].
    pub fn affine_inverse(&self) -> Self {
        let fm = &self.m;
        let mut adjoint = [[0.0; 3]; 3];

        adjoint[0][0] = fm[(1, 1)] * fm[(2, 2)] - fm[(1, 2)] * fm[(2, 1)];
        adjoint[1][0] = -(fm[(1, 0)] * fm[(2, 2)] - fm[(1, 2)] * fm[(2, 0)]);
        adjoint[2][0] = fm[(1, 0)] * fm[(2, 1)] - fm[(1, 1)] * fm[(2, 0)];
        adjoint[0][1] = -(fm[(0, 1)] * fm[(2, 2)] - fm[(0, 2)] * fm[(2, 1)]);
        adjoint[1][1] = fm[(0, 0)] * fm[(2, 2)] - fm[(0, 2)] * fm[(2, 0)];
        adjoint[2][1] = -(fm[(0, 0)] * fm[(2, 1)] - fm[(0, 1)] * fm[(2, 0)]);
        adjoint[0][2] = fm[(0, 1)] * fm[(1, 2)] - fm[(0, 2)] * fm[(1, 1)];
        adjoint[1][2] = -(fm[(0, 0)] * fm[(1, 2)] - fm[(0, 2)] * fm[(1, 0)]);
        adjoint[2][2] = fm[(0, 0)] * fm[(1, 1)] - fm[(0, 1)] * fm[(1, 0)];

        let mut det = fm[(0, 0)] * adjoint[0][0]
            + fm[(0, 1)] * adjoint[1][0]
            + fm[(0, 2)] * adjoint[2][0];
        if det == 0.0 {
            det = SINGULAR_DETERMINANT;
        }

        let mut out = Self::zero();
        for (r, row) in adjoint.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                out.m[(r, c)] = value / det;
            }
        }
        out.m[(3, 3)] = fm[(3, 3)];

        let x = -fm[(0, 3)];
        let y = -fm[(1, 3)];
        let z = -fm[(2, 3)];
        for r in 0..3 {
            out.m[(r, 3)] = x * out.m[(r, 0)] + y * out.m[(r, 1)] + z * out.m[(r, 2)];
        }

        out
    }

    /// Inverse of any non-singular matrix, projections included.
    ///
    /// Full cofactor expansion; slower than [`Transform::affine_inverse`]. A
    /// zero determinant is replaced with [`SINGULAR_DETERMINANT`].
    pub fn inverse(&self) -> Self {
        let m = self.row_major();
        let inv = cofactors(&m);

        let mut det = m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12];
        if det == 0.0 {
            det = SINGULAR_DETERMINANT;
        }
        let det = 1.0 / det;

        let mut values = [0.0; 16];
        for (out, value) in values.iter_mut().zip(inv.iter()) {
            *out = value * det;
        }
        Self::from_row_major(&values)
    }

    fn row_major(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        for (i, value) in out.iter_mut().enumerate() {
            *value = self.m[(i / 4, i % 4)];
        }
        out
    }
}

/// Adjugate of a flat 4x4 matrix; `m[0] * adj[0] + m[1] * adj[4] + ...` is
/// its determinant.
fn cofactors(m: &[f64; 16]) -> [f64; 16] {
    let mut inv = [0.0; 16];

    inv[0] = m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15]
        + m[9] * m[7] * m[14]
        + m[13] * m[6] * m[11]
        - m[13] * m[7] * m[10];
    inv[4] = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15]
        - m[8] * m[7] * m[14]
        - m[12] * m[6] * m[11]
        + m[12] * m[7] * m[10];
    inv[8] = m[4] * m[9] * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15]
        + m[8] * m[7] * m[13]
        + m[12] * m[5] * m[11]
        - m[12] * m[7] * m[9];
    inv[12] = -m[4] * m[9] * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14]
        - m[8] * m[6] * m[13]
        - m[12] * m[5] * m[10]
        + m[12] * m[6] * m[9];
    inv[1] = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15]
        - m[9] * m[3] * m[14]
        - m[13] * m[2] * m[11]
        + m[13] * m[3] * m[10];
    inv[5] = m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15]
        + m[8] * m[3] * m[14]
        + m[12] * m[2] * m[11]
        - m[12] * m[3] * m[10];
    inv[9] = -m[0] * m[9] * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15]
        - m[8] * m[3] * m[13]
        - m[12] * m[1] * m[11]
        + m[12] * m[3] * m[9];
    inv[13] = m[0] * m[9] * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14]
        + m[8] * m[2] * m[13]
        + m[12] * m[1] * m[10]
        - m[12] * m[2] * m[9];
    inv[2] = m[1] * m[6] * m[15] - m[1] * m[7] * m[14] - m[5] * m[2] * m[15]
        + m[5] * m[3] * m[14]
        + m[13] * m[2] * m[7]
        - m[13] * m[3] * m[6];
    inv[6] = -m[0] * m[6] * m[15] + m[0] * m[7] * m[14] + m[4] * m[2] * m[15]
        - m[4] * m[3] * m[14]
        - m[12] * m[2] * m[7]
        + m[12] * m[3] * m[6];
    inv[10] = m[0] * m[5] * m[15] - m[0] * m[7] * m[13] - m[4] * m[1] * m[15]
        + m[4] * m[3] * m[13]
        + m[12] * m[1] * m[7]
        - m[12] * m[3] * m[5];
    inv[14] = -m[0] * m[5] * m[14] + m[0] * m[6] * m[13] + m[4] * m[1] * m[14]
        - m[4] * m[2] * m[13]
        - m[12] * m[1] * m[6]
        + m[12] * m[2] * m[5];
    inv[3] = -m[1] * m[6] * m[11] + m[1] * m[7] * m[10] + m[5] * m[2] * m[11]
        - m[5] * m[3] * m[10]
        - m[9] * m[2] * m[7]
        + m[9] * m[3] * m[6];
    inv[7] = m[0] * m[6] * m[11] - m[0] * m[7] * m[10] - m[4] * m[2] * m[11]
        + m[4] * m[3] * m[10]
        + m[8] * m[2] * m[7]
        - m[8] * m[3] * m[6];
    inv[11] = -m[0] * m[5] * m[11] + m[0] * m[7] * m[9] + m[4] * m[1] * m[11]
        - m[4] * m[3] * m[9]
        - m[8] * m[1] * m[7]
        + m[8] * m[3] * m[5];
    inv[15] = m[0] * m[5] * m[10] - m[0] * m[6] * m[9] - m[4] * m[1] * m[10]
        + m[4] * m[2] * m[9]
        + m[8] * m[1] * m[6]
        - m[8] * m[2] * m[5];

    inv
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Matrix4<f64>> for Transform {
    fn from(m: Matrix4<f64>) -> Self {
        Self { m }
    }
}

impl Index<(usize, usize)> for Transform {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.m[index]
    }
}

impl IndexMut<(usize, usize)> for Transform {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f64 {
        &mut self.m[index]
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        Transform { m: self.m * rhs.m }
    }
}

impl MulAssign for Transform {
    fn mul_assign(&mut self, rhs: Transform) {
        self.m *= rhs.m;
    }
}

impl Mul<Vector> for Transform {
    type Output = Vector;

    fn mul(self, v: Vector) -> Vector {
        Vector::from(self.m * nalgebra::Vector4::from(v))
    }
}
