/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Point3, Vector2, Vector3};
use std::io::Write;
use xmodl_core::{Effect, FrontFace, Renderer, Transform, Vector};

use crate::camera::Camera;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Lowest brightness a lit face can get, so back-lit faces stay visible
const AMBIENT: f64 = 0.15;

/// One projected triangle corner
#[derive(Debug, Clone, Copy)]
struct Corner {
    screen: (f64, f64, f64),
    eye: Vector,
    normal: Vector,
}

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f64>,
    char_buffer: Vec<char>,
    view: Transform,
    projection: Transform,
    stack: Vec<Transform>,
    front_face: FrontFace,
    material_weight: f64,
    normal: Vector3<f32>,
    pending: Vec<Corner>,
    triangles_drawn: usize,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f64::INFINITY; size],
            char_buffer: vec![' '; size],
            view: Transform::identity(),
            projection: Transform::identity(),
            stack: vec![Transform::identity()],
            front_face: FrontFace::CounterClockwise,
            material_weight: 1.0,
            normal: Vector3::zeros(),
            pending: Vec::with_capacity(3),
            triangles_drawn: 0,
        }
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f64::INFINITY);
        self.char_buffer.fill(' ');
        self.stack.truncate(1);
        self.stack[0] = Transform::identity();
        self.pending.clear();
        self.triangles_drawn = 0;
    }

    /// Set up view and projection for the next frame
    pub fn begin_frame(&mut self, camera: &Camera) {
        self.clear();
        self.view = camera.view_transform();
        self.projection = camera.projection_transform();
    }

    /// Winding treated as front facing; the other side is culled
    pub fn set_front_face(&mut self, front_face: FrontFace) {
        self.front_face = front_face;
    }

    pub fn front_face(&self) -> FrontFace {
        self.front_face
    }

    /// Triangles rasterized since the last clear
    pub fn triangles_drawn(&self) -> usize {
        self.triangles_drawn
    }

    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        if x < self.width && y < self.height {
            Some(self.char_buffer[y * self.width + x])
        } else {
            None
        }
    }

    fn top(&self) -> Transform {
        self.stack.last().copied().unwrap_or_default()
    }

    fn project(&self, eye: &Vector) -> Option<(f64, f64, f64)> {
        let clip = self.projection * *eye;

        // Behind or on the eye plane
        if clip.w < 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        let screen_x = (ndc_x + 1.0) * 0.5 * self.width as f64;
        let screen_y = (1.0 - ndc_y) * 0.5 * self.height as f64;

        Some((screen_x, screen_y, depth))
    }

    fn render_triangle(&mut self, corners: [Corner; 3]) {
        let [a, b, c] = corners.map(|c| c.screen);

        // Screen y points down, so positive area here is clockwise in NDC
        let area = (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0);
        let winding = if area > 0.0 {
            FrontFace::Clockwise
        } else {
            FrontFace::CounterClockwise
        };
        if area.abs() < 1e-9 || winding != self.front_face {
            return;
        }

        let character = LUMINOSITY_RAMP[self.ramp_index(&corners)];
        self.rasterize_triangle(&[a, b, c], character);
        self.triangles_drawn += 1;
    }

    /// Lambert term against a light at the eye, weighted by the material
    fn ramp_index(&self, corners: &[Corner; 3]) -> usize {
        let mut normal = corners
            .iter()
            .fold(Vector::ZERO, |sum, c| sum + c.normal)
            .normalize3();
        if normal.length_squared3() < 1e-12 {
            let [a, b, c] = corners.map(|c| c.eye);
            normal = (b - a).cross3(&(c - a)).normalize3();
            // Culling has already kept only faces toward the eye
            if normal.z < 0.0 {
                normal = -normal;
            }
        }

        let lambert = normal.dot3(&Vector::direction(0.0, 0.0, 1.0)).max(0.0);
        let brightness = (AMBIENT + (1.0 - AMBIENT) * lambert) * self.material_weight;

        let last = LUMINOSITY_RAMP.len() - 1;
        ((brightness * last as f64).round() as usize).clamp(1, last)
    }

    fn rasterize_triangle(&mut self, coords: &[(f64, f64, f64); 3], character: char) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor().max(0.0) as usize;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil().min(self.width as f64 - 1.0);
        let min_y = v0.1.min(v1.1).min(v2.1).floor().max(0.0) as usize;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil().min(self.height as f64 - 1.0);
        if max_x < 0.0 || max_y < 0.0 {
            return;
        }
        let (max_x, max_y) = (max_x as usize, max_y as usize);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f64 + 0.5, y as f64 + 0.5);
                let Some((w0, w1, w2)) = barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), p)
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y * self.width + x;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Renderer for AsciiRenderer {
    fn push_transform(&mut self) {
        let top = self.top();
        self.stack.push(top);
    }

    fn pop_transform(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        } else {
            log::warn!("Transform stack underflow");
        }
    }

    fn multiply_transform(&mut self, t: &Transform) {
        if let Some(top) = self.stack.last_mut() {
            *top *= *t;
        }
    }

    fn set_material(&mut self, effect: &Effect) {
        let [r, g, b, a] = effect.diffuse;
        // Unset diffuse (alpha 0) renders at full weight
        self.material_weight = if a == 0.0 {
            1.0
        } else {
            (0.299 * r + 0.587 * g + 0.114 * b).clamp(0.2, 1.0) as f64
        };
    }

    fn end_material(&mut self, _effect: &Effect) {
        self.material_weight = 1.0;
    }

    fn begin_triangle_batch(&mut self) {
        self.pending.clear();
        self.normal = Vector3::zeros();
    }

    fn end_triangle_batch(&mut self) {
        self.pending.clear();
    }

    fn emit_tex_coord(&mut self, _uv: &Vector2<f32>) {}

    fn emit_normal(&mut self, n: &Vector3<f32>) {
        self.normal = *n;
    }

    fn emit_vertex(&mut self, v: &Point3<f32>) {
        let model_view = self.view * self.top();
        let eye = model_view * Vector::from(*v);
        let n = &self.normal;
        let normal = (model_view
            * Vector::direction(n.x as f64, n.y as f64, n.z as f64))
        .normalize3();

        // Corners behind the eye drop their whole triangle
        let screen = self
            .project(&eye)
            .unwrap_or((f64::NAN, f64::NAN, f64::NAN));

        self.pending.push(Corner { screen, eye, normal });
        self.flush_triangle();
    }
}

impl AsciiRenderer {
    fn flush_triangle(&mut self) {
        if self.pending.len() < 3 {
            return;
        }
        let corners = [self.pending[0], self.pending[1], self.pending[2]];
        self.pending.clear();
        if corners.iter().any(|c| c.screen.0.is_nan()) {
            return;
        }
        self.render_triangle(corners);
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> AsciiRenderer {
        let mut r = AsciiRenderer::new(40, 20);
        r.begin_frame(&Camera::new(40, 40));
        r
    }

    /// Counter-clockwise as seen from the default camera
    fn facing_triangle(r: &mut AsciiRenderer) {
        r.begin_triangle_batch();
        r.emit_normal(&Vector3::z());
        r.emit_vertex(&Point3::new(-1.0, -1.0, 0.0));
        r.emit_vertex(&Point3::new(1.0, -1.0, 0.0));
        r.emit_vertex(&Point3::new(0.0, 1.0, 0.0));
        r.end_triangle_batch();
    }

    fn filled(r: &AsciiRenderer) -> usize {
        r.char_buffer.iter().filter(|c| **c != ' ').count()
    }

    #[test]
    fn test_barycentric_center() {
        let (w0, w1, w2) = barycentric((0.0, 0.0), (3.0, 0.0), (0.0, 3.0), (1.0, 1.0)).unwrap();
        assert!((w0 - 1.0 / 3.0).abs() < 1e-12);
        assert!((w1 - 1.0 / 3.0).abs() < 1e-12);
        assert!((w2 - 1.0 / 3.0).abs() < 1e-12);
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }

    #[test]
    fn test_front_face_culling() {
        let mut r = renderer();
        r.set_front_face(FrontFace::CounterClockwise);
        facing_triangle(&mut r);
        assert_eq!(r.triangles_drawn(), 1);
        assert!(filled(&r) > 0);

        let mut r = renderer();
        r.set_front_face(FrontFace::Clockwise);
        facing_triangle(&mut r);
        assert_eq!(r.triangles_drawn(), 0);
        assert_eq!(filled(&r), 0);
    }

    #[test]
    fn test_center_pixel_is_lit() {
        let mut r = renderer();
        facing_triangle(&mut r);
        let c = r.char_at(20, 10).unwrap();
        assert_eq!(c, '@');
    }

    #[test]
    fn test_transform_stack() {
        let mut r = renderer();
        r.push_transform();
        r.multiply_transform(&Transform::translate(0.0, 0.0, 10.0));
        // Now behind the camera
        facing_triangle(&mut r);
        assert_eq!(r.triangles_drawn(), 0);
        r.pop_transform();

        facing_triangle(&mut r);
        assert_eq!(r.triangles_drawn(), 1);

        r.pop_transform();
        assert_eq!(r.stack.len(), 1);
    }

    #[test]
    fn test_dark_material_uses_dimmer_characters() {
        let mut r = renderer();
        r.set_material(&Effect {
            diffuse: [0.2, 0.2, 0.2, 1.0],
            ..Default::default()
        });
        facing_triangle(&mut r);
        let c = r.char_at(20, 10).unwrap();
        assert_ne!(c, '@');
        assert_ne!(c, ' ');
    }

    #[test]
    fn test_incomplete_triangle_discarded() {
        let mut r = renderer();
        r.begin_triangle_batch();
        r.emit_vertex(&Point3::new(-1.0, -1.0, 0.0));
        r.emit_vertex(&Point3::new(1.0, -1.0, 0.0));
        r.end_triangle_batch();
        facing_triangle(&mut r);
        assert_eq!(r.triangles_drawn(), 1);
    }
}
