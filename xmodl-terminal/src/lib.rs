/// Terminal-based ASCII viewer for XMODL scene models
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use xmodl_core::{SceneModel, Transform};

pub mod camera;
pub mod demo;
pub mod renderer;

pub use camera::{Camera, RotationState};
pub use renderer::AsciiRenderer;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    model: SceneModel,
    rotation: RotationState,
    camera: Camera,
    renderer: AsciiRenderer,
    /// Bone spun by the animation, if the model has one by this name
    animated_bone: Option<String>,
    spin: f64,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mut model: SceneModel) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let camera = Camera::for_model(&mut model, width as u32, height as u32);

        Ok(Self {
            model,
            rotation: RotationState::new(0.0, 20.0, 0.0),
            camera,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            animated_bone: None,
            spin: 0.0,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    /// Spin the named bone about its local Y axis every frame
    pub fn animate_bone(mut self, name: impl Into<String>) -> Self {
        self.animated_bone = Some(name.into());
        self
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            if event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            // Update
            self.update();

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        match event::read()? {
            Event::Key(KeyEvent { code, .. }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Char('w') | KeyCode::Up => {
                    self.rotation.rotate(5.0, 0.0, 0.0);
                }
                KeyCode::Char('s') | KeyCode::Down => {
                    self.rotation.rotate(-5.0, 0.0, 0.0);
                }
                KeyCode::Char('a') | KeyCode::Left => {
                    self.rotation.rotate(0.0, -5.0, 0.0);
                }
                KeyCode::Char('d') | KeyCode::Right => {
                    self.rotation.rotate(0.0, 5.0, 0.0);
                }
                KeyCode::Char('e') => {
                    self.rotation.rotate(0.0, 0.0, 5.0);
                }
                KeyCode::Char('r') => {
                    self.rotation.rotate(0.0, 0.0, -5.0);
                }
                _ => {}
            },
            Event::Resize(width, height) => {
                self.renderer = AsciiRenderer::new(width as usize, height as usize);
                self.camera.resize(width as u32, height as u32);
            }
            _ => {}
        }
        Ok(())
    }

    fn update(&mut self) {
        // Continuous slow turn for demo effect
        self.rotation.rotate(0.0, 0.5, 0.0);
        self.model.set_placement(self.rotation.transform());

        self.spin = (self.spin + 6.0) % 360.0;
        if let Some(name) = &self.animated_bone {
            if let Some(bone) = self.model.bone_mut(name) {
                bone.set_local_transform(Transform::rotate_y(self.spin));
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.begin_frame(&self.camera);
        draw_model(&mut self.model, &mut self.renderer);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "XMODL Terminal Viewer | FPS: {:.1} | Triangles: {} | WASD/Arrows=Rotate E/R=Roll Q=Quit",
                self.fps,
                self.renderer.triangles_drawn()
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Render `model` once into a fresh off-screen buffer
pub fn render_once(model: &mut SceneModel, camera: &Camera, width: usize, height: usize) -> AsciiRenderer {
    let mut renderer = AsciiRenderer::new(width, height);
    renderer.begin_frame(camera);
    draw_model(model, &mut renderer);
    renderer
}

/// Cull with the model's winding override in force, then restore
fn draw_model(model: &mut SceneModel, renderer: &mut AsciiRenderer) {
    let winding = model.winding_override();
    renderer.set_front_face(winding.during);
    let restore = model.draw(renderer).restore;
    renderer.set_front_face(restore);
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmodl_core::{FrontFace, NoTextures};

    fn demo_model() -> SceneModel {
        let mut model = SceneModel::new();
        model.load_from(&demo::scene(), &mut NoTextures).unwrap();
        model
    }

    #[test]
    fn test_demo_renders_visible_faces_only() {
        let mut model = demo_model();
        let camera = Camera::for_model(&mut model, 80, 40);
        let renderer = render_once(&mut model, &camera, 80, 40);

        // Two cubes seen from above and in front: three faces each at most
        let drawn = renderer.triangles_drawn();
        assert!(drawn > 0);
        assert!(drawn <= 12);
        assert_eq!(renderer.front_face(), FrontFace::CounterClockwise);
    }

    #[test]
    fn test_demo_center_is_covered() {
        let mut model = demo_model();
        let camera = Camera::for_model(&mut model, 80, 40);
        let renderer = render_once(&mut model, &camera, 80, 40);
        assert_ne!(renderer.char_at(40, 20), Some(' '));
    }
}
