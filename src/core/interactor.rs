use log::{info, warn};
use crate::core::pbrt::{Float, radians};
use crate::core::renderer::Renderer;
use crate::core::renderwindow::RenderWindow;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MouseButton { Left, Middle, Right }

/// Window events in pixel coordinates, y growing downwards.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Event {
    MouseDown { button: MouseButton, x: Float, y: Float },
    MouseUp { button: MouseButton },
    MouseMove { x: Float, y: Float },
    /// Positive when scrolling forward
    Wheel(Float),
    Key(char),
    Escape
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Render,
    Exit
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum State { Idle, Rotate, Pan, Dolly }

/// Camera manipulation: left drag rotates around the focal point, middle
/// drag pans, right drag and the wheel dolly.
#[derive(Debug, Clone)]
pub struct InteractorStyleTrackballCamera {
    pub motion_factor   : Float,
    state               : State,
    last                : (Float, Float)
}

impl Default for InteractorStyleTrackballCamera {
    fn default() -> Self {
        Self { motion_factor: 10.0, state: State::Idle, last: (0.0, 0.0) }
    }
}

impl InteractorStyleTrackballCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: &Event, renderer: &mut Renderer, size: (usize, usize)) -> Action {
        let (w, h) = (size.0.max(1) as Float, size.1.max(1) as Float);

        match *event {
            Event::MouseDown { button, x, y } => {
                self.state = match button {
                    MouseButton::Left   => State::Rotate,
                    MouseButton::Middle => State::Pan,
                    MouseButton::Right  => State::Dolly
                };
                self.last = (x, y);
                Action::None
            }
            Event::MouseUp { .. } => {
                self.state = State::Idle;
                Action::None
            }
            Event::MouseMove { x, y } => {
                let (dx, dy) = (x - self.last.0, y - self.last.1);
                self.last = (x, y);

                if dx == 0.0 && dy == 0.0 { return Action::None; }

                match self.state {
                    State::Idle   => return Action::None,
                    State::Rotate => self.rotate(renderer, dx, dy, w, h),
                    State::Pan    => self.pan(renderer, dx, dy, h),
                    State::Dolly  => {
                        let factor = (1.1 as Float).powf(self.motion_factor * -dy / (0.5 * h));
                        renderer.active_camera_mut().dolly(factor);
                    }
                }

                Action::Render
            }
            Event::Wheel(delta) => {
                let factor = (1.1 as Float).powf(self.motion_factor * 0.2 * delta);
                renderer.active_camera_mut().dolly(factor);
                Action::Render
            }
            Event::Key('r') | Event::Key('R') => {
                renderer.reset_camera();
                Action::Render
            }
            Event::Key('q') | Event::Key('Q') | Event::Key('e') | Event::Key('E') | Event::Escape =>
                Action::Exit,
            Event::Key(_) => Action::None
        }
    }

    fn rotate(&self, renderer: &mut Renderer, dx: Float, dy: Float, w: Float, h: Float) {
        let delta_azimuth = -20.0 / w;
        let delta_elevation = 20.0 / h;
        let camera = renderer.active_camera_mut();

        camera.azimuth(dx * delta_azimuth * self.motion_factor);
        camera.elevation(dy * delta_elevation * self.motion_factor);
        camera.orthogonalize_view_up();
    }

    fn pan(&self, renderer: &mut Renderer, dx: Float, dy: Float, h: Float) {
        let camera = renderer.active_camera_mut();
        let dop = camera.direction_of_projection();
        let right = dop.cross(&camera.view_up).normalize();
        let up = right.cross(&dop);
        // World units per pixel at the focal distance
        let scale = 2.0 * camera.distance() * (radians(camera.view_angle) * 0.5).tan() / h;

        camera.pan(&(right * (-dx * scale) + up * (dy * scale)));
    }
}

/// Runs the event loop for a render window.
pub struct RenderWindowInteractor<'a> {
    window  : &'a mut RenderWindow,
    pub style   : InteractorStyleTrackballCamera
}

impl<'a> RenderWindowInteractor<'a> {
    pub fn new(window: &'a mut RenderWindow) -> Self {
        Self { window, style: InteractorStyleTrackballCamera::default() }
    }

    pub fn window(&mut self) -> &mut RenderWindow { &mut *self.window }

    /// Route one event to the first renderer; re-renders when the camera moved.
    pub fn process_event(&mut self, event: &Event) -> Action {
        let size = self.window.size();

        let action = match self.window.renderers_mut().first_mut() {
            Some(r) => self.style.handle(event, r, size),
            None => match event {
                Event::Escape | Event::Key('q') | Event::Key('e') => Action::Exit,
                _ => Action::None
            }
        };

        if action == Action::Render {
            self.window.render();
        }

        action
    }

    /// Blocks until the window is closed.
    #[cfg(feature = "interactive")]
    pub fn start(&mut self) {
        use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};
        use crate::core::pbrt::to_byte;

        let (w, h) = self.window.size();
        let mut window = match Window::new("pbr-hdr-environment", w, h, WindowOptions::default()) {
            Ok(win) => win,
            Err(e) => {
                warn!("Unable to open interactor window: {}", e);
                return;
            }
        };
        window.limit_update_rate(Some(std::time::Duration::from_micros(16600)));
        info!("Interactor started; press q or Escape to exit");

        let buttons = [
            (minifb::MouseButton::Left, MouseButton::Left),
            (minifb::MouseButton::Middle, MouseButton::Middle),
            (minifb::MouseButton::Right, MouseButton::Right)
        ];
        let mut down = [false; 3];
        let mut buffer = vec![0_u32; w * h];

        while window.is_open() {
            let mut events = Vec::new();

            if let Some((x, y)) = window.get_mouse_pos(MouseMode::Discard) {
                for (i, (mb, b)) in buttons.iter().enumerate() {
                    let is_down = window.get_mouse_down(*mb);

                    if is_down && !down[i] {
                        events.push(Event::MouseDown { button: *b, x, y });
                    } else if !is_down && down[i] {
                        events.push(Event::MouseUp { button: *b });
                    }

                    down[i] = is_down;
                }

                events.push(Event::MouseMove { x, y });
            }

            if let Some((_, dy)) = window.get_scroll_wheel() {
                events.push(Event::Wheel(dy));
            }

            for k in window.get_keys_pressed(KeyRepeat::No) {
                match k {
                    Key::Escape => events.push(Event::Escape),
                    Key::Q => events.push(Event::Key('q')),
                    Key::E => events.push(Event::Key('e')),
                    Key::R => events.push(Event::Key('r')),
                    _ => ()
                }
            }

            if events.iter().any(|e| self.process_event(e) == Action::Exit) {
                break;
            }

            let film = self.window.film();

            for (dst, p) in buffer.iter_mut().zip(film.pixels()) {
                let (r, g, b) = (to_byte(p[0]) as u32, to_byte(p[1]) as u32, to_byte(p[2]) as u32);
                *dst = (r << 16) | (g << 8) | b;
            }

            if let Err(e) = window.update_with_buffer(&buffer, w, h) {
                warn!("Interactor window update failed: {}", e);
                break;
            }
        }

        info!("Interactor finished");
    }

    /// Without a display backend there is no event loop to run.
    #[cfg(not(feature = "interactive"))]
    pub fn start(&mut self) {
        warn!("Built without the \"interactive\" feature; skipping the interactor");
        info!("Interactor finished");
    }
}
