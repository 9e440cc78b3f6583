use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Cursor travel in pixels below which a press/release pair counts as a click
/// rather than an orbit drag.
pub const CLICK_DRAG_THRESHOLD: f32 = 4.0;

/// Tracks pointer state between frames.
pub struct Input {
    mouse_buttons_down: HashSet<MouseButton>,
    mouse_position: Vec2,
    mouse_delta: Vec2,
    scroll_delta: Vec2,
    /// Cursor travel since the left button went down.
    left_travel: Option<f32>,
    clicks: Vec<Vec2>,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            mouse_buttons_down: HashSet::new(),
            mouse_position: Vec2::ZERO,
            mouse_delta: Vec2::ZERO,
            scroll_delta: Vec2::ZERO,
            left_travel: None,
            clicks: Vec::new(),
        }
    }
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call after each frame to reset per-frame state.
    pub fn begin_frame(&mut self) {
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
    }

    /// Process a window event and update input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.press(*button),
                ElementState::Released => self.release(*button),
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let d = match delta {
                    MouseScrollDelta::LineDelta(x, y) => Vec2::new(*x, *y),
                    MouseScrollDelta::PixelDelta(pos) => {
                        Vec2::new(pos.x as f32, pos.y as f32) / 120.0
                    }
                };
                self.scroll(d);
            }
            WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false) => {
                self.mouse_buttons_down.clear();
                self.left_travel = None;
            }
            _ => {}
        }
    }

    pub fn press(&mut self, button: MouseButton) {
        self.mouse_buttons_down.insert(button);

        if button == MouseButton::Left {
            self.left_travel = Some(0.0);
        }
    }

    pub fn release(&mut self, button: MouseButton) {
        self.mouse_buttons_down.remove(&button);

        if button == MouseButton::Left {
            if let Some(travel) = self.left_travel.take() {
                if travel < CLICK_DRAG_THRESHOLD {
                    self.clicks.push(self.mouse_position);
                }
            }
        }
    }

    pub fn move_cursor(&mut self, position: Vec2) {
        let delta = position - self.mouse_position;
        self.mouse_delta += delta;
        self.mouse_position = position;

        if let Some(travel) = self.left_travel.as_mut() {
            *travel += delta.length();
        }
    }

    pub fn scroll(&mut self, delta: Vec2) {
        self.scroll_delta += delta;
    }

    /// Returns true if the mouse button is currently held down.
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons_down.contains(&button)
    }

    /// Mouse movement delta this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Scroll wheel delta this frame (in "lines").
    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll_delta
    }

    /// Drain the left clicks completed since the last call, oldest first.
    pub fn take_clicks(&mut self) -> Vec<Vec2> {
        std::mem::take(&mut self.clicks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_release_in_place_is_a_click() {
        let mut input = Input::new();
        input.move_cursor(Vec2::new(100.0, 50.0));
        input.press(MouseButton::Left);
        input.move_cursor(Vec2::new(101.0, 51.0));
        input.release(MouseButton::Left);

        assert_eq!(input.take_clicks(), vec![Vec2::new(101.0, 51.0)]);
        assert!(input.take_clicks().is_empty());
    }

    #[test]
    fn dragging_is_not_a_click() {
        let mut input = Input::new();
        input.press(MouseButton::Left);
        input.move_cursor(Vec2::new(30.0, 0.0));
        assert!(input.mouse_down(MouseButton::Left));
        input.release(MouseButton::Left);

        assert!(input.take_clicks().is_empty());
        assert!(!input.mouse_down(MouseButton::Left));
    }

    #[test]
    fn right_button_never_clicks() {
        let mut input = Input::new();
        input.press(MouseButton::Right);
        input.release(MouseButton::Right);
        assert!(input.take_clicks().is_empty());
        assert!(!input.mouse_down(MouseButton::Right));
    }

    #[test]
    fn begin_frame_resets_deltas_but_not_buttons() {
        let mut input = Input::new();
        input.press(MouseButton::Left);
        input.move_cursor(Vec2::new(3.0, 4.0));
        input.scroll(Vec2::new(0.0, 1.0));
        assert_eq!(input.mouse_delta(), Vec2::new(3.0, 4.0));

        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
        assert_eq!(input.scroll_delta(), Vec2::ZERO);
        assert!(input.mouse_down(MouseButton::Left));
    }
}
