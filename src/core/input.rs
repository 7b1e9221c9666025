use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Pixels scrolled per wheel line or arrow press
pub const LINE_PX: f32 = 120.0;
/// Pixels scrolled per PageUp / PageDown
pub const PAGE_PX: f32 = 900.0;

/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    LineUp,
    LineDown,
    PageUp,
    PageDown,
    Home,
    End,
    Space,
    Escape,
}

/// What the host should do in response to input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputCommand {
    /// New virtual page offset in pixels
    Scroll(f32),
    ToggleActive,
    Quit,
}

/// Virtual page scroll driven by wheel and keyboard
#[derive(Debug, Clone)]
pub struct ScrollController {
    offset: f32,
    range: f32,
}

impl ScrollController {
    pub fn new(range: f32) -> Self {
        Self {
            offset: 0.0,
            range: range.max(0.0),
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    /// Process a Winit WindowEvent
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<InputCommand> {
        match event {
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match event.physical_key {
                    PhysicalKey::Code(code) => Self::keycode_to_button(code).and_then(|b| self.press(b)),
                    _ => None,
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let px = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_PX,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                };
                self.scroll_by(px)
            }
            _ => None,
        }
    }

    pub fn press(&mut self, button: Button) -> Option<InputCommand> {
        match button {
            Button::LineUp => self.scroll_by(-LINE_PX),
            Button::LineDown => self.scroll_by(LINE_PX),
            Button::PageUp => self.scroll_by(-PAGE_PX),
            Button::PageDown => self.scroll_by(PAGE_PX),
            Button::Home => self.scroll_to(0.0),
            Button::End => self.scroll_to(self.range),
            Button::Space => Some(InputCommand::ToggleActive),
            Button::Escape => Some(InputCommand::Quit),
        }
    }

    pub fn scroll_by(&mut self, px: f32) -> Option<InputCommand> {
        self.scroll_to(self.offset + px)
    }

    /// Clamp to the page; no command when the offset does not move
    pub fn scroll_to(&mut self, px: f32) -> Option<InputCommand> {
        if !px.is_finite() {
            return None;
        }
        let next = px.clamp(0.0, self.range);
        if next == self.offset {
            return None;
        }
        self.offset = next;
        Some(InputCommand::Scroll(next))
    }

    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::ArrowUp => Some(Button::LineUp),
            KeyCode::ArrowDown => Some(Button::LineDown),
            KeyCode::PageUp => Some(Button::PageUp),
            KeyCode::PageDown => Some(Button::PageDown),
            KeyCode::Home => Some(Button::Home),
            KeyCode::End => Some(Button::End),
            KeyCode::Space => Some(Button::Space),
            KeyCode::Escape => Some(Button::Escape),
            _ => None,
        }
    }
}
