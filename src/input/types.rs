use std::fmt;

/// Keyboard key identifier.
///
/// Platform glue maps native key codes into these variants where possible;
/// anything else becomes `Key::Unknown` with a stable platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Number of mouse buttons tracked by the backends.
pub const MAX_BUTTONS: usize = 8;

/// Mouse button by index: 0 left, 1 right, 2 middle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MouseButton(pub u8);

impl MouseButton {
    pub const LEFT: MouseButton = MouseButton(0);
    pub const RIGHT: MouseButton = MouseButton(1);
    pub const MIDDLE: MouseButton = MouseButton(2);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Platform-agnostic input event fed to a backend source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawEvent {
    Key { key: Key, pressed: bool },
    Button { button: MouseButton, pressed: bool },
    /// Relative pointer motion reported by the device.
    Motion { dx: f32, dy: f32 },
    /// Absolute cursor position inside the window.
    Cursor { x: f32, y: f32 },
    /// Wheel movement in lines, positive away from the user.
    Wheel { delta: f32 },
    Focus(bool),
}

/// Pointer state sampled once per frame by a scene's update step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerFrame {
    pub dx: f32,
    pub dy: f32,
    pub wheel: f32,
    pub primary_down: bool,
}
