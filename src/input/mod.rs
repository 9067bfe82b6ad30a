//! Input subsystem.
//!
//! A backend implements [`Input`]: keys and buttons are latched once per
//! frame by `update`, and pointer movement is reported as a delta that
//! resets after each query. Backends are picked at runtime with
//! [`create_input`].
//!
//! Platform events reach a backend through [`Input::feed`] after
//! translation by [`platform::winit`].

mod backend;
mod sources;
mod types;

pub mod platform;

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

pub use backend::{DeviceState, Input, InputSource, PolledInput};
pub use sources::{ConsoleInput, PointerSource, ScriptedSource, X11Source};
pub use types::{Key, MouseButton, PointerFrame, RawEvent, MAX_BUTTONS};

/// Available input backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputBackendKind {
    /// Relative pointer device, needs window focus.
    #[default]
    Pointer,
    /// Absolute cursor positions turned into deltas.
    X11,
    /// No input.
    Console,
}

impl FromStr for InputBackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pointer" => Ok(Self::Pointer),
            "x11" => Ok(Self::X11),
            "console" => Ok(Self::Console),
            _ => Err(ConfigError::UnknownInputBackend(s.to_string())),
        }
    }
}

impl fmt::Display for InputBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pointer => "pointer",
            Self::X11 => "x11",
            Self::Console => "console",
        };
        f.write_str(name)
    }
}

/// Creates the backend for `kind`. The result still needs `initialize`.
pub fn create_input(kind: InputBackendKind) -> Box<dyn Input> {
    match kind {
        InputBackendKind::Pointer => Box::new(PolledInput::new("pointer", PointerSource::new())),
        InputBackendKind::X11 => Box::new(PolledInput::new("x11", X11Source::new())),
        InputBackendKind::Console => Box::new(ConsoleInput),
    }
}
