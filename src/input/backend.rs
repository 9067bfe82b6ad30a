//! The polling contract shared by every input backend.

use std::collections::HashSet;

use crate::error::InputError;

use super::types::{Key, MouseButton, PointerFrame, RawEvent, MAX_BUTTONS};

/// Input capability set polled once per frame.
///
/// Key and button queries reflect the state latched by the last
/// [`Input::update`]. Movement and wheel queries return the delta since that
/// update and reset it, so asking twice without an update yields zero.
pub trait Input {
    /// Backend name, as used in configuration.
    fn name(&self) -> &'static str;

    fn initialize(&mut self) -> Result<(), InputError>;

    /// Polls the device. Never fails: a lost device is re-acquired once and
    /// otherwise the previous state is kept with zeroed deltas.
    fn update(&mut self);

    fn key_down(&self, key: Key) -> bool;

    fn key_up(&self, key: Key) -> bool {
        !self.key_down(key)
    }

    fn button_down(&self, button: MouseButton) -> bool;

    fn button_up(&self, button: MouseButton) -> bool {
        !self.button_down(button)
    }

    /// Relative pointer movement since the last update.
    fn movement(&mut self) -> (f32, f32);

    /// Wheel movement since the last update.
    fn wheel(&mut self) -> f32;

    /// Hands a platform event to the backend. Backends that read their
    /// device directly ignore it.
    fn feed(&mut self, _event: RawEvent) {}

    /// Takes this frame's pointer deltas and primary button state.
    fn pointer_frame(&mut self) -> PointerFrame {
        let (dx, dy) = self.movement();
        PointerFrame {
            dx,
            dy,
            wheel: self.wheel(),
            primary_down: self.button_down(MouseButton::LEFT),
        }
    }
}

/// Device state as reported by one poll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceState {
    pub keys: HashSet<Key>,
    pub buttons: [bool; MAX_BUTTONS],
    pub movement: (f32, f32),
    pub wheel: f32,
}

impl DeviceState {
    /// Copy of the held keys and buttons with no pending deltas.
    pub fn held(&self) -> Self {
        Self {
            keys: self.keys.clone(),
            buttons: self.buttons,
            movement: (0.0, 0.0),
            wheel: 0.0,
        }
    }

    pub fn set_key(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.keys.insert(key);
        } else {
            self.keys.remove(&key);
        }
    }

    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        if let Some(slot) = self.buttons.get_mut(button.index()) {
            *slot = pressed;
        }
    }

    pub fn release_all(&mut self) {
        self.keys.clear();
        self.buttons = [false; MAX_BUTTONS];
    }
}

/// A native input device behind a backend.
pub trait InputSource {
    /// Tries to (re)gain access to the device.
    fn acquire(&mut self) -> Result<(), InputError>;

    /// Updates `state` from the device: held keys and buttons are rewritten
    /// and movement/wheel are accumulated since the previous poll.
    fn poll(&mut self, state: &mut DeviceState) -> Result<(), InputError>;

    fn push(&mut self, event: RawEvent);
}

/// [`Input`] implementation over any [`InputSource`].
pub struct PolledInput<S: InputSource> {
    name: &'static str,
    source: S,
    state: DeviceState,
    movement: (f32, f32),
    wheel: f32,
}

impl<S: InputSource> PolledInput<S> {
    pub fn new(name: &'static str, source: S) -> Self {
        Self {
            name,
            source,
            state: DeviceState::default(),
            movement: (0.0, 0.0),
            wheel: 0.0,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    fn poll_once(&mut self) -> Result<DeviceState, InputError> {
        let mut next = self.state.held();
        self.source.poll(&mut next)?;
        Ok(next)
    }
}

impl<S: InputSource> Input for PolledInput<S> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn initialize(&mut self) -> Result<(), InputError> {
        self.source.acquire()?;
        self.state = DeviceState::default();
        self.movement = (0.0, 0.0);
        self.wheel = 0.0;
        log::debug!("Input backend `{}` initialized", self.name);
        Ok(())
    }

    fn update(&mut self) {
        let polled = match self.poll_once() {
            Err(InputError::NotAcquired) => {
                self.source.acquire().and_then(|()| self.poll_once())
            }
            other => other,
        };

        match polled {
            Ok(next) => {
                self.movement = next.movement;
                self.wheel = next.wheel;
                self.state = next;
            }
            Err(err) => {
                log::debug!("Input backend `{}` degraded: {}", self.name, err);
                self.movement = (0.0, 0.0);
                self.wheel = 0.0;
            }
        }
    }

    fn key_down(&self, key: Key) -> bool {
        self.state.keys.contains(&key)
    }

    fn button_down(&self, button: MouseButton) -> bool {
        self.state
            .buttons
            .get(button.index())
            .copied()
            .unwrap_or(false)
    }

    fn movement(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.movement)
    }

    fn wheel(&mut self) -> f32 {
        std::mem::take(&mut self.wheel)
    }

    fn feed(&mut self, event: RawEvent) {
        self.source.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::sources::ScriptedSource;

    fn moved(dx: f32, dy: f32) -> DeviceState {
        DeviceState {
            movement: (dx, dy),
            ..DeviceState::default()
        }
    }

    #[test]
    fn test_second_movement_query_is_zero() {
        let mut source = ScriptedSource::new();
        source.queue(Ok(moved(3.0, -2.0)));
        let mut input = PolledInput::new("scripted", source);
        input.initialize().unwrap();
        input.update();
        assert_eq!(input.movement(), (3.0, -2.0));
        assert_eq!(input.movement(), (0.0, 0.0));
    }

    #[test]
    fn test_not_acquired_retries_once() {
        let mut source = ScriptedSource::new();
        source.queue(Err(InputError::NotAcquired));
        source.queue(Ok(moved(1.0, 1.0)));
        let mut input = PolledInput::new("scripted", source);
        input.update();
        assert_eq!(input.source().acquire_calls(), 1);
        assert_eq!(input.movement(), (1.0, 1.0));
    }

    #[test]
    fn test_failed_retry_degrades_to_stale_state() {
        let mut source = ScriptedSource::new();
        let mut held = moved(5.0, 5.0);
        held.keys.insert(Key::W);
        source.queue(Ok(held));
        source.queue(Err(InputError::NotAcquired));
        source.queue(Err(InputError::NotAcquired));
        source.queue(Ok(moved(9.0, 9.0)));
        let mut input = PolledInput::new("scripted", source);

        input.update();
        assert!(input.key_down(Key::W));
        assert_eq!(input.movement(), (5.0, 5.0));

        input.update();
        assert_eq!(input.source().acquire_calls(), 1);
        assert!(input.key_down(Key::W));
        assert_eq!(input.movement(), (0.0, 0.0));
        assert_eq!(input.wheel(), 0.0);

        input.update();
        assert_eq!(input.movement(), (9.0, 9.0));
    }

    #[test]
    fn test_pointer_frame_samples_buttons() {
        let mut source = ScriptedSource::new();
        let mut state = moved(2.0, 0.0);
        state.buttons[0] = true;
        state.wheel = 1.5;
        source.queue(Ok(state));
        let mut input = PolledInput::new("scripted", source);
        input.update();

        let frame = input.pointer_frame();
        assert!(frame.primary_down);
        assert_eq!((frame.dx, frame.dy, frame.wheel), (2.0, 0.0, 1.5));
        assert_eq!(input.pointer_frame().wheel, 0.0);
        assert!(input.key_up(Key::Space));
        assert!(input.button_up(MouseButton::RIGHT));
    }
}
