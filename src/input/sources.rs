//! Concrete input sources.

use std::collections::VecDeque;

use crate::error::InputError;

use super::backend::{DeviceState, Input, InputSource};
use super::types::{Key, MouseButton, RawEvent};

/// Desktop pointer backend: relative device motion, acquired while the
/// window has focus.
///
/// Losing focus drops acquisition and discards buffered events. The next
/// poll reports [`InputError::NotAcquired`] until focus returns.
#[derive(Debug)]
pub struct PointerSource {
    pending: VecDeque<RawEvent>,
    focused: bool,
    acquired: bool,
}

impl PointerSource {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            focused: true,
            acquired: false,
        }
    }

    pub fn is_acquired(&self) -> bool {
        self.acquired
    }
}

impl Default for PointerSource {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for PointerSource {
    fn acquire(&mut self) -> Result<(), InputError> {
        if !self.focused {
            return Err(InputError::NotAcquired);
        }
        self.acquired = true;
        Ok(())
    }

    fn poll(&mut self, state: &mut DeviceState) -> Result<(), InputError> {
        if !self.acquired {
            return Err(InputError::NotAcquired);
        }

        while let Some(event) = self.pending.pop_front() {
            match event {
                RawEvent::Key { key, pressed } => state.set_key(key, pressed),
                RawEvent::Button { button, pressed } => state.set_button(button, pressed),
                RawEvent::Motion { dx, dy } => {
                    state.movement.0 += dx;
                    state.movement.1 += dy;
                }
                RawEvent::Wheel { delta } => state.wheel += delta,
                RawEvent::Cursor { .. } | RawEvent::Focus(_) => {}
            }
        }
        Ok(())
    }

    fn push(&mut self, event: RawEvent) {
        if let RawEvent::Focus(focused) = event {
            self.focused = focused;
            if !focused {
                self.acquired = false;
                self.pending.clear();
            }
            return;
        }
        if self.acquired {
            self.pending.push_back(event);
        }
    }
}

/// X11-style backend: movement is derived from absolute cursor positions.
///
/// The first position after startup or a focus change only sets the
/// baseline. Held keys and buttons are released when focus is lost since
/// their release events will not arrive.
#[derive(Debug, Default)]
pub struct X11Source {
    pending: VecDeque<RawEvent>,
    baseline: Option<(f32, f32)>,
}

impl X11Source {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InputSource for X11Source {
    fn acquire(&mut self) -> Result<(), InputError> {
        Ok(())
    }

    fn poll(&mut self, state: &mut DeviceState) -> Result<(), InputError> {
        while let Some(event) = self.pending.pop_front() {
            match event {
                RawEvent::Key { key, pressed } => state.set_key(key, pressed),
                RawEvent::Button { button, pressed } => state.set_button(button, pressed),
                RawEvent::Cursor { x, y } => {
                    if let Some((bx, by)) = self.baseline {
                        state.movement.0 += x - bx;
                        state.movement.1 += y - by;
                    }
                    self.baseline = Some((x, y));
                }
                RawEvent::Wheel { delta } => state.wheel += delta,
                RawEvent::Focus(_) => {
                    state.release_all();
                    self.baseline = None;
                }
                RawEvent::Motion { .. } => {}
            }
        }
        Ok(())
    }

    fn push(&mut self, event: RawEvent) {
        self.pending.push_back(event);
    }
}

/// Backend for terminals without a pointer: reports no input at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleInput;

impl Input for ConsoleInput {
    fn name(&self) -> &'static str {
        "console"
    }

    fn initialize(&mut self) -> Result<(), InputError> {
        Ok(())
    }

    fn update(&mut self) {}

    fn key_down(&self, _key: Key) -> bool {
        false
    }

    fn button_down(&self, _button: MouseButton) -> bool {
        false
    }

    fn movement(&mut self) -> (f32, f32) {
        (0.0, 0.0)
    }

    fn wheel(&mut self) -> f32 {
        0.0
    }
}

/// Source replaying a queue of poll results, for tests and recorded
/// sessions. An exhausted queue polls successfully with no change.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: VecDeque<Result<DeviceState, InputError>>,
    pushed: Vec<RawEvent>,
    acquire_calls: u32,
    refuse_acquire: bool,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&mut self, result: Result<DeviceState, InputError>) {
        self.script.push_back(result);
    }

    /// Makes every later `acquire` fail.
    pub fn refuse_acquire(&mut self) {
        self.refuse_acquire = true;
    }

    pub fn acquire_calls(&self) -> u32 {
        self.acquire_calls
    }

    pub fn pushed(&self) -> &[RawEvent] {
        &self.pushed
    }
}

impl InputSource for ScriptedSource {
    fn acquire(&mut self) -> Result<(), InputError> {
        self.acquire_calls += 1;
        if self.refuse_acquire {
            Err(InputError::NotAcquired)
        } else {
            Ok(())
        }
    }

    fn poll(&mut self, state: &mut DeviceState) -> Result<(), InputError> {
        match self.script.pop_front() {
            Some(Ok(next)) => {
                *state = next;
                Ok(())
            }
            Some(Err(err)) => Err(err),
            None => Ok(()),
        }
    }

    fn push(&mut self, event: RawEvent) {
        self.pushed.push(event);
    }
}
