// Wingbit Host Module
// Everything this layer talks to outside the interpreter

mod bridge;
mod clock;
mod sensors;

pub use bridge::{
    BridgeCommand, CallMessage, ConsoleMessage, HostBridge, LedMatrix, RecordingBridge,
    DISPLAY_SIZE, MAX_BRIGHTNESS,
};
pub use clock::{Pause, ThreadSleep, VirtualClock};
pub use sensors::{BoardState, SensorKey, SensorSource, StateReader};

/// Console surface for the REPL's `clear()` builtin
pub trait ConsoleHost {
    fn clear_console(&mut self);
}

/// Console that ignores clear requests
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConsole;

impl ConsoleHost for NoConsole {
    fn clear_console(&mut self) {}
}
