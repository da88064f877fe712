// Wingbit Board
// The simulated micro:bit as seen from the builtins: display, sensors, clock

use crate::config::{MicrophoneMode, SessionConfig, DEFAULT_FRAME_MS};
use crate::error::ScriptError;
use crate::host::{BridgeCommand, HostBridge, Pause, SensorKey, SensorSource};
use crate::host::{DISPLAY_SIZE, MAX_BRIGHTNESS};
use crate::scroll::{self, Canvas};
use std::cell::RefCell;
use std::rc::Rc;

/// Board shared between the closures of every registered builtin
pub type SharedBoard = Rc<RefCell<Board>>;

pub struct Board {
    bridge: Box<dyn HostBridge>,
    sensors: Box<dyn SensorSource>,
    clock: Box<dyn Pause>,
    microphone: MicrophoneMode,
    frame_ms: u64,
}

fn in_display(n: i64) -> bool {
    (0..DISPLAY_SIZE as i64).contains(&n)
}

impl Board {
    pub fn new(
        bridge: impl HostBridge + 'static,
        sensors: impl SensorSource + 'static,
        clock: impl Pause + 'static,
    ) -> Self {
        Self {
            bridge: Box::new(bridge),
            sensors: Box::new(sensors),
            clock: Box::new(clock),
            microphone: MicrophoneMode::Live,
            frame_ms: DEFAULT_FRAME_MS,
        }
    }

    pub fn with_config(mut self, config: &SessionConfig) -> Self {
        self.microphone = config.microphone;
        self.frame_ms = config.scroll_frame_ms;
        self
    }

    pub fn into_shared(self) -> SharedBoard {
        Rc::new(RefCell::new(self))
    }

    /// Validate and forward one pixel. Nothing reaches the bridge unless
    /// x, y are in 0..=4 and the brightness is in 0..=9.
    pub fn set_pixel(&mut self, x: i64, y: i64, brightness: i64) -> Result<(), ScriptError> {
        if !in_display(x) || !in_display(y) {
            return Err(ScriptError::value(format!(
                "pixel coordinates ({}, {}) out of range",
                x, y
            )));
        }
        if !(0..=MAX_BRIGHTNESS as i64).contains(&brightness) {
            return Err(ScriptError::value(format!(
                "brightness {} out of range 0-{}",
                brightness, MAX_BRIGHTNESS
            )));
        }
        self.send(BridgeCommand::SetPixel {
            x: x as u8,
            y: y as u8,
            brightness: brightness as u8,
        });
        Ok(())
    }

    pub fn clear_display(&mut self) {
        self.send(BridgeCommand::ClearDisplay);
    }

    /// Blocking scroll animation; returns the number of frames drawn
    pub fn scroll(&mut self, text: &str) -> usize {
        let frame_ms = self.frame_ms;
        scroll::scroll_text(self, text, frame_ms)
    }

    pub fn read(&mut self, key: SensorKey) -> i32 {
        self.sensors.read(key)
    }

    pub fn sound_level(&mut self) -> i32 {
        match self.microphone {
            MicrophoneMode::Live => self.read(SensorKey::MicVol),
            MicrophoneMode::Stub => 0,
        }
    }

    pub fn sleep(&mut self, ms: u64) {
        self.clock.pause(ms);
    }

    fn send(&mut self, command: BridgeCommand) {
        log::trace!("bridge {}", command);
        self.bridge.send(&command);
    }
}

impl Canvas for Board {
    fn clear(&mut self) {
        self.clear_display();
    }

    fn plot(&mut self, x: usize, y: usize, brightness: u8) {
        self.send(BridgeCommand::SetPixel {
            x: x as u8,
            y: y as u8,
            brightness,
        });
    }

    fn pause(&mut self, ms: u64) {
        self.clock.pause(ms);
    }
}
