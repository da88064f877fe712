// Host bridge: display commands sent to the surrounding simulator

use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub const DISPLAY_SIZE: usize = 5;
pub const MAX_BRIGHTNESS: u8 = 9;

/// The only two control messages this layer sends to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeCommand {
    SetPixel { x: u8, y: u8, brightness: u8 },
    ClearDisplay,
}

/// Wire form posted by the browser worker: `{type: "call", func, args}`
#[derive(Debug, Serialize)]
pub struct CallMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub func: &'static str,
    pub args: Vec<u8>,
}

/// Console traffic posted next to bridge calls: `{type: "stdout", message}`
/// for printed text and `{type: "clear"}` for the REPL's `clear()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsoleMessage<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'a str>,
}

impl<'a> ConsoleMessage<'a> {
    pub fn stdout(text: &'a str) -> Self {
        Self {
            kind: "stdout",
            message: Some(text),
        }
    }

    pub fn clear() -> Self {
        Self {
            kind: "clear",
            message: None,
        }
    }
}

impl BridgeCommand {
    pub fn func(&self) -> &'static str {
        match self {
            BridgeCommand::SetPixel { .. } => "setPixel",
            BridgeCommand::ClearDisplay => "clearDisplay",
        }
    }

    pub fn args(&self) -> Vec<u8> {
        match *self {
            BridgeCommand::SetPixel { x, y, brightness } => vec![x, y, brightness],
            BridgeCommand::ClearDisplay => Vec::new(),
        }
    }

    pub fn to_message(&self) -> CallMessage {
        CallMessage {
            kind: "call",
            func: self.func(),
            args: self.args(),
        }
    }
}

impl fmt::Display for BridgeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.args().iter().map(|a| a.to_string()).collect();
        write!(f, "{}({})", self.func(), args.join(","))
    }
}

/// Fire-and-forget channel to the host display. Implementations must accept
/// repeated `ClearDisplay` commands.
pub trait HostBridge {
    fn send(&mut self, command: &BridgeCommand);
}

impl<T: HostBridge + ?Sized> HostBridge for Rc<RefCell<T>> {
    fn send(&mut self, command: &BridgeCommand) {
        self.borrow_mut().send(command)
    }
}

/// A 5x5 LED model that applies bridge commands the way the simulator page
/// does: cell `x * 5 + y`, clear resets every cell to 0.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LedMatrix {
    leds: [u8; DISPLAY_SIZE * DISPLAY_SIZE],
}

impl LedMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn brightness(&self, x: usize, y: usize) -> u8 {
        self.leds[x * DISPLAY_SIZE + y]
    }

    pub fn is_blank(&self) -> bool {
        self.leds.iter().all(|&v| v == 0)
    }

    /// Rows top to bottom; `.` for off, the brightness digit otherwise
    pub fn render(&self) -> String {
        let mut text = String::with_capacity(DISPLAY_SIZE * (DISPLAY_SIZE + 1));
        for y in 0..DISPLAY_SIZE {
            for x in 0..DISPLAY_SIZE {
                match self.brightness(x, y) {
                    0 => text.push('.'),
                    v => text.push(char::from(b'0' + v)),
                }
            }
            text.push('\n');
        }
        text
    }
}

impl HostBridge for LedMatrix {
    fn send(&mut self, command: &BridgeCommand) {
        match *command {
            BridgeCommand::SetPixel { x, y, brightness } => {
                let (x, y) = (x as usize, y as usize);
                if x < DISPLAY_SIZE && y < DISPLAY_SIZE {
                    self.leds[x * DISPLAY_SIZE + y] = brightness.min(MAX_BRIGHTNESS);
                }
            }
            BridgeCommand::ClearDisplay => self.leds = [0; DISPLAY_SIZE * DISPLAY_SIZE],
        }
    }
}

/// Keeps every command it receives; used by tests and by debug tooling
#[derive(Debug, Clone, Default)]
pub struct RecordingBridge {
    pub commands: Vec<BridgeCommand>,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pixels_set(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, BridgeCommand::SetPixel { .. }))
            .count()
    }

    pub fn clears(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, BridgeCommand::ClearDisplay))
            .count()
    }
}

impl HostBridge for RecordingBridge {
    fn send(&mut self, command: &BridgeCommand) {
        self.commands.push(*command);
    }
}
