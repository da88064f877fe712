// Shared-state reads: sensor and button values published by the host

use serde::{Deserialize, Deserializer};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Every key this layer reads. It never writes any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKey {
    AccX,
    AccY,
    AccZ,
    MicVol,
    APressed,
    BPressed,
    AWasPressed,
    BWasPressed,
}

impl SensorKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKey::AccX => "acc_x",
            SensorKey::AccY => "acc_y",
            SensorKey::AccZ => "acc_z",
            SensorKey::MicVol => "mic_vol",
            SensorKey::APressed => "a_pressed",
            SensorKey::BPressed => "b_pressed",
            SensorKey::AWasPressed => "a_was_pressed",
            SensorKey::BWasPressed => "b_was_pressed",
        }
    }
}

impl fmt::Display for SensorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synchronous read of a host-populated value. Booleans come back as 0/1.
pub trait SensorSource {
    fn read(&mut self, key: SensorKey) -> i32;
}

impl<T: SensorSource + ?Sized> SensorSource for Rc<RefCell<T>> {
    fn read(&mut self, key: SensorKey) -> i32 {
        self.borrow_mut().read(key)
    }
}

/// Snapshot of the board as the simulator page publishes it. The page sends
/// readings as JS numbers; they are truncated toward zero here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BoardState {
    #[serde(deserialize_with = "truncated")]
    pub acc_x: i32,
    #[serde(deserialize_with = "truncated")]
    pub acc_y: i32,
    #[serde(deserialize_with = "truncated")]
    pub acc_z: i32,
    #[serde(deserialize_with = "truncated")]
    pub mic_vol: i32,
    pub a_pressed: bool,
    pub b_pressed: bool,
    pub a_press_count: u32,
    pub b_press_count: u32,
}

fn truncated<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let value = f64::deserialize(deserializer)?;
    Ok(value.trunc() as i32)
}

/// Reads keys out of the latest `BoardState`. `*_was_pressed` reports a
/// press only when that button's counter moved since the last such query.
#[derive(Debug, Clone, Default)]
pub struct StateReader {
    state: BoardState,
    seen_a: u32,
    seen_b: u32,
}

impl StateReader {
    pub fn new(state: BoardState) -> Self {
        Self {
            state,
            seen_a: 0,
            seen_b: 0,
        }
    }

    pub fn update(&mut self, state: BoardState) {
        self.state = state;
    }

    pub fn update_json(&mut self, json: &str) -> Result<(), serde_json::Error> {
        self.state = serde_json::from_str(json)?;
        Ok(())
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }
}

fn consume_press(count: u32, seen: &mut u32) -> i32 {
    if count != *seen {
        *seen = count;
        1
    } else {
        0
    }
}

impl SensorSource for StateReader {
    fn read(&mut self, key: SensorKey) -> i32 {
        match key {
            SensorKey::AccX => self.state.acc_x,
            SensorKey::AccY => self.state.acc_y,
            SensorKey::AccZ => self.state.acc_z,
            SensorKey::MicVol => self.state.mic_vol,
            SensorKey::APressed => self.state.a_pressed as i32,
            SensorKey::BPressed => self.state.b_pressed as i32,
            SensorKey::AWasPressed => consume_press(self.state.a_press_count, &mut self.seen_a),
            SensorKey::BWasPressed => consume_press(self.state.b_press_count, &mut self.seen_b),
        }
    }
}
