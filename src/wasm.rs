// Wingbit WASM Module
// Browser entry points. Both sessions run inside a web worker: the page
// mirrors board state into a shared buffer and the worker blocks on it.

use crate::board::Board;
use crate::config::SessionConfig;
use crate::engine::wings::WingsInterpreter;
use crate::host::{
    BridgeCommand, ConsoleHost, ConsoleMessage, HostBridge, Pause, SensorKey, SensorSource,
};
use crate::output::OutputBuffer;
use crate::repl::{InputMode, Repl};
use crate::simulator::{RunOutcome, Simulator};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = postMessage)]
    fn post_message(message: &JsValue);

    fn read_sab(key: &str) -> i32;

    fn worker_sleep(ms: u32);
}

fn post<T: Serialize>(message: &T) {
    match serde_wasm_bindgen::to_value(message) {
        Ok(value) => post_message(&value),
        Err(err) => log::error!("cannot encode host message: {}", err),
    }
}

struct JsBridge;

impl HostBridge for JsBridge {
    fn send(&mut self, command: &BridgeCommand) {
        post(&command.to_message());
    }
}

struct JsSensors;

impl SensorSource for JsSensors {
    fn read(&mut self, key: SensorKey) -> i32 {
        read_sab(key.as_str())
    }
}

struct WorkerPause;

impl Pause for WorkerPause {
    fn pause(&mut self, ms: u64) {
        worker_sleep(ms.min(u32::MAX as u64) as u32);
    }
}

struct JsConsole;

impl ConsoleHost for JsConsole {
    fn clear_console(&mut self) {
        post(&ConsoleMessage::clear());
    }
}

/// Output buffer that also posts every printed chunk to the page
fn stdout_buffer() -> OutputBuffer {
    let output = OutputBuffer::new();
    output.set_listener(|chunk| post(&ConsoleMessage::stdout(chunk)));
    output
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    crate::log::init_log(log::LevelFilter::Info, "")
        .map_err(|e| JsValue::from_str(&format!("cannot start logging: {}", e)))
}

/// Console session for the browser terminal. Printed output and echoed
/// values are streamed to the page and also kept for `output()`.
#[wasm_bindgen]
pub struct ReplSession {
    repl: Option<Repl<WingsInterpreter>>,
}

#[wasm_bindgen]
impl ReplSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ReplSession {
        ReplSession { repl: None }
    }

    /// Returns 0 on success, 1 if the live instance failed, 2 if the
    /// expression checker failed
    pub fn open(&mut self) -> i32 {
        let console: Rc<RefCell<dyn ConsoleHost>> = Rc::new(RefCell::new(JsConsole));
        match Repl::open_with_output(&SessionConfig::default(), console, stdout_buffer()) {
            Ok(repl) => {
                self.repl = Some(repl);
                0
            }
            Err(err) => {
                log::error!("{}", err);
                err.status()
            }
        }
    }

    pub fn close(&mut self) {
        if let Some(repl) = self.repl.take() {
            repl.close();
        }
    }

    /// Returns true when the input was evaluated as an expression
    pub fn execute(&mut self, code: &str) -> bool {
        match self.repl.as_mut() {
            Some(repl) => repl.execute(code) == InputMode::Expression,
            None => false,
        }
    }

    pub fn output(&self) -> String {
        self.repl.as_ref().map(|r| r.output()).unwrap_or_default()
    }

    pub fn clear_output(&mut self) {
        if let Some(repl) = self.repl.as_mut() {
            repl.clear_output();
        }
    }

    pub fn should_exit(&self) -> bool {
        self.repl.as_ref().is_some_and(|r| r.should_exit())
    }

    pub fn version() -> String {
        crate::VERSION.to_string()
    }
}

impl Default for ReplSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Program runner for the simulated board. Printed output is streamed to
/// the page as it is produced and also kept for `output()`.
#[wasm_bindgen]
pub struct SimulatorSession {
    sim: Box<Simulator<WingsInterpreter>>,
}

#[wasm_bindgen]
impl SimulatorSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> SimulatorSession {
        let board = Board::new(JsBridge, JsSensors, WorkerPause);
        let sim = Simulator::new(board, SessionConfig::default()).with_output(stdout_buffer());
        SimulatorSession { sim: Box::new(sim) }
    }

    /// Run a program to completion. Returns "finished", "exited" or
    /// "failed", or "unavailable" when no interpreter could be created.
    pub fn execute(&mut self, code: &str) -> String {
        let outcome = match self.sim.run(code) {
            Ok(RunOutcome::Finished) => "finished",
            Ok(RunOutcome::Exited) => "exited",
            Ok(RunOutcome::Failed) => "failed",
            Err(err) => {
                log::error!("{}", err);
                "unavailable"
            }
        };
        outcome.to_string()
    }

    pub fn output(&self) -> String {
        self.sim.output()
    }

    pub fn clear_output(&mut self) {
        self.sim.clear_output();
    }
}

impl Default for SimulatorSession {
    fn default() -> Self {
        Self::new()
    }
}
