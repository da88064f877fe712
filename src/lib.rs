// Wingbit
// Glue between the Wings scripting runtime and two hosts: a micro:bit
// simulator and an interactive console

pub mod board;
pub mod builtins;
pub mod config;
pub mod engine;
pub mod error;
pub mod font;
pub mod host;
pub mod log;
pub mod output;
pub mod repl;
pub mod scroll;
pub mod simulator;

#[cfg(all(target_arch = "wasm32", feature = "wings"))]
pub mod wasm;

pub use board::{Board, SharedBoard};
pub use config::{MicrophoneMode, SessionConfig};
pub use engine::{Completion, EngineConfig, Interpreter};
pub use error::{ConfigError, EngineError, OpenError, ScriptError};
pub use output::OutputBuffer;
pub use repl::{InputMode, Repl};
pub use simulator::{RunOutcome, Simulator};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
