// Wingbit Built-in Modules
// Native functions injected into the interpreter, grouped as importable modules

mod accelerometer;
mod button;
mod console;
mod display;
mod microbit;
mod microphone;

use crate::board::SharedBoard;
use crate::engine::Interpreter;
use crate::error::{EngineError, ScriptError};
use crate::host::ConsoleHost;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub use accelerometer::create_accelerometer_module;
pub use button::{create_button_module, ButtonId};
pub use console::{create_clear_function, create_version_function};
pub use display::create_display_module;
pub use microbit::create_microbit_module;
pub use microphone::create_microphone_module;

/// A value crossing the interpreter boundary
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Anything else, known only by its type name
    Object(String),
}

impl Value {
    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Object(name) => name,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Object(name) => write!(f, "<{} object>", name),
        }
    }
}

/// Native function signature
pub type NativeFn = Rc<dyn Fn(&[Value]) -> Result<Value, ScriptError>>;

pub fn native<F>(f: F) -> NativeFn
where
    F: Fn(&[Value]) -> Result<Value, ScriptError> + 'static,
{
    Rc::new(f)
}

/// An importable group of native functions
#[derive(Clone)]
pub struct Module {
    pub name: String,
    pub functions: FxHashMap<String, NativeFn>,
    /// Builtin modules imported into this one when it loads
    pub imports: Vec<String>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: FxHashMap::default(),
            imports: Vec::new(),
        }
    }

    pub fn function(mut self, name: &str, f: NativeFn) -> Self {
        self.functions.insert(name.to_string(), f);
        self
    }

    pub fn import(mut self, module: &str) -> Self {
        self.imports.push(module.to_string());
        self
    }

    /// Function names in a stable order
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("functions", &self.function_names())
            .field("imports", &self.imports)
            .finish()
    }
}

/// Every module of the simulated board, in registration order
pub fn create_board_modules(board: &SharedBoard) -> Vec<Module> {
    vec![
        create_display_module(board),
        create_microphone_module(board),
        create_accelerometer_module(board),
        create_button_module(board, ButtonId::A),
        create_button_module(board, ButtonId::B),
        create_microbit_module(board),
    ]
}

pub fn install_board_modules<I: Interpreter>(
    interp: &mut I,
    board: &SharedBoard,
) -> Result<(), EngineError> {
    for module in create_board_modules(board) {
        interp.register_module(module)?;
    }
    Ok(())
}

/// REPL-only globals: `clear()` and `version()`
pub fn install_console_globals<I: Interpreter>(
    interp: &mut I,
    console: Rc<RefCell<dyn ConsoleHost>>,
) -> Result<(), EngineError> {
    interp.set_global_function("clear", create_clear_function(console))?;
    interp.set_global_function("version", create_version_function())?;
    Ok(())
}

/// Helper: check arity
pub fn check_arity(expected: usize, args: &[Value]) -> Result<(), ScriptError> {
    if args.len() != expected {
        Err(ScriptError::ArgumentCount {
            expected,
            given: args.len(),
        })
    } else {
        Ok(())
    }
}

/// Helper: get integer argument (bools are not ints here)
pub fn int_arg(args: &[Value], index: usize) -> Result<i64, ScriptError> {
    match &args[index] {
        Value::Int(n) => Ok(*n),
        other => Err(ScriptError::ArgumentType {
            index,
            expected: "int",
            found: other.type_name().to_string(),
        }),
    }
}

/// Helper: get string argument
pub fn str_arg(args: &[Value], index: usize) -> Result<&str, ScriptError> {
    match &args[index] {
        Value::Str(s) => Ok(s),
        other => Err(ScriptError::ArgumentType {
            index,
            expected: "str",
            found: other.type_name().to_string(),
        }),
    }
}
