// Wingbit Engine Module
// The seam to the external interpreter. Sessions only see this trait.

#[cfg(test)]
pub(crate) mod mock;
#[cfg(feature = "wings")]
pub mod wings;

use crate::builtins::{Module, NativeFn};
use crate::error::EngineError;

/// Receives every chunk of text a script prints
pub type PrintFn = Box<dyn FnMut(&str)>;

#[derive(Default)]
pub struct EngineConfig {
    pub enable_os_access: bool,
    pub print: Option<PrintFn>,
}

impl EngineConfig {
    pub fn with_print(mut self, print: impl FnMut(&str) + 'static) -> Self {
        self.print = Some(Box::new(print));
        self
    }

    pub fn with_os_access(mut self, enabled: bool) -> Self {
        self.enable_os_access = enabled;
        self
    }
}

/// How one evaluation or execution ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Expression produced a value other than None: its repr, or the error
    /// text if computing the repr failed
    Value(Result<String, String>),
    /// Statements ran, or the expression evaluated to None
    NoValue,
    /// The script asked to terminate the program (SystemExit or a subclass)
    Exit,
    /// Any other uncaught exception, already formatted by the interpreter
    Error(String),
}

/// One interpreter instance. Instances are never shared across threads.
pub trait Interpreter: Sized {
    fn create(config: EngineConfig) -> Result<Self, EngineError>;

    fn set_global_function(&mut self, name: &str, function: NativeFn) -> Result<(), EngineError>;

    /// Make `module` importable by name
    fn register_module(&mut self, module: Module) -> Result<(), EngineError>;

    fn clear_exception(&mut self);

    /// Compile `code` as one bare expression without running it
    fn compiles_as_expression(&mut self, code: &str) -> bool;

    /// Expression mode
    fn evaluate(&mut self, code: &str) -> Completion;

    /// Statement mode
    fn execute(&mut self, code: &str) -> Completion;
}
