// Console built-in functions (REPL only)
// Provides: clear(), version()

use super::{check_arity, native, NativeFn, Value};
use crate::host::ConsoleHost;
use std::cell::RefCell;
use std::rc::Rc;

pub fn create_clear_function(console: Rc<RefCell<dyn ConsoleHost>>) -> NativeFn {
    native(move |args| {
        check_arity(0, args)?;
        console.borrow_mut().clear_console();
        Ok(Value::None)
    })
}

pub fn create_version_function() -> NativeFn {
    native(|args| {
        check_arity(0, args)?;
        Ok(Value::Str(env!("CARGO_PKG_VERSION").to_string()))
    })
}
