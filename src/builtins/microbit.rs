// Microbit built-in module
// Provides: sleep(ms), and pulls in every device module on import

use super::{check_arity, int_arg, native, Module, Value};
use crate::board::SharedBoard;

/// Device modules re-exported by `microbit`
pub const DEVICE_MODULES: [&str; 5] = ["display", "accelerometer", "microphone", "button_a", "button_b"];

pub fn create_microbit_module(board: &SharedBoard) -> Module {
    let board = board.clone();
    let mut module = Module::new("microbit").function(
        "sleep",
        native(move |args| {
            check_arity(1, args)?;
            // Negative durations do not wait at all.
            let ms = int_arg(args, 0)?.max(0) as u64;
            board.borrow_mut().sleep(ms);
            Ok(Value::None)
        }),
    );
    for name in DEVICE_MODULES {
        module = module.import(name);
    }
    module
}
