// Microphone built-in module
// Provides: sound_level()

use super::{check_arity, native, Module, Value};
use crate::board::SharedBoard;

pub fn create_microphone_module(board: &SharedBoard) -> Module {
    let board = board.clone();
    Module::new("microphone").function(
        "sound_level",
        native(move |args| {
            check_arity(0, args)?;
            Ok(Value::Int(board.borrow_mut().sound_level() as i64))
        }),
    )
}
