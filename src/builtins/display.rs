// Display built-in module
// Provides: set_pixel(x, y, v), clear(), scroll(text)

use super::{check_arity, int_arg, native, str_arg, Module, Value};
use crate::board::SharedBoard;

pub fn create_display_module(board: &SharedBoard) -> Module {
    let pixels = board.clone();
    let clearing = board.clone();
    let scrolling = board.clone();

    Module::new("display")
        .function(
            "set_pixel",
            native(move |args| {
                check_arity(3, args)?;
                let x = int_arg(args, 0)?;
                let y = int_arg(args, 1)?;
                let v = int_arg(args, 2)?;
                pixels.borrow_mut().set_pixel(x, y, v)?;
                Ok(Value::None)
            }),
        )
        .function(
            "clear",
            native(move |args| {
                check_arity(0, args)?;
                clearing.borrow_mut().clear_display();
                Ok(Value::None)
            }),
        )
        .function(
            "scroll",
            native(move |args| {
                check_arity(1, args)?;
                let text = str_arg(args, 0)?;
                // Blocks for the whole animation.
                scrolling.borrow_mut().scroll(text);
                Ok(Value::None)
            }),
        )
}
