// Button built-in modules
// Provides: button_a / button_b with is_pressed(), was_pressed()

use super::{check_arity, native, Module, NativeFn, Value};
use crate::board::SharedBoard;
use crate::host::SensorKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    A,
    B,
}

impl ButtonId {
    pub fn module_name(&self) -> &'static str {
        match self {
            ButtonId::A => "button_a",
            ButtonId::B => "button_b",
        }
    }

    fn pressed_key(&self) -> SensorKey {
        match self {
            ButtonId::A => SensorKey::APressed,
            ButtonId::B => SensorKey::BPressed,
        }
    }

    fn was_pressed_key(&self) -> SensorKey {
        match self {
            ButtonId::A => SensorKey::AWasPressed,
            ButtonId::B => SensorKey::BWasPressed,
        }
    }
}

fn flag_reader(board: &SharedBoard, key: SensorKey) -> NativeFn {
    let board = board.clone();
    native(move |args| {
        check_arity(0, args)?;
        Ok(Value::Bool(board.borrow_mut().read(key) != 0))
    })
}

pub fn create_button_module(board: &SharedBoard, button: ButtonId) -> Module {
    Module::new(button.module_name())
        .function("is_pressed", flag_reader(board, button.pressed_key()))
        .function("was_pressed", flag_reader(board, button.was_pressed_key()))
}
