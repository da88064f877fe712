// Accelerometer built-in module
// Provides: get_x(), get_y(), get_z()

use super::{check_arity, native, Module, NativeFn, Value};
use crate::board::SharedBoard;
use crate::host::SensorKey;

fn axis_reader(board: &SharedBoard, key: SensorKey) -> NativeFn {
    let board = board.clone();
    native(move |args| {
        check_arity(0, args)?;
        Ok(Value::Int(board.borrow_mut().read(key) as i64))
    })
}

pub fn create_accelerometer_module(board: &SharedBoard) -> Module {
    Module::new("accelerometer")
        .function("get_x", axis_reader(board, SensorKey::AccX))
        .function("get_y", axis_reader(board, SensorKey::AccY))
        .function("get_z", axis_reader(board, SensorKey::AccZ))
}
