// Wings backend
// Binds the Interpreter trait to the Wings C API. The Wings library itself
// is built and linked by the host (emscripten for the browser build).

use super::{Completion, EngineConfig, Interpreter, PrintFn};
use crate::builtins::{Module, NativeFn, Value};
use crate::error::{EngineError, ScriptError};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::ffi::{c_char, c_int, c_void, CStr, CString};
use std::mem::MaybeUninit;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

#[repr(C)]
pub struct WgContext {
    _private: [u8; 0],
}

#[repr(C)]
pub struct WgObj {
    _private: [u8; 0],
}

type WgFunction = unsafe extern "C" fn(*mut WgContext, *mut *mut WgObj, c_int) -> *mut WgObj;
type WgPrintFunction = unsafe extern "C" fn(*const c_char, c_int, *mut c_void);
type WgModuleLoader = unsafe extern "C" fn(*mut WgContext) -> bool;

#[repr(C)]
struct WgConfig {
    enable_os_access: bool,
    max_recursion: c_int,
    max_collection_size: c_int,
    gc_run_factor: f32,
    print: Option<WgPrintFunction>,
    print_userdata: *mut c_void,
    argv: *const *const c_char,
    argc: c_int,
    import_path: *const c_char,
}

#[link(name = "wings")]
extern "C" {
    fn Wg_DefaultConfig(config: *mut WgConfig);
    fn Wg_CreateContext(config: *const WgConfig) -> *mut WgContext;
    fn Wg_DestroyContext(context: *mut WgContext);

    fn Wg_GetGlobal(context: *mut WgContext, name: *const c_char) -> *mut WgObj;
    fn Wg_SetGlobal(context: *mut WgContext, name: *const c_char, value: *mut WgObj);
    fn Wg_IncRef(obj: *mut WgObj);
    fn Wg_DecRef(obj: *mut WgObj);

    fn Wg_NewFunction(
        context: *mut WgContext,
        fptr: WgFunction,
        userdata: *mut c_void,
        pretty_name: *const c_char,
    ) -> *mut WgObj;
    fn Wg_GetFunctionUserdata(context: *mut WgContext) -> *mut c_void;

    fn Wg_RegisterModule(context: *mut WgContext, name: *const c_char, loader: WgModuleLoader);
    fn Wg_ImportModule(
        context: *mut WgContext,
        module: *const c_char,
        alias: *const c_char,
    ) -> *mut WgObj;

    fn Wg_Execute(context: *mut WgContext, code: *const c_char, pretty_name: *const c_char) -> bool;
    fn Wg_ExecuteExpression(
        context: *mut WgContext,
        code: *const c_char,
        pretty_name: *const c_char,
    ) -> *mut WgObj;
    fn Wg_CompileExpression(
        context: *mut WgContext,
        code: *const c_char,
        pretty_name: *const c_char,
    ) -> *mut WgObj;

    fn Wg_GetException(context: *mut WgContext) -> *mut WgObj;
    fn Wg_ClearException(context: *mut WgContext);
    fn Wg_GetErrorMessage(context: *mut WgContext) -> *const c_char;
    fn Wg_IsInstance(instance: *const WgObj, types: *const *mut WgObj, types_len: c_int) -> *mut WgObj;

    fn Wg_IsNone(obj: *const WgObj) -> bool;
    fn Wg_IsBool(obj: *const WgObj) -> bool;
    fn Wg_IsInt(obj: *const WgObj) -> bool;
    fn Wg_IsIntOrFloat(obj: *const WgObj) -> bool;
    fn Wg_IsString(obj: *const WgObj) -> bool;
    fn Wg_GetBool(obj: *const WgObj) -> bool;
    fn Wg_GetInt(obj: *const WgObj) -> i64;
    fn Wg_GetFloat(obj: *const WgObj) -> f64;
    fn Wg_GetString(obj: *const WgObj, len: *mut c_int) -> *const c_char;

    fn Wg_None(context: *mut WgContext) -> *mut WgObj;
    fn Wg_NewBool(context: *mut WgContext, value: bool) -> *mut WgObj;
    fn Wg_NewInt(context: *mut WgContext, value: i64) -> *mut WgObj;
    fn Wg_NewFloat(context: *mut WgContext, value: f64) -> *mut WgObj;
    fn Wg_NewString(context: *mut WgContext, value: *const c_char) -> *mut WgObj;

    fn Wg_Call(
        callable: *mut WgObj,
        argv: *mut *mut WgObj,
        argc: c_int,
        kwargs: *mut WgObj,
    ) -> *mut WgObj;

    fn Wg_RaiseArgumentCountError(context: *mut WgContext, given: c_int, expected: c_int);
    fn Wg_RaiseArgumentTypeError(context: *mut WgContext, arg_index: c_int, expected: *const c_char);
    fn Wg_RaiseExceptionClass(klass: *mut WgObj, message: *const c_char);
}

const SOURCE_NAME: &CStr = c"<stdin>";

/// Wings module loaders carry no user data, so each registered module gets
/// one of a fixed set of loader functions that knows its slot index.
const LOADER_SLOTS: usize = 8;

/// Per-context data the C side points into: registered modules by slot, and
/// the boxed closures handed out as function userdata.
#[derive(Default)]
struct ContextTable {
    modules: Vec<Module>,
    natives: Vec<Box<NativeFn>>,
}

thread_local! {
    static TABLES: RefCell<FxHashMap<usize, ContextTable>> = RefCell::new(FxHashMap::default());
}

macro_rules! loader_slots {
    ($($name:ident = $slot:expr),* $(,)?) => {
        $(
            unsafe extern "C" fn $name(context: *mut WgContext) -> bool {
                load_module(context, $slot)
            }
        )*
        const LOADERS: [WgModuleLoader; LOADER_SLOTS] = [$($name),*];
    };
}

loader_slots!(
    load_slot_0 = 0,
    load_slot_1 = 1,
    load_slot_2 = 2,
    load_slot_3 = 3,
    load_slot_4 = 4,
    load_slot_5 = 5,
    load_slot_6 = 6,
    load_slot_7 = 7,
);

unsafe fn load_module(context: *mut WgContext, slot: usize) -> bool {
    // Clone out of the table: importing below re-enters other loaders.
    let module = TABLES.with(|tables| {
        tables
            .borrow()
            .get(&(context as usize))
            .and_then(|table| table.modules.get(slot).cloned())
    });
    let Some(module) = module else {
        return false;
    };

    for name in module.function_names() {
        let f = module.functions[name].clone();
        if !bind_function(context, name, f) {
            return false;
        }
    }
    for import in &module.imports {
        let Ok(import) = CString::new(import.as_str()) else {
            return false;
        };
        if Wg_ImportModule(context, import.as_ptr(), ptr::null()).is_null() {
            return false;
        }
    }
    true
}

/// Create a function object for `f` and bind it as a global of whatever
/// module `context` is currently executing or loading
unsafe fn bind_function(context: *mut WgContext, name: &str, f: NativeFn) -> bool {
    let Ok(cname) = CString::new(name) else {
        return false;
    };
    let boxed = Box::new(f);
    let userdata = &*boxed as *const NativeFn as *mut c_void;
    let obj = Wg_NewFunction(context, native_trampoline, userdata, cname.as_ptr());
    if obj.is_null() {
        return false;
    }
    Wg_SetGlobal(context, cname.as_ptr(), obj);
    TABLES.with(|tables| {
        if let Some(table) = tables.borrow_mut().get_mut(&(context as usize)) {
            table.natives.push(boxed);
        }
    });
    true
}

unsafe extern "C" fn native_trampoline(
    context: *mut WgContext,
    argv: *mut *mut WgObj,
    argc: c_int,
) -> *mut WgObj {
    let userdata = Wg_GetFunctionUserdata(context) as *const NativeFn;
    if userdata.is_null() {
        return ptr::null_mut();
    }
    let f = &*userdata;

    let mut args: SmallVec<[Value; 4]> = SmallVec::new();
    for i in 0..argc.max(0) as usize {
        args.push(to_value(*argv.add(i)));
    }

    match panic::catch_unwind(AssertUnwindSafe(|| f(&args))) {
        Ok(Ok(value)) => from_value(context, value),
        Ok(Err(err)) => {
            raise(context, &err);
            ptr::null_mut()
        }
        Err(_) => {
            raise_class(context, c"RuntimeError", "native function panicked");
            ptr::null_mut()
        }
    }
}

unsafe extern "C" fn print_trampoline(message: *const c_char, len: c_int, userdata: *mut c_void) {
    if message.is_null() || userdata.is_null() || len <= 0 {
        return;
    }
    let bytes = std::slice::from_raw_parts(message as *const u8, len as usize);
    let text = String::from_utf8_lossy(bytes);
    let print = &mut *(userdata as *mut PrintFn);
    print(&text);
}

unsafe fn string_of(obj: *const WgObj) -> String {
    let mut len: c_int = 0;
    let text = Wg_GetString(obj, &mut len);
    if text.is_null() || len <= 0 {
        return String::new();
    }
    let bytes = std::slice::from_raw_parts(text as *const u8, len as usize);
    String::from_utf8_lossy(bytes).into_owned()
}

unsafe fn to_value(obj: *mut WgObj) -> Value {
    if Wg_IsNone(obj) {
        Value::None
    } else if Wg_IsBool(obj) {
        Value::Bool(Wg_GetBool(obj))
    } else if Wg_IsInt(obj) {
        Value::Int(Wg_GetInt(obj))
    } else if Wg_IsIntOrFloat(obj) {
        Value::Float(Wg_GetFloat(obj))
    } else if Wg_IsString(obj) {
        Value::Str(string_of(obj))
    } else {
        Value::Object("object".to_string())
    }
}

unsafe fn from_value(context: *mut WgContext, value: Value) -> *mut WgObj {
    match value {
        Value::None | Value::Object(_) => Wg_None(context),
        Value::Bool(b) => Wg_NewBool(context, b),
        Value::Int(n) => Wg_NewInt(context, n),
        Value::Float(n) => Wg_NewFloat(context, n),
        Value::Str(s) => {
            let text = CString::new(s.replace('\0', "")).unwrap_or_default();
            Wg_NewString(context, text.as_ptr())
        }
    }
}

unsafe fn raise(context: *mut WgContext, err: &ScriptError) {
    match err {
        ScriptError::ArgumentCount { expected, given } => {
            Wg_RaiseArgumentCountError(context, *given as c_int, *expected as c_int)
        }
        ScriptError::ArgumentType { index, expected, .. } => {
            let expected = CString::new(*expected).unwrap_or_default();
            Wg_RaiseArgumentTypeError(context, *index as c_int, expected.as_ptr())
        }
        ScriptError::Value(message) => raise_class(context, c"ValueError", message),
    }
}

unsafe fn raise_class(context: *mut WgContext, class: &CStr, message: &str) {
    let klass = Wg_GetGlobal(context, class.as_ptr());
    if klass.is_null() {
        return;
    }
    let message = CString::new(message.replace('\0', "")).unwrap_or_default();
    Wg_RaiseExceptionClass(klass, message.as_ptr());
}

pub struct WingsInterpreter {
    context: *mut WgContext,
    /// SystemExit, captured at creation for instance-of checks
    system_exit: *mut WgObj,
    _print: Option<Box<PrintFn>>,
}

impl WingsInterpreter {
    fn error_message(&self) -> String {
        unsafe {
            let message = Wg_GetErrorMessage(self.context);
            if message.is_null() {
                String::new()
            } else {
                CStr::from_ptr(message).to_string_lossy().into_owned()
            }
        }
    }

    fn repr(&self, obj: *mut WgObj) -> Result<String, String> {
        unsafe {
            let repr = Wg_GetGlobal(self.context, c"repr".as_ptr());
            if repr.is_null() {
                return Err(self.error_message());
            }
            let mut argv = [obj];
            let text = Wg_Call(repr, argv.as_mut_ptr(), 1, ptr::null_mut());
            if text.is_null() {
                Err(self.error_message())
            } else {
                Ok(string_of(text))
            }
        }
    }

    fn completion(&self, result: Option<*mut WgObj>) -> Completion {
        unsafe {
            let exception = Wg_GetException(self.context);
            if !exception.is_null() {
                let exit = [self.system_exit];
                if !self.system_exit.is_null()
                    && !Wg_IsInstance(exception, exit.as_ptr(), 1).is_null()
                {
                    return Completion::Exit;
                }
                return Completion::Error(self.error_message());
            }
            match result {
                Some(obj) if !obj.is_null() && !Wg_IsNone(obj) => {
                    Wg_IncRef(obj);
                    let repr = self.repr(obj);
                    Wg_DecRef(obj);
                    Completion::Value(repr)
                }
                _ => Completion::NoValue,
            }
        }
    }
}

impl Interpreter for WingsInterpreter {
    fn create(config: EngineConfig) -> Result<Self, EngineError> {
        let mut print = config.print.map(Box::new);

        let mut wg_config = MaybeUninit::<WgConfig>::uninit();
        let context = unsafe {
            Wg_DefaultConfig(wg_config.as_mut_ptr());
            let mut wg_config = wg_config.assume_init();
            wg_config.enable_os_access = config.enable_os_access;
            if let Some(print) = print.as_mut() {
                wg_config.print = Some(print_trampoline);
                wg_config.print_userdata = &mut **print as *mut PrintFn as *mut c_void;
            }
            Wg_CreateContext(&wg_config)
        };
        if context.is_null() {
            return Err(EngineError::CreateFailed);
        }

        let system_exit = unsafe {
            let class = Wg_GetGlobal(context, c"SystemExit".as_ptr());
            if !class.is_null() {
                Wg_IncRef(class);
            }
            class
        };

        TABLES.with(|tables| {
            tables
                .borrow_mut()
                .insert(context as usize, ContextTable::default())
        });
        log::debug!("created wings context {:p}", context);

        Ok(Self {
            context,
            system_exit,
            _print: print,
        })
    }

    fn set_global_function(&mut self, name: &str, function: NativeFn) -> Result<(), EngineError> {
        if unsafe { bind_function(self.context, name, function) } {
            Ok(())
        } else {
            Err(EngineError::Function(name.to_string()))
        }
    }

    fn register_module(&mut self, module: Module) -> Result<(), EngineError> {
        let name = CString::new(module.name.as_str())
            .map_err(|_| EngineError::Module(module.name.clone()))?;
        let slot = TABLES.with(|tables| {
            let mut tables = tables.borrow_mut();
            let table = tables.get_mut(&(self.context as usize))?;
            if table.modules.len() >= LOADER_SLOTS {
                return None;
            }
            table.modules.push(module.clone());
            Some(table.modules.len() - 1)
        });
        let slot = slot.ok_or_else(|| EngineError::Module(module.name.clone()))?;
        unsafe { Wg_RegisterModule(self.context, name.as_ptr(), LOADERS[slot]) };
        Ok(())
    }

    fn clear_exception(&mut self) {
        unsafe { Wg_ClearException(self.context) }
    }

    fn compiles_as_expression(&mut self, code: &str) -> bool {
        let Ok(source) = CString::new(code) else {
            return false;
        };
        unsafe { !Wg_CompileExpression(self.context, source.as_ptr(), SOURCE_NAME.as_ptr()).is_null() }
    }

    fn evaluate(&mut self, code: &str) -> Completion {
        let Ok(source) = CString::new(code) else {
            return Completion::Error(format!("{}\n", EngineError::NulInSource));
        };
        let result =
            unsafe { Wg_ExecuteExpression(self.context, source.as_ptr(), SOURCE_NAME.as_ptr()) };
        self.completion(Some(result))
    }

    fn execute(&mut self, code: &str) -> Completion {
        let Ok(source) = CString::new(code) else {
            return Completion::Error(format!("{}\n", EngineError::NulInSource));
        };
        unsafe { Wg_Execute(self.context, source.as_ptr(), SOURCE_NAME.as_ptr()) };
        self.completion(None)
    }
}

impl Drop for WingsInterpreter {
    fn drop(&mut self) {
        unsafe {
            if !self.system_exit.is_null() {
                Wg_DecRef(self.system_exit);
            }
            Wg_DestroyContext(self.context);
        }
        TABLES.with(|tables| tables.borrow_mut().remove(&(self.context as usize)));
        log::debug!("destroyed wings context {:p}", self.context);
    }
}
