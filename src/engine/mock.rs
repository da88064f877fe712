// A small stand-in interpreter for tests.
// Integers, strings, names, calls, attribute access, assignment, import,
// from-import-star and raise; one statement per line or per ';'.

use super::{Completion, EngineConfig, Interpreter, PrintFn};
use crate::builtins::{Module, NativeFn, Value};
use crate::error::{EngineError, ScriptError};
use rustc_hash::FxHashMap;
use std::cell::Cell;

thread_local! {
    static CREATED: Cell<usize> = Cell::new(0);
    static FAIL_AFTER: Cell<Option<usize>> = Cell::new(None);
}

/// Let the next `n` creations on this thread succeed, then fail the rest
pub fn fail_creation_after(n: usize) {
    CREATED.with(|c| c.set(0));
    FAIL_AFTER.with(|f| f.set(Some(n)));
}

pub fn allow_creation() {
    FAIL_AFTER.with(|f| f.set(None));
}

const EXCEPTIONS: &[(&str, &str)] = &[
    ("BaseException", ""),
    ("SystemExit", "BaseException"),
    ("ShutdownExit", "SystemExit"),
    ("Exception", "BaseException"),
    ("TypeError", "Exception"),
    ("ValueError", "Exception"),
    ("NameError", "Exception"),
    ("RuntimeError", "Exception"),
    ("ZeroDivisionError", "Exception"),
    ("AttributeError", "Exception"),
    ("ImportError", "Exception"),
    ("SyntaxError", "Exception"),
];

fn parent_of(class: &str) -> Option<&'static str> {
    EXCEPTIONS
        .iter()
        .find(|(name, _)| *name == class)
        .map(|(_, parent)| *parent)
        .filter(|parent| !parent.is_empty())
}

fn derives_from(class: &str, base: &str) -> bool {
    let mut current = Some(class);
    while let Some(name) = current {
        if name == base {
            return true;
        }
        current = parent_of(name);
    }
    false
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exception {
    pub class: String,
    pub message: String,
}

impl Exception {
    fn new(class: &str, message: impl Into<String>) -> Self {
        Self {
            class: class.to_string(),
            message: message.into(),
        }
    }

    fn syntax() -> Self {
        Self::new("SyntaxError", "invalid syntax")
    }

    fn formatted(&self) -> String {
        if self.message.is_empty() {
            format!("{}\n", self.class)
        } else {
            format!("{}: {}\n", self.class, self.message)
        }
    }
}

impl From<ScriptError> for Exception {
    fn from(err: ScriptError) -> Self {
        Exception::new(&err.kind().to_string(), err.to_string())
    }
}

#[derive(Clone)]
enum Obj {
    None,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Module(String),
    Func(String, NativeFn),
    Builtin(&'static str),
    ExcClass(String),
    Exc(Exception),
    Opaque(String),
    Unprintable,
}

impl Obj {
    fn type_name(&self) -> String {
        match self {
            Obj::None => "NoneType".into(),
            Obj::Int(_) => "int".into(),
            Obj::Float(_) => "float".into(),
            Obj::Bool(_) => "bool".into(),
            Obj::Str(_) => "str".into(),
            Obj::Module(_) => "module".into(),
            Obj::Func(..) | Obj::Builtin(_) => "builtin_function".into(),
            Obj::ExcClass(_) => "type".into(),
            Obj::Exc(e) => e.class.clone(),
            Obj::Opaque(name) => name.clone(),
            Obj::Unprintable => "Unprintable".into(),
        }
    }

    fn repr(&self) -> Result<String, Exception> {
        Ok(match self {
            Obj::None => "None".into(),
            Obj::Int(n) => n.to_string(),
            Obj::Float(n) => n.to_string(),
            Obj::Bool(true) => "True".into(),
            Obj::Bool(false) => "False".into(),
            Obj::Str(s) => format!("'{}'", s),
            Obj::Module(name) => format!("<module '{}'>", name),
            Obj::Func(name, _) => format!("<function {}>", name),
            Obj::Builtin(name) => format!("<built-in function {}>", name),
            Obj::ExcClass(name) => format!("<class '{}'>", name),
            Obj::Exc(e) => format!("{}('{}')", e.class, e.message),
            Obj::Opaque(name) => format!("<{} object>", name),
            Obj::Unprintable => {
                return Err(Exception::new("RuntimeError", "object has no representation"))
            }
        })
    }

    fn str(&self) -> Result<String, Exception> {
        match self {
            Obj::Str(s) => Ok(s.clone()),
            other => other.repr(),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Obj::None => Value::None,
            Obj::Int(n) => Value::Int(*n),
            Obj::Float(n) => Value::Float(*n),
            Obj::Bool(b) => Value::Bool(*b),
            Obj::Str(s) => Value::Str(s.clone()),
            other => Value::Object(other.type_name()),
        }
    }

    fn from_value(value: Value) -> Obj {
        match value {
            Value::None => Obj::None,
            Value::Bool(b) => Obj::Bool(b),
            Value::Int(n) => Obj::Int(n),
            Value::Float(n) => Obj::Float(n),
            Value::Str(s) => Obj::Str(s),
            Value::Object(name) => Obj::Opaque(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Int(i64),
    Str(String),
    Name(String),
    Sym(char),
    Newline,
}

fn tokenize(src: &str) -> Result<Vec<Tok>, Exception> {
    let mut toks = Vec::new();
    let mut chars = src.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            '\n' | ';' => {
                chars.next();
                toks.push(Tok::Newline);
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                while chars.peek().is_some_and(|&c| c != '\n') {
                    chars.next();
                }
            }
            '0'..='9' => {
                let mut digits = String::new();
                while let Some(&d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                    digits.push(d);
                    chars.next();
                }
                let n = digits.parse().map_err(|_| Exception::syntax())?;
                toks.push(Tok::Int(n));
            }
            '"' | '\'' => {
                chars.next();
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some(q) if q == c => break,
                        Some('\n') | None => return Err(Exception::syntax()),
                        Some(ch) => text.push(ch),
                    }
                }
                toks.push(Tok::Str(text));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&ch) = chars.peek().filter(|ch| ch.is_alphanumeric() || **ch == '_') {
                    name.push(ch);
                    chars.next();
                }
                toks.push(Tok::Name(name));
            }
            '+' | '-' | '*' | '/' | '=' | '(' | ')' | ',' | '.' => {
                chars.next();
                toks.push(Tok::Sym(c));
            }
            _ => return Err(Exception::syntax()),
        }
    }
    Ok(toks)
}

#[derive(Debug, Clone)]
enum Expr {
    Int(i64),
    Str(String),
    Name(String),
    Neg(Box<Expr>),
    Bin(char, Box<Expr>, Box<Expr>),
    Attr(Box<Expr>, String),
    Call(Box<Expr>, Vec<Expr>),
}

#[derive(Debug, Clone)]
enum Stmt {
    Expr(Expr),
    Assign(String, Expr),
    Import(String),
    FromImport(String),
    Raise(Expr),
}

struct Parser {
    toks: Vec<Tok>,
    pos: usize,
}

impl Parser {
    fn new(toks: Vec<Tok>) -> Self {
        Self { toks, pos: 0 }
    }

    fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.pos)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.toks.len()
    }

    fn next(&mut self) -> Option<Tok> {
        let tok = self.toks.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn eat(&mut self, sym: char) -> bool {
        if self.peek() == Some(&Tok::Sym(sym)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, sym: char) -> Result<(), Exception> {
        if self.eat(sym) {
            Ok(())
        } else {
            Err(Exception::syntax())
        }
    }

    fn name(&mut self) -> Result<String, Exception> {
        match self.next() {
            Some(Tok::Name(n)) => Ok(n),
            _ => Err(Exception::syntax()),
        }
    }

    fn program(&mut self) -> Result<Vec<Stmt>, Exception> {
        let mut stmts = Vec::new();
        loop {
            while self.peek() == Some(&Tok::Newline) {
                self.pos += 1;
            }
            if self.at_end() {
                return Ok(stmts);
            }
            stmts.push(self.statement()?);
            match self.next() {
                None | Some(Tok::Newline) => {}
                _ => return Err(Exception::syntax()),
            }
        }
    }

    fn statement(&mut self) -> Result<Stmt, Exception> {
        match self.peek() {
            Some(Tok::Name(kw)) if kw == "import" => {
                self.pos += 1;
                Ok(Stmt::Import(self.name()?))
            }
            Some(Tok::Name(kw)) if kw == "from" => {
                self.pos += 1;
                let module = self.name()?;
                if self.name()? != "import" {
                    return Err(Exception::syntax());
                }
                self.expect('*')?;
                Ok(Stmt::FromImport(module))
            }
            Some(Tok::Name(kw)) if kw == "raise" => {
                self.pos += 1;
                Ok(Stmt::Raise(self.expression()?))
            }
            Some(Tok::Name(target))
                if self.toks.get(self.pos + 1) == Some(&Tok::Sym('=')) =>
            {
                let target = target.clone();
                self.pos += 2;
                Ok(Stmt::Assign(target, self.expression()?))
            }
            _ => Ok(Stmt::Expr(self.expression()?)),
        }
    }

    fn expression(&mut self) -> Result<Expr, Exception> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Sym(c @ ('+' | '-'))) => *c,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            lhs = Expr::Bin(op, Box::new(lhs), Box::new(self.term()?));
        }
    }

    fn term(&mut self) -> Result<Expr, Exception> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Sym(c @ ('*' | '/'))) => *c,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            lhs = Expr::Bin(op, Box::new(lhs), Box::new(self.unary()?));
        }
    }

    fn unary(&mut self) -> Result<Expr, Exception> {
        if self.eat('-') {
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr, Exception> {
        let mut expr = self.primary()?;
        loop {
            if self.eat('.') {
                expr = Expr::Attr(Box::new(expr), self.name()?);
            } else if self.eat('(') {
                let mut args = Vec::new();
                if !self.eat(')') {
                    loop {
                        args.push(self.expression()?);
                        if self.eat(')') {
                            break;
                        }
                        self.expect(',')?;
                    }
                }
                expr = Expr::Call(Box::new(expr), args);
            } else {
                return Ok(expr);
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, Exception> {
        match self.next() {
            Some(Tok::Int(n)) => Ok(Expr::Int(n)),
            Some(Tok::Str(s)) => Ok(Expr::Str(s)),
            Some(Tok::Name(n)) if !matches!(n.as_str(), "import" | "from" | "raise") => {
                Ok(Expr::Name(n))
            }
            Some(Tok::Sym('(')) => {
                let inner = self.expression()?;
                self.expect(')')?;
                Ok(inner)
            }
            _ => Err(Exception::syntax()),
        }
    }
}

pub struct MockInterpreter {
    globals: FxHashMap<String, Obj>,
    modules: FxHashMap<String, Module>,
    exception: Option<Exception>,
    print: Option<PrintFn>,
    pub os_access: bool,
    /// Number of evaluate/execute calls made on this instance
    pub runs: usize,
}

impl MockInterpreter {
    pub fn has_global(&self, name: &str) -> bool {
        self.globals.contains_key(name)
    }

    pub fn has_module(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn pending_exception(&self) -> Option<&Exception> {
        self.exception.as_ref()
    }

    fn write(&mut self, text: &str) {
        if let Some(print) = self.print.as_mut() {
            print(text);
        }
    }

    fn lookup(&self, name: &str) -> Result<Obj, Exception> {
        if let Some(obj) = self.globals.get(name) {
            return Ok(obj.clone());
        }
        Ok(match name {
            "None" => Obj::None,
            "True" => Obj::Bool(true),
            "False" => Obj::Bool(false),
            "print" => Obj::Builtin("print"),
            "exit" => Obj::Builtin("exit"),
            "unprintable" => Obj::Unprintable,
            _ if parent_of(name).is_some() || name == "BaseException" => {
                Obj::ExcClass(name.to_string())
            }
            _ => {
                return Err(Exception::new(
                    "NameError",
                    format!("name '{}' is not defined", name),
                ))
            }
        })
    }

    fn import(&self, name: &str) -> Result<&Module, Exception> {
        self.modules
            .get(name)
            .ok_or_else(|| Exception::new("ImportError", format!("No module named '{}'", name)))
    }

    fn eval(&mut self, expr: &Expr) -> Result<Obj, Exception> {
        match expr {
            Expr::Int(n) => Ok(Obj::Int(*n)),
            Expr::Str(s) => Ok(Obj::Str(s.clone())),
            Expr::Name(name) => self.lookup(name),
            Expr::Neg(inner) => match self.eval(inner)? {
                Obj::Int(n) => Ok(Obj::Int(-n)),
                other => Err(Exception::new(
                    "TypeError",
                    format!("bad operand type for unary -: '{}'", other.type_name()),
                )),
            },
            Expr::Bin(op, lhs, rhs) => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                binary(*op, lhs, rhs)
            }
            Expr::Attr(target, attr) => {
                let module = match self.eval(target)? {
                    Obj::Module(name) => name,
                    other => {
                        return Err(Exception::new(
                            "AttributeError",
                            format!("'{}' object has no attribute '{}'", other.type_name(), attr),
                        ))
                    }
                };
                let module = self.import(&module)?;
                if let Some(f) = module.functions.get(attr) {
                    Ok(Obj::Func(attr.clone(), f.clone()))
                } else if module.imports.iter().any(|m| m == attr) {
                    Ok(Obj::Module(attr.clone()))
                } else {
                    Err(Exception::new(
                        "AttributeError",
                        format!("module '{}' has no attribute '{}'", module.name, attr),
                    ))
                }
            }
            Expr::Call(callee, args) => {
                let callee = self.eval(callee)?;
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg)?);
                }
                self.call(callee, values)
            }
        }
    }

    fn call(&mut self, callee: Obj, args: Vec<Obj>) -> Result<Obj, Exception> {
        match callee {
            Obj::Func(_, f) => {
                let args: Vec<Value> = args.iter().map(Obj::to_value).collect();
                let result = f(&args)?;
                Ok(Obj::from_value(result))
            }
            Obj::Builtin("print") => {
                let mut parts = Vec::with_capacity(args.len());
                for arg in &args {
                    parts.push(arg.str()?);
                }
                let line = format!("{}\n", parts.join(" "));
                self.write(&line);
                Ok(Obj::None)
            }
            Obj::Builtin("exit") => Err(Exception::new("SystemExit", "")),
            Obj::ExcClass(class) => {
                let message = match args.first() {
                    Some(arg) => arg.str()?,
                    None => String::new(),
                };
                Ok(Obj::Exc(Exception::new(&class, message)))
            }
            other => Err(Exception::new(
                "TypeError",
                format!("'{}' object is not callable", other.type_name()),
            )),
        }
    }

    fn run(&mut self, stmt: &Stmt) -> Result<(), Exception> {
        match stmt {
            Stmt::Expr(expr) => {
                self.eval(expr)?;
            }
            Stmt::Assign(name, expr) => {
                let value = self.eval(expr)?;
                self.globals.insert(name.clone(), value);
            }
            Stmt::Import(name) => {
                self.import(name)?;
                self.globals.insert(name.clone(), Obj::Module(name.clone()));
            }
            Stmt::FromImport(name) => {
                let module = self.import(name)?.clone();
                for (fname, f) in &module.functions {
                    self.globals.insert(fname.clone(), Obj::Func(fname.clone(), f.clone()));
                }
                for sub in &module.imports {
                    self.import(sub)?;
                    self.globals.insert(sub.clone(), Obj::Module(sub.clone()));
                }
            }
            Stmt::Raise(expr) => {
                return Err(match self.eval(expr)? {
                    Obj::ExcClass(class) => Exception::new(&class, ""),
                    Obj::Exc(e) => e,
                    other => Exception::new(
                        "TypeError",
                        format!("exceptions must derive from BaseException, not {}", other.type_name()),
                    ),
                });
            }
        }
        Ok(())
    }

    fn complete(&mut self, result: Result<Obj, Exception>) -> Completion {
        match result {
            Ok(Obj::None) => Completion::NoValue,
            Ok(obj) => match obj.repr() {
                Ok(text) => Completion::Value(Ok(text)),
                Err(e) => {
                    let text = e.formatted();
                    self.exception = Some(e);
                    Completion::Value(Err(text))
                }
            },
            Err(e) => {
                let completion = if derives_from(&e.class, "SystemExit") {
                    Completion::Exit
                } else {
                    Completion::Error(e.formatted())
                };
                self.exception = Some(e);
                completion
            }
        }
    }
}

fn binary(op: char, lhs: Obj, rhs: Obj) -> Result<Obj, Exception> {
    match (op, lhs, rhs) {
        ('+', Obj::Int(a), Obj::Int(b)) => Ok(Obj::Int(a.wrapping_add(b))),
        ('-', Obj::Int(a), Obj::Int(b)) => Ok(Obj::Int(a.wrapping_sub(b))),
        ('*', Obj::Int(a), Obj::Int(b)) => Ok(Obj::Int(a.wrapping_mul(b))),
        ('/', Obj::Int(_), Obj::Int(0)) => {
            Err(Exception::new("ZeroDivisionError", "division by zero"))
        }
        ('/', Obj::Int(a), Obj::Int(b)) => Ok(Obj::Int(a / b)),
        ('+', Obj::Str(a), Obj::Str(b)) => Ok(Obj::Str(a + &b)),
        (op, lhs, rhs) => Err(Exception::new(
            "TypeError",
            format!(
                "unsupported operand type(s) for {}: '{}' and '{}'",
                op,
                lhs.type_name(),
                rhs.type_name()
            ),
        )),
    }
}

impl Interpreter for MockInterpreter {
    fn create(config: EngineConfig) -> Result<Self, EngineError> {
        let created = CREATED.with(|c| {
            let n = c.get();
            c.set(n + 1);
            n
        });
        if FAIL_AFTER.with(|f| f.get()).is_some_and(|limit| created >= limit) {
            return Err(EngineError::CreateFailed);
        }
        Ok(Self {
            globals: FxHashMap::default(),
            modules: FxHashMap::default(),
            exception: None,
            print: config.print,
            os_access: config.enable_os_access,
            runs: 0,
        })
    }

    fn set_global_function(&mut self, name: &str, function: NativeFn) -> Result<(), EngineError> {
        self.globals
            .insert(name.to_string(), Obj::Func(name.to_string(), function));
        Ok(())
    }

    fn register_module(&mut self, module: Module) -> Result<(), EngineError> {
        self.modules.insert(module.name.clone(), module);
        Ok(())
    }

    fn clear_exception(&mut self) {
        self.exception = None;
    }

    fn compiles_as_expression(&mut self, code: &str) -> bool {
        let toks = match tokenize(code.trim()) {
            Ok(toks) => toks,
            Err(_) => return false,
        };
        let mut parser = Parser::new(toks);
        parser.expression().is_ok() && parser.at_end()
    }

    fn evaluate(&mut self, code: &str) -> Completion {
        self.runs += 1;
        let result = tokenize(code.trim()).and_then(|toks| {
            let mut parser = Parser::new(toks);
            let expr = parser.expression()?;
            if !parser.at_end() {
                return Err(Exception::syntax());
            }
            self.eval(&expr)
        });
        self.complete(result)
    }

    fn execute(&mut self, code: &str) -> Completion {
        self.runs += 1;
        let result = tokenize(code).and_then(|toks| Parser::new(toks).program()).and_then(|stmts| {
            for stmt in &stmts {
                self.run(stmt)?;
            }
            Ok(Obj::None)
        });
        match self.complete(result) {
            Completion::Value(_) => Completion::NoValue,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interp() -> MockInterpreter {
        MockInterpreter::create(EngineConfig::default()).unwrap()
    }

    #[test]
    fn classifies_expressions() {
        let mut i = interp();
        assert!(i.compiles_as_expression("1+1"));
        assert!(i.compiles_as_expression("display.set_pixel(1, 2, 3)"));
        assert!(!i.compiles_as_expression("x = 1"));
        assert!(!i.compiles_as_expression("import display"));
        assert!(!i.compiles_as_expression("raise SystemExit"));
        assert!(!i.compiles_as_expression("1 +"));
        assert!(!i.compiles_as_expression(""));
        assert_eq!(i.runs, 0);
    }

    #[test]
    fn evaluates_and_keeps_globals() {
        let mut i = interp();
        assert_eq!(i.execute("x = 6; y = x * 7"), Completion::NoValue);
        assert_eq!(i.evaluate("y"), Completion::Value(Ok("42".into())));
        assert_eq!(i.evaluate("'a' + 'b'"), Completion::Value(Ok("'ab'".into())));
        assert_eq!(i.evaluate("None"), Completion::NoValue);
    }

    #[test]
    fn reports_exit_and_errors() {
        let mut i = interp();
        assert_eq!(i.execute("raise SystemExit"), Completion::Exit);
        assert_eq!(i.execute("exit()"), Completion::Exit);
        assert_eq!(i.execute("raise ShutdownExit('now')"), Completion::Exit);
        assert_eq!(
            i.execute("raise ValueError('bad')"),
            Completion::Error("ValueError: bad\n".into())
        );
        assert_eq!(
            i.evaluate("nope"),
            Completion::Error("NameError: name 'nope' is not defined\n".into())
        );
        assert!(i.pending_exception().is_some());
        i.clear_exception();
        assert!(i.pending_exception().is_none());
    }

    #[test]
    fn creation_can_be_made_to_fail() {
        fail_creation_after(1);
        assert!(MockInterpreter::create(EngineConfig::default()).is_ok());
        assert!(MockInterpreter::create(EngineConfig::default()).is_err());
        allow_creation();
        assert!(MockInterpreter::create(EngineConfig::default()).is_ok());
    }
}
