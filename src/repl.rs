// Wingbit REPL Session
// Feeds console input to the interpreter, echoing expression values

use crate::builtins;
use crate::config::SessionConfig;
use crate::engine::{Completion, EngineConfig, Interpreter};
use crate::error::OpenError;
use crate::host::ConsoleHost;
use crate::output::OutputBuffer;
use std::cell::RefCell;
use std::rc::Rc;

/// How a line of input was run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// A standalone expression; its value is echoed
    Expression,
    /// One or more statements; nothing is echoed
    Statements,
}

/// One console session. Holds the live interpreter and a second instance
/// that only ever compiles input to tell expressions from statements.
pub struct Repl<I: Interpreter> {
    live: I,
    checker: I,
    output: OutputBuffer,
    should_exit: bool,
}

impl<I: Interpreter> Repl<I> {
    pub fn open(
        config: &SessionConfig,
        console: Rc<RefCell<dyn ConsoleHost>>,
    ) -> Result<Self, OpenError> {
        Self::open_with_output(config, console, OutputBuffer::new())
    }

    /// Open a session printing into `output` (which may carry a listener)
    pub fn open_with_output(
        config: &SessionConfig,
        console: Rc<RefCell<dyn ConsoleHost>>,
        output: OutputBuffer,
    ) -> Result<Self, OpenError> {
        let sink = output.clone();
        let engine_config = EngineConfig::default()
            .with_os_access(config.enable_os_access)
            .with_print(move |text| sink.append(text));

        let mut live = I::create(engine_config).map_err(OpenError::LiveInstance)?;
        builtins::install_console_globals(&mut live, console).map_err(OpenError::LiveInstance)?;

        let checker = I::create(EngineConfig::default()).map_err(OpenError::CheckerInstance)?;

        log::debug!("repl session opened");
        Ok(Self {
            live,
            checker,
            output,
            should_exit: false,
        })
    }

    pub fn close(self) {
        log::debug!("repl session closed");
    }

    /// Run one chunk of console input. Expression values are echoed with a
    /// trailing newline; uncaught errors are printed; a program-exit request
    /// sets `should_exit` instead of printing anything.
    pub fn execute(&mut self, code: &str) -> InputMode {
        self.checker.clear_exception();
        let (mode, completion) = if self.checker.compiles_as_expression(code) {
            (InputMode::Expression, self.live.evaluate(code))
        } else {
            (InputMode::Statements, self.live.execute(code))
        };
        log::debug!("executed input as {:?}", mode);

        self.should_exit = false;
        match completion {
            Completion::Exit => self.should_exit = true,
            Completion::Error(message) => {
                log::warn!("script error: {}", message.trim_end());
                self.output.append(&message);
            }
            Completion::Value(Ok(mut repr)) => {
                repr.push('\n');
                self.output.append(&repr);
            }
            Completion::Value(Err(message)) => self.output.append(&message),
            Completion::NoValue => {}
        }

        self.live.clear_exception();
        mode
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn output(&self) -> String {
        self.output.contents()
    }

    pub fn take_output(&mut self) -> String {
        self.output.take()
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    #[cfg(test)]
    pub(crate) fn checker(&self) -> &I {
        &self.checker
    }

    #[cfg(test)]
    pub(crate) fn live(&self) -> &I {
        &self.live
    }
}
