// Wingbit Simulator Session
// Runs whole micro:bit programs against the host board

use crate::board::{Board, SharedBoard};
use crate::builtins;
use crate::config::SessionConfig;
use crate::engine::{Completion, EngineConfig, Interpreter};
use crate::error::OpenError;
use crate::output::OutputBuffer;
use std::marker::PhantomData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Finished,
    /// The program raised SystemExit
    Exited,
    /// An uncaught error; its text is in the output
    Failed,
}

pub struct Simulator<I: Interpreter> {
    board: SharedBoard,
    config: SessionConfig,
    output: OutputBuffer,
    _engine: PhantomData<fn() -> I>,
}

impl<I: Interpreter> Simulator<I> {
    pub fn new(board: Board, config: SessionConfig) -> Self {
        Self {
            board: board.with_config(&config).into_shared(),
            config,
            output: OutputBuffer::new(),
            _engine: PhantomData,
        }
    }

    pub fn with_output(mut self, output: OutputBuffer) -> Self {
        self.output = output;
        self
    }

    /// Run `code` as a program in a fresh interpreter with every device
    /// module registered. Nothing carries over between runs.
    pub fn run(&mut self, code: &str) -> Result<RunOutcome, OpenError> {
        let sink = self.output.clone();
        let engine_config = EngineConfig::default()
            .with_os_access(self.config.enable_os_access)
            .with_print(move |text| sink.append(text));

        let mut interp = I::create(engine_config).map_err(OpenError::LiveInstance)?;
        builtins::install_board_modules(&mut interp, &self.board)
            .map_err(OpenError::LiveInstance)?;

        log::debug!("running program ({} bytes)", code.len());
        let outcome = match interp.execute(code) {
            Completion::NoValue | Completion::Value(_) => RunOutcome::Finished,
            Completion::Exit => RunOutcome::Exited,
            Completion::Error(message) => {
                log::warn!("program failed: {}", message.trim_end());
                self.output.append(&message);
                RunOutcome::Failed
            }
        };
        interp.clear_exception();
        Ok(outcome)
    }

    pub fn board(&self) -> &SharedBoard {
        &self.board
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
}
