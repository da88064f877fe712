// Wingbit CLI
// Usage: wingbit [OPTIONS] [run FILE]

use clap::{Parser, Subcommand};
use colored::*;
use log::LevelFilter;
use std::cell::RefCell;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use wingbit::engine::wings::WingsInterpreter;
use wingbit::host::{ConsoleHost, LedMatrix, Pause, StateReader, ThreadSleep};
use wingbit::{Board, OutputBuffer, Repl, RunOutcome, SessionConfig, Simulator};

/// Wingbit - Wings scripting for a simulated micro:bit
#[derive(Parser)]
#[command(name = "wingbit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Wings scripting for a simulated micro:bit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Session configuration (JSON)
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long = "log-level", global = true, default_value = "off")]
    log_level: LevelFilter,

    /// Log file (used when logging is on)
    #[arg(long = "log-file", global = true, default_value = "wingbit.log")]
    log_file: String,
}

#[derive(Subcommand)]
enum Command {
    /// Run a program against a terminal LED display
    Run {
        /// Program to run
        file: PathBuf,

        /// Board state (JSON) the sensors and buttons read from
        #[arg(short = 's', long = "state")]
        state: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = setup(&cli).and_then(|config| match cli.command {
        Some(Command::Run { ref file, ref state }) => handle_run(file, state.as_deref(), config),
        None => repl(config),
    });

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn setup(cli: &Cli) -> Result<SessionConfig, String> {
    if cli.log_level != LevelFilter::Off {
        wingbit::log::init_log(cli.log_level, &cli.log_file)?;
    }
    match &cli.config {
        Some(path) => SessionConfig::load(path).map_err(|e| e.to_string()),
        None => Ok(SessionConfig::default()),
    }
}

/// Pause that draws the display before sleeping, so every scroll frame
/// and every `sleep` shows up in the terminal
struct TerminalPause {
    leds: Rc<RefCell<LedMatrix>>,
    sleep: ThreadSleep,
}

impl Pause for TerminalPause {
    fn pause(&mut self, ms: u64) {
        print_display(&self.leds.borrow());
        self.sleep.pause(ms);
    }
}

fn print_display(leds: &LedMatrix) {
    let mut frame = String::new();
    for c in leds.render().chars() {
        let cell = match c {
            '.' => ". ".bright_black().to_string(),
            '\n' => "\n".to_string(),
            digit => format!("{} ", digit).red().bold().to_string(),
        };
        frame.push_str(&cell);
    }
    println!("{}", frame);
    let _ = std::io::stdout().flush();
}

fn handle_run(path: &Path, state: Option<&Path>, config: SessionConfig) -> Result<(), String> {
    let source = fs::read_to_string(path)
        .map_err(|e| format!("Error reading file '{}': {}", path.display(), e))?;

    let mut sensors = StateReader::default();
    if let Some(state) = state {
        let json = fs::read_to_string(state)
            .map_err(|e| format!("Error reading file '{}': {}", state.display(), e))?;
        sensors
            .update_json(&json)
            .map_err(|e| format!("Invalid board state '{}': {}", state.display(), e))?;
    }

    let leds = Rc::new(RefCell::new(LedMatrix::new()));
    let pause = TerminalPause {
        leds: leds.clone(),
        sleep: ThreadSleep,
    };
    let board = Board::new(leds.clone(), sensors, pause);

    let output = OutputBuffer::new();
    output.set_listener(|chunk| {
        print!("{}", chunk);
        let _ = std::io::stdout().flush();
    });

    let mut sim: Simulator<WingsInterpreter> = Simulator::new(board, config).with_output(output);
    let outcome = sim.run(&source).map_err(|e| e.to_string())?;
    print_display(&leds.borrow());

    match outcome {
        RunOutcome::Finished | RunOutcome::Exited => Ok(()),
        RunOutcome::Failed => Err(format!("{} failed", path.display())),
    }
}

struct Terminal;

impl ConsoleHost for Terminal {
    fn clear_console(&mut self) {
        print!("\x1B[2J\x1B[1;1H");
        let _ = std::io::stdout().flush();
    }
}

fn repl(config: SessionConfig) -> Result<(), String> {
    use reedline::{
        FileBackedHistory, Prompt, PromptHistorySearch, PromptHistorySearchStatus, Reedline,
        Signal,
    };
    use std::borrow::Cow;

    struct MainPrompt;
    struct ContinuePrompt;

    fn search_indicator(history_search: PromptHistorySearch) -> Cow<'static, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!("({}reverse-search: {}) ", prefix, history_search.term))
    }

    impl Prompt for MainPrompt {
        fn render_prompt_left(&self) -> Cow<'_, str> {
            Cow::Borrowed(">>> ")
        }
        fn render_prompt_right(&self) -> Cow<'_, str> {
            Cow::Borrowed("")
        }
        fn render_prompt_indicator(&self, _: reedline::PromptEditMode) -> Cow<'_, str> {
            Cow::Borrowed("")
        }
        fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
            Cow::Borrowed("... ")
        }
        fn render_prompt_history_search_indicator(
            &self,
            history_search: PromptHistorySearch,
        ) -> Cow<'_, str> {
            search_indicator(history_search)
        }
    }

    impl Prompt for ContinuePrompt {
        fn render_prompt_left(&self) -> Cow<'_, str> {
            Cow::Borrowed("... ")
        }
        fn render_prompt_right(&self) -> Cow<'_, str> {
            Cow::Borrowed("")
        }
        fn render_prompt_indicator(&self, _: reedline::PromptEditMode) -> Cow<'_, str> {
            Cow::Borrowed("")
        }
        fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
            Cow::Borrowed("... ")
        }
        fn render_prompt_history_search_indicator(
            &self,
            history_search: PromptHistorySearch,
        ) -> Cow<'_, str> {
            search_indicator(history_search)
        }
    }

    let output = OutputBuffer::new();
    output.set_listener(|chunk| {
        print!("{}", chunk);
        let _ = std::io::stdout().flush();
    });
    let console: Rc<RefCell<dyn ConsoleHost>> = Rc::new(RefCell::new(Terminal));
    let mut session: Repl<WingsInterpreter> =
        Repl::open_with_output(&config, console, output).map_err(|e| e.to_string())?;

    println!();
    println!(
        "  {}  {}",
        "Wingbit".cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
    println!("  {}", "Type .help for commands, .exit to quit".bright_black());
    println!();

    let history_path = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".wingbit_history");
    let history = Box::new(
        FileBackedHistory::with_file(1000, history_path).map_err(|e| e.to_string())?,
    );

    let mut line_editor = Reedline::create().with_history(history);
    let main_prompt = MainPrompt;
    let continue_prompt = ContinuePrompt;
    let mut block = String::new();

    loop {
        let prompt: &dyn Prompt = if block.is_empty() {
            &main_prompt
        } else {
            &continue_prompt
        };

        match line_editor.read_line(prompt) {
            Ok(Signal::Success(line)) => {
                // An empty line closes an open block
                if line.trim().is_empty() {
                    if !block.is_empty() {
                        let code = std::mem::take(&mut block);
                        session.execute(&code);
                        session.clear_output();
                    }
                    if session.should_exit() {
                        break;
                    }
                    continue;
                }

                let input = line.trim();
                if block.is_empty() && input.starts_with('.') {
                    match input {
                        ".exit" | ".quit" => break,
                        ".help" => print_repl_help(),
                        ".clear" => Terminal.clear_console(),
                        _ => {
                            println!("{} Unknown command: {}", "!".red(), input);
                            println!("  Type {} for available commands", ".help".cyan());
                        }
                    }
                    continue;
                }

                let in_block = !block.is_empty();
                if in_block {
                    block.push('\n');
                }
                block.push_str(&line);

                // A trailing colon opens a block that runs on the next empty line
                if in_block || input.ends_with(':') {
                    continue;
                }

                let code = std::mem::take(&mut block);
                session.execute(&code);
                session.clear_output();
                if session.should_exit() {
                    break;
                }
            }
            Ok(Signal::CtrlC) => {
                if !block.is_empty() {
                    block.clear();
                    println!("{}", "^C (input cleared)".bright_black());
                } else {
                    println!("{}", "^C".bright_black());
                }
            }
            Ok(Signal::CtrlD) => {
                println!("{}", "^D".bright_black());
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    session.close();
    Ok(())
}

fn print_repl_help() {
    println!();
    println!("  {}", "REPL Commands:".cyan().bold());
    println!("    {}    Exit the REPL", ".exit".yellow());
    println!("    {}   Clear the screen", ".clear".yellow());
    println!("    {}    Show this help", ".help".yellow());
    println!();
    println!("  {}", "Builtins:".cyan().bold());
    println!("    {}  Clear the screen", "clear()".yellow());
    println!("    {} Show the version", "version()".yellow());
    println!("    {}  Leave the REPL", "exit()".yellow());
    println!();
    println!("  {}", "Blocks:".cyan().bold());
    println!("    A line ending in {} continues until an empty line", ":".yellow());
    println!();
}
