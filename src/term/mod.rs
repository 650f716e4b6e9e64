/*!
## Terminal host

A REPL over `linefeed`. Ctrl-C is delivered to the machine as a break
request and never interrupts a statement part way through.

*/

extern crate ansi_term;
extern crate ctrlc;
extern crate linefeed;
use crate::lang::Error;
use crate::mach::{Event, Runtime, Tape, Teletype};
use ansi_term::Style;
use linefeed::{Interface, ReadResult, Signal, Terminal};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tracing_subscriber::{Layer, Registry};

/// Statements run between checks for Ctrl-C and terminal output.
const CYCLES: usize = 5000;

/// Command line settings.
#[derive(Debug, Default, PartialEq)]
pub struct Options {
    /// Program to load and RUN at start-up.
    pub program: Option<PathBuf>,
}

impl Options {
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Options, String> {
        let mut options = Options::default();
        for arg in args.into_iter().skip(1) {
            if arg.starts_with('-') {
                return Err(format!("unknown option {}", arg));
            }
            if options.program.is_some() {
                return Err("only one program file may be given".to_string());
            }
            options.program = Some(arg.into());
        }
        Ok(options)
    }
}

pub fn main() {
    let options = match Options::from_args(std::env::args()) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}\nusage: basic [program.bas]", message);
            std::process::exit(2);
        }
    };
    init_logging(std::env::var("BASIC_LOG").ok().as_deref());
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");
    if let Err(error) = main_loop(interrupted, options) {
        eprintln!("{}", error);
    }
}

/// Install a stderr subscriber when `level` names a level. Logging stays
/// off otherwise so it never mixes with the REPL.
fn init_logging(level: Option<&str>) {
    let filter = match level.and_then(|l| l.parse::<LevelFilter>().ok()) {
        Some(filter) if filter != LevelFilter::OFF => filter,
        _ => return,
    };
    let layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .with_filter(filter);
    let _ = Registry::default().with(layer).try_init();
}

/// The teletype the REPL hands to the machine. Output collects on a shared
/// tape; errors are painted bold.
struct Console {
    tape: Tape,
}

impl Teletype for Console {
    fn write(&mut self, s: &str) {
        self.tape.write(s)
    }

    fn read(&mut self) -> Option<String> {
        self.tape.read()
    }

    fn column(&self) -> usize {
        self.tape.column()
    }

    fn write_error(&mut self, error: &Error) {
        if self.column() > 0 {
            self.newline();
        }
        let text = if error.is_break() {
            error.to_string()
        } else {
            format!("?{}", error)
        };
        self.write(&format!("{}\n", Style::new().bold().paint(text)));
    }
}

fn main_loop(interrupted: Arc<AtomicBool>, options: Options) -> std::io::Result<()> {
    let tape = Tape::new();
    let mut runtime = Runtime::new(Box::new(Console { tape: tape.clone() }));
    let command = Interface::new("BASIC")?;
    command.set_report_signal(Signal::Interrupt, true);
    let mut partial = String::new();
    let mut ready = true;

    if let Some(path) = &options.program {
        match std::fs::read_to_string(path) {
            Ok(text) => match runtime.load(&text) {
                Ok(()) => {
                    debug!(path = %path.display(), "program loaded");
                    runtime.enter("RUN");
                }
                Err(error) => {
                    command.write_fmt(format_args!(
                        "{}\n",
                        Style::new().bold().paint(format!("?{}", error))
                    ))?;
                }
            },
            Err(error) => {
                command.write_fmt(format_args!("{}: {}\n", path.display(), error))?;
            }
        }
    }

    loop {
        if interrupted.swap(false, Ordering::SeqCst) {
            runtime.interrupt();
        }
        let event = runtime.execute(CYCLES);
        partial.push_str(&tape.take_output());
        match event {
            Event::Running => {
                command.write_fmt(format_args!("{}", partial))?;
                partial.clear();
            }
            Event::Waiting => {
                write_lines(&command, &mut partial)?;
                command.set_prompt(&partial)?;
                partial.clear();
                match command.read_line()? {
                    ReadResult::Input(string) => tape.push_input(&string),
                    ReadResult::Signal(Signal::Interrupt) => {
                        command.set_buffer("")?;
                        command.lock_reader().cancel_read_line()?;
                        runtime.interrupt();
                    }
                    ReadResult::Signal(_) | ReadResult::Eof => break,
                }
            }
            Event::Stopped | Event::Error(_) => {
                if !partial.is_empty() {
                    partial.push('\n');
                }
                command.write_fmt(format_args!("{}", partial))?;
                partial.clear();
                if ready || matches!(event, Event::Error(_)) {
                    command.write_fmt(format_args!("READY.\n"))?;
                }
                command.set_prompt("")?;
                match command.read_line()? {
                    ReadResult::Input(string) => {
                        if runtime.enter(&string) {
                            command.add_history_unique(string);
                        }
                        ready = runtime.is_running();
                    }
                    ReadResult::Signal(Signal::Interrupt) => {
                        command.set_buffer("")?;
                        ready = false;
                    }
                    ReadResult::Signal(_) | ReadResult::Eof => break,
                }
            }
            Event::Exit => {
                command.write_fmt(format_args!("{}", partial))?;
                break;
            }
        }
    }
    Ok(())
}

/// Write every finished line, leaving the unfinished tail in `partial`.
fn write_lines<T: Terminal>(command: &Interface<T>, partial: &mut String) -> std::io::Result<()> {
    if let Some(end) = partial.rfind('\n') {
        let lines: String = partial.drain(..=end).collect();
        command.write_fmt(format_args!("{}", lines))?;
    }
    Ok(())
}
