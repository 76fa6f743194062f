use crate::environment::Environment;
use crate::interpreter;
use crate::printer;
use crate::types::Value;
use ansi_term::Colour::Red;
use linefeed::{DefaultTerminal, Interface, ReadResult, Terminal};
use std::fmt;
use std::fs::read_to_string;
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;

/// Results longer than this are cut short when printed.
pub const OUTPUT_CAPACITY: usize = 4096;

#[derive(Debug)]
pub enum Error {
    IO(std::io::Error),
    File(PathBuf, std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IO(e) => write!(f, "io error: {}", e),
            Error::File(path, e) => write!(f, "cannot read {}: {}", path.display(), e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::IO(e)
    }
}

pub fn setup() -> std::io::Result<Interface<DefaultTerminal>> {
    let interface = linefeed::Interface::new("toylisp")?;
    interface.set_prompt("toylisp> ")?;
    if let Some(path) = history_path() {
        interface.load_history(path).ok();
    };
    Ok(interface)
}

fn history_path() -> Option<PathBuf> {
    match dirs::data_dir() {
        Some(mut path) => {
            path.push(".toylisp_history");
            Some(path)
        }
        None => None,
    }
}

pub fn save_history<T: Terminal>(interface: &Interface<T>) -> std::io::Result<()> {
    match history_path() {
        Some(path) => interface.save_history(path),
        None => Ok(()),
    }
}

/// Renders a result through the bounded printer, colouring errors when
/// writing to a terminal.
pub fn format_value(value: &Value) -> String {
    let mut buffer = [0u8; OUTPUT_CAPACITY];
    let written = printer::render(value, &mut buffer);
    let text = String::from_utf8_lossy(&buffer[..written]).into_owned();
    match value.is_error() && atty::is(atty::Stream::Stdout) {
        true => Red.paint(text).to_string(),
        false => text,
    }
}

/// One line of input to one line of output, or nothing for a blank line.
pub fn process_line(line: &str, env: &Rc<Environment>) -> Option<String> {
    match interpreter::rep(line, env) {
        Ok(value) => Some(format_value(&value)),
        Err(e) if e.is_empty_input() => None,
        Err(e) => Some(format!("Error: {}", e)),
    }
}

pub fn repl<T: Terminal>(interface: &Interface<T>, env: &Rc<Environment>) {
    loop {
        match interface.read_line() {
            Ok(ReadResult::Eof) => break,
            Ok(ReadResult::Signal(sig)) => {
                writeln!(interface, "Received signal {:?}", sig).ok();
            }
            Ok(ReadResult::Input(line)) => {
                interface.add_history_unique(line.clone());
                if let Some(output) = process_line(&line, env) {
                    writeln!(interface, "{}", output).ok();
                }
            }
            Err(e) => {
                writeln!(interface, "Error: {}", e).ok();
                break;
            }
        }
    }
}

/// Evaluates every line of `source` in `env`, writing each result to `out`.
pub fn run_source(source: &str, env: &Rc<Environment>, out: &mut impl Write) -> Result<(), Error> {
    for line in source.lines() {
        if let Some(output) = process_line(line, env) {
            writeln!(out, "{}", output)?;
        }
    }
    Ok(())
}

/// With file arguments, runs each file in turn; otherwise starts the REPL.
pub fn launch(args: Vec<String>, env: &Rc<Environment>) -> Result<(), Error> {
    let files = &args[args.len().min(1)..];
    if files.is_empty() {
        let interface = setup()?;
        repl(&interface, env);
        save_history(&interface)?;
        return Ok(());
    }
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for file in files {
        log::info!("running {}", file);
        let source = read_to_string(file).map_err(|e| Error::File(file.into(), e))?;
        run_source(&source, env, &mut out)?;
    }
    Ok(())
}
