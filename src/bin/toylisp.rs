use std::process;
use toylisp::{cmdline, Environment};

fn main() {
    pretty_env_logger::init();
    let env = Environment::global();
    let args = std::env::args().collect();
    if let Err(e) = cmdline::launch(args, &env) {
        eprintln!("{}", e);
        process::exit(1);
    }
}
