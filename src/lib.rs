pub mod cmdline;
pub mod core;
pub mod environment;
pub mod evaluator;
pub mod interpreter;
pub mod printer;
pub mod reader;
pub mod special_forms;
pub mod syntax;
pub mod types;

#[macro_use]
extern crate lazy_static;

mod tokens;

pub use environment::Environment;
pub use evaluator::eval;
pub use printer::render;
pub use types::{ErrorKind, Value};
