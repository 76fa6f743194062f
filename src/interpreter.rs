use crate::environment::Environment;
use crate::reader::{self, ReadError, SyntaxNode};
use crate::types::Value;
use crate::{evaluator, syntax};
use std::fmt;
use std::rc::Rc;

pub type Result<T = Value> = std::result::Result<T, Error>;

/// Failures before evaluation starts. Language errors are values instead.
#[derive(Debug, PartialEq)]
pub enum Error {
    Read(ReadError),
    Syntax(syntax::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Read(e) => write!(f, "read error: {}", e),
            Error::Syntax(e) => write!(f, "syntax error: {}", e),
        }
    }
}

impl Error {
    pub fn is_empty_input(&self) -> bool {
        matches!(self, Error::Read(ReadError::Empty))
    }
}

#[allow(non_snake_case)]
pub fn READ(line: &str) -> Result<SyntaxNode> {
    reader::read_str(line).map_err(Error::Read)
}

#[allow(non_snake_case)]
pub fn ADAPT(node: &SyntaxNode) -> Result {
    syntax::to_value(node).map_err(Error::Syntax)
}

#[allow(non_snake_case)]
pub fn EVAL(ast: Value, env: &Rc<Environment>) -> Value {
    evaluator::eval(env, ast)
}

pub fn rep(line: &str, env: &Rc<Environment>) -> Result {
    let node = READ(line)?;
    let ast = ADAPT(&node)?;
    let value = EVAL(ast, env);
    log::debug!("{} => {}", line, value);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn read_adapt_eval() {
        let env = Environment::global();
        assert_eq!(rep("+ 1 2", &env), Ok(Value::Integer(3)));
        assert_eq!(rep("/ 1 0", &env), Ok(Value::Error(ErrorKind::DivZero)));
    }

    #[test]
    fn empty_and_malformed_input_are_distinguished() {
        let env = Environment::global();
        let empty = rep("   ", &env).unwrap_err();
        assert!(empty.is_empty_input());
        let malformed = rep("+ 4 (", &env).unwrap_err();
        assert!(!malformed.is_empty_input());
        assert_eq!(malformed.to_string(), "read error: unclosed list");
    }
}
