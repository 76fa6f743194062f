//! Turns the reader's tagged syntax tree into expression values.

use crate::reader::{SyntaxNode, ROOT_TAG};
use crate::types::{ErrorKind, Int, Value};
use std::fmt;

#[derive(Debug, PartialEq)]
pub enum Error {
    /// The node carries a tag the adapter does not know; do not evaluate.
    UnknownTag(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownTag(tag) => write!(f, "unknown syntax tree tag '{}'", tag),
        }
    }
}

pub fn to_value(node: &SyntaxNode) -> Result<Value, Error> {
    match node.tag.as_str() {
        "long" => Ok(node
            .contents
            .parse::<Int>()
            .map(Value::Integer)
            .unwrap_or(Value::Error(ErrorKind::BadNum))),
        "double" => Ok(node
            .contents
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .map_or(Value::Error(ErrorKind::BadNum), Value::Double)),
        "symbol" => Ok(Value::new_symbol(&node.contents)),
        "sexpr" | ROOT_TAG => children(node).map(Value::SExpr),
        "qexpr" => children(node).map(Value::QExpr),
        tag => Err(Error::UnknownTag(tag.into())),
    }
}

fn children(node: &SyntaxNode) -> Result<Vec<Value>, Error> {
    node.children.iter().map(to_value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_str;
    use pretty_assertions::assert_eq;

    fn adapt(input: &str) -> Value {
        to_value(&read_str(input).unwrap()).unwrap()
    }

    #[test]
    fn root_becomes_an_sexpr() {
        assert_eq!(
            adapt("+ 1 2.5"),
            Value::SExpr(vec![
                Value::new_symbol("+"),
                Value::Integer(1),
                Value::Double(2.5)
            ])
        );
    }

    #[test]
    fn braces_and_parentheses() {
        assert_eq!(
            adapt("{a (b)}"),
            Value::SExpr(vec![Value::QExpr(vec![
                Value::new_symbol("a"),
                Value::SExpr(vec![Value::new_symbol("b")]),
            ])])
        );
    }

    #[test]
    fn oversized_integers_are_bad_numbers() {
        assert_eq!(
            adapt("99999999999999999999"),
            Value::SExpr(vec![Value::Error(ErrorKind::BadNum)])
        );
    }

    #[test]
    fn out_of_range_doubles_are_bad_numbers() {
        assert_eq!(
            adapt("1e999 1e308"),
            Value::SExpr(vec![Value::Error(ErrorKind::BadNum), Value::Double(1e308)])
        );
    }

    #[test]
    fn unknown_tags_are_rejected() {
        let node = SyntaxNode {
            tag: "string".into(),
            contents: "\"hi\"".into(),
            children: vec![],
        };
        assert_eq!(to_value(&node), Err(Error::UnknownTag("string".into())));
    }
}
