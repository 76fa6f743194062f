use crate::tokens::{tokenize, Bracket, Token, TokenizerError};
use regex::Regex;
use std::fmt;
use std::iter::Peekable;
use std::slice;

type Reader<'a> = Peekable<slice::Iter<'a, Token<'a>>>;

/// A node of the tagged syntax tree handed to the adapter in `syntax`.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub tag: String,
    pub contents: String,
    pub children: Vec<SyntaxNode>,
}

pub const ROOT_TAG: &str = ">";

impl SyntaxNode {
    fn leaf(tag: &str, contents: &str) -> Self {
        Self {
            tag: tag.into(),
            contents: contents.into(),
            children: Vec::new(),
        }
    }

    fn group(tag: &str, children: Vec<SyntaxNode>) -> Self {
        Self {
            tag: tag.into(),
            contents: String::new(),
            children,
        }
    }

    /// Number of nodes in this tree, counting `self`.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(SyntaxNode::size).sum::<usize>()
    }
}

#[derive(Debug, PartialEq)]
pub enum Malformed {
    Tokenizer(TokenizerError),
    UnclosedList,
    UnexpectedClose(Bracket),
    MismatchedClose { expected: Bracket, got: Bracket },
    BadToken(String),
}

#[derive(Debug, PartialEq)]
pub enum ReadError {
    /// Nothing but whitespace and comments.
    Empty,
    Malformed(Malformed),
}

pub type Result<T = SyntaxNode> = std::result::Result<T, ReadError>;

fn closing_char(b: Bracket) -> char {
    match b {
        Bracket::Round => ')',
        Bracket::Brace => '}',
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Empty => write!(f, "empty input"),
            ReadError::Malformed(Malformed::Tokenizer(e)) => write!(f, "tokenizer failed: {}", e),
            ReadError::Malformed(Malformed::UnclosedList) => write!(f, "unclosed list"),
            ReadError::Malformed(Malformed::UnexpectedClose(b)) => {
                write!(f, "unexpected '{}'", closing_char(*b))
            }
            ReadError::Malformed(Malformed::MismatchedClose { expected, got }) => write!(
                f,
                "expected '{}' but found '{}'",
                closing_char(*expected),
                closing_char(*got)
            ),
            ReadError::Malformed(Malformed::BadToken(t)) => write!(f, "unrecognised token '{}'", t),
        }
    }
}

/// Parses a whole line into a root node whose children are its top-level
/// expressions.
pub fn read_str(input: &str) -> Result {
    let tokens = tokenize(input).map_err(|e| ReadError::Malformed(Malformed::Tokenizer(e)))?;
    let tokens: Vec<Token> = tokens
        .into_iter()
        .filter(|t| !matches!(t, Token::Comment(_)))
        .collect();
    if tokens.is_empty() {
        log::debug!("read: empty input");
        return Err(ReadError::Empty);
    }
    let mut reader = tokens.iter().peekable();
    let mut children = Vec::new();
    while reader.peek().is_some() {
        children.push(read_form(&mut reader)?);
    }
    let root = SyntaxNode::group(ROOT_TAG, children);
    log::debug!("read {} nodes from '{}'", root.size(), input);
    Ok(root)
}

fn read_form(reader: &mut Reader) -> Result {
    match reader.next() {
        Some(Token::Open(bracket)) => read_group(reader, *bracket),
        Some(Token::Close(bracket)) => Err(ReadError::Malformed(Malformed::UnexpectedClose(
            *bracket,
        ))),
        Some(Token::PlainChars(chars)) => read_atom(chars),
        Some(Token::Comment(_)) | None => Err(ReadError::Malformed(Malformed::UnclosedList)),
    }
}

fn read_group(reader: &mut Reader, open: Bracket) -> Result {
    let mut children = Vec::new();
    loop {
        match reader.peek() {
            Some(Token::Close(close)) => {
                let close = *close;
                reader.next();
                if close != open {
                    return Err(ReadError::Malformed(Malformed::MismatchedClose {
                        expected: open,
                        got: close,
                    }));
                }
                break;
            }
            Some(_) => children.push(read_form(reader)?),
            None => return Err(ReadError::Malformed(Malformed::UnclosedList)),
        }
    }
    let tag = match open {
        Bracket::Round => "sexpr",
        Bracket::Brace => "qexpr",
    };
    Ok(SyntaxNode::group(tag, children))
}

fn read_atom(chars: &str) -> Result {
    lazy_static! {
        static ref LONG_RE: Regex = Regex::new(r"^-?[0-9]+$").unwrap();
        static ref DOUBLE_RE: Regex =
            Regex::new(r"^-?(([0-9]+\.[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+)$")
                .unwrap();
        static ref SYMBOL_RE: Regex = Regex::new(r"^[a-zA-Z0-9_+\-*/\\=<>!&%^?]+$").unwrap();
    }
    let tag = if LONG_RE.is_match(chars) {
        "long"
    } else if DOUBLE_RE.is_match(chars) {
        "double"
    } else if SYMBOL_RE.is_match(chars) {
        "symbol"
    } else {
        return Err(ReadError::Malformed(Malformed::BadToken(chars.into())));
    };
    Ok(SyntaxNode::leaf(tag, chars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tags(node: &SyntaxNode) -> Vec<&str> {
        node.children.iter().map(|c| c.tag.as_str()).collect()
    }

    #[test]
    fn atoms_are_tagged() {
        let root = read_str("+ 1.1 1").unwrap();
        assert_eq!(root.tag, ROOT_TAG);
        assert_eq!(tags(&root), vec!["symbol", "double", "long"]);
        assert_eq!(root.size(), 4);
    }

    #[test]
    fn number_forms() {
        let root = read_str("-5 20. .5 -0.25 1e-16 2E3 - -x").unwrap();
        assert_eq!(
            tags(&root),
            vec!["long", "double", "double", "double", "double", "double", "symbol", "symbol"]
        );
    }

    #[test]
    fn groups_nest() {
        let root = read_str(" { (+ 1 2 3 ) }").unwrap();
        assert_eq!(tags(&root), vec!["qexpr"]);
        let qexpr = &root.children[0];
        assert_eq!(tags(qexpr), vec!["sexpr"]);
        assert_eq!(tags(&qexpr.children[0]), vec!["symbol", "long", "long", "long"]);
    }

    #[test]
    fn lambda_backslash_is_a_symbol() {
        let root = read_str(r"\ {x & xs} {x}").unwrap();
        assert_eq!(root.children[0].tag, "symbol");
        assert_eq!(root.children[0].contents, "\\");
    }

    #[test]
    fn empty_input() {
        assert_eq!(read_str("  "), Err(ReadError::Empty));
        assert_eq!(read_str(""), Err(ReadError::Empty));
        assert_eq!(read_str("; only a comment"), Err(ReadError::Empty));
    }

    #[test]
    fn malformed_input() {
        assert_eq!(
            read_str("+ 4 ("),
            Err(ReadError::Malformed(Malformed::UnclosedList))
        );
        assert_eq!(
            read_str("+ 4 )"),
            Err(ReadError::Malformed(Malformed::UnexpectedClose(Bracket::Round)))
        );
        assert_eq!(
            read_str("(+ 4}"),
            Err(ReadError::Malformed(Malformed::MismatchedClose {
                expected: Bracket::Round,
                got: Bracket::Brace
            }))
        );
        assert_eq!(
            read_str("+ 4 \"str\""),
            Err(ReadError::Malformed(Malformed::BadToken("\"str\"".into())))
        );
    }
}
