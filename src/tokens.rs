use regex::Regex;
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Bracket {
    Round,
    Brace,
}

#[derive(Debug, Eq, PartialEq)]
pub enum Token<'a> {
    Open(Bracket),
    Close(Bracket),
    Comment(&'a str),
    PlainChars(&'a str),
}

#[derive(Debug, PartialEq)]
pub enum TokenizerError {
    NoFirstCharacter,
    NoCapture(String),
}

impl fmt::Display for TokenizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizerError::NoFirstCharacter => write!(f, "no characters to parse token from"),
            TokenizerError::NoCapture(rest) => write!(f, "could not tokenize '{}'", rest),
        }
    }
}

fn create_token(captured: &str) -> Result<Token, TokenizerError> {
    let first_char = captured
        .as_bytes()
        .first()
        .ok_or(TokenizerError::NoFirstCharacter)?;
    match first_char {
        b'(' => Ok(Token::Open(Bracket::Round)),
        b'{' => Ok(Token::Open(Bracket::Brace)),
        b')' => Ok(Token::Close(Bracket::Round)),
        b'}' => Ok(Token::Close(Bracket::Brace)),
        // ; is ASCII so slicing past it is safe even for non-ASCII comments.
        b';' => Ok(Token::Comment(&captured[1..])),
        _ => Ok(Token::PlainChars(captured)),
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, TokenizerError> {
    lazy_static! {
        static ref TOKEN_RE: Regex = Regex::new(
            r#"(?x)                          # ignore whitespace in this pattern & allow comments
                ^[\s,]*                      # whitespace or commas, ignored
                (                            # token capture group
                    [(){}]                   # brackets
                    |;.*                     # comments
                    |[^\s(){};,]+            # one or more plain characters
                )
                [\s,]*                       # whitespace or commas, ignored
            "#
        )
        .unwrap();
        static ref BLANK_RE: Regex = Regex::new(r"^[\s,]*$").unwrap();
    }
    let mut input = input;
    let mut tokens = Vec::new();
    while !BLANK_RE.is_match(input) {
        let caps = TOKEN_RE
            .captures(input)
            .ok_or_else(|| TokenizerError::NoCapture(String::from(input)))?;
        let (token, whole) = match (caps.get(1), caps.get(0)) {
            (Some(token), Some(whole)) => (token, whole),
            _ => return Err(TokenizerError::NoCapture(String::from(input))),
        };
        tokens.push(create_token(token.as_str())?);
        input = &input[whole.end()..];
    }
    Ok(tokens)
}
