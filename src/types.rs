use crate::environment::Environment;
use derive_more::{Deref, Display};
use std::borrow::Borrow;
use std::fmt;
use std::fmt::Formatter;
use std::ops::{RangeFrom, RangeInclusive};
use std::rc::Rc;

pub type Int = i64;

/// Outcome of a builtin before it is folded back into the value channel.
pub type Result<T = Value> = std::result::Result<T, ErrorKind>;

#[derive(Deref, Display, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct Symbol(pub String);

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol(name.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DivZero,
    BadOp,
    BadNum,
    UnboundSymbol,
    BadSexprStart,
    BadType,
    Empty,
    TooManyArgs,
    BadArgsCount,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sentence = match self {
            ErrorKind::DivZero => "Division By Zero!",
            ErrorKind::BadOp => "Invalid Operator!",
            ErrorKind::BadNum => "Invalid Number!",
            ErrorKind::UnboundSymbol => "Unbound Symbol!",
            ErrorKind::BadSexprStart => "S-Expression Does Not Start With Function!",
            ErrorKind::BadType => "Incorrect Type!",
            ErrorKind::Empty => "Empty List!",
            ErrorKind::TooManyArgs => "Too Many Arguments!",
            ErrorKind::BadArgsCount => "Incorrect Number Of Arguments!",
        };
        write!(f, "Error: {}", sentence)
    }
}

#[derive(Debug, Clone)]
pub enum Arity {
    Between(RangeInclusive<usize>),
    AtLeast(RangeFrom<usize>),
}

impl Arity {
    pub(crate) const fn exactly(n: usize) -> Self {
        Self::Between(n..=n)
    }

    pub(crate) const fn at_least(n: usize) -> Self {
        Self::AtLeast(n..)
    }

    pub(crate) fn contains(&self, n: usize) -> bool {
        match self {
            Self::Between(range) => range.contains(&n),
            Self::AtLeast(range) => range.contains(&n),
        }
    }

    /// Too many arguments and too few arguments are reported differently.
    pub(crate) fn validate_for(&self, n: usize, name: &str) -> Result<()> {
        if self.contains(n) {
            return Ok(());
        }
        log::trace!("{} expected {} arguments, received {}", name, self, n);
        match self {
            Self::Between(range) if n > *range.end() => Err(ErrorKind::TooManyArgs),
            _ => Err(ErrorKind::BadArgsCount),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Between(r) => {
                if r.start() == r.end() {
                    write!(f, "exactly {}", r.start())
                } else {
                    write!(f, "from {} to {}", r.start(), r.end())
                }
            }
            Arity::AtLeast(r) => write!(f, "at least {}", r.start),
        }
    }
}

/// Whether a builtin sees its arguments reduced or exactly as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arguments {
    Evaluated,
    Quoted,
}

pub struct Builtin {
    pub name: &'static str,
    pub arity: Arity,
    pub arguments: Arguments,
    pub fn_ptr: fn(&Rc<Environment>, Vec<Value>) -> Result,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "builtin function #<{}>", self.name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Formals {
    pub positional: Vec<Symbol>,
    pub others: Option<Symbol>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum BadFormals {
    TooManyAmpersands(usize),
    NothingAfterAmpersand,
    AmpersandPositionNotPenultimate,
}

impl Formals {
    pub fn new(mut symbols: Vec<Symbol>) -> std::result::Result<Self, BadFormals> {
        let is_ampersand = |s: &Symbol| s.as_str() == "&";
        let ampersand_count = symbols.iter().filter(|s| is_ampersand(*s)).count();

        match ampersand_count {
            0 => Ok(Formals {
                positional: symbols,
                others: None,
            }),
            1 => match symbols.iter().position(is_ampersand) {
                Some(i) if i + 1 == symbols.len() => Err(BadFormals::NothingAfterAmpersand),
                Some(i) if i + 2 == symbols.len() => {
                    let others = symbols.pop();
                    symbols.truncate(i);
                    Ok(Formals {
                        positional: symbols,
                        others,
                    })
                }
                _ => Err(BadFormals::AmpersandPositionNotPenultimate),
            },
            n => Err(BadFormals::TooManyAmpersands(n)),
        }
    }

    pub fn arity(&self) -> Arity {
        match self.others {
            None => Arity::exactly(self.positional.len()),
            Some(_) => Arity::at_least(self.positional.len()),
        }
    }
}

impl fmt::Display for Formals {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.positional.iter().map(|s| s.as_str()).collect();
        if let Some(rest) = &self.others {
            names.push("&");
            names.push(rest.as_str());
        }
        write!(f, "{{{}}}", names.join(" "))
    }
}

#[derive(Clone)]
pub struct Lambda {
    pub formals: Formals,
    pub body: Vec<Value>,
    pub closure: Rc<Environment>,
}

impl fmt::Debug for Lambda {
    // Not derived: the closure may well contain this Lambda.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lambda{{formals: {:?}, body: {:?}}}",
            self.formals, self.body
        )
    }
}

impl PartialEq for Lambda {
    fn eq(&self, other: &Self) -> bool {
        self.formals == other.formals
            && self.body == other.body
            && Rc::ptr_eq(&self.closure, &other.closure)
    }
}

#[derive(Debug, Clone)]
pub enum Function {
    Builtin(&'static Builtin),
    Lambda(Lambda),
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Function::Builtin(x), Function::Builtin(y)) => x.name == y.name,
            (Function::Lambda(x), Function::Lambda(y)) => x == y,
            _ => false,
        }
    }
}

/// Cloning a `Value` copies the whole tree; nothing is shared except a
/// lambda's closure.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(Int),
    Double(f64),
    Error(ErrorKind),
    Symbol(Symbol),
    Function(Function),
    SExpr(Vec<Value>),
    QExpr(Vec<Value>),
}

impl Value {
    /// The canonical "no value" result.
    pub fn empty() -> Self {
        Value::SExpr(Vec::new())
    }

    pub fn new_symbol(name: &str) -> Self {
        Value::Symbol(Symbol::from(name))
    }

    pub(crate) fn into_qexpr(self) -> Result<Vec<Value>> {
        match self {
            Value::QExpr(children) => Ok(children),
            _ => Err(ErrorKind::BadType),
        }
    }

    pub(crate) fn into_symbol(self) -> Result<Symbol> {
        match self {
            Value::Symbol(s) => Ok(s),
            _ => Err(ErrorKind::BadType),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }
}

impl From<ErrorKind> for Value {
    fn from(kind: ErrorKind) -> Self {
        Value::Error(kind)
    }
}
