use crate::environment::Environment;
use crate::evaluator;
use crate::special_forms::{DEF, LAMBDA, LIST, PUT, QUOTE};
use crate::types::{Arguments, Arity, Builtin, ErrorKind, Int, Result, Value};
use std::collections::HashMap;
use std::convert::TryFrom;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Min,
    Max,
}

fn int_op(op: NumOp, x: Int, y: Int) -> Result<Int> {
    match op {
        NumOp::Add => Ok(x.wrapping_add(y)),
        NumOp::Sub => Ok(x.wrapping_sub(y)),
        NumOp::Mul => Ok(x.wrapping_mul(y)),
        NumOp::Div | NumOp::Rem if y == 0 => Err(ErrorKind::DivZero),
        NumOp::Div => Ok(x.wrapping_div(y)),
        NumOp::Rem => Ok(x.wrapping_rem(y)),
        NumOp::Pow => int_pow(x, y),
        NumOp::Min => Ok(x.min(y)),
        NumOp::Max => Ok(x.max(y)),
    }
}

fn int_pow(base: Int, exponent: Int) -> Result<Int> {
    match u64::try_from(exponent) {
        Ok(mut e) => {
            let mut result: Int = 1;
            let mut square = base;
            while e > 0 {
                if e & 1 == 1 {
                    result = result.wrapping_mul(square);
                }
                square = square.wrapping_mul(square);
                e >>= 1;
            }
            Ok(result)
        }
        // Negative exponent: the integer part of 1 / base^|exponent|.
        Err(_) => match base {
            0 => Err(ErrorKind::DivZero),
            1 => Ok(1),
            -1 if exponent % 2 == 0 => Ok(1),
            -1 => Ok(-1),
            _ => Ok(0),
        },
    }
}

/// Results stay finite: overflow and NaN come back as `BadNum`.
fn double_op(op: NumOp, x: f64, y: f64) -> Result<f64> {
    let result = match op {
        NumOp::Add => x + y,
        NumOp::Sub => x - y,
        NumOp::Mul => x * y,
        NumOp::Div | NumOp::Rem if y == 0.0 => return Err(ErrorKind::DivZero),
        NumOp::Pow if x == 0.0 && y < 0.0 => return Err(ErrorKind::DivZero),
        NumOp::Div => x / y,
        NumOp::Rem => x % y,
        NumOp::Pow => x.powf(y),
        NumOp::Min => x.min(y),
        NumOp::Max => x.max(y),
    };
    match result.is_finite() {
        true => Ok(result),
        false => Err(ErrorKind::BadNum),
    }
}

enum Numbers {
    Integers(Vec<Int>),
    Doubles(Vec<f64>),
}

fn grab_numbers(args: &[Value]) -> Result<Numbers> {
    let mut integers = Vec::with_capacity(args.len());
    let mut doubles = Vec::with_capacity(args.len());
    let mut promote = false;
    for arg in args {
        match arg {
            Value::Integer(x) => {
                integers.push(*x);
                doubles.push(*x as f64);
            }
            Value::Double(x) => {
                promote = true;
                doubles.push(*x);
            }
            _ => return Err(ErrorKind::BadNum),
        }
    }
    Ok(match promote {
        true => Numbers::Doubles(doubles),
        false => Numbers::Integers(integers),
    })
}

fn fold<T: Copy>(
    op: NumOp,
    xs: &[T],
    negate: fn(T) -> T,
    combine: fn(NumOp, T, T) -> Result<T>,
) -> Result<T> {
    let (&first, rest) = xs.split_first().ok_or(ErrorKind::BadArgsCount)?;
    if rest.is_empty() && op == NumOp::Sub {
        return Ok(negate(first));
    }
    rest.iter().try_fold(first, |acc, &x| combine(op, acc, x))
}

/// Folds `args` left to right. A single `Double` anywhere promotes the
/// whole computation.
pub(crate) fn fold_numbers(op: NumOp, args: Vec<Value>) -> Result {
    match grab_numbers(&args)? {
        Numbers::Integers(xs) => fold(op, &xs, Int::wrapping_neg, int_op).map(Value::Integer),
        Numbers::Doubles(xs) => fold(op, &xs, |x: f64| -x, double_op).map(Value::Double),
    }
}

macro_rules! numeric_builtin {
    ($SYMBOL:tt, $NAME:ident, $OP:ident) => {
        paste::item! {
            const $NAME: Builtin = Builtin {
                name: stringify!($SYMBOL),
                arity: Arity::at_least(1),
                arguments: Arguments::Evaluated,
                fn_ptr: [<$NAME:lower>],
            };

            fn [<$NAME:lower>](_env: &Rc<Environment>, args: Vec<Value>) -> Result {
                fold_numbers(NumOp::$OP, args)
            }
        }
    };
}

numeric_builtin!(+, ADD, Add);
numeric_builtin!(-, SUB, Sub);
numeric_builtin!(*, MUL, Mul);
numeric_builtin!(/, DIV, Div);
numeric_builtin!(%, REM, Rem);
numeric_builtin!(^, POW, Pow);
numeric_builtin!(min, MIN, Min);
numeric_builtin!(max, MAX, Max);

fn single_list(args: Vec<Value>) -> Result<Vec<Value>> {
    let list = args.into_iter().next().ok_or(ErrorKind::BadArgsCount)?;
    list.into_qexpr()
}

fn non_empty_list(args: Vec<Value>) -> Result<Vec<Value>> {
    let list = single_list(args)?;
    match list.is_empty() {
        true => Err(ErrorKind::Empty),
        false => Ok(list),
    }
}

const HEAD: Builtin = Builtin {
    name: "head",
    arity: Arity::exactly(1),
    arguments: Arguments::Evaluated,
    fn_ptr: head_,
};

const CAR: Builtin = Builtin {
    name: "car",
    ..HEAD
};

fn head_(_env: &Rc<Environment>, args: Vec<Value>) -> Result {
    let mut list = non_empty_list(args)?;
    list.truncate(1);
    Ok(Value::QExpr(list))
}

const TAIL: Builtin = Builtin {
    name: "tail",
    arity: Arity::exactly(1),
    arguments: Arguments::Evaluated,
    fn_ptr: tail_,
};

const CDR: Builtin = Builtin {
    name: "cdr",
    ..TAIL
};

fn tail_(_env: &Rc<Environment>, args: Vec<Value>) -> Result {
    let mut list = non_empty_list(args)?;
    list.remove(0);
    Ok(Value::QExpr(list))
}

const INIT: Builtin = Builtin {
    name: "init",
    arity: Arity::exactly(1),
    arguments: Arguments::Evaluated,
    fn_ptr: init_,
};

fn init_(_env: &Rc<Environment>, args: Vec<Value>) -> Result {
    let mut list = non_empty_list(args)?;
    list.pop();
    Ok(Value::QExpr(list))
}

const JOIN: Builtin = Builtin {
    name: "join",
    arity: Arity::at_least(1),
    arguments: Arguments::Evaluated,
    fn_ptr: join_,
};

fn join_(_env: &Rc<Environment>, args: Vec<Value>) -> Result {
    let mut output = Vec::new();
    for arg in args {
        output.extend(arg.into_qexpr()?);
    }
    Ok(Value::QExpr(output))
}

const LEN: Builtin = Builtin {
    name: "len",
    arity: Arity::exactly(1),
    arguments: Arguments::Evaluated,
    fn_ptr: len_,
};

fn len_(_env: &Rc<Environment>, args: Vec<Value>) -> Result {
    let list = single_list(args)?;
    Ok(Value::Integer(list.len() as Int))
}

const CONS: Builtin = Builtin {
    name: "cons",
    arity: Arity::exactly(2),
    arguments: Arguments::Evaluated,
    fn_ptr: cons_,
};

/// The first argument always becomes exactly one element, lists included.
fn cons_(_env: &Rc<Environment>, args: Vec<Value>) -> Result {
    let mut args = args.into_iter();
    let (head, tail) = match (args.next(), args.next()) {
        (Some(head), Some(tail)) => (head, tail.into_qexpr()?),
        _ => return Err(ErrorKind::BadArgsCount),
    };
    let mut elements = Vec::with_capacity(tail.len() + 1);
    elements.push(head);
    elements.extend(tail);
    Ok(Value::QExpr(elements))
}

const EVAL: Builtin = Builtin {
    name: "eval",
    arity: Arity::exactly(1),
    arguments: Arguments::Evaluated,
    fn_ptr: eval_,
};

fn eval_(env: &Rc<Environment>, args: Vec<Value>) -> Result {
    let expr = single_list(args)?;
    Ok(evaluator::eval(env, Value::SExpr(expr)))
}

static BUILTINS: &[Builtin] = &[
    // Arithmetic
    ADD, SUB, MUL, DIV, REM, POW, MIN, MAX,
    // Working with lists
    LIST, QUOTE, HEAD, CAR, TAIL, CDR, INIT, JOIN, LEN, CONS, EVAL,
    // Definitions and functions
    DEF, PUT, LAMBDA,
];

type Namespace = HashMap<&'static str, &'static Builtin>;
lazy_static! {
    pub static ref CORE: Namespace = {
        let mut map = Namespace::new();
        for func in BUILTINS {
            map.insert(func.name, func);
        }
        map
    };
}

pub fn builtin(name: &str) -> Option<&'static Builtin> {
    CORE.get(name).copied()
}
