use crate::environment::Environment;
use crate::types::{
    Arguments, Arity, Builtin, ErrorKind, Formals, Function, Lambda, Result, Symbol, Value,
};
use std::rc::Rc;

pub(crate) const LIST: Builtin = Builtin {
    name: "list",
    arity: Arity::at_least(0),
    arguments: Arguments::Quoted,
    fn_ptr: list_,
};

pub(crate) const QUOTE: Builtin = Builtin {
    name: "quote",
    ..LIST
};

fn list_(_env: &Rc<Environment>, args: Vec<Value>) -> Result {
    Ok(Value::QExpr(args))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Global,
    Local,
}

pub(crate) const DEF: Builtin = Builtin {
    name: "def",
    arity: Arity::at_least(2),
    arguments: Arguments::Evaluated,
    fn_ptr: def_,
};

pub(crate) const PUT: Builtin = Builtin {
    name: "=",
    arity: Arity::at_least(2),
    arguments: Arguments::Evaluated,
    fn_ptr: put_,
};

fn def_(env: &Rc<Environment>, args: Vec<Value>) -> Result {
    apply_def(env, args, Scope::Global)
}

fn put_(env: &Rc<Environment>, args: Vec<Value>) -> Result {
    apply_def(env, args, Scope::Local)
}

fn extract_symbols(list: Vec<Value>) -> Result<Vec<Symbol>> {
    list.into_iter().map(Value::into_symbol).collect()
}

/// `{n1 n2 ...} v1 v2 ...`: one value per name.
fn apply_def(env: &Rc<Environment>, args: Vec<Value>, scope: Scope) -> Result {
    let mut args = args.into_iter();
    let names = args
        .next()
        .ok_or(ErrorKind::BadArgsCount)?
        .into_qexpr()?;
    let names = extract_symbols(names)?;
    let values: Vec<Value> = args.collect();
    if names.is_empty() || names.len() != values.len() {
        return Err(ErrorKind::BadArgsCount);
    }
    for (name, value) in names.into_iter().zip(values) {
        log::debug!("define {} as {} ({:?})", name, value, scope);
        match scope {
            Scope::Global => env.define_global(name, value),
            Scope::Local => env.define_local(name, value),
        };
    }
    Ok(Value::empty())
}

pub(crate) const LAMBDA: Builtin = Builtin {
    name: "\\",
    arity: Arity::exactly(2),
    arguments: Arguments::Evaluated,
    fn_ptr: apply_lambda,
};

/// Builds a closure over `env` from a formals list and a body list.
fn apply_lambda(env: &Rc<Environment>, args: Vec<Value>) -> Result {
    let mut args = args.into_iter();
    let (formals, body) = match (args.next(), args.next()) {
        (Some(formals), Some(body)) => (formals.into_qexpr()?, body.into_qexpr()?),
        _ => return Err(ErrorKind::BadArgsCount),
    };
    let formals = Formals::new(extract_symbols(formals)?).map_err(|e| {
        log::debug!("bad lambda formals: {:?}", e);
        ErrorKind::BadArgsCount
    })?;
    Ok(Value::Function(Function::Lambda(Lambda {
        formals,
        body,
        closure: env.clone(),
    })))
}
