use crate::environment::Environment;
use crate::types::{Arguments, Builtin, ErrorKind, Function, Lambda, Value};
use itertools::Itertools;
use std::rc::Rc;

/// Reduces `value` in `env`. Every failure comes back as a `Value::Error`.
pub fn eval(env: &Rc<Environment>, value: Value) -> Value {
    match value {
        Value::Symbol(name) => env.lookup(&name).unwrap_or_else(Value::Error),
        Value::SExpr(children) => eval_sexpr(env, children),
        other => other,
    }
}

fn eval_sexpr(env: &Rc<Environment>, children: Vec<Value>) -> Value {
    if children.is_empty() {
        return Value::SExpr(children);
    }
    log::trace!("eval ({})", children.iter().join(" "));
    let mut children = children.into_iter();
    let mut evaluated = Vec::with_capacity(children.len());
    while let Some(child) = children.next() {
        let value = eval(env, child);
        if value.is_error() {
            return value;
        }
        let quoting = evaluated.is_empty() && is_quoting(&value);
        evaluated.push(value);
        if quoting {
            // Only in function position: the rest go to the builtin exactly as written.
            evaluated.extend(&mut children);
            break;
        }
    }

    if evaluated.len() == 1 {
        return evaluated.remove(0);
    }
    let args = evaluated.split_off(1);
    match evaluated.pop() {
        Some(Value::Function(func)) => apply(env, &func, args),
        _ => Value::Error(ErrorKind::BadSexprStart),
    }
}

fn is_quoting(value: &Value) -> bool {
    matches!(
        value,
        Value::Function(Function::Builtin(Builtin {
            arguments: Arguments::Quoted,
            ..
        }))
    )
}

pub(crate) fn apply(env: &Rc<Environment>, func: &Function, args: Vec<Value>) -> Value {
    match func {
        Function::Builtin(builtin) => call_builtin(builtin, env, args),
        Function::Lambda(lambda) => call_lambda(lambda, args),
    }
}

pub fn call_builtin(func: &Builtin, env: &Rc<Environment>, args: Vec<Value>) -> Value {
    log::trace!("call {} with ({})", func.name, args.iter().join(" "));
    let result = func
        .arity
        .validate_for(args.len(), func.name)
        .and_then(|()| (func.fn_ptr)(env, args));
    match result {
        Ok(value) => {
            log::trace!("call to {} resulted in {}", func.name, value);
            value
        }
        Err(kind) => {
            log::trace!("call to {} failed: {}", func.name, kind);
            Value::Error(kind)
        }
    }
}

fn call_lambda(func: &Lambda, args: Vec<Value>) -> Value {
    log::trace!("call (\\ {}) with ({})", func.formals, args.iter().join(" "));
    match func.closure.child_for_call(&func.formals, args) {
        Ok(frame) => eval(&frame, Value::SExpr(func.body.clone())),
        Err(kind) => Value::Error(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Symbol;
    use pretty_assertions::assert_eq;

    fn int(x: i64) -> Value {
        Value::Integer(x)
    }

    fn sym(name: &str) -> Value {
        Value::new_symbol(name)
    }

    fn sexpr(children: Vec<Value>) -> Value {
        Value::SExpr(children)
    }

    #[test]
    fn self_evaluating_values() {
        let env = Environment::global();
        let head = env.lookup("head").unwrap();
        for value in vec![
            int(7),
            Value::Double(1.5),
            Value::Error(ErrorKind::Empty),
            head,
            Value::QExpr(vec![sym("unbound"), sexpr(vec![sym("/"), int(1), int(0)])]),
        ] {
            assert_eq!(eval(&env, value.clone()), value);
        }
    }

    #[test]
    fn empty_sexpr_is_returned_unchanged() {
        let env = Environment::global();
        assert_eq!(eval(&env, Value::empty()), Value::empty());
    }

    #[test]
    fn single_child_collapses() {
        let env = Environment::global();
        assert_eq!(eval(&env, sexpr(vec![int(5)])), int(5));
        assert_eq!(
            eval(&env, sexpr(vec![sexpr(vec![sym("+"), int(1), int(2)])])),
            int(3)
        );
        assert_eq!(
            eval(&env, sexpr(vec![sym("nope")])),
            Value::Error(ErrorKind::UnboundSymbol)
        );
    }

    #[test]
    fn first_error_wins() {
        let env = Environment::global();
        let value = sexpr(vec![
            sym("+"),
            sexpr(vec![sym("/"), int(1), int(0)]),
            sym("unbound"),
        ]);
        assert_eq!(eval(&env, value), Value::Error(ErrorKind::DivZero));
    }

    #[test]
    fn non_function_start() {
        let env = Environment::global();
        assert_eq!(
            eval(&env, sexpr(vec![int(1), Value::empty()])),
            Value::Error(ErrorKind::BadSexprStart)
        );
    }

    #[test]
    fn quoting_builtins_see_raw_arguments() {
        let env = Environment::global();
        let value = sexpr(vec![
            sym("list"),
            sym("a"),
            sym("b"),
            sexpr(vec![sym("c"), sym("d")]),
        ]);
        assert_eq!(
            eval(&env, value),
            Value::QExpr(vec![sym("a"), sym("b"), sexpr(vec![sym("c"), sym("d")])])
        );
    }

    #[test]
    fn quoting_builtins_as_arguments_are_plain_values() {
        let env = Environment::global();
        let list = env.lookup("list").unwrap();
        let value = sexpr(vec![
            sym("cons"),
            sym("list"),
            sexpr(vec![sym("tail"), Value::QExpr(vec![int(1), int(2), int(3)])]),
        ]);
        assert_eq!(eval(&env, value), Value::QExpr(vec![list, int(2), int(3)]));

        let value = sexpr(vec![sym("head"), sym("list"), sym("undefined")]);
        assert_eq!(eval(&env, value), Value::Error(ErrorKind::UnboundSymbol));
    }

    #[test]
    fn lambda_frames_are_discarded() {
        let env = Environment::global();
        let lambda = Lambda {
            formals: crate::types::Formals::new(vec![Symbol::from("x")]).unwrap(),
            body: vec![sym("+"), sym("x"), int(1)],
            closure: env.clone(),
        };
        let call = sexpr(vec![Value::Function(Function::Lambda(lambda)), int(41)]);
        assert_eq!(eval(&env, call), int(42));
        assert_eq!(eval(&env, sym("x")), Value::Error(ErrorKind::UnboundSymbol));
    }
}
