use crate::core;
use crate::types::{ErrorKind, Formals, Function, Result, Symbol, Value};
use itertools::Itertools;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// One scope: its own bindings plus a link to the enclosing scope. The root
/// ("global") environment has no parent.
#[derive(Default)]
pub struct Environment {
    bindings: RefCell<HashMap<Symbol, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    pub fn global() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn spawn_from(parent: &Rc<Environment>) -> Rc<Self> {
        Rc::new(Self {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent.clone()),
        })
    }

    /// Innermost binding wins; builtins are found only when no scope binds
    /// the name.
    pub fn lookup(&self, name: &str) -> Result {
        let mut scope = Some(self);
        while let Some(env) = scope {
            if let Some(value) = env.bindings.borrow().get(name) {
                return Ok(value.clone());
            }
            scope = env.parent.as_deref();
        }
        core::builtin(name)
            .map(|b| Value::Function(Function::Builtin(b)))
            .ok_or(ErrorKind::UnboundSymbol)
    }

    pub fn define_local<T>(&self, key: T, value: Value) -> Option<Value>
    where
        T: Into<Symbol>,
    {
        self.bindings.borrow_mut().insert(key.into(), value)
    }

    pub fn define_global<T>(&self, key: T, value: Value) -> Option<Value>
    where
        T: Into<Symbol>,
    {
        self.root().define_local(key, value)
    }

    fn root(&self) -> &Environment {
        let mut env = self;
        while let Some(parent) = env.parent.as_deref() {
            env = parent;
        }
        env
    }

    /// A fresh frame for one lambda call, binding `formals` to `args`.
    pub fn child_for_call(
        self: &Rc<Self>,
        formals: &Formals,
        args: Vec<Value>,
    ) -> Result<Rc<Environment>> {
        let expected = formals.positional.len();
        if args.len() > expected && formals.others.is_none() {
            return Err(ErrorKind::TooManyArgs);
        }
        if args.len() < expected {
            // Partial application is not supported.
            return Err(ErrorKind::BadArgsCount);
        }

        let env = Environment::spawn_from(self);
        let mut args = args.into_iter();
        for (key, value) in formals.positional.iter().zip(args.by_ref()) {
            env.define_local(key.clone(), value);
        }
        if let Some(rest) = &formals.others {
            env.define_local(rest.clone(), Value::QExpr(args.collect()));
        }
        Ok(env)
    }

    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut env = self;
        while let Some(parent) = env.parent.as_deref() {
            env = parent;
            depth += 1;
        }
        depth
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bindings = self.bindings.borrow();
        write!(
            f,
            "<env depth {}: {}>",
            self.depth(),
            bindings.keys().sorted().join(" ")
        )
    }
}

impl fmt::Debug for Environment {
    // Values are skipped: a lambda stored here may close over this very scope.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
