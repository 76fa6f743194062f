use crate::types::{Function, Value};
use itertools::Itertools;
use std::fmt;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(x) => write!(f, "{}", x),
            Value::Double(x) => write!(f, "{:?}", x),
            Value::Error(kind) => write!(f, "{}", kind),
            Value::Symbol(name) => write!(f, "{}", name),
            Value::Function(func) => write!(f, "{}", func),
            Value::SExpr(children) => write!(f, "({})", children.iter().join(" ")),
            Value::QExpr(children) => write!(f, "{{{}}}", children.iter().join(" ")),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Builtin(b) => write!(f, "<builtin {}>", b.name),
            Function::Lambda(l) => write!(f, "(\\ {} {{{}}})", l.formals, l.body.iter().join(" ")),
        }
    }
}

pub fn pr_str(value: &Value) -> String {
    value.to_string()
}

/// Copies at most `capacity - 1` bytes and remembers whether anything was cut.
struct BoundedWriter<'a> {
    buffer: &'a mut [u8],
    written: usize,
    truncated: bool,
}

impl fmt::Write for BoundedWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.buffer.len() - 1 - self.written;
        let bytes = s.as_bytes();
        let n = bytes.len().min(room);
        self.buffer[self.written..self.written + n].copy_from_slice(&bytes[..n]);
        self.written += n;
        if n < bytes.len() {
            self.truncated = true;
            // Stop the formatter early; there is nowhere left to write.
            return Err(fmt::Error);
        }
        Ok(())
    }
}

/// Writes the textual form of `value` into `buffer` followed by a NUL byte,
/// never touching more than `buffer.len()` bytes.
///
/// Returns the number of bytes written before the terminator. When the
/// rendering does not fit, the first `buffer.len() - 1` bytes are kept and
/// `buffer.len() - 1` is returned.
pub fn render(value: &Value, buffer: &mut [u8]) -> usize {
    if buffer.is_empty() {
        return 0;
    }
    let mut writer = BoundedWriter {
        buffer,
        written: 0,
        truncated: false,
    };
    // The only error a `BoundedWriter` raises is running out of room.
    let _ = fmt::write(&mut writer, format_args!("{}", value));
    let written = writer.written;
    if writer.truncated {
        log::trace!("render truncated to {} bytes", written);
    }
    writer.buffer[written] = 0;
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;
    use crate::types::{ErrorKind, Formals, Lambda, Symbol};
    use pretty_assertions::assert_eq;

    fn int(x: i64) -> Value {
        Value::Integer(x)
    }

    fn sym(name: &str) -> Value {
        Value::new_symbol(name)
    }

    fn nested() -> Value {
        Value::SExpr(vec![Value::QExpr(vec![Value::SExpr(vec![
            sym("+"),
            int(1),
            int(2),
            int(3),
        ])])])
    }

    #[test]
    fn scalars() {
        assert_eq!(pr_str(&int(-42)), "-42");
        assert_eq!(pr_str(&Value::Double(3.0)), "3.0");
        assert_eq!(pr_str(&Value::Double(0.5)), "0.5");
        assert_eq!(pr_str(&Value::Double(1e-16)), "1e-16");
        assert_eq!(pr_str(&sym("head")), "head");
    }

    #[test]
    fn expressions() {
        assert_eq!(pr_str(&nested()), "({(+ 1 2 3)})");
        assert_eq!(pr_str(&Value::empty()), "()");
        assert_eq!(pr_str(&Value::QExpr(vec![])), "{}");
    }

    #[test]
    fn errors() {
        assert_eq!(pr_str(&Value::Error(ErrorKind::DivZero)), "Error: Division By Zero!");
        assert_eq!(pr_str(&Value::Error(ErrorKind::BadOp)), "Error: Invalid Operator!");
        assert_eq!(pr_str(&Value::Error(ErrorKind::BadNum)), "Error: Invalid Number!");
    }

    #[test]
    fn functions() {
        let head = Environment::global().lookup("head").unwrap();
        assert_eq!(pr_str(&head), "<builtin head>");

        let lambda = Lambda {
            formals: Formals::new(vec![Symbol::from("x"), Symbol::from("y")]).unwrap(),
            body: vec![sym("+"), sym("x"), sym("y")],
            closure: Environment::global(),
        };
        assert_eq!(
            pr_str(&Value::Function(Function::Lambda(lambda))),
            "(\\ {x y} {+ x y})"
        );
    }

    #[test]
    fn render_fits() {
        const N: usize = 15;
        let mut output = [b'z'; N + 1];
        let written = render(&nested(), &mut output[..N]);
        assert_eq!(written, 13);
        assert_eq!(&output[..13], b"({(+ 1 2 3)})");
        assert_eq!(output[13], 0);
        assert_eq!(output[N - 1], b'z');
        assert_eq!(output[N], b'z');
    }

    #[test]
    fn render_exactly_fits() {
        let mut output = [b'z'; 15];
        let written = render(&nested(), &mut output[..14]);
        assert_eq!(written, 13);
        assert_eq!(output[13], 0);
        assert_eq!(output[14], b'z');
    }

    #[test]
    fn render_truncates() {
        const N: usize = 13;
        let mut output = [b'z'; N + 1];
        let written = render(&nested(), &mut output[..N]);
        assert_eq!(written, N - 1);
        assert_eq!(&output[..N - 1], b"({(+ 1 2 3)}");
        assert_eq!(output[N - 1], 0);
        assert_eq!(output[N], b'z');
    }

    #[test]
    fn render_tiny_buffers() {
        let mut output = [b'z'; 2];
        assert_eq!(render(&int(12345), &mut output[..0]), 0);
        assert_eq!(output, [b'z', b'z']);
        assert_eq!(render(&int(12345), &mut output[..1]), 0);
        assert_eq!(output, [0, b'z']);
    }
}
