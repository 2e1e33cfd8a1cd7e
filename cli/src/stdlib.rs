//! Standard library native functions
//!
//! The core language ships no arithmetic or comparison. This module is the
//! host-side library the `ok` binary installs on top of the default forms.

use std::io::{self, Write};

use ok::{Builtin, Environment, EvalError, Value};

type NativeFn = fn(&mut Environment, &[Value]) -> Result<Value, EvalError>;

/// Define the host builtins in the innermost scope of `env`.
pub fn register_stdlib(env: &mut Environment) {
    let natives: [(&str, NativeFn); 15] = [
        ("+", add),
        ("-", sub),
        ("*", mul),
        ("/", div),
        ("%", rem),
        ("=", eq),
        ("!=", ne),
        ("<", lt),
        (">", gt),
        ("<=", le),
        (">=", ge),
        ("!", not),
        ("len", len),
        ("print", print),
        ("str", to_str),
    ];
    for (name, func) in natives {
        env.set(name, Value::Builtin(Builtin::new(name, func)));
    }
}

// ============================================================================
// Value Extraction Helpers
// ============================================================================

fn extract_int(op: &str, value: &Value) -> Result<i64, EvalError> {
    match value {
        Value::Number(n) => Ok(*n),
        _ => Err(EvalError::native(format!(
            "{op}: expected number, got {value}"
        ))),
    }
}

fn expect_args<'a, const N: usize>(
    op: &str,
    args: &'a [Value],
) -> Result<&'a [Value; N], EvalError> {
    args.try_into().map_err(|_| {
        EvalError::native(format!("{op}: expected {N} arguments, got {}", args.len()))
    })
}

/// Scalars print bare, without quotes or type tag; everything else uses its
/// render.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => value.to_string(),
    }
}

// ============================================================================
// Arithmetic
// ============================================================================

fn fold_numbers(
    op: &str,
    args: &[Value],
    f: fn(i64, i64) -> Option<i64>,
) -> Result<Value, EvalError> {
    let Some((first, rest)) = args.split_first() else {
        return Err(EvalError::native(format!(
            "{op}: expected at least 1 argument"
        )));
    };
    let mut acc = extract_int(op, first)?;
    for arg in rest {
        let n = extract_int(op, arg)?;
        acc = f(acc, n).ok_or_else(|| arithmetic_error(op, acc, n))?;
    }
    Ok(Value::Number(acc))
}

fn arithmetic_error(op: &str, a: i64, b: i64) -> EvalError {
    if b == 0 && matches!(op, "/" | "%") {
        EvalError::native(format!("{op}: division by zero"))
    } else {
        EvalError::native(format!("{op}: integer overflow ({a} {op} {b})"))
    }
}

/// Usage: (+ 1 2 3) => 6
pub fn add(_env: &mut Environment, args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Ok(Value::Number(0));
    }
    fold_numbers("+", args, i64::checked_add)
}

/// Usage: (- 5 2) => 3, (- 5) => -5
pub fn sub(_env: &mut Environment, args: &[Value]) -> Result<Value, EvalError> {
    if let [only] = args {
        let n = extract_int("-", only)?;
        return n
            .checked_neg()
            .map(Value::Number)
            .ok_or_else(|| EvalError::native(format!("-: integer overflow (- {n})")));
    }
    fold_numbers("-", args, i64::checked_sub)
}

/// Usage: (* 2 3 4) => 24
pub fn mul(_env: &mut Environment, args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Ok(Value::Number(1));
    }
    fold_numbers("*", args, i64::checked_mul)
}

/// Truncating integer division. Usage: (/ 7 2) => 3
pub fn div(_env: &mut Environment, args: &[Value]) -> Result<Value, EvalError> {
    fold_numbers("/", args, i64::checked_div)
}

/// Usage: (% 7 2) => 1
pub fn rem(_env: &mut Environment, args: &[Value]) -> Result<Value, EvalError> {
    fold_numbers("%", args, i64::checked_rem)
}

// ============================================================================
// Comparison
// ============================================================================

/// Structural equality. Usage: (= x 5)
pub fn eq(_env: &mut Environment, args: &[Value]) -> Result<Value, EvalError> {
    let [a, b] = expect_args::<2>("=", args)?;
    Ok(Value::Bool(a == b))
}

pub fn ne(_env: &mut Environment, args: &[Value]) -> Result<Value, EvalError> {
    let [a, b] = expect_args::<2>("!=", args)?;
    Ok(Value::Bool(a != b))
}

fn compare(op: &str, args: &[Value], f: fn(&i64, &i64) -> bool) -> Result<Value, EvalError> {
    let [a, b] = expect_args::<2>(op, args)?;
    let (a, b) = (extract_int(op, a)?, extract_int(op, b)?);
    Ok(Value::Bool(f(&a, &b)))
}

pub fn lt(_env: &mut Environment, args: &[Value]) -> Result<Value, EvalError> {
    compare("<", args, i64::lt)
}

pub fn gt(_env: &mut Environment, args: &[Value]) -> Result<Value, EvalError> {
    compare(">", args, i64::gt)
}

pub fn le(_env: &mut Environment, args: &[Value]) -> Result<Value, EvalError> {
    compare("<=", args, i64::le)
}

pub fn ge(_env: &mut Environment, args: &[Value]) -> Result<Value, EvalError> {
    compare(">=", args, i64::ge)
}

/// Logical negation of truthiness. Usage: (! 0) => true
pub fn not(_env: &mut Environment, args: &[Value]) -> Result<Value, EvalError> {
    let [value] = expect_args::<1>("!", args)?;
    Ok(Value::Bool(!value.truthy()))
}

// ============================================================================
// Sequences and Strings
// ============================================================================

/// Usage: (len (list 1 2)) => 2, (len "abc") => 3
pub fn len(_env: &mut Environment, args: &[Value]) -> Result<Value, EvalError> {
    let [value] = expect_args::<1>("len", args)?;
    let n = match value {
        Value::Array(items) => items.len(),
        Value::String(s) => s.chars().count(),
        _ => {
            return Err(EvalError::native(format!(
                "len: expected array or string, got {value}"
            )));
        }
    };
    Ok(Value::Number(n as i64))
}

/// Concatenate display strings. Usage: (str "n=" 5) => "n=5"
pub fn to_str(_env: &mut Environment, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::String(args.iter().map(display_string).collect()))
}

// ============================================================================
// Standard I/O
// ============================================================================

/// Print values separated by spaces, then a newline; returns nil
/// Usage: (print "hello" 5)
pub fn print(_env: &mut Environment, args: &[Value]) -> Result<Value, EvalError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let line = args
        .iter()
        .map(display_string)
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(handle, "{line}").map_err(|e| EvalError::native(format!("print: I/O error: {e}")))?;
    handle
        .flush()
        .map_err(|e| EvalError::native(format!("print: I/O error: {e}")))?;

    Ok(Value::Nil)
}
