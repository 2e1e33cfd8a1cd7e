use ok::{
    Branch, Builtin, Environment, Error, EvalError, Func, Macro, Node, Value, default_environment,
    eval_str, evaluate,
};

fn eval(input: &str) -> Result<Value, Error> {
    let mut env = default_environment();
    eval_str("<test>", input, &mut env)
}

fn eval_render(input: &str) -> String {
    match eval(input) {
        Ok(value) => value.to_string(),
        Err(e) => format!("Error: {e}"),
    }
}

/// Host-supplied equality, the way an embedder extends the default forms.
fn with_equals(env: &mut Environment) {
    env.set(
        "=",
        Value::Builtin(Builtin::new("=", |_, args| match args {
            [a, b] => Ok(Value::Bool(a == b)),
            _ => Err(EvalError::native("= takes 2 arguments")),
        })),
    );
}

#[test]
fn test_literals() {
    assert_eq!(eval_render("42"), "42@number");
    assert_eq!(eval_render("\"hi\""), "\"hi\"@string");
    assert_eq!(eval_render(""), "nil");
}

#[test]
fn test_unbound_reference_is_nil() {
    assert_eq!(eval("nothing_here").unwrap(), Value::Nil);
}

#[test]
fn test_let_returns_value_and_binds() {
    let mut env = default_environment();
    assert_eq!(
        eval_str("<test>", "(let x 5)", &mut env).unwrap(),
        Value::Number(5)
    );
    assert_eq!(env.get("x"), Some(&Value::Number(5)));
    assert_eq!(eval_str("<test>", "x", &mut env).unwrap(), Value::Number(5));
}

#[test]
fn test_let_rebinds() {
    assert_eq!(eval("(let x 1) (let x \"two\") x").unwrap(), Value::from("two"));
}

#[test]
fn test_func_binds_parameters_positionally() {
    assert_eq!(eval("(let f (func a b a)) (f 1 2)").unwrap(), Value::Number(1));
    assert_eq!(eval("(let f (func a b b)) (f 1 2)").unwrap(), Value::Number(2));
}

#[test]
fn test_func_missing_arguments_stay_unbound() {
    assert_eq!(eval("(let f (func a b a)) (f)").unwrap(), Value::Nil);
    // An unbound parameter falls through to outer scopes
    assert_eq!(
        eval("(let a 9) (let f (func a b a)) (f)").unwrap(),
        Value::Number(9)
    );
}

#[test]
fn test_func_extra_arguments_ignored() {
    assert_eq!(eval("(let f (func a a)) (f 1 2 3)").unwrap(), Value::Number(1));
}

#[test]
fn test_func_with_no_parameters() {
    assert_eq!(eval("(let f (func 7)) (f)").unwrap(), Value::Number(7));
    assert_eq!(eval("(let f (func)) (f)").unwrap(), Value::Nil);
}

#[test]
fn test_func_body_let_is_local() {
    let mut env = default_environment();
    eval_str("<test>", "(let f (func (let inner 1))) (f)", &mut env).unwrap();
    assert!(env.get("inner").is_none());
}

#[test]
fn test_func_sees_callers_stack_not_definition_stack() {
    // `make` returns a function referring to `x`, which is only bound inside
    // make's call scope; by the time the result is called that scope is gone.
    let code = "
        (let make (func x (func x)))
        (let g (make 1))
        (g)
    ";
    assert_eq!(eval(code).unwrap(), Value::Nil);

    let code = "
        (let show (func x))
        (let caller (func x (show)))
        (caller 3)
    ";
    assert_eq!(eval(code).unwrap(), Value::Number(3));
}

#[test]
fn test_switch_selects_first_truthy() {
    assert_eq!(
        eval("(switch 0 \"a\" \"\" \"b\" 1 \"c\")").unwrap(),
        Value::from("c")
    );
    assert_eq!(eval("(switch 0 \"a\")").unwrap(), Value::Nil);
    assert_eq!(eval("(switch)").unwrap(), Value::Nil);
}

#[test]
fn test_switch_trailing_condition_has_nil_body() {
    assert_eq!(eval("(switch 0 1 5)").unwrap(), Value::Nil);
}

#[test]
fn test_switch_never_evaluates_unselected_bodies() {
    let mut env = default_environment();
    let switch = Node::Switch(vec![
        Branch {
            cond: Node::constant(false),
            body: Node::assign("first", Node::constant(1i64)),
        },
        Branch {
            cond: Node::constant(false),
            body: Node::assign("second", Node::constant(2i64)),
        },
        Branch {
            cond: Node::assign("third_cond", Node::constant(true)),
            body: Node::constant(3i64),
        },
        Branch {
            cond: Node::assign("fourth_cond", Node::constant(true)),
            body: Node::constant(4i64),
        },
    ]);
    assert_eq!(evaluate(&switch, &mut env).unwrap(), Value::Number(3));
    assert!(env.get("first").is_none());
    assert!(env.get("second").is_none());
    assert!(env.get("third_cond").is_some());
    assert!(env.get("fourth_cond").is_none());
}

#[test]
fn test_list_round_trip() {
    assert_eq!(
        eval_render("(list 1 2 3)"),
        "[1@number 2@number 3@number]@array"
    );
    assert_eq!(eval_render("(list)"), "[]@array");
}

#[test]
fn test_id() {
    assert_eq!(eval("(id 4 5)").unwrap(), Value::Number(4));
    assert_eq!(eval("(id)").unwrap(), Value::Nil);
}

#[test]
fn test_end_to_end_with_host_builtin() {
    let mut env = default_environment();
    with_equals(&mut env);
    let result = eval_str(
        "<test>",
        "(let x 5) (switch (= x 5) \"five\" \"other\")",
        &mut env,
    )
    .unwrap();
    assert_eq!(result, Value::from("five"));

    let result = eval_str("<test>", "(let x 6) (switch (= x 5) \"five\" 1 \"other\")", &mut env);
    assert_eq!(result.unwrap(), Value::from("other"));
}

#[test]
fn test_macro_arguments_are_never_pre_evaluated() {
    let mut env = default_environment();
    env.set(
        "answer",
        Value::Macro(Macro::new("answer", |_, _| Ok(Node::constant(42i64)))),
    );
    env.set("n", Value::Number(1));
    // both arguments fail with "not callable" when evaluated
    assert!(eval_str("<test>", "(list (n))", &mut env).is_err());
    let result = eval_str("<test>", "(answer (n) (undefined_fn 2))", &mut env);
    assert_eq!(result.unwrap(), Value::Number(42));
}

#[test]
fn test_macro_expansion_is_evaluated_in_callers_environment() {
    let mut env = default_environment();
    env.set(
        "quote_name",
        Value::Macro(Macro::new("quote_name", |_, args| match args {
            [Node::Ref(name)] => Ok(Node::constant(name.as_str())),
            _ => Err(EvalError::native("quote_name takes a single name")),
        })),
    );
    env.set(
        "twice",
        Value::Macro(Macro::new("twice", |_, args| {
            Ok(Node::Block(vec![args[0].clone(), args[0].clone()]))
        })),
    );
    assert_eq!(
        eval_str("<test>", "(quote_name hello)", &mut env).unwrap(),
        Value::from("hello")
    );
    assert_eq!(
        eval_str("<test>", "(quote_name 1)", &mut env).unwrap_err(),
        Error::Eval(EvalError::native("quote_name takes a single name"))
    );
    eval_str("<test>", "(twice (let y 1))", &mut env).unwrap();
    assert_eq!(env.get("y"), Some(&Value::Number(1)));
}

#[test]
fn test_not_callable() {
    assert_eq!(
        eval("(let x 5) (x 1)").unwrap_err(),
        Error::Eval(EvalError::NotCallable("5@number".into()))
    );
    assert_eq!(
        eval_render("(nothing)"),
        "Error: nil is not callable"
    );
}

#[test]
fn test_argument_error_short_circuits() {
    let mut env = default_environment();
    let result = eval_str("<test>", "(list (let a 1) (a) (let b 2))", &mut env);
    assert!(result.is_err());
    assert_eq!(env.get("a"), Some(&Value::Number(1)));
    assert!(env.get("b").is_none());
}

#[test]
fn test_shape_errors() {
    assert_eq!(
        eval_render("(let x)"),
        "Error: let takes 2 arguments, got 1"
    );
    assert_eq!(
        eval_render("(func 1 x)"),
        "Error: expected parameter name, got 1"
    );
    assert_eq!(
        eval_render("(let (id x) 1)"),
        "Error: expected parameter name, got (id x)"
    );
}

#[test]
fn test_syntax_errors_are_reported() {
    let err = eval("(let x").unwrap_err();
    match err {
        Error::Syntax(e) => assert!(e.is_incomplete()),
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn test_builtin_errors_pass_through_verbatim() {
    let mut env = default_environment();
    env.set(
        "fail",
        Value::Builtin(Builtin::new("fail", |_, _| Err(EvalError::native("custom failure")))),
    );
    let err = eval_str("<test>", "(id (fail))", &mut env).unwrap_err();
    assert_eq!(err.to_string(), "custom failure");
}

#[test]
fn test_unbounded_recursion_is_stopped() {
    let mut env = default_environment();
    env.set_max_call_depth(32);
    let err = eval_str("<test>", "(let f (func (f))) (f)", &mut env).unwrap_err();
    assert_eq!(err, Error::Eval(EvalError::StackExhausted { limit: 32 }));
    assert_eq!(env.depth(), 2);
    // The environment stays usable afterwards
    assert_eq!(eval_str("<test>", "(id 1)", &mut env).unwrap(), Value::Number(1));
}

#[test]
fn test_deeply_nested_source_evaluates() {
    let depth = 1000;
    let source = format!("{}1{}", "(id ".repeat(depth), ")".repeat(depth));
    assert_eq!(eval(&source).unwrap(), Value::Number(1));
}

#[test]
fn test_nesting_beyond_parser_limit_is_a_syntax_error() {
    let depth = ok::MAX_NESTING_DEPTH * 5;
    let source = format!("{}1{}", "(id ".repeat(depth), ")".repeat(depth));
    match eval(&source).unwrap_err() {
        Error::Syntax(e) => assert_eq!(e.message, "nesting too deep"),
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn test_func_value_render() {
    assert_eq!(eval_render("(func a b a)"), "((a, b) => { a })@func");
    assert_eq!(eval_render("func"), "func@macro");
    assert_eq!(eval_render("list"), "list@builtin");
}

#[test]
fn test_func_value_is_stored_not_reevaluated() {
    let mut env = default_environment();
    let value = eval_str("<test>", "(let f (func x (undefined x)))", &mut env).unwrap();
    let Value::Func(func) = value else {
        panic!("expected a function");
    };
    assert_eq!(
        *func,
        Func {
            params: vec!["x".into()],
            body: Node::call("undefined", vec![Node::reference("x")]),
        }
    );
}
