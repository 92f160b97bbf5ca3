use std::sync::OnceLock;

use regex::Regex;
use rhai::packages::{ArithmeticPackage, Package};
use rhai::{Dynamic, Engine, EvalAltResult, Position, Scope, FLOAT};

use crate::engine::EvaluationContext;
use crate::helpers::math_syntax::rewrite_for_rhai;

pub(crate) const FUNCTION_NAMES: &[&str] = &[
    "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh", "sqrt", "cbrt", "exp",
    "abs", "floor", "ceil", "round", "log", "ln", "log10", "log2", "pow",
];

pub(crate) const CONSTANT_NAMES: &[&str] = &["pi", "e"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EvalFailure {
    pub(crate) code: &'static str,
    pub(crate) message: String,
}

impl EvalFailure {
    pub(crate) fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Expression-only rhai engine with a closed set of float math functions.
pub(crate) fn build_math_engine() -> Engine {
    let mut engine = Engine::new_raw();
    engine.register_global_module(ArithmeticPackage::new().as_shared_module());
    engine.set_max_expr_depths(64, 32);

    register_unary(&mut engine, "sin", f64::sin, |_| true);
    register_unary(&mut engine, "cos", f64::cos, |_| true);
    register_unary(&mut engine, "tan", f64::tan, |_| true);
    register_unary(&mut engine, "asin", f64::asin, |x| (-1.0..=1.0).contains(&x));
    register_unary(&mut engine, "acos", f64::acos, |x| (-1.0..=1.0).contains(&x));
    register_unary(&mut engine, "atan", f64::atan, |_| true);
    register_unary(&mut engine, "sinh", f64::sinh, |_| true);
    register_unary(&mut engine, "cosh", f64::cosh, |_| true);
    register_unary(&mut engine, "tanh", f64::tanh, |_| true);
    register_unary(&mut engine, "sqrt", f64::sqrt, |x| x >= 0.0);
    register_unary(&mut engine, "cbrt", f64::cbrt, |_| true);
    register_unary(&mut engine, "exp", f64::exp, |_| true);
    register_unary(&mut engine, "abs", f64::abs, |_| true);
    register_unary(&mut engine, "floor", f64::floor, |_| true);
    register_unary(&mut engine, "ceil", f64::ceil, |_| true);
    register_unary(&mut engine, "round", f64::round, |_| true);
    // ln is the same function as log: natural logarithm.
    register_unary(&mut engine, "log", f64::ln, |x| x > 0.0);
    register_unary(&mut engine, "ln", f64::ln, |x| x > 0.0);
    register_unary(&mut engine, "log10", f64::log10, |x| x > 0.0);
    register_unary(&mut engine, "log2", f64::log2, |x| x > 0.0);

    engine.register_fn(
        "log",
        |x: FLOAT, base: FLOAT| -> Result<FLOAT, Box<EvalAltResult>> {
            if x <= 0.0 || base <= 0.0 || base == 1.0 {
                return Err(domain_error("log"));
            }
            Ok(x.ln() / base.ln())
        },
    );
    engine.register_fn(
        "pow",
        |x: FLOAT, y: FLOAT| -> Result<FLOAT, Box<EvalAltResult>> {
            let value = x.powf(y);
            if value.is_nan() {
                return Err(domain_error("pow"));
            }
            Ok(value)
        },
    );

    engine
}

fn register_unary(
    engine: &mut Engine,
    name: &'static str,
    apply: fn(f64) -> f64,
    in_domain: fn(f64) -> bool,
) {
    engine.register_fn(name, move |x: FLOAT| -> Result<FLOAT, Box<EvalAltResult>> {
        if !in_domain(x) {
            return Err(domain_error(name));
        }
        Ok(apply(x))
    });
}

fn domain_error(name: &str) -> Box<EvalAltResult> {
    Box::new(EvalAltResult::ErrorRuntime(
        Dynamic::from(format!("{}() argument is outside its domain.", name)),
        Position::NONE,
    ))
}

pub(crate) fn identifier_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("identifier regex"))
}

pub(crate) fn evaluate_number(
    engine: &Engine,
    expr: &str,
    context: &EvaluationContext,
) -> Result<f64, EvalFailure> {
    let mut scope = Scope::new();
    scope.push_constant("pi", std::f64::consts::PI);
    scope.push_constant("e", std::f64::consts::E);
    for (token, value) in context.iter() {
        scope.push(token.to_string(), value);
    }

    let source = rewrite_for_rhai(expr);
    let value = engine
        .eval_expression_with_scope::<Dynamic>(&mut scope, &source)
        .map_err(|error| classify_eval_error(&error))?;
    let number = dynamic_to_number(value)?;
    if !number.is_finite() {
        return Err(EvalFailure::new(
            "EXPR_MATH_DOMAIN",
            "Expression does not evaluate to a finite number.",
        ));
    }
    Ok(number)
}

pub(crate) fn dynamic_to_number(value: Dynamic) -> Result<f64, EvalFailure> {
    if let Ok(number) = value.as_float() {
        return Ok(number);
    }
    if let Ok(number) = value.as_int() {
        return Ok(number as f64);
    }
    Err(EvalFailure::new(
        "EXPR_NOT_NUMERIC",
        format!("Expression evaluates to {} instead of a number.", value.type_name()),
    ))
}

pub(crate) fn classify_eval_error(error: &EvalAltResult) -> EvalFailure {
    match error {
        EvalAltResult::ErrorInFunctionCall(_, _, inner, _) => classify_eval_error(inner),
        EvalAltResult::ErrorRuntime(message, _) => {
            EvalFailure::new("EXPR_MATH_DOMAIN", message.to_string())
        }
        EvalAltResult::ErrorArithmetic(message, _) => {
            EvalFailure::new("EXPR_MATH_DOMAIN", message.clone())
        }
        EvalAltResult::ErrorVariableNotFound(name, _) => EvalFailure::new(
            "EXPR_UNDEFINED_SYMBOL",
            format!("Symbol \"{}\" is not defined.", name),
        ),
        EvalAltResult::ErrorFunctionNotFound(signature, _) => EvalFailure::new(
            "EXPR_UNKNOWN_FUNCTION",
            format!("Function \"{}\" is not supported.", signature),
        ),
        EvalAltResult::ErrorParsing(kind, _) => {
            EvalFailure::new("EXPR_SYNTAX", format!("Syntax error: {}", kind))
        }
        other => EvalFailure::new("EXPR_EVAL_FAILED", format!("Expression eval failed: {}", other)),
    }
}

#[cfg(test)]
mod rhai_bridge_tests {
    use super::*;

    fn eval(expr: &str) -> Result<f64, EvalFailure> {
        evaluate_number(&build_math_engine(), expr, &EvaluationContext::default())
    }

    #[test]
    fn arithmetic_follows_math_precedence() {
        assert_eq!(eval("10/4").expect("division"), 2.5);
        assert_eq!(eval("2 + 3 * 4").expect("precedence"), 14.0);
        assert_eq!(eval("2 ^ 3 ^ 2").expect("right associative power"), 512.0);
        assert_eq!(eval("2 * 3 ^ 2").expect("power binds tighter"), 18.0);
        assert_eq!(eval("(1 + 2) * -3").expect("unary minus"), -9.0);
    }

    #[test]
    fn unary_minus_binds_looser_than_power() {
        assert_eq!(eval("-2^2").expect("negated power"), -4.0);
        assert_eq!(eval("(-2)^2").expect("power of negative"), 4.0);
        assert_eq!(eval("2^-1").expect("negative exponent"), 0.5);
        assert_eq!(eval("1 - 2^2").expect("binary minus"), -3.0);

        let mut context = EvaluationContext::default();
        context.bind("x", 3.0).expect("bind");
        let math = build_math_engine();
        assert_eq!(
            evaluate_number(&math, "-x^2", &context).expect("negated square"),
            -9.0
        );
        let gaussian = evaluate_number(&math, "exp(-x^2/2)", &context).expect("gaussian");
        assert!((gaussian - (-4.5f64).exp()).abs() < 1e-12);
        let damping = evaluate_number(&math, "exp(-x^2)", &context).expect("damping");
        assert!((damping - (-9.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn closed_function_set_includes_ln_alias() {
        let log = eval("log(e)").expect("log");
        let ln = eval("ln(e)").expect("ln");
        assert!((log - 1.0).abs() < 1e-12);
        assert_eq!(log, ln);
        assert!((eval("log(8, 2)").expect("log base") - 3.0).abs() < 1e-12);
        assert!((eval("sin(pi / 2)").expect("sin") - 1.0).abs() < 1e-12);
        assert_eq!(eval("sqrt(16)").expect("sqrt"), 4.0);
        assert_eq!(eval("pow(2, 10)").expect("pow"), 1024.0);
    }

    #[test]
    fn math_domain_violations_are_reported() {
        assert_eq!(eval("log(-1)").expect_err("log domain").code, "EXPR_MATH_DOMAIN");
        assert_eq!(eval("sqrt(-4)").expect_err("sqrt domain").code, "EXPR_MATH_DOMAIN");
        assert_eq!(eval("asin(2)").expect_err("asin domain").code, "EXPR_MATH_DOMAIN");
        assert_eq!(eval("1 / 0").expect_err("infinite").code, "EXPR_MATH_DOMAIN");
    }

    #[test]
    fn unsupported_inputs_are_classified() {
        assert_eq!(eval("2 +").expect_err("syntax").code, "EXPR_SYNTAX");
        assert_eq!(eval("foo(1)").expect_err("unknown fn").code, "EXPR_UNKNOWN_FUNCTION");
        assert_eq!(eval("1 < 2").expect_err("boolean").code, "EXPR_NOT_NUMERIC");
    }

    #[test]
    fn scope_values_are_visible() {
        let mut context = EvaluationContext::default();
        context.bind("abcd1234", 12.0).expect("bind");
        let value = evaluate_number(&build_math_engine(), "abcd1234 / 8", &context)
            .expect("scoped eval");
        assert_eq!(value, 1.5);
    }
}
