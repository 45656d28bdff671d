//! Style expression AST + shallow classifier.
//!
//! Expressions arrive as loosely-typed JSON arrays (`["step", ["get", "x"], ...]`).
//! We lift them into a small recursive AST and then only ever look at the first
//! one or two levels: there is no evaluator here, just shape and arity checks.
use serde_json::Value;

// -------------------------------- AST ------------------------------------ //

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    /// Array whose head is not a string, e.g. a match key list `[1, 2]`.
    List(Vec<Expr>),
    /// Objects are never legal legend outputs; we only keep the fact that one was there.
    Object,
    Call { tag: String, args: Vec<Expr> },
}

impl From<&Value> for Expr {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => Expr::Null,
            Value::Bool(b) => Expr::Bool(*b),
            Value::Number(n) => n.as_f64().map(Expr::Number).unwrap_or(Expr::Null),
            Value::String(s) => Expr::Str(s.clone()),
            Value::Object(_) => Expr::Object,
            Value::Array(xs) => match xs.split_first() {
                Some((Value::String(tag), rest)) => Expr::Call {
                    tag: tag.clone(),
                    args: rest.iter().map(Expr::from).collect(),
                },
                _ => Expr::List(xs.iter().map(Expr::from).collect()),
            },
        }
    }
}

impl Expr {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Expr::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expr::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Total element count as it appeared in the source array (tag included).
    fn arity(&self) -> usize {
        match self {
            Expr::Call { args, .. } => args.len() + 1,
            _ => 0,
        }
    }
}

/// Property name of a plain `["get", "name"]` getter.
pub fn getter_name(e: &Expr) -> Option<&str> {
    match e {
        Expr::Call { tag, args } if tag == "get" && args.len() == 1 => args[0].as_str(),
        _ => None,
    }
}

// ----------------------------- Classified -------------------------------- //

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Interpolation {
    Linear,
    Exponential(f64),
}

#[derive(Debug)]
pub struct StepExpr<'a> {
    pub input: &'a Expr,
    pub base: &'a Expr,
    pub stops: Vec<(&'a Expr, &'a Expr)>,
}

#[derive(Debug)]
pub struct MatchExpr<'a> {
    pub input: &'a Expr,
    pub arms: Vec<(&'a Expr, &'a Expr)>,
    pub fallback: &'a Expr,
}

#[derive(Debug)]
pub struct InterpolateExpr<'a> {
    pub method: Interpolation,
    pub input: &'a Expr,
    pub stops: Vec<(&'a Expr, &'a Expr)>,
}

#[derive(Debug)]
pub enum Classified<'a> {
    NotAnExpression,
    /// An expression, but not one the legend engine models (bad tag, arity or method).
    Unsupported { tag: &'a str },
    Step(StepExpr<'a>),
    Match(MatchExpr<'a>),
    Interpolate(InterpolateExpr<'a>),
}

impl Classified<'_> {
    pub fn input(&self) -> Option<&Expr> {
        match self {
            Classified::Step(s) => Some(s.input),
            Classified::Match(m) => Some(m.input),
            Classified::Interpolate(i) => Some(i.input),
            _ => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Classified::NotAnExpression => "literal".to_string(),
            Classified::Unsupported { tag } => format!("unsupported `{tag}`"),
            Classified::Step(s) => format!("step ({} thresholds)", s.stops.len()),
            Classified::Match(m) => format!("match ({} arms + fallback)", m.arms.len()),
            Classified::Interpolate(i) => {
                let method = match i.method {
                    Interpolation::Linear => "linear".to_string(),
                    Interpolation::Exponential(b) => format!("exponential {b}"),
                };
                format!("interpolate {method} ({} stops)", i.stops.len())
            }
        }
    }
}

// ------------------------------- Classify -------------------------------- //

pub fn classify(e: &Expr) -> Classified<'_> {
    let Expr::Call { tag, args } = e else {
        return Classified::NotAnExpression;
    };
    let n = e.arity();
    let unsupported = Classified::Unsupported { tag: tag.as_str() };
    let odd_at_least = |min: usize| n >= min && n % 2 == 1;

    match tag.as_str() {
        "step" if odd_at_least(5) => Classified::Step(StepExpr {
            input: &args[0],
            base: &args[1],
            stops: pairs(&args[2..]),
        }),
        "match" if odd_at_least(5) => {
            let (fallback, body) = match args.split_last() {
                Some(x) => x,
                None => return unsupported,
            };
            Classified::Match(MatchExpr {
                input: &body[0],
                arms: pairs(&body[1..]),
                fallback,
            })
        }
        "interpolate" if odd_at_least(7) => match interpolation_method(&args[0]) {
            Some(method) => Classified::Interpolate(InterpolateExpr {
                method,
                input: &args[1],
                stops: pairs(&args[2..]),
            }),
            None => unsupported,
        },
        _ => unsupported,
    }
}

fn pairs(xs: &[Expr]) -> Vec<(&Expr, &Expr)> {
    xs.chunks_exact(2).map(|c| (&c[0], &c[1])).collect()
}

fn interpolation_method(e: &Expr) -> Option<Interpolation> {
    let Expr::Call { tag, args } = e else { return None };
    match (tag.as_str(), args.as_slice()) {
        ("linear", []) => Some(Interpolation::Linear),
        ("exponential", [Expr::Number(base)]) if base.is_finite() && *base > 0.0 => {
            Some(Interpolation::Exponential(*base))
        }
        // cubic-bezier and friends: not modeled
        _ => None,
    }
}

// ------------------------------- Tests ------------------------------------ //
