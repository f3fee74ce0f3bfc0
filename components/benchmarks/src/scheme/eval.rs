//! Tree-walking evaluator.
//!
//! Source is read into [`Datum`]s, compiled once into [`Expr`] trees with
//! interned symbols, then evaluated against chained frames.

use super::reader::{read_all, Datum};
use super::SchemeError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Sym(u32);

#[derive(Debug, Default)]
struct Interner {
    ids: HashMap<String, Sym>,
    names: Vec<String>,
}

impl Interner {
    fn intern(&mut self, name: &str) -> Sym {
        if let Some(&sym) = self.ids.get(name) {
            return sym;
        }
        let sym = Sym(self.names.len() as u32);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), sym);
        sym
    }

    fn get(&self, name: &str) -> Option<Sym> {
        self.ids.get(name).copied()
    }

    fn name(&self, sym: Sym) -> &str {
        &self.names[sym.0 as usize]
    }
}

/// A runtime object.
#[derive(Clone)]
pub enum Obj {
    /// Exact integer
    Int(i64),
    /// Boolean
    Bool(bool),
    /// Symbol, by name
    Symbol(Rc<str>),
    /// Proper list
    List(Rc<[Obj]>),
    /// Value of forms that return nothing useful (`define`)
    Unspecified,
    /// User procedure
    Closure(Rc<Closure>),
    /// Native procedure
    Builtin(Builtin),
}

impl fmt::Display for Obj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Obj::Int(n) => write!(f, "{}", n),
            Obj::Bool(true) => write!(f, "#t"),
            Obj::Bool(false) => write!(f, "#f"),
            Obj::Symbol(name) => write!(f, "{}", name),
            Obj::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Obj::Unspecified => write!(f, "#<unspecified>"),
            Obj::Closure(_) => write!(f, "#<procedure>"),
            Obj::Builtin(b) => write!(f, "#<procedure {}>", b.name),
        }
    }
}

impl fmt::Debug for Obj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Native procedure.
#[derive(Clone, Copy)]
pub struct Builtin {
    name: &'static str,
    f: fn(&[Obj]) -> Result<Obj, SchemeError>,
}

/// User procedure with its captured frame.
pub struct Closure {
    lambda: Rc<Lambda>,
    env: Rc<Frame>,
}

struct Lambda {
    params: Vec<Sym>,
    body: Vec<Expr>,
}

enum Expr {
    Const(Obj),
    Var(Sym),
    If(Box<Expr>, Box<Expr>, Option<Box<Expr>>),
    Lambda(Rc<Lambda>),
    Define(Sym, Box<Expr>),
    Begin(Vec<Expr>),
    Let(Vec<(Sym, Expr)>, Vec<Expr>),
    NamedLet(Sym, Rc<Lambda>, Vec<Expr>),
    Call(Box<Expr>, Vec<Expr>),
}

#[derive(Default)]
struct Frame {
    slots: RefCell<Vec<(Sym, Obj)>>,
    parent: Option<Rc<Frame>>,
}

impl Frame {
    fn child(parent: &Rc<Frame>, slots: Vec<(Sym, Obj)>) -> Rc<Frame> {
        Rc::new(Frame {
            slots: RefCell::new(slots),
            parent: Some(parent.clone()),
        })
    }

    fn lookup(&self, sym: Sym) -> Option<Obj> {
        let mut frame = self;
        loop {
            if let Some((_, value)) = frame.slots.borrow().iter().find(|(s, _)| *s == sym) {
                return Some(value.clone());
            }
            frame = frame.parent.as_deref()?;
        }
    }

    fn define(&self, sym: Sym, value: Obj) {
        let mut slots = self.slots.borrow_mut();
        match slots.iter_mut().find(|(s, _)| *s == sym) {
            Some(slot) => slot.1 = value,
            None => slots.push((sym, value)),
        }
    }
}

/// A Scheme interpreter with its own global environment.
pub struct Interpreter {
    symbols: Interner,
    global: Rc<Frame>,
}

impl Interpreter {
    /// Creates an interpreter with the arithmetic and comparison builtins.
    pub fn new() -> Self {
        let mut interp = Self {
            symbols: Interner::default(),
            global: Rc::new(Frame::default()),
        };
        for builtin in BUILTINS {
            let sym = interp.symbols.intern(builtin.name);
            interp.global.define(sym, Obj::Builtin(*builtin));
        }
        interp
    }

    /// Reads and evaluates every top-level form, returning the last value.
    pub fn eval_source(&mut self, src: &str) -> Result<Obj, SchemeError> {
        let data = read_all(src)?;
        let mut last = Obj::Unspecified;
        for datum in &data {
            let expr = self.compile(datum)?;
            let global = self.global.clone();
            last = self.eval(&expr, &global)?;
        }
        Ok(last)
    }

    /// Calls the global procedure `name`.
    pub fn call_global(&self, name: &str, args: Vec<Obj>) -> Result<Obj, SchemeError> {
        let procedure = self
            .symbols
            .get(name)
            .and_then(|sym| self.global.lookup(sym))
            .ok_or_else(|| SchemeError::Unbound(name.to_string()))?;
        self.apply(&procedure, args)
    }

    /// Names of user-defined global procedures.
    pub fn global_procedures(&self) -> Vec<String> {
        self.global
            .slots
            .borrow()
            .iter()
            .filter(|(_, value)| matches!(value, Obj::Closure(_)))
            .map(|(sym, _)| self.symbols.name(*sym).to_string())
            .collect()
    }

    fn compile(&mut self, datum: &Datum) -> Result<Expr, SchemeError> {
        match datum {
            Datum::Int(n) => Ok(Expr::Const(Obj::Int(*n))),
            Datum::Bool(b) => Ok(Expr::Const(Obj::Bool(*b))),
            Datum::Symbol(name) => Ok(Expr::Var(self.symbols.intern(name))),
            Datum::List(items) => self.compile_list(items),
        }
    }

    fn compile_list(&mut self, items: &[Datum]) -> Result<Expr, SchemeError> {
        let Some((head, rest)) = items.split_first() else {
            return Err(SchemeError::Syntax("empty application ()".to_string()));
        };

        if let Datum::Symbol(keyword) = head {
            match keyword.as_str() {
                "quote" => {
                    return match rest {
                        [datum] => Ok(Expr::Const(quote(datum))),
                        _ => Err(SchemeError::Syntax("quote takes one datum".to_string())),
                    };
                }
                "if" => {
                    return match rest {
                        [test, then] => Ok(Expr::If(
                            Box::new(self.compile(test)?),
                            Box::new(self.compile(then)?),
                            None,
                        )),
                        [test, then, otherwise] => Ok(Expr::If(
                            Box::new(self.compile(test)?),
                            Box::new(self.compile(then)?),
                            Some(Box::new(self.compile(otherwise)?)),
                        )),
                        _ => Err(SchemeError::Syntax("malformed if".to_string())),
                    };
                }
                "define" => return self.compile_define(rest),
                "lambda" => {
                    let Some((params, body)) = rest.split_first() else {
                        return Err(SchemeError::Syntax("malformed lambda".to_string()));
                    };
                    return Ok(Expr::Lambda(self.compile_lambda(params, body)?));
                }
                "begin" => return Ok(Expr::Begin(self.compile_body(rest)?)),
                "let" => return self.compile_let(rest),
                _ => {}
            }
        }

        let callee = self.compile(head)?;
        let args = rest
            .iter()
            .map(|arg| self.compile(arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Expr::Call(Box::new(callee), args))
    }

    fn compile_define(&mut self, rest: &[Datum]) -> Result<Expr, SchemeError> {
        match rest {
            // (define (name params...) body...)
            [Datum::List(signature), body @ ..] if !body.is_empty() => {
                let Some((Datum::Symbol(name), params)) = signature.split_first() else {
                    return Err(SchemeError::Syntax("malformed define".to_string()));
                };
                let sym = self.symbols.intern(name);
                let params = Datum::List(params.to_vec());
                let lambda = self.compile_lambda(&params, body)?;
                Ok(Expr::Define(sym, Box::new(Expr::Lambda(lambda))))
            }
            [Datum::Symbol(name), value] => {
                let sym = self.symbols.intern(name);
                Ok(Expr::Define(sym, Box::new(self.compile(value)?)))
            }
            _ => Err(SchemeError::Syntax("malformed define".to_string())),
        }
    }

    fn compile_lambda(&mut self, params: &Datum, body: &[Datum]) -> Result<Rc<Lambda>, SchemeError> {
        let Datum::List(params) = params else {
            return Err(SchemeError::Syntax("lambda parameters must be a list".to_string()));
        };
        if body.is_empty() {
            return Err(SchemeError::Syntax("lambda body is empty".to_string()));
        }
        let params = params
            .iter()
            .map(|param| match param {
                Datum::Symbol(name) => Ok(self.symbols.intern(name)),
                other => Err(SchemeError::Syntax(format!("bad parameter {:?}", other))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let body = self.compile_body(body)?;
        Ok(Rc::new(Lambda { params, body }))
    }

    fn compile_body(&mut self, body: &[Datum]) -> Result<Vec<Expr>, SchemeError> {
        body.iter().map(|form| self.compile(form)).collect()
    }

    fn compile_let(&mut self, rest: &[Datum]) -> Result<Expr, SchemeError> {
        let (name, bindings, body) = match rest {
            [Datum::Symbol(name), Datum::List(bindings), body @ ..] => {
                (Some(name), bindings, body)
            }
            [Datum::List(bindings), body @ ..] => (None, bindings, body),
            _ => return Err(SchemeError::Syntax("malformed let".to_string())),
        };
        if body.is_empty() {
            return Err(SchemeError::Syntax("let body is empty".to_string()));
        }

        let mut params = Vec::with_capacity(bindings.len());
        let mut inits = Vec::with_capacity(bindings.len());
        for binding in bindings {
            match binding {
                Datum::List(pair) => match pair.as_slice() {
                    [Datum::Symbol(var), init] => {
                        params.push(self.symbols.intern(var));
                        inits.push(self.compile(init)?);
                    }
                    _ => return Err(SchemeError::Syntax("malformed let binding".to_string())),
                },
                _ => return Err(SchemeError::Syntax("malformed let binding".to_string())),
            }
        }
        let body = self.compile_body(body)?;

        match name {
            Some(name) => {
                let name = self.symbols.intern(name);
                Ok(Expr::NamedLet(name, Rc::new(Lambda { params, body }), inits))
            }
            None => Ok(Expr::Let(params.into_iter().zip(inits).collect(), body)),
        }
    }

    fn eval(&self, expr: &Expr, env: &Rc<Frame>) -> Result<Obj, SchemeError> {
        match expr {
            Expr::Const(value) => Ok(value.clone()),
            Expr::Var(sym) => env
                .lookup(*sym)
                .ok_or_else(|| SchemeError::Unbound(self.symbols.name(*sym).to_string())),
            Expr::If(test, then, otherwise) => {
                let truthy = !matches!(self.eval(test, env)?, Obj::Bool(false));
                match (truthy, otherwise) {
                    (true, _) => self.eval(then, env),
                    (false, Some(otherwise)) => self.eval(otherwise, env),
                    (false, None) => Ok(Obj::Unspecified),
                }
            }
            Expr::Lambda(lambda) => Ok(Obj::Closure(Rc::new(Closure {
                lambda: lambda.clone(),
                env: env.clone(),
            }))),
            Expr::Define(sym, value) => {
                let value = self.eval(value, env)?;
                env.define(*sym, value);
                Ok(Obj::Unspecified)
            }
            Expr::Begin(body) => self.eval_body(body, env),
            Expr::Let(bindings, body) => {
                let slots = bindings
                    .iter()
                    .map(|(sym, init)| Ok((*sym, self.eval(init, env)?)))
                    .collect::<Result<Vec<_>, SchemeError>>()?;
                self.eval_body(body, &Frame::child(env, slots))
            }
            Expr::NamedLet(name, lambda, inits) => {
                let args = inits
                    .iter()
                    .map(|init| self.eval(init, env))
                    .collect::<Result<Vec<_>, _>>()?;
                let frame = Frame::child(env, Vec::new());
                let procedure = Obj::Closure(Rc::new(Closure {
                    lambda: lambda.clone(),
                    env: frame.clone(),
                }));
                frame.define(*name, procedure.clone());
                let result = self.apply(&procedure, args);
                // The loop procedure only lives for this let; break the cycle
                frame.slots.borrow_mut().clear();
                result
            }
            Expr::Call(callee, args) => {
                let procedure = self.eval(callee, env)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg, env))
                    .collect::<Result<Vec<_>, _>>()?;
                self.apply(&procedure, args)
            }
        }
    }

    fn eval_body(&self, body: &[Expr], env: &Rc<Frame>) -> Result<Obj, SchemeError> {
        let mut last = Obj::Unspecified;
        for expr in body {
            last = self.eval(expr, env)?;
        }
        Ok(last)
    }

    fn apply(&self, procedure: &Obj, args: Vec<Obj>) -> Result<Obj, SchemeError> {
        match procedure {
            Obj::Builtin(builtin) => (builtin.f)(&args),
            Obj::Closure(closure) => {
                let params = &closure.lambda.params;
                if params.len() != args.len() {
                    return Err(SchemeError::Arity {
                        expected: params.len(),
                        got: args.len(),
                    });
                }
                let slots = params.iter().copied().zip(args).collect();
                self.eval_body(&closure.lambda.body, &Frame::child(&closure.env, slots))
            }
            other => Err(SchemeError::NotProcedure(other.to_string())),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Interpreter {
    fn drop(&mut self) {
        // Global closures capture the global frame
        self.global.slots.borrow_mut().clear();
    }
}

fn quote(datum: &Datum) -> Obj {
    match datum {
        Datum::Int(n) => Obj::Int(*n),
        Datum::Bool(b) => Obj::Bool(*b),
        Datum::Symbol(name) => Obj::Symbol(Rc::from(name.as_str())),
        Datum::List(items) => Obj::List(items.iter().map(quote).collect()),
    }
}

fn int(obj: &Obj) -> Result<i64, SchemeError> {
    match obj {
        Obj::Int(n) => Ok(*n),
        other => Err(SchemeError::Type {
            expected: "integer",
            got: other.to_string(),
        }),
    }
}

fn fold(args: &[Obj], init: i64, op: fn(i64, i64) -> Option<i64>) -> Result<Obj, SchemeError> {
    let mut acc = init;
    for arg in args {
        acc = op(acc, int(arg)?).ok_or(SchemeError::Overflow)?;
    }
    Ok(Obj::Int(acc))
}

fn add(args: &[Obj]) -> Result<Obj, SchemeError> {
    fold(args, 0, i64::checked_add)
}

fn mul(args: &[Obj]) -> Result<Obj, SchemeError> {
    fold(args, 1, i64::checked_mul)
}

fn sub(args: &[Obj]) -> Result<Obj, SchemeError> {
    match args {
        [] => Err(SchemeError::Arity {
            expected: 1,
            got: 0,
        }),
        [only] => int(only)?
            .checked_neg()
            .map(Obj::Int)
            .ok_or(SchemeError::Overflow),
        [first, rest @ ..] => fold(rest, int(first)?, i64::checked_sub),
    }
}

fn compare(args: &[Obj], holds: fn(i64, i64) -> bool) -> Result<Obj, SchemeError> {
    let values = args.iter().map(int).collect::<Result<Vec<_>, _>>()?;
    Ok(Obj::Bool(values.windows(2).all(|w| holds(w[0], w[1]))))
}

fn not(args: &[Obj]) -> Result<Obj, SchemeError> {
    match args {
        [value] => Ok(Obj::Bool(matches!(value, Obj::Bool(false)))),
        _ => Err(SchemeError::Arity {
            expected: 1,
            got: args.len(),
        }),
    }
}

fn lt(args: &[Obj]) -> Result<Obj, SchemeError> {
    compare(args, |a, b| a < b)
}

fn gt(args: &[Obj]) -> Result<Obj, SchemeError> {
    compare(args, |a, b| a > b)
}

fn num_eq(args: &[Obj]) -> Result<Obj, SchemeError> {
    compare(args, |a, b| a == b)
}

fn le(args: &[Obj]) -> Result<Obj, SchemeError> {
    compare(args, |a, b| a <= b)
}

fn ge(args: &[Obj]) -> Result<Obj, SchemeError> {
    compare(args, |a, b| a >= b)
}

const BUILTINS: &[Builtin] = &[
    Builtin { name: "+", f: add },
    Builtin { name: "-", f: sub },
    Builtin { name: "*", f: mul },
    Builtin { name: "<", f: lt },
    Builtin { name: ">", f: gt },
    Builtin { name: "=", f: num_eq },
    Builtin { name: "<=", f: le },
    Builtin { name: ">=", f: ge },
    Builtin { name: "not", f: not },
];
