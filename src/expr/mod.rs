//! A small numeric expression language for procedural shapes.
//!
//! Expressions are C-like: `x`, `y`, `z` (and any caller-declared
//! parameters) are variables, `;` separates statements, the last statement's
//! value is the result, and assignment (`y = y * 2`) writes back into the
//! variable slots so callers can read transformed coordinates out again.

mod eval;
mod lexer;
mod parser;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("parse error at offset {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("runtime error: {0}")]
    Runtime(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Func {
    Abs,
    Min,
    Max,
    Floor,
    Ceil,
    Round,
    Sqrt,
    Sin,
    Cos,
    Tan,
    Atan2,
    Exp,
    Log,
    Pow,
}

impl Func {
    pub(crate) fn from_name(name: &str) -> Option<Func> {
        Some(match name {
            "abs" => Func::Abs,
            "min" => Func::Min,
            "max" => Func::Max,
            "floor" => Func::Floor,
            "ceil" => Func::Ceil,
            "round" => Func::Round,
            "sqrt" => Func::Sqrt,
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" => Func::Tan,
            "atan2" => Func::Atan2,
            "exp" => Func::Exp,
            "log" => Func::Log,
            "pow" => Func::Pow,
            _ => return None,
        })
    }

    pub(crate) fn arity(&self) -> usize {
        match self {
            Func::Min | Func::Max | Func::Atan2 | Func::Pow => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Ast {
    Num(f64),
    Var(usize),
    Assign(usize, Box<Ast>),
    Neg(Box<Ast>),
    Not(Box<Ast>),
    Bin(BinOp, Box<Ast>, Box<Ast>),
    Ternary(Box<Ast>, Box<Ast>, Box<Ast>),
    Call(Func, Vec<Ast>),
    Seq(Vec<Ast>),
}

/// A compiled expression. Compile once, evaluate per coordinate.
#[derive(Debug, Clone)]
pub struct Expression {
    ast: Ast,
    variables: Vec<String>,
    parameter_count: usize,
}

impl Expression {
    /// Compile `source` with the given parameter names pre-bound to the
    /// first slots. Assignments to new names declare additional variables;
    /// reading a name that was never declared is a parse error.
    pub fn compile(source: &str, parameters: &[&str]) -> Result<Expression, ExprError> {
        let tokens = lexer::tokenize(source)?;
        let mut variables: Vec<String> = parameters.iter().map(|p| p.to_string()).collect();
        let ast = parser::parse(&tokens, &mut variables)?;
        Ok(Expression {
            ast,
            variables,
            parameter_count: parameters.len(),
        })
    }

    pub fn slot(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v == name)
    }

    /// Evaluate with the given parameter values. `node_cap` bounds the
    /// number of AST nodes visited, standing in for a wall-clock timeout on
    /// pathological expressions.
    pub fn evaluate(&self, parameters: &[f64], node_cap: u64) -> Result<f64, ExprError> {
        self.evaluate_full(parameters, node_cap).map(|(v, _)| v)
    }

    /// Like `evaluate`, additionally returning every variable slot's final
    /// value so callers can read back assignments (deform rewrites x/y/z).
    pub fn evaluate_full(
        &self,
        parameters: &[f64],
        node_cap: u64,
    ) -> Result<(f64, Vec<f64>), ExprError> {
        if parameters.len() != self.parameter_count {
            return Err(ExprError::Runtime(format!(
                "expected {} parameters, got {}",
                self.parameter_count,
                parameters.len()
            )));
        }
        let mut slots = vec![0.0; self.variables.len()];
        slots[..parameters.len()].copy_from_slice(parameters);
        let mut budget = node_cap;
        let value = eval::eval(&self.ast, &mut slots, &mut budget)?;
        Ok((value, slots))
    }
}
