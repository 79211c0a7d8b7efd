use super::{Ast, BinOp, ExprError, Func};

fn truthy(value: f64) -> bool {
    value != 0.0
}

fn boolean(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

pub(crate) fn eval(ast: &Ast, slots: &mut [f64], budget: &mut u64) -> Result<f64, ExprError> {
    if *budget == 0 {
        return Err(ExprError::Runtime(
            "expression exceeded its evaluation budget".to_string(),
        ));
    }
    *budget -= 1;

    match ast {
        Ast::Num(value) => Ok(*value),
        Ast::Var(slot) => Ok(slots[*slot]),
        Ast::Assign(slot, value) => {
            let value = eval(value, slots, budget)?;
            slots[*slot] = value;
            Ok(value)
        }
        Ast::Neg(inner) => Ok(-eval(inner, slots, budget)?),
        Ast::Not(inner) => Ok(boolean(!truthy(eval(inner, slots, budget)?))),
        Ast::Bin(op, left, right) => {
            // Short-circuit the logical operators.
            match op {
                BinOp::And => {
                    let l = eval(left, slots, budget)?;
                    if !truthy(l) {
                        return Ok(0.0);
                    }
                    return Ok(boolean(truthy(eval(right, slots, budget)?)));
                }
                BinOp::Or => {
                    let l = eval(left, slots, budget)?;
                    if truthy(l) {
                        return Ok(1.0);
                    }
                    return Ok(boolean(truthy(eval(right, slots, budget)?)));
                }
                _ => {}
            }
            let l = eval(left, slots, budget)?;
            let r = eval(right, slots, budget)?;
            Ok(match op {
                BinOp::Add => l + r,
                BinOp::Sub => l - r,
                BinOp::Mul => l * r,
                BinOp::Div => l / r,
                BinOp::Rem => l % r,
                BinOp::Pow => l.powf(r),
                BinOp::Lt => boolean(l < r),
                BinOp::Gt => boolean(l > r),
                BinOp::Le => boolean(l <= r),
                BinOp::Ge => boolean(l >= r),
                BinOp::Eq => boolean(l == r),
                BinOp::Ne => boolean(l != r),
                BinOp::And | BinOp::Or => unreachable!("handled above"),
            })
        }
        Ast::Ternary(condition, then, otherwise) => {
            if truthy(eval(condition, slots, budget)?) {
                eval(then, slots, budget)
            } else {
                eval(otherwise, slots, budget)
            }
        }
        Ast::Call(func, args) => {
            let a = eval(&args[0], slots, budget)?;
            match func {
                Func::Abs => Ok(a.abs()),
                Func::Floor => Ok(a.floor()),
                Func::Ceil => Ok(a.ceil()),
                Func::Round => Ok(a.round()),
                Func::Sqrt => Ok(a.sqrt()),
                Func::Sin => Ok(a.sin()),
                Func::Cos => Ok(a.cos()),
                Func::Tan => Ok(a.tan()),
                Func::Exp => Ok(a.exp()),
                Func::Log => Ok(a.ln()),
                Func::Min => Ok(a.min(eval(&args[1], slots, budget)?)),
                Func::Max => Ok(a.max(eval(&args[1], slots, budget)?)),
                Func::Atan2 => Ok(a.atan2(eval(&args[1], slots, budget)?)),
                Func::Pow => Ok(a.powf(eval(&args[1], slots, budget)?)),
            }
        }
        Ast::Seq(statements) => {
            let mut value = 0.0;
            for statement in statements {
                value = eval(statement, slots, budget)?;
            }
            Ok(value)
        }
    }
}
