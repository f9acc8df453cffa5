use crate::{
    ast::{
        expressions::{ArrayAccess, Call, Expr, OpExpr, Operation, VarAccess},
        types::Type,
    },
    errors::errors::PipelineError,
    ir::ir::{BinaryOp, CompareOp, InstKind, Value},
};

use super::lower::{ExprPair, Lowerer};

pub fn lower_expression(lowerer: &mut Lowerer, expression: &Expr) -> Result<ExprPair, PipelineError> {
    match expression {
        Expr::LiteralInt(literal) => Ok(lower_constant(
            lowerer,
            Type::Int,
            Value::IntegerConstant(literal.value),
        )),
        Expr::LiteralBool(literal) => Ok(lower_constant(
            lowerer,
            Type::Bool,
            Value::BooleanConstant(literal.value),
        )),
        Expr::VarAccess(access) => lower_var_access(lowerer, access),
        Expr::ArrayAccess(access) => lower_array_access(lowerer, access),
        Expr::Call(call) => lower_call(lowerer, call),
        Expr::Op(op) => lower_operation(lowerer, op),
    }
}

fn lower_constant(lowerer: &mut Lowerer, ty: Type, constant: Value) -> ExprPair {
    let dst = lowerer.function.new_local(ty);
    let copy = lowerer.function.add(InstKind::Copy { dst, src: constant });

    ExprPair {
        start: copy,
        end: copy,
        value: dst,
    }
}

fn lower_var_access(lowerer: &mut Lowerer, access: &VarAccess) -> Result<ExprPair, PipelineError> {
    let symbol = lowerer.symbol_of(access.id, &access.name, access.position)?;

    if let Some(local) = lowerer.local(symbol) {
        let nop = lowerer.function.add(InstKind::Nop);
        return Ok(ExprPair {
            start: nop,
            end: nop,
            value: local,
        });
    }

    let ty = lowerer.type_of(access.id, access.position)?;
    let address = lowerer.function.new_address(ty.clone());
    let address_at = lowerer.function.add(InstKind::AddressAt {
        dst: address,
        base: symbol,
        offset: None,
    });
    let dst = lowerer.function.new_local(ty);
    let load = lowerer.function.add(InstKind::Load { dst, address });
    lowerer.function.link(address_at, load);

    Ok(ExprPair {
        start: address_at,
        end: load,
        value: dst,
    })
}

fn lower_array_access(
    lowerer: &mut Lowerer,
    access: &ArrayAccess,
) -> Result<ExprPair, PipelineError> {
    let symbol = lowerer.symbol_of(access.id, &access.name, access.position)?;
    let ty = lowerer.type_of(access.id, access.position)?;

    let index = lower_expression(lowerer, &access.index)?;
    let address = lowerer.function.new_address(ty.clone());
    let address_at = lowerer.function.add(InstKind::AddressAt {
        dst: address,
        base: symbol,
        offset: Some(index.value),
    });
    let dst = lowerer.function.new_local(ty);
    let load = lowerer.function.add(InstKind::Load { dst, address });

    lowerer.function.link(index.end, address_at);
    lowerer.function.link(address_at, load);

    Ok(ExprPair {
        start: index.start,
        end: load,
        value: dst,
    })
}

/// Arguments are evaluated left to right, each chain following the previous one.
pub fn lower_call(lowerer: &mut Lowerer, call: &Call) -> Result<ExprPair, PipelineError> {
    let callee = lowerer.symbol_of(call.id, &call.callee, call.position)?;
    let ty = lowerer.type_of(call.id, call.position)?;

    let mut start = None;
    let mut tail = None;
    let mut args = Vec::with_capacity(call.arguments.len());

    for argument in call.arguments.iter() {
        let pair = lower_expression(lowerer, argument)?;
        match tail {
            Some(tail) => lowerer.function.link(tail, pair.start),
            None => start = Some(pair.start),
        }
        tail = Some(pair.end);
        args.push(pair.value);
    }

    // The destination exists even for void calls
    let dst = lowerer.function.new_local(ty);
    let inst = lowerer.function.add(InstKind::Call { dst, callee, args });
    if let Some(tail) = tail {
        lowerer.function.link(tail, inst);
    }

    Ok(ExprPair {
        start: start.unwrap_or(inst),
        end: inst,
        value: dst,
    })
}

fn lower_operation(lowerer: &mut Lowerer, op: &OpExpr) -> Result<ExprPair, PipelineError> {
    let malformed = PipelineError::MalformedOperation {
        position: op.position,
    };
    let right = op.right.as_deref().ok_or(malformed.clone());

    match op.op {
        Operation::LogicNot => {
            let operand = lower_expression(lowerer, &op.left)?;
            let dst = lowerer.function.new_local(Type::Bool);
            let not = lowerer.function.add(InstKind::UnaryNot {
                dst,
                operand: operand.value,
            });
            lowerer.function.link(operand.end, not);

            Ok(ExprPair {
                start: operand.start,
                end: not,
                value: dst,
            })
        }
        Operation::LogicOr => lower_short_circuit(lowerer, &op.left, right?, true),
        Operation::LogicAnd => lower_short_circuit(lowerer, &op.left, right?, false),
        other => {
            let left = lower_expression(lowerer, &op.left)?;
            let right = lower_expression(lowerer, right?)?;
            lowerer.function.link(left.end, right.start);

            let (dst, kind) = if let Some(compare) = CompareOp::from_operation(other) {
                let dst = lowerer.function.new_local(Type::Bool);
                let kind = InstKind::Compare {
                    dst,
                    op: compare,
                    left: left.value,
                    right: right.value,
                };
                (dst, kind)
            } else if let Some(binary) = BinaryOp::from_operation(other) {
                let dst = lowerer.function.new_local(Type::Int);
                let kind = InstKind::BinaryOperator {
                    dst,
                    op: binary,
                    left: left.value,
                    right: right.value,
                };
                (dst, kind)
            } else {
                return Err(malformed);
            };

            let inst = lowerer.function.add(kind);
            lowerer.function.link(right.end, inst);

            Ok(ExprPair {
                start: left.start,
                end: inst,
                value: dst,
            })
        }
    }
}

/// Lowers `||` (`decided_by == true`) or `&&` (`decided_by == false`).
///
/// When the left operand equals `decided_by` the result is that constant and
/// the right operand is never evaluated. Otherwise the right operand's value
/// is copied into the result. Both paths meet at a join no-op.
fn lower_short_circuit(
    lowerer: &mut Lowerer,
    left: &Expr,
    right: &Expr,
    decided_by: bool,
) -> Result<ExprPair, PipelineError> {
    let left = lower_expression(lowerer, left)?;
    let result = lowerer.function.new_local(Type::Bool);
    let jump = lowerer.function.add(InstKind::Jump {
        predicate: left.value,
    });
    lowerer.function.link(left.end, jump);

    let decided = lowerer.function.add(InstKind::Copy {
        dst: result,
        src: Value::BooleanConstant(decided_by),
    });

    let right = lower_expression(lowerer, right)?;
    let copy_right = lowerer.function.add(InstKind::Copy {
        dst: result,
        src: Value::Local(right.value),
    });
    lowerer.function.link(right.end, copy_right);

    // Edge 1 is taken when the left operand is true
    let (true_edge, false_edge) = if decided_by {
        (decided, right.start)
    } else {
        (right.start, decided)
    };
    lowerer.function.set_edge(jump, 0, false_edge);
    lowerer.function.set_edge(jump, 1, true_edge);

    let join = lowerer.function.add(InstKind::Nop);
    lowerer.function.link(decided, join);
    lowerer.function.link(copy_right, join);

    Ok(ExprPair {
        start: left.start,
        end: join,
        value: result,
    })
}
