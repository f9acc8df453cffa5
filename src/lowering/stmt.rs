use crate::{
    ast::{
        statements::{Assignment, IfElseBranch, Location, StatementList, Stmt, WhileLoop},
        types::Type,
    },
    errors::errors::PipelineError,
    ir::ir::{InstId, InstKind, Value},
};

use super::{
    expr::{lower_call, lower_expression},
    lower::{InstPair, LoopTargets, Lowerer},
};

/// Lowers a block into a chain starting at a fresh no-op.
///
/// Statements after one that never falls through are still lowered but are
/// left unreachable.
pub fn lower_statements(
    lowerer: &mut Lowerer,
    block: &StatementList,
    loop_targets: Option<LoopTargets>,
) -> Result<InstPair, PipelineError> {
    let start = lowerer.function.add(InstKind::Nop);
    let mut end = Some(start);

    for stmt in block.iter() {
        let pair = lower_statement(lowerer, stmt, loop_targets)?;
        if let Some(tail) = end {
            lowerer.function.link(tail, pair.start);
        }
        end = pair.end;
    }

    Ok(InstPair { start, end })
}

pub fn lower_statement(
    lowerer: &mut Lowerer,
    statement: &Stmt,
    loop_targets: Option<LoopTargets>,
) -> Result<InstPair, PipelineError> {
    match statement {
        Stmt::VarDecl(var) => {
            let symbol = lowerer.symbol_of(var.id, &var.name, var.position)?;
            lowerer.declare_local(symbol, var.ty.clone());
            Ok(InstPair::single(lowerer.function.add(InstKind::Nop)))
        }
        Stmt::Assignment(assignment) => lower_assignment(lowerer, assignment),
        Stmt::Call(call) => Ok(lower_call(lowerer, call)?.into()),
        Stmt::IfElse(branch) => lower_if_else(lowerer, branch, loop_targets),
        Stmt::While(loop_) => lower_while(lowerer, loop_),
        Stmt::Break(_) => {
            let targets = loop_targets.ok_or(PipelineError::OutsideLoop("break"))?;
            Ok(lower_unconditional_jump(lowerer, targets.join))
        }
        Stmt::Continue(_) => {
            let targets = loop_targets.ok_or(PipelineError::OutsideLoop("continue"))?;
            Ok(lower_unconditional_jump(lowerer, targets.recompute))
        }
        Stmt::Return(ret) => match &ret.value {
            Some(value) => {
                let value = lower_expression(lowerer, value)?;
                let inst = lowerer.function.add(InstKind::Return {
                    value: Some(value.value),
                });
                lowerer.function.link(value.end, inst);
                Ok(InstPair {
                    start: value.start,
                    end: None,
                })
            }
            None => Ok(InstPair {
                start: lowerer.function.add(InstKind::Return { value: None }),
                end: None,
            }),
        },
    }
}

/// A jump on the constant `true` with both edges already on `target`.
fn lower_unconditional_jump(lowerer: &mut Lowerer, target: InstId) -> InstPair {
    let predicate = lowerer.function.new_local(Type::Bool);
    let copy = lowerer.function.add(InstKind::Copy {
        dst: predicate,
        src: Value::BooleanConstant(true),
    });
    let jump = lowerer.function.add(InstKind::Jump { predicate });

    lowerer.function.link(copy, jump);
    lowerer.function.set_edge(jump, 0, target);
    lowerer.function.set_edge(jump, 1, target);

    InstPair {
        start: copy,
        end: None,
    }
}

fn lower_assignment(
    lowerer: &mut Lowerer,
    assignment: &Assignment,
) -> Result<InstPair, PipelineError> {
    match &assignment.location {
        Location::Var(access) => {
            let symbol = lowerer.symbol_of(access.id, &access.name, access.position)?;

            if let Some(local) = lowerer.local(symbol) {
                let value = lower_expression(lowerer, &assignment.value)?;
                let copy = lowerer.function.add(InstKind::Copy {
                    dst: local,
                    src: Value::Local(value.value),
                });
                lowerer.function.link(value.end, copy);
                return Ok(InstPair {
                    start: value.start,
                    end: Some(copy),
                });
            }

            // Global scalar
            let ty = lowerer.type_of(access.id, access.position)?;
            let address = lowerer.function.new_address(ty);
            let address_at = lowerer.function.add(InstKind::AddressAt {
                dst: address,
                base: symbol,
                offset: None,
            });
            let value = lower_expression(lowerer, &assignment.value)?;
            let store = lowerer.function.add(InstKind::Store {
                address,
                value: value.value,
            });

            lowerer.function.link(address_at, value.start);
            lowerer.function.link(value.end, store);
            Ok(InstPair {
                start: address_at,
                end: Some(store),
            })
        }
        Location::Array(access) => {
            let symbol = lowerer.symbol_of(access.id, &access.name, access.position)?;
            let ty = lowerer.type_of(access.id, access.position)?;

            let index = lower_expression(lowerer, &access.index)?;
            let address = lowerer.function.new_address(ty);
            let address_at = lowerer.function.add(InstKind::AddressAt {
                dst: address,
                base: symbol,
                offset: Some(index.value),
            });
            let value = lower_expression(lowerer, &assignment.value)?;
            let store = lowerer.function.add(InstKind::Store {
                address,
                value: value.value,
            });

            lowerer.function.link(index.end, address_at);
            lowerer.function.link(address_at, value.start);
            lowerer.function.link(value.end, store);
            Ok(InstPair {
                start: index.start,
                end: Some(store),
            })
        }
    }
}

fn lower_if_else(
    lowerer: &mut Lowerer,
    branch: &IfElseBranch,
    loop_targets: Option<LoopTargets>,
) -> Result<InstPair, PipelineError> {
    let condition = lower_expression(lowerer, &branch.condition)?;
    let jump = lowerer.function.add(InstKind::Jump {
        predicate: condition.value,
    });
    lowerer.function.link(condition.end, jump);

    let then_pair = lower_statements(lowerer, &branch.then_block, loop_targets)?;
    let else_pair = match &branch.else_block {
        Some(else_block) => lower_statements(lowerer, else_block, loop_targets)?,
        None => InstPair::single(lowerer.function.add(InstKind::Nop)),
    };
    let join = lowerer.function.add(InstKind::Nop);

    lowerer.function.set_edge(jump, 0, else_pair.start);
    lowerer.function.set_edge(jump, 1, then_pair.start);
    for tail in [then_pair.end, else_pair.end].into_iter().flatten() {
        lowerer.function.link(tail, join);
    }

    Ok(InstPair {
        start: condition.start,
        end: Some(join),
    })
}

fn lower_while(lowerer: &mut Lowerer, loop_: &WhileLoop) -> Result<InstPair, PipelineError> {
    let recompute = lowerer.function.add(InstKind::Nop);
    let join = lowerer.function.add(InstKind::Nop);

    let condition = lower_expression(lowerer, &loop_.condition)?;
    let jump = lowerer.function.add(InstKind::Jump {
        predicate: condition.value,
    });
    lowerer.function.link(recompute, condition.start);
    lowerer.function.link(condition.end, jump);

    let targets = LoopTargets { join, recompute };
    let body = lower_statements(lowerer, &loop_.body, Some(targets))?;

    lowerer.function.set_edge(jump, 0, join);
    lowerer.function.set_edge(jump, 1, body.start);
    if let Some(tail) = body.end {
        // Back-edge
        lowerer.function.link(tail, recompute);
    }

    Ok(InstPair {
        start: recompute,
        end: Some(join),
    })
}
