use crate::{
    ir::ir::{BinaryOp, CompareOp, InstKind, LocalVar, Value},
    symbols::symbol_table::SymbolId,
};

use super::codegen::{CodeGenerator, ARGUMENT_REGISTERS};

/// Translates one sequential instruction. Jumps and returns are emitted by
/// the linearizer, which knows the labels.
pub fn emit_instruction(generator: &mut CodeGenerator, kind: &InstKind) {
    match kind {
        InstKind::AddressAt { dst, base, offset } => {
            let name = generator.symbol(generator.program.symbol_name(*base));
            generator.line(format!("movq {}@GOTPCREL(%rip), %r11", name));
            if let Some(offset) = offset {
                let offset = generator.slot(*offset);
                generator.line(format!("movq {}, %r10", offset));
                generator.line("imulq $8, %r10".to_string());
                generator.line("addq %r10, %r11".to_string());
            }
            let dst = generator.slot(*dst);
            generator.line(format!("movq %r11, {}", dst));
        }
        InstKind::BinaryOperator {
            dst,
            op,
            left,
            right,
        } => {
            let left = generator.slot(*left);
            let right = generator.slot(*right);
            let dst = generator.slot(*dst);

            let mnemonic = match op {
                BinaryOp::Add => "addq",
                BinaryOp::Sub => "subq",
                BinaryOp::Mul => "imulq",
                BinaryOp::Div => {
                    generator.line(format!("movq {}, %rax", left));
                    generator.line("cqto".to_string());
                    generator.line(format!("idivq {}", right));
                    generator.line(format!("movq %rax, {}", dst));
                    return;
                }
            };
            generator.line(format!("movq {}, %r10", left));
            generator.line(format!("{} {}, %r10", mnemonic, right));
            generator.line(format!("movq %r10, {}", dst));
        }
        InstKind::Compare {
            dst,
            op,
            left,
            right,
        } => {
            let left = generator.slot(*left);
            let right = generator.slot(*right);
            let dst = generator.slot(*dst);

            let set = match op {
                CompareOp::Gt => "setg",
                CompareOp::Ge => "setge",
                CompareOp::Lt => "setl",
                CompareOp::Le => "setle",
                CompareOp::Eq => "sete",
                CompareOp::Ne => "setne",
            };
            generator.line(format!("movq {}, %r10", left));
            generator.line(format!("cmpq {}, %r10", right));
            generator.line(format!("{} %al", set));
            generator.line("movzbq %al, %r10".to_string());
            generator.line(format!("movq %r10, {}", dst));
        }
        InstKind::Copy { dst, src } => {
            let source = match src {
                Value::Local(var) => generator.slot(*var),
                Value::Address(var) => generator.slot(*var),
                Value::IntegerConstant(value) => format!("${}", value),
                Value::BooleanConstant(value) => format!("${}", *value as i64),
            };
            let dst = generator.slot(*dst);
            generator.line(format!("movq {}, %r10", source));
            generator.line(format!("movq %r10, {}", dst));
        }
        InstKind::Load { dst, address } => {
            let address = generator.slot(*address);
            let dst = generator.slot(*dst);
            generator.line(format!("movq {}, %r11", address));
            generator.line("movq 0(%r11), %r10".to_string());
            generator.line(format!("movq %r10, {}", dst));
        }
        InstKind::Store { address, value } => {
            let address = generator.slot(*address);
            let value = generator.slot(*value);
            generator.line(format!("movq {}, %r11", address));
            generator.line(format!("movq {}, %r10", value));
            generator.line("movq %r10, 0(%r11)".to_string());
        }
        InstKind::Call { dst, callee, args } => emit_call(generator, *dst, *callee, args),
        InstKind::UnaryNot { dst, operand } => {
            let operand = generator.slot(*operand);
            let dst = generator.slot(*dst);
            generator.line("movq $1, %r10".to_string());
            generator.line(format!("subq {}, %r10", operand));
            generator.line(format!("movq %r10, {}", dst));
        }
        InstKind::Nop | InstKind::Jump { .. } | InstKind::Return { .. } => {}
    }
}

/// Stack arguments are pushed right to left, with one padding word when an
/// odd number is pushed so `%rsp` stays 16-byte aligned at the call.
fn emit_call(
    generator: &mut CodeGenerator,
    dst: LocalVar,
    callee: SymbolId,
    args: &[LocalVar],
) {
    for (register, arg) in ARGUMENT_REGISTERS.iter().zip(args) {
        let slot = generator.slot(*arg);
        generator.line(format!("movq {}, {}", slot, register));
    }

    let stack_args = args.get(ARGUMENT_REGISTERS.len()..).unwrap_or(&[]);
    let padding = stack_args.len() % 2;
    if padding == 1 {
        generator.line("subq $8, %rsp".to_string());
    }
    for arg in stack_args.iter().rev() {
        let slot = generator.slot(*arg);
        generator.line(format!("pushq {}", slot));
    }

    let name = generator.symbol(generator.program.symbol_name(callee));
    generator.line(format!("call {}", name));

    if !stack_args.is_empty() {
        generator.line(format!("addq ${}, %rsp", 8 * (stack_args.len() + padding)));
    }
    let dst = generator.slot(dst);
    generator.line(format!("movq %rax, {}", dst));
}

pub fn emit_return(generator: &mut CodeGenerator, value: Option<LocalVar>) {
    if let Some(value) = value {
        let slot = generator.slot(value);
        generator.line(format!("movq {}, %rax", slot));
    }
    generator.line("leave".to_string());
    generator.line("ret".to_string());
}
