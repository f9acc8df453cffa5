//! x86-64 code generation.
//!
//! Every temporary of a function gets its own 8-byte stack slot below the
//! frame pointer, in the order temporaries are first seen; there is no reuse
//! and no register allocation. Instructions are translated through the slots
//! using `%r10` and `%r11` as scratch registers.
//!
//! The instruction graph is linearized in depth-first order with edge 0
//! emitted next, so sequential successors and the false edge of a jump fall
//! through whenever they have not been emitted yet.

use indexmap::IndexSet;
use log::{debug, trace};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    errors::errors::PipelineError,
    ir::ir::{Function, InstId, InstKind, Program, Temp},
};

use super::emit::{emit_instruction, emit_return};

/// Registers holding the first six arguments, in order.
pub const ARGUMENT_REGISTERS: [&str; 6] = ["%rdi", "%rsi", "%rdx", "%rcx", "%r8", "%r9"];

/// Largest frame, in bytes, that `enter` can reserve.
const MAX_ENTER_FRAME: usize = 0xffff;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodegenOptions {
    /// Prepended to every global and function symbol, e.g. `_` on Mach-O.
    pub symbol_prefix: String,
}

/// Generates the assembly listing for a whole program.
pub fn generate(program: &Program, options: &CodegenOptions) -> Result<String, PipelineError> {
    let mut generator = CodeGenerator::new(program, options);

    for global in program.globals.iter() {
        let name = generator.symbol(program.symbol_name(global.symbol));
        generator.line(format!(".comm {}, {}, 8", name, 8 * global.count));
    }

    if !program.functions.is_empty() {
        generator.line(".text".to_string());
    }

    for function in program.functions.iter() {
        generator.emit_function(function)?;
    }

    Ok(generator.output)
}

pub struct CodeGenerator<'p> {
    pub program: &'p Program,
    pub options: &'p CodegenOptions,
    pub output: String,
    /// Shared by every function so labels are unique in the listing
    next_label: usize,
    /// Stack slots of the current function, slot `n` is at `-8n(%rbp)`
    slots: IndexSet<Temp>,
}

impl<'p> CodeGenerator<'p> {
    pub fn new(program: &'p Program, options: &'p CodegenOptions) -> Self {
        CodeGenerator {
            program,
            options,
            output: String::new(),
            next_label: 0,
            slots: IndexSet::new(),
        }
    }

    pub fn line(&mut self, line: String) {
        self.output.push('\t');
        self.output.push_str(&line);
        self.output.push('\n');
    }

    fn label(&mut self, label: &str) {
        self.output.push_str(label);
        self.output.push_str(":\n");
    }

    pub fn symbol(&self, name: &str) -> String {
        format!("{}{}", self.options.symbol_prefix, name)
    }

    /// The frame slot of a temporary, as an operand.
    pub fn slot(&mut self, temp: impl Into<Temp>) -> String {
        let (index, _) = self.slots.insert_full(temp.into());
        format!("-{}(%rbp)", 8 * (index + 1))
    }

    fn emit_function(&mut self, function: &Function) -> Result<(), PipelineError> {
        let order = function.reachable();

        self.slots.clear();
        for argument in function.arguments.iter() {
            self.slots.insert(Temp::Local(*argument));
        }
        for id in order.iter() {
            for temp in function.get(*id).kind.temps() {
                self.slots.insert(temp);
            }
        }

        let labels = self.assign_labels(function, &order)?;

        // Keep %rsp 16-byte aligned
        let frame_slots = (self.slots.len() + 1) & !1;
        let name = self.symbol(&function.name);
        self.line(format!(".globl {}", name));
        self.label(&name);
        let frame_size = 8 * frame_slots;
        if frame_size <= MAX_ENTER_FRAME {
            self.line(format!("enter ${}, $0", frame_size));
        } else {
            // The size operand of `enter` is 16 bits wide
            self.line("pushq %rbp".to_string());
            self.line("movq %rsp, %rbp".to_string());
            self.line(format!("subq ${}, %rsp", frame_size));
        }

        for (index, argument) in function.arguments.iter().enumerate() {
            let slot = self.slot(*argument);
            match ARGUMENT_REGISTERS.get(index) {
                Some(register) => self.line(format!("movq {}, {}", register, slot)),
                None => {
                    let offset = 16 + 8 * (index - ARGUMENT_REGISTERS.len());
                    self.line(format!("movq {}(%rbp), %r10", offset));
                    self.line(format!("movq %r10, {}", slot));
                }
            }
        }

        for (position, id) in order.iter().enumerate() {
            let instruction = function.get(*id);
            let next_in_order = order.get(position + 1).copied();

            if let Some(label) = labels.get(id) {
                self.label(label);
            }
            trace!("Emitting {} in {}", instruction.kind, function.name);

            match &instruction.kind {
                InstKind::Return { value } => emit_return(self, *value),
                InstKind::Jump { predicate } => {
                    let false_edge = successor(function, *id, 0)?;
                    let true_edge = successor(function, *id, 1)?;

                    let slot = self.slot(*predicate);
                    self.line(format!("movq {}, %r10", slot));
                    self.line("cmpq $1, %r10".to_string());
                    self.line(format!("je {}", labels[&true_edge]));
                    self.transfer(false_edge, next_in_order, &labels);
                }
                kind => {
                    emit_instruction(self, kind);
                    match instruction.next[0] {
                        Some(next) => self.transfer(next, next_in_order, &labels),
                        // Falling off the end of the function
                        None => emit_return(self, None),
                    }
                }
            }
        }

        debug!(
            "Generated {} with {} instructions in {} slots",
            function.name,
            order.len(),
            self.slots.len()
        );

        Ok(())
    }

    /// Continues at `target`, jumping unless it is emitted next.
    fn transfer(
        &mut self,
        target: InstId,
        next_in_order: Option<InstId>,
        labels: &FxHashMap<InstId, String>,
    ) {
        if next_in_order != Some(target) {
            self.line(format!("jmp {}", labels[&target]));
        }
    }

    /// Labels every instruction with two or more predecessors, every jump
    /// target, and every successor that is not emitted right after its
    /// predecessor.
    fn assign_labels(
        &mut self,
        function: &Function,
        order: &[InstId],
    ) -> Result<FxHashMap<InstId, String>, PipelineError> {
        let mut predecessors: FxHashMap<InstId, usize> = FxHashMap::default();
        *predecessors.entry(function.entry).or_default() += 1;

        let mut targets = FxHashSet::default();
        for (position, id) in order.iter().enumerate() {
            let instruction = function.get(*id);
            for next in instruction.successors() {
                *predecessors.entry(next).or_default() += 1;
            }

            match instruction.kind {
                InstKind::Jump { .. } => {
                    targets.insert(successor(function, *id, 1)?);
                    let false_edge = successor(function, *id, 0)?;
                    if order.get(position + 1) != Some(&false_edge) {
                        targets.insert(false_edge);
                    }
                }
                _ => {
                    if let Some(next) = instruction.next[0] {
                        if order.get(position + 1) != Some(&next) {
                            targets.insert(next);
                        }
                    }
                }
            }
        }

        let mut labels = FxHashMap::default();
        for id in order.iter() {
            let shared = predecessors.get(id).copied().unwrap_or(0) >= 2;
            if shared || targets.contains(id) {
                labels.insert(*id, format!(".L{}", self.next_label));
                self.next_label += 1;
            }
        }

        Ok(labels)
    }
}

fn successor(function: &Function, id: InstId, edge: usize) -> Result<InstId, PipelineError> {
    let instruction = function.get(id);
    instruction.next[edge].ok_or_else(|| PipelineError::MissingSuccessor {
        function: function.name.clone(),
        kind: instruction.kind.name(),
        edge,
    })
}
