use std::fmt::Display;

use la_arena::{Arena, Idx};
use rustc_hash::FxHashSet;

use crate::{
    ast::{expressions::Operation, types::Type},
    symbols::symbol_table::{Symbol, SymbolId},
};

pub type InstId = Idx<Instruction>;

/// A typed temporary holding a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalVar(pub u32);

/// A typed temporary holding a computed address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AddressVar(pub u32);

/// Anything that needs a stack slot during code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Temp {
    Local(LocalVar),
    Address(AddressVar),
}

impl From<LocalVar> for Temp {
    fn from(var: LocalVar) -> Self {
        Temp::Local(var)
    }
}

impl From<AddressVar> for Temp {
    fn from(var: AddressVar) -> Self {
        Temp::Address(var)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Local(LocalVar),
    Address(AddressVar),
    IntegerConstant(i64),
    BooleanConstant(bool),
}

impl Value {
    /// The temporary behind this value, if it is not a constant.
    pub fn temp(&self) -> Option<Temp> {
        match self {
            Value::Local(var) => Some(Temp::Local(*var)),
            Value::Address(var) => Some(Temp::Address(*var)),
            Value::IntegerConstant(_) | Value::BooleanConstant(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

impl BinaryOp {
    pub fn from_operation(op: Operation) -> Option<Self> {
        match op {
            Operation::Add => Some(BinaryOp::Add),
            Operation::Sub => Some(BinaryOp::Sub),
            Operation::Mult => Some(BinaryOp::Mul),
            Operation::Div => Some(BinaryOp::Div),
            _ => None,
        }
    }
}

impl CompareOp {
    pub fn from_operation(op: Operation) -> Option<Self> {
        match op {
            Operation::Gt => Some(CompareOp::Gt),
            Operation::Ge => Some(CompareOp::Ge),
            Operation::Lt => Some(CompareOp::Lt),
            Operation::Le => Some(CompareOp::Le),
            Operation::Eq => Some(CompareOp::Eq),
            Operation::Ne => Some(CompareOp::Ne),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InstKind {
    /// Address of a global, optionally offset by `offset` elements.
    AddressAt {
        dst: AddressVar,
        base: SymbolId,
        offset: Option<LocalVar>,
    },
    BinaryOperator {
        dst: LocalVar,
        op: BinaryOp,
        left: LocalVar,
        right: LocalVar,
    },
    Compare {
        dst: LocalVar,
        op: CompareOp,
        left: LocalVar,
        right: LocalVar,
    },
    Copy {
        dst: LocalVar,
        src: Value,
    },
    Load {
        dst: LocalVar,
        address: AddressVar,
    },
    Store {
        address: AddressVar,
        value: LocalVar,
    },
    Call {
        dst: LocalVar,
        callee: SymbolId,
        args: Vec<LocalVar>,
    },
    UnaryNot {
        dst: LocalVar,
        operand: LocalVar,
    },
    /// Edge 0 is taken when `predicate` is false, edge 1 when it is true.
    Jump {
        predicate: LocalVar,
    },
    Return {
        value: Option<LocalVar>,
    },
    Nop,
}

impl InstKind {
    /// Number of successor edges this kind of instruction must have.
    pub fn arity(&self) -> usize {
        match self {
            InstKind::Return { .. } => 0,
            InstKind::Jump { .. } => 2,
            _ => 1,
        }
    }

    /// Temporaries this instruction reads, followed by the one it writes.
    pub fn temps(&self) -> Vec<Temp> {
        match self {
            InstKind::AddressAt { dst, offset, .. } => offset
                .map(Temp::from)
                .into_iter()
                .chain([Temp::from(*dst)])
                .collect(),
            InstKind::BinaryOperator {
                dst, left, right, ..
            }
            | InstKind::Compare {
                dst, left, right, ..
            } => vec![(*left).into(), (*right).into(), (*dst).into()],
            InstKind::Copy { dst, src } => src.temp().into_iter().chain([Temp::from(*dst)]).collect(),
            InstKind::Load { dst, address } => vec![(*address).into(), (*dst).into()],
            InstKind::Store { address, value } => vec![(*address).into(), (*value).into()],
            InstKind::Call { dst, args, .. } => args
                .iter()
                .map(|arg| Temp::from(*arg))
                .chain([Temp::from(*dst)])
                .collect(),
            InstKind::UnaryNot { dst, operand } => vec![(*operand).into(), (*dst).into()],
            InstKind::Jump { predicate } => vec![(*predicate).into()],
            InstKind::Return { value } => value.map(Temp::from).into_iter().collect(),
            InstKind::Nop => vec![],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InstKind::AddressAt { .. } => "AddressAt",
            InstKind::BinaryOperator { .. } => "BinaryOperator",
            InstKind::Compare { .. } => "Compare",
            InstKind::Copy { .. } => "Copy",
            InstKind::Load { .. } => "Load",
            InstKind::Store { .. } => "Store",
            InstKind::Call { .. } => "Call",
            InstKind::UnaryNot { .. } => "UnaryNot",
            InstKind::Jump { .. } => "Jump",
            InstKind::Return { .. } => "Return",
            InstKind::Nop => "Nop",
        }
    }
}

impl Display for InstKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub kind: InstKind,
    pub next: [Option<InstId>; 2],
}

impl Instruction {
    pub fn new(kind: InstKind) -> Self {
        Instruction {
            kind,
            next: [None, None],
        }
    }

    pub fn arity(&self) -> usize {
        self.kind.arity()
    }

    /// The successors that are set, edge 0 first.
    pub fn successors(&self) -> impl Iterator<Item = InstId> + '_ {
        self.next.iter().flatten().copied()
    }
}

#[derive(Debug)]
pub struct Function {
    pub name: String,
    pub signature: Type,
    pub arguments: Vec<LocalVar>,
    /// Types of local temporaries, indexed by `LocalVar`.
    pub locals: Vec<Type>,
    /// Types of address temporaries, indexed by `AddressVar`.
    pub addresses: Vec<Type>,
    pub instructions: Arena<Instruction>,
    pub entry: InstId,
}

impl Function {
    /// Creates a function whose entry is an empty no-op.
    pub fn new(name: &str, signature: Type) -> Self {
        let mut instructions = Arena::new();
        let entry = instructions.alloc(Instruction::new(InstKind::Nop));

        Function {
            name: name.to_string(),
            signature,
            arguments: vec![],
            locals: vec![],
            addresses: vec![],
            instructions,
            entry,
        }
    }

    pub fn new_local(&mut self, ty: Type) -> LocalVar {
        self.locals.push(ty);
        LocalVar(self.locals.len() as u32 - 1)
    }

    pub fn new_address(&mut self, ty: Type) -> AddressVar {
        self.addresses.push(ty);
        AddressVar(self.addresses.len() as u32 - 1)
    }

    pub fn local_type(&self, var: LocalVar) -> &Type {
        &self.locals[var.0 as usize]
    }

    pub fn address_type(&self, var: AddressVar) -> &Type {
        &self.addresses[var.0 as usize]
    }

    pub fn add(&mut self, kind: InstKind) -> InstId {
        self.instructions.alloc(Instruction::new(kind))
    }

    pub fn get(&self, id: InstId) -> &Instruction {
        &self.instructions[id]
    }

    /// Sets the sequential successor of `from`.
    pub fn link(&mut self, from: InstId, to: InstId) {
        self.set_edge(from, 0, to);
    }

    pub fn set_edge(&mut self, from: InstId, edge: usize, to: InstId) {
        self.instructions[from].next[edge] = Some(to);
    }

    /// Instructions reachable from the entry, in depth-first order along
    /// edge 0 first.
    pub fn reachable(&self) -> Vec<InstId> {
        let mut visited = FxHashSet::default();
        let mut order = vec![];
        let mut stack = vec![self.entry];

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            order.push(id);

            let next = &self.instructions[id].next;
            for successor in next.iter().rev().flatten() {
                if !visited.contains(successor) {
                    stack.push(*successor);
                }
            }
        }

        order
    }
}

/// Storage reserved for a global; scalars have a count of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalDecl {
    pub symbol: SymbolId,
    pub count: i64,
}

#[derive(Debug)]
pub struct Program {
    pub globals: Vec<GlobalDecl>,
    pub functions: Vec<Function>,
    pub symbols: Arena<Symbol>,
}

impl Program {
    pub fn symbol(&self, symbol: SymbolId) -> &Symbol {
        &self.symbols[symbol]
    }

    pub fn symbol_name(&self, symbol: SymbolId) -> &str {
        &self.symbols[symbol].name
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|function| function.name == name)
    }
}
