//! Type system definitions.
//!
//! Types are structural: two types are the same when their shapes match.
//! Each variant only supports the operators listed for it, every other
//! combination produces a [`TypeError::Mismatch`] describing the attempt:
//!
//! - `int`: arithmetic, comparison and assignment from `int`
//! - `bool`: `&&`, `||`, `!` and assignment from `bool`
//! - `array[n,T]`: indexing with an `int`, assignment from an array of `T`
//! - `func(args):ret`: calls with a matching argument list
//! - `void`: nothing at all

use std::fmt::Display;

use lazy_static::lazy_static;

use super::expressions::Operation;

/// Result of typing a node: the type, or why it has none.
pub type Typing = Result<Type, TypeError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// A fresh misuse, reported where it is found.
    Mismatch(String),
    /// Derived from something that has already been reported.
    Poisoned,
}

impl TypeError {
    pub fn mismatch(message: impl Into<String>) -> Self {
        TypeError::Mismatch(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Bool,
    Void,
    Array { base: Box<Type>, extent: i64 },
    Func { args: Vec<Type>, ret: Box<Type> },
    /// Ordered argument list, only used to carry call signatures.
    TypeList(Vec<Type>),
}

lazy_static! {
    /// Functions provided by the runtime, visible from every scope.
    pub static ref INTRINSICS: Vec<(&'static str, Type)> = vec![
        ("readInt", Type::func(vec![], Type::Int)),
        ("readChar", Type::func(vec![], Type::Int)),
        ("printBool", Type::func(vec![Type::Bool], Type::Void)),
        ("printInt", Type::func(vec![Type::Int], Type::Void)),
        ("printChar", Type::func(vec![Type::Int], Type::Void)),
        ("println", Type::func(vec![], Type::Void)),
    ];
}

impl Type {
    pub fn array(base: Type, extent: i64) -> Type {
        Type::Array {
            base: Box::new(base),
            extent,
        }
    }

    pub fn func(args: Vec<Type>, ret: Type) -> Type {
        Type::Func {
            args,
            ret: Box::new(ret),
        }
    }

    /// Whether values of this type fit in a single scalar slot.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Type::Int | Type::Bool)
    }

    pub fn equivalent(&self, that: &Type) -> bool {
        match (self, that) {
            (Type::Int, Type::Int) | (Type::Bool, Type::Bool) | (Type::Void, Type::Void) => true,
            // Extents are deliberately ignored
            (Type::Array { base, .. }, Type::Array { base: other, .. }) => base.equivalent(other),
            (
                Type::Func { args, ret },
                Type::Func {
                    args: other_args,
                    ret: other_ret,
                },
            ) => ret.equivalent(other_ret) && list_equivalent(args, other_args),
            (Type::TypeList(list), Type::TypeList(other)) => list_equivalent(list, other),
            _ => false,
        }
    }

    /// Dispatches a binary operator to the capability implementing it.
    pub fn binary(&self, op: Operation, that: &Type) -> Typing {
        match op {
            Operation::Add => self.add(that),
            Operation::Sub => self.sub(that),
            Operation::Mult => self.mul(that),
            Operation::Div => self.div(that),
            Operation::LogicAnd => self.and(that),
            Operation::LogicOr => self.or(that),
            Operation::Gt
            | Operation::Ge
            | Operation::Lt
            | Operation::Le
            | Operation::Eq
            | Operation::Ne => self.compare(that),
            Operation::LogicNot => Err(TypeError::mismatch(format!(
                "Wrong operation: {} takes one operand",
                op
            ))),
        }
    }

    pub fn add(&self, that: &Type) -> Typing {
        match self {
            Type::Int if self.equivalent(that) => Ok(Type::Int),
            _ => Err(TypeError::mismatch(format!("cannot add {} with {}", self, that))),
        }
    }

    pub fn sub(&self, that: &Type) -> Typing {
        match self {
            Type::Int if self.equivalent(that) => Ok(Type::Int),
            _ => Err(TypeError::mismatch(format!(
                "cannot subtract {} from {}",
                self, that
            ))),
        }
    }

    pub fn mul(&self, that: &Type) -> Typing {
        match self {
            Type::Int if self.equivalent(that) => Ok(Type::Int),
            _ => Err(TypeError::mismatch(format!(
                "cannot multiply {} with {}",
                self, that
            ))),
        }
    }

    pub fn div(&self, that: &Type) -> Typing {
        match self {
            Type::Int if self.equivalent(that) => Ok(Type::Int),
            _ => Err(TypeError::mismatch(format!("cannot divide {} by {}", self, that))),
        }
    }

    pub fn compare(&self, that: &Type) -> Typing {
        match self {
            Type::Int if self.equivalent(that) => Ok(Type::Bool),
            _ => Err(TypeError::mismatch(format!(
                "cannot compare {} with {}",
                self, that
            ))),
        }
    }

    pub fn and(&self, that: &Type) -> Typing {
        match self {
            Type::Bool if self.equivalent(that) => Ok(Type::Bool),
            _ => Err(TypeError::mismatch(format!(
                "cannot compute {} and {}",
                self, that
            ))),
        }
    }

    pub fn or(&self, that: &Type) -> Typing {
        match self {
            Type::Bool if self.equivalent(that) => Ok(Type::Bool),
            _ => Err(TypeError::mismatch(format!("cannot compute {} or {}", self, that))),
        }
    }

    pub fn not(&self) -> Typing {
        match self {
            Type::Bool => Ok(Type::Bool),
            _ => Err(TypeError::mismatch(format!("cannot negate {}", self))),
        }
    }

    pub fn index(&self, that: &Type) -> Typing {
        match (self, that) {
            (Type::Array { base, .. }, Type::Int) => Ok((**base).clone()),
            _ => Err(TypeError::mismatch(format!("cannot index {} with {}", self, that))),
        }
    }

    /// Type of storing `source` into a location of this type.
    pub fn assign(&self, source: &Type) -> Typing {
        match self {
            Type::Int | Type::Bool | Type::Array { .. } if self.equivalent(source) => {
                Ok(self.clone())
            }
            _ => Err(TypeError::mismatch(format!(
                "cannot assign {} to {}",
                source, self
            ))),
        }
    }

    /// Type of calling a value of this type with the given argument list.
    pub fn call(&self, actual: &Type) -> Typing {
        let Type::Func { args, ret } = self else {
            return Err(TypeError::mismatch(format!(
                "cannot call {} using {}",
                self, actual
            )));
        };
        let Type::TypeList(actual_args) = actual else {
            return Err(TypeError::mismatch(format!(
                "Arguments need to be a TypeList. Check {}",
                actual
            )));
        };

        if actual_args.len() != args.len() {
            return Err(TypeError::mismatch(format!(
                "Wrong number of arguments. Expected {} but got {}.",
                args.len(),
                actual_args.len()
            )));
        }

        for (expected, received) in args.iter().zip(actual_args) {
            if !expected.equivalent(received) {
                return Err(TypeError::mismatch(format!(
                    "Mismatch in Types of Argument. Expected {} but got {}",
                    expected, received
                )));
            }
        }

        Ok((**ret).clone())
    }
}

fn list_equivalent(list: &[Type], other: &[Type]) -> bool {
    list.len() == other.len() && list.iter().zip(other).all(|(a, b)| a.equivalent(b))
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Bool => write!(f, "bool"),
            Type::Void => write!(f, "void"),
            Type::Array { base, extent } => write!(f, "array[{},{}]", extent, base),
            Type::Func { args, ret } => {
                write!(f, "func({}):{}", Type::TypeList(args.clone()), ret)
            }
            Type::TypeList(list) => {
                let parts: Vec<String> = list.iter().map(|ty| ty.to_string()).collect();
                write!(f, "TypeList({})", parts.join(", "))
            }
        }
    }
}
