use log::trace;

use crate::{
    ast::{
        ast::{Decl, DeclList, FunctionDef, NodeId},
        expressions::{ArrayAccess, Call, Expr, OpExpr, Operation, VarAccess},
        statements::{Location, StatementList, Stmt},
        types::{Type, TypeError, Typing},
    },
    errors::errors::{Error, ErrorImpl, PipelineError},
    symbols::resolver::Resolutions,
    Position,
};

use super::typed_ast::{TypeTable, TypedProgram};

/// What the checker knows about the function it is inside of.
#[derive(Debug, Clone)]
pub struct FunctionContext {
    pub name: String,
    pub return_type: Type,
    pub in_loop: bool,
}

impl FunctionContext {
    fn for_loop_body(&self) -> Self {
        FunctionContext {
            in_loop: true,
            ..self.clone()
        }
    }
}

/// Annotates every node with a typing and collects type errors.
///
/// Operations whose operands already failed are marked
/// [`TypeError::Poisoned`] and not reported again, so one mistake produces
/// one diagnostic.
#[derive(Debug, Default)]
pub struct TypeChecker {
    pub types: TypeTable,
    pub errors: Vec<Error>,
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker {
            types: TypeTable::default(),
            errors: vec![],
        }
    }

    /// Checks the whole program.
    ///
    /// Diagnostics from name resolution are carried over in front of the
    /// type errors; the program is rejected if there is any diagnostic at all.
    pub fn check<'a>(
        mut self,
        ast: &'a DeclList,
        resolutions: Resolutions,
    ) -> Result<TypedProgram<'a>, PipelineError> {
        for decl in ast.iter() {
            self.check_decl(decl, &resolutions);
        }

        let Resolutions {
            symbols,
            bindings,
            mut errors,
        } = resolutions;
        errors.append(&mut self.errors);

        if !errors.is_empty() {
            return Err(PipelineError::Rejected(errors));
        }

        Ok(TypedProgram {
            ast,
            symbols,
            bindings,
            types: self.types,
        })
    }

    fn report(&mut self, node: NodeId, position: Position, message: String) {
        trace!("Type error at {}: {}", position, message);
        self.errors.push(Error::new(
            ErrorImpl::TypeMismatch {
                message: message.clone(),
            },
            position,
        ));
        self.types.set(node, Err(TypeError::Mismatch(message)));
    }

    /// Records a typing, reporting it if it is a fresh mismatch.
    fn record(&mut self, node: NodeId, position: Position, typing: Typing) {
        match typing {
            Err(TypeError::Mismatch(message)) => self.report(node, position, message),
            typing => self.types.set(node, typing),
        }
    }

    fn set_node_type(&mut self, node: NodeId, position: Position, typing: Typing) -> Typing {
        self.record(node, position, typing.clone());
        typing
    }

    /// Scalar variables must be `int` or `bool`, arrays must have such elements.
    fn check_declared_type(
        &mut self,
        node: NodeId,
        position: Position,
        name: &str,
        ty: &Type,
        array: bool,
    ) {
        let element = match ty {
            Type::Array { base, .. } if array => base.as_ref(),
            other => other,
        };

        if element.is_scalar() {
            self.types.set(node, Ok(ty.clone()));
        } else {
            self.report(
                node,
                position,
                format!("{} has type {}, expected int or bool.", name, ty),
            );
        }
    }

    fn check_decl(&mut self, decl: &Decl, resolutions: &Resolutions) {
        match decl {
            Decl::Var(var) => {
                self.check_declared_type(var.id, var.position, &var.name, &var.ty, false)
            }
            Decl::Array(array) => {
                if let Type::Array { extent, .. } = array.ty {
                    if extent <= 0 {
                        self.report(
                            array.id,
                            array.position,
                            format!("{} must have a positive extent, not {}.", array.name, extent),
                        );
                        return;
                    }

                    self.check_declared_type(
                        array.id,
                        array.position,
                        &array.name,
                        &array.ty,
                        true,
                    );
                } else {
                    self.report(
                        array.id,
                        array.position,
                        format!("{} is declared as an array of {}.", array.name, array.ty),
                    );
                }
            }
            Decl::Function(function) => self.check_function(function, resolutions),
        }
    }

    fn check_function(&mut self, function: &FunctionDef, resolutions: &Resolutions) {
        let signature = function.signature();
        let context = FunctionContext {
            name: function.name.clone(),
            return_type: function.return_type.clone(),
            in_loop: false,
        };

        if function.name == "main" {
            if function.return_type != Type::Void {
                self.report(
                    function.id,
                    function.position,
                    format!("main must return void, not {}.", function.return_type),
                );
            }
            if !function.parameters.is_empty() {
                self.report(
                    function.id,
                    function.position,
                    format!(
                        "main must not take parameters, found {}.",
                        function.parameters.len()
                    ),
                );
            }
        }

        for param in function.parameters.iter() {
            if param.ty.is_scalar() {
                self.types.set(param.id, Ok(param.ty.clone()));
            } else {
                self.report(
                    param.id,
                    param.position,
                    format!(
                        "Parameter {} of {} has type {}, expected int or bool.",
                        param.name, function.name, param.ty
                    ),
                );
            }
        }

        let returns = self.check_statements(&function.body, &context, resolutions);

        if function.return_type != Type::Void && !returns {
            self.report(
                function.id,
                function.position,
                format!("{} does not return on every path.", function.name),
            );
        }

        if self.types.get(function.id).is_none() {
            self.types.set(function.id, Ok(signature));
        }
    }

    /// Checks a block and returns whether every path through it returns.
    fn check_statements(
        &mut self,
        block: &StatementList,
        context: &FunctionContext,
        resolutions: &Resolutions,
    ) -> bool {
        let mut returns = false;
        for stmt in block.iter() {
            if returns {
                self.report(
                    stmt.id(),
                    stmt.position(),
                    String::from("Unreachable statement after return."),
                );
                break;
            }
            returns = self.check_stmt(stmt, context, resolutions);
        }

        self.types.set(block.id, Ok(Type::Void));
        returns
    }

    fn check_condition(&mut self, node: NodeId, position: Position, what: &str, condition: Typing) {
        match condition {
            Ok(Type::Bool) => self.types.set(node, Ok(Type::Void)),
            Ok(other) => self.report(
                node,
                position,
                format!("Condition of {} must be bool, not {}.", what, other),
            ),
            Err(_) => self.types.set(node, Err(TypeError::Poisoned)),
        }
    }

    fn check_stmt(
        &mut self,
        stmt: &Stmt,
        context: &FunctionContext,
        resolutions: &Resolutions,
    ) -> bool {
        match stmt {
            Stmt::VarDecl(var) => {
                self.check_declared_type(var.id, var.position, &var.name, &var.ty, false);
                false
            }
            Stmt::Assignment(assignment) => {
                let location = match &assignment.location {
                    Location::Var(access) => self.check_var_access(access, resolutions),
                    Location::Array(access) => self.check_array_access(access, resolutions),
                };
                let value = self.check_expr(&assignment.value, resolutions);

                let typing = match (location, value) {
                    (Ok(location), Ok(value)) => location.assign(&value),
                    _ => Err(TypeError::Poisoned),
                };
                self.record(assignment.id, assignment.position, typing);
                false
            }
            Stmt::Call(call) => {
                let _typing = self.check_call(call, resolutions);
                false
            }
            Stmt::IfElse(branch) => {
                let condition = self.check_expr(&branch.condition, resolutions);
                self.check_condition(branch.id, branch.position, "if", condition);

                let then_returns = self.check_statements(&branch.then_block, context, resolutions);
                let else_returns = match &branch.else_block {
                    Some(else_block) => self.check_statements(else_block, context, resolutions),
                    None => false,
                };
                then_returns && else_returns
            }
            Stmt::While(loop_) => {
                let condition = self.check_expr(&loop_.condition, resolutions);
                self.check_condition(loop_.id, loop_.position, "while", condition);

                // The body may run zero times, so its returns never count
                self.check_statements(&loop_.body, &context.for_loop_body(), resolutions);
                false
            }
            Stmt::Break(brk) => {
                self.check_in_loop(brk.id, brk.position, "break", context);
                false
            }
            Stmt::Continue(cont) => {
                self.check_in_loop(cont.id, cont.position, "continue", context);
                false
            }
            Stmt::Return(ret) => {
                let typing = match &ret.value {
                    Some(value) => match self.check_expr(value, resolutions) {
                        Ok(value) => context.return_type.assign(&value).map(|_| Type::Void),
                        Err(_) => Err(TypeError::Poisoned),
                    },
                    None if context.return_type == Type::Void => Ok(Type::Void),
                    None => Err(TypeError::mismatch(format!(
                        "{} must return a value of type {}.",
                        context.name, context.return_type
                    ))),
                };
                self.record(ret.id, ret.position, typing);
                true
            }
        }
    }

    fn check_in_loop(&mut self, node: NodeId, position: Position, what: &str, context: &FunctionContext) {
        if context.in_loop {
            self.types.set(node, Ok(Type::Void));
        } else {
            self.report(node, position, format!("{} outside of a loop.", what));
        }
    }

    fn symbol_type(&self, node: NodeId, resolutions: &Resolutions) -> Typing {
        match resolutions.symbol_of(node) {
            Some(symbol) => resolutions
                .get(symbol)
                .ty
                .clone()
                .map_err(|_| TypeError::Poisoned),
            None => Err(TypeError::Poisoned),
        }
    }

    fn check_var_access(&mut self, access: &VarAccess, resolutions: &Resolutions) -> Typing {
        let typing = match self.symbol_type(access.id, resolutions) {
            // Arrays have no scalar value of their own
            Ok(ty @ Type::Array { .. }) => Err(TypeError::mismatch(format!(
                "{} has type {} and must be indexed.",
                access.name, ty
            ))),
            typing => typing,
        };
        self.set_node_type(access.id, access.position, typing)
    }

    fn check_array_access(&mut self, access: &ArrayAccess, resolutions: &Resolutions) -> Typing {
        let index = self.check_expr(&access.index, resolutions);
        let base = self.symbol_type(access.id, resolutions);

        let typing = match (base, index) {
            (Ok(base), Ok(index)) => base.index(&index),
            _ => Err(TypeError::Poisoned),
        };
        self.set_node_type(access.id, access.position, typing)
    }

    fn check_call(&mut self, call: &Call, resolutions: &Resolutions) -> Typing {
        let arguments: Vec<Typing> = call
            .arguments
            .iter()
            .map(|argument| self.check_expr(argument, resolutions))
            .collect();
        let callee = self.symbol_type(call.id, resolutions);

        let typing = match (callee, arguments.into_iter().collect::<Result<Vec<Type>, _>>()) {
            (Ok(callee), Ok(arguments)) => callee.call(&Type::TypeList(arguments)),
            _ => Err(TypeError::Poisoned),
        };
        self.set_node_type(call.id, call.position, typing)
    }

    fn check_op(&mut self, op: &OpExpr, resolutions: &Resolutions) -> Typing {
        let left = self.check_expr(&op.left, resolutions);
        let right = op
            .right
            .as_ref()
            .map(|right| self.check_expr(right, resolutions));

        let typing = match (op.op, left, right) {
            (Operation::LogicNot, Ok(left), None) => left.not(),
            (Operation::LogicNot, Ok(_), Some(_)) | (_, Ok(_), None) => Err(TypeError::mismatch(
                format!("Wrong operation: {}", op.op),
            )),
            (_, Ok(left), Some(Ok(right))) => left.binary(op.op, &right),
            _ => Err(TypeError::Poisoned),
        };
        self.set_node_type(op.id, op.position, typing)
    }

    pub fn check_expr(&mut self, expr: &Expr, resolutions: &Resolutions) -> Typing {
        match expr {
            Expr::LiteralInt(literal) => {
                self.set_node_type(literal.id, literal.position, Ok(Type::Int))
            }
            Expr::LiteralBool(literal) => {
                self.set_node_type(literal.id, literal.position, Ok(Type::Bool))
            }
            Expr::VarAccess(access) => self.check_var_access(access, resolutions),
            Expr::ArrayAccess(access) => self.check_array_access(access, resolutions),
            Expr::Call(call) => self.check_call(call, resolutions),
            Expr::Op(op) => self.check_op(op, resolutions),
        }
    }
}
