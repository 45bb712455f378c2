use std::collections::HashMap;
use std::io::Write;
use std::mem;

use crate::error::ResolveError;
use crate::expr::Expr;
use crate::interpreter::Interpreter;
use crate::stmt::{FunctionData, Stmt};
use crate::token::Token;

type ResolveResult = Result<(), ResolveError>;

#[derive(Clone, Copy)]
enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

#[derive(Clone, Copy)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// The static resolution pass. Walks the AST between parsing and
/// evaluation, binds every variable use to a scope distance in the
/// interpreter's side-table and enforces the lexical rules the parser
/// cannot. It never evaluates anything.
pub struct Resolver<'a, W: Write> {
    interpreter: &'a mut Interpreter<W>,
    scopes: Vec<HashMap<String, bool>>,
    current_function: FunctionType,
    current_class: ClassType,
}

impl<'a, W: Write> Resolver<'a, W> {
    pub fn new(interpreter: &'a mut Interpreter<W>) -> Self {
        Resolver {
            interpreter,
            scopes: vec![],
            current_function: FunctionType::None,
            current_class: ClassType::None,
        }
    }

    /// Resolves the statements, stopping at the first offense.
    pub fn resolve(&mut self, statements: &[Stmt]) -> ResolveResult {
        for statement in statements {
            self.resolve_stmt(statement)?;
        }

        Ok(())
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Marks the name as declared but not yet usable in the innermost
    /// scope. Global declarations are not tracked.
    fn declare(&mut self, name: &Token) -> ResolveResult {
        let Some(scope) = self.scopes.last_mut() else {
            return Ok(());
        };

        if scope.contains_key(&name.lexeme) {
            return Err(ResolveError {
                token: name.clone(),
                message: "Already a variable with this name in this scope.".to_string(),
            });
        }

        scope.insert(name.lexeme.to_owned(), false);
        Ok(())
    }

    /// Marks the name as usable in the innermost scope.
    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.to_owned(), true);
        }
    }

    /// Walks the scopes from the innermost outward and records how many
    /// hops away the name is declared. No match means the name lives in
    /// the global environment and no entry is recorded.
    fn resolve_local(&mut self, id: usize, name: &Token) {
        for (i, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.interpreter.resolve(id, i);
                return;
            }
        }
    }

    fn resolve_function(&mut self, function: &FunctionData, r#type: FunctionType) -> ResolveResult {
        let enclosing_function = mem::replace(&mut self.current_function, r#type);

        self.begin_scope();
        let result = function.params.iter()
            .try_for_each(|param| {
                self.declare(param)?;
                self.define(param);
                Ok(())
            })
            .and_then(|()| self.resolve(&function.body));
        self.end_scope();

        self.current_function = enclosing_function;
        result
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) -> ResolveResult {
        match stmt {
            Stmt::Block(block) => {
                self.begin_scope();
                let result = self.resolve(&block.statements);
                self.end_scope();

                result
            },
            Stmt::Var(var) => {
                self.declare(&var.name)?;
                if let Some(initializer) = &var.initializer {
                    self.resolve_expr(initializer)?;
                }
                self.define(&var.name);

                Ok(())
            },
            Stmt::Function(function) => {
                self.declare(&function.name)?;
                self.define(&function.name);

                self.resolve_function(function, FunctionType::Function)
            },
            Stmt::Expression(expression) => self.resolve_expr(&expression.expr),
            Stmt::If(if_stmt) => {
                self.resolve_expr(&if_stmt.condition)?;
                self.resolve_stmt(&if_stmt.then_branch)?;
                if let Some(else_branch) = &if_stmt.else_branch {
                    self.resolve_stmt(else_branch)?;
                }

                Ok(())
            },
            Stmt::Print(print) => self.resolve_expr(&print.expr),
            Stmt::Return(return_stmt) => {
                if let FunctionType::None = self.current_function {
                    return Err(ResolveError {
                        token: return_stmt.keyword.clone(),
                        message: "Can't return from top-level code.".to_string(),
                    });
                }

                if let Some(value) = &return_stmt.value {
                    if let FunctionType::Initializer = self.current_function {
                        return Err(ResolveError {
                            token: return_stmt.keyword.clone(),
                            message: "Can't return a value from an initializer.".to_string(),
                        });
                    }

                    self.resolve_expr(value)?;
                }

                Ok(())
            },
            Stmt::While(while_stmt) => {
                self.resolve_expr(&while_stmt.condition)?;
                self.resolve_stmt(&while_stmt.body)
            },
            Stmt::Class(class_stmt) => {
                let enclosing_class = mem::replace(&mut self.current_class, ClassType::Class);

                self.declare(&class_stmt.name)?;
                self.define(&class_stmt.name);

                if let Some(superclass) = &class_stmt.superclass {
                    let Expr::Variable(variable) = superclass else { unreachable!() };

                    if class_stmt.name.lexeme == variable.name.lexeme {
                        return Err(ResolveError {
                            token: variable.name.clone(),
                            message: "A class can't inherit from itself.".to_string(),
                        });
                    }

                    self.current_class = ClassType::Subclass;

                    self.resolve_expr(superclass)?;

                    self.begin_scope();
                    self.scopes
                        .last_mut()
                        .expect("stack to be not empty")
                        .insert("super".to_string(), true);
                }

                self.begin_scope();
                self.scopes
                    .last_mut()
                    .expect("stack to be not empty")
                    .insert("this".to_string(), true);

                let mut result = Ok(());
                for method in &class_stmt.methods {
                    let declaration = if method.name.lexeme.eq("init") {
                        FunctionType::Initializer
                    } else {
                        FunctionType::Method
                    };

                    result = self.resolve_function(method, declaration);
                    if result.is_err() {
                        break;
                    }
                }

                self.end_scope();

                if class_stmt.superclass.is_some() {
                    self.end_scope();
                }

                self.current_class = enclosing_class;
                result
            },
        }
    }

    fn resolve_expr(&mut self, expr: &Expr) -> ResolveResult {
        match expr {
            Expr::Literal(_) => Ok(()),
            Expr::Grouping(grouping) => self.resolve_expr(&grouping.expr),
            Expr::Unary(unary) => self.resolve_expr(&unary.expr),
            Expr::Binary(binary) => {
                self.resolve_expr(&binary.left)?;
                self.resolve_expr(&binary.right)
            },
            Expr::Logical(logical) => {
                self.resolve_expr(&logical.left)?;
                self.resolve_expr(&logical.right)
            },
            Expr::Variable(variable) => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(&variable.name.lexeme) == Some(&false) {
                        return Err(ResolveError {
                            token: variable.name.to_owned(),
                            message: "Can't read local variable in its own initializer.".to_string(),
                        });
                    }
                }

                self.resolve_local(variable.id, &variable.name);
                Ok(())
            },
            Expr::Assign(assign) => {
                self.resolve_expr(&assign.value)?;
                self.resolve_local(assign.id, &assign.name);
                Ok(())
            },
            Expr::Call(call) => {
                self.resolve_expr(&call.callee)?;

                for argument in &call.arguments {
                    self.resolve_expr(argument)?;
                }

                Ok(())
            },
            Expr::Get(get) => self.resolve_expr(&get.object),
            Expr::Set(set) => {
                self.resolve_expr(&set.value)?;
                self.resolve_expr(&set.object)
            },
            Expr::This(this) => {
                if let ClassType::None = self.current_class {
                    return Err(ResolveError {
                        token: this.keyword.clone(),
                        message: "Can't use 'this' outside of a class.".to_string(),
                    });
                }

                self.resolve_local(this.id, &this.keyword);
                Ok(())
            },
            Expr::Super(super_expr) => {
                match self.current_class {
                    ClassType::Subclass => (),
                    ClassType::None => {
                        return Err(ResolveError {
                            token: super_expr.keyword.clone(),
                            message: "Can't use 'super' outside of a class.".to_string(),
                        });
                    },
                    ClassType::Class => {
                        return Err(ResolveError {
                            token: super_expr.keyword.clone(),
                            message: "Can't use 'super' in a class with no superclass.".to_string(),
                        });
                    },
                }

                self.resolve_local(super_expr.id, &super_expr.keyword);
                Ok(())
            },
        }
    }
}
