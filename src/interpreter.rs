use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::mem;
use std::rc::Rc;

use crate::class::Class;
use crate::environment::Environment;
use crate::error::{Interrupt, RuntimeError};
use crate::expr::Expr;
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::Stmt;
use crate::token::{Token, Type};

type EvalResult<T> = Result<T, Interrupt>;

/// The tree-walk evaluator. Owns the global scope, the current
/// environment pointer and the resolver's side-table. Program output
/// (the `print` statement) goes to the writer; diagnostics do not.
pub struct Interpreter<W: Write> {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<usize, usize>,
    out: W,
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));

        for native in NativeFunction::get_globals() {
            let name = native.name.clone();
            globals.borrow_mut().define(&name, Object::from(native));
        }

        Interpreter {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            out,
        }
    }

    /// Records the scope distance for a resolvable node. Called by the
    /// resolver; nodes without an entry resolve against the globals.
    pub fn resolve(&mut self, id: usize, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// Executes the statements in order, stopping at the first runtime
    /// fault.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for statement in statements {
            match self.execute(statement) {
                Ok(()) => (),
                Err(Interrupt::Error(error)) => return Err(error),
                Err(Interrupt::Return(_)) => {
                    unreachable!("return to be caught by the enclosing function call")
                },
            }
        }

        Ok(())
    }

    /// Runs the statements in the given environment and restores the
    /// previous one on every exit path, unwinds included.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> EvalResult<()> {
        let previous = mem::replace(&mut self.environment, environment);
        let result = statements.iter().try_for_each(|statement| self.execute(statement));
        self.environment = previous;

        result
    }

    fn execute(&mut self, stmt: &Stmt) -> EvalResult<()> {
        match stmt {
            Stmt::Expression(data) => {
                self.evaluate(&data.expr)?;
                Ok(())
            },
            Stmt::Print(data) => {
                let value = self.evaluate(&data.expr)?;
                writeln!(self.out, "{value}").expect("output stream to be writable");
                Ok(())
            },
            Stmt::Var(data) => {
                let value = match &data.initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Object::from(Literal::Nil),
                };

                self.environment.borrow_mut().define(&data.name.lexeme, value);
                Ok(())
            },
            Stmt::Block(data) => {
                let environment = Environment::new(Some(Rc::clone(&self.environment)));
                self.execute_block(&data.statements, Rc::new(RefCell::new(environment)))
            },
            Stmt::If(data) => {
                if self.evaluate(&data.condition)?.is_truthy() {
                    self.execute(&data.then_branch)
                } else if let Some(else_branch) = &data.else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            },
            Stmt::While(data) => {
                while self.evaluate(&data.condition)?.is_truthy() {
                    self.execute(&data.body)?;
                }

                Ok(())
            },
            Stmt::Function(data) => {
                let function = Function::new(
                    Rc::clone(data),
                    Rc::clone(&self.environment),
                    false,
                );

                self.environment.borrow_mut().define(&data.name.lexeme, Object::from(function));
                Ok(())
            },
            Stmt::Return(data) => {
                let value = match &data.value {
                    Some(value) => self.evaluate(value)?,
                    None => Object::from(Literal::Nil),
                };

                Err(Interrupt::Return(value))
            },
            Stmt::Class(data) => self.class_declaration(data),
        }
    }

    fn class_declaration(&mut self, data: &crate::stmt::ClassData) -> EvalResult<()> {
        let superclass = match &data.superclass {
            Some(expr) => match self.evaluate(expr)? {
                Object::Class(class) => Some(class),
                _ => {
                    let Expr::Variable(variable) = expr else { unreachable!() };

                    return Err(RuntimeError {
                        token: variable.name.clone(),
                        message: "Superclass must be a class.".to_string(),
                    }.into());
                },
            },
            None => None,
        };

        // Defined before the methods are built so they can refer to the
        // class by name.
        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(Literal::Nil));

        if let Some(superclass) = &superclass {
            let mut environment = Environment::new(Some(Rc::clone(&self.environment)));
            environment.define("super", Object::from(Rc::clone(superclass)));
            self.environment = Rc::new(RefCell::new(environment));
        }

        let had_superclass = superclass.is_some();

        let mut methods = HashMap::new();
        for method in &data.methods {
            let function = Function::new(
                Rc::clone(method),
                Rc::clone(&self.environment),
                method.name.lexeme == "init",
            );
            methods.insert(method.name.lexeme.clone(), function);
        }

        let class = Rc::new(RefCell::new(Class::new(
            data.name.lexeme.clone(),
            superclass,
            methods,
        )));

        if had_superclass {
            let enclosing = self.environment.borrow().enclosing.clone()
                .expect("super scope to have an enclosing environment");
            self.environment = enclosing;
        }

        self.environment.borrow_mut().assign(&data.name, Object::from(class))?;
        Ok(())
    }

    fn evaluate(&mut self, expr: &Expr) -> EvalResult<Object> {
        match expr {
            Expr::Literal(literal) => Ok(Object::from(literal.clone())),
            Expr::Grouping(grouping) => self.evaluate(&grouping.expr),
            Expr::Unary(unary) => {
                let right = self.evaluate(&unary.expr)?;

                match unary.operator.r#type {
                    Type::Minus => Ok((-right).ok_or_else(|| RuntimeError {
                        token: unary.operator.clone(),
                        message: "Operand must be a number.".to_string(),
                    })?),
                    Type::Bang => Ok(Object::from(!right.is_truthy())),
                    _ => unreachable!(),
                }
            },
            Expr::Binary(binary) => {
                let left = self.evaluate(&binary.left)?;
                let right = self.evaluate(&binary.right)?;

                self.binary_operation(&binary.operator, left, right)
            },
            Expr::Logical(logical) => {
                let left = self.evaluate(&logical.left)?;

                // Short-circuit: the untouched operand value flows out,
                // not a coerced boolean.
                match logical.operator.r#type {
                    Type::Or if left.is_truthy() => Ok(left),
                    Type::And if !left.is_truthy() => Ok(left),
                    _ => self.evaluate(&logical.right),
                }
            },
            Expr::Variable(variable) => Ok(self.look_up_variable(&variable.name, variable.id)?),
            Expr::Assign(assign) => {
                let value = self.evaluate(&assign.value)?;

                match self.locals.get(&assign.id) {
                    Some(distance) => {
                        self.environment.borrow_mut()
                            .assign_at(*distance, &assign.name, value.clone());
                    },
                    None => {
                        self.globals.borrow_mut().assign(&assign.name, value.clone())?;
                    },
                }

                Ok(value)
            },
            Expr::Call(call) => {
                let callee = self.evaluate(&call.callee)?;

                let mut arguments = Vec::with_capacity(call.arguments.len());
                for argument in &call.arguments {
                    arguments.push(self.evaluate(argument)?);
                }

                let result = match &callee {
                    Object::Function(function) => {
                        self.check_arity(function.arity(), arguments.len(), &call.paren)?;
                        function.call(self, arguments)
                    },
                    Object::NativeFunction(function) => {
                        self.check_arity(function.arity(), arguments.len(), &call.paren)?;
                        function.call(self, arguments)
                    },
                    Object::Class(class) => {
                        self.check_arity(class.arity(), arguments.len(), &call.paren)?;
                        class.call(self, arguments)
                    },
                    _ => Err(RuntimeError {
                        token: call.paren.clone(),
                        message: "Can only call functions and classes.".to_string(),
                    }),
                };

                Ok(result?)
            },
            Expr::Get(get) => {
                let object = self.evaluate(&get.object)?;

                if let Object::Instance(instance) = &object {
                    Ok(instance.borrow().get(&get.name, &object)?)
                } else {
                    Err(RuntimeError {
                        token: get.name.clone(),
                        message: "Only instances have properties.".to_string(),
                    }.into())
                }
            },
            Expr::Set(set) => {
                let object = self.evaluate(&set.object)?;

                let Object::Instance(instance) = object else {
                    return Err(RuntimeError {
                        token: set.name.clone(),
                        message: "Only instances have fields.".to_string(),
                    }.into());
                };

                let value = self.evaluate(&set.value)?;
                instance.borrow_mut().set(&set.name, value.clone());

                Ok(value)
            },
            Expr::This(this) => Ok(self.look_up_variable(&this.keyword, this.id)?),
            Expr::Super(super_expr) => {
                let distance = *self.locals.get(&super_expr.id)
                    .expect("super to be bound by the resolver");

                let superclass = self.environment.borrow().get_at(distance, "super");
                let Object::Class(superclass) = superclass else { unreachable!() };

                // The instance lives one scope inside the one holding
                // the superclass.
                let object = self.environment.borrow().get_at(distance - 1, "this");

                let method = superclass.borrow().find_method(&super_expr.method.lexeme)
                    .ok_or_else(|| RuntimeError {
                        token: super_expr.method.clone(),
                        message: format!("Undefined property '{}'.", super_expr.method.lexeme),
                    })?;

                Ok(Object::from(method.bind(object)))
            },
        }
    }

    fn binary_operation(
        &mut self,
        operator: &Token,
        left: Object,
        right: Object,
    ) -> EvalResult<Object> {
        match operator.r#type {
            Type::Plus => Ok((left + right).ok_or_else(|| RuntimeError {
                token: operator.clone(),
                message: "Operands must be two numbers or two strings.".to_string(),
            })?),
            Type::Minus => {
                let (left, right) = number_operands(operator, left, right)?;
                Ok(Object::from(left - right))
            },
            Type::Star => {
                let (left, right) = number_operands(operator, left, right)?;
                Ok(Object::from(left * right))
            },
            Type::Slash => {
                let (left, right) = number_operands(operator, left, right)?;

                if right == 0.0 {
                    return Err(RuntimeError {
                        token: operator.clone(),
                        message: "Division by zero.".to_string(),
                    }.into());
                }

                Ok(Object::from(left / right))
            },
            Type::Greater => {
                let (left, right) = number_operands(operator, left, right)?;
                Ok(Object::from(left > right))
            },
            Type::GreaterEqual => {
                let (left, right) = number_operands(operator, left, right)?;
                Ok(Object::from(left >= right))
            },
            Type::Less => {
                let (left, right) = number_operands(operator, left, right)?;
                Ok(Object::from(left < right))
            },
            Type::LessEqual => {
                let (left, right) = number_operands(operator, left, right)?;
                Ok(Object::from(left <= right))
            },
            Type::EqualEqual => Ok(Object::from(left == right)),
            Type::BangEqual => Ok(Object::from(left != right)),
            _ => unreachable!(),
        }
    }

    fn check_arity(&self, arity: usize, got: usize, paren: &Token) -> Result<(), RuntimeError> {
        if arity != got {
            return Err(RuntimeError {
                token: paren.clone(),
                message: format!("Expected {arity} arguments but got {got}."),
            });
        }

        Ok(())
    }

    /// Reads a variable through the side-table distance, or from the
    /// globals when the resolver recorded nothing for it.
    fn look_up_variable(&self, name: &Token, id: usize) -> Result<Object, RuntimeError> {
        match self.locals.get(&id) {
            Some(distance) => Ok(self.environment.borrow().get_at(*distance, &name.lexeme)),
            None => self.globals.borrow().get(name),
        }
    }
}

/// Both operands must be numbers for every arithmetic and comparison
/// operator except `+`.
fn number_operands(
    operator: &Token,
    left: Object,
    right: Object,
) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Object::Literal(Literal::Number(left)), Object::Literal(Literal::Number(right))) => {
            Ok((left, right))
        },
        _ => Err(RuntimeError {
            token: operator.clone(),
            message: "Operands must be numbers.".to_string(),
        }),
    }
}
