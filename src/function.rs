use std::cell::RefCell;
use std::fmt::{Debug, Display};
use std::io::Write;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::environment::Environment;
use crate::error::{Interrupt, RuntimeError};
use crate::interpreter::Interpreter;
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::FunctionData;

/// A function value: the declaration it was built from, the environment
/// that was active when the declaration executed, and whether it is a
/// class initializer.
#[derive(Debug, Clone)]
pub struct Function {
    pub declaration: Rc<FunctionData>,
    pub closure: Rc<RefCell<Environment>>,
    pub is_initializer: bool,
}

impl Function {
    pub fn new(
        declaration: Rc<FunctionData>,
        closure: Rc<RefCell<Environment>>,
        is_initializer: bool,
    ) -> Self {
        Function { declaration, closure, is_initializer }
    }

    /// Returns a copy of this function whose closure is a fresh scope
    /// binding `this` to the given instance.
    pub fn bind(&self, instance: Object) -> Function {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));
        environment.define("this", instance);

        Function {
            declaration: Rc::clone(&self.declaration),
            closure: Rc::new(RefCell::new(environment)),
            is_initializer: self.is_initializer,
        }
    }
}

impl Callable for Function {
    fn call<W: Write>(
        &self,
        interpreter: &mut Interpreter<W>,
        arguments: Vec<Object>,
    ) -> Result<Object, RuntimeError> {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));

        for (param, argument) in self.declaration.params.iter().zip(arguments) {
            environment.define(&param.lexeme, argument);
        }

        match interpreter.execute_block(&self.declaration.body, Rc::new(RefCell::new(environment))) {
            Ok(()) => (),
            Err(Interrupt::Return(value)) => {
                if !self.is_initializer {
                    return Ok(value);
                }
            },
            Err(Interrupt::Error(error)) => return Err(error),
        }

        // An initializer yields the bound instance no matter how the
        // body exited.
        if self.is_initializer {
            return Ok(self.closure.borrow().get_at(0, "this"));
        }

        Ok(Object::from(Literal::Nil))
    }

    fn arity(&self) -> usize {
        self.declaration.params.len()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.declaration, &other.declaration)
            && Rc::ptr_eq(&self.closure, &other.closure)
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<fn {}>", self.declaration.name.lexeme)
    }
}

#[derive(Clone)]
pub struct NativeFunction {
    pub name: String,
    pub arity: usize,
    pub function: fn(Vec<Object>) -> Result<Object, RuntimeError>,
}

impl NativeFunction {
    /// The native functions predefined in the global scope. `clock` is
    /// the only one.
    pub fn get_globals() -> Vec<NativeFunction> {
        vec![
            NativeFunction {
                name: "clock".to_owned(),
                arity: 0,
                function: |_| {
                    let now = SystemTime::now()
                        .duration_since(UNIX_EPOCH)
                        .expect("clock to be after the epoch");
                    Ok(Object::from(now.as_secs_f64()))
                },
            },
        ]
    }
}

impl Callable for NativeFunction {
    fn call<W: Write>(
        &self,
        _interpreter: &mut Interpreter<W>,
        arguments: Vec<Object>,
    ) -> Result<Object, RuntimeError> {
        (self.function)(arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<native fn>")
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}
