use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::object::Object;
use crate::token::Token;

/// A scope: a name to value mapping plus an optional enclosing
/// environment. Environments chain by reference toward the globals, so
/// the same environment can underlie a closure and a live frame at once.
#[derive(Debug, Clone)]
pub struct Environment {
    pub enclosing: Option<Rc<RefCell<Environment>>>,
    pub variables: HashMap<String, Object>,
}

impl Environment {
    pub fn new(enclosing: Option<Rc<RefCell<Environment>>>) -> Self {
        Environment {
            enclosing,
            variables: HashMap::new(),
        }
    }

    /// Binds a name in this scope. Redefinition is allowed.
    pub fn define(&mut self, name: &str, value: Object) {
        self.variables.insert(name.to_string(), value);
    }

    /// Walks `distance` enclosing links. Walking off the chain is a
    /// resolution bug, not a user error.
    fn ancestor(&self, distance: usize) -> Rc<RefCell<Environment>> {
        let mut environment = self.enclosing.clone()
            .unwrap_or_else(|| panic!("enclosing environment to exist at depth 1"));

        for i in 2..=distance {
            let parent = environment.borrow().enclosing.clone()
                .unwrap_or_else(|| panic!("enclosing environment to exist at depth {i}"));
            environment = parent;
        }

        environment
    }

    /// Assigns to an existing name in this scope or an enclosing one.
    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if self.variables.contains_key(&name.lexeme) {
            self.variables.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    /// Assigns directly to the scope `distance` links out.
    pub fn assign_at(&mut self, distance: usize, name: &Token, value: Object) {
        if distance > 0 {
            self.ancestor(distance).borrow_mut().variables.insert(name.lexeme.clone(), value);
        } else {
            self.variables.insert(name.lexeme.clone(), value);
        }
    }

    /// Looks a name up in this scope or an enclosing one.
    pub fn get(&self, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(variable) = self.variables.get(&name.lexeme) {
            return Ok(variable.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    /// Reads a name directly from the scope `distance` links out. The
    /// resolver guarantees the name is there.
    pub fn get_at(&self, distance: usize, name: &str) -> Object {
        if distance > 0 {
            self.ancestor(distance).borrow().variables.get(name).cloned()
                .unwrap_or_else(|| panic!("variable '{name}' to be defined at depth {distance}"))
        } else {
            self.variables.get(name).cloned()
                .unwrap_or_else(|| panic!("variable '{name}' to be defined in this scope"))
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::literal::Literal;

    #[test]
    fn define_and_get() {
        let mut environment = Environment::default();
        environment.define("a", Object::from(1.0));

        assert_eq!(environment.get(&Token::from("a")).unwrap(), Object::from(1.0));
    }

    #[test]
    fn redefinition_is_allowed() {
        let mut environment = Environment::default();
        environment.define("a", Object::from(1.0));
        environment.define("a", Object::from("again"));

        assert_eq!(environment.get(&Token::from("a")).unwrap(), Object::from("again"));
    }

    #[test]
    fn get_delegates_to_enclosing() {
        let globals = Rc::new(RefCell::new(Environment::default()));
        globals.borrow_mut().define("a", Object::from(1.0));

        let local = Environment::new(Some(Rc::clone(&globals)));
        assert_eq!(local.get(&Token::from("a")).unwrap(), Object::from(1.0));
    }

    #[test]
    fn assign_requires_existing_name() {
        let mut environment = Environment::default();
        let error = environment.assign(&Token::from("ghost"), Object::from(Literal::Nil)).unwrap_err();

        assert_eq!(error.message, "Undefined variable 'ghost'.");
    }

    #[test]
    fn assign_writes_through_the_chain() {
        let globals = Rc::new(RefCell::new(Environment::default()));
        globals.borrow_mut().define("a", Object::from(1.0));

        let mut local = Environment::new(Some(Rc::clone(&globals)));
        local.assign(&Token::from("a"), Object::from(2.0)).unwrap();

        assert_eq!(globals.borrow().get(&Token::from("a")).unwrap(), Object::from(2.0));
    }

    #[test]
    fn depth_addressed_access() {
        let globals = Rc::new(RefCell::new(Environment::default()));
        globals.borrow_mut().define("a", Object::from(1.0));

        let middle = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&globals)))));
        let mut inner = Environment::new(Some(Rc::clone(&middle)));
        inner.define("a", Object::from(3.0));

        assert_eq!(inner.get_at(0, "a"), Object::from(3.0));
        assert_eq!(inner.get_at(2, "a"), Object::from(1.0));

        inner.assign_at(2, &Token::from("a"), Object::from(10.0));
        assert_eq!(globals.borrow().get_at(0, "a"), Object::from(10.0));
    }
}
