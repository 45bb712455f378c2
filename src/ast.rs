use crate::expr::Expr;
use crate::stmt::Stmt;

/// Returns a string representation of the expression in paranthesize.
macro_rules! parenthesize {
    ( $self:ident, $name:expr, $( $x:expr ),+ ) => {
        {
            let mut string = String::new();
            string += "(";
            string += $name;
            $(
                string += " ";
                string += &$self.print(&$x);
            )*
            string += ")";

            string
        }
    };
}

/// Renders the AST in a parenthesized debug form. Backs the parser's
/// structural tests, not a user surface.
pub struct ASTPrinter;

impl ASTPrinter {
    /// Prints the expression.
    pub fn print(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(literal) => literal.to_string(),
            Expr::Grouping(grouping) => parenthesize!(self, "group", grouping.expr),
            Expr::Unary(unary) => parenthesize!(self, &unary.operator.lexeme, unary.expr),
            Expr::Binary(binary) => {
                parenthesize!(self, &binary.operator.lexeme, binary.left, binary.right)
            },
            Expr::Logical(logical) => {
                parenthesize!(self, &logical.operator.lexeme, logical.left, logical.right)
            },
            Expr::Variable(variable) => variable.name.lexeme.clone(),
            Expr::Assign(assign) => {
                parenthesize!(self, format!("= {}", assign.name.lexeme).as_str(), assign.value)
            },
            Expr::Call(call) => {
                let mut string = String::new();
                string += &self.print(&call.callee);
                string += "(";
                for argument in &call.arguments {
                    string += &self.print(argument);
                    string += " ";
                }
                string = string.trim_end().to_string();
                string += ")";
                string
            },
            Expr::Get(get) => {
                format!("(. {} {})", self.print(&get.object), get.name.lexeme)
            },
            Expr::Set(set) => {
                format!(
                    "(set {} {} {})",
                    self.print(&set.object),
                    set.name.lexeme,
                    self.print(&set.value),
                )
            },
            Expr::This(_) => "this".to_string(),
            Expr::Super(super_expr) => format!("(super {})", super_expr.method.lexeme),
        }
    }

    /// Prints the statement.
    pub fn print_stmt(&mut self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression(data) => parenthesize!(self, "expr", data.expr),
            Stmt::Print(data) => parenthesize!(self, "print", data.expr),
            Stmt::Var(data) => {
                let mut string = String::new();
                string += "(var ";
                string += &data.name.lexeme;
                if let Some(initializer) = &data.initializer {
                    string += " = ";
                    string += &self.print(initializer);
                }
                string += ")";

                string
            },
            Stmt::Block(data) => {
                let mut string = String::new();
                string += "{";
                for statement in &data.statements {
                    string += " ";
                    string += &self.print_stmt(statement);
                }
                string += " }";

                string
            },
            Stmt::If(data) => {
                let mut string = String::new();
                string += "(if ";
                string += &self.print(&data.condition);
                string += " ";
                string += &self.print_stmt(&data.then_branch);
                if let Some(else_branch) = &data.else_branch {
                    string += " else ";
                    string += &self.print_stmt(else_branch);
                }
                string += ")";

                string
            },
            Stmt::While(data) => {
                format!(
                    "(while {} {})",
                    self.print(&data.condition),
                    self.print_stmt(&data.body),
                )
            },
            Stmt::Function(data) => {
                let mut string = String::new();
                string += "(fun ";
                string += &data.name.lexeme;
                string += "(";
                for param in &data.params {
                    string += &param.lexeme;
                    string += " ";
                }
                string = string.trim_end().to_string();
                string += ") { ";
                string += &data.body.iter()
                    .map(|statement| self.print_stmt(statement))
                    .collect::<Vec<String>>()
                    .join(" ");
                string += " })";

                string
            },
            Stmt::Return(data) => {
                match &data.value {
                    Some(value) => parenthesize!(self, "return", value),
                    None => "(return)".to_string(),
                }
            },
            Stmt::Class(data) => {
                let mut string = String::new();
                string += "(class ";
                string += &data.name.lexeme;
                if let Some(Expr::Variable(superclass)) = &data.superclass {
                    string += " < ";
                    string += &superclass.name.lexeme;
                }
                string += " { ";
                string += &data.methods.iter()
                    .map(|method| self.print_stmt(&Stmt::Function(method.clone())))
                    .collect::<Vec<String>>()
                    .join(" ");
                string += " })";

                string
            },
        }
    }
}
