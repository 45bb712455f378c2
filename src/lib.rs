//! A tree-walk interpreter for Lox, a small dynamically typed
//! object-oriented scripting language with lexical scoping, first-class
//! functions and classes with single inheritance.
//!
//! Source text goes through four stages. The [`scanner`] turns the raw
//! characters into tokens and stops at the first lexical offense, such
//! as an unterminated string, reporting it as a
//! [`ScanError`](error::ScanError). The [`parser`] is a hand-written
//! recursive descent parser that builds statements and expressions out
//! of the tokens; on a [`ParseError`](error::ParseError) it synchronizes
//! to the next likely statement boundary and keeps going, so one run can
//! surface several errors.
//!
//! The [`resolver`] is a static pass between parsing and evaluation. It
//! walks the tree without evaluating anything and records, for every
//! variable use, how many scopes out its declaration lives. That
//! side-table is what gives closures their fixed bindings: a function
//! body always sees the variables that were in scope when it was
//! declared, no matter what shadows them later. The pass also rejects
//! programs that are syntactically fine but semantically broken, like a
//! `return` at the top level or a class inheriting from itself, as a
//! [`ResolveError`](error::ResolveError).
//!
//! The [`interpreter`] walks the resolved tree and evaluates it. Values
//! are [`Object`](object::Object)s: literals, functions carrying their
//! closure, classes and instances. Scopes are chained
//! [`Environment`](environment::Environment)s shared by reference
//! between closures and live frames. Faults at this stage, like adding
//! a string to a number, surface as a
//! [`RuntimeError`](error::RuntimeError) and stop the program.
//!
//! [`Lox`] ties the stages together for a driver: it owns the
//! interpreter, runs whole files or an interactive prompt, tracks
//! whether anything failed and maps that onto the conventional exit
//! codes.

use std::fs;
use std::io::Write;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub mod error;
pub mod token;
pub mod literal;
pub mod scanner;
pub mod expr;
pub mod stmt;
pub mod ast;
pub mod parser;
pub mod environment;
pub mod object;
pub mod function;
pub mod class;
pub mod resolver;
pub mod interpreter;

use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// A driver session. Owns the interpreter and the error flags; program
/// output goes to the writer, diagnostics go to stderr.
pub struct Lox<W: Write> {
    interpreter: Interpreter<W>,
    next_node_id: usize,
    had_error: bool,
    had_runtime_error: bool,
}

impl<W: Write> Lox<W> {
    pub fn new(out: W) -> Self {
        Lox {
            interpreter: Interpreter::new(out),
            next_node_id: 0,
            had_error: false,
            had_runtime_error: false,
        }
    }

    /// Returns if a scan, parse or resolve error was reported.
    pub fn had_error(&self) -> bool {
        self.had_error
    }

    /// Returns if a runtime error was reported.
    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Runs a file and returns the exit code for the process: 65 for an
    /// error before evaluation, 70 for a runtime error, 0 otherwise.
    pub fn run_file(&mut self, path: &str) -> i32 {
        let contents = fs::read_to_string(path)
            .expect("Should have been able to read the file");

        self.run(&contents);

        if self.had_error {
            return 65;
        }
        if self.had_runtime_error {
            return 70;
        }

        0
    }

    /// Runs an interactive prompt until end of input. History persists
    /// in the user's home directory across sessions.
    pub fn run_prompt(&mut self) {
        let mut editor = DefaultEditor::new().expect("line editor to be available");

        let history = home::home_dir().map(|dir| dir.join(".lox_history"));
        if let Some(path) = &history {
            let _ = editor.load_history(path);
        }

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());

                    self.run(&line);

                    // A bad line should not poison the session.
                    self.had_error = false;
                    self.had_runtime_error = false;
                },
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(error) => {
                    eprintln!("{error}");
                    break;
                },
            }
        }

        if let Some(path) = &history {
            let _ = editor.save_history(path);
        }
    }

    /// Runs a program. Each stage only runs when every previous stage
    /// finished clean.
    pub fn run(&mut self, source: &str) {
        let tokens = match Scanner::new(source).scan_tokens() {
            Ok(tokens) => tokens,
            Err(error) => {
                eprintln!("{error}");
                self.had_error = true;
                return;
            },
        };

        // Node identities carry over between runs so a prompt session
        // never maps two nodes onto one side-table entry.
        let mut parser = Parser::with_first_id(tokens, self.next_node_id);
        let result = parser.parse();
        self.next_node_id = parser.next_node_id();

        let statements = match result {
            Ok(statements) => statements,
            Err(errors) => {
                for error in errors {
                    eprintln!("{error}");
                }
                self.had_error = true;
                return;
            },
        };

        if let Err(error) = Resolver::new(&mut self.interpreter).resolve(&statements) {
            eprintln!("{error}");
            self.had_error = true;
            return;
        }

        if let Err(error) = self.interpreter.interpret(&statements) {
            eprintln!("{error}");
            self.had_runtime_error = true;
        }
    }
}
