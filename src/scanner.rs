use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};
use substring::Substring;

use crate::error::ScanError;
use crate::literal::Literal;
use crate::token::{Token, Type};

type ScanResult<T> = Result<T, ScanError>;

pub struct Scanner<'a> {
    text: &'a str,
    source: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner.
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            text: source,
            source: source.chars().peekmore(),
            tokens: vec!(),
            start: 0,
            current: 0,
            line: 1,
        }
    }

    /// Scans the source and returns the tokens, terminated by an EOF
    /// token. Stops at the first offense.
    pub fn scan_tokens(&mut self) -> ScanResult<Vec<Token>> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }

        self.tokens.push(Token::new(Type::EOF, String::new(), None, self.line));

        Ok(self.tokens.clone())
    }

    /// Consumes and returns the next character.
    fn advance(&mut self) -> char {
        match self.source.next() {
            Some(char) => {
                self.current += 1;
                char
            },
            None => panic!("tried to advance past end of the file."),
        }
    }

    /// Returns the next character without consuming it.
    fn peek(&mut self) -> Option<&char> {
        self.source.peek()
    }

    /// Returns if the next character (after the one `peek` sees) is the
    /// expected character.
    fn match_next(&mut self, expected: char) -> bool {
        let matched = matches!(self.source.peek_next(), Some(char) if *char == expected);
        self.source.reset_cursor();
        matched
    }

    /// Returns if the character after the next one is an ASCII digit.
    fn next_is_digit(&mut self) -> bool {
        let digit = matches!(self.source.peek_next(), Some(char) if char.is_ascii_digit());
        self.source.reset_cursor();
        digit
    }

    /// Adds a new token whose lexeme is the source substring scanned so far.
    fn add_token(&mut self, r#type: Type, literal: Option<Literal>) {
        let lexeme = self.text.substring(self.start, self.current).to_string();
        self.tokens.push(Token::new(r#type, lexeme, literal, self.line));
    }

    /// Consumes one character and adds a single char token.
    fn add_single_char_token(&mut self, r#type: Type) {
        self.advance();
        self.add_token(r#type, None);
    }

    /// Consumes two characters and adds a double char token.
    fn add_double_char_token(&mut self, r#type: Type) {
        self.advance();
        self.advance();
        self.add_token(r#type, None);
    }

    /// Returns if the scanner has reached the end of the file.
    fn is_at_end(&mut self) -> bool {
        self.source.peek().is_none()
    }

    /// Handles a string literal. The literal value excludes the quotes,
    /// the lexeme keeps them.
    fn string(&mut self) -> ScanResult<()> {
        let opening_line = self.line;
        self.advance(); // Move past the opening double quote.

        while !self.is_at_end() {
            match self.source.next_if(|&c| c != '"') {
                Some(c) => {
                    self.current += 1;

                    if c == '\n' {
                        self.line += 1;
                    }
                },
                None => break,
            }
        }

        if self.is_at_end() {
            return Err(ScanError {
                line: opening_line,
                message: String::from("Unterminated string"),
            });
        }

        self.advance(); // Move past the closing double quote.

        // The token starts on the opening line no matter how many lines
        // the string spans.
        let lexeme = self.text.substring(self.start, self.current).to_string();
        let value = self.text.substring(self.start + 1, self.current - 1).to_string();
        self.tokens.push(Token::new(Type::String, lexeme, Some(Literal::String(value)), opening_line));

        Ok(())
    }

    /// Handles a number literal: digits with an optional fraction. A dot
    /// is only part of the number when a digit follows it, so `123.`
    /// scans as the number `123` and a `.` token.
    fn number(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }

        if matches!(self.peek(), Some(&'.')) && self.next_is_digit() {
            self.advance(); // Consume the dot.

            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }

        let value = self.text.substring(self.start, self.current);
        let number: f64 = value.parse().expect("scanned digits to parse as a number");

        self.add_token(Type::Number, Some(Literal::Number(number)));
    }

    /// Handles an identifier or a keyword.
    fn identifier(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || *c == '_') {
            self.advance();
        }

        let token_type = match self.text.substring(self.start, self.current) {
            "and"      => Type::And,
            "class"    => Type::Class,
            "else"     => Type::Else,
            "false"    => Type::False,
            "for"      => Type::For,
            "fun"      => Type::Fun,
            "if"       => Type::If,
            "nil"      => Type::Nil,
            "or"       => Type::Or,
            "print"    => Type::Print,
            "return"   => Type::Return,
            "super"    => Type::Super,
            "this"     => Type::This,
            "true"     => Type::True,
            "var"      => Type::Var,
            "while"    => Type::While,
            _          => Type::Identifier,
        };

        self.add_token(token_type, None);
    }

    /// Scans the next token.
    fn scan_token(&mut self) -> ScanResult<()> {
        let c = *self.peek().expect("scan_token to be called before the end of the file");
        match c {
            // One character tokens
            '(' => self.add_single_char_token(Type::LeftParen),
            ')' => self.add_single_char_token(Type::RightParen),
            '{' => self.add_single_char_token(Type::LeftBrace),
            '}' => self.add_single_char_token(Type::RightBrace),
            ',' => self.add_single_char_token(Type::Comma),
            '.' => self.add_single_char_token(Type::Dot),
            '-' => self.add_single_char_token(Type::Minus),
            '+' => self.add_single_char_token(Type::Plus),
            ';' => self.add_single_char_token(Type::Semicolon),
            '*' => self.add_single_char_token(Type::Star),

            // Two character tokens
            '!' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::BangEqual);
                } else {
                    self.add_single_char_token(Type::Bang)
                };
            },
            '=' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::EqualEqual);
                } else {
                    self.add_single_char_token(Type::Equal)
                };
            },
            '<' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::LessEqual);
                } else {
                    self.add_single_char_token(Type::Less)
                };
            },
            '>' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::GreaterEqual);
                } else {
                    self.add_single_char_token(Type::Greater)
                };
            },
            '/' => {
                if self.match_next('/') {
                    // A comment runs until the end of the line.
                    while matches!(self.peek(), Some(c) if *c != '\n') {
                        self.advance();
                    }
                } else {
                    self.add_single_char_token(Type::Slash);
                }
            },

            // Ignore whitespace
            ' ' | '\r' | '\t' => {
                self.advance();
            },

            // Update line counter
            '\n' => {
                self.advance();
                self.line += 1;
            },

            // String
            '"' => self.string()?,

            // Numbers
            c if c.is_ascii_digit() => self.number(),

            // Identifiers
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),

            _ => {
                self.advance();

                return Err(ScanError {
                    line: self.line,
                    message: format!("Unexpected character: {c}"),
                });
            },
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn scan(source: &str) -> Vec<Token> {
        Scanner::new(source).scan_tokens().expect("source to scan")
    }

    #[test]
    fn scan_punctuation_and_operators() {
        let tokens = scan("(){},.-+;*/ ! != = == < <= > >=");
        let types: Vec<Type> = tokens.iter().map(|t| t.r#type).collect();

        assert_eq!(types, vec![
            Type::LeftParen, Type::RightParen, Type::LeftBrace, Type::RightBrace,
            Type::Comma, Type::Dot, Type::Minus, Type::Plus, Type::Semicolon,
            Type::Star, Type::Slash, Type::Bang, Type::BangEqual, Type::Equal,
            Type::EqualEqual, Type::Less, Type::LessEqual, Type::Greater,
            Type::GreaterEqual, Type::EOF,
        ]);
    }

    #[test]
    fn lexemes_are_source_substrings() {
        let source = "var answer = 42;";
        let tokens = scan(source);

        for token in &tokens[..tokens.len() - 1] {
            assert!(source.contains(&token.lexeme), "missing lexeme {:?}", token.lexeme);
        }

        let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["var", "answer", "=", "42", ";", ""]);
    }

    #[test]
    fn scan_number_literals() {
        let tokens = scan("120 12.5");

        assert_eq!(tokens[0].literal, Some(Literal::Number(120.0)));
        assert_eq!(tokens[1].literal, Some(Literal::Number(12.5)));
    }

    #[test]
    fn trailing_dot_is_not_part_of_a_number() {
        let tokens = scan("123.");
        let types: Vec<Type> = tokens.iter().map(|t| t.r#type).collect();

        assert_eq!(types, vec![Type::Number, Type::Dot, Type::EOF]);
        assert_eq!(tokens[0].literal, Some(Literal::Number(123.0)));
    }

    #[test]
    fn scientific_notation_is_not_a_number() {
        let tokens = scan("1.5e2");
        let types: Vec<Type> = tokens.iter().map(|t| t.r#type).collect();

        assert_eq!(types, vec![Type::Number, Type::Identifier, Type::EOF]);
        assert_eq!(tokens[0].literal, Some(Literal::Number(1.5)));
    }

    #[test]
    fn scan_string_literal() {
        let tokens = scan("\"hello\"");

        assert_eq!(tokens[0].r#type, Type::String);
        assert_eq!(tokens[0].lexeme, "\"hello\"");
        assert_eq!(tokens[0].literal, Some(Literal::from("hello")));
    }

    #[test]
    fn multiline_string_counts_lines() {
        let tokens = scan("\"a\nb\"\nvar");

        assert_eq!(tokens[0].r#type, Type::String);
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[0].literal, Some(Literal::from("a\nb")));
        assert_eq!(tokens[1].r#type, Type::Var);
        assert_eq!(tokens[1].line, 3);
    }

    #[test]
    fn unterminated_string_reports_opening_line() {
        let error = Scanner::new("\n\"abc").scan_tokens().unwrap_err();

        assert_eq!(error.line, 2);
        assert_eq!(error.message, "Unterminated string");
    }

    #[test]
    fn scan_keywords() {
        let tokens = scan("and class else false for fun if nil or print return super this true var while");
        let types: Vec<Type> = tokens.iter().map(|t| t.r#type).collect();

        assert_eq!(types, vec![
            Type::And, Type::Class, Type::Else, Type::False, Type::For, Type::Fun,
            Type::If, Type::Nil, Type::Or, Type::Print, Type::Return, Type::Super,
            Type::This, Type::True, Type::Var, Type::While, Type::EOF,
        ]);
    }

    #[test]
    fn keyword_prefix_is_an_identifier() {
        let tokens = scan("classy orchid _under");
        let types: Vec<Type> = tokens.iter().map(|t| t.r#type).collect();

        assert_eq!(types, vec![Type::Identifier, Type::Identifier, Type::Identifier, Type::EOF]);
    }

    #[test]
    fn comments_are_skipped() {
        let tokens = scan("// a comment\nprint 1; // trailing");
        let types: Vec<Type> = tokens.iter().map(|t| t.r#type).collect();

        assert_eq!(types, vec![Type::Print, Type::Number, Type::Semicolon, Type::EOF]);
        assert_eq!(tokens[0].line, 2);
    }

    #[test]
    fn unexpected_character() {
        let error = Scanner::new("var a = 1 % 2;").scan_tokens().unwrap_err();

        assert_eq!(error.line, 1);
        assert_eq!(error.message, "Unexpected character: %");
    }

    #[test]
    fn subscript_is_not_supported() {
        let error = Scanner::new("a[0]").scan_tokens().unwrap_err();

        assert_eq!(error.message, "Unexpected character: [");
    }
}
