//! Top-level driver.
//!
//! Reads one top-level form at a time (definition, extern declaration or
//! bare expression), parses it, lowers it, and reports any failure before
//! moving on to the next form.

use std::{iter, rc::Rc};

use crate::{
    ast::ast::ANONYMOUS_FUNCTION_NAME,
    codegen::{
        backend::Backend,
        lower::{lower_function, lower_prototype},
    },
    display_error,
    errors::errors::Error,
    lexer::{
        lexer::tokenize,
        tokens::{TokenKind, TokenSource, TokenStream},
    },
    parser::{
        parser::Parser,
        precedence::PrecedenceTable,
        proto::{parse_definition, parse_extern, parse_top_level_expr},
    },
};

/// Name of the last top-level expression while its replacement is lowered.
/// Not a valid identifier, so source code can never refer to it.
const PREVIOUS_ANONYMOUS_NAME: &str = "__anon_expr.previous";

/// A successfully lowered top-level form and its backend function.
#[derive(Debug, Clone, PartialEq)]
pub enum Form<F> {
    Definition(F),
    Extern(F),
    Expression(F),
}

impl<F> Form<F> {
    pub fn function(&self) -> &F {
        match self {
            Form::Definition(function) | Form::Extern(function) | Form::Expression(function) => {
                function
            }
        }
    }
}

pub struct Driver<S: TokenSource, B: Backend> {
    parser: Parser<S>,
    backend: B,
    /// Every error reported so far, in order
    diagnostics: Vec<Error>,
    /// Whether errors are printed to stderr as they are reported
    echo: bool,
    /// Source text used to render echoed errors
    source_text: String,
}

impl<S: TokenSource, B: Backend> Driver<S, B> {
    pub fn new(parser: Parser<S>, backend: B) -> Self {
        Driver {
            parser,
            backend,
            diagnostics: vec![],
            echo: true,
            source_text: String::new(),
        }
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Sets the text echoed errors point into.
    pub fn with_source_text(mut self, source_text: impl Into<String>) -> Self {
        self.source_text = source_text.into();
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn parser(&self) -> &Parser<S> {
        &self.parser
    }

    pub fn diagnostics(&self) -> &[Error] {
        &self.diagnostics
    }

    /// Handles the next top-level form.
    ///
    /// Top-level `;` tokens are skipped. Returns `None` once the input is
    /// exhausted.
    pub fn step(&mut self) -> Option<Result<Form<B::Function>, Error>> {
        loop {
            match self.parser.current_token_kind() {
                TokenKind::EOF => return None,
                TokenKind::Char(';') => {
                    self.parser.advance();
                }
                TokenKind::Def => return Some(self.handle_definition()),
                TokenKind::Extern => return Some(self.handle_extern()),
                _ => return Some(self.handle_top_level_expression()),
            }
        }
    }

    /// Handles every remaining form.
    pub fn run(&mut self) -> Vec<Result<Form<B::Function>, Error>> {
        iter::from_fn(|| self.step()).collect()
    }

    fn handle_definition(&mut self) -> Result<Form<B::Function>, Error> {
        let start = self.parser.get_position();
        let function = self.parse_form(parse_definition)?;

        match lower_function(&function, &mut self.backend) {
            Ok(handle) => Ok(Form::Definition(handle)),
            Err(error) => Err(self.report(error.or_at(start))),
        }
    }

    fn handle_extern(&mut self) -> Result<Form<B::Function>, Error> {
        let start = self.parser.get_position();
        let prototype = self.parse_form(parse_extern)?;

        match lower_prototype(&prototype, &mut self.backend) {
            Ok(handle) => Ok(Form::Extern(handle)),
            Err(error) => Err(self.report(error.or_at(start))),
        }
    }

    fn handle_top_level_expression(&mut self) -> Result<Form<B::Function>, Error> {
        let start = self.parser.get_position();
        let function = self.parse_form(parse_top_level_expr)?;

        // The previous expression stays aside until this one lowers, then
        // is either dropped or restored.
        let previous = self
            .backend
            .lookup_function(ANONYMOUS_FUNCTION_NAME)
            .map(|previous| self.backend.rename_function(&previous, PREVIOUS_ANONYMOUS_NAME));

        match lower_function(&function, &mut self.backend) {
            Ok(handle) => {
                if let Some(previous) = previous {
                    self.backend.discard_function(previous);
                }
                Ok(Form::Expression(handle))
            }
            Err(error) => {
                if let Some(previous) = previous {
                    self.backend.rename_function(&previous, ANONYMOUS_FUNCTION_NAME);
                }
                Err(self.report(error.or_at(start)))
            }
        }
    }

    /// Runs `production`; on failure reports the error and skips the
    /// offending token so the next form can make progress.
    fn parse_form<T>(&mut self, production: fn(&mut Parser<S>) -> Result<T, Error>) -> Result<T, Error> {
        match production(&mut self.parser) {
            Ok(parsed) => Ok(parsed),
            Err(error) => {
                let error = self.report(error);
                self.parser.advance();
                Err(error)
            }
        }
    }

    fn report(&mut self, error: Error) -> Error {
        if self.echo {
            display_error(&error, &self.source_text);
        }
        self.diagnostics.push(error.clone());
        error
    }
}

/// Tokenizes `source`, then parses and lowers every form in it into
/// `backend` using the standard precedence table.
///
/// Only a tokenizing failure is returned as `Err`; parse and lowering
/// failures are collected in [`Driver::diagnostics`].
pub fn compile_source<B: Backend>(
    source: &str,
    file: &str,
    backend: B,
    echo: bool,
) -> Result<Driver<TokenStream, B>, Error> {
    let tokens = tokenize(source.to_string(), Some(file.to_string()))?;
    let parser = Parser::from_tokens(tokens, Rc::new(file.to_string()), PrecedenceTable::standard());

    let mut driver = Driver::new(parser, backend)
        .with_echo(echo)
        .with_source_text(source);
    driver.run();

    Ok(driver)
}
