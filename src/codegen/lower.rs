//! Lowering of AST nodes through a [`Backend`].
//!
//! Expressions are lowered by an exhaustive match over [`Expr`]. Any
//! failure inside a composite node fails the whole node; a function whose
//! body fails to lower is removed again, or reduced back to its earlier
//! declaration, before the error is returned.

use std::collections::HashSet;

use crate::{
    ast::ast::{Expr, Function, Prototype},
    errors::errors::{Error, ErrorImpl},
};

use super::{backend::Backend, environment::Environment};

/// Lowers `expr` to a value, resolving variables in `environment`.
pub fn lower_expr<B: Backend>(
    expr: &Expr,
    environment: &Environment<B::Value>,
    backend: &mut B,
) -> Result<B::Value, Error> {
    match expr {
        Expr::Number(value) => Ok(backend.make_float_constant(*value)),
        Expr::Variable(name) => environment.lookup(name).cloned().ok_or_else(|| {
            Error::unpositioned(ErrorImpl::UnknownVariable {
                variable: name.clone(),
            })
        }),
        Expr::Binary { op, left, right } => {
            let lhs = lower_expr(left, environment, backend)?;
            let rhs = lower_expr(right, environment, backend)?;

            match op {
                '+' => backend.emit_add(lhs, rhs),
                '-' => backend.emit_sub(lhs, rhs),
                '*' => backend.emit_mul(lhs, rhs),
                '<' => {
                    let comparison = backend.emit_unsigned_less_than(lhs, rhs)?;
                    backend.convert_bool_to_float(comparison)
                }
                _ => Err(Error::unpositioned(ErrorImpl::InvalidBinaryOperator {
                    operator: *op,
                })),
            }
        }
        Expr::Call { callee, args } => {
            let function = backend.lookup_function(callee).ok_or_else(|| {
                Error::unpositioned(ErrorImpl::UnknownFunction {
                    function: callee.clone(),
                })
            })?;

            let expected = backend.function_arity(&function);
            if expected != args.len() {
                return Err(Error::unpositioned(ErrorImpl::IncorrectArgumentCount {
                    function: callee.clone(),
                    expected,
                    received: args.len(),
                }));
            }

            let args = args
                .iter()
                .map(|arg| lower_expr(arg, environment, backend))
                .collect::<Result<Vec<_>, Error>>()?;

            backend.emit_call(&function, args)
        }
    }
}

/// Finds or declares the function described by `prototype`.
///
/// An existing function is reused when its arity matches; a different
/// arity is an error.
pub fn lower_prototype<B: Backend>(prototype: &Prototype, backend: &mut B) -> Result<B::Function, Error> {
    check_unique_params(prototype)?;

    match backend.lookup_function(&prototype.name) {
        Some(existing) => {
            let expected = backend.function_arity(&existing);
            if expected != prototype.arity() {
                return Err(Error::unpositioned(ErrorImpl::PrototypeMismatch {
                    function: prototype.name.clone(),
                    expected,
                    received: prototype.arity(),
                }));
            }
            Ok(existing)
        }
        None => backend.declare_function(prototype),
    }
}

/// Lowers a function definition: its body's value becomes the return value.
pub fn lower_function<B: Backend>(function: &Function, backend: &mut B) -> Result<B::Function, Error> {
    let prototype = &function.prototype;

    let existing = backend.lookup_function(&prototype.name);
    if let Some(existing) = &existing {
        if backend.has_body(existing) {
            return Err(Error::unpositioned(ErrorImpl::FunctionRedefinition {
                function: prototype.name.clone(),
            }));
        }
    }

    let handle = lower_prototype(prototype, backend)?;

    match lower_body(&handle, function, backend) {
        Ok(()) => Ok(handle),
        Err(error) => {
            if existing.is_some() {
                backend.discard_body(&handle);
            } else {
                backend.discard_function(handle);
            }
            Err(error)
        }
    }
}

/// Binds each parameter name of `prototype` to the matching formal of
/// `function` in a fresh environment.
pub fn bind_parameters<B: Backend>(
    function: &B::Function,
    prototype: &Prototype,
    backend: &B,
) -> Environment<B::Value> {
    let mut environment = Environment::new();

    for (name, value) in prototype.params.iter().zip(backend.parameters(function)) {
        environment.bind(name.as_str(), value);
    }

    environment
}

fn lower_body<B: Backend>(handle: &B::Function, function: &Function, backend: &mut B) -> Result<(), Error> {
    backend.begin_body(handle, &function.prototype)?;

    let environment = bind_parameters(handle, &function.prototype, backend);
    let return_value = lower_expr(&function.body, &environment, backend)?;

    backend.finish_function(handle, return_value)
}

fn check_unique_params(prototype: &Prototype) -> Result<(), Error> {
    let mut seen = HashSet::new();

    for param in &prototype.params {
        if !seen.insert(param.as_str()) {
            return Err(Error::unpositioned(ErrorImpl::DuplicateParameter {
                function: prototype.name.clone(),
                parameter: param.clone(),
            }));
        }
    }

    Ok(())
}
