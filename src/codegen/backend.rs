use std::fmt::Debug;

use crate::{ast::ast::Prototype, errors::errors::Error};

/// IR construction primitives used by lowering.
///
/// A backend owns the function table; lowering owns the variable
/// environment. Values are doubles, except for the result of
/// [`Backend::emit_unsigned_less_than`] which is a boolean only accepted by
/// [`Backend::convert_bool_to_float`].
pub trait Backend {
    type Value: Clone + Debug;
    type Function: Clone + Debug;

    fn make_float_constant(&mut self, value: f64) -> Self::Value;

    fn emit_add(&mut self, lhs: Self::Value, rhs: Self::Value) -> Result<Self::Value, Error>;
    fn emit_sub(&mut self, lhs: Self::Value, rhs: Self::Value) -> Result<Self::Value, Error>;
    fn emit_mul(&mut self, lhs: Self::Value, rhs: Self::Value) -> Result<Self::Value, Error>;

    /// Unordered-or-less-than comparison producing a boolean.
    fn emit_unsigned_less_than(
        &mut self,
        lhs: Self::Value,
        rhs: Self::Value,
    ) -> Result<Self::Value, Error>;

    /// Widens a boolean to 0.0 or 1.0.
    fn convert_bool_to_float(&mut self, value: Self::Value) -> Result<Self::Value, Error>;

    fn lookup_function(&self, name: &str) -> Option<Self::Function>;
    fn function_arity(&self, function: &Self::Function) -> usize;
    fn has_body(&self, function: &Self::Function) -> bool;

    fn emit_call(
        &mut self,
        function: &Self::Function,
        args: Vec<Self::Value>,
    ) -> Result<Self::Value, Error>;

    /// Adds a body-less function matching `prototype` to the function table.
    fn declare_function(&mut self, prototype: &Prototype) -> Result<Self::Function, Error>;

    /// The formal parameters of `function`, in declaration order.
    fn parameters(&self, function: &Self::Function) -> Vec<Self::Value>;

    /// Opens the body of `function`; following emissions land in it.
    /// Parameters take the names of `prototype`.
    fn begin_body(&mut self, function: &Self::Function, prototype: &Prototype) -> Result<(), Error>;

    /// Returns `return_value` from the open body and closes it.
    fn finish_function(
        &mut self,
        function: &Self::Function,
        return_value: Self::Value,
    ) -> Result<(), Error>;

    /// Drops the body of `function`, leaving a declaration.
    ///
    /// Parameter names go back to what they were before `begin_body`.
    fn discard_body(&mut self, function: &Self::Function);

    /// Removes `function` from the function table.
    fn discard_function(&mut self, function: Self::Function);

    /// Moves `function` to `name` in the function table.
    fn rename_function(&mut self, function: &Self::Function, name: &str) -> Self::Function;

    /// Textual form of `function`.
    fn dump(&self, function: &Self::Function) -> String;
}
