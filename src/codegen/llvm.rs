//! LLVM backend built on `inkwell`.
//!
//! Every value is a `double`; comparisons produce an `i1` that lowering
//! immediately widens back to `double`. Finished functions are run through
//! the LLVM verifier.

use std::fmt::Display;

use inkwell::{
    builder::Builder,
    context::Context,
    module::Module,
    types::BasicMetadataTypeEnum,
    values::{BasicMetadataValueEnum, BasicValueEnum, FloatValue, FunctionValue},
    FloatPredicate,
};

use crate::{
    ast::ast::Prototype,
    errors::errors::{Error, ErrorImpl},
};

use super::backend::Backend;

/// Holds the state of LLVM code generation.
///
/// # Type Parameters
///
/// * `'ctx` - Lifetime of the LLVM context
pub struct LlvmBackend<'ctx> {
    /// Reference to the LLVM context
    pub context: &'ctx Context,
    /// The LLVM module being built
    pub module: Module<'ctx>,
    /// The LLVM IR builder
    pub builder: Builder<'ctx>,
    /// Parameter names the open body's function had before `begin_body`
    declared_names: Vec<String>,
}

impl<'ctx> LlvmBackend<'ctx> {
    pub fn new(context: &'ctx Context, module_name: &str) -> Self {
        LlvmBackend {
            context,
            module: context.create_module(module_name),
            builder: context.create_builder(),
            declared_names: vec![],
        }
    }

    /// Returns the textual IR of the whole module.
    pub fn print_to_string(&self) -> String {
        self.module.print_to_string().to_string()
    }

    fn float(&self, value: BasicValueEnum<'ctx>) -> Result<FloatValue<'ctx>, Error> {
        match value {
            BasicValueEnum::FloatValue(value) => Ok(value),
            other => Err(backend_error(format!(
                "expected a double operand, found {}",
                other.get_type().print_to_string()
            ))),
        }
    }
}

fn backend_error(error: impl Display) -> Error {
    Error::unpositioned(ErrorImpl::Backend {
        message: error.to_string(),
    })
}

impl<'ctx> Backend for LlvmBackend<'ctx> {
    type Value = BasicValueEnum<'ctx>;
    type Function = FunctionValue<'ctx>;

    fn make_float_constant(&mut self, value: f64) -> Self::Value {
        self.context.f64_type().const_float(value).into()
    }

    fn emit_add(&mut self, lhs: Self::Value, rhs: Self::Value) -> Result<Self::Value, Error> {
        let (lhs, rhs) = (self.float(lhs)?, self.float(rhs)?);
        let value = self
            .builder
            .build_float_add(lhs, rhs, "addtmp")
            .map_err(backend_error)?;
        Ok(value.into())
    }

    fn emit_sub(&mut self, lhs: Self::Value, rhs: Self::Value) -> Result<Self::Value, Error> {
        let (lhs, rhs) = (self.float(lhs)?, self.float(rhs)?);
        let value = self
            .builder
            .build_float_sub(lhs, rhs, "subtmp")
            .map_err(backend_error)?;
        Ok(value.into())
    }

    fn emit_mul(&mut self, lhs: Self::Value, rhs: Self::Value) -> Result<Self::Value, Error> {
        let (lhs, rhs) = (self.float(lhs)?, self.float(rhs)?);
        let value = self
            .builder
            .build_float_mul(lhs, rhs, "multmp")
            .map_err(backend_error)?;
        Ok(value.into())
    }

    fn emit_unsigned_less_than(
        &mut self,
        lhs: Self::Value,
        rhs: Self::Value,
    ) -> Result<Self::Value, Error> {
        let (lhs, rhs) = (self.float(lhs)?, self.float(rhs)?);
        let value = self
            .builder
            .build_float_compare(FloatPredicate::ULT, lhs, rhs, "cmptmp")
            .map_err(backend_error)?;
        Ok(value.into())
    }

    fn convert_bool_to_float(&mut self, value: Self::Value) -> Result<Self::Value, Error> {
        let BasicValueEnum::IntValue(value) = value else {
            return Err(backend_error("uitofp expects an i1 operand"));
        };

        let value = self
            .builder
            .build_unsigned_int_to_float(value, self.context.f64_type(), "booltmp")
            .map_err(backend_error)?;
        Ok(value.into())
    }

    fn lookup_function(&self, name: &str) -> Option<Self::Function> {
        self.module.get_function(name)
    }

    fn function_arity(&self, function: &Self::Function) -> usize {
        function.count_params() as usize
    }

    fn has_body(&self, function: &Self::Function) -> bool {
        function.count_basic_blocks() > 0
    }

    fn emit_call(
        &mut self,
        function: &Self::Function,
        args: Vec<Self::Value>,
    ) -> Result<Self::Value, Error> {
        let args: Vec<BasicMetadataValueEnum<'ctx>> = args.into_iter().map(Into::into).collect();

        self.builder
            .build_call(*function, &args, "calltmp")
            .map_err(backend_error)?
            .try_as_basic_value()
            .left()
            .ok_or_else(|| backend_error("call produced no value"))
    }

    fn declare_function(&mut self, prototype: &Prototype) -> Result<Self::Function, Error> {
        let double = self.context.f64_type();
        let params: Vec<BasicMetadataTypeEnum<'ctx>> = vec![double.into(); prototype.arity()];
        let fn_type = double.fn_type(&params, false);

        let function = self.module.add_function(&prototype.name, fn_type, None);
        for (param, name) in function.get_param_iter().zip(&prototype.params) {
            param.into_float_value().set_name(name);
        }

        Ok(function)
    }

    fn parameters(&self, function: &Self::Function) -> Vec<Self::Value> {
        function.get_param_iter().collect()
    }

    fn begin_body(&mut self, function: &Self::Function, prototype: &Prototype) -> Result<(), Error> {
        self.declared_names = function
            .get_param_iter()
            .map(|param| param.into_float_value().get_name().to_string_lossy().into_owned())
            .collect();

        for (param, name) in function.get_param_iter().zip(&prototype.params) {
            param.into_float_value().set_name(name);
        }

        let entry = self.context.append_basic_block(*function, "entry");
        self.builder.position_at_end(entry);
        Ok(())
    }

    fn finish_function(
        &mut self,
        function: &Self::Function,
        return_value: Self::Value,
    ) -> Result<(), Error> {
        self.builder
            .build_return(Some(&return_value))
            .map_err(backend_error)?;

        if !function.verify(false) {
            return Err(Error::unpositioned(ErrorImpl::MalformedFunction {
                function: function.get_name().to_string_lossy().into_owned(),
            }));
        }

        self.declared_names.clear();
        Ok(())
    }

    fn discard_body(&mut self, function: &Self::Function) {
        self.builder.clear_insertion_position();

        for block in function.get_basic_blocks() {
            // Safety: the blocks belong to `function` and nothing else refers to them.
            if unsafe { block.delete() }.is_err() {
                break;
            }
        }

        for (param, name) in function.get_param_iter().zip(self.declared_names.drain(..)) {
            param.into_float_value().set_name(&name);
        }
    }

    fn discard_function(&mut self, function: Self::Function) {
        self.builder.clear_insertion_position();
        self.declared_names.clear();
        // Safety: the handle is consumed, and no other value refers to the function.
        unsafe { function.delete() };
    }

    fn rename_function(&mut self, function: &Self::Function, name: &str) -> Self::Function {
        function.as_global_value().set_name(name);
        *function
    }

    fn dump(&self, function: &Self::Function) -> String {
        function.print_to_string().to_string()
    }
}
