//! In-memory IR backend.
//!
//! Records every emitted instruction into the functions of a [`Module`]
//! without folding or optimizing anything, and prints them in an
//! LLVM-like text form:
//!
//! ```text
//! define double @foo(double %x) {
//! entry:
//!   %0 = fcmp ult double %x, 1.0
//!   %1 = uitofp i1 %0 to double
//!   ret double %1
//! }
//! ```

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    mem,
};

use crate::{
    ast::ast::Prototype,
    errors::errors::{Error, ErrorImpl},
};

use super::backend::Backend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Double,
    Bool,
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Type::Double => write!(f, "double"),
            Type::Bool => write!(f, "i1"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Constant(f64),
    Argument { index: usize, name: String },
    Register { id: usize, ty: Type },
}

impl Value {
    pub fn ty(&self) -> Type {
        match self {
            Value::Constant(_) | Value::Argument { .. } => Type::Double,
            Value::Register { ty, .. } => *ty,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Value::Constant(value) => write!(f, "{:?}", value),
            Value::Argument { name, .. } => write!(f, "%{}", name),
            Value::Register { id, .. } => write!(f, "%{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    FAdd { dest: usize, lhs: Value, rhs: Value },
    FSub { dest: usize, lhs: Value, rhs: Value },
    FMul { dest: usize, lhs: Value, rhs: Value },
    FCmpUlt { dest: usize, lhs: Value, rhs: Value },
    UiToFp { dest: usize, operand: Value },
    Call { dest: usize, callee: String, args: Vec<Value> },
    Ret(Value),
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Instruction::FAdd { dest, lhs, rhs } => write!(f, "%{} = fadd double {}, {}", dest, lhs, rhs),
            Instruction::FSub { dest, lhs, rhs } => write!(f, "%{} = fsub double {}, {}", dest, lhs, rhs),
            Instruction::FMul { dest, lhs, rhs } => write!(f, "%{} = fmul double {}, {}", dest, lhs, rhs),
            Instruction::FCmpUlt { dest, lhs, rhs } => {
                write!(f, "%{} = fcmp ult double {}, {}", dest, lhs, rhs)
            }
            Instruction::UiToFp { dest, operand } => {
                write!(f, "%{} = uitofp i1 {} to double", dest, operand)
            }
            Instruction::Call { dest, callee, args } => {
                let args: Vec<String> = args.iter().map(|arg| format!("double {}", arg)).collect();
                write!(f, "%{} = call double @{}({})", dest, callee, args.join(", "))
            }
            Instruction::Ret(value) => write!(f, "ret double {}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IrFunction {
    pub name: String,
    pub params: Vec<String>,
    /// `None` for a declaration.
    pub body: Option<Vec<Instruction>>,
}

impl Display for IrFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let params: Vec<String> = self.params.iter().map(|p| format!("double %{}", p)).collect();

        match &self.body {
            None => write!(f, "declare double @{}({})", self.name, params.join(", ")),
            Some(body) => {
                writeln!(f, "define double @{}({}) {{", self.name, params.join(", "))?;
                writeln!(f, "entry:")?;
                for instruction in body {
                    writeln!(f, "  {}", instruction)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    pub functions: Vec<IrFunction>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            functions: vec![],
        }
    }

    pub fn get_function(&self, name: &str) -> Option<&IrFunction> {
        self.functions.iter().find(|function| function.name == name)
    }

    fn get_function_mut(&mut self, name: &str) -> Option<&mut IrFunction> {
        self.functions.iter_mut().find(|function| function.name == name)
    }
}

impl Display for Module {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "; ModuleID = '{}'", self.name)?;
        for function in &self.functions {
            writeln!(f)?;
            writeln!(f, "{}", function)?;
        }
        Ok(())
    }
}

/// Handle to a function of an [`IrBackend`] module, by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRef(pub String);

/// A [`Backend`] that records instructions into a [`Module`].
///
/// Instructions emitted while no body is open are still recorded in the
/// insertion block, which [`IrBackend::instructions`] exposes.
#[derive(Debug, Clone)]
pub struct IrBackend {
    module: Module,
    block: Vec<Instruction>,
    next_register: usize,
    current: Option<String>,
    /// Parameter names the open body's function had before `begin_body`
    declared_params: Option<Vec<String>>,
}

impl IrBackend {
    pub fn new(module_name: impl Into<String>) -> Self {
        IrBackend {
            module: Module::new(module_name),
            block: vec![],
            next_register: 0,
            current: None,
            declared_params: None,
        }
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn into_module(self) -> Module {
        self.module
    }

    /// Instructions of the insertion block emitted so far.
    pub fn instructions(&self) -> &[Instruction] {
        &self.block
    }

    fn register(&mut self, ty: Type) -> (usize, Value) {
        let id = self.next_register;
        self.next_register += 1;
        (id, Value::Register { id, ty })
    }

    fn emit_arithmetic(
        &mut self,
        opcode: &str,
        lhs: Value,
        rhs: Value,
        make: fn(usize, Value, Value) -> Instruction,
    ) -> Result<Value, Error> {
        expect_double(opcode, &lhs)?;
        expect_double(opcode, &rhs)?;

        let (dest, value) = self.register(Type::Double);
        self.block.push(make(dest, lhs, rhs));
        Ok(value)
    }

    fn function_mut(&mut self, function: &FunctionRef) -> Result<&mut IrFunction, Error> {
        self.module
            .get_function_mut(&function.0)
            .ok_or_else(|| backend_error(format!("function @{} is not in the module", function.0)))
    }
}

fn backend_error(message: String) -> Error {
    Error::unpositioned(ErrorImpl::Backend { message })
}

fn expect_double(opcode: &str, value: &Value) -> Result<(), Error> {
    if value.ty() != Type::Double {
        return Err(backend_error(format!(
            "{} expects double operands, found {} {}",
            opcode,
            value.ty(),
            value
        )));
    }
    Ok(())
}

impl Backend for IrBackend {
    type Value = Value;
    type Function = FunctionRef;

    fn make_float_constant(&mut self, value: f64) -> Value {
        Value::Constant(value)
    }

    fn emit_add(&mut self, lhs: Value, rhs: Value) -> Result<Value, Error> {
        self.emit_arithmetic("fadd", lhs, rhs, |dest, lhs, rhs| Instruction::FAdd { dest, lhs, rhs })
    }

    fn emit_sub(&mut self, lhs: Value, rhs: Value) -> Result<Value, Error> {
        self.emit_arithmetic("fsub", lhs, rhs, |dest, lhs, rhs| Instruction::FSub { dest, lhs, rhs })
    }

    fn emit_mul(&mut self, lhs: Value, rhs: Value) -> Result<Value, Error> {
        self.emit_arithmetic("fmul", lhs, rhs, |dest, lhs, rhs| Instruction::FMul { dest, lhs, rhs })
    }

    fn emit_unsigned_less_than(&mut self, lhs: Value, rhs: Value) -> Result<Value, Error> {
        expect_double("fcmp", &lhs)?;
        expect_double("fcmp", &rhs)?;

        let (dest, value) = self.register(Type::Bool);
        self.block.push(Instruction::FCmpUlt { dest, lhs, rhs });
        Ok(value)
    }

    fn convert_bool_to_float(&mut self, value: Value) -> Result<Value, Error> {
        if value.ty() != Type::Bool {
            return Err(backend_error(format!("uitofp expects an i1 operand, found {}", value)));
        }

        let (dest, result) = self.register(Type::Double);
        self.block.push(Instruction::UiToFp { dest, operand: value });
        Ok(result)
    }

    fn lookup_function(&self, name: &str) -> Option<FunctionRef> {
        self.module
            .get_function(name)
            .map(|function| FunctionRef(function.name.clone()))
    }

    fn function_arity(&self, function: &FunctionRef) -> usize {
        self.module
            .get_function(&function.0)
            .map(|function| function.params.len())
            .unwrap_or(0)
    }

    fn has_body(&self, function: &FunctionRef) -> bool {
        self.module
            .get_function(&function.0)
            .is_some_and(|function| function.body.is_some())
    }

    fn emit_call(&mut self, function: &FunctionRef, args: Vec<Value>) -> Result<Value, Error> {
        for arg in &args {
            expect_double("call", arg)?;
        }

        let (dest, value) = self.register(Type::Double);
        self.block.push(Instruction::Call {
            dest,
            callee: function.0.clone(),
            args,
        });
        Ok(value)
    }

    fn declare_function(&mut self, prototype: &Prototype) -> Result<FunctionRef, Error> {
        if self.module.get_function(&prototype.name).is_some() {
            return Err(backend_error(format!("function @{} already exists", prototype.name)));
        }

        self.module.functions.push(IrFunction {
            name: prototype.name.clone(),
            params: prototype.params.clone(),
            body: None,
        });
        Ok(FunctionRef(prototype.name.clone()))
    }

    fn parameters(&self, function: &FunctionRef) -> Vec<Value> {
        self.module
            .get_function(&function.0)
            .map(|function| {
                function
                    .params
                    .iter()
                    .enumerate()
                    .map(|(index, name)| Value::Argument {
                        index,
                        name: name.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn begin_body(&mut self, function: &FunctionRef, prototype: &Prototype) -> Result<(), Error> {
        let target = self.function_mut(function)?;
        let declared = mem::replace(&mut target.params, prototype.params.clone());
        self.declared_params = Some(declared);

        self.block.clear();
        self.next_register = 0;
        self.current = Some(function.0.clone());
        Ok(())
    }

    fn finish_function(&mut self, function: &FunctionRef, return_value: Value) -> Result<(), Error> {
        if self.current.as_deref() != Some(function.0.as_str()) {
            return Err(backend_error(format!("no open body for @{}", function.0)));
        }
        expect_double("ret", &return_value)?;

        self.block.push(Instruction::Ret(return_value));
        let body = mem::take(&mut self.block);
        self.function_mut(function)?.body = Some(body);
        self.current = None;
        self.declared_params = None;
        Ok(())
    }

    fn discard_body(&mut self, function: &FunctionRef) {
        let declared = self.declared_params.take();
        if let Some(target) = self.module.get_function_mut(&function.0) {
            target.body = None;
            if let Some(params) = declared {
                target.params = params;
            }
        }
        self.block.clear();
        self.current = None;
    }

    fn discard_function(&mut self, function: FunctionRef) {
        self.module.functions.retain(|existing| existing.name != function.0);
        if self.current.as_deref() == Some(function.0.as_str()) {
            self.block.clear();
            self.current = None;
            self.declared_params = None;
        }
    }

    fn rename_function(&mut self, function: &FunctionRef, name: &str) -> FunctionRef {
        if let Some(target) = self.module.get_function_mut(&function.0) {
            target.name = name.to_string();
        }
        if self.current.as_deref() == Some(function.0.as_str()) {
            self.current = Some(name.to_string());
        }
        FunctionRef(name.to_string())
    }

    fn dump(&self, function: &FunctionRef) -> String {
        self.module
            .get_function(&function.0)
            .map(|function| function.to_string())
            .unwrap_or_default()
    }
}
