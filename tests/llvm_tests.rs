//! LLVM backend tests, built with `--features llvm`.

#![cfg(feature = "llvm")]

use std::rc::Rc;

use ash::{
    codegen::{backend::Backend, llvm::LlvmBackend},
    driver::driver::Driver,
    lexer::{lexer::tokenize, tokens::TokenStream},
    parser::{parser::Parser, precedence::PrecedenceTable},
};
use inkwell::context::Context;

fn run<'ctx>(source: &str, context: &'ctx Context) -> Driver<TokenStream, LlvmBackend<'ctx>> {
    let tokens = tokenize(source.to_string(), Some("test.ash".to_string())).unwrap();
    let parser = Parser::from_tokens(tokens, Rc::new("test.ash".to_string()), PrecedenceTable::standard());
    let mut driver = Driver::new(parser, LlvmBackend::new(context, "test")).with_echo(false);
    driver.run();
    driver
}

#[test]
fn test_llvm_definition() {
    let context = Context::create();
    let driver = run("def foo(x y) x * (y + 1)", &context);

    assert!(driver.diagnostics().is_empty());
    let foo = driver.backend().lookup_function("foo").unwrap();
    let ir = driver.backend().dump(&foo);

    assert!(ir.contains("define double @foo(double %x, double %y)"));
    assert!(ir.contains("fadd double %y, 1.000000e+00"));
    assert!(ir.contains("fmul double %x, %addtmp"));
}

#[test]
fn test_llvm_comparison() {
    let context = Context::create();
    let driver = run("def lt(a b) a < b", &context);

    let ir = driver.backend().print_to_string();
    assert!(ir.contains("fcmp ult double %a, %b"));
    assert!(ir.contains("uitofp i1 %cmptmp to double"));
}

#[test]
fn test_llvm_extern_and_call() {
    let context = Context::create();
    let mut driver = run("extern sin(x); def f(a) sin(a) + sin(1)", &context);

    assert!(driver.diagnostics().is_empty());
    let backend = driver.backend_mut();
    let sin = backend.lookup_function("sin").unwrap();
    assert!(!backend.has_body(&sin));
    assert!(backend.print_to_string().contains("call double @sin(double %a)"));
}

#[test]
fn test_llvm_failed_function_removed() {
    let context = Context::create();
    let driver = run("def bad(x) x + y; def good(x) x", &context);

    assert_eq!(driver.diagnostics().len(), 1);
    assert!(driver.backend().lookup_function("bad").is_none());
    assert!(matches!(
        driver.backend().lookup_function("good").map(|f| f.count_basic_blocks()),
        Some(1)
    ));
}

#[test]
fn test_llvm_failed_definition_keeps_declaration() {
    let context = Context::create();
    let driver = run("extern foo(a); def foo(z) q", &context);

    assert_eq!(driver.diagnostics().len(), 1);
    let foo = driver.backend().lookup_function("foo").unwrap();
    assert!(!driver.backend().has_body(&foo));

    let param = foo.get_nth_param(0).unwrap().into_float_value();
    assert_eq!(param.get_name().to_str(), Ok("a"));
}

#[test]
fn test_llvm_failed_expression_keeps_previous_expression() {
    let context = Context::create();
    let driver = run("1 + 2; nope", &context);

    assert_eq!(driver.diagnostics().len(), 1);
    let anonymous = driver.backend().lookup_function("__anon_expr").unwrap();
    assert!(driver.backend().has_body(&anonymous));
    assert!(driver.backend().lookup_function("__anon_expr.previous").is_none());
}
