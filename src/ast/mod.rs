/// AST (Abstract Syntax Tree) module
/// Contains the node kinds produced by the parser
///
/// Submodules:
/// - ast: expressions, prototypes, functions and top-level items
pub mod ast;
