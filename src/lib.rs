pub mod ast;
pub mod codegen;
pub mod diagnostic;
pub mod driver;
pub mod ir;
pub mod irgen;
pub mod lexer;
pub mod opt;
pub mod semantics;
pub mod tokens;

pub mod utils {
    pub mod string;
    pub mod test;
}
