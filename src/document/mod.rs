//! JSON documents with source spans

mod grammar;
pub mod lexer;
pub mod node;

pub use grammar::{parse, MAX_DEPTH};
pub use node::{JsonPath, Node, NodeKind, PathSegment, Spanned};
