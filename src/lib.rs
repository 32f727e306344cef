//! Generates Rust types and operation functions from GraphQL schemas and
//! executable documents, plus the runtime client the generated code calls.
pub mod cli;
pub mod client;
pub mod codegen;
pub mod emit;
pub mod graphql;
pub mod ir;
