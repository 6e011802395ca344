//! The bidirectional dzn codec.
//!
//! `infer` derives array index-sets from nested-container shape, `encode`
//! renders values as dzn text, `decode` parses one value back, and
//! `statements` splits a full document into `name = value;` assignments with
//! two-pass enum resolution.

pub mod decode;
pub mod encode;
pub mod infer;
pub mod statements;

#[cfg(test)]
mod roundtrip_tests;

pub use decode::decode_value;
pub use encode::{encode_enum, encode_statement, encode_value};
pub use infer::infer_index_set;
pub use statements::{parse_document, split_statements, Document};
