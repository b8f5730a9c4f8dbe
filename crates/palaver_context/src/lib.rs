//! Context documents for multi-stage conversations.
//!
//! A context document declares the stages of a conversation, the instruction
//! blocks each stage is composed of, and typed variables substituted into
//! those blocks. This crate provides:
//! - Parsing markup into an immutable [`Context`]
//! - Compiling the instruction text for one stage
//! - A digest-keyed [`ContextCache`] for parsed documents
//! - A document checker that reports broken references

mod cache;
mod check;
mod compiler;
mod document;
mod instructions;
mod parser;
mod writer;

pub use cache::ContextCache;
pub use check::{CheckIssue, CheckIssueKind, CheckReport, check_document};
pub use compiler::{compile, substitute_variables};
pub use document::{Block, Context, Stage, Variable, VariableType, VariableValue};
pub use instructions::{is_context_document, resolve_instructions};
pub use parser::parse_context;
