//! # class-finder
//!
//! Locates a Java class across directories and jar/war/ear/zip archives and
//! optionally prints the signatures of a named method.
//!
//! ## Architecture
//!
//! - **query**: The immutable search query (class name, case, method filter)
//! - **matcher**: Decides whether a file or archive entry is the queried class
//! - **scan**: Lists searchable files under the configured directories
//! - **archive**: Read-only, memory-mapped walk over zip-compatible containers
//! - **classfile**: Class-file reader (constant pool, method table, attributes)
//! - **descriptor**: Descriptor and generic signature decoding to source syntax
//! - **binary**: Method extraction from compiled classes
//! - **source**: Method extraction from Java source using tree-sitter
//! - **render**: Method records and their one-line declaration form
//! - **report**: Search events and the reporter sinks receiving them
//! - **search**: The orchestrator tying the pieces together per candidate

pub mod archive;
pub mod binary;
pub mod classfile;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod matcher;
pub mod query;
pub mod render;
pub mod report;
pub mod scan;
pub mod search;
pub mod source;

#[cfg(test)]
mod fixture;
