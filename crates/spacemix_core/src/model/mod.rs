//! Inventory domain model.
//!
//! # Responsibility
//! - Define the canonical row shape produced by the warehouse row source.
//!
//! # Invariants
//! - Rows are immutable once fetched; every aggregate is derived from them.
//! - Nothing in the model is persisted between runs.

pub mod row;
