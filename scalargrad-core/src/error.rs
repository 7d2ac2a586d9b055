use crate::autograd::{NodeId, OpKind};
use thiserror::Error;

/// Custom error type for the scalargrad engine and network modules.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum ScalarGradError {
    #[error("Invalid exponent for pow: {exponent} (only finite numeric exponents are supported)")]
    InvalidExponent { exponent: f64 },

    #[error("Input length mismatch during {operation}: expected {expected}, got {actual}")]
    InputLengthMismatch {
        expected: usize,
        actual: usize,
        operation: String,
    },

    #[error("Node {id} not found in graph of {len} nodes")]
    NodeNotFound { id: NodeId, len: usize },

    #[error("Cannot overwrite data of non-leaf node {id} (created by {op})")]
    NonLeafMutation { id: NodeId, op: OpKind },

    #[error("Operation {operation} requires at least one input")]
    EmptyInput { operation: String },

    #[error("Expected a single output node, got {len}")]
    OutputNotScalar { len: usize },
}
