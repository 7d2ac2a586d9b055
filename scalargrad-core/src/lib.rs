//! Scalar reverse-mode automatic differentiation and small MLPs built on it.

pub mod autograd;
pub mod error;
pub mod nn;
pub mod numeric;

pub use autograd::{Exponent, Graph, NodeId, Op, OpKind};
pub use error::ScalarGradError;
pub use numeric::ScalarNumeric;
// Re-export traits required by public functions/structs
pub use num_traits;
