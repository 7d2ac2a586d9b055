//! Scalar reverse-mode automatic differentiation.
//!
//! A [`Graph`] owns every node; operations append new nodes and return their
//! [`NodeId`]. [`Graph::backward`] fills in the gradient of every node reachable
//! from a root.

mod backward;
pub mod grad_check;
pub mod graph;
pub mod node;

pub use graph::Graph;
pub use node::{Exponent, NodeId, Op, OpKind};
