use super::node::{Exponent, Node, NodeId, Op, OpKind};
use crate::error::ScalarGradError;
use crate::numeric::ScalarNumeric;

/// Arena holding every scalar node of a computation graph.
///
/// Nodes are only ever appended: an operation can reference existing handles
/// only, so every operand index is strictly smaller than the index of the node
/// using it and the predecessor relation is acyclic by construction.
///
/// Forward operations never modify operand data. Gradients are written by
/// [`Graph::backward`] and reset with [`Graph::zero_grad`] /
/// [`Graph::zero_grad_nodes`].
#[derive(Debug, Clone)]
pub struct Graph<T: ScalarNumeric = f64> {
    pub(crate) nodes: Vec<Node<T>>,
}

impl<T: ScalarNumeric> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ScalarNumeric> Graph<T> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Graph { nodes: Vec::new() }
    }

    /// Creates an empty graph with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Graph {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Number of nodes in the arena. Doubles as a checkpoint for [`Graph::truncate`].
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // --- Leaf construction ---

    /// Promotes a raw number to a leaf node (an input or a parameter).
    pub fn leaf(&mut self, value: T) -> NodeId {
        self.push(value, Op::Leaf)
    }

    /// Same as [`Graph::leaf`], attaching a human readable label.
    pub fn leaf_labeled(&mut self, value: T, label: impl Into<String>) -> NodeId {
        let id = self.leaf(value);
        self.nodes[id.0].label = Some(label.into());
        id
    }

    /// Promotes every value of `values` to a leaf, preserving order.
    pub fn leaves(&mut self, values: &[T]) -> Vec<NodeId> {
        values.iter().map(|&v| self.leaf(v)).collect()
    }

    // --- Accessors ---

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node<T>, ScalarGradError> {
        self.nodes.get(id.0).ok_or(ScalarGradError::NodeNotFound {
            id,
            len: self.nodes.len(),
        })
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node<T>, ScalarGradError> {
        let len = self.nodes.len();
        self.nodes
            .get_mut(id.0)
            .ok_or(ScalarGradError::NodeNotFound { id, len })
    }

    /// Forward value of a node.
    pub fn data(&self, id: NodeId) -> Result<T, ScalarGradError> {
        Ok(self.node(id)?.data)
    }

    /// Accumulated gradient of the last backward root with respect to this node.
    pub fn grad(&self, id: NodeId) -> Result<T, ScalarGradError> {
        Ok(self.node(id)?.grad)
    }

    pub fn op(&self, id: NodeId) -> Result<Op<T>, ScalarGradError> {
        Ok(self.node(id)?.op)
    }

    pub fn op_kind(&self, id: NodeId) -> Result<OpKind, ScalarGradError> {
        Ok(self.node(id)?.op.kind())
    }

    pub fn is_leaf(&self, id: NodeId) -> Result<bool, ScalarGradError> {
        Ok(matches!(self.node(id)?.op, Op::Leaf))
    }

    /// The distinct operands that produced `id`; empty for leaves.
    pub fn predecessors(&self, id: NodeId) -> Result<Vec<NodeId>, ScalarGradError> {
        let mut preds = self.node(id)?.op.operands();
        preds.dedup();
        Ok(preds)
    }

    pub fn label(&self, id: NodeId) -> Result<Option<&str>, ScalarGradError> {
        Ok(self.node(id)?.label.as_deref())
    }

    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) -> Result<(), ScalarGradError> {
        self.node_mut(id)?.label = Some(label.into());
        Ok(())
    }

    // --- Primitive operations ---

    fn push(&mut self, data: T, op: Op<T>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(data, op));
        id
    }

    /// `a + b`
    pub fn add(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, ScalarGradError> {
        let data = self.data(a)? + self.data(b)?;
        Ok(self.push(data, Op::Add(a, b)))
    }

    /// `a * b`
    pub fn mul(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, ScalarGradError> {
        let data = self.data(a)? * self.data(b)?;
        Ok(self.push(data, Op::Mul(a, b)))
    }

    /// `a ^ exponent`, where the exponent is a number and never a node.
    ///
    /// # Errors
    /// `InvalidExponent` if the exponent is NaN or infinite.
    pub fn pow(
        &mut self,
        a: NodeId,
        exponent: impl Into<Exponent<T>>,
    ) -> Result<NodeId, ScalarGradError> {
        let exponent = exponent.into().validate()?;
        let data = exponent.apply(self.data(a)?);
        Ok(self.push(data, Op::Pow(a, exponent)))
    }

    /// `e ^ a`
    pub fn exp(&mut self, a: NodeId) -> Result<NodeId, ScalarGradError> {
        let data = self.data(a)?.exp();
        Ok(self.push(data, Op::Exp(a)))
    }

    /// Hyperbolic tangent, evaluated as `(e^2x - 1) / (e^2x + 1)`.
    pub fn tanh(&mut self, a: NodeId) -> Result<NodeId, ScalarGradError> {
        let x = self.data(a)?;
        let e = (x + x).exp();
        // e^2x overflows long before tanh stops being exactly 1 in floating point
        let data = if e.is_infinite() {
            T::one()
        } else {
            (e - T::one()) / (e + T::one())
        };
        Ok(self.push(data, Op::Tanh(a)))
    }

    /// `max(0, a)`
    pub fn relu(&mut self, a: NodeId) -> Result<NodeId, ScalarGradError> {
        let x = self.data(a)?;
        let data = if x > T::zero() { x } else { T::zero() };
        Ok(self.push(data, Op::Relu(a)))
    }

    // --- Derived operations ---

    /// `-a`, built as `a * -1`.
    pub fn neg(&mut self, a: NodeId) -> Result<NodeId, ScalarGradError> {
        self.node(a)?;
        let minus_one = self.leaf(-T::one());
        self.mul(a, minus_one)
    }

    /// `a - b`, built as `a + (-b)`.
    pub fn sub(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, ScalarGradError> {
        self.node(a)?;
        let neg_b = self.neg(b)?;
        self.add(a, neg_b)
    }

    /// `a / b`, built as `a * b^-1`.
    pub fn div(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, ScalarGradError> {
        self.node(a)?;
        let inv_b = self.pow(b, Exponent::Int(-1))?;
        self.mul(a, inv_b)
    }

    /// `a + value`, promoting `value` to a leaf first.
    pub fn add_scalar(&mut self, a: NodeId, value: T) -> Result<NodeId, ScalarGradError> {
        self.node(a)?;
        let b = self.leaf(value);
        self.add(a, b)
    }

    /// `a * value`, promoting `value` to a leaf first.
    pub fn mul_scalar(&mut self, a: NodeId, value: T) -> Result<NodeId, ScalarGradError> {
        self.node(a)?;
        let b = self.leaf(value);
        self.mul(a, b)
    }

    /// Left fold of `add` over `terms`. A single term is returned as is.
    pub fn sum(&mut self, terms: &[NodeId]) -> Result<NodeId, ScalarGradError> {
        let (&first, rest) = terms.split_first().ok_or_else(|| ScalarGradError::EmptyInput {
            operation: "sum".to_string(),
        })?;
        self.node(first)?;
        rest.iter().try_fold(first, |acc, &term| self.add(acc, term))
    }

    // --- Gradient and arena maintenance ---

    /// Resets the gradient of every node in the arena.
    pub fn zero_grad(&mut self) {
        for node in &mut self.nodes {
            node.grad = T::zero();
        }
    }

    /// Resets the gradient of the given nodes only.
    pub fn zero_grad_nodes(&mut self, ids: &[NodeId]) -> Result<(), ScalarGradError> {
        for &id in ids {
            self.node_mut(id)?.grad = T::zero();
        }
        Ok(())
    }

    /// Overwrites the value of a leaf, e.g. for an optimizer step.
    ///
    /// Derived nodes keep the value they were computed with; rebuild them with a
    /// new forward pass.
    pub fn set_data(&mut self, id: NodeId, value: T) -> Result<(), ScalarGradError> {
        let node = self.node_mut(id)?;
        match node.op {
            Op::Leaf => {
                node.data = value;
                Ok(())
            }
            op => Err(ScalarGradError::NonLeafMutation { id, op: op.kind() }),
        }
    }

    /// Drops every node appended after the checkpoint `len` (see [`Graph::len`]).
    ///
    /// Handles with an index `>= len` are invalidated. Nodes below the
    /// checkpoint never reference nodes above it, so the remaining graph stays
    /// consistent.
    pub fn truncate(&mut self, len: usize) {
        if len < self.nodes.len() {
            log::debug!("Truncating graph from {} to {} nodes", self.nodes.len(), len);
            self.nodes.truncate(len);
        }
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
