use super::graph::Graph;
use super::node::{NodeId, Op};
use crate::error::ScalarGradError;
use crate::numeric::ScalarNumeric;

impl<T: ScalarNumeric> Graph<T> {
    /// Topological order of every node reachable from `root`.
    ///
    /// Depth-first post-order: a node is appended only once all of its
    /// predecessors have been appended, and each node appears exactly once no
    /// matter how many dependents share it. Runs with an explicit stack, so deep
    /// chains do not grow the call stack.
    pub fn topological_order(&self, root: NodeId) -> Result<Vec<NodeId>, ScalarGradError> {
        self.node(root)?;

        // Operands always have a smaller index than their users.
        let mut visited = vec![false; root.0 + 1];
        let mut order = Vec::new();
        let mut stack = vec![(root, false)];

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            if visited[id.0] {
                continue;
            }
            visited[id.0] = true;
            stack.push((id, true));
            for pred in self.nodes[id.0].op.operands().into_iter().rev() {
                debug_assert!(pred < id, "operand {} of {} is not older than its user", pred, id);
                if !visited[pred.0] {
                    stack.push((pred, false));
                }
            }
        }

        Ok(order)
    }

    /// Reverse-mode pass from `root`.
    ///
    /// Seeds `root`'s gradient to 1 and applies every local backward rule in
    /// reverse topological order, so a node's rule only runs after all of its
    /// dependents have contributed to its gradient. Gradients accumulate: call
    /// [`Graph::zero_grad`] before reusing a graph.
    pub fn backward(&mut self, root: NodeId) -> Result<(), ScalarGradError> {
        let order = self.topological_order(root)?;
        log::debug!("Backward from {}: {} nodes in topological order", root, order.len());

        self.nodes[root.0].grad = T::one();
        for &id in order.iter().rev() {
            self.apply_local_rule(id);
        }
        Ok(())
    }

    /// Chain rule for a single node. Writes only into the node's operands.
    fn apply_local_rule(&mut self, id: NodeId) {
        let node = &self.nodes[id.0];
        let (out_data, out_grad, op) = (node.data, node.grad, node.op);
        log::trace!("Applying {} rule of {} (grad = {})", op.kind(), id, out_grad);

        match op {
            Op::Leaf => {}
            Op::Add(a, b) => {
                self.accumulate(a, out_grad);
                self.accumulate(b, out_grad);
            }
            Op::Mul(a, b) => {
                let (a_data, b_data) = (self.nodes[a.0].data, self.nodes[b.0].data);
                self.accumulate(a, b_data * out_grad);
                self.accumulate(b, a_data * out_grad);
            }
            Op::Pow(a, exponent) => {
                let base = self.nodes[a.0].data;
                self.accumulate(a, exponent.derivative(base) * out_grad);
            }
            Op::Exp(a) => self.accumulate(a, out_data * out_grad),
            Op::Tanh(a) => self.accumulate(a, (T::one() - out_data * out_data) * out_grad),
            Op::Relu(a) => {
                if out_data > T::zero() {
                    self.accumulate(a, out_grad);
                }
            }
        }
    }

    fn accumulate(&mut self, id: NodeId, contribution: T) {
        self.nodes[id.0].grad += contribution;
    }
}

#[cfg(test)]
#[path = "backward_test.rs"]
mod tests;
