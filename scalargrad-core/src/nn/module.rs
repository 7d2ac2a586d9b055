use crate::autograd::{Graph, NodeId};
use crate::error::ScalarGradError;
use crate::numeric::ScalarNumeric;
use std::fmt::Debug;

/// The base trait for all neural network modules (neurons, layers, networks).
///
/// A module owns handles to its parameter leaves inside a [`Graph`]; the graph
/// itself is passed to every call that reads or writes node state.
pub trait Module<T: ScalarNumeric>: Debug {
    /// Applies the module to `inputs`, appending the computation to `graph`.
    ///
    /// # Errors
    /// `InputLengthMismatch` if `inputs` does not have the module's input width.
    fn forward(&self, graph: &mut Graph<T>, inputs: &[NodeId]) -> Result<Vec<NodeId>, ScalarGradError>;

    /// All learnable leaves of the module, including those of sub-modules.
    fn parameters(&self) -> Vec<NodeId>;

    /// Parameters with hierarchical names, e.g. `layers.0.neurons.2.weight.1`.
    fn named_parameters(&self) -> Vec<(String, NodeId)>;

    /// Direct sub-modules. Leaf modules have none.
    fn children(&self) -> Vec<&dyn Module<T>> {
        Vec::new()
    }

    fn num_parameters(&self) -> usize {
        self.parameters().len()
    }

    /// Resets the gradient of exactly the nodes returned by `parameters()`.
    fn zero_grad(&self, graph: &mut Graph<T>) -> Result<(), ScalarGradError> {
        graph.zero_grad_nodes(&self.parameters())
    }

    /// Like `forward`, but unwraps a single output node.
    ///
    /// # Errors
    /// `OutputNotScalar` if the module produces more or fewer than one output.
    fn forward_scalar(&self, graph: &mut Graph<T>, inputs: &[NodeId]) -> Result<NodeId, ScalarGradError> {
        match self.forward(graph, inputs)?.as_slice() {
            [single] => Ok(*single),
            outputs => Err(ScalarGradError::OutputNotScalar { len: outputs.len() }),
        }
    }

    /// Promotes raw numbers to leaves, then runs `forward`.
    fn forward_values(&self, graph: &mut Graph<T>, values: &[T]) -> Result<Vec<NodeId>, ScalarGradError> {
        let inputs = graph.leaves(values);
        self.forward(graph, &inputs)
    }
}

pub(crate) fn check_input_len(
    expected: usize,
    inputs: &[NodeId],
    operation: &str,
) -> Result<(), ScalarGradError> {
    if inputs.len() != expected {
        return Err(ScalarGradError::InputLengthMismatch {
            expected,
            actual: inputs.len(),
            operation: operation.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Mock module returning its single parameter added to the input
    #[derive(Debug)]
    struct MockModule {
        param: NodeId,
    }

    impl Module<f64> for MockModule {
        fn forward(&self, graph: &mut Graph<f64>, inputs: &[NodeId]) -> Result<Vec<NodeId>, ScalarGradError> {
            check_input_len(1, inputs, "MockModule::forward")?;
            Ok(vec![graph.add(inputs[0], self.param)?])
        }

        fn parameters(&self) -> Vec<NodeId> {
            vec![self.param]
        }

        fn named_parameters(&self) -> Vec<(String, NodeId)> {
            vec![("param".to_string(), self.param)]
        }
    }

    #[test]
    fn test_default_methods() -> Result<(), ScalarGradError> {
        let mut graph = Graph::<f64>::new();
        let module = MockModule { param: graph.leaf(0.5) };

        assert!(module.children().is_empty());
        assert_eq!(module.num_parameters(), 1);

        let out = module.forward_values(&mut graph, &[2.0])?;
        assert_eq!(out.len(), 1);
        assert_eq!(graph.data(out[0])?, 2.5);

        let input = graph.leaf(1.0);
        let scalar = module.forward_scalar(&mut graph, &[input])?;
        graph.backward(scalar)?;
        assert_eq!(graph.grad(module.param)?, 1.0);

        module.zero_grad(&mut graph)?;
        assert_eq!(graph.grad(module.param)?, 0.0);
        assert_eq!(graph.grad(input)?, 1.0, "zero_grad must not touch non-parameters");
        Ok(())
    }

    #[test]
    fn test_input_length_mismatch() {
        let mut graph = Graph::<f64>::new();
        let module = MockModule { param: graph.leaf(0.5) };
        let result = module.forward_values(&mut graph, &[1.0, 2.0]);
        assert_eq!(
            result,
            Err(ScalarGradError::InputLengthMismatch {
                expected: 1,
                actual: 2,
                operation: "MockModule::forward".to_string(),
            })
        );
    }
}
