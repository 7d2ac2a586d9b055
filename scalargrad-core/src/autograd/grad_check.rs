use super::graph::Graph;
use super::node::NodeId;
use crate::error::ScalarGradError;
use crate::numeric::ScalarNumeric;
use approx::relative_eq;
use thiserror::Error;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input {input_index}: analytical grad {analytical_grad} != numerical grad {numerical_grad}. Difference: {difference}")]
    GradientMismatch {
        input_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },

    #[error("Numerical gradient is NaN or infinite for input {input_index}. Loss+: {loss_plus}, Loss-: {loss_minus}")]
    NumericalGradNotFinite {
        input_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },

    #[error("Graph error during gradient check: {0}")]
    Graph(#[from] ScalarGradError),
}

/// Checks analytical gradients against central finite differences.
///
/// `func` receives a fresh graph whose first `inputs.len()` nodes are leaves
/// holding `inputs`, and returns the output node. For every input `i`, the
/// gradient produced by [`Graph::backward`] is compared with
/// `(f(x + eps) - f(x - eps)) / 2eps`.
pub fn check_grad<T, F>(
    func: F,
    inputs: &[T],
    epsilon: T,
    tolerance: f64,
) -> Result<(), GradCheckError>
where
    T: ScalarNumeric,
    F: Fn(&mut Graph<T>, &[NodeId]) -> Result<NodeId, ScalarGradError>,
{
    // --- 1. Analytical gradients ---
    let mut graph = Graph::new();
    let leaves = graph.leaves(inputs);
    let output = func(&mut graph, &leaves)?;
    graph.backward(output)?;

    let two = T::one() + T::one();
    let mut perturbed = inputs.to_vec();

    for (input_index, &leaf) in leaves.iter().enumerate() {
        let analytical = graph.grad(leaf)?.to_f64_lossy();

        // --- 2. Numerical gradient ---
        let original = inputs[input_index];
        perturbed[input_index] = original + epsilon;
        let loss_plus = evaluate(&func, &perturbed)?;
        perturbed[input_index] = original - epsilon;
        let loss_minus = evaluate(&func, &perturbed)?;
        perturbed[input_index] = original;

        let numerical = ((loss_plus - loss_minus) / (two * epsilon)).to_f64_lossy();
        if !numerical.is_finite() {
            return Err(GradCheckError::NumericalGradNotFinite {
                input_index,
                loss_plus: loss_plus.to_f64_lossy(),
                loss_minus: loss_minus.to_f64_lossy(),
            });
        }

        // --- 3. Compare ---
        if !relative_eq!(analytical, numerical, epsilon = tolerance, max_relative = tolerance) {
            return Err(GradCheckError::GradientMismatch {
                input_index,
                analytical_grad: analytical,
                numerical_grad: numerical,
                difference: (analytical - numerical).abs(),
            });
        }
    }

    Ok(())
}

fn evaluate<T, F>(func: &F, inputs: &[T]) -> Result<T, ScalarGradError>
where
    T: ScalarNumeric,
    F: Fn(&mut Graph<T>, &[NodeId]) -> Result<NodeId, ScalarGradError>,
{
    let mut graph = Graph::new();
    let leaves = graph.leaves(inputs);
    let output = func(&mut graph, &leaves)?;
    graph.data(output)
}

#[cfg(test)]
#[path = "grad_check_test.rs"]
mod tests;
