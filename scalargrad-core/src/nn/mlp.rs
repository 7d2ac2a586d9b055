use crate::autograd::{Graph, NodeId};
use crate::error::ScalarGradError;
use crate::nn::layers::Layer;
use crate::nn::module::Module;
use crate::numeric::ScalarNumeric;
use rand::Rng;

/// Multi-layer perceptron: layers of sizes `[n_in, sizes[0], ..., sizes[last]]`.
///
/// Every layer applies ReLU except the last one, which stays linear.
#[derive(Debug, Clone)]
pub struct Mlp<T: ScalarNumeric = f64> {
    layers: Vec<Layer<T>>,
}

impl<T: ScalarNumeric> Mlp<T> {
    pub fn new(graph: &mut Graph<T>, n_in: usize, sizes: &[usize]) -> Result<Self, ScalarGradError> {
        Self::with_rng(graph, n_in, sizes, &mut rand::thread_rng())
    }

    /// # Errors
    /// `EmptyInput` if `sizes` is empty.
    pub fn with_rng<R: Rng + ?Sized>(
        graph: &mut Graph<T>,
        n_in: usize,
        sizes: &[usize],
        rng: &mut R,
    ) -> Result<Self, ScalarGradError> {
        if sizes.is_empty() {
            return Err(ScalarGradError::EmptyInput {
                operation: "Mlp::new".to_string(),
            });
        }

        let dims: Vec<usize> = std::iter::once(n_in).chain(sizes.iter().copied()).collect();
        let last = sizes.len() - 1;
        let layers = dims
            .windows(2)
            .enumerate()
            .map(|(i, pair)| Layer::with_rng(graph, pair[0], pair[1], i != last, rng))
            .collect();

        let mlp = Mlp { layers };
        log::debug!(
            "Built MLP {:?} with {} parameters",
            dims,
            mlp.num_parameters()
        );
        Ok(mlp)
    }

    pub fn layers(&self) -> &[Layer<T>] {
        &self.layers
    }
}

impl<T: ScalarNumeric> Module<T> for Mlp<T> {
    fn forward(&self, graph: &mut Graph<T>, inputs: &[NodeId]) -> Result<Vec<NodeId>, ScalarGradError> {
        let mut x = inputs.to_vec();
        for layer in &self.layers {
            x = layer.forward(graph, &x)?;
        }
        Ok(x)
    }

    fn parameters(&self) -> Vec<NodeId> {
        self.layers.iter().flat_map(|l| l.parameters()).collect()
    }

    fn named_parameters(&self) -> Vec<(String, NodeId)> {
        let mut params = Vec::new();
        for (i, layer) in self.layers.iter().enumerate() {
            for (name, id) in layer.named_parameters() {
                params.push((format!("layers.{}.{}", i, name), id));
            }
        }
        params
    }

    fn children(&self) -> Vec<&dyn Module<T>> {
        self.layers.iter().map(|l| l as &dyn Module<T>).collect()
    }
}

#[cfg(test)]
#[path = "mlp_test.rs"]
mod tests;
