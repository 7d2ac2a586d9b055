use super::neuron::Neuron;
use crate::autograd::{Graph, NodeId};
use crate::error::ScalarGradError;
use crate::nn::module::{check_input_len, Module};
use crate::numeric::ScalarNumeric;
use rand::Rng;

/// `n_out` independent neurons applied to the same input.
#[derive(Debug, Clone)]
pub struct Layer<T: ScalarNumeric = f64> {
    neurons: Vec<Neuron<T>>,
    n_in: usize,
}

impl<T: ScalarNumeric> Layer<T> {
    pub fn new(graph: &mut Graph<T>, n_in: usize, n_out: usize, nonlinear: bool) -> Self {
        Self::with_rng(graph, n_in, n_out, nonlinear, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(
        graph: &mut Graph<T>,
        n_in: usize,
        n_out: usize,
        nonlinear: bool,
        rng: &mut R,
    ) -> Self {
        let neurons = (0..n_out)
            .map(|_| Neuron::with_rng(graph, n_in, nonlinear, rng))
            .collect();
        Layer { neurons, n_in }
    }

    /// Builds a layer from existing neurons, which must all take `n_in` inputs.
    pub fn from_neurons(n_in: usize, neurons: Vec<Neuron<T>>) -> Result<Self, ScalarGradError> {
        if let Some(bad) = neurons.iter().find(|n| n.n_in() != n_in) {
            return Err(ScalarGradError::InputLengthMismatch {
                expected: n_in,
                actual: bad.n_in(),
                operation: "Layer::from_neurons".to_string(),
            });
        }
        Ok(Layer { neurons, n_in })
    }

    pub fn neurons(&self) -> &[Neuron<T>] {
        &self.neurons
    }

    pub fn n_in(&self) -> usize {
        self.n_in
    }

    pub fn n_out(&self) -> usize {
        self.neurons.len()
    }
}

impl<T: ScalarNumeric> Module<T> for Layer<T> {
    fn forward(&self, graph: &mut Graph<T>, inputs: &[NodeId]) -> Result<Vec<NodeId>, ScalarGradError> {
        check_input_len(self.n_in, inputs, "Layer::forward")?;
        self.neurons
            .iter()
            .map(|neuron| neuron.activate(graph, inputs))
            .collect()
    }

    fn parameters(&self) -> Vec<NodeId> {
        self.neurons.iter().flat_map(|n| n.parameters()).collect()
    }

    fn named_parameters(&self) -> Vec<(String, NodeId)> {
        let mut params = Vec::new();
        for (i, neuron) in self.neurons.iter().enumerate() {
            for (name, id) in neuron.named_parameters() {
                params.push((format!("neurons.{}.{}", i, name), id));
            }
        }
        params
    }

    fn children(&self) -> Vec<&dyn Module<T>> {
        self.neurons.iter().map(|n| n as &dyn Module<T>).collect()
    }
}
