use crate::autograd::{Graph, NodeId};
use crate::error::ScalarGradError;
use crate::nn::init;
use crate::nn::module::{check_input_len, Module};
use crate::numeric::ScalarNumeric;
use rand::Rng;
use std::marker::PhantomData;

/// A single unit computing `sum(w_i * x_i) + b`, optionally followed by ReLU.
#[derive(Debug, Clone)]
pub struct Neuron<T: ScalarNumeric = f64> {
    weights: Vec<NodeId>,
    bias: NodeId,
    nonlinear: bool,
    _marker: PhantomData<T>,
}

impl<T: ScalarNumeric> Neuron<T> {
    /// Creates a neuron with `n_in` weights and a bias drawn uniformly from `[-1, 1]`.
    pub fn new(graph: &mut Graph<T>, n_in: usize, nonlinear: bool) -> Self {
        Self::with_rng(graph, n_in, nonlinear, &mut rand::thread_rng())
    }

    /// Same as [`Neuron::new`], drawing from the given generator.
    pub fn with_rng<R: Rng + ?Sized>(
        graph: &mut Graph<T>,
        n_in: usize,
        nonlinear: bool,
        rng: &mut R,
    ) -> Self {
        let weights = init::uniform(graph, n_in, -T::one(), T::one(), rng);
        let bias = init::uniform(graph, 1, -T::one(), T::one(), rng)[0];
        Neuron {
            weights,
            bias,
            nonlinear,
            _marker: PhantomData,
        }
    }

    /// Creates a neuron with fixed parameter values.
    pub fn from_values(graph: &mut Graph<T>, weights: &[T], bias: T, nonlinear: bool) -> Self {
        Neuron {
            weights: graph.leaves(weights),
            bias: graph.leaf(bias),
            nonlinear,
            _marker: PhantomData,
        }
    }

    pub fn weights(&self) -> &[NodeId] {
        &self.weights
    }

    pub fn bias(&self) -> NodeId {
        self.bias
    }

    pub fn n_in(&self) -> usize {
        self.weights.len()
    }

    pub fn is_nonlinear(&self) -> bool {
        self.nonlinear
    }

    /// Applies the neuron and returns its single output node.
    pub fn activate(&self, graph: &mut Graph<T>, inputs: &[NodeId]) -> Result<NodeId, ScalarGradError> {
        check_input_len(self.n_in(), inputs, "Neuron::forward")?;

        let mut act = self.bias;
        for (&w, &x) in self.weights.iter().zip(inputs) {
            let wx = graph.mul(w, x)?;
            act = graph.add(act, wx)?;
        }

        if self.nonlinear {
            graph.relu(act)
        } else {
            Ok(act)
        }
    }
}

impl<T: ScalarNumeric> Module<T> for Neuron<T> {
    fn forward(&self, graph: &mut Graph<T>, inputs: &[NodeId]) -> Result<Vec<NodeId>, ScalarGradError> {
        Ok(vec![self.activate(graph, inputs)?])
    }

    fn parameters(&self) -> Vec<NodeId> {
        let mut params = self.weights.clone();
        params.push(self.bias);
        params
    }

    fn named_parameters(&self) -> Vec<(String, NodeId)> {
        let mut params: Vec<(String, NodeId)> = self
            .weights
            .iter()
            .enumerate()
            .map(|(i, &w)| (format!("weight.{}", i), w))
            .collect();
        params.push(("bias".to_string(), self.bias));
        params
    }
}
