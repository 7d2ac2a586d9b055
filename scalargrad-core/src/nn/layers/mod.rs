pub mod layer;
pub mod neuron;

// Re-export key layer structs
pub use layer::Layer;
pub use neuron::Neuron;

#[cfg(test)]
#[path = "layers_test.rs"]
mod tests;
