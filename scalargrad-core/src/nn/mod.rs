//! Neural network modules built on the scalar engine.

pub mod init;
pub mod layers;
pub mod mlp;
pub mod module; // Trait Module

// Re-export common items
pub use layers::{Layer, Neuron};
pub use mlp::Mlp;
pub use module::Module;
