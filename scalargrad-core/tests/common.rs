use scalargrad_core::{Graph, NodeId, ScalarGradError};

// Shared by several integration test crates; not every crate uses every helper.
#[allow(dead_code)]
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Collects `grad` of every node in `ids`.
#[allow(dead_code)]
pub(crate) fn grads(graph: &Graph<f64>, ids: &[NodeId]) -> Result<Vec<f64>, ScalarGradError> {
    ids.iter().map(|&id| graph.grad(id)).collect()
}
