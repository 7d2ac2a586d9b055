use approx::assert_relative_eq;
use scalargrad_core::autograd::grad_check::{check_grad, GradCheckError};
use scalargrad_core::nn::{Mlp, Module, Neuron};
use scalargrad_core::{Graph, NodeId, OpKind, ScalarGradError};

mod common;
use common::{grads, init_logger};

#[test]
fn test_weighted_sum_scenario() -> Result<(), ScalarGradError> {
    init_logger();
    let mut graph = Graph::<f64>::new();
    let a = graph.leaf_labeled(2.0, "a");
    let b = graph.leaf_labeled(-3.0, "b");
    let c = graph.leaf_labeled(10.0, "c");
    let ab = graph.mul(a, b)?;
    let d = graph.add(ab, c)?;
    graph.set_label(d, "d")?;

    assert_eq!(graph.data(d)?, 4.0);
    assert_eq!(graph.label(d)?, Some("d"));
    graph.backward(d)?;
    assert_eq!(grads(&graph, &[a, b, c])?, vec![-3.0, 2.0, 1.0]);
    Ok(())
}

#[test]
fn test_power_scenario() -> Result<(), ScalarGradError> {
    let mut graph = Graph::<f64>::new();
    let x = graph.leaf(2.0);
    let y = graph.pow(x, 3)?;
    assert_eq!(graph.data(y)?, 8.0);
    graph.backward(y)?;
    assert_eq!(graph.grad(x)?, 12.0);
    Ok(())
}

#[test]
fn test_linear_neuron_scenario() -> Result<(), ScalarGradError> {
    let mut graph = Graph::<f64>::new();
    let neuron = Neuron::from_values(&mut graph, &[1.0, 1.0], 0.0, false);
    let out = neuron.forward_values(&mut graph, &[3.0, 4.0])?;
    assert_eq!(out.len(), 1);
    assert_eq!(graph.data(out[0])?, 7.0);
    Ok(())
}

#[test]
fn test_mlp_scenario() -> Result<(), ScalarGradError> {
    let mut graph = Graph::<f64>::new();
    let mlp = Mlp::new(&mut graph, 3, &[4, 4, 1])?;
    let out = mlp.forward_values(&mut graph, &[2.0, 3.0, -1.0])?;
    assert_eq!(out.len(), 1);
    assert_eq!(mlp.parameters().len(), 41);
    Ok(())
}

#[test]
fn test_neuron_expression_with_tanh() -> Result<(), ScalarGradError> {
    // o = tanh(x1*w1 + x2*w2 + b), b chosen so that the pre-activation is ~0.8814
    let mut graph = Graph::<f64>::new();
    let x1 = graph.leaf_labeled(2.0, "x1");
    let x2 = graph.leaf_labeled(0.0, "x2");
    let w1 = graph.leaf_labeled(-3.0, "w1");
    let w2 = graph.leaf_labeled(1.0, "w2");
    let b = graph.leaf_labeled(6.881_373_587_019_543_2, "b");

    let x1w1 = graph.mul(x1, w1)?;
    let x2w2 = graph.mul(x2, w2)?;
    let sum = graph.add(x1w1, x2w2)?;
    let n = graph.add(sum, b)?;
    let o = graph.tanh(n)?;
    assert_eq!(graph.op_kind(o)?, OpKind::Tanh);

    graph.backward(o)?;
    assert_relative_eq!(graph.data(o)?, 0.7071, epsilon = 1e-4);
    assert_relative_eq!(graph.grad(n)?, 0.5, epsilon = 1e-6);
    assert_relative_eq!(graph.grad(x1)?, -1.5, epsilon = 1e-6);
    assert_relative_eq!(graph.grad(w1)?, 1.0, epsilon = 1e-6);
    assert_relative_eq!(graph.grad(x2)?, 0.5, epsilon = 1e-6);
    assert_relative_eq!(graph.grad(w2)?, 0.0, epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_tanh_matches_its_exp_decomposition() -> Result<(), ScalarGradError> {
    // tanh(n) rebuilt as (e^2n - 1) / (e^2n + 1) from primitive ops
    let mut graph = Graph::<f64>::new();
    let n = graph.leaf(0.8);
    let direct = graph.tanh(n)?;

    let two_n = graph.mul_scalar(n, 2.0)?;
    let e = graph.exp(two_n)?;
    let num = graph.add_scalar(e, -1.0)?;
    let den = graph.add_scalar(e, 1.0)?;
    let composed = graph.div(num, den)?;

    assert_relative_eq!(graph.data(direct)?, graph.data(composed)?, epsilon = 1e-12);

    graph.backward(direct)?;
    let g_direct = graph.grad(n)?;
    graph.zero_grad();
    graph.backward(composed)?;
    assert_relative_eq!(graph.grad(n)?, g_direct, epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_mlp_gradients_match_finite_differences() -> Result<(), GradCheckError> {
    // Gradients with respect to the inputs of a fixed two-layer network
    let net = |g: &mut Graph<f64>, x: &[NodeId]| -> Result<NodeId, ScalarGradError> {
        let h1 = Neuron::from_values(g, &[0.3, -0.7], 0.1, true);
        let h2 = Neuron::from_values(g, &[-0.2, 0.9], 0.05, true);
        let out = Neuron::from_values(g, &[1.1, -0.4], 0.2, false);
        let hidden = vec![h1.activate(g, x)?, h2.activate(g, x)?];
        let y = out.activate(g, &hidden)?;
        g.tanh(y)
    };
    check_grad(net, &[0.8, 0.6], 1e-6, 1e-5)
}
