use crate::autograd::{Graph, NodeId};
use crate::error::ScalarGradError;
use crate::numeric::ScalarNumeric;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

/// Appends `count` leaves drawn uniformly from `[low, high]`.
///
/// # Panics
/// If `low > high`.
pub fn uniform<T, R>(graph: &mut Graph<T>, count: usize, low: T, high: T, rng: &mut R) -> Vec<NodeId>
where
    T: ScalarNumeric,
    R: Rng + ?Sized,
{
    let dist = Uniform::new_inclusive(low, high);
    (0..count).map(|_| graph.leaf(dist.sample(rng))).collect()
}

/// Re-draws the value of existing leaves uniformly from `[low, high]`, in-place.
pub fn uniform_<T, R>(
    graph: &mut Graph<T>,
    params: &[NodeId],
    low: T,
    high: T,
    rng: &mut R,
) -> Result<(), ScalarGradError>
where
    T: ScalarNumeric,
    R: Rng + ?Sized,
{
    let dist = Uniform::new_inclusive(low, high);
    for &id in params {
        graph.set_data(id, dist.sample(rng))?;
    }
    Ok(())
}

/// Fills existing leaves with `value`, in-place.
pub fn constant_<T: ScalarNumeric>(
    graph: &mut Graph<T>,
    params: &[NodeId],
    value: T,
) -> Result<(), ScalarGradError> {
    for &id in params {
        graph.set_data(id, value)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
