use num_traits::{Float, NumAssignOps};
use rand::distributions::uniform::SampleUniform;
use std::fmt::{Debug, Display};

/// A trait representing the scalar types a [`Graph`](crate::autograd::Graph) can hold.
///
/// Strictly reserved for floating point types (`f32`, `f64`). `SampleUniform`
/// is required so that network parameters can be drawn at random.
pub trait ScalarNumeric:
    Float // Includes Num + Copy + Signed + exp/powf/powi etc.
    + NumAssignOps
    + SampleUniform
    + Debug
    + Display
    + Send
    + Sync
    + 'static
{
    /// Widens the value for error reporting and gradient checking.
    fn to_f64_lossy(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl ScalarNumeric for f32 {}
impl ScalarNumeric for f64 {}
