use crate::error::ScalarGradError;
use crate::numeric::ScalarNumeric;
use num_traits::NumCast;
use std::fmt;

/// Handle to a node stored in a [`Graph`](super::Graph).
///
/// Handles are plain indices into the graph arena: copying one never copies the
/// node, and two handles are the same graph element iff their indices are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in its graph arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Numeric exponent accepted by `pow`.
///
/// Integer exponents are evaluated with `powi`, real ones with `powf`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Exponent<T> {
    Int(i32),
    Real(T),
}

impl<T: ScalarNumeric> Exponent<T> {
    /// The exponent as a value of the graph's scalar type.
    pub fn value(self) -> T {
        match self {
            Exponent::Int(n) => <T as NumCast>::from(n).unwrap_or_else(T::nan),
            Exponent::Real(p) => p,
        }
    }

    pub(crate) fn validate(self) -> Result<Self, ScalarGradError> {
        match self {
            Exponent::Real(p) if !p.is_finite() => Err(ScalarGradError::InvalidExponent {
                exponent: p.to_f64_lossy(),
            }),
            _ => Ok(self),
        }
    }

    pub(crate) fn apply(self, base: T) -> T {
        match self {
            Exponent::Int(n) => base.powi(n),
            Exponent::Real(p) => base.powf(p),
        }
    }

    /// d/dx x^p = p * x^(p-1)
    pub(crate) fn derivative(self, base: T) -> T {
        match self {
            Exponent::Int(n) => self.value() * base.powi(n.saturating_sub(1)),
            Exponent::Real(p) => p * base.powf(p - T::one()),
        }
    }
}

macro_rules! impl_exponent_from {
    ($float:ty) => {
        impl From<i32> for Exponent<$float> {
            fn from(n: i32) -> Self {
                Exponent::Int(n)
            }
        }

        impl From<$float> for Exponent<$float> {
            fn from(p: $float) -> Self {
                Exponent::Real(p)
            }
        }
    };
}

impl_exponent_from!(f32);
impl_exponent_from!(f64);

/// The operation that produced a node, together with its operand handles.
///
/// The backward pass dispatches on this tag; each variant stores exactly what
/// its local derivative needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op<T> {
    Leaf,
    Add(NodeId, NodeId),
    Mul(NodeId, NodeId),
    Pow(NodeId, Exponent<T>),
    Exp(NodeId),
    Tanh(NodeId),
    Relu(NodeId),
}

impl<T> Op<T> {
    pub fn kind(&self) -> OpKind {
        match self {
            Op::Leaf => OpKind::Leaf,
            Op::Add(..) => OpKind::Add,
            Op::Mul(..) => OpKind::Mul,
            Op::Pow(..) => OpKind::Pow,
            Op::Exp(_) => OpKind::Exp,
            Op::Tanh(_) => OpKind::Tanh,
            Op::Relu(_) => OpKind::Relu,
        }
    }

    /// Operand handles in argument order. `mul(x, x)` yields `x` twice.
    pub fn operands(&self) -> Vec<NodeId> {
        match *self {
            Op::Leaf => Vec::new(),
            Op::Add(a, b) | Op::Mul(a, b) => vec![a, b],
            Op::Pow(a, _) | Op::Exp(a) | Op::Tanh(a) | Op::Relu(a) => vec![a],
        }
    }
}

/// Operation tag without operands, used for inspection and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Leaf,
    Add,
    Mul,
    Pow,
    Exp,
    Tanh,
    Relu,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            OpKind::Leaf => "leaf",
            OpKind::Add => "+",
            OpKind::Mul => "*",
            OpKind::Pow => "**",
            OpKind::Exp => "exp",
            OpKind::Tanh => "tanh",
            OpKind::Relu => "ReLU",
        };
        f.write_str(symbol)
    }
}

/// A single scalar in the arena: forward value, accumulated gradient and provenance.
#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    pub(crate) data: T,
    pub(crate) grad: T,
    pub(crate) op: Op<T>,
    pub(crate) label: Option<String>,
}

impl<T: ScalarNumeric> Node<T> {
    pub(crate) fn new(data: T, op: Op<T>) -> Self {
        Node {
            data,
            grad: T::zero(),
            op,
            label: None,
        }
    }
}
