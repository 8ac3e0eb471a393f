//! Activation functions for recurrent gates

use num_traits::Float;

/// Logistic function, `1 / (1 + e^-x)`
#[inline]
pub fn sigmoid<T: Float>(x: T) -> T {
    T::one() / (T::one() + (-x).exp())
}

/// Hyperbolic tangent
#[inline]
pub fn tanh<T: Float>(x: T) -> T {
    x.tanh()
}
