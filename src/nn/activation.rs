//! Sigmoid activation with overflow protection
//!
//! Inputs are clipped to [-500, 500] before exponentiation so the
//! activation never produces NaN or infinity, whatever the magnitude of
//! the weighted sum. Clipping is a correctness requirement here, not an
//! optimization.

const CLIP: f64 = 500.0;

/// Numerically stable sigmoid.
///
/// Uses `exp(z) / (1 + exp(z))` on the negative branch so the exponent
/// never grows without bound.
pub fn sigmoid(z: f64) -> f64 {
    let z = z.clamp(-CLIP, CLIP);
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Derivative of the sigmoid: s(z) * (1 - s(z))
pub fn sigmoid_prime(z: f64) -> f64 {
    let s = sigmoid(z);
    s * (1.0 - s)
}
