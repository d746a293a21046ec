//! Gaussian sampling and the simulated counterparty.

use derive_new::new;
use rand::Rng;
use rand::rngs::ThreadRng;
use tracing::{instrument, trace};

use crate::Difficulty;

/// Draws a normal random variable with the given mean and standard deviation
/// using the Marsaglia polar method.
///
/// Pairs of uniforms in `[-1, 1]` are rejected until they fall strictly inside
/// the unit circle (and not on the origin).
pub fn polar_sample<R: Rng + ?Sized>(rng: &mut R, mean: f64, sd: f64) -> f64 {
    loop {
        let x = rng.random::<f64>() * 2.0 - 1.0;
        let y = rng.random::<f64>() * 2.0 - 1.0;
        let s = x * x + y * y;
        if s > 0.0 && s < 1.0 {
            return mean + sd * y * (-2.0 * s.ln() / s).sqrt();
        }
    }
}

/// Source of the counterparty's private valuation for a round.
pub trait Counterparty {
    /// Returns the price at which the counterparty is indifferent to trading,
    /// given the prompt's true answer and the current difficulty.
    fn valuation(&mut self, answer: f64, difficulty: Difficulty) -> f64;
}

/// Counterparty whose valuation is normal with mean `answer` and standard
/// deviation `answer * difficulty`.
#[derive(Debug, Clone)]
pub struct GaussianCounterparty<R = ThreadRng> {
    rng: R,
}

impl GaussianCounterparty<ThreadRng> {
    /// Creates a counterparty backed by the thread-local generator.
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for GaussianCounterparty<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> GaussianCounterparty<R> {
    /// Creates a counterparty backed by a caller-supplied generator.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Counterparty for GaussianCounterparty<R> {
    #[instrument(skip(self), fields(difficulty = difficulty.value()))]
    fn valuation(&mut self, answer: f64, difficulty: Difficulty) -> f64 {
        let preference = polar_sample(&mut self.rng, answer, answer * difficulty.value());
        trace!(preference, "Drew counterparty valuation");
        preference
    }
}

/// Counterparty that always values the unit at the same price.
#[derive(Debug, Clone, Copy, PartialEq, new)]
pub struct FixedValuation {
    price: f64,
}

impl Counterparty for FixedValuation {
    fn valuation(&mut self, _answer: f64, _difficulty: Difficulty) -> f64 {
        self.price
    }
}
