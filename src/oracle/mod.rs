//! Outcome oracles: how a candidate gets judged.
//!
//! The search engine only knows the [`Oracle`] trait, which cannot fail: a
//! candidate that could not be evaluated is reported as [`Outcome::Unknown`].
//! Real evaluators (switching a toolchain, running a script) fail in many
//! ways, so they implement the fallible [`Probe`] trait instead and are handed
//! to the engine wrapped in [`Guarded`], which turns every error into
//! `Unknown`.
//!
//! # Example (scripted oracle for testing)
//!
//! ```
//! use canary_bisect::oracle::from_fn;
//! use canary_bisect::search::least_satisfying;
//! use canary_bisect::types::Outcome;
//!
//! # tokio_test_block_on(async {
//! let candidates: Vec<u32> = (0..8).collect();
//! let mut oracle = from_fn(|c: &u32, _hint| {
//!     if *c >= 5 { Outcome::Satisfies } else { Outcome::DoesNotSatisfy }
//! });
//! let bisection = least_satisfying(&candidates, &mut oracle).await.unwrap();
//! assert_eq!(bisection.index, 5);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod config;
pub mod script;

use std::fmt;
use std::future::{self, Future};

use crate::search::ProgressHint;
use crate::types::Outcome;

pub use config::OracleConfig;
pub use script::{ScriptError, ScriptOracle};

/// Judges candidates for the search engine.
///
/// Implementations may take arbitrarily long; the engine waits for each call
/// before choosing the next candidate.
pub trait Oracle<C: ?Sized> {
    /// Evaluates `candidate`. `hint` describes the remaining work and is only
    /// meant for progress display.
    fn evaluate(&mut self, candidate: &C, hint: ProgressHint)
    -> impl Future<Output = Outcome> + Send;
}

/// A fallible evaluator. Wrap in [`Guarded`] to use it as an [`Oracle`].
pub trait Probe<C: ?Sized> {
    /// The error type returned by this probe.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Evaluates `candidate`, reporting infrastructure failures as errors.
    fn probe(
        &mut self,
        candidate: &C,
        hint: ProgressHint,
    ) -> impl Future<Output = Result<Outcome, Self::Error>> + Send;
}

/// Adapts a [`Probe`] into an [`Oracle`] by mapping every error to `Unknown`.
#[derive(Debug, Clone)]
pub struct Guarded<P> {
    inner: P,
}

impl<P> Guarded<P> {
    pub fn new(inner: P) -> Self {
        Guarded { inner }
    }
}

impl<C, P> Oracle<C> for Guarded<P>
where
    C: fmt::Display + Sync + ?Sized,
    P: Probe<C> + Send,
{
    async fn evaluate(&mut self, candidate: &C, hint: ProgressHint) -> Outcome {
        match self.inner.probe(candidate, hint).await {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::warn!(
                    candidate = %candidate,
                    error = %error,
                    "could not evaluate candidate, skipping"
                );
                Outcome::Unknown
            }
        }
    }
}

/// An oracle backed by a synchronous closure.
#[derive(Debug, Clone)]
pub struct FnOracle<F>(F);

/// Creates an [`Oracle`] from a closure.
pub fn from_fn<C, F>(f: F) -> FnOracle<F>
where
    C: ?Sized,
    F: FnMut(&C, ProgressHint) -> Outcome + Send,
{
    FnOracle(f)
}

impl<C, F> Oracle<C> for FnOracle<F>
where
    C: ?Sized,
    F: FnMut(&C, ProgressHint) -> Outcome + Send,
{
    fn evaluate(
        &mut self,
        candidate: &C,
        hint: ProgressHint,
    ) -> impl Future<Output = Outcome> + Send {
        future::ready((self.0)(candidate, hint))
    }
}

/// A probe backed by a synchronous fallible closure.
#[derive(Debug, Clone)]
pub struct FnProbe<F>(F);

/// Creates a [`Probe`] from a closure.
pub fn probe_fn<C, E, F>(f: F) -> FnProbe<F>
where
    C: ?Sized,
    E: std::error::Error + Send + Sync + 'static,
    F: FnMut(&C, ProgressHint) -> Result<Outcome, E> + Send,
{
    FnProbe(f)
}

impl<C, E, F> Probe<C> for FnProbe<F>
where
    C: ?Sized,
    E: std::error::Error + Send + Sync + 'static,
    F: FnMut(&C, ProgressHint) -> Result<Outcome, E> + Send,
{
    type Error = E;

    fn probe(
        &mut self,
        candidate: &C,
        hint: ProgressHint,
    ) -> impl Future<Output = Result<Outcome, E>> + Send {
        future::ready((self.0)(candidate, hint))
    }
}
