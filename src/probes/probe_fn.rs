//! # Function-backed probe (`ProbeFn`)
//!
//! [`ProbeFn`] wraps a closure `F: Fn() -> Fut`, producing a fresh future per
//! poll. Shared state, if any, lives inside the closure behind an explicit
//! `Arc`.
//!
//! ## Example
//! ```rust
//! use checkvisor::{Liveness, ProbeFn, ProbeRef};
//!
//! let p: ProbeRef = ProbeFn::arc("mutexes", || async { true });
//! assert_eq!(p.name(), "mutexes");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::probes::probe::Liveness;

/// Function-backed probe implementation.
///
/// Wraps a closure that *creates* a new future per poll.
#[derive(Debug)]
pub struct ProbeFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ProbeFn<F> {
    /// Creates a new function-backed probe.
    ///
    /// Prefer [`ProbeFn::arc`] when you immediately need a [`ProbeRef`](crate::ProbeRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the probe and returns it as a shared handle (`Arc<dyn Liveness>`).
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Liveness for ProbeFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = bool> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn is_running(&self) -> bool {
        (self.f)().await
    }
}
