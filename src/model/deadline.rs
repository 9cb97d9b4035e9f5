use std::{
    future::Future,
    time::{Duration, Instant},
};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline(Instant);

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("deadline exceeded")]
pub struct Expired;

impl Deadline {
    pub fn after(budget: Duration) -> Deadline {
        Deadline(Instant::now() + budget)
    }

    /// The tighter of this deadline and `budget` from now.
    pub fn child(&self, budget: Duration) -> Deadline {
        (*self).min(Deadline::after(budget))
    }

    pub fn remaining(&self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.0
    }

    pub async fn run<F, T, E>(&self, fut: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<Expired>,
    {
        match tokio::time::timeout_at(self.0.into(), fut).await {
            Ok(res) => res,
            Err(_) => Err(Expired.into()),
        }
    }
}
