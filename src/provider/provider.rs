use crate::model::{Deadline, FetchError, Quote};

/// Source of the latest quote.
#[rocket::async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> String;

    /// Fetches one fresh quote. Implementations must give up once `deadline`
    /// passes; callers additionally drop the future at that point.
    async fn fetch(&self, deadline: Deadline) -> Result<Quote, FetchError>;
}
