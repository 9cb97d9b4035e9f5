use crate::{
    model::{Deadline, Quote, QuoteError},
    provider::Provider,
    repository::QuoteRepository,
};
use std::time::Duration;
use tracing::debug;

/// Fetches a fresh quote and stores it, all within `deadline`.
pub async fn refresh(
    provider: &dyn Provider,
    repo: &QuoteRepository,
    deadline: Deadline,
    persist_budget: Duration,
) -> Result<Quote, QuoteError> {
    if deadline.is_expired() {
        return Err(QuoteError::DeadlineExceeded);
    }

    let quote = deadline.run(provider.fetch(deadline)).await?;
    debug!(provider = %provider.name(), bid = %quote.bid, "Fetched quote");

    repo.insert(&quote, deadline.child(persist_budget)).await?;
    Ok(quote)
}
