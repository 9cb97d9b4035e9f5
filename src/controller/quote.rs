use crate::{
    conf::ServerConf,
    model::{ApiResult, BidView, Deadline},
    provider::Provider,
    repository::QuoteRepository,
    service::quote,
};
use rocket::{get, State};
use std::time::Instant;
use tracing::{info, warn};

#[get("/quote")]
pub async fn get(
    conf: &State<ServerConf>,
    provider: &State<Box<dyn Provider>>,
    repo: &State<QuoteRepository>,
) -> ApiResult<BidView> {
    handle(conf, provider.inner().as_ref(), repo).await
}

/// Path used by older clients.
#[get("/cotacao")]
pub async fn get_legacy(
    conf: &State<ServerConf>,
    provider: &State<Box<dyn Provider>>,
    repo: &State<QuoteRepository>,
) -> ApiResult<BidView> {
    handle(conf, provider.inner().as_ref(), repo).await
}

async fn handle(
    conf: &ServerConf,
    provider: &dyn Provider,
    repo: &QuoteRepository,
) -> ApiResult<BidView> {
    let started = Instant::now();
    let deadline = Deadline::after(conf.request_timeout());
    info!(budget_ms = conf.request_timeout_ms, "Request started");

    let res = quote::refresh(provider, repo, deadline, conf.persist_timeout()).await;

    let elapsed = started.elapsed();
    match &res {
        Ok(_) => info!(?elapsed, "Request finished"),
        Err(e) => warn!(?elapsed, %e, "Request failed"),
    }

    ApiResult::new(res.map(BidView::from))
}
