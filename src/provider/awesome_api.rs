use crate::{
    model::{Deadline, FetchError, Quote, UpstreamQuote},
    provider::Provider,
};
use reqwest::Client;
use tracing::debug;

/// USD/BRL quotes from economia.awesomeapi.com.br.
pub struct AwesomeApi {
    url: String,
    client: Client,
}

impl AwesomeApi {
    pub fn new(url: &str) -> AwesomeApi {
        AwesomeApi {
            url: url.to_string(),
            client: Client::new(),
        }
    }
}

#[rocket::async_trait]
impl Provider for AwesomeApi {
    fn name(&self) -> String {
        "awesomeapi".into()
    }

    async fn fetch(&self, deadline: Deadline) -> Result<Quote, FetchError> {
        debug!(provider = %self.name(), url = %self.url, "Fetching quote");
        let res = self
            .client
            .get(&self.url)
            .timeout(deadline.remaining())
            .send()
            .await?;
        let body = res.bytes().await?;
        let payload: UpstreamQuote = serde_json::from_slice(&body)?;
        Ok(payload.usd_brl)
    }
}
