use crate::model::PersistenceError;
use serde::{Deserialize, Serialize};

/// One USD/BRL observation exactly as the upstream formats it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quote {
    pub code: String,
    #[serde(rename = "codein")]
    pub code_in: String,
    pub name: String,
    pub high: String,
    pub low: String,
    #[serde(rename = "varBid")]
    pub var_bid: String,
    #[serde(rename = "pctChange")]
    pub pct_change: String,
    pub bid: String,
    pub ask: String,
    pub timestamp: String,
    pub create_date: String,
}

impl Quote {
    /// Seconds since epoch; an absent timestamp counts as zero.
    pub fn timestamp_secs(&self) -> Result<i64, PersistenceError> {
        if self.timestamp.is_empty() {
            return Ok(0);
        }
        Ok(self.timestamp.parse::<i64>()?)
    }

    pub fn validate(&self) -> Result<(), PersistenceError> {
        let fields = [
            ("code", &self.code),
            ("codein", &self.code_in),
            ("name", &self.name),
            ("high", &self.high),
            ("low", &self.low),
            ("varBid", &self.var_bid),
            ("pctChange", &self.pct_change),
            ("bid", &self.bid),
            ("ask", &self.ask),
            ("create_date", &self.create_date),
        ];

        match fields.iter().find(|(_, value)| value.is_empty()) {
            Some((name, _)) => Err(PersistenceError::MissingField(*name)),
            None => Ok(()),
        }
    }
}

/// Envelope returned by the upstream provider.
#[derive(Debug, Deserialize)]
pub struct UpstreamQuote {
    #[serde(rename = "USDBRL")]
    pub usd_brl: Quote,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct BidView {
    pub bid: String,
}

impl From<Quote> for BidView {
    fn from(quote: Quote) -> BidView {
        BidView { bid: quote.bid }
    }
}
