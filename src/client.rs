//! One-shot client: asks the quote server for the current bid and writes it
//! to a local file.

use crate::{
    conf::{ClientConf, Conf},
    model::{ClientError, Deadline},
};
use anyhow::Result;
use std::{collections::HashMap, io::Write};
use tokio::fs;
use tracing::{info, warn};

pub async fn cli() -> Result<()> {
    let conf = Conf::new()?;
    run(&conf.client).await?;
    Ok(())
}

/// Returns the line written to `conf.output_path`.
pub async fn run(conf: &ClientConf) -> Result<String, ClientError> {
    let deadline = Deadline::after(conf.timeout());
    info!(url = %conf.url, timeout_ms = conf.timeout_ms, "Requesting quote");

    let body = deadline.run(request(&conf.url, deadline)).await?;

    if conf.echo_body {
        let mut stdout = std::io::stdout();
        stdout.write_all(&body)?;
        stdout.flush()?;
    }

    let line = render(&body)?;

    if let Some(parent) = conf.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::write(&conf.output_path, &line).await?;
    info!(path = %conf.output_path.display(), %line, "Quote saved");

    Ok(line)
}

async fn request(url: &str, deadline: Deadline) -> Result<Vec<u8>, ClientError> {
    let res = reqwest::Client::new()
        .get(url)
        .timeout(deadline.remaining())
        .send()
        .await?;

    if !res.status().is_success() {
        warn!(status = %res.status(), "Quote server returned an error status");
    }

    Ok(res.bytes().await?.to_vec())
}

/// Formats a server response body; a body without `bid` renders an empty value.
pub fn render(body: &[u8]) -> Result<String, ClientError> {
    let fields: HashMap<String, String> = serde_json::from_slice(body)?;
    let bid = fields.get("bid").map(String::as_str).unwrap_or_default();
    Ok(format!("Dólar: {}", bid))
}
