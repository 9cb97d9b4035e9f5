use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::{env, include_bytes, path::Path, path::PathBuf, time::Duration};

#[derive(Clone, Deserialize)]
pub struct Conf {
    pub db_url: String,
    pub server: ServerConf,
    pub client: ClientConf,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ServerConf {
    pub address: String,
    pub port: u16,
    pub upstream_url: String,
    pub request_timeout_ms: u64,
    pub persist_timeout_ms: u64,
}

impl ServerConf {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Upper bound for the insert; the request deadline still applies on top of it.
    pub fn persist_timeout(&self) -> Duration {
        Duration::from_millis(self.persist_timeout_ms)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ClientConf {
    pub url: String,
    pub timeout_ms: u64,
    pub output_path: PathBuf,
    pub echo_body: bool,
}

impl ClientConf {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Conf {
    pub fn new() -> Result<Conf> {
        let default_conf = include_bytes!("../fxquote.conf");
        let default_conf = String::from_utf8_lossy(default_conf);

        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".into());
        let custom_conf_path = Path::new(&data_dir).join("fxquote.conf");

        let conf: Conf = Figment::new()
            .merge(Toml::string(&default_conf))
            .merge(Toml::file(custom_conf_path))
            .merge(Env::prefixed("FXQUOTE_").split("__"))
            .extract()?;

        Ok(conf)
    }
}
