mod client;
mod conf;
mod controller;
mod db;
mod model;
mod provider;
mod repository;
mod service;
#[cfg(test)]
mod test;

use anyhow::{anyhow, Result};
use conf::{Conf, ServerConf};
use model::ApiError;
use provider::{AwesomeApi, Provider};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use repository::QuoteRepository;
use rocket::{catch, catchers, http::Status, routes, Build, Request, Rocket};
use std::{env, process::exit};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[rocket::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("serve");

    let res = match command {
        "serve" => serve().await,
        "client" => client::cli().await,
        _ => Err(anyhow!("Unknown command: {}", command)),
    };

    if let Err(e) = res {
        error!(%command, "{:#}", e);
        exit(1);
    }
}

async fn serve() -> Result<()> {
    let conf = Conf::new()?;
    let pool = db::pool(&conf.db_url)?;
    let conn = pool.get()?;
    db::init_schema(&conn)?;
    drop(conn);

    let figment = rocket::Config::figment()
        .merge(("address", &conf.server.address))
        .merge(("port", conf.server.port));
    let provider = AwesomeApi::new(&conf.server.upstream_url);
    let rocket = prepare(rocket::custom(figment), conf.server, Box::new(provider), pool);

    rocket.launch().await.map_err(|e| anyhow!("{}", e))?;
    Ok(())
}

pub fn prepare(
    rocket: Rocket<Build>,
    conf: ServerConf,
    provider: Box<dyn Provider>,
    pool: Pool<SqliteConnectionManager>,
) -> Rocket<Build> {
    rocket
        .mount(
            "/",
            routes![controller::quote::get, controller::quote::get_legacy],
        )
        .register("/", catchers![default_catcher])
        .manage(conf)
        .manage(provider)
        .manage(QuoteRepository::new(pool))
}

#[catch(default)]
fn default_catcher(status: Status, req: &Request) -> ApiError {
    ApiError::custom(status.code, &format!("Failed to handle URI {}", req.uri()))
}
