use crate::{
    conf::ServerConf,
    db::init_schema,
    model::{Deadline, FetchError, Quote, UpstreamQuote},
    prepare,
    provider::Provider,
};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rocket::{
    fairing::AdHoc, get, http::ContentType, local::asynchronous::Client, routes, Build, Rocket,
    Shutdown,
};
use rusqlite::{functions::FunctionFlags, Connection};
use std::{
    net::TcpListener,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};
use tokio::{sync::oneshot, time::sleep};

static COUNTER: AtomicUsize = AtomicUsize::new(1);

pub const UPSTREAM_BODY: &str = r#"{
    "USDBRL": {
        "code": "USD",
        "codein": "BRL",
        "name": "Dólar Americano/Real Brasileiro",
        "high": "5.2612",
        "low": "5.2301",
        "varBid": "0.0021",
        "pctChange": "0.04",
        "bid": "5.2497",
        "ask": "5.2503",
        "timestamp": "1710536399",
        "create_date": "2024-03-15 17:59:59"
    }
}"#;

pub fn quote() -> Quote {
    let payload: UpstreamQuote = serde_json::from_str(UPSTREAM_BODY).unwrap();
    payload.usd_brl
}

fn db_url() -> String {
    let db_name = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("file::testdb_{}:?mode=memory&cache=shared", db_name)
}

/// Fresh shared in-memory database with the schema in place.
pub fn pool() -> Pool<SqliteConnectionManager> {
    pool_with(|_| Ok(()))
}

/// Like [`pool`], running `init` on every new connection.
pub fn pool_with<F>(init: F) -> Pool<SqliteConnectionManager>
where
    F: Fn(&mut Connection) -> rusqlite::Result<()> + Send + Sync + 'static,
{
    let manager = SqliteConnectionManager::file(db_url()).with_init(init);
    let pool = Pool::new(manager).unwrap();
    let conn = pool.get().unwrap();
    init_schema(&conn).unwrap();
    pool
}

/// Every insert into `rates` stalls for `stall` inside the statement.
pub fn slow_insert_pool(stall: Duration) -> Pool<SqliteConnectionManager> {
    let pool = pool_with(move |c| {
        c.create_scalar_function("stall", 0, FunctionFlags::SQLITE_UTF8, move |_| {
            thread::sleep(stall);
            Ok(0_i64)
        })
    });
    pool.get()
        .unwrap()
        .execute_batch("CREATE TRIGGER stall_insert AFTER INSERT ON rates BEGIN SELECT stall(); END;")
        .unwrap();
    pool
}

/// Every commit stalls for `stall` before it is applied, like a slow fsync.
pub fn slow_commit_pool(stall: Duration) -> Pool<SqliteConnectionManager> {
    pool_with(move |c| {
        c.commit_hook(Some(move || {
            thread::sleep(stall);
            false
        }));
        Ok(())
    })
}

pub fn count_rows(pool: &Pool<SqliteConnectionManager>) -> i64 {
    pool.get()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM rates", [], |row| row.get(0))
        .unwrap()
}

/// Budgets generous enough for unoptimized test builds.
pub fn server_conf() -> ServerConf {
    ServerConf {
        address: "127.0.0.1".into(),
        port: 0,
        upstream_url: "http://127.0.0.1:9/json/last/USD-BRL".into(),
        request_timeout_ms: 5_000,
        persist_timeout_ms: 2_000,
    }
}

#[derive(Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct StubProvider {
    quote: Option<Quote>,
    delay: Duration,
    calls: Calls,
}

impl StubProvider {
    pub fn ok(quote: Quote) -> StubProvider {
        StubProvider {
            quote: Some(quote),
            delay: Duration::ZERO,
            calls: Calls::default(),
        }
    }

    /// Behaves like an upstream answering with something that isn't JSON.
    pub fn failing() -> StubProvider {
        StubProvider {
            quote: None,
            delay: Duration::ZERO,
            calls: Calls::default(),
        }
    }

    pub fn slow(quote: Quote, delay: Duration) -> StubProvider {
        StubProvider {
            quote: Some(quote),
            delay,
            calls: Calls::default(),
        }
    }

    pub fn counter(&self) -> Calls {
        self.calls.clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[rocket::async_trait]
impl Provider for StubProvider {
    fn name(&self) -> String {
        "stub".into()
    }

    async fn fetch(&self, _deadline: Deadline) -> Result<Quote, FetchError> {
        self.calls.0.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        match &self.quote {
            Some(quote) => Ok(quote.clone()),
            None => Err(serde_json::from_str::<UpstreamQuote>("<html>")
                .unwrap_err()
                .into()),
        }
    }
}

fn figment() -> rocket::figment::Figment {
    rocket::Config::figment().merge(("log_level", "off"))
}

/// Local client for the quote server backed by `provider` and a fresh database.
pub async fn client(
    provider: StubProvider,
    conf: ServerConf,
) -> (Client, Pool<SqliteConnectionManager>) {
    let pool = pool();
    let rocket = prepare(
        rocket::custom(figment()),
        conf,
        Box::new(provider),
        pool.clone(),
    );
    (Client::tracked(rocket).await.unwrap(), pool)
}

/// Quote server over real HTTP, ready to be passed to [`serve`].
pub fn server(
    provider: Box<dyn Provider>,
    conf: ServerConf,
    pool: Pool<SqliteConnectionManager>,
) -> Rocket<Build> {
    prepare(rocket::custom(figment()), conf, provider, pool)
}

#[get("/json/last/USD-BRL")]
fn usd_brl() -> (ContentType, &'static str) {
    (ContentType::JSON, UPSTREAM_BODY)
}

#[get("/broken")]
fn broken() -> (ContentType, &'static str) {
    (ContentType::HTML, "<html>Service Unavailable</html>")
}

/// Stand-in for the upstream provider.
pub fn upstream() -> Rocket<Build> {
    rocket::custom(figment()).mount("/", routes![usd_brl, broken])
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Launches `rocket` on a free local port and waits until it accepts
/// connections. Returns its base URL.
pub async fn serve(rocket: Rocket<Build>) -> (String, Shutdown) {
    let port = free_port();
    let figment = rocket
        .figment()
        .clone()
        .merge(("address", "127.0.0.1"))
        .merge(("port", port));
    let (ready_tx, ready_rx) = oneshot::channel();

    let rocket = rocket
        .configure(figment)
        .attach(AdHoc::on_liftoff("Ready", move |_| {
            Box::pin(async move {
                let _ = ready_tx.send(());
            })
        }))
        .ignite()
        .await
        .unwrap();
    let shutdown = rocket.shutdown();

    rocket::tokio::spawn(rocket.launch());
    ready_rx.await.unwrap();

    (format!("http://127.0.0.1:{}", port), shutdown)
}
