use ninaweb::config::Config;
use ninaweb::http::{Request, Response, StatusCode};
use ninaweb::router::Handler;
use ninaweb::server::{Server, ServerBuilder, listener};
use tracing_subscriber::EnvFilter;

/// `GET /ping`: answers "pong".
struct Ping;

impl Handler for Ping {
    fn handle(&self, _req: &Request, resp: &mut Response) -> bool {
        resp.set_status(StatusCode::Ok);
        resp.set_text("pong").is_ok()
    }
}

/// `POST /echo`: sends the request body back.
struct Echo;

impl Handler for Echo {
    fn handle(&self, req: &Request, resp: &mut Response) -> bool {
        resp.set_status(StatusCode::Ok);
        resp.set_body(req.body()).is_ok()
    }
}

/// `GET /headers`: lists the request headers, one per line.
struct HeaderList;

impl Handler for HeaderList {
    fn handle(&self, req: &Request, resp: &mut Response) -> bool {
        resp.set_status(StatusCode::Ok);
        if resp.append_header("Content-Type", "text/plain").is_err() {
            return false;
        }
        req.headers().iter().all(|h| {
            resp.extend_body(h.key().as_bytes()).is_ok()
                && resp.extend_body(b": ").is_ok()
                && resp.extend_body(h.val().as_bytes()).is_ok()
                && resp.extend_body(b"\n").is_ok()
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = Config::load()?;

    let server: Server<'static> = ServerBuilder::new(cfg.limits)
        .route("GET", "/ping", &Ping)
        .route("POST", "/echo", &Echo)
        .route("GET", "/headers", &HeaderList)
        .build();

    tokio::select! {
        res = listener::run(&server, &cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
