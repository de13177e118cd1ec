use std::net::TcpListener;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::http::header;
use actix_web::http::header::HeaderValue;
use actix_web::http::Method;
use actix_web::web;
use actix_web::App;
use actix_web::HttpServer;
use tracing_actix_web::TracingLogger;

use crate::configuration::Settings;
use crate::relay::ContactRelay;
use crate::routes::contact;
use crate::routes::health_check;
use crate::routes::home;
use crate::routes::json_error_handler;

/// Wrapper for actix's `Server` with access to the bound port. Not to be
/// confused with actix's `App`!
pub struct Application {
    /// Left private; use `get_port` to access
    port: u16,
    server: Server,
}

impl Application {
    /// Bind the listener and build the relay (and its transport) from `cfg`.
    /// Misconfiguration surfaces here, before any request is accepted.
    pub async fn build(cfg: Settings) -> Result<Self, anyhow::Error> {
        let addr = format!("{}:{}", cfg.application.host, cfg.application.port);
        let listener = TcpListener::bind(addr)?;

        // with port 0, the OS picks the port; remember which one it was
        let port = listener.local_addr()?.port();

        let relay = cfg.mail.relay()?;
        let server = run(listener, relay, cfg.application.allowed_origins)?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 { self.port }

    /// Because this consumes `self`, this should be the final function call (or
    /// passed to `tokio::spawn`)
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> { self.server.await }
}

/// The server is not responsible for binding to an address, it only listens to
/// an already bound address.
///
/// Declares all API endpoints.
pub fn run(
    listener: TcpListener,
    relay: ContactRelay,
    allowed_origins: Vec<String>,
) -> Result<Server, anyhow::Error> {
    check_origins(&allowed_origins)?;

    // `Data` is an `Arc`; every worker gets a handle to the same relay
    let relay = web::Data::new(relay);

    // the closure runs once per worker, hence the clones
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors(&allowed_origins))
            .route("/", web::get().to(home))
            .route("/health_check", web::get().to(health_check))
            .service(
                web::scope("/api").route("/contact", web::post().to(contact)),
            )
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(relay.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

/// `Cors::allowed_origin` panics on `*`, and a malformed value only fails the
/// worker's app factory; report either before the server starts.
fn check_origins(origins: &[String]) -> Result<(), anyhow::Error> {
    for origin in origins {
        if origin == "*" {
            anyhow::bail!("use an empty `allowed_origins` list to allow any origin");
        }
        HeaderValue::from_str(origin)
            .map_err(|e| anyhow::anyhow!("invalid origin {origin:?}: {e}"))?;
    }
    Ok(())
}

/// Browsers only need to `POST` JSON (and `GET` the banner). An empty origin
/// list means any site may call the API.
fn cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods([Method::GET, Method::POST])
        .allowed_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(86400);
    match origins.is_empty() {
        true => cors.allow_any_origin(),
        false => origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin)),
    }
}
