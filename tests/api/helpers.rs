use once_cell::sync::Lazy;
use portfolio_relay::configuration::get_configuration;
use portfolio_relay::configuration::ApiSettings;
use portfolio_relay::configuration::TransportSettings;
use portfolio_relay::startup::Application;
use portfolio_relay::telemetry::get_subscriber;
use portfolio_relay::telemetry::init_subscriber;
use secrecy::Secret;
use wiremock::MockServer;

/// Init the tracing subscriber once only.
///
/// To opt in to verbose logging, use the env var `TEST_LOG`:
///
/// ```sh
///      TEST_LOG=true cargo test [test_name] | bunyan
/// ```
static TRACING: Lazy<()> = Lazy::new(|| {
    // the two sinks are different closure types, hence the match arms
    match std::env::var("TEST_LOG") {
        Ok(_) => init_subscriber(get_subscriber("test", "debug", std::io::stdout)),
        Err(_) => init_subscriber(get_subscriber("test", "debug", std::io::sink)),
    };
});

pub const SERVER_TOKEN: &str = "test-server-token";
pub const ALLOWED_ORIGIN: &str = "https://portfolio.example.com";

pub struct TestApp {
    pub addr: String,
    /// Stands in for the email provider's HTTP API
    pub email_server: MockServer,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn post_contact(
        &self,
        body: &serde_json::Value,
    ) -> reqwest::Response {
        self.client
            .post(format!("{}/api/contact", self.addr))
            .json(body)
            .send()
            .await
            .expect("execute request")
    }

    pub async fn post_contact_raw(
        &self,
        body: &'static str,
    ) -> reqwest::Response {
        self.client
            .post(format!("{}/api/contact", self.addr))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("execute request")
    }

    pub async fn get(
        &self,
        path: &str,
    ) -> reqwest::Response {
        self.client
            .get(format!("{}{path}", self.addr))
            .send()
            .await
            .expect("execute request")
    }

    /// JSON bodies of every request the mock provider received
    pub async fn sent_emails(&self) -> Vec<serde_json::Value> {
        self.email_server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }
}

/// Spawn the app on a random port, with the API transport pointed at a fresh
/// `MockServer`.
pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let email_server = MockServer::start().await;

    let cfg = {
        let mut cfg = get_configuration().expect("read configuration");
        cfg.application.host = "127.0.0.1".to_string();
        // port 0 is reserved by the OS; the server will be spawned on a random
        // available port
        cfg.application.port = 0;
        cfg.application.allowed_origins = vec![ALLOWED_ORIGIN.to_string()];
        cfg.mail.timeout_milliseconds = 2000;
        cfg.mail.transport = TransportSettings::Api(ApiSettings {
            base_url: email_server.uri(),
            authorization_token: Secret::new(SERVER_TOKEN.to_string()),
        });
        cfg
    };

    let app = Application::build(cfg).await.expect("build application");
    let addr = format!("http://127.0.0.1:{}", app.get_port());
    tokio::spawn(app.run_until_stopped());

    TestApp {
        addr,
        email_server,
        client: reqwest::Client::new(),
    }
}
