use openforms_mock::{Form, MockState, API_PREFIX};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "openforms_mock=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let token = std::env::var("MOCK_API_TOKEN").unwrap_or_else(|_| "hush-hush".to_string());
    let addr = format!("127.0.0.1:{port}");

    let state = MockState::new(&token).with_forms(vec![
        Form::new("contact", "Contact"),
        Form::new("appointment", "Make an appointment"),
        Form::new("complaint", "Submit a complaint"),
    ]);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(api_root = %format!("http://{addr}{API_PREFIX}/"), "mock Open Forms API listening");
    openforms_mock::run(listener, state).await
}
