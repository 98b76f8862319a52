use mock_server::Account;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let mut account = Account::default();
    if let Ok(email) = std::env::var("SPINCHIMP_EMAIL") {
        account.email = email;
    }
    if let Ok(apikey) = std::env::var("SPINCHIMP_APIKEY") {
        account.apikey = apikey;
    }

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, email = %account.email, "listening");
    mock_server::run_with_account(listener, account).await
}
