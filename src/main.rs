use std::net::SocketAddr;
use std::time::Duration;

use exam_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    services::notification_service::NotificationService,
    AppState,
};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    // Invitation mail leaves through the outbox; one worker drains it
    // so request handlers never wait on the mail gateway.
    {
        let state = app_state.clone();
        tokio::spawn(async move {
            let notif =
                NotificationService::new(state.pool.clone(), get_config().mail_webhook_url.clone());
            loop {
                match notif.run_once().await {
                    Ok(true) => {}
                    Ok(false) => {
                        tokio::time::sleep(Duration::from_millis(1000)).await;
                    }
                    Err(e) => {
                        tracing::error!(error = ?e, "Invitation outbox worker error");
                        tokio::time::sleep(Duration::from_secs(2)).await;
                    }
                }
            }
        });
    }

    let app = exam_backend::app(app_state);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
