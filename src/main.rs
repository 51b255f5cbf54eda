use {
    axum::{
        Router,
        routing::{get, post},
    },
    oplati_acquiring::{
        AppState, ClientConfig, OplatiClient,
        adapters::webhook::{NotificationVerifier, notification_handler},
        domain::{
            error::HandlerError, notification::PaymentNotificationHandler, payment::PaymentInfo,
        },
    },
    std::{env, future::Future, pin::Pin, sync::Arc, time::Duration},
    tokio::signal,
    tower::ServiceBuilder,
    tower_http::{timeout::TimeoutLayer, trace::TraceLayer},
};

/// Re-reads every notified payment from the gateway before trusting its status.
struct ConfirmingHandler {
    client: OplatiClient,
}

impl PaymentNotificationHandler for ConfirmingHandler {
    fn handle_payment(
        &self,
        payment: PaymentInfo,
    ) -> Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send + '_>> {
        Box::pin(async move {
            let confirmed = self.client.get_payment_info(payment.id).await?;
            if confirmed.status != payment.status {
                tracing::warn!(
                    payment_id = %payment.id,
                    notified = %payment.status,
                    confirmed = %confirmed.status,
                    "notification status differs from gateway state"
                );
            }
            tracing::info!(
                payment_id = %confirmed.id,
                order_number = %confirmed.order_number,
                amount = %confirmed.amount,
                status = %confirmed.status,
                "payment confirmed"
            );
            Ok::<(), HandlerError>(())
        })
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();
    let config = ClientConfig::from_env().expect("invalid gateway configuration");
    let public_key = env::var("OPLATI_PUBLIC_KEY").expect("OPLATI_PUBLIC_KEY must be set");
    let listen_addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let client = OplatiClient::new(config).expect("failed to build gateway client");
    let verifier = NotificationVerifier::new(&public_key, Arc::new(ConfirmingHandler { client }))
        .expect("invalid OPLATI_PUBLIC_KEY");

    let state = AppState {
        notifications: Arc::new(verifier),
    };

    let app = Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/notifications", post(notification_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(60))),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .expect("failed to bind listener");
    tracing::info!("listening on {listen_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl+c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
