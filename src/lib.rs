//! Client SDK for the Oplati wallet payment gateway: payment creation, status
//! queries, reversals, shift reports and signed payment notifications.

pub mod adapters;
pub mod config;
pub mod domain;

use {adapters::webhook::NotificationVerifier, std::sync::Arc};

pub use adapters::oplati_client::OplatiClient;
pub use config::ClientConfig;
pub use domain::error::{DecodeError, GatewayError, OplatiError, TransportError, WebhookError};

#[derive(Clone)]
pub struct AppState {
    pub notifications: Arc<NotificationVerifier>,
}
