pub mod api_errors;
pub mod oplati_client;
pub mod webhook;
pub mod wire;
