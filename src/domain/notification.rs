use {
    super::error::HandlerError,
    super::payment::PaymentInfo,
    std::{future::Future, pin::Pin},
};

/// Caller logic run for every authenticated payment notification.
///
/// Returning an error answers the gateway with 500 and it will redeliver the
/// notification later, so implementations should be idempotent per payment id.
pub trait PaymentNotificationHandler: Send + Sync {
    fn handle_payment(
        &self,
        payment: PaymentInfo,
    ) -> Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send + '_>>;
}
