use {
    crate::{
        AppState,
        adapters::{
            api_errors::ApiError,
            wire::{self, PaymentInfoResponse},
        },
        domain::{
            error::{DecodeError, OplatiError, WebhookError},
            notification::PaymentNotificationHandler,
            payment::PaymentInfo,
        },
    },
    axum::{
        body::Body,
        extract::State,
        http::{HeaderMap, HeaderValue, StatusCode},
    },
    base64::{Engine, engine::general_purpose::STANDARD},
    rsa::{Pkcs1v15Sign, RsaPublicKey, pkcs8::DecodePublicKey},
    sha2::{Digest, Sha256},
    std::sync::Arc,
};

pub const SIGNATURE_HEADER: &str = "Server-Sign";

/// Notifications are single payment records, well under this.
pub const MAX_NOTIFICATION_BYTES: usize = 64 * 1024;

/// Authenticates payment notifications and hands them to caller logic.
///
/// Stateless between deliveries: the key and handler are read-only, so one
/// instance serves concurrent requests.
pub struct NotificationVerifier {
    public_key: RsaPublicKey,
    handler: Arc<dyn PaymentNotificationHandler>,
}

impl NotificationVerifier {
    /// `public_key` is the base64 DER (SubjectPublicKeyInfo) RSA key issued in
    /// the Oplati business cabinet.
    pub fn new(
        public_key: &str,
        handler: Arc<dyn PaymentNotificationHandler>,
    ) -> Result<Self, OplatiError> {
        // Keys copied from the business cabinet are often line-wrapped.
        let compact: String = public_key.split_ascii_whitespace().collect();
        let der = STANDARD.decode(compact).map_err(|e| {
            OplatiError::Validation(format!("public key base64 decoding failed: {e}"))
        })?;
        let public_key = RsaPublicKey::from_public_key_der(&der)
            .map_err(|e| OplatiError::Validation(format!("public key parsing failed: {e}")))?;

        Ok(Self {
            public_key,
            handler,
        })
    }

    /// RSASSA-PKCS1-v1_5 over the SHA-256 digest of the raw body.
    pub fn verify(&self, signature: &[u8], body: &[u8]) -> Result<(), WebhookError> {
        let digest = Sha256::digest(body);
        self.public_key
            .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, signature)
            .map_err(|e| WebhookError::Authentication(format!("signature verification failed: {e}")))
    }

    pub async fn dispatch(&self, payment: PaymentInfo) -> Result<(), WebhookError> {
        self.handler
            .handle_payment(payment)
            .await
            .map_err(WebhookError::Handler)
    }

    /// Verify, decode, dispatch. The body is not parsed unless the signature holds.
    pub async fn process(&self, signature: &[u8], body: &[u8]) -> Result<PaymentInfo, WebhookError> {
        self.verify(signature, body)?;
        let payment = decode_notification(body)?;

        tracing::Span::current()
            .record("payment_id", tracing::field::display(payment.id))
            .record("status", tracing::field::display(payment.status));

        self.dispatch(payment.clone()).await?;
        Ok(payment)
    }
}

/// Decodes the base64 `Server-Sign` header value. A missing header is an empty signature.
pub fn decode_signature(header: Option<&HeaderValue>) -> Result<Vec<u8>, WebhookError> {
    let raw = header.map(HeaderValue::as_bytes).unwrap_or_default();
    STANDARD
        .decode(raw)
        .map_err(|e| WebhookError::Authentication(format!("bad {SIGNATURE_HEADER} header: {e}")))
}

pub fn decode_notification(body: &[u8]) -> Result<PaymentInfo, DecodeError> {
    let raw: PaymentInfoResponse = serde_json::from_slice(body).map_err(DecodeError::Payload)?;
    wire::decode_record(raw)
}

/// `POST` endpoint for gateway notifications: 200 on success, 401 when the
/// signature is not authentic, 400 for an authentic but malformed record, 500
/// when the handler fails (the gateway redelivers).
#[tracing::instrument(
    name = "oplati.notification",
    skip_all,
    fields(payment_id = tracing::field::Empty, status = tracing::field::Empty)
)]
pub async fn notification_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Result<StatusCode, ApiError> {
    let signature = decode_signature(headers.get(SIGNATURE_HEADER))?;

    // Authenticity is unknown at this point, so a broken body is an auth failure.
    let body = axum::body::to_bytes(body, MAX_NOTIFICATION_BYTES)
        .await
        .map_err(|e| WebhookError::Authentication(format!("reading body failed: {e}")))?;

    let payment = state.notifications.process(&signature, &body).await?;
    tracing::info!(order_number = %payment.order_number, "payment notification handled");
    Ok(StatusCode::OK)
}
