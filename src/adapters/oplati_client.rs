use {
    crate::{
        adapters::wire::{self, NewPaymentResponse, PaymentInfoResponse},
        config::ClientConfig,
        domain::{
            error::{DecodeError, OplatiError, TransportError},
            id::PaymentId,
            payment::{CreatedPayment, NewPayment, PaymentInfo, PaymentReversal},
        },
    },
    reqwest::{Method, RequestBuilder, StatusCode, header::CONTENT_TYPE},
    serde::{Serialize, de::DeserializeOwned},
    std::{sync::Arc, time::Duration},
};

const REG_NUM_HEADER: &str = "RegNum";
const PASSWORD_HEADER: &str = "Password";

/// Client for the Oplati cashbox API.
///
/// Holds only immutable configuration; clones share the connection pool and
/// every call is an independent request/response exchange. Dropping a call's
/// future aborts the exchange.
#[derive(Clone)]
pub struct OplatiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    reg_num: Arc<str>,
    password: Arc<str>,
    timeout: Duration,
}

impl OplatiClient {
    pub fn new(config: ClientConfig) -> Result<Self, OplatiError> {
        config.validate()?;
        let http = match config.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(config.timeout)
                .build()
                .map_err(|e| OplatiError::Validation(format!("failed to build HTTP client: {e}")))?,
        };

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').into(),
            reg_num: config.reg_num.into(),
            password: config.password.into(),
            timeout: config.timeout,
        })
    }

    /// Creates a payment and returns its id with the URL the customer pays on.
    /// `POST /pos/webPayments/v2`.
    #[tracing::instrument(
        name = "oplati.create_payment",
        skip_all,
        fields(order_number = %payment.order_number())
    )]
    pub async fn create_payment(&self, payment: &NewPayment) -> Result<CreatedPayment, OplatiError> {
        let body = wire::new_payment_body(payment, &self.reg_num)?;
        let request = with_json(self.request(Method::POST, "/pos/webPayments/v2"), &body)?;

        let raw: NewPaymentResponse = self.execute(request).await?;
        let created = wire::decode_created(raw)?;
        tracing::debug!(payment_id = %created.payment_id, "payment created");
        Ok(created)
    }

    /// `GET /pos/payments/{id}`.
    #[tracing::instrument(name = "oplati.get_payment_info", skip(self))]
    pub async fn get_payment_info(&self, payment_id: PaymentId) -> Result<PaymentInfo, OplatiError> {
        let request = self.request(Method::GET, &format!("/pos/payments/{payment_id}"));

        let raw: PaymentInfoResponse = self.execute(request).await?;
        let info = wire::decode_record(raw)?;
        tracing::debug!(status = %info.status, "payment info received");
        Ok(info)
    }

    /// Fully or partially reverses a payment made within the gateway's allowed window.
    /// `POST /pos/payments/{id}/reversals`.
    #[tracing::instrument(
        name = "oplati.reverse_payment",
        skip(self, reversal),
        fields(order_number = %reversal.order_number())
    )]
    pub async fn reverse_payment(
        &self,
        payment_id: PaymentId,
        reversal: &PaymentReversal,
    ) -> Result<PaymentInfo, OplatiError> {
        let body = wire::reversal_body(reversal, &self.reg_num)?;
        let request = with_json(
            self.request(Method::POST, &format!("/pos/payments/{payment_id}/reversals")),
            &body,
        )?;

        let raw: PaymentInfoResponse = self.execute(request).await?;
        let info = wire::decode_record(raw)?;
        tracing::debug!(reversal_id = %info.id, status = %info.status, "payment reversed");
        Ok(info)
    }

    /// Payments of one cashier shift, for reconciling shift totals.
    /// `GET /pos/paymentReports?shift={shift}`. A shift without payments yields an empty list.
    #[tracing::instrument(name = "oplati.get_payments_on_shift", skip(self))]
    pub async fn get_payments_on_shift(&self, shift: &str) -> Result<Vec<PaymentInfo>, OplatiError> {
        if shift.is_empty() {
            return Err(OplatiError::Validation("shift must not be empty".into()));
        }
        let request = self
            .request(Method::GET, "/pos/paymentReports")
            .query(&[("shift", shift)]);

        let raw: Vec<PaymentInfoResponse> = self.execute(request).await?;
        let payments = raw
            .into_iter()
            .map(wire::decode_record)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(count = payments.len(), "shift report received");
        Ok(payments)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{path}", self.base_url))
            .header(REG_NUM_HEADER, &*self.reg_num)
            .header(PASSWORD_HEADER, &*self.password)
            .timeout(self.timeout)
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, OplatiError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "gateway request failed");
            TransportError::from(e)
        })?;

        let status = response.status();
        // Read to the end on every path, the connection is released afterwards.
        let body = response.bytes().await.map_err(TransportError::from)?;

        if status != StatusCode::OK {
            let err = wire::classify_error(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), error = %err, "gateway rejected request");
            return Err(err);
        }

        serde_json::from_slice(&body).map_err(|source| {
            DecodeError::Body {
                status: status.as_u16(),
                source,
            }
            .into()
        })
    }
}

fn with_json<T: Serialize>(request: RequestBuilder, body: &T) -> Result<RequestBuilder, OplatiError> {
    let bytes = serde_json::to_vec(body).map_err(TransportError::Encode)?;
    Ok(request.header(CONTENT_TYPE, "application/json").body(bytes))
}
