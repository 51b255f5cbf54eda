#![allow(dead_code)]

use base64::{Engine, engine::general_purpose::STANDARD};
use oplati_acquiring::domain::error::HandlerError;
use oplati_acquiring::domain::money::MoneyAmount;
use oplati_acquiring::domain::notification::PaymentNotificationHandler;
use oplati_acquiring::domain::payment::{
    NewPayment, NewPaymentParams, PaymentInfo, PaymentItem, PaymentItemKind,
};
use oplati_acquiring::{ClientConfig, OplatiClient};
use rsa::pkcs8::{DecodePrivateKey, EncodePublicKey};
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

pub const REG_NUM: &str = "OPL000011111";
pub const PASSWORD: &str = "1111";

/// SubjectPublicKeyInfo of an Ed25519 key: valid base64 and DER, wrong scheme.
pub const ED25519_PUBLIC_KEY: &str = "MCowBQYDK2VwAyEAxe2xZNJ1TGObt91nOjJ1gPYY0t2StSuLs7QRBMgux3A=";

const PRIVATE_KEY_PEM: &str = include_str!("../fixtures/notification_key.pem");

// ── Signing ────────────────────────────────────────────────────────────────

pub fn private_key() -> RsaPrivateKey {
    RsaPrivateKey::from_pkcs8_pem(PRIVATE_KEY_PEM).expect("bad test key fixture")
}

/// Base64 DER public key, in the form the business cabinet hands out.
pub fn public_key_base64() -> String {
    let der = RsaPublicKey::from(&private_key())
        .to_public_key_der()
        .expect("public key encoding failed");
    STANDARD.encode(der.as_bytes())
}

/// `Server-Sign` value for `body`, as the gateway computes it.
pub fn sign(body: &[u8]) -> String {
    let digest = Sha256::digest(body);
    let signature = private_key()
        .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
        .expect("signing failed");
    STANDARD.encode(signature)
}

// ── Payloads ───────────────────────────────────────────────────────────────

pub fn payment_record_json(payment_id: i64, status: i32) -> serde_json::Value {
    serde_json::json!({
        "paymentId": payment_id,
        "paymentType": 1,
        "sum": 64.98,
        "status": status,
        "createdDate": "2024-03-01T10:15:30+03:00",
        "paidDate": "2024-03-01T10:16:02+03:00",
        "orderNumber": "AA-1111",
        "pursePublicId": "PURSE-42"
    })
}

pub fn receipt_items() -> Vec<PaymentItem> {
    vec![
        PaymentItem::new(
            PaymentItemKind::Service,
            "Консультация продавца",
            MoneyAmount::new(499).unwrap(),
        ),
        PaymentItem::new(
            PaymentItemKind::Product,
            "Товар",
            MoneyAmount::new(5999).unwrap(),
        ),
    ]
}

pub fn make_payment(shift: Option<&str>) -> NewPayment {
    NewPayment::new(NewPaymentParams {
        shift: shift.map(str::to_string),
        order_number: "AA-1111".to_string(),
        items: receipt_items(),
        receipt_footer: "Спасибо за покупку!".to_string(),
        success_url: "https://shop.example/success".to_string(),
        failure_url: "https://shop.example/failure".to_string(),
        notification_url: "https://shop.example/notifications".to_string(),
    })
    .unwrap()
}

pub fn make_client(base_url: &str) -> OplatiClient {
    OplatiClient::new(ClientConfig::new(base_url, REG_NUM, PASSWORD)).unwrap()
}

// ── Handlers ───────────────────────────────────────────────────────────────

/// Records every delivered payment; optionally fails after recording.
#[derive(Default)]
pub struct RecordingHandler {
    pub received: Mutex<Vec<PaymentInfo>>,
    pub fail: bool,
}

impl RecordingHandler {
    pub fn failing() -> Self {
        Self {
            received: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn received(&self) -> Vec<PaymentInfo> {
        self.received.lock().unwrap().clone()
    }
}

impl PaymentNotificationHandler for RecordingHandler {
    fn handle_payment(
        &self,
        payment: PaymentInfo,
    ) -> Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send + '_>> {
        Box::pin(async move {
            self.received.lock().unwrap().push(payment);
            if self.fail {
                return Err(HandlerError::from("order store unavailable"));
            }
            Ok(())
        })
    }
}
