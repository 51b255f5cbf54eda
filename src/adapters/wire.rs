//! Gateway JSON shapes and their mapping to and from domain types.
//!
//! Amounts are kept in integer minor units until serialization; the JSON
//! number in major units is produced only at the serde boundary.

use {
    crate::domain::{
        error::{DecodeError, GatewayError, OplatiError},
        id::PaymentId,
        money::MoneyAmount,
        payment::{
            CreatedPayment, NewPayment, PaymentInfo, PaymentItem, PaymentKind, PaymentReversal,
            PaymentStatus,
        },
    },
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

/// Serde adapter: `MoneyAmount` <-> JSON number in major units.
pub mod major_units {
    use {
        crate::domain::money::MoneyAmount,
        rust_decimal::Decimal,
        serde::{Deserialize, Deserializer, Serializer},
    };

    pub fn serialize<S: Serializer>(amount: &MoneyAmount, serializer: S) -> Result<S::Ok, S::Error> {
        // i64 -> f64 is exact for any realistic amount; one division, correctly rounded.
        serializer.serialize_f64(amount.minor_units() as f64 / 100.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MoneyAmount, D::Error> {
        let major = <Decimal as Deserialize>::deserialize(deserializer)?;
        MoneyAmount::from_major(major).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Serialize)]
pub struct LineItemBody<'a> {
    #[serde(rename = "type")]
    pub kind: i32,
    pub name: &'a str,
    #[serde(with = "major_units")]
    pub cost: MoneyAmount,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptDetailsBody<'a> {
    pub reg_num: &'a str,
    pub items: Vec<LineItemBody<'a>>,
    #[serde(with = "major_units")]
    pub amount_total: MoneyAmount,
    pub footer_info: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift: Option<&'a str>,
    #[serde(with = "major_units")]
    pub sum: MoneyAmount,
    pub order_number: &'a str,
    pub reg_num: &'a str,
    pub details: ReceiptDetailsBody<'a>,
    pub success_url: &'a str,
    pub failure_url: &'a str,
    pub notification_url: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReversalBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift: Option<&'a str>,
    #[serde(with = "major_units")]
    pub sum: MoneyAmount,
    pub order_number: &'a str,
    pub reg_num: &'a str,
    pub details: ReceiptDetailsBody<'a>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentResponse {
    pub payment_id: i64,
    pub redirect_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfoResponse {
    pub payment_id: i64,
    pub payment_type: i32,
    #[serde(with = "major_units")]
    pub sum: MoneyAmount,
    pub status: i32,
    pub created_date: String,
    pub paid_date: String,
    #[serde(default)]
    pub order_number: String,
    #[serde(default)]
    pub purse_public_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ErrorResponse {
    pub code: String,
    pub internal_code: String,
    pub dev_message: String,
    pub user_message: ErrorUserMessage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ErrorUserMessage {
    pub lang_ru: String,
    pub lang_en: String,
}

/// Maps items 1:1 in order. The total is summed in minor units and scaled once.
pub fn build_line_items(
    items: &[PaymentItem],
) -> Result<(Vec<LineItemBody<'_>>, MoneyAmount), OplatiError> {
    let total = MoneyAmount::checked_sum(items.iter().map(PaymentItem::cost))
        .ok_or_else(|| OplatiError::Validation("receipt total overflows".into()))?;
    let bodies = items
        .iter()
        .map(|item| LineItemBody {
            kind: item.kind().code(),
            name: item.name(),
            cost: item.cost(),
        })
        .collect();
    Ok((bodies, total))
}

pub fn new_payment_body<'a>(
    payment: &'a NewPayment,
    reg_num: &'a str,
) -> Result<NewPaymentBody<'a>, OplatiError> {
    let (items, total) = build_line_items(payment.items())?;
    Ok(NewPaymentBody {
        shift: payment.shift(),
        sum: total,
        order_number: payment.order_number(),
        reg_num,
        details: ReceiptDetailsBody {
            reg_num,
            items,
            amount_total: total,
            footer_info: payment.receipt_footer(),
        },
        success_url: payment.success_url(),
        failure_url: payment.failure_url(),
        notification_url: payment.notification_url(),
    })
}

pub fn reversal_body<'a>(
    reversal: &'a PaymentReversal,
    reg_num: &'a str,
) -> Result<ReversalBody<'a>, OplatiError> {
    let (items, total) = build_line_items(reversal.items())?;
    Ok(ReversalBody {
        shift: reversal.shift(),
        sum: total,
        order_number: reversal.order_number(),
        reg_num,
        details: ReceiptDetailsBody {
            reg_num,
            items,
            amount_total: total,
            footer_info: reversal.receipt_footer(),
        },
    })
}

pub fn decode_created(raw: NewPaymentResponse) -> Result<CreatedPayment, DecodeError> {
    if raw.redirect_url.is_empty() {
        return Err(DecodeError::Field("empty redirectUrl in response".into()));
    }
    Ok(CreatedPayment {
        payment_id: PaymentId::new(raw.payment_id),
        redirect_url: raw.redirect_url,
    })
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, DecodeError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|source| DecodeError::Timestamp {
            field,
            value: value.to_string(),
            source,
        })
}

/// Fails hard on unparseable timestamps: a record without them is unusable.
pub fn decode_record(raw: PaymentInfoResponse) -> Result<PaymentInfo, DecodeError> {
    Ok(PaymentInfo {
        id: PaymentId::new(raw.payment_id),
        kind: PaymentKind::try_from(raw.payment_type)?,
        amount: raw.sum,
        status: PaymentStatus::try_from(raw.status)?,
        created_at: parse_timestamp("createdDate", &raw.created_date)?,
        paid_at: parse_timestamp("paidDate", &raw.paid_date)?,
        order_number: raw.order_number,
        wallet_public_id: raw.purse_public_id.filter(|id| !id.is_empty()),
    })
}

/// Turns any non-200 response into a `GatewayError`. An undecodable envelope
/// still reports the HTTP status it came with.
pub fn classify_error(status: u16, body: &[u8]) -> OplatiError {
    match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(envelope) => OplatiError::Gateway(GatewayError {
            http_status: status,
            status_code: envelope.code,
            internal_code: envelope.internal_code,
            message: envelope.dev_message,
            user_message: envelope.user_message.lang_ru,
            user_message_en: envelope.user_message.lang_en,
        }),
        Err(source) => OplatiError::Decode(DecodeError::ErrorEnvelope { status, source }),
    }
}
