use {
    super::error::{DecodeError, OplatiError},
    super::id::PaymentId,
    super::money::MoneyAmount,
    chrono::{DateTime, Utc},
    std::fmt,
};

/// Receipt line kind. Wire codes are fixed by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentItemKind {
    Product,
    Service,
}

impl PaymentItemKind {
    pub fn code(&self) -> i32 {
        match self {
            Self::Product => 1,
            Self::Service => 2,
        }
    }
}

impl TryFrom<i32> for PaymentItemKind {
    type Error = DecodeError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Product),
            2 => Ok(Self::Service),
            other => Err(DecodeError::Field(format!("unknown item type: {other}"))),
        }
    }
}

/// Cash operation kind of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentKind {
    Sell,
    Buy,
    SellReverse,
    BuyReverse,
}

impl PaymentKind {
    pub fn code(&self) -> i32 {
        match self {
            Self::Sell => 1,
            Self::Buy => 2,
            Self::SellReverse => 3,
            Self::BuyReverse => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sell => "sell",
            Self::Buy => "buy",
            Self::SellReverse => "sell_reverse",
            Self::BuyReverse => "buy_reverse",
        }
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i32> for PaymentKind {
    type Error = DecodeError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Sell),
            2 => Ok(Self::Buy),
            3 => Ok(Self::SellReverse),
            4 => Ok(Self::BuyReverse),
            other => Err(DecodeError::Field(format!("unknown payment type: {other}"))),
        }
    }
}

/// Gateway-side payment status. This crate only observes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    /// Waiting for the customer to confirm in the mobile app.
    InProgress,
    /// Paid; goods may be handed over.
    Done,
    Declined,
    NotEnoughMoney,
    /// Not confirmed in time, equivalent to a decline.
    Timeout,
    /// Cancelled by the cashbox or by the gateway when the outcome was unknown.
    TechCancel,
}

impl PaymentStatus {
    pub fn code(&self) -> i32 {
        match self {
            Self::InProgress => 0,
            Self::Done => 1,
            Self::Declined => 2,
            Self::NotEnoughMoney => 3,
            Self::Timeout => 4,
            Self::TechCancel => 5,
        }
    }

    /// Gateway's symbolic status code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "OK",
            Self::Declined => "DECLINE",
            Self::NotEnoughMoney => "NOT_ENOUGH",
            Self::Timeout => "TIMEOUT",
            Self::TechCancel => "TECHNICAL_CANCELLING",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i32> for PaymentStatus {
    type Error = DecodeError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::InProgress),
            1 => Ok(Self::Done),
            2 => Ok(Self::Declined),
            3 => Ok(Self::NotEnoughMoney),
            4 => Ok(Self::Timeout),
            5 => Ok(Self::TechCancel),
            other => Err(DecodeError::Field(format!("unknown payment status: {other}"))),
        }
    }
}

/// One receipt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentItem {
    kind: PaymentItemKind,
    name: String,
    cost: MoneyAmount,
}

impl PaymentItem {
    pub fn new(kind: PaymentItemKind, name: impl Into<String>, cost: MoneyAmount) -> Self {
        Self {
            kind,
            name: name.into(),
            cost,
        }
    }

    pub fn kind(&self) -> PaymentItemKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost(&self) -> MoneyAmount {
        self.cost
    }
}

fn validate_receipt(order_number: &str, items: &[PaymentItem]) -> Result<(), OplatiError> {
    if order_number.is_empty() {
        return Err(OplatiError::Validation("order number must not be empty".into()));
    }
    if items.is_empty() {
        return Err(OplatiError::Validation(
            "receipt must contain at least one item".into(),
        ));
    }
    MoneyAmount::checked_sum(items.iter().map(PaymentItem::cost))
        .ok_or_else(|| OplatiError::Validation("receipt total overflows".into()))?;
    Ok(())
}

pub struct NewPaymentParams {
    /// Cashier shift, e.g. a date in DDMMYYYY form.
    pub shift: Option<String>,
    /// Unique order number; the gateway's idempotency key.
    pub order_number: String,
    pub items: Vec<PaymentItem>,
    pub receipt_footer: String,
    pub success_url: String,
    pub failure_url: String,
    pub notification_url: String,
}

/// Payment to be created on the gateway. The total is always derived from the items.
#[derive(Debug, Clone)]
pub struct NewPayment {
    shift: Option<String>,
    order_number: String,
    items: Vec<PaymentItem>,
    receipt_footer: String,
    success_url: String,
    failure_url: String,
    notification_url: String,
}

impl NewPayment {
    pub fn new(p: NewPaymentParams) -> Result<Self, OplatiError> {
        validate_receipt(&p.order_number, &p.items)?;
        Ok(Self {
            shift: p.shift,
            order_number: p.order_number,
            items: p.items,
            receipt_footer: p.receipt_footer,
            success_url: p.success_url,
            failure_url: p.failure_url,
            notification_url: p.notification_url,
        })
    }

    pub fn shift(&self) -> Option<&str> {
        self.shift.as_deref()
    }

    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    pub fn items(&self) -> &[PaymentItem] {
        &self.items
    }

    pub fn receipt_footer(&self) -> &str {
        &self.receipt_footer
    }

    pub fn success_url(&self) -> &str {
        &self.success_url
    }

    pub fn failure_url(&self) -> &str {
        &self.failure_url
    }

    pub fn notification_url(&self) -> &str {
        &self.notification_url
    }
}

pub struct PaymentReversalParams {
    pub shift: Option<String>,
    pub order_number: String,
    pub items: Vec<PaymentItem>,
    pub receipt_footer: String,
}

/// Full or partial reversal of an existing payment.
#[derive(Debug, Clone)]
pub struct PaymentReversal {
    shift: Option<String>,
    order_number: String,
    items: Vec<PaymentItem>,
    receipt_footer: String,
}

impl PaymentReversal {
    pub fn new(p: PaymentReversalParams) -> Result<Self, OplatiError> {
        validate_receipt(&p.order_number, &p.items)?;
        Ok(Self {
            shift: p.shift,
            order_number: p.order_number,
            items: p.items,
            receipt_footer: p.receipt_footer,
        })
    }

    pub fn shift(&self) -> Option<&str> {
        self.shift.as_deref()
    }

    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    pub fn items(&self) -> &[PaymentItem] {
        &self.items
    }

    pub fn receipt_footer(&self) -> &str {
        &self.receipt_footer
    }
}

/// Result of a successful payment creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPayment {
    pub payment_id: PaymentId,
    /// Page the customer is sent to for paying.
    pub redirect_url: String,
}

/// Payment as reported by the gateway (query, reversal, shift report or webhook).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInfo {
    pub id: PaymentId,
    pub kind: PaymentKind,
    pub amount: MoneyAmount,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    /// Equals `created_at` until the payment is paid.
    pub paid_at: DateTime<Utc>,
    pub order_number: String,
    /// Customer wallet, only reported for `Done` payments.
    pub wallet_public_id: Option<String>,
}
