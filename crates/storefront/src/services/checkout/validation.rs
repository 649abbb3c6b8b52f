//! Checkout form validation.
//!
//! [`validate`] turns a [`CheckoutForm`] into an [`OrderIntent`] or the first
//! [`ValidationError`] encountered. Fields are checked in form order so the
//! shopper always sees the topmost problem first.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use greengrocer_core::{AddressId, PaymentMethod, UserId, ZipCode};

use super::form::{AddressFields, CheckoutForm};
use crate::models::{Cart, CartItem};

/// `shippingAddress` value meaning "ship to the new address in this form".
pub const NEW_ADDRESS: &str = "new";

const MAX_ADDRESS_ID_LEN: usize = 128;
const MIN_CARDHOLDER_NAME_LEN: usize = 2;
const CARD_NUMBER_DIGITS: usize = 16;

static EXPIRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0[1-9]|1[0-2])\s*/\s*([0-9]{2})$").expect("Invalid regex")
});

static CVV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3,4}$").expect("Invalid regex"));

/// A checkout form field, named as it appears in the submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckoutField {
    UserId,
    CartItems,
    ShippingAddress,
    NewAddressStreet,
    NewAddressCity,
    NewAddressState,
    NewAddressZip,
    PaymentMethod,
    CardholderName,
    CardNumber,
    ExpiryDate,
    Cvv,
}

impl CheckoutField {
    /// Form input name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UserId => "userId",
            Self::CartItems => "cartItems",
            Self::ShippingAddress => "shippingAddress",
            Self::NewAddressStreet => "newAddressStreet",
            Self::NewAddressCity => "newAddressCity",
            Self::NewAddressState => "newAddressState",
            Self::NewAddressZip => "newAddressZip",
            Self::PaymentMethod => "paymentMethod",
            Self::CardholderName => "cardholderName",
            Self::CardNumber => "cardNumber",
            Self::ExpiryDate => "expiryDate",
            Self::Cvv => "cvv",
        }
    }
}

impl std::fmt::Display for CheckoutField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    MissingField,
    InvalidFormat,
    InvalidEnum,
}

/// A single, field-scoped validation failure with a shopper-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: CheckoutField,
    pub kind: ValidationErrorKind,
    pub message: String,
}

impl ValidationError {
    fn new(field: CheckoutField, kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }

    fn missing(field: CheckoutField, message: &str) -> Self {
        Self::new(field, ValidationErrorKind::MissingField, message)
    }

    fn format(field: CheckoutField, message: &str) -> Self {
        Self::new(field, ValidationErrorKind::InvalidFormat, message)
    }

    fn invalid_enum(field: CheckoutField, message: &str) -> Self {
        Self::new(field, ValidationErrorKind::InvalidEnum, message)
    }
}

/// A validated address the shopper typed into the checkout form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: ZipCode,
}

/// Where the order ships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShippingChoice {
    /// A saved address on the shopper's profile.
    Existing(AddressId),
    /// A new address, appended to the profile when the order is placed.
    New(NewAddress),
}

/// Card fields, normalized: digits only for the number, `MM/YY` for expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct CardDetails {
    pub cardholder_name: String,
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

impl CardDetails {
    /// Last four digits of the card number.
    #[must_use]
    pub fn last4(&self) -> &str {
        let start = self.card_number.len().saturating_sub(4);
        self.card_number.get(start..).unwrap_or_default()
    }
}

impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDetails")
            .field("cardholder_name", &self.cardholder_name)
            .field("card_number", &format_args!("****{}", self.last4()))
            .field("expiry", &self.expiry)
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

/// How the order is paid for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentDetails {
    CashOnDelivery,
    CreditCard(CardDetails),
}

impl PaymentDetails {
    #[must_use]
    pub const fn method(&self) -> PaymentMethod {
        match self {
            Self::CashOnDelivery => PaymentMethod::CashOnDelivery,
            Self::CreditCard(_) => PaymentMethod::CreditCard,
        }
    }
}

/// A validated, normalized checkout submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderIntent {
    pub user_id: UserId,
    pub cart_items: Vec<CartItem>,
    pub shipping: ShippingChoice,
    pub payment: PaymentDetails,
}

impl OrderIntent {
    /// Render back into the nested submission shape.
    ///
    /// Validating the result yields an equal intent.
    #[must_use]
    pub fn to_form(&self) -> CheckoutForm {
        let mut form = CheckoutForm {
            user_id: Some(self.user_id.to_string()),
            cart_items: Some(Cart::from_items(self.cart_items.clone()).to_json()),
            payment_method: Some(self.payment.method().form_value().to_owned()),
            ..CheckoutForm::default()
        };

        match &self.shipping {
            ShippingChoice::Existing(id) => form.shipping_address = Some(id.to_string()),
            ShippingChoice::New(address) => {
                form.shipping_address = Some(NEW_ADDRESS.to_owned());
                form.new_address_street = Some(address.street.clone());
                form.new_address_city = Some(address.city.clone());
                form.new_address_state = Some(address.state.clone());
                form.new_address_zip = Some(address.zip.to_string());
            }
        }

        if let PaymentDetails::CreditCard(card) = &self.payment {
            form.cardholder_name = Some(card.cardholder_name.clone());
            form.card_number = Some(card.card_number.clone());
            form.expiry_date = Some(card.expiry.clone());
            form.cvv = Some(card.cvv.clone());
        }

        form
    }
}

/// Trimmed field value, empty when absent.
fn field(value: Option<&String>) -> &str {
    value.map_or("", |v| v.trim())
}

/// Validate a checkout submission.
///
/// # Errors
///
/// Returns the first failing field, checked in this order: `userId`,
/// `cartItems`, `shippingAddress`, the new-address fields (only when
/// `shippingAddress` is `new`), `paymentMethod`, then the card fields (only
/// for `creditCard`).
pub fn validate(form: &CheckoutForm) -> Result<OrderIntent, ValidationError> {
    let user_id = field(form.user_id.as_ref());
    if user_id.is_empty() {
        return Err(ValidationError::missing(
            CheckoutField::UserId,
            "User ID is missing.",
        ));
    }

    let cart_items = parse_cart(field(form.cart_items.as_ref()))?;
    let shipping = parse_shipping(form)?;
    let payment = parse_payment(form)?;

    Ok(OrderIntent {
        user_id: UserId::new(user_id),
        cart_items,
        shipping,
        payment,
    })
}

fn parse_cart(raw: &str) -> Result<Vec<CartItem>, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::missing(
            CheckoutField::CartItems,
            "Cart items are missing.",
        ));
    }
    let cart = Cart::from_json(raw).map_err(|_| {
        ValidationError::format(CheckoutField::CartItems, "Cart items could not be read.")
    })?;
    if cart.is_empty() {
        return Err(ValidationError::missing(
            CheckoutField::CartItems,
            "Your cart is empty.",
        ));
    }
    if cart.total().is_err() {
        return Err(ValidationError::format(
            CheckoutField::CartItems,
            "Cart total is too large.",
        ));
    }
    Ok(cart.into_items())
}

fn is_address_id(value: &str) -> bool {
    value.len() <= MAX_ADDRESS_ID_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

fn parse_shipping(form: &CheckoutForm) -> Result<ShippingChoice, ValidationError> {
    let selection = field(form.shipping_address.as_ref());
    if selection.is_empty() {
        return Err(ValidationError::missing(
            CheckoutField::ShippingAddress,
            "Please select a shipping address",
        ));
    }
    if selection != NEW_ADDRESS {
        if !is_address_id(selection) {
            return Err(ValidationError::invalid_enum(
                CheckoutField::ShippingAddress,
                "Shipping address selection is not recognized.",
            ));
        }
        return Ok(ShippingChoice::Existing(AddressId::new(selection)));
    }

    parse_new_address(&form.new_address()).map(ShippingChoice::New)
}

fn parse_new_address(fields: &AddressFields) -> Result<NewAddress, ValidationError> {
    let required = |value: &str, field: CheckoutField, message: &str| {
        let value = value.trim();
        if value.is_empty() {
            Err(ValidationError::missing(field, message))
        } else {
            Ok(value.to_owned())
        }
    };

    let street = required(
        &fields.street,
        CheckoutField::NewAddressStreet,
        "Street is required",
    )?;
    let city = required(&fields.city, CheckoutField::NewAddressCity, "City is required")?;
    let state = required(
        &fields.state,
        CheckoutField::NewAddressState,
        "State is required",
    )?;
    let zip = ZipCode::parse(&fields.zip).map_err(|_| {
        ValidationError::format(CheckoutField::NewAddressZip, "Zip code must be 5 digits.")
    })?;

    Ok(NewAddress {
        street,
        city,
        state,
        zip,
    })
}

fn parse_payment(form: &CheckoutForm) -> Result<PaymentDetails, ValidationError> {
    let method = field(form.payment_method.as_ref());
    if method.is_empty() {
        return Err(ValidationError::missing(
            CheckoutField::PaymentMethod,
            "Please select a payment method.",
        ));
    }
    match PaymentMethod::from_form_value(method) {
        Some(PaymentMethod::CashOnDelivery) => Ok(PaymentDetails::CashOnDelivery),
        Some(PaymentMethod::CreditCard) => parse_card(form).map(PaymentDetails::CreditCard),
        None => Err(ValidationError::invalid_enum(
            CheckoutField::PaymentMethod,
            "Please select a valid payment method.",
        )),
    }
}

fn parse_card(form: &CheckoutForm) -> Result<CardDetails, ValidationError> {
    let cardholder_name = field(form.cardholder_name.as_ref());
    if cardholder_name.is_empty() {
        return Err(ValidationError::missing(
            CheckoutField::CardholderName,
            "Cardholder name is required.",
        ));
    }
    if cardholder_name.chars().count() < MIN_CARDHOLDER_NAME_LEN {
        return Err(ValidationError::format(
            CheckoutField::CardholderName,
            "Cardholder name must be at least 2 characters.",
        ));
    }

    let card_number: String = form
        .card_number
        .as_deref()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if card_number.is_empty() {
        return Err(ValidationError::missing(
            CheckoutField::CardNumber,
            "Card number is required.",
        ));
    }
    if card_number.len() != CARD_NUMBER_DIGITS || !card_number.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(ValidationError::format(
            CheckoutField::CardNumber,
            "Card number must be 16 digits.",
        ));
    }

    let expiry_raw = field(form.expiry_date.as_ref());
    let expiry = EXPIRY_RE
        .captures(expiry_raw)
        .and_then(|caps| Some(format!("{}/{}", caps.get(1)?.as_str(), caps.get(2)?.as_str())))
        .ok_or_else(|| {
            let message = "Expiry date must be in MM/YY format.";
            if expiry_raw.is_empty() {
                ValidationError::missing(CheckoutField::ExpiryDate, message)
            } else {
                ValidationError::format(CheckoutField::ExpiryDate, message)
            }
        })?;

    let cvv = field(form.cvv.as_ref());
    if !CVV_RE.is_match(cvv) {
        let message = "CVV must be 3 or 4 digits.";
        return Err(if cvv.is_empty() {
            ValidationError::missing(CheckoutField::Cvv, message)
        } else {
            ValidationError::format(CheckoutField::Cvv, message)
        });
    }

    Ok(CardDetails {
        cardholder_name: cardholder_name.to_owned(),
        card_number,
        expiry,
        cvv: cvv.to_owned(),
    })
}
