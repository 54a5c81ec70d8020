//! Checkout, registration and login form validation.
//!
//! Forms hold raw user input. `validate` checks it and produces the typed
//! value the rest of the crate works with. Checkout has no backend endpoint:
//! a validated form yields an [`OrderSummary`] and payment is simulated.

use std::fmt;
use std::str::FromStr;

use jaelle_core::{Email, EmailError};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::types::{Credentials, RegisterRequest};
use crate::cart::{Cart, CartItem};

/// Reasons a form is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// A required field is blank.
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Invalid email address: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("You must accept the terms and conditions")]
    TermsNotAccepted,

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),
}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FormError::Required(field));
    }
    Ok(value.to_string())
}

// =============================================================================
// Checkout
// =============================================================================

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    Paypal,
    BankTransfer,
}

impl PaymentMethod {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::Paypal => "paypal",
            Self::BankTransfer => "bank_transfer",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "credit_card" | "card" => Ok(Self::CreditCard),
            "paypal" => Ok(Self::Paypal),
            "bank_transfer" | "transfer" => Ok(Self::BankTransfer),
            _ => Err(FormError::UnknownPaymentMethod(s.to_string())),
        }
    }
}

/// Raw checkout input.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub payment_method: PaymentMethod,
}

/// Validated shipping details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// A confirmed (simulated) order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub customer: Customer,
    pub lines: Vec<CartItem>,
    pub total_items: u32,
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
}

impl CheckoutForm {
    /// Validate the form against the cart being checked out.
    ///
    /// # Errors
    ///
    /// Returns `FormError::EmptyCart` for an empty cart, `Required` for the
    /// first blank field, or `InvalidEmail` for a malformed address.
    pub fn validate(&self, cart: &Cart) -> Result<OrderSummary, FormError> {
        if cart.is_empty() {
            return Err(FormError::EmptyCart);
        }

        let first_name = required(&self.first_name, "First name")?;
        let last_name = required(&self.last_name, "Last name")?;
        required(&self.email, "Email")?;
        let email = Email::parse(&self.email)?;
        let address = required(&self.address, "Address")?;
        let city = required(&self.city, "City")?;
        let postal_code = required(&self.postal_code, "Postal code")?;
        let country = required(&self.country, "Country")?;

        Ok(OrderSummary {
            customer: Customer {
                first_name,
                last_name,
                email,
                address,
                city,
                postal_code,
                country,
            },
            lines: cart.items().to_vec(),
            total_items: cart.total_items(),
            total_amount: cart.total_amount(),
            payment_method: self.payment_method,
        })
    }
}

// =============================================================================
// Accounts
// =============================================================================

/// Raw sign-up input.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub agree_terms: bool,
}

impl RegistrationForm {
    /// Validate the form into a registration request.
    ///
    /// # Errors
    ///
    /// Returns `PasswordMismatch` when the two passwords differ,
    /// `TermsNotAccepted` when the terms box is unchecked, `Required` for a
    /// blank field, or `InvalidEmail`.
    pub fn validate(&self) -> Result<RegisterRequest, FormError> {
        if self.password.expose_secret() != self.confirm_password.expose_secret() {
            return Err(FormError::PasswordMismatch);
        }
        if !self.agree_terms {
            return Err(FormError::TermsNotAccepted);
        }

        let first_name = required(&self.first_name, "First name")?;
        let last_name = required(&self.last_name, "Last name")?;
        required(&self.email, "Email")?;
        let email = Email::parse(&self.email)?;
        if self.password.expose_secret().is_empty() {
            return Err(FormError::Required("Password"));
        }

        Ok(RegisterRequest {
            email,
            password: self.password.clone(),
            first_name,
            last_name,
        })
    }
}

/// Raw sign-in input.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

impl LoginForm {
    /// Validate the form into credentials.
    ///
    /// # Errors
    ///
    /// Returns `Required` for a blank field or `InvalidEmail`.
    pub fn validate(&self) -> Result<Credentials, FormError> {
        required(&self.email, "Email")?;
        let email = Email::parse(&self.email)?;
        if self.password.expose_secret().is_empty() {
            return Err(FormError::Required("Password"));
        }

        Ok(Credentials {
            email,
            password: self.password.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use jaelle_core::ProductId;

    use super::*;

    fn checkout() -> CheckoutForm {
        CheckoutForm {
            first_name: "Jaëlle".to_string(),
            last_name: " Martin ".to_string(),
            email: "jaelle@example.fr".to_string(),
            address: "12 rue des Lilas".to_string(),
            city: "Lyon".to_string(),
            postal_code: "69001".to_string(),
            country: "France".to_string(),
            payment_method: PaymentMethod::Paypal,
        }
    }

    fn cart() -> Cart {
        Cart::from_items([CartItem {
            id: ProductId::new(1),
            name: "Robe".to_string(),
            price: Decimal::new(4590, 2),
            quantity: 2,
            image: String::new(),
            slug: "robe".to_string(),
        }])
    }

    fn registration() -> RegistrationForm {
        RegistrationForm {
            first_name: "Ana".to_string(),
            last_name: "Lopez".to_string(),
            email: "ana@example.com".to_string(),
            password: SecretString::from("s3cret-pass"),
            confirm_password: SecretString::from("s3cret-pass"),
            agree_terms: true,
        }
    }

    #[test]
    fn test_checkout_produces_summary() {
        let summary = checkout().validate(&cart()).unwrap();
        assert_eq!(summary.customer.last_name, "Martin");
        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.total_amount, Decimal::new(9180, 2));
        assert_eq!(summary.payment_method, PaymentMethod::Paypal);
        assert_eq!(summary.lines.len(), 1);
    }

    #[test]
    fn test_checkout_rejects_empty_cart() {
        assert_eq!(
            checkout().validate(&Cart::new()).unwrap_err(),
            FormError::EmptyCart
        );
    }

    #[test]
    fn test_checkout_rejects_blank_field() {
        let mut form = checkout();
        form.city = "   ".to_string();
        assert_eq!(
            form.validate(&cart()).unwrap_err(),
            FormError::Required("City")
        );
    }

    #[test]
    fn test_checkout_rejects_bad_email() {
        let mut form = checkout();
        form.email = "jaelle.example.fr".to_string();
        assert!(matches!(
            form.validate(&cart()).unwrap_err(),
            FormError::InvalidEmail(_)
        ));
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!(
            "bank-transfer".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::BankTransfer
        );
        assert_eq!(
            "PayPal".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::Paypal
        );
        assert!(matches!(
            "cash".parse::<PaymentMethod>(),
            Err(FormError::UnknownPaymentMethod(_))
        ));
        assert_eq!(PaymentMethod::default().to_string(), "credit_card");
    }

    #[test]
    fn test_registration_ok() {
        let request = registration().validate().unwrap();
        assert_eq!(request.email.as_str(), "ana@example.com");
        assert_eq!(request.password.expose_secret(), "s3cret-pass");
    }

    #[test]
    fn test_registration_password_mismatch() {
        let mut form = registration();
        form.confirm_password = SecretString::from("other");
        assert_eq!(form.validate().unwrap_err(), FormError::PasswordMismatch);
    }

    #[test]
    fn test_registration_requires_terms() {
        let mut form = registration();
        form.agree_terms = false;
        assert_eq!(form.validate().unwrap_err(), FormError::TermsNotAccepted);
    }

    #[test]
    fn test_login_requires_password() {
        let form = LoginForm {
            email: "ana@example.com".to_string(),
            password: SecretString::from(""),
        };
        assert_eq!(form.validate().unwrap_err(), FormError::Required("Password"));

        let form = LoginForm {
            email: "ana@example.com".to_string(),
            password: SecretString::from("pw"),
        };
        assert_eq!(form.validate().unwrap().email.as_str(), "ana@example.com");
    }
}
