//! Payment page logic: field validators, per-method checks and a simulated
//! payment that issues receipts.

pub mod methods;
pub mod routes;
pub mod validators;

pub use methods::{process_payment, PaymentDetails, PaymentReceipt, PaymentRejection};
pub use routes::router;
pub use validators::{password_strength, PasswordStrength};
