//! Form state, declarative validation and submission lifecycle.
//!
//! # Overview
//!
//! - [`validators`] - total predicates over raw field values
//!   (`is_email`, `is_phone`, `is_date`).
//! - [`rules`] - tagged [`Rule`] variants composed per field into a
//!   [`RuleSet`], evaluated by one interpreter.
//! - [`form`] - the [`Form`] engine: values, errors, change/submit handlers.
//!
//! # Example
//!
//! ```
//! use lead_form::{FieldRules, Form, FormValues, RuleSet, SubmitHandler, ValidatorKind,
//!                 values_from};
//!
//! struct Print;
//!
//! #[async_trait::async_trait]
//! impl SubmitHandler for Print {
//!     type Error = std::convert::Infallible;
//!     async fn submit(&mut self, values: FormValues) -> Result<(), Self::Error> {
//!         println!("{values:?}");
//!         Ok(())
//!     }
//! }
//!
//! let rules = RuleSet::new()
//!     .field("email", FieldRules::required().validate_with(ValidatorKind::Email));
//! let mut form = Form::new(values_from([("email", "")]), rules, Print);
//! form.handle_change("email", "not an email");
//! assert!(!form.validate());
//! ```

pub mod error;
pub mod form;
pub mod rules;
pub mod validators;

pub use error::{FormError, Result};
pub use form::{
    FieldErrors, Form, FormValues, SubmitEvent, SubmitHandler, SubmitOutcome, values_from,
};
pub use rules::{Check, FieldRules, INVALID_MESSAGE, REQUIRED_MESSAGE, Rule, RuleSet, validate};
pub use validators::{ValidatorKind, digits_only, is_date, is_email, is_phone, parse_date};
