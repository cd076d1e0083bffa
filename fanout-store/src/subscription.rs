use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// How a delivery worker decides that a callback invocation succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmMode {
    /// The response status must equal `confirm_pattern`.
    HttpStatus,
    /// The response body must match the `confirm_pattern` regex.
    Regular,
    #[default]
    #[serde(alias = "")]
    None,
}

/// Delivery counters maintained by the delivery worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total: i64,
    pub failure: i64,
}

/// A registered interest in one or more event types plus its callback contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Subscription {
    pub subscription_id: i64,

    #[validate(length(min = 1, max = 256))]
    pub subscription_name: String,

    pub system_name: String,

    #[validate(url)]
    pub callback_url: String,

    pub confirm_mode: ConfirmMode,
    pub confirm_pattern: String,

    #[validate(custom = "validate_form")]
    pub subscription_form: String,

    pub time_out: i64,
    pub operator: String,
    pub last_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
}

impl Subscription {
    /// Event-type tokens of `subscription_form`, in the order they were written.
    pub fn event_types(&self) -> Vec<String> {
        form_tokens(&self.subscription_form)
            .map(ToOwned::to_owned)
            .collect()
    }
}

/// Splits a comma separated form into its non-empty, trimmed tokens.
pub fn form_tokens(form: &str) -> impl Iterator<Item = &str> {
    form.split(',').map(str::trim).filter(|token| !token.is_empty())
}

fn validate_form(form: &str) -> Result<(), ValidationError> {
    if form_tokens(form).next().is_none() {
        return Err(ValidationError::new("empty_subscription_form"));
    }

    Ok(())
}
