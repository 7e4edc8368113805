//! Identity attributes of a logger context and the options that change them
//!
//! - `Identity`: the request-scoped IDs stamped on every record
//! - `FieldOpts`: how `with`/`new_child` update identity and accumulated fields

use super::field::Field;

/// Identity attributes threaded through a logger context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub endpoint: String,
    pub traceability_id: String,
    pub correlation_id: String,
    pub user_id: String,
    pub client_id: String,
}

impl Identity {
    /// Apply `opts`: reset clears, a supplied value overwrites, otherwise inherit
    pub fn apply(&mut self, opts: &FieldOpts) {
        merge(&mut self.endpoint, &opts.endpoint, opts.reset_endpoint);
        merge(
            &mut self.traceability_id,
            &opts.traceability_id,
            opts.reset_traceability_id,
        );
        merge(
            &mut self.correlation_id,
            &opts.correlation_id,
            opts.reset_correlation_id,
        );
        merge(&mut self.user_id, &opts.user_id, opts.reset_user_id);
        merge(&mut self.client_id, &opts.client_id, opts.reset_client_id);
    }

    /// Identity fields in record order, after `service`
    pub(crate) fn to_fields(&self, service: &str, reportable: bool) -> [Field; 7] {
        [
            Field::string("service", service),
            Field::string("endpoint", self.endpoint.as_str()),
            Field::bool("isReportable", reportable),
            Field::string("traceabilityID", self.traceability_id.as_str()),
            Field::string("correlationID", self.correlation_id.as_str()),
            Field::string("userID", self.user_id.as_str()),
            Field::string("clientID", self.client_id.as_str()),
        ]
    }
}

#[inline]
fn merge(slot: &mut String, value: &Option<String>, reset: bool) {
    if reset {
        slot.clear();
    } else if let Some(value) = value {
        slot.clone_from(value);
    }
}

/// Number of identity fields leading every record
pub const IDENTITY_FIELD_COUNT: usize = 7;

/// Changes requested when deriving or updating a logger context
///
/// # Example
///
/// ```
/// use rust_telemetry_logger::core::FieldOpts;
///
/// let opts = FieldOpts::new()
///     .correlation_id("req-42")
///     .reset_user_id();
/// assert_eq!(opts.correlation_id.as_deref(), Some("req-42"));
/// assert!(opts.reset_user_id);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOpts {
    pub endpoint: Option<String>,
    pub traceability_id: Option<String>,
    pub correlation_id: Option<String>,
    pub user_id: Option<String>,
    pub client_id: Option<String>,

    pub reset_endpoint: bool,
    pub reset_traceability_id: bool,
    pub reset_correlation_id: bool,
    pub reset_user_id: bool,
    pub reset_client_id: bool,

    /// Replace the accumulated fields instead of appending to them
    pub overwrite_accumulated_fields: bool,
}

impl FieldOpts {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn endpoint(mut self, value: impl Into<String>) -> Self {
        self.endpoint = Some(value.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn traceability_id(mut self, value: impl Into<String>) -> Self {
        self.traceability_id = Some(value.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn correlation_id(mut self, value: impl Into<String>) -> Self {
        self.correlation_id = Some(value.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn user_id(mut self, value: impl Into<String>) -> Self {
        self.user_id = Some(value.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn client_id(mut self, value: impl Into<String>) -> Self {
        self.client_id = Some(value.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn reset_endpoint(mut self) -> Self {
        self.reset_endpoint = true;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn reset_traceability_id(mut self) -> Self {
        self.reset_traceability_id = true;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn reset_correlation_id(mut self) -> Self {
        self.reset_correlation_id = true;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn reset_user_id(mut self) -> Self {
        self.reset_user_id = true;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn reset_client_id(mut self) -> Self {
        self.reset_client_id = true;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn overwrite_accumulated_fields(mut self) -> Self {
        self.overwrite_accumulated_fields = true;
        self
    }
}
