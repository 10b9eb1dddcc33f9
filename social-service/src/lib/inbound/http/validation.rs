use chrono::DateTime;
use chrono::NaiveDate;
use serde::Serialize;

/// One entry of the `errors` array in an error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

impl FieldError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: None,
        }
    }

    pub fn for_param(param: &str, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: Some(param.to_string()),
        }
    }
}

/// Every field that failed validation, in the order the fields were checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

/// Collects field failures while a request body is parsed into domain types.
///
/// Each check returns the parsed value, or `None` after recording the failure,
/// so that all fields are reported at once instead of stopping at the first.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the error's display text against `param` when `result` fails.
    pub fn check<T, E: ToString>(&mut self, param: &str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.errors.push(FieldError::for_param(param, e.to_string()));
                None
            }
        }
    }

    /// A non-blank string, trimmed.
    pub fn required(&mut self, param: &str, value: Option<String>, msg: &str) -> Option<String> {
        match optional(value) {
            Some(value) => Some(value),
            None => {
                self.errors.push(FieldError::for_param(param, msg));
                None
            }
        }
    }

    /// A non-blank calendar date.
    pub fn date(&mut self, param: &str, value: Option<String>, msg: &str) -> Option<NaiveDate> {
        let raw = self.required(param, value, msg)?;
        self.parse_date(param, &raw)
    }

    /// A calendar date that may be absent or blank.
    ///
    /// The outer `None` means the value was present but malformed.
    pub fn optional_date(
        &mut self,
        param: &str,
        value: Option<String>,
    ) -> Option<Option<NaiveDate>> {
        match optional(value) {
            Some(raw) => self.parse_date(param, &raw).map(Some),
            None => Some(None),
        }
    }

    fn parse_date(&mut self, param: &str, raw: &str) -> Option<NaiveDate> {
        let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()));

        if parsed.is_none() {
            self.errors
                .push(FieldError::for_param(param, "Enter a valid date"));
        }
        parsed
    }

    /// Hand back the fully parsed value, or every recorded failure.
    pub fn finish<T>(self, parsed: Option<T>) -> Result<T, ValidationErrors> {
        match parsed {
            Some(value) if self.errors.is_empty() => Ok(value),
            _ => Err(ValidationErrors(self.errors)),
        }
    }
}

/// Trimmed value, with blank strings treated as absent.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
