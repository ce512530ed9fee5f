//! Stand-ins returned when the `validate` or `response` slot is unset.

use crate::contract::{FieldErrors, Fields, Response, Validator};

/// Performs no checks and accepts every input.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughValidator;

impl Validator for PassthroughValidator {
    fn validate(&self, _input: &Fields) -> Result<(), FieldErrors> {
        Ok(())
    }
}

/// "No response produced."
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyResponse;

impl EmptyResponse {
    pub const STATUS: u16 = 204;
}

impl Response for EmptyResponse {
    fn status(&self) -> u16 {
        Self::STATUS
    }

    fn is_placeholder(&self) -> bool {
        true
    }
}
