/// Errors raised while turning user input into something submittable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// Text typed into a numeric input that does not parse.
    #[error("'{input}' is not a valid {expected}")]
    InvalidNumber {
        input: String,
        expected: &'static str,
    },

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl CoreError {
    pub fn invalid_number(input: &str, expected: &'static str) -> Self {
        Self::InvalidNumber {
            input: input.to_string(),
            expected,
        }
    }
}
