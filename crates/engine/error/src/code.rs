use strum::EnumCount;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::AsRefStr,
    strum::IntoStaticStr,
    strum::FromRepr,
    strum_macros::EnumCount,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorCode {
    BadRequest,
    InternalServerError,
    // Operation preparation phases
    OperationParsingError,
    OperationValidationError,
    VariableError,
    // Execution
    Unauthorized,
    ResolverError,
    UnsupportedAsyncResolver,
}

impl ErrorCode {
    /// Errors raised before execution started. The response has no `data` when one of those
    /// is present.
    pub fn is_request_error(self) -> bool {
        matches!(
            self,
            ErrorCode::OperationParsingError | ErrorCode::OperationValidationError | ErrorCode::VariableError
        )
    }
}

#[derive(Debug, Default)]
pub struct ErrorCodeCounter([u16; ErrorCode::COUNT]);

impl ErrorCodeCounter {
    pub fn from_errors(errors: &[super::GraphqlError]) -> Self {
        let mut counter = Self::default();
        for error in errors {
            counter.increment(error.code);
        }
        counter
    }

    pub fn increment(&mut self, code: ErrorCode) {
        self.0[code as usize] += 1;
    }

    pub fn get(&self, code: ErrorCode) -> u16 {
        self.0[code as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ErrorCode, u16)> + '_ {
        self.0
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, count)| *count > 0)
            .filter_map(|(index, count)| Some((ErrorCode::from_repr(index)?, count)))
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn sanity_check_discriminant() {
        for (index, code) in ErrorCode::iter().enumerate() {
            assert_eq!(ErrorCode::from_repr(index), Some(code));
        }
    }

    #[test]
    fn codes_are_screaming_snake_case() {
        assert_eq!(ErrorCode::OperationValidationError.to_string(), "OPERATION_VALIDATION_ERROR");
        assert_eq!(
            serde_json::to_value(ErrorCode::UnsupportedAsyncResolver).unwrap(),
            serde_json::json!("UNSUPPORTED_ASYNC_RESOLVER")
        );
    }

    #[test]
    fn request_errors() {
        assert!(ErrorCode::OperationParsingError.is_request_error());
        assert!(ErrorCode::VariableError.is_request_error());
        assert!(!ErrorCode::Unauthorized.is_request_error());
        assert!(!ErrorCode::ResolverError.is_request_error());
    }

    #[test]
    fn counter() {
        let errors = vec![
            crate::GraphqlError::unauthorized("no"),
            crate::GraphqlError::unauthorized("still no"),
            crate::GraphqlError::new("boom", ErrorCode::ResolverError),
        ];
        let counter = ErrorCodeCounter::from_errors(&errors);
        assert_eq!(counter.get(ErrorCode::Unauthorized), 2);
        assert_eq!(
            counter.iter().collect::<Vec<_>>(),
            vec![(ErrorCode::Unauthorized, 2), (ErrorCode::ResolverError, 1)]
        );
    }
}
