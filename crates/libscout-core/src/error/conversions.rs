//! From trait implementations for ScoutError conversions

use super::types::ScoutError;

impl From<serde_json::Error> for ScoutError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoutResult;

    fn parse(raw: &str) -> ScoutResult<serde_json::Value> {
        Ok(serde_json::from_str(raw)?)
    }

    #[test]
    fn test_json_error_propagates_with_question_mark() {
        let err = parse("{not json").unwrap_err();
        assert!(matches!(err, ScoutError::Json { .. }));
        assert_eq!(err.error_code(), "SCOUT_JSON");
    }
}
