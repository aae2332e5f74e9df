//! `parcep validate` implementation.

use clap::Args;
use parcep_core::{PostalCode, PostalQuery, is_valid_format};
use serde::Serialize;

/// Arguments for `parcep validate`.
#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Inputs to check.
    #[arg(required = true)]
    pub codes: Vec<String>,
}

/// Validation result for one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateOutput {
    pub input: String,
    pub valid: bool,
    /// Canonical 8-digit form, only for valid input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized: Option<String>,
}

/// Implementation of the validate command.
pub fn validate_impl(args: &ValidateArgs) -> Vec<ValidateOutput> {
    args.codes
        .iter()
        .map(|input| {
            let query = PostalQuery::from(input.as_str());
            let normalized = PostalCode::parse(&query).ok().map(String::from);
            ValidateOutput { input: input.clone(), valid: is_valid_format(&query), normalized }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_impl() {
        let args = ValidateArgs { codes: vec!["92500-000".into(), "12345".into(), "925.00.000".into()] };
        let outputs = validate_impl(&args);

        assert_eq!(
            outputs[0],
            ValidateOutput { input: "92500-000".into(), valid: true, normalized: Some("92500000".into()) }
        );
        assert_eq!(outputs[1], ValidateOutput { input: "12345".into(), valid: false, normalized: None });
        assert!(outputs[2].valid);
    }

    #[test]
    fn test_invalid_output_omits_normalized() {
        let outputs = validate_impl(&ValidateArgs { codes: vec!["abc".into()] });
        let json = serde_json::to_value(&outputs[0]).unwrap();
        assert!(json.get("normalized").is_none());
        assert_eq!(json["valid"], false);
    }
}
