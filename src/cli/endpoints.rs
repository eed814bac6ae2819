//! Endpoints command implementation

use crate::cli::output::{format_endpoints_json, format_endpoints_table};
use crate::cli::EndpointsArgs;
use crate::client::Endpoint;

/// Registered endpoints, optionally restricted to one group (case-insensitive).
pub fn select_endpoints(group: Option<&str>) -> Result<Vec<Endpoint>, String> {
    let Some(group) = group else {
        return Ok(Endpoint::ALL.to_vec());
    };

    let selected: Vec<_> = Endpoint::ALL
        .iter()
        .copied()
        .filter(|e| e.group().eq_ignore_ascii_case(group))
        .collect();
    if selected.is_empty() {
        return Err(format!(
            "Unknown group '{}'. Known groups: {}",
            group,
            Endpoint::groups().join(", ")
        ));
    }
    Ok(selected)
}

/// Handle `livego endpoints` command
pub fn handle_endpoints(args: &EndpointsArgs) -> Result<String, Box<dyn std::error::Error>> {
    let descriptors: Vec<_> = select_endpoints(args.group.as_deref())?
        .into_iter()
        .map(Endpoint::descriptor)
        .collect();

    if args.json {
        Ok(format_endpoints_json(&descriptors)?)
    } else {
        Ok(format_endpoints_table(&descriptors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all_endpoints() {
        assert_eq!(select_endpoints(None).unwrap().len(), Endpoint::ALL.len());
    }

    #[test]
    fn test_select_group_is_case_insensitive() {
        let auth = select_endpoints(Some("auth")).unwrap();
        assert!(!auth.is_empty());
        assert!(auth.iter().all(|e| e.group() == "Auth"));
        assert_eq!(auth[0], Endpoint::AuthLogin);
    }

    #[test]
    fn test_select_unknown_group() {
        let err = select_endpoints(Some("Nope")).unwrap_err();
        assert!(err.contains("Unknown group 'Nope'"));
        assert!(err.contains("Auth"));
    }

    #[test]
    fn test_handle_endpoints_json() {
        let args = EndpointsArgs {
            json: true,
            group: Some("Wallet".to_string()),
        };
        let output = handle_endpoints(&args).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        let endpoints = parsed["endpoints"].as_array().unwrap();
        assert!(endpoints.iter().all(|e| e["group"] == "Wallet"));
    }
}
