/*
[INPUT]:  --data files (YAML or JSON) and repeated --field key=value flags
[OUTPUT]: Caller data mapping for OpensrsClient::call
[POS]:    Input layer - request data assembly for the CLI
[UPDATE]: When changing field syntax or accepted file formats
*/

use anyhow::{Context, Result, bail};
use opensrs_client::{Assoc, Value, assoc_from_json};
use std::path::Path;

/// Parse `a.b.c=value` into a key path and a value
pub fn parse_field(raw: &str) -> Result<(Vec<String>, String)> {
    let (path, value) = raw
        .split_once('=')
        .with_context(|| format!("field must look like key=value: {raw}"))?;
    let keys: Vec<String> = path.split('.').map(str::to_string).collect();
    if keys.iter().any(String::is_empty) {
        bail!("field key must not be empty: {raw}");
    }
    Ok((keys, value.to_string()))
}

/// Set `value` at the nested key path, creating intermediate mappings
fn insert_path(data: &mut Assoc, keys: &[String], value: String) -> Result<()> {
    let Some((last, parents)) = keys.split_last() else {
        return Ok(());
    };

    let mut current = data;
    for key in parents {
        let entry = current
            .entry(key.clone())
            .or_insert_with(|| Value::Assoc(Assoc::new()));
        current = match entry {
            Value::Assoc(assoc) => assoc,
            _ => bail!("field {key} is already set to a non-mapping value"),
        };
    }
    current.insert(last.clone(), Value::Text(value));
    Ok(())
}

/// Combine an optional data file with `key=value` fields
pub fn request_data(file: Option<&Path>, fields: &[String]) -> Result<Assoc> {
    let mut data = match file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("read data file {}", path.display()))?;
            // YAML is a superset of JSON
            let value: serde_json::Value =
                serde_yaml::from_str(&content).context("parse data file")?;
            assoc_from_json(value).context("data file must contain a mapping")?
        }
        None => Assoc::new(),
    };

    for raw in fields {
        let (keys, value) = parse_field(raw)?;
        insert_path(&mut data, &keys, value)?;
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field() {
        let (keys, value) = parse_field("attributes.domain=example.com").unwrap();
        assert_eq!(keys, vec!["attributes", "domain"]);
        assert_eq!(value, "example.com");

        let (_, value) = parse_field("note=a=b").unwrap();
        assert_eq!(value, "a=b");
    }

    #[test]
    fn test_parse_field_rejects_bad_input() {
        assert!(parse_field("no-equals").is_err());
        assert!(parse_field("a..b=1").is_err());
        assert!(parse_field("=1").is_err());
    }

    #[test]
    fn test_request_data_nests_fields() {
        let fields = vec![
            "object=DOMAIN".to_string(),
            "action=LOOKUP".to_string(),
            "attributes.domain=example.com".to_string(),
        ];
        let data = request_data(None, &fields).unwrap();

        assert_eq!(data["object"].as_str(), Some("DOMAIN"));
        let attributes = data["attributes"].as_assoc().unwrap();
        assert_eq!(attributes["domain"].as_str(), Some("example.com"));
    }

    #[test]
    fn test_request_data_rejects_scalar_parent() {
        let fields = vec!["a=1".to_string(), "a.b=2".to_string()];
        assert!(request_data(None, &fields).is_err());
    }

    #[test]
    fn test_request_data_merges_file() {
        let path =
            std::env::temp_dir().join(format!("opensrs-data-{}.yaml", std::process::id()));
        let content = "object: DOMAIN\nattributes:\n  domain: example.com\n  period: 1\n";
        std::fs::write(&path, content).unwrap();

        let fields = vec!["action=LOOKUP".to_string()];
        let data = request_data(Some(&path), &fields).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(data["action"].as_str(), Some("LOOKUP"));
        let attributes = data["attributes"].as_assoc().unwrap();
        assert_eq!(attributes["period"].as_str(), Some("1"));
    }
}
