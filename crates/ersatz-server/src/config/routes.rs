//! Routes file loading.
//!
//! A routes file is a JSON array (`.json`) or a YAML sequence (`.yaml`,
//! `.yml`) of route objects. Entries that do not deserialize as a route are
//! skipped with a warning so one typo does not take down the whole file.

use super::ConfigError;
use crate::route::RouteConfig;
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Load routes from a file, choosing the format by extension.
pub fn load_routes<P: AsRef<Path>>(path: P) -> Result<Vec<RouteConfig>, ConfigError> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let routes = parse_routes(&contents, format)?;
    info!("Loaded {} routes from {}", routes.len(), path.display());
    Ok(routes)
}

/// Parse a JSON routes document.
pub fn parse_routes_json(contents: &str) -> Result<Vec<RouteConfig>, ConfigError> {
    parse_routes(contents, Format::Json)
}

/// Parse a YAML routes document.
pub fn parse_routes_yaml(contents: &str) -> Result<Vec<RouteConfig>, ConfigError> {
    parse_routes(contents, Format::Yaml)
}

fn parse_routes(contents: &str, format: Format) -> Result<Vec<RouteConfig>, ConfigError> {
    let entries: Vec<Value> = match format {
        Format::Json => serde_json::from_str(contents)?,
        Format::Yaml => serde_yaml::from_str(contents)?,
    };

    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(route) => Some(route),
            Err(e) => {
                warn!("Skipping route {}: {}", index, e);
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_json_routes() {
        let file = write_temp(
            ".json",
            r#"[
                {"method": "GET", "path": "/users/:id", "responseBody": {"id": "{{path.id}}"}},
                {"method": "POST", "path": "/login", "requestBody": {"username": null}}
            ]"#,
        );

        let routes = load_routes(file.path()).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].path, "/users/:id");
        assert!(routes[1].request_body.is_some());
    }

    #[test]
    fn test_load_yaml_routes() {
        let file = write_temp(
            ".yml",
            r#"
- name: get user
  method: GET
  path: /users/:id
  responses:
    - rules:
        - target: path
          field: id
          operator: equals
          value: 1
      response:
        statusCode: 200
        body:
          name: "{{faker.name}}"
  defaultResponse:
    statusCode: 404
    body:
      error: not found
"#,
        );

        let routes = load_routes(file.path()).unwrap();
        assert_eq!(routes.len(), 1);
        let route = &routes[0];
        assert_eq!(route.responses[0].rules[0].value, "1");
        assert_eq!(route.default_response.as_ref().unwrap().status_code, 404);
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let routes = parse_routes_json(
            r#"[
                {"method": "GET", "path": "/ok"},
                {"method": "GET", "path": "/bad", "statusCode": "not a number"},
                "not an object",
                {"method": "GET", "path": "/also-ok"}
            ]"#,
        )
        .unwrap();
        let paths: Vec<&str> = routes.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, ["/ok", "/also-ok"]);
    }

    #[test]
    fn test_document_must_be_a_list() {
        assert!(matches!(
            parse_routes_json(r#"{"method": "GET"}"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            parse_routes_yaml("method: GET"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_temp(".toml", "[]");
        assert!(matches!(
            load_routes(file.path()),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_routes("/definitely/not/here/routes.json").unwrap_err();
        assert!(err.is_not_found());
    }
}
