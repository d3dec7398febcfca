//! # Requests — what feature code hands to the call wrapper
//!
//! An [`ApiRequest`] is the `(method, url, body?, params?)` tuple every feature
//! hook builds. Paths are relative to the configured API base URL; the wrapper
//! resolves them with [`resolve_url`] right before sending.

use std::fmt;
use std::str::FromStr;

use reqwest::Url;
use serde::Serialize;

use crate::error::ApiError;

/// HTTP methods the API accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Method::Get),
            "post" => Ok(Method::Post),
            "put" => Ok(Method::Put),
            "delete" => Ok(Method::Delete),
            "patch" => Ok(Method::Patch),
            _ => Err(ApiError::InvalidMethod(s.to_string())),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
        }
    }
}

/// A file attached to a multipart body.
#[derive(Clone, Debug, PartialEq)]
pub struct FilePart {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// One field of a multipart form.
#[derive(Clone, Debug, PartialEq)]
pub enum FormField {
    Text(String),
    File(FilePart),
}

/// Request body.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    /// Multipart form data, used for image uploads.
    Multipart(Vec<(String, FormField)>),
}

/// A call as feature code describes it.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL, e.g. `"/news/123"`.
    pub path: String,
    pub body: Option<RequestBody>,
    pub params: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            params: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Body(e.to_string()))?;
        self.body = Some(RequestBody::Json(value));
        Ok(self)
    }

    /// Append a text field, switching the body to multipart.
    pub fn form_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_form_field(name.into(), FormField::Text(value.into()));
        self
    }

    /// Append a file field, switching the body to multipart.
    pub fn form_file(mut self, name: impl Into<String>, file: FilePart) -> Self {
        self.push_form_field(name.into(), FormField::File(file));
        self
    }

    /// Append a query parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    fn push_form_field(&mut self, name: String, field: FormField) {
        match &mut self.body {
            Some(RequestBody::Multipart(fields)) => fields.push((name, field)),
            _ => self.body = Some(RequestBody::Multipart(vec![(name, field)])),
        }
    }
}

/// Join a relative API path onto the base URL and append query parameters.
///
/// The base URL's own path is kept: `http://host/api` + `/news/1` is
/// `http://host/api/news/1`. Absolute URLs, `..` segments (encoded or not) and
/// backslashes are rejected, and the parsed result must stay on the base
/// origin under the base path, so feature code cannot point the wrapper
/// anywhere else.
pub fn resolve_url(base: &str, path: &str, params: &[(String, String)]) -> Result<Url, ApiError> {
    let invalid = |reason: &str| ApiError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };
    if path.contains("://") || path.starts_with("//") {
        return Err(invalid("absolute URLs are not allowed"));
    }
    if path.contains('\\') {
        return Err(invalid("backslashes are not allowed"));
    }
    let is_dot_segment = |segment: &str| {
        let lowered = segment.to_ascii_lowercase();
        matches!(lowered.as_str(), ".." | ".%2e" | "%2e." | "%2e%2e")
    };
    if path.split(['/', '?', '#']).any(is_dot_segment) {
        return Err(invalid("parent segments are not allowed"));
    }

    let base_url = Url::parse(base).map_err(|e| invalid(&e.to_string()))?;
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url = Url::parse(&joined).map_err(|e| invalid(&e.to_string()))?;

    let base_path = base_url.path().trim_end_matches('/');
    let under_base = url.path() == base_path
        || url
            .path()
            .strip_prefix(base_path)
            .is_some_and(|rest| rest.starts_with('/'));
    if url.origin() != base_url.origin() || !under_base {
        return Err(invalid("path leaves the API base URL"));
    }

    if !params.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("PATCH".parse::<Method>().unwrap(), Method::Patch);
        assert_eq!("Delete".parse::<Method>().unwrap(), Method::Delete);
        assert!(matches!(
            "options".parse::<Method>(),
            Err(ApiError::InvalidMethod(m)) if m == "options"
        ));
    }

    #[test]
    fn test_resolve_url_keeps_base_path() {
        let url = resolve_url("http://localhost:8080/api/", "/news/123", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/news/123");

        let url = resolve_url("http://localhost:8080/api", "tours", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/tours");
    }

    #[test]
    fn test_resolve_url_appends_params() {
        let params = vec![
            ("page".to_string(), "2".to_string()),
            ("q".to_string(), "Hội An".to_string()),
        ];
        let url = resolve_url("https://api.example/v1", "/tours", &params).unwrap();
        assert_eq!(url.path(), "/v1/tours");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, params);
    }

    #[test]
    fn test_resolve_url_rejects_escapes() {
        assert!(resolve_url("https://api.example", "https://evil.example/x", &[]).is_err());
        assert!(resolve_url("https://api.example", "//evil.example/x", &[]).is_err());
        assert!(resolve_url("https://api.example/v1", "/../admin", &[]).is_err());
    }

    #[test]
    fn test_resolve_url_rejects_disguised_parent_segments() {
        let base = "http://localhost:8080/api";
        for path in [
            "/%2e%2e/admin/users",
            "/%2E%2E/admin/users",
            "/.%2e/admin/users",
            "/tours/%2e%2E",
            "/..\\admin/users",
            "\\\\evil.example/x",
        ] {
            let err = resolve_url(base, path, &[]).unwrap_err();
            assert!(
                matches!(err, ApiError::InvalidPath { .. }),
                "{path} should be rejected, got {err:?}"
            );
        }

        // Dots inside a segment are ordinary characters
        let url = resolve_url(base, "/files/report..pdf", &[]).unwrap();
        assert_eq!(url.path(), "/api/files/report..pdf");
    }

    #[test]
    fn test_builder_switches_to_multipart() {
        let request = ApiRequest::post("/tours/7/images")
            .form_text("caption", "Rice terraces")
            .form_file(
                "image",
                FilePart {
                    file_name: "terraces.jpg".to_string(),
                    content_type: "image/jpeg".to_string(),
                    bytes: vec![0xff, 0xd8],
                },
            )
            .param("replace", true);

        match &request.body {
            Some(RequestBody::Multipart(fields)) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].0, "caption");
                assert!(matches!(&fields[1].1, FormField::File(f) if f.file_name == "terraces.jpg"));
            }
            other => panic!("expected multipart body, got {other:?}"),
        }
        assert_eq!(request.params, vec![("replace".to_string(), "true".to_string())]);
    }

    #[test]
    fn test_json_body() {
        let request = ApiRequest::put("/bookings/9")
            .json(&serde_json::json!({ "guests": 3 }))
            .unwrap();
        assert_eq!(
            request.body,
            Some(RequestBody::Json(serde_json::json!({ "guests": 3 })))
        );
    }
}
