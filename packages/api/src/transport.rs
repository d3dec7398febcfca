//! # Transport — the network seam under the call wrapper
//!
//! [`Transport`] takes a fully resolved [`HttpRequest`] and returns the raw
//! status and body. It knows nothing about envelopes, notifications or busy
//! flags; those live in [`crate::ApiClient`]. Keeping the seam this thin lets
//! the wrapper's behaviour be tested with a scripted fake while production
//! builds use [`HttpTransport`] (reqwest, native or `fetch` on wasm).
//!
//! No timeouts, retries or cancellation are imposed here; reqwest's defaults
//! apply.

use std::future::Future;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};

use crate::error::ApiError;
use crate::request::{FormField, Method, RequestBody};

/// A request ready to go on the wire.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub bearer: Option<String>,
    pub body: Option<RequestBody>,
}

/// What came back, before any interpretation.
#[derive(Clone, Debug, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Async trait for sending HTTP requests.
pub trait Transport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<RawResponse, ApiError>>;
}

impl<T: Transport + ?Sized> Transport for std::rc::Rc<T> {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<RawResponse, ApiError>> {
        (**self).send(request)
    }
}

/// reqwest-backed Transport.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, ApiError> {
        let mut builder = self
            .client
            .request(request.method.into(), request.url)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(token) = request.bearer.as_deref() {
            builder = builder.bearer_auth(token);
        }

        builder = match request.body {
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Multipart(fields)) => builder.multipart(build_form(fields)?),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn build_form(fields: Vec<(String, FormField)>) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for (name, field) in fields {
        form = match field {
            FormField::Text(value) => form.text(name, value),
            FormField::File(file) => {
                let part = Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.content_type)?;
                form.part(name, part)
            }
        };
    }
    Ok(form)
}
