//! # Call wrapper — one way to talk to the API
//!
//! [`ApiClient::call`] is the single surface feature code uses to reach the
//! REST API. Given a busy flag and an [`ApiRequest`] it:
//!
//! 1. raises the busy flag through a [`BusyGuard`] (lowered on every exit path);
//! 2. resolves the relative path against the configured base URL;
//! 3. attaches the session's bearer token, if any;
//! 4. sends the request through the injected [`Transport`];
//! 5. on a 2xx, decodes the [`Envelope`](crate::envelope::Envelope) and returns
//!    its `data`;
//! 6. on any failure, logs it, emits exactly **one** notification with the
//!    server's `message` (or `"Error"`), and returns the error to the caller.
//!
//! There are no retries, no caching and no de-duplication: each call is sent
//! once and awaited once. Callers decide what a failure means for their
//! feature (inline error, retry button, give up).

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::busy::{BusyFlag, BusyGuard};
use crate::config::AppConfig;
use crate::envelope::{decode_failure, decode_success};
use crate::error::ApiError;
use crate::notify::{NoticeLevel, Notifier};
use crate::request::{resolve_url, ApiRequest, Method, RequestBody};
use crate::transport::{HttpRequest, HttpTransport, Transport};

/// The call wrapper.
#[derive(Clone, Debug)]
pub struct ApiClient<T: Transport, N: Notifier> {
    base_url: String,
    token: Option<String>,
    transport: T,
    notifier: N,
}

impl<N: Notifier> ApiClient<HttpTransport, N> {
    /// Client for the configured API using reqwest.
    pub fn from_config(config: &AppConfig, notifier: N) -> Self {
        Self::new(config.api.base_url.clone(), HttpTransport::new(), notifier)
    }
}

impl<T: Transport, N: Notifier> ApiClient<T, N> {
    pub fn new(base_url: impl Into<String>, transport: T, notifier: N) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            transport,
            notifier,
        }
    }

    /// Builder method to attach (or clear) the bearer token sent with every call.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `request` and return the envelope's `data`.
    pub async fn call<R, B>(&self, busy: &B, request: ApiRequest) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        B: BusyFlag + ?Sized,
    {
        let _busy = BusyGuard::acquire(busy);
        let method = request.method;
        let path = request.path.clone();

        match self.execute(request).await {
            Ok(data) => Ok(data),
            Err(e) => {
                tracing::error!("{} {} failed: {}", method, path, e);
                self.notifier.notify(NoticeLevel::Error, e.user_message());
                Err(e)
            }
        }
    }

    /// [`call`](Self::call) for callers holding the method as a string.
    ///
    /// An unknown method is a failure like any other: it is notified and
    /// returned without touching the network.
    pub async fn call_with<R, B>(
        &self,
        busy: &B,
        method: &str,
        path: &str,
        body: Option<RequestBody>,
        params: &[(String, String)],
    ) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        B: BusyFlag + ?Sized,
    {
        let method: Method = match method.parse() {
            Ok(method) => method,
            Err(e) => {
                let _busy = BusyGuard::acquire(busy);
                tracing::error!("{} {} rejected: {}", method, path, e);
                self.notifier.notify(NoticeLevel::Error, e.user_message());
                return Err(e);
            }
        };
        let request = ApiRequest {
            method,
            path: path.to_string(),
            body,
            params: params.to_vec(),
        };
        self.call(busy, request).await
    }

    pub async fn get<R, B>(&self, busy: &B, path: &str) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        B: BusyFlag + ?Sized,
    {
        self.call(busy, ApiRequest::get(path)).await
    }

    pub async fn post<R, P, B>(&self, busy: &B, path: &str, body: &P) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        P: Serialize,
        B: BusyFlag + ?Sized,
    {
        let request = self.with_json(ApiRequest::post(path), body)?;
        self.call(busy, request).await
    }

    pub async fn put<R, P, B>(&self, busy: &B, path: &str, body: &P) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        P: Serialize,
        B: BusyFlag + ?Sized,
    {
        let request = self.with_json(ApiRequest::put(path), body)?;
        self.call(busy, request).await
    }

    pub async fn patch<R, P, B>(&self, busy: &B, path: &str, body: &P) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        P: Serialize,
        B: BusyFlag + ?Sized,
    {
        let request = self.with_json(ApiRequest::patch(path), body)?;
        self.call(busy, request).await
    }

    pub async fn delete<R, B>(&self, busy: &B, path: &str) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        B: BusyFlag + ?Sized,
    {
        self.call(busy, ApiRequest::delete(path)).await
    }

    fn with_json<P: Serialize>(&self, request: ApiRequest, body: &P) -> Result<ApiRequest, ApiError> {
        request.json(body).inspect_err(|e| {
            tracing::error!("Failed to encode request body: {}", e);
            self.notifier.notify(NoticeLevel::Error, e.user_message());
        })
    }

    async fn execute<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let url = resolve_url(&self.base_url, &request.path, &request.params)?;
        tracing::debug!("{} {}", request.method, url);

        let response = self
            .transport
            .send(HttpRequest {
                method: request.method,
                url,
                bearer: self.token.clone(),
                body: request.body,
            })
            .await?;

        if !response.is_success() {
            return Err(decode_failure(response.status, &response.body));
        }
        decode_success(&response.body)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::rc::Rc;

    use super::*;
    use crate::transport::RawResponse;

    /// Scripted transport recording what it was asked to send.
    #[derive(Default)]
    pub struct FakeTransport {
        pub responses: RefCell<VecDeque<Result<RawResponse, ApiError>>>,
        pub sent: RefCell<Vec<HttpRequest>>,
        /// Busy flag value observed while each request was in flight.
        pub busy_seen: RefCell<Vec<bool>>,
        pub watch: RefCell<Option<Rc<Cell<bool>>>>,
    }

    impl FakeTransport {
        pub fn respond(&self, status: u16, body: &str) {
            self.responses
                .borrow_mut()
                .push_back(Ok(RawResponse::new(status, body.as_bytes().to_vec())));
        }

        pub fn fail(&self, error: ApiError) {
            self.responses.borrow_mut().push_back(Err(error));
        }

        pub fn watch_busy(&self, flag: Rc<Cell<bool>>) {
            *self.watch.borrow_mut() = Some(flag);
        }
    }

    impl Transport for FakeTransport {
        async fn send(&self, request: HttpRequest) -> Result<RawResponse, ApiError> {
            if let Some(flag) = self.watch.borrow().as_ref() {
                self.busy_seen.borrow_mut().push(flag.get());
            }
            self.sent.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Transport("no scripted response".to_string())))
        }
    }

    /// Notifier remembering every notice.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub notices: RefCell<Vec<(NoticeLevel, String)>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, level: NoticeLevel, message: &str) {
            self.notices.borrow_mut().push((level, message.to_string()));
        }
    }

    /// Busy flag remembering every transition.
    #[derive(Default)]
    pub struct RecordingBusy {
        pub transitions: RefCell<Vec<bool>>,
    }

    impl BusyFlag for RecordingBusy {
        fn set_busy(&self, busy: bool) {
            self.transitions.borrow_mut().push(busy);
        }
    }

    pub fn client() -> ApiClient<Rc<FakeTransport>, Rc<RecordingNotifier>> {
        ApiClient::new(
            "http://localhost:8080/api",
            Rc::new(FakeTransport::default()),
            Rc::new(RecordingNotifier::default()),
        )
    }
}
