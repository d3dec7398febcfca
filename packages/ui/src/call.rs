//! `use_api`: the call wrapper bound to a component.
//!
//! Each hook instance owns its own busy signal, so two widgets on the same page
//! show independent spinners. Failures are already toasted by the wrapper;
//! callers only decide what the error means for their own view.

use api::{ApiClient, ApiError, ApiRequest, BusyFlag, HttpTransport};
use dioxus::prelude::*;
use serde::de::DeserializeOwned;

use crate::notifications::{use_toasts, ToastNotifier, Toasts};
use crate::session::{use_services, AppServices};

/// [`BusyFlag`] backed by a Dioxus signal.
#[derive(Clone, Copy)]
pub struct SignalBusy(pub Signal<bool>);

impl BusyFlag for SignalBusy {
    fn set_busy(&self, busy: bool) {
        let mut signal = self.0;
        signal.set(busy);
    }
}

pub type UiClient = ApiClient<HttpTransport, ToastNotifier>;

#[derive(Clone)]
pub struct ApiHandle {
    busy: Signal<bool>,
    services: AppServices,
    toasts: Signal<Toasts>,
}

impl ApiHandle {
    /// True while a call made through this handle is in flight.
    pub fn is_busy(&self) -> bool {
        (self.busy)()
    }

    pub fn busy_flag(&self) -> SignalBusy {
        SignalBusy(self.busy)
    }

    /// A client carrying the stored bearer token.
    pub fn client(&self) -> UiClient {
        let token = self.services.identity.current().and_then(|s| s.token);
        ApiClient::new(
            self.services.config.api.base_url.clone(),
            self.services.transport.clone(),
            ToastNotifier(self.toasts),
        )
        .with_token(token)
    }

    pub async fn call<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        self.client().call(&self.busy_flag(), request).await
    }
}

pub fn use_api() -> ApiHandle {
    let busy = use_signal(|| false);
    ApiHandle {
        busy,
        services: use_services(),
        toasts: use_toasts(),
    }
}
