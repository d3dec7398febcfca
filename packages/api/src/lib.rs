//! # API crate — the client's single road to the Tourbook REST API
//!
//! Everything the web frontend needs to talk to the backend and to know who is
//! using it lives here, free of any UI framework so it can be tested headless.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | The call wrapper: busy flag, URL resolution, bearer token, envelope decoding, one notification per failure |
//! | [`request`] | Request description (`method`, `path`, `body`, `params`) and URL resolution |
//! | [`transport`] | The [`Transport`] seam and its reqwest implementation |
//! | [`envelope`] | `{ data, message }` response decoding |
//! | [`busy`] | [`BusyFlag`] and the scoped [`BusyGuard`] |
//! | [`notify`] | [`Notifier`] seam for user-facing notices |
//! | [`identity`] | [`IdentityStore`]: persisted session identity and active role |
//! | [`gate`] | [`RouteGuard`]: which roles may open which routes |
//! | [`endpoints`] | Typed auth endpoints (`login`, `fetch_profile`, `logout`, image upload) |
//! | [`config`] | `tourbook.toml` loading with environment overrides |
//! | [`models`] | [`SessionIdentity`], [`Profile`], [`Role`] |
//! | [`error`] | [`ApiError`] |

pub mod busy;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod gate;
pub mod identity;
pub mod models;
pub mod notify;
pub mod request;
pub mod transport;

pub use busy::{BusyFlag, BusyGuard, NotBusy};
pub use client::ApiClient;
pub use config::{AppConfig, ConfigError, RouteRule, RoutesConfig, SessionConfig};
pub use envelope::Envelope;
pub use error::ApiError;
pub use gate::{Access, GuardState, RouteGuard};
pub use identity::IdentityStore;
pub use models::{Profile, Role, SessionIdentity};
pub use notify::{NoticeLevel, Notifier, TracingNotifier};
pub use request::{ApiRequest, FilePart, FormField, Method, RequestBody};
pub use transport::{HttpTransport, Transport};
