//! This crate contains all shared UI for the workspace.

mod platform;
pub use platform::{load_config, make_identity_store, PlatformCookies, PlatformIdentity, PlatformStore};

mod session;
pub use session::{
    refresh_session_state, use_services, use_session, AppServices, LogoutButton, SessionProvider,
    SessionState,
};

mod call;
pub use call::{use_api, ApiHandle, SignalBusy, UiClient};

pub mod notifications;
pub use notifications::{use_toasts, ToastNotifier, ToastPanel, Toasts};

mod guard;
pub use guard::RoleGuard;

mod role_picker;
pub use role_picker::RolePicker;

mod navbar;
pub use navbar::Navbar;
