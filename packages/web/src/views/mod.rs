mod login;
pub use login::Login;

mod home;
pub use home::Home;

mod select_role;
pub use select_role::SelectRole;

mod dashboards;
pub use dashboards::{AdminDashboard, CraftVillageDashboard, ModeratorDashboard, TourGuideDashboard};

mod not_found;
pub use not_found::NotFound;

pub const APP_CSS: &str = r#"
body {
    margin: 0;
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
    color: #2f2a24;
    background: #faf8f5;
}
.navbar { display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1.5rem; background: #ffffff; border-bottom: 1px solid #e8e2d9; }
.navbar-brand { font-weight: 700; color: #2f2a24; text-decoration: none; }
.navbar-session { display: flex; gap: 0.75rem; align-items: center; font-size: 0.875rem; }
.navbar-role { color: #8a6d3b; }
.page { max-width: 960px; margin: 0 auto; padding: 2rem 1.5rem; }
.login-container { display: flex; flex-direction: column; align-items: center; padding-top: 4rem; }
.login-form { display: flex; flex-direction: column; gap: 0.75rem; width: 100%; max-width: 320px; }
.login-form input { padding: 0.5rem 0.75rem; border: 1px solid #d8d0c4; border-radius: 4px; }
.login-btn, .role-option { padding: 0.625rem 1.25rem; border: none; border-radius: 4px; background: #2d6a4f; color: white; cursor: pointer; }
.login-btn:disabled { opacity: 0.5; cursor: not-allowed; }
.role-picker ul { list-style: none; padding: 0; display: flex; flex-direction: column; gap: 0.5rem; max-width: 320px; }
.role-option.active { background: #1b4332; }
.guard-pending { color: #8c8275; }
.guard-denied h2 { color: #9b2226; }
.toast-panel { position: fixed; bottom: 1rem; right: 1rem; display: flex; flex-direction: column; gap: 0.5rem; }
.toast { padding: 0.5rem 0.75rem; border-radius: 4px; background: #ffffff; box-shadow: 0 2px 8px rgba(0, 0, 0, 0.12); font-size: 0.875rem; }
.toast.error { border-left: 4px solid #9b2226; }
.toast.warning { border-left: 4px solid #ca6702; }
.toast.success { border-left: 4px solid #2d6a4f; }
.toast.info { border-left: 4px solid #0a9396; }
.toast-time { color: #8c8275; }
.toast-close { margin-left: 0.5rem; border: none; background: none; cursor: pointer; }
"#;
