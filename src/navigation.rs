//! Route table, navigation links and the protected-route guard.

use crate::auth::AuthState;
use serde::Serialize;
use strum::{Display, EnumIter};

/// Screens reachable in the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
pub enum Route {
    #[strum(to_string = "Login")]
    Login,
    #[strum(to_string = "Forgot Password")]
    ForgotPassword,
    #[strum(to_string = "Dashboard")]
    Dashboard,
    #[strum(to_string = "Mill Master")]
    MillMaster,
    #[strum(to_string = "Shade Master")]
    ShadeMaster,
    #[strum(to_string = "Paper Master")]
    PaperMaster,
    #[strum(to_string = "Paper Raw Material")]
    PaperRaw,
    #[strum(to_string = "Logout")]
    Logout,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::ForgotPassword => "/forgot-password",
            Route::Dashboard => "/dashboard",
            Route::MillMaster => "/mill-master",
            Route::ShadeMaster => "/shade-master",
            Route::PaperMaster => "/master",
            Route::PaperRaw => "/paper-raw",
            Route::Logout => "/logout",
        }
    }

    /// Resolves a path; anything unknown falls through to the login screen.
    pub fn from_path(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default().trim();
        let path = path.trim_end_matches('/');
        match path {
            "" | "/login" => Route::Login,
            "/forgot-password" => Route::ForgotPassword,
            "/dashboard" => Route::Dashboard,
            "/mill-master" => Route::MillMaster,
            "/shade-master" => Route::ShadeMaster,
            "/master" => Route::PaperMaster,
            "/paper-raw" => Route::PaperRaw,
            "/logout" => Route::Logout,
            _ => Route::Login,
        }
    }

    pub fn is_protected(self) -> bool {
        !matches!(self, Route::Login | Route::ForgotPassword)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "route", rename_all = "snake_case")]
pub enum RouteDecision {
    Render(Route),
    Redirect(Route),
}

impl RouteDecision {
    /// The screen that ends up on display.
    pub fn target(self) -> Route {
        match self {
            RouteDecision::Render(route) | RouteDecision::Redirect(route) => route,
        }
    }
}

/// Decides what to show for `route` given the current authentication state.
///
/// Protected routes require a session; the login screen bounces an
/// authenticated operator to the dashboard.
pub fn guard(route: Route, state: &AuthState) -> RouteDecision {
    match (route, state.is_authenticated()) {
        (Route::Login, true) => RouteDecision::Redirect(Route::Dashboard),
        (route, false) if route.is_protected() => RouteDecision::Redirect(Route::Login),
        (route, _) => RouteDecision::Render(route),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub route: Route,
}

const fn link(label: &'static str, route: Route) -> NavLink {
    NavLink { label, route }
}

/// Tiles on the main dashboard.
pub const DASHBOARD_TILES: [NavLink; 4] = [
    link("Paper Raw Material", Route::PaperRaw),
    link("Paper Master", Route::PaperMaster),
    link("Mill Master", Route::MillMaster),
    link("Shade Master", Route::ShadeMaster),
];

/// Top navigation bar shown on master screens.
pub const NAVBAR_LINKS: [NavLink; 5] = [
    link("Paper Raw", Route::PaperRaw),
    link("Paper Master", Route::PaperMaster),
    link("Mill Master", Route::MillMaster),
    link("Shade Master", Route::ShadeMaster),
    link("Logout", Route::Logout),
];

/// Actions offered on the paper raw-material dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize)]
pub enum PaperAction {
    #[strum(to_string = "Paper In")]
    PaperIn,
    #[strum(to_string = "Paper Out")]
    PaperOut,
    #[strum(to_string = "Inventory")]
    Inventory,
}
