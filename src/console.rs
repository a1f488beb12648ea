use crate::{
    auth::{AuthService, AuthState, FileStorage, KeyValueStorage, MemoryStorage, Session, SessionStore},
    client::ApiClient,
    config::ConsoleConfig,
    errors::ConsoleError,
    navigation::{guard, NavLink, Route, RouteDecision, DASHBOARD_TILES},
    screens::{
        InventoryScreen, MillScreen, PaperMasterScreen, PurchaseScreen, ShadeScreen,
        StockOutScreen,
    },
    services::ServiceFactory,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Application context: configuration, the shared API client, the session
/// and factories for every screen.
///
/// Screens for protected routes are only handed out while a session exists.
pub struct Console {
    config: ConsoleConfig,
    client: Arc<ApiClient>,
    auth: AuthService,
    services: ServiceFactory,
}

impl Console {
    /// Builds the console with file-backed session storage, falling back to
    /// memory when no session file location can be determined.
    pub fn new(config: ConsoleConfig) -> Result<Self, ConsoleError> {
        let storage: Arc<dyn KeyValueStorage> = match config.session_file_path() {
            Some(path) => {
                info!(path = %path.display(), "using session file");
                Arc::new(FileStorage::new(path))
            }
            None => {
                warn!("no session file location; session will not outlive this process");
                Arc::new(MemoryStorage::new())
            }
        };
        Self::with_storage(config, storage)
    }

    pub fn with_storage(
        config: ConsoleConfig,
        storage: Arc<dyn KeyValueStorage>,
    ) -> Result<Self, ConsoleError> {
        let client = Arc::new(ApiClient::from_config(&config)?);
        let auth = AuthService::new(
            client.clone(),
            SessionStore::new(storage),
            config.login_redirect_delay(),
        );
        auth.restore()?;
        let services = ServiceFactory::new(client.clone());
        Ok(Self {
            config,
            client,
            auth,
            services,
        })
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn services(&self) -> &ServiceFactory {
        &self.services
    }

    pub fn auth_state(&self) -> Result<AuthState, ConsoleError> {
        self.auth.state()
    }

    /// Resolves `path` and runs it through the route guard.
    pub fn navigate(&self, path: &str) -> Result<RouteDecision, ConsoleError> {
        Ok(guard(Route::from_path(path), &self.auth_state()?))
    }

    /// The session, provided `route` may be shown to the current operator.
    pub fn require(&self, route: Route) -> Result<Session, ConsoleError> {
        let state = self.auth_state()?;
        match guard(route, &state) {
            RouteDecision::Redirect(Route::Login) => Err(ConsoleError::NotAuthenticated),
            _ => state.session().cloned().ok_or(ConsoleError::NotAuthenticated),
        }
    }

    pub fn dashboard(&self) -> Result<&'static [NavLink], ConsoleError> {
        self.require(Route::Dashboard)?;
        Ok(&DASHBOARD_TILES)
    }

    pub fn mill_screen(&self) -> Result<MillScreen, ConsoleError> {
        self.require(Route::MillMaster)?;
        Ok(MillScreen::new(self.services.mills()))
    }

    pub fn shade_screen(&self) -> Result<ShadeScreen, ConsoleError> {
        self.require(Route::ShadeMaster)?;
        Ok(ShadeScreen::new(self.services.shades()))
    }

    pub fn paper_master_screen(&self) -> Result<PaperMasterScreen, ConsoleError> {
        self.require(Route::PaperMaster)?;
        Ok(PaperMasterScreen::new(self.services.paper_master()))
    }

    pub fn purchase_screen(&self) -> Result<PurchaseScreen, ConsoleError> {
        self.require(Route::PaperRaw)?;
        Ok(PurchaseScreen::new(
            self.services.purchases(),
            self.services.master_data(),
        ))
    }

    pub fn stock_out_screen(&self) -> Result<StockOutScreen, ConsoleError> {
        self.require(Route::PaperRaw)?;
        Ok(StockOutScreen::new(self.services.reels()))
    }

    pub fn inventory_screen(&self) -> Result<InventoryScreen, ConsoleError> {
        self.require(Route::PaperRaw)?;
        Ok(InventoryScreen::new(
            self.services.inventory(),
            self.config.search_debounce(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::UserInfo;
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn console(storage: Arc<MemoryStorage>) -> Console {
        Console::with_storage(ConsoleConfig::for_base_url("http://127.0.0.1:9/api"), storage).unwrap()
    }

    #[test]
    fn anonymous_operator_gets_no_screens() {
        let console = console(Arc::new(MemoryStorage::new()));
        assert_matches!(console.mill_screen(), Err(ConsoleError::NotAuthenticated));
        assert_matches!(console.dashboard(), Err(ConsoleError::NotAuthenticated));
        assert_eq!(
            console.navigate("/paper-raw").unwrap(),
            RouteDecision::Redirect(Route::Login)
        );
    }

    #[test]
    fn stored_session_is_restored_into_the_client() {
        let storage = Arc::new(MemoryStorage::new());
        SessionStore::new(storage.clone())
            .save(&Session {
                token: "tok".into(),
                user: Some(UserInfo {
                    email: "op@example.com".into(),
                    logged_in_at: Utc::now(),
                }),
            })
            .unwrap();

        let console = console(storage);
        assert_eq!(console.client().token().as_deref(), Some("tok"));
        assert!(console.mill_screen().is_ok());
        assert_eq!(console.dashboard().unwrap().len(), 4);
        assert_eq!(
            console.navigate("/login").unwrap(),
            RouteDecision::Redirect(Route::Dashboard)
        );

        console.auth().logout().unwrap();
        assert_matches!(console.require(Route::MillMaster), Err(ConsoleError::NotAuthenticated));
    }
}
