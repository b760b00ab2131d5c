use crate::api::TankApi;
use crate::auth::{AuthError, IdentityProvider};
use crate::shell::Shell;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub api: TankApi,
    pub identity: Option<Arc<dyn IdentityProvider>>,
    pub shell: Arc<Mutex<Shell>>,
}

impl AppState {
    pub fn new(api: TankApi, identity: Option<Arc<dyn IdentityProvider>>) -> Self {
        let gated = identity.is_some();
        Self {
            api,
            identity,
            shell: Arc::new(Mutex::new(Shell::new(gated))),
        }
    }

    /// Bearer token for the signed-in user, or `None` when no sign-in gate
    /// is configured.
    pub fn credential(&self) -> Result<Option<String>, AuthError> {
        let Some(provider) = self.identity.as_ref() else {
            return Ok(None);
        };
        let identity = provider.current_identity().ok_or(AuthError::NotSignedIn)?;
        provider.get_token(&identity).map(Some)
    }
}
