use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub uid: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("not signed in")]
    NotSignedIn,
    #[error("identity '{0}' is not the signed-in user")]
    UnknownIdentity(String),
}

/// The external identity collaborator. Only these operations are consumed;
/// the provider protocol behind them is someone else's problem.
pub trait IdentityProvider: Send + Sync {
    fn sign_in(&self) -> Result<Identity, AuthError>;
    fn sign_out(&self);
    fn current_identity(&self) -> Option<Identity>;
    fn get_token(&self, identity: &Identity) -> Result<String, AuthError>;
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}

/// Signs in as a single configured user holding a fixed bearer token.
pub struct StaticTokenProvider {
    identity: Identity,
    token: String,
    state: watch::Sender<Option<Identity>>,
}

impl StaticTokenProvider {
    pub fn new(display_name: impl Into<String>, token: impl Into<String>) -> Self {
        let display_name = display_name.into();
        let (state, _) = watch::channel(None);
        Self {
            identity: Identity {
                uid: display_name.to_lowercase().replace(' ', "-"),
                display_name,
            },
            token: token.into(),
            state,
        }
    }
}

impl IdentityProvider for StaticTokenProvider {
    fn sign_in(&self) -> Result<Identity, AuthError> {
        self.state.send_replace(Some(self.identity.clone()));
        Ok(self.identity.clone())
    }

    fn sign_out(&self) {
        self.state.send_replace(None);
    }

    fn current_identity(&self) -> Option<Identity> {
        self.state.borrow().clone()
    }

    fn get_token(&self, identity: &Identity) -> Result<String, AuthError> {
        match self.state.borrow().as_ref() {
            Some(current) if current == identity => Ok(self.token.clone()),
            Some(_) => Err(AuthError::UnknownIdentity(identity.uid.clone())),
            None => Err(AuthError::NotSignedIn),
        }
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_only_available_while_signed_in() {
        let provider = StaticTokenProvider::new("Reef Keeper", "secret");
        assert_eq!(provider.current_identity(), None);

        let identity = provider.sign_in().unwrap();
        assert_eq!(identity.uid, "reef-keeper");
        assert_eq!(provider.get_token(&identity).unwrap(), "secret");

        provider.sign_out();
        assert_eq!(provider.get_token(&identity), Err(AuthError::NotSignedIn));
    }

    #[test]
    fn foreign_identity_gets_no_token() {
        let provider = StaticTokenProvider::new("keeper", "secret");
        provider.sign_in().unwrap();
        let stranger = Identity {
            uid: "someone".into(),
            display_name: "Someone".into(),
        };
        assert!(matches!(
            provider.get_token(&stranger),
            Err(AuthError::UnknownIdentity(_))
        ));
    }

    #[tokio::test]
    async fn subscribers_observe_sign_in_and_out() {
        let provider = StaticTokenProvider::new("keeper", "secret");
        let mut changes = provider.subscribe();

        provider.sign_in().unwrap();
        changes.changed().await.unwrap();
        assert!(changes.borrow_and_update().is_some());

        provider.sign_out();
        changes.changed().await.unwrap();
        assert!(changes.borrow_and_update().is_none());
    }
}
