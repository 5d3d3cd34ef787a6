use crate::domain::ports::SessionProvider;

/// Session whose credential is fixed at construction, typically from config
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    token: Option<String>,
}

impl StaticSession {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    pub fn authenticated(token: impl Into<String>) -> Self {
        Self::new(Some(token.into()))
    }

    pub fn anonymous() -> Self {
        Self::new(None)
    }
}

impl SessionProvider for StaticSession {
    fn auth_token(&self) -> Option<String> {
        self.token.clone()
    }
}
