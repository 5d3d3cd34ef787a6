/// Answers whether the current session carries an authentication credential
pub trait SessionProvider: Send + Sync {
    fn auth_token(&self) -> Option<String>;

    fn is_authenticated(&self) -> bool {
        self.auth_token().is_some_and(|token| !token.is_empty())
    }
}
