use crate::client::NavigationContext;

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub auth_cookie: Option<String>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            auth_cookie: None,
        }
    }

    pub fn set_cookie(&mut self, cookie: String) {
        self.auth_cookie = Some(cookie);
    }

    /// Build the navigation context for the current invocation, forwarding
    /// the session cookie when one was provided.
    #[must_use]
    pub fn navigation_context(&self) -> NavigationContext {
        let ctx = NavigationContext::new(self.api_url.clone());

        match &self.auth_cookie {
            Some(cookie) => ctx.with_cookie(cookie.clone()),
            None => ctx,
        }
    }
}
