/// Full-page navigation seam. The browser shell backs this with
/// `window.location`; tests record the target.
///
/// Navigating to a gateway URL is a deliberate hand-off of control: once
/// called for a payment redirect, this app tracks nothing further until the
/// gateway redirects back to one of the fixed return URLs.
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &str);
}

/// Route the shell sends unauthenticated users to before any cart mutation.
pub const SIGN_IN_ROUTE: &str = "/signin";
