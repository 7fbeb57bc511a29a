use std::time::Duration;

/// Environment variable holding the admin user name.
pub const ADMIN_USER_ENV: &str = "REVIEW_ADMIN_USER";
/// Environment variable holding the admin password.
pub const ADMIN_PASSWORD_ENV: &str = "REVIEW_ADMIN_PASSWORD";

const FAILED_LOGIN_DELAY: Duration = Duration::from_secs(1);

#[derive(Clone)]
struct Credentials {
    username: String,
    password: String,
}

/// Guards the export operation behind configured admin credentials.
///
/// With no credentials configured every attempt fails.
#[derive(Clone, Default)]
pub struct AdminGate {
    credentials: Option<Credentials>,
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl AdminGate {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            credentials: Some(Credentials {
                username: username.into(),
                password: password.into(),
            }),
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Credentials from `REVIEW_ADMIN_USER` and `REVIEW_ADMIN_PASSWORD`.
    ///
    /// Either variable missing or empty disables the gate.
    #[must_use]
    pub fn from_env() -> Self {
        let user = std::env::var(ADMIN_USER_ENV).ok().filter(|v| !v.is_empty());
        let password = std::env::var(ADMIN_PASSWORD_ENV)
            .ok()
            .filter(|v| !v.is_empty());
        match (user, password) {
            (Some(user), Some(password)) => Self::new(user, password),
            _ => Self::disabled(),
        }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Check a login attempt. A failed attempt waits one second before returning.
    pub async fn check_login(&self, username: &str, password: &str) -> bool {
        let accepted = self
            .credentials
            .as_ref()
            .is_some_and(|creds| creds.username == username && creds.password == password);
        if !accepted {
            tracing::warn!(username, "admin login rejected");
            tokio::time::sleep(FAILED_LOGIN_DELAY).await;
        }
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn wrong_password_is_delayed_and_rejected() {
        let gate = AdminGate::new("admin", "s3cret");
        let started = tokio::time::Instant::now();
        assert!(!gate.check_login("admin", "guess").await);
        assert!(started.elapsed() >= FAILED_LOGIN_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn correct_credentials_pass_without_delay() {
        let gate = AdminGate::new("admin", "s3cret");
        let started = tokio::time::Instant::now();
        assert!(gate.check_login("admin", "s3cret").await);
        assert!(started.elapsed() < FAILED_LOGIN_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn unconfigured_gate_rejects_everything() {
        let gate = AdminGate::disabled();
        assert!(!gate.is_configured());
        assert!(!gate.check_login("", "").await);
        assert_eq!(format!("{gate:?}"), "AdminGate { configured: false }");
    }
}
