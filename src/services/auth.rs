use validator::Validate;

use crate::error::ClientResult;
use crate::models::user::{AuthResponse, LoginRequest, RegisterRequest, SessionUser, UserRole};
use crate::services::api::ApiClient;

#[derive(Clone)]
pub struct AuthApi {
    api: ApiClient,
}

impl AuthApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<SessionUser> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        log::info!("Signing in {}", request.email);
        let response: AuthResponse = self.api.post("/auth/login", &request, false).await?;
        self.start_session(response).await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str, role: UserRole) -> ClientResult<SessionUser> {
        let request = RegisterRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
            role,
        };
        request.validate()?;

        log::info!("Registering {} as {}", request.email, role);
        let response: AuthResponse = self.api.post("/auth/register", &request, false).await?;
        self.start_session(response).await
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.api.session().clear().await?;
        Ok(())
    }

    async fn start_session(&self, response: AuthResponse) -> ClientResult<SessionUser> {
        let user = response.user.clone();
        self.api.session().establish(response.token, response.user).await?;
        log::info!("Signed in as {}", user.id);
        Ok(user)
    }
}
