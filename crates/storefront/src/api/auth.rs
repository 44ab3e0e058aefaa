//! Sign-in, registration and password recovery endpoints.

use tracing::instrument;

use super::{
    ApiClient, ApiError, AuthResponse, ConfirmEmailRequest, ForgotPasswordRequest, LoginRequest,
    MessageResponse, RegisterRequest, ResetPasswordRequest,
};

impl ApiClient {
    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// `Unauthorized` or `Api` for rejected credentials, `Parse` if the API
    /// answered without a token.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let request = self
            .post("api/Auth/Login")?
            .json(&LoginRequest { email, password });
        let response: AuthResponse = Self::send_json(request).await?;

        if response.token.as_deref().is_none_or(str::is_empty) {
            return Err(ApiError::Parse("login response has no token".to_string()));
        }
        Ok(response)
    }

    /// Create an account. The API emails a confirmation code afterwards.
    ///
    /// # Errors
    ///
    /// Returns error if the API rejects the registration.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest<'_>) -> Result<(), ApiError> {
        Self::send_empty(self.post("api/Auth/Register")?.json(request)).await
    }

    /// Confirm an email address with the code from the confirmation email.
    ///
    /// # Errors
    ///
    /// Returns error if the code is wrong or expired.
    #[instrument(skip(self, code))]
    pub async fn confirm_email(&self, email: &str, code: &str) -> Result<(), ApiError> {
        let request = self
            .post("api/Auth/ConfirmEmail")?
            .json(&ConfirmEmailRequest { email, code });
        Self::send_empty(request).await
    }

    /// Ask the API to email a password reset link.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        let request = self
            .post("api/Auth/ForgetPassword")?
            .json(&ForgotPasswordRequest { email });
        Self::send_empty(request).await
    }

    /// Set a new password using the emailed reset code.
    ///
    /// # Errors
    ///
    /// Returns error if the API rejects the code or the password.
    #[instrument(skip(self, code, new_password))]
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ApiError> {
        let request = self.post("api/Auth/ResetPassword")?.json(&ResetPasswordRequest {
            email,
            code,
            new_password,
        });

        // Some deployments answer 200 with an empty body.
        let response = Self::send(request).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    /// Exchange an identity provider session token for an API token.
    ///
    /// The response may lack a token when the provider account is not linked.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the provider token is rejected.
    #[instrument(skip_all)]
    pub async fn clerk_login(&self, provider_token: &str) -> Result<AuthResponse, ApiError> {
        let request = self
            .post("api/auth/clerk-login")?
            .bearer_auth(provider_token)
            .json(&serde_json::json!({}));
        Self::send_json(request).await
    }
}
