//! Profile and address endpoints.

use tracing::instrument;

use super::{Address, ApiClient, ApiError, Profile};

impl ApiClient {
    /// Fetch the signed-in user's profile, including roles.
    ///
    /// # Errors
    ///
    /// `Unauthorized` if the token is no longer valid.
    #[instrument(skip_all)]
    pub async fn profile(&self, token: &str) -> Result<Profile, ApiError> {
        Self::send_json(self.get("api/Account/Profile", token)?).await
    }

    /// List the user's saved delivery addresses.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip_all)]
    pub async fn addresses(&self, token: &str) -> Result<Vec<Address>, ApiError> {
        Self::send_json(self.get("api/Addresses/GetAll", token)?).await
    }

    /// Whether the user has at least one delivery address.
    ///
    /// Any failure counts as "no address" so checkout asks for one.
    pub async fn has_address(&self, token: &str) -> bool {
        match self.addresses(token).await {
            Ok(addresses) => !addresses.is_empty(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not load addresses");
                false
            }
        }
    }
}
