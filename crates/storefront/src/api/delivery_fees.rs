//! Branch and delivery area endpoints used by the staff screens.

use chicken_one_core::{DeliveryAreaId, DeliveryAreaInput};
use tracing::{debug, instrument};

use super::{ApiClient, ApiError, BRANCH_CACHE_KEY, Branch, DeliveryArea, DeliveryAreaRequest};

impl ApiClient {
    /// List branches. Cached for 5 minutes.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip_all)]
    pub async fn branches(&self, token: &str) -> Result<Vec<Branch>, ApiError> {
        if let Some(branches) = self.inner.branches.get(BRANCH_CACHE_KEY).await {
            debug!("Cache hit for branches");
            return Ok(branches);
        }

        let branches: Vec<Branch> =
            Self::send_json(self.get("api/Branches/GetAll", token)?).await?;

        self.inner
            .branches
            .insert(BRANCH_CACHE_KEY, branches.clone())
            .await;

        Ok(branches)
    }

    /// List every delivery area.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip_all)]
    pub async fn delivery_fees(&self, token: &str) -> Result<Vec<DeliveryArea>, ApiError> {
        Self::send_json(self.get("api/DeliveryFees/GetAll", token)?).await
    }

    /// Create a delivery area.
    ///
    /// # Errors
    ///
    /// Returns error if the API rejects the area.
    #[instrument(skip(self, token, input), fields(area = %input.area_name))]
    pub async fn add_delivery_fee(
        &self,
        token: &str,
        input: &DeliveryAreaInput,
    ) -> Result<(), ApiError> {
        let request = self
            .post("api/DeliveryFees/Add")?
            .bearer_auth(token)
            .json(&DeliveryAreaRequest::from(input));
        Self::send_empty(request).await
    }

    /// Replace a delivery area.
    ///
    /// # Errors
    ///
    /// Returns error if the API rejects the update.
    #[instrument(skip(self, token, input), fields(area = %input.area_name))]
    pub async fn update_delivery_fee(
        &self,
        token: &str,
        id: DeliveryAreaId,
        input: &DeliveryAreaInput,
    ) -> Result<(), ApiError> {
        let request = self
            .put(&format!("api/DeliveryFees/Update/{id}"), token)?
            .json(&DeliveryAreaRequest::from(input));
        Self::send_empty(request).await
    }

    /// Delete a delivery area.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn delete_delivery_fee(
        &self,
        token: &str,
        id: DeliveryAreaId,
    ) -> Result<(), ApiError> {
        Self::send_empty(self.delete(&format!("api/DeliveryFees/Delete/{id}"), token)?).await
    }

    /// Flip a delivery area between active and inactive.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn toggle_delivery_fee(
        &self,
        token: &str,
        id: DeliveryAreaId,
    ) -> Result<(), ApiError> {
        Self::send_empty(self.put(&format!("api/DeliveryFees/ChangeActiveStatus/{id}"), token)?)
            .await
    }
}
