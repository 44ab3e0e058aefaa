//! Cart item endpoints.

use chicken_one_core::CartItemId;
use tracing::instrument;

use super::{ApiClient, ApiError, CartItem, UpdateCartItemRequest};

impl ApiClient {
    /// List the items in the user's cart.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip_all)]
    pub async fn cart_items(&self, token: &str) -> Result<Vec<CartItem>, ApiError> {
        Self::send_json(self.get("api/CartItems/GetAll", token)?).await
    }

    /// Set the quantity of a cart item.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn update_cart_item(
        &self,
        token: &str,
        id: CartItemId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        let request = self
            .put("api/CartItems/Update", token)?
            .json(&UpdateCartItemRequest {
                cart_item_id: id,
                quantity,
            });
        Self::send_empty(request).await
    }

    /// Remove an item from the cart.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn delete_cart_item(&self, token: &str, id: CartItemId) -> Result<(), ApiError> {
        Self::send_empty(self.delete(&format!("api/CartItems/Delete/{id}"), token)?).await
    }
}
