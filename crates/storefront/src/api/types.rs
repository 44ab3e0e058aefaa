//! Request and response bodies for the Chicken One API.
//!
//! Field names are camelCase on the wire. Money arrives as JSON numbers and is
//! decoded straight into [`Decimal`] so it never passes through `f64` math.

use chicken_one_core::{
    BranchId, CartItemId, CartLine, DeliveryAreaId, DeliveryAreaInput, MenuItemId, Price,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful sign-in. Both password and third-party sign-in return this.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<&'a str>,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ConfirmEmailRequest<'a> {
    pub email: &'a str,
    pub code: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ForgotPasswordRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest<'a> {
    pub email: &'a str,
    pub code: &'a str,
    pub new_password: &'a str,
}

/// Body of endpoints that only answer with a message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Account
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Profile {
    /// "First Last", skipping missing parts.
    #[must_use]
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A saved delivery address. Only its existence matters to checkout.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub id: Option<i32>,
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub quantity: u32,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_price: Option<Decimal>,
    pub menu_item: Option<MenuItem>,
    #[serde(default)]
    pub menu_item_options: Vec<MenuItemOption>,
}

impl CartItem {
    /// Unit price, zero when the menu item is missing.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        self.menu_item
            .as_ref()
            .map_or(Price::ZERO, |m| Price::new(m.base_price))
    }

    /// The pricing view of this item.
    #[must_use]
    pub fn cart_line(&self) -> CartLine {
        CartLine {
            unit_price: self.unit_price(),
            quantity: self.quantity,
            line_total: self.total_price.map(Price::new),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub preparation_time_start: Option<u32>,
    #[serde(default)]
    pub preparation_time_end: Option<u32>,
    #[serde(default)]
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemOption {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartItemRequest {
    pub cart_item_id: CartItemId,
    pub quantity: u32,
}

// =============================================================================
// Branches & delivery fees
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
}

/// A delivery area as the API returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryArea {
    pub id: DeliveryAreaId,
    pub branch_id: BranchId,
    pub area_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub fee: Decimal,
    pub estimated_time_min: u32,
    pub estimated_time_max: u32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Create/update payload for a delivery area.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAreaRequest<'a> {
    pub branch_id: BranchId,
    pub area_name: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    pub fee: Decimal,
    pub estimated_time_min: u32,
    pub estimated_time_max: u32,
    pub is_active: bool,
}

impl<'a> From<&'a DeliveryAreaInput> for DeliveryAreaRequest<'a> {
    fn from(input: &'a DeliveryAreaInput) -> Self {
        Self {
            branch_id: input.branch_id,
            area_name: &input.area_name,
            fee: input.fee.amount(),
            estimated_time_min: input.estimated_time_min,
            estimated_time_max: input.estimated_time_max,
            is_active: input.is_active,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_item_decodes_api_shape() {
        let json = r#"{
            "id": 12,
            "quantity": 2,
            "totalPrice": 110.5,
            "menuItem": {
                "id": 4,
                "name": "Crispy Bucket",
                "description": "Eight pieces",
                "basePrice": 55.25,
                "imageUrl": "images/bucket.jpg",
                "preparationTimeStart": 10,
                "preparationTimeEnd": 20,
                "category": { "name": "Meals" }
            },
            "menuItemOptions": []
        }"#;

        let item: CartItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, CartItemId::new(12));
        assert_eq!(item.unit_price(), Price::from_piastres(5525));
        assert_eq!(
            item.cart_line().effective_total(),
            Price::from_piastres(11_050)
        );
    }

    #[test]
    fn test_cart_item_without_total_uses_unit_price() {
        let json = r#"{"id": 1, "quantity": 3, "menuItem": {"id": 2, "name": "Wings", "basePrice": 40}}"#;
        let item: CartItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.total_price, None);
        assert_eq!(
            item.cart_line().effective_total(),
            Price::from_piastres(12_000)
        );
    }

    #[test]
    fn test_delivery_area_request_shape() {
        let input = DeliveryAreaInput {
            branch_id: BranchId::new(2),
            area_name: "Maadi".to_string(),
            fee: Price::from_piastres(2000),
            estimated_time_min: 20,
            estimated_time_max: 40,
            is_active: true,
        };
        let value = serde_json::to_value(DeliveryAreaRequest::from(&input)).unwrap();
        assert_eq!(value["branchId"], 2);
        assert_eq!(value["areaName"], "Maadi");
        assert_eq!(value["fee"], 20.0);
        assert_eq!(value["estimatedTimeMax"], 40);
        assert_eq!(value["isActive"], true);
    }

    #[test]
    fn test_profile_full_name() {
        let profile: Profile = serde_json::from_str(
            r#"{"email":"a@b.c","firstName":"Mona","lastName":null,"roles":["Customer"]}"#,
        )
        .unwrap();
        assert_eq!(profile.full_name(), "Mona");
    }
}
