//! In-process stand-in for the Chicken One REST API.
//!
//! Implements just enough of each endpoint the storefront calls to drive
//! real flows: accounts with bearer tokens, per-user carts and addresses,
//! branches and delivery areas. State lives behind one mutex so tests can
//! seed it and inspect what the storefront sent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};

/// A confirmed customer with a saved address and a two-item cart.
pub const CUSTOMER_EMAIL: &str = "guest@chickenone.app";
pub const CUSTOMER_PASSWORD: &str = "Crispy#Wings1";

/// A confirmed customer with no saved address.
pub const NOMAD_EMAIL: &str = "nomad@chickenone.app";
pub const NOMAD_PASSWORD: &str = "Wander#Far7";

/// A branch manager.
pub const STAFF_EMAIL: &str = "manager@chickenone.app";
pub const STAFF_PASSWORD: &str = "Branch#Boss9";

/// The only `__session` value the identity provider exchange accepts.
pub const PROVIDER_TOKEN: &str = "provider-session-token";

/// Codes accepted by the confirmation and reset endpoints.
pub const CONFIRM_CODE: &str = "234200";
pub const RESET_CODE: &str = "481516";
/// Reset code the fake API treats as expired, answering 401.
pub const EXPIRED_RESET_CODE: &str = "271828";

/// A registered account.
#[derive(Debug, Clone)]
pub struct Account {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub roles: Vec<String>,
    pub confirmed: bool,
    pub has_address: bool,
}

impl Account {
    fn seeded(email: &str, password: &str, first_name: &str, role: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            first_name: first_name.to_string(),
            last_name: "Tester".to_string(),
            phone_number: None,
            roles: vec![role.to_string()],
            confirmed: true,
            has_address: true,
        }
    }
}

/// One cart row.
#[derive(Debug, Clone)]
pub struct CartRow {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub category: Option<String>,
}

impl CartRow {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "quantity": self.quantity,
            "totalPrice": self.price * f64::from(self.quantity),
            "menuItem": {
                "id": self.id + 100,
                "name": self.name,
                "description": format!("House {}", self.name.to_lowercase()),
                "basePrice": self.price,
                "imageUrl": null,
                "preparationTimeStart": 10,
                "preparationTimeEnd": 20,
                "category": self.category.as_ref().map(|name| json!({ "name": name })),
            },
            "menuItemOptions": [],
        })
    }
}

/// One delivery area.
#[derive(Debug, Clone)]
pub struct Area {
    pub id: i32,
    pub branch_id: i32,
    pub area_name: String,
    pub fee: f64,
    pub estimated_time_min: u32,
    pub estimated_time_max: u32,
    pub is_active: bool,
}

impl Area {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "branchId": self.branch_id,
            "areaName": self.area_name,
            "fee": self.fee,
            "estimatedTimeMin": self.estimated_time_min,
            "estimatedTimeMax": self.estimated_time_max,
            "isActive": self.is_active,
            "createdAt": "2026-09-01T08:00:00Z",
        })
    }
}

/// Everything the fake API knows.
#[derive(Debug, Default)]
pub struct BackendState {
    pub accounts: Vec<Account>,
    /// Bearer token to account email.
    pub tokens: HashMap<String, String>,
    /// Account email to cart rows.
    pub carts: HashMap<String, Vec<CartRow>>,
    pub branches: Vec<(i32, String)>,
    pub areas: Vec<Area>,
    /// Emails that asked for a reset link.
    pub reset_requests: Vec<String>,
    /// How many times the branch list was fetched.
    pub branch_fetches: usize,
    next_id: i32,
}

impl BackendState {
    fn account(&self, email: &str) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email))
    }

    fn account_mut(&mut self, email: &str) -> Option<&mut Account> {
        self.accounts
            .iter_mut()
            .find(|a| a.email.eq_ignore_ascii_case(email))
    }

    fn issue_token(&mut self, email: &str) -> String {
        self.next_id += 1;
        let token = format!("token-{}", self.next_id);
        self.tokens.insert(token.clone(), email.to_string());
        token
    }

    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    /// Email of the account behind the request's bearer token.
    fn caller(&self, headers: &HeaderMap) -> Option<String> {
        let token = headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;
        self.tokens.get(token).cloned()
    }
}

/// Shared handle to the fake API.
#[derive(Clone)]
pub struct Backend(Arc<Mutex<BackendState>>);

impl Backend {
    /// Accounts, carts, branches and areas used across the test suite.
    #[must_use]
    pub fn seeded() -> Self {
        let mut nomad = Account::seeded(NOMAD_EMAIL, NOMAD_PASSWORD, "Nour", "Customer");
        nomad.has_address = false;

        let mut state = BackendState {
            accounts: vec![
                Account::seeded(CUSTOMER_EMAIL, CUSTOMER_PASSWORD, "Mona", "Customer"),
                nomad,
                Account::seeded(STAFF_EMAIL, STAFF_PASSWORD, "Karim", "Branch"),
            ],
            branches: vec![(1, "Downtown".to_string()), (2, "Maadi".to_string())],
            next_id: 100,
            ..BackendState::default()
        };

        state.carts.insert(
            CUSTOMER_EMAIL.to_string(),
            vec![
                CartRow {
                    id: 1,
                    name: "Crispy Bucket".to_string(),
                    price: 120.0,
                    quantity: 1,
                    category: Some("Main Courses".to_string()),
                },
                CartRow {
                    id: 2,
                    name: "Garlic Wings".to_string(),
                    price: 45.5,
                    quantity: 2,
                    category: None,
                },
            ],
        );
        state.carts.insert(
            NOMAD_EMAIL.to_string(),
            vec![CartRow {
                id: 3,
                name: "Iced Tea".to_string(),
                price: 20.0,
                quantity: 1,
                category: Some("Beverages".to_string()),
            }],
        );

        state.areas = vec![
            Area {
                id: 1,
                branch_id: 1,
                area_name: "Zamalek".to_string(),
                fee: 25.0,
                estimated_time_min: 20,
                estimated_time_max: 35,
                is_active: true,
            },
            Area {
                id: 2,
                branch_id: 2,
                area_name: "Degla".to_string(),
                fee: 15.5,
                estimated_time_min: 15,
                estimated_time_max: 25,
                is_active: false,
            },
        ];

        Self(Arc::new(Mutex::new(state)))
    }

    /// Lock the state for seeding or inspection.
    pub fn state(&self) -> MutexGuard<'_, BackendState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Forget every issued token, as if they all expired.
    pub fn revoke_tokens(&self) {
        self.state().tokens.clear();
    }

    /// Router serving the API endpoints.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(|| async { "Chicken One API" }))
            .route("/api/Auth/Login", post(login))
            .route("/api/Auth/Register", post(register))
            .route("/api/Auth/ConfirmEmail", post(confirm_email))
            .route("/api/Auth/ForgetPassword", post(forgot_password))
            .route("/api/Auth/ResetPassword", post(reset_password))
            .route("/api/auth/clerk-login", post(clerk_login))
            .route("/api/Account/Profile", get(profile))
            .route("/api/Addresses/GetAll", get(addresses))
            .route("/api/CartItems/GetAll", get(cart_items))
            .route("/api/CartItems/Update", put(update_cart_item))
            .route("/api/CartItems/Delete/{id}", delete(delete_cart_item))
            .route("/api/Branches/GetAll", get(branches))
            .route("/api/DeliveryFees/GetAll", get(delivery_fees))
            .route("/api/DeliveryFees/Add", post(add_delivery_fee))
            .route("/api/DeliveryFees/Update/{id}", put(update_delivery_fee))
            .route("/api/DeliveryFees/Delete/{id}", delete(delete_delivery_fee))
            .route(
                "/api/DeliveryFees/ChangeActiveStatus/{id}",
                put(toggle_delivery_fee),
            )
            .with_state(self.clone())
    }
}

// =============================================================================
// Responses
// =============================================================================

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

fn unauthorized() -> Response {
    StatusCode::UNAUTHORIZED.into_response()
}

fn auth_body(account: &Account, token: &str) -> Value {
    json!({
        "token": token,
        "firstName": account.first_name,
        "lastName": account.last_name,
        "email": account.email,
        "roles": account.roles,
    })
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(State(backend): State<Backend>, Json(body): Json<LoginBody>) -> Response {
    let mut state = backend.state();
    let Some(account) = state
        .account(&body.email)
        .filter(|a| a.password == body.password && a.confirmed)
        .cloned()
    else {
        return message(StatusCode::BAD_REQUEST, "Invalid email or password");
    };

    let token = state.issue_token(&account.email);
    Json(auth_body(&account, &token)).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterBody {
    first_name: String,
    last_name: String,
    email: String,
    phone_number: Option<String>,
    password: String,
}

async fn register(State(backend): State<Backend>, Json(body): Json<RegisterBody>) -> Response {
    let mut state = backend.state();
    if state.account(&body.email).is_some() {
        return message(StatusCode::BAD_REQUEST, "Email is already registered");
    }

    state.accounts.push(Account {
        email: body.email,
        password: body.password,
        first_name: body.first_name,
        last_name: body.last_name,
        phone_number: body.phone_number,
        roles: vec!["Customer".to_string()],
        confirmed: false,
        has_address: false,
    });
    Json(json!({})).into_response()
}

#[derive(Deserialize)]
struct ConfirmBody {
    email: String,
    code: String,
}

async fn confirm_email(State(backend): State<Backend>, Json(body): Json<ConfirmBody>) -> Response {
    let mut state = backend.state();
    match state.account_mut(&body.email) {
        Some(account) if body.code == CONFIRM_CODE => {
            account.confirmed = true;
            Json(json!({})).into_response()
        }
        _ => message(StatusCode::BAD_REQUEST, "Invalid confirmation code"),
    }
}

#[derive(Deserialize)]
struct ForgotBody {
    email: String,
}

async fn forgot_password(State(backend): State<Backend>, Json(body): Json<ForgotBody>) -> Response {
    backend.state().reset_requests.push(body.email);
    Json(json!({})).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResetBody {
    email: String,
    code: String,
    new_password: String,
}

async fn reset_password(State(backend): State<Backend>, Json(body): Json<ResetBody>) -> Response {
    let mut state = backend.state();
    match state.account_mut(&body.email) {
        Some(account) if body.code == RESET_CODE => {
            account.password = body.new_password;
            Json(json!({ "message": "Password has been reset successfully" })).into_response()
        }
        Some(_) if body.code == EXPIRED_RESET_CODE => {
            message(StatusCode::UNAUTHORIZED, "Reset code expired")
        }
        _ => message(StatusCode::BAD_REQUEST, "Invalid or expired reset code"),
    }
}

async fn clerk_login(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if provided != Some(PROVIDER_TOKEN) {
        return unauthorized();
    }

    let mut state = backend.state();
    let Some(account) = state.account(CUSTOMER_EMAIL).cloned() else {
        return unauthorized();
    };
    let token = state.issue_token(&account.email);
    Json(auth_body(&account, &token)).into_response()
}

// =============================================================================
// Account
// =============================================================================

async fn profile(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    let state = backend.state();
    let Some(account) = state.caller(&headers).and_then(|e| state.account(&e).cloned()) else {
        return unauthorized();
    };

    Json(json!({
        "id": format!("user-{}", account.first_name.to_lowercase()),
        "firstName": account.first_name,
        "lastName": account.last_name,
        "email": account.email,
        "phoneNumber": account.phone_number,
        "roles": account.roles,
    }))
    .into_response()
}

async fn addresses(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    let state = backend.state();
    let Some(account) = state.caller(&headers).and_then(|e| state.account(&e).cloned()) else {
        return unauthorized();
    };

    let list = if account.has_address {
        json!([{ "id": 1 }])
    } else {
        json!([])
    };
    Json(list).into_response()
}

// =============================================================================
// Cart
// =============================================================================

async fn cart_items(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    let state = backend.state();
    let Some(email) = state.caller(&headers) else {
        return unauthorized();
    };

    let rows: Vec<Value> = state
        .carts
        .get(&email)
        .map(|rows| rows.iter().map(CartRow::to_json).collect())
        .unwrap_or_default();
    Json(rows).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBody {
    cart_item_id: i32,
    quantity: u32,
}

async fn update_cart_item(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<UpdateBody>,
) -> Response {
    let mut state = backend.state();
    let Some(email) = state.caller(&headers) else {
        return unauthorized();
    };

    let row = state
        .carts
        .get_mut(&email)
        .and_then(|rows| rows.iter_mut().find(|r| r.id == body.cart_item_id));
    match row {
        Some(row) => {
            row.quantity = body.quantity;
            Json(json!({})).into_response()
        }
        None => message(StatusCode::NOT_FOUND, "Cart item not found"),
    }
}

async fn delete_cart_item(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Response {
    let mut state = backend.state();
    let Some(email) = state.caller(&headers) else {
        return unauthorized();
    };

    let Some(rows) = state.carts.get_mut(&email) else {
        return message(StatusCode::NOT_FOUND, "Cart item not found");
    };
    let before = rows.len();
    rows.retain(|r| r.id != id);
    if rows.len() == before {
        return message(StatusCode::NOT_FOUND, "Cart item not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

// =============================================================================
// Branches & delivery fees
// =============================================================================

async fn branches(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    let mut state = backend.state();
    if state.caller(&headers).is_none() {
        return unauthorized();
    }

    state.branch_fetches += 1;
    let list: Vec<Value> = state
        .branches
        .iter()
        .map(|(id, name)| json!({ "id": id, "name": name }))
        .collect();
    Json(list).into_response()
}

async fn delivery_fees(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    let state = backend.state();
    if state.caller(&headers).is_none() {
        return unauthorized();
    }

    let list: Vec<Value> = state.areas.iter().map(Area::to_json).collect();
    Json(list).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AreaBody {
    branch_id: i32,
    area_name: String,
    fee: f64,
    estimated_time_min: u32,
    estimated_time_max: u32,
    is_active: bool,
}

async fn add_delivery_fee(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<AreaBody>,
) -> Response {
    let mut state = backend.state();
    if state.caller(&headers).is_none() {
        return unauthorized();
    }

    let duplicate = state
        .areas
        .iter()
        .any(|a| a.branch_id == body.branch_id && a.area_name.eq_ignore_ascii_case(&body.area_name));
    if duplicate {
        return message(StatusCode::BAD_REQUEST, "Delivery area already exists");
    }

    let id = state.next_id();
    state.areas.push(Area {
        id,
        branch_id: body.branch_id,
        area_name: body.area_name,
        fee: body.fee,
        estimated_time_min: body.estimated_time_min,
        estimated_time_max: body.estimated_time_max,
        is_active: body.is_active,
    });
    (StatusCode::CREATED, Json(json!({ "id": id }))).into_response()
}

async fn update_delivery_fee(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(body): Json<AreaBody>,
) -> Response {
    let mut state = backend.state();
    if state.caller(&headers).is_none() {
        return unauthorized();
    }

    let Some(area) = state.areas.iter_mut().find(|a| a.id == id) else {
        return message(StatusCode::NOT_FOUND, "Delivery area not found");
    };
    *area = Area {
        id,
        branch_id: body.branch_id,
        area_name: body.area_name,
        fee: body.fee,
        estimated_time_min: body.estimated_time_min,
        estimated_time_max: body.estimated_time_max,
        is_active: body.is_active,
    };
    Json(json!({})).into_response()
}

async fn delete_delivery_fee(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Response {
    let mut state = backend.state();
    if state.caller(&headers).is_none() {
        return unauthorized();
    }

    let before = state.areas.len();
    state.areas.retain(|a| a.id != id);
    if state.areas.len() == before {
        return message(StatusCode::NOT_FOUND, "Delivery area not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn toggle_delivery_fee(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Response {
    let mut state = backend.state();
    if state.caller(&headers).is_none() {
        return unauthorized();
    }

    match state.areas.iter_mut().find(|a| a.id == id) {
        Some(area) => {
            area.is_active = !area.is_active;
            Json(json!({})).into_response()
        }
        None => message(StatusCode::NOT_FOUND, "Delivery area not found"),
    }
}
