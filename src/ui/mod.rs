// Dashboard UI module
// Uses Askama templates + HTMX for server-side rendering

mod templates;

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::validation::parse_target_price;
use crate::db::{AccessToken, PricePoint, TrackedProduct, User};
use crate::AppState;

pub use templates::*;

// Helper to render templates and handle errors
fn render_template<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Template error: {}", e),
        )
            .into_response(),
    }
}

fn db_error(e: sqlx::Error) -> Response {
    tracing::error!("Database error: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
}

pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(landing))
        .route("/dashboard", get(dashboard))
        .route("/product/:id", get(product_detail))
        .route("/product/:id/delete", post(product_delete))
        .route("/product/:id/target", post(product_target))
        .route("/partials/product-row/:id", get(product_row_partial))
        .route("/d/:token", get(magic_link_dashboard))
}

// Landing page - explains the bot and shows the WhatsApp CTA.
// Counter queries degrade to zero rather than failing the page.
async fn landing(State(state): State<Arc<AppState>>) -> Response {
    let total_users = User::count(&state.db).await.unwrap_or(0);
    let total_products = TrackedProduct::count_active(&state.db).await.unwrap_or(0);

    render_template(LandingTemplate {
        total_users,
        total_products,
        whatsapp_number: state.config.whatsapp.number.clone(),
        sandbox_join: state.config.whatsapp.sandbox_join.clone(),
    })
}

#[derive(Deserialize)]
struct DashboardQuery {
    #[serde(default)]
    phone: String,
}

// User dashboard - tracked products for a phone number. An unknown number
// renders the page with a notice, never an error status.
async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let phone = query.phone.trim().to_string();

    let mut user_found = false;
    let mut products = Vec::new();
    let mut error = None;

    if !phone.is_empty() {
        let user = match User::find_by_phone(&state.db, &phone).await {
            Ok(user) => user,
            Err(e) => return db_error(e),
        };

        match user {
            Some(user) => {
                user_found = true;
                products = match TrackedProduct::list_active_for_user(&state.db, user.id).await {
                    Ok(list) => list.iter().map(ProductRow::from_product).collect(),
                    Err(e) => return db_error(e),
                };
            }
            None => {
                error = Some(format!("No user found with the number {}", phone));
            }
        }
    }

    render_template(DashboardTemplate {
        phone,
        user_found,
        products,
        error,
        via_magic_link: false,
    })
}

async fn render_product_page(
    state: &AppState,
    product: TrackedProduct,
    error: Option<String>,
) -> Response {
    let history = match PricePoint::for_product(&state.db, product.id).await {
        Ok(history) => history,
        Err(e) => return db_error(e),
    };

    let user_phone = match User::find_by_id(&state.db, product.user_id).await {
        Ok(user) => user.map(|u| u.phone_number).unwrap_or_default(),
        Err(e) => return db_error(e),
    };

    let (chart_labels_json, chart_prices_json) = ProductTemplate::chart_data(&history);
    let back_url = format!("/dashboard?phone={}", urlencoding::encode(&user_phone));

    render_template(ProductTemplate {
        product: ProductRow::from_product(&product),
        user_phone,
        back_url,
        history_count: history.len(),
        chart_labels_json,
        chart_prices_json,
        error,
    })
}

// Product detail page with price history chart
async fn product_detail(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Response {
    match TrackedProduct::find_active(&state.db, id).await {
        Ok(Some(product)) => render_product_page(&state, product, None).await,
        Ok(None) => (StatusCode::NOT_FOUND, "Product not found").into_response(),
        Err(e) => db_error(e),
    }
}

// Soft-delete a tracked product. HTMX callers get an empty fragment so the
// row disappears in place; plain form posts bounce back to the dashboard.
async fn product_delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let product = match TrackedProduct::find_active(&state.db, id).await {
        Ok(Some(product)) => product,
        Ok(None) => return (StatusCode::NOT_FOUND, "Product not found").into_response(),
        Err(e) => return db_error(e),
    };

    let phone = match User::find_by_id(&state.db, product.user_id).await {
        Ok(user) => user.map(|u| u.phone_number).unwrap_or_default(),
        Err(e) => return db_error(e),
    };

    if let Err(e) = TrackedProduct::soft_delete(&state.db, id).await {
        return db_error(e);
    }

    tracing::info!(product_id = id, "Soft-deleted product");

    if headers.contains_key("HX-Request") {
        return Html(String::new()).into_response();
    }

    Redirect::to(&format!(
        "/dashboard?phone={}",
        urlencoding::encode(&phone)
    ))
    .into_response()
}

#[derive(Deserialize)]
struct TargetForm {
    target_price: String,
}

// Update the target price for a product. Malformed input re-renders the
// product page with the validation message; the stored value is untouched.
async fn product_target(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Form(form): Form<TargetForm>,
) -> Response {
    let product = match TrackedProduct::find_active(&state.db, id).await {
        Ok(Some(product)) => product,
        Ok(None) => return (StatusCode::NOT_FOUND, "Product not found").into_response(),
        Err(e) => return db_error(e),
    };

    let target = match parse_target_price(&form.target_price) {
        Ok(target) => target,
        Err(message) => {
            let page = render_product_page(&state, product, Some(message)).await;
            return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
        }
    };

    if let Err(e) = TrackedProduct::update_target_price(&state.db, id, target).await {
        return db_error(e);
    }

    tracing::info!(product_id = id, target, "Updated target price");

    Redirect::to(&format!("/product/{}", id)).into_response()
}

// HTMX partial - single product row (for in-place row refresh)
async fn product_row_partial(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Response {
    match TrackedProduct::find_active(&state.db, id).await {
        Ok(Some(product)) => render_template(ProductRowTemplate {
            product: ProductRow::from_product(&product),
        }),
        Ok(None) => Html(String::new()).into_response(),
        Err(e) => db_error(e),
    }
}

// Magic link entry point. Consuming the token kills it; refreshing the page
// lands on the error view, which is the single-use contract working.
async fn magic_link_dashboard(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Response {
    let token_row = match AccessToken::consume(&state.db, &token).await {
        Ok(row) => row,
        Err(e) => return db_error(e),
    };

    let Some(token_row) = token_row else {
        return token_error_page();
    };

    let user = match User::find_by_id(&state.db, token_row.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return token_error_page(),
        Err(e) => return db_error(e),
    };

    let products = match TrackedProduct::list_active_for_user(&state.db, user.id).await {
        Ok(list) => list.iter().map(ProductRow::from_product).collect(),
        Err(e) => return db_error(e),
    };

    tracing::info!(user_id = user.id, "Magic link consumed");

    render_template(DashboardTemplate {
        phone: user.phone_number,
        user_found: true,
        products,
        error: None,
        via_magic_link: true,
    })
}

fn token_error_page() -> Response {
    let page = render_template(TokenErrorTemplate {});
    (StatusCode::GONE, page).into_response()
}
