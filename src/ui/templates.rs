// Askama template definitions

use askama::Template;

use crate::db::{PricePoint, TrackedProduct};

/// Render a price for display, or an em-dash placeholder when unknown.
pub fn fmt_price(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${}", group_thousands(&format!("{:.2}", v))),
        None => "—".to_string(),
    }
}

fn group_thousands(amount: &str) -> String {
    let (int_part, frac_part) = amount.split_once('.').unwrap_or((amount, ""));
    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    if frac_part.is_empty() {
        grouped
    } else {
        format!("{}.{}", grouped, frac_part)
    }
}

/// Render a stored timestamp as "Mar 02, 2025 09:00". Timestamps come from
/// SQLite's datetime('now') but the bot has historically written RFC 3339
/// too, so both are accepted; anything else passes through untouched.
pub fn fmt_date(value: &str) -> String {
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return dt.format("%b %d, %Y %H:%M").to_string();
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return dt.format("%b %d, %Y %H:%M").to_string();
    }
    value.to_string()
}

/// Chart x-axis label: just the date component.
pub fn date_label(recorded_at: &str) -> String {
    recorded_at.chars().take(10).collect()
}

/// A tracked product prepared for rendering (prices and dates preformatted,
/// using String instead of Option for templates).
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub asin: String,
    pub current_price: String,
    pub target_price: String,
    pub savings: String, // empty when either price is unknown
    pub status: &'static str,
    pub added_on: String,
}

impl ProductRow {
    pub fn from_product(product: &TrackedProduct) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            url: product.url.clone(),
            asin: product.asin.clone(),
            current_price: fmt_price(product.current_price),
            target_price: fmt_price(product.target_price),
            savings: product
                .savings()
                .map(|s| fmt_price(Some(s.abs())))
                .unwrap_or_default(),
            status: product.price_status(),
            added_on: fmt_date(&product.created_at),
        }
    }
}

// Landing page
#[derive(Template)]
#[template(path = "landing.html")]
pub struct LandingTemplate {
    pub total_users: i64,
    pub total_products: i64,
    pub whatsapp_number: String,
    pub sandbox_join: String,
}

// Dashboard (list of tracked products for a phone number)
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub phone: String,
    pub user_found: bool,
    pub products: Vec<ProductRow>,
    pub error: Option<String>,
    pub via_magic_link: bool,
}

// Product detail with price history chart
#[derive(Template)]
#[template(path = "product.html")]
pub struct ProductTemplate {
    pub product: ProductRow,
    pub user_phone: String,
    pub back_url: String,
    pub history_count: usize,
    pub chart_labels_json: String,
    pub chart_prices_json: String,
    pub error: Option<String>,
}

impl ProductTemplate {
    /// Serialize history into the label/price arrays the chart script reads.
    pub fn chart_data(history: &[PricePoint]) -> (String, String) {
        let labels: Vec<String> = history.iter().map(|p| date_label(&p.recorded_at)).collect();
        let prices: Vec<f64> = history.iter().map(|p| p.price).collect();
        (
            serde_json::to_string(&labels).unwrap_or_else(|_| "[]".to_string()),
            serde_json::to_string(&prices).unwrap_or_else(|_| "[]".to_string()),
        )
    }
}

// HTMX partial: single product row
#[derive(Template)]
#[template(path = "partials/product_row.html")]
pub struct ProductRowTemplate {
    pub product: ProductRow,
}

// Invalid/expired/consumed magic link
#[derive(Template)]
#[template(path = "token_error.html")]
pub struct TokenErrorTemplate {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_price() {
        assert_eq!(fmt_price(Some(19.99)), "$19.99");
        assert_eq!(fmt_price(Some(0.5)), "$0.50");
        assert_eq!(fmt_price(Some(1234.5)), "$1,234.50");
        assert_eq!(fmt_price(Some(1234567.0)), "$1,234,567.00");
        assert_eq!(fmt_price(None), "—");
    }

    #[test]
    fn test_fmt_date() {
        assert_eq!(fmt_date("2025-03-02 09:05:00"), "Mar 02, 2025 09:05");
        assert_eq!(fmt_date("2025-03-02T09:05:00+00:00"), "Mar 02, 2025 09:05");
        assert_eq!(fmt_date("garbage"), "garbage");
    }

    #[test]
    fn test_date_label() {
        assert_eq!(date_label("2025-03-02 09:05:00"), "2025-03-02");
        assert_eq!(date_label("2025"), "2025");
    }
}
