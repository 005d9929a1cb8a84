use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A catalog product as stored in the backend's products table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub sale_price: Option<Decimal>,
    /// Retailer reference code shown as `REF:` in contact messages.
    #[serde(default)]
    pub item_code: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Image URLs; the first is the listing thumbnail.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Product {
    /// Item code when present and non-blank, otherwise the numeric id.
    #[must_use]
    pub fn reference(&self) -> String {
        self.item_code
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map_or_else(|| self.id.to_string(), ToOwned::to_owned)
    }

    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    #[must_use]
    pub fn price_display(&self) -> PriceDisplay {
        match (self.price, self.sale_price) {
            (Some(price), Some(sale)) if !sale.is_zero() && sale < price => PriceDisplay::Sale {
                original: price,
                sale,
            },
            (Some(price), _) if !price.is_zero() => PriceDisplay::Regular(price),
            _ => PriceDisplay::OnRequest,
        }
    }
}

/// How a product's price should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceDisplay {
    /// No usable price; the shopper has to ask.
    OnRequest,
    Regular(Decimal),
    /// A non-zero sale price strictly below the list price.
    Sale { original: Decimal, sale: Decimal },
}

impl PriceDisplay {
    /// Renders the price the shopper pays, or `on_request` when there is none.
    #[must_use]
    pub fn current_label(&self, on_request: &str) -> String {
        match self {
            PriceDisplay::OnRequest => on_request.to_string(),
            PriceDisplay::Regular(price) => format_brl(*price),
            PriceDisplay::Sale { sale, .. } => format_brl(*sale),
        }
    }

    /// Like [`PriceDisplay::current_label`] but shows the struck list price
    /// alongside a sale price: `"de R$ 1.500,00 por R$ 1.299,90"`.
    #[must_use]
    pub fn full_label(&self, on_request: &str) -> String {
        match self {
            PriceDisplay::Sale { original, sale } => {
                format!("de {} por {}", format_brl(*original), format_brl(*sale))
            }
            other => other.current_label(on_request),
        }
    }
}

/// Formats an amount as Brazilian reais: `R$ 1.299,90`.
#[must_use]
pub fn format_brl(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}R$ {grouped},{frac_part}")
}

/// Editable product fields, as submitted by the admin form.
///
/// Optional fields serialize as `null` so an update clears them. `images`
/// is only sent when set, leaving stored images untouched on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub item_code: Option<String>,
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("product name must be non-empty")]
    EmptyName,
    #[error("invalid {field} '{value}': expected a decimal amount")]
    InvalidPrice { field: &'static str, value: String },
    #[error("{field} must not be negative")]
    NegativePrice { field: &'static str },
}

impl ProductDraft {
    /// Pre-fills a draft from an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            sale_price: product.sale_price,
            item_code: product.item_code.clone(),
            category: product.category.clone(),
            images: None,
        }
    }

    /// Parses a price typed into a form. Blank input means "no price";
    /// a decimal comma is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::InvalidPrice`] if the text is not a decimal.
    pub fn parse_price(field: &'static str, raw: &str) -> Result<Option<Decimal>, DraftError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed
            .replace(',', ".")
            .parse::<Decimal>()
            .map(Some)
            .map_err(|_| DraftError::InvalidPrice {
                field,
                value: trimmed.to_string(),
            })
    }

    /// Trims text fields, turns blanks into `None`, and checks the name and
    /// prices.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError`] when the name is blank or a price is negative.
    pub fn normalized(self) -> Result<Self, DraftError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DraftError::EmptyName);
        }
        for (field, value) in [("price", self.price), ("sale_price", self.sale_price)] {
            if value.is_some_and(|v| v.is_sign_negative() && !v.is_zero()) {
                return Err(DraftError::NegativePrice { field });
            }
        }

        Ok(Self {
            name,
            description: blank_to_none(self.description),
            price: self.price,
            sale_price: self.sale_price,
            item_code: blank_to_none(self.item_code),
            category: blank_to_none(self.category),
            images: self.images,
        })
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
