//! Messaging deep links and shareable product links.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::products::Product;
use crate::stores::{LocatorData, Store};

/// Characters left as-is by a URI component encoder.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const MESSAGING_BASE: &str = "https://wa.me";

#[must_use]
pub fn interest_message(product: &Product) -> String {
    format!(
        "Ola! Tenho interesse no produto: {}\n\nREF:{}",
        product.name,
        product.reference()
    )
}

#[must_use]
pub fn messaging_link(handle: &str, message: &str) -> String {
    format!(
        "{MESSAGING_BASE}/{handle}?text={}",
        utf8_percent_encode(message, URI_COMPONENT)
    )
}

/// Link that opens a chat with the shopper's store about `product`.
///
/// Uses the selected store's handle, or the default store's when nothing is
/// selected yet.
#[must_use]
pub fn interest_link(product: &Product, selected: Option<&Store>, locator: &LocatorData) -> String {
    let store = selected.unwrap_or_else(|| locator.default_store());
    messaging_link(&store.contact_handle, &interest_message(product))
}

/// Shareable storefront URL that opens `product_id` directly.
#[must_use]
pub fn product_share_url(site_url: &str, product_id: i64) -> String {
    let separator = if site_url.contains('?') { '&' } else { '?' };
    format!("{site_url}{separator}produto={product_id}")
}
