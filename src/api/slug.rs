//! Product slug construction
//!
//! Product pages are addressed as `{brand}-{name}-{size}-{product_id}`,
//! lowercased with spaces turned into hyphens.

/// Build a product slug from its parts (pure function)
pub fn build_slug(brand: &str, name: &str, size: &str, product_id: &str) -> String {
    normalize_slug(&format!("{brand}-{name}-{size}-{product_id}"))
}

/// Lowercase and replace spaces with hyphens
pub fn normalize_slug(raw: &str) -> String {
    raw.to_lowercase().replace(' ', "-")
}
