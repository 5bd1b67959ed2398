use crate::error::{CatalogError, CatalogResult};
use crate::item::Component;

/// Parse a single `ID:quantity` token, as used both in records and in
/// user input. Whitespace around the token and each half is ignored.
pub fn parse_token(token: &str) -> Result<Component, String> {
    let token = token.trim();
    let (item_id, quantity) = token
        .split_once(':')
        .ok_or_else(|| format!("'{}' is missing a quantity", token))?;

    let item_id = item_id.trim();
    if item_id.is_empty() {
        return Err(format!("'{}' is missing an item ID", token));
    }

    let quantity = quantity
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("'{}' has a non-integer quantity", token))?;

    Ok(Component::new(item_id, quantity))
}

/// Parse a comma separated list such as `"A:2,B:3"`.
///
/// A blank string is an empty list.
pub fn parse_components(spec: &str) -> CatalogResult<Vec<Component>> {
    if spec.trim().is_empty() {
        return Ok(Vec::new());
    }

    spec.split(',')
        .map(|token| parse_token(token).map_err(CatalogError::InvalidComponentSpec))
        .collect()
}

/// Render components as comma joined `ID:quantity` tokens
pub fn components_string(components: &[Component]) -> String {
    components
        .iter()
        .map(|c| format!("{}:{}", c.item_id, c.quantity))
        .collect::<Vec<_>>()
        .join(",")
}
