use serde::{Deserialize, Serialize};
use crate::catalog::Products;
use crate::components::components_string;
use crate::error::{CatalogError, CatalogResult};

/// Item variants in the catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    Part,
    Compound,
}

/// A quantity of another catalog item used by a compound
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Component {
    pub item_id: String,
    pub quantity: i64,
}

impl Component {
    pub fn new(item_id: impl Into<String>, quantity: i64) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

/// Variant-specific data of an item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemDetail {
    /// Atomic item with a stored unit cost
    Part { cost: i64 },

    /// Assembly whose cost is derived from its components
    Compound { components: Vec<Component> },
}

/// Core catalog item: shared identity plus part/compound detail
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    id: String,
    name: String,
    #[serde(flatten)]
    detail: ItemDetail,
}

impl Item {
    pub fn part(id: impl Into<String>, name: impl Into<String>, cost: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            detail: ItemDetail::Part { cost },
        }
    }

    pub fn compound(
        id: impl Into<String>,
        name: impl Into<String>,
        components: Vec<Component>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            detail: ItemDetail::Compound { components },
        }
    }

    /// Immutable after creation; the catalog keys items by it.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn kind(&self) -> ItemKind {
        match self.detail {
            ItemDetail::Part { .. } => ItemKind::Part,
            ItemDetail::Compound { .. } => ItemKind::Compound,
        }
    }

    pub fn detail(&self) -> &ItemDetail {
        &self.detail
    }

    /// Component list of a compound, `None` for a part
    pub fn components(&self) -> Option<&[Component]> {
        match &self.detail {
            ItemDetail::Part { .. } => None,
            ItemDetail::Compound { components } => Some(components),
        }
    }

    /// Update the unit cost. Only parts carry a settable cost.
    pub fn set_cost(&mut self, new_cost: i64) -> CatalogResult<()> {
        match &mut self.detail {
            ItemDetail::Part { cost } => {
                *cost = new_cost;
                Ok(())
            }
            ItemDetail::Compound { .. } => Err(CatalogError::NotAPart(self.id.clone())),
        }
    }

    /// Replace the whole component list. Only compounds carry one.
    pub fn set_components(&mut self, new_components: Vec<Component>) -> CatalogResult<()> {
        match &mut self.detail {
            ItemDetail::Compound { components } => {
                *components = new_components;
                Ok(())
            }
            ItemDetail::Part { .. } => Err(CatalogError::NotACompound(self.id.clone())),
        }
    }

    /// IDs this item directly references, in component order.
    /// Duplicates are kept.
    pub fn dependencies(&self) -> Vec<&str> {
        match &self.detail {
            ItemDetail::Part { .. } => Vec::new(),
            ItemDetail::Compound { components } => {
                components.iter().map(|c| c.item_id.as_str()).collect()
            }
        }
    }

    /// Cost of this item, resolving components against `catalog`.
    ///
    /// Recomputed from the leaves on every call. Fails with `NotFound` when a
    /// component is missing from the catalog and `CyclicDependency` when the
    /// component graph loops back on itself.
    pub fn cost(&self, catalog: &Products) -> CatalogResult<i64> {
        catalog.derive_cost(self)
    }

    /// Fixed-width line for listings
    pub fn display_line(&self, catalog: &Products) -> CatalogResult<String> {
        let cost = self.cost(catalog)?;
        let line = match &self.detail {
            ItemDetail::Part { .. } => format!("{:<10}{:<30}{:>10}", self.id, self.name, cost),
            ItemDetail::Compound { components } => {
                let listed = if components.is_empty() {
                    "None".to_string()
                } else {
                    components_string(components)
                };
                format!("{:<10}{:<30}{:>10}  {}", self.id, self.name, cost, listed)
            }
        };
        Ok(line)
    }

    /// Persisted record form, without the trailing newline
    pub fn record_line(&self, catalog: &Products) -> CatalogResult<String> {
        let line = match &self.detail {
            ItemDetail::Part { cost } => format!("{}, {}, {}", self.id, self.name, cost),
            ItemDetail::Compound { components } => format!(
                "{}, {}, {}, {}",
                self.id,
                self.name,
                self.cost(catalog)?,
                components_string(components)
            ),
        };
        Ok(line)
    }
}
