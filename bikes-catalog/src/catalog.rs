use std::collections::{BTreeMap, HashSet};
use crate::error::{CatalogError, CatalogResult};
use crate::item::{Component, Item, ItemDetail};

/// ID-keyed store owning every part and compound of a session
#[derive(Debug, Clone, Default)]
pub struct Products {
    items: BTreeMap<String, Item>,
}

impl Products {
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    /// Get an item by ID
    pub fn get(&self, id: &str) -> CatalogResult<&Item> {
        self.items
            .get(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    pub fn get_mut(&mut self, id: &str) -> CatalogResult<&mut Item> {
        self.items
            .get_mut(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Insert keyed by the item's own ID, overwriting any existing entry.
    ///
    /// Duplicate rejection is left to callers; the replaced item is returned.
    pub fn add(&mut self, item: Item) -> Option<Item> {
        self.items.insert(item.id().to_string(), item)
    }

    /// Remove an item. Callers guarding deletion should consult
    /// [`Products::is_referenced`] first; removal itself is unconditional.
    pub fn remove(&mut self, id: &str) -> CatalogResult<Item> {
        self.items
            .remove(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Item IDs in ascending order, reflecting the current contents
    pub fn keys(&self) -> Vec<String> {
        self.items.keys().cloned().collect()
    }

    /// Items in key order
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn reset(&mut self) {
        self.items.clear();
    }

    /// Derived cost of the item with the given ID
    pub fn cost(&self, id: &str) -> CatalogResult<i64> {
        self.get(id)?.cost(self)
    }

    /// Direct dependencies of the item with the given ID
    pub fn dependencies(&self, id: &str) -> CatalogResult<Vec<&str>> {
        Ok(self.get(id)?.dependencies())
    }

    /// Whether any item lists `id` as a component.
    ///
    /// Full scan on every call; there is no reverse index to keep in sync.
    pub fn is_referenced(&self, id: &str) -> bool {
        self.items
            .values()
            .any(|item| item.dependencies().contains(&id))
    }

    /// IDs of the items that list `id` as a component, ascending
    pub fn referenced_by(&self, id: &str) -> Vec<String> {
        self.items
            .values()
            .filter(|item| item.dependencies().contains(&id))
            .map(|item| item.id().to_string())
            .collect()
    }

    /// Whether `target` is reachable from `from` through component edges.
    /// Dangling references are treated as dead ends.
    pub fn reaches(&self, from: &str, target: &str) -> bool {
        let mut stack = vec![from];
        let mut visited: HashSet<&str> = HashSet::new();

        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if !visited.insert(id) {
                continue;
            }
            if let Ok(item) = self.get(id) {
                stack.extend(item.dependencies());
            }
        }
        false
    }

    /// One display line per item in key order
    pub fn display_strings(&self) -> CatalogResult<Vec<String>> {
        self.items
            .values()
            .map(|item| item.display_line(self))
            .collect()
    }

    /// Depth-first cost walk over an explicit stack of open compounds, so
    /// chain depth is bounded by memory rather than the thread stack.
    /// `on_path` holds the compounds currently open; meeting one of them
    /// again means the graph has a cycle.
    pub(crate) fn derive_cost(&self, item: &Item) -> CatalogResult<i64> {
        let components = match item.detail() {
            ItemDetail::Part { cost } => return Ok(*cost),
            ItemDetail::Compound { components } => components,
        };

        let mut on_path: HashSet<&str> = HashSet::new();
        on_path.insert(item.id());
        let mut stack = vec![CostFrame::new(item, components)];
        let mut total = 0;

        while let Some(frame) = stack.last_mut() {
            let components = frame.components;
            let Some(component) = components.get(frame.next) else {
                // Every component summed: fold this compound into its parent
                let Some(done) = stack.pop() else { break };
                on_path.remove(done.item.id());
                match stack.last_mut() {
                    Some(parent) => parent.accumulate(done.total)?,
                    None => total = done.total,
                }
                continue;
            };

            let child = self.get(&component.item_id)?;
            match child.detail() {
                ItemDetail::Part { cost } => frame.accumulate(*cost)?,
                ItemDetail::Compound { components } => {
                    if !on_path.insert(child.id()) {
                        return Err(CatalogError::CyclicDependency(child.id().to_string()));
                    }
                    stack.push(CostFrame::new(child, components));
                }
            }
        }

        Ok(total)
    }
}

/// A compound whose components are being summed
struct CostFrame<'a> {
    item: &'a Item,
    components: &'a [Component],
    next: usize,
    total: i64,
}

impl<'a> CostFrame<'a> {
    fn new(item: &'a Item, components: &'a [Component]) -> Self {
        Self {
            item,
            components,
            next: 0,
            total: 0,
        }
    }

    /// Add `quantity * cost` of the current component and move past it
    fn accumulate(&mut self, cost: i64) -> CatalogResult<()> {
        let quantity = self.components[self.next].quantity;
        self.total = cost
            .checked_mul(quantity)
            .and_then(|line| self.total.checked_add(line))
            .ok_or_else(|| CatalogError::CostOverflow(self.item.id().to_string()))?;
        self.next += 1;
        Ok(())
    }
}
