use std::path::Path;
use bikes_catalog::{parse_components, CatalogError, Component, Item, ItemKind, Products};
use crate::error::{StoreError, StoreResult};
use crate::file_repo::{CatalogRepository, FileCatalogRepository};

const NEW_ITEM_NAME: &str = "No Name";

/// The catalog of an editing session, with the policies a front end applies
/// before touching it: unique IDs, kind-gated edits, guarded removal.
///
/// Every rejected call leaves the catalog exactly as it was.
pub struct CatalogSession<R = FileCatalogRepository> {
    products: Products,
    repository: R,
}

impl CatalogSession<FileCatalogRepository> {
    pub fn new() -> Self {
        Self::with_repository(FileCatalogRepository::new())
    }
}

impl Default for CatalogSession<FileCatalogRepository> {
    fn default() -> Self {
        Self::new()
    }
}

fn refuse<T>(action: &str, err: StoreError) -> StoreResult<T> {
    tracing::warn!("{} refused: {}", action, err);
    Err(err)
}

fn validate_id(id: &str) -> StoreResult<()> {
    if id.is_empty()
        || id != id.trim()
        || id.contains([',', ':'])
        || id.chars().any(char::is_control)
    {
        return Err(StoreError::InvalidName(format!("'{}'", id)));
    }
    Ok(())
}

fn validate_name(name: &str) -> StoreResult<()> {
    // A line break would split the record across lines
    if name.contains(',') || name.chars().any(char::is_control) {
        return Err(StoreError::InvalidName(format!("'{}'", name)));
    }
    Ok(())
}

impl<R: CatalogRepository> CatalogSession<R> {
    pub fn with_repository(repository: R) -> Self {
        Self {
            products: Products::new(),
            repository,
        }
    }

    pub fn products(&self) -> &Products {
        &self.products
    }

    /// Replace the session catalog with the file's contents. On failure the
    /// current catalog is kept.
    pub fn open(&mut self, path: &Path) -> StoreResult<()> {
        let loaded = self.repository.load(path)?;
        self.products.reset();
        self.products = loaded;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> StoreResult<()> {
        self.repository.save(path, &self.products)
    }

    pub fn keys(&self) -> Vec<String> {
        self.products.keys()
    }

    pub fn get(&self, id: &str) -> StoreResult<&Item> {
        Ok(self.products.get(id)?)
    }

    pub fn cost(&self, id: &str) -> StoreResult<i64> {
        Ok(self.products.cost(id)?)
    }

    pub fn display_strings(&self) -> StoreResult<Vec<String>> {
        Ok(self.products.display_strings()?)
    }

    pub fn add_part(&mut self, id: &str) -> StoreResult<()> {
        self.add_new("Add part", Item::part(id, NEW_ITEM_NAME, 0))
    }

    pub fn add_compound(&mut self, id: &str) -> StoreResult<()> {
        self.add_new("Add compound", Item::compound(id, NEW_ITEM_NAME, Vec::new()))
    }

    fn add_new(&mut self, action: &str, item: Item) -> StoreResult<()> {
        if let Err(err) = validate_id(item.id()) {
            return refuse(action, err);
        }
        if self.products.contains(item.id()) {
            return refuse(action, StoreError::DuplicateId(item.id().to_string()));
        }

        tracing::debug!("Adding {:?} {}", item.kind(), item.id());
        self.products.add(item);
        Ok(())
    }

    pub fn set_name(&mut self, id: &str, name: &str) -> StoreResult<()> {
        let name = name.trim();
        if let Err(err) = validate_name(name) {
            return refuse("Update name", err);
        }
        match self.products.get_mut(id) {
            Ok(item) => {
                item.set_name(name);
                Ok(())
            }
            Err(err) => refuse("Update name", err.into()),
        }
    }

    pub fn set_cost(&mut self, id: &str, cost: i64) -> StoreResult<()> {
        let result = self
            .products
            .get_mut(id)
            .and_then(|item| item.set_cost(cost));
        match result {
            Ok(()) => Ok(()),
            Err(err) => refuse("Update cost", err.into()),
        }
    }

    /// Replace a compound's components from a user-entered `ID:qty,...`
    /// string. Unknown IDs and lists that would make the compound contain
    /// itself are rejected before anything changes.
    pub fn set_components(&mut self, id: &str, spec: &str) -> StoreResult<()> {
        match self.check_components(id, spec) {
            Ok(components) => {
                self.products.get_mut(id)?.set_components(components)?;
                Ok(())
            }
            Err(err) => refuse("Update components", err),
        }
    }

    fn check_components(&self, id: &str, spec: &str) -> StoreResult<Vec<Component>> {
        let item = self.products.get(id)?;
        if item.kind() != ItemKind::Compound {
            return Err(CatalogError::NotACompound(id.to_string()).into());
        }

        let components = parse_components(spec)?;
        for component in &components {
            if !self.products.contains(&component.item_id) {
                return Err(CatalogError::NotFound(component.item_id.clone()).into());
            }
            if self.products.reaches(&component.item_id, id) {
                return Err(CatalogError::CyclicDependency(id.to_string()).into());
            }
        }
        Ok(components)
    }

    /// Remove an item no other item depends on
    pub fn remove(&mut self, id: &str) -> StoreResult<Item> {
        if let Err(err) = self.products.get(id) {
            return refuse("Remove", err.into());
        }

        let referenced_by = self.products.referenced_by(id);
        if !referenced_by.is_empty() {
            return refuse(
                "Remove",
                StoreError::ReferentialIntegrityViolation {
                    id: id.to_string(),
                    referenced_by,
                },
            );
        }

        Ok(self.products.remove(id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bikes_catalog::ItemDetail;

    fn session() -> CatalogSession {
        let mut session = CatalogSession::new();
        session.add_part("A").unwrap();
        session.set_cost("A", 5).unwrap();
        session.add_compound("B").unwrap();
        session.set_components("B", "A:2").unwrap();
        session
    }

    #[test]
    fn test_new_items_defaults() {
        let session = session();
        assert_eq!(session.get("A").unwrap().name(), "No Name");
        assert_eq!(session.cost("B").unwrap(), 10);
        assert_eq!(session.keys(), vec!["A", "B"]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut session = session();
        assert!(matches!(session.add_part("A"), Err(StoreError::DuplicateId(id)) if id == "A"));
        assert!(matches!(session.add_compound("A"), Err(StoreError::DuplicateId(_))));
        assert_eq!(session.cost("A").unwrap(), 5);
    }

    #[test]
    fn test_ids_and_names_that_break_records() {
        let mut session = session();
        for id in ["", " A2", "A,2", "A:2"] {
            assert!(matches!(session.add_part(id), Err(StoreError::InvalidName(_))), "{id:?}");
        }
        assert!(matches!(
            session.set_name("A", "Spoke, steel"),
            Err(StoreError::InvalidName(_))
        ));
        assert_eq!(session.get("A").unwrap().name(), "No Name");

        session.set_name("A", "  Steel spoke ").unwrap();
        assert_eq!(session.get("A").unwrap().name(), "Steel spoke");
    }

    #[test]
    fn test_line_breaks_rejected_before_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shop.txt");
        let mut session = session();

        for id in ["A\nB", "C\r", "D\tE"] {
            assert!(matches!(session.add_part(id), Err(StoreError::InvalidName(_))), "{id:?}");
        }
        for name in ["Steel\nspoke", "Steel\r\nspoke", "Bell\u{7}"] {
            assert!(matches!(session.set_name("A", name), Err(StoreError::InvalidName(_))), "{name:?}");
        }
        assert_eq!(session.keys(), vec!["A", "B"]);
        assert_eq!(session.get("A").unwrap().name(), "No Name");

        session.save(&path).unwrap();
        let mut reopened = CatalogSession::new();
        reopened.open(&path).unwrap();
        assert_eq!(reopened.keys(), session.keys());
    }

    #[test]
    fn test_kind_gated_updates() {
        let mut session = session();
        assert!(matches!(
            session.set_cost("B", 3),
            Err(StoreError::Catalog(CatalogError::NotAPart(_)))
        ));
        assert!(matches!(
            session.set_components("A", "B:1"),
            Err(StoreError::Catalog(CatalogError::NotACompound(_)))
        ));
        assert!(matches!(
            session.set_cost("missing", 3),
            Err(StoreError::Catalog(CatalogError::NotFound(_)))
        ));
    }

    #[test]
    fn test_rejected_component_lists_leave_compound_unchanged() {
        let mut session = session();
        session.add_compound("C").unwrap();
        session.set_components("C", "B:1").unwrap();

        for spec in ["A:2,B", "Z:1", "B:1", "C:1", "A:x"] {
            assert!(session.set_components("B", spec).is_err(), "accepted {spec:?}");
        }
        assert_eq!(
            session.get("B").unwrap().detail(),
            &ItemDetail::Compound {
                components: vec![Component::new("A", 2)]
            }
        );
        assert!(matches!(
            session.set_components("B", "C:1"),
            Err(StoreError::Catalog(CatalogError::CyclicDependency(id))) if id == "B"
        ));
        assert!(matches!(
            session.set_components("B", "A:2,B"),
            Err(StoreError::Catalog(CatalogError::InvalidComponentSpec(_)))
        ));
    }

    #[test]
    fn test_clear_components() {
        let mut session = session();
        session.set_components("B", "").unwrap();
        assert_eq!(session.cost("B").unwrap(), 0);
        assert!(!session.products().is_referenced("A"));
    }

    #[test]
    fn test_guarded_remove() {
        let mut session = session();
        match session.remove("A") {
            Err(StoreError::ReferentialIntegrityViolation { id, referenced_by }) => {
                assert_eq!(id, "A");
                assert_eq!(referenced_by, vec!["B".to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(session.products().contains("A"));

        session.remove("B").unwrap();
        session.remove("A").unwrap();
        assert!(session.keys().is_empty());
        assert!(matches!(
            session.remove("A"),
            Err(StoreError::Catalog(CatalogError::NotFound(_)))
        ));
    }
}
