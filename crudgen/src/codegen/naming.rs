//! Naming conventions for generated classes and the stored routines they call

/// Derive the entity name from a table name by dropping its last character.
///
/// Table names are assumed plural ("Orders" -> "Order"). The rule is a plain
/// single-character trim, not pluralization: "Order" becomes "Orde".
pub fn entity_name(table_name: &str) -> String {
    let mut chars = table_name.chars();
    chars.next_back();
    chars.as_str().to_string()
}

/// The four stored routines every generated class calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutineKind {
    GetAll,
    AddNew,
    Update,
    Delete,
}

impl RoutineKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            RoutineKind::GetAll => "GetAll",
            RoutineKind::AddNew => "AddNew",
            RoutineKind::Update => "Update",
            RoutineKind::Delete => "Delete",
        }
    }
}

/// Names derived for one table of one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub table_name: String,
    pub entity_name: String,
    pub project_name: String,
}

impl EntityDescriptor {
    pub fn new(table_name: &str, project_name: &str) -> Self {
        Self {
            table_name: table_name.to_string(),
            entity_name: entity_name(table_name),
            project_name: project_name.to_string(),
        }
    }

    /// Stored routine the generated code expects for `kind`.
    ///
    /// GetAll is keyed by the table name, the others by the entity name. The
    /// routine's existence is never checked.
    pub fn routine_name(&self, kind: RoutineKind) -> String {
        match kind {
            RoutineKind::GetAll => format!("SP_GetAll{}", self.table_name),
            _ => format!("SP_{}{}", kind.prefix(), self.entity_name),
        }
    }

    /// Method name used for `kind` in both generated classes
    pub fn method_name(&self, kind: RoutineKind) -> String {
        match kind {
            RoutineKind::GetAll => format!("GetAll{}Async", self.table_name),
            _ => format!("{}{}", kind.prefix(), self.entity_name),
        }
    }

    /// `cls{Entity}Data`
    pub fn data_class_name(&self) -> String {
        format!("cls{}Data", self.entity_name)
    }

    /// `cls{Entity}`
    pub fn business_class_name(&self) -> String {
        format!("cls{}", self.entity_name)
    }

    /// `{Project}_Data`
    pub fn data_namespace(&self) -> String {
        format!("{}_Data", self.project_name)
    }

    /// `{Project}_Business`
    pub fn business_namespace(&self) -> String {
        format!("{}_Business", self.project_name)
    }

    /// Name of the identity column/property, `{Entity}ID`
    pub fn identity_name(&self) -> String {
        format!("{}ID", self.entity_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_name() {
        assert_eq!(entity_name("Orders"), "Order");
        assert_eq!(entity_name("Products"), "Product");
        assert_eq!(entity_name("Order"), "Orde");
        assert_eq!(entity_name("s"), "");
        assert_eq!(entity_name(""), "");
    }

    #[test]
    fn test_entity_name_strips_single_character_only() {
        assert_eq!(entity_name("Addresses"), "Addresse");
        assert_eq!(entity_name("Classs"), "Class");
    }

    #[test]
    fn test_routine_names() {
        let entity = EntityDescriptor::new("Products", "Shop");
        assert_eq!(entity.routine_name(RoutineKind::AddNew), "SP_AddNewProduct");
        assert_eq!(entity.routine_name(RoutineKind::Update), "SP_UpdateProduct");
        assert_eq!(entity.routine_name(RoutineKind::Delete), "SP_DeleteProduct");
        assert_eq!(entity.routine_name(RoutineKind::GetAll), "SP_GetAllProducts");
    }

    #[test]
    fn test_method_names() {
        let entity = EntityDescriptor::new("Products", "Shop");
        assert_eq!(entity.method_name(RoutineKind::GetAll), "GetAllProductsAsync");
        assert_eq!(entity.method_name(RoutineKind::AddNew), "AddNewProduct");
        assert_eq!(entity.method_name(RoutineKind::Delete), "DeleteProduct");
    }

    #[test]
    fn test_artifact_names() {
        let entity = EntityDescriptor::new("Products", "Shop");
        assert_eq!(entity.data_class_name(), "clsProductData");
        assert_eq!(entity.business_class_name(), "clsProduct");
        assert_eq!(entity.data_namespace(), "Shop_Data");
        assert_eq!(entity.business_namespace(), "Shop_Business");
        assert_eq!(entity.identity_name(), "ProductID");
    }
}
