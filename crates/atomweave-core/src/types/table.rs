//! Runtime lookup of atom types by name or id.

use super::{AtomError, AtomType, BUILTIN_TYPES};
use std::collections::BTreeMap;

/// Name and id index over a set of atom types.
///
/// Uses `BTreeMap` so listings come out in a stable order.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    by_name: BTreeMap<&'static str, AtomType>,
    by_id: BTreeMap<u16, AtomType>,
}

impl TypeTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table holding every built-in type.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for ty in BUILTIN_TYPES {
            table.by_name.insert(ty.name(), ty);
            table.by_id.insert(ty.id(), ty);
        }
        table
    }

    /// Register a custom type. Names and ids must both be unused.
    pub fn register(&mut self, ty: AtomType) -> Result<(), AtomError> {
        if self.by_name.contains_key(ty.name()) {
            return Err(AtomError::DuplicateType(ty.name().to_string()));
        }
        if let Some(existing) = self.by_id.get(&ty.id()) {
            return Err(AtomError::DuplicateType(format!(
                "id {} already used by {}",
                ty.id(),
                existing
            )));
        }
        self.by_name.insert(ty.name(), ty);
        self.by_id.insert(ty.id(), ty);
        Ok(())
    }

    /// Look up a type by name.
    pub fn by_name(&self, name: &str) -> Result<AtomType, AtomError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| AtomError::UnknownType(name.to_string()))
    }

    /// Look up a type by numeric id.
    pub fn by_id(&self, id: u16) -> Result<AtomType, AtomError> {
        self.by_id
            .get(&id)
            .copied()
            .ok_or_else(|| AtomError::UnknownType(format!("#{}", id)))
    }

    /// All registered types that inherit from `ty`, including `ty` itself.
    #[must_use]
    pub fn subtypes_of(&self, ty: AtomType) -> Vec<AtomType> {
        self.by_id.values().copied().filter(|t| t.is_a(ty)).collect()
    }

    /// All registered types in id order.
    pub fn iter(&self) -> impl Iterator<Item = AtomType> + '_ {
        self.by_id.values().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        ATOM_SPACE, CONCEPT_NODE, FRAME, NODE, OrderedBehavior, StructuralKind, TypeSpec,
    };

    static CUSTOM_BEHAVIOR: OrderedBehavior = OrderedBehavior;
    static COLOR_NODE_SPEC: TypeSpec = TypeSpec::new(
        900,
        "ColorNode",
        StructuralKind::Node,
        Some(&crate::types::NODE_SPEC),
        &CUSTOM_BEHAVIOR,
    );
    static CLASHING_SPEC: TypeSpec = TypeSpec::new(
        2,
        "NotAConceptNode",
        StructuralKind::Node,
        None,
        &CUSTOM_BEHAVIOR,
    );

    #[test]
    fn builtin_lookup_by_name_and_id() {
        let table = TypeTable::builtin();
        assert_eq!(table.by_name("ConceptNode"), Ok(CONCEPT_NODE));
        assert_eq!(table.by_id(CONCEPT_NODE.id()), Ok(CONCEPT_NODE));
        assert!(matches!(
            table.by_name("NoSuchLink"),
            Err(AtomError::UnknownType(_))
        ));
    }

    #[test]
    fn register_custom_type() {
        let mut table = TypeTable::builtin();
        let color = AtomType::new(&COLOR_NODE_SPEC);
        table.register(color).expect("register");

        assert_eq!(table.by_name("ColorNode"), Ok(color));
        assert!(color.is_a(NODE));
        assert!(table.subtypes_of(NODE).contains(&color));
    }

    #[test]
    fn register_rejects_duplicates() {
        let mut table = TypeTable::builtin();
        assert!(matches!(
            table.register(CONCEPT_NODE),
            Err(AtomError::DuplicateType(_))
        ));
        assert!(matches!(
            table.register(AtomType::new(&CLASHING_SPEC)),
            Err(AtomError::DuplicateType(_))
        ));
    }

    #[test]
    fn subtypes_of_frame() {
        let table = TypeTable::builtin();
        assert_eq!(table.subtypes_of(FRAME), vec![FRAME, ATOM_SPACE]);
    }
}
