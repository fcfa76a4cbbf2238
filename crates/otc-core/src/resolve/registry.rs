use std::rc::Rc;

use indexmap::IndexMap;

use crate::model::reference::ComponentRef;
use crate::model::type_model::TypeModel;
use crate::parse::schema::RawSchema;

/// Resolution lifecycle of one registry slot.
///
/// A slot is marked `InProgress` before its strategy recurses into members,
/// so a cyclic reference observed mid-resolution yields a named forward
/// reference instead of re-entering the strategy.
#[derive(Debug, Clone, Default)]
pub enum ResolutionState {
    #[default]
    Unresolved,
    InProgress,
    Resolved(Rc<TypeModel>),
}

/// A named, registered schema entry.
#[derive(Debug, Clone)]
pub struct Component {
    pub reference: ComponentRef,
    pub raw: RawSchema,
    /// Collision-free identifier claimed at registration.
    pub type_name: String,
    /// Synthesized during resolution rather than declared by the document.
    pub internal: bool,
    pub state: ResolutionState,
}

/// Document-wide symbol table: maps a reference to its raw schema and, once
/// resolved, to its computed type model. Declared components are registered
/// in document order; synthesized ones append in creation order, which fixes
/// the output ordering.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    slots: IndexMap<ComponentRef, Component>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or overwrite a component. Overwriting keeps the original
    /// slot position.
    pub fn register(
        &mut self,
        reference: ComponentRef,
        raw: RawSchema,
        type_name: String,
        internal: bool,
    ) {
        self.slots.insert(
            reference.clone(),
            Component {
                reference,
                raw,
                type_name,
                internal,
                state: ResolutionState::Unresolved,
            },
        );
    }

    pub fn contains(&self, reference: &ComponentRef) -> bool {
        self.slots.contains_key(reference)
    }

    pub fn get(&self, reference: &ComponentRef) -> Option<&Component> {
        self.slots.get(reference)
    }

    pub fn type_name(&self, reference: &ComponentRef) -> Option<&str> {
        self.slots.get(reference).map(|c| c.type_name.as_str())
    }

    /// Mark a slot as being resolved.
    pub fn begin(&mut self, reference: &ComponentRef) {
        if let Some(slot) = self.slots.get_mut(reference) {
            slot.state = ResolutionState::InProgress;
        }
    }

    /// Store the computed model for a slot.
    pub fn complete(&mut self, reference: &ComponentRef, model: Rc<TypeModel>) {
        if let Some(slot) = self.slots.get_mut(reference) {
            slot.state = ResolutionState::Resolved(model);
        }
    }

    /// Roll a slot back so a failed resolution can be retried or reported
    /// cleanly.
    pub fn fail(&mut self, reference: &ComponentRef) {
        if let Some(slot) = self.slots.get_mut(reference) {
            slot.state = ResolutionState::Unresolved;
        }
    }

    /// Snapshot of all registered references in slot order.
    pub fn references(&self) -> Vec<ComponentRef> {
        self.slots.keys().cloned().collect()
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.slots.values()
    }

    /// All resolved models in slot order: declared components first in
    /// document order, synthesized ones after in creation order.
    pub fn resolved_models(&self) -> Vec<Rc<TypeModel>> {
        self.slots
            .values()
            .filter_map(|c| match &c.state {
                ResolutionState::Resolved(model) => Some(Rc::clone(model)),
                _ => None,
            })
            .collect()
    }

    /// Rewrite `$ref`s inside the target's combinator lists. This is the
    /// single mutation the engine performs on registered raw schemas: the
    /// discriminator resolver redirects a variant's reference to the
    /// discriminated schema itself onto the synthesized abstract shape.
    pub fn rewrite_combinator_refs(
        &mut self,
        target: &ComponentRef,
        from: &ComponentRef,
        to: &ComponentRef,
    ) {
        let Some(slot) = self.slots.get_mut(target) else {
            return;
        };
        let from_pointer = from.pointer();
        let to_pointer = to.pointer();
        let lists = [
            &mut slot.raw.all_of,
            &mut slot.raw.one_of,
            &mut slot.raw.any_of,
        ];
        for list in lists {
            for member in list.iter_mut() {
                if member.ref_path.as_deref() == Some(from_pointer.as_str()) {
                    log::debug!(
                        "rewriting {} -> {} inside {}",
                        from_pointer,
                        to_pointer,
                        slot.reference
                    );
                    member.ref_path = Some(to_pointer.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::type_expr::TypeExpr;
    use crate::model::type_model::{ModelKind, TypeIdentifier};

    fn model(name: &str) -> Rc<TypeModel> {
        Rc::new(TypeModel {
            kind: ModelKind::Primitive,
            type_identifier: TypeIdentifier::Type,
            name: Some(name.to_string()),
            reference: None,
            content: TypeExpr::ANY,
            description: String::new(),
            generic_args: vec![],
            members: vec![],
            internal: false,
        })
    }

    #[test]
    fn resolved_models_keep_slot_order() {
        let mut registry = ComponentRegistry::new();
        let a = ComponentRef::schema("A");
        let b = ComponentRef::schema("B");
        registry.register(a.clone(), RawSchema::default(), "A".into(), false);
        registry.register(b.clone(), RawSchema::default(), "B".into(), false);
        registry.complete(&b, model("B"));
        registry.complete(&a, model("A"));

        let names: Vec<_> = registry
            .resolved_models()
            .iter()
            .map(|m| m.name.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut registry = ComponentRegistry::new();
        let a = ComponentRef::schema("A");
        let b = ComponentRef::schema("B");
        registry.register(a.clone(), RawSchema::default(), "A".into(), false);
        registry.register(b.clone(), RawSchema::default(), "B".into(), false);
        registry.register(a.clone(), RawSchema::default(), "A".into(), true);

        let refs = registry.references();
        assert_eq!(refs, vec![a.clone(), b]);
        assert!(registry.get(&a).unwrap().internal);
    }

    #[test]
    fn rewrite_combinator_refs_redirects_self_refs() {
        let mut registry = ComponentRegistry::new();
        let cat = ComponentRef::schema("Cat");
        let pet = ComponentRef::schema("Pet");
        let abstract_pet = ComponentRef::schema("AbstractPet");

        let raw: RawSchema = serde_yaml_ng::from_str(
            r##"
allOf:
  - $ref: "#/components/schemas/Pet"
  - type: object
    properties:
      hunts:
        type: boolean
"##,
        )
        .unwrap();
        registry.register(cat.clone(), raw, "Cat".into(), false);
        registry.rewrite_combinator_refs(&cat, &pet, &abstract_pet);

        let rewritten = &registry.get(&cat).unwrap().raw;
        assert_eq!(
            rewritten.all_of[0].ref_path.as_deref(),
            Some("#/components/schemas/AbstractPet")
        );
    }
}
