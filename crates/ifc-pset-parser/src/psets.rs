// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFCPROPERTYSET extraction
//!
//! Walks the registry in file order, splits each property set's parameters
//! positionally (STEP parameters are positional, never named) and resolves
//! the `#N` references of the 5th parameter into typed property records.
//! Dangling references are skipped; entities with fewer parameters than a
//! shape expects produce absent fields, never an error.

use crate::scanner::{EntityRegistry, RawEntity};
use crate::splitter::{extract_references, split_parameters};
use crate::strings::clean_parameter;
use ifc_pset_model::{
    GenericProperty, MultiValue, MultiValueKind, OrderedMap, Property, PropertySet, SingleValue,
    PROPERTY_SET_ENTITY, SINGLE_VALUE_ENTITY,
};

/// Extract every IFCPROPERTYSET in the registry
///
/// Returns an insertion-ordered map keyed by the cleaned set name, or
/// `PropertySet_<id>` for unnamed sets. Name collisions overwrite, last
/// wins.
pub fn extract_property_sets(registry: &EntityRegistry) -> OrderedMap<PropertySet> {
    let mut sets = OrderedMap::new();

    for entity in registry.iter_by_type(PROPERTY_SET_ENTITY) {
        let pset = extract_one(entity, registry);
        let key = pset.key();
        log::debug!(
            "property set {}: {} properties",
            key,
            pset.has_properties.len()
        );
        sets.insert(key, pset);
    }

    sets
}

/// Positional mapping: GUID, owner history, name, description, references
fn extract_one(entity: &RawEntity, registry: &EntityRegistry) -> PropertySet {
    let params = split_parameters(&entity.raw_params);
    let mut pset = PropertySet::new(entity.id);

    pset.guid = params.first().and_then(|p| clean_parameter(p));
    pset.owner_history = params.get(1).and_then(|p| clean_parameter(p));
    pset.name = params.get(2).and_then(|p| clean_parameter(p));
    pset.description = params.get(3).and_then(|p| clean_parameter(p));

    if let Some(refs_param) = params.get(4) {
        // The raw reference list doubles as the reported ObjectType
        pset.object_type = Some(refs_param.clone());

        for prop_ref in extract_references(refs_param) {
            match registry.get(prop_ref) {
                Some(prop_entity) => pset.has_properties.push(extract_property(prop_entity)),
                // Dangling reference: tolerated, simply omitted
                None => log::warn!(
                    "property set {} references missing entity {}",
                    entity.id,
                    prop_ref
                ),
            }
        }
    }

    pset
}

/// Dispatch one property entity into its typed record
fn extract_property(entity: &RawEntity) -> Property {
    let params = split_parameters(&entity.raw_params);

    if entity.entity_type == SINGLE_VALUE_ENTITY {
        let mut prop = SingleValue::new(entity.id);
        prop.name = params.first().and_then(|p| clean_parameter(p));
        prop.description = params.get(1).and_then(|p| clean_parameter(p));
        prop.nominal_value = params.get(2).and_then(|p| clean_parameter(p));
        prop.unit = params.get(3).and_then(|p| clean_parameter(p));
        return Property::Single(prop);
    }

    if let Some(kind) = MultiValueKind::from_entity_type(&entity.entity_type) {
        let mut prop = MultiValue::new(kind, entity.id);
        prop.name = params.first().and_then(|p| clean_parameter(p));
        prop.description = params.get(1).and_then(|p| clean_parameter(p));
        if params.len() > 2 {
            prop.values = params[2..].to_vec();
        }
        return Property::Multi(prop);
    }

    Property::Generic(GenericProperty {
        kind: entity.entity_type.clone(),
        id: entity.id.key(),
        raw_parameters: params,
    })
}
