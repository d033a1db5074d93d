// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resolution of entities referenced by property values
//!
//! Property values may point at other entities (`#N` inside a nominal
//! value, a unit slot, or a value list). Only an explicit allow-list of
//! types (materials, units, quantities) is ever materialized; every other
//! referenced type is dropped, no matter how often it is referenced.

use crate::scanner::{EntityRegistry, RawEntity};
use crate::splitter::{extract_references, split_parameters};
use crate::strings::clean_parameter;
use ifc_pset_model::{
    EntityId, GenericObject, MaterialObject, OrderedMap, PropertySet, ReferencedObject, UnitKind,
    UnitObject,
};
use std::collections::BTreeSet;

/// Entity types worth materializing when referenced by a property value
pub const INTERESTING_TYPES: [&str; 16] = [
    "IFCMATERIAL",
    "IFCMATERIALLAYER",
    "IFCMATERIALLAYERSET",
    "IFCMATERIALCONSTITUENT",
    "IFCMATERIALCONSTITUENTSET",
    "IFCMATERIALDEFINITION",
    "IFCMATERIALPROPERTIES",
    "IFCPHYSICALQUANTITY",
    "IFCQUANTITYLENGTH",
    "IFCQUANTITYAREA",
    "IFCQUANTITYVOLUME",
    "IFCQUANTITYWEIGHT",
    "IFCQUANTITYCOUNT",
    "IFCUNIT",
    "IFCSIUNIT",
    "IFCCONVERSIONBASEDUNIT",
];

/// Whether an entity type is on the allow-list
pub fn is_interesting(entity_type: &str) -> bool {
    INTERESTING_TYPES.contains(&entity_type)
}

/// Resolve every allow-listed entity referenced by the extracted properties
///
/// The candidate set is the union of `#N` tokens found in each property's
/// value-bearing strings. Candidates are materialized in ascending numeric
/// id order, keyed by the decimal id, so the output is deterministic.
pub fn resolve_references(
    property_sets: &OrderedMap<PropertySet>,
    registry: &EntityRegistry,
) -> OrderedMap<ReferencedObject> {
    let mut candidates: BTreeSet<EntityId> = BTreeSet::new();

    for pset in property_sets.values() {
        for prop in &pset.has_properties {
            for value in prop.value_strings() {
                candidates.extend(extract_references(value));
            }
        }
    }

    let mut objects = OrderedMap::new();

    for id in candidates {
        let entity = match registry.get(id) {
            Some(entity) => entity,
            // Dangling reference inside a value: skipped like everywhere else
            None => continue,
        };

        if !is_interesting(&entity.entity_type) {
            continue;
        }

        objects.insert(id.key(), materialize(entity));
    }

    objects
}

/// Shape a referenced entity per its type
fn materialize(entity: &RawEntity) -> ReferencedObject {
    let params = split_parameters(&entity.raw_params);

    if entity.entity_type == "IFCMATERIAL" {
        let mut material = MaterialObject::new(entity.id);
        material.name = params.first().and_then(|p| clean_parameter(p));
        material.description = params.get(1).and_then(|p| clean_parameter(p));
        material.category = params.get(2).and_then(|p| clean_parameter(p));
        return ReferencedObject::Material(material);
    }

    if let Some(kind) = UnitKind::from_entity_type(&entity.entity_type) {
        let mut unit = UnitObject::new(kind, entity.id);
        unit.unit_type = params.first().and_then(|p| clean_parameter(p));
        unit.name = params.get(1).and_then(|p| clean_parameter(p));
        unit.prefix = params.get(2).and_then(|p| clean_parameter(p));
        return ReferencedObject::Unit(unit);
    }

    ReferencedObject::Generic(GenericObject {
        kind: entity.entity_type.clone(),
        id: entity.id.key(),
        parameters: params.iter().map(|p| clean_parameter(p)).collect(),
    })
}
