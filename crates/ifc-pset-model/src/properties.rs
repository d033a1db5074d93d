// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property sets, property records and referenced objects
//!
//! `Property` and `ReferencedObject` are closed enums: the entity type name
//! is inspected exactly once, when the record is constructed, and every
//! downstream consumer matches on the variant instead of re-comparing
//! strings.

use crate::EntityId;
use serde::{Deserialize, Serialize};

/// Entity type name stored on every property set record
pub const PROPERTY_SET_ENTITY: &str = "IFCPROPERTYSET";

/// Entity type name for single-value properties
pub const SINGLE_VALUE_ENTITY: &str = "IFCPROPERTYSINGLEVALUE";

/// One property referenced by a property set
///
/// Serialization is untagged; each variant carries its own `"Type"` field so
/// the JSON shape matches the STEP entity it came from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Property {
    /// IFCPROPERTYSINGLEVALUE
    Single(SingleValue),
    /// IFCPROPERTYENUMERATEDVALUE / IFCPROPERTYBOUNDEDVALUE / IFCPROPERTYLISTVALUE
    Multi(MultiValue),
    /// Any other property entity type
    Generic(GenericProperty),
}

impl Property {
    /// Entity ID of the property entity this record came from
    pub fn id(&self) -> &str {
        match self {
            Property::Single(p) => &p.id,
            Property::Multi(p) => &p.id,
            Property::Generic(p) => &p.id,
        }
    }

    /// Property name, if the entity carried one
    pub fn name(&self) -> Option<&str> {
        match self {
            Property::Single(p) => p.name.as_deref(),
            Property::Multi(p) => p.name.as_deref(),
            Property::Generic(_) => None,
        }
    }

    /// Value-bearing strings of this property, in declaration order
    ///
    /// These are the fields the reference resolver scans for `#N` tokens:
    /// nominal value and unit for single values, the value list for
    /// enumerated/bounded/list properties, and the raw parameter list for
    /// generic properties.
    pub fn value_strings(&self) -> Vec<&str> {
        match self {
            Property::Single(p) => p
                .nominal_value
                .iter()
                .chain(p.unit.iter())
                .map(String::as_str)
                .collect(),
            Property::Multi(p) => p.values.iter().map(String::as_str).collect(),
            Property::Generic(p) => p.raw_parameters.iter().map(String::as_str).collect(),
        }
    }
}

/// IFCPROPERTYSINGLEVALUE: name, description, nominal value, unit
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SingleValue {
    /// Always `IFCPROPERTYSINGLEVALUE`
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "NominalValue")]
    pub nominal_value: Option<String>,
    #[serde(rename = "Unit")]
    pub unit: Option<String>,
}

impl SingleValue {
    /// Create a record for the given property entity
    pub fn new(id: EntityId) -> Self {
        Self {
            kind: SINGLE_VALUE_ENTITY.to_string(),
            id: id.key(),
            name: None,
            description: None,
            nominal_value: None,
            unit: None,
        }
    }
}

/// Which multi-valued property entity produced a [`MultiValue`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MultiValueKind {
    #[serde(rename = "IFCPROPERTYENUMERATEDVALUE")]
    Enumerated,
    #[serde(rename = "IFCPROPERTYBOUNDEDVALUE")]
    Bounded,
    #[serde(rename = "IFCPROPERTYLISTVALUE")]
    List,
}

impl MultiValueKind {
    /// Map an entity type name to a kind, if it is one of the three
    pub fn from_entity_type(entity_type: &str) -> Option<Self> {
        match entity_type {
            "IFCPROPERTYENUMERATEDVALUE" => Some(MultiValueKind::Enumerated),
            "IFCPROPERTYBOUNDEDVALUE" => Some(MultiValueKind::Bounded),
            "IFCPROPERTYLISTVALUE" => Some(MultiValueKind::List),
            _ => None,
        }
    }
}

/// Enumerated, bounded or list property: name, description, raw values
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MultiValue {
    #[serde(rename = "Type")]
    pub kind: MultiValueKind,
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    /// Remaining positional parameters, uncleaned
    #[serde(rename = "Values")]
    pub values: Vec<String>,
}

impl MultiValue {
    /// Create a record for the given property entity
    pub fn new(kind: MultiValueKind, id: EntityId) -> Self {
        Self {
            kind,
            id: id.key(),
            name: None,
            description: None,
            values: Vec::new(),
        }
    }
}

/// Fallback for property entity types without a dedicated shape
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenericProperty {
    /// The entity's type name
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Id")]
    pub id: String,
    /// The full raw parameter list, uncleaned
    #[serde(rename = "RawData")]
    pub raw_parameters: Vec<String>,
}

/// An IFCPROPERTYSET entity with its resolved properties
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    /// Always `IFCPROPERTYSET`
    #[serde(rename = "Entity")]
    pub entity: String,
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Guid")]
    pub guid: Option<String>,
    /// Owner history kept as the raw `#N` reference, never resolved
    #[serde(rename = "OwnerHistory")]
    pub owner_history: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "HasProperties")]
    pub has_properties: Vec<Property>,
    /// Raw 5th parameter (the property reference list), absent when the
    /// entity had fewer than five parameters
    #[serde(rename = "ObjectType", skip_serializing_if = "Option::is_none", default)]
    pub object_type: Option<String>,
}

impl PropertySet {
    /// Create an empty record for the given entity
    pub fn new(id: EntityId) -> Self {
        Self {
            entity: PROPERTY_SET_ENTITY.to_string(),
            id: id.key(),
            guid: None,
            owner_history: None,
            name: None,
            description: None,
            has_properties: Vec::new(),
            object_type: None,
        }
    }

    /// Output map key: the cleaned name, or `PropertySet_<id>` when unnamed
    pub fn key(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("PropertySet_{}", self.id),
        }
    }
}

/// Which unit entity produced a [`UnitObject`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    #[serde(rename = "IFCSIUNIT")]
    Si,
    #[serde(rename = "IFCCONVERSIONBASEDUNIT")]
    ConversionBased,
}

impl UnitKind {
    /// Map an entity type name to a kind, if it is one of the two
    pub fn from_entity_type(entity_type: &str) -> Option<Self> {
        match entity_type {
            "IFCSIUNIT" => Some(UnitKind::Si),
            "IFCCONVERSIONBASEDUNIT" => Some(UnitKind::ConversionBased),
            _ => None,
        }
    }
}

/// A referenced entity materialized into the output document
///
/// Only entity types on the allow-list are ever materialized; everything
/// else a property value points at is dropped at resolution time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferencedObject {
    /// IFCMATERIAL
    Material(MaterialObject),
    /// IFCSIUNIT / IFCCONVERSIONBASEDUNIT
    Unit(UnitObject),
    /// Remaining allow-listed types (quantities, material composites)
    Generic(GenericObject),
}

impl ReferencedObject {
    /// Entity type name of the underlying entity
    pub fn entity_type(&self) -> &str {
        match self {
            ReferencedObject::Material(_) => "IFCMATERIAL",
            ReferencedObject::Unit(u) => match u.kind {
                UnitKind::Si => "IFCSIUNIT",
                UnitKind::ConversionBased => "IFCCONVERSIONBASEDUNIT",
            },
            ReferencedObject::Generic(g) => &g.kind,
        }
    }
}

/// IFCMATERIAL: name, description, category
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialObject {
    /// Always `IFCMATERIAL`
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "Category")]
    pub category: Option<String>,
}

impl MaterialObject {
    /// Create an empty record for the given entity
    pub fn new(id: EntityId) -> Self {
        Self {
            kind: "IFCMATERIAL".to_string(),
            id: id.key(),
            name: None,
            description: None,
            category: None,
        }
    }
}

/// IFCSIUNIT / IFCCONVERSIONBASEDUNIT: unit type, name, prefix
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitObject {
    #[serde(rename = "Type")]
    pub kind: UnitKind,
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "UnitType")]
    pub unit_type: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Prefix")]
    pub prefix: Option<String>,
}

impl UnitObject {
    /// Create an empty record for the given entity
    pub fn new(kind: UnitKind, id: EntityId) -> Self {
        Self {
            kind,
            id: id.key(),
            unit_type: None,
            name: None,
            prefix: None,
        }
    }
}

/// Fallback for the remaining allow-listed entity types
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenericObject {
    /// The entity's type name
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Id")]
    pub id: String,
    /// Every parameter run through the cleaner, so `$` slots are null
    #[serde(rename = "Parameters")]
    pub parameters: Vec<Option<String>>,
}
