//! Entity data model (§3).
//!
//! `Entity` is immutable after construction (builder-style construction
//! then `prepare()`); the closed `EntityDetails` enum replaces the deep
//! per-type class hierarchies the source system used, per §9's REDESIGN
//! FLAGS.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::prepared::PreparedFields;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Person,
    Business,
    Organization,
    Vessel,
    Aircraft,
    Unknown,
}

impl Default for EntityType {
    fn default() -> Self {
        EntityType::Unknown
    }
}

/// Source-list tag. `Other` is an escape hatch so the (out-of-scope) list
/// parser layer can introduce a new source without a crate release.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    OfacSdn,
    UsConsolidated,
    EuConsolidated,
    UkConsolidated,
    Other(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernmentId {
    pub identifier: String,
    pub id_type: String,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoAddress {
    pub currency: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
}

/// Type-specific sub-record, held by value inside `Entity`. Closed union in
/// place of a class hierarchy: dispatch is a `match`, not a vtable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum EntityDetails {
    Person {
        birth_date: Option<NaiveDate>,
        death_date: Option<NaiveDate>,
    },
    /// Shared by `business` and `organization` per §3.
    Corporate {
        created_date: Option<NaiveDate>,
        dissolved_date: Option<NaiveDate>,
    },
    Vessel {
        built_date: Option<String>,
    },
    Aircraft {
        built_date: Option<String>,
    },
    Unknown,
}

impl Default for EntityDetails {
    fn default() -> Self {
        EntityDetails::Unknown
    }
}

/// A watchlist entity. Immutable after construction. `prepared` is absent
/// until [`Entity::prepare`] runs exactly once; the index rejects entities
/// without prepared fields (§4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub primary_name: String,
    pub entity_type: EntityType,
    pub source: Source,
    pub source_id: String,
    pub alt_names: Vec<String>,
    pub addresses: Vec<Address>,
    pub government_ids: Vec<GovernmentId>,
    pub crypto_addresses: Vec<CryptoAddress>,
    pub contact: Contact,
    pub details: EntityDetails,
    pub remarks: Vec<String>,
    pub programs: Vec<String>,

    #[serde(skip)]
    pub prepared: Option<PreparedFields>,
}

impl Entity {
    pub fn new(id: impl Into<String>, primary_name: impl Into<String>, entity_type: EntityType, source: Source) -> Self {
        Self {
            id: id.into(),
            primary_name: primary_name.into(),
            entity_type,
            source,
            source_id: String::new(),
            alt_names: Vec::new(),
            addresses: Vec::new(),
            government_ids: Vec::new(),
            crypto_addresses: Vec::new(),
            contact: Contact::default(),
            details: EntityDetails::Unknown,
            remarks: Vec::new(),
            programs: Vec::new(),
            prepared: None,
        }
    }

    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = source_id.into();
        self
    }

    pub fn with_alt_names(mut self, alt_names: Vec<String>) -> Self {
        self.alt_names = alt_names;
        self
    }

    pub fn with_addresses(mut self, addresses: Vec<Address>) -> Self {
        self.addresses = addresses;
        self
    }

    pub fn with_government_ids(mut self, ids: Vec<GovernmentId>) -> Self {
        self.government_ids = ids;
        self
    }

    pub fn with_crypto_addresses(mut self, addrs: Vec<CryptoAddress>) -> Self {
        self.crypto_addresses = addrs;
        self
    }

    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contact = contact;
        self
    }

    pub fn with_details(mut self, details: EntityDetails) -> Self {
        self.details = details;
        self
    }

    pub fn with_programs(mut self, programs: Vec<String>) -> Self {
        self.programs = programs;
        self
    }

    /// Normalize this entity exactly once, producing and caching its
    /// `PreparedFields`. Idempotent: calling it again recomputes from the
    /// same immutable source fields and yields the same result.
    pub fn prepare(mut self) -> Self {
        self.prepared = Some(PreparedFields::build(&self));
        self
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared.is_some()
    }
}
