//! Prepared (pre-normalized) fields cached on an `Entity` (§3, §4.7).
//!
//! `PreparedFields` is either entirely absent from an `Entity` or entirely
//! populated — there is no partially-prepared state. `build` is the only
//! constructor; it is infallible and runs the full normalization pipeline
//! (§4.1–§4.3) exactly once per call.

use serde::{Deserialize, Serialize};

use crate::entity::{Address, Contact, CryptoAddress, Entity, GovernmentId};
use crate::normalize::{
    detect_language, normalize, normalize_id, normalize_phone, remove_company_titles,
    remove_stopwords, reorder_sdn_name, Language, NORMALIZER_VERSION,
};
use crate::similarity::word_combinations;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAddress {
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub state: String,
    pub postal: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedContact {
    pub email: String,
    pub phone: String,
    pub fax: String,
}

/// Normalized government ID. §4.6's government-ID phase is an exact
/// match on identifier *and* type *and* country (when both sides supply a
/// country) — not a fuzzy comparison — so `id_type`/`country` must survive
/// normalization rather than being collapsed into the identifier alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedGovId {
    pub identifier: String,
    pub id_type: String,
    pub country: Option<String>,
}

impl NormalizedGovId {
    /// §4.6: equal iff identifiers and types match and, when both sides
    /// supply a country, countries match too.
    pub fn matches(&self, other: &NormalizedGovId) -> bool {
        if self.identifier != other.identifier || self.id_type != other.id_type {
            return false;
        }
        match (&self.country, &other.country) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}

/// Normalized crypto address. §4.6: "(currency, address) pair equality,
/// address case-sensitive" — currency is folded for comparison but the
/// address is kept verbatim (only trimmed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCryptoAddress {
    pub currency: String,
    pub address: String,
}

impl NormalizedCryptoAddress {
    pub fn matches(&self, other: &NormalizedCryptoAddress) -> bool {
        self.currency == other.currency && self.address == other.address
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedFields {
    pub normalizer_version: u32,
    pub language: Language,

    pub primary_name_normalized: String,
    pub primary_name_no_titles: String,
    pub primary_name_no_stopwords: String,
    pub primary_name_variants: Vec<String>,

    pub alt_names_normalized: Vec<String>,
    pub alt_names_no_stopwords: Vec<String>,
    pub alt_name_variants: Vec<Vec<String>>,

    pub addresses: Vec<NormalizedAddress>,
    pub government_ids: Vec<NormalizedGovId>,
    pub crypto_addresses: Vec<NormalizedCryptoAddress>,
    pub contact: NormalizedContact,
}

fn normalize_address(address: &Address) -> NormalizedAddress {
    NormalizedAddress {
        line1: normalize(address.line1.as_deref().unwrap_or("")),
        line2: normalize(address.line2.as_deref().unwrap_or("")),
        city: normalize(address.city.as_deref().unwrap_or("")),
        state: normalize(address.state.as_deref().unwrap_or("")),
        postal: normalize_id(address.postal.as_deref().unwrap_or("")),
        country: normalize(address.country.as_deref().unwrap_or("")),
    }
}

fn normalize_gov_id(id: &GovernmentId) -> NormalizedGovId {
    NormalizedGovId {
        identifier: normalize_id(&id.identifier),
        id_type: id.id_type.trim().to_lowercase(),
        country: id
            .country
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase()),
    }
}

fn normalize_crypto(addr: &CryptoAddress) -> NormalizedCryptoAddress {
    NormalizedCryptoAddress {
        currency: addr.currency.trim().to_lowercase(),
        address: addr.address.trim().to_string(),
    }
}

fn normalize_contact(contact: &Contact) -> NormalizedContact {
    NormalizedContact {
        email: contact.email.as_deref().unwrap_or("").trim().to_lowercase(),
        phone: normalize_phone(contact.phone.as_deref().unwrap_or("")),
        fax: normalize_phone(contact.fax.as_deref().unwrap_or("")),
    }
}

/// Run the normalization pipeline on one raw name: SDN reorder, canonical
/// normalize, company-title strip, stopword strip, word-combination
/// variants. Each step feeds the next.
fn prepare_name(raw: &str, language: Language) -> (String, String, String, Vec<String>) {
    let reordered = reorder_sdn_name(raw);
    let normalized = normalize(&reordered);
    let no_titles = remove_company_titles(&normalized);
    let no_stopwords = remove_stopwords(&no_titles, language);
    let variants = word_combinations(&no_stopwords);
    (normalized, no_titles, no_stopwords, variants)
}

impl PreparedFields {
    /// Build the full set of prepared fields for `entity`. The only
    /// constructor; called exactly once from [`Entity::prepare`].
    pub fn build(entity: &Entity) -> Self {
        let language = detect_language(&entity.primary_name);

        let (primary_name_normalized, primary_name_no_titles, primary_name_no_stopwords, primary_name_variants) =
            prepare_name(&entity.primary_name, language);

        let mut alt_names_normalized = Vec::with_capacity(entity.alt_names.len());
        let mut alt_names_no_stopwords = Vec::with_capacity(entity.alt_names.len());
        let mut alt_name_variants = Vec::with_capacity(entity.alt_names.len());
        for alt in &entity.alt_names {
            let (normalized, _no_titles, no_stopwords, variants) = prepare_name(alt, language);
            alt_names_normalized.push(normalized);
            alt_names_no_stopwords.push(no_stopwords);
            alt_name_variants.push(variants);
        }

        let addresses = entity.addresses.iter().map(normalize_address).collect();
        let government_ids = entity.government_ids.iter().map(normalize_gov_id).collect();
        let crypto_addresses = entity.crypto_addresses.iter().map(normalize_crypto).collect();
        let contact = normalize_contact(&entity.contact);

        PreparedFields {
            normalizer_version: NORMALIZER_VERSION,
            language,
            primary_name_normalized,
            primary_name_no_titles,
            primary_name_no_stopwords,
            primary_name_variants,
            alt_names_normalized,
            alt_names_no_stopwords,
            alt_name_variants,
            addresses,
            government_ids,
            crypto_addresses,
            contact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityType, GovernmentId, Source};

    #[test]
    fn build_stamps_current_normalizer_version() {
        let e = Entity::new("1", "Nicolas Maduro Moros", EntityType::Person, Source::OfacSdn);
        let prepared = PreparedFields::build(&e);
        assert_eq!(prepared.normalizer_version, NORMALIZER_VERSION);
    }

    #[test]
    fn reorders_sdn_style_primary_name() {
        let e = Entity::new("1", "MADURO MOROS, Nicolas", EntityType::Person, Source::OfacSdn);
        let prepared = PreparedFields::build(&e);
        assert_eq!(prepared.primary_name_normalized, "nicolas maduro moros");
    }

    #[test]
    fn strips_company_titles_only_in_dedicated_field() {
        let e = Entity::new("1", "Acme Trading LLC", EntityType::Business, Source::OfacSdn);
        let prepared = PreparedFields::build(&e);
        assert_eq!(prepared.primary_name_normalized, "acme trading llc");
        assert_eq!(prepared.primary_name_no_titles, "acme trading");
    }

    #[test]
    fn government_ids_are_normalized() {
        let e = Entity::new("1", "Acme", EntityType::Business, Source::OfacSdn).with_government_ids(vec![
            GovernmentId {
                identifier: "AB-123 456".into(),
                id_type: "passport".into(),
                country: None,
            },
        ]);
        let prepared = PreparedFields::build(&e);
        assert_eq!(prepared.government_ids[0].identifier, "ab123456");
        assert_eq!(prepared.government_ids[0].id_type, "passport");
        assert_eq!(prepared.government_ids[0].country, None);
    }

    #[test]
    fn alt_names_list_has_matching_length_for_all_parallel_vectors() {
        let e = Entity::new("1", "Primary", EntityType::Person, Source::OfacSdn)
            .with_alt_names(vec!["Alt One".into(), "Alt Two".into()]);
        let prepared = PreparedFields::build(&e);
        assert_eq!(prepared.alt_names_normalized.len(), 2);
        assert_eq!(prepared.alt_names_no_stopwords.len(), 2);
        assert_eq!(prepared.alt_name_variants.len(), 2);
    }
}
