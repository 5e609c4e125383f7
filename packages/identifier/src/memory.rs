//! In-memory registry used by the generator tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use shamba_geography_models::{AdministrativeUnit, WardScope};
use shamba_producer_models::{
    FarmerIdentifier, NewProducer, ProducerRecord, UserType,
};

use crate::store::{AdministrativeDirectory, ProducerRegistry, RegistryError};

type WardKey = (String, String, String);

#[derive(Default)]
struct State {
    units: Vec<AdministrativeUnit>,
    sequences: BTreeMap<WardKey, u32>,
    producers: Vec<ProducerRecord>,
    taken: BTreeSet<String>,
    next_id: i64,
    unavailable: bool,
}

#[derive(Default)]
pub struct MemoryRegistry {
    state: Mutex<State>,
}

impl MemoryRegistry {
    pub fn with_kenyan_units() -> Self {
        let unit = |county: &str, code: &str, number: &str, sub: &str, ward: &str, ward_no: &str| {
            AdministrativeUnit {
                county_name: county.to_string(),
                county_code: code.to_string(),
                county_number: number.to_string(),
                sub_county_name: sub.to_string(),
                ward_name: ward.to_string(),
                ward_number: ward_no.to_string(),
            }
        };

        let registry = Self::default();
        registry.state.lock().unwrap().units = vec![
            unit("Nakuru", "NRU", "32", "Naivasha", "Biashara", "01"),
            unit("Nakuru", "NRU", "32", "Naivasha", "Hells Gate", "02"),
            unit("Nairobi", "NRB", "47", "Westlands", "Parklands/Highridge", "02"),
        ];
        registry
    }

    /// Stores `count` producers in the ward as if they had registered
    /// before any sequence was allocated.
    pub fn seed_producers(&self, scope: &WardScope, count: u32) {
        let mut state = self.state.lock().unwrap();
        let unit = state
            .units
            .iter()
            .find(|u| u.scope() == *scope)
            .cloned()
            .unwrap();

        for sequence in 1..=count {
            let farmer_id = FarmerIdentifier::new(&unit, sequence).unwrap();
            let record = record(&mut state, farmer_id, format!("Seeded {sequence}"), scope);
            state.taken.insert(record.farmer_id.to_string());
            state.producers.push(record);
        }
    }

    /// Marks an identifier as taken without a matching producer row, so
    /// the sequence counter does not know about it.
    pub fn block_identifier(&self, farmer_id: &str) {
        self.state.lock().unwrap().taken.insert(farmer_id.to_string());
    }

    pub fn remove(&self, farmer_id: &str) {
        let mut state = self.state.lock().unwrap();
        state.producers.retain(|p| p.farmer_id.to_string() != farmer_id);
        state.taken.remove(farmer_id);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().unwrap().unavailable = unavailable;
    }

    pub fn farmer_ids(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .producers
            .iter()
            .map(|p| p.farmer_id.to_string())
            .collect()
    }
}

fn record(
    state: &mut State,
    farmer_id: FarmerIdentifier,
    display_name: String,
    scope: &WardScope,
) -> ProducerRecord {
    state.next_id += 1;
    ProducerRecord {
        id: state.next_id,
        farmer_id,
        display_name,
        user_type: UserType::Producer,
        scope: scope.clone(),
        location: None,
        crop_name: None,
        farm_acreage_acres: None,
        registered_at: Utc::now(),
    }
}

fn unavailable() -> RegistryError {
    RegistryError::Backend {
        message: "registry offline".to_string(),
    }
}

#[async_trait]
impl AdministrativeDirectory for MemoryRegistry {
    async fn resolve(&self, scope: &WardScope) -> Result<Option<AdministrativeUnit>, RegistryError> {
        let state = self.state.lock().unwrap();
        if state.unavailable {
            return Err(unavailable());
        }
        Ok(state.units.iter().find(|u| u.scope() == *scope).cloned())
    }
}

#[async_trait]
impl ProducerRegistry for MemoryRegistry {
    async fn next_sequence(&self, unit: &AdministrativeUnit) -> Result<u32, RegistryError> {
        let mut state = self.state.lock().unwrap();
        if state.unavailable {
            return Err(unavailable());
        }

        let scope = unit.scope();
        let existing = state.producers.iter().filter(|p| p.scope == scope).count();
        let existing = u32::try_from(existing).unwrap();
        let sequence = state.sequences.entry(scope.key()).or_insert(existing);
        *sequence += 1;
        Ok(*sequence)
    }

    async fn insert_producer(&self, producer: &NewProducer) -> Result<ProducerRecord, RegistryError> {
        let mut state = self.state.lock().unwrap();
        if state.unavailable {
            return Err(unavailable());
        }

        let farmer_id = producer.farmer_id.to_string();
        if !state.taken.insert(farmer_id.clone()) {
            return Err(RegistryError::Duplicate { farmer_id });
        }

        let registration = &producer.registration;
        let mut stored = record(
            &mut state,
            producer.farmer_id.clone(),
            registration.display_name.trim().to_string(),
            &registration.scope,
        );
        stored.location = registration.location;
        stored.crop_name.clone_from(&registration.crop_name);
        stored.farm_acreage_acres = registration.farm_acreage_acres;
        state.producers.push(stored.clone());
        Ok(stored)
    }
}
