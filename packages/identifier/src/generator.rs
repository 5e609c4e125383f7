//! Farmer identifier generation and producer registration.

use std::sync::Arc;

use shamba_geography_models::{AdministrativeUnit, WardScope};
use shamba_producer_models::{
    FarmerIdentifier, NewProducer, ProducerRecord, ProducerRegistration,
};

use crate::retry::RetryPolicy;
use crate::store::{AdministrativeDirectory, ProducerRegistry, RegistryError};
use crate::IdentifierError;

/// Allocates ward-scoped farmer identifiers and registers producers.
#[derive(Clone)]
pub struct FarmerIdentifierGenerator {
    directory: Arc<dyn AdministrativeDirectory>,
    registry: Arc<dyn ProducerRegistry>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for FarmerIdentifierGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FarmerIdentifierGenerator")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl FarmerIdentifierGenerator {
    /// Creates a generator with the default [`RetryPolicy`].
    #[must_use]
    pub fn new(
        directory: Arc<dyn AdministrativeDirectory>,
        registry: Arc<dyn ProducerRegistry>,
    ) -> Self {
        Self {
            directory,
            registry,
            retry: RetryPolicy::default(),
        }
    }

    /// Replaces the retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The retry policy in effect.
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Allocates the next identifier for the ward named by `scope`.
    ///
    /// Each call consumes one sequence number, even if the caller never
    /// stores a producer under it.
    ///
    /// # Errors
    ///
    /// * [`IdentifierError::UnknownUnit`] if the ward is not in the
    ///   reference table.
    /// * [`IdentifierError::SequenceExhausted`] if the ward is past 999.
    /// * [`IdentifierError::Registry`] on storage failure.
    pub async fn generate(&self, scope: &WardScope) -> Result<FarmerIdentifier, IdentifierError> {
        let unit = self.resolve(scope).await?;
        self.allocate(&unit).await
    }

    /// Validates a registration, allocates its identifier, and stores the
    /// producer.
    ///
    /// A duplicate identifier on insert is retried with exponential
    /// backoff; each retry allocates a fresh sequence number.
    ///
    /// # Errors
    ///
    /// * [`IdentifierError::InvalidRegistration`] if the input is invalid.
    /// * [`IdentifierError::UnknownUnit`] if the ward is not in the
    ///   reference table.
    /// * [`IdentifierError::SequenceExhausted`] if the ward is past 999.
    /// * [`IdentifierError::Conflict`] if every attempt collided.
    /// * [`IdentifierError::Registry`] on storage failure.
    pub async fn register(
        &self,
        registration: ProducerRegistration,
    ) -> Result<ProducerRecord, IdentifierError> {
        validate(&registration)?;
        let unit = self.resolve(&registration.scope).await?;

        let mut retries = 0u32;
        let mut producer = NewProducer {
            farmer_id: self.allocate(&unit).await?,
            registration,
        };

        loop {
            match self.registry.insert_producer(&producer).await {
                Ok(record) => {
                    log::info!(
                        "Registered producer {} as {}",
                        record.display_name,
                        record.farmer_id
                    );
                    return Ok(record);
                }
                Err(RegistryError::Duplicate { farmer_id }) => {
                    if retries >= self.retry.max_retries {
                        log::error!(
                            "Identifier {farmer_id} still taken after {} attempts, giving up",
                            retries + 1
                        );
                        return Err(IdentifierError::Conflict {
                            farmer_id,
                            attempts: retries + 1,
                        });
                    }
                    retries += 1;
                    let delay = self.retry.delay_for(retries);
                    log::warn!(
                        "Identifier {farmer_id} already taken, retry {retries}/{} in {delay:?}",
                        self.retry.max_retries
                    );
                    tokio::time::sleep(delay).await;
                    producer.farmer_id = self.allocate(&unit).await?;
                }
                Err(e) => {
                    log::error!("Failed to insert producer {}: {e}", producer.farmer_id);
                    return Err(e.into());
                }
            }
        }
    }

    async fn resolve(&self, scope: &WardScope) -> Result<AdministrativeUnit, IdentifierError> {
        self.directory
            .resolve(scope)
            .await?
            .ok_or_else(|| IdentifierError::UnknownUnit {
                scope: scope.clone(),
            })
    }

    async fn allocate(&self, unit: &AdministrativeUnit) -> Result<FarmerIdentifier, IdentifierError> {
        let sequence = self.registry.next_sequence(unit).await?;
        FarmerIdentifier::new(unit, sequence).map_err(|_| {
            log::error!(
                "Ward {} reached sequence {sequence}, beyond the three-digit field",
                unit.identifier_prefix()
            );
            IdentifierError::SequenceExhausted {
                scope: unit.scope(),
                sequence,
            }
        })
    }
}

fn validate(registration: &ProducerRegistration) -> Result<(), IdentifierError> {
    let invalid = |message: &str| IdentifierError::InvalidRegistration {
        message: message.to_string(),
    };

    if registration.display_name.trim().is_empty() {
        return Err(invalid("display name must not be empty"));
    }
    if registration.scope.is_incomplete() {
        return Err(invalid("county, sub-county and ward are all required"));
    }
    if registration
        .farm_acreage_acres
        .is_some_and(|acres| !acres.is_finite() || acres < 0.0)
    {
        return Err(invalid("farm acreage must be a non-negative number"));
    }
    if registration
        .crop_name
        .as_deref()
        .is_some_and(|c| c.trim().is_empty())
    {
        return Err(invalid("crop name must not be blank"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use shamba_core_models::ErrorKind;

    use super::*;
    use crate::memory::MemoryRegistry;

    fn biashara() -> WardScope {
        WardScope::new("Nakuru", "Naivasha", "Biashara")
    }

    fn registration(name: &str) -> ProducerRegistration {
        ProducerRegistration {
            display_name: name.to_string(),
            scope: biashara(),
            location: None,
            crop_name: Some("Kale".to_string()),
            farm_acreage_acres: Some(1.0),
        }
    }

    fn generator(registry: &Arc<MemoryRegistry>) -> FarmerIdentifierGenerator {
        FarmerIdentifierGenerator::new(registry.clone(), registry.clone())
            .with_retry_policy(RetryPolicy::immediate(3))
    }

    #[tokio::test]
    async fn eighth_producer_gets_008() {
        let registry = Arc::new(MemoryRegistry::with_kenyan_units());
        registry.seed_producers(&biashara(), 7);

        let id = generator(&registry).generate(&biashara()).await.unwrap();
        assert_eq!(id.to_string(), "NRU32-01-008");
    }

    #[tokio::test]
    async fn first_producer_gets_001() {
        let registry = Arc::new(MemoryRegistry::with_kenyan_units());
        let id = generator(&registry)
            .generate(&WardScope::new("nairobi", "westlands", "parklands/highridge"))
            .await
            .unwrap();
        assert_eq!(id.to_string(), "NRB47-02-001");
    }

    #[tokio::test]
    async fn unknown_ward_is_not_found() {
        let registry = Arc::new(MemoryRegistry::with_kenyan_units());
        let err = generator(&registry)
            .generate(&WardScope::new("Nakuru", "Naivasha", "Atlantis"))
            .await
            .unwrap_err();
        assert!(matches!(err, IdentifierError::UnknownUnit { .. }));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_generation_is_contiguous_and_unique() {
        let registry = Arc::new(MemoryRegistry::with_kenyan_units());
        registry.seed_producers(&biashara(), 7);
        let generator = Arc::new(generator(&registry));

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..64 {
            let generator = generator.clone();
            tasks.spawn(async move { generator.generate(&biashara()).await });
        }

        let mut ids = BTreeSet::new();
        let mut sequences = Vec::new();
        while let Some(result) = tasks.join_next().await {
            let id = result.unwrap().unwrap();
            sequences.push(id.sequence());
            assert!(ids.insert(id.to_string()), "duplicate {id}");
        }

        sequences.sort_unstable();
        assert_eq!(sequences, (8..8 + 64).collect::<Vec<u32>>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registrations_store_distinct_identifiers() {
        let registry = Arc::new(MemoryRegistry::with_kenyan_units());
        let generator = Arc::new(generator(&registry));

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..32 {
            let generator = generator.clone();
            tasks.spawn(async move { generator.register(registration(&format!("Farm {i}"))).await });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap().unwrap();
        }

        let stored = registry.farmer_ids();
        assert_eq!(stored.len(), 32);
        assert_eq!(stored.iter().collect::<BTreeSet<_>>().len(), 32);
    }

    #[tokio::test]
    async fn duplicate_insert_is_retried_with_next_sequence() {
        let registry = Arc::new(MemoryRegistry::with_kenyan_units());
        registry.block_identifier("NRU32-01-001");

        let record = generator(&registry)
            .register(registration("Wanjiku Farm"))
            .await
            .unwrap();
        assert_eq!(record.farmer_id.to_string(), "NRU32-01-002");
    }

    #[tokio::test]
    async fn exhausted_retries_surface_conflict() {
        let registry = Arc::new(MemoryRegistry::with_kenyan_units());
        for seq in 1..=4 {
            registry.block_identifier(&format!("NRU32-01-{seq:03}"));
        }

        let err = generator(&registry)
            .register(registration("Wanjiku Farm"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IdentifierError::Conflict { ref farmer_id, attempts: 4 } if farmer_id == "NRU32-01-004"
        ));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn removed_producer_number_is_not_reissued() {
        let registry = Arc::new(MemoryRegistry::with_kenyan_units());
        let generator = generator(&registry);

        let first = generator.register(registration("A")).await.unwrap();
        let second = generator.register(registration("B")).await.unwrap();
        registry.remove(&second.farmer_id.to_string());

        let third = generator.register(registration("C")).await.unwrap();
        assert_eq!(first.farmer_id.sequence(), 1);
        assert_eq!(third.farmer_id.sequence(), 3);
    }

    #[tokio::test]
    async fn sequence_past_999_is_refused() {
        let registry = Arc::new(MemoryRegistry::with_kenyan_units());
        registry.seed_producers(&biashara(), 999);

        let err = generator(&registry).generate(&biashara()).await.unwrap_err();
        assert!(matches!(
            err,
            IdentifierError::SequenceExhausted { sequence: 1_000, .. }
        ));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn rejects_invalid_registrations() {
        let registry = Arc::new(MemoryRegistry::with_kenyan_units());
        let generator = generator(&registry);

        let mut blank_name = registration("  ");
        blank_name.display_name = " ".to_string();
        let mut negative_acres = registration("Farm");
        negative_acres.farm_acreage_acres = Some(-2.0);
        let mut missing_ward = registration("Farm");
        missing_ward.scope.ward = String::new();
        let mut blank_crop = registration("Farm");
        blank_crop.crop_name = Some(" ".to_string());

        for bad in [blank_name, negative_acres, missing_ward, blank_crop] {
            let err = generator.register(bad).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
        assert!(registry.farmer_ids().is_empty());
    }

    #[tokio::test]
    async fn backend_failure_is_propagated() {
        let registry = Arc::new(MemoryRegistry::with_kenyan_units());
        registry.set_unavailable(true);

        let err = generator(&registry)
            .register(registration("Farm"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CollaboratorFailure);
    }
}
