use app_config::RaffleConfig;
use app_database::service::DbService;
use app_error::{AppError, AppResult};
use app_middleware::validation::{validate_numbers, validate_participant_name};
use app_models::{CreateRaffleInput, PaymentInfo, RaffleEntry, RaffleSummary};
use async_trait::async_trait;
use std::{collections::BTreeSet, sync::Arc};
use tracing::{debug, info};

/// Trait defining the raffle service interface
#[async_trait]
pub trait RaffleServiceTrait: Send + Sync {
    /// Validate and store a participant's entry
    async fn create_entry(&self, input: CreateRaffleInput) -> AppResult<RaffleEntry>;

    /// Every stored entry
    async fn list_entries(&self) -> AppResult<Vec<RaffleEntry>>;

    /// All claimed numbers across entries, flattened, duplicates kept
    async fn list_purchased_numbers(&self) -> AppResult<Vec<u32>>;

    async fn summary(&self) -> AppResult<RaffleSummary>;

    fn payment_info(&self) -> PaymentInfo;
}

pub type SharedRaffleService = Arc<dyn RaffleServiceTrait>;

pub struct RaffleService {
    entries: Arc<DbService<RaffleEntry>>,
    raffle: RaffleConfig,
}

impl RaffleService {
    pub fn new(entries: Arc<DbService<RaffleEntry>>, raffle: RaffleConfig) -> Self {
        Self { entries, raffle }
    }

    fn build_summary(&self, purchased: &[u32]) -> RaffleSummary {
        let taken: BTreeSet<u32> = purchased.iter().copied().collect();
        let purchased_count = purchased.len();

        RaffleSummary {
            purchased_count,
            total_raised: purchased_count as u64 * self.raffle.price_per_number,
            price_per_number: self.raffle.price_per_number,
            max_number: self.raffle.max_number,
            available_numbers: (0..=self.raffle.max_number)
                .filter(|n| !taken.contains(n))
                .collect(),
        }
    }
}

#[async_trait]
impl RaffleServiceTrait for RaffleService {
    async fn create_entry(&self, input: CreateRaffleInput) -> AppResult<RaffleEntry> {
        let name = validate_participant_name(&input.name)?;
        validate_numbers(&input.numbers, self.raffle.max_number)?;

        // Numbers already claimed by others are not rejected here
        let entry = RaffleEntry::new(name, input.numbers);
        let created = self.entries.create_record(entry).await?.ok_or_else(|| {
            AppError::database_operation_failed("create", self.entries.table_name())
        })?;

        info!(
            id = %created.record_key().unwrap_or_default(),
            numbers = ?created.numbers,
            "Raffle entry created"
        );
        Ok(created)
    }

    async fn list_entries(&self) -> AppResult<Vec<RaffleEntry>> {
        let entries = self.entries.list_records().await?;
        debug!("Listed {} raffle entries", entries.len());
        Ok(entries)
    }

    async fn list_purchased_numbers(&self) -> AppResult<Vec<u32>> {
        let per_entry: Vec<Vec<u32>> = self.entries.select_field_values("numbers").await?;
        Ok(per_entry.into_iter().flatten().collect())
    }

    async fn summary(&self) -> AppResult<RaffleSummary> {
        let purchased = self.list_purchased_numbers().await?;
        Ok(self.build_summary(&purchased))
    }

    fn payment_info(&self) -> PaymentInfo {
        PaymentInfo {
            code: self.raffle.payment_code.clone(),
        }
    }
}
