use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::models::daily_record::DailyRecord;
use super::errors::RepositoryError;

#[derive(Debug, Default)]
struct RecordTable {
    records: HashMap<String, DailyRecord>,
    /// idempotency key -> record id
    keys: HashMap<String, String>,
}

/// In-memory storage implementation for daily records
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    table: Arc<Mutex<RecordTable>>,
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record, or return the record already stored under the same idempotency key.
    ///
    /// The boolean is `true` when the record was newly inserted.
    pub async fn store_record(&self, record: &DailyRecord) -> Result<(DailyRecord, bool), RepositoryError> {
        let mut table = self.table.lock()?;

        if let Some(key) = &record.idempotency_key {
            if let Some(existing) = table.keys.get(key).and_then(|id| table.records.get(id)) {
                return Ok((existing.clone(), false));
            }
            table.keys.insert(key.clone(), record.id.clone());
        }

        table.records.insert(record.id.clone(), record.clone());
        Ok((record.clone(), true))
    }

    /// Get all records from memory
    pub async fn get_all(&self) -> Result<Vec<DailyRecord>, RepositoryError> {
        let table = self.table.lock()?;
        Ok(table.records.values().cloned().collect())
    }

    /// Get the most recent record by episode date
    pub async fn get_latest(&self) -> Result<Option<DailyRecord>, RepositoryError> {
        let table = self.table.lock()?;
        Ok(table.records.values().max_by(|a, b| a.date.cmp(&b.date)).cloned())
    }

    /// Get a record by ID from memory
    pub async fn get_by_id(&self, id: &str) -> Result<Option<DailyRecord>, RepositoryError> {
        let table = self.table.lock()?;
        Ok(table.records.get(id).cloned())
    }

    /// Get filtered records from memory
    pub async fn get_filtered(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
        limit: Option<usize>,
        offset: Option<usize>,
        sort_desc: Option<bool>,
    ) -> Result<(Vec<DailyRecord>, usize), RepositoryError> {
        let table = self.table.lock()?;
        let sort_desc = sort_desc.unwrap_or(true);

        let mut records: Vec<DailyRecord> = table
            .records
            .values()
            .filter(|record| {
                if let Some(start_date) = start_date {
                    if record.date.as_str() < start_date {
                        return false;
                    }
                }

                if let Some(end_date) = end_date {
                    if record.date.as_str() > end_date {
                        return false;
                    }
                }

                true
            })
            .cloned()
            .collect();

        records.sort_by(|a, b| {
            let cmp = a.date.cmp(&b.date);
            if sort_desc {
                cmp.reverse()
            } else {
                cmp
            }
        });

        let total = records.len();
        let offset = offset.unwrap_or(0);
        if offset > total {
            return Err(RepositoryError::Pagination(format!(
                "offset {} exceeds total of {} records",
                offset, total
            )));
        }
        let limit = limit.unwrap_or(total);

        let page = records.into_iter().skip(offset).take(limit).collect();

        Ok((page, total))
    }
}
