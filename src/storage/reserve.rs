use crate::models::Reserve;
use crate::Result;

use super::Storage;

impl Storage {
    /// Inserts or replaces the reserve with the same id
    pub async fn upsert_reserve(&self, reserve: Reserve) -> Result<Reserve> {
        self.reserves
            .write()
            .await
            .insert(reserve.id.clone(), reserve.clone());
        tracing::info!("Reserve '{}' set to {} USD", reserve.id, reserve.amount_usd);
        Ok(reserve)
    }
    pub async fn get_reserves(&self) -> Result<Vec<Reserve>> {
        let mut result: Vec<Reserve> = self.reserves.read().await.values().cloned().collect();
        result.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(result)
    }
}
