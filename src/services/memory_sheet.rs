use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::services::sheets::{SheetClient, SheetError};

/// Spreadsheet double: ranges are looked up verbatim, writes are recorded.
#[derive(Default)]
pub struct MemorySheet {
    ranges: Mutex<HashMap<String, Vec<Vec<String>>>>,
    writes: Mutex<Vec<(String, Vec<i64>)>>,
}

impl MemorySheet {
    pub async fn set_range(&self, range: &str, rows: Vec<Vec<&str>>) {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(str::to_string).collect())
            .collect();
        self.ranges.lock().await.insert(range.to_string(), rows);
    }

    pub async fn set_column(&self, range: &str, cells: &[&str]) {
        self.set_range(range, cells.iter().map(|c| vec![*c]).collect()).await;
    }

    pub async fn writes(&self) -> Vec<(String, Vec<i64>)> {
        self.writes.lock().await.clone()
    }
}

#[async_trait]
impl SheetClient for MemorySheet {
    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>, SheetError> {
        Ok(self.ranges.lock().await.get(range).cloned().unwrap_or_default())
    }

    async fn write_column(&self, range: &str, values: &[i64]) -> Result<(), SheetError> {
        self.writes
            .lock()
            .await
            .push((range.to_string(), values.to_vec()));
        Ok(())
    }
}
