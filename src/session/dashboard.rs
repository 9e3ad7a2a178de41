// src/session/dashboard.rs
//! Performance history pulled from the backend

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

use crate::app_log;
use crate::core::CoachApi;
use crate::types::DashboardRecord;

pub struct Dashboard {
    records: Vec<DashboardRecord>,
}

impl Dashboard {
    /// Fetch history; an unreachable backend shows an empty dashboard
    pub async fn load(api: &dyn CoachApi) -> Self {
        let records = match api.dashboard().await {
            Ok(records) => records,
            Err(e) => {
                app_log!(error, "Error fetching dashboard: {:#}", e);
                Vec::new()
            }
        };
        Self { records }
    }

    pub fn from_records(records: Vec<DashboardRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[DashboardRecord] {
        &self.records
    }

    pub fn total_sessions(&self) -> usize {
        self.records.len()
    }

    /// Mean rating with one decimal, `"0.0"` for an empty history
    pub fn average_rating(&self) -> String {
        if self.records.is_empty() {
            return "0.0".to_string();
        }
        let sum: f32 = self.records.iter().map(|r| r.rating).sum();
        format!("{:.1}", sum / self.records.len() as f32)
    }

    /// Distinct non-empty topics across the history
    pub fn skills_analyzed(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.topic.trim())
            .filter(|t| !t.is_empty())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Write every record as a CSV row with a header line
    pub fn export_csv(&self, path: &Path) -> Result<usize> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

        for record in &self.records {
            writer
                .serialize(record)
                .context("Failed to write dashboard record")?;
        }
        writer.flush().context("Failed to flush CSV file")?;

        app_log!(info, "Exported {} records to {}", self.records.len(), path.display());
        Ok(self.records.len())
    }
}
