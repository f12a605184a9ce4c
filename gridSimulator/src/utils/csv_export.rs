use std::error::Error;
use std::path::{Path, PathBuf};
use chrono::Local;
use csv::Writer;
use tracing::info;

use crate::config::tech_type::TechType;
use crate::core::autopilot::AutoplayOutcome;
use crate::core::session::RoundRecord;
use crate::utils::logging::{self, FileIOType, OperationCategory};

/// Writes round histories and batch outcomes under a timestamped directory
pub struct CsvExporter {
    output_dir: PathBuf,
    timestamp: String,
}

impl CsvExporter {
    /// Creates `<output_dir>/<YYYYmmdd_HHMMSS>/`
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let full_path = output_dir.as_ref().join(&timestamp);
        std::fs::create_dir_all(&full_path)?;
        Ok(Self {
            output_dir: full_path,
            timestamp,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// One row per settled round with a dispatch column per technology
    pub fn export_rounds(&self, label: &str, rounds: &[RoundRecord]) -> Result<PathBuf, Box<dyn Error + Send + Sync>> {
        let _timing = logging::start_timing("export_rounds",
            OperationCategory::FileIO { subcategory: FileIOType::CsvExport });

        let path = self.output_dir.join(format!("rounds_{}.csv", label));
        let mut writer = Writer::from_path(&path)?;

        let mut header = vec!["Hour".to_string(), "Demand (GWh)".to_string(), "Dispatch (GWh)".to_string()];
        header.extend(TechType::ALL.iter().map(|tech| format!("{} (GWh)", tech)));
        header.extend([
            "Stored (GWh)", "Unstored (GWh)", "Points", "Score", "Smog Ratio", "Powered", "Timestamp",
        ].iter().map(|s| s.to_string()));
        writer.write_record(&header)?;

        for round in rounds {
            let mut row = vec![
                round.hour.to_string(),
                round.demand.to_string(),
                round.total_dispatch.to_string(),
            ];
            row.extend(TechType::ALL.iter().map(|tech| {
                round.dispatch_by_tech.get(tech).map(|gwh| gwh.to_string()).unwrap_or_default()
            }));
            row.push(round.stored.to_string());
            row.push(round.unstored.to_string());
            row.push(round.score_delta.to_string());
            row.push(round.score.to_string());
            row.push(format!("{:.4}", round.smog_ratio));
            row.push(round.powered.to_string());
            row.push(self.timestamp.clone());
            writer.write_record(&row)?;
        }
        writer.flush()?;
        info!("Exported {} rounds to {}", rounds.len(), path.display());
        Ok(path)
    }

    /// Batch autoplay results, one row per seed
    pub fn export_autoplay(&self, outcomes: &[AutoplayOutcome]) -> Result<PathBuf, Box<dyn Error + Send + Sync>> {
        let _timing = logging::start_timing("export_autoplay",
            OperationCategory::FileIO { subcategory: FileIOType::CsvExport });

        let path = self.output_dir.join("autoplay_summary.csv");
        let mut writer = Writer::from_path(&path)?;
        for outcome in outcomes {
            writer.serialize(outcome)?;
        }
        writer.flush()?;
        info!("Exported {} autoplay outcomes to {}", outcomes.len(), path.display());
        Ok(path)
    }
}
