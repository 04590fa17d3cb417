//! Per-scenario summary of an aggregated table

use crate::aggregator::Table;
use crate::parser::Record;
use serde::{Deserialize, Serialize};

/// Totals and per-trial means for one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub scenario: String,
    pub trials: u32,
    pub records: usize,
    /// Means over each trial's closing record
    pub mean_drones: f64,
    pub mean_victims: f64,
    pub mean_score: f64,
    pub total_successes: u32,
    pub total_fails: u32,
}

/// Calculator for table summaries
pub struct SummaryCalculator;

impl SummaryCalculator {
    /// The last record of each trial, in table order.
    ///
    /// A file without a header still ends in a record, numbered with the
    /// previous file's last trial; it closes nothing and is skipped.
    pub fn closing_records(table: &Table) -> Vec<&Record> {
        let mut closing: Vec<&Record> = Vec::new();
        for (records, trials) in table.by_source() {
            if trials == 0 {
                continue;
            }
            for record in records {
                let same_trial = closing.last().is_some_and(|last| {
                    last.trial == record.trial && last.scenario == record.scenario
                });
                if same_trial {
                    closing.pop();
                }
                closing.push(record);
            }
        }
        closing
    }

    /// Summaries in order of first appearance of each scenario
    pub fn by_scenario(table: &Table) -> Vec<ScenarioSummary> {
        let closing = Self::closing_records(table);
        let mut order: Vec<&str> = Vec::new();
        for record in &table.records {
            if !order.contains(&record.scenario.as_str()) {
                order.push(&record.scenario);
            }
        }

        order
            .into_iter()
            .map(|scenario| {
                let trials: Vec<&&Record> =
                    closing.iter().filter(|r| r.scenario == scenario).collect();
                let records = table.records.iter().filter(|r| r.scenario == scenario).count();
                let n = trials.len();
                let mean = |f: fn(&Record) -> f64| {
                    if n == 0 {
                        0.0
                    } else {
                        trials.iter().map(|r| f(r)).sum::<f64>() / n as f64
                    }
                };

                ScenarioSummary {
                    scenario: scenario.to_string(),
                    trials: n as u32,
                    records,
                    mean_drones: mean(|r| r.drones as f64),
                    mean_victims: mean(|r| r.victims as f64),
                    mean_score: mean(|r| r.score),
                    total_successes: trials.iter().map(|r| r.successes).sum(),
                    total_fails: trials.iter().map(|r| r.fails).sum(),
                }
            })
            .collect()
    }
}

/// Format a table summary as boxed text
pub fn format_summary(table: &Table) -> String {
    let summaries = SummaryCalculator::by_scenario(table);
    let rule = "═".repeat(66);
    let mut out = String::new();

    out.push_str(&format!("\n╔{}╗\n", rule));
    out.push_str(&format!("║  {:<64}║\n", "TRIAL LOG SUMMARY"));
    out.push_str(&format!("╠{}╣\n", rule));
    out.push_str(&format!("║  {:<22}{:>10}{:<32}║\n", "Files:", table.sources.len(), ""));
    out.push_str(&format!("║  {:<22}{:>10}{:<32}║\n", "Schema:", table.schema.to_string(), ""));
    out.push_str(&format!("║  {:<22}{:>10}{:<32}║\n", "Trials:", table.trials, ""));
    out.push_str(&format!("║  {:<22}{:>10}{:<32}║\n", "Records:", table.len(), ""));

    for s in &summaries {
        out.push_str(&format!("╠{}╣\n", rule));
        out.push_str(&format!("║  {:<64}║\n", s.scenario.to_uppercase()));
        out.push_str(&format!("║  {:<22}{:>10}{:<32}║\n", "Trials:", s.trials, ""));
        out.push_str(&format!("║  {:<22}{:>10}{:<32}║\n", "Records:", s.records, ""));
        out.push_str(&format!("║  {:<22}{:>10.2}{:<32}║\n", "Mean drones done:", s.mean_drones, ""));
        out.push_str(&format!("║  {:<22}{:>10.2}{:<32}║\n", "Mean victims:", s.mean_victims, ""));
        out.push_str(&format!("║  {:<22}{:>10.4}{:<32}║\n", "Mean final score:", s.mean_score, ""));
        out.push_str(&format!("║  {:<22}{:>10}{:<32}║\n", "Task successes:", s.total_successes, ""));
        out.push_str(&format!("║  {:<22}{:>10}{:<32}║\n", "Task failures:", s.total_fails, ""));
    }

    out.push_str(&format!("╚{}╝\n", rule));
    out.push_str(&format!(
        "\nGenerated: {}\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out
}

/// Print summary to terminal
pub fn print_summary(table: &Table) {
    println!("{}", format_summary(table));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{aggregate, Segment};
    use crate::parser::Schema;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn record(scenario: &str, trial: u32, drones: u32, score: f64) -> Record {
        Record {
            scenario: scenario.to_string(),
            trial,
            seed: 1,
            alpha: 0.0,
            beta: 0.0,
            gamma: 0.0,
            drones,
            victims: drones * 2,
            turn: 0.0,
            successes: 1,
            fails: 0,
            score,
            heat: 0.0,
        }
    }

    fn table() -> Table {
        Table {
            schema: Schema::Full,
            sources: vec![PathBuf::from("Rescue_1.log"), PathBuf::from("Recon_1.log")],
            records: vec![
                record("Rescue", 1, 0, 0.0),
                record("Rescue", 1, 2, 0.5),
                record("Rescue", 2, 4, 1.0),
                record("Recon", 3, 1, 0.25),
            ],
            segments: vec![
                Segment { records: 3, trials: 2 },
                Segment { records: 1, trials: 1 },
            ],
            trials: 3,
        }
    }

    #[test]
    fn test_closing_records_take_last_of_each_trial() {
        let table = table();
        let closing = SummaryCalculator::closing_records(&table);
        let drones: Vec<u32> = closing.iter().map(|r| r.drones).collect();
        assert_eq!(drones, vec![2, 4, 1]);
    }

    #[test]
    fn test_by_scenario_means() {
        let summaries = SummaryCalculator::by_scenario(&table());

        assert_eq!(summaries.len(), 2);
        let rescue = &summaries[0];
        assert_eq!(rescue.scenario, "Rescue");
        assert_eq!(rescue.trials, 2);
        assert_eq!(rescue.records, 3);
        assert_eq!(rescue.mean_drones, 3.0);
        assert_eq!(rescue.mean_victims, 6.0);
        assert_eq!(rescue.mean_score, 0.75);
        assert_eq!(rescue.total_successes, 2);

        assert_eq!(summaries[1].scenario, "Recon");
        assert_eq!(summaries[1].trials, 1);
    }

    #[test]
    fn test_headerless_last_file_keeps_closing_record() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("Rescue_1_a.log");
        std::fs::write(
            &first,
            "[d -1.0000] Seed 1\n[d 1.0000] :: d :: (0, 0, 0) :: Drone done\n\
             [d 2.0000] :: d :: (0, 0, 0) :: Drone done\n",
        )
        .unwrap();
        let empty = dir.path().join("Rescue_2_a.log");
        std::fs::write(&empty, "").unwrap();

        let table = aggregate(&[&first, &empty], Schema::Full).unwrap();
        let closing = SummaryCalculator::closing_records(&table);
        assert_eq!(closing.len(), 1);
        assert_eq!(closing[0].drones, 2);

        let summaries = SummaryCalculator::by_scenario(&table);
        assert_eq!(summaries[0].trials, 1);
        assert_eq!(summaries[0].mean_drones, 2.0);
    }

    #[test]
    fn test_format_summary_mentions_scenarios() {
        let text = format_summary(&table());
        assert!(text.contains("RESCUE"));
        assert!(text.contains("RECON"));
        assert!(text.contains("Generated:"));
    }
}
