use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use niuma_game::numbers::usize_to_f64;

use super::simulation::RunRecord;

/// Aggregate over every run of one strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicySummary {
    pub strategy: String,
    pub runs: usize,
    pub survived: usize,
    pub mean_days: f64,
    pub max_days: u32,
    pub mean_cards_played: f64,
    /// Defeat cause -> number of runs, plus `survived` for runs that hit the cap.
    pub outcomes: BTreeMap<String, usize>,
}

impl PolicySummary {
    #[must_use]
    pub fn survival_rate(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        usize_to_f64(self.survived) / usize_to_f64(self.runs)
    }
}

/// Group run records by strategy, preserving first-seen order.
#[must_use]
pub fn summarize(records: &[RunRecord]) -> Vec<PolicySummary> {
    let mut order: Vec<&str> = Vec::new();
    for record in records {
        if !order.contains(&record.strategy.as_str()) {
            order.push(record.strategy.as_str());
        }
    }
    order
        .into_iter()
        .map(|strategy| {
            let runs: Vec<&RunRecord> = records
                .iter()
                .filter(|record| record.strategy == strategy)
                .collect();
            let mut outcomes = BTreeMap::new();
            for record in &runs {
                let key = record
                    .defeat
                    .map_or_else(|| "survived".to_string(), |cause| cause.to_string());
                *outcomes.entry(key).or_insert(0) += 1;
            }
            let count = usize_to_f64(runs.len());
            let total_days: u64 = runs.iter().map(|run| u64::from(run.days_survived)).sum();
            let total_cards: u64 = runs.iter().map(|run| u64::from(run.cards_played)).sum();
            PolicySummary {
                strategy: strategy.to_string(),
                runs: runs.len(),
                survived: runs.iter().filter(|run| run.survived()).count(),
                mean_days: to_f64(total_days) / count,
                max_days: runs.iter().map(|run| run.days_survived).max().unwrap_or(0),
                mean_cards_played: to_f64(total_cards) / count,
                outcomes,
            }
        })
        .collect()
}

fn to_f64(value: u64) -> f64 {
    usize_to_f64(usize::try_from(value).unwrap_or(usize::MAX))
}

pub fn generate_console_report(
    out: &mut dyn Write,
    summaries: &[PolicySummary],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Playthrough Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "======================".cyan())?;
    for summary in summaries {
        writeln!(out, "{}", summary.strategy.bold())?;
        writeln!(
            out,
            "   Runs: {} ({} survived, {:.1}%)",
            summary.runs,
            summary.survived.to_string().green(),
            summary.survival_rate() * 100.0
        )?;
        writeln!(
            out,
            "   Days survived: mean {:.1}, max {}",
            summary.mean_days, summary.max_days
        )?;
        writeln!(out, "   Cards per run: {:.1}", summary.mean_cards_played)?;
        for (outcome, count) in &summary.outcomes {
            let label = if outcome == "survived" {
                outcome.green()
            } else {
                outcome.red()
            };
            writeln!(out, "     • {label}: {count}")?;
        }
        writeln!(out)?;
    }
    writeln!(out, "Total time: {total_duration:?}")?;
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    summaries: &'a [PolicySummary],
    runs: &'a [RunRecord],
}

pub fn generate_json_report(
    out: &mut dyn Write,
    summaries: &[PolicySummary],
    runs: &[RunRecord],
) -> Result<()> {
    let report = JsonReport {
        generated_at: Utc::now().to_rfc3339(),
        summaries,
        runs,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, summaries: &[PolicySummary]) -> Result<()> {
    writeln!(out, "# Niuma Playthrough Results\n")?;
    writeln!(out, "_Generated {}_\n", Utc::now().format("%Y-%m-%d %H:%M UTC"))?;
    if summaries.is_empty() {
        writeln!(out, "_No runs executed._")?;
        return Ok(());
    }
    writeln!(
        out,
        "| Strategy | Runs | Survived | Mean days | Max days | Cards/run |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|")?;
    for summary in summaries {
        writeln!(
            out,
            "| {} | {} | {} | {:.1} | {} | {:.1} |",
            summary.strategy,
            summary.runs,
            summary.survived,
            summary.mean_days,
            summary.max_days,
            summary.mean_cards_played
        )?;
    }
    writeln!(out, "\n## Outcomes\n")?;
    for summary in summaries {
        writeln!(out, "### {}\n", summary.strategy)?;
        for (outcome, count) in &summary.outcomes {
            writeln!(out, "- **{outcome}**: {count}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use niuma_game::{DefeatCause, Resources};

    fn record(strategy: &str, days: u32, defeat: Option<DefeatCause>) -> RunRecord {
        RunRecord {
            strategy: strategy.to_string(),
            seed: 1,
            final_day: days + 1,
            days_survived: days,
            defeat,
            cards_played: 4,
            rejected_actions: 0,
            final_resources: Resources::new(500, 60, 50, 20, 1, 30, 50),
        }
    }

    fn sample() -> Vec<RunRecord> {
        vec![
            record("Frugal", 10, None),
            record("Grinder", 3, Some(DefeatCause::Overwork)),
            record("Frugal", 4, Some(DefeatCause::Bankrupt)),
            record("Grinder", 5, Some(DefeatCause::Overwork)),
        ]
    }

    #[test]
    fn summaries_group_by_strategy() {
        let summaries = summarize(&sample());
        assert_eq!(summaries.len(), 2);
        let frugal = &summaries[0];
        assert_eq!(frugal.strategy, "Frugal");
        assert_eq!(frugal.runs, 2);
        assert_eq!(frugal.survived, 1);
        assert!((frugal.mean_days - 7.0).abs() < f64::EPSILON);
        assert_eq!(frugal.max_days, 10);
        assert_eq!(frugal.outcomes.get("bankrupt"), Some(&1));
        assert_eq!(frugal.outcomes.get("survived"), Some(&1));
        let grinder = &summaries[1];
        assert_eq!(grinder.outcomes.get("overwork"), Some(&2));
        assert!(grinder.survival_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn json_report_contains_runs_and_summaries() {
        let runs = sample();
        let summaries = summarize(&runs);
        let mut buf = Vec::new();
        generate_json_report(&mut buf, &summaries, &runs).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["runs"].as_array().map(Vec::len), Some(4));
        assert_eq!(value["summaries"][1]["outcomes"]["overwork"], 2);
        assert_eq!(value["runs"][1]["defeat"], "overwork");
    }

    #[test]
    fn markdown_report_renders_table() {
        let mut buf = Vec::new();
        generate_markdown_report(&mut buf, &summarize(&sample())).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("# Niuma Playthrough Results"));
        assert!(text.contains("| Frugal | 2 | 1 | 7.0 | 10 | 4.0 |"));

        let mut empty = Vec::new();
        generate_markdown_report(&mut empty, &[]).unwrap();
        assert!(String::from_utf8(empty).unwrap().contains("No runs executed"));
    }

    #[test]
    fn console_report_lists_outcomes() {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        generate_console_report(&mut buf, &summarize(&sample()), Duration::from_millis(5))
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Playthrough Summary"));
        assert!(text.contains("• overwork: 2"));
    }
}
