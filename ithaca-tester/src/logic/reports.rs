use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use super::GameRecord;

/// Per-strategy rollup of game records.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StrategySummary {
    pub strategy: String,
    pub games: usize,
    pub finished: usize,
    pub failed: usize,
    pub average_turns: f64,
}

#[must_use]
pub fn summarize(records: &[GameRecord]) -> Vec<StrategySummary> {
    let mut summaries: Vec<StrategySummary> = Vec::new();
    for record in records {
        let index = match summaries.iter().position(|s| s.strategy == record.strategy) {
            Some(index) => index,
            None => {
                summaries.push(StrategySummary {
                    strategy: record.strategy.clone(),
                    games: 0,
                    finished: 0,
                    failed: 0,
                    average_turns: 0.0,
                });
                summaries.len() - 1
            }
        };
        let summary = &mut summaries[index];
        summary.games += 1;
        summary.finished += usize::from(record.finished);
        summary.failed += usize::from(!record.passed());
        summary.average_turns += f64::from(record.turns);
    }
    for summary in &mut summaries {
        #[allow(clippy::cast_precision_loss)]
        let games = summary.games as f64;
        summary.average_turns /= games;
    }
    summaries
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64) * 100.0
}

pub fn generate_console_report(
    out: &mut dyn Write,
    records: &[GameRecord],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Voyage Test Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==============================".cyan())?;

    let total = records.len();
    let failed = records.iter().filter(|r| !r.passed()).count();
    let finished = records.iter().filter(|r| r.finished).count();
    writeln!(out, "Total games: {total}")?;
    writeln!(out, "Reached Ithaca: {}", finished.to_string().green())?;
    writeln!(out, "Invariant failures: {}", failed.to_string().red())?;
    writeln!(out, "Pass rate: {:.1}%", percent(total - failed, total))?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for summary in summarize(records) {
        let status = if summary.failed == 0 {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(out, "{} {}", status, summary.strategy.bold())?;
        writeln!(
            out,
            "   Finished: {}/{} ({:.1}%)",
            summary.finished,
            summary.games,
            percent(summary.finished, summary.games)
        )?;
        writeln!(out, "   Average turns: {:.1}", summary.average_turns)?;
    }

    let failures: Vec<&GameRecord> = records.iter().filter(|r| !r.passed()).collect();
    if !failures.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", "🚨 Failures".bright_red().bold())?;
        for record in failures {
            for violation in &record.violations {
                writeln!(
                    out,
                    "   • {} seed {}: {}",
                    record.strategy,
                    record.seed,
                    violation.red()
                )?;
            }
        }
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, records: &[GameRecord]) -> Result<()> {
    let report = serde_json::json!({
        "summary": summarize(records),
        "games": records,
    });
    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, records: &[GameRecord]) -> Result<()> {
    writeln!(out, "# Ithaca Voyage Test Results\n")?;

    let total = records.len();
    let failed = records.iter().filter(|r| !r.passed()).count();
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total games**: {total}")?;
    writeln!(out, "- **Failed**: {failed}")?;
    writeln!(
        out,
        "- **Pass rate**: {:.1}%\n",
        percent(total - failed, total)
    )?;

    writeln!(out, "| Strategy | Games | Finished | Failed | Avg turns |")?;
    writeln!(out, "|---|---|---|---|---|")?;
    for summary in summarize(records) {
        writeln!(
            out,
            "| {} | {} | {} | {} | {:.1} |",
            summary.strategy,
            summary.games,
            summary.finished,
            summary.failed,
            summary.average_turns
        )?;
    }

    writeln!(out, "\n## Games\n")?;
    for record in records {
        let status = if record.passed() { "✅" } else { "❌" };
        let winner = record
            .winner
            .map_or_else(|| "-".to_string(), |seat| format!("P{}", seat + 1));
        writeln!(
            out,
            "- {status} {} seed {} ({} players): {} turns, winner {winner}, digest `{}`",
            record.strategy, record.seed, record.players, record.turns, record.digest
        )?;
        for violation in &record.violations {
            writeln!(out, "  - {violation}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(strategy: &str, turns: u32, finished: bool, violations: &[&str]) -> GameRecord {
        GameRecord {
            strategy: strategy.to_string(),
            seed: 1,
            players: 2,
            turns,
            commands: 10,
            finished,
            winner: finished.then_some(0),
            digest: "00000000000000ff".to_string(),
            violations: violations.iter().map(ToString::to_string).collect(),
        }
    }

    fn sample() -> Vec<GameRecord> {
        vec![
            record("Cautious", 10, true, &[]),
            record("Cautious", 20, false, &[]),
            record("Random", 7, false, &["seat 1 has no legal command"]),
        ]
    }

    #[test]
    fn summaries_group_by_strategy() {
        let summaries = summarize(&sample());
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].games, 2);
        assert_eq!(summaries[0].finished, 1);
        assert!((summaries[0].average_turns - 15.0).abs() < f64::EPSILON);
        assert_eq!(summaries[1].failed, 1);
    }

    #[test]
    fn json_report_lists_every_game() {
        let mut buffer = Vec::new();
        generate_json_report(&mut buffer, &sample()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["games"].as_array().unwrap().len(), 3);
        assert_eq!(value["summary"][1]["strategy"], "Random");
    }

    #[test]
    fn markdown_report_names_failures() {
        let mut buffer = Vec::new();
        generate_markdown_report(&mut buffer, &sample()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("# Ithaca Voyage Test Results"));
        assert!(text.contains("| Cautious | 2 | 1 | 0 | 15.0 |"));
        assert!(text.contains("  - seat 1 has no legal command"));
    }

    #[test]
    fn console_report_counts_failures() {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        generate_console_report(&mut buffer, &sample(), Duration::from_millis(5)).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Total games: 3"));
        assert!(text.contains("Invariant failures: 1"));
        assert!(text.contains("Random seed 1: seat 1 has no legal command"));
    }
}
