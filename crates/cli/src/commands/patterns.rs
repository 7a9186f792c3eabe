//! `wla patterns`

use super::Backend;
use crate::output::{format_confidence, print_json, print_success, print_table, OutputFormat};
use advisor_lib::{PatternAnalysis, WorkloadSnapshot};
use anyhow::Result;
use tabled::Tabled;

#[derive(Tabled)]
struct PatternRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn rows(analysis: &PatternAnalysis) -> Vec<PatternRow> {
    let row = |metric, value: String| PatternRow { metric, value };
    let mut rows = vec![
        row("Primary pattern", analysis.primary_pattern.to_string()),
        row("Confidence", format_confidence(analysis.confidence)),
        row("Period (days)", analysis.analysis_period_days.to_string()),
        row("Idle", format!("{:.1}%", analysis.idle.idle_percent)),
        row("Bursts", analysis.burst.burst_count.to_string()),
    ];

    if analysis.diurnal.has_diurnal_pattern {
        rows.push(row(
            "Daily cycle",
            format!(
                "peak {:02}:00, trough {:02}:00",
                analysis.diurnal.peak_hour, analysis.diurnal.trough_hour
            ),
        ));
    }
    if analysis.weekly.has_weekly_pattern {
        rows.push(row(
            "Weekly cycle",
            format!(
                "weekday {:.1}%, weekend {:.1}%",
                analysis.weekly.weekday_avg, analysis.weekly.weekend_avg
            ),
        ));
    }
    rows.push(row(
        "Trend",
        format!(
            "{} ({:+.2}%/day)",
            analysis.trend.direction, analysis.trend.slope_per_day
        ),
    ));
    rows.push(row(
        "Memory",
        format!(
            "avg {:.1}%, max {:.1}%{}",
            analysis.memory.avg_utilization,
            analysis.memory.max_utilization,
            if analysis.memory.has_memory_leak {
                ", possible leak"
            } else {
                ""
            }
        ),
    ));
    rows
}

pub async fn patterns(
    backend: &Backend,
    snapshots: &[WorkloadSnapshot],
    format: OutputFormat,
) -> Result<()> {
    let mut analyses = Vec::with_capacity(snapshots.len());
    for snapshot in snapshots {
        let analysis = match backend {
            Backend::Local(advisor) => advisor.detector().analyze_snapshot(snapshot),
            Backend::Remote(client) => client.patterns(snapshot).await?,
        };
        analyses.push(analysis);
    }

    match format {
        OutputFormat::Json => match analyses.as_slice() {
            [single] => print_json(single)?,
            all => print_json(all)?,
        },
        OutputFormat::Table => {
            for analysis in &analyses {
                println!("{}", analysis.instance_id);
                print_table(&rows(analysis));
                for recommendation in &analysis.recommendations {
                    print_success(recommendation);
                }
                println!();
            }
        }
    }

    Ok(())
}
