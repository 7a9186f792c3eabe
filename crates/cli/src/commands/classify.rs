//! `wla classify`

use super::Backend;
use crate::output::{
    color_classification, color_confidence, format_percent, print_info, print_json, print_table,
    print_warning, OutputFormat,
};
use advisor_lib::{WorkloadAssessment, WorkloadSnapshot};
use anyhow::Result;
use tabled::Tabled;

#[derive(Tabled)]
struct ClassificationRow {
    #[tabled(rename = "Instance")]
    instance_id: String,
    #[tabled(rename = "Classification")]
    classification: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Pattern")]
    pattern: String,
    #[tabled(rename = "Savings")]
    savings: String,
    #[tabled(rename = "Target")]
    target: String,
}

impl From<&WorkloadAssessment> for ClassificationRow {
    fn from(assessment: &WorkloadAssessment) -> Self {
        let result = &assessment.classification;
        Self {
            instance_id: result.instance_id.clone(),
            classification: color_classification(result.classification),
            confidence: color_confidence(result.confidence),
            pattern: assessment
                .patterns
                .as_ref()
                .map(|p| p.primary_pattern.to_string())
                .unwrap_or_else(|| "-".to_string()),
            savings: format_percent(result.estimated_savings_percent),
            target: result
                .recommended_target
                .clone()
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

pub async fn classify(
    backend: &Backend,
    snapshots: &[WorkloadSnapshot],
    format: OutputFormat,
) -> Result<()> {
    let assessments = match backend {
        Backend::Local(advisor) => advisor.assess_batch(snapshots),
        Backend::Remote(client) => match snapshots {
            [single] => vec![client.classify(single).await?],
            _ => client.classify_batch(snapshots).await?,
        },
    };

    match format {
        OutputFormat::Json => match assessments.as_slice() {
            [single] => print_json(single)?,
            all => print_json(all)?,
        },
        OutputFormat::Table => {
            let rows: Vec<ClassificationRow> = assessments.iter().map(Into::into).collect();
            print_table(&rows);

            for assessment in &assessments {
                let result = &assessment.classification;
                if result.reasons.is_empty() && result.warnings.is_empty() {
                    continue;
                }
                println!("\n{}:", result.instance_id);
                for reason in &result.reasons {
                    print_info(reason);
                }
                for warning in &result.warnings {
                    print_warning(warning);
                }
            }
        }
    }

    Ok(())
}
