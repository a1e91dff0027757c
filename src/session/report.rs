//! Session report summaries
//!
//! Statistics over a recorded session and the recommendations attached to
//! its dominant label. Layout and rendering are left to the consumer; the
//! report serializes to JSON.

use super::recorder::SessionRecord;
use crate::hal::{BandPowers, EegBand, PredictionLabel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Latest verdict of a session; `label` is `None` when nothing was predicted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub label: Option<PredictionLabel>,
    pub confidence: f64,
}

/// Aggregate statistics for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub sample_count: usize,
    pub prediction_count: usize,
    pub label_counts: BTreeMap<PredictionLabel, usize>,
    pub normal_count: usize,
    /// Zero when the session has no predictions
    pub average_confidence: f64,
    /// Label of the latest prediction, `normal` when there is none
    pub dominant_label: PredictionLabel,
    pub assessment: Assessment,
    /// Per-band mean over the recorded samples
    pub mean_bands: Option<BandPowers>,
    pub recommendations: Vec<String>,
}

impl SessionSummary {
    pub fn from_record(record: &SessionRecord) -> Self {
        let predictions = &record.predictions;

        let mut label_counts = BTreeMap::new();
        for prediction in predictions {
            *label_counts.entry(prediction.label()).or_insert(0) += 1;
        }

        let average_confidence = if predictions.is_empty() {
            0.0
        } else {
            predictions.iter().map(|p| p.confidence()).sum::<f64>() / predictions.len() as f64
        };

        let latest = predictions.last();
        let assessment = Assessment {
            label: latest.map(|p| p.label()),
            confidence: latest.map_or(0.0, |p| p.confidence()),
        };
        let dominant_label = assessment.label.unwrap_or(PredictionLabel::Normal);

        let recommendations = match latest {
            Some(p) => recommendations_for(p.label()).iter().map(|r| r.to_string()).collect(),
            None => Vec::new(),
        };

        Self {
            sample_count: record.samples.len(),
            prediction_count: predictions.len(),
            normal_count: label_counts.get(&PredictionLabel::Normal).copied().unwrap_or(0),
            label_counts,
            average_confidence,
            dominant_label,
            assessment,
            mean_bands: mean_bands(record),
            recommendations,
        }
    }
}

fn mean_bands(record: &SessionRecord) -> Option<BandPowers> {
    if record.samples.is_empty() {
        return None;
    }

    let count = record.samples.len() as f64;
    let mut totals = BandPowers::default();
    for sample in &record.samples {
        for band in EegBand::ALL {
            totals.set(band, totals.get(band) + sample.band(band));
        }
    }
    for band in EegBand::ALL {
        totals.set(band, totals.get(band) / count);
    }
    Some(totals)
}

/// Follow-up advice for a label
pub fn recommendations_for(label: PredictionLabel) -> &'static [&'static str] {
    match label {
        PredictionLabel::Normal => &[
            "Continue maintaining healthy sleep patterns",
            "Regular physical exercise supports cognitive function",
            "Consider stress management techniques for optimal brain health",
        ],
        PredictionLabel::MildAnomaly => &[
            "Monitor stress levels and consider relaxation techniques",
            "Ensure adequate sleep (7-9 hours per night)",
            "Consider follow-up assessment in 2-4 weeks",
        ],
        PredictionLabel::CognitiveFatigue => &[
            "Prioritize rest and recovery",
            "Reduce cognitive workload temporarily",
            "Consider consultation with healthcare provider",
        ],
        PredictionLabel::EarlyRisk => &[
            "Immediate consultation with neurologist recommended",
            "Comprehensive medical evaluation advised",
            "Follow-up monitoring within 1-2 weeks",
        ],
    }
}

/// A completed session with its summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Milliseconds since the Unix epoch
    pub generated_at: u64,
    pub summary: SessionSummary,
    pub session: SessionRecord,
}

impl SessionReport {
    pub fn new(session: SessionRecord, generated_at: u64) -> Self {
        Self {
            generated_at,
            summary: SessionSummary::from_record(&session),
            session,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
