//! Reduction of a scored batch into patient rows and summary counts.

use chrono::Utc;

use crate::risk::RiskBand;
use crate::types::{field_text, PatientRecord, RiskSummary, VitalRecord};

/// Build one [`PatientRecord`] per record/score pair and tally the
/// per-band [`RiskSummary`].
///
/// Scores are paired with records by index -- positional alignment is the
/// only identity link, since the prediction payload never carries
/// `Patient_ID`. Callers must have verified the lengths match (the
/// prediction client enforces this before any aggregation can run).
///
/// Every record is stamped with the same observation time, taken once at
/// the start of the reduction.
pub fn aggregate(batch: &[VitalRecord], scores: &[f64]) -> (Vec<PatientRecord>, RiskSummary) {
    debug_assert_eq!(batch.len(), scores.len(), "batch/score alignment broken");

    let observed_at = Utc::now();
    let mut summary = RiskSummary::default();

    let patients = batch
        .iter()
        .zip(scores)
        .map(|(record, &score)| {
            let band = RiskBand::classify(score);
            summary.record(band);

            let text = |field| field_text(record, field).unwrap_or_default();
            PatientRecord {
                id: text("Patient_ID"),
                hr: text("HR"),
                bp: text("BP"),
                spo2: text("SpO2"),
                resp: text("RESP"),
                temp: text("TEMP"),
                risk_band: band,
                score,
                observed_at,
            }
        })
        .collect();

    (patients, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str) -> VitalRecord {
        json!({
            "HR": "72", "BP": "120", "SpO2": "98",
            "RESP": "16", "TEMP": "36.5", "Patient_ID": id
        })
        .as_object()
        .expect("test record is an object")
        .clone()
    }

    #[test]
    fn builds_one_patient_per_index_pair() {
        let batch = vec![record("101"), record("102")];
        let (patients, _) = aggregate(&batch, &[0.42, 0.9]);

        assert_eq!(patients.len(), 2);
        assert_eq!(patients[0].id, "101");
        assert_eq!(patients[0].score, 0.42);
        assert_eq!(patients[0].risk_band, RiskBand::Low);
        assert_eq!(patients[1].id, "102");
        assert_eq!(patients[1].score, 0.9);
        assert_eq!(patients[1].risk_band, RiskBand::High);
    }

    #[test]
    fn copies_vitals_text_from_the_source_row() {
        let (patients, _) = aggregate(&[record("101")], &[0.1]);
        let p = &patients[0];
        assert_eq!(p.hr, "72");
        assert_eq!(p.bp, "120");
        assert_eq!(p.spo2, "98");
        assert_eq!(p.resp, "16");
        assert_eq!(p.temp, "36.5");
    }

    #[test]
    fn summary_reports_all_bands_even_when_empty() {
        let (_, summary) = aggregate(&[record("101")], &[0.42]);
        assert_eq!(summary.low, 1);
        assert_eq!(summary.medium, 0);
        assert_eq!(summary.high, 0);
    }

    #[test]
    fn summary_counts_medium_and_high() {
        let batch = vec![record("101"), record("102")];
        let (_, summary) = aggregate(&batch, &[0.6, 0.9]);
        assert_eq!(summary.low, 0);
        assert_eq!(summary.medium, 1);
        assert_eq!(summary.high, 1);
    }

    #[test]
    fn all_records_share_one_observation_time() {
        let batch = vec![record("101"), record("102"), record("103")];
        let (patients, _) = aggregate(&batch, &[0.1, 0.5, 0.8]);
        assert!(patients.windows(2).all(|w| w[0].observed_at == w[1].observed_at));
    }

    #[test]
    fn empty_batch_produces_empty_outputs() {
        let (patients, summary) = aggregate(&[], &[]);
        assert!(patients.is_empty());
        assert_eq!(summary.total(), 0);
    }
}
