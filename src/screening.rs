//! Screening Engine
//!
//! Composes the pipeline for one child:
//! 1. z-scores for height-for-age and weight-for-age (exact-age lookup)
//! 2. clamp into the fuzzy input universes ([-5, 5])
//! 3. rule evaluation and aggregation
//! 4. centroid defuzzification (fallback 0 when nothing fires)
//! 5. classification and advice
//!
//! `Screener` holds only immutable state built at construction, so one
//! instance can serve any number of threads without locking.

use crate::classify::{Category, Classifier, Thresholds};
use crate::config::EngineConfig;
use crate::error::{Result, ScreeningError};
use crate::fuzzy::{Defuzzifier, FuzzySystem, RuleEngine, DEGENERATE_FALLBACK_SCORE};
use crate::intake::{Measurement, ScreeningRequest};
use crate::reference::{Gender, GrowthReferenceTable, Metric};
use crate::zscore::ZScoreCalculator;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the crisp score was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// Centroid of a non-empty aggregated set
    Centroid,
    /// No rule fired; the score is the fixed fallback
    DegenerateFallback,
}

/// Outcome of one screening call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    /// Height-for-age z, clamped to the input universe
    pub z_height: f64,
    /// Weight-for-age z, clamped to the input universe
    pub z_weight: f64,
    pub z_height_raw: f64,
    pub z_weight_raw: f64,
    pub crisp_score: f64,
    pub score_source: ScoreSource,
    pub category: Category,
    pub advice: Vec<String>,
}

impl InferenceResult {
    pub fn is_fallback(&self) -> bool {
        self.score_source == ScoreSource::DegenerateFallback
    }
}

impl fmt::Display for InferenceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Z-Score H/A  : {:.2} SD", self.z_height_raw)?;
        writeln!(f, "Z-Score W/A  : {:.2} SD", self.z_weight_raw)?;
        writeln!(f, "Fuzzy score  : {:.2}/100", self.crisp_score)?;
        writeln!(f, "Status       : {}", self.category)?;
        for (idx, line) in self.advice.iter().enumerate() {
            let lead = if idx == 0 { "Advice       :" } else { "              " };
            writeln!(f, "{} - {}", lead, line)?;
        }
        Ok(())
    }
}

pub struct Screener {
    table: GrowthReferenceTable,
    engine: RuleEngine,
    defuzzifier: Defuzzifier,
    classifier: Classifier,
}

impl Screener {
    /// Build from already-loaded parts.
    ///
    /// The fuzzy system must take exactly two inputs: height-for-age
    /// first, weight-for-age second.
    pub fn new(table: GrowthReferenceTable, system: FuzzySystem, thresholds: Thresholds) -> Result<Self> {
        if system.inputs.len() != 2 {
            return Err(ScreeningError::InvalidFuzzySystem(format!(
                "screening needs 2 inputs (height-for-age, weight-for-age), got {}",
                system.inputs.len()
            )));
        }
        let defuzzifier = Defuzzifier::new(system.defuzzification);
        let engine = RuleEngine::new(system)?;
        let classifier = Classifier::new(thresholds)?;

        Ok(Self {
            table,
            engine,
            defuzzifier,
            classifier,
        })
    }

    /// Load tables and rule base eagerly. Any failure aborts construction.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let table = GrowthReferenceTable::load(&config.tables)?;
        let system = config.resolve_fuzzy_system()?;
        let screener = Self::new(table, system, config.thresholds)?;

        tracing::info!(
            "Screening engine ready: {} rules, output {:?}",
            screener.engine.system().rules.len(),
            screener.engine.system().output.name
        );
        Ok(screener)
    }

    pub fn table(&self) -> &GrowthReferenceTable {
        &self.table
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    pub fn calculator(&self) -> ZScoreCalculator<'_> {
        ZScoreCalculator::new(&self.table)
    }

    /// Screen one child. Pure and infallible; see module docs for the
    /// unknown-age and no-rule-fired fallbacks.
    pub fn screen(&self, gender: Gender, age_months: f64, height_cm: f64, weight_kg: f64) -> InferenceResult {
        let calc = self.calculator();
        let z_height_raw = calc.z_score(gender, Metric::HeightForAge, age_months, height_cm);
        let z_weight_raw = calc.z_score(gender, Metric::WeightForAge, age_months, weight_kg);
        self.screen_z(z_height_raw, z_weight_raw)
    }

    /// Fuzzy stage only, from precomputed z-scores
    pub fn screen_z(&self, z_height_raw: f64, z_weight_raw: f64) -> InferenceResult {
        let inputs = &self.engine.system().inputs;
        let z_height = inputs[0].clamp(z_height_raw);
        let z_weight = inputs[1].clamp(z_weight_raw);

        let aggregated = self.engine.infer(&[z_height, z_weight]);
        let (crisp_score, score_source) = match self.defuzzifier.try_defuzzify(&aggregated) {
            Some(score) => (score, ScoreSource::Centroid),
            None => {
                tracing::debug!(
                    "No rule fired for z_height={:.2}, z_weight={:.2}; using fallback score",
                    z_height,
                    z_weight
                );
                (DEGENERATE_FALLBACK_SCORE, ScoreSource::DegenerateFallback)
            }
        };

        let classification = self.classifier.classify(crisp_score);

        InferenceResult {
            z_height,
            z_weight,
            z_height_raw,
            z_weight_raw,
            crisp_score,
            score_source,
            category: classification.category,
            advice: classification.advice,
        }
    }

    pub fn screen_measurement(&self, m: &Measurement) -> InferenceResult {
        self.screen(m.gender, m.age_months, m.height_cm, m.weight_kg)
    }

    /// Validate then screen
    pub fn screen_request(&self, request: &ScreeningRequest) -> Result<InferenceResult> {
        let measurement = request.validate()?;
        Ok(self.screen_measurement(&measurement))
    }

    /// Screen many requests in parallel; output order matches input order
    pub fn screen_batch(&self, requests: &[ScreeningRequest]) -> Vec<Result<InferenceResult>> {
        requests
            .par_iter()
            .map(|request| self.screen_request(request))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::stunting;
    use crate::intake::Age;
    use crate::reference::tests::synthetic_table;
    use approx::assert_abs_diff_eq;

    fn screener() -> Screener {
        Screener::new(synthetic_table(), stunting::reference_system(), Thresholds::default()).unwrap()
    }

    #[test]
    fn test_median_child_is_normal() {
        let s = screener();
        let h = s.table().lookup(Gender::Male, Metric::HeightForAge, 24).unwrap().m;
        let w = s.table().lookup(Gender::Male, Metric::WeightForAge, 24).unwrap().m;

        let result = s.screen(Gender::Male, 24.0, h, w);
        assert_abs_diff_eq!(result.z_height, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.z_weight, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.crisp_score, 92.0, epsilon = 1e-9);
        assert_eq!(result.category, Category::Normal);
        assert_eq!(result.score_source, ScoreSource::Centroid);
    }

    #[test]
    fn test_extreme_deficit_is_severe() {
        let s = screener();
        let result = s.screen(Gender::Female, 12.0, 40.0, 2.0);

        assert_eq!(result.z_height, -5.0);
        assert_eq!(result.z_weight, -5.0);
        assert!(result.z_height_raw < -5.0);
        assert!(result.crisp_score < 45.0);
        assert_eq!(result.category, Category::SeverelyStunted);
        assert_eq!(result.score_source, ScoreSource::Centroid);
    }

    #[test]
    fn test_unknown_age_is_normal_not_fallback() {
        let s = screener();
        let result = s.screen(Gender::Male, 27.6, 10.0, 1.0);

        assert_eq!(result.z_height_raw, 0.0);
        assert_eq!(result.z_weight_raw, 0.0);
        assert_eq!(result.category, Category::Normal);
        assert!(!result.is_fallback());
    }

    #[test]
    fn test_degenerate_inference_falls_back() {
        let s = screener();
        let result = s.screen_z(0.0, 3.0);

        assert_eq!(result.crisp_score, 0.0);
        assert_eq!(result.category, Category::SeverelyStunted);
        assert!(result.is_fallback());
    }

    #[test]
    fn test_nan_z_falls_back_without_panic() {
        let s = screener();
        // Negative base with fractional L has no real power
        let result = s.screen(Gender::Male, 24.0, 80.0, -1.0);
        assert!(result.z_weight_raw.is_nan());
        assert!(result.is_fallback());
    }

    #[test]
    fn test_clamps_to_each_input_universe() {
        let mut system = stunting::reference_system();
        system.inputs[0].universe = (-3.0, 3.0);
        let s = Screener::new(synthetic_table(), system, Thresholds::default()).unwrap();

        let result = s.screen_z(-7.0, 6.0);
        assert_eq!(result.z_height, -3.0);
        assert_eq!(result.z_weight, 5.0);
        assert_eq!(result.z_height_raw, -7.0);
    }

    #[test]
    fn test_requires_two_inputs() {
        let mut system = stunting::reference_system();
        system.inputs.truncate(1);
        assert!(Screener::new(synthetic_table(), system, Thresholds::default()).is_err());
    }

    #[test]
    fn test_batch_preserves_order_and_errors() {
        let s = screener();
        let requests = vec![
            ScreeningRequest {
                name: None,
                gender: Gender::Male,
                age: Age::months(24.0),
                height_cm: 80.0,
                weight_kg: 11.0,
            },
            ScreeningRequest {
                name: None,
                gender: Gender::Female,
                age: Age::months(70.0),
                height_cm: 100.0,
                weight_kg: 15.0,
            },
        ];

        let results = s.screen_batch(&requests);
        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0].as_ref().unwrap(),
            &s.screen(Gender::Male, 24.0, 80.0, 11.0)
        );
        assert!(matches!(results[1], Err(ScreeningError::InvalidInput(_))));
    }

    #[test]
    fn test_report_layout() {
        let s = screener();
        let report = s.screen_z(0.0, 0.0).to_string();
        assert!(report.contains("Fuzzy score  : 92.00/100"));
        assert!(report.contains("Status       : Normal"));
        assert_eq!(report.lines().count(), 4 + 4);
        assert!(report.contains(
            "Advice       : - Pertahankan pola makan gizi seimbang (Isi Piringku).\n"
        ));
        // Continuation lines align under the first bullet
        assert!(report.contains(
            "\n               - Pastikan imunisasi dasar dan lanjutan lengkap.\n"
        ));
    }

    #[test]
    fn test_severe_result_text() {
        let s = screener();
        let result = s.screen_z(-5.0, -5.0);

        assert_eq!(result.category.to_string(), "Severely Stunted (Stunting Berat)");
        assert_eq!(result.advice[0], "SEGERA rujuk ke Rumah Sakit atau Dokter Spesialis Anak.");
        assert!(result
            .to_string()
            .contains("Status       : Severely Stunted (Stunting Berat)"));
    }
}
