//! Fuses independent component detector scores into one verdict.

use repute_core::config::EnsembleConfig;
use repute_core::errors::FusionError;
use repute_core::types::component::{ComponentFindings, ComponentScore};
use repute_core::types::verdict::{FusionStrategy, FusionVerdict, ThreatTechnique};

use super::cache::VerdictCache;
use crate::stats;

/// Fused score above which the high-priority recommendation tier applies
/// (between the threat threshold and the critical tier).
const HIGH_PRIORITY_THRESHOLD: f64 = 0.70;

/// Agreement above which the explanation notes that detectors corroborate
/// each other.
const STRONG_AGREEMENT: f64 = 0.8;

/// Combines scores from multiple independent detectors using a configurable
/// strategy. Verdicts are cached by subject and context; the cache is the
/// only state, and it is internally synchronized, so the engine is shared
/// freely across threads.
pub struct FusionEngine {
    config: EnsembleConfig,
    cache: VerdictCache,
}

impl FusionEngine {
    pub fn new() -> Self {
        Self::with_config(EnsembleConfig::default())
    }

    pub fn with_config(config: EnsembleConfig) -> Self {
        let cache = VerdictCache::new(config.cache_capacity);
        Self { config, cache }
    }

    /// Fuse component scores into a verdict, consulting the cache first.
    /// `context` distinguishes otherwise identical subjects (e.g. the brand
    /// being protected, or a content digest).
    pub fn fuse(
        &self,
        subject: &str,
        context: Option<&str>,
        components: &[ComponentScore],
    ) -> Result<FusionVerdict, FusionError> {
        if let Some(cached) = self.cache.get(subject, context) {
            tracing::debug!(subject, "fusion cache hit");
            return Ok(cached);
        }
        let verdict = self.fuse_uncached(components)?;
        self.cache.insert(subject, context, verdict.clone());
        Ok(verdict)
    }

    /// Fuse component scores without touching the cache.
    ///
    /// An empty component list yields the documented degenerate verdict:
    /// fused score 0.5, agreement 1.0, confidence 0.5. Maximal uncertainty,
    /// not an error.
    pub fn fuse_uncached(
        &self,
        components: &[ComponentScore],
    ) -> Result<FusionVerdict, FusionError> {
        for component in components {
            component.validate()?;
        }

        let fused = self.combine(components);
        let scores: Vec<f64> = components.iter().map(|c| c.score).collect();
        let agreement = 1.0 - stats::population_std(&scores);

        let confidences: Vec<f64> = components.iter().map(|c| c.confidence).collect();
        let avg_confidence = if confidences.is_empty() {
            0.5
        } else {
            stats::mean(&confidences)
        };
        // Disagreement suppresses confidence even when each detector is
        // individually sure.
        let confidence = avg_confidence * agreement;

        let is_threat = fused >= self.config.threat_threshold;
        let techniques = identify_techniques(components);

        Ok(FusionVerdict {
            is_threat,
            threat_score: fused,
            confidence,
            agreement_level: agreement,
            risk_factors: identify_risk_factors(components),
            explanation: self.explanation(is_threat, fused, agreement, components),
            recommendations: self.recommendations(is_threat, fused, &techniques),
            detected_techniques: techniques,
            strategy: self.config.strategy,
            // Components ran outside the engine; their reported latencies
            // sum to the pipeline cost. No wall clock is read here.
            total_latency_ms: components.iter().map(|c| c.latency_ms).sum(),
            components_used: components
                .iter()
                .map(|c| c.component_name.clone())
                .collect(),
            component_scores: components.to_vec(),
        })
    }

    /// Combine component scores per the configured strategy. Empty input
    /// returns the neutral threat score 0.5.
    fn combine(&self, components: &[ComponentScore]) -> f64 {
        if components.is_empty() {
            return 0.5;
        }
        match self.config.strategy {
            FusionStrategy::WeightedAverage => {
                let total_weight: f64 = components.iter().map(|c| self.weight_of(c)).sum();
                if total_weight <= 0.0 {
                    tracing::warn!("zero total component weight, using neutral threat score");
                    return 0.5;
                }
                let weighted_sum: f64 = components
                    .iter()
                    .map(|c| c.score * self.weight_of(c))
                    .sum();
                weighted_sum / total_weight
            }
            FusionStrategy::MaxVote => components
                .iter()
                .map(|c| c.score)
                .fold(f64::NEG_INFINITY, f64::max),
            FusionStrategy::SoftVote => {
                let scores: Vec<f64> = components.iter().map(|c| c.score).collect();
                soft_vote(&scores, self.config.temperature)
            }
        }
    }

    fn weight_of(&self, component: &ComponentScore) -> f64 {
        self.config
            .weights
            .get(&component.component_name)
            .copied()
            .unwrap_or(1.0)
    }

    /// Human-readable summary. Low agreement is always surfaced, for threat
    /// and non-threat verdicts alike.
    fn explanation(
        &self,
        is_threat: bool,
        fused: f64,
        agreement: f64,
        components: &[ComponentScore],
    ) -> String {
        let mut explanation = if is_threat {
            let top = components.iter().max_by(|a, b| {
                a.score
                    .partial_cmp(&b.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            match top {
                Some(top) => format!(
                    "Threat detected (score: {fused:.2}). Primary indicator: {} ({:.2}).",
                    top.component_name, top.score
                ),
                None => format!("Threat detected (score: {fused:.2})."),
            }
        } else {
            format!("Subject appears safe. Ensemble score: {fused:.2}.")
        };

        if agreement < self.config.disagreement_threshold {
            explanation.push_str(" Detectors disagree on this subject; manual review recommended.");
        } else if is_threat && agreement > STRONG_AGREEMENT {
            explanation.push_str(" High detector agreement strengthens this assessment.");
        }
        explanation
    }

    /// Tiered by fused score, then technique-specific additions, capped at
    /// five entries.
    fn recommendations(
        &self,
        is_threat: bool,
        fused: f64,
        techniques: &[ThreatTechnique],
    ) -> Vec<String> {
        if !is_threat {
            return vec!["Continue standard monitoring".to_string()];
        }

        let mut recommendations: Vec<String> = if fused >= self.config.high_confidence_threshold {
            vec![
                "CRITICAL: Initiate immediate takedown process".to_string(),
                "Document evidence for legal action".to_string(),
                "Alert brand protection team".to_string(),
            ]
        } else if fused >= HIGH_PRIORITY_THRESHOLD {
            vec![
                "HIGH PRIORITY: Begin takedown/UDRP process".to_string(),
                "Block subject on corporate networks".to_string(),
                "Monitor for active campaigns".to_string(),
            ]
        } else {
            vec![
                "Add to monitoring watchlist".to_string(),
                "Investigate subject ownership".to_string(),
            ]
        };

        if techniques.contains(&ThreatTechnique::HomoglyphAttack) {
            recommendations.push("Report IDN/homoglyph abuse to registrar".to_string());
        }
        if techniques.contains(&ThreatTechnique::CredentialPhishing) {
            recommendations.push("Submit to Safe Browsing and PhishTank".to_string());
        }
        if techniques.contains(&ThreatTechnique::Typosquatting) {
            recommendations.push("Consider defensive domain registration".to_string());
        }

        recommendations.truncate(5);
        recommendations
    }
}

impl Default for FusionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Temperature-scaled self-weighted average: each score is weighted by
/// `exp(score / T)`, so higher scores dominate as T approaches 0 and the
/// result approaches a plain mean as T grows. The shared maximum is
/// subtracted inside the exponent to keep it overflow-safe at small T.
fn soft_vote(scores: &[f64], temperature: f64) -> f64 {
    let t = temperature.max(1e-6);
    let max = scores.iter().fold(f64::NEG_INFINITY, |m, &s| m.max(s));
    let weights: Vec<f64> = scores.iter().map(|&s| ((s - max) / t).exp()).collect();
    let total: f64 = weights.iter().sum();
    scores
        .iter()
        .zip(&weights)
        .map(|(&s, &w)| s * w)
        .sum::<f64>()
        / total
}

/// Named contributors surfaced in the verdict: components scoring high,
/// heuristic rules that fired, content patterns found. Capped at ten.
fn identify_risk_factors(components: &[ComponentScore]) -> Vec<String> {
    let mut risk_factors = Vec::new();
    for component in components {
        if component.score > 0.6 {
            risk_factors.push(format!(
                "{}: high score ({:.2})",
                component.component_name, component.score
            ));
        }
        match &component.findings {
            ComponentFindings::HeuristicRules { rules_triggered } => {
                for rule in rules_triggered.iter().take(3) {
                    risk_factors.push(format!("Rule: {rule}"));
                }
            }
            ComponentFindings::ContentClassification { categories } => {
                for category in categories {
                    risk_factors.push(format!("Content pattern: {category}"));
                }
            }
            ComponentFindings::CharacterAnalysis { .. } | ComponentFindings::None => {}
        }
    }
    risk_factors.truncate(10);
    risk_factors
}

/// Map typed component findings onto attack techniques. Only components
/// scoring at least 0.5 contribute; the result is deduplicated and sorted
/// so identical inputs produce identical verdicts.
fn identify_techniques(components: &[ComponentScore]) -> Vec<ThreatTechnique> {
    let mut techniques = Vec::new();
    for component in components {
        if component.score < 0.5 {
            continue;
        }
        match &component.findings {
            ComponentFindings::CharacterAnalysis {
                visual_confusion,
                keyboard_proximity,
                edit_distance,
            } => {
                if *visual_confusion > 0.5 {
                    techniques.push(ThreatTechnique::HomoglyphAttack);
                }
                if *keyboard_proximity > 0.5 {
                    techniques.push(ThreatTechnique::Typosquatting);
                }
                if *edit_distance > 0.5 {
                    techniques.push(ThreatTechnique::CharacterManipulation);
                }
            }
            ComponentFindings::HeuristicRules { rules_triggered } => {
                if rules_triggered.iter().any(|r| r.contains("keyword")) {
                    techniques.push(ThreatTechnique::ComboSquatting);
                }
                if rules_triggered.iter().any(|r| r.contains("subdomain")) {
                    techniques.push(ThreatTechnique::SubdomainAbuse);
                }
                if rules_triggered.iter().any(|r| r.contains("tld")) {
                    techniques.push(ThreatTechnique::SuspiciousTld);
                }
            }
            ComponentFindings::ContentClassification { categories } => {
                if categories.iter().any(|c| c == "credentials") {
                    techniques.push(ThreatTechnique::CredentialPhishing);
                }
                if categories.iter().any(|c| c == "urgency") {
                    techniques.push(ThreatTechnique::UrgencyManipulation);
                }
            }
            ComponentFindings::None => {}
        }
    }
    techniques.sort();
    techniques.dedup();
    techniques
}

#[cfg(test)]
mod tests {
    use super::*;
    use repute_core::types::component::ComponentRole;

    fn component(name: &str, score: f64, confidence: f64) -> ComponentScore {
        ComponentScore::new(name, ComponentRole::Semantic, score, confidence).unwrap()
    }

    #[test]
    fn empty_components_yield_neutral_verdict() {
        let engine = FusionEngine::new();
        let verdict = engine.fuse_uncached(&[]).unwrap();
        assert_eq!(verdict.threat_score, 0.5);
        assert_eq!(verdict.agreement_level, 1.0);
        assert_eq!(verdict.confidence, 0.5);
        assert!(!verdict.is_threat);
    }

    #[test]
    fn soft_vote_limits() {
        let scores = [0.2, 0.5, 0.9];
        // Large T approaches the plain mean.
        assert!((soft_vote(&scores, 1e9) - stats::mean(&scores)).abs() < 1e-6);
        // Small T approaches the max.
        assert!((soft_vote(&scores, 1e-6) - 0.9).abs() < 1e-6);
    }

    #[test]
    fn max_vote_takes_strongest_signal() {
        let engine = FusionEngine::with_config(EnsembleConfig {
            strategy: FusionStrategy::MaxVote,
            ..EnsembleConfig::default()
        });
        let verdict = engine
            .fuse_uncached(&[component("a", 0.2, 0.9), component("b", 0.8, 0.9)])
            .unwrap();
        assert_eq!(verdict.threat_score, 0.8);
        assert!(verdict.is_threat);
    }

    #[test]
    fn techniques_are_sorted_and_deduplicated() {
        let cs = vec![
            component("char", 0.9, 0.9).with_findings(ComponentFindings::CharacterAnalysis {
                visual_confusion: 0.8,
                keyboard_proximity: 0.7,
                edit_distance: 0.1,
            }),
            component("rules", 0.7, 0.9).with_findings(ComponentFindings::HeuristicRules {
                rules_triggered: vec!["brand_keyword_match".to_string()],
            }),
        ];
        let techniques = identify_techniques(&cs);
        assert_eq!(
            techniques,
            vec![
                ThreatTechnique::HomoglyphAttack,
                ThreatTechnique::Typosquatting,
                ThreatTechnique::ComboSquatting,
            ]
        );
        let again = identify_techniques(&cs);
        assert_eq!(techniques, again);
    }

    #[test]
    fn low_scoring_components_contribute_no_techniques() {
        let cs = vec![component("char", 0.3, 0.9).with_findings(
            ComponentFindings::CharacterAnalysis {
                visual_confusion: 0.9,
                keyboard_proximity: 0.9,
                edit_distance: 0.9,
            },
        )];
        assert!(identify_techniques(&cs).is_empty());
    }
}
