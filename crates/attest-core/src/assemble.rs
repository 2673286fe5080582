//! Report assembly: fold five check results into one decision.
//!
//! The assembler is pure. It performs no I/O and has no failure modes; given
//! the same results, claim, and policy it always produces the same report.

use attest_contracts::{
    check::{BiasVerdict, CheckResults},
    identity::Digest,
    report::{ReportDetails, VerificationReport},
    settings::{CheckSettings, ScoringPolicy},
};

use crate::digest::verification_hash;

/// The single pass/fail decision.
///
/// Verified only when every check passes: fewer than
/// `settings.max_missing_values` missing cells, no PII, relevance matching
/// the claim, first sighting of the dataset, and a balanced demographic
/// column.
pub fn is_verified(results: &CheckResults, claimed_category: &str, settings: &CheckSettings) -> bool {
    results.quality.missing_values < settings.max_missing_values
        && !results.pii_detected
        && results.relevance.matches_claim(claimed_category)
        && results.is_authentic
        && results.bias == BiasVerdict::Balanced
}

/// Score out of 100, one point off per missing cell plus a fixed penalty per
/// failed check, clamped to `[policy.floor, 100]`.
pub fn quality_score(results: &CheckResults, claimed_category: &str, policy: &ScoringPolicy) -> i32 {
    let mut score: i64 = 100;
    score = score.saturating_sub(i64::try_from(results.quality.missing_values).unwrap_or(i64::MAX));
    if results.pii_detected {
        score -= i64::from(policy.pii_penalty);
    }
    if !results.relevance.matches_claim(claimed_category) {
        score -= i64::from(policy.relevance_penalty);
    }
    if !results.is_authentic {
        score -= i64::from(policy.duplicate_penalty);
    }
    if results.bias != BiasVerdict::Balanced {
        score -= i64::from(policy.bias_penalty);
    }

    let floor = i64::from(policy.floor.min(100));
    // The clamp bounds the value to [floor, 100], which always fits in i32.
    score.clamp(floor, 100) as i32
}

/// Build the report for one run.
pub fn assemble_report(
    dataset_hash: Digest,
    results: CheckResults,
    claimed_category: &str,
    analysis_report: String,
    settings: &CheckSettings,
    policy: &ScoringPolicy,
) -> VerificationReport {
    let verified = is_verified(&results, claimed_category, settings);
    let score = quality_score(&results, claimed_category, policy);
    let seal = verification_hash(&results.quality, results.pii_detected);

    VerificationReport {
        dataset_hash,
        verification_hash: seal,
        is_verified: verified,
        quality_score: score,
        analysis_report,
        details: ReportDetails {
            data_quality: results.quality,
            pii_detected: results.pii_detected,
            relevance: results.relevance.label().to_string(),
            is_duplicate: !results.is_authentic,
            bias: results.bias,
        },
    }
}

#[cfg(test)]
mod tests {
    use attest_contracts::{
        check::{BiasVerdict, CheckResults, QualityReport, Relevance},
        identity::Digest,
        settings::{CheckSettings, ScoringPolicy},
    };

    use super::{assemble_report, is_verified, quality_score};

    fn clean() -> CheckResults {
        CheckResults {
            quality: QualityReport { missing_values: 0, incorrect_types: 0 },
            pii_detected: false,
            relevance: Relevance::Confirmed("Finance".to_string()),
            is_authentic: true,
            bias: BiasVerdict::Balanced,
        }
    }

    #[test]
    fn test_clean_results_verify_at_full_score() {
        let report = assemble_report(
            Digest::from_bytes([7; 32]),
            clean(),
            "Finance",
            "ipfs://mock-report".to_string(),
            &CheckSettings::default(),
            &ScoringPolicy::default(),
        );

        assert!(report.is_verified);
        assert_eq!(report.quality_score, 100);
        assert!(!report.details.is_duplicate);
        assert_eq!(report.details.relevance, "Finance");
    }

    #[test]
    fn test_missing_value_limit_is_strict() {
        let settings = CheckSettings::default();
        let mut results = clean();

        results.quality.missing_values = 9;
        assert!(is_verified(&results, "Finance", &settings));

        results.quality.missing_values = 10;
        assert!(!is_verified(&results, "Finance", &settings));
    }

    #[test]
    fn test_each_failed_check_blocks_verification() {
        let settings = CheckSettings::default();

        let mut pii = clean();
        pii.pii_detected = true;
        assert!(!is_verified(&pii, "Finance", &settings));

        let mut irrelevant = clean();
        irrelevant.relevance = Relevance::Unknown;
        assert!(!is_verified(&irrelevant, "Finance", &settings));

        let mut duplicate = clean();
        duplicate.is_authentic = false;
        assert!(!is_verified(&duplicate, "Finance", &settings));

        let mut skewed = clean();
        skewed.bias = BiasVerdict::Imbalanced;
        assert!(!is_verified(&skewed, "Finance", &settings));
    }

    #[test]
    fn test_penalties_accumulate() {
        let policy = ScoringPolicy::default();
        let mut results = clean();
        results.quality.missing_values = 5;
        results.pii_detected = true;
        results.bias = BiasVerdict::Imbalanced;

        // 100 - 5 - 10 - 10
        assert_eq!(quality_score(&results, "Finance", &policy), 75);
    }

    /// The worst case (95 missing cells and every check failing) would be
    /// -55 unclamped; the floor holds it at 0.
    #[test]
    fn test_score_floor() {
        let results = CheckResults {
            quality: QualityReport { missing_values: 95, incorrect_types: 3 },
            pii_detected: true,
            relevance: Relevance::Unknown,
            is_authentic: false,
            bias: BiasVerdict::Imbalanced,
        };

        assert_eq!(quality_score(&results, "Finance", &ScoringPolicy::default()), 0);

        let lenient = ScoringPolicy { floor: -100, ..ScoringPolicy::default() };
        assert_eq!(quality_score(&results, "Finance", &lenient), -55);
    }

    #[test]
    fn test_huge_missing_count_saturates() {
        let mut results = clean();
        results.quality.missing_values = u64::MAX;
        assert_eq!(quality_score(&results, "Finance", &ScoringPolicy::default()), 0);
    }

    /// The seal covers quality and PII only.
    #[test]
    fn test_verification_hash_ignores_other_checks() {
        let settings = CheckSettings::default();
        let policy = ScoringPolicy::default();
        let digest = Digest::from_bytes([1; 32]);

        let a = assemble_report(digest, clean(), "Finance", String::new(), &settings, &policy);

        let mut other = clean();
        other.is_authentic = false;
        other.bias = BiasVerdict::Imbalanced;
        other.relevance = Relevance::Unknown;
        let b = assemble_report(digest, other, "Finance", String::new(), &settings, &policy);

        assert_eq!(a.verification_hash, b.verification_hash);
        assert_ne!(a.quality_score, b.quality_score);
    }
}
