use std::fmt::{self, Write as _};
use std::path::Path;

use serde::Deserialize;
use vocab_core::model::{
    EvaluatedResponse, EvaluationSummary, ItemType, MASTERY_PROMOTION_THRESHOLD, MasteryLevel,
    PASS_SCORE,
};

#[derive(Deserialize)]
#[serde(untagged)]
enum GradeFile {
    Bare(Vec<EvaluatedResponse>),
    Document(GradeDocument),
}

/// Either section may be present; at least one must be.
#[derive(Deserialize)]
struct GradeDocument {
    #[serde(default)]
    evaluated_results: Option<Vec<EvaluatedResponse>>,
    #[serde(default)]
    detailed_evaluation: Option<Vec<ScoredItem>>,
    #[serde(default)]
    threshold: Option<f64>,
}

/// One row of a 0-10 scored evaluation table.
#[derive(Debug, Deserialize)]
struct ScoredItem {
    #[serde(rename = "Score", default)]
    score: f64,
    #[serde(rename = "Type", default)]
    item_type: String,
    #[serde(rename = "Word/Phrase", default)]
    word: String,
    #[serde(default)]
    mastery_level: u8,
}

/// Reads an evaluated-results file and renders the pass/fail report.
///
/// # Errors
///
/// Returns I/O, JSON, or score-range errors.
pub fn grade_file(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    grade_json(&raw)
}

pub fn grade_json(raw: &str) -> Result<String, Box<dyn std::error::Error>> {
    let mut report = String::new();
    match serde_json::from_str::<GradeFile>(raw)? {
        GradeFile::Bare(results) => pass_report(&results, &mut report)?,
        GradeFile::Document(doc) => {
            if doc.evaluated_results.is_none() && doc.detailed_evaluation.is_none() {
                return Err("expected evaluated_results or detailed_evaluation".into());
            }
            if let Some(results) = &doc.evaluated_results {
                pass_report(results, &mut report)?;
            }
            if let Some(items) = &doc.detailed_evaluation {
                let threshold = doc.threshold.unwrap_or(MASTERY_PROMOTION_THRESHOLD);
                promotion_report(items, threshold, &mut report)?;
            }
        }
    }
    Ok(report)
}

fn pass_report(
    results: &[EvaluatedResponse],
    report: &mut String,
) -> Result<(), Box<dyn std::error::Error>> {
    let summary = EvaluationSummary::from_results(results)?;
    for result in results {
        let criteria = &result.evaluation_criteria;
        let passed = criteria.passes();
        let level = MasteryLevel::new(MasteryLevel::MAX).after_evaluation(passed);
        let word = result.target_word.as_deref().unwrap_or("?");
        let score = criteria
            .overall_score
            .map_or_else(|| "-".to_string(), |score| format!("{score:.0}"));
        writeln!(
            report,
            "{} #{} {word} ({}) score {score} -> mastery {}",
            if passed { "PASS" } else { "FAIL" },
            result.question_id,
            result.word_type.label(),
            level.value(),
        )?;
    }
    writeln!(
        report,
        "{} of {} passed ({}%). Pass rule: score >= {PASS_SCORE:.0}, word used correctly, understanding shown.",
        summary.passed_count(),
        summary.total,
        summary.score_percentage,
    )?;
    Ok(())
}

/// Items scoring at or above `threshold` move up one mastery level.
fn promotion_report(items: &[ScoredItem], threshold: f64, report: &mut String) -> fmt::Result {
    let mut promoted = 0;
    for item in items {
        let item_type = ItemType::from(item.item_type.trim().to_lowercase());
        let label = item_type.label();
        let score = item.score;
        let word = item.word.trim();
        if word.is_empty() {
            writeln!(report, "SKIP ? ({label}) score {score}: no word")?;
            continue;
        }
        if !item_type.is_known() {
            writeln!(report, "SKIP {word} ({label}) score {score}: unknown type")?;
            continue;
        }

        let old = MasteryLevel::new(item.mastery_level);
        let new = old.promote_if(score, threshold);
        let action = if score >= threshold {
            promoted += 1;
            "PROMOTE"
        } else {
            "KEEP"
        };
        let note = if new.is_mastered() {
            " (mastered)"
        } else if new.is_testable() {
            " (testable)"
        } else {
            ""
        };
        writeln!(
            report,
            "{action} {word} ({label}) score {score} -> level {} -> {}{note}",
            old.value(),
            new.value(),
        )?;
    }
    writeln!(
        report,
        "{promoted} of {} items promoted (threshold {threshold}).",
        items.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const WRAPPED: &str = r#"{
        "test_info": { "test_type": "mastery" },
        "evaluated_results": [
            {
                "question_id": 1,
                "word_type": "vocabulary",
                "target_word": "run",
                "user_sentence": "I run fast.",
                "evaluation_criteria": {
                    "word_used_correctly": true,
                    "demonstrates_understanding": true,
                    "grammar_correct": false,
                    "creative_usage": null,
                    "overall_score": 72,
                    "evaluator_comments": ""
                }
            },
            {
                "question_id": 2,
                "word_type": "idiom",
                "target_word": "break the ice",
                "user_sentence": "Ice.",
                "evaluation_criteria": {
                    "word_used_correctly": false,
                    "demonstrates_understanding": true,
                    "overall_score": 95
                }
            }
        ]
    }"#;

    #[test]
    fn reports_each_word_and_the_total() {
        let report = grade_json(WRAPPED).unwrap();
        let lines: Vec<_> = report.lines().collect();
        assert_eq!(lines[0], "PASS #1 run (Vocabulary) score 72 -> mastery 5");
        assert_eq!(lines[1], "FAIL #2 break the ice (Idiom) score 95 -> mastery 0");
        assert!(lines[2].starts_with("1 of 2 passed (50%)."));
    }

    #[test]
    fn accepts_a_bare_array() {
        let report = grade_json("[]").unwrap();
        assert!(report.starts_with("0 of 0 passed (0%)."));
    }

    #[test]
    fn rejects_scores_out_of_range() {
        let raw = r#"[{ "question_id": 3, "word_type": "idiom",
            "evaluation_criteria": { "overall_score": 140 } }]"#;
        assert!(grade_json(raw).is_err());
    }

    const SCORED: &str = r#"{
        "detailed_evaluation": [
            { "Score": 9, "Type": "Vocabulary", "Word/Phrase": "run", "mastery_level": 1 },
            { "Score": 6, "Type": "idiom", "Word/Phrase": "break the ice" },
            { "Score": 10, "Type": "phrasal_verb", "Word/Phrase": "give up", "mastery_level": 4 },
            { "Score": 10, "Type": "collocation", "Word/Phrase": "heavy rain" },
            { "Score": 9, "Type": "idiom", "Word/Phrase": "  " }
        ]
    }"#;

    #[test]
    fn promotes_items_at_the_default_threshold() {
        let report = grade_json(SCORED).unwrap();
        let lines: Vec<_> = report.lines().collect();
        assert_eq!(lines[0], "PROMOTE run (Vocabulary) score 9 -> level 1 -> 2 (testable)");
        assert_eq!(lines[1], "KEEP break the ice (Idiom) score 6 -> level 0 -> 0");
        assert_eq!(lines[2], "PROMOTE give up (Phrasal Verb) score 10 -> level 4 -> 5 (mastered)");
        assert_eq!(lines[3], "SKIP heavy rain (Collocation) score 10: unknown type");
        assert_eq!(lines[4], "SKIP ? (Idiom) score 9: no word");
        assert_eq!(lines[5], "2 of 5 items promoted (threshold 8).");
    }

    #[test]
    fn honours_a_custom_threshold_next_to_evaluated_results() {
        let raw = r#"{
            "evaluated_results": [],
            "threshold": 5.5,
            "detailed_evaluation": [
                { "Score": 6, "Type": "idiom", "Word/Phrase": "break the ice" }
            ]
        }"#;
        let report = grade_json(raw).unwrap();
        let lines: Vec<_> = report.lines().collect();
        assert!(lines[0].starts_with("0 of 0 passed"));
        assert_eq!(lines[1], "PROMOTE break the ice (Idiom) score 6 -> level 0 -> 1");
        assert_eq!(lines[2], "1 of 1 items promoted (threshold 5.5).");
    }

    #[test]
    fn rejects_a_document_with_nothing_to_grade() {
        assert!(grade_json(r#"{ "test_info": {} }"#).is_err());
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evaluated.json");
        std::fs::write(&path, WRAPPED).unwrap();
        assert!(grade_file(&path).unwrap().contains("1 of 2 passed"));
    }
}
