//! Human-readable match explanations

use crate::matching::severity::GapAnalysis;

/// Quality band for an overall score
pub fn quality_band(overall_score: f32) -> &'static str {
    if overall_score >= 0.8 {
        "Excellent"
    } else if overall_score >= 0.6 {
        "Good"
    } else if overall_score >= 0.4 {
        "Fair"
    } else {
        "Poor"
    }
}

/// Build the four-part explanation: band, matched skills, critical gaps, learning time
pub fn explain_match(overall_score: f32, skill_matches: &[String], gap_analysis: &GapAnalysis) -> String {
    let mut parts = Vec::with_capacity(4);

    parts.push(format!(
        "{} match ({:.0}% overall).",
        quality_band(overall_score),
        overall_score * 100.0
    ));

    if !skill_matches.is_empty() {
        let named: Vec<&str> = skill_matches.iter().take(2).map(|s| s.as_str()).collect();
        parts.push(format!("Your skills in {} align with this role.", named.join(" and ")));
    }

    let critical = &gap_analysis.skill_gaps.critical;
    match gap_analysis.critical_gaps {
        0 => parts.push("You meet all critical requirements.".to_string()),
        1 | 2 => {
            let named: Vec<&str> = critical.iter().take(2).map(|s| s.as_str()).collect();
            parts.push(format!(
                "Consider learning {} to meet the critical requirements.",
                named.join(" and ")
            ));
        }
        n => parts.push(format!(
            "This role requires significant upskilling across {} critical skills.",
            n
        )),
    }

    let weeks = gap_analysis.estimated_learning_weeks;
    let closing = if weeks <= 4 {
        format!("Remaining gaps can be bridged quickly (about {} weeks).", weeks)
    } else if weeks <= 8 {
        format!("Closing the gaps is a moderate investment (about {} weeks).", weeks)
    } else {
        format!("Treat this role as a longer-term goal (about {} weeks of learning).", weeks)
    };
    parts.push(closing);

    parts.join(" ")
}
