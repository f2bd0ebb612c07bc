use crate::model::{Explanations, Reason, ReasonKind, Severity};

/// Accumulator for one metric evaluation: the raw score plus the ordered
/// reasons that explain it. Severity falls out of the final score.
pub(super) struct Eval {
    pub score: f64,
    pub reasons: Vec<Reason>,
}

impl Eval {
    pub fn new(score: f64) -> Self {
        Self {
            score: score.clamp(0.0, 1.0),
            reasons: Vec::new(),
        }
    }

    pub fn fact(&mut self, message: impl Into<String>) {
        self.reasons.push(Reason::new(ReasonKind::Fact, message));
    }

    pub fn issue(&mut self, message: impl Into<String>) {
        self.reasons.push(Reason::new(ReasonKind::Issue, message));
    }

    pub fn issue_with_examples(&mut self, message: impl Into<String>, examples: Vec<String>) {
        self.reasons
            .push(Reason::with_examples(ReasonKind::Issue, message, examples));
    }

    pub fn suggest(&mut self, message: impl Into<String>) {
        self.reasons
            .push(Reason::new(ReasonKind::Suggestion, message));
    }

    pub fn explanations(self) -> (f64, Explanations) {
        let severity = severity_for(self.score);
        (
            self.score,
            Explanations {
                severity,
                reasons: self.reasons,
            },
        )
    }
}

pub(super) fn severity_for(score: f64) -> Severity {
    if score >= 0.75 {
        Severity::Success
    } else if score >= 0.4 {
        Severity::Warning
    } else {
        Severity::Error
    }
}

/// Truncates to at most `limit` bytes on a char boundary, for reason
/// examples that quote page text.
pub(super) fn preview(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
