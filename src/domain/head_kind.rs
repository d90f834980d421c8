// ============================================================
// Layer 3 — HeadKind
// ============================================================
// Names the three task heads so the CLI and the demo use case
// can talk about them without touching any model type.

use std::{fmt, str::FromStr};

/// One of the three prediction heads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadKind {
    /// One class per sequence, from the pooled [CLS] vector
    SequenceClassification,
    /// One class per token
    SequenceLabeling,
    /// Start/end span logits per token
    QuestionAnswering,
}

impl HeadKind {
    /// Every head, in the order the demo runs them.
    pub const ALL: [HeadKind; 3] = [
        HeadKind::SequenceClassification,
        HeadKind::SequenceLabeling,
        HeadKind::QuestionAnswering,
    ];

    /// Heading printed above each head's shape report.
    pub fn title(&self) -> &'static str {
        match self {
            HeadKind::SequenceClassification => "Sequence Classification",
            HeadKind::SequenceLabeling       => "Sequence Labeling",
            HeadKind::QuestionAnswering      => "Question Answering",
        }
    }
}

impl fmt::Display for HeadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeadKind::SequenceClassification => "classification",
            HeadKind::SequenceLabeling       => "labeling",
            HeadKind::QuestionAnswering      => "qa",
        };
        f.write_str(name)
    }
}

impl FromStr for HeadKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classification" | "sc" => Ok(HeadKind::SequenceClassification),
            "labeling" | "labelling" | "sl" => Ok(HeadKind::SequenceLabeling),
            "qa" | "question-answering" => Ok(HeadKind::QuestionAnswering),
            other => Err(format!(
                "unknown head '{other}' (expected classification, labeling or qa)"
            )),
        }
    }
}
