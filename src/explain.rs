//! Human-readable risk notes for known drug pairs.

use std::collections::HashMap;

use indexmap::IndexSet;

/// Returned when no pair in the selection has a curated note.
pub const DEFAULT_RISK: &str = "Unknown risk – consult pharmacist";

const CURATED_PAIRS: &[(&str, &str, &str)] = &[
    ("Warfarin", "Aspirin", "Bleeding risk"),
    ("Amiodarone", "Digoxin", "Arrhythmia risk"),
    ("Elgocalciferol", "Adapalene", "Unknown risk – consult pharmacist"),
    ("Ampicillin", "Methylphenidate", "Possible CNS interactions"),
];

/// Lookup table keyed by unordered name pairs.
#[derive(Debug, Clone)]
pub struct RiskExplainer {
    notes: HashMap<(String, String), String>,
}

impl Default for RiskExplainer {
    fn default() -> Self {
        Self::from_pairs(
            CURATED_PAIRS
                .iter()
                .map(|(a, b, note)| (a.to_string(), b.to_string(), note.to_string())),
        )
    }
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl RiskExplainer {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String, String)>,
    {
        let notes = pairs
            .into_iter()
            .map(|(a, b, note)| (pair_key(&a, &b), note))
            .collect();
        Self { notes }
    }

    /// Note for one unordered pair, if curated.
    pub fn lookup(&self, a: &str, b: &str) -> Option<&str> {
        self.notes.get(&pair_key(a, b)).map(String::as_str)
    }

    /// Describe a selection.
    ///
    /// Every pair in the selection is checked; matching notes are joined
    /// with `"; "` in selection order. Falls back to [`DEFAULT_RISK`].
    pub fn describe<S: AsRef<str>>(&self, names: &[S]) -> String {
        let mut found: IndexSet<&str> = IndexSet::new();
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                if let Some(note) = self.lookup(a.as_ref(), b.as_ref()) {
                    found.insert(note);
                }
            }
        }
        if found.is_empty() {
            DEFAULT_RISK.to_string()
        } else {
            found.into_iter().collect::<Vec<_>>().join("; ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_order_does_not_matter() {
        let explainer = RiskExplainer::default();
        assert_eq!(explainer.describe(&["Warfarin", "Aspirin"]), "Bleeding risk");
        assert_eq!(explainer.describe(&["Aspirin", "Warfarin"]), "Bleeding risk");
        assert_eq!(
            explainer.describe(&["Digoxin", "Amiodarone"]),
            "Arrhythmia risk"
        );
    }

    #[test]
    fn unknown_pair_falls_back() {
        let explainer = RiskExplainer::default();
        assert_eq!(explainer.describe(&["Aspirin", "Digoxin"]), DEFAULT_RISK);
        assert_eq!(explainer.describe(&["Aspirin"]), DEFAULT_RISK);
    }

    #[test]
    fn larger_selections_collect_every_matching_pair() {
        let explainer = RiskExplainer::default();
        let names = ["Digoxin", "Warfarin", "Amiodarone", "Aspirin"];
        assert_eq!(
            explainer.describe(&names),
            "Arrhythmia risk; Bleeding risk"
        );
    }

    #[test]
    fn repeated_notes_are_reported_once() {
        let explainer = RiskExplainer::default();
        let names = ["Warfarin", "Aspirin", "Warfarin"];
        assert_eq!(explainer.describe(&names), "Bleeding risk");
    }
}
