use crate::{lookup_term, CodeLookup, ConceptMatch, TerminologyResult, Vocabulary};
use async_trait::async_trait;
use std::collections::HashMap;

/// In-memory terminology table.
///
/// Terms are matched case-insensitively after trimming.
#[derive(Clone, Debug, Default)]
pub struct FixedLookup {
    entries: HashMap<(Vocabulary, String), ConceptMatch>,
}

impl FixedLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, builder style.
    pub fn with(
        mut self,
        vocabulary: Vocabulary,
        term: &str,
        code: &str,
        display: &str,
    ) -> Self {
        self.insert(vocabulary, term, ConceptMatch::new(code, display));
        self
    }

    pub fn insert(&mut self, vocabulary: Vocabulary, term: &str, concept: ConceptMatch) {
        self.entries.insert((vocabulary, normalise(term)), concept);
    }
}

#[async_trait]
impl CodeLookup for FixedLookup {
    async fn lookup_code(
        &self,
        vocabulary: Vocabulary,
        term: &str,
    ) -> TerminologyResult<Option<ConceptMatch>> {
        let term = lookup_term(term)?;
        Ok(self
            .entries
            .get(&(vocabulary, normalise(term.as_str())))
            .cloned())
    }
}

fn normalise(term: &str) -> String {
    term.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TerminologyError;

    #[tokio::test]
    async fn matches_case_insensitively_per_vocabulary() {
        let lookup = FixedLookup::new().with(
            Vocabulary::Icd10Cm,
            "Type 2 Diabetes",
            "E11.9",
            "Type 2 diabetes mellitus without complications",
        );

        let found = lookup
            .lookup_code(Vocabulary::Icd10Cm, " type 2 diabetes ")
            .await
            .expect("lookup should succeed");
        assert_eq!(found.map(|c| c.code).as_deref(), Some("E11.9"));

        let other_vocab = lookup
            .lookup_code(Vocabulary::Loinc, "type 2 diabetes")
            .await
            .expect("lookup should succeed");
        assert!(other_vocab.is_none());
    }

    #[tokio::test]
    async fn blank_term_is_invalid() {
        let err = FixedLookup::new()
            .lookup_code(Vocabulary::RxNorm, "  ")
            .await
            .expect_err("blank term");
        assert!(matches!(err, TerminologyError::InvalidInput(_)));
    }
}
