use std::cmp::Ordering;

use crate::outline::ParagraphRecord;
use crate::textnorm::normalize_text;

/// A matched `(key, value)` projection of a paragraph record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClipEntry {
    pub key: String,
    pub value: String,
}

/// The accumulated selection for one session: grows across copy passes,
/// cleared only by an explicit reset.
#[derive(Default)]
pub struct ClipSession {
    entries: Vec<ClipEntry>,
}

/// What one copy pass did, for reporting.
pub struct CollectOutcome {
    pub added: usize,
    pub unmatched: Vec<String>,
}

impl ClipSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ClipEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One copy pass: match each selected paragraph text against the index,
    /// drop what is already accumulated, append the rest, then re-sort the
    /// whole accumulation.
    pub fn collect(&mut self, selection: &[String], index: &[ParagraphRecord]) -> CollectOutcome {
        let mut fresh: Vec<ClipEntry> = Vec::new();
        let mut unmatched: Vec<String> = Vec::new();

        for selected in selection {
            let trimmed = selected.trim();
            let normalized = normalize_text(trimmed);

            // First record in document order satisfying either predicate wins.
            let matched = index
                .iter()
                .find(|rec| rec.value == normalized || rec.original_text == trimmed);

            match matched {
                Some(rec) => {
                    let candidate = ClipEntry {
                        key: rec.key.clone(),
                        value: rec.value.clone(),
                    };
                    // De-dup against the pre-existing accumulation only;
                    // duplicates within one pass are all kept.
                    if !self.entries.contains(&candidate) {
                        fresh.push(candidate);
                    }
                }
                None => unmatched.push(trimmed.to_string()),
            }
        }

        let added = fresh.len();
        if added > 0 {
            self.entries.extend(fresh);
            self.entries.sort_by(compare_keys);
        }

        CollectOutcome { added, unmatched }
    }

    /// Render the accumulation as the pseudo-JSON block. Keys and values are
    /// emitted verbatim, so the block is not valid JSON when a value contains
    /// a quote. Empty accumulation renders as `{\n\n}`.
    pub fn render_block(&self) -> String {
        let body = self
            .entries
            .iter()
            .map(|e| format!("\"{}\": \"{}\"", e.key, e.value))
            .collect::<Vec<_>>()
            .join(",\n");
        format!("{{\n{body}\n}}")
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Order by the first run of digits in each key, compared as integers; keys
/// without digits fall back to full lexicographic comparison. Keys whose
/// leading digit runs are equal compare Equal, so `"2.10"` and `"2.9"` keep
/// whatever relative order the previous merge left them in (the sort is
/// stable). This mirrors the shipped behavior; it is not a hierarchical
/// numeric sort.
fn compare_keys(a: &ClipEntry, b: &ClipEntry) -> Ordering {
    match (first_digit_run(&a.key), first_digit_run(&b.key)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a.key.cmp(&b.key),
    }
}

fn first_digit_run(key: &str) -> Option<u64> {
    let start = key.find(|c: char| c.is_ascii_digit())?;
    let digits: String = key[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    // A run too long for u64 saturates: it still compares as a number (a
    // huge one), like the original's float parse, instead of dropping to
    // the lexicographic fallback.
    Some(digits.parse().unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::{first_digit_run, ClipSession};
    use crate::outline::ParagraphRecord;

    fn rec(key: &str, value: &str) -> ParagraphRecord {
        ParagraphRecord {
            key: key.to_string(),
            value: value.to_string(),
            original_text: value.to_string(),
            is_list_item: true,
        }
    }

    fn sel(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn digit_run_extraction() {
        assert_eq!(first_digit_run("2.10"), Some(2));
        assert_eq!(first_digit_run("a) 14 x"), Some(14));
        assert_eq!(first_digit_run("intro.text"), None);
    }

    #[test]
    fn oversized_digit_run_saturates_and_sorts_last() {
        let giant = "99999999999999999999999999999999.";
        assert_eq!(first_digit_run(giant), Some(u64::MAX));

        let index = vec![rec(giant, "giant"), rec("3)", "three")];
        let mut session = ClipSession::new();
        session.collect(&sel(&["giant", "three"]), &index);
        let keys: Vec<&str> = session.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["3)", giant]);
    }

    #[test]
    fn reselection_never_grows_the_accumulation() {
        let index = vec![rec("1)", "Intro")];
        let mut session = ClipSession::new();

        let first = session.collect(&sel(&["Intro"]), &index);
        assert_eq!(first.added, 1);
        let second = session.collect(&sel(&["Intro"]), &index);
        assert_eq!(second.added, 0);
        assert_eq!(session.entries().len(), 1);
    }

    #[test]
    fn unmatched_paragraphs_are_dropped_not_fatal() {
        let index = vec![rec("1)", "Intro")];
        let mut session = ClipSession::new();
        let outcome = session.collect(&sel(&["Intro", "never written"]), &index);
        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.unmatched, vec!["never written".to_string()]);
    }

    #[test]
    fn matches_on_original_text_too() {
        // Normalized value differs from the raw text; the trimmed original
        // is kept as a secondary match key.
        let index = vec![ParagraphRecord {
            key: "2)".to_string(),
            value: "fancy dash".to_string(),
            original_text: "fancy \u{2014} dash".to_string(),
            is_list_item: true,
        }];
        let mut session = ClipSession::new();
        let outcome = session.collect(&sel(&["fancy \u{2014} dash"]), &index);
        assert_eq!(outcome.added, 1);
        assert_eq!(session.entries()[0].key, "2)");
    }

    #[test]
    fn leading_digit_ties_keep_prior_relative_order() {
        let index = vec![rec("2.10", "ten"), rec("2.9", "nine")];
        let mut session = ClipSession::new();

        // Select "nine" first: it enters the accumulation before "ten", and
        // the later merge must not reorder them into numeric 2.9 < 2.10.
        session.collect(&sel(&["nine"]), &index);
        session.collect(&sel(&["ten"]), &index);

        let keys: Vec<&str> = session.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["2.9", "2.10"]);

        // And the other way round: insertion order wins again.
        let mut session = ClipSession::new();
        session.collect(&sel(&["ten"]), &index);
        session.collect(&sel(&["nine"]), &index);
        let keys: Vec<&str> = session.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["2.10", "2.9"]);
    }

    #[test]
    fn sorts_by_first_digit_run_across_merges() {
        let index = vec![rec("3)", "three"), rec("1)", "one"), rec("2)", "two")];
        let mut session = ClipSession::new();
        session.collect(&sel(&["three", "one"]), &index);
        session.collect(&sel(&["two"]), &index);
        let keys: Vec<&str> = session.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["1)", "2)", "3)"]);
    }

    #[test]
    fn digitless_keys_sort_lexicographically() {
        let index = vec![rec("text_b", "bee"), rec("text_a", "ay")];
        let mut session = ClipSession::new();
        session.collect(&sel(&["bee", "ay"]), &index);
        let keys: Vec<&str> = session.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["text_a", "text_b"]);
    }

    #[test]
    fn render_block_shape() {
        let index = vec![rec("1)", "Intro"), rec("2)", "Scope")];
        let mut session = ClipSession::new();
        session.collect(&sel(&["Intro", "Scope"]), &index);
        assert_eq!(
            session.render_block(),
            "{\n\"1)\": \"Intro\",\n\"2)\": \"Scope\"\n}"
        );
    }

    #[test]
    fn clear_resets_to_the_empty_block() {
        let index = vec![rec("1)", "Intro")];
        let mut session = ClipSession::new();
        session.collect(&sel(&["Intro"]), &index);
        session.clear();
        assert!(session.is_empty());
        assert_eq!(session.render_block(), "{\n\n}");
    }

    #[test]
    fn same_text_selected_twice_in_one_pass_is_kept_twice() {
        // De-dup only checks the pre-existing accumulation, so selecting the
        // same paragraph twice within a single pass keeps both candidates.
        let index = vec![rec("1)", "Intro")];
        let mut session = ClipSession::new();
        let outcome = session.collect(&sel(&["Intro", "Intro"]), &index);
        assert_eq!(outcome.added, 2);
        assert_eq!(session.entries().len(), 2);

        // A later pass sees both in the accumulation and adds nothing.
        let outcome = session.collect(&sel(&["Intro"]), &index);
        assert_eq!(outcome.added, 0);
    }

    #[test]
    fn same_key_different_value_both_accumulate() {
        // Duplicate keys are legal in the index; only the (key, value) pair
        // is deduplicated.
        let index = vec![rec("1..text", "body one"), rec("1..text", "body two")];
        let mut session = ClipSession::new();
        let outcome = session.collect(&sel(&["body one", "body two"]), &index);
        assert_eq!(outcome.added, 2);
    }
}
