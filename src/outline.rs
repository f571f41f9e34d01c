use serde::Serialize;

use crate::textnorm::normalize_text;

/// One qualifying paragraph, in document order. Keys are not unique: two list
/// items can share a numbering path after a host renumber, and every plain
/// paragraph following the same list item gets the same `<key>.text`.
#[derive(Clone, Debug, Serialize)]
pub struct ParagraphRecord {
    pub key: String,
    pub value: String,
    pub original_text: String,
    pub is_list_item: bool,
}

/// Per-paragraph signal as the host document reports it.
#[derive(Clone, Debug, Default)]
pub struct SourceParagraph {
    pub text: String,
    pub list: Option<ListSignal>,
}

/// 0-based nesting depth plus the host-rendered marker for this occurrence
/// (empty when the host cannot produce one).
#[derive(Clone, Debug)]
pub struct ListSignal {
    pub level: usize,
    pub marker: String,
}

/// Scan every paragraph once and derive its dotted outline key.
///
/// The ancestor stack holds the most recent marker seen at each depth. A list
/// item at a level at-or-above the stack top truncates the stack first, which
/// is what resets numbering when the outline moves back up or sideways.
pub fn index_paragraphs(paragraphs: &[SourceParagraph]) -> Vec<ParagraphRecord> {
    let mut records: Vec<ParagraphRecord> = Vec::new();
    let mut ancestors: Vec<String> = Vec::new();
    let mut last_numbering = String::new();

    for (i, para) in paragraphs.iter().enumerate() {
        let value = normalize_text(&para.text);
        // Empty lines and single-character leftovers are noise: no record,
        // and the numbering state is left alone.
        if value.len() <= 1 {
            continue;
        }
        let original_text = para.text.trim().to_string();

        if let Some(list) = &para.list {
            if list.level <= ancestors.len() {
                ancestors.truncate(list.level);
            }
            if ancestors.len() <= list.level {
                ancestors.resize(list.level + 1, String::new());
            }
            ancestors[list.level] = list.marker.clone();

            // Empty markers drop out of the joined path, so an item with no
            // rendered marker can end up with a key equal to its parent's.
            let key = ancestors[..=list.level]
                .iter()
                .filter(|seg| !seg.is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join(".");
            last_numbering = key.clone();

            records.push(ParagraphRecord {
                key,
                value,
                original_text,
                is_list_item: true,
            });
        } else {
            let key = if last_numbering.is_empty() {
                // Raw 1-based document position, counting skipped paragraphs.
                format!("text_{}", i + 1)
            } else {
                format!("{last_numbering}.text")
            };
            records.push(ParagraphRecord {
                key,
                value,
                original_text,
                is_list_item: false,
            });
        }
    }

    records
}
