use std::path::Path;

use anyhow::{anyhow, Context};

use crate::outline::{ListSignal, SourceParagraph};

pub mod numbering;
pub mod package;
pub mod paragraphs;
pub mod xml;

use numbering::{MarkerRenderer, NumberingModel};
use package::DocxPackage;
use paragraphs::extract_paragraphs;
use xml::parse_xml_part;

/// Open a .docx and produce the full paragraph sequence in document order,
/// each with its list signal (level + rendered marker) when it has live
/// numbering. Any read or parse failure aborts the whole pass; no partial
/// sequence comes back.
pub fn load_source_paragraphs(
    input_docx: &Path,
    include_tables: bool,
) -> anyhow::Result<Vec<SourceParagraph>> {
    let pkg = DocxPackage::read(input_docx)?;

    let doc_bytes = pkg
        .part("word/document.xml")
        .ok_or_else(|| anyhow!("missing word/document.xml"))?;
    let doc = parse_xml_part("word/document.xml", doc_bytes).context("parse word/document.xml")?;

    // A document without numbering.xml can still have numPr references; they
    // become list items with empty markers.
    let model = match pkg.part("word/numbering.xml") {
        Some(bytes) => {
            let part =
                parse_xml_part("word/numbering.xml", bytes).context("parse word/numbering.xml")?;
            NumberingModel::from_part(&part)
        }
        None => NumberingModel::default(),
    };

    let mut renderer = MarkerRenderer::new(&model);
    let mut out: Vec<SourceParagraph> = Vec::new();

    for para in extract_paragraphs(&doc, include_tables) {
        // numId 0 is Word for "numbering removed": not a list item.
        let list = match para.num_id {
            Some(num_id) if num_id > 0 => {
                let level = para.ilvl.unwrap_or(0).max(0) as usize;
                let marker = renderer.next_marker(num_id, level);
                Some(ListSignal { level, marker })
            }
            _ => None,
        };
        out.push(SourceParagraph {
            text: para.text,
            list,
        });
    }

    Ok(out)
}
