use crate::docx::xml::{find_attr, parse_i32_attr, XmlEvent, XmlPart};

/// One body-flow paragraph of `word/document.xml`, before any outline logic.
/// Every paragraph is emitted, including empty ones: positional key fallbacks
/// count raw document positions, so the noise filter runs later, in the
/// indexer.
#[derive(Clone, Debug, Default)]
pub struct DocParagraph {
    pub text: String,
    pub num_id: Option<i32>,
    pub ilvl: Option<i32>,
}

#[derive(Default)]
struct Capture {
    depth: usize,
    text: String,
    num_id: Option<i32>,
    ilvl: Option<i32>,
    in_direct_ppr: bool,
    // w:p can nest through drawings/textboxes; inner paragraphs are not part
    // of the body flow and are swallowed whole.
    nested_p: usize,
    text_depth: Option<usize>,
}

fn control_append(buf: &mut String, name: &str, attrs: &[(String, String)]) {
    match name {
        "w:tab" | "w:ptab" => buf.push('\t'),
        "w:cr" => buf.push('\n'),
        "w:br" => {
            if find_attr(attrs, "w:type").unwrap_or("textWrapping") == "textWrapping" {
                buf.push('\n');
            }
        }
        "w:noBreakHyphen" => buf.push('-'),
        _ => {}
    }
}

fn capture_props(cap: &mut Capture, parent: &str, name: &str, attrs: &[(String, String)]) {
    match name {
        "w:ilvl" => {
            if cap.in_direct_ppr && parent == "w:numPr" && cap.ilvl.is_none() {
                cap.ilvl = parse_i32_attr(attrs, "w:val");
            }
        }
        "w:numId" => {
            if cap.in_direct_ppr && parent == "w:numPr" && cap.num_id.is_none() {
                cap.num_id = parse_i32_attr(attrs, "w:val");
            }
        }
        "w:tab" | "w:ptab" | "w:cr" | "w:br" | "w:noBreakHyphen" => {
            if parent == "w:r" {
                control_append(&mut cap.text, name, attrs);
            }
        }
        _ => {}
    }
}

/// Walk a parsed `word/document.xml` and collect paragraphs in document
/// order: direct body children, plus top-level table-cell paragraphs when
/// `include_tables` is set.
pub fn extract_paragraphs(part: &XmlPart, include_tables: bool) -> Vec<DocParagraph> {
    let mut out: Vec<DocParagraph> = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut capturing: Option<Capture> = None;

    for ev in &part.events {
        match ev {
            XmlEvent::Start { name, attrs } => {
                let parent = stack.last().map(|s| s.as_str()).unwrap_or("");

                if name == "w:p" {
                    if let Some(cap) = capturing.as_mut() {
                        cap.nested_p += 1;
                    } else if parent == "w:body" || (include_tables && parent == "w:tc") {
                        capturing = Some(Capture {
                            depth: stack.len() + 1,
                            ..Default::default()
                        });
                    }
                } else if let Some(cap) = capturing.as_mut() {
                    if cap.nested_p == 0 {
                        if name == "w:pPr" && parent == "w:p" && stack.len() == cap.depth {
                            cap.in_direct_ppr = true;
                        } else if name == "w:t" && parent == "w:r" {
                            cap.text_depth = Some(stack.len() + 1);
                        } else {
                            capture_props(cap, parent, name, attrs);
                        }
                    }
                }

                stack.push(name.clone());
            }
            XmlEvent::Empty { name, attrs } => {
                let parent = stack.last().map(|s| s.as_str()).unwrap_or("");

                if name == "w:p" {
                    if capturing.is_none()
                        && (parent == "w:body" || (include_tables && parent == "w:tc"))
                    {
                        // Self-closed empty paragraph; it still occupies a
                        // document position.
                        out.push(DocParagraph::default());
                    }
                } else if let Some(cap) = capturing.as_mut() {
                    if cap.nested_p == 0 {
                        capture_props(cap, parent, name, attrs);
                    }
                }
            }
            XmlEvent::Text { text } => {
                if let Some(cap) = capturing.as_mut() {
                    if cap.nested_p == 0 && cap.text_depth.is_some() {
                        cap.text.push_str(text);
                    }
                }
            }
            XmlEvent::End { name } => {
                let mut finalize = false;
                if let Some(cap) = capturing.as_mut() {
                    if name == "w:p" {
                        if cap.nested_p > 0 {
                            cap.nested_p -= 1;
                        } else if stack.len() == cap.depth {
                            finalize = true;
                        }
                    } else if cap.nested_p == 0 {
                        if name == "w:t" && cap.text_depth == Some(stack.len()) {
                            cap.text_depth = None;
                        } else if name == "w:pPr" && stack.len() == cap.depth + 1 {
                            cap.in_direct_ppr = false;
                        }
                    }
                }
                if finalize {
                    if let Some(cap) = capturing.take() {
                        out.push(DocParagraph {
                            text: cap.text,
                            num_id: cap.num_id,
                            ilvl: cap.ilvl,
                        });
                    }
                }
                let _ = stack.pop();
            }
        }
    }

    out
}
