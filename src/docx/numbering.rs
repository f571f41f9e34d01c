use std::collections::HashMap;

use crate::docx::xml::{find_attr, parse_i32_attr, XmlEvent, XmlPart};

/// Numbering definitions from `word/numbering.xml`: abstract level tables
/// plus the concrete `numId -> abstractNum` bindings.
#[derive(Debug, Default)]
pub struct NumberingModel {
    abstracts: HashMap<i32, AbstractNum>,
    nums: HashMap<i32, NumBinding>,
}

#[derive(Debug, Default)]
struct AbstractNum {
    levels: HashMap<usize, LevelDef>,
}

#[derive(Debug, Clone)]
pub struct LevelDef {
    pub num_fmt: NumFmt,
    pub lvl_text: String,
    pub start: i32,
}

impl Default for LevelDef {
    fn default() -> Self {
        Self {
            num_fmt: NumFmt::Decimal,
            lvl_text: String::new(),
            start: 1,
        }
    }
}

#[derive(Debug, Default)]
struct NumBinding {
    abstract_id: i32,
    start_overrides: HashMap<usize, i32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumFmt {
    Decimal,
    LowerLetter,
    UpperLetter,
    LowerRoman,
    UpperRoman,
    Bullet,
    None,
    Other,
}

impl NumFmt {
    fn from_val(val: &str) -> Self {
        match val {
            "decimal" => Self::Decimal,
            "lowerLetter" => Self::LowerLetter,
            "upperLetter" => Self::UpperLetter,
            "lowerRoman" => Self::LowerRoman,
            "upperRoman" => Self::UpperRoman,
            "bullet" => Self::Bullet,
            "none" => Self::None,
            _ => Self::Other,
        }
    }
}

impl NumberingModel {
    /// Walk a parsed `word/numbering.xml`. Unknown elements are skipped; a
    /// document with no numbering part at all just uses the empty model.
    pub fn from_part(part: &XmlPart) -> Self {
        let mut model = NumberingModel::default();

        let mut cur_abstract: Option<i32> = None;
        let mut cur_level: Option<usize> = None;
        let mut cur_num: Option<i32> = None;
        let mut cur_override_lvl: Option<usize> = None;

        for ev in &part.events {
            match ev {
                XmlEvent::Start { name, attrs } | XmlEvent::Empty { name, attrs } => {
                    match name.as_str() {
                        "w:abstractNum" => {
                            cur_abstract = parse_i32_attr(attrs, "w:abstractNumId");
                            if let Some(id) = cur_abstract {
                                model.abstracts.entry(id).or_default();
                            }
                        }
                        "w:lvl" => {
                            if let (Some(id), Some(ilvl)) =
                                (cur_abstract, parse_i32_attr(attrs, "w:ilvl"))
                            {
                                let ilvl = ilvl.max(0) as usize;
                                cur_level = Some(ilvl);
                                model
                                    .abstracts
                                    .entry(id)
                                    .or_default()
                                    .levels
                                    .entry(ilvl)
                                    .or_default();
                            }
                        }
                        "w:start" => {
                            if let Some(def) = current_level(&mut model, cur_abstract, cur_level) {
                                if let Some(v) = parse_i32_attr(attrs, "w:val") {
                                    def.start = v;
                                }
                            }
                        }
                        "w:numFmt" => {
                            if let Some(def) = current_level(&mut model, cur_abstract, cur_level) {
                                if let Some(v) = find_attr(attrs, "w:val") {
                                    def.num_fmt = NumFmt::from_val(v);
                                }
                            }
                        }
                        "w:lvlText" => {
                            if let Some(def) = current_level(&mut model, cur_abstract, cur_level) {
                                if let Some(v) = find_attr(attrs, "w:val") {
                                    def.lvl_text = v.to_string();
                                }
                            }
                        }
                        "w:num" => {
                            cur_num = parse_i32_attr(attrs, "w:numId");
                            if let Some(id) = cur_num {
                                model.nums.entry(id).or_default();
                            }
                        }
                        "w:abstractNumId" => {
                            if let (Some(num_id), Some(v)) =
                                (cur_num, parse_i32_attr(attrs, "w:val"))
                            {
                                if let Some(binding) = model.nums.get_mut(&num_id) {
                                    binding.abstract_id = v;
                                }
                            }
                        }
                        "w:lvlOverride" => {
                            cur_override_lvl =
                                parse_i32_attr(attrs, "w:ilvl").map(|v| v.max(0) as usize);
                        }
                        "w:startOverride" => {
                            if let (Some(num_id), Some(lvl), Some(v)) =
                                (cur_num, cur_override_lvl, parse_i32_attr(attrs, "w:val"))
                            {
                                if let Some(binding) = model.nums.get_mut(&num_id) {
                                    binding.start_overrides.insert(lvl, v);
                                }
                            }
                        }
                        _ => {}
                    }
                }
                XmlEvent::End { name } => match name.as_str() {
                    "w:abstractNum" => cur_abstract = None,
                    "w:lvl" => cur_level = None,
                    "w:num" => {
                        cur_num = None;
                        cur_override_lvl = None;
                    }
                    "w:lvlOverride" => cur_override_lvl = None,
                    _ => {}
                },
                XmlEvent::Text { .. } => {}
            }
        }

        model
    }

    fn level_def(&self, num_id: i32, level: usize) -> Option<&LevelDef> {
        let binding = self.nums.get(&num_id)?;
        self.abstracts.get(&binding.abstract_id)?.levels.get(&level)
    }

    fn start_for(&self, num_id: i32, level: usize) -> i32 {
        if let Some(binding) = self.nums.get(&num_id) {
            if let Some(v) = binding.start_overrides.get(&level) {
                return *v;
            }
        }
        self.level_def(num_id, level).map(|d| d.start).unwrap_or(1)
    }
}

fn current_level<'a>(
    model: &'a mut NumberingModel,
    cur_abstract: Option<i32>,
    cur_level: Option<usize>,
) -> Option<&'a mut LevelDef> {
    let id = cur_abstract?;
    let lvl = cur_level?;
    model.abstracts.get_mut(&id)?.levels.get_mut(&lvl)
}

/// Renders the marker string Word would display for each list occurrence, in
/// document order. Counters live per `numId`: an item at level L takes the
/// next value at L and restarts everything deeper; ancestor counters that
/// were never emitted render at their start value.
pub struct MarkerRenderer<'a> {
    model: &'a NumberingModel,
    counters: HashMap<i32, Vec<Option<i32>>>,
}

impl<'a> MarkerRenderer<'a> {
    pub fn new(model: &'a NumberingModel) -> Self {
        Self {
            model,
            counters: HashMap::new(),
        }
    }

    /// Advance the counters for this occurrence and render its marker.
    /// Unknown `numId` renders empty, like a host that cannot produce a
    /// list string.
    pub fn next_marker(&mut self, num_id: i32, level: usize) -> String {
        if !self.model.nums.contains_key(&num_id) {
            return String::new();
        }

        let counters = self.counters.entry(num_id).or_default();
        if counters.len() <= level {
            counters.resize(level + 1, None);
        }
        for (lvl, slot) in counters.iter_mut().enumerate().take(level) {
            if slot.is_none() {
                *slot = Some(self.model.start_for(num_id, lvl));
            }
        }
        counters[level] = Some(match counters[level] {
            Some(v) => v + 1,
            None => self.model.start_for(num_id, level),
        });
        for slot in counters.iter_mut().skip(level + 1) {
            *slot = None;
        }

        let Some(def) = self.model.level_def(num_id, level) else {
            return String::new();
        };
        match def.num_fmt {
            NumFmt::Bullet => def.lvl_text.clone(),
            NumFmt::None => String::new(),
            _ => {
                let counters = &self.counters[&num_id];
                substitute_lvl_text(&def.lvl_text, |placeholder_level| {
                    let value = counters
                        .get(placeholder_level)
                        .copied()
                        .flatten()
                        .unwrap_or_else(|| self.model.start_for(num_id, placeholder_level));
                    let fmt = self
                        .model
                        .level_def(num_id, placeholder_level)
                        .map(|d| d.num_fmt)
                        .unwrap_or(NumFmt::Decimal);
                    format_value(fmt, value)
                })
            }
        }
    }
}

/// Replace `%1`..`%9` with the formatted counter of that (1-based) level.
fn substitute_lvl_text(lvl_text: &str, mut render: impl FnMut(usize) -> String) -> String {
    let mut out = String::with_capacity(lvl_text.len() + 4);
    let mut chars = lvl_text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '%' {
            if let Some(d) = chars.peek().and_then(|p| p.to_digit(10)) {
                if d >= 1 {
                    chars.next();
                    out.push_str(&render(d as usize - 1));
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

fn format_value(fmt: NumFmt, value: i32) -> String {
    match fmt {
        NumFmt::LowerLetter => to_letters(value, false),
        NumFmt::UpperLetter => to_letters(value, true),
        NumFmt::LowerRoman => to_roman(value, false),
        NumFmt::UpperRoman => to_roman(value, true),
        // Bullet/None never reach here; unknown formats count decimally.
        _ => value.to_string(),
    }
}

fn to_letters(value: i32, upper: bool) -> String {
    if value < 1 {
        return value.to_string();
    }
    let mut v = value as u32;
    let base = if upper { b'A' } else { b'a' };
    let mut out = Vec::new();
    while v > 0 {
        v -= 1;
        out.push(base + (v % 26) as u8);
        v /= 26;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

fn to_roman(value: i32, upper: bool) -> String {
    if value < 1 {
        return value.to_string();
    }
    const TABLE: [(i32, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut v = value;
    let mut out = String::new();
    for (n, s) in TABLE {
        while v >= n {
            out.push_str(s);
            v -= n;
        }
    }
    if upper {
        out.to_ascii_uppercase()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{MarkerRenderer, NumberingModel};
    use crate::docx::xml::parse_xml_part;

    fn model(xml: &str) -> NumberingModel {
        let part = parse_xml_part("word/numbering.xml", xml.as_bytes()).expect("parse");
        NumberingModel::from_part(&part)
    }

    const THREE_LEVELS: &str = r#"<?xml version="1.0"?><w:numbering>
      <w:abstractNum w:abstractNumId="0">
        <w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1)"/></w:lvl>
        <w:lvl w:ilvl="1"><w:start w:val="1"/><w:numFmt w:val="lowerLetter"/><w:lvlText w:val="%2)"/></w:lvl>
        <w:lvl w:ilvl="2"><w:start w:val="1"/><w:numFmt w:val="lowerRoman"/><w:lvlText w:val="%3."/></w:lvl>
      </w:abstractNum>
      <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
    </w:numbering>"#;

    #[test]
    fn decimal_letter_roman_sequence() {
        let model = model(THREE_LEVELS);
        let mut r = MarkerRenderer::new(&model);
        assert_eq!(r.next_marker(1, 0), "1)");
        assert_eq!(r.next_marker(1, 1), "a)");
        assert_eq!(r.next_marker(1, 1), "b)");
        assert_eq!(r.next_marker(1, 2), "i.");
        assert_eq!(r.next_marker(1, 2), "ii.");
    }

    #[test]
    fn deeper_counters_restart_after_shallower_item() {
        let model = model(THREE_LEVELS);
        let mut r = MarkerRenderer::new(&model);
        r.next_marker(1, 0); // 1)
        r.next_marker(1, 1); // a)
        r.next_marker(1, 1); // b)
        assert_eq!(r.next_marker(1, 0), "2)");
        assert_eq!(r.next_marker(1, 1), "a)");
    }

    #[test]
    fn unknown_num_id_renders_empty() {
        let model = model(THREE_LEVELS);
        let mut r = MarkerRenderer::new(&model);
        assert_eq!(r.next_marker(99, 0), "");
    }

    #[test]
    fn multi_level_lvl_text_uses_ancestor_counters() {
        let xml = r#"<?xml version="1.0"?><w:numbering>
          <w:abstractNum w:abstractNumId="0">
            <w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/></w:lvl>
            <w:lvl w:ilvl="1"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1.%2."/></w:lvl>
          </w:abstractNum>
          <w:num w:numId="5"><w:abstractNumId w:val="0"/></w:num>
        </w:numbering>"#;
        let model = model(xml);
        let mut r = MarkerRenderer::new(&model);
        assert_eq!(r.next_marker(5, 0), "1.");
        assert_eq!(r.next_marker(5, 1), "1.1.");
        assert_eq!(r.next_marker(5, 1), "1.2.");
        assert_eq!(r.next_marker(5, 0), "2.");
        assert_eq!(r.next_marker(5, 1), "2.1.");
    }

    #[test]
    fn start_override_shifts_the_first_value() {
        let xml = r#"<?xml version="1.0"?><w:numbering>
          <w:abstractNum w:abstractNumId="0">
            <w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/></w:lvl>
          </w:abstractNum>
          <w:num w:numId="2">
            <w:abstractNumId w:val="0"/>
            <w:lvlOverride w:ilvl="0"><w:startOverride w:val="4"/></w:lvlOverride>
          </w:num>
        </w:numbering>"#;
        let model = model(xml);
        let mut r = MarkerRenderer::new(&model);
        assert_eq!(r.next_marker(2, 0), "4.");
        assert_eq!(r.next_marker(2, 0), "5.");
    }

    #[test]
    fn bullet_renders_the_literal_and_none_renders_empty() {
        let xml = r#"<?xml version="1.0"?><w:numbering>
          <w:abstractNum w:abstractNumId="0">
            <w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="-"/></w:lvl>
            <w:lvl w:ilvl="1"><w:start w:val="1"/><w:numFmt w:val="none"/><w:lvlText w:val="%2"/></w:lvl>
          </w:abstractNum>
          <w:num w:numId="3"><w:abstractNumId w:val="0"/></w:num>
        </w:numbering>"#;
        let model = model(xml);
        let mut r = MarkerRenderer::new(&model);
        assert_eq!(r.next_marker(3, 0), "-");
        assert_eq!(r.next_marker(3, 1), "");
    }

    #[test]
    fn letters_roll_over_past_z() {
        assert_eq!(super::to_letters(1, false), "a");
        assert_eq!(super::to_letters(26, false), "z");
        assert_eq!(super::to_letters(27, false), "aa");
        assert_eq!(super::to_letters(28, true), "AB");
    }

    #[test]
    fn roman_numerals() {
        assert_eq!(super::to_roman(4, false), "iv");
        assert_eq!(super::to_roman(9, false), "ix");
        assert_eq!(super::to_roman(14, true), "XIV");
        assert_eq!(super::to_roman(1990, false), "mcmxc");
    }

    #[test]
    fn level_jump_renders_ancestors_at_start_values() {
        let xml = r#"<?xml version="1.0"?><w:numbering>
          <w:abstractNum w:abstractNumId="0">
            <w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/></w:lvl>
            <w:lvl w:ilvl="1"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1.%2"/></w:lvl>
          </w:abstractNum>
          <w:num w:numId="7"><w:abstractNumId w:val="0"/></w:num>
        </w:numbering>"#;
        let model = model(xml);
        let mut r = MarkerRenderer::new(&model);
        // First item arrives already at level 1; level 0 shows its start.
        assert_eq!(r.next_marker(7, 1), "1.1");
    }
}
