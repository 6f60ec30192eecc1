//! Synthetic pages and reference data shared by the unit tests.

use crate::tables::{AccentRecord, ReadingSet, ReferenceData, ReferenceTables};
use std::collections::HashMap;

pub const DEFAULT_MEANING: &str = "もじ。ことばを書き表す記号。";

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

pub fn tables() -> ReferenceTables {
    ReferenceTables::new(
        HashMap::from([("00042".to_string(), "嘘".to_string())]),
        HashMap::from([("039".to_string(), "子".to_string())]),
        HashMap::from([("E001".to_string(), "𠮟".to_string())]),
    )
}

pub fn data() -> ReferenceData {
    let ji = ReadingSet {
        goon: strings(&["ジ"]),
        kanon: strings(&["シ"]),
        on: strings(&["ジ"]),
        kun: strings(&["あざ", "あざ-な"]),
        ..ReadingSet::default()
    };
    let accents = HashMap::from([(
        "文字".to_string(),
        AccentRecord {
            reading: "もじ".into(),
            accent: strings(&["1"]),
        },
    )]);
    ReferenceData::new(tables(), HashMap::from([("字".to_string(), ji)]), accents)
}

/// A character page in the reference site's layout.
#[derive(Debug, Clone)]
pub struct CharacterPage {
    pub headword: String,
    pub level: String,
    pub kokuji: bool,
    pub on: String,
    pub kun_section: bool,
    pub kun: String,
    pub radical_code: String,
    pub strokes: bool,
    pub meaning: String,
    pub origin: Option<String>,
}

impl Default for CharacterPage {
    fn default() -> Self {
        Self {
            headword: "字".into(),
            level: "10".into(),
            kokuji: false,
            on: "ジ".into(),
            kun_section: true,
            kun: "あざ".into(),
            radical_code: "039".into(),
            strokes: true,
            meaning: DEFAULT_MEANING.into(),
            origin: None,
        }
    }
}

impl CharacterPage {
    pub fn render(&self) -> String {
        let mut html = String::from("<html><head><title>漢字ペディア</title></head><body>\n");
        html.push_str("<div id=\"kanjiLeftSection\">\n");
        html.push_str(&format!("<p id=\"kanjiOyaji\">{}</p>\n", self.headword));
        html.push_str(&format!(
            "<ul class=\"kanjiKentei\"><li><img src=\"/common/images/kentei/{0}.png\" alt=\"{0}級\"></li></ul>\n",
            self.level
        ));
        if self.kokuji {
            html.push_str("<p><img src=\"/common/images/icon_kokuji.gif\" alt=\"国字\"></p>\n");
        }
        html.push_str("<div id=\"onkunList\">\n");
        html.push_str("<p><img src=\"/common/images/icon_on.png\" alt=\"音\"></p>\n");
        html.push_str(&format!("<p class=\"onkunYomi\">{}</p>\n", self.on));
        if self.kun_section {
            html.push_str("<p><img src=\"/common/images/icon_kun.png\" alt=\"訓\"></p>\n");
            html.push_str(&format!("<p class=\"onkunYomi\">{}</p>\n", self.kun));
        }
        html.push_str("</div>\n");
        html.push_str(&format!(
            "<p class=\"kanjiBushu\"><a href=\"/sakuin/bushu/{0}\"><img src=\"/common/images/bushu/{0}.png\" alt=\"\"></a></p>\n",
            self.radical_code
        ));
        if self.strokes {
            html.push_str("<p>総画数：(6)</p>\n<p>部首内画数3</p>\n");
        }
        html.push_str("</div>\n");
        html.push_str("<div id=\"kanjiRightSection\">\n<h3>意味</h3>\n");
        html.push_str(&format!("<div>\n{}\n</div>\n", self.meaning));
        if let Some(origin) = &self.origin {
            html.push_str(
                "<p class=\"shinjigen\"><a href=\"https://promo.kadokawa.co.jp/shinjigen/\" target=\"_blank\"><img src=\"/common/images/shinjigen.png\" alt=\"新字源\"></a></p>\n",
            );
            html.push_str(&format!("<p>{}</p>\n", origin));
        }
        html.push_str("</div>\n</body></html>\n");
        html
    }
}

/// A word page in the reference site's layout.
#[derive(Debug, Clone)]
pub struct WordPage {
    pub headword: String,
    pub reading: String,
    pub meaning: String,
}

impl Default for WordPage {
    fn default() -> Self {
        Self {
            headword: "文字".into(),
            reading: "もじ".into(),
            meaning: "ことばを書き表す記号。\n字。".into(),
        }
    }
}

impl WordPage {
    pub fn render(&self) -> String {
        format!(
            "<html><body>\n\
             <div id=\"kotobaArea\"><p class=\"kotobaTitle\">{}</p><p class=\"kotobaYomi\">{}</p></div>\n\
             <div id=\"kotobaExplanationSection\"><p>{}</p></div>\n\
             </body></html>\n",
            self.headword, self.reading, self.meaning
        )
    }
}
