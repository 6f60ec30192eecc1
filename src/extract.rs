//! Raw field extraction from Kanjipedia character and word pages.
//!
//! Fields that live in a fixed element are located with CSS selectors; fields
//! that are only identifiable by the marker image or label preceding them are
//! located with regexes over the raw markup. Nothing here interprets reading
//! or meaning text beyond locating it.

use crate::error::{CollateError, Result};
use crate::level::KankenLevel;
use crate::origin::GlyphOrigin;
use crate::tables::ReferenceTables;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::path::Path;

/// Inline marker standing in for a line break in flattened text.
pub const LINE_BREAK: &str = "<br>";

lazy_static! {
    // Headword glyph images: std_ codes are codepoints, nw_ codes need the table
    static ref HEADWORD_IMAGE_SRC: Regex = Regex::new(r"/common/images/kanji/180/(nw|std)_([^./]+)\.png").unwrap();
    // Only numeric labels, so banners like "漢検1級" are skipped
    static ref LEVEL_BADGE: Regex = Regex::new(r#"alt="(準?[0-9０-９]{1,2})級""#).unwrap();

    // Reading blocks follow their category icon
    static ref ON_BLOCK: Regex = Regex::new(r#"(?s)<img[^>]*src="/common/images/icon_on\.png"[^>]*>.*?<p class="onkunYomi">(.*?)</p>"#).unwrap();
    static ref KUN_BLOCK: Regex = Regex::new(r#"(?s)<img[^>]*src="/common/images/icon_kun\.png"[^>]*>.*?<p class="onkunYomi">(.*?)</p>"#).unwrap();

    // Trivia
    static ref STROKE_COUNT: Regex = Regex::new(r"画数：\((\d+)\)").unwrap();
    static ref RADICAL_STROKE_COUNT: Regex = Regex::new(r"部首内画数(\d+)").unwrap();

    // The paragraph after the 新字源 link explains the glyph origin
    static ref SHINJIGEN_EXPLANATION: Regex = Regex::new(r#"(?s)<a[^>]*href="https://promo\.kadokawa\.co\.jp/shinjigen/"[^>]*>.*?</a>.*?<p(?:\s[^>]*)?>(.*?)</p>"#).unwrap();

    // Word pages
    static ref INLINE_GAIJI: Regex = Regex::new(r#"<img[^>]*src="/common/images/kanji/\d+/std_([^./"]+)\.png"[^>]*>"#).unwrap();
    static ref SPELLING_NOTE: Regex = Regex::new(r"(?s)<sup>.*?</sup>").unwrap();
    static ref COLUMN_RUBRIC: Regex = Regex::new(r"■コラムを読んでみよう\n.+").unwrap();
    static ref USAGE_SYMBOLS: Regex = Regex::new(r"[▲△〈〉]").unwrap();
    static ref ATEJI_JUKUJIKUN: Regex = Regex::new(r"〈.+〉").unwrap();
}

/// Every field of a character page, before readings and meanings are parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCharacterFields {
    pub character: String,
    pub level: KankenLevel,
    pub is_national_coinage: bool,
    /// Inner markup of the on'yomi block, verbatim.
    pub on_block: String,
    /// Inner markup of the kun'yomi block, verbatim. Empty when absent.
    pub kun_block: String,
    pub radical: String,
    pub stroke_count: u32,
    pub radical_stroke_count: u32,
    pub meaning_block: String,
    pub glyph_origin: GlyphOrigin,
}

/// Every field of a word page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawWordFields {
    /// Headword with usage symbols removed.
    pub word: String,
    pub reading: String,
    pub is_irregular_reading: bool,
    pub meaning_block: String,
}

pub fn extract_character_fields(markup: &str, tables: &ReferenceTables) -> Result<RawCharacterFields> {
    let document = Html::parse_document(markup);

    let character = resolve_headword(&document, tables)?;
    let level = extract_level(markup)?;
    let is_national_coinage =
        select_first(&document, r#"img[src="/common/images/icon_kokuji.gif"]"#).is_some();

    let on_block = capture_block(&ON_BLOCK, markup);
    let kun_block = capture_block(&KUN_BLOCK, markup);

    let radical_code = select_first(&document, "p.kanjiBushu img")
        .and_then(|img| img.value().attr("src"))
        .and_then(image_stem)
        .ok_or(CollateError::MissingField("radical image"))?;
    let radical = tables.radical(&radical_code)?.to_string();

    let stroke_count = capture_count(&STROKE_COUNT, markup)
        .filter(|&n| n > 0)
        .ok_or(CollateError::MissingField("stroke count"))?;
    let radical_stroke_count = capture_count(&RADICAL_STROKE_COUNT, markup)
        .ok_or(CollateError::MissingField("radical stroke count"))?;

    let meaning_block = select_first(&document, "#kanjiRightSection div")
        .map(|div| encode_line_breaks(element_text(div).trim()))
        .ok_or(CollateError::MissingField("meaning"))?;

    let explanation = SHINJIGEN_EXPLANATION
        .captures(markup)
        .map(|cap| fragment_text(&cap[1]));
    let glyph_origin = GlyphOrigin::from_explanation(explanation.as_deref());

    Ok(RawCharacterFields {
        character,
        level,
        is_national_coinage,
        on_block,
        kun_block,
        radical,
        stroke_count,
        radical_stroke_count,
        meaning_block,
        glyph_origin,
    })
}

pub fn extract_word_fields(markup: &str, tables: &ReferenceTables) -> Result<RawWordFields> {
    let document = Html::parse_document(markup);
    let paragraphs = select_all(&document, "#kotobaArea p");
    let headword = word_headword(&paragraphs, tables)?;

    let reading = paragraphs
        .get(1)
        .map(|p| element_text(*p).trim().to_string())
        .ok_or(CollateError::MissingField("word reading"))?;

    let meaning = select_first(&document, "#kotobaExplanationSection")
        .map(element_text)
        .ok_or(CollateError::MissingField("meaning"))?;
    let meaning = COLUMN_RUBRIC.replace_all(meaning.trim(), "");
    let meaning_block = encode_line_breaks(meaning.trim());

    Ok(RawWordFields {
        is_irregular_reading: has_ateji_or_jukujikun(&headword),
        word: strip_usage_symbols(&headword),
        reading,
        meaning_block,
    })
}

/// The four-character idiom (yojijukugo) a word page is headed by: the last
/// four word characters of the headword once usage symbols are removed.
pub fn extract_four_character_headword(markup: &str, tables: &ReferenceTables) -> Result<String> {
    let document = Html::parse_document(markup);
    let headword = word_headword(&select_all(&document, "#kotobaArea p"), tables)?;
    let headword = strip_usage_symbols(&headword);

    let trailing: Vec<char> = headword
        .chars()
        .rev()
        .take_while(|c| c.is_alphanumeric())
        .take(4)
        .collect();
    if trailing.len() < 4 {
        return Err(CollateError::MissingField("four-character headword"));
    }
    Ok(trailing.into_iter().rev().collect())
}

/// Headword text of a word page, spelling notes dropped and glyph images
/// resolved. Usage symbols are left in place.
fn word_headword(paragraphs: &[ElementRef<'_>], tables: &ReferenceTables) -> Result<String> {
    let headword_html = paragraphs
        .first()
        .map(|p| p.inner_html())
        .ok_or(CollateError::MissingField("word headword"))?;
    let headword_html = SPELLING_NOTE.replace_all(&headword_html, "");
    let headword = fragment_text(&resolve_inline_glyphs(&headword_html, tables)?)
        .trim()
        .to_string();
    if headword.is_empty() {
        return Err(CollateError::UnresolvableHeadword("empty word headword".to_string()));
    }
    Ok(headword)
}

/// Prefer the headword text; fall back to the glyph image when the character
/// is outside what the site can render as text.
fn resolve_headword(document: &Html, tables: &ReferenceTables) -> Result<String> {
    let oyaji = select_first(document, "#kanjiOyaji").ok_or_else(|| {
        CollateError::UnresolvableHeadword("no headword element".to_string())
    })?;

    let text = element_text(oyaji);
    let text = text.trim();
    if !text.is_empty() {
        return Ok(text.to_string());
    }

    let src = oyaji
        .select(&Selector::parse("img").map_err(|_| {
            CollateError::UnresolvableHeadword("no headword image".to_string())
        })?)
        .find_map(|img| img.value().attr("src"))
        .ok_or_else(|| CollateError::UnresolvableHeadword("no headword text or image".to_string()))?;

    let cap = HEADWORD_IMAGE_SRC.captures(src).ok_or_else(|| {
        CollateError::UnresolvableHeadword(format!("unrecognised headword image {:?}", src))
    })?;
    match &cap[1] {
        "std" => tables.resolve_standard_image(&cap[2]),
        _ => tables.resolve_alternate_image(&cap[2]),
    }
}

fn extract_level(markup: &str) -> Result<KankenLevel> {
    let cap = LEVEL_BADGE
        .captures(markup)
        .ok_or(CollateError::MissingField("level badge"))?;
    cap[1].parse()
}

/// Replace glyph images embedded in word headwords with their characters.
fn resolve_inline_glyphs(html: &str, tables: &ReferenceTables) -> Result<String> {
    let mut resolved = String::with_capacity(html.len());
    let mut last = 0;
    for cap in INLINE_GAIJI.captures_iter(html) {
        let Some(whole) = cap.get(0) else { continue };
        resolved.push_str(&html[last..whole.start()]);
        resolved.push_str(&tables.resolve_standard_image(&cap[1])?);
        last = whole.end();
    }
    resolved.push_str(&html[last..]);
    Ok(resolved)
}

/// Remove ▲ (reading outside the jōyō list), △ (non-jōyō character) and the
/// 〈〉 brackets around ateji/jukujikun spellings.
pub fn strip_usage_symbols(headword: &str) -> String {
    USAGE_SYMBOLS.replace_all(headword, "").into_owned()
}

pub fn has_ateji_or_jukujikun(headword: &str) -> bool {
    ATEJI_JUKUJIKUN.is_match(headword)
}

fn capture_block(pattern: &Regex, markup: &str) -> String {
    pattern
        .captures(markup)
        .map(|cap| cap[1].trim().to_string())
        .unwrap_or_default()
}

fn capture_count(pattern: &Regex, markup: &str) -> Option<u32> {
    pattern.captures(markup)?[1].parse().ok()
}

/// `/common/images/bushu/039.png` -> `039`
fn image_stem(src: &str) -> Option<String> {
    Path::new(src)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

fn encode_line_breaks(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', LINE_BREAK)
}

fn select_first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    document.select(&selector).next()
}

fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Text content of a markup fragment, with tags dropped and entities decoded.
pub fn fragment_text(html: &str) -> String {
    Html::parse_fragment(html).root_element().text().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, CharacterPage, WordPage};

    #[test]
    fn text_headword_is_used_directly() {
        let fields = extract_character_fields(&CharacterPage::default().render(), &fixtures::tables()).unwrap();
        assert_eq!(fields.character, "字");
    }

    #[test]
    fn standard_image_headword_uses_codepoint() {
        let page = CharacterPage {
            headword: r#"<img src="/common/images/kanji/180/std_4E00.png">"#.into(),
            ..CharacterPage::default()
        };
        let fields = extract_character_fields(&page.render(), &fixtures::tables()).unwrap();
        assert_eq!(fields.character, "一");
    }

    #[test]
    fn exception_code_overrides_codepoint() {
        let page = CharacterPage {
            headword: r#"<img src="/common/images/kanji/180/std_E001.png">"#.into(),
            ..CharacterPage::default()
        };
        let fields = extract_character_fields(&page.render(), &fixtures::tables()).unwrap();
        assert_eq!(fields.character, "𠮟");
    }

    #[test]
    fn alternate_image_headword_uses_table() {
        let page = CharacterPage {
            headword: r#"<img src="/common/images/kanji/180/nw_00042.png">"#.into(),
            ..CharacterPage::default()
        };
        let fields = extract_character_fields(&page.render(), &fixtures::tables()).unwrap();
        assert_eq!(fields.character, "嘘");

        let page = CharacterPage {
            headword: r#"<img src="/common/images/kanji/180/nw_99999.png">"#.into(),
            ..CharacterPage::default()
        };
        assert!(matches!(
            extract_character_fields(&page.render(), &fixtures::tables()),
            Err(CollateError::LookupMiss { table: "headword images", .. })
        ));
    }

    #[test]
    fn empty_headword_is_unresolvable() {
        let page = CharacterPage {
            headword: String::new(),
            ..CharacterPage::default()
        };
        assert!(matches!(
            extract_character_fields(&page.render(), &fixtures::tables()),
            Err(CollateError::UnresolvableHeadword(_))
        ));
    }

    #[test]
    fn level_badge_maps_to_ordinal() {
        let fields = extract_character_fields(&CharacterPage::default().render(), &fixtures::tables()).unwrap();
        assert_eq!(fields.level, KankenLevel::Ten);

        let page = CharacterPage {
            level: "準1".into(),
            ..CharacterPage::default()
        };
        let fields = extract_character_fields(&page.render(), &fixtures::tables()).unwrap();
        assert_eq!(fields.level, KankenLevel::PreOne);
    }

    #[test]
    fn unknown_level_fails() {
        let page = CharacterPage {
            level: "準3".into(),
            ..CharacterPage::default()
        };
        assert!(matches!(
            extract_character_fields(&page.render(), &fixtures::tables()),
            Err(CollateError::UnknownLevel(_))
        ));
    }

    #[test]
    fn kokuji_icon_sets_flag() {
        let fields = extract_character_fields(&CharacterPage::default().render(), &fixtures::tables()).unwrap();
        assert!(!fields.is_national_coinage);

        let page = CharacterPage {
            kokuji: true,
            ..CharacterPage::default()
        };
        let fields = extract_character_fields(&page.render(), &fixtures::tables()).unwrap();
        assert!(fields.is_national_coinage);
    }

    #[test]
    fn reading_blocks_are_verbatim() {
        let page = CharacterPage {
            kun: r#"あざ、あざ<span class="txtNormal">な</span>"#.into(),
            ..CharacterPage::default()
        };
        let fields = extract_character_fields(&page.render(), &fixtures::tables()).unwrap();
        assert_eq!(fields.on_block, "ジ");
        assert_eq!(fields.kun_block, r#"あざ、あざ<span class="txtNormal">な</span>"#);
    }

    #[test]
    fn missing_kun_block_is_empty() {
        let page = CharacterPage {
            kun_section: false,
            ..CharacterPage::default()
        };
        let fields = extract_character_fields(&page.render(), &fixtures::tables()).unwrap();
        assert_eq!(fields.kun_block, "");
    }

    #[test]
    fn trivia_fields() {
        let fields = extract_character_fields(&CharacterPage::default().render(), &fixtures::tables()).unwrap();
        assert_eq!(fields.radical, "子");
        assert_eq!(fields.stroke_count, 6);
        assert_eq!(fields.radical_stroke_count, 3);
    }

    #[test]
    fn unmapped_radical_is_lookup_miss() {
        let page = CharacterPage {
            radical_code: "999".into(),
            ..CharacterPage::default()
        };
        match extract_character_fields(&page.render(), &fixtures::tables()) {
            Err(CollateError::LookupMiss { table, key }) => {
                assert_eq!(table, "radical images");
                assert_eq!(key, "999");
            }
            other => panic!("expected LookupMiss, got {:?}", other),
        }
    }

    #[test]
    fn missing_stroke_count_fails() {
        let page = CharacterPage {
            strokes: false,
            ..CharacterPage::default()
        };
        assert!(matches!(
            extract_character_fields(&page.render(), &fixtures::tables()),
            Err(CollateError::MissingField("stroke count"))
        ));
    }

    #[test]
    fn zero_stroke_count_fails() {
        let markup = CharacterPage::default().render().replace("総画数：(6)", "総画数：(0)");
        assert!(matches!(
            extract_character_fields(&markup, &fixtures::tables()),
            Err(CollateError::MissingField("stroke count"))
        ));
    }

    #[test]
    fn missing_radical_stroke_count_fails() {
        let markup = CharacterPage::default().render().replace("部首内画数3", "");
        assert!(matches!(
            extract_character_fields(&markup, &fixtures::tables()),
            Err(CollateError::MissingField("radical stroke count"))
        ));
    }

    #[test]
    fn missing_radical_image_fails() {
        let markup = CharacterPage::default()
            .render()
            .replace(r#"<img src="/common/images/bushu/039.png" alt="">"#, "");
        assert!(matches!(
            extract_character_fields(&markup, &fixtures::tables()),
            Err(CollateError::MissingField("radical image"))
        ));
    }

    #[test]
    fn radical_image_outside_its_paragraph_is_ignored() {
        let page = CharacterPage {
            origin: Some("形声。".into()),
            ..CharacterPage::default()
        };
        // the shinjigen banner image comes later in the page
        let markup = page
            .render()
            .replace(r#"<img src="/common/images/bushu/039.png" alt="">"#, "");
        assert!(matches!(
            extract_character_fields(&markup, &fixtures::tables()),
            Err(CollateError::MissingField("radical image"))
        ));
    }

    #[test]
    fn missing_level_badge_fails() {
        let markup = CharacterPage::default().render().replace(r#"alt="10級""#, r#"alt="""#);
        assert!(matches!(
            extract_character_fields(&markup, &fixtures::tables()),
            Err(CollateError::MissingField("level badge"))
        ));
    }

    #[test]
    fn non_numeric_alt_text_before_badge_is_skipped() {
        let markup = CharacterPage::default().render().replace(
            "<ul class=\"kanjiKentei\">",
            "<p><img src=\"/common/images/banner.png\" alt=\"漢検1級\"></p>\n<ul class=\"kanjiKentei\">",
        );
        let fields = extract_character_fields(&markup, &fixtures::tables()).unwrap();
        assert_eq!(fields.level, KankenLevel::Ten);
    }

    #[test]
    fn full_width_badge_label_parses() {
        let page = CharacterPage {
            level: "準２".into(),
            ..CharacterPage::default()
        };
        let fields = extract_character_fields(&page.render(), &fixtures::tables()).unwrap();
        assert_eq!(fields.level, KankenLevel::PreTwo);
    }

    #[test]
    fn missing_meaning_region_fails() {
        let markup = CharacterPage::default()
            .render()
            .replace(r#"id="kanjiRightSection""#, r#"id="kanjiNotes""#);
        assert!(matches!(
            extract_character_fields(&markup, &fixtures::tables()),
            Err(CollateError::MissingField("meaning"))
        ));
    }

    #[test]
    fn meaning_newlines_become_inline_breaks() {
        let page = CharacterPage {
            meaning: "\n①もじ。\n②あざな。\n".into(),
            ..CharacterPage::default()
        };
        let fields = extract_character_fields(&page.render(), &fixtures::tables()).unwrap();
        assert_eq!(fields.meaning_block, "①もじ。<br>②あざな。");
    }

    #[test]
    fn shinjigen_paragraph_is_arbitrary_origin() {
        let page = CharacterPage {
            origin: Some("形声。宀と、音符子とから成る。".into()),
            ..CharacterPage::default()
        };
        let fields = extract_character_fields(&page.render(), &fixtures::tables()).unwrap();
        assert_eq!(
            fields.glyph_origin,
            GlyphOrigin::Arbitrary {
                explanation: "形声。宀と、音符子とから成る。".into()
            }
        );
    }

    #[test]
    fn no_shinjigen_link_is_unknown_origin() {
        let fields = extract_character_fields(&CharacterPage::default().render(), &fixtures::tables()).unwrap();
        assert_eq!(fields.glyph_origin, GlyphOrigin::Unknown);
    }

    #[test]
    fn word_fields() {
        let fields = extract_word_fields(&WordPage::default().render(), &fixtures::tables()).unwrap();
        assert_eq!(fields.word, "文字");
        assert_eq!(fields.reading, "もじ");
        assert!(!fields.is_irregular_reading);
        assert_eq!(fields.meaning_block, "ことばを書き表す記号。<br>字。");
    }

    #[test]
    fn ateji_brackets_flag_and_strip() {
        let page = WordPage {
            headword: "〈海苔〉".into(),
            reading: "のり".into(),
            ..WordPage::default()
        };
        let fields = extract_word_fields(&page.render(), &fixtures::tables()).unwrap();
        assert_eq!(fields.word, "海苔");
        assert!(fields.is_irregular_reading);
    }

    #[test]
    fn usage_triangles_are_stripped_without_flag() {
        let page = WordPage {
            headword: "▲嘘△字".into(),
            ..WordPage::default()
        };
        let fields = extract_word_fields(&page.render(), &fixtures::tables()).unwrap();
        assert_eq!(fields.word, "嘘字");
        assert!(!fields.is_irregular_reading);
    }

    #[test]
    fn inline_gaiji_and_spelling_notes() {
        let page = WordPage {
            headword: r#"<img src="/common/images/kanji/30/std_4E00.png">字<sup>注</sup>"#.into(),
            ..WordPage::default()
        };
        let fields = extract_word_fields(&page.render(), &fixtures::tables()).unwrap();
        assert_eq!(fields.word, "一字");
    }

    #[test]
    fn column_rubric_is_removed() {
        let page = WordPage {
            meaning: "ことば。\n■コラムを読んでみよう\n文字の話".into(),
            ..WordPage::default()
        };
        let fields = extract_word_fields(&page.render(), &fixtures::tables()).unwrap();
        assert_eq!(fields.meaning_block, "ことば。");
    }

    #[test]
    fn word_page_without_reading_fails() {
        let markup = r#"<div id="kotobaArea"><p>文字</p></div><div id="kotobaExplanationSection">x</div>"#;
        assert!(matches!(
            extract_word_fields(markup, &fixtures::tables()),
            Err(CollateError::MissingField("word reading"))
        ));
    }

    #[test]
    fn four_character_headword_is_cleaned() {
        let page = WordPage {
            headword: "〈一期一会〉".into(),
            ..WordPage::default()
        };
        assert_eq!(
            extract_four_character_headword(&page.render(), &fixtures::tables()).unwrap(),
            "一期一会"
        );

        let page = WordPage {
            headword: r#"<img src="/common/images/kanji/30/std_4E00.png">期▲一会<sup>注</sup>"#.into(),
            ..WordPage::default()
        };
        assert_eq!(
            extract_four_character_headword(&page.render(), &fixtures::tables()).unwrap(),
            "一期一会"
        );
    }

    #[test]
    fn four_character_headword_takes_trailing_characters() {
        let page = WordPage {
            headword: "（故事）臥薪嘗胆".into(),
            ..WordPage::default()
        };
        assert_eq!(
            extract_four_character_headword(&page.render(), &fixtures::tables()).unwrap(),
            "臥薪嘗胆"
        );
    }

    #[test]
    fn short_headword_is_not_an_idiom() {
        assert!(matches!(
            extract_four_character_headword(&WordPage::default().render(), &fixtures::tables()),
            Err(CollateError::MissingField("four-character headword"))
        ));
    }

    #[test]
    fn usage_symbol_helpers() {
        assert_eq!(strip_usage_symbols("〈▲海苔〉"), "海苔");
        assert!(has_ateji_or_jukujikun("お〈神酒〉"));
        assert!(!has_ateji_or_jukujikun("神酒"));
    }
}
