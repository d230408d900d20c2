//! Arabic diacritic stripping.
//!
//! The verse corpus is stored without tashkeel, while speech recognisers
//! trained on vocalised text often emit it.  [`normalize_arabic`] removes the
//! marks listed below and collapses runs of whitespace so both sides compare
//! on bare letters.
//!
//! | Range           | Marks |
//! |-----------------|-------|
//! | U+0610 – U+061A | Quranic honorifics and small letters |
//! | U+064B – U+065F | Tanween, harakat, shadda, sukun, madda/hamza above-below |
//! | U+0670          | Superscript alef |
//! | U+06D6 – U+06ED | Quranic annotation and pause marks |
//! | U+0640          | Tatweel (kashida) |

// ---------------------------------------------------------------------------
// Unicode ranges
// ---------------------------------------------------------------------------

const QURANIC_SIGNS: std::ops::RangeInclusive<char> = '\u{0610}'..='\u{061A}';
const HARAKAT: std::ops::RangeInclusive<char> = '\u{064B}'..='\u{065F}';
const SUPERSCRIPT_ALEF: char = '\u{0670}';
const ANNOTATION_MARKS: std::ops::RangeInclusive<char> = '\u{06D6}'..='\u{06ED}';
const TATWEEL: char = '\u{0640}';

/// Small high/low letters inside the annotation block that are real letters,
/// not marks (U+06E5 small waw, U+06E6 small yeh).
const ANNOTATION_LETTERS: [char; 2] = ['\u{06E5}', '\u{06E6}'];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// `true` for code points [`normalize_arabic`] removes.
pub fn is_arabic_mark(c: char) -> bool {
    QURANIC_SIGNS.contains(&c)
        || HARAKAT.contains(&c)
        || c == SUPERSCRIPT_ALEF
        || c == TATWEEL
        || (ANNOTATION_MARKS.contains(&c) && !ANNOTATION_LETTERS.contains(&c))
}

/// Strip tashkeel and tatweel, then collapse whitespace to single spaces.
///
/// ```
/// use recitation_tracker::text::normalize_arabic;
///
/// assert_eq!(normalize_arabic("بِسْمِ  ٱللَّهِ"), "بسم ٱلله");
/// ```
pub fn normalize_arabic(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !is_arabic_mark(*c)).collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
