//! # 한국어 제목 정렬
//!
//! 제목순(`sort=name`) 정렬에 쓰는 비교 함수입니다.
//! 한국어 로케일의 정렬 규칙을 따라 문자를 아래 그룹 순서로 비교합니다.
//!
//! ```text
//! 공백 < 문장부호/기호 < 숫자 < 한글 < 한자 < 라틴 문자 < 그 밖의 문자
//! ```
//!
//! - 한글 음절은 초성 → 중성 → 종성 순으로 비교합니다 (가나다순).
//!   홑자모(ㄱ, ㅏ)는 같은 초성의 음절보다 앞에 옵니다.
//! - 라틴 문자는 대소문자를 무시하고 비교한 뒤, 같으면 소문자가 먼저입니다.
//! - 비교 전에 NFC 정규화를 하므로 자모가 분리되어 저장된 제목도
//!   완성형 제목과 같은 위치에 정렬됩니다.

use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;

const HANGUL_BASE: u32 = 0xAC00;
const HANGUL_LAST: u32 = 0xD7A3;
const VOWEL_COUNT: u32 = 21;
const TAIL_COUNT: u32 = 28;

/// 호환 자모 자음(ㄱ~ㅎ)을 초성 순서로 나열한 표
const COMPAT_LEADS: [char; 19] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ', 'ㅋ',
    'ㅌ', 'ㅍ', 'ㅎ',
];

/// 스크립트 그룹. 선언 순서가 곧 정렬 순서입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Group {
    Space,
    Symbol,
    Digit,
    Hangul,
    Hanja,
    Latin,
    Other,
}

/// 두 제목을 한국어 규칙으로 비교합니다.
pub fn compare_ko(a: &str, b: &str) -> Ordering {
    let a: Vec<char> = a.nfc().collect();
    let b: Vec<char> = b.nfc().collect();

    let primary = a.iter().map(|&c| primary_key(c)).cmp(b.iter().map(|&c| primary_key(c)));
    if primary != Ordering::Equal {
        return primary;
    }

    let case = a.iter().map(|&c| case_key(c)).cmp(b.iter().map(|&c| case_key(c)));
    if case != Ordering::Equal {
        return case;
    }

    a.cmp(&b)
}

fn primary_key(c: char) -> (Group, u32) {
    let cp = c as u32;

    if c.is_whitespace() {
        return (Group::Space, cp);
    }
    if c.is_ascii_digit() {
        return (Group::Digit, cp);
    }
    if let Some(weight) = hangul_weight(c) {
        return (Group::Hangul, weight);
    }
    if is_hanja(cp) {
        return (Group::Hanja, cp);
    }
    if c.is_alphabetic() && cp < 0x0250 {
        // 대소문자 무시: 소문자로 접어서 비교
        let folded = c.to_lowercase().next().unwrap_or(c);
        return (Group::Latin, folded as u32);
    }
    if c.is_ascii_punctuation() || (!c.is_alphanumeric() && cp < 0x3000) {
        return (Group::Symbol, cp);
    }
    (Group::Other, cp)
}

/// 한글 음절/호환 자모의 정렬 가중치
///
/// 음절: `초성 * 10000 + (중성 + 1) * 100 + 종성`
/// 홑자음: 중성 자리를 0으로 두어 같은 초성의 음절보다 앞에 둡니다.
/// 홑모음: 모든 자음 뒤에 둡니다.
fn hangul_weight(c: char) -> Option<u32> {
    let cp = c as u32;
    if (HANGUL_BASE..=HANGUL_LAST).contains(&cp) {
        let index = cp - HANGUL_BASE;
        let lead = index / (VOWEL_COUNT * TAIL_COUNT);
        let vowel = (index % (VOWEL_COUNT * TAIL_COUNT)) / TAIL_COUNT;
        let tail = index % TAIL_COUNT;
        return Some(lead * 10_000 + (vowel + 1) * 100 + tail);
    }
    if let Some(lead) = COMPAT_LEADS.iter().position(|&l| l == c) {
        return Some(lead as u32 * 10_000);
    }
    // ㅏ(U+314F) ~ ㅣ(U+3163)
    if (0x314F..=0x3163).contains(&cp) {
        return Some(COMPAT_LEADS.len() as u32 * 10_000 + (cp - 0x314F));
    }
    None
}

fn is_hanja(cp: u32) -> bool {
    (0x4E00..=0x9FFF).contains(&cp)
        || (0x3400..=0x4DBF).contains(&cp)
        || (0xF900..=0xFAFF).contains(&cp)
}

/// 3차 비교: 소문자(0) < 대문자(1)
fn case_key(c: char) -> u8 {
    u8::from(c.is_uppercase())
}
