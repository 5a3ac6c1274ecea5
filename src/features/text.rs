//! 本文からのトークン抽出（ハッシュタグ・メンション・単語）

use regex::Regex;
use std::sync::LazyLock;

static HASHTAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([A-Za-z0-9_]+)").unwrap());

static MENTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_]+)").unwrap());

static WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

fn captures(regex: &Regex, text: &str) -> Vec<String> {
    regex
        .captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// ハッシュタグを出現順に抽出（`#` を除く、重複は保持）
pub fn extract_hashtags(text: &str) -> Vec<String> {
    captures(&HASHTAG_REGEX, text)
}

/// メンションを出現順に抽出（`@` を除く、重複は保持）
pub fn extract_mentions(text: &str) -> Vec<String> {
    captures(&MENTION_REGEX, text)
}

/// 単語トークン（Unicodeの単語文字の連続、大文字小文字はそのまま）
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    WORD_REGEX.find_iter(text).map(|m| m.as_str())
}

/// 文字数（バイト数ではない）
pub fn char_length(text: &str) -> usize {
    text.chars().count()
}
