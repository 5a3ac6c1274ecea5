//! 英語投稿向けの辞書ベース感情分析
//!
//! 単語ごとの極性値を平均し、-1.0から1.0の範囲に収めます。直前の強化語で
//! 極性を強め、直前2語以内の否定語で極性を反転（半減）させます。絵文字も
//! 単語と同様に極性値として扱います。

use std::collections::{HashMap, HashSet};

/// 強化語による倍率
const INTENSITY_MULTIPLIER: f64 = 1.3;
/// 否定語による倍率
const NEGATION_MULTIPLIER: f64 = -0.5;
/// 否定語を探す範囲（直前の語数）
const NEGATION_WINDOW: usize = 2;

/// 感情分析エンジン
#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    /// 単語の極性辞書
    lexicon: HashMap<&'static str, f64>,
    /// 絵文字の極性
    emoji_polarity: Vec<(&'static str, f64)>,
    /// 感情強化語
    intensifiers: HashSet<&'static str>,
    /// 否定語
    negations: HashSet<&'static str>,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer {
    /// 新しい感情分析エンジンを作成
    pub fn new() -> Self {
        Self {
            lexicon: Self::build_lexicon(),
            emoji_polarity: Self::build_emoji_polarity(),
            intensifiers: [
                "very",
                "really",
                "extremely",
                "so",
                "truly",
                "highly",
                "deeply",
                "most",
                "super",
                "incredibly",
                "absolutely",
                "immensely",
            ]
            .into_iter()
            .collect(),
            negations: [
                "not", "no", "never", "nor", "neither", "without", "hardly", "barely", "cannot",
            ]
            .into_iter()
            .collect(),
        }
    }

    fn build_lexicon() -> HashMap<&'static str, f64> {
        [
            // ポジティブ
            ("good", 0.7),
            ("great", 0.8),
            ("excellent", 1.0),
            ("wonderful", 1.0),
            ("amazing", 0.6),
            ("awesome", 1.0),
            ("best", 1.0),
            ("better", 0.5),
            ("happy", 0.8),
            ("glad", 0.5),
            ("joy", 0.8),
            ("love", 0.5),
            ("loved", 0.7),
            ("beautiful", 0.85),
            ("proud", 0.8),
            ("congratulations", 0.7),
            ("congrats", 0.7),
            ("thank", 0.4),
            ("thanks", 0.4),
            ("grateful", 0.6),
            ("blessed", 0.6),
            ("success", 0.6),
            ("successful", 0.75),
            ("win", 0.8),
            ("victory", 0.7),
            ("brilliant", 0.9),
            ("fantastic", 0.4),
            ("inspiring", 0.5),
            ("positive", 0.2),
            ("nice", 0.6),
            ("warm", 0.6),
            ("kind", 0.6),
            ("hope", 0.3),
            ("welcome", 0.8),
            ("strong", 0.4),
            ("peace", 0.5),
            ("prosperity", 0.6),
            ("progress", 0.4),
            ("delighted", 0.7),
            ("pleased", 0.5),
            ("greetings", 0.3),
            ("wishes", 0.3),
            ("outstanding", 0.9),
            ("remarkable", 0.75),
            ("historic", 0.4),
            ("grand", 0.5),
            ("fine", 0.4),
            ("healthy", 0.5),
            ("special", 0.35),
            ("enjoy", 0.4),
            // ネガティブ
            ("bad", -0.7),
            ("worse", -0.4),
            ("worst", -1.0),
            ("terrible", -1.0),
            ("horrible", -1.0),
            ("awful", -1.0),
            ("sad", -0.5),
            ("saddened", -0.6),
            ("pain", -0.6),
            ("painful", -0.7),
            ("tragic", -0.75),
            ("tragedy", -0.75),
            ("condolences", -0.3),
            ("grief", -0.7),
            ("loss", -0.5),
            ("angry", -0.5),
            ("hate", -0.8),
            ("poor", -0.4),
            ("wrong", -0.5),
            ("fail", -0.5),
            ("failed", -0.5),
            ("failure", -0.6),
            ("corrupt", -0.7),
            ("corruption", -0.6),
            ("attack", -0.6),
            ("violence", -0.7),
            ("terror", -0.8),
            ("terrorism", -0.8),
            ("disaster", -0.8),
            ("unfortunate", -0.5),
            ("shameful", -0.8),
            ("dangerous", -0.6),
            ("difficult", -0.5),
            ("crisis", -0.5),
            ("dead", -0.2),
            ("death", -0.4),
            ("injured", -0.5),
            ("ugly", -0.7),
            ("boring", -1.0),
            ("disappointed", -0.75),
            ("disappointing", -0.6),
            ("worried", -0.5),
            ("fear", -0.6),
            ("cruel", -1.0),
        ]
        .into_iter()
        .collect()
    }

    fn build_emoji_polarity() -> Vec<(&'static str, f64)> {
        vec![
            ("😊", 0.8),
            ("😀", 0.9),
            ("😄", 0.9),
            ("😍", 0.9),
            ("👍", 0.8),
            ("👏", 0.8),
            ("🎉", 0.9),
            ("❤️", 0.9),
            ("🙏", 0.5),
            ("😢", -0.8),
            ("😭", -0.9),
            ("😞", -0.7),
            ("😡", -0.9),
            ("👎", -0.8),
            ("💔", -0.9),
        ]
    }

    fn is_negation(&self, token: &str) -> bool {
        self.negations.contains(token) || token.ends_with("n't")
    }

    /// テキストの極性を計算（-1.0 to 1.0、該当語がなければ0.0）
    pub fn polarity(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }

        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '_'))
            .map(|t| t.trim_matches('\''))
            .filter(|t| !t.is_empty())
            .collect();

        let mut scores = Vec::new();

        for (index, token) in tokens.iter().enumerate() {
            let Some(&base) = self.lexicon.get(token) else {
                continue;
            };

            let mut value = base;

            if index > 0 && self.intensifiers.contains(tokens[index - 1]) {
                value *= INTENSITY_MULTIPLIER;
            }

            let window_start = index.saturating_sub(NEGATION_WINDOW);
            if tokens[window_start..index]
                .iter()
                .any(|previous| self.is_negation(previous))
            {
                value *= NEGATION_MULTIPLIER;
            }

            scores.push(value.clamp(-1.0, 1.0));
        }

        for (emoji, polarity) in &self.emoji_polarity {
            let count = text.matches(emoji).count();
            scores.extend(std::iter::repeat(*polarity).take(count));
        }

        if scores.is_empty() {
            return 0.0;
        }

        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}
