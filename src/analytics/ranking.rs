use super::artifacts::{rank_counts, LabeledCount, PostRow};
use crate::models::EnrichedRecord;
use std::cmp::Reverse;

/// 上位n件のハッシュタグ
pub fn top_hashtags(records: &[EnrichedRecord], n: usize) -> Vec<LabeledCount> {
    rank_counts(records.iter().flat_map(|r| r.hashtags.iter().cloned()), n)
}

/// 上位n件のメンション
pub fn top_mentions(records: &[EnrichedRecord], n: usize) -> Vec<LabeledCount> {
    rank_counts(records.iter().flat_map(|r| r.mentions.iter().cloned()), n)
}

/// いいね数の上位n件（いいね数が欠損している投稿は対象外）
pub fn top_by_likes(records: &[EnrichedRecord], n: usize) -> Vec<PostRow> {
    let mut candidates: Vec<(u64, &EnrichedRecord)> = records
        .iter()
        .filter_map(|r| r.favorite_count.map(|likes| (likes, r)))
        .collect();

    // 安定ソート：同数は元の順序
    candidates.sort_by_key(|(likes, _)| Reverse(*likes));

    candidates
        .into_iter()
        .take(n)
        .map(|(_, record)| PostRow::from(record))
        .collect()
}

/// リツイート数→いいね数の順で並べた上位n件
///
/// リツイート数が欠損している投稿は対象外、いいね数の欠損はどの値よりも
/// 下位として扱います。
pub fn top_engaged(records: &[EnrichedRecord], n: usize) -> Vec<PostRow> {
    let mut candidates: Vec<(u64, Option<u64>, &EnrichedRecord)> = records
        .iter()
        .filter_map(|r| r.retweets_count.map(|retweets| (retweets, r.favorite_count, r)))
        .collect();

    // Option の順序は None < Some なので欠損は最下位になる
    candidates.sort_by_key(|(retweets, likes, _)| (Reverse(*retweets), Reverse(*likes)));

    candidates
        .into_iter()
        .take(n)
        .map(|(_, _, record)| PostRow::from(record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::derive;
    use crate::models::RawRecord;

    fn post(id: &str, text: &str, retweets: Option<u64>, likes: Option<u64>) -> EnrichedRecord {
        derive(
            RawRecord::new(id, "2016-01-01 10:00:00", text, "web").with_counts(retweets, likes),
        )
    }

    fn ids(rows: &[PostRow]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_top_hashtags_and_mentions() {
        let records = vec![
            post("1", "#a #b @x", None, None),
            post("2", "#b #c @y @x", None, None),
            post("3", "#c #c", None, None),
        ];

        let tags = top_hashtags(&records, 10);
        let pairs: Vec<(&str, usize)> = tags.iter().map(|c| (c.key.as_str(), c.count)).collect();
        assert_eq!(pairs, vec![("c", 3), ("b", 2), ("a", 1)]);

        let mentions = top_mentions(&records, 1);
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].key, "x");
        assert_eq!(mentions[0].count, 2);
    }

    #[test]
    fn test_top_by_likes_ordering_and_ties() {
        let records = vec![
            post("1", "", None, Some(5)),
            post("2", "", None, Some(9)),
            post("3", "", None, None),
            post("4", "", None, Some(5)),
            post("5", "", None, Some(1)),
        ];
        assert_eq!(ids(&top_by_likes(&records, 10)), vec!["2", "1", "4", "5"]);
        assert_eq!(ids(&top_by_likes(&records, 2)), vec!["2", "1"]);
    }

    #[test]
    fn test_top_by_likes_keeps_display_fields() {
        let records = vec![post("1", "hello world", Some(2), Some(7))];
        let rows = top_by_likes(&records, 10);
        assert_eq!(rows[0].text, "hello world");
        assert_eq!(rows[0].favorite_count, Some(7));
        assert_eq!(rows[0].retweets_count, Some(2));
        assert!(rows[0].created_at.is_some());
    }

    #[test]
    fn test_top_engaged_multi_key() {
        let records = vec![
            post("1", "", Some(10), Some(1)),
            post("2", "", Some(10), Some(50)),
            post("3", "", Some(20), None),
            post("4", "", None, Some(999)),
            post("5", "", Some(10), None),
            post("6", "", Some(10), Some(50)),
        ];
        assert_eq!(ids(&top_engaged(&records, 10)), vec!["3", "2", "6", "1", "5"]);
    }

    #[test]
    fn test_top_n_bounds() {
        let records = vec![
            post("1", "#a", Some(1), Some(1)),
            post("2", "#b", Some(2), Some(2)),
        ];
        assert!(top_by_likes(&records, 10).len() <= records.len());
        assert_eq!(top_engaged(&records, 1).len(), 1);
        assert!(top_hashtags(&records, 0).is_empty());

        assert!(top_by_likes(&[], 10).is_empty());
        assert!(top_engaged(&[], 10).is_empty());
        assert!(top_hashtags(&[], 10).is_empty());
        assert!(top_mentions(&[], 10).is_empty());
    }
}
