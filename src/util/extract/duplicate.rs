//! 重复房源检测：电话号码包含 + 词集合相似度

use std::collections::HashSet;

use crate::model::PropertyRecord;

/// 相似度需严格大于该阈值
pub const DUPLICATE_THRESHOLD: f64 = 0.6;

/// 返回第一条被判定为重复的已有记录
///
/// 已有记录的电话号码只需"包含"候选号码即视为号码一致（非对称匹配）。
pub fn detect_duplicate<'a>(
    contact_number: Option<&str>,
    raw_message: &str,
    existing: &'a [PropertyRecord],
) -> Option<&'a PropertyRecord> {
    let contact = contact_number.filter(|c| !c.is_empty())?;
    let message = raw_message.to_lowercase();

    existing.iter().find(|record| {
        let Some(existing_contact) = record.document.fields.contact_number.as_deref() else {
            return false;
        };
        if existing_contact.is_empty() || !existing_contact.contains(contact) {
            return false;
        }
        let similarity = text_similarity(&message, &record.document.raw_message.to_lowercase());
        similarity > DUPLICATE_THRESHOLD
    })
}

/// 按空白切词后的 Jaccard 相似度，任一侧为空时为 0
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let left: HashSet<&str> = a.split_whitespace().collect();
    let right: HashSet<&str> = b.split_whitespace().collect();

    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let intersection = left.intersection(&right).count();
    let union = left.union(&right).count();
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PropertyDocument, PropertyFields};
    use chrono::Utc;

    fn existing(id: &str, contact: Option<&str>, message: &str) -> PropertyRecord {
        let now = Utc::now();
        PropertyRecord {
            id: id.to_string(),
            document: PropertyDocument {
                fields: PropertyFields {
                    contact_number: contact.map(str::to_string),
                    ..Default::default()
                },
                raw_message: message.to_string(),
                confidence_score: None,
                is_favorite: false,
                tags: vec![],
                image_id: None,
                image_filename: None,
                image_size: None,
                created_at: now,
                updated_at: now,
            },
        }
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(text_similarity("", "a b"), 0.0);
        assert_eq!(text_similarity("a b", "   "), 0.0);
        assert_eq!(text_similarity("a b c", "a b c"), 1.0);
        assert_eq!(text_similarity("a b", "c d"), 0.0);
        assert_eq!(text_similarity("a b c", "a b d"), 0.5);
    }

    #[test]
    fn test_duplicate_requires_contact() {
        let records = vec![existing("1", Some("9876543210"), "2bhk rent borivali")];
        assert!(detect_duplicate(None, "2bhk rent borivali", &records).is_none());
        assert!(detect_duplicate(Some(""), "2bhk rent borivali", &records).is_none());
    }

    #[test]
    fn test_duplicate_first_match_wins() {
        let records = vec![
            existing("1", None, "2bhk for rent in borivali west"),
            existing("2", Some("1111111111"), "2bhk for rent in borivali west"),
            existing("3", Some("+91 9876543210"), "2BHK for rent in Borivali West"),
            existing("4", Some("9876543210"), "2bhk for rent in borivali west"),
        ];
        let found = detect_duplicate(Some("9876543210"), "2bhk for rent in borivali west", &records);
        assert_eq!(found.map(|r| r.id.as_str()), Some("3"));
    }

    #[test]
    fn test_duplicate_below_threshold() {
        let records = vec![existing("1", Some("9876543210"), "shop for sale in dadar")];
        let found = detect_duplicate(Some("9876543210"), "2bhk for rent in borivali", &records);
        assert!(found.is_none());

        // 3/5 = 0.6，不算重复
        let records = vec![existing("1", Some("9876543210"), "a b c d")];
        let found = detect_duplicate(Some("9876543210"), "a b c e", &records);
        assert!(found.is_none());
    }

    #[test]
    fn test_containment_is_asymmetric() {
        let records = vec![existing("1", Some("9876543210"), "2bhk rent borivali")];
        let found = detect_duplicate(Some("+91 9876543210"), "2bhk rent borivali", &records);
        assert!(found.is_none());
    }
}
