//! 房源统计汇总

use serde::Serialize;
use std::collections::BTreeMap;

use super::property::PropertyRecord;

const RECENT_LIMIT: usize = 5;
const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Serialize)]
pub struct PropertyStats {
    pub total_properties: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_transaction: BTreeMap<String, usize>,
    pub favorites: usize,
    pub recent: Vec<PropertyRecord>,
}

impl PropertyStats {
    /// 从全部记录计算统计，缺失的类型计入 "Unknown"
    pub fn from_records(records: &[PropertyRecord]) -> Self {
        let mut by_type = BTreeMap::new();
        let mut by_transaction = BTreeMap::new();
        let mut favorites = 0;

        for record in records {
            let fields = &record.document.fields;
            let type_key = fields
                .property_type
                .map(|t| t.as_str())
                .unwrap_or(UNKNOWN)
                .to_string();
            *by_type.entry(type_key).or_insert(0) += 1;

            let transaction_key = fields
                .transaction_type
                .map(|t| t.as_str())
                .unwrap_or(UNKNOWN)
                .to_string();
            *by_transaction.entry(transaction_key).or_insert(0) += 1;

            if record.document.is_favorite {
                favorites += 1;
            }
        }

        let mut recent = records.to_vec();
        recent.sort_by(|a, b| b.document.created_at.cmp(&a.document.created_at));
        recent.truncate(RECENT_LIMIT);

        Self {
            total_properties: records.len(),
            by_type,
            by_transaction,
            favorites,
            recent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::property::{
        PropertyDocument, PropertyFields, PropertyType, TransactionType,
    };
    use chrono::{Duration, Utc};

    fn record(
        id: usize,
        property_type: Option<PropertyType>,
        transaction_type: Option<TransactionType>,
        favorite: bool,
    ) -> PropertyRecord {
        let created = Utc::now() + Duration::seconds(id as i64);
        PropertyRecord {
            id: id.to_string(),
            document: PropertyDocument {
                fields: PropertyFields {
                    property_type,
                    transaction_type,
                    ..Default::default()
                },
                raw_message: format!("message {}", id),
                confidence_score: None,
                is_favorite: favorite,
                tags: vec![],
                image_id: None,
                image_filename: None,
                image_size: None,
                created_at: created,
                updated_at: created,
            },
        }
    }

    #[test]
    fn test_stats_counts_and_unknown_bucket() {
        let records = vec![
            record(0, Some(PropertyType::Residential), Some(TransactionType::Rent), true),
            record(1, Some(PropertyType::Residential), None, false),
            record(2, None, Some(TransactionType::Sale), true),
        ];

        let stats = PropertyStats::from_records(&records);
        assert_eq!(stats.total_properties, 3);
        assert_eq!(stats.by_type.get("Residential"), Some(&2));
        assert_eq!(stats.by_type.get("Unknown"), Some(&1));
        assert_eq!(stats.by_transaction.get("Rent"), Some(&1));
        assert_eq!(stats.by_transaction.get("Sale"), Some(&1));
        assert_eq!(stats.by_transaction.get("Unknown"), Some(&1));
        assert_eq!(stats.favorites, 2);
    }

    #[test]
    fn test_recent_is_newest_five() {
        let records: Vec<_> = (0..8).map(|i| record(i, None, None, false)).collect();
        let stats = PropertyStats::from_records(&records);
        let ids: Vec<_> = stats.recent.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["7", "6", "5", "4", "3"]);
    }

    #[test]
    fn test_empty_collection() {
        let stats = PropertyStats::from_records(&[]);
        assert_eq!(stats.total_properties, 0);
        assert!(stats.by_type.is_empty());
        assert!(stats.recent.is_empty());
    }
}
