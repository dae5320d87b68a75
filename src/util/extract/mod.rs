//! 房源消息抽取
//!
//! 基于规则表对 WhatsApp 文本做轻量字段抽取，并给出启发式置信度。

pub mod duplicate;
pub mod patterns;

use crate::model::{ExtractionResult, Furnishing, PropertyFields, PropertyType, TransactionType};
use patterns::{
    AREA_LOOKUP, CARPET_AREA_PATTERNS, CONTACT_PATTERNS, FURNISHING_RULES,
    LOCATION_FALLBACK_PATTERNS, PRICE_PATTERNS, PROPERTY_TYPE_RULES, TRANSACTION_RULES,
};
use regex::Regex;

pub use duplicate::{detect_duplicate, text_similarity, DUPLICATE_THRESHOLD};

const MAX_POINTS: f64 = 8.0;
const WEIGHT_PROPERTY_TYPE: f64 = 2.0;
const WEIGHT_TRANSACTION: f64 = 1.0;
const WEIGHT_LOCATION: f64 = 2.0;
const WEIGHT_PRICE: f64 = 1.0;
const WEIGHT_CONTACT: f64 = 1.0;
const WEIGHT_CARPET_AREA: f64 = 0.5;
const WEIGHT_FURNISHING: f64 = 0.5;

/// 位置抽取结果
#[derive(Debug, Clone, PartialEq)]
pub struct LocationMatch {
    pub location: String,
    pub area: String,
    pub region: Option<&'static str>,
}

/// 入口：抽取一条消息中的房源字段
pub fn extract_property_details(message: &str) -> ExtractionResult {
    let lowered = message.to_lowercase();
    let mut fields = PropertyFields {
        notes: Some(message.to_string()),
        ..Default::default()
    };
    let mut points = 0.0;

    if let Some((property_type, subtype)) = extract_property_type(&lowered) {
        fields.property_type = Some(property_type);
        fields.bhk = Some(subtype.to_string());
        points += WEIGHT_PROPERTY_TYPE;
    }

    if let Some(transaction) = extract_transaction_type(&lowered) {
        fields.transaction_type = Some(transaction);
        points += WEIGHT_TRANSACTION;
    }

    if let Some(found) = extract_location(message) {
        fields.location = Some(found.location);
        fields.area = Some(found.area);
        fields.region = found.region.map(str::to_string);
        points += WEIGHT_LOCATION;
    }

    if let Some(price) = first_match(&PRICE_PATTERNS, message) {
        fields.price = Some(price);
        points += WEIGHT_PRICE;
    }

    if let Some(carpet_area) = first_match(&CARPET_AREA_PATTERNS, message) {
        fields.carpet_area = Some(carpet_area);
        points += WEIGHT_CARPET_AREA;
    }

    if let Some(contact) = first_match(&CONTACT_PATTERNS, message) {
        fields.contact_number = Some(contact);
        points += WEIGHT_CONTACT;
    }

    if let Some(furnishing) = extract_furnishing(&lowered) {
        fields.furnishing = Some(furnishing);
        points += WEIGHT_FURNISHING;
    }

    let confidence_score = confidence(points);
    tracing::debug!(
        target: "extract",
        event = crate::util::logging::standards::events::EXTRACT_COMPLETE,
        confidence_score,
        property_type = ?fields.property_type,
        has_contact = fields.contact_number.is_some(),
    );

    ExtractionResult {
        fields,
        raw_message: message.to_string(),
        confidence_score,
    }
}

pub fn extract_property_type(text: &str) -> Option<(PropertyType, &'static str)> {
    PROPERTY_TYPE_RULES
        .iter()
        .find(|rule| rule.matcher.is_match(text))
        .map(|rule| (rule.property_type, rule.subtype))
}

pub fn extract_transaction_type(text: &str) -> Option<TransactionType> {
    TRANSACTION_RULES
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(label, _)| *label)
}

pub fn extract_furnishing(text: &str) -> Option<Furnishing> {
    FURNISHING_RULES
        .iter()
        .find(|(_, matcher)| matcher.is_match(text))
        .map(|(label, _)| *label)
}

/// 先查地名表（子串匹配），再尝试通用位置短语
pub fn extract_location(message: &str) -> Option<LocationMatch> {
    let lowered = message.to_lowercase();

    if let Some((name, _, region)) = AREA_LOOKUP
        .iter()
        .find(|(_, lower, _)| lowered.contains(lower.as_str()))
    {
        return Some(LocationMatch {
            location: name.to_string(),
            area: name.to_string(),
            region: Some(region),
        });
    }

    LOCATION_FALLBACK_PATTERNS.iter().find_map(|re| {
        re.captures(message)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .map(|phrase| LocationMatch {
                location: phrase.clone(),
                area: phrase,
                region: None,
            })
    })
}

/// 返回首个命中规则的完整匹配文本
fn first_match(patterns: &[Regex], text: &str) -> Option<String> {
    patterns
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.as_str().to_string())
}

fn confidence(points: f64) -> f64 {
    (points / MAX_POINTS * 100.0 * 100.0).round() / 100.0
}
