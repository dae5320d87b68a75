//! 抽取规则表
//!
//! 所有规则均为有序的 `(label, matcher)` 列表，按顺序匹配，首个命中即返回。
//! 正则在首次使用时编译，之后只读。

use regex::Regex;
use std::sync::LazyLock;

use crate::model::{Furnishing, PropertyType, TransactionType};

/// 价格/面积单位
const PRICE_UNITS: &str = r"(?:lac|lakh|lakhs|cr|crore|crores|k|thousand)";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

/// 房源类型规则：类型、子类型（BHK 或商业/土地细分）、匹配器
pub struct PropertyTypeRule {
    pub property_type: PropertyType,
    pub subtype: &'static str,
    pub matcher: Regex,
}

pub static PROPERTY_TYPE_RULES: LazyLock<Vec<PropertyTypeRule>> = LazyLock::new(|| {
    use PropertyType::*;
    [
        (Residential, "1BHK", r"(?i)\b1\s*bhk\b|\b1\s*rk\b|\bone\s*bhk\b"),
        (Residential, "2BHK", r"(?i)\b2\s*bhk\b|\btwo\s*bhk\b"),
        (Residential, "3BHK", r"(?i)\b3\s*bhk\b|\bthree\s*bhk\b"),
        (Residential, "4BHK", r"(?i)\b4\s*bhk\b|\bfour\s*bhk\b"),
        (Residential, "5BHK", r"(?i)\b5\s*bhk\b|\bfive\s*bhk\b"),
        (Commercial, "Shop", r"(?i)\bshop\b|\bshops\b|\bdukan\b"),
        (Commercial, "Office", r"(?i)\boffice\b|\bcommercial\s*space\b"),
        (Commercial, "Showroom", r"(?i)\bshowroom\b"),
        (Commercial, "Warehouse", r"(?i)\bwarehouse\b|\bgodown\b"),
        (Land, "Residential Land", r"(?i)\bresidential\s*land\b|\bplot\b|\bploat\b"),
        (Land, "Commercial Land", r"(?i)\bcommercial\s*land\b"),
    ]
    .into_iter()
    .map(|(property_type, subtype, pattern)| PropertyTypeRule {
        property_type,
        subtype,
        matcher: compile(pattern),
    })
    .collect()
});

pub static TRANSACTION_RULES: LazyLock<Vec<(TransactionType, Regex)>> = LazyLock::new(|| {
    vec![
        (
            TransactionType::Rent,
            compile(r"(?i)\brent\b|\blease\b|\brentals\b|\bkiraya\b|\bto\s*let\b"),
        ),
        (
            TransactionType::Sale,
            compile(r"(?i)\bsale\b|\bsell\b|\boutright\b|\bfor\s*sale\b|\bbuy\b|\bpurchase\b"),
        ),
    ]
});

/// 装修匹配器
pub enum FurnishingMatcher {
    Pattern(Regex),
    /// 命中 "furnished"，但排除紧跟在 "semi" 之后的出现
    NotSemiPrefixed(Regex),
}

impl FurnishingMatcher {
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            FurnishingMatcher::Pattern(re) => re.is_match(text),
            FurnishingMatcher::NotSemiPrefixed(re) => {
                re.captures_iter(text).any(|caps| caps.get(1).is_none())
            }
        }
    }
}

pub static FURNISHING_RULES: LazyLock<Vec<(Furnishing, FurnishingMatcher)>> =
    LazyLock::new(|| {
        vec![
            (
                Furnishing::Furnished,
                FurnishingMatcher::NotSemiPrefixed(compile(r"(?i)\b(semi\s*-?\s*)?furnished\b")),
            ),
            (
                Furnishing::SemiFurnished,
                FurnishingMatcher::Pattern(compile(r"(?i)\bsemi\s*furnished\b|\bsemi\b")),
            ),
            (
                Furnishing::Unfurnished,
                FurnishingMatcher::Pattern(compile(r"(?i)\bunfurnished\b|\bbare\b")),
            ),
        ]
    });

pub static PRICE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        format!(r"(?i)₹\s*(\d+(?:,\d+)*(?:\.\d+)?)\s*{PRICE_UNITS}?"),
        format!(r"(?i)rs\.?\s*(\d+(?:,\d+)*(?:\.\d+)?)\s*{PRICE_UNITS}?"),
        format!(r"(?i)(\d+(?:,\d+)*(?:\.\d+)?)\s*{PRICE_UNITS}"),
        r"(?i)price[:\s]+(?:₹|rs\.?)?\s*(\d+(?:,\d+)*(?:\.\d+)?)".to_string(),
        r"(?i)rent[:\s]+(?:₹|rs\.?)?\s*(\d+(?:,\d+)*)".to_string(),
    ]
    .iter()
    .map(|p| compile(p))
    .collect()
});

pub static CARPET_AREA_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(\d+(?:,\d+)?)\s*(?:sq\.?\s*ft|sqft|square\s*feet)",
        r"(?i)carpet\s*area[:\s]+(\d+(?:,\d+)?)",
        r"(?i)area[:\s]+(\d+(?:,\d+)?)\s*(?:sq\.?\s*ft|sqft)",
    ]
    .into_iter()
    .map(compile)
    .collect()
});

/// 电话号码，大小写敏感
pub static CONTACT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"\+91[\s-]?\d{10}", r"\b[6-9]\d{9}\b", r"\b\d{5}[\s-]?\d{5}\b"]
        .into_iter()
        .map(compile)
        .collect()
});

/// 地名表未命中时的通用位置短语，取第 1 组
pub static LOCATION_FALLBACK_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(?:at|in|near|@)\s+([A-Za-z\s]+?)(?:,|\.|$)",
        r"(?i)location[:\s]+([A-Za-z\s]+?)(?:,|\.|$)",
    ]
    .into_iter()
    .map(compile)
    .collect()
});

/// 孟买铁路线分组地名表，按 Western → Central → Harbour 顺序
pub const MUMBAI_AREAS: &[(&str, &[&str])] = &[
    (
        "Western",
        &[
            "Churchgate",
            "Marine Lines",
            "Charni Road",
            "Grant Road",
            "Mumbai Central",
            "Mahalaxmi",
            "Lower Parel",
            "Prabhadevi",
            "Dadar",
            "Matunga Road",
            "Mahim",
            "Bandra",
            "Khar Road",
            "Santacruz",
            "Vile Parle",
            "Andheri",
            "Jogeshwari",
            "Goregaon",
            "Malad",
            "Kandivali",
            "Borivali",
            "Dahisar",
            "Mira Road",
            "Bhayandar",
            "Naigaon",
            "Vasai",
            "Nallasopara",
            "Virar",
        ],
    ),
    (
        "Central",
        &[
            "CSMT",
            "Masjid",
            "Sandhurst Road",
            "Byculla",
            "Chinchpokli",
            "Currey Road",
            "Parel",
            "Dadar",
            "Matunga",
            "Sion",
            "Kurla",
            "Vidyavihar",
            "Ghatkopar",
            "Vikhroli",
            "Kanjurmarg",
            "Bhandup",
            "Nahur",
            "Mulund",
            "Thane",
            "Kalwa",
            "Mumbra",
            "Diva",
            "Kopar",
            "Dombivli",
            "Thakurli",
            "Kalyan",
            "Ulhasnagar",
            "Ambivli",
            "Titwala",
            "Khadavli",
            "Vasind",
            "Asangaon",
            "Atgaon",
            "Khardi",
            "Kasara",
        ],
    ),
    (
        "Harbour",
        &[
            "CSMT",
            "Vadala Road",
            "GTB Nagar",
            "Chunabhatti",
            "Kurla",
            "Tilak Nagar",
            "Chembur",
            "Govandi",
            "Mankhurd",
            "Vashi",
            "Sanpada",
            "Juinagar",
            "Nerul",
            "Seawoods",
            "Belapur",
            "Kharghar",
            "Mansarovar",
            "Khandeshwar",
            "Panvel",
        ],
    ),
];

/// 小写地名表，与 `MUMBAI_AREAS` 顺序一致：(原地名, 小写地名, 线路)
pub static AREA_LOOKUP: LazyLock<Vec<(&'static str, String, &'static str)>> =
    LazyLock::new(|| {
        MUMBAI_AREAS
            .iter()
            .flat_map(|(region, areas)| {
                areas
                    .iter()
                    .map(move |area| (*area, area.to_lowercase(), *region))
            })
            .collect()
    });
