use regex::Captures;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Characters that turn a trend token into a decrease.
const DECREASE_CHARS: [char; 4] = ['降', '负', '低', '下'];

/// 数值，同比，环比
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct MetricTriple {
    pub value: f64,
    pub yoy: f64,
    pub mom: f64,
}

impl MetricTriple {
    pub fn from_values(value: f64, yoy: f64, mom: f64) -> MetricTriple {
        MetricTriple { value, yoy, mom }
    }

    /// Reads `name`, `{name}_yoy` and `{name}_mom` (each percent with its own
    /// `_trend` group) out of a sentence match.
    pub fn from_captures(caps: &Captures, name: &str) -> Result<MetricTriple, ParseError> {
        Ok(MetricTriple::from_values(
            number(caps, name)?,
            signed(caps, &format!("{}_yoy", name))?,
            signed(caps, &format!("{}_mom", name))?,
        ))
    }
}

pub fn is_decrease(trend: &str) -> bool {
    trend.chars().any(|c| DECREASE_CHARS.contains(&c))
}

fn number(caps: &Captures, group: &str) -> Result<f64, ParseError> {
    let text = caps.name(group).map(|m| m.as_str()).unwrap_or("");
    text.parse::<f64>().map_err(|_| ParseError::BadNumber {
        group: group.to_string(),
        text: text.to_string(),
    })
}

fn signed(caps: &Captures, group: &str) -> Result<f64, ParseError> {
    let value = number(caps, group)?;
    let trend = caps
        .name(&format!("{}_trend", group))
        .map(|m| m.as_str())
        .unwrap_or("");
    if is_decrease(trend) {
        Ok(-value)
    } else {
        Ok(value)
    }
}

/// Transacted area and unit count for one housing type.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct HouseSegment {
    pub area: MetricTriple,
    pub unit: MetricTriple,
}

impl HouseSegment {
    pub fn from_captures(caps: &Captures) -> Result<HouseSegment, ParseError> {
        Ok(HouseSegment {
            area: MetricTriple::from_captures(caps, "area")?,
            unit: MetricTriple::from_captures(caps, "unit")?,
        })
    }

    /// Average area per transacted unit, `None` when no unit was sold.
    pub fn avg_area_per_unit(&self) -> Option<f64> {
        if self.unit.value == 0.0 {
            None
        } else {
            Some(self.area.value / self.unit.value)
        }
    }
}

/// 商品房 / 商品住宅 pair for either new or resale housing.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct HousePair {
    pub commercial: HouseSegment,
    pub residential: HouseSegment,
}

/// Every figure a bulletin has to yield before its month is kept.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct BulletinFigures {
    pub commercial_list: MetricTriple,
    pub residential_list: MetricTriple,
    pub new_house: HousePair,
    pub old_house: HousePair,
}

impl BulletinFigures {
    pub fn triples(&self) -> [(&'static str, &MetricTriple); 10] {
        [
            ("commercial_list", &self.commercial_list),
            ("residential_list", &self.residential_list),
            ("new_house.commercial_area", &self.new_house.commercial.area),
            ("new_house.commercial_unit", &self.new_house.commercial.unit),
            ("new_house.residential_area", &self.new_house.residential.area),
            ("new_house.residential_unit", &self.new_house.residential.unit),
            ("old_house.commercial_area", &self.old_house.commercial.area),
            ("old_house.commercial_unit", &self.old_house.commercial.unit),
            ("old_house.residential_area", &self.old_house.residential.area),
            ("old_house.residential_unit", &self.old_house.residential.unit),
        ]
    }

    pub fn validate(&self) -> Result<(), ParseError> {
        for (field, triple) in self.triples() {
            if !(triple.value.is_finite() && triple.yoy.is_finite() && triple.mom.is_finite()) {
                return Err(ParseError::InvalidFigure {
                    field,
                    reason: format!("non-finite number in {:?}", triple),
                });
            }
            if triple.value < 0.0 {
                return Err(ParseError::InvalidFigure {
                    field,
                    reason: format!("negative value {}", triple.value),
                });
            }
        }
        Ok(())
    }
}

/// A month discovered on an index page, not yet backed by bulletin figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthStub {
    pub year: i32,
    pub month: u32,
    pub href: String,
    pub title: String,
}

impl MonthStub {
    pub fn new(year: i32, month: u32, href: &str, title: &str) -> MonthStub {
        MonthStub {
            year,
            month,
            href: href.trim().trim_start_matches("./").to_string(),
            title: title.to_string(),
        }
    }

    pub fn key(&self) -> (i32, u32) {
        (self.year, self.month)
    }

    /// File name the bulletin page is cached under.
    pub fn cache_name(&self) -> String {
        format!("{}.html", self.title)
    }

    pub fn complete(self, figures: BulletinFigures) -> MonthlyRecord {
        MonthlyRecord {
            year: self.year,
            month: self.month,
            href: self.href,
            commercial_list: figures.commercial_list,
            residential_list: figures.residential_list,
            new_house: figures.new_house,
            old_house: figures.old_house,
        }
    }
}

/// One month of bulletin statistics.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MonthlyRecord {
    pub year: i32,
    pub month: u32,
    pub href: String,
    /// 新建商品房上市
    pub commercial_list: MetricTriple,
    /// 新建商品住房上市
    pub residential_list: MetricTriple,
    pub new_house: HousePair,
    pub old_house: HousePair,
}

impl MonthlyRecord {
    pub fn key(&self) -> (i32, u32) {
        (self.year, self.month)
    }

    pub fn label(&self) -> String {
        format!("{}{:02}", self.year, self.month)
    }

    pub fn figures(&self) -> BulletinFigures {
        BulletinFigures {
            commercial_list: self.commercial_list,
            residential_list: self.residential_list,
            new_house: self.new_house,
            old_house: self.old_house,
        }
    }
}
