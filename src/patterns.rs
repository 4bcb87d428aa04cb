use std::sync::LazyLock;

use regex::Regex;

const NUM: &str = r"\d+\.\d+|\d+";
const TREND: &str = r"[增下上][长降涨]";

/// Index anchor titles such as `2023年3月我市房地产市场运行情况`.
pub static TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})年(\d{1,2})月[我|市]*房地产[市|场]*[运行]*情况")
        .expect("invalid regex: bulletin title")
});

/// Which record slot a sentence fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    CommercialList,
    ResidentialList,
    NewCommercial,
    NewResidential,
    OldCommercial,
    OldResidential,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::CommercialList => "commercial_list",
            Field::ResidentialList => "residential_list",
            Field::NewCommercial => "new_house.commercial",
            Field::NewResidential => "new_house.residential",
            Field::OldCommercial => "old_house.commercial",
            Field::OldResidential => "old_house.residential",
        }
    }

    /// Listed-area sentences carry one triple; deal sentences carry area and units.
    pub fn is_deal(self) -> bool {
        !matches!(self, Field::CommercialList | Field::ResidentialList)
    }
}

pub struct SentenceRule {
    pub field: Field,
    pub pattern: Regex,
}

fn list_pattern(prefix: &str, optional_percent: bool) -> Regex {
    let pct = if optional_percent { "%?" } else { "%" };
    Regex::new(&format!(
        r"{prefix}(?P<area>{NUM})万平方米，同比(?P<area_yoy_trend>{TREND})(?P<area_yoy>{NUM}){pct}，环比(?P<area_mom_trend>{TREND})(?P<area_mom>{NUM})%"
    ))
    .expect("invalid regex: listed area")
}

pub fn build_deal_pattern(prefix: &str) -> Regex {
    Regex::new(&format!(
        concat!(
            r"{prefix}(?P<area>{NUM})万平方米，",
            r"同比(?P<area_yoy_trend>{TREND})(?P<area_yoy>{NUM})%，",
            r"环比(?P<area_mom_trend>{TREND})(?P<area_mom>{NUM})%[；|。]",
            r"成交套数(?P<unit>\d+)套，",
            r"同比(?P<unit_yoy_trend>{TREND})(?P<unit_yoy>{NUM})%，",
            r"环比(?P<unit_mom_trend>{TREND})(?P<unit_mom>{NUM})%。"
        ),
        prefix = prefix,
        NUM = NUM,
        TREND = TREND
    ))
    .expect("invalid regex: deal")
}

/// Sentence rules in the order they are applied to a bulletin.
pub static RULES: LazyLock<Vec<SentenceRule>> = LazyLock::new(|| {
    vec![
        SentenceRule {
            field: Field::CommercialList,
            pattern: list_pattern(r"\d+月，我市商品房上市面积", false),
        },
        SentenceRule {
            field: Field::ResidentialList,
            pattern: list_pattern("商品住房上市面积", true),
        },
        SentenceRule {
            field: Field::NewCommercial,
            pattern: build_deal_pattern("我市新建商品房成交面积"),
        },
        SentenceRule {
            field: Field::NewResidential,
            pattern: build_deal_pattern("其中：新建商品住宅成交面积"),
        },
        SentenceRule {
            field: Field::OldCommercial,
            pattern: build_deal_pattern("我市二手房成交面积"),
        },
        SentenceRule {
            field: Field::OldResidential,
            pattern: build_deal_pattern("其中：二手住宅成交面积"),
        },
    ]
});
