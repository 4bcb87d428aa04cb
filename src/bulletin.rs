use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::debug;

use crate::error::ParseError;
use crate::model::{BulletinFigures, HouseSegment, MetricTriple};
use crate::patterns::{Field, RULES};

static PARA: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div#para").expect("invalid selector: para"));

/// Text of `div#para` with every text node trimmed and joined without separators.
pub fn extract_content(html: &str) -> Result<String, ParseError> {
    let document = Html::parse_document(html);
    let para = document
        .select(&PARA)
        .next()
        .ok_or(ParseError::MissingContainer)?;
    Ok(para.text().map(str::trim).collect())
}

pub fn parse_bulletin(html: &str) -> Result<BulletinFigures, ParseError> {
    let content = extract_content(html)?;
    debug!(%content, "bulletin content");
    parse_content(&content)
}

/// Applies every sentence rule to a content string; the first one that
/// does not match fails the whole bulletin.
pub fn parse_content(content: &str) -> Result<BulletinFigures, ParseError> {
    let mut figures = BulletinFigures::default();
    for rule in RULES.iter() {
        let caps = rule
            .pattern
            .captures(content)
            .ok_or(ParseError::SentenceMissing(rule.field.name()))?;
        if rule.field.is_deal() {
            let segment = HouseSegment::from_captures(&caps)?;
            match rule.field {
                Field::NewCommercial => figures.new_house.commercial = segment,
                Field::NewResidential => figures.new_house.residential = segment,
                Field::OldCommercial => figures.old_house.commercial = segment,
                Field::OldResidential => figures.old_house.residential = segment,
                Field::CommercialList | Field::ResidentialList => {}
            }
        } else {
            let triple = MetricTriple::from_captures(&caps, "area")?;
            match rule.field {
                Field::CommercialList => figures.commercial_list = triple,
                _ => figures.residential_list = triple,
            }
        }
    }
    figures.validate()?;
    Ok(figures)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub const CONTENT: &str = concat!(
        "3月，我市商品房上市面积20.5万平方米，同比增长10.2%，环比下降3.1%；",
        "商品住房上市面积15.2万平方米，同比下降4%，环比上涨2.5%。",
        "我市新建商品房成交面积12.5万平方米，同比增长3.2%，环比下降1.1%；成交套数150套，同比增长2.0%，环比下降0.5%。",
        "其中：新建商品住宅成交面积10.8万平方米，同比增长1.5%，环比增长0.8%；成交套数1000套，同比下降2.4%，环比上涨6%。",
        "我市二手房成交面积9.6万平方米，同比下降7.7%，环比增长1.9%；成交套数1100套，同比下降8.0%，环比增长2.2%。",
        "其中：二手住宅成交面积8.4万平方米，同比下降6.6%，环比增长2.1%；成交套数960套，同比下降5.5%，环比增长3.3%。",
    );

    pub fn page(content: &str) -> String {
        // Split across inline tags and whitespace the way the bureau's editor does.
        let mid = content
            .char_indices()
            .nth(content.chars().count() / 2)
            .map(|(i, _)| i)
            .unwrap_or(0);
        format!(
            "<html><body><div class=\"head\">呼和浩特市住房和城乡建设局</div>\n<div id=\"para\">\n  <p>{}</p>\n  <p><span>{}</span></p>\n</div></body></html>",
            &content[..mid],
            &content[mid..]
        )
    }

    #[test]
    fn content_strips_tags_and_whitespace() {
        let html = "<div id=\"para\">\n  <p> 一、概况 </p>\n <p>二、<b>成交</b></p></div>";
        assert_eq!(extract_content(html).unwrap(), "一、概况二、成交");
    }

    #[test]
    fn missing_container() {
        let err = parse_bulletin("<html><body><div id=\"other\">x</div></body></html>").unwrap_err();
        assert!(matches!(err, ParseError::MissingContainer));
    }

    #[test]
    fn new_commercial_sentence() {
        let figures = parse_content(CONTENT).unwrap();
        assert_eq!(figures.new_house.commercial.area, MetricTriple::from_values(12.5, 3.2, -1.1));
        assert_eq!(figures.new_house.commercial.unit, MetricTriple::from_values(150.0, 2.0, -0.5));
    }

    #[test]
    fn every_sentence_lands_in_its_slot() {
        let figures = parse_bulletin(&page(CONTENT)).unwrap();
        assert_eq!(figures.commercial_list, MetricTriple::from_values(20.5, 10.2, -3.1));
        assert_eq!(figures.residential_list, MetricTriple::from_values(15.2, -4.0, 2.5));
        assert_eq!(figures.new_house.residential.area, MetricTriple::from_values(10.8, 1.5, 0.8));
        assert_eq!(figures.new_house.residential.unit, MetricTriple::from_values(1000.0, -2.4, 6.0));
        assert_eq!(figures.old_house.commercial.area, MetricTriple::from_values(9.6, -7.7, 1.9));
        assert_eq!(figures.old_house.commercial.unit, MetricTriple::from_values(1100.0, -8.0, 2.2));
        assert_eq!(figures.old_house.residential.area, MetricTriple::from_values(8.4, -6.6, 2.1));
        assert_eq!(figures.old_house.residential.unit, MetricTriple::from_values(960.0, -5.5, 3.3));
        for (_, triple) in figures.triples() {
            assert!(triple.value >= 0.0);
        }
    }

    #[test]
    fn missing_resale_residential_fails() {
        let cut = CONTENT.find("其中：二手住宅").unwrap();
        let err = parse_content(&CONTENT[..cut]).unwrap_err();
        assert!(matches!(err, ParseError::SentenceMissing("old_house.residential")));
    }

    #[test]
    fn unparseable_unit_sentence_fails() {
        let broken = CONTENT.replace("成交套数150套", "成交套数若干套");
        let err = parse_content(&broken).unwrap_err();
        assert!(matches!(err, ParseError::SentenceMissing("new_house.commercial")));
    }
}
