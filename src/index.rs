use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::debug;

use crate::model::MonthStub;
use crate::patterns::TITLE;

static MONTH_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[target="_blank"][title]"#).expect("invalid selector: month link")
});

/// Index page ids: the root listing plus its seven numbered continuations.
pub fn default_index_pages() -> Vec<String> {
    let mut pages = vec![String::from("index.html")];
    pages.extend((1..8).map(|idx| format!("index_{}.html", idx)));
    pages
}

/// Collects bulletin links from an index page, in document order.
pub fn parse_index(html: &str) -> Vec<MonthStub> {
    let document = Html::parse_document(html);
    let mut result = Vec::new();
    for a in document.select(&MONTH_LINK) {
        let title = a.value().attr("title").unwrap_or_default();
        let caps = match TITLE.captures(title) {
            Some(caps) => caps,
            None => {
                debug!(title, "skip anchor");
                continue;
            }
        };
        let (year, month) = match (caps[1].parse::<i32>(), caps[2].parse::<u32>()) {
            (Ok(y), Ok(m)) => (y, m),
            _ => continue,
        };
        let href = a.value().attr("href").unwrap_or_default();
        debug!(href, title, year, month, "month link");
        result.push(MonthStub::new(year, month, href, title));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = r#"<html><body><ul>
        <li><a href="./202304/t20230412_1.html" target="_blank" title="2023年3月我市房地产市场运行情况">2023年3月...</a></li>
        <li><a href="./202303/t20230310_2.html" target="_blank" title="2023年2月房地产市场情况">2023年2月...</a></li>
        <li><a href="./202302/t20230201_3.html" target="_blank" title="2023年1月土地供应情况">土地</a></li>
        <li><a href="./202301/t20230105_4.html" title="2022年12月我市房地产市场运行情况">no target</a></li>
        <li><a href="./202212/t20221208_5.html" target="_self" title="2022年11月我市房地产市场运行情况">self</a></li>
        <li><a href="./202211/t20221109_6.html" target="_blank" title="2022年10月我市房地产市场运行情况">2022年10月</a></li>
    </ul></body></html>"#;

    #[test]
    fn matching_titles_in_document_order() {
        let found = parse_index(INDEX);
        let keys: Vec<(i32, u32)> = found.iter().map(|m| m.key()).collect();
        assert_eq!(keys, vec![(2023, 3), (2023, 2), (2022, 10)]);
        assert_eq!(found[0].href, "202304/t20230412_1.html");
        assert_eq!(found[0].title, "2023年3月我市房地产市场运行情况");
    }

    #[test]
    fn page_without_links() {
        assert!(parse_index("<html><body><p>暂无数据</p></body></html>").is_empty());
    }

    #[test]
    fn default_pages() {
        let pages = default_index_pages();
        assert_eq!(pages.len(), 8);
        assert_eq!(pages[0], "index.html");
        assert_eq!(pages[7], "index_7.html");
    }
}
