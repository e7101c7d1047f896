use crate::domain::model::OrderRecord;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// 日期欄位的辨識器清單，依序嘗試，先命中者勝出
pub const DATE_RECOGNIZERS: &[fn(&str) -> bool] = &[contains_month_name];

pub fn contains_month_name(text: &str) -> bool {
    let lower = text.to_lowercase();
    MONTH_NAMES.iter().any(|month| {
        lower
            .split(|c: char| !c.is_alphabetic())
            .any(|token| token == *month)
    })
}

#[derive(Debug, Clone, Copy)]
pub enum DateRule {
    /// 依標籤文字配對日期欄位
    Labeled(&'static str),
    /// 標頭沒有可靠標籤時，以內容特徵辨識日期欄位
    Heuristic,
}

/// 一種頁面版型對應的選擇器組合與擷取規則
pub struct MarkupProfile {
    name: &'static str,
    container: Selector,
    header: Selector,
    field_item: Selector,
    field_label: Selector,
    field_value: Selector,
    order_id: Selector,
    product_title: Selector,
    date_rule: DateRule,
    amount_label: &'static str,
    amount_pattern: Regex,
}

impl MarkupProfile {
    pub fn order_card() -> Self {
        Self {
            name: "order-card",
            container: selector(".order-card"),
            header: selector(".order-header"),
            field_item: selector(".order-header__header-list-item"),
            field_label: selector(".a-text-caps"),
            field_value: selector(".a-size-base.a-color-secondary.aok-break-word"),
            order_id: selector(".yohtmlc-order-id span[dir='ltr']"),
            product_title: selector(".yohtmlc-product-title a"),
            date_rule: DateRule::Heuristic,
            amount_label: "total",
            amount_pattern: amount_pattern(),
        }
    }

    pub fn legacy_orders() -> Self {
        Self {
            name: "legacy-orders",
            container: selector(".order"),
            header: selector(".order-info"),
            field_item: selector(".a-column"),
            field_label: selector(".label"),
            field_value: selector(".value"),
            order_id: selector(".actions .value"),
            product_title: selector(".a-fixed-left-grid .a-link-normal"),
            date_rule: DateRule::Labeled("order placed"),
            amount_label: "total",
            amount_pattern: amount_pattern(),
        }
    }

    /// 偵測頁面屬於哪種版型，兩者皆無命中時回傳預設版型（擷取結果為空）
    pub fn detect(doc: &Html) -> Self {
        let card = Self::order_card();
        if doc.select(&card.container).next().is_some() {
            return card;
        }
        let legacy = Self::legacy_orders();
        if doc.select(&legacy.container).next().is_some() {
            return legacy;
        }
        card
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[derive(Debug)]
pub struct ExtractedPage {
    pub orders: Vec<OrderRecord>,
    /// 金額不符格式而被捨棄的筆數
    pub discarded: usize,
}

/// 從單一頁面擷取所有訂單
pub fn extract_orders(profile: &MarkupProfile, doc: &Html) -> ExtractedPage {
    let mut orders = Vec::new();
    let mut discarded = 0;

    for container in doc.select(&profile.container) {
        let header = match container.select(&profile.header).next() {
            Some(header) => header,
            None => continue,
        };

        let date = match profile.date_rule {
            DateRule::Labeled(label) => labeled_value(profile, header, label),
            DateRule::Heuristic => heuristic_value(profile, header, DATE_RECOGNIZERS),
        }
        .unwrap_or_default();

        let amount = labeled_value(profile, header, profile.amount_label).unwrap_or_default();

        let order_id = header
            .select(&profile.order_id)
            .next()
            .map(element_text)
            .unwrap_or_default();

        let titles: Vec<String> = container
            .select(&profile.product_title)
            .map(element_text)
            .filter(|title| !title.is_empty())
            .collect();

        // 金額必須含小數兩位的數字，否則整筆捨棄
        if !profile.amount_pattern.is_match(&amount) {
            discarded += 1;
            continue;
        }

        orders.push(OrderRecord {
            date,
            amount,
            description: join_titles(&titles),
            order_id,
        });
    }

    ExtractedPage { orders, discarded }
}

/// 讀取頁面宣告的訂單總數（例如 "49 orders"）
pub fn total_order_count(doc: &Html) -> Option<usize> {
    let counter = selector(".num-orders");
    let el = doc.select(&counter).next()?;
    let text = el.text().collect::<String>();
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

// 選擇器皆為寫死字串，解析失敗屬程式錯誤
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

fn amount_pattern() -> Regex {
    Regex::new(r"\d+\.\d{2}").unwrap()
}

fn labeled_value(profile: &MarkupProfile, scope: ElementRef, wanted: &str) -> Option<String> {
    for item in scope.select(&profile.field_item) {
        let label = match item.select(&profile.field_label).next() {
            Some(el) => element_text(el).to_lowercase(),
            None => continue,
        };
        if label == wanted {
            return item.select(&profile.field_value).next().map(element_text);
        }
    }
    None
}

fn heuristic_value(
    profile: &MarkupProfile,
    scope: ElementRef,
    recognizers: &[fn(&str) -> bool],
) -> Option<String> {
    for item in scope.select(&profile.field_item) {
        let value = match item.select(&profile.field_value).next() {
            Some(el) => element_text(el),
            None => continue,
        };
        if recognizers.iter().any(|recognize| recognize(&value)) {
            return Some(value);
        }
    }
    None
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// 單一品名直接輸出，兩件以上才逐一加引號再以逗號串接
fn join_titles(titles: &[String]) -> String {
    match titles {
        [] => String::new(),
        [title] => title.clone(),
        _ => titles
            .iter()
            .map(|title| format!("\"{}\"", title))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> Html {
        Html::parse_document(&format!("<html><body>{}</body></html>", body))
    }

    fn card_order(date: &str, total: &str, order_id: &str, titles: &[&str]) -> String {
        let title_html: String = titles
            .iter()
            .map(|t| {
                format!(
                    r#"<div class="yohtmlc-product-title"><a href="/product/1">{}</a></div>"#,
                    t
                )
            })
            .collect();
        format!(
            r#"<div class="order-card">
  <div class="order-header">
    <div class="order-header__header-list-item">
      <span class="a-text-caps">Order placed</span>
      <span class="a-size-base a-color-secondary aok-break-word">{date}</span>
    </div>
    <div class="order-header__header-list-item">
      <span class="a-text-caps">Total</span>
      <span class="a-size-base a-color-secondary aok-break-word">{total}</span>
    </div>
    <div class="yohtmlc-order-id">Order # <span dir="ltr">{order_id}</span></div>
  </div>
  {title_html}
</div>"#
        )
    }

    fn legacy_order(date: &str, total: &str, order_id: &str, titles: &[&str]) -> String {
        let title_html: String = titles
            .iter()
            .map(|t| format!(r#"<a class="a-link-normal" href="/product/1">{}</a>"#, t))
            .collect();
        format!(
            r#"<div class="order">
  <div class="order-info">
    <div class="a-column">
      <span class="label">Order placed</span>
      <span class="value">{date}</span>
    </div>
    <div class="a-column">
      <span class="label">Total</span>
      <span class="value">{total}</span>
    </div>
    <div class="a-column actions">
      <span class="label">Order #</span>
      <span class="value">{order_id}</span>
    </div>
  </div>
  <div class="a-fixed-left-grid">
    <a class="a-link-normal" href="/product/1"><img src="/thumb.jpg"></a>
    {title_html}
  </div>
</div>"#
        )
    }

    #[test]
    fn test_extract_card_order_fields() {
        let doc = page(&card_order(
            "January 5, 2024",
            "$45.98",
            "114-0001234-5678901",
            &["Widget"],
        ));
        let profile = MarkupProfile::order_card();
        let extracted = extract_orders(&profile, &doc);

        assert_eq!(extracted.orders.len(), 1);
        assert_eq!(extracted.discarded, 0);
        let order = &extracted.orders[0];
        assert_eq!(order.date, "January 5, 2024");
        assert_eq!(order.amount, "$45.98");
        assert_eq!(order.order_id, "114-0001234-5678901");
        assert_eq!(order.description, "Widget");
    }

    #[test]
    fn test_single_title_description_is_bare() {
        let doc = page(&card_order("April 1, 2024", "$8.00", "114-8", &["Widget"]));
        let profile = MarkupProfile::order_card();
        let extracted = extract_orders(&profile, &doc);

        // 只有一件商品時不加引號
        assert_eq!(extracted.orders[0].description, "Widget");
    }

    #[test]
    fn test_multiple_titles_joined_as_quoted_list() {
        let doc = page(&card_order(
            "March 2, 2024",
            "$10.00",
            "114-1",
            &["A,B", "C"],
        ));
        let profile = MarkupProfile::order_card();
        let extracted = extract_orders(&profile, &doc);

        assert_eq!(extracted.orders.len(), 1);
        assert_eq!(extracted.orders[0].description, r#""A,B", "C""#);
    }

    #[test]
    fn test_order_without_titles_still_yields_record() {
        let doc = page(&card_order("June 1, 2024", "$5.00", "114-2", &[]));
        let profile = MarkupProfile::order_card();
        let extracted = extract_orders(&profile, &doc);

        assert_eq!(extracted.orders.len(), 1);
        assert_eq!(extracted.orders[0].description, "");
    }

    #[test]
    fn test_non_monetary_total_is_discarded() {
        let html = format!(
            "{}{}{}",
            card_order("May 1, 2024", "$45.98", "114-3", &["Kept"]),
            card_order("May 2, 2024", "Pending", "114-4", &["Dropped"]),
            card_order("May 3, 2024", "45", "114-5", &["Dropped too"]),
        );
        let doc = page(&html);
        let profile = MarkupProfile::order_card();
        let extracted = extract_orders(&profile, &doc);

        assert_eq!(extracted.orders.len(), 1);
        assert_eq!(extracted.discarded, 2);
        assert_eq!(extracted.orders[0].order_id, "114-3");
    }

    #[test]
    fn test_amount_pattern_matches_inside_longer_text() {
        let doc = page(&card_order("May 4, 2024", "USD 7.99", "114-6", &["X"]));
        let profile = MarkupProfile::order_card();
        let extracted = extract_orders(&profile, &doc);

        assert_eq!(extracted.orders.len(), 1);
        assert_eq!(extracted.orders[0].amount, "USD 7.99");
    }

    #[test]
    fn test_container_without_header_is_skipped() {
        let html = r#"<div class="order-card">
  <div class="yohtmlc-product-title"><a href="/product/1">Orphan</a></div>
</div>"#;
        let doc = page(html);
        let profile = MarkupProfile::order_card();
        let extracted = extract_orders(&profile, &doc);

        assert_eq!(extracted.orders.len(), 0);
        assert_eq!(extracted.discarded, 0);
    }

    #[test]
    fn test_heuristic_date_takes_first_match() {
        let html = r#"<div class="order-card">
  <div class="order-header">
    <div class="order-header__header-list-item">
      <span class="a-size-base a-color-secondary aok-break-word">January 1, 2024</span>
    </div>
    <div class="order-header__header-list-item">
      <span class="a-size-base a-color-secondary aok-break-word">February 2, 2024</span>
    </div>
    <div class="order-header__header-list-item">
      <span class="a-text-caps">Total</span>
      <span class="a-size-base a-color-secondary aok-break-word">$1.00</span>
    </div>
  </div>
</div>"#;
        let doc = page(html);
        let profile = MarkupProfile::order_card();
        let extracted = extract_orders(&profile, &doc);

        assert_eq!(extracted.orders.len(), 1);
        assert_eq!(extracted.orders[0].date, "January 1, 2024");
    }

    #[test]
    fn test_extract_legacy_order_fields() {
        let doc = page(&legacy_order(
            "5 January 2024",
            "$12.50",
            "112-5550001-2345678",
            &["Book Title"],
        ));
        let profile = MarkupProfile::legacy_orders();
        let extracted = extract_orders(&profile, &doc);

        assert_eq!(extracted.orders.len(), 1);
        let order = &extracted.orders[0];
        assert_eq!(order.date, "5 January 2024");
        assert_eq!(order.amount, "$12.50");
        assert_eq!(order.order_id, "112-5550001-2345678");
        // 圖片連結沒有文字，不得混入描述
        assert_eq!(order.description, "Book Title");
    }

    #[test]
    fn test_detect_prefers_card_profile() {
        let doc = page(&card_order("July 1, 2024", "$1.00", "114-7", &["X"]));
        assert_eq!(MarkupProfile::detect(&doc).name(), "order-card");
    }

    #[test]
    fn test_detect_legacy_profile() {
        let doc = page(&legacy_order("1 July 2024", "$1.00", "112-7", &["X"]));
        assert_eq!(MarkupProfile::detect(&doc).name(), "legacy-orders");
    }

    #[test]
    fn test_detect_unknown_markup_defaults_to_empty_extraction() {
        let doc = page("<p>Nothing to see here</p>");
        let profile = MarkupProfile::detect(&doc);
        let extracted = extract_orders(&profile, &doc);
        assert_eq!(extracted.orders.len(), 0);
    }

    #[test]
    fn test_total_order_count() {
        let doc = page(r#"<span class="num-orders">49 orders</span>"#);
        assert_eq!(total_order_count(&doc), Some(49));

        let doc = page("<p>No counter</p>");
        assert_eq!(total_order_count(&doc), None);

        let doc = page(r#"<span class="num-orders">no digits</span>"#);
        assert_eq!(total_order_count(&doc), None);
    }

    #[test]
    fn test_contains_month_name() {
        assert!(contains_month_name("January 5, 2024"));
        assert!(contains_month_name("Ordered on 3 september 2023"));
        assert!(!contains_month_name("Order placed"));
        assert!(!contains_month_name("$12.99"));
        assert!(!contains_month_name("Mayflower"));
    }
}
