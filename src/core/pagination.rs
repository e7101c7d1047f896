use crate::core::extract::{self, selector};
use scraper::Html;
use url::Url;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// 換頁時必須剔除的易變查詢參數
const VOLATILE_PARAMS: &[&str] = &["startIndex", "ref", "ref_"];

pub trait PaginationStrategy: Send {
    /// 根據目前頁面決定下一頁位址，回傳 None 代表沒有下一頁
    fn next_page(&mut self, doc: &Html) -> Option<Url>;

    /// 策略可預估的總頁數，僅索引式分頁能提供
    fn expected_pages(&self) -> Option<usize>;

    fn name(&self) -> &'static str;
}

/// 依頁面內容挑選分頁策略：先找下一頁控制項，找不到才退回索引推算
pub fn detect_strategy(doc: &Html, start_url: &Url) -> Box<dyn PaginationStrategy> {
    if next_page_href(doc).is_some() {
        Box::new(LinkFollowing::new(start_url))
    } else {
        Box::new(IndexPaging::from_document(doc, start_url))
    }
}

pub(crate) fn next_page_href(doc: &Html) -> Option<String> {
    let next_link = selector(".a-pagination .a-last a");
    let el = doc.select(&next_link).next()?;
    el.value()
        .attr("href")
        .filter(|href| !href.is_empty())
        .map(str::to_string)
}

/// 跟隨頁面上的下一頁連結
pub struct LinkFollowing {
    origin: Url,
}

impl LinkFollowing {
    pub fn new(start_url: &Url) -> Self {
        // 下一頁連結一律以來源站台為基準解析
        let origin = Url::parse(&start_url.origin().ascii_serialization())
            .unwrap_or_else(|_| start_url.clone());
        Self { origin }
    }
}

impl PaginationStrategy for LinkFollowing {
    fn next_page(&mut self, doc: &Html) -> Option<Url> {
        let href = next_page_href(doc)?;
        self.origin.join(&href).ok()
    }

    fn expected_pages(&self) -> Option<usize> {
        None
    }

    fn name(&self) -> &'static str {
        "link-following"
    }
}

/// 頁面沒有下一頁控制項時，以訂單總數推算各頁的起始索引
pub struct IndexPaging {
    base: Url,
    page_size: usize,
    total_pages: usize,
    next_index: usize,
}

impl IndexPaging {
    pub fn from_document(doc: &Html, start_url: &Url) -> Self {
        let total_orders = extract::total_order_count(doc).unwrap_or(0);
        Self::new(start_url, total_orders, DEFAULT_PAGE_SIZE)
    }

    pub fn new(start_url: &Url, total_orders: usize, page_size: usize) -> Self {
        // 總數不可得時視為單頁
        let total_pages = total_orders.div_ceil(page_size).max(1);
        Self {
            base: strip_volatile_params(start_url),
            page_size,
            total_pages,
            next_index: 2,
        }
    }

    /// 組出第 page_index 頁（1 起算）的位址
    pub fn locator_for(&self, page_index: usize) -> Url {
        let offset = (page_index - 1) * self.page_size;
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("startIndex", &offset.to_string());
        url
    }
}

impl PaginationStrategy for IndexPaging {
    fn next_page(&mut self, _doc: &Html) -> Option<Url> {
        if self.next_index > self.total_pages {
            return None;
        }
        let url = self.locator_for(self.next_index);
        self.next_index += 1;
        Some(url)
    }

    fn expected_pages(&self) -> Option<usize> {
        Some(self.total_pages)
    }

    fn name(&self) -> &'static str {
        "index-paging"
    }
}

fn strip_volatile_params(url: &Url) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !VOLATILE_PARAMS.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut base = url.clone();
    base.set_query(None);
    for (key, value) in &kept {
        base.query_pairs_mut().append_pair(key, value);
    }
    base
}
