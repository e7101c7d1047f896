use crate::core::extract::{self, ExtractedPage, MarkupProfile};
use crate::core::pagination;
use crate::domain::model::{CrawlProgress, ExportSession, SessionStatus};
use crate::domain::ports::{Delay, PageFetcher, ProgressSink};
use scraper::Html;
use std::time::Duration;
use url::Url;

/// 連續抓頁之間的固定等待時間
pub const PAGE_DELAY: Duration = Duration::from_millis(800);

pub struct TokioDelay;

impl Delay for TokioDelay {
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// 以 tracing 回報進度的預設觀察者
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, progress: &CrawlProgress) {
        match progress.expected_total {
            Some(total) => tracing::info!(
                "Scraping page {}... ({}/{} orders so far)",
                progress.page,
                progress.records_so_far,
                total
            ),
            None => tracing::info!(
                "Scraping page {}... ({} orders so far)",
                progress.page,
                progress.records_so_far
            ),
        }
    }
}

/// 逐頁走訪訂單頁並彙整擷取結果
pub struct OrderCrawler<'a, F: PageFetcher, D: Delay, P: ProgressSink> {
    fetcher: &'a F,
    delay: &'a D,
    progress: &'a P,
}

impl<'a, F: PageFetcher, D: Delay, P: ProgressSink> OrderCrawler<'a, F, D, P> {
    pub fn new(fetcher: &'a F, delay: &'a D, progress: &'a P) -> Self {
        Self {
            fetcher,
            delay,
            progress,
        }
    }

    /// 從呼叫端手上已有的第一頁文件開始走訪
    pub async fn run(&self, initial_body: &str, start_url: &Url) -> ExportSession {
        let mut session = ExportSession::new();

        // Html 不可跨越 await，第一頁的解析集中在這個區塊內完成
        let (profile, mut strategy, mut next_url) = {
            let doc = Html::parse_document(initial_body);
            let profile = MarkupProfile::detect(&doc);
            tracing::debug!("Markup profile: {}", profile.name());

            session.expected_total = extract::total_order_count(&doc);
            if let Some(total) = session.expected_total {
                tracing::info!("Found {} orders", total);
            }

            let extracted = extract::extract_orders(&profile, &doc);
            log_discarded(1, &extracted);

            let mut strategy = pagination::detect_strategy(&doc, start_url);
            let next_url = if extracted.orders.is_empty() {
                // 第一頁就沒有訂單：完全不進行換頁
                None
            } else {
                match strategy.expected_pages() {
                    Some(pages) => {
                        tracing::debug!("Pagination strategy: {} ({} page(s))", strategy.name(), pages)
                    }
                    None => tracing::debug!("Pagination strategy: {}", strategy.name()),
                }
                strategy.next_page(&doc)
            };

            session.records.extend(extracted.orders);
            session.pages_processed = 1;
            self.progress.report(&CrawlProgress {
                page: 1,
                records_so_far: session.records.len(),
                expected_total: session.expected_total,
            });

            (profile, strategy, next_url)
        };

        let mut page = 2;
        while let Some(url) = next_url.take() {
            self.delay.sleep(PAGE_DELAY).await;

            let body = match self.fetcher.fetch(&url).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("Fetching page {} failed: {}", page, e);
                    session.status = SessionStatus::Failed(e);
                    break;
                }
            };

            let (extracted, next) = {
                let doc = Html::parse_document(&body);
                let extracted = extract::extract_orders(&profile, &doc);
                let next = strategy.next_page(&doc);
                (extracted, next)
            };
            log_discarded(page, &extracted);

            let page_empty = extracted.orders.is_empty();
            session.records.extend(extracted.orders);
            session.pages_processed = page;
            self.progress.report(&CrawlProgress {
                page,
                records_so_far: session.records.len(),
                expected_total: session.expected_total,
            });

            if page_empty {
                // 空頁代表已越過最後一頁
                tracing::info!("No orders on page {}, stopping", page);
                break;
            }

            next_url = next;
            page += 1;
        }

        if !session.is_failed() {
            session.status = SessionStatus::Completed;
            tracing::info!(
                "Collected {} orders across {} page(s)",
                session.records.len(),
                session.pages_processed
            );
        }

        session
    }
}

fn log_discarded(page: usize, extracted: &ExtractedPage) {
    if extracted.discarded > 0 {
        tracing::debug!(
            "Dropped {} record(s) without a monetary total on page {}",
            extracted.discarded,
            page
        );
    }
}
