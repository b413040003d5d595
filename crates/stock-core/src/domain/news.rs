//! 종목 관련 뉴스 레코드.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::DateRange;

/// 뉴스 기사.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    /// 게시 시각
    pub date: DateTime<Utc>,
    /// 제목
    pub title: String,
    /// 원문 링크
    pub url: String,
    /// 출처 (언론사/사이트)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// 관련 티커
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub symbols: Vec<String>,
    /// 요약
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// 제공자 측 식별자
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// 최신순으로 정렬하고 기간/개수 조건을 적용합니다.
pub fn select_recent_news(
    mut articles: Vec<NewsArticle>,
    range: &DateRange,
    limit: usize,
) -> Vec<NewsArticle> {
    articles.retain(|a| range.contains(a.date.naive_utc()));
    articles.sort_by(|a, b| b.date.cmp(&a.date));
    articles.truncate(limit);
    articles
}
