use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A single news item as returned by the remote service and stored in the
/// local articles table. Immutable once received; feeds replace their lists
/// wholesale on refetch instead of mutating elements.
///
/// `url` is the de-facto identity when `id` is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: Option<i64>,
    pub title: String,
    pub excerpt: Option<String>,
    pub url: String,
    pub category: Option<String>,
    /// 0..1 confidence value from the search backend
    pub relevance_score: Option<f64>,
    /// Kept as the wire string; parsed leniently at comparison time
    pub publish_time: Option<String>,
    pub content: Option<String>,
}

impl Article {
    /// Publication time as an instant. Missing or unparseable timestamps
    /// sort as the Unix epoch (i.e. oldest).
    pub fn publish_instant(&self) -> DateTime<Utc> {
        self.publish_time
            .as_deref()
            .map(parse_publish_time)
            .unwrap_or(DateTime::UNIX_EPOCH)
    }
}

/// Parse a publish timestamp leniently: RFC 3339 first, then a bare
/// `YYYY-MM-DD` date (midnight UTC), falling back to the Unix epoch.
pub fn parse_publish_time(raw: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_time(NaiveTime::MIN).and_utc();
    }
    DateTime::UNIX_EPOCH
}

/// Success body of POST /search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub articles: Vec<Article>,
}

/// Success body of POST /query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub summary: String,
    /// May be empty even on success
    pub articles_used: Vec<Article>,
}

/// Success body of POST /summarize-url
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub title: String,
    pub summary: String,
    pub category: Option<String>,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_publish_time_accepts_rfc3339_and_bare_dates() {
        assert_eq!(
            parse_publish_time("2024-06-01T12:30:00Z"),
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap()
        );
        assert_eq!(
            parse_publish_time("2024-06-01"),
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn parse_publish_time_falls_back_to_epoch() {
        assert_eq!(parse_publish_time("not a date"), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn missing_publish_time_is_epoch() {
        let article = Article {
            id: None,
            title: "t".into(),
            excerpt: None,
            url: "https://example.com/a".into(),
            category: None,
            relevance_score: None,
            publish_time: None,
            content: None,
        };
        assert_eq!(article.publish_instant(), DateTime::UNIX_EPOCH);
    }
}
