//! Query descriptions shared by the repository ports and services.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Post, PostStatus};

/// Ordering of post listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostOrder {
    /// Newest publish date first. The default for every listing.
    #[default]
    PublishDesc,
    PublishAsc,
    CreatedDesc,
    /// Status code ascending (drafts first), then publish ascending.
    StatusThenPublish,
    TitleAsc,
}

impl PostOrder {
    /// Sort `posts` in place. Storage adapters without a query planner
    /// use this to match the SQL ordering.
    pub fn sort(self, posts: &mut [Post]) {
        match self {
            PostOrder::PublishDesc => posts.sort_by(|a, b| b.publish.cmp(&a.publish)),
            PostOrder::PublishAsc => posts.sort_by(|a, b| a.publish.cmp(&b.publish)),
            PostOrder::CreatedDesc => posts.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            PostOrder::StatusThenPublish => posts.sort_by(|a, b| {
                a.status
                    .code()
                    .cmp(b.status.code())
                    .then(a.publish.cmp(&b.publish))
            }),
            PostOrder::TitleAsc => posts.sort_by(|a, b| a.title.cmp(&b.title)),
        }
    }
}

/// Half-open timestamp range `[since, until)`. Either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn is_unbounded(&self) -> bool {
        self.since.is_none() && self.until.is_none()
    }

    /// A range that contains nothing.
    pub fn empty() -> Self {
        Self {
            since: Some(DateTime::<Utc>::UNIX_EPOCH),
            until: Some(DateTime::<Utc>::UNIX_EPOCH),
        }
    }

    /// The UTC calendar day `date`.
    pub fn day(date: NaiveDate) -> Self {
        Self::between(date, date.succ_opt())
    }

    fn between(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self {
            since: Some(midnight(start)),
            until: end.map(midnight),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!((self.since, self.until), (Some(since), Some(until)) if since >= until)
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.since.is_none_or(|since| at >= since) && self.until.is_none_or(|until| at < until)
    }
}

/// Admin listing query: free-text search, filters and date drill-down.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostQuery {
    /// Case-insensitive substring matched against title, body and slug.
    pub search: Option<String>,
    pub author_id: Option<Uuid>,
    pub status: Option<PostStatus>,
    pub publish: DateRange,
    pub created: DateRange,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub order: Option<PostOrder>,
}

impl PostQuery {
    /// Search term, trimmed, or `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Whether `post` satisfies every filter of this query.
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(term) = self.search_term() {
            let term = term.to_lowercase();
            let hit = [&post.title, &post.body, &post.slug]
                .iter()
                .any(|field| field.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }
        if self.author_id.is_some_and(|author| author != post.author_id) {
            return false;
        }
        if self.status.is_some_and(|status| status != post.status) {
            return false;
        }
        if !self.publish.contains(post.publish) || !self.created.contains(post.created_at) {
            return false;
        }
        self.drilldown()
            .is_none_or(|range| range.contains(post.publish))
    }

    /// Publish range selected by the date hierarchy: the year, the month of
    /// that year, or the day of that month. `month` is ignored without
    /// `year`, and `day` without `month`. An impossible date selects nothing.
    pub fn drilldown(&self) -> Option<DateRange> {
        let year = self.year?;
        let range = match (self.month, self.day) {
            (Some(month), Some(day)) => NaiveDate::from_ymd_opt(year, month, day).map(DateRange::day),
            (Some(month), None) => NaiveDate::from_ymd_opt(year, month, 1).map(|start| {
                let end = if month == 12 {
                    NaiveDate::from_ymd_opt(year + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(year, month + 1, 1)
                };
                DateRange::between(start, end)
            }),
            (None, _) => NaiveDate::from_ymd_opt(year, 1, 1)
                .map(|start| DateRange::between(start, NaiveDate::from_ymd_opt(year + 1, 1, 1))),
        };
        Some(range.unwrap_or_else(DateRange::empty))
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
