//! Canonical naming vocabulary: platforms, metric kinds, and the fixed
//! column names the rest of the engine relies on.

use serde::{Deserialize, Serialize};

/// Identifier column every canonical table carries.
pub const NAME_COLUMN: &str = "name";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Instagram,
    Twitter,
    Tiktok,
}

impl Platform {
    /// All tracked platforms in canonical order.
    pub const ALL: [Platform; 4] = [
        Platform::Facebook,
        Platform::Instagram,
        Platform::Twitter,
        Platform::Tiktok,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::Twitter => "twitter",
            Platform::Tiktok => "tiktok",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metric kinds carried in the long-format export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Fans,
    Posts,
    Likes,
    Comments,
    Shares,
    Engagement,
    VarFans,
    VarLikes,
    VarComments,
    VarShares,
    VarEngagement,
}

impl MetricKind {
    /// Export order of the metric kinds.
    pub const ALL: [MetricKind; 11] = [
        MetricKind::Fans,
        MetricKind::Posts,
        MetricKind::Likes,
        MetricKind::Comments,
        MetricKind::Shares,
        MetricKind::Engagement,
        MetricKind::VarFans,
        MetricKind::VarLikes,
        MetricKind::VarComments,
        MetricKind::VarShares,
        MetricKind::VarEngagement,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Fans => "fans",
            MetricKind::Posts => "posts",
            MetricKind::Likes => "likes",
            MetricKind::Comments => "comments",
            MetricKind::Shares => "shares",
            MetricKind::Engagement => "engagement",
            MetricKind::VarFans => "var_fans",
            MetricKind::VarLikes => "var_likes",
            MetricKind::VarComments => "var_comments",
            MetricKind::VarShares => "var_shares",
            MetricKind::VarEngagement => "var_engagement",
        }
    }

    /// Canonical wide-table column for this metric on `platform`.
    #[must_use]
    pub fn column(self, platform: Platform) -> String {
        canonical_column(self.as_str(), platform)
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds `<metric>_<platform>`.
#[must_use]
pub fn canonical_column(metric: &str, platform: Platform) -> String {
    format!("{metric}_{}", platform.as_str())
}

/// Canonical columns for `metric` across every platform, in platform order.
#[must_use]
pub fn platform_columns(metric: &str) -> Vec<String> {
    Platform::ALL
        .iter()
        .map(|p| canonical_column(metric, *p))
        .collect()
}
