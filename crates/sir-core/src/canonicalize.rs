//! Column-name canonicalization.
//!
//! Source tables name the same metric in many ways (`followers_facebook`,
//! `Seguidores_Facebook`, `fans_facebook`). A [`RuleSet`] maps every known
//! synonym onto the canonical `<metric>_<platform>` name; matching is
//! case-insensitive, whole-name and first-match-wins in rule order.

use std::collections::HashSet;

use regex::Regex;

use crate::schema::{Platform, NAME_COLUMN};
use crate::table::{Cell, Column, Table};

/// Identifier synonyms, in priority order.
const ID_SYNONYMS: &[&str] = &["name", "page", "account", "perfil", "nome"];

/// Canonical templates and their synonyms; `{p}` expands to each platform.
/// The canonical template itself is always tried first.
const SYNONYM_TEMPLATES: &[(&str, &[&str])] = &[
    ("fans_{p}", &["followers_{p}", "seguidores_{p}"]),
    ("posts_{p}", &["posts_count_{p}", "qtd_posts_{p}"]),
    ("likes_{p}", &["curtidas_{p}"]),
    ("comments_{p}", &["comentarios_{p}"]),
    ("shares_{p}", &["compartilhamentos_{p}"]),
    ("engagement_{p}", &["eng_{p}", "engagement_rate_{p}"]),
    ("var_fans_{p}", &["delta_followers_{p}"]),
    ("var_likes_{p}", &["delta_likes_{p}"]),
    ("var_comments_{p}", &["delta_comments_{p}"]),
    ("var_shares_{p}", &["delta_shares_{p}"]),
    ("var_engagement_{p}", &["delta_eng_{p}", "delta_engagement_{p}"]),
    ("presence_{p}", &["has_{p}", "{p}_present"]),
];

/// Synonyms that only exist on one platform.
fn platform_specific_synonyms(template: &str, platform: Platform) -> &'static [&'static str] {
    match (template, platform) {
        ("shares_{p}", Platform::Twitter) => &["retweets_{p}"],
        ("shares_{p}", Platform::Tiktok) => &["video_shares_{p}"],
        _ => &[],
    }
}

/// One canonical name and the whole-name patterns that resolve to it.
#[derive(Debug, Clone)]
pub struct SynonymRule {
    canonical: String,
    platform: Option<Platform>,
    patterns: Vec<Regex>,
}

impl SynonymRule {
    /// Compiles a rule from regex fragments. Each fragment is anchored and
    /// made case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] if a fragment is not a valid regex.
    pub fn new(
        canonical: impl Into<String>,
        platform: Option<Platform>,
        synonyms: &[String],
    ) -> Result<Self, regex::Error> {
        let patterns = synonyms
            .iter()
            .map(|s| Regex::new(&format!("(?i)^(?:{s})$")))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            canonical: canonical.into(),
            platform,
            patterns,
        })
    }

    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    #[must_use]
    pub fn platform(&self) -> Option<Platform> {
        self.platform
    }

    #[must_use]
    pub fn matches(&self, column: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(column))
    }
}

/// Ordered synonym rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<SynonymRule>,
}

impl RuleSet {
    #[must_use]
    pub fn new(rules: Vec<SynonymRule>) -> Self {
        Self { rules }
    }

    /// The built-in rule table: identifier synonyms followed by every
    /// metric template expanded for each platform.
    ///
    /// # Panics
    ///
    /// Panics if a built-in synonym fragment fails to compile as a regex.
    #[must_use]
    pub fn standard() -> Self {
        let id_synonyms: Vec<String> = ID_SYNONYMS.iter().map(|s| (*s).to_string()).collect();
        let mut rules =
            vec![SynonymRule::new(NAME_COLUMN, None, &id_synonyms).expect("valid identifier regex")];

        for (template, synonyms) in SYNONYM_TEMPLATES {
            for platform in Platform::ALL {
                let expand = |t: &str| t.replace("{p}", platform.as_str());
                let canonical = expand(template);
                let fragments: Vec<String> = std::iter::once(*template)
                    .chain(synonyms.iter().copied())
                    .chain(platform_specific_synonyms(template, platform).iter().copied())
                    .map(expand)
                    .collect();
                rules.push(
                    SynonymRule::new(canonical, Some(platform), &fragments)
                        .expect("valid synonym regex"),
                );
            }
        }

        Self { rules }
    }

    #[must_use]
    pub fn rules(&self) -> &[SynonymRule] {
        &self.rules
    }

    /// Canonical name for `column`, or `None` if no rule matches.
    #[must_use]
    pub fn resolve(&self, column: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|r| r.matches(column))
            .map(SynonymRule::canonical)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Canonical-prefix groups whose absence is reported after renaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnGroup {
    Presence,
    Fans,
    Posts,
    Reactions,
    Engagement,
    VarFans,
    VarReactions,
    VarEngagement,
}

impl ColumnGroup {
    pub const ALL: [ColumnGroup; 8] = [
        ColumnGroup::Presence,
        ColumnGroup::Fans,
        ColumnGroup::Posts,
        ColumnGroup::Reactions,
        ColumnGroup::Engagement,
        ColumnGroup::VarFans,
        ColumnGroup::VarReactions,
        ColumnGroup::VarEngagement,
    ];

    /// The prefix pattern this group stands for, as shown in reports.
    #[must_use]
    pub fn pattern(self) -> &'static str {
        match self {
            ColumnGroup::Presence => "^presence_",
            ColumnGroup::Fans => "^fans_",
            ColumnGroup::Posts => "^posts_",
            ColumnGroup::Reactions => "^(likes|comments|shares)_",
            ColumnGroup::Engagement => "^engagement_",
            ColumnGroup::VarFans => "^var_fans_",
            ColumnGroup::VarReactions => "^var_(likes|comments|shares)_",
            ColumnGroup::VarEngagement => "^var_engagement_",
        }
    }

    fn prefixes(self) -> &'static [&'static str] {
        match self {
            ColumnGroup::Presence => &["presence_"],
            ColumnGroup::Fans => &["fans_"],
            ColumnGroup::Posts => &["posts_"],
            ColumnGroup::Reactions => &["likes_", "comments_", "shares_"],
            ColumnGroup::Engagement => &["engagement_"],
            ColumnGroup::VarFans => &["var_fans_"],
            ColumnGroup::VarReactions => &["var_likes_", "var_comments_", "var_shares_"],
            ColumnGroup::VarEngagement => &["var_engagement_"],
        }
    }

    #[must_use]
    pub fn matches(self, column: &str) -> bool {
        self.prefixes().iter().any(|p| column.starts_with(p))
    }
}

impl std::fmt::Display for ColumnGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.pattern())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRename {
    pub from: String,
    pub to: String,
}

/// What canonicalization did to a table. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalizationReport {
    /// Renames actually applied, in source column order.
    pub applied: Vec<ColumnRename>,
    /// Source columns dropped because an earlier column already claimed the
    /// same canonical name.
    pub dropped_duplicates: Vec<String>,
    /// Groups with no column at all; they score as zero downstream.
    pub missing_groups: Vec<ColumnGroup>,
    /// `true` when no identifier column existed and `name` was built from
    /// row positions.
    pub synthesized_name: bool,
}

#[derive(Debug, Clone)]
pub struct Canonicalized {
    pub table: Table,
    pub report: CanonicalizationReport,
}

/// Renames recognized columns of `table` to their canonical names.
///
/// The first column to claim a canonical name keeps it; later claimants are
/// dropped and listed in [`CanonicalizationReport::dropped_duplicates`].
/// Unrecognized columns pass through untouched.
#[must_use]
pub fn canonicalize_columns(table: Table, rules: &RuleSet) -> Canonicalized {
    let row_count = table.row_count();
    let mut report = CanonicalizationReport::default();
    let mut taken: HashSet<String> = HashSet::new();
    let mut columns: Vec<Column> = Vec::new();

    for mut column in table.into_columns() {
        let target = rules
            .resolve(&column.name)
            .map_or_else(|| column.name.clone(), str::to_string);

        if !taken.insert(target.clone()) {
            tracing::warn!(
                column = %column.name,
                canonical = %target,
                "duplicate canonical column dropped"
            );
            report.dropped_duplicates.push(column.name);
            continue;
        }

        if target != column.name {
            report.applied.push(ColumnRename {
                from: std::mem::replace(&mut column.name, target.clone()),
                to: target,
            });
        }
        columns.push(column);
    }

    if !taken.contains(NAME_COLUMN) {
        report.synthesized_name = true;
        let ids = (0..row_count).map(|i| Cell::Text(i.to_string())).collect();
        columns.insert(0, Column::new(NAME_COLUMN, ids));
    }

    report.missing_groups = ColumnGroup::ALL
        .into_iter()
        .filter(|g| !columns.iter().any(|c| g.matches(&c.name)))
        .collect();

    let table = Table::from_parts(columns, row_count);

    Canonicalized { table, report }
}

#[cfg(test)]
#[path = "canonicalize_test.rs"]
mod tests;
