use crate::app_config::PlatformWeights;
use crate::table::Table;

/// Per-platform weighting stage. Currently a pass-through: the table comes
/// back unchanged whatever `weights` hold.
///
/// This is where per-platform multipliers would scale the
/// `<metric>_<platform>` columns before aggregation. Non-default weights are
/// logged so a configured profile never silently looks applied.
#[must_use]
pub fn apply_platform_weights(table: Table, weights: &PlatformWeights) -> Table {
    for (platform, weight) in weights.non_default() {
        tracing::info!(
            platform = %platform,
            weight,
            "platform weighting is disabled; weight ignored"
        );
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Cell, Column};

    #[test]
    fn weights_leave_table_untouched() {
        let table = Table::from_columns(vec![
            Column::new("name", vec!["Acme".into()]),
            Column::new("fans_tiktok", vec![Cell::Number(40.0)]),
        ])
        .unwrap();
        let weights = PlatformWeights {
            tiktok: 3.0,
            ..PlatformWeights::default()
        };
        assert_eq!(apply_platform_weights(table.clone(), &weights), table);
    }

    #[test]
    fn default_weights_are_all_one() {
        assert!(PlatformWeights::default().non_default().is_empty());
    }
}
