// Player table: identity fields plus numeric statistic columns.

use std::collections::{BTreeSet, HashMap};

// ---------------------------------------------------------------------------
// PlayerRow
// ---------------------------------------------------------------------------

/// One player record from a statistics CSV.
///
/// A statistic absent from `stats` is missing. Non-finite values are never
/// stored, so every present value is safe to sum.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRow {
    pub player: String,
    pub team: String,
    pub position: String,
    pub nation: Option<String>,
    pub cluster: Option<String>,
    pub stats: HashMap<String, f64>,
}

/// The categorical identity fields the filter selectors operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryField {
    Team,
    Cluster,
    Nation,
}

impl CategoryField {
    pub const ALL: [CategoryField; 3] = [
        CategoryField::Team,
        CategoryField::Cluster,
        CategoryField::Nation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CategoryField::Team => "Teams",
            CategoryField::Cluster => "Clusters",
            CategoryField::Nation => "Nations",
        }
    }
}

impl PlayerRow {
    pub fn new(
        player: impl Into<String>,
        team: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        PlayerRow {
            player: player.into(),
            team: team.into(),
            position: position.into(),
            nation: None,
            cluster: None,
            stats: HashMap::new(),
        }
    }

    pub fn with_nation(mut self, nation: impl Into<String>) -> Self {
        self.nation = Some(nation.into());
        self
    }

    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    /// Add a statistic. Non-finite values are dropped (treated as missing).
    pub fn with_stat(mut self, column: impl Into<String>, value: f64) -> Self {
        if value.is_finite() {
            self.stats.insert(column.into(), value);
        }
        self
    }

    pub fn stat(&self, column: &str) -> Option<f64> {
        self.stats.get(column).copied()
    }

    /// True if every listed column has a value.
    pub fn has_all(&self, columns: &[String]) -> bool {
        columns.iter().all(|c| self.stats.contains_key(c))
    }

    pub fn category(&self, field: CategoryField) -> Option<&str> {
        match field {
            CategoryField::Team => Some(self.team.as_str()),
            CategoryField::Cluster => self.cluster.as_deref(),
            CategoryField::Nation => self.nation.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// PlayerTable
// ---------------------------------------------------------------------------

/// Concatenation of one or more statistics files.
///
/// `columns` is the union of numeric statistic columns across all appended
/// files, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerTable {
    columns: Vec<String>,
    rows: Vec<PlayerRow>,
}

impl PlayerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from explicit columns and rows. Duplicate column names
    /// are collapsed to their first occurrence.
    pub fn from_rows(columns: Vec<String>, rows: Vec<PlayerRow>) -> Self {
        let mut table = PlayerTable {
            columns: Vec::with_capacity(columns.len()),
            rows,
        };
        for column in columns {
            table.add_column(column);
        }
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[PlayerRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    fn add_column(&mut self, column: String) {
        if !self.has_column(&column) {
            self.columns.push(column);
        }
    }

    /// Append another table's rows, extending the column set.
    pub fn append(&mut self, other: PlayerTable) {
        for column in other.columns {
            self.add_column(column);
        }
        self.rows.extend(other.rows);
    }

    /// Distinct position values, sorted.
    pub fn distinct_positions(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.position.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_stat_drops_non_finite_values() {
        let row = PlayerRow::new("A", "T", "FW")
            .with_stat("xG", 0.5)
            .with_stat("bad", f64::NAN)
            .with_stat("worse", f64::INFINITY);
        assert_eq!(row.stat("xG"), Some(0.5));
        assert_eq!(row.stat("bad"), None);
        assert_eq!(row.stat("worse"), None);
    }

    #[test]
    fn has_all_requires_every_column() {
        let row = PlayerRow::new("A", "T", "FW").with_stat("xG", 0.5);
        assert!(row.has_all(&["xG".to_string()]));
        assert!(!row.has_all(&["xG".to_string(), "xAG".to_string()]));
        assert!(row.has_all(&[]));
    }

    #[test]
    fn category_lookup() {
        let row = PlayerRow::new("A", "Santos", "FW").with_nation("BRA");
        assert_eq!(row.category(CategoryField::Team), Some("Santos"));
        assert_eq!(row.category(CategoryField::Nation), Some("BRA"));
        assert_eq!(row.category(CategoryField::Cluster), None);
    }

    #[test]
    fn append_unions_columns_in_first_appearance_order() {
        let mut a = PlayerTable::from_rows(
            vec!["GA".into(), "Saves".into()],
            vec![PlayerRow::new("Keeper", "T1", "GK").with_stat("GA", 1.0)],
        );
        let b = PlayerTable::from_rows(
            vec!["xG".into(), "GA".into()],
            vec![PlayerRow::new("Striker", "T2", "FW").with_stat("xG", 0.4)],
        );
        a.append(b);
        assert_eq!(a.columns(), &["GA", "Saves", "xG"]);
        assert_eq!(a.len(), 2);
        assert_eq!(a.rows()[1].player, "Striker");
    }

    #[test]
    fn from_rows_collapses_duplicate_columns() {
        let table = PlayerTable::from_rows(vec!["xG".into(), "xG".into()], vec![]);
        assert_eq!(table.columns(), &["xG"]);
        assert!(table.is_empty());
    }

    #[test]
    fn distinct_positions_sorted() {
        let table = PlayerTable::from_rows(
            vec![],
            vec![
                PlayerRow::new("A", "T", "MF"),
                PlayerRow::new("B", "T", "DF"),
                PlayerRow::new("C", "T", "MF"),
            ],
        );
        assert_eq!(table.distinct_positions(), vec!["DF", "MF"]);
    }
}
