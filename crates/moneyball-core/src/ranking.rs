// Ranking and filtering: position subset, categorical filters, scored order.

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::debug;

use crate::data::table::{CategoryField, PlayerRow, PlayerTable};
use crate::schema::{PositionSchema, SchemaRegistry};
use crate::scoring::{score_rows, RowScore, ScoringError, WeightMap};

#[derive(Debug, Error, PartialEq)]
pub enum RankingError {
    #[error("unknown position category `{0}`")]
    UnknownPosition(String),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Categorical selections applied after the position subset.
///
/// `None` selects every value. `Some(set)` selects exactly the listed values,
/// so an empty set matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub teams: Option<BTreeSet<String>>,
    pub clusters: Option<BTreeSet<String>>,
    pub nations: Option<BTreeSet<String>>,
}

impl Filters {
    /// Every value of every field selected.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn get(&self, field: CategoryField) -> Option<&BTreeSet<String>> {
        match field {
            CategoryField::Team => self.teams.as_ref(),
            CategoryField::Cluster => self.clusters.as_ref(),
            CategoryField::Nation => self.nations.as_ref(),
        }
    }

    fn slot(&mut self, field: CategoryField) -> &mut Option<BTreeSet<String>> {
        match field {
            CategoryField::Team => &mut self.teams,
            CategoryField::Cluster => &mut self.clusters,
            CategoryField::Nation => &mut self.nations,
        }
    }

    pub fn set(&mut self, field: CategoryField, selection: Option<BTreeSet<String>>) {
        *self.slot(field) = selection;
    }

    pub fn is_selected(&self, field: CategoryField, value: &str) -> bool {
        self.get(field).map_or(true, |set| set.contains(value))
    }

    /// True if the row passes `field`. Rows without a value for the field
    /// pass only when the field is unrestricted.
    pub fn matches_field(&self, row: &PlayerRow, field: CategoryField) -> bool {
        match self.get(field) {
            None => true,
            Some(set) => row.category(field).is_some_and(|v| set.contains(v)),
        }
    }

    pub fn matches(&self, row: &PlayerRow) -> bool {
        CategoryField::ALL
            .iter()
            .all(|field| self.matches_field(row, *field))
    }

    /// Flip `value` in or out of the selection. `options` are the values
    /// currently offered; selecting all of them again lifts the restriction.
    pub fn toggle(&mut self, field: CategoryField, value: &str, options: &[String]) {
        let slot = self.slot(field);
        let mut set = slot
            .take()
            .unwrap_or_else(|| options.iter().cloned().collect());
        if !set.remove(value) {
            set.insert(value.to_string());
        }
        if !options.is_empty() && options.iter().all(|o| set.contains(o)) {
            *slot = None;
        } else {
            *slot = Some(set);
        }
    }

    pub fn select_only(&mut self, field: CategoryField, value: &str) {
        self.set(field, Some(BTreeSet::from([value.to_string()])));
    }

    pub fn select_all(&mut self, field: CategoryField) {
        self.set(field, None);
    }

    pub fn select_none(&mut self, field: CategoryField) {
        self.set(field, Some(BTreeSet::new()));
    }

    pub fn is_unrestricted(&self) -> bool {
        self.teams.is_none() && self.clusters.is_none() && self.nations.is_none()
    }
}

/// Distinct values of `field` across `rows`, sorted.
pub fn available_values(rows: &[&PlayerRow], field: CategoryField) -> Vec<String> {
    rows.iter()
        .filter_map(|r| r.category(field))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Selector options, cascading from cluster to team to nation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryOptions {
    /// Clusters present in the position subset.
    pub clusters: Vec<String>,
    /// Teams present after the cluster filter.
    pub teams: Vec<String>,
    /// Nations present after the cluster and team filters.
    pub nations: Vec<String>,
}

impl CategoryOptions {
    pub fn get(&self, field: CategoryField) -> &[String] {
        match field {
            CategoryField::Team => &self.teams,
            CategoryField::Cluster => &self.clusters,
            CategoryField::Nation => &self.nations,
        }
    }
}

pub fn cascade_options(position_rows: &[&PlayerRow], filters: &Filters) -> CategoryOptions {
    let clusters = available_values(position_rows, CategoryField::Cluster);
    let by_cluster: Vec<&PlayerRow> = position_rows
        .iter()
        .copied()
        .filter(|r| filters.matches_field(r, CategoryField::Cluster))
        .collect();
    let teams = available_values(&by_cluster, CategoryField::Team);
    let by_team: Vec<&PlayerRow> = by_cluster
        .into_iter()
        .filter(|r| filters.matches_field(r, CategoryField::Team))
        .collect();
    let nations = available_values(&by_team, CategoryField::Nation);
    CategoryOptions {
        clusters,
        teams,
        nations,
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Schema columns split into those the table carries and those it lacks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoredColumns {
    pub present: Vec<String>,
    pub absent: Vec<String>,
}

impl ScoredColumns {
    pub fn for_schema(schema: &PositionSchema, table: &PlayerTable) -> Self {
        let (present, absent) = schema.split_by_presence(table);
        ScoredColumns { present, absent }
    }
}

/// Rows of `table` belonging to `schema`'s position with no missing value in
/// `columns`, paired with their table index. Empty when there is no column
/// to score.
pub fn position_subset<'a>(
    table: &'a PlayerTable,
    schema: &PositionSchema,
    columns: &[String],
) -> Vec<(usize, &'a PlayerRow)> {
    if columns.is_empty() {
        return Vec::new();
    }
    table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, r)| schema.matches_position(&r.position) && r.has_all(columns))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    /// 1-based.
    pub rank: usize,
    /// Index into the table's rows.
    pub index: usize,
    pub player: String,
    pub team: String,
    pub score: RowScore,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    pub position: String,
    /// Columns that were scored, in schema order.
    pub columns: Vec<String>,
    /// Schema columns missing from the table and left out of scoring.
    pub absent_columns: Vec<String>,
    pub rows: Vec<RankedRow>,
}

impl Ranking {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First ranked row for `player`.
    pub fn find(&self, player: &str) -> Option<&RankedRow> {
        self.rows.iter().find(|r| r.player == player)
    }

    /// Table indices in rank order.
    pub fn indices(&self) -> Vec<usize> {
        self.rows.iter().map(|r| r.index).collect()
    }
}

/// Score and order the rows of one position category.
///
/// An empty filtered subset yields an empty ranking rather than an error.
pub fn rank_players(
    table: &PlayerTable,
    schema: &PositionSchema,
    filters: &Filters,
    weights: &WeightMap,
) -> Result<Ranking, RankingError> {
    let columns = ScoredColumns::for_schema(schema, table);
    if !columns.absent.is_empty() {
        debug!(
            "{}: columns not in table, left out of scoring: {:?}",
            schema.name, columns.absent
        );
    }

    let subset: Vec<(usize, &PlayerRow)> = position_subset(table, schema, &columns.present)
        .into_iter()
        .filter(|(_, r)| filters.matches(r))
        .collect();

    let mut ranking = Ranking {
        position: schema.name.clone(),
        columns: columns.present,
        absent_columns: columns.absent,
        rows: Vec::with_capacity(subset.len()),
    };
    if subset.is_empty() {
        debug!("{}: empty subset after filters", schema.name);
        return Ok(ranking);
    }

    let rows: Vec<&PlayerRow> = subset.iter().map(|(_, r)| *r).collect();
    let scores = score_rows(&rows, &ranking.columns, weights)?;

    let mut scored: Vec<((usize, &PlayerRow), RowScore)> = subset.into_iter().zip(scores).collect();
    // Vec::sort_by is stable: ties keep table order.
    scored.sort_by(|a, b| b.1.normalized.total_cmp(&a.1.normalized));

    ranking.rows = scored
        .into_iter()
        .enumerate()
        .map(|(i, ((index, row), score))| RankedRow {
            rank: i + 1,
            index,
            player: row.player.clone(),
            team: row.team.clone(),
            score,
        })
        .collect();

    debug!(
        "{}: ranked {} rows over {} columns",
        ranking.position,
        ranking.len(),
        ranking.columns.len()
    );
    Ok(ranking)
}

/// `rank_players` for a category looked up by name.
pub fn rank_position(
    table: &PlayerTable,
    registry: &SchemaRegistry,
    position: &str,
    filters: &Filters,
    weights: &WeightMap,
) -> Result<Ranking, RankingError> {
    let schema = registry
        .get(position)
        .ok_or_else(|| RankingError::UnknownPosition(position.to_string()))?;
    rank_players(table, schema, filters, weights)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
