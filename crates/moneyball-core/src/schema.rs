// Position schema registry: which statistic columns matter for each position.

use crate::config::{ColumnsConfig, PositionConfig, SchemaKind};
use crate::data::table::PlayerTable;

/// A position category and the statistic columns relevant to it.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSchema {
    pub name: String,
    /// Ordered statistic columns (identity columns excluded).
    pub stat_columns: Vec<String>,
    /// Position values a row must carry. Empty means rows are selected by
    /// completeness of `stat_columns` alone.
    pub position_values: Vec<String>,
}

impl PositionSchema {
    pub fn new(name: impl Into<String>, stat_columns: &[&str]) -> Self {
        PositionSchema {
            name: name.into(),
            stat_columns: stat_columns.iter().map(|c| c.to_string()).collect(),
            position_values: Vec::new(),
        }
    }

    pub fn with_position_values(mut self, values: &[&str]) -> Self {
        self.position_values = values.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn matches_position(&self, position: &str) -> bool {
        self.position_values.is_empty() || self.position_values.iter().any(|p| p == position)
    }

    /// Identity columns (player, team, position) followed by the stat columns.
    pub fn relevant_columns<'a>(&'a self, identity: &'a ColumnsConfig) -> Vec<&'a str> {
        let mut columns = vec![
            identity.player.as_str(),
            identity.team.as_str(),
            identity.position.as_str(),
        ];
        columns.extend(self.stat_columns.iter().map(String::as_str));
        columns
    }

    /// Split the stat columns into those present in `table` and those absent.
    pub fn split_by_presence(&self, table: &PlayerTable) -> (Vec<String>, Vec<String>) {
        self.stat_columns
            .iter()
            .cloned()
            .partition(|c| table.has_column(c))
    }
}

/// Static categories of the Brasileirao dashboard. Column names match the
/// published CSV headers exactly.
const BUILTIN: &[(&str, &[&str])] = &[
    (
        "Goalkeepers",
        &["GA", "Saves", "Clean Sheet", "PSxG", "Passes Launch%", "Crosses Stp%", "Sweeper #OPA"],
    ),
    (
        "Attacking Midfielders",
        &["xG", "xAG", "G-PK", "Assistencias", "Key_Pass", "Passing 1/3", "Cross", "%Dribles"],
    ),
    (
        "Wingers",
        &[
            "xG+xAg",
            "KeyPass",
            "Cross",
            "1/3",
            "Dribles Certos",
            "Corridas 1/3",
            "Corridas PA",
            "passPA",
            "crossPA",
        ],
    ),
    (
        "Defensive Midfielders",
        &[
            "Amarelo",
            "Vermelho",
            "Falta Cometida",
            "interceptacao",
            "recuperacoes",
            "Duelos Aereoes W",
            "Divididas Ganhas",
            "Clearence",
            "Erros",
        ],
    ),
    (
        "Centre-Backs",
        &[
            "Aerial Duel Won",
            "Fouls",
            "Yellow Card",
            "Red Card",
            "Desarmes Certos",
            "Interceptacao",
            "Erros",
        ],
    ),
    (
        "Full-Backs",
        &[
            "xAG",
            "Fouls",
            "Yellow Card",
            "Red Card",
            "Cross",
            "Desarmes Certos",
            "Interceptacao",
            "Erros",
        ],
    ),
    (
        "Strikers",
        &["xG", "xAG", "G-PK", "Assistencias", "Acoes Ofensivas", "Aerial Duel%"],
    ),
];

/// Ordered collection of position schemas for one profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaRegistry {
    schemas: Vec<PositionSchema>,
}

impl SchemaRegistry {
    pub fn new(schemas: Vec<PositionSchema>) -> Self {
        SchemaRegistry { schemas }
    }

    /// The static seven-category table.
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN
                .iter()
                .map(|(name, columns)| PositionSchema::new(*name, columns))
                .collect(),
        )
    }

    pub fn from_config(positions: &[PositionConfig]) -> Self {
        Self::new(
            positions
                .iter()
                .map(|p| PositionSchema {
                    name: p.name.clone(),
                    stat_columns: p.columns.clone(),
                    position_values: p.position_values.clone(),
                })
                .collect(),
        )
    }

    /// One category per distinct position value. A category's columns are
    /// the numeric columns populated for every row of that position.
    pub fn derive(table: &PlayerTable) -> Self {
        let schemas = table
            .distinct_positions()
            .into_iter()
            .map(|position| {
                let rows: Vec<_> = table
                    .rows()
                    .iter()
                    .filter(|r| r.position == position)
                    .collect();
                let stat_columns = table
                    .columns()
                    .iter()
                    .filter(|c| rows.iter().all(|r| r.stats.contains_key(c.as_str())))
                    .cloned()
                    .collect();
                PositionSchema {
                    name: position.clone(),
                    stat_columns,
                    position_values: vec![position],
                }
            })
            .collect();
        Self::new(schemas)
    }

    /// Build the registry a profile asks for.
    pub fn for_profile(
        kind: SchemaKind,
        positions: &[PositionConfig],
        table: &PlayerTable,
    ) -> Self {
        match kind {
            SchemaKind::Builtin => Self::builtin(),
            SchemaKind::Derived => Self::derive(table),
            SchemaKind::Custom => Self::from_config(positions),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PositionSchema> {
        self.schemas.iter().find(|s| s.name == name)
    }

    pub fn at(&self, index: usize) -> Option<&PositionSchema> {
        self.schemas.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.schemas.iter().position(|s| s.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.schemas.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PositionSchema> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
