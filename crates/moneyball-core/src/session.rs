// Dashboard session: the state one user interacts with and its recompute.
//
// Every mutation goes through `Session::apply`, which recomputes the ranking
// synchronously. Nothing here runs concurrently.

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::config::{ProfileConfig, WeightsConfig};
use crate::data::loader::LoadReport;
use crate::data::table::{CategoryField, PlayerRow, PlayerTable};
use crate::radar::{build_radar, RadarChart};
use crate::ranking::{
    cascade_options, position_subset, rank_players, CategoryOptions, Filters, Ranking,
    ScoredColumns,
};
use crate::scatter::{build_scatter, numeric_columns, ScatterPlot};
use crate::schema::{PositionSchema, SchemaRegistry};
use crate::scoring::{WeightMap, WeightSlider};

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Something was skipped; the dashboard still works.
    Warning,
    /// Nothing can be ranked.
    Blocking,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn blocking(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Blocking,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// A user action against the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    NextPosition,
    PreviousPosition,
    SelectPosition(String),
    ToggleFilter(CategoryField, String),
    SelectOnly(CategoryField, String),
    SelectAll(CategoryField),
    SelectNone(CategoryField),
    /// Move a weight by slider steps (negative moves down).
    AdjustWeight { column: String, steps: i32 },
    SetWeight { column: String, weight: f64 },
    ResetWeights,
    ToggleRadarPlayer(String),
    ClearRadar,
    CycleScatterX { forward: bool },
    CycleScatterY { forward: bool },
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct Session {
    profile: String,
    title: String,
    table: PlayerTable,
    registry: SchemaRegistry,
    loaded_files: Vec<String>,
    loaded_at: DateTime<Local>,
    load_notices: Vec<Notice>,
    position_notice: Option<Notice>,

    slider: WeightSlider,
    weights: WeightMap,
    position: usize,
    filters: Filters,
    options: CategoryOptions,
    radar_players: Vec<String>,
    scatter_columns: Vec<String>,
    scatter_x: Option<String>,
    scatter_y: Option<String>,

    ranking: Ranking,
}

impl Session {
    /// Build a session from a finished load and compute the first ranking.
    pub fn new(profile: &ProfileConfig, report: LoadReport, weights: WeightsConfig) -> Self {
        let LoadReport {
            table,
            loaded,
            failures,
        } = report;

        let mut load_notices: Vec<Notice> = failures
            .iter()
            .map(|f| Notice::warning(format!("{} not loaded: {}", f.file, f.error)))
            .collect();

        let registry = SchemaRegistry::for_profile(profile.schema, &profile.positions, &table);
        if table.is_empty() {
            load_notices.push(Notice::blocking(format!(
                "No player data could be loaded for {}",
                profile.title
            )));
        } else if registry.is_empty() {
            load_notices.push(Notice::blocking("No position categories available"));
        }

        info!(
            "Session for {}: {} rows, {} positions, {} file(s) failed",
            profile.name,
            table.len(),
            registry.len(),
            failures.len()
        );

        let mut session = Session {
            profile: profile.name.clone(),
            title: profile.title.clone(),
            table,
            registry,
            loaded_files: loaded,
            loaded_at: Local::now(),
            load_notices,
            position_notice: None,
            slider: weights.into(),
            weights: WeightMap::new(),
            position: 0,
            filters: Filters::all(),
            options: CategoryOptions::default(),
            radar_players: Vec::new(),
            scatter_columns: Vec::new(),
            scatter_x: None,
            scatter_y: None,
            ranking: Ranking::default(),
        };
        session.enter_position();
        session
    }

    /// Apply a command and recompute.
    pub fn apply(&mut self, command: SessionCommand) {
        debug!("apply {:?}", command);
        match command {
            SessionCommand::NextPosition => self.step_position(1),
            SessionCommand::PreviousPosition => self.step_position(-1),
            SessionCommand::SelectPosition(name) => match self.registry.index_of(&name) {
                Some(index) => self.set_position(index),
                None => warn!("ignoring unknown position `{}`", name),
            },
            SessionCommand::ToggleFilter(field, value) => {
                let options = self.options.get(field).to_vec();
                self.filters.toggle(field, &value, &options);
            }
            SessionCommand::SelectOnly(field, value) => self.filters.select_only(field, &value),
            SessionCommand::SelectAll(field) => self.filters.select_all(field),
            SessionCommand::SelectNone(field) => self.filters.select_none(field),
            SessionCommand::AdjustWeight { column, steps } => {
                let weight = self.weights.adjust(&column, steps, &self.slider);
                debug!("weight {} -> {:.1}", column, weight);
            }
            SessionCommand::SetWeight { column, weight } => self.weights.set(column, weight),
            SessionCommand::ResetWeights => {
                if let Some(schema) = self.registry.at(self.position) {
                    self.weights.reset(&schema.stat_columns);
                }
            }
            SessionCommand::ToggleRadarPlayer(player) => {
                if let Some(i) = self.radar_players.iter().position(|p| *p == player) {
                    self.radar_players.remove(i);
                } else {
                    self.radar_players.push(player);
                }
            }
            SessionCommand::ClearRadar => self.radar_players.clear(),
            SessionCommand::CycleScatterX { forward } => {
                self.scatter_x = cycle(&self.scatter_columns, self.scatter_x.as_deref(), forward);
            }
            SessionCommand::CycleScatterY { forward } => {
                self.scatter_y = cycle(&self.scatter_columns, self.scatter_y.as_deref(), forward);
            }
        }
        self.recompute();
    }

    fn step_position(&mut self, delta: isize) {
        let len = self.registry.len();
        if len == 0 {
            return;
        }
        let next = (self.position as isize + delta).rem_euclid(len as isize) as usize;
        self.set_position(next);
    }

    fn set_position(&mut self, index: usize) {
        if index == self.position {
            return;
        }
        self.position = index;
        self.enter_position();
    }

    /// Reset position-scoped state and seed weights for the new category.
    fn enter_position(&mut self) {
        self.filters = Filters::all();
        self.position_notice = None;
        if let Some(schema) = self.registry.at(self.position) {
            let columns = ScoredColumns::for_schema(schema, &self.table);
            self.weights.seed(&columns.present);
            if !columns.absent.is_empty() && !self.table.is_empty() {
                warn!(
                    "{}: columns missing from data: {}",
                    schema.name,
                    columns.absent.join(", ")
                );
                self.position_notice = Some(Notice::warning(format!(
                    "{}: not in data, ignored: {}",
                    schema.name,
                    columns.absent.join(", ")
                )));
            }
            info!("Position {}", schema.name);
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        let Some(schema) = self.blocking_free_schema() else {
            self.ranking = Ranking::default();
            self.options = CategoryOptions::default();
            self.scatter_columns.clear();
            return;
        };

        let columns = ScoredColumns::for_schema(schema, &self.table);
        let position_rows: Vec<&PlayerRow> = position_subset(&self.table, schema, &columns.present)
            .into_iter()
            .map(|(_, r)| r)
            .collect();
        let options = cascade_options(&position_rows, &self.filters);

        let ranking = match rank_players(&self.table, schema, &self.filters, &self.weights) {
            Ok(ranking) => ranking,
            Err(e) => {
                warn!("ranking failed: {}", e);
                Ranking::default()
            }
        };

        let ranked_rows: Vec<&PlayerRow> = ranking
            .rows
            .iter()
            .filter_map(|r| self.table.rows().get(r.index))
            .collect();
        let scatter_columns = numeric_columns(&self.table, &ranked_rows);

        self.radar_players.retain(|p| ranking.find(p).is_some());
        self.scatter_x = keep_or_default(self.scatter_x.take(), &scatter_columns, 0);
        self.scatter_y = keep_or_default(self.scatter_y.take(), &scatter_columns, 1);
        self.scatter_columns = scatter_columns;
        self.options = options;
        self.ranking = ranking;
    }

    fn blocking_free_schema(&self) -> Option<&PositionSchema> {
        if self.is_blocked() {
            return None;
        }
        self.registry.at(self.position)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn profile_name(&self) -> &str {
        &self.profile
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn table(&self) -> &PlayerTable {
        &self.table
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn loaded_files(&self) -> &[String] {
        &self.loaded_files
    }

    pub fn loaded_at(&self) -> DateTime<Local> {
        self.loaded_at
    }

    pub fn position_index(&self) -> usize {
        self.position
    }

    pub fn schema(&self) -> Option<&PositionSchema> {
        self.registry.at(self.position)
    }

    pub fn position_name(&self) -> Option<&str> {
        self.schema().map(|s| s.name.as_str())
    }

    pub fn weights(&self) -> &WeightMap {
        &self.weights
    }

    pub fn slider(&self) -> &WeightSlider {
        &self.slider
    }

    /// Columns with a weight slider for the current position.
    pub fn weight_columns(&self) -> &[String] {
        &self.ranking.columns
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn options(&self) -> &CategoryOptions {
        &self.options
    }

    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    pub fn row(&self, index: usize) -> Option<&PlayerRow> {
        self.table.rows().get(index)
    }

    pub fn radar_players(&self) -> &[String] {
        &self.radar_players
    }

    pub fn radar(&self) -> RadarChart {
        build_radar(&self.table, &self.ranking, &self.weights, &self.radar_players)
    }

    pub fn scatter_columns(&self) -> &[String] {
        &self.scatter_columns
    }

    pub fn scatter_axes(&self) -> (Option<&str>, Option<&str>) {
        (self.scatter_x.as_deref(), self.scatter_y.as_deref())
    }

    /// Scatter of the ranked subset; `None` when there is nothing to draw.
    pub fn scatter(&self) -> Option<ScatterPlot> {
        let (x, y) = (self.scatter_x.as_deref()?, self.scatter_y.as_deref()?);
        let rows: Vec<&PlayerRow> = self
            .ranking
            .rows
            .iter()
            .filter_map(|r| self.table.rows().get(r.index))
            .collect();
        build_scatter(&rows, x, y)
    }

    pub fn notices(&self) -> Vec<&Notice> {
        self.load_notices
            .iter()
            .chain(self.position_notice.iter())
            .collect()
    }

    pub fn is_blocked(&self) -> bool {
        self.load_notices
            .iter()
            .any(|n| n.level == NoticeLevel::Blocking)
    }
}

fn keep_or_default(current: Option<String>, columns: &[String], fallback: usize) -> Option<String> {
    match current {
        Some(c) if columns.contains(&c) => Some(c),
        _ => columns
            .get(fallback)
            .or_else(|| columns.first())
            .cloned(),
    }
}

fn cycle(columns: &[String], current: Option<&str>, forward: bool) -> Option<String> {
    if columns.is_empty() {
        return None;
    }
    let len = columns.len();
    let next = match current.and_then(|c| columns.iter().position(|x| x == c)) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    columns.get(next).cloned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
