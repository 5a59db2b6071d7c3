use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, Transaction};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::attack_graph::{AttackGraph, SquareLinks, NUM_SQUARES};
use crate::error::{AnalysisError, Result};
use crate::features::{PiecePlacement, PositionFeatures, SquarePair};
use crate::heat_map::{HeatMap, SERIES};

/// Layout of the stored square lists. Bumped whenever an encoding changes.
pub const SCHEMA_VERSION: i64 = 1;

const POSITION_COLUMNS: &str = "fen, material, total_material, mobility, central_control, \
    king_safety, connectivity, evaluation, pawns, knights, bishops, rooks, queens, kings";

/// A position's features together with its raw engine evaluation
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PositionRecord {
    pub fen: String,
    pub features: PositionFeatures,
    pub evaluation: String,
}

/// Owned handle on the analysis database.
///
/// Reads go straight through the handle; writes happen inside a
/// `StoreTransaction` so a failed batch leaves the previous contents in place.
pub struct AnalysisStore {
    conn: Connection,
}

impl AnalysisStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        let found: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        if found != 0 && found != SCHEMA_VERSION {
            return Err(AnalysisError::SchemaVersion {
                found,
                expected: SCHEMA_VERSION,
            });
        }
        create_schema(&conn)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        Ok(Self { conn })
    }

    pub fn transaction(&mut self) -> Result<StoreTransaction<'_>> {
        Ok(StoreTransaction {
            tx: self.conn.transaction()?,
        })
    }

    pub fn load_position(&self, fen: &str) -> Result<Option<PositionRecord>> {
        let sql = format!("SELECT {} FROM positions WHERE fen = ?1", POSITION_COLUMNS);
        let raw = self
            .conn
            .query_row(&sql, params![fen], RawPosition::from_row)
            .optional()?;
        raw.map(RawPosition::decode).transpose()
    }

    /// Positions with an exactly even material balance and more than
    /// `min_total_material` on the board
    pub fn load_balanced_positions(&self, min_total_material: i32) -> Result<Vec<PositionRecord>> {
        let sql = format!(
            "SELECT {} FROM positions WHERE material = 0 AND total_material > ?1 ORDER BY fen",
            POSITION_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![min_total_material], RawPosition::from_row)?;

        let mut records = Vec::new();
        for raw in rows {
            records.push(raw?.decode()?);
        }
        Ok(records)
    }

    pub fn count_positions(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM positions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn load_attack_graph(&self, fen: &str) -> Result<Option<AttackGraph>> {
        let sql = format!("SELECT {} FROM graph_connections WHERE fen = ?1", square_columns());
        let encoded = self
            .conn
            .query_row(&sql, params![fen], |row| {
                (0..NUM_SQUARES)
                    .map(|i| row.get::<_, String>(i))
                    .collect::<rusqlite::Result<Vec<String>>>()
            })
            .optional()?;

        let Some(encoded) = encoded else { return Ok(None) };
        let links = encoded
            .iter()
            .map(|text| serde_json::from_str::<SquareLinks>(text))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(AttackGraph::from_links(links))
    }

    /// Heat map as stored; squares without a row come back empty
    pub fn load_heat_map(&self) -> Result<HeatMap> {
        let columns: Vec<String> = SERIES.iter().map(|series| series.column_name()).collect();
        let sql = format!("SELECT house, {} FROM heat_map ORDER BY house", columns.join(", "));
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;

        let mut heat_map = HeatMap::empty();
        while let Some(row) = rows.next()? {
            let house: i64 = row.get(0)?;
            if !(0..NUM_SQUARES as i64).contains(&house) {
                log::warn!("Ignoring heat map row for out-of-range square {}", house);
                continue;
            }
            for (series_index, _) in SERIES.iter().enumerate() {
                let mean: Option<f64> = row.get(series_index + 1)?;
                heat_map.set(series_index, house as usize, mean);
            }
        }
        Ok(heat_map)
    }
}

/// Write side of the store. Dropping it without `commit` rolls back.
pub struct StoreTransaction<'a> {
    tx: Transaction<'a>,
}

impl StoreTransaction<'_> {
    pub fn upsert_position(&self, record: &PositionRecord) -> Result<()> {
        let f = &record.features;
        let p = &f.placement;
        let sql = format!(
            "INSERT OR REPLACE INTO positions ({}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            POSITION_COLUMNS
        );
        self.tx.execute(
            &sql,
            params![
                record.fen,
                f.material,
                f.total_material,
                f.mobility,
                f.central_control,
                f.king_safety,
                f.connectivity,
                record.evaluation,
                serde_json::to_string(&p.pawns)?,
                serde_json::to_string(&p.knights)?,
                serde_json::to_string(&p.bishops)?,
                serde_json::to_string(&p.rooks)?,
                serde_json::to_string(&p.queens)?,
                serde_json::to_string(&p.kings)?,
            ],
        )?;
        Ok(())
    }

    pub fn upsert_attack_graph(&self, fen: &str, graph: &AttackGraph) -> Result<()> {
        let placeholders: Vec<String> = (1..=NUM_SQUARES + 1).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT OR REPLACE INTO graph_connections (fen, {}) VALUES ({})",
            square_columns(),
            placeholders.join(", ")
        );

        let mut values = Vec::with_capacity(NUM_SQUARES + 1);
        values.push(fen.to_string());
        for links in graph.squares() {
            values.push(serde_json::to_string(links)?);
        }
        self.tx.execute(&sql, params_from_iter(values))?;
        Ok(())
    }

    /// Replaces every heat map row
    pub fn replace_heat_map(&self, heat_map: &HeatMap) -> Result<()> {
        let columns: Vec<String> = SERIES.iter().map(|series| series.column_name()).collect();
        let placeholders: Vec<String> = (1..=SERIES.len() + 1).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT OR REPLACE INTO heat_map (house, {}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        );

        self.tx.execute("DELETE FROM heat_map", [])?;
        let mut stmt = self.tx.prepare(&sql)?;
        for square in 0..NUM_SQUARES {
            let mut values = vec![Value::Integer(square as i64)];
            for series_index in 0..SERIES.len() {
                values.push(match heat_map.mean(series_index, square) {
                    Some(mean) => Value::Real(mean),
                    None => Value::Null,
                });
            }
            stmt.execute(params_from_iter(values))?;
        }
        Ok(())
    }

    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}

fn square_columns() -> String {
    (0..NUM_SQUARES)
        .map(|i| format!("square_{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS positions (
            fen TEXT PRIMARY KEY,
            material INTEGER,
            total_material INTEGER,
            mobility INTEGER,
            central_control INTEGER,
            king_safety INTEGER,
            connectivity INTEGER,
            evaluation TEXT,
            pawns TEXT,
            knights TEXT,
            bishops TEXT,
            rooks TEXT,
            queens TEXT,
            kings TEXT
        );
        "#,
    )?;

    let squares: Vec<String> = (0..NUM_SQUARES).map(|i| format!("square_{} TEXT", i)).collect();
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS graph_connections (fen TEXT PRIMARY KEY, {});",
        squares.join(", ")
    ))?;

    let series: Vec<String> = SERIES
        .iter()
        .map(|series| format!("{} REAL", series.column_name()))
        .collect();
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS heat_map (house INTEGER PRIMARY KEY, {});",
        series.join(", ")
    ))?;
    Ok(())
}

/// Row as read from `positions`, before the square lists are decoded
struct RawPosition {
    fen: String,
    scalars: [i32; 6],
    evaluation: String,
    lists: [String; 6],
}

impl RawPosition {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            fen: row.get(0)?,
            scalars: [
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
            ],
            evaluation: row.get(7)?,
            lists: [
                row.get(8)?,
                row.get(9)?,
                row.get(10)?,
                row.get(11)?,
                row.get(12)?,
                row.get(13)?,
            ],
        })
    }

    fn decode(self) -> Result<PositionRecord> {
        let [pawns, knights, bishops, rooks, queens, kings] = self.lists;
        let decode = |text: String| serde_json::from_str::<SquarePair>(&text);
        let placement = PiecePlacement {
            pawns: decode(pawns)?,
            knights: decode(knights)?,
            bishops: decode(bishops)?,
            rooks: decode(rooks)?,
            queens: decode(queens)?,
            kings: decode(kings)?,
        };

        let [material, total_material, mobility, central_control, king_safety, connectivity] =
            self.scalars;
        Ok(PositionRecord {
            fen: self.fen,
            features: PositionFeatures {
                material,
                total_material,
                mobility,
                central_control,
                king_safety,
                connectivity,
                placement,
            },
            evaluation: self.evaluation,
        })
    }
}
