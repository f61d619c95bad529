#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Delve adapters.
//!
//! Scenes are built from a read-only session snapshot and the active grid.
//! Backends turn a [`Presentation`] into whatever output they drive; the
//! bundled [`TextBackend`] writes plain text frames.

use std::io::Write;

use anyhow::{Context, Result as AnyResult};
use delve_core::{Cell, CellCoord, GameState, Grid};
use thiserror::Error;

/// Visual class of a single drawn tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Impassable cell.
    Wall,
    /// Walkable cell, including collected treasures and chests.
    Floor,
    /// Treasure waiting to be picked up.
    Treasure,
    /// Chest waiting to be opened.
    Chest,
    /// The level's portal.
    Portal,
    /// The player, drawn over whatever cell they occupy.
    Player,
}

impl Tile {
    /// Tile drawn for a grid cell when the player is elsewhere.
    #[must_use]
    pub const fn for_cell(cell: Cell) -> Self {
        match cell {
            Cell::Wall => Self::Wall,
            Cell::Floor
            | Cell::Treasure { collected: true }
            | Cell::Chest { collected: true } => Self::Floor,
            Cell::Treasure { collected: false } => Self::Treasure,
            Cell::Chest { collected: false } => Self::Chest,
            Cell::Portal => Self::Portal,
        }
    }
}

/// Glyphs used by text backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    wall: char,
    floor: char,
    treasure: char,
    chest: char,
    portal: char,
    player: char,
}

impl Palette {
    /// Creates a palette, rejecting whitespace and duplicate glyphs.
    pub fn new(
        wall: char,
        floor: char,
        treasure: char,
        chest: char,
        portal: char,
        player: char,
    ) -> Result<Self, RenderingError> {
        let glyphs = [wall, floor, treasure, chest, portal, player];
        for (index, glyph) in glyphs.iter().enumerate() {
            if glyph.is_whitespace() {
                return Err(RenderingError::BlankGlyph);
            }
            if glyphs[..index].contains(glyph) {
                return Err(RenderingError::DuplicateGlyph { glyph: *glyph });
            }
        }
        Ok(Self {
            wall,
            floor,
            treasure,
            chest,
            portal,
            player,
        })
    }

    /// Glyph drawn for `tile`.
    #[must_use]
    pub const fn glyph(&self, tile: Tile) -> char {
        match tile {
            Tile::Wall => self.wall,
            Tile::Floor => self.floor,
            Tile::Treasure => self.treasure,
            Tile::Chest => self.chest,
            Tile::Portal => self.portal,
            Tile::Player => self.player,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            wall: '#',
            floor: '.',
            treasure: '$',
            chest: 'C',
            portal: 'O',
            player: '@',
        }
    }
}

/// Heads-up display values derived from a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hud {
    /// One-based index of the active level.
    pub level: u32,
    /// Number of levels in the catalogue.
    pub total_levels: u32,
    /// Accepted moves across the session.
    pub steps: u64,
    /// Treasures collected so far.
    pub treasures_collected: u32,
    /// Treasures in every level entered so far.
    pub total_treasures: u32,
    /// Chests opened so far.
    pub chests_collected: u32,
    /// Chests in every level entered so far.
    pub total_chests: u32,
    /// Score shown to the player.
    pub score: u64,
    /// Status prompt.
    pub status: &'static str,
}

impl Hud {
    /// Derives the HUD from a snapshot.
    #[must_use]
    pub fn from_state(state: &GameState, total_levels: u32) -> Self {
        Self {
            level: state.current_level,
            total_levels,
            steps: state.steps,
            treasures_collected: state.treasures_collected,
            total_treasures: state.total_treasures,
            chests_collected: state.chests_collected,
            total_chests: state.total_chests,
            score: state.score(),
            status: state.status().label(),
        }
    }

    /// Single line summary of the counters.
    #[must_use]
    pub fn counters_line(&self) -> String {
        format!(
            "Level: {}/{}  Steps: {}  Treasures: {}/{}  Chests: {}/{}  Score: {}",
            self.level,
            self.total_levels,
            self.steps,
            self.treasures_collected,
            self.total_treasures,
            self.chests_collected,
            self.total_chests,
            self.score
        )
    }
}

/// Scene description of the active level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Display name of the active level.
    pub level_name: String,
    /// Tiles in row-major order, player included.
    pub tiles: Vec<Vec<Tile>>,
    /// Counters and status prompt.
    pub hud: Hud,
    /// Whether the victory banner should be shown.
    pub victory: bool,
}

impl Scene {
    /// Builds a scene from a snapshot and the grid it refers to.
    pub fn new(
        level_name: impl Into<String>,
        state: &GameState,
        grid: &Grid,
        total_levels: u32,
    ) -> Result<Self, RenderingError> {
        if !grid.contains(state.position) {
            return Err(RenderingError::PlayerOutsideGrid {
                position: state.position,
                rows: grid.rows(),
                columns: grid.columns(),
            });
        }

        let player_row = state.position.row() as usize;
        let player_column = state.position.column() as usize;
        let tiles = grid
            .iter_rows()
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .map(|(column, cell)| {
                        if row == player_row && column == player_column {
                            Tile::Player
                        } else {
                            Tile::for_cell(*cell)
                        }
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            level_name: level_name.into(),
            tiles,
            hud: Hud::from_state(state, total_levels),
            victory: state.game_won,
        })
    }

    /// Rasterises the scene into text lines using `palette`.
    #[must_use]
    pub fn render(&self, palette: &Palette) -> Frame {
        let mut lines = Vec::with_capacity(self.tiles.len() + 3);
        lines.push(self.level_name.clone());
        lines.extend(self.tiles.iter().map(|row| {
            row.iter()
                .map(|tile| palette.glyph(*tile))
                .collect::<String>()
        }));
        lines.push(self.hud.counters_line());
        if self.victory {
            lines.push(format!(
                "{} Completed in {} steps!",
                self.hud.status, self.hud.steps
            ));
        } else {
            lines.push(self.hud.status.to_owned());
        }
        Frame { lines }
    }
}

/// Rendered text frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    lines: Vec<String>,
}

impl Frame {
    /// Lines of the frame, top to bottom.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    /// Title printed above each frame.
    pub title: String,
    /// Glyphs used for text output.
    pub palette: Palette,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, palette: Palette, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            palette,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Delve scenes.
pub trait RenderingBackend {
    /// Presents a single frame.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;
}

/// Backend that writes text frames to any writer.
#[derive(Debug)]
pub struct TextBackend<W> {
    writer: W,
}

impl<W: Write> TextBackend<W> {
    /// Wraps `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()> {
        let frame = presentation.scene.render(&presentation.palette);
        write!(self.writer, "== {} ==\n{frame}", presentation.title)
            .context("failed to write frame")?;
        self.writer.flush().context("failed to flush frame")
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RenderingError {
    /// The snapshot places the player outside the grid it was paired with.
    #[error("player at {position} lies outside the {rows}x{columns} grid")]
    PlayerOutsideGrid {
        /// Position reported by the snapshot.
        position: CellCoord,
        /// Rows of the grid.
        rows: u32,
        /// Columns of the grid.
        columns: u32,
    },
    /// Two tiles were assigned the same glyph.
    #[error("glyph {glyph:?} is assigned to more than one tile")]
    DuplicateGlyph {
        /// Offending glyph.
        glyph: char,
    },
    /// A tile was assigned a whitespace glyph.
    #[error("tile glyphs must not be whitespace")]
    BlankGlyph,
}
