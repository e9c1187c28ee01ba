//! Poster tiles laid out in fixed-width rows for display.

use data_loader::MovieId;
use tmdb_client::PosterImage;

/// Tiles per row unless the service is configured otherwise
pub const DEFAULT_GRID_COLUMNS: usize = 3;

/// One recommended movie ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct PosterTile {
    pub movie_id: MovieId,
    pub title: String,
    pub poster: PosterImage,
}

/// Tiles in recommendation order, chunked into rows
#[derive(Debug, Clone, PartialEq)]
pub struct PosterGrid {
    columns: usize,
    tiles: Vec<PosterTile>,
}

impl PosterGrid {
    /// A `columns` of 0 is treated as 1.
    pub fn new(tiles: Vec<PosterTile>, columns: usize) -> Self {
        Self {
            columns: columns.max(1),
            tiles,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Rows of at most `columns` tiles; only the last row may be short
    pub fn rows(&self) -> impl Iterator<Item = &[PosterTile]> {
        self.tiles.chunks(self.columns)
    }

    pub fn tiles(&self) -> &[PosterTile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn into_tiles(self) -> Vec<PosterTile> {
        self.tiles
    }
}
