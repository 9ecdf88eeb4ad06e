//! Block field: the grid of destructible targets
//!
//! Every block remembers its row-major grid cell, so geometry is always
//! derived from the cell and never from the block's position in the list.
//! Removing blocks can therefore never shift the survivors.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::Playfield;
use crate::consts::*;

/// Block categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockKind {
    #[default]
    Standard,
    Bonus,
    /// Armored look, still breaks in one hit like everything else
    Indestructible,
}

impl BlockKind {
    /// Weighted draw: 60% standard, 20% bonus, 20% indestructible
    pub fn roll<R: Rng>(rng: &mut R) -> Self {
        let roll: f32 = rng.random();
        if roll < 0.6 {
            BlockKind::Standard
        } else if roll < 0.8 {
            BlockKind::Bonus
        } else {
            BlockKind::Indestructible
        }
    }

    /// Base color (0xRRGGBB) used for the block and its fragments
    pub fn color(&self) -> u32 {
        match self {
            BlockKind::Standard => 0xb5_00_ff,
            BlockKind::Bonus => 0x00_ff_80,
            BlockKind::Indestructible => 0x80_80_80,
        }
    }
}

/// Grid dimensions used to lay blocks out across the playfield
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub columns: usize,
    pub rows: usize,
    /// Gap between blocks and around the grid
    pub padding: f32,
    pub block_height: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: GRID_COLUMNS,
            rows: GRID_ROWS,
            padding: GRID_PADDING,
            block_height: BLOCK_HEIGHT,
        }
    }
}

impl GridLayout {
    pub fn cell_count(&self) -> usize {
        self.columns * self.rows
    }

    /// Block width that fits `columns` blocks plus padding into the playfield
    pub fn block_width(&self, playfield: &Playfield) -> f32 {
        let cols = self.columns.max(1) as f32;
        (playfield.width - (cols + 1.0) * self.padding) / cols
    }

    /// Rectangle of a row-major grid cell
    pub fn cell_rect(&self, cell: usize, playfield: &Playfield) -> Rect {
        let columns = self.columns.max(1);
        let col = (cell % columns) as f32;
        let row = (cell / columns) as f32;
        let width = self.block_width(playfield);
        Rect::new(
            self.padding + col * (width + self.padding),
            self.padding + row * (self.block_height + self.padding),
            width,
            self.block_height,
        )
    }
}

/// A block entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Row-major grid cell this block occupies
    pub cell: usize,
    pub rect: Rect,
    pub kind: BlockKind,
    pub hp: u8,
}

impl Block {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }
}

/// Live set of blocks for the current level
#[derive(Debug, Clone, Default)]
pub struct BlockField {
    layout: GridLayout,
    blocks: Vec<Block>,
    /// Set by the first full generation; emptiness only means victory after it
    populated: bool,
}

impl BlockField {
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            blocks: Vec::with_capacity(layout.cell_count()),
            populated: false,
        }
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Build a level
    ///
    /// With `preserve_layout_only` the existing blocks keep their category,
    /// health and order and only their geometry is refit to the playfield.
    /// Otherwise the grid is rebuilt from scratch with fresh categories.
    pub fn generate<R: Rng>(
        &mut self,
        preserve_layout_only: bool,
        playfield: &Playfield,
        rng: &mut R,
    ) {
        if preserve_layout_only {
            self.resize(playfield);
            return;
        }

        self.populated = true;
        self.blocks.clear();
        for cell in 0..self.layout.cell_count() {
            self.blocks.push(Block {
                cell,
                rect: self.layout.cell_rect(cell, playfield),
                kind: BlockKind::roll(rng),
                hp: 1,
            });
        }

        log::info!(
            "Generated level: {}x{} grid, {} blocks",
            self.layout.columns,
            self.layout.rows,
            self.blocks.len()
        );
    }

    /// Recompute every block rectangle from its grid cell
    pub fn resize(&mut self, playfield: &Playfield) {
        let layout = self.layout;
        for block in &mut self.blocks {
            block.rect = layout.cell_rect(block.cell, playfield);
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Blocks that can still be hit, with their index in `blocks()`
    pub fn live(&self) -> impl Iterator<Item = (usize, &Block)> {
        self.blocks.iter().enumerate().filter(|(_, b)| b.is_alive())
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// Knock one hit point off the block at `index`
    ///
    /// Returns the block after damage, or `None` if the index is stale or the
    /// block was already destroyed earlier in the frame.
    pub fn damage(&mut self, index: usize) -> Option<Block> {
        let block = self.blocks.get_mut(index)?;
        if !block.is_alive() {
            return None;
        }
        block.hp = block.hp.saturating_sub(1);
        Some(*block)
    }

    /// Drop every block with no hit points left, keeping the survivors' order
    pub fn remove_destroyed(&mut self) -> usize {
        let before = self.blocks.len();
        self.blocks.retain(Block::is_alive);
        before - self.blocks.len()
    }

    /// Victory condition: a generated level has been emptied
    pub fn is_cleared(&self) -> bool {
        self.populated && self.blocks.is_empty()
    }
}
