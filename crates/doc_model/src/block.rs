//! Blocks: positioned, sized, lockable references to a visual asset

use crate::{AssetRef, BlockId, DocModelError, Rect, Result};
use serde::{Deserialize, Serialize};

/// A visual asset placed on a page.
///
/// Deserialization rejects geometry that [`Rect::sanitized`] would change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    id: BlockId,
    /// The asset rendered by this block
    pub asset: AssetRef,
    /// Position and size in canvas units
    rect: Rect,
    /// Locked blocks cannot be moved or resized and survive page clears
    pub locked: bool,
}

impl Block {
    /// Create a block with a fresh id. The geometry is sanitized.
    pub fn new(asset: impl Into<AssetRef>, rect: Rect, locked: bool) -> Result<Self> {
        Ok(Self {
            id: BlockId::new(),
            asset: asset.into(),
            rect: rect.sanitized()?,
            locked,
        })
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Replace the geometry, clamping to the minimum block size
    pub fn set_rect(&mut self, rect: Rect) -> Result<()> {
        self.rect = rect.sanitized()?;
        Ok(())
    }

    /// Structural copy with a new identity
    pub fn duplicate(&self) -> Block {
        Block {
            id: BlockId::new(),
            ..self.clone()
        }
    }

    /// Compare everything except identity
    pub fn same_content(&self, other: &Block) -> bool {
        self.asset == other.asset && self.rect == other.rect && self.locked == other.locked
    }
}

#[derive(Deserialize)]
struct RawBlock {
    id: BlockId,
    asset: AssetRef,
    rect: Rect,
    locked: bool,
}

impl TryFrom<RawBlock> for Block {
    type Error = DocModelError;

    fn try_from(raw: RawBlock) -> Result<Self> {
        if raw.rect.sanitized()? != raw.rect {
            return Err(DocModelError::InvalidGeometry(format!(
                "block {} has out-of-range geometry {:?}",
                raw.id, raw.rect
            )));
        }
        Ok(Self {
            id: raw.id,
            asset: raw.asset,
            rect: raw.rect,
            locked: raw.locked,
        })
    }
}
