// crates/serve/src/render/group.rs

//! Grouping pass over an ordered block list.
//!
//! Adjacent card-like blocks (currently `value_card`) collapse into one
//! grid-layout unit; everything else stays standalone. A single linear,
//! stable scan: blocks never reorder, and a non-groupable block between two
//! card runs keeps those runs separate.

use domain::block::StoredBlock;

/// One unit of page layout after grouping.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderUnit {
    Single(StoredBlock),
    CardGrid(Vec<StoredBlock>),
}

impl RenderUnit {
    /// Number of source blocks behind this unit.
    pub fn len(&self) -> usize {
        match self {
            RenderUnit::Single(_) => 1,
            RenderUnit::CardGrid(run) => run.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn is_groupable(block: &StoredBlock) -> bool {
    matches!(block, StoredBlock::Known(b) if b.is_groupable())
}

#[tracing::instrument(skip_all)]
pub fn group_blocks(blocks: Vec<StoredBlock>) -> Vec<RenderUnit> {
    let mut units = Vec::with_capacity(blocks.len());
    let mut run: Vec<StoredBlock> = Vec::new();

    for block in blocks {
        if is_groupable(&block) {
            run.push(block);
            continue;
        }
        if !run.is_empty() {
            units.push(RenderUnit::CardGrid(std::mem::take(&mut run)));
        }
        units.push(RenderUnit::Single(block));
    }
    if !run.is_empty() {
        units.push(RenderUnit::CardGrid(run));
    }
    units
}

/// Flatten grouped units back into source order. Test seam for the
/// order-preservation property.
pub fn flatten(units: &[RenderUnit]) -> Vec<&StoredBlock> {
    let mut out = Vec::new();
    for unit in units {
        match unit {
            RenderUnit::Single(block) => out.push(block),
            RenderUnit::CardGrid(run) => out.extend(run.iter()),
        }
    }
    out
}
