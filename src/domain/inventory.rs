/// Discoverable desk items and their found/visible bookkeeping.
///
/// ## Discovery rules
///
/// ┌──────────────────────────────┬──────────────────────────────┐
/// │ Condition                     │ Result                       │
/// ├──────────────────────────────┼──────────────────────────────┤
/// │ unknown id                    │ Err(NotFound)                │
/// │ gated item, gate still closed │ Err(NotVisible)              │
/// │ already found                 │ Err(AlreadyFound), no change │
/// │ otherwise                     │ found_at = now, Ok(outcome)  │
/// └──────────────────────────────┴──────────────────────────────┘
///
/// `found_at` is written at most once per item. The gate opens when the
/// number of found items (excluding the gated one) reaches the threshold,
/// and never closes again.
///
/// Hit testing walks items in declaration order (the z-order) and the
/// first visible match wins, so overlapping regions resolve the same way
/// every time.

use thiserror::Error;

use super::clock::Millis;

pub type ItemId = &'static str;

/// Axis-aligned rectangle in canvas cells.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Region {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Region { x, y, w, h }
    }

    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }

    pub fn overlaps(&self, other: &Region) -> bool {
        self.x < other.x + other.w && other.x < self.x + self.w
            && self.y < other.y + other.h && other.y < self.y + self.h
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ItemRole {
    /// Flavour item: narrative only.
    Clue,
    /// Bad-practice trap: discovering it costs time.
    Decoy,
    /// Holds the password. Finding it sets the session's key flag.
    Key,
    /// Opens the next screen when clicked; never "found".
    Entry,
}

#[derive(Clone, Debug)]
pub struct DeskItem {
    pub id: ItemId,
    pub name: &'static str,
    pub region: Region,
    pub narrative: &'static str,
    pub role: ItemRole,
    pub found_at: Option<Millis>,
}

impl DeskItem {
    pub fn new(
        id: ItemId, name: &'static str, region: Region,
        narrative: &'static str, role: ItemRole,
    ) -> Self {
        DeskItem { id, name, region, narrative, role, found_at: None }
    }

    pub fn is_found(&self) -> bool {
        self.found_at.is_some()
    }

    pub fn is_decoy(&self) -> bool {
        self.role == ItemRole::Decoy
    }
}

#[derive(Clone, Copy, Debug)]
struct Gate {
    item: ItemId,
    threshold: usize,
    open: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveryOutcome {
    pub id: ItemId,
    pub name: &'static str,
    pub narrative: &'static str,
    pub is_key: bool,
    pub is_decoy: bool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("already investigated: {0}")]
    AlreadyFound(&'static str),
    #[error("no item with id `{0}`")]
    NotFound(String),
    #[error("item `{0}` is not visible yet")]
    NotVisible(ItemId),
    #[error("duplicate item id `{0}`")]
    DuplicateId(ItemId),
}

/// Penalty amounts handed back to the caller, which applies them to the clock.
#[derive(Clone, Copy, Debug)]
pub struct Penalties {
    pub miss_click_secs: u32,
    pub decoy_secs: u32,
}

#[derive(Clone, Debug)]
pub struct Inventory {
    items: Vec<DeskItem>,
    gate: Option<Gate>,
    penalties: Penalties,
    wrong_clicks: u32,
}

// ── Construction ──

impl Inventory {
    /// Build from items in z-order. Duplicate ids are a content bug and fail.
    pub fn new(items: Vec<DeskItem>, penalties: Penalties) -> Result<Self, InventoryError> {
        for (i, item) in items.iter().enumerate() {
            if items[..i].iter().any(|prev| prev.id == item.id) {
                return Err(InventoryError::DuplicateId(item.id));
            }
        }
        Ok(Inventory { items, gate: None, penalties, wrong_clicks: 0 })
    }

    /// Hide `item` until `threshold` other items are found.
    pub fn with_gate(mut self, item: ItemId, threshold: usize) -> Result<Self, InventoryError> {
        if !self.items.iter().any(|i| i.id == item) {
            return Err(InventoryError::NotFound(item.to_string()));
        }
        self.gate = Some(Gate { item, threshold, open: false });
        Ok(self)
    }
}

// ── Queries ──

impl Inventory {
    pub fn items(&self) -> &[DeskItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn found_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_found()).count()
    }

    pub fn wrong_clicks(&self) -> u32 {
        self.wrong_clicks
    }

    /// Found items other than the gated one.
    pub fn found_excluding_gated(&self) -> usize {
        let gated = self.gate.map(|g| g.item);
        self.items.iter()
            .filter(|i| i.is_found() && Some(i.id) != gated)
            .count()
    }

    pub fn is_visible(&self, id: ItemId) -> bool {
        match self.gate {
            Some(g) if g.item == id => g.open,
            _ => true,
        }
    }

    pub fn gate_open(&self) -> bool {
        self.gate.map_or(true, |g| g.open)
    }

    /// First visible item (z-order) whose region contains the point.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<&DeskItem> {
        self.items.iter()
            .filter(|i| self.is_visible(i.id))
            .find(|i| i.region.contains(x, y))
    }
}

// ── Mutation ──

impl Inventory {
    pub fn discover(&mut self, id: &str, now: Millis) -> Result<DiscoveryOutcome, InventoryError> {
        let idx = self.items.iter()
            .position(|i| i.id == id)
            .ok_or_else(|| InventoryError::NotFound(id.to_string()))?;
        let item_id = self.items[idx].id;
        if !self.is_visible(item_id) {
            return Err(InventoryError::NotVisible(item_id));
        }
        let item = &mut self.items[idx];
        if item.is_found() {
            return Err(InventoryError::AlreadyFound(item.name));
        }
        item.found_at = Some(now);
        Ok(DiscoveryOutcome {
            id: item.id,
            name: item.name,
            narrative: item.narrative,
            is_key: item.role == ItemRole::Key,
            is_decoy: item.role == ItemRole::Decoy,
        })
    }

    /// Record a click that hit nothing. Returns the time penalty to apply.
    pub fn miss_click(&mut self) -> u32 {
        self.wrong_clicks += 1;
        self.penalties.miss_click_secs
    }

    pub fn decoy_penalty(&self) -> u32 {
        self.penalties.decoy_secs
    }

    /// Re-evaluate the gate. Returns true only on the call that opens it.
    pub fn update_gate(&mut self) -> bool {
        let found = self.found_excluding_gated();
        match self.gate.as_mut() {
            Some(g) if !g.open && reveal_gate(found, g.threshold) => {
                g.open = true;
                true
            }
            _ => false,
        }
    }
}

/// Pure gate predicate.
pub fn reveal_gate(found_count: usize, threshold: usize) -> bool {
    found_count >= threshold
}
