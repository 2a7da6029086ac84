use alloc::string::String;

/// The label shown under an item title.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    Technology,
    Design,
    Business,
    Lifestyle,
    Entertainment,
}

impl Category {
    pub const ALL: [Self; 5] = [
        Self::Technology,
        Self::Design,
        Self::Business,
        Self::Lifestyle,
        Self::Entertainment,
    ];

    /// Picks the category for the `offset`-th item of a batch.
    pub fn for_offset(offset: usize) -> Self {
        Self::ALL[offset % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Technology => "Technology",
            Self::Design => "Design",
            Self::Business => "Business",
            Self::Lifestyle => "Lifestyle",
            Self::Entertainment => "Entertainment",
        }
    }
}

/// The badge colour of an item card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Swatch {
    Blue,
    Violet,
    Pink,
    Amber,
    Emerald,
}

impl Swatch {
    pub const ALL: [Self; 5] = [
        Self::Blue,
        Self::Violet,
        Self::Pink,
        Self::Amber,
        Self::Emerald,
    ];

    pub fn for_offset(offset: usize) -> Self {
        Self::ALL[offset % Self::ALL.len()]
    }

    /// CSS hex colour, e.g. `#3b82f6`.
    pub fn hex(self) -> &'static str {
        match self {
            Self::Blue => "#3b82f6",
            Self::Violet => "#8b5cf6",
            Self::Pink => "#ec4899",
            Self::Amber => "#f59e0b",
            Self::Emerald => "#10b981",
        }
    }
}

/// A single list entry. Items are never mutated after the source hands them over.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    /// Positive, unique, ascending across pages.
    pub id: u64,
    pub title: String,
    pub category: Category,
    pub description: String,
    pub swatch: Swatch,
}

/// What the pager asks an [`crate::ItemSource`] for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRequest {
    /// Zero-based page index.
    pub index: u64,
    /// Number of items in a full page.
    pub size: usize,
}

impl PageRequest {
    /// Id of the `offset`-th item on this page (`index * size + offset + 1`).
    pub fn item_id(&self, offset: usize) -> u64 {
        self.index
            .saturating_mul(self.size as u64)
            .saturating_add(offset as u64)
            .saturating_add(1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadState {
    Idle,
    Loading,
    /// Terminal: no further page will be fetched.
    Exhausted,
}

/// A cheap, copyable view of the paging state.
///
/// This is what change listeners and render code consume; it never borrows the item list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PagingSnapshot {
    pub len: usize,
    pub page: u64,
    pub is_loading: bool,
    pub has_more: bool,
    pub has_error: bool,
}

impl PagingSnapshot {
    pub fn load_state(&self) -> LoadState {
        if self.is_loading {
            LoadState::Loading
        } else if !self.has_more {
            LoadState::Exhausted
        } else {
            LoadState::Idle
        }
    }
}

/// The scrolled window, in scroll-axis pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub offset: u64,
    pub size: u32,
}

impl Viewport {
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.size as u64)
    }
}

/// The marker placed after the last item, in scroll-axis pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sentinel {
    pub start: u64,
    pub size: u32,
}

impl Sentinel {
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.size as u64)
    }
}
