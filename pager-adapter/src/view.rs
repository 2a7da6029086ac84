use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use pager::{Category, FetchError, Item, PagingSnapshot, Swatch};

pub const HEADLINE: &str = "Infinite Scroll Demo";
pub const TAGLINE: &str = "More content loads automatically as you scroll";

/// Steps shown in the explanatory panel while the list is still empty.
pub const EXPLAINER: [&str; 4] = [
    "A sentinel element sits at the bottom of the list",
    "A visibility sensor detects when it comes into view",
    "The next page of data is loaded automatically",
    "A margin around the viewport starts loading a little early",
];

/// One rendered list entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemCard {
    pub id: u64,
    pub title: String,
    pub category: Category,
    pub description: String,
    /// Colour of the id badge.
    pub swatch: Swatch,
}

impl From<&Item> for ItemCard {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            category: item.category,
            description: item.description.clone(),
            swatch: item.swatch,
        }
    }
}

/// What the region around the sentinel shows.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoaderRegion {
    Idle,
    Spinner,
    /// Every page has been loaded.
    AllLoaded,
    /// The last fetch failed; offer a retry.
    Failed { page: u64, message: String },
    /// No visibility sensor; offer a "load more" button.
    Manual,
}

/// A pure projection of the paging state, ready to draw.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct View {
    pub loaded: usize,
    pub page: u64,
    pub cards: Vec<ItemCard>,
    pub loader: LoaderRegion,
    /// Shown only while the list is empty and nothing is loading.
    pub show_explainer: bool,
}

impl View {
    pub fn project(
        snapshot: PagingSnapshot,
        items: &[Item],
        error: Option<&FetchError>,
        manual: bool,
    ) -> Self {
        let loader = if snapshot.is_loading {
            LoaderRegion::Spinner
        } else if !snapshot.has_more {
            LoaderRegion::AllLoaded
        } else if let Some(err) = error {
            LoaderRegion::Failed {
                page: err.page(),
                message: err.to_string(),
            }
        } else if manual {
            LoaderRegion::Manual
        } else {
            LoaderRegion::Idle
        };

        Self {
            loaded: snapshot.len,
            page: snapshot.page,
            cards: items.iter().map(ItemCard::from).collect(),
            loader,
            show_explainer: items.is_empty() && !snapshot.is_loading,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{HEADLINE}")?;
        writeln!(f, "{TAGLINE}")?;
        writeln!(f, "Loaded: {} items / page: {}", self.loaded, self.page)?;

        for card in &self.cards {
            writeln!(
                f,
                "  #{:<3} {} [{}] {}",
                card.id,
                card.title,
                card.category.label(),
                card.swatch.hex()
            )?;
            writeln!(f, "       {}", card.description)?;
        }

        match &self.loader {
            LoaderRegion::Idle => {}
            LoaderRegion::Spinner => writeln!(f, "  ... loading")?,
            LoaderRegion::AllLoaded => writeln!(f, "  All items have been loaded")?,
            LoaderRegion::Failed { message, .. } => writeln!(f, "  {message} (retry)")?,
            LoaderRegion::Manual => writeln!(f, "  [ Load more ]")?,
        }

        if self.show_explainer {
            writeln!(f, "How it works")?;
            for (i, step) in EXPLAINER.iter().enumerate() {
                writeln!(f, "  {}. {step}", i + 1)?;
            }
        }
        Ok(())
    }
}
