//! Registry of placeable overlay archetypes
//!
//! Four item kinds share two layout tables: platforms (plain and breakable)
//! pick from four layouts, coins (plain and special) from five. One entry in
//! each table is the diagonal layout mirrored horizontally; mirroring is a
//! flag on the placed instance, not a separate archetype.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::tuning::{Footprint, FootprintTable, ShapeFootprints};

bitflags::bitflags! {
    /// Physics category bitmask. Each tag is a single bit; a body matching
    /// several tags carries their union.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Category: u32 {
        const PLAYER = 1 << 0;
        const PLATFORM_NORMAL = 1 << 1;
        const PLATFORM_BREAKABLE = 1 << 2;
        const COIN_NORMAL = 1 << 3;
        const COIN_SPECIAL = 1 << 4;
        const EDGES = 1 << 5;
    }
}

/// Item kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    PlatformPlain,
    PlatformBreakable,
    CoinPlain,
    CoinSpecial,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::PlatformPlain,
        ItemKind::PlatformBreakable,
        ItemKind::CoinPlain,
        ItemKind::CoinSpecial,
    ];

    pub fn category(self) -> Category {
        match self {
            ItemKind::PlatformPlain => Category::PLATFORM_NORMAL,
            ItemKind::PlatformBreakable => Category::PLATFORM_BREAKABLE,
            ItemKind::CoinPlain => Category::COIN_NORMAL,
            ItemKind::CoinSpecial => Category::COIN_SPECIAL,
        }
    }

    /// Platforms are structural, coins are collectible
    pub fn is_platform(self) -> bool {
        matches!(self, ItemKind::PlatformPlain | ItemKind::PlatformBreakable)
    }
}

/// Layout shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Arrow,
    FiveAcross,
    Diagonal,
    Cross,
}

/// One entry of a variant table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub shape: Shape,
    pub flipped: bool,
}

impl Variant {
    const fn new(shape: Shape, flipped: bool) -> Self {
        Self { shape, flipped }
    }
}

/// Layouts shared by plain and breakable platforms
pub const PLATFORM_VARIANTS: [Variant; 4] = [
    Variant::new(Shape::Arrow, false),
    Variant::new(Shape::FiveAcross, false),
    Variant::new(Shape::Diagonal, false),
    Variant::new(Shape::Diagonal, true),
];

/// Layouts shared by plain and special coins
pub const COIN_VARIANTS: [Variant; 5] = [
    Variant::new(Shape::Arrow, false),
    Variant::new(Shape::FiveAcross, false),
    Variant::new(Shape::Diagonal, false),
    Variant::new(Shape::Diagonal, true),
    Variant::new(Shape::Cross, false),
];

/// Immutable template for one placeable item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    pub kind: ItemKind,
    pub shape: Shape,
    pub footprint: Footprint,
}

/// Validated archetype registry
#[derive(Debug, Clone)]
pub struct OverlayCatalog {
    footprints: FootprintTable,
}

impl OverlayCatalog {
    /// Build the catalog, rejecting any footprint a variant table can reach
    /// that has non-positive size.
    pub fn new(footprints: &FootprintTable) -> Result<Self, CatalogError> {
        let catalog = Self {
            footprints: *footprints,
        };
        for kind in ItemKind::ALL {
            let variants = catalog.variants(kind);
            if variants.is_empty() {
                return Err(CatalogError::EmptyVariantTable(kind));
            }
            for variant in variants {
                let fp = catalog.footprint(kind, variant.shape);
                if !(fp.width > 0.0 && fp.height > 0.0) {
                    return Err(CatalogError::InvalidFootprint {
                        kind,
                        shape: variant.shape,
                        width: fp.width,
                        height: fp.height,
                    });
                }
            }
        }
        Ok(catalog)
    }

    /// Variant table for an item kind
    pub fn variants(&self, kind: ItemKind) -> &'static [Variant] {
        if kind.is_platform() {
            &PLATFORM_VARIANTS
        } else {
            &COIN_VARIANTS
        }
    }

    fn shapes(&self, kind: ItemKind) -> &ShapeFootprints {
        if kind.is_platform() {
            &self.footprints.platform
        } else {
            &self.footprints.coin
        }
    }

    pub fn footprint(&self, kind: ItemKind, shape: Shape) -> Footprint {
        let shapes = self.shapes(kind);
        match shape {
            Shape::Arrow => shapes.arrow,
            Shape::FiveAcross => shapes.five_across,
            Shape::Diagonal => shapes.diagonal,
            Shape::Cross => shapes.cross,
        }
    }

    pub fn archetype(&self, kind: ItemKind, shape: Shape) -> Archetype {
        Archetype {
            kind,
            shape,
            footprint: self.footprint(kind, shape),
        }
    }
}
