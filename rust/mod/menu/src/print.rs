//! Print layout: a pure transform from the catalog and a handful of page
//! options to a description the print preview renders.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::model::{Catalog, Language};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PaperSize {
    A5,
    #[default]
    A4,
    A3,
    A2,
    A1,
}

impl PaperSize {
    pub const ALL: [PaperSize; 5] = [
        PaperSize::A5,
        PaperSize::A4,
        PaperSize::A3,
        PaperSize::A2,
        PaperSize::A1,
    ];

    /// Portrait (width, height) in millimetres.
    pub fn portrait_mm(self) -> (u32, u32) {
        match self {
            PaperSize::A5 => (148, 210),
            PaperSize::A4 => (210, 297),
            PaperSize::A3 => (297, 420),
            PaperSize::A2 => (420, 594),
            PaperSize::A1 => (594, 841),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaperSize::A5 => "A5",
            PaperSize::A4 => "A4",
            PaperSize::A3 => "A3",
            PaperSize::A2 => "A2",
            PaperSize::A1 => "A1",
        }
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaperSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaperSize::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown paper size: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            _ => Err(format!("unknown orientation: {}", s)),
        }
    }
}

/// Column count: looked up from paper and orientation, or fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Columns {
    #[default]
    Auto,
    Fixed(u8),
}

impl Columns {
    pub const MAX: u8 = 4;

    /// Fixed column count; only 1 through 4 are accepted.
    pub fn fixed(n: u8) -> Option<Columns> {
        (1..=Self::MAX).contains(&n).then_some(Columns::Fixed(n))
    }

    pub fn resolve(self, paper: PaperSize, orientation: Orientation) -> u8 {
        match self {
            Columns::Fixed(n) => n,
            Columns::Auto => auto_columns(paper, orientation),
        }
    }
}

impl FromStr for Columns {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Columns::Auto);
        }
        s.parse::<u8>()
            .ok()
            .and_then(Columns::fixed)
            .ok_or_else(|| format!("columns must be auto or 1-{}: {}", Self::MAX, s))
    }
}

fn auto_columns(paper: PaperSize, orientation: Orientation) -> u8 {
    match (orientation, paper) {
        (Orientation::Portrait, PaperSize::A5 | PaperSize::A4) => 1,
        (Orientation::Portrait, PaperSize::A3) => 2,
        (Orientation::Portrait, PaperSize::A2) => 3,
        (Orientation::Portrait, PaperSize::A1) => 4,
        (Orientation::Landscape, PaperSize::A5) => 1,
        (Orientation::Landscape, PaperSize::A4) => 2,
        (Orientation::Landscape, PaperSize::A3) => 3,
        (Orientation::Landscape, PaperSize::A2 | PaperSize::A1) => 4,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FontSize {
    Xs,
    Sm,
    #[default]
    Nor,
    Lg,
}

impl FontSize {
    pub const ALL: [FontSize; 4] = [FontSize::Xs, FontSize::Sm, FontSize::Nor, FontSize::Lg];

    pub fn px(self) -> u8 {
        match self {
            FontSize::Xs => 9,
            FontSize::Sm => 11,
            FontSize::Nor => 13,
            FontSize::Lg => 15,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FontSize::Xs => "XS",
            FontSize::Sm => "SM",
            FontSize::Nor => "NOR",
            FontSize::Lg => "LG",
        }
    }
}

impl FromStr for FontSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FontSize::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown font size: {}", s))
    }
}

/// Options chosen in the print panel. Never stored; every open starts from
/// `PrintConfig::default()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrintConfig {
    pub paper: PaperSize,
    pub orientation: Orientation,
    pub columns: Columns,
    pub font: FontSize,
    pub show_images: bool,
    pub grayscale: bool,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            paper: PaperSize::A4,
            orientation: Orientation::Portrait,
            columns: Columns::Auto,
            font: FontSize::Nor,
            show_images: true,
            grayscale: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintLayout {
    pub paper: PaperSize,
    pub orientation: Orientation,
    pub width_mm: u32,
    pub height_mm: u32,
    pub columns: u8,
    pub font_px: u8,
    pub grayscale: bool,
    pub sections: Vec<PrintSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintSection {
    pub category_id: String,
    pub title: String,
    pub entries: Vec<PrintEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintEntry {
    pub number: Option<String>,
    pub name: String,
    pub price: String,
    pub description: String,
    /// Present only when images are shown and the item has one.
    pub image: Option<String>,
}

/// Build the print layout for `catalog` in `lang`.
pub fn compose(catalog: &Catalog, lang: Language, config: &PrintConfig) -> PrintLayout {
    let (w, h) = config.paper.portrait_mm();
    let (width_mm, height_mm) = match config.orientation {
        Orientation::Portrait => (w, h),
        Orientation::Landscape => (h, w),
    };

    let sections = catalog
        .iter()
        .map(|category| PrintSection {
            category_id: category.id.clone(),
            title: category.title.resolve(lang).to_string(),
            entries: category
                .items
                .iter()
                .map(|item| PrintEntry {
                    number: item.number.clone(),
                    name: item.name.clone(),
                    price: item.price.clone(),
                    description: item.ingredients.resolve(lang).to_string(),
                    image: (config.show_images && !item.image.is_empty())
                        .then(|| item.image.clone()),
                })
                .collect(),
        })
        .collect();

    PrintLayout {
        paper: config.paper,
        orientation: config.orientation,
        width_mm,
        height_mm,
        columns: config.columns.resolve(config.paper, config.orientation),
        font_px: config.font.px(),
        grayscale: config.grayscale,
        sections,
    }
}
