//! Translate the abstract compositing operators into each backend's native vocabulary.
//!
//! Each backend has its own enumeration of compositing modes, with its own names and its own
//! numbering. Rather than a chain of conditionals, every backend gets a complete table with one
//! entry per abstract operator, indexed by the operator's raw value. So a new backend can't
//! forget an operator without the table failing to compile.

use crate::backends::{painter, raster};

/// The number of abstract compositing operators.
pub const OPERATOR_COUNT: usize = 24;

/// A Porter-Duff or separable blend rule, independent of any rendering backend.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum CompositingOperator {
    /// Source is placed over the destination.
    #[default]
    SourceOver = 0,
    /// Source replaces the destination.
    SourceCopy = 1,
    /// Source where the destination is.
    SourceIn = 2,
    /// Source where the destination isn't.
    SourceOut = 3,
    /// Source over the destination, but only where the destination is.
    SourceAtop = 4,
    /// Destination is placed over the source.
    DestinationOver = 5,
    /// The destination is left untouched.
    DestinationCopy = 6,
    /// Destination where the source is.
    DestinationIn = 7,
    /// Destination where the source isn't.
    DestinationOut = 8,
    /// Destination over the source, but only where the source is.
    DestinationAtop = 9,
    /// Source and destination where they don't overlap.
    Xor = 10,
    /// Everything is cleared to transparent.
    Clear = 11,
    /// Source and destination are added.
    Plus = 12,
    /// Multiply.
    Multiply = 13,
    /// Screen.
    Screen = 14,
    /// Overlay.
    Overlay = 15,
    /// Darken.
    Darken = 16,
    /// Lighten.
    Lighten = 17,
    /// Colour dodge.
    ColorDodge = 18,
    /// Colour burn.
    ColorBurn = 19,
    /// Hard light.
    HardLight = 20,
    /// Soft light.
    SoftLight = 21,
    /// Difference.
    Difference = 22,
    /// Exclusion.
    Exclusion = 23,
}

impl CompositingOperator {
    /// Every operator, in raw value order.
    pub const ALL: [Self; OPERATOR_COUNT] = [
        Self::SourceOver,
        Self::SourceCopy,
        Self::SourceIn,
        Self::SourceOut,
        Self::SourceAtop,
        Self::DestinationOver,
        Self::DestinationCopy,
        Self::DestinationIn,
        Self::DestinationOut,
        Self::DestinationAtop,
        Self::Xor,
        Self::Clear,
        Self::Plus,
        Self::Multiply,
        Self::Screen,
        Self::Overlay,
        Self::Darken,
        Self::Lighten,
        Self::ColorDodge,
        Self::ColorBurn,
        Self::HardLight,
        Self::SoftLight,
        Self::Difference,
        Self::Exclusion,
    ];

    /// The raw value of the operator.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self as u32
    }

    /// Interpret an unvalidated raw value. Anything unknown is treated as source-over.
    #[must_use]
    pub fn from_raw(raw: u32) -> Self {
        usize::try_from(raw)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .unwrap_or_default()
    }

    /// The canonical kebab-case name, as used in config files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SourceOver => "source-over",
            Self::SourceCopy => "source-copy",
            Self::SourceIn => "source-in",
            Self::SourceOut => "source-out",
            Self::SourceAtop => "source-atop",
            Self::DestinationOver => "destination-over",
            Self::DestinationCopy => "destination-copy",
            Self::DestinationIn => "destination-in",
            Self::DestinationOut => "destination-out",
            Self::DestinationAtop => "destination-atop",
            Self::Xor => "xor",
            Self::Clear => "clear",
            Self::Plus => "plus",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::ColorDodge => "color-dodge",
            Self::ColorBurn => "color-burn",
            Self::HardLight => "hard-light",
            Self::SoftLight => "soft-light",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
        }
    }

    /// The short `CamelCase` name, as Blend2D abbreviates it, eg `SrcOver`.
    #[must_use]
    pub fn short_name(self) -> String {
        self.name()
            .split('-')
            .map(|word| {
                let word = match word {
                    "source" => "src",
                    "destination" => "dst",
                    other => other,
                };
                let mut characters = word.chars();
                characters.next().map_or_else(String::new, |first| {
                    first.to_ascii_uppercase().to_string() + characters.as_str()
                })
            })
            .collect()
    }
}

impl core::fmt::Display for CompositingOperator {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Returned when an operator name isn't recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct UnknownOperator(pub String);

impl core::fmt::Display for UnknownOperator {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(formatter, "Unknown compositing operator: `{}`", self.0)
    }
}

impl std::error::Error for UnknownOperator {}

impl core::str::FromStr for CompositingOperator {
    type Err = UnknownOperator;

    /// Accepts both `source-over` and `SrcOver` styles, case-insensitively.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let wanted = name.replace(['-', '_'], "").to_lowercase();
        Self::ALL
            .into_iter()
            .find(|operator| {
                operator.name().replace('-', "") == wanted
                    || operator.short_name().to_lowercase() == wanted
            })
            .ok_or_else(|| UnknownOperator(name.to_owned()))
    }
}

/// Which rendering backend is active.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum BackendKind {
    /// The Blend2D-style raster backend. Draws hard-edged boxes.
    #[default]
    Raster,
    /// The QPainter-style backend. Antialiases its geometry.
    Painter,
}

impl BackendKind {
    /// Both backends.
    pub const ALL: [Self; 2] = [Self::Raster, Self::Painter];

    /// The name used in config files and on the CLI.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Raster => "raster",
            Self::Painter => "painter",
        }
    }
}

impl core::fmt::Display for BackendKind {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        formatter.write_str(self.name())
    }
}

impl core::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_lowercase().as_str() {
            "raster" | "blend2d" | "a" => Ok(Self::Raster),
            "painter" | "qt" | "b" => Ok(Self::Painter),
            _ => Err(format!("Unknown backend: `{name}`")),
        }
    }
}

/// A compositing operator expressed in a specific backend's own vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum NativeOperator {
    /// An operator for [`BackendKind::Raster`].
    Raster(raster::CompOp),
    /// An operator for [`BackendKind::Painter`].
    Painter(painter::CompositionMode),
}

/// The raster backend's operator for each abstract operator, in raw value order.
const RASTER_TABLE: [raster::CompOp; OPERATOR_COUNT] = [
    raster::CompOp::SrcOver,
    raster::CompOp::SrcCopy,
    raster::CompOp::SrcIn,
    raster::CompOp::SrcOut,
    raster::CompOp::SrcAtop,
    raster::CompOp::DstOver,
    raster::CompOp::DstCopy,
    raster::CompOp::DstIn,
    raster::CompOp::DstOut,
    raster::CompOp::DstAtop,
    raster::CompOp::Xor,
    raster::CompOp::Clear,
    raster::CompOp::Plus,
    raster::CompOp::Multiply,
    raster::CompOp::Screen,
    raster::CompOp::Overlay,
    raster::CompOp::Darken,
    raster::CompOp::Lighten,
    raster::CompOp::ColorDodge,
    raster::CompOp::ColorBurn,
    raster::CompOp::HardLight,
    raster::CompOp::SoftLight,
    raster::CompOp::Difference,
    raster::CompOp::Exclusion,
];

/// The painter backend's mode for each abstract operator, in raw value order.
const PAINTER_TABLE: [painter::CompositionMode; OPERATOR_COUNT] = [
    painter::CompositionMode::SourceOver,
    painter::CompositionMode::Source,
    painter::CompositionMode::SourceIn,
    painter::CompositionMode::SourceOut,
    painter::CompositionMode::SourceAtop,
    painter::CompositionMode::DestinationOver,
    painter::CompositionMode::Destination,
    painter::CompositionMode::DestinationIn,
    painter::CompositionMode::DestinationOut,
    painter::CompositionMode::DestinationAtop,
    painter::CompositionMode::Xor,
    painter::CompositionMode::Clear,
    painter::CompositionMode::Plus,
    painter::CompositionMode::Multiply,
    painter::CompositionMode::Screen,
    painter::CompositionMode::Overlay,
    painter::CompositionMode::Darken,
    painter::CompositionMode::Lighten,
    painter::CompositionMode::ColorDodge,
    painter::CompositionMode::ColorBurn,
    painter::CompositionMode::HardLight,
    painter::CompositionMode::SoftLight,
    painter::CompositionMode::Difference,
    painter::CompositionMode::Exclusion,
];

/// Look up an operator's entry in a backend table, falling back to the source-over entry.
fn lookup<T: Copy>(table: &[T; OPERATOR_COUNT], raw: u32) -> T {
    let source_over = table[0];
    usize::try_from(raw)
        .ok()
        .and_then(|index| table.get(index).copied())
        .unwrap_or(source_over)
}

/// The raster backend's native operator.
#[must_use]
pub fn raster_operator(operator: CompositingOperator) -> raster::CompOp {
    lookup(&RASTER_TABLE, operator.raw())
}

/// The painter backend's native mode.
#[must_use]
pub fn painter_operator(operator: CompositingOperator) -> painter::CompositionMode {
    lookup(&PAINTER_TABLE, operator.raw())
}

/// Translate an abstract operator for the given backend.
#[must_use]
pub fn translate(operator: CompositingOperator, backend: BackendKind) -> NativeOperator {
    translate_raw(operator.raw(), backend)
}

/// Translate an unvalidated raw operator value for the given backend. Values outside the known
/// set get the backend's source-over operator.
#[must_use]
pub fn translate_raw(raw: u32, backend: BackendKind) -> NativeOperator {
    match backend {
        BackendKind::Raster => NativeOperator::Raster(lookup(&RASTER_TABLE, raw)),
        BackendKind::Painter => NativeOperator::Painter(lookup(&PAINTER_TABLE, raw)),
    }
}
