//! Per-pixel compositing maths shared by both backends.
//!
//! Pixels are stored premultiplied, as both Blend2D and Qt's raster engine do. The Porter-Duff
//! operators come from `palette`'s `Compose` trait and the separable blend modes from its `Blend`
//! trait. Both act on premultiplied sRGB values, with `self` as the source and `other` as the
//! destination.

use palette::blend::{Blend as _, Compose as _, PreAlpha};

/// A premultiplied colour with floating point channels in `[0, 1]`.
pub type Premultiplied = PreAlpha<palette::Srgb<f32>>;

/// A premultiplied RGBA8 pixel, as stored on the canvas.
pub type Pixel = [u8; 4];

/// Fully transparent.
#[must_use]
pub fn transparent() -> Premultiplied {
    PreAlpha {
        color: palette::Srgb::new(0.0, 0.0, 0.0),
        alpha: 0.0,
    }
}

/// Convert a straight (non-premultiplied) 8 bit colour.
#[must_use]
pub fn premultiply(colour: palette::Srgba<u8>) -> Premultiplied {
    let straight: palette::Srgba<f32> = colour.into_format();
    PreAlpha {
        color: palette::Srgb::new(
            straight.red * straight.alpha,
            straight.green * straight.alpha,
            straight.blue * straight.alpha,
        ),
        alpha: straight.alpha,
    }
}

/// Read a stored canvas pixel.
#[must_use]
pub fn from_pixel(pixel: Pixel) -> Premultiplied {
    let [red, green, blue, alpha] = pixel.map(|channel| f32::from(channel) / 255.0);
    PreAlpha {
        color: palette::Srgb::new(red, green, blue),
        alpha,
    }
}

/// Quantise back to a canvas pixel. Colour channels can't exceed alpha in a valid premultiplied
/// pixel, so they're clamped to it.
#[must_use]
pub fn to_pixel(colour: Premultiplied) -> Pixel {
    let alpha = colour.alpha.clamp(0.0, 1.0);
    let clamp = |channel: f32| channel.clamp(0.0, alpha);
    [
        quantise(clamp(colour.color.red)),
        quantise(clamp(colour.color.green)),
        quantise(clamp(colour.color.blue)),
        quantise(alpha),
    ]
}

/// `[0, 1]` to `[0, 255]`, rounding to nearest.
#[expect(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Callers clamp to `[0, 1]` first"
)]
fn quantise(channel: f32) -> u8 {
    (channel * 255.0).round() as u8
}

/// Convert a premultiplied pixel to straight alpha, eg for exporting images.
#[must_use]
#[expect(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The result is clamped to the `u8` range first"
)]
pub fn unpremultiply(pixel: Pixel) -> Pixel {
    let [red, green, blue, alpha] = pixel;
    if alpha == 0 {
        return [0, 0, 0, 0];
    }
    let restore = |channel: u8| {
        (f32::from(channel) * 255.0 / f32::from(alpha))
            .round()
            .clamp(0.0, 255.0) as u8
    };
    [restore(red), restore(green), restore(blue), alpha]
}

/// Apply a compositing result through partial coverage, as for antialiased edges:
/// `destination + (result - destination) * coverage`.
#[must_use]
pub fn with_coverage(
    result: Premultiplied,
    destination: Premultiplied,
    coverage: f32,
) -> Premultiplied {
    if coverage >= 1.0 {
        return result;
    }
    let mix = |incoming: f32, existing: f32| (incoming - existing).mul_add(coverage, existing);
    PreAlpha {
        color: palette::Srgb::new(
            mix(result.color.red, destination.color.red),
            mix(result.color.green, destination.color.green),
            mix(result.color.blue, destination.color.blue),
        ),
        alpha: mix(result.alpha, destination.alpha),
    }
}

/// Source over destination.
#[must_use]
pub fn source_over(source: Premultiplied, destination: Premultiplied) -> Premultiplied {
    source.over(destination)
}

/// Source replaces destination.
#[must_use]
pub const fn source_copy(source: Premultiplied, _destination: Premultiplied) -> Premultiplied {
    source
}

/// Source, masked by the destination's alpha.
#[must_use]
pub fn source_in(source: Premultiplied, destination: Premultiplied) -> Premultiplied {
    source.inside(destination)
}

/// Source, masked by the inverse of the destination's alpha.
#[must_use]
pub fn source_out(source: Premultiplied, destination: Premultiplied) -> Premultiplied {
    source.outside(destination)
}

/// Source over destination, only where there is destination.
#[must_use]
pub fn source_atop(source: Premultiplied, destination: Premultiplied) -> Premultiplied {
    source.atop(destination)
}

/// Destination over source.
#[must_use]
pub fn destination_over(source: Premultiplied, destination: Premultiplied) -> Premultiplied {
    destination.over(source)
}

/// Destination is kept as is.
#[must_use]
pub const fn destination_copy(
    _source: Premultiplied,
    destination: Premultiplied,
) -> Premultiplied {
    destination
}

/// Destination, masked by the source's alpha.
#[must_use]
pub fn destination_in(source: Premultiplied, destination: Premultiplied) -> Premultiplied {
    destination.inside(source)
}

/// Destination, masked by the inverse of the source's alpha.
#[must_use]
pub fn destination_out(source: Premultiplied, destination: Premultiplied) -> Premultiplied {
    destination.outside(source)
}

/// Destination over source, only where there is source.
#[must_use]
pub fn destination_atop(source: Premultiplied, destination: Premultiplied) -> Premultiplied {
    destination.atop(source)
}

/// Source and destination where they don't overlap.
#[must_use]
pub fn xor(source: Premultiplied, destination: Premultiplied) -> Premultiplied {
    source.xor(destination)
}

/// Everything becomes transparent.
#[must_use]
pub fn clear(_source: Premultiplied, _destination: Premultiplied) -> Premultiplied {
    transparent()
}

/// Saturating addition.
#[must_use]
pub fn plus(source: Premultiplied, destination: Premultiplied) -> Premultiplied {
    source.plus(destination)
}

/// Multiply.
#[must_use]
pub fn multiply(source: Premultiplied, destination: Premultiplied) -> Premultiplied {
    source.multiply(destination)
}

/// Screen.
#[must_use]
pub fn screen(source: Premultiplied, destination: Premultiplied) -> Premultiplied {
    source.screen(destination)
}

/// Overlay. The destination decides whether to multiply or screen.
#[must_use]
pub fn overlay(source: Premultiplied, destination: Premultiplied) -> Premultiplied {
    source.overlay(destination)
}

/// Darken.
#[must_use]
pub fn darken(source: Premultiplied, destination: Premultiplied) -> Premultiplied {
    source.darken(destination)
}

/// Lighten.
#[must_use]
pub fn lighten(source: Premultiplied, destination: Premultiplied) -> Premultiplied {
    source.lighten(destination)
}

/// Colour dodge. Brightens the destination to reflect the source.
#[must_use]
pub fn color_dodge(source: Premultiplied, destination: Premultiplied) -> Premultiplied {
    source.dodge(destination)
}

/// Colour burn. Darkens the destination to reflect the source.
#[must_use]
pub fn color_burn(source: Premultiplied, destination: Premultiplied) -> Premultiplied {
    source.burn(destination)
}

/// Hard light. The source decides whether to multiply or screen.
#[must_use]
pub fn hard_light(source: Premultiplied, destination: Premultiplied) -> Premultiplied {
    source.hard_light(destination)
}

/// Soft light.
#[must_use]
pub fn soft_light(source: Premultiplied, destination: Premultiplied) -> Premultiplied {
    source.soft_light(destination)
}

/// Difference.
#[must_use]
pub fn difference(source: Premultiplied, destination: Premultiplied) -> Premultiplied {
    source.difference(destination)
}

/// Exclusion.
#[must_use]
pub fn exclusion(source: Premultiplied, destination: Premultiplied) -> Premultiplied {
    source.exclusion(destination)
}
