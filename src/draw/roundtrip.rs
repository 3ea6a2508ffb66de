use crate::{
    draw::overlay::Overlay,
    foundation::{
        core::{Coord2d, Line2d, Rgb8},
        error::{InteropError, InteropResult},
    },
    format::table::{ElemType, VisionFormat},
    host::matrix::HostMatrix,
    interop::convert::{convert_host_to_vision, convert_vision_to_host},
    runtime::api::{ImageHandle, VisionRuntime},
};

/// Color and line thickness for the drawing helpers.
///
/// For circles a negative thickness fills the disc.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DrawStyle {
    pub color: Rgb8,
    pub thickness: i32,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            color: Rgb8::new(255, 0, 0),
            thickness: 1,
        }
    }
}

#[derive(Clone, Copy)]
enum CircleMode {
    Outline(f64),
    Filled,
}

/// Host copy of the input image, promoted to RGB.
struct Converted {
    canvas: HostMatrix,
}

/// Canvas with the overlay already blended in.
struct Annotated {
    canvas: HostMatrix,
}

impl Converted {
    fn from_image<R: VisionRuntime + ?Sized>(
        runtime: &mut R,
        image: ImageHandle,
    ) -> InteropResult<Self> {
        let info = runtime
            .query_image(image)
            .map_err(|status| InteropError::runtime("query_image", status))?;
        if !matches!(info.format, VisionFormat::U8 | VisionFormat::Rgb) {
            return Err(InteropError::unsupported_format(format!(
                "cannot draw on {:?} images",
                info.format
            )));
        }

        let host = convert_vision_to_host(runtime, image)?;
        let canvas = match host.elem() {
            ElemType::U8C1 => host.gray_to_rgb()?,
            _ => host,
        };
        Ok(Self { canvas })
    }

    fn annotate(
        mut self,
        color: Rgb8,
        draw: impl FnOnce(&mut Overlay),
    ) -> InteropResult<Annotated> {
        let mut overlay = Overlay::new(self.canvas.width(), self.canvas.height())?;
        overlay.set_color(color);
        draw(&mut overlay);
        overlay.composite_onto(&mut self.canvas)?;
        Ok(Annotated {
            canvas: self.canvas,
        })
    }
}

impl Annotated {
    fn into_image<R: VisionRuntime + ?Sized>(self, runtime: &mut R) -> InteropResult<ImageHandle> {
        convert_host_to_vision(runtime, &self.canvas)
    }
}

fn first_n<T: Copy>(items: &[T], count: usize, what: &str) -> InteropResult<Vec<T>> {
    if count > items.len() {
        return Err(InteropError::validation(format!(
            "{what} count {count} exceeds the {} supplied",
            items.len()
        )));
    }
    Ok(items[..count].to_vec())
}

/// Draw the first `count` segments of `lines` onto a copy of `image`.
///
/// Returns a new RGB image; `image` itself is never written.
#[tracing::instrument(skip(runtime, lines), fields(supplied = lines.len()))]
pub fn draw_lines<R: VisionRuntime + ?Sized>(
    runtime: &mut R,
    image: ImageHandle,
    lines: &[Line2d],
    count: usize,
    style: &DrawStyle,
) -> InteropResult<ImageHandle> {
    let converted = Converted::from_image(runtime, image)?;
    let batch = first_n(lines, count, "line")?;
    if style.thickness < 1 {
        return Err(InteropError::validation(format!(
            "line thickness must be at least 1, got {}",
            style.thickness
        )));
    }

    let width = f64::from(style.thickness);
    let annotated = converted.annotate(style.color, |overlay| {
        for line in batch {
            overlay.stroke_line(line, width);
        }
    })?;
    annotated.into_image(runtime)
}

/// Draw circles of `radius` around the first `count` entries of `centers`.
///
/// `style.thickness >= 1` strokes the outline, a negative value fills.
#[tracing::instrument(skip(runtime, centers), fields(supplied = centers.len()))]
pub fn draw_circles<R: VisionRuntime + ?Sized>(
    runtime: &mut R,
    image: ImageHandle,
    centers: &[Coord2d],
    count: usize,
    radius: u32,
    style: &DrawStyle,
) -> InteropResult<ImageHandle> {
    let converted = Converted::from_image(runtime, image)?;
    let batch = first_n(centers, count, "circle")?;
    let mode = match style.thickness {
        0 => {
            return Err(InteropError::validation(
                "circle thickness 0 draws nothing",
            ));
        }
        t if t < 0 => CircleMode::Filled,
        t => CircleMode::Outline(f64::from(t)),
    };

    let radius = f64::from(radius);
    let annotated = converted.annotate(style.color, |overlay| {
        for center in batch {
            match mode {
                CircleMode::Outline(width) => overlay.stroke_circle(center, radius, width),
                CircleMode::Filled => overlay.fill_circle(center, radius),
            }
        }
    })?;
    annotated.into_image(runtime)
}

#[cfg(test)]
#[path = "../../tests/unit/draw/roundtrip.rs"]
mod tests;
