use kurbo::Shape;

use crate::{
    foundation::{
        core::{Coord2d, Line2d, Rgb8},
        error::{InteropError, InteropResult},
    },
    format::table::ElemType,
    host::matrix::HostMatrix,
};

const PATH_TOLERANCE: f64 = 0.1;

/// Antialiased drawing layer, rasterized on the CPU and blended onto an RGB matrix.
pub(crate) struct Overlay {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl Overlay {
    pub(crate) fn new(width: u32, height: u32) -> InteropResult<Self> {
        let width: u16 = width
            .try_into()
            .map_err(|_| InteropError::validation("overlay width exceeds u16"))?;
        let height: u16 = height
            .try_into()
            .map_err(|_| InteropError::validation("overlay height exceeds u16"))?;
        Ok(Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
        })
    }

    pub(crate) fn set_color(&mut self, color: Rgb8) {
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, 255,
        ));
    }

    /// Round-capped segment between the centers of the two endpoint pixels.
    pub(crate) fn stroke_line(&mut self, line: Line2d, width: f64) {
        let segment = kurbo::Line::new(pixel_center(line.start()), pixel_center(line.end()));
        self.stroke(&segment.to_path(PATH_TOLERANCE), width);
    }

    pub(crate) fn stroke_circle(&mut self, center: Coord2d, radius: f64, width: f64) {
        let circle = kurbo::Circle::new(pixel_center(center), radius);
        self.stroke(&circle.to_path(PATH_TOLERANCE), width);
    }

    pub(crate) fn fill_circle(&mut self, center: Coord2d, radius: f64) {
        let circle = kurbo::Circle::new(pixel_center(center), radius);
        self.ctx
            .fill_path(&bezpath_to_cpu(&circle.to_path(PATH_TOLERANCE)));
    }

    /// Rasterize everything drawn so far and blend it (src-over) onto `host`.
    pub(crate) fn composite_onto(mut self, host: &mut HostMatrix) -> InteropResult<()> {
        if host.elem() != ElemType::U8C3 {
            return Err(InteropError::unsupported_format(format!(
                "overlay target must be {:?}, got {:?}",
                ElemType::U8C3,
                host.elem()
            )));
        }
        if host.width() != u32::from(self.width) || host.height() != u32::from(self.height) {
            return Err(InteropError::validation("overlay and target sizes differ"));
        }

        self.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut pixmap);

        let premul = pixmap.data_as_u8_slice();
        let row_px = usize::from(self.width) * 4;
        for y in 0..host.height() {
            let src_row = &premul[y as usize * row_px..(y as usize + 1) * row_px];
            for (dst, src) in host
                .row_mut(y)
                .chunks_exact_mut(3)
                .zip(src_row.chunks_exact(4))
            {
                blend_over(dst, src);
            }
        }
        Ok(())
    }

    fn stroke(&mut self, path: &kurbo::BezPath, width: f64) {
        let stroke = vello_cpu::kurbo::Stroke::new(width).with_caps(vello_cpu::kurbo::Cap::Round);
        self.ctx.set_stroke(stroke);
        self.ctx.stroke_path(&bezpath_to_cpu(path));
    }
}

/// `dst = src + dst * (1 - src.a)` with `src` premultiplied RGBA8.
fn blend_over(dst: &mut [u8], src: &[u8]) {
    let inv = 255 - u16::from(src[3]);
    if inv == 255 {
        return;
    }
    for (d, &s) in dst.iter_mut().zip(src) {
        let rest = (u16::from(*d) * inv + 127) / 255;
        *d = u16::from(s).saturating_add(rest).min(255) as u8;
    }
}

fn pixel_center(p: Coord2d) -> kurbo::Point {
    kurbo::Point::new(f64::from(p.x) + 0.5, f64::from(p.y) + 0.5)
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/draw/overlay.rs"]
mod tests;
