use std::{collections::HashMap, sync::Arc};

use crate::assets::fonts::{FontFace, FontSet, TextBrushRgba8, TextLayoutEngine};
use crate::foundation::core::{Canvas, RasterImage, Rect, Rgba8};
use crate::foundation::error::{GreetcardError, GreetcardResult};
use crate::render::ops::DrawOp;
use crate::render::surface::{DrawSurface, SurfaceBackend};

/// Tolerance used when flattening circles into Bézier paths.
const CIRCLE_TOLERANCE: f64 = 0.05;

/// CPU rasterizer backed by `vello_cpu`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuBackend;

impl CpuBackend {
    pub fn new() -> Self {
        Self
    }
}

impl SurfaceBackend for CpuBackend {
    fn create_surface(&self, canvas: Canvas) -> GreetcardResult<Box<dyn DrawSurface>> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| GreetcardError::composition("surface width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| GreetcardError::composition("surface height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(GreetcardError::composition("surface must be non-empty"));
        }

        Ok(Box::new(CpuSurface {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            text: TextLayoutEngine::new(),
            font_cache: HashMap::new(),
        }))
    }
}

struct CpuSurface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    text: TextLayoutEngine,
    font_cache: HashMap<usize, vello_cpu::peniko::FontData>,
}

impl DrawSurface for CpuSurface {
    fn canvas(&self) -> Canvas {
        Canvas {
            width: u32::from(self.width),
            height: u32::from(self.height),
        }
    }

    fn draw(&mut self, op: &DrawOp, fonts: &FontSet) -> GreetcardResult<()> {
        let ctx = &mut self.ctx;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::FillRect { rect, color } => {
                ctx.set_paint(color_to_cpu(*color));
                ctx.fill_rect(&rect_to_cpu(*rect));
            }
            DrawOp::StrokeRect { rect, color, width } => {
                ctx.set_paint(color_to_cpu(*color));
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                ctx.stroke_rect(&rect_to_cpu(*rect));
            }
            DrawOp::FillCircle {
                center,
                radius,
                color,
            } => {
                let path = circle_path(*center, *radius);
                ctx.set_paint(color_to_cpu(*color));
                ctx.fill_path(&bezpath_to_cpu(&path));
            }
            DrawOp::StrokeCircle {
                center,
                radius,
                color,
                width,
            } => {
                let path = circle_path(*center, *radius);
                ctx.set_paint(color_to_cpu(*color));
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                ctx.stroke_path(&bezpath_to_cpu(&path));
            }
            DrawOp::StrokeCurve {
                start,
                segments,
                color,
                width,
            } => {
                let path = DrawOp::curve_path(*start, segments);
                ctx.set_paint(color_to_cpu(*color));
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                ctx.stroke_path(&bezpath_to_cpu(&path));
            }
            DrawOp::Text {
                text,
                anchor,
                size_px,
                weight,
                color,
                align,
                direction,
            } => {
                let Some(face) = fonts.face_for_weight(*weight) else {
                    tracing::debug!(%text, "no font face; text op skipped");
                    return Ok(());
                };
                let brush = TextBrushRgba8 {
                    r: color.r,
                    g: color.g,
                    b: color.b,
                    a: color.a,
                };
                let layout = self.text.layout_line(text, face, *size_px, brush)?;
                let width = f64::from(layout.width());
                let baseline = layout
                    .lines()
                    .next()
                    .map(|l| f64::from(l.metrics().baseline))
                    .unwrap_or(0.0);
                let x0 = align.left_edge(*direction, anchor.x, width);
                let y0 = anchor.y - baseline;

                let font = font_data_for(&mut self.font_cache, face);
                let ctx = &mut self.ctx;
                ctx.set_transform(vello_cpu::kurbo::Affine::translate((x0, y0)));
                for line in layout.lines() {
                    for item in line.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };
                        let brush = run.style().brush;
                        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                            brush.r, brush.g, brush.b, brush.a,
                        ));
                        let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        });
                        ctx.glyph_run(&font)
                            .font_size(run.run().font_size())
                            .fill_glyphs(glyphs);
                    }
                }
            }
        }
        Ok(())
    }

    fn draw_image(&mut self, image: &RasterImage, dst: Rect) -> GreetcardResult<()> {
        image.check_decoded()?;
        if dst.width() <= 0.0 || dst.height() <= 0.0 {
            return Err(GreetcardError::composition("image destination is empty"));
        }

        let pixmap = image_premul_bytes_to_pixmap(
            image.rgba8_premul.as_slice(),
            image.width,
            image.height,
        )?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        let (w, h) = (f64::from(image.width), f64::from(image.height));
        let transform = vello_cpu::kurbo::Affine::translate((dst.x0, dst.y0))
            * vello_cpu::kurbo::Affine::scale_non_uniform(dst.width() / w, dst.height() / h);

        let ctx = &mut self.ctx;
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(transform);
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
        Ok(())
    }

    fn export(mut self: Box<Self>) -> GreetcardResult<RasterImage> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        RasterImage::new(
            u32::from(self.width),
            u32::from(self.height),
            pixmap.data_as_u8_slice().to_vec(),
        )
    }
}

fn font_data_for(
    cache: &mut HashMap<usize, vello_cpu::peniko::FontData>,
    face: &FontFace,
) -> vello_cpu::peniko::FontData {
    let key = Arc::as_ptr(&face.bytes) as usize;
    cache
        .entry(key)
        .or_insert_with(|| {
            vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(face.bytes.as_ref().clone()),
                face.index,
            )
        })
        .clone()
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn circle_path(center: kurbo::Point, radius: f64) -> kurbo::BezPath {
    use kurbo::Shape;

    kurbo::Circle::new(center, radius).to_path(CIRCLE_TOLERANCE)
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

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> GreetcardResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| GreetcardError::composition("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| GreetcardError::composition("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(GreetcardError::composition(
            "prepared image byte length mismatch",
        ));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
