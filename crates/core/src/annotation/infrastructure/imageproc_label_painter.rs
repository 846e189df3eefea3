use ab_glyph::{FontVec, PxScale};
use image::{ImageBuffer, Rgb};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::annotation::domain::label_painter::LabelPainter;
use crate::shared::constants::{BOX_THICKNESS, HIGHLIGHT_COLOR, LABEL_FONT_SIZE, LABEL_OFFSET};
use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// Draws boxes with `imageproc` and renders labels with an `ab_glyph` font.
///
/// The label sits above the box's top-left corner, pushed down to the frame
/// edge for faces at the very top. Without a font only the box is drawn.
pub struct ImageprocLabelPainter {
    font: Option<FontVec>,
    scale: PxScale,
    color: Rgb<u8>,
    thickness: u32,
}

impl ImageprocLabelPainter {
    pub fn new(font: Option<FontVec>) -> Self {
        Self {
            font,
            scale: PxScale::from(LABEL_FONT_SIZE),
            color: Rgb(HIGHLIGHT_COLOR),
            thickness: BOX_THICKNESS,
        }
    }
}

impl LabelPainter for ImageprocLabelPainter {
    fn paint(
        &self,
        frame: &mut Frame,
        region: &FaceRegion,
        label: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let (width, height) = (frame.width(), frame.height());
        let r = region.clamp(width, height);
        if r.is_empty() {
            return Ok(());
        }

        let mut canvas: ImageBuffer<Rgb<u8>, &mut [u8]> =
            ImageBuffer::from_raw(width, height, frame.data_mut())
                .ok_or("Frame buffer does not match its dimensions")?;

        // Nested rectangles, each one pixel further in.
        let (w, h) = (r.width() as u32, r.height() as u32);
        for t in 0..self.thickness {
            let inner_w = w.saturating_sub(2 * t);
            let inner_h = h.saturating_sub(2 * t);
            if inner_w == 0 || inner_h == 0 {
                break;
            }
            let rect = Rect::at(r.x1 + t as i32, r.y1 + t as i32).of_size(inner_w, inner_h);
            draw_hollow_rect_mut(&mut canvas, rect, self.color);
        }

        if let Some(font) = &self.font {
            let (x, y) = label_origin(&r, self.scale.y);
            draw_text_mut(&mut canvas, self.color, x, y, self.scale, font, label);
        }
        Ok(())
    }
}

/// Top-left corner of the label text for a clamped face box.
fn label_origin(region: &FaceRegion, font_height: f32) -> (i32, i32) {
    let top = region.y1 - LABEL_OFFSET - font_height.ceil() as i32;
    (region.x1, top.max(0))
}
