//! Box and text annotation.
//!
//! Every drawing operation comes in two forms, following imageproc's
//! convention: `draw_*` returns an annotated copy and leaves the input alone,
//! `draw_*_mut` paints into the caller's buffer.
//!
//! 3-channel buffers are taken in drawing order (blue, green, red), so a
//! [`Color`](crate::color::Color) decoded from hex lands on the right
//! channels. [`overlay_text`] hands its result back in display order.

mod boxes;
mod overlay;
mod text;

pub use boxes::{
    draw_annotated_boxes, draw_annotated_boxes_mut, draw_boxes, draw_boxes_mut, label_band,
    BoxStyle, LabelStyle, LabeledBox, TextLocation, LABEL_BASELINE_GAP,
};
pub use overlay::{
    layout_lines, overlay_text, overlay_text_mut, overlay_text_to_file, Corner, LinePlacement,
    OverlayLayout, OverlayStyle, LINE_INSET,
};
pub use text::{FontRenderer, GlyphParams, GlyphRenderer, TextExtent, BASE_PIXEL_HEIGHT};
