//! SVG rasterizing shared by the viewer and the catalog builder.

use resvg::{tiny_skia, usvg};

/// Renders `tree` at its intrinsic size, scaled down so neither side exceeds
/// `max_side`. Returns `None` when the drawing has no area.
pub fn rasterize(tree: &usvg::Tree, max_side: Option<u32>) -> Option<image::RgbaImage> {
    let size = tree.size();
    let scale = max_side.map_or(1.0, |max| {
        (max as f32 / size.width().max(size.height())).min(1.0)
    });
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)?;
    resvg::render(
        tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    // tiny-skia stores premultiplied alpha
    let pixels = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();
    image::RgbaImage::from_raw(width, height, pixels)
}
