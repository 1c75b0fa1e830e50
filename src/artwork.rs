use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Half-block rendering: every cell is `▀` with fg = top pixel, bg = bottom pixel.
fn half_blocks(img: &DynamicImage) -> Vec<Line<'static>> {
    let (width, height) = img.dimensions();
    let mut lines = Vec::with_capacity(height.div_ceil(2) as usize);

    for y in (0..height).step_by(2) {
        let spans: Vec<Span<'static>> = (0..width)
            .map(|x| {
                let top = img.get_pixel(x, y);
                let bottom = if y + 1 < height { img.get_pixel(x, y + 1) } else { top };
                Span::styled(
                    "▀",
                    Style::default()
                        .fg(Color::Rgb(top[0], top[1], top[2]))
                        .bg(Color::Rgb(bottom[0], bottom[1], bottom[2])),
                )
            })
            .collect();
        lines.push(Line::from(spans));
    }

    lines
}

/// Fit `img` inside `width` x `height` cells, keeping aspect ratio and centering vertically.
pub fn render_cover(img: &DynamicImage, width: u16, height: u16) -> Vec<Line<'static>> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let resized = img.resize(width as u32, height as u32 * 2, FilterType::Triangle);
    let rows = resized.height().div_ceil(2);
    let padding_top = (height as u32).saturating_sub(rows) / 2;

    let mut lines: Vec<Line<'static>> = (0..padding_top).map(|_| Line::default()).collect();
    lines.extend(half_blocks(&resized));
    lines
}

/// Row thumbnail: 4 cells wide, 2 lines tall
pub fn render_tiny(img: &DynamicImage) -> Vec<Line<'static>> {
    half_blocks(&img.resize_exact(4, 4, FilterType::Triangle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn solid(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([10, 20, 30])))
    }

    #[test]
    fn test_tiny_is_two_lines_of_four() {
        let lines = render_tiny(&solid(150, 150));
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.spans.len() == 4));
    }

    #[test]
    fn test_cover_centers_wide_image() {
        // 2:1 image in a 10x10 cell box: 10 px wide, 5 px tall, 3 rows after padding 3
        let lines = render_cover(&solid(200, 100), 10, 10);
        let art_rows = lines.iter().filter(|l| !l.spans.is_empty()).count();
        assert_eq!(art_rows, 3);
        assert_eq!(lines.len(), 3 + 3);
        assert!(render_cover(&solid(10, 10), 0, 5).is_empty());
    }
}
