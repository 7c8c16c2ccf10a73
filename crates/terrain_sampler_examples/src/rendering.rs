use std::path::Path;

use glam::Vec2;
use image::{Rgb, RgbImage};
use terrain_sampler::sampling::Sample;

/// How a sample is drawn.
#[derive(Clone, Copy, Debug)]
pub struct SampleStyle {
    pub color: [u8; 3],
    /// Disc radius in pixels.
    pub radius: i32,
    /// Length of the heading tick in pixels; 0 disables it.
    pub heading_len: i32,
}

impl Default for SampleStyle {
    fn default() -> Self {
        Self {
            color: [200, 40, 40],
            radius: 5,
            heading_len: 14,
        }
    }
}

/// Output image settings for [`render_samples_to_png`].
#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    pub domain_extent: Vec2,
    pub background: [u8; 3],
    /// Optional ring drawn at the exclusion radius around each sample.
    pub exclusion_radius: Option<f32>,
    pub style: SampleStyle,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), domain_extent: Vec2) -> Self {
        Self {
            image_size,
            domain_extent,
            background: [235, 235, 235],
            exclusion_radius: None,
            style: SampleStyle::default(),
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_exclusion_radius(mut self, radius: f32) -> Self {
        self.exclusion_radius = Some(radius);
        self
    }

    pub fn with_style(mut self, style: SampleStyle) -> Self {
        self.style = style;
        self
    }

    fn scale(&self) -> Vec2 {
        Vec2::new(
            self.image_size.0 as f32 / self.domain_extent.x.max(f32::EPSILON),
            self.image_size.1 as f32 / self.domain_extent.y.max(f32::EPSILON),
        )
    }

    fn to_pixel(&self, local: Vec2) -> (i32, i32) {
        let p = local * self.scale();
        (p.x.round() as i32, p.y.round() as i32)
    }
}

/// Renders sample sites in local region coordinates, with their headings, to a PNG.
pub fn render_samples_to_png(
    samples: &[Sample],
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (w, h) = config.image_size;
    let mut img = RgbImage::from_pixel(w, h, Rgb(config.background));

    if let Some(radius) = config.exclusion_radius {
        let ring = (radius * config.scale().x).round() as i32;
        for s in samples {
            let (cx, cy) = config.to_pixel(s.local);
            draw_ring(&mut img, cx, cy, ring, [170, 170, 200]);
        }
    }

    let style = config.style;
    for s in samples {
        let (cx, cy) = config.to_pixel(s.local);
        draw_disc(&mut img, cx, cy, style.radius, style.color);
        if style.heading_len > 0 {
            let tip = (
                cx + (s.direction.x * style.heading_len as f32).round() as i32,
                cy + (s.direction.z * style.heading_len as f32).round() as i32,
            );
            draw_line(&mut img, (cx, cy), tip, [30, 30, 30]);
        }
    }

    img.save(path.as_ref())?;
    println!("Wrote {} samples to {}", samples.len(), path.as_ref().display());
    Ok(())
}

fn put(img: &mut RgbImage, x: i32, y: i32, color: [u8; 3]) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }
}

fn draw_disc(img: &mut RgbImage, cx: i32, cy: i32, r: i32, color: [u8; 3]) {
    let r2 = r * r;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r2 {
                put(img, cx + dx, cy + dy, color);
            }
        }
    }
}

fn draw_ring(img: &mut RgbImage, cx: i32, cy: i32, r: i32, color: [u8; 3]) {
    let steps = (r.max(1) * 8) as usize;
    for i in 0..steps {
        let a = i as f32 / steps as f32 * std::f32::consts::TAU;
        let x = cx + (a.cos() * r as f32).round() as i32;
        let y = cy + (a.sin() * r as f32).round() as i32;
        put(img, x, y, color);
    }
}

fn draw_line(img: &mut RgbImage, from: (i32, i32), to: (i32, i32), color: [u8; 3]) {
    let steps = (to.0 - from.0).abs().max((to.1 - from.1).abs()).max(1);
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let x = from.0 as f32 + (to.0 - from.0) as f32 * t;
        let y = from.1 as f32 + (to.1 - from.1) as f32 * t;
        put(img, x.round() as i32, y.round() as i32, color);
    }
}
