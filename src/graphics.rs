/// RGBA color with 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl Color {
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Same color with the alpha channel replaced
    pub const fn with_alpha(self, a: u8) -> Self {
        Color { a, ..self }
    }

    pub fn as_rgba8(&self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }

    /// Source-over compositing of `self` onto an opaque-or-not `below`
    pub fn over(self, below: Color) -> Color {
        match self.a {
            255 => self,
            0 => below,
            a => {
                let alpha = a as f64 / 255.0;
                let mix = |top: u8, bottom: u8| {
                    (top as f64 * alpha + bottom as f64 * (1.0 - alpha)).round() as u8
                };
                let out_alpha =
                    (a as f64 + below.a as f64 * (1.0 - alpha)).round().min(255.0) as u8;
                Color::rgba8(
                    mix(self.r, below.r),
                    mix(self.g, below.g),
                    mix(self.b, below.b),
                    out_alpha,
                )
            }
        }
    }
}

/// A position in logical or device coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Uniform scale followed by a translation, mapping logical to device pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    pub fn new(scale: f64, dx: f64, dy: f64) -> Self {
        Transform { scale, dx, dy }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.dx, p.y * self.scale + self.dy)
    }

    /// Scales a length, never letting it drop below one device pixel
    pub fn length(&self, len: f64) -> f64 {
        (len * self.scale).max(1.0)
    }
}

/// A piece of text placed on the surface
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Device coordinates of the text's left edge
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub color: Color,
}

/// A 2-D raster target the animation draws onto.
///
/// All drawing methods take logical coordinates; the active transform maps
/// them to device pixels.
pub trait Surface {
    /// Captured contents that can later be restored
    type Snapshot;

    fn set_transform(&mut self, transform: Transform);
    fn clear(&mut self, color: Color);
    fn stroke_arc(&mut self, center: Point, radius: f64, color: Color);
    /// Small filled and outlined disc marking a point of interest
    fn fill_blob(&mut self, center: Point, radius: f64, fill: Color, stroke: Color);
    fn stroke_line(&mut self, from: Point, to: Point, color: Color, dashed: bool);
    fn stroke_path(&mut self, points: &[Point], color: Color);
    fn fill_text(&mut self, at: Point, text: &str, color: Color);
    fn capture(&self) -> Self::Snapshot;
    fn restore(&mut self, snapshot: &Self::Snapshot);
}

/// Logical length of each on and off run in a dashed line
const DASH: f64 = 4.0;

/// In-memory RGBA canvas
#[derive(Debug, Clone)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixel_data: Vec<u8>,
    labels: Vec<Label>,
    transform: Transform,
}

/// Pixels and labels captured from a [`Canvas`]
#[derive(Debug, Clone)]
pub struct CanvasSnapshot {
    width: usize,
    height: usize,
    pixel_data: Vec<u8>,
    labels: Vec<Label>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas {
            width,
            height,
            pixel_data: vec![0u8; width * height * 4],
            labels: Vec::new(),
            transform: Transform::IDENTITY,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Color of a device pixel, `None` outside the canvas
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y * self.width + x) * 4;
        let p = &self.pixel_data[offset..offset + 4];
        Some(Color::rgba8(p[0], p[1], p[2], p[3]))
    }

    /// Blends a color onto a device pixel, clipping anything outside
    fn put_pixel(&mut self, x: isize, y: isize, color: Color) {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return;
        }
        let offset = (y as usize * self.width + x as usize) * 4;
        let below = Color::rgba8(
            self.pixel_data[offset],
            self.pixel_data[offset + 1],
            self.pixel_data[offset + 2],
            self.pixel_data[offset + 3],
        );
        let (r, g, b, a) = color.over(below).as_rgba8();
        self.pixel_data[offset] = r;
        self.pixel_data[offset + 1] = g;
        self.pixel_data[offset + 2] = b;
        self.pixel_data[offset + 3] = a;
    }

    /// Draws a line between two device points using Bresenham's algorithm.
    /// `dash` is the device length of each on and off run, `None` for solid
    fn draw_line(&mut self, from: Point, to: Point, color: Color, dash: Option<usize>) {
        let (mut x0, mut y0, x1, y1) = (
            from.x.round() as isize,
            from.y.round() as isize,
            to.x.round() as isize,
            to.y.round() as isize,
        );
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy; // error value e_xy
        let mut travelled = 0usize;

        loop {
            if dash.map_or(true, |dash| (travelled / dash) % 2 == 0) {
                self.put_pixel(x0, y0, color);
            }
            travelled += 1;

            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Outlines a circle in device space using the midpoint algorithm
    fn draw_circle(&mut self, center: Point, radius: f64, color: Color) {
        let (cx, cy) = (center.x.round() as isize, center.y.round() as isize);
        let r = radius.round() as isize;
        let (mut x, mut y) = (r, 0isize);
        let mut err = 1 - r;

        while x >= y {
            let points = [
                (x, y),
                (y, x),
                (-y, x),
                (-x, y),
                (-x, -y),
                (-y, -x),
                (y, -x),
                (x, -y),
            ];
            // octants meet on the axes and diagonals; plot those pixels once
            for (i, &(ox, oy)) in points.iter().enumerate() {
                if !points[..i].contains(&(ox, oy)) {
                    self.put_pixel(cx + ox, cy + oy, color);
                }
            }

            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    /// Fills a disc in device space
    fn fill_disc(&mut self, center: Point, radius: f64, color: Color) {
        let min_x = (center.x - radius).floor() as isize;
        let max_x = (center.x + radius).ceil() as isize;
        let min_y = (center.y - radius).floor() as isize;
        let max_y = (center.y + radius).ceil() as isize;
        let r2 = radius * radius;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 - center.x;
                let py = y as f64 - center.y;
                if px * px + py * py <= r2 {
                    self.put_pixel(x, y, color);
                }
            }
        }
    }
}

impl Surface for Canvas {
    type Snapshot = CanvasSnapshot;

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn clear(&mut self, color: Color) {
        let (r, g, b, a) = color.as_rgba8();
        for pixel in self.pixel_data.chunks_exact_mut(4) {
            pixel.copy_from_slice(&[r, g, b, a]);
        }
        self.labels.clear();
    }

    fn stroke_arc(&mut self, center: Point, radius: f64, color: Color) {
        let center = self.transform.apply(center);
        let radius = self.transform.length(radius);
        self.draw_circle(center, radius, color);
    }

    fn fill_blob(&mut self, center: Point, radius: f64, fill: Color, stroke: Color) {
        let center = self.transform.apply(center);
        let radius = self.transform.length(radius);
        self.fill_disc(center, radius, fill);
        self.draw_circle(center, radius, stroke);
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, dashed: bool) {
        let from = self.transform.apply(from);
        let to = self.transform.apply(to);
        let dash = dashed.then(|| self.transform.length(DASH).round() as usize);
        self.draw_line(from, to, color, dash);
    }

    fn stroke_path(&mut self, points: &[Point], color: Color) {
        for pair in points.windows(2) {
            let from = self.transform.apply(pair[0]);
            let to = self.transform.apply(pair[1]);
            self.draw_line(from, to, color, None);
        }
    }

    fn fill_text(&mut self, at: Point, text: &str, color: Color) {
        let at = self.transform.apply(at);
        self.labels.push(Label {
            x: at.x,
            y: at.y,
            text: text.to_string(),
            color,
        });
    }

    fn capture(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            width: self.width,
            height: self.height,
            pixel_data: self.pixel_data.clone(),
            labels: self.labels.clone(),
        }
    }

    fn restore(&mut self, snapshot: &CanvasSnapshot) {
        if snapshot.width != self.width || snapshot.height != self.height {
            log::warn!(
                "ignoring {}x{} snapshot on {}x{} canvas",
                snapshot.width,
                snapshot.height,
                self.width,
                self.height
            );
            return;
        }
        self.pixel_data.copy_from_slice(&snapshot.pixel_data);
        self.labels.clone_from(&snapshot.labels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb8(255, 0, 0);
    const BLACK: Color = Color::rgb8(0, 0, 0);

    fn lit(canvas: &Canvas, color: Color) -> usize {
        let mut count = 0;
        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                if canvas.pixel(x, y) == Some(color) {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn solid_line_covers_every_pixel() {
        let mut canvas = Canvas::new(20, 20);
        canvas.clear(BLACK);
        canvas.stroke_line(Point::new(0.0, 5.0), Point::new(15.0, 5.0), RED, false);
        assert_eq!(lit(&canvas, RED), 16);
        assert_eq!(canvas.pixel(15, 5), Some(RED));
    }

    #[test]
    fn dashed_line_skips_every_other_run() {
        let mut canvas = Canvas::new(20, 20);
        canvas.clear(BLACK);
        canvas.stroke_line(Point::new(0.0, 5.0), Point::new(15.0, 5.0), RED, true);
        assert_eq!(lit(&canvas, RED), 8);
        assert_eq!(canvas.pixel(3, 5), Some(RED));
        assert_eq!(canvas.pixel(4, 5), Some(BLACK));
        assert_eq!(canvas.pixel(8, 5), Some(RED));
    }

    #[test]
    fn dashes_grow_with_scale() {
        let mut canvas = Canvas::new(40, 40);
        canvas.clear(BLACK);
        canvas.set_transform(Transform::new(2.0, 0.0, 0.0));
        canvas.stroke_line(Point::new(0.0, 5.0), Point::new(15.0, 5.0), RED, true);
        // runs of 8 device pixels along a 31 pixel line
        assert_eq!(lit(&canvas, RED), 16);
        assert_eq!(canvas.pixel(7, 10), Some(RED));
        assert_eq!(canvas.pixel(8, 10), Some(BLACK));
        assert_eq!(canvas.pixel(16, 10), Some(RED));
        assert_eq!(canvas.pixel(24, 10), Some(BLACK));
    }

    #[test]
    fn dashes_never_shrink_below_a_pixel() {
        let mut canvas = Canvas::new(20, 20);
        canvas.clear(BLACK);
        canvas.set_transform(Transform::new(0.1, 0.0, 0.0));
        canvas.stroke_line(Point::new(0.0, 0.0), Point::new(100.0, 0.0), RED, true);
        // 11 pixels alternating one on, one off
        assert_eq!(lit(&canvas, RED), 6);
        assert_eq!(canvas.pixel(1, 0), Some(BLACK));
    }

    #[test]
    fn drawing_outside_is_clipped() {
        let mut canvas = Canvas::new(10, 10);
        canvas.clear(BLACK);
        canvas.stroke_line(Point::new(-50.0, -50.0), Point::new(50.0, 50.0), RED, false);
        assert_eq!(lit(&canvas, RED), 10);
    }

    #[test]
    fn transform_scales_then_translates() {
        let mut canvas = Canvas::new(40, 40);
        canvas.clear(BLACK);
        canvas.set_transform(Transform::new(2.0, 5.0, 5.0));
        canvas.fill_text(Point::new(3.0, 4.0), "hi", RED);
        let label = &canvas.labels()[0];
        assert_eq!((label.x, label.y), (11.0, 13.0));
    }

    #[test]
    fn circle_outline_is_symmetric() {
        let mut canvas = Canvas::new(21, 21);
        canvas.clear(BLACK);
        canvas.stroke_arc(Point::new(10.0, 10.0), 8.0, RED);
        for (x, y) in [(18, 10), (2, 10), (10, 18), (10, 2)] {
            assert_eq!(canvas.pixel(x, y), Some(RED));
        }
        assert_eq!(canvas.pixel(10, 10), Some(BLACK));
    }

    #[test]
    fn blob_is_filled_and_outlined() {
        let mut canvas = Canvas::new(21, 21);
        canvas.clear(BLACK);
        let white = Color::rgb8(255, 255, 255);
        canvas.fill_blob(Point::new(10.0, 10.0), 4.0, white, RED);
        assert_eq!(canvas.pixel(10, 10), Some(white));
        assert_eq!(canvas.pixel(14, 10), Some(RED));
    }

    #[test]
    fn restore_erases_later_drawing() {
        let mut canvas = Canvas::new(10, 10);
        canvas.clear(BLACK);
        let snapshot = canvas.capture();
        canvas.stroke_line(Point::new(0.0, 0.0), Point::new(9.0, 9.0), RED, false);
        canvas.fill_text(Point::new(1.0, 1.0), "x1", RED);
        canvas.restore(&snapshot);
        assert_eq!(lit(&canvas, RED), 0);
        assert!(canvas.labels().is_empty());
    }

    #[test]
    fn restore_ignores_mismatched_snapshot() {
        let small = Canvas::new(4, 4).capture();
        let mut canvas = Canvas::new(10, 10);
        canvas.clear(RED);
        canvas.restore(&small);
        assert_eq!(lit(&canvas, RED), 100);
    }

    #[test]
    fn half_alpha_blends_evenly() {
        let blended = Color::rgba8(255, 0, 0, 128).over(BLACK);
        let (r, g, b, a) = blended.as_rgba8();
        assert_eq!((r, g, b, a), (128, 0, 0, 255));
    }
}
