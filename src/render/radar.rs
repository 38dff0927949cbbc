//! Lifecycle radar chart
//!
//! Seven-axis (heptagon) chart of stage impacts. Geometry is pure so tests
//! can check it without a surface; `draw_lifecycle_radar` only issues the
//! drawing commands.
//!
//! Geometry:
//! - radius = 0.34 × min(width, height), centred in the box
//! - axis i at -90° + i × 360°/7 (stage 0 points straight up)
//! - score s plotted at radius × clamp(s, 1, 5) / 5
//! - labels at radius × 6.15/5, aligned by the sign of cos(angle)

use crate::lifecycle::types::Stage;
use crate::render::palette;
use crate::render::surface::*;

pub const RADIUS_FRACTION: f64 = 0.34;
pub const LABEL_RADIUS_FACTOR: f64 = 6.15 / 5.0;
pub const LABEL_ALIGN_THRESHOLD: f64 = 0.35;
pub const LEVELS: u8 = 5;

const AXES: usize = 7;
const LABEL_SIZE: f64 = 6.5;
const LEVEL_SIZE: f64 = 5.0;
const POINT_RADIUS: f64 = 1.8;

/// Angle of axis `index` in radians.
pub fn axis_angle(index: usize) -> f64 {
    (-90.0 + index as f64 * 360.0 / AXES as f64).to_radians()
}

/// Position of `score` (clamped to 1-5) on axis `index`.
pub fn radar_point(index: usize, score: f64, center: Point, radius: f64) -> Point {
    let clamped = score.clamp(1.0, LEVELS as f64);
    let r = radius * clamped / LEVELS as f64;
    let angle = axis_angle(index);
    Point::new(center.x + r * angle.cos(), center.y + r * angle.sin())
}

fn ring_point(index: usize, fraction: f64, center: Point, radius: f64) -> Point {
    let angle = axis_angle(index);
    Point::new(
        center.x + radius * fraction * angle.cos(),
        center.y + radius * fraction * angle.sin(),
    )
}

fn label_align(index: usize) -> Align {
    let cos = axis_angle(index).cos();
    if cos > LABEL_ALIGN_THRESHOLD {
        Align::Left
    } else if cos < -LABEL_ALIGN_THRESHOLD {
        Align::Right
    } else {
        Align::Center
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarGeometry {
    pub center: Point,
    pub radius: f64,
    pub rings: Vec<[Point; AXES]>, // level 1..=5
    pub spokes: [Point; AXES],
    pub data: [Point; AXES],
    pub labels: [(Point, Align); AXES],
    pub level_marks: Vec<(u8, Point)>, // along stage 0's axis only
}

pub fn radar_geometry(bbox: Rect, scores: &[u8; AXES]) -> RadarGeometry {
    let center = bbox.center();
    let radius = RADIUS_FRACTION * bbox.width.min(bbox.height);

    let rings = (1..=LEVELS)
        .map(|level| {
            let fraction = level as f64 / LEVELS as f64;
            std::array::from_fn(|i| ring_point(i, fraction, center, radius))
        })
        .collect();

    RadarGeometry {
        center,
        radius,
        rings,
        spokes: std::array::from_fn(|i| ring_point(i, 1.0, center, radius)),
        data: std::array::from_fn(|i| radar_point(i, scores[i] as f64, center, radius)),
        labels: std::array::from_fn(|i| {
            (ring_point(i, LABEL_RADIUS_FACTOR, center, radius), label_align(i))
        }),
        level_marks: (1..=LEVELS)
            .map(|level| (level, radar_point(0, level as f64, center, radius)))
            .collect(),
    }
}

/// Draw the full chart into `bbox`.
pub fn draw_lifecycle_radar(surface: &mut dyn DrawSurface, bbox: Rect, scores: &[u8; AXES]) {
    let geometry = radar_geometry(bbox, scores);
    let grid = ShapeStyle::stroke(palette::GRID, 0.4);

    for ring in &geometry.rings {
        surface.draw_polygon(ring, &grid);
    }
    for spoke in &geometry.spokes {
        surface.draw_line(geometry.center, *spoke, palette::GRID, 0.4);
    }

    surface.draw_polygon(
        &geometry.data,
        &ShapeStyle::fill_and_stroke(palette::RADAR_FILL, palette::RADAR_STROKE, 1.0),
    );
    for point in &geometry.data {
        surface.draw_circle(*point, POINT_RADIUS, &ShapeStyle::fill(palette::RADAR_STROKE));
    }

    for (stage, (at, align)) in Stage::ALL.iter().zip(geometry.labels.iter()) {
        let style = TextStyle::new(LABEL_SIZE, FontWeight::Regular, palette::TEXT_MUTED).aligned(*align);
        // baseline sits a third of the cap height below the anchor
        let baseline = Point::new(at.x, at.y + LABEL_SIZE / 3.0);
        surface.draw_text(stage.short_label(), baseline, &style);
    }

    let level_style = TextStyle::new(LEVEL_SIZE, FontWeight::Regular, palette::TEXT_FAINT);
    for (level, at) in &geometry.level_marks {
        surface.draw_text(&level.to_string(), Point::new(at.x + 2.0, at.y + 1.5), &level_style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BOX: Rect = Rect::new(0.0, 0.0, 200.0, 100.0);

    #[test]
    fn test_radius_uses_short_side() {
        let g = radar_geometry(BOX, &[3; 7]);
        assert_relative_eq!(g.radius, 34.0);
        assert_eq!(g.center, Point::new(100.0, 50.0));
    }

    #[test]
    fn test_first_axis_points_up() {
        let p = radar_point(0, 5.0, Point::new(0.0, 0.0), 10.0);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, -10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_scores_clamped() {
        let low = radar_geometry(BOX, &[0; 7]);
        let one = radar_geometry(BOX, &[1; 7]);
        let high = radar_geometry(BOX, &[10; 7]);
        let five = radar_geometry(BOX, &[5; 7]);
        assert_eq!(low.data, one.data);
        assert_eq!(high.data, five.data);
    }

    #[test]
    fn test_label_alignment() {
        let g = radar_geometry(BOX, &[3; 7]);
        assert_eq!(g.labels[0].1, Align::Center);
        assert_eq!(g.labels[1].1, Align::Left);
        assert_eq!(g.labels[5].1, Align::Right);
    }

    #[test]
    fn test_level_marks_on_first_axis_only() {
        let g = radar_geometry(BOX, &[3; 7]);
        assert_eq!(g.level_marks.len(), 5);
        for (_, p) in &g.level_marks {
            assert_relative_eq!(p.x, g.center.x, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_draw_clamps_out_of_range_scores() {
        let mut zero = RecordingSurface::new();
        draw_lifecycle_radar(&mut zero, BOX, &[0, 0, 0, 0, 0, 0, 10]);
        let mut clamped = RecordingSurface::new();
        draw_lifecycle_radar(&mut clamped, BOX, &[1, 1, 1, 1, 1, 1, 5]);
        assert_eq!(zero.commands, clamped.commands);

        // 5 rings + data polygon
        assert_eq!(zero.polygons().len(), 6);
        assert!(zero.texts().contains(&"Mfg"));
    }
}
