//! Dashboard colors.

use plotters::style::RGBColor;

pub const TILE_BACKGROUND: RGBColor = RGBColor(240, 240, 240); // #f0f0f0
pub const GRID: RGBColor = RGBColor(220, 220, 220);
pub const AXIS: RGBColor = RGBColor(60, 60, 60);
pub const ATTRITION_LINE: RGBColor = RGBColor(255, 0, 0);

/// Categorical palette for pie wedges (matplotlib tab10).
pub const CATEGORY_PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),  // Blue
    RGBColor(255, 127, 14),  // Orange
    RGBColor(44, 160, 44),   // Green
    RGBColor(214, 39, 40),   // Red
    RGBColor(148, 103, 189), // Purple
    RGBColor(140, 86, 75),   // Brown
    RGBColor(227, 119, 194), // Pink
    RGBColor(127, 127, 127), // Grey
    RGBColor(188, 189, 34),  // Olive
    RGBColor(23, 190, 207),  // Cyan
];

/// Light and dark ends of the sequential bar palettes.
pub const BLUES: (RGBColor, RGBColor) = (RGBColor(198, 219, 239), RGBColor(8, 81, 156));
pub const GREENS: (RGBColor, RGBColor) = (RGBColor(199, 233, 192), RGBColor(0, 109, 44));

/// Get color for a pie wedge.
pub fn category_color(index: usize) -> RGBColor {
    CATEGORY_PALETTE[index % CATEGORY_PALETTE.len()]
}

/// `n` colors running from the light end to the dark end of a sequential palette.
pub fn sequential(ends: (RGBColor, RGBColor), n: usize) -> Vec<RGBColor> {
    let (light, dark) = ends;
    let lerp = |a: u8, b: u8, t: f64| (a as f64 + (b as f64 - a as f64) * t).round() as u8;

    (0..n)
        .map(|i| {
            let t = if n <= 1 {
                0.5
            } else {
                i as f64 / (n - 1) as f64
            };
            RGBColor(
                lerp(light.0, dark.0, t),
                lerp(light.1, dark.1, t),
                lerp(light.2, dark.2, t),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_endpoints() {
        let colors = sequential(BLUES, 4);
        assert_eq!(colors.len(), 4);
        assert_eq!(colors[0], BLUES.0);
        assert_eq!(colors[3], BLUES.1);
    }

    #[test]
    fn test_sequential_single_is_midpoint() {
        let colors = sequential(GREENS, 1);
        assert_eq!(colors, vec![RGBColor(100, 171, 118)]);
    }

    #[test]
    fn test_category_color_wraps() {
        assert_eq!(category_color(0), category_color(CATEGORY_PALETTE.len()));
    }
}
