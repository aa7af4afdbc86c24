//! Dashboard Grid Layout
//! Fixed 4x3 grid and the panel-to-cell table.
//!
//! ```text
//!          col 0           col 1          col 2
//! row 0  [ KPI 1 ]       [ KPI 2 ]      [ KPI 3 ]
//! row 1  [ KPI 4 ]       [ Time to Hire by Department ]
//! row 2  [ Source pie ]  [ Attrition ]  [ Acceptance ]
//! row 3  (blank)
//! ```

pub const GRID_ROWS: u32 = 4;
pub const GRID_COLS: u32 = 3;

/// Pixel rectangle on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Every panel on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// KPI tile by summary index (0-3).
    Kpi(usize),
    DepartmentTimeToHire,
    SourceOfHire,
    QuarterlyAttrition,
    DepartmentAcceptance,
}

impl Panel {
    /// Grid placement as (row, first column, last column).
    pub fn placement(&self) -> (u32, u32, u32) {
        match self {
            Panel::Kpi(0) => (0, 0, 0),
            Panel::Kpi(1) => (0, 1, 1),
            Panel::Kpi(2) => (0, 2, 2),
            Panel::Kpi(_) => (1, 0, 0),
            Panel::DepartmentTimeToHire => (1, 1, 2),
            Panel::SourceOfHire => (2, 0, 0),
            Panel::QuarterlyAttrition => (2, 1, 1),
            Panel::DepartmentAcceptance => (2, 2, 2),
        }
    }
}

/// Splits the canvas into equal cells separated by gutters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    width: u32,
    height: u32,
    margin: u32,
    gap: u32,
}

impl GridLayout {
    /// Margin and gutter scale with the canvas width.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_spacing(width, height, width / 60, width / 90)
    }

    pub fn with_spacing(width: u32, height: u32, margin: u32, gap: u32) -> Self {
        Self {
            width,
            height,
            margin,
            gap,
        }
    }

    pub fn cell_width(&self) -> u32 {
        self.width
            .saturating_sub(2 * self.margin + (GRID_COLS - 1) * self.gap)
            / GRID_COLS
    }

    pub fn cell_height(&self) -> u32 {
        self.height
            .saturating_sub(2 * self.margin + (GRID_ROWS - 1) * self.gap)
            / GRID_ROWS
    }

    pub fn cell(&self, row: u32, col: u32) -> CellRect {
        self.span(row, col, col)
    }

    /// Cells `col_start..=col_end` of one row merged into one rectangle.
    pub fn span(&self, row: u32, col_start: u32, col_end: u32) -> CellRect {
        let (cw, ch) = (self.cell_width(), self.cell_height());
        let columns = col_end.saturating_sub(col_start) + 1;

        CellRect {
            x: self.margin + col_start * (cw + self.gap),
            y: self.margin + row * (ch + self.gap),
            width: columns * cw + (columns - 1) * self.gap,
            height: ch,
        }
    }

    pub fn panel_rect(&self, panel: Panel) -> CellRect {
        let (row, first, last) = panel.placement();
        self.span(row, first, last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_PANELS: [Panel; 8] = [
        Panel::Kpi(0),
        Panel::Kpi(1),
        Panel::Kpi(2),
        Panel::Kpi(3),
        Panel::DepartmentTimeToHire,
        Panel::SourceOfHire,
        Panel::QuarterlyAttrition,
        Panel::DepartmentAcceptance,
    ];

    fn right(rect: &CellRect) -> u32 {
        rect.x + rect.width
    }

    fn bottom(rect: &CellRect) -> u32 {
        rect.y + rect.height
    }

    #[test]
    fn test_spanned_cell_covers_two_columns() {
        let layout = GridLayout::new(5400, 3000);
        let spanned = layout.panel_rect(Panel::DepartmentTimeToHire);

        assert_eq!(spanned.x, layout.cell(1, 1).x);
        assert_eq!(spanned.y, layout.cell(1, 1).y);
        assert_eq!(right(&spanned), right(&layout.cell(1, 2)));
        assert_eq!(spanned.height, layout.cell_height());
    }

    #[test]
    fn test_all_panels_fit_inside_canvas() {
        let layout = GridLayout::new(5400, 3000);
        for panel in ALL_PANELS {
            let rect = layout.panel_rect(panel);
            assert!(rect.width > 0 && rect.height > 0, "{panel:?}");
            assert!(right(&rect) <= 5400, "{panel:?}");
            assert!(bottom(&rect) <= 3000, "{panel:?}");
        }
    }

    #[test]
    fn test_panels_do_not_overlap() {
        let layout = GridLayout::new(5400, 3000);
        let rects: Vec<CellRect> = ALL_PANELS
            .iter()
            .map(|p| layout.panel_rect(*p))
            .collect();

        for (i, a) in rects.iter().enumerate() {
            for b in rects.iter().skip(i + 1) {
                let disjoint = right(a) <= b.x
                    || right(b) <= a.x
                    || bottom(a) <= b.y
                    || bottom(b) <= a.y;
                assert!(disjoint, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_fixed_placement_table() {
        assert_eq!(Panel::Kpi(0).placement(), (0, 0, 0));
        assert_eq!(Panel::Kpi(3).placement(), (1, 0, 0));
        assert_eq!(Panel::SourceOfHire.placement(), (2, 0, 0));
        assert_eq!(Panel::QuarterlyAttrition.placement(), (2, 1, 1));
        assert_eq!(Panel::DepartmentAcceptance.placement(), (2, 2, 2));
    }

    #[test]
    fn test_last_row_is_left_blank() {
        assert!(ALL_PANELS
            .iter()
            .all(|p| p.placement().0 < GRID_ROWS - 1));
    }
}
