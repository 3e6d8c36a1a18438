use egui::{Color32, Painter, Pos2, Rect, pos2};

/// Top-left corners of the decorative dots covering a `width` x `height` area.
///
/// Rows and columns start at zero and include the last multiple of
/// `spacing` that fits, so a 40x20 area with spacing 20 has 3x2 dots.
pub fn dot_positions(width: f32, height: f32, spacing: f32) -> Vec<Pos2> {
    if !(spacing > 0.0 && width >= 0.0 && height >= 0.0) {
        return Vec::new();
    }
    let rows = (height / spacing).floor() as usize;
    let columns = (width / spacing).floor() as usize;

    (0..=rows)
        .flat_map(|row| (0..=columns).map(move |column| pos2(column as f32 * spacing, row as f32 * spacing)))
        .collect()
}

/// Paint a faint dot grid over `rect`. Screen-only; exports don't include it.
pub fn paint_dotted_grid(painter: &Painter, rect: Rect, spacing: f32, dot_size: f32) {
    let color = Color32::from_gray(128).gamma_multiply(0.2);
    let radius = dot_size / 2.0;
    for corner in dot_positions(rect.width(), rect.height(), spacing) {
        let center = rect.min + corner.to_vec2() + egui::vec2(radius, radius);
        painter.circle_filled(center, radius, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_include_both_edges() {
        let dots = dot_positions(40.0, 20.0, 20.0);
        assert_eq!(dots.len(), 3 * 2);
        assert_eq!(dots.first(), Some(&pos2(0.0, 0.0)));
        assert_eq!(dots.last(), Some(&pos2(40.0, 20.0)));
    }

    #[test]
    fn partial_cells_are_floored() {
        assert_eq!(dot_positions(59.0, 10.0, 20.0).len(), 3);
    }

    #[test]
    fn bad_spacing_draws_nothing() {
        assert!(dot_positions(100.0, 100.0, 0.0).is_empty());
        assert!(dot_positions(100.0, 100.0, f32::NAN).is_empty());
    }
}
