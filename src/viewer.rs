//! Paged 8x8 rendering of the stored heat map.

use std::fmt::Write as _;

use crate::attack_graph::NUM_SQUARES;
use crate::heat_map::{HeatMap, SERIES};

pub type Grid = [[f64; 8]; 8];

/// Lays the 64 means of a series out as rows of eight by square index, then
/// mirrors both axes. Missing means show as zero.
pub fn series_grid(means: &[Option<f64>; NUM_SQUARES]) -> Grid {
    let mut grid = [[0.0; 8]; 8];
    for (square, mean) in means.iter().enumerate() {
        let (row, col) = (square / 8, square % 8);
        grid[7 - row][7 - col] = mean.unwrap_or(0.0);
    }
    grid
}

/// Rank shown on each grid row, top to bottom
pub const RANK_LABELS: [char; 8] = ['8', '7', '6', '5', '4', '3', '2', '1'];

/// File shown in each grid column once both axes are mirrored
pub const FILE_LABELS: [char; 8] = ['h', 'g', 'f', 'e', 'd', 'c', 'b', 'a'];

/// One page per series, navigated forwards and backwards with wrap-around
pub struct HeatMapViewer {
    pages: Vec<(String, Grid)>,
    current: usize,
}

impl HeatMapViewer {
    pub fn new(heat_map: &HeatMap) -> Self {
        let pages = SERIES
            .iter()
            .enumerate()
            .map(|(index, series)| (series.title(), series_grid(heat_map.series(index))))
            .collect();
        Self { pages, current: 0 }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn title(&self) -> &str {
        &self.pages[self.current].0
    }

    pub fn grid(&self) -> &Grid {
        &self.pages[self.current].1
    }

    pub fn next(&mut self) {
        self.current = (self.current + 1) % self.pages.len();
    }

    pub fn previous(&mut self) {
        self.current = (self.current + self.pages.len() - 1) % self.pages.len();
    }

    /// Current page as text, values rounded to whole numbers
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} ({}/{})", self.title(), self.current + 1, self.page_count());
        for (row, values) in self.grid().iter().enumerate() {
            let _ = write!(out, "{} ", RANK_LABELS[row]);
            for value in values {
                let _ = write!(out, "{:>6.0}", value);
            }
            out.push('\n');
        }
        out.push_str("  ");
        for file in FILE_LABELS {
            let _ = write!(out, "{:>6}", file);
        }
        out.push('\n');
        out
    }
}

#[cfg(feature = "gui")]
pub mod gui {
    //! Windowed front end: one shaded grid with Back/Next buttons.

    use super::{HeatMapViewer, FILE_LABELS, RANK_LABELS};
    use eframe::egui;

    /// Black for the lowest mean, white for the highest, mid grey at zero
    fn shade(value: f64, limit: f64) -> egui::Color32 {
        let scaled = if limit > 0.0 { (value / limit).clamp(-1.0, 1.0) } else { 0.0 };
        let level = (127.5 + scaled * 127.5).round() as u8;
        egui::Color32::from_gray(level)
    }

    pub fn run(mut viewer: HeatMapViewer) -> anyhow::Result<()> {
        let options = eframe::NativeOptions::default();
        eframe::run_simple_native("Heat map", options, move |ctx, _frame| {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading(viewer.title());
                let grid = *viewer.grid();
                let limit = grid.iter().flatten().fold(0.0_f64, |acc, v| acc.max(v.abs()));

                egui::Grid::new("heat_map").spacing([2.0, 2.0]).show(ui, |ui| {
                    for (row, values) in grid.iter().enumerate() {
                        ui.label(RANK_LABELS[row].to_string());
                        for &value in values {
                            egui::Frame::none().fill(shade(value, limit)).show(ui, |ui| {
                                ui.set_min_size(egui::vec2(44.0, 44.0));
                                ui.colored_label(
                                    egui::Color32::from_rgb(0x8c, 0x01, 0x12),
                                    format!("{:.0}", value),
                                );
                            });
                        }
                        ui.end_row();
                    }
                    ui.label("");
                    for file in FILE_LABELS {
                        ui.label(file.to_string());
                    }
                    ui.end_row();
                });

                ui.horizontal(|ui| {
                    if ui.button("Back").clicked() {
                        viewer.previous();
                    }
                    if ui.button("Next").clicked() {
                        viewer.next();
                    }
                });
            });
        })
        .map_err(|e| anyhow::anyhow!("heat map window failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_is_mirrored_on_both_axes() {
        let mut means = [None; NUM_SQUARES];
        means[0] = Some(1.0); // a1
        means[7] = Some(2.0); // h1
        means[63] = Some(3.0); // h8
        let grid = series_grid(&means);

        assert_eq!(grid[7][7], 1.0);
        assert_eq!(grid[7][0], 2.0);
        assert_eq!(grid[0][0], 3.0);
        assert_eq!(grid[3][3], 0.0);
    }

    #[test]
    fn test_paging_wraps_around() {
        let mut viewer = HeatMapViewer::new(&HeatMap::empty());
        assert_eq!(viewer.page_count(), 12);
        assert_eq!(viewer.title(), "White pawn");

        viewer.previous();
        assert_eq!(viewer.current_index(), 11);
        assert_eq!(viewer.title(), "Black king");

        viewer.next();
        viewer.next();
        assert_eq!(viewer.current_index(), 1);
    }

    #[test]
    fn test_render_shows_labels_and_values() {
        let mut heat_map = HeatMap::empty();
        heat_map.set(0, 12, Some(42.4));
        let viewer = HeatMapViewer::new(&heat_map);
        let text = viewer.render();

        assert!(text.starts_with("White pawn (1/12)"));
        assert!(text.contains("42"));
        assert_eq!(text.lines().count(), 10);
    }
}
