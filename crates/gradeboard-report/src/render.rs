use std::fs;
use std::path::{Path, PathBuf};

use gradeboard_core::ThresholdSet;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use thiserror::Error;

use crate::config::{Rgb, TableVisuals};
use crate::display::DisplayTable;

/// Images narrower than this are padded up so short tables stay readable.
const MIN_IMAGE_WIDTH: u32 = 1200;
const TABLE_MARGIN: u32 = 10;
const CELL_TEXT_PAD: i32 = 8;
const FORBIDDEN_FILENAME_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("table for group '{group}' has no columns to draw")]
    EmptyTable { group: String },
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render table: {0}")]
    Draw(String),
}

/// Replace filesystem-hostile characters in a group label so it can be
/// embedded in an image filename.
pub fn sanitize_group_label(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if FORBIDDEN_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

pub fn table_image_path(images_dir: &Path, group: &str) -> PathBuf {
    images_dir.join(format!("group_{}_results.png", sanitize_group_label(group)))
}

/// Relative column widths as fractions summing to one. Unlisted columns get
/// the default ratio; if every ratio is zero the columns share the width
/// evenly.
pub fn normalized_column_widths(columns: &[String], visuals: &TableVisuals) -> Vec<f64> {
    let ratios: Vec<f64> = columns
        .iter()
        .map(|column| {
            visuals
                .column_width_ratios
                .get(column)
                .copied()
                .unwrap_or(visuals.default_width_ratio)
        })
        .collect();

    let total: f64 = ratios.iter().sum();
    if total == 0.0 {
        return vec![1.0 / columns.len() as f64; columns.len()];
    }
    ratios.into_iter().map(|ratio| ratio / total).collect()
}

fn image_size(rows: usize, columns: usize, visuals: &TableVisuals) -> (u32, u32) {
    let width = (columns as u32 * visuals.base_column_width).max(MIN_IMAGE_WIDTH);
    let height = (rows as u32 + 1) * visuals.cell_height;
    (width + 2 * TABLE_MARGIN, height + 2 * TABLE_MARGIN)
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

/// A cell shows the failure color only when a raw score is present and
/// strictly below the column threshold. Formatted text plays no part, so a
/// 2.95 displayed as "3.0" against a 3.0 threshold still reads failed.
fn is_failed_score(raw_score: Option<f64>, min_score: Option<f64>) -> bool {
    matches!((raw_score, min_score), (Some(score), Some(min)) if score < min)
}

/// Draw one group's display table as a PNG and return its path. Module
/// score cells are filled with the failure color when the raw score is
/// present and strictly below the module threshold; a missing score leaves
/// the cell in the normal color, the text alone shows the gap. The name and
/// group columns read better ragged-right, so they are left-aligned.
pub fn render_group_table(
    table: &DisplayTable,
    thresholds: &ThresholdSet,
    visuals: &TableVisuals,
    left_aligned: &[String],
    group: &str,
    images_dir: &Path,
) -> Result<PathBuf, RenderError> {
    if table.columns.is_empty() {
        return Err(RenderError::EmptyTable {
            group: group.to_string(),
        });
    }

    fs::create_dir_all(images_dir).map_err(|source| RenderError::Io {
        context: "creating images directory",
        source,
    })?;

    let output_path = table_image_path(images_dir, group);
    let table = table.clone();
    let thresholds = thresholds.clone();
    let visuals = visuals.clone();
    let left_aligned = left_aligned.to_vec();
    let path_snapshot = output_path.clone();

    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|_| {}));

    let draw_attempt = std::panic::catch_unwind(move || {
        let rows = table.rows.len();
        let cols = table.columns.len();
        let (width, height) = image_size(rows, cols, &visuals);
        let inner_width = width - 2 * TABLE_MARGIN;

        let root = BitMapBackend::new(&path_snapshot, (width, height)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| RenderError::Draw(e.to_string()))?;

        // Column edges in pixels, accumulated so rounding never leaves a gap.
        let fractions = normalized_column_widths(&table.columns, &visuals);
        let mut edges = Vec::with_capacity(cols + 1);
        edges.push(0u32);
        let mut acc = 0.0;
        for fraction in &fractions {
            acc += fraction;
            edges.push(((acc * inner_width as f64).round() as u32).min(inner_width));
        }
        edges[cols] = inner_width;

        let header_bg = rgb(visuals.header_bg_color);
        let header_text = rgb(visuals.header_text_color);
        let passed_fill = rgb(visuals.passed_cell_color);
        let failed_fill = rgb(visuals.failed_cell_color);

        let center = Pos::new(HPos::Center, VPos::Center);
        let left = Pos::new(HPos::Left, VPos::Center);
        let header_style = FontDesc::new(
            FontFamily::SansSerif,
            visuals.font_size_header as f64,
            FontStyle::Bold,
        )
        .color(&header_text)
        .pos(center);
        let body_font = FontDesc::new(
            FontFamily::SansSerif,
            visuals.font_size_cell as f64,
            FontStyle::Normal,
        );
        let body_center = body_font.color(&BLACK).pos(center);
        let body_left = body_font.color(&BLACK).pos(left);

        let column_minimums: Vec<Option<f64>> = table
            .columns
            .iter()
            .map(|column| thresholds.min_score(column))
            .collect();

        for row_index in 0..=rows {
            let y0 = (TABLE_MARGIN + (row_index as u32) * visuals.cell_height) as i32;
            let y1 = y0 + visuals.cell_height as i32;

            for (col_index, column) in table.columns.iter().enumerate() {
                let x0 = (TABLE_MARGIN + edges[col_index]) as i32;
                let x1 = (TABLE_MARGIN + edges[col_index + 1]) as i32;

                let (fill, text, style) = if row_index == 0 {
                    (header_bg, column.clone(), &header_style)
                } else {
                    let cell = &table.rows[row_index - 1][col_index];
                    let fill = if is_failed_score(cell.raw_score, column_minimums[col_index]) {
                        failed_fill
                    } else {
                        passed_fill
                    };
                    let style = if left_aligned.contains(column) {
                        &body_left
                    } else {
                        &body_center
                    };
                    (fill, cell.text.clone(), style)
                };

                root.draw(&Rectangle::new([(x0, y0), (x1, y1)], fill.filled()))
                    .map_err(|e| RenderError::Draw(e.to_string()))?;
                root.draw(&Rectangle::new([(x0, y0), (x1, y1)], BLACK.stroke_width(1)))
                    .map_err(|e| RenderError::Draw(e.to_string()))?;

                let anchor = if row_index > 0 && left_aligned.contains(column) {
                    (x0 + CELL_TEXT_PAD, (y0 + y1) / 2)
                } else {
                    ((x0 + x1) / 2, (y0 + y1) / 2)
                };
                root.draw(&Text::new(text, anchor, style.clone()))
                    .map_err(|e| RenderError::Draw(e.to_string()))?;
            }
        }

        root.present()
            .map_err(|e| RenderError::Draw(e.to_string()))?;
        drop(root);

        Ok(path_snapshot)
    });

    std::panic::set_hook(prev_hook);

    match draw_attempt {
        Ok(result) => result,
        Err(_) => Err(RenderError::Draw(
            "plotters panicked while rendering (missing font support?)".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        image_size, is_failed_score, normalized_column_widths, sanitize_group_label,
        table_image_path,
    };
    use crate::config::TableVisuals;
    use std::path::Path;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn sanitizes_path_separators_and_reserved_chars() {
        assert_eq!(sanitize_group_label("IS-31/b"), "IS-31_b");
        assert_eq!(sanitize_group_label("night*?"), "night__");
        assert_eq!(sanitize_group_label("101"), "101");
    }

    #[test]
    fn image_filename_embeds_sanitized_group() {
        let path = table_image_path(Path::new("out/images"), "IS-31/b");
        assert_eq!(
            path,
            Path::new("out/images").join("group_IS-31_b_results.png")
        );
    }

    #[test]
    fn fail_color_decisions_use_raw_values() {
        assert!(is_failed_score(Some(2.95), Some(3.0)));
        assert!(!is_failed_score(Some(3.0), Some(3.0)));
        assert!(!is_failed_score(None, Some(3.0)));
        assert!(!is_failed_score(Some(2.95), None));
    }

    #[test]
    fn widths_follow_configured_ratios() {
        let mut visuals = TableVisuals::default();
        visuals
            .column_width_ratios
            .insert("Full Name".to_string(), 3.0);
        let widths = normalized_column_widths(&columns(&["Full Name", "Group"]), &visuals);
        assert!((widths[0] - 0.75).abs() < 1e-9);
        assert!((widths[1] - 0.25).abs() < 1e-9);
    }

    #[test]
    fn all_zero_ratios_fall_back_to_uniform() {
        let mut visuals = TableVisuals::default();
        visuals.default_width_ratio = 1.0;
        for name in ["A", "B", "C", "D"] {
            visuals.column_width_ratios.insert(name.to_string(), 0.0);
        }
        let widths = normalized_column_widths(&columns(&["A", "B", "C", "D"]), &visuals);
        assert_eq!(widths, vec![0.25; 4]);
    }

    #[test]
    fn narrow_tables_are_padded_to_the_minimum_width() {
        let visuals = TableVisuals::default();
        let (width, height) = image_size(3, 2, &visuals);
        assert_eq!(width, super::MIN_IMAGE_WIDTH + 2 * super::TABLE_MARGIN);
        assert_eq!(height, 4 * visuals.cell_height + 2 * super::TABLE_MARGIN);
    }

    #[test]
    fn wide_tables_grow_past_the_minimum() {
        let visuals = TableVisuals::default();
        let count = (super::MIN_IMAGE_WIDTH / visuals.base_column_width + 2) as usize;
        let (width, _) = image_size(1, count, &visuals);
        assert_eq!(
            width,
            count as u32 * visuals.base_column_width + 2 * super::TABLE_MARGIN
        );
    }
}
