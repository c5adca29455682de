use image::{DynamicImage, GenericImageView, Rgba};
use serde::{Deserialize, Serialize};
use taplist_core::GridLineSet;

/// When a pixel counts as part of a grid line.
///
/// Source images differ: some render lines pure black, others as a dark
/// grey that JPEG compression smears. Both policies compare 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DarknessPolicy {
    ExactBlack,
    /// R + G + B strictly below the bound.
    ChannelSumBelow(u16),
}

impl DarknessPolicy {
    pub fn is_dark(self, pixel: Rgba<u8>) -> bool {
        let [r, g, b, _] = pixel.0;
        match self {
            DarknessPolicy::ExactBlack => r == 0 && g == 0 && b == 0,
            DarknessPolicy::ChannelSumBelow(bound) => {
                u16::from(r) + u16::from(g) + u16::from(b) < bound
            }
        }
    }
}

impl std::str::FromStr for DarknessPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("black") {
            return Ok(DarknessPolicy::ExactBlack);
        }
        s.strip_prefix("sum<")
            .and_then(|n| n.trim().parse().ok())
            .map(DarknessPolicy::ChannelSumBelow)
            .ok_or_else(|| format!("Unknown darkness policy: '{s}' (expected `black` or `sum<N`)"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Column of the vertical reference scan.
    pub x_offset: u32,
    /// Row of the horizontal reference scan.
    pub y_offset: u32,
    /// Applied along the horizontal scan, i.e. to find vertical lines.
    pub column_policy: DarknessPolicy,
    /// Applied along the vertical scan, i.e. to find horizontal lines.
    pub row_policy: DarknessPolicy,
    /// Report a thick line once (its last pixel) instead of once per pixel.
    pub merge_runs: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            x_offset: 3,
            y_offset: 2,
            column_policy: DarknessPolicy::ChannelSumBelow(12),
            row_policy: DarknessPolicy::ChannelSumBelow(57),
            merge_runs: false,
        }
    }
}

/// Locate grid lines by scanning one reference row and one reference column.
/// Offsets of 0 are bumped to 1 so the scan never runs along the border.
pub fn detect_grid(image: &DynamicImage, config: &DetectorConfig) -> GridLineSet {
    let (width, height) = image.dimensions();
    let x_offset = config.x_offset.max(1);
    let y_offset = config.y_offset.max(1);

    let mut xs = Vec::new();
    if y_offset < height {
        xs = (x_offset..width)
            .filter(|&x| config.column_policy.is_dark(image.get_pixel(x, y_offset)))
            .collect();
    }

    let mut ys = Vec::new();
    if x_offset < width {
        ys = (y_offset..height)
            .filter(|&y| config.row_policy.is_dark(image.get_pixel(x_offset, y)))
            .collect();
    }

    if config.merge_runs {
        xs = last_of_runs(&xs);
        ys = last_of_runs(&ys);
    }

    let lines = GridLineSet::from_scan(xs, ys);
    tracing::debug!(
        columns = lines.xs().len(),
        rows = lines.ys().len(),
        "grid lines detected"
    );
    lines
}

fn last_of_runs(positions: &[u32]) -> Vec<u32> {
    positions
        .iter()
        .enumerate()
        .filter(|&(i, &p)| positions.get(i + 1) != Some(&(p + 1)))
        .map(|(_, &p)| p)
        .collect()
}
