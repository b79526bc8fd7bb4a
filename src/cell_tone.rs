use ratatui::style::Color;

/// Qualitative colouring shared by every table and heatmap cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Favorable,
    Neutral,
    Unfavorable,
    Empty,
}

impl Tone {
    pub fn hex(self) -> &'static str {
        match self {
            Tone::Favorable => "#4ADE80",
            Tone::Neutral => "#FACC15",
            Tone::Unfavorable => "#F87171",
            Tone::Empty => "#4B5563",
        }
    }

    pub fn color(self) -> Color {
        hex_color(self.hex())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// Ranks `value` against the distinct values of its column: the best two are
/// favorable, the worst two unfavorable, anything between neutral. With two
/// or fewer distinct values only the best one is favorable.
pub fn rank_tone(value: f64, values: &[f64], direction: Direction) -> Tone {
    let mut uniq: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    uniq.sort_by(|a, b| a.total_cmp(b));
    uniq.dedup();
    if uniq.is_empty() {
        return Tone::Neutral;
    }
    let n = uniq.len();

    if n <= 2 {
        let best = match direction {
            Direction::HigherIsBetter => value >= uniq[n - 1],
            Direction::LowerIsBetter => value <= uniq[0],
        };
        return if best { Tone::Favorable } else { Tone::Unfavorable };
    }

    match direction {
        Direction::HigherIsBetter => {
            if value >= uniq[n - 2] {
                Tone::Favorable
            } else if value <= uniq[1] {
                Tone::Unfavorable
            } else {
                Tone::Neutral
            }
        }
        Direction::LowerIsBetter => {
            if value <= uniq[1] {
                Tone::Favorable
            } else if value >= uniq[n - 2] {
                Tone::Unfavorable
            } else {
                Tone::Neutral
            }
        }
    }
}

/// `RIGHT ARM spin` → `Right arm spin`.
pub fn prettify_label(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// `#RRGGBB` to bytes; malformed input maps to mid gray.
pub fn hex_rgb(hex: &str) -> [u8; 3] {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 {
        return [128, 128, 128];
    }
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(128)
    };
    [channel(0..2), channel(2..4), channel(4..6)]
}

pub fn hex_color(hex: &str) -> Color {
    let [r, g, b] = hex_rgb(hex);
    Color::Rgb(r, g, b)
}
