use crate::cell_tone::Tone;
use crate::state::StrikeRateZonesData;

pub const LENGTHS: [&str; 6] = ["bouncer", "short", "back of length", "length", "full", "yorker"];
pub const LINES: [&str; 3] = ["off", "line", "leg"];

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneCell {
    pub line: &'static str,
    pub length: &'static str,
    pub strike_rate: i64,
    pub tone: Tone,
}

/// Length rows top to bottom, each with off/line/leg cells.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneGrid {
    pub rows: Vec<(String, Vec<ZoneCell>)>,
}

pub fn zone_grid(data: &StrikeRateZonesData) -> ZoneGrid {
    let mut ranked: Vec<i64> = data
        .zones
        .iter()
        .map(|z| round_sr(z.sr))
        .filter(|sr| *sr > 0)
        .collect();
    ranked.sort_by(|a, b| b.cmp(a));

    let rows = LENGTHS
        .iter()
        .map(|length| {
            let cells = LINES
                .iter()
                .map(|line| {
                    let strike_rate = zone_rate(data, line, length);
                    ZoneCell {
                        line,
                        length,
                        strike_rate,
                        tone: zone_tone(strike_rate, &ranked),
                    }
                })
                .collect();
            (capitalize(length), cells)
        })
        .collect();

    ZoneGrid { rows }
}

/// Rank is the first position of the rate in the descending list, so equal
/// rates share a rank.
pub fn zone_tone(strike_rate: i64, ranked_desc: &[i64]) -> Tone {
    if strike_rate <= 0 {
        return Tone::Empty;
    }
    match ranked_desc.iter().position(|r| *r == strike_rate) {
        Some(rank) if rank < 6 => Tone::Favorable,
        Some(rank) if rank < 12 => Tone::Neutral,
        Some(_) => Tone::Unfavorable,
        None => Tone::Empty,
    }
}

fn zone_rate(data: &StrikeRateZonesData, line: &str, length: &str) -> i64 {
    data.zones
        .iter()
        .find(|z| {
            z.line_bin.trim().eq_ignore_ascii_case(line)
                && z.length_bin.trim().eq_ignore_ascii_case(length)
        })
        .map(|z| round_sr(z.sr))
        .unwrap_or(0)
}

/// Half away from zero, matching how the rates are displayed elsewhere.
fn round_sr(sr: f64) -> i64 {
    if sr.is_finite() { sr.round() as i64 } else { 0 }
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
