//! Field diagrams: the dismissal pitch map and the boundary wagon wheel.
//! Both produce plain geometry in their own canvas coordinates (y down).

use crate::state::{DismissalData, WagonWheelData};

pub const PITCH_CANVAS: f64 = 400.0;
pub const WAGON_CANVAS: f64 = 500.0;
pub const WAGON_MIN_RADIUS: f64 = 40.0;
pub const WAGON_MAX_RADIUS: f64 = 200.0;
const WAGON_SPREAD_DEG: f64 = 20.0;
const DOT_MIN_RADIUS: f64 = 4.0;
const DOT_MAX_RADIUS: f64 = 16.0;

/// Where dismissals at an unrecognised position are drawn: beyond the rope
/// in the top-right corner, so they are never mistaken for a real position.
pub const UNMAPPED_POSITION: (f64, f64) = (370.0, 60.0);
pub const UNMAPPED_LABEL: &str = "Unmapped";

const FIELDING_POSITIONS: &[(&str, f64, f64)] = &[
    ("wicket-keeper", 200.0, 290.0),
    ("slip", 230.0, 310.0),
    ("first slip", 230.0, 310.0),
    ("second slip", 250.0, 320.0),
    ("third slip", 270.0, 330.0),
    ("gully", 280.0, 300.0),
    ("leg slip", 170.0, 310.0),
    ("leg gully", 120.0, 300.0),
    ("fly slip", 240.0, 280.0),
    ("point", 120.0, 200.0),
    ("cover point", 140.0, 180.0),
    ("cover", 160.0, 160.0),
    ("short cover", 180.0, 180.0),
    ("extra cover", 140.0, 140.0),
    ("deep cover", 100.0, 120.0),
    ("deep cover point", 80.0, 140.0),
    ("deep point", 60.0, 180.0),
    ("deep extra cover", 120.0, 80.0),
    ("backward point", 100.0, 220.0),
    ("deep backward point", 60.0, 240.0),
    ("forward point", 140.0, 160.0),
    ("third man", 320.0, 280.0),
    ("deep third man", 350.0, 320.0),
    ("fine third man", 300.0, 260.0),
    ("short third man", 280.0, 240.0),
    ("square third man", 320.0, 200.0),
    ("mid-off", 160.0, 120.0),
    ("short mid-off", 180.0, 140.0),
    ("silly mid-off", 190.0, 160.0),
    ("deep mid-off", 140.0, 60.0),
    ("long-off", 160.0, 40.0),
    ("straight long off", 200.0, 30.0),
    ("wide long off", 120.0, 50.0),
    ("mid-on", 240.0, 120.0),
    ("short mid-on", 220.0, 140.0),
    ("silly mid-on", 210.0, 160.0),
    ("deep mid-on", 260.0, 60.0),
    ("long-on", 240.0, 40.0),
    ("straight long on", 200.0, 30.0),
    ("wide long on", 280.0, 50.0),
    ("straight hit", 200.0, 50.0),
    ("square leg", 280.0, 200.0),
    ("short square leg", 260.0, 180.0),
    ("forward square leg", 260.0, 160.0),
    ("deep square leg", 320.0, 160.0),
    ("deep backward square leg", 340.0, 220.0),
    ("backward square leg", 300.0, 220.0),
    ("mid-wicket", 260.0, 160.0),
    ("short mid-wicket", 240.0, 180.0),
    ("deep mid-wicket", 300.0, 120.0),
    ("deep forward mid-wicket", 320.0, 140.0),
    ("fine leg", 160.0, 280.0),
    ("short fine leg", 180.0, 260.0),
    ("square fine leg", 200.0, 240.0),
    ("deep fine leg", 120.0, 320.0),
    ("deep backward fine leg", 100.0, 340.0),
    ("straight fine leg", 160.0, 300.0),
    ("silly point", 140.0, 180.0),
    ("non-striker's end", 200.0, 120.0),
    ("striker's end", 200.0, 280.0),
];

const ZONE_ANGLES: &[(&str, f64, &str)] = &[
    ("Straight (off-side) / long-off", 0.0, "Long Off"),
    ("Extra cover", 30.0, "Extra Cover"),
    ("Cover", 45.0, "Cover"),
    ("Point", 60.0, "Point"),
    ("Backward point", 75.0, "Bwd Point"),
    ("Third man", 90.0, "Third Man"),
    ("Short third man", 100.0, "Short 3rd"),
    ("Fine leg", 270.0, "Fine Leg"),
    ("Short fine leg", 260.0, "Short Fine"),
    ("Backward square leg", 240.0, "Bwd Sq Leg"),
    ("Square leg", 225.0, "Square Leg"),
    ("Midwicket", 210.0, "Mid-wicket"),
    ("Long-on", 180.0, "Long On"),
    ("Straight (leg-side)", 180.0, "Straight"),
];

pub fn fielding_position(name: &str) -> Option<(f64, f64)> {
    let key = name.trim().to_lowercase();
    FIELDING_POSITIONS
        .iter()
        .find(|(pos, _, _)| *pos == key)
        .map(|(_, x, y)| (*x, *y))
}

#[derive(Debug, Clone, PartialEq)]
pub struct PitchDot {
    pub label: String,
    pub count: u32,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: &'static str,
    pub mapped: bool,
}

pub fn intensity_color(count: u32, max: u32) -> &'static str {
    let intensity = ratio(count, max);
    if intensity >= 0.8 {
        "#ef4444"
    } else if intensity >= 0.6 {
        "#f97316"
    } else if intensity >= 0.4 {
        "#eab308"
    } else if intensity >= 0.2 {
        "#22c55e"
    } else {
        "#06b6d4"
    }
}

pub fn dot_radius(count: u32, max: u32) -> f64 {
    DOT_MIN_RADIUS + ratio(count, max) * (DOT_MAX_RADIUS - DOT_MIN_RADIUS)
}

pub fn pitch_dots(data: &DismissalData) -> Vec<PitchDot> {
    let max = data
        .dismissal_locations
        .iter()
        .map(|d| d.count)
        .max()
        .unwrap_or(0);
    data.dismissal_locations
        .iter()
        .map(|d| {
            let (pos, mapped) = match fielding_position(&d.position) {
                Some(pos) => (pos, true),
                None => (UNMAPPED_POSITION, false),
            };
            PitchDot {
                label: if mapped {
                    d.position.clone()
                } else {
                    format!("{UNMAPPED_LABEL}: {}", d.position)
                },
                count: d.count,
                x: pos.0,
                y: pos.1,
                radius: dot_radius(d.count, max),
                color: intensity_color(d.count, max),
                mapped,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryLine {
    pub zone: String,
    pub angle: f64,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WagonView {
    pub lines: Vec<BoundaryLine>,
    pub top_zones: Vec<(String, u32)>,
    pub total_boundaries: u32,
    pub zones_with_data: u32,
    pub most_productive: Option<(String, u32)>,
    pub least_productive: Option<(String, u32)>,
}

/// 0° is straight down the ground; unknown zones fall back to it.
pub fn zone_angle(zone: &str) -> f64 {
    ZONE_ANGLES
        .iter()
        .find(|(name, _, _)| *name == zone)
        .map(|(_, angle, _)| *angle)
        .unwrap_or(0.0)
}

pub fn short_zone_name(zone: &str) -> String {
    ZONE_ANGLES
        .iter()
        .find(|(name, _, _)| *name == zone)
        .map(|(_, _, short)| short.to_string())
        .unwrap_or_else(|| zone.to_string())
}

pub fn boundary_color(boundaries: u32, max: u32) -> &'static str {
    let r = ratio(boundaries, max);
    if r > 0.7 {
        "#10B981"
    } else if r > 0.4 {
        "#F59E0B"
    } else {
        "#EF4444"
    }
}

pub fn wagon_view(data: &WagonWheelData) -> WagonView {
    let max = data.zones.iter().map(|z| z.n_boundaries).max().unwrap_or(0);
    let center = WAGON_CANVAS / 2.0;

    let mut lines = Vec::new();
    for zone in &data.zones {
        let base = zone_angle(&zone.field_zone);
        let color = boundary_color(zone.n_boundaries, max);
        let n = zone.n_boundaries as f64;
        for i in 0..zone.n_boundaries {
            let offset = (i as f64 - n / 2.0) * (WAGON_SPREAD_DEG / n.max(1.0));
            let angle = base + offset;
            let radian = (angle - 90.0).to_radians();
            lines.push(BoundaryLine {
                zone: zone.field_zone.clone(),
                angle,
                x1: center + WAGON_MIN_RADIUS * radian.cos(),
                y1: center + WAGON_MIN_RADIUS * radian.sin(),
                x2: center + WAGON_MAX_RADIUS * radian.cos(),
                y2: center + WAGON_MAX_RADIUS * radian.sin(),
                color,
            });
        }
    }

    let mut sorted: Vec<_> = data.zones.iter().collect();
    sorted.sort_by(|a, b| b.n_boundaries.cmp(&a.n_boundaries));
    let top_zones = sorted
        .into_iter()
        .take(5)
        .map(|z| (short_zone_name(&z.field_zone), z.n_boundaries))
        .collect();

    let summary = &data.summary;
    let most_productive = summary
        .most_productive_zone
        .as_deref()
        .map(|z| (short_zone_name(z), summary.most_productive_boundaries));
    let least_productive = most_productive.as_ref().and(
        summary
            .least_productive_zone
            .as_deref()
            .map(|z| (short_zone_name(z), summary.least_productive_boundaries)),
    );

    WagonView {
        lines,
        top_zones,
        total_boundaries: data.total_boundaries,
        zones_with_data: summary.zones_with_data,
        most_productive,
        least_productive,
    }
}

fn ratio(count: u32, max: u32) -> f64 {
    if max == 0 {
        0.0
    } else {
        count as f64 / max as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{DismissalLocation, WagonZone};

    #[test]
    fn pitch_lookup_ignores_case() {
        assert_eq!(fielding_position("Deep Mid-Wicket"), Some((300.0, 120.0)));
        assert_eq!(fielding_position("cow corner"), None);
    }

    #[test]
    fn dots_scale_with_count() {
        let data = DismissalData {
            player: "P".to_string(),
            dismissal_locations: vec![
                DismissalLocation {
                    position: "Long-on".to_string(),
                    count: 5,
                },
                DismissalLocation {
                    position: "Cow corner".to_string(),
                    count: 1,
                },
            ],
        };
        let dots = pitch_dots(&data);
        assert_eq!(dots[0].radius, 16.0);
        assert_eq!(dots[0].color, "#ef4444");
        assert!((dots[1].radius - 6.4).abs() < 1e-9);
        assert_eq!(dots[1].color, "#22c55e");
        assert!(!dots[1].mapped);
        assert_eq!((dots[1].x, dots[1].y), UNMAPPED_POSITION);
    }

    #[test]
    fn one_line_per_boundary() {
        let data = WagonWheelData {
            zones: vec![
                WagonZone {
                    field_zone: "Cover".to_string(),
                    n_boundaries: 4,
                },
                WagonZone {
                    field_zone: "Somewhere".to_string(),
                    n_boundaries: 1,
                },
            ],
            total_boundaries: 5,
            ..WagonWheelData::default()
        };
        let view = wagon_view(&data);
        assert_eq!(view.lines.len(), 5);
        assert_eq!(view.lines[0].angle, 35.0);
        assert_eq!(view.lines[0].color, "#10B981");
        assert_eq!(view.lines[4].angle, -10.0);
        assert_eq!(view.lines[4].color, "#EF4444");
        assert_eq!(view.top_zones[0], ("Cover".to_string(), 4));
        assert!(view.most_productive.is_none());
    }
}
