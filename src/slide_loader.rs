use anyhow::Result;
use log::{info, warn};
use rayon::prelude::*;

use crate::selection::Selection;
use crate::state::{
    NBA_AWAY_TEAM, NBA_HOME_TEAM, NbaBundle, OverByOverBundle, PlayerBundle, ReadySlide, Slide,
    SlideData, SlideKind, TeamBundle, VenueBundle,
};
use crate::stats_fetch::{
    Endpoint, StatsApi, parse_bowling_stats, parse_dismissals, parse_insights, parse_name_list,
    parse_nba_player_stats, parse_nba_team_stats, parse_over_by_over, parse_pacer_spinner,
    parse_scatter, parse_strike_rate_zones, parse_toss_decisions, parse_toss_situations,
    parse_venue_insights, parse_wagon_wheel, with_fetch_pool,
};

/// Selection-wide inputs a slide needs besides its own `(kind, data)`.
#[derive(Debug, Clone, Default)]
pub struct LoadContext {
    pub opposition: Option<String>,
    pub selected_players: Vec<String>,
    pub nba_home_players: Vec<String>,
    pub nba_away_players: Vec<String>,
}

impl LoadContext {
    pub fn from_selection(selection: &Selection) -> Self {
        Self {
            opposition: selection.opposition.clone(),
            selected_players: selection.selected_players.clone(),
            nba_home_players: selection.nba_home_players.clone(),
            nba_away_players: selection.nba_away_players.clone(),
        }
    }
}

struct ReadGroup {
    label: String,
    endpoints: Vec<Endpoint>,
}

impl ReadGroup {
    fn new(label: impl Into<String>, endpoints: Vec<Endpoint>) -> Self {
        Self {
            label: label.into(),
            endpoints,
        }
    }
}

/// Fetches everything the slide shows and returns only once every read has
/// resolved. Failed groups are logged and leave their part of the bundle empty.
pub fn load_slide(api: &dyn StatsApi, slide: &Slide, ctx: &LoadContext) -> ReadySlide {
    let groups = read_groups(slide, ctx);
    let results: Vec<Result<Vec<String>>> = with_fetch_pool(api.fetch_parallelism(), || {
        groups
            .par_iter()
            .map(|group| fetch_group(api, &group.endpoints))
            .collect()
    });

    let mut errors = Vec::new();
    let mut outcomes = groups.iter().zip(results);
    let mut next = || outcomes.next().map(|(g, r)| (g.label.clone(), r));

    let data = match slide.kind {
        SlideKind::Player => {
            let mut bundle = PlayerBundle::default();
            if let Some((insights, bowling, scatter, dismissals)) = absorb(&mut errors, next(), |b| {
                Ok((
                    parse_insights(&b[0])?,
                    parse_bowling_stats(&b[1])?,
                    parse_scatter(&b[2], "scatter_data")?,
                    parse_dismissals(&b[3])?,
                ))
            }) {
                bundle.insights = insights;
                bundle.bowling = Some(bowling);
                bundle.scatter = scatter;
                bundle.dismissals = Some(dismissals);
            }
            bundle.strike_zones = absorb(&mut errors, next(), |b| parse_strike_rate_zones(&b[0]));
            bundle.wagon_wheel = absorb(&mut errors, next(), |b| parse_wagon_wheel(&b[0]));
            SlideData::Player(bundle)
        }
        SlideKind::Team => {
            let mut bundle = TeamBundle::default();
            if let Some((insights, bowling, scatter)) = absorb(&mut errors, next(), |b| {
                Ok((
                    parse_insights(&b[0])?,
                    parse_bowling_stats(&b[1])?,
                    parse_scatter(&b[2], "team_scatter_data")?,
                ))
            }) {
                bundle.insights = insights;
                bundle.bowling = Some(bowling);
                bundle.scatter = scatter;
            }
            SlideData::Team(bundle)
        }
        SlideKind::OverByOver => {
            let mut bundle = OverByOverBundle::default();
            if let Some((overs, pacer_spinner)) = absorb(&mut errors, next(), |b| {
                Ok((parse_over_by_over(&b[0])?, parse_pacer_spinner(&b[1])?))
            }) {
                bundle.overs = overs;
                bundle.pacer_spinner = pacer_spinner;
            }
            SlideData::OverByOver(bundle)
        }
        SlideKind::Venue => {
            let mut bundle = VenueBundle::default();
            if let Some((insights, decisions, situations)) = absorb(&mut errors, next(), |b| {
                Ok((
                    parse_venue_insights(&b[0])?,
                    parse_toss_decisions(&b[1])?,
                    parse_toss_situations(&b[2])?,
                ))
            }) {
                bundle.insights = insights;
                bundle.toss_decisions = decisions;
                bundle.situations = situations;
            }
            SlideData::Venue(bundle)
        }
        SlideKind::Nba => {
            let mut bundle = NbaBundle::default();
            if let Some((home, away)) = absorb(&mut errors, next(), |b| {
                Ok((
                    parse_name_list(&b[0], "players")?,
                    parse_name_list(&b[1], "players")?,
                ))
            }) {
                bundle.home_players = home;
                bundle.away_players = away;
            }
            if let Some((home, away)) = absorb(&mut errors, next(), |b| {
                Ok((parse_nba_team_stats(&b[0])?, parse_nba_team_stats(&b[1])?))
            }) {
                bundle.home_stats = Some(home);
                bundle.away_stats = Some(away);
            }
            if nba_players_requested(ctx) {
                let home_count = ctx.nba_home_players.len();
                if let Some(stats) = absorb(&mut errors, next(), |b| {
                    b.iter()
                        .map(|body| parse_nba_player_stats(body))
                        .collect::<Result<Vec<_>>>()
                }) {
                    let names = ctx.nba_home_players.iter().chain(&ctx.nba_away_players);
                    for (idx, (name, stat)) in names.zip(stats).enumerate() {
                        if idx < home_count {
                            bundle.home_selected.push((name.clone(), stat));
                        } else {
                            bundle.away_selected.push((name.clone(), stat));
                        }
                    }
                }
            }
            SlideData::Nba(bundle)
        }
    };

    info!(
        "loaded slide {} ({}) with {} failed read group(s)",
        slide.index,
        slide.title,
        errors.len()
    );

    ReadySlide {
        slide: slide.clone(),
        data,
        opposition: ctx.opposition.clone(),
        notes: None,
        errors,
    }
}

fn read_groups(slide: &Slide, ctx: &LoadContext) -> Vec<ReadGroup> {
    let name = slide.data.clone();
    match slide.kind {
        SlideKind::Player => {
            let selected = if ctx.selected_players.is_empty() {
                vec![name.clone()]
            } else {
                ctx.selected_players.clone()
            };
            vec![
                ReadGroup::new(
                    "player overview",
                    vec![
                        Endpoint::PlayerInsights(name.clone()),
                        Endpoint::PlayerBowlingStats(name.clone()),
                        Endpoint::ScatterPlot {
                            selected_players: selected,
                        },
                        Endpoint::PlayerDismissals(name.clone()),
                    ],
                ),
                ReadGroup::new(
                    "strike-rate zones",
                    vec![Endpoint::PlayerStrikeRateZones(name.clone())],
                ),
                ReadGroup::new("wagon wheel", vec![Endpoint::PlayerWagonWheel(name)]),
            ]
        }
        SlideKind::Team => vec![ReadGroup::new(
            "team overview",
            vec![
                Endpoint::TeamInsights(name.clone()),
                Endpoint::TeamBowlingStats(name),
                Endpoint::TeamScatterPlot,
            ],
        )],
        SlideKind::OverByOver => vec![ReadGroup::new(
            "over-by-over",
            vec![
                Endpoint::TeamOverByOver(name.clone()),
                Endpoint::TeamPacerSpinner(name),
            ],
        )],
        SlideKind::Venue => vec![ReadGroup::new(
            "venue overview",
            vec![
                Endpoint::VenueInsights(name.clone()),
                Endpoint::VenueTossDecisions(name.clone()),
                Endpoint::VenueTossSituations(name),
            ],
        )],
        SlideKind::Nba => {
            let mut groups = vec![
                ReadGroup::new(
                    "nba rosters",
                    vec![
                        Endpoint::NbaTeamPlayers(NBA_HOME_TEAM.to_string()),
                        Endpoint::NbaTeamPlayers(NBA_AWAY_TEAM.to_string()),
                    ],
                ),
                ReadGroup::new(
                    "nba team stats",
                    vec![
                        Endpoint::NbaTeamStats(NBA_HOME_TEAM.to_string()),
                        Endpoint::NbaTeamStats(NBA_AWAY_TEAM.to_string()),
                    ],
                ),
            ];
            if nba_players_requested(ctx) {
                groups.push(ReadGroup::new(
                    "nba player stats",
                    ctx.nba_home_players
                        .iter()
                        .chain(&ctx.nba_away_players)
                        .map(|p| Endpoint::NbaPlayerStats(p.clone()))
                        .collect(),
                ));
            }
            groups
        }
    }
}

/// Player stats are only compared once both sides have a pick.
fn nba_players_requested(ctx: &LoadContext) -> bool {
    !ctx.nba_home_players.is_empty() && !ctx.nba_away_players.is_empty()
}

fn fetch_group(api: &dyn StatsApi, endpoints: &[Endpoint]) -> Result<Vec<String>> {
    let bodies: Vec<Result<String>> = endpoints.par_iter().map(|ep| api.get(ep)).collect();
    bodies.into_iter().collect()
}

fn absorb<T>(
    errors: &mut Vec<String>,
    outcome: Option<(String, Result<Vec<String>>)>,
    parse: impl FnOnce(&[String]) -> Result<T>,
) -> Option<T> {
    let (label, result) = outcome?;
    match result.and_then(|bodies| parse(&bodies)) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("{label} read group failed: {err:#}");
            errors.push(format!("{label}: {err:#}"));
            None
        }
    }
}
