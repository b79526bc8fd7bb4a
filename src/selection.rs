use crate::state::{NBA_MATCHUP, Slide, SlideKind};

/// Opposition teams whose squads are installed without a roster fetch.
const PRESET_ROSTERS: &[(&str, &[&str])] = &[
    (
        "Mumbai Indians",
        &["Rohit Sharma", "Suryakumar Yadav", "Tilak Varma", "Hardik Pandya"],
    ),
    (
        "Chennai Super Kings",
        &["Ruturaj Gaikwad", "Shivam Dube", "MS Dhoni", "Ravindra Jadeja"],
    ),
];

pub fn preset_roster(opposition: &str) -> Option<&'static [&'static str]> {
    PRESET_ROSTERS
        .iter()
        .find(|(team, _)| *team == opposition)
        .map(|(_, roster)| *roster)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub team: Option<String>,
    pub opposition: Option<String>,
    pub venue: Option<String>,
    pub selected_players: Vec<String>,
    pub team_players: Vec<String>,
    /// Picks for the basketball comparison; untouched by opposition changes.
    pub nba_home_players: Vec<String>,
    pub nba_away_players: Vec<String>,
}

impl Selection {
    /// Picking the current opposition as your own team drops that
    /// opposition along with its roster.
    pub fn set_team(&mut self, team: Option<String>) {
        self.team = normalize(team);
        if self.team.is_some() && self.opposition == self.team {
            self.set_opposition(None);
        }
    }

    pub fn set_venue(&mut self, venue: Option<String>) {
        self.venue = normalize(venue);
    }

    /// Switching opposition always drops the previous roster and selection.
    /// Preset teams then get their squad as both roster and selection. Your
    /// own team is never accepted as the opposition.
    pub fn set_opposition(&mut self, opposition: Option<String>) {
        self.opposition = normalize(opposition).filter(|opp| Some(opp) != self.team.as_ref());
        self.team_players.clear();
        self.selected_players.clear();
        let Some(opp) = self.opposition.as_deref() else {
            return;
        };
        if let Some(roster) = preset_roster(opp) {
            self.team_players = roster.iter().map(|name| name.to_string()).collect();
            self.selected_players = self.team_players.clone();
        }
    }

    /// Installs a fetched roster, keeping only selected players still in it.
    pub fn set_team_players(&mut self, players: Vec<String>) {
        let mut roster: Vec<String> = Vec::with_capacity(players.len());
        for name in players {
            let name = name.trim().to_string();
            if !name.is_empty() && !roster.contains(&name) {
                roster.push(name);
            }
        }
        self.selected_players.retain(|name| roster.contains(name));
        self.team_players = roster;
    }

    /// Adds the player at the end or removes it in place. Returns whether the
    /// player is selected afterwards.
    pub fn toggle_player(&mut self, player: &str) -> bool {
        let player = player.trim();
        if player.is_empty() {
            return false;
        }
        if let Some(pos) = self.selected_players.iter().position(|p| p == player) {
            self.selected_players.remove(pos);
            false
        } else {
            self.selected_players.push(player.to_string());
            true
        }
    }

    pub fn set_nba_players(&mut self, home: Vec<String>, away: Vec<String>) {
        self.nba_home_players = home;
        self.nba_away_players = away;
    }

    pub fn opposition_options<'a>(&self, teams: &'a [String]) -> Vec<&'a String> {
        teams
            .iter()
            .filter(|team| Some(team.as_str()) != self.team.as_deref())
            .collect()
    }

    /// Moves to the next opposition choice; past the last one the opposition
    /// is cleared. Returns the new opposition.
    pub fn cycle_opposition(&mut self, teams: &[String]) -> Option<&str> {
        let next = {
            let options = self.opposition_options(teams);
            let current = self
                .opposition
                .as_deref()
                .and_then(|opp| options.iter().position(|team| team.as_str() == opp));
            match current {
                Some(pos) => options.get(pos + 1).map(|team| team.to_string()),
                None => options.first().map(|team| team.to_string()),
            }
        };
        self.set_opposition(next);
        self.opposition.as_deref()
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Players first in selection order, then the opposition pair, the venue and
/// the trailing NBA matchup. Duplicate `(kind, data)` pairs are skipped.
pub fn assemble_slides(selection: &Selection) -> Vec<Slide> {
    let mut entries: Vec<(SlideKind, String)> = Vec::new();
    let mut push = |kind: SlideKind, data: &str| {
        if !entries.iter().any(|(k, d)| *k == kind && d == data) {
            entries.push((kind, data.to_string()));
        }
    };

    for player in &selection.selected_players {
        push(SlideKind::Player, player);
    }
    if let Some(opp) = selection.opposition.as_deref() {
        push(SlideKind::Team, opp);
        push(SlideKind::OverByOver, opp);
    }
    if let Some(venue) = selection.venue.as_deref() {
        push(SlideKind::Venue, venue);
    }
    push(SlideKind::Nba, NBA_MATCHUP);

    entries
        .into_iter()
        .enumerate()
        .map(|(idx, (kind, data))| Slide::new(kind, data, idx + 1))
        .collect()
}

/// Ordered slides plus a cursor. Rebuilt whenever the selection changes.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    slides: Vec<Slide>,
    current: usize,
}

impl Deck {
    pub fn from_selection(selection: &Selection) -> Self {
        Self {
            slides: assemble_slides(selection),
            current: 0,
        }
    }

    /// Re-assembles after a selection change, staying on the same slide when
    /// it still exists.
    pub fn rebuild(&mut self, selection: &Selection) {
        let previous = self.current().map(|s| (s.kind, s.data.clone()));
        self.slides = assemble_slides(selection);
        self.current = previous
            .and_then(|(kind, data)| {
                self.slides
                    .iter()
                    .position(|s| s.kind == kind && s.data == data)
            })
            .unwrap_or(0);
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&Slide> {
        self.slides.get(self.current)
    }

    pub fn next(&mut self) {
        if !self.slides.is_empty() {
            self.current = (self.current + 1) % self.slides.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.slides.is_empty() {
            self.current = (self.current + self.slides.len() - 1) % self.slides.len();
        }
    }

    /// Zero-based jump; out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index < self.slides.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    pub fn position_label(&self) -> String {
        if self.slides.is_empty() {
            return "No slides".to_string();
        }
        format!("Slide {} of {}", self.current + 1, self.slides.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_keeps_order() {
        let mut sel = Selection::default();
        sel.toggle_player("A");
        sel.toggle_player("B");
        sel.toggle_player("C");
        assert!(!sel.toggle_player("B"));
        assert_eq!(sel.selected_players, vec!["A", "C"]);
    }

    #[test]
    fn deck_wraps_both_ways() {
        let mut deck = Deck::from_selection(&Selection::default());
        assert_eq!(deck.len(), 1);
        deck.next();
        assert_eq!(deck.current_index(), 0);
        deck.prev();
        assert_eq!(deck.current_index(), 0);
        assert_eq!(deck.position_label(), "Slide 1 of 1");
    }

    #[test]
    fn rebuild_follows_current_slide() {
        let mut sel = Selection::default();
        sel.toggle_player("A");
        sel.toggle_player("B");
        let mut deck = Deck::from_selection(&sel);
        deck.next();
        assert_eq!(deck.current().map(|s| s.data.as_str()), Some("B"));
        sel.toggle_player("A");
        deck.rebuild(&sel);
        assert_eq!(deck.current().map(|s| s.data.as_str()), Some("B"));
        assert_eq!(deck.current_index(), 0);
    }

    #[test]
    fn opposition_options_skip_own_team() {
        let mut sel = Selection::default();
        sel.set_team(Some("Mumbai Indians".to_string()));
        let teams = vec!["Mumbai Indians".to_string(), "Gujarat Titans".to_string()];
        let opts = sel.opposition_options(&teams);
        assert_eq!(opts, vec![&teams[1]]);
    }
}
