use std::path::PathBuf;

use anyhow::{Result, anyhow, bail};

use crate::deck_export::ExportFormat;
use crate::notes::NotesBackend;
use crate::selection::Selection;

/// Command-line inputs shared by the binaries. The selection is given up
/// front instead of being picked interactively.
#[derive(Debug, Clone)]
pub struct PlannerArgs {
    pub team: Option<String>,
    pub opposition: Option<String>,
    pub venue: Option<String>,
    pub players: Vec<String>,
    pub nba_home: Vec<String>,
    pub nba_away: Vec<String>,
    pub format: ExportFormat,
    pub out_dir: PathBuf,
    pub notes_backend: NotesBackend,
    pub query: Option<String>,
    pub output: Option<PathBuf>,
}

impl Default for PlannerArgs {
    fn default() -> Self {
        Self {
            team: None,
            opposition: None,
            venue: None,
            players: Vec::new(),
            nba_home: Vec::new(),
            nba_away: Vec::new(),
            format: ExportFormat::Pdf,
            out_dir: PathBuf::from("."),
            notes_backend: NotesBackend::from_env(),
            query: None,
            output: None,
        }
    }
}

pub const USAGE: &str = "options:
  --team NAME           your team (excluded from opposition choices)
  --opposition NAME     opposition team
  --venue NAME          venue
  --player NAME         add a player slide (repeatable)
  --players A,B,C       add several player slides
  --nba-home A,B        Lakers players to compare
  --nba-away A,B        Mavericks players to compare
  --format FMT          pdf | pptx | native | server | xlsx
  --out DIR             export directory (default .)
  --notes BACKEND       file | sqlite | memory
  --query QS            route query, e.g. type=player&player=X
  --output FILE         route output png";

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl PlannerArgs {
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut out = PlannerArgs::default();
        let mut iter = args.into_iter();
        while let Some(flag) = iter.next() {
            if flag == "-h" || flag == "--help" {
                bail!("{USAGE}");
            }
            let mut value = || {
                iter.next()
                    .ok_or_else(|| anyhow!("missing value for {flag}"))
            };
            match flag.as_str() {
                "--team" => out.team = Some(value()?),
                "--opposition" => out.opposition = Some(value()?),
                "--venue" => out.venue = Some(value()?),
                "--player" => out.players.push(value()?),
                "--players" => out.players.extend(split_list(&value()?)),
                "--nba-home" => out.nba_home.extend(split_list(&value()?)),
                "--nba-away" => out.nba_away.extend(split_list(&value()?)),
                "--format" => {
                    let raw = value()?;
                    out.format = ExportFormat::parse(&raw)
                        .ok_or_else(|| anyhow!("unknown export format {raw}"))?;
                }
                "--out" => out.out_dir = PathBuf::from(value()?),
                "--notes" => {
                    let raw = value()?;
                    out.notes_backend = NotesBackend::parse(&raw)
                        .ok_or_else(|| anyhow!("unknown notes backend {raw}"))?;
                }
                "--query" => out.query = Some(value()?),
                "--output" => out.output = Some(PathBuf::from(value()?)),
                other => bail!("unknown argument {other}\n{USAGE}"),
            }
        }
        if let (Some(team), Some(opp)) = (out.team.as_deref(), out.opposition.as_deref()) {
            if team.trim() == opp.trim() {
                bail!("--opposition must differ from --team ({})", team.trim());
            }
        }
        Ok(out)
    }

    /// Applies the flags in the same order the dashboard would: opposition
    /// first (which may install a preset squad), then explicit players.
    pub fn selection(&self) -> Selection {
        let mut selection = Selection::default();
        selection.set_team(self.team.clone());
        selection.set_opposition(self.opposition.clone());
        selection.set_venue(self.venue.clone());
        selection.set_nba_players(self.nba_home.clone(), self.nba_away.clone());
        if !self.players.is_empty() {
            selection.selected_players.clear();
            for player in &self.players {
                if !selection.selected_players.contains(player) {
                    selection.toggle_player(player);
                }
            }
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn explicit_players_replace_preset_squad() {
        let parsed = PlannerArgs::parse(args(&[
            "--opposition",
            "Mumbai Indians",
            "--players",
            "Jasprit Bumrah, Rohit Sharma",
            "--format",
            "native",
        ]))
        .expect("parse");
        let selection = parsed.selection();
        assert_eq!(selection.selected_players, vec!["Jasprit Bumrah", "Rohit Sharma"]);
        assert_eq!(selection.team_players.len(), 4);
        assert_eq!(parsed.format, ExportFormat::Native);
    }

    #[test]
    fn preset_squad_without_players_flag() {
        let parsed = PlannerArgs::parse(args(&["--opposition", "Chennai Super Kings"])).expect("parse");
        assert_eq!(parsed.selection().selected_players.len(), 4);
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(PlannerArgs::parse(args(&["--colour", "red"])).is_err());
        assert!(PlannerArgs::parse(args(&["--venue"])).is_err());
    }
}
