use serde::Deserialize;

// Scoreboard JSON. Only the fields the overlay reads are modelled; every
// field is defaulted because the feed omits them freely.

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Scoreboard {
    pub events: Vec<Event>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Event {
    pub name: String,
    pub date: String,
    pub competitions: Vec<Competition>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Competition {
    pub competitors: Vec<Competitor>,
    pub status: Status,
    pub situation: Option<Situation>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Competitor {
    pub id: String,
    pub home_away: String,
    pub team: Team,
    pub score: String,
    pub winner: bool,
    pub records: Vec<TeamRecord>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Team {
    pub abbreviation: Option<String>,
    pub short_display_name: Option<String>,
    pub display_name: Option<String>,
    pub logo: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct TeamRecord {
    pub name: String,
    pub summary: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Status {
    pub period: u32,
    pub display_clock: String,
    #[serde(rename = "type")]
    pub kind: StatusType,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct StatusType {
    pub name: String,
    pub state: String,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Situation {
    pub possession: Option<String>,
    pub down_distance_text: Option<String>,
}

pub const TROPHY: &str = "\u{1F3C6}";
pub const FOOTBALL: &str = "\u{1F3C8}";
pub const WINNER_BULLET: &str = "\u{2022}";
pub const LEADER_BULLET: &str = "\u{25CB}";

/// Game period as shown in the middle column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodLabel {
    Halftime,
    Quarter(u32),
    Overtime(u32),
}

impl PeriodLabel {
    pub fn new(period: u32, display_clock: &str) -> Self {
        if period == 2 && display_clock == "0:00" {
            PeriodLabel::Halftime
        } else if period <= 4 {
            PeriodLabel::Quarter(period)
        } else {
            PeriodLabel::Overtime(period - 4)
        }
    }
}

pub fn ordinal_suffix(n: u32) -> &'static str {
    match (n % 10, n % 100) {
        (1, r) if r != 11 => "st",
        (2, r) if r != 12 => "nd",
        (3, r) if r != 13 => "rd",
        _ => "th",
    }
}

/// Emoji beside a team: shown, or an invisible placeholder keeping both
/// sides the same width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indicator {
    None,
    Shown(&'static str),
    Placeholder(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreMarker {
    Plain,
    Winner,
    Leader,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamLine {
    pub name: String,
    pub logo: Option<String>,
    pub record: String,
    /// `None` before kickoff.
    pub score: Option<String>,
    pub marker: ScoreMarker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GamePhase {
    Final,
    InProgress {
        period: PeriodLabel,
        clock: String,
        down: String,
        yard_line: Option<String>,
    },
    /// Kickoff time as reported by the feed; formatted by the view.
    Scheduled { date: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameCard {
    pub away: TeamLine,
    pub home: TeamLine,
    pub away_indicator: Indicator,
    pub home_indicator: Indicator,
    pub phase: GamePhase,
}

impl Scoreboard {
    pub fn cards(&self) -> Vec<GameCard> {
        self.events.iter().filter_map(GameCard::from_event).collect()
    }
}

impl GameCard {
    /// `None` when the event lacks a competition or either side.
    pub fn from_event(event: &Event) -> Option<GameCard> {
        let competition = event.competitions.first()?;
        let home = competition.competitors.iter().find(|c| c.home_away == "home")?;
        let away = competition.competitors.iter().find(|c| c.home_away == "away")?;
        let status = &competition.status;

        let is_final = status.kind.name == "STATUS_FINAL";
        let in_progress = status.kind.state == "in";
        let not_started = status.kind.state == "pre";

        let (mut away_indicator, mut home_indicator) = (Indicator::None, Indicator::None);
        let mut emoji = "";
        if is_final {
            emoji = TROPHY;
            if away.winner {
                away_indicator = Indicator::Shown(TROPHY);
            } else if home.winner {
                home_indicator = Indicator::Shown(TROPHY);
            } else {
                away_indicator = Indicator::Shown(TROPHY);
                home_indicator = Indicator::Shown(TROPHY);
            }
        } else if in_progress {
            emoji = FOOTBALL;
            match competition.situation.as_ref().and_then(|s| s.possession.as_deref()) {
                Some(team) if team == away.id => away_indicator = Indicator::Shown(FOOTBALL),
                Some(team) if team == home.id => home_indicator = Indicator::Shown(FOOTBALL),
                Some(_) => {}
                None => log::debug!("no possession data for {}", event.name),
            }
        }
        let away_shown = matches!(away_indicator, Indicator::Shown(_));
        let home_shown = matches!(home_indicator, Indicator::Shown(_));
        if away_shown && !home_shown {
            home_indicator = Indicator::Placeholder(emoji);
        } else if home_shown && !away_shown {
            away_indicator = Indicator::Placeholder(emoji);
        }

        let phase = if is_final {
            GamePhase::Final
        } else if in_progress {
            let down_text = competition
                .situation
                .as_ref()
                .and_then(|s| s.down_distance_text.clone())
                .unwrap_or_default();
            let mut parts = down_text.splitn(2, " at ");
            let down = parts.next().unwrap_or_default().to_string();
            let yard_line = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
            GamePhase::InProgress {
                period: PeriodLabel::new(status.period, &status.display_clock),
                clock: status.display_clock.clone(),
                down,
                yard_line,
            }
        } else {
            GamePhase::Scheduled {
                date: event.date.clone(),
            }
        };

        let mut away_line = TeamLine::new(away, not_started);
        let mut home_line = TeamLine::new(home, not_started);
        if is_final {
            if away.winner {
                away_line.marker = ScoreMarker::Winner;
            } else if home.winner {
                home_line.marker = ScoreMarker::Winner;
            }
        } else if in_progress {
            let away_points = parse_points(&away.score);
            let home_points = parse_points(&home.score);
            if away_points > home_points {
                away_line.marker = ScoreMarker::Leader;
            } else if home_points > away_points {
                home_line.marker = ScoreMarker::Leader;
            }
        }

        Some(GameCard {
            away: away_line,
            home: home_line,
            away_indicator,
            home_indicator,
            phase,
        })
    }
}

impl TeamLine {
    fn new(competitor: &Competitor, not_started: bool) -> Self {
        let team = &competitor.team;
        let name = [&team.abbreviation, &team.short_display_name, &team.display_name]
            .into_iter()
            .flatten()
            .find(|n| !n.is_empty())
            .cloned()
            .unwrap_or_default();

        TeamLine {
            name,
            logo: team.logo.clone().filter(|l| !l.is_empty()),
            record: overall_record(&competitor.records),
            score: (!not_started).then(|| competitor.score.clone()),
            marker: ScoreMarker::Plain,
        }
    }
}

/// `W-L`, or `W-L-T` when the team has ties.
pub fn overall_record(records: &[TeamRecord]) -> String {
    let Some(summary) = records
        .iter()
        .find(|r| r.name == "overall")
        .and_then(|r| r.summary.as_deref())
        .filter(|s| !s.is_empty())
    else {
        return String::new();
    };

    let mut parts = summary.split('-');
    let wins = parts.next().unwrap_or_default();
    let losses = parts.next().unwrap_or_default();
    let ties: u32 = parts.next().and_then(|t| t.trim().parse().ok()).unwrap_or(0);
    if ties > 0 {
        format!("{}-{}-{}", wins, losses, ties)
    } else {
        format!("{}-{}", wins, losses)
    }
}

fn parse_points(score: &str) -> i64 {
    score.trim().parse().unwrap_or(0)
}
