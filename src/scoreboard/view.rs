use std::rc::Rc;

use serde::Serialize;
use serde_json::json;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use yew::prelude::*;
use yew_icons::{Icon, IconId};

use crate::error::CoverError;
use crate::scoreboard::model::{
    ordinal_suffix, GameCard, GamePhase, Indicator, PeriodLabel, ScoreMarker, Scoreboard, TeamLine,
    LEADER_BULLET, WINNER_BULLET,
};

fn fetch_error(err: JsValue) -> CoverError {
    CoverError::Fetch(format!("{:?}", err))
}

/// Fetches the scoreboard, bypassing caches with a timestamp query.
pub async fn fetch_scoreboard(url: &str) -> Result<Scoreboard, CoverError> {
    let window = web_sys::window().ok_or_else(|| CoverError::Fetch("no window".to_string()))?;
    let separator = if url.contains('?') { '&' } else { '?' };
    let url = format!("{}{}t={}", url, separator, js_sys::Date::now() as u64);

    let response = JsFuture::from(window.fetch_with_str(&url))
        .await
        .map_err(fetch_error)?;
    let response: web_sys::Response = response.dyn_into().map_err(fetch_error)?;
    if !response.ok() {
        return Err(CoverError::Fetch(format!("HTTP {}", response.status())));
    }
    let body = JsFuture::from(response.json().map_err(fetch_error)?)
        .await
        .map_err(fetch_error)?;
    Ok(serde_wasm_bindgen::from_value::<Scoreboard>(body)?)
}

fn locale_options(options: serde_json::Value) -> Option<JsValue> {
    options
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .ok()
}

/// Weekday, `MM/DD` and short time of a kickoff in `time_zone`.
fn format_kickoff(date: &str, time_zone: &str) -> Option<[String; 3]> {
    let parsed = js_sys::Date::new(&JsValue::from_str(date));
    if parsed.get_time().is_nan() {
        return None;
    }

    let weekday = locale_options(json!({ "timeZone": time_zone, "weekday": "long" }))?;
    let day = locale_options(json!({ "timeZone": time_zone, "month": "2-digit", "day": "2-digit" }))?;
    let clock = locale_options(json!({
        "timeZone": time_zone,
        "hour": "numeric",
        "minute": "2-digit",
        "hour12": true
    }))?;

    let time = String::from(parsed.to_locale_string("en-US", &clock));
    let time = match time.strip_prefix('0') {
        Some(rest) => rest.to_string(),
        None => time,
    };
    Some([
        String::from(parsed.to_locale_date_string("en-US", &weekday)),
        String::from(parsed.to_locale_date_string("en-US", &day)),
        time,
    ])
}

#[derive(Clone, PartialEq)]
enum LoadState {
    Loading,
    Loaded(Rc<Vec<GameCard>>),
    Failed,
}

#[derive(Properties, PartialEq, Clone)]
pub struct ScoreboardProps {
    pub url: AttrValue,
    pub time_zone: AttrValue,
    #[prop_or_default]
    pub on_close: Callback<()>,
}

fn indicator(indicator: &Indicator) -> Html {
    match indicator {
        Indicator::None => html! {},
        Indicator::Shown(emoji) => html! { <span class="indicator">{ *emoji }</span> },
        Indicator::Placeholder(emoji) => html! { <span class="hidden-indicator">{ *emoji }</span> },
    }
}

fn score(line: &TeamLine) -> Html {
    let Some(points) = line.score.clone() else {
        return html! {};
    };
    match line.marker {
        ScoreMarker::Plain => html! { <span class="score">{points}</span> },
        ScoreMarker::Winner => html! {
            <div class="score-container">
                <span class="bullet">{WINNER_BULLET}</span>
                <span class="score winner">{points}</span>
            </div>
        },
        ScoreMarker::Leader => html! {
            <div class="score-container">
                <span class="bullet">{LEADER_BULLET}</span>
                <span class="score">{points}</span>
            </div>
        },
    }
}

fn team_info(line: &TeamLine) -> Html {
    html! {
        <div class="team-info">
            if let Some(logo) = line.logo.clone() {
                <img src={logo} alt={line.name.clone()} class="team-logo" />
            }
            <span class="team-name">{line.name.clone()}</span>
            <span class="record">{line.record.clone()}</span>
            {score(line)}
        </div>
    }
}

fn period(label: &PeriodLabel, clock: &str) -> Html {
    match label {
        PeriodLabel::Halftime => html! { {"Halftime"} },
        PeriodLabel::Quarter(n) => html! {
            <>{n.to_string()}<sup>{ordinal_suffix(*n)}</sup>{format!(" {}", clock)}</>
        },
        PeriodLabel::Overtime(n) => html! {
            <>{n.to_string()}<sup>{ordinal_suffix(*n)}</sup>{format!(" OT {}", clock)}</>
        },
    }
}

fn middle(card: &GameCard, time_zone: &str) -> Html {
    let matchup = html! {
        <>{indicator(&card.away_indicator)}{" @ "}{indicator(&card.home_indicator)}</>
    };
    match &card.phase {
        GamePhase::Final => html! {
            <>
                <div class="middle-content">{matchup}</div>
                <div>{"Final"}</div>
            </>
        },
        GamePhase::InProgress {
            period: label,
            clock,
            down,
            yard_line,
        } => html! {
            <>
                <div><span class="middle-content">{matchup}</span></div>
                <div>{period(label, clock)}</div>
                <div>{down.clone()}</div>
                if let Some(yard_line) = yard_line.clone() {
                    <div>{format!("on {}", yard_line)}</div>
                }
            </>
        },
        GamePhase::Scheduled { date } => match format_kickoff(date, time_zone) {
            Some([weekday, day, time]) => html! {
                <>
                    <div class="middle-content">{"@"}</div>
                    <div>{weekday}</div>
                    <div>{day}</div>
                    <div>{time}</div>
                </>
            },
            None => html! {
                <>
                    <div class="middle-content">{"@"}</div>
                    <div>{"Scheduled"}</div>
                </>
            },
        },
    }
}

fn game_card(card: &GameCard, time_zone: &str) -> Html {
    html! {
        <div class="game-card">
            {team_info(&card.away)}
            <div class="middle-info">{middle(card, time_zone)}</div>
            {team_info(&card.home)}
        </div>
    }
}

#[function_component(ScoreboardView)]
pub fn scoreboard_view(props: &ScoreboardProps) -> Html {
    let load_state = use_state(|| LoadState::Loading);

    // Fetch once per mount; the overlay is rebuilt every time it is shown.
    {
        let load_state = load_state.clone();
        use_effect_with(props.url.clone(), move |url| {
            let url = url.to_string();
            wasm_bindgen_futures::spawn_local(async move {
                match fetch_scoreboard(&url).await {
                    Ok(board) => load_state.set(LoadState::Loaded(Rc::new(board.cards()))),
                    Err(err) => {
                        log::error!("Error fetching NFL scores: {}", err);
                        load_state.set(LoadState::Failed);
                    }
                }
            });
            || ()
        });
    }

    let on_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_close.emit(());
        })
    };

    let content = match &*load_state {
        LoadState::Loading => html! { <div class="spinner"></div> },
        LoadState::Failed => html! {
            <p class="error-message">{"Error loading scores. Try again later."}</p>
        },
        LoadState::Loaded(cards) if cards.is_empty() => html! {
            <p class="no-games-message">{"No NFL games this week."}</p>
        },
        LoadState::Loaded(cards) => html! {
            <div class="games-container">
                { for cards.iter().map(|card| game_card(card, &props.time_zone)) }
            </div>
        },
    };

    html! {
        <div id="tilde-overlay" class="overlay-container" onclick={on_click}>
            <span class="close-icon" title="Close">
                <Icon icon_id={IconId::LucideXCircle} width={"20"} height={"20"} />
            </span>
            {content}
        </div>
    }
}
