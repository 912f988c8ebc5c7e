use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::league::{find_weekly_loser, race_standings, time_left, TimeLeft};
use crate::projection::{project_season, win_model::remaining_games, SeasonParams};
use crate::sleeper::{fetch_snapshot, season, FetchError, LeagueProvider};
use crate::wheel::{SpinResult, Wheel};

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn LeagueProvider>,
    pub wheel: Wheel,
    pub season: SeasonParams,
    /// Overrides the calendar-derived week when set
    pub fixed_week: Option<u32>,
    pub lookahead_weeks: u32,
    pub race_season_weeks: u32,
    pub race_emojis: HashMap<String, String>,
    pub countdown_target: Option<NaiveDateTime>,
}

impl AppState {
    fn current_week(&self) -> u32 {
        self.fixed_week.unwrap_or_else(season::current_week)
    }

    fn last_fetched_week(&self, current_week: u32) -> u32 {
        current_week
            .saturating_add(self.lookahead_weeks)
            .min(self.season.total_regular_season_weeks.max(current_week))
    }
}

type ApiError = (StatusCode, String);

fn upstream(err: FetchError) -> ApiError {
    warn!("Upstream fetch failed: {}", err);
    (StatusCode::BAD_GATEWAY, err.to_string())
}

/// Build the Axum router for the dashboard.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/week", get(week_handler))
        .route("/api/predictions", get(predictions_handler))
        .route("/api/horse-race", get(horse_race_handler))
        .route("/api/loser", get(loser_handler))
        .route("/api/countdown", get(countdown_handler))
        .route("/api/schedule", get(schedule_handler))
        .route("/api/wheel", get(wheel_handler))
        .route("/api/wheel/spin", post(spin_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

async fn index_handler() -> impl IntoResponse {
    Html(DASHBOARD_HTML)
}

#[derive(Serialize)]
struct WeekInfo {
    current_week: u32,
    regular_season_weeks: u32,
    remaining_games: u32,
}

/// GET /api/week
async fn week_handler(State(state): State<Arc<AppState>>) -> Json<WeekInfo> {
    let week = state.current_week();
    Json(WeekInfo {
        current_week: week,
        regular_season_weeks: state.season.total_regular_season_weeks,
        remaining_games: remaining_games(state.season.total_regular_season_weeks, week),
    })
}

/// GET /api/predictions
async fn predictions_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let week = state.current_week();
    let snapshot = fetch_snapshot(state.provider.as_ref(), week, state.last_fetched_week(week))
        .await
        .map_err(upstream)?;
    Ok(Json(project_season(&snapshot, state.season)))
}

/// GET /api/horse-race
async fn horse_race_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let (users, rosters) = tokio::try_join!(state.provider.users(), state.provider.rosters())
        .map_err(upstream)?;
    Ok(Json(race_standings(
        &users,
        &rosters,
        &state.race_emojis,
        state.race_season_weeks,
    )))
}

/// GET /api/loser
async fn loser_handler(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let week = state.current_week();
    let (matchups, rosters) =
        tokio::try_join!(state.provider.matchups(week), state.provider.rosters())
            .map_err(upstream)?;
    match find_weekly_loser(state.provider.as_ref(), week, &matchups, &rosters)
        .await
        .map_err(upstream)?
    {
        Some(loser) => Ok(Json(loser)),
        None => Err((StatusCode::NOT_FOUND, format!("No loser yet for week {}", week))),
    }
}

/// GET /api/schedule
async fn schedule_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let schedule = state.provider.schedule().await.map_err(upstream)?;
    Ok(Json(schedule))
}

#[derive(Serialize)]
struct Countdown {
    target: Option<NaiveDateTime>,
    time_left: Option<TimeLeft>,
}

/// GET /api/countdown
async fn countdown_handler(State(state): State<Arc<AppState>>) -> Json<Countdown> {
    let now = Local::now().naive_local();
    Json(Countdown {
        target: state.countdown_target,
        time_left: state.countdown_target.and_then(|t| time_left(t, now)),
    })
}

#[derive(Serialize)]
struct WheelInfo {
    options: Vec<String>,
    pending_draw: bool,
    stored_punishment: Option<String>,
    last_spin: Option<SpinResult>,
}

/// GET /api/wheel
async fn wheel_handler(State(state): State<Arc<AppState>>) -> Json<WheelInfo> {
    let wheel = &state.wheel;
    let (pending_draw, stored_punishment, last_spin) = tokio::join!(
        wheel.has_pending_draw(),
        wheel.stored_punishment(),
        wheel.last_spin()
    );
    Json(WheelInfo {
        options: wheel.options().to_vec(),
        pending_draw,
        stored_punishment,
        last_spin,
    })
}

/// POST /api/wheel/spin
async fn spin_handler(State(state): State<Arc<AppState>>) -> Json<SpinResult> {
    Json(state.wheel.spin().await)
}

/// Embedded single-file dashboard (HTML + CSS + JS)
const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Fantasy League Hub</title>
<style>
  :root {
    --bg: #121212;
    --card: #1e1e1e;
    --border: #2c2c2c;
    --accent: #bb86fc;
    --green: #00c896;
    --red: #ff4f6a;
    --text: #e0e0e0;
    --muted: #8888aa;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { display: flex; align-items: center; gap: 1rem; padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  .badge { padding: .2rem .6rem; border-radius: 4px; font-size: .75rem; font-weight: 700; background: var(--accent); color: #000; }
  main { padding: 1.5rem 2rem; display: grid; gap: 1.5rem; }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; overflow: hidden; }
  .panel-header { padding: .9rem 1.2rem; border-bottom: 1px solid var(--border); font-weight: 600; display: flex; justify-content: space-between; align-items: center; }
  .panel-body { padding: 1rem 1.2rem; }
  table { width: 100%; border-collapse: collapse; }
  th { padding: .7rem 1rem; text-align: left; font-size: .75rem; text-transform: uppercase; color: var(--muted); border-bottom: 1px solid var(--border); }
  td { padding: .65rem 1rem; font-size: .88rem; border-bottom: 1px solid #262626; }
  tr:last-child td { border-bottom: none; }
  .two-col { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
  @media (max-width: 768px) { .two-col { grid-template-columns: 1fr; } }
  .bar-row { display: grid; grid-template-columns: 140px 1fr 60px; gap: .6rem; align-items: center; margin: .3rem 0; font-size: .85rem; }
  .bar { height: 14px; background: rgba(187,134,252,.6); border: 1px solid var(--accent); border-radius: 3px; }
  .lane { position: relative; height: 36px; border-bottom: 1px solid var(--border); }
  .lane .name { position: absolute; left: 6px; top: 9px; font-size: .8rem; color: var(--muted); }
  .lane .runner { position: absolute; top: 2px; font-size: 1.6rem; transition: left 1s; }
  .finish { position: absolute; top: 0; bottom: 0; right: 8%; border-left: 2px dashed var(--muted); }
  .loser { display: flex; align-items: center; gap: 1rem; font-size: 1.2rem; }
  .loser img { width: 64px; height: 64px; border-radius: 50%; }
  .wheel-options { display: flex; flex-wrap: wrap; gap: .4rem; margin-bottom: 1rem; }
  .pill { display: inline-block; padding: .2rem .6rem; border-radius: 20px; font-size: .8rem; background: rgba(187,134,252,.15); color: var(--accent); }
  .pill.hit { background: var(--red); color: #000; font-weight: 700; }
  .punishment { font-size: 1.4rem; font-weight: 700; color: var(--red); }
  .empty { color: var(--muted); text-align: center; padding: 2rem; font-size: .9rem; }
  button { background: none; border: 1px solid var(--border); color: var(--muted); padding: .3rem .8rem; border-radius: 6px; cursor: pointer; font-size: .8rem; }
  button:hover { border-color: var(--accent); color: var(--accent); }
</style>
</head>
<body>
<header>
  <h1>🏈 Fantasy League Hub</h1>
  <span class="badge" id="week-badge">Week …</span>
  <span style="margin-left:auto;color:var(--muted);font-size:.9rem;" id="countdown"></span>
</header>

<main>
  <div class="panel">
    <div class="panel-header">Team Projections <button onclick="loadAll()">↻ Refresh</button></div>
    <table>
      <thead><tr><th>Team</th><th>Div</th><th>Record</th><th>PF</th><th>Proj. Wins</th><th>Playoff</th><th>Super Bowl</th><th>Perceived Strength</th></tr></thead>
      <tbody id="predictions-tbody"><tr><td colspan="8" class="empty">Loading predictions…</td></tr></tbody>
    </table>
  </div>

  <div class="two-col">
    <div class="panel"><div class="panel-header">Playoff Chances</div><div class="panel-body" id="playoff-bars"></div></div>
    <div class="panel"><div class="panel-header">Super Bowl Chances</div><div class="panel-body" id="sb-bars"></div></div>
  </div>

  <div class="panel">
    <div class="panel-header">Horse Race</div>
    <div class="panel-body" id="race"><div class="empty">Loading horse race…</div></div>
  </div>

  <div class="two-col">
    <div class="panel">
      <div class="panel-header">Lowest Scoring Team of The Week</div>
      <div class="panel-body" id="loser"><div class="empty">Loading…</div></div>
    </div>
    <div class="panel">
      <div class="panel-header">Wheel of Squeal <button onclick="spin()">Spin</button></div>
      <div class="panel-body">
        <div class="wheel-options" id="wheel-options"></div>
        <div class="punishment" id="punishment"></div>
        <div style="color:var(--muted);font-size:.8rem;margin-top:.5rem;" id="wheel-note">Wheel spins right after MNF.</div>
      </div>
    </div>
  </div>
</main>

<script>
const pct = v => v.toFixed(2) + '%';
const esc = s => String(s).replace(/[&<>"]/g, c => ({'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;'}[c]));

function bars(el, rows, key) {
  const max = Math.max(100, ...rows.map(r => r[key]));
  el.innerHTML = rows.map(r => `<div class="bar-row">
    <span>${esc(r.name)}</span>
    <div class="bar" style="width:${(r[key] / max * 100).toFixed(1)}%"></div>
    <span>${pct(r[key])}</span>
  </div>`).join('');
}

async function loadWeek() {
  const r = await fetch('/api/week');
  if (!r.ok) return;
  const w = await r.json();
  document.getElementById('week-badge').textContent = 'Week ' + w.current_week;
}

async function loadPredictions() {
  const r = await fetch('/api/predictions');
  const tbody = document.getElementById('predictions-tbody');
  if (!r.ok) { tbody.innerHTML = '<tr><td colspan="8" class="empty">League data unavailable</td></tr>'; return; }
  const rows = await r.json();
  tbody.innerHTML = rows.map(p => `<tr>
    <td>${esc(p.name)}</td>
    <td>${p.division}</td>
    <td>${p.wins}-${p.losses}${p.ties ? '-' + p.ties : ''}</td>
    <td>${p.points_for.toFixed(2)}</td>
    <td>${p.projected_wins.toFixed(2)}</td>
    <td>${pct(p.playoff_chance)}</td>
    <td>${pct(p.championship_chance)}</td>
    <td>${p.perceived_strength.toFixed(2)}</td>
  </tr>`).join('');
  bars(document.getElementById('playoff-bars'), rows, 'playoff_chance');
  bars(document.getElementById('sb-bars'), rows.slice().sort((a, b) => b.championship_chance - a.championship_chance), 'championship_chance');
}

async function loadRace() {
  const r = await fetch('/api/horse-race');
  const el = document.getElementById('race');
  if (!r.ok) { el.innerHTML = '<div class="empty">League data unavailable</div>'; return; }
  const runners = await r.json();
  el.innerHTML = '<div style="position:relative">' + runners.map(t => `<div class="lane">
    <span class="name">${esc(t.name)} (${t.wins})</span>
    <span class="runner" style="left:calc(${(t.progress * 88).toFixed(1)}% - 1.6rem + 120px * ${(1 - t.progress).toFixed(3)})">${t.emoji}</span>
  </div>`).join('') + '<div class="finish"></div></div>';
}

async function loadLoser() {
  const r = await fetch('/api/loser');
  const el = document.getElementById('loser');
  if (!r.ok) { el.innerHTML = '<div class="empty">No loser yet</div>'; return; }
  const l = await r.json();
  const img = l.avatar_url ? `<img src="${esc(l.avatar_url)}" alt="${esc(l.name)}">` : '';
  el.innerHTML = `<div class="loser">🤣👉 ${img}<span>${esc(l.name)}<br><small style="color:var(--muted)">${l.points.toFixed(2)} pts</small></span> 👈🤣</div>`;
}

function renderWheel(options, hit) {
  document.getElementById('wheel-options').innerHTML = options
    .map((o, i) => `<span class="pill ${i === hit ? 'hit' : ''}">${esc(o)}</span>`).join('');
}

async function loadWheel() {
  const r = await fetch('/api/wheel');
  if (!r.ok) return;
  const w = await r.json();
  const hit = w.last_spin ? w.last_spin.index : -1;
  renderWheel(w.options, hit);
  const shown = w.last_spin ? w.last_spin.punishment : w.stored_punishment;
  document.getElementById('punishment').textContent = shown || '';
}

async function spin() {
  const r = await fetch('/api/wheel/spin', { method: 'POST' });
  if (!r.ok) return;
  await r.json();
  loadWheel();
}

async function loadCountdown() {
  const r = await fetch('/api/countdown');
  if (!r.ok) return;
  const c = await r.json();
  const el = document.getElementById('countdown');
  if (!c.target) { el.textContent = ''; return; }
  const t = c.time_left;
  el.textContent = t ? `${t.days}d ${t.hours}h ${t.minutes}m ${t.seconds}s` : "Time's up!";
}

async function loadAll() {
  await Promise.all([loadWeek(), loadPredictions(), loadRace(), loadLoser(), loadWheel()]);
}

loadAll();
loadCountdown();
setInterval(loadCountdown, 1000);
setInterval(loadWheel, 10000);
</script>
</body>
</html>"#;
