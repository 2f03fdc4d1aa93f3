use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};

use crate::app::{App, MenuItem};
use crate::components::field::FieldView;
use crate::components::gauge::ProbabilityBar;
use crate::state::game_clock::{GameSituation, Possession, format_clock};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use coach_api::FourthDownCall;

static TABS: &[&str; 3] = &["Field", "Advice", "Scenarios"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    terminal
        .draw(|f| {
            layout.update(f.area(), app.settings.full_screen);

            if !app.settings.full_screen {
                draw_tabs(f, layout.tab_bar, app);
            }

            match app.state.active_tab {
                MenuItem::Field => draw_field(f, layout.main, app),
                MenuItem::Advice => draw_advice(f, layout.main, app),
                MenuItem::Scenarios => draw_scenarios(f, layout.main, app),
                MenuItem::Help => draw_help(f, layout.main),
            }

            if !app.settings.full_screen {
                draw_status_bar(f, layout.status_bar, app);
            }

            if app.state.show_logs {
                draw_logs(f, layout.main);
            }

            draw_loading_spinner(f, f.area(), app, loading);
        })
        .unwrap();
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Field => 0,
        MenuItem::Advice => 1,
        MenuItem::Scenarios => 2,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

// ---------------------------------------------------------------------------
// Status bar — always-visible clock strip
// ---------------------------------------------------------------------------

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    if area.height == 0 {
        return;
    }
    let s = app.state.clock.situation();

    let clock_style = if s.clock_running {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red)
    };
    let run_marker = if s.clock_running { "RUN" } else { "STOP" };

    let mut spans = vec![
        Span::styled(format!(" {} ", quarter_label(s.qtr)), Style::default().fg(Color::White)),
        Span::styled(format_clock(s.clock_seconds), clock_style),
        Span::styled(format!(" {run_marker} "), clock_style),
        Span::styled(
            format!("| play {:02} ", s.play_clock_seconds),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("| KC {} - {} BUF ", s.score_home, s.score_away),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("| {} ball ", s.possession.label()),
            Style::default().fg(Color::Gray),
        ),
    ];

    if s.red_zone() {
        spans.push(Span::styled("RED ZONE ", Style::default().fg(Color::Red)));
    }
    if s.goal_to_go() {
        spans.push(Span::styled("GOAL TO GO ", Style::default().fg(Color::Yellow)));
    }
    if s.two_min_drill() {
        spans.push(Span::styled("2-MIN ", Style::default().fg(Color::Magenta)));
    }
    if app.state.clock.demo_active() {
        spans.push(Span::styled("DEMO ", Style::default().fg(Color::Cyan)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn quarter_label(qtr: u8) -> &'static str {
    match qtr {
        1 => "Q1",
        2 => "Q2",
        3 => "Q3",
        4 => "Q4",
        _ => "OT",
    }
}

// ---------------------------------------------------------------------------
// Field tab
// ---------------------------------------------------------------------------

fn draw_field(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Field ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut field_area = inner;
    let mut feed_area: Option<Rect> = None;
    if inner.width >= 90 {
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(68), Constraint::Percentage(32)])
                .areas(inner);
        field_area = left;
        feed_area = Some(right);
    } else if inner.height >= 16 {
        let [top, bottom] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(7)]).areas(inner);
        field_area = top;
        feed_area = Some(bottom);
    }

    let [detail_area, key_legend, canvas] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(field_area);

    let s = app.state.clock.situation();
    f.render_widget(Paragraph::new(situation_lines(s)), detail_area);
    f.render_widget(
        Paragraph::new(
            "Keys: ↑/↓=ball  ←/→=distance  n=down  b=qtr  [/]=clock  m=possession  g/t=score  o=timeout",
        )
        .style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    f.render_widget(
        FieldView {
            yard_line: s.yard_line,
            distance: s.distance,
            down: s.down,
            possession: s.possession,
            red_zone: s.red_zone(),
            goal_to_go: s.goal_to_go(),
        },
        canvas,
    );

    if let Some(feed) = feed_area {
        draw_feed_panel(f, feed, app);
    }
}

fn situation_lines(s: &GameSituation) -> Vec<Line<'static>> {
    let possession_team = match s.possession {
        Possession::Home => "KC",
        Possession::Away => "BUF",
    };
    vec![
        Line::from(vec![
            Span::styled("Situation  ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{} & {} at the {}", s.down, s.distance, s.yard_line),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Clock      ", Style::default().fg(Color::Gray)),
            Span::raw(format!(
                "{} {}  |  play clock {:02}",
                quarter_label(s.qtr),
                format_clock(s.clock_seconds),
                s.play_clock_seconds
            )),
        ]),
        Line::from(vec![
            Span::styled("Possession ", Style::default().fg(Color::Gray)),
            Span::raw(format!(
                "{possession_team}  |  timeouts KC {} / BUF {}",
                s.timeouts_home, s.timeouts_away
            )),
        ]),
        Line::from(vec![
            Span::styled("Score      ", Style::default().fg(Color::Gray)),
            Span::raw(format!("KC {} - {} BUF", s.score_home, s.score_away)),
        ]),
    ]
}

fn draw_feed_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" Position Feed ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let status = if app.state.feed.connected { "online" } else { "offline" };
    let mut lines = vec![
        Line::from(vec![
            Span::styled("spotter ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                status,
                Style::default().fg(if app.state.feed.connected {
                    Color::Green
                } else {
                    Color::Red
                }),
            ),
        ]),
        Line::from(""),
    ];

    if app.state.feed.plays.is_empty() {
        lines.push(Line::from(Span::styled(
            "No plays yet. Set COACHTUI_FEED_WS for a remote spotter.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let max_plays = inner.height.saturating_sub(2) as usize;
    for play in app.state.feed.plays.iter().rev().take(max_plays) {
        let text = format!("{} {}", play.received_at, play.description);
        let clipped: String = text
            .chars()
            .take(inner.width.saturating_sub(1) as usize)
            .collect();
        lines.push(Line::from(Span::styled(clipped, Style::default().fg(Color::White))));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Advice tab
// ---------------------------------------------------------------------------

fn draw_advice(f: &mut Frame, area: Rect, app: &App) {
    let title = match app.state.advice.last_updated.as_deref() {
        Some(at) => format!(" Coach Advice (updated {at}) "),
        None => " Coach Advice ".to_string(),
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [status_area, fourth_area, offense_area, defense_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Fill(1),
    ])
    .areas(inner);

    draw_service_status(f, status_area, app);
    draw_fourth_down_panel(f, fourth_area, app);
    draw_offense_panel(f, offense_area, app);
    draw_defense_panel(f, defense_area, app);
}

fn draw_service_status(f: &mut Frame, area: Rect, app: &App) {
    let advice = &app.state.advice;
    let line = if advice.service_online {
        Line::from(vec![
            Span::styled("models ", Style::default().fg(Color::DarkGray)),
            Span::styled(advice.models.join(", "), Style::default().fg(Color::Green)),
        ])
    } else if let Some(err) = app.state.last_error.as_deref() {
        Line::from(Span::styled(
            format!("service unavailable: {err}"),
            Style::default().fg(Color::Red),
        ))
    } else {
        Line::from(Span::styled(
            "Press r to request predictions",
            Style::default().fg(Color::DarkGray),
        ))
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_fourth_down_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" 4th Down ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(advice) = app.state.advice.fourth_down.as_ref() else {
        f.render_widget(
            Paragraph::new("No recommendation yet")
                .style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    };

    let call_color = match advice.call {
        FourthDownCall::Go => Color::Green,
        FourthDownCall::PuntOrKick => Color::Yellow,
    };
    let [call_area, conv_area, fg_area, epa_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            advice.call.label(),
            Style::default().fg(call_color).add_modifier(Modifier::BOLD),
        ))),
        call_area,
    );
    f.render_widget(
        ProbabilityBar { label: "conversion", value: advice.conversion_probability, color: Color::Green },
        conv_area,
    );
    f.render_widget(
        ProbabilityBar { label: "field goal", value: advice.fg_probability, color: Color::Yellow },
        fg_area,
    );
    f.render_widget(
        Paragraph::new(format!(
            "expected EPA {:+.2}  |  win probability {:.0}%",
            advice.expected_epa,
            advice.win_probability * 100.0
        ))
        .style(Style::default().fg(Color::Gray)),
        epa_area,
    );
}

fn draw_offense_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" Offensive Play Call ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(advice) = app.state.advice.offensive.as_ref() else {
        f.render_widget(
            Paragraph::new("No play call yet").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    };

    if inner.height == 0 {
        return;
    }
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            advice.play_call.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))),
        Rect::new(inner.x, inner.y, inner.width, 1),
    );

    for (idx, (play, prob)) in advice.probabilities.iter().enumerate() {
        let y = inner.y + 1 + idx as u16;
        if y >= inner.y + inner.height {
            break;
        }
        let color = if play == &advice.play_call { Color::Cyan } else { Color::DarkGray };
        f.render_widget(
            ProbabilityBar { label: play, value: *prob, color },
            Rect::new(inner.x, y, inner.width, 1),
        );
    }
}

fn draw_defense_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" Defensive Alignment ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(advice) = app.state.advice.defensive.as_ref() else {
        f.render_widget(
            Paragraph::new("No alignment yet").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    };

    if inner.height == 0 {
        return;
    }
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            advice.call.label(),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ))),
        Rect::new(inner.x, inner.y, inner.width, 1),
    );
    if inner.height > 1 {
        f.render_widget(
            ProbabilityBar {
                label: "pass lean",
                value: advice.pass_probability,
                color: Color::Magenta,
            },
            Rect::new(inner.x, inner.y + 1, inner.width, 1),
        );
    }
}

// ---------------------------------------------------------------------------
// Scenarios tab
// ---------------------------------------------------------------------------

fn draw_scenarios(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Demo Scenarios ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.state.catalog.scenarios.is_empty() {
        let msg = if let Some(err) = app.state.last_error.as_deref() {
            format!("Scenario load failed:\n{err}")
        } else {
            "Loading scenario catalog...".to_string()
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let [list_area, detail_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(8)]).areas(inner);

    let mut lines = Vec::with_capacity(app.state.catalog.scenarios.len() + 2);
    lines.push(Line::from(Span::styled(
        "j/k to move, Enter to load, d to run demo playback",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    for (idx, scenario) in app.state.catalog.scenarios.iter().enumerate() {
        let marker = if idx == app.state.catalog.selected { ">" } else { " " };
        let style = if idx == app.state.catalog.selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(
            format!("{marker} {}  —  {}", scenario.title, scenario.description),
            style,
        )));
    }
    f.render_widget(Paragraph::new(lines), list_area);

    if let Some(scenario) = app.state.catalog.selected_scenario() {
        let detail_block = default_border(Color::DarkGray).title(format!(" {} ", scenario.id));
        let detail_inner = detail_block.inner(detail_area);
        f.render_widget(detail_block, detail_area);

        let st = &scenario.state;
        let mut detail = vec![
            Line::from(format!(
                "{} & {} at the {}  |  {}  |  {} left in game",
                st.down,
                st.ydstogo,
                st.yardline_100,
                quarter_label(st.qtr),
                format_clock(st.game_seconds_remaining.min(900))
            )),
            Line::from(format!(
                "differential {:+}  |  timeouts {} vs {}",
                st.score_differential,
                st.posteam_timeouts_remaining,
                st.defteam_timeouts_remaining
            )),
        ];
        if let Some(expected) = scenario.expected.as_ref() {
            detail.push(Line::from(""));
            detail.push(Line::from(vec![
                Span::styled("expected: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!(
                        "{} ({}, {})",
                        expected.recommendation, expected.confidence, expected.win_prob_delta
                    ),
                    Style::default().fg(Color::Green),
                ),
            ]));
        }
        f.render_widget(Paragraph::new(detail), detail_inner);
    }
}

// ---------------------------------------------------------------------------
// Help + overlays
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = "q=quit  1=Field  2=Advice  3=Scenarios  ?=help  Esc=back\n\
        Space=start/stop clock  p=reset play clock  d=demo playback  r=refresh predictions\n\
        Field: ↑/↓=ball  ←/→=distance  n=down  b=quarter  [/]=clock ±15s  m=possession\n\
        Field: g=field goal  t=touchdown  o=timeout  w=save situation  e=restore situation\n\
        Scenarios: j/k=move  Enter=load scenario\n\
        f=full screen  \"=logs";
    f.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let [_, logs_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(10)]).areas(area);
    let widget = tui_logger::TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray));
    f.render_widget(widget, logs_area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
