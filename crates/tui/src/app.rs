use std::{io, panic, sync::Arc, thread, time::Duration};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::{spawn, sync::mpsc, time::sleep};
use tracing::{error, info};

use ecotrip_core::{
    calculator::BASELINE_MODE, AppConfig, Calculator, ComparisonEntry, CreditPriceEstimate,
    RouteTable, SavingsResult,
};

use crate::format::{format_currency, format_number};

const TICK_RATE: Duration = Duration::from_millis(250);
const MAX_FIELD_LEN: usize = 64;
const MAX_SUGGESTIONS: usize = 6;
const BAR_SPAN_PCT: f64 = 200.0;

#[derive(Debug, Clone)]
struct Theme {
    text: Color,
    muted: Color,
    accent: Color,
    accent_alt: Color,
    warning: Color,
    orange: Color,
    danger: Color,
    on_accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // palette lifted from the original stylesheet
        Self {
            text: Color::White,
            muted: Color::DarkGray,
            accent: Color::Rgb(16, 185, 129),
            accent_alt: Color::Rgb(5, 150, 105),
            warning: Color::Rgb(245, 158, 11),
            orange: Color::Rgb(249, 115, 22),
            danger: Color::Rgb(239, 68, 68),
            on_accent: Color::Black,
        }
    }
}

impl Theme {
    /// Band color for a comparison percentage, same thresholds as the
    /// original bar chart.
    fn bar_color(&self, pct: f64) -> Color {
        if pct <= 25.0 {
            self.accent
        } else if pct <= 75.0 {
            self.warning
        } else if pct <= 100.0 {
            self.orange
        } else {
            self.danger
        }
    }
}

/// Single-line text input with a char-indexed cursor.
#[derive(Debug, Clone, Default)]
struct FieldInput {
    value: String,
    cursor: usize,
}

impl FieldInput {
    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(index, _)| index)
            .unwrap_or(self.value.len())
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn insert(&mut self, ch: char) {
        if ch.is_control() || self.char_count() >= MAX_FIELD_LEN {
            return;
        }
        let at = self.byte_index();
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index();
            self.value.remove(at);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index();
            self.value.remove(at);
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.char_count() as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, len) as usize;
    }

    fn move_home(&mut self) {
        self.cursor = 0;
    }

    fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.char_count();
    }

    fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Origin,
    Destination,
    Distance,
    Mode,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Origin => Focus::Destination,
            Focus::Destination => Focus::Distance,
            Focus::Distance => Focus::Mode,
            Focus::Mode => Focus::Origin,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Origin => Focus::Mode,
            Focus::Destination => Focus::Origin,
            Focus::Distance => Focus::Destination,
            Focus::Mode => Focus::Distance,
        }
    }
}

/// State of the helper line under the distance field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DistanceHelper {
    Auto,
    Found,
    NotFound,
    Manual,
}

impl DistanceHelper {
    fn message(self) -> &'static str {
        match self {
            DistanceHelper::Auto => "Selecione origem e destino para preencher a distância.",
            DistanceHelper::Found => "Distância preenchida automaticamente a partir da rota.",
            DistanceHelper::NotFound => {
                "Distância não encontrada — ative o modo manual (F2) para preencher."
            }
            DistanceHelper::Manual => "Modo manual ativado — insira a distância em km.",
        }
    }
}

/// Everything the results pane needs for one submission.
#[derive(Debug, Clone)]
struct CalculationReport {
    origin: String,
    destination: String,
    distance_km: f64,
    mode: String,
    emission_kg: f64,
    savings: Option<SavingsResult>,
    comparison: Vec<ComparisonEntry>,
    credits_needed: f64,
    price: CreditPriceEstimate,
    computed_at: DateTime<Local>,
}

enum AppEvent {
    Input(Event),
    Tick,
    ResultsReady(Result<Box<CalculationReport>>),
}

/// Terminal front-end for the emission calculator.
pub struct EcotripApp {
    config: AppConfig,
    routes: RouteTable,
    calculator: Arc<Calculator>,
    focus: Focus,
    origin: FieldInput,
    destination: FieldInput,
    distance: FieldInput,
    manual_distance: bool,
    distance_helper: DistanceHelper,
    mode_cursor: usize,
    mode_selected: Option<usize>,
    calculating: bool,
    report: Option<Box<CalculationReport>>,
    status: Option<String>,
    event_tx: Option<mpsc::Sender<AppEvent>>,
    theme: Theme,
    should_quit: bool,
}

impl EcotripApp {
    pub fn new(config: AppConfig, routes: RouteTable, calculator: Calculator) -> Self {
        Self {
            config,
            routes,
            calculator: Arc::new(calculator),
            focus: Focus::Origin,
            origin: FieldInput::default(),
            destination: FieldInput::default(),
            distance: FieldInput::default(),
            manual_distance: false,
            distance_helper: DistanceHelper::Auto,
            mode_cursor: 0,
            mode_selected: None,
            calculating: false,
            report: None,
            status: None,
            event_tx: None,
            theme: Theme::default(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let (tx, mut rx) = mpsc::channel(32);
        self.event_tx = Some(tx.clone());
        thread::spawn(move || loop {
            if event::poll(TICK_RATE).unwrap_or(false) {
                match event::read() {
                    Ok(ev) => {
                        if tx.blocking_send(AppEvent::Input(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            } else if tx.blocking_send(AppEvent::Tick).is_err() {
                break;
            }
        });

        let result = self.event_loop(&mut terminal, &mut rx).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        rx: &mut mpsc::Receiver<AppEvent>,
    ) -> Result<()> {
        loop {
            terminal.draw(|frame| self.draw(frame))?;

            let Some(event) = rx.recv().await else {
                return Ok(());
            };
            match event {
                AppEvent::Input(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    self.handle_key(key);
                }
                AppEvent::Input(_) | AppEvent::Tick => {}
                AppEvent::ResultsReady(result) => self.finish_calculation(result),
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::F(2) => self.toggle_manual_distance(),
            KeyCode::Enter => self.submit(),
            KeyCode::Left => self.handle_left(),
            KeyCode::Right => self.handle_right(),
            KeyCode::Home => self.with_focused_field(FieldInput::move_home),
            KeyCode::End => self.with_focused_field(FieldInput::move_end),
            KeyCode::Backspace => self.edit_focused_field(FieldInput::backspace),
            KeyCode::Delete => self.edit_focused_field(FieldInput::delete),
            KeyCode::Char(ch) => self.handle_char(ch),
            _ => {}
        }
    }

    fn handle_left(&mut self) {
        if self.focus == Focus::Mode {
            self.move_mode_cursor(-1);
        } else {
            self.with_focused_field(|field| field.move_cursor(-1));
        }
    }

    fn handle_right(&mut self) {
        if self.focus == Focus::Mode {
            self.move_mode_cursor(1);
        } else {
            self.with_focused_field(|field| field.move_cursor(1));
        }
    }

    fn handle_char(&mut self, ch: char) {
        if self.focus == Focus::Mode {
            if let Some(index) = ch.to_digit(10).map(|d| d as usize) {
                if index >= 1 && index <= self.config.factors.entries().len() {
                    self.mode_cursor = index - 1;
                    self.mode_selected = Some(index - 1);
                }
            }
            return;
        }
        self.edit_focused_field(|field| field.insert(ch));
    }

    fn move_mode_cursor(&mut self, delta: isize) {
        let count = self.config.factors.entries().len();
        if count == 0 {
            return;
        }
        let next = (self.mode_cursor as isize + delta).rem_euclid(count as isize) as usize;
        self.mode_cursor = next;
        self.mode_selected = Some(next);
    }

    /// Apply a cursor movement to the focused text field.
    fn with_focused_field(&mut self, op: impl FnOnce(&mut FieldInput)) {
        match self.focus {
            Focus::Origin => op(&mut self.origin),
            Focus::Destination => op(&mut self.destination),
            Focus::Distance => op(&mut self.distance),
            Focus::Mode => {}
        }
    }

    /// Apply a content edit to the focused text field, re-running the
    /// distance autofill when a city changed. The distance field stays
    /// read-only outside manual mode, like the original form input.
    fn edit_focused_field(&mut self, op: impl FnOnce(&mut FieldInput)) {
        match self.focus {
            Focus::Origin => {
                op(&mut self.origin);
                self.try_autofill();
            }
            Focus::Destination => {
                op(&mut self.destination);
                self.try_autofill();
            }
            Focus::Distance if self.manual_distance => op(&mut self.distance),
            Focus::Distance | Focus::Mode => {}
        }
    }

    fn toggle_manual_distance(&mut self) {
        self.manual_distance = !self.manual_distance;
        if self.manual_distance {
            self.distance_helper = DistanceHelper::Manual;
        } else {
            self.try_autofill();
        }
    }

    fn try_autofill(&mut self) {
        if self.manual_distance {
            return;
        }

        let origin = self.origin.value.trim().to_string();
        let destination = self.destination.value.trim().to_string();
        if origin.is_empty() || destination.is_empty() {
            self.distance.clear();
            self.distance_helper = DistanceHelper::Auto;
            return;
        }

        match self.routes.find_distance(&origin, &destination) {
            Some(km) => {
                self.distance.set(format_km_input(km));
                self.distance_helper = DistanceHelper::Found;
            }
            None => {
                self.distance.clear();
                self.distance_helper = DistanceHelper::NotFound;
            }
        }
    }

    /// Validate the form and kick off a calculation. Validation happens
    /// here, before the core is invoked; the core itself never rejects.
    fn submit(&mut self) {
        let origin = self.origin.value.trim().to_string();
        if origin.is_empty() {
            self.status = Some("Por favor, informe a origem.".to_string());
            return;
        }

        let destination = self.destination.value.trim().to_string();
        if destination.is_empty() {
            self.status = Some("Por favor, informe o destino.".to_string());
            return;
        }

        let distance = parse_distance(&self.distance.value);
        if !distance.is_finite() || distance <= 0.0 {
            self.status = Some("Por favor, informe uma distância válida (> 0).".to_string());
            return;
        }

        let Some(selected) = self.mode_selected else {
            self.status = Some("Selecione um meio de transporte.".to_string());
            return;
        };
        let mode = match self.config.factors.entries().get(selected) {
            Some(entry) => entry.mode.clone(),
            None => {
                self.status = Some("Selecione um meio de transporte.".to_string());
                return;
            }
        };

        self.status = None;
        self.report = None;
        self.calculating = true;
        info!("calculating: {origin} → {destination}, {distance} km by {mode}");

        if let Some(tx) = self.event_tx.clone() {
            let calculator = Arc::clone(&self.calculator);
            let delay = Duration::from_millis(self.config.processing_delay_ms);
            spawn(async move {
                // simulated processing delay; has no bearing on the result
                sleep(delay).await;
                let outcome = panic::catch_unwind(panic::AssertUnwindSafe(|| {
                    build_report(&calculator, origin, destination, distance, mode)
                }))
                .unwrap_or_else(|_| Err(anyhow!("calculation panicked")));
                let _ = tx.send(AppEvent::ResultsReady(outcome.map(Box::new))).await;
            });
        }
    }

    fn finish_calculation(&mut self, result: Result<Box<CalculationReport>>) {
        self.calculating = false;
        match result {
            Ok(report) => {
                info!(
                    "emission computed: {} kg CO₂ for {} km by {}",
                    report.emission_kg, report.distance_km, report.mode
                );
                self.report = Some(report);
            }
            Err(err) => {
                error!("calculation failed: {err:#}");
                self.status = Some("Ocorreu um erro ao calcular. Tente novamente.".to_string());
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(12),
                Constraint::Length(1),
            ])
            .split(frame.size());

        self.draw_title(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(46), Constraint::Min(30)])
            .split(chunks[1]);
        self.draw_form(frame, body[0]);
        self.draw_results(frame, body[1]);

        self.draw_footer(frame, chunks[2]);
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                "🌱 ecotrip",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "  calculadora de emissão de CO₂",
                Style::default().fg(self.theme.muted),
            ),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, area);
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(3),
            ])
            .split(area);

        self.draw_text_field(frame, chunks[0], "Origem", &self.origin, Focus::Origin);
        self.draw_text_field(
            frame,
            chunks[1],
            "Destino",
            &self.destination,
            Focus::Destination,
        );

        let distance_title = if self.manual_distance {
            "Distância (km) — manual"
        } else {
            "Distância (km)"
        };
        self.draw_text_field(frame, chunks[2], distance_title, &self.distance, Focus::Distance);

        let helper_style = match self.distance_helper {
            DistanceHelper::NotFound => Style::default().fg(self.theme.danger),
            DistanceHelper::Found => Style::default().fg(self.theme.accent),
            _ => Style::default().fg(self.theme.muted),
        };
        let helper = Paragraph::new(self.distance_helper.message()).style(helper_style);
        frame.render_widget(helper, chunks[3]);

        self.draw_mode_selector(frame, chunks[4]);
        self.draw_suggestions(frame, chunks[5]);
    }

    fn draw_text_field(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        field: &FieldInput,
        focus: Focus,
    ) {
        let focused = self.focus == focus;
        let read_only = focus == Focus::Distance && !self.manual_distance;
        let border_style = if focused {
            Style::default().fg(self.theme.accent)
        } else {
            Style::default().fg(self.theme.muted)
        };
        let value_style = if read_only {
            Style::default().fg(self.theme.muted)
        } else {
            Style::default().fg(self.theme.text)
        };

        let widget = Paragraph::new(field.value.as_str()).style(value_style).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        );
        frame.render_widget(widget, area);

        if focused && !read_only {
            let x = area.x + 1 + field.cursor.min(area.width.saturating_sub(2) as usize) as u16;
            frame.set_cursor(x, area.y + 1);
        }
    }

    fn draw_mode_selector(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Mode;
        let mut spans = Vec::new();
        for (index, entry) in self.config.factors.entries().iter().enumerate() {
            let icon = entry.icon.as_deref().unwrap_or("");
            let label = entry.label.as_deref().unwrap_or(&entry.mode);
            let text = format!(" {icon} {label} ");

            let mut style = Style::default().fg(self.theme.text);
            if self.mode_selected == Some(index) {
                style = Style::default()
                    .fg(self.theme.on_accent)
                    .bg(self.theme.accent);
            }
            if focused && self.mode_cursor == index {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            spans.push(Span::styled(text, style));
            spans.push(Span::raw(" "));
        }

        let border_style = if focused {
            Style::default().fg(self.theme.accent)
        } else {
            Style::default().fg(self.theme.muted)
        };
        let widget = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title("Meio de transporte"),
        );
        frame.render_widget(widget, area);
    }

    fn draw_suggestions(&self, frame: &mut Frame, area: Rect) {
        let query = match self.focus {
            Focus::Origin => Some(self.origin.value.as_str()),
            Focus::Destination => Some(self.destination.value.as_str()),
            _ => None,
        };
        let Some(query) = query else {
            return;
        };

        let items: Vec<ListItem> = self
            .routes
            .cities_matching(query)
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|city| ListItem::new(city).style(Style::default().fg(self.theme.muted)))
            .collect();
        if items.is_empty() {
            return;
        }

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.muted))
                .title("Cidades"),
        );
        frame.render_widget(list, area);
    }

    fn draw_results(&self, frame: &mut Frame, area: Rect) {
        if self.calculating {
            let widget = Paragraph::new("⏳ Calculando...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(self.theme.warning))
                .block(Block::default().borders(Borders::ALL).title("Resultados"));
            frame.render_widget(widget, area);
            return;
        }

        let Some(report) = self.report.as_deref() else {
            let widget =
                Paragraph::new("Preencha o formulário e pressione Enter para calcular.")
                    .style(Style::default().fg(self.theme.muted))
                    .wrap(Wrap { trim: true })
                    .block(Block::default().borders(Borders::ALL).title("Resultados"));
            frame.render_widget(widget, area);
            return;
        };

        let title = format!("Resultados — {}", report.computed_at.format("%H:%M:%S"));
        let outer = Block::default().borders(Borders::ALL).title(title);
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),
                Constraint::Min(6),
                Constraint::Length(4),
            ])
            .split(inner);

        self.draw_summary(frame, sections[0], report);
        self.draw_comparison(frame, sections[1], report);
        self.draw_credits(frame, sections[2], report);
    }

    fn draw_summary(&self, frame: &mut Frame, area: Rect, report: &CalculationReport) {
        let factors = &self.config.factors;
        let icon = factors.icon(&report.mode).unwrap_or("");
        let label = factors.label(&report.mode);

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Rota       ", Style::default().fg(self.theme.muted)),
                Span::styled(
                    format!("{} → {}", report.origin, report.destination),
                    Style::default().fg(self.theme.text),
                ),
            ]),
            Line::from(vec![
                Span::styled("Distância  ", Style::default().fg(self.theme.muted)),
                Span::raw(format!("{} km", format_number(report.distance_km, 0))),
            ]),
            Line::from(vec![
                Span::styled("Transporte ", Style::default().fg(self.theme.muted)),
                Span::raw(format!("{icon} {label}")),
            ]),
            Line::from(vec![
                Span::styled("Emissão    ", Style::default().fg(self.theme.muted)),
                Span::styled(
                    format!("🍃 {} kg CO₂", format_number(report.emission_kg, 2)),
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        // the savings row is meaningless when the baseline itself was chosen
        if report.mode != BASELINE_MODE {
            if let Some(savings) = &report.savings {
                let percentage = savings
                    .percentage
                    .map(|pct| format!("{}%", format_number(pct, 2)))
                    .unwrap_or_else(|| "-".to_string());
                let style = if savings.saved_kg < 0.0 {
                    Style::default().fg(self.theme.danger)
                } else {
                    Style::default().fg(self.theme.accent_alt)
                };
                lines.push(Line::from(vec![
                    Span::styled("Economia   ", Style::default().fg(self.theme.muted)),
                    Span::styled(
                        format!(
                            "{} kg vs carro ({percentage})",
                            format_number(savings.saved_kg, 2)
                        ),
                        style,
                    ),
                ]));
            }
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_comparison(&self, frame: &mut Frame, area: Rect, report: &CalculationReport) {
        let block = Block::default()
            .borders(Borders::TOP)
            .title("Comparação entre modos");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let bar_width = inner.width.saturating_sub(34).max(10) as usize;
        let mut lines = Vec::new();
        for entry in &report.comparison {
            lines.push(self.comparison_line(entry, &report.mode, bar_width));
        }
        lines.push(Line::from(Span::styled(
            "Dica: modos mais leves em emissões reduzem seu impacto.",
            Style::default().fg(self.theme.muted),
        )));

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn comparison_line(
        &self,
        entry: &ComparisonEntry,
        selected_mode: &str,
        bar_width: usize,
    ) -> Line<'static> {
        let factors = &self.config.factors;
        let icon = factors.icon(&entry.mode).unwrap_or("").to_string();
        let label = factors.label(&entry.mode).to_string();

        let pct_text = entry
            .percentage_vs_car
            .map(|pct| format!("{}%", format_number(pct, 2)))
            .unwrap_or_else(|| "-".to_string());
        let pct = entry.percentage_vs_car.unwrap_or(0.0).max(0.0);
        let filled =
            ((pct.min(BAR_SPAN_PCT) / BAR_SPAN_PCT) * bar_width as f64).round() as usize;
        let bar: String = "█".repeat(filled);

        let selected = entry.mode == selected_mode;
        let label_style = if selected {
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.text)
        };

        let mut spans = vec![
            Span::styled(format!("{icon} {label:<10}"), label_style),
            Span::raw(format!(
                "{:>10} kg  {:>8}  ",
                format_number(entry.emission_kg, 2),
                pct_text
            )),
            Span::styled(bar, Style::default().fg(self.theme.bar_color(pct))),
        ];
        if selected {
            spans.push(Span::styled(
                " ● selecionado",
                Style::default().fg(self.theme.accent),
            ));
        }
        Line::from(spans)
    }

    fn draw_credits(&self, frame: &mut Frame, area: Rect, report: &CalculationReport) {
        let block = Block::default()
            .borders(Borders::TOP)
            .title("Créditos de carbono");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let kg_per_credit = self.config.carbon_credit.kg_per_credit;
        let lines = vec![
            Line::from(vec![
                Span::styled("Créditos necessários: ", Style::default().fg(self.theme.muted)),
                Span::styled(
                    format_number(report.credits_needed, 2),
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  (1 crédito = {} kg CO₂)", format_number(kg_per_credit, 0)),
                    Style::default().fg(self.theme.muted),
                ),
            ]),
            Line::from(vec![
                Span::styled("Estimativa (média):   ", Style::default().fg(self.theme.muted)),
                Span::styled(
                    format_currency(report.price.average),
                    Style::default().fg(self.theme.accent_alt),
                ),
                Span::styled(
                    format!(
                        "  faixa: {} – {}",
                        format_currency(report.price.min),
                        format_currency(report.price.max)
                    ),
                    Style::default().fg(self.theme.muted),
                ),
            ]),
        ];

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let widget = match &self.status {
            Some(status) => Paragraph::new(status.as_str())
                .style(Style::default().fg(self.theme.danger)),
            None => Paragraph::new(
                "Tab: campo · ←/→: transporte · F2: distância manual · Enter: calcular · Esc: sair",
            )
            .style(Style::default().fg(self.theme.muted)),
        };
        frame.render_widget(widget, area);
    }
}

/// Build the full result set for one submission. Pure: the injected
/// calculator and the already-validated inputs fully determine it.
fn build_report(
    calculator: &Calculator,
    origin: String,
    destination: String,
    distance_km: f64,
    mode: String,
) -> Result<CalculationReport> {
    let emission_kg = calculator
        .calculate_emission(distance_km, &mode)
        .ok_or_else(|| anyhow!("transport mode '{mode}' missing from the factor table"))?;

    let savings = calculator
        .calculate_emission(distance_km, BASELINE_MODE)
        .map(|baseline| calculator.calculate_savings(emission_kg, baseline));

    let comparison = calculator.calculate_all_modes(distance_km);
    let credits_needed = calculator.credits_needed(emission_kg);
    let price = calculator.estimate_credit_price(credits_needed);

    Ok(CalculationReport {
        origin,
        destination,
        distance_km,
        mode,
        emission_kg,
        savings,
        comparison,
        credits_needed,
        price,
        computed_at: Local::now(),
    })
}

/// Coerce raw distance input to a number; both decimal separators are
/// accepted, anything else counts as zero.
fn parse_distance(raw: &str) -> f64 {
    raw.trim().replace(',', ".").parse::<f64>().unwrap_or(0.0)
}

/// Render a looked-up distance back into the input field without a
/// trailing `.0` for whole kilometres.
fn format_km_input(km: f64) -> String {
    if km.fract() == 0.0 {
        format!("{km:.0}")
    } else {
        km.to_string()
    }
}
