//! Snapshot formatting for terminal output

use crate::align::{AlignedSeries, MomentumPoint, SentimentPoint};
use crate::api::{DriftSignal, SignalError, SignalKind};
use crate::engine::{DashboardState, Slot, Status};
use crate::quarter::same_quarter;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use std::fmt::Write;

const TITLE: &str = "Financial Narrative Drift Engine";
const ABSENT: &str = "—";

pub trait Formatter: Send + Sync {
    fn layout(&self) -> Layout;
    fn format_state(&self, state: &DashboardState) -> String;
    fn format_error(&self, error: &str) -> String;
    fn format_help(&self) -> String;
}

/// Available output layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Full dashboard with drift card and chart panels
    #[default]
    Terminal,
    /// One status line per snapshot
    Compact,
}

fn slot_line<T>(kind: SignalKind, slot: &Slot<T>, detail: impl FnOnce(&T) -> String) -> String {
    match slot {
        Slot::Pending => format!("  {kind:<11} … pending"),
        Slot::Loaded(value) => format!("  {kind:<11} ✓ {}", detail(value)),
        Slot::Failed(err) => format!("  {kind:<11} ✗ {}", err.summary()),
    }
}

fn failure_line(kind: SignalKind, err: Option<&SignalError>) -> String {
    match err {
        Some(err) => format!("  {kind}: {} error. {err}", err.category()),
        None => format!("  {kind}: still loading"),
    }
}

fn fmt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| ABSENT.to_string(), |v| format!("{v:+.1}%"))
}

fn fmt_num(value: Option<f64>) -> String {
    value.map_or_else(|| ABSENT.to_string(), |v| format!("{v:.2}"))
}

/// Quarter cell, marked when it is the drift snapshot's quarter
fn quarter_cell(quarter: &str, drift: Option<&DriftSignal>) -> String {
    match drift {
        Some(d) if same_quarter(&d.quarter, quarter) => format!("{quarter} ◆"),
        _ => quarter.to_string(),
    }
}

fn momentum_row(point: &MomentumPoint, drift: Option<&DriftSignal>) -> Vec<String> {
    vec![
        quarter_cell(&point.quarter, drift),
        fmt_pct(point.revenue_pct),
        fmt_pct(point.ocf_pct),
    ]
}

fn sentiment_row(point: &SentimentPoint, drift: Option<&DriftSignal>) -> Vec<String> {
    vec![
        quarter_cell(&point.quarter, drift),
        fmt_num(point.optimism),
        point
            .risk_mentions
            .map_or_else(|| ABSENT.to_string(), |r| r.to_string()),
    ]
}

fn panel(header: [&str; 3], rows: impl IntoIterator<Item = Vec<String>>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header.to_vec());
    for row in rows {
        table.add_row(row);
    }
    table
}

/// Full terminal dashboard
pub struct TerminalFormatter;

impl TerminalFormatter {
    fn drift_card(out: &mut String, state: &DashboardState) {
        match state.drift() {
            Slot::Loaded(drift) => {
                let _ = writeln!(out, "Drift Score: {:.2}  ({})", drift.drift_score, drift.quarter);
                let _ = writeln!(
                    out,
                    "  financial momentum {:.2} | narrative momentum {:.2}",
                    drift.financial_momentum, drift.narrative_momentum
                );
                let _ = writeln!(out, "  {}", drift.explanation);
            }
            Slot::Failed(err) => {
                let _ = writeln!(out, "Drift: unavailable ({})", err.summary());
            }
            Slot::Pending => {
                let _ = writeln!(out, "Drift: pending");
            }
        }
    }

    fn slots(out: &mut String, state: &DashboardState) {
        let _ = writeln!(
            out,
            "{}",
            slot_line(SignalKind::Financial, state.financial(), |f| {
                format!("{} quarters", f.len())
            })
        );
        let _ = writeln!(
            out,
            "{}",
            slot_line(SignalKind::Narrative, state.narrative(), |n| {
                format!("{} quarters", n.len())
            })
        );
        let _ = writeln!(
            out,
            "{}",
            slot_line(SignalKind::Drift, state.drift(), |d| d.quarter.clone())
        );
    }

    fn charts(out: &mut String, series: &AlignedSeries, drift: Option<&DriftSignal>) {
        let momentum = panel(
            ["Quarter", "Revenue growth", "OCF growth"],
            series.momentum_chart().iter().map(|p| momentum_row(p, drift)),
        );
        let sentiment = panel(
            ["Quarter", "Optimism", "Risk mentions"],
            series.sentiment_chart().iter().map(|p| sentiment_row(p, drift)),
        );

        let _ = writeln!(out, "\nFinancial Momentum (Revenue vs OCF)\n{momentum}");
        let _ = writeln!(out, "\nNarrative Sentiment (Optimism vs Risk)\n{sentiment}");
    }

    fn series(out: &mut String, state: &DashboardState) {
        if let Some(series) = state.series() {
            Self::charts(out, series, state.drift().value());
        }
    }

    fn updated(out: &mut String, state: &DashboardState) {
        if let Some(at) = state.updated_at() {
            let _ = writeln!(out, "Updated {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
        }
    }
}

impl Formatter for TerminalFormatter {
    fn layout(&self) -> Layout {
        Layout::Terminal
    }

    fn format_state(&self, state: &DashboardState) -> String {
        let mut out = String::new();
        let ticker = state.ticker().map_or("", |t| t.as_str());
        let _ = writeln!(out, "{TITLE}");
        let _ = writeln!(out, "{}", "=".repeat(TITLE.len()));

        match state.status() {
            Status::Idle => {
                let _ = writeln!(out, "Enter a ticker (e.g. MSFT) to begin.");
            }
            Status::Loading => {
                let _ = writeln!(out, "Analyzing {ticker}...");
            }
            Status::PartiallyLoaded => {
                let _ = writeln!(
                    out,
                    "{ticker}: {}/{} signals settled",
                    state.settled_count(),
                    SignalKind::ALL.len()
                );
                Self::slots(&mut out, state);
                Self::series(&mut out, state);
                Self::updated(&mut out, state);
            }
            Status::Ready => {
                let _ = writeln!(out, "{ticker}");
                Self::drift_card(&mut out, state);
                Self::series(&mut out, state);
                Self::updated(&mut out, state);
            }
            Status::Failed => {
                let _ = writeln!(out, "Could not load {ticker}. Missing signals:");
                for (kind, err) in state.missing() {
                    let _ = writeln!(out, "{}", failure_line(kind, err));
                }
                if let Some(err) = state.alignment_error() {
                    let _ = writeln!(out, "  alignment: {err}");
                }
                Self::updated(&mut out, state);
                let _ = writeln!(out, "Type /retry to try again.");
            }
        }
        out
    }

    fn format_error(&self, error: &str) -> String {
        format!("❌ Error: {error}")
    }

    fn format_help(&self) -> String {
        "Drift Dashboard Commands:\n\
        <ticker> - Load signals for a ticker (e.g. MSFT)\n\
        /retry - Refetch the current ticker\n\
        /help - Show help\n\
        /exit - Exit"
            .to_string()
    }
}

/// Single status line, for logs and narrow terminals
pub struct CompactFormatter;

impl Formatter for CompactFormatter {
    fn layout(&self) -> Layout {
        Layout::Compact
    }

    fn format_state(&self, state: &DashboardState) -> String {
        let ticker = state.ticker().map_or("-", |t| t.as_str());
        let mut line = format!("[{ticker} #{}] {}", state.generation(), state.status());

        match state.status() {
            Status::Idle | Status::Loading => {}
            Status::Ready => {
                let quarters = state.series().map_or(0, AlignedSeries::len);
                let _ = write!(line, " | {quarters} quarters");
                match state.drift() {
                    Slot::Loaded(drift) => {
                        let _ = write!(line, " | drift {:.2}", drift.drift_score);
                    }
                    _ => line.push_str(" | drift unavailable"),
                }
            }
            Status::PartiallyLoaded | Status::Failed => {
                let missing: Vec<String> = state
                    .missing()
                    .into_iter()
                    .map(|(kind, err)| match err {
                        Some(err) => format!("{kind} ({})", err.summary()),
                        None => format!("{kind} (pending)"),
                    })
                    .collect();
                if !missing.is_empty() {
                    let _ = write!(line, " | missing: {}", missing.join(", "));
                }
            }
        }
        line
    }

    fn format_error(&self, error: &str) -> String {
        format!("error: {error}")
    }

    fn format_help(&self) -> String {
        "<ticker> | /retry | /help | /exit".to_string()
    }
}

pub struct FormatterFactory;

impl FormatterFactory {
    pub fn create(layout: Layout) -> Box<dyn Formatter> {
        match layout {
            Layout::Terminal => Box::new(TerminalFormatter),
            Layout::Compact => Box::new(CompactFormatter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Generation, Settlement, SignalOutcome};
    use crate::testing::{drift, financials, narrative, outage, ticker};

    fn loaded(outcomes: Vec<SignalOutcome>) -> DashboardState {
        let mut state = DashboardState::new();
        let generation = state.set_ticker(ticker("MSFT")).unwrap();
        for outcome in outcomes {
            state.settle(Settlement { generation, outcome }).unwrap();
        }
        state
    }

    #[test]
    fn test_every_status_renders_distinctly() {
        let idle = DashboardState::new();
        let loading = loaded(vec![]);
        let partial = loaded(vec![SignalOutcome::Financial(Ok(financials("MSFT")))]);
        let ready = loaded(vec![
            SignalOutcome::Financial(Ok(financials("MSFT"))),
            SignalOutcome::Narrative(Ok(narrative("MSFT"))),
            SignalOutcome::Drift(Ok(drift("MSFT"))),
        ]);
        let failed = loaded(vec![
            SignalOutcome::Financial(Err(outage())),
            SignalOutcome::Narrative(Ok(narrative("MSFT"))),
            SignalOutcome::Drift(Ok(drift("MSFT"))),
        ]);

        let formatter = TerminalFormatter;
        let rendered: Vec<String> = [&idle, &loading, &partial, &ready, &failed]
            .iter()
            .map(|state| formatter.format_state(state))
            .collect();

        assert!(rendered[0].contains("Enter a ticker"));
        assert!(rendered[1].contains("Analyzing MSFT..."));
        assert!(rendered[2].contains("1/3 signals settled"));
        assert!(rendered[3].contains("Drift Score: 0.30"));
        assert!(rendered[4].contains("Could not load MSFT"));
        for (i, a) in rendered.iter().enumerate() {
            for b in &rendered[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_ready_view_renders_both_chart_panels() {
        let state = loaded(vec![
            SignalOutcome::Financial(Ok(financials("MSFT"))),
            SignalOutcome::Narrative(Ok(narrative("MSFT"))),
            SignalOutcome::Drift(Ok(drift("MSFT"))),
        ]);

        let out = TerminalFormatter.format_state(&state);
        assert!(out.contains("2024Q1"));
        assert!(out.contains("+5.0%"));
        assert!(out.contains("+7.0%"));
        assert!(out.contains("+4.0%"));
        assert!(out.contains("0.65"));
        assert!(out.contains("Financial Momentum (Revenue vs OCF)"));
        assert!(out.contains("Narrative Sentiment (Optimism vs Risk)"));
        // drift snapshot quarter is 2024-Q2, marked in both panels
        assert_eq!(out.matches("2024Q2 ◆").count(), 2);
        assert!(out.contains("Updated "));

        let momentum = out.find("Financial Momentum").unwrap();
        let sentiment = out.find("Narrative Sentiment").unwrap();
        assert!(out.find("Drift Score").unwrap() < momentum);
        assert!(momentum < sentiment);
    }

    #[test]
    fn test_failed_view_names_slot_and_category() {
        let state = loaded(vec![
            SignalOutcome::Financial(Err(outage())),
            SignalOutcome::Narrative(Err(SignalError::Decode("expected a sequence".to_string()))),
            SignalOutcome::Drift(Ok(drift("MSFT"))),
        ]);

        let out = TerminalFormatter.format_state(&state);
        assert!(out.contains("financials: network error"));
        assert!(out.contains("HTTP 503"));
        assert!(out.contains("narrative: format error"));
        assert!(!out.contains("drift:"));
    }

    #[test]
    fn test_ready_with_drift_unavailable() {
        let state = loaded(vec![
            SignalOutcome::Financial(Ok(financials("MSFT"))),
            SignalOutcome::Narrative(Ok(narrative("MSFT"))),
            SignalOutcome::Drift(Err(outage())),
        ]);
        assert_eq!(state.status(), Status::Ready);

        let out = TerminalFormatter.format_state(&state);
        assert!(out.contains("Drift: unavailable (network (HTTP 503))"));

        let line = CompactFormatter.format_state(&state);
        assert_eq!(line, "[MSFT #1] ready | 2 quarters | drift unavailable");
    }

    #[test]
    fn test_absent_cells_are_marked() {
        let mut only_q1 = narrative("MSFT");
        only_q1.quarterly_index = Some(vec!["2024Q1".to_string()]);
        only_q1.optimism_score.truncate(1);
        only_q1.risk_mentions.truncate(1);
        only_q1.forward_looking_density.truncate(1);
        only_q1.narrative_momentum.truncate(1);

        let state = loaded(vec![
            SignalOutcome::Financial(Ok(financials("MSFT"))),
            SignalOutcome::Narrative(Ok(only_q1)),
        ]);
        let series = state.series().unwrap();

        let sentiment = series.sentiment_chart();
        assert_eq!(sentiment_row(&sentiment[1], None), vec!["2024Q2", ABSENT, ABSENT]);
        assert_eq!(sentiment_row(&sentiment[0], None), vec!["2024Q1", "0.60", "4"]);

        let momentum = series.momentum_chart();
        assert_eq!(momentum_row(&momentum[1], None), vec!["2024Q2", "+7.0%", "+4.0%"]);

        let out = TerminalFormatter.format_state(&state);
        assert!(out.contains("Narrative Sentiment (Optimism vs Risk)"));
        assert!(!out.contains('◆'));
    }

    #[test]
    fn test_compact_partial_lists_missing() {
        let state = loaded(vec![SignalOutcome::Drift(Err(outage()))]);
        let line = CompactFormatter.format_state(&state);
        assert_eq!(
            line,
            concat!(
                "[MSFT #1] partially loaded | missing: financials (pending), ",
                "narrative (pending), drift (network (HTTP 503))"
            )
        );
        assert_eq!(state.generation(), Generation::new(1));
    }

    #[test]
    fn test_factory() {
        assert_eq!(FormatterFactory::create(Layout::Compact).layout(), Layout::Compact);
        assert_eq!(FormatterFactory::create(Layout::default()).layout(), Layout::Terminal);
    }
}
