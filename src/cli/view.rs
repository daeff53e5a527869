use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::charts::BarDatum;
use crate::error::Result;
use crate::explore::Exploration;
use crate::fmt::money;
use crate::models::PieSlice;
use crate::tui::{
    run_view, TerminalView, ViewAction, BAR_STYLE, FOOTER_STYLE, HEADER_STYLE, SHARE_STYLE,
    VALUE_STYLE,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum PageKind {
    Counts,
    Money,
    Shares,
}

/// One chart of the walkthrough, ready for the terminal.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ChartPage {
    pub title: String,
    pub kind: PageKind,
    pub bars: Vec<BarDatum>,
    /// Pre-formatted value shown above each bar.
    pub captions: Vec<String>,
}

impl ChartPage {
    fn counts(title: impl Into<String>, bars: Vec<BarDatum>) -> Self {
        let captions = bars.iter().map(|b| format!("{}", b.value as u64)).collect();
        Self { title: title.into(), kind: PageKind::Counts, bars, captions }
    }

    fn money(title: impl Into<String>, bars: Vec<BarDatum>) -> Self {
        let captions = bars.iter().map(|b| money(b.value)).collect();
        Self { title: title.into(), kind: PageKind::Money, bars, captions }
    }

    fn shares(title: impl Into<String>, slices: &[PieSlice]) -> Self {
        let bars = slices
            .iter()
            .map(|s| BarDatum { label: s.category.clone(), value: s.pct })
            .collect();
        let captions = slices.iter().map(|s| s.label.clone()).collect();
        Self { title: title.into(), kind: PageKind::Shares, bars, captions }
    }
}

/// Build the walkthrough pages in pipeline order.
pub(crate) fn pages(ex: &Exploration) -> Vec<ChartPage> {
    vec![
        ChartPage::counts(
            "Transactions per category (all)",
            ex.histogram_all.iter().map(BarDatum::from).collect(),
        ),
        ChartPage::counts(
            format!("Transactions per category ({})", ex.window),
            ex.histogram_window.iter().map(BarDatum::from).collect(),
        ),
        ChartPage::counts(
            format!("Most frequent categories ({})", ex.window),
            ex.counts_window.iter().map(BarDatum::from).collect(),
        ),
        ChartPage::money(
            format!("Spending by category ({}), total {}", ex.window, money(ex.window_total)),
            ex.window_bars.iter().map(BarDatum::from).collect(),
        ),
        ChartPage::shares(format!("Share of spending ({})", ex.window), &ex.window_pie),
        ChartPage::shares("Share of spending (full period)", &ex.period_pie),
        ChartPage::money(
            format!("Monthly {} spending", ex.focus),
            ex.monthly_focus.iter().map(BarDatum::from).collect(),
        ),
    ]
}

pub(crate) struct ChartDeck {
    pages: Vec<ChartPage>,
    index: usize,
}

impl ChartDeck {
    pub(crate) fn new(pages: Vec<ChartPage>) -> Self {
        Self { pages, index: 0 }
    }

    fn step(&mut self, forward: bool) {
        let n = self.pages.len();
        if n == 0 {
            return;
        }
        self.index = if forward {
            (self.index + 1) % n
        } else {
            (self.index + n - 1) % n
        };
    }
}

/// Terminal bars hold whole numbers (dollars, counts or percent); negatives draw empty.
fn bar_height(value: f64) -> u64 {
    let v = value.round();
    if v > 0.0 {
        v as u64
    } else {
        0
    }
}

impl TerminalView for ChartDeck {
    fn draw(&mut self, frame: &mut Frame) {
        let [title_area, chart_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let footer = Paragraph::new(Span::styled(
            " \u{2190}/\u{2192} previous/next chart   q quit",
            FOOTER_STYLE,
        ));
        frame.render_widget(footer, footer_area);

        let Some(page) = self.pages.get(self.index) else {
            frame.render_widget(Paragraph::new("No charts."), chart_area);
            return;
        };

        let title = format!(" [{}/{}] {}", self.index + 1, self.pages.len(), page.title);
        frame.render_widget(Paragraph::new(Span::styled(title, HEADER_STYLE)), title_area);

        if page.bars.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(" Nothing to chart for this range.", FOOTER_STYLE)),
                chart_area,
            );
            return;
        }

        let style = if page.kind == PageKind::Shares { SHARE_STYLE } else { BAR_STYLE };
        let bars: Vec<Bar> = page
            .bars
            .iter()
            .zip(&page.captions)
            .map(|(b, caption)| {
                Bar::default()
                    .value(bar_height(b.value))
                    .label(Line::from(b.label.clone()))
                    .text_value(caption.clone())
                    .style(style)
                    .value_style(VALUE_STYLE)
            })
            .collect();

        let n = bars.len() as u16;
        let width = (chart_area.width.saturating_sub(2) / n.max(1)).saturating_sub(1).clamp(3, 14);
        let chart = BarChart::default()
            .block(Block::default().borders(Borders::ALL))
            .data(BarGroup::default().bars(&bars))
            .bar_width(width)
            .bar_gap(1);
        frame.render_widget(chart, chart_area);
    }

    fn handle_key(&mut self, code: KeyCode) -> ViewAction {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => ViewAction::Close,
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') | KeyCode::Char(' ') => {
                self.step(true);
                ViewAction::Continue
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') => {
                self.step(false);
                ViewAction::Continue
            }
            _ => ViewAction::Continue,
        }
    }
}

pub fn show(ex: &Exploration) -> Result<()> {
    let mut deck = ChartDeck::new(pages(ex));
    run_view(&mut deck)
}
