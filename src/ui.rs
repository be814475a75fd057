//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]). The layout is a two-row split: the
//! scrollable article list on top and a one-line status bar at the bottom
//! that doubles as the loading spinner and the error banner.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::feed::LoadState;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    draw_article_list(app, frame, main_area);
    draw_status_bar(app, frame, status_area);
}

/// Render the scrollable article list.
fn draw_article_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let list_items: Vec<ListItem> = app
        .feed
        .items()
        .iter()
        .map(|article| {
            let date_str = article
                .published
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();

            let mut headline = vec![
                Span::styled(format!("{date_str:<18}"), Style::default().fg(Color::DarkGray)),
                Span::styled(&article.title, Style::default().fg(Color::White)),
            ];
            if article.image_url.is_some() {
                headline.push(Span::raw("  "));
                headline.push(Span::styled("[img]", Style::default().fg(Color::Cyan)));
            }

            let mut lines = vec![Line::from(headline)];
            if let Some(description) = &article.description {
                lines.push(Line::from(Span::styled(
                    format!("{:<18}{}", "", description),
                    Style::default().fg(Color::DarkGray),
                )));
            }

            ListItem::new(lines)
        })
        .collect();

    let list = List::new(list_items)
        .block(
            Block::default()
                .title(format!(" {} ", app.source_name))
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let (status_text, status_style) = match app.feed.load_state() {
        LoadState::LoadingRefresh => ("Refreshing…".to_string(), Style::default().fg(Color::Yellow)),
        LoadState::LoadingAppend => {
            ("Loading more…".to_string(), Style::default().fg(Color::Yellow))
        }
        LoadState::Error => {
            let detail = app
                .feed
                .last_error()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".into());
            (
                format!("Error: {detail} (r: retry)"),
                Style::default().fg(Color::Red),
            )
        }
        LoadState::Idle if app.feed.is_exhausted() => {
            ("End of feed".to_string(), Style::default().fg(Color::DarkGray))
        }
        LoadState::Idle => ("Ready".to_string(), Style::default().fg(Color::Green)),
    };

    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(status_text, status_style),
        Span::raw("  "),
        Span::styled(
            format!("{} articles", app.feed.len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  q: quit  ↑/↓: scroll  Home/End: jump  r: refresh"),
    ]));
    frame.render_widget(status, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Article, FetchError, Page};
    use crate::feed::PagingFeed;
    use crate::worker::{FetchOutcome, LoadKind};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::mpsc;

    fn make_article(title: &str, description: Option<&str>) -> Article {
        Article {
            title: title.to_string(),
            description: description.map(String::from),
            image_url: None,
            url: None,
            published: None,
        }
    }

    fn app_with_articles(articles: Vec<Article>) -> App {
        let (tx, _rx) = mpsc::channel();
        let mut app = App::new(PagingFeed::new(tx), "Newswire");
        app.feed.apply(FetchOutcome {
            kind: LoadKind::Refresh,
            result: Ok(Page::new(articles, 1)),
        });
        app
    }

    fn render_to_text(app: &mut App) -> String {
        let backend = TestBackend::new(100, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        let buf = terminal.backend().buffer().clone();
        buf.content()
            .iter()
            .map(|c| c.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    #[test]
    fn draw_does_not_panic_with_no_articles() {
        let (tx, _rx) = mpsc::channel();
        let mut app = App::new(PagingFeed::new(tx), "Newswire");
        render_to_text(&mut app);
    }

    #[test]
    fn draw_shows_titles_and_count() {
        let mut app = app_with_articles(vec![
            make_article("Quantum toasters", Some("A breakthrough in breakfast")),
            make_article("Second story", None),
        ]);
        app.select_first();

        let text = render_to_text(&mut app);
        assert!(text.contains("Quantum toasters"));
        assert!(text.contains("A breakthrough in breakfast"));
        assert!(text.contains("2 articles"));
    }

    #[test]
    fn status_bar_shows_loading_during_refresh() {
        let mut app = app_with_articles(vec![make_article("t", None)]);
        app.feed.refresh();

        let text = render_to_text(&mut app);
        assert!(text.contains("Refreshing"));
    }

    #[test]
    fn status_bar_shows_error_with_retry_hint() {
        let mut app = app_with_articles(vec![make_article("t", None)]);
        app.feed.load_more();
        app.feed.apply(FetchOutcome {
            kind: LoadKind::Append,
            result: Err(FetchError::Server { status: 500 }),
        });

        let text = render_to_text(&mut app);
        assert!(text.contains("Error"));
        assert!(text.contains("r: retry"));
    }

    #[test]
    fn status_bar_marks_an_exhausted_feed() {
        let mut app = app_with_articles(vec![make_article("t", None)]);
        app.feed.load_more();
        app.feed.apply(FetchOutcome {
            kind: LoadKind::Append,
            result: Ok(Page::new(vec![], 2)),
        });

        let text = render_to_text(&mut app);
        assert!(text.contains("End of feed"));
    }
}
