//! Rendering. Pure: reads `App`, draws widgets, mutates nothing.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::core::digits::digits;
use crate::core::engine::ExerciseState;
use crate::core::phrases;
use crate::core::phrases::Locale;
use crate::core::state::App;

const CARRY_STYLE: Style = Style::new().fg(Color::Yellow);
const ANSWER_STYLE: Style = Style::new()
    .fg(Color::Green)
    .add_modifier(Modifier::BOLD);
const DIM_STYLE: Style = Style::new().fg(Color::DarkGray);

pub fn draw_ui(frame: &mut Frame, app: &App) {
    let mut constraints = vec![
        Constraint::Length(1), // title bar
        Constraint::Min(8),    // the board
        Constraint::Length(4), // step description
    ];
    if app.show_hints {
        // Three hints, each of which may wrap to two lines.
        constraints.push(Constraint::Length(8));
    }
    constraints.push(Constraint::Length(1)); // help footer

    let areas = Layout::vertical(constraints).split(frame.area());

    draw_title(frame, app, areas[0]);
    draw_board(frame, app, areas[1]);
    draw_description(frame, app, areas[2]);
    if app.show_hints {
        draw_hints(frame, app, areas[3]);
    }
    draw_footer(frame, app, areas[areas.len() - 1]);
}

fn draw_title(frame: &mut Frame, app: &App, area: Rect) {
    let total = app.engine.catalog().len();
    let done = (0..total)
        .filter(|&i| app.engine.state(i).completed)
        .count();
    let position = app.engine.current_index() + 1;
    let narration = if app.narration_enabled { "♪" } else { " " };

    let title = Line::from(vec![
        Span::styled(" Soma ", Style::new().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!(" {position}/{total} "),
            Style::new().fg(Color::Cyan),
        ),
        Span::styled(format!(" ✓ {done} "), Style::new().fg(Color::Green)),
        Span::styled(format!(" {narration} "), CARRY_STYLE),
        Span::styled(format!(" {}", app.status_message), DIM_STYLE),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn draw_board(frame: &mut Frame, app: &App, area: Rect) {
    let exercise = app.engine.current_exercise();
    let state = app.engine.current_state();
    let lines = board_lines(exercise.num1, exercise.num2, &state);

    let board = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(board, area);
}

/// The board itself, one line per row of the written-out sum:
///
/// ```text
///  +1 +1
///     5  4  4
///  +  2  5  6
///  ─────────
///     8  0  0
/// ```
///
/// Cells are positional (hundreds, tens, units). A carry is only shown
/// once it exists and is nonzero; unresolved answer cells stay blank.
fn board_lines(num1: u16, num2: u16, state: &ExerciseState) -> Vec<Line<'static>> {
    // Operands passed catalog validation, so decomposition cannot fail.
    let d1 = digits(num1).unwrap_or_default();
    let d2 = digits(num2).unwrap_or_default();

    let carry_cells: String = state
        .carries
        .iter()
        .map(|c| match c {
            Some(c) if *c > 0 => format!(" +{c}"),
            _ => "   ".to_string(),
        })
        .collect();
    let answer_cells: String = state
        .answers
        .iter()
        .map(|a| match a {
            Some(d) => format!("  {d}"),
            None => "   ".to_string(),
        })
        .collect();
    let digit_row = |ds: [u8; 3]| ds.iter().map(|d| format!("  {d}")).collect::<String>();

    vec![
        Line::from(Span::styled(format!("  {carry_cells}"), CARRY_STYLE)),
        Line::from(format!("  {}", digit_row(d1))),
        Line::from(format!("+ {}", digit_row(d2))),
        Line::from(Span::styled(format!("  {}", "─".repeat(9)), DIM_STYLE)),
        Line::from(Span::styled(format!("  {answer_cells}"), ANSWER_STYLE)),
    ]
}

fn draw_description(frame: &mut Frame, app: &App, area: Rect) {
    let description = Paragraph::new(app.step_description.clone())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(description, area);
}

fn draw_hints(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = phrases::hints(app.locale)
        .iter()
        .map(|hint| Line::from(format!("• {hint}")))
        .collect();
    let hints = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .style(DIM_STYLE)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(hints, area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help = match app.locale {
        Locale::PtBr => {
            " espaço: passo | ←/→: exercício | 1-9: ir para | r: reiniciar | s: resolver tudo | h: dicas | a: áudio | q: sair"
        }
        Locale::En => {
            " space: step | ←/→: exercise | 1-9: jump | r: reset | s: solve all | h: hints | a: audio | q: quit"
        }
    };
    frame.render_widget(Paragraph::new(Span::styled(help, DIM_STYLE)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw_ui(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_initial_board_shows_operands_and_no_carries() {
        let app = test_app();
        let screen = render(&app);
        assert!(screen.contains("5  4  4"));
        assert!(screen.contains("2  5  6"));
        assert!(!screen.contains("+1"));
        assert!(screen.contains("Exercício 1 de 9: 544 + 256"));
        assert!(screen.contains("espaço: passo"));
    }

    #[test]
    fn test_carry_appears_after_units_resolve() {
        let mut app = test_app();
        update(&mut app, Action::Advance);
        let screen = render(&app);
        // 4 + 6 = 10: carry into the tens slot becomes visible.
        assert!(screen.contains("+1"));
        assert!(screen.contains("escrevemos 0 e vai 1 para as dezenas"));
    }

    #[test]
    fn test_completed_board_shows_full_answer() {
        let mut app = test_app();
        for _ in 0..3 {
            update(&mut app, Action::Advance);
        }
        let screen = render(&app);
        assert!(screen.contains("8  0  0"));
        assert!(screen.contains("✓ 1"));
    }

    #[test]
    fn test_hints_panel_toggles() {
        let mut app = test_app();
        assert!(!render(&app).contains("some os algarismos das unidades"));
        update(&mut app, Action::ToggleHints);
        assert!(render(&app).contains("some os algarismos das unidades"));
    }

    #[test]
    fn test_zero_carry_is_not_drawn() {
        // 123 + 456 never overflows: carries become Some(0), board stays clean.
        let catalog = crate::core::catalog::Catalog::from_exercises(vec![
            crate::core::catalog::Exercise::new(123, 456),
        ])
        .unwrap();
        let engine = crate::core::engine::Engine::new(
            catalog,
            crate::core::engine::Granularity::Column,
        );
        let mut app = App::new(engine, Locale::PtBr);
        update(&mut app, Action::Advance);
        update(&mut app, Action::Advance);
        let screen = render(&app);
        assert!(!screen.contains("+0"));
        assert!(!screen.contains("+1"));
    }
}
