use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use graphwalk_core::{Algorithm, ClickOutcome, GraphType, Node, Session, SharedSession, VisitState};
use graphwalk_engine::{Engine, StepEvent, create_event_channel};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, List, ListItem, Paragraph,
        canvas::{Canvas, Line as CanvasLine},
    },
};
use std::io;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;
use tokio::sync::mpsc;

/// Logical canvas extent. Node coordinates live in this space and the
/// canvas widget maps them onto whatever terminal size is available.
pub const WORLD_WIDTH: f64 = 100.0;
pub const WORLD_HEIGHT: f64 = 100.0;

const CURSOR_STEP: f64 = 2.0;
const NODE_RADIUS: f64 = 3.0;

/// TUI state for building graphs and watching traversals
pub struct App {
    session: SharedSession,
    events_tx: mpsc::UnboundedSender<StepEvent>,
    events_rx: mpsc::UnboundedReceiver<StepEvent>,
    steps: Vec<String>,
    cursor_x: f64,
    cursor_y: f64,
    status: String,
    // One flag for the life of the app; every dispatched engine shares it,
    // so a cancel request always reaches the run that actually won.
    cancel: Arc<AtomicBool>,
    should_quit: bool,
}

impl App {
    pub fn new(session: SharedSession) -> Self {
        let (events_tx, events_rx) = create_event_channel();
        let status = session.lock().unwrap().status_message().to_string();
        Self {
            session,
            events_tx,
            events_rx,
            steps: Vec::new(),
            cursor_x: WORLD_WIDTH / 2.0,
            cursor_y: WORLD_HEIGHT / 2.0,
            status,
            cancel: Arc::new(AtomicBool::new(false)),
            should_quit: false,
        }
    }

    /// Process incoming step events from the engine
    fn process_events(&mut self) {
        // Process all available events without blocking
        while let Ok(event) = self.events_rx.try_recv() {
            if matches!(
                event,
                StepEvent::RunFinished { .. } | StepEvent::RunAborted { .. }
            ) {
                self.refresh_status();
            }
            self.push_step(describe_event(&event));
        }
    }

    fn push_step(&mut self, message: String) {
        self.steps.push(message);
        // Keep only the last 500 steps to bound memory
        if self.steps.len() > 500 {
            self.steps.drain(0..self.steps.len() - 500);
        }
    }

    fn refresh_status(&mut self) {
        self.status = self.session.lock().unwrap().status_message().to_string();
    }

    fn running(&self) -> bool {
        self.session.lock().unwrap().running
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.request_cancel();
                self.should_quit = true;
            }
            KeyCode::Char('q') => {
                self.request_cancel();
                self.should_quit = true;
            }
            KeyCode::Esc => {
                // Esc cancels a live run first and only quits when idle
                if self.running() {
                    self.request_cancel();
                    self.status = "Cancelling...".to_string();
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(0.0, CURSOR_STEP),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(0.0, -CURSOR_STEP),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-CURSOR_STEP, 0.0),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(CURSOR_STEP, 0.0),
            KeyCode::Char(' ') | KeyCode::Enter => self.click(),
            KeyCode::Char('d') => self.delete_under_cursor(),
            KeyCode::Char('g') => self.cycle_graph_type(),
            KeyCode::Char('a') => self.cycle_algorithm(),
            KeyCode::Char('x') => self.clear_start(),
            KeyCode::Char('r') => self.start_run(),
            KeyCode::Char('c') => self.clear_graph(),
            _ => {}
        }
    }

    fn move_cursor(&mut self, dx: f64, dy: f64) {
        self.cursor_x = (self.cursor_x + dx).clamp(0.0, WORLD_WIDTH);
        self.cursor_y = (self.cursor_y + dy).clamp(0.0, WORLD_HEIGHT);
    }

    /// A click lands either on a node or on empty canvas, mirroring a
    /// mouse press at the cursor position.
    fn click(&mut self) {
        let hit = {
            let session = self.session.lock().unwrap();
            session
                .graph
                .node_at(self.cursor_x, self.cursor_y, NODE_RADIUS)
        };
        match hit {
            Some(id) => {
                let outcome = self.session.lock().unwrap().click_node(id);
                match outcome {
                    ClickOutcome::StartChosen(id) => {
                        self.push_step(format!("start node set to {}", id));
                    }
                    ClickOutcome::Connected { source, target } => {
                        self.push_step(format!("edge {}-{} added", source, target));
                    }
                    _ => {}
                }
            }
            None => {
                let added = self
                    .session
                    .lock()
                    .unwrap()
                    .click_canvas(self.cursor_x, self.cursor_y);
                if let Some(id) = added {
                    self.push_step(format!("node {} added", id));
                }
            }
        }
        self.refresh_status();
    }

    fn delete_under_cursor(&mut self) {
        let hit = {
            let session = self.session.lock().unwrap();
            session
                .graph
                .node_at(self.cursor_x, self.cursor_y, NODE_RADIUS)
        };
        if let Some(id) = hit
            && self.session.lock().unwrap().delete_node(id)
        {
            self.push_step(format!("node {} deleted", id));
        }
        self.refresh_status();
    }

    fn cycle_graph_type(&mut self) {
        {
            let mut session = self.session.lock().unwrap();
            let next = session.graph_type.next();
            session.set_graph_type(next);
        }
        self.refresh_status();
    }

    fn cycle_algorithm(&mut self) {
        let next = {
            let session = self.session.lock().unwrap();
            match session.algorithm {
                None => Some(Algorithm::Dfs),
                Some(Algorithm::Dfs) => Some(Algorithm::Bfs),
                Some(Algorithm::Bfs) => Some(Algorithm::Dijkstra),
                Some(Algorithm::Dijkstra) => None,
            }
        };
        self.session.lock().unwrap().set_algorithm(next);
        self.refresh_status();
    }

    fn clear_start(&mut self) {
        self.session.lock().unwrap().clear_start();
        self.refresh_status();
    }

    fn start_run(&mut self) {
        {
            let session = self.session.lock().unwrap();
            if !session.can_run() {
                return;
            }
        }
        // The engine clears the shared flag once it wins the run slot, so
        // a leftover cancel from a previous run cannot kill this one.
        let engine = Engine::new(Arc::clone(&self.session), self.events_tx.clone())
            .with_cancel_flag(Arc::clone(&self.cancel));
        tokio::spawn(async move {
            let _ = engine.run().await;
        });
        self.status = "Traversal running...".to_string();
    }

    fn request_cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    fn clear_graph(&mut self) {
        if self.session.lock().unwrap().clear() {
            self.push_step("graph cleared".to_string());
            self.refresh_status();
        }
    }

    fn render_canvas(&self, f: &mut Frame, area: Rect) {
        let session = self.session.lock().unwrap();
        let title = format!(
            " Canvas ({} nodes, {} edges) ",
            session.graph.node_count(),
            session.graph.edge_count()
        );
        let canvas = Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .marker(Marker::Braille)
            .x_bounds([0.0, WORLD_WIDTH])
            .y_bounds([0.0, WORLD_HEIGHT])
            .paint(|ctx| {
                for edge in session.graph.edges() {
                    let (Some(a), Some(b)) = (
                        session.graph.node(edge.source),
                        session.graph.node(edge.target),
                    ) else {
                        continue;
                    };
                    ctx.draw(&CanvasLine {
                        x1: a.x,
                        y1: a.y,
                        x2: b.x,
                        y2: b.y,
                        color: state_color(edge.state),
                    });
                    if session.graph_type == GraphType::Weighted {
                        ctx.print(
                            (a.x + b.x) / 2.0,
                            (a.y + b.y) / 2.0,
                            Span::styled(
                                format!("{}", edge.weight),
                                Style::default().fg(Color::DarkGray),
                            ),
                        );
                    }
                    if session.graph_type == GraphType::Directed {
                        // Arrow head two thirds of the way to the target
                        let hx = a.x + (b.x - a.x) * 0.66;
                        let hy = a.y + (b.y - a.y) * 0.66;
                        ctx.print(
                            hx,
                            hy,
                            Span::styled(">", Style::default().fg(state_color(edge.state))),
                        );
                    }
                }
                ctx.layer();
                for node in session.graph.nodes() {
                    let mut style = Style::default().fg(node_color(&session, node));
                    if Some(node.id) == session.start_node {
                        style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                    }
                    ctx.print(
                        node.x,
                        node.y,
                        Span::styled(format!("({})", node.label), style),
                    );
                }
                ctx.print(
                    self.cursor_x,
                    self.cursor_y,
                    Span::styled("+", Style::default().fg(Color::Magenta)),
                );
            });
        f.render_widget(canvas, area);
    }

    fn render_run_panel(&self, f: &mut Frame, area: Rect) {
        let session = self.session.lock().unwrap();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Run ")
            .border_style(Style::default().fg(Color::Yellow));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let algorithm = session.algorithm.map_or("none", |a| a.as_str());
        let start = session
            .start_node
            .map_or("none".to_string(), |id| id.to_string());
        let selected = session
            .selected_node
            .map_or("none".to_string(), |id| id.to_string());
        let text = vec![
            Line::from(vec![
                Span::styled("Graph:     ", Style::default().fg(Color::DarkGray)),
                Span::raw(session.graph_type.as_str()),
            ]),
            Line::from(vec![
                Span::styled("Algorithm: ", Style::default().fg(Color::DarkGray)),
                Span::raw(algorithm),
            ]),
            Line::from(vec![
                Span::styled("Start:     ", Style::default().fg(Color::DarkGray)),
                Span::raw(start),
            ]),
            Line::from(vec![
                Span::styled("Selected:  ", Style::default().fg(Color::DarkGray)),
                Span::raw(selected),
            ]),
            Line::from(vec![
                Span::styled("Running:   ", Style::default().fg(Color::DarkGray)),
                if session.running {
                    Span::styled("yes", Style::default().fg(Color::Yellow))
                } else {
                    Span::raw("no")
                },
            ]),
        ];
        f.render_widget(Paragraph::new(text), inner);
    }

    fn render_legend(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Legend ")
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let text = vec![
            Line::from(vec![
                Span::styled("● ", Style::default().fg(Color::DarkGray)),
                Span::raw("unvisited  "),
                Span::styled("● ", Style::default().fg(Color::Yellow)),
                Span::raw("visiting"),
            ]),
            Line::from(vec![
                Span::styled("● ", Style::default().fg(Color::Green)),
                Span::raw("visited    "),
                Span::styled("● ", Style::default().fg(Color::Blue)),
                Span::raw("start"),
            ]),
            Line::from(vec![
                Span::styled("● ", Style::default().fg(Color::Cyan)),
                Span::raw("selected   "),
                Span::styled("+ ", Style::default().fg(Color::Magenta)),
                Span::raw("cursor"),
            ]),
        ];
        f.render_widget(Paragraph::new(text), inner);
    }

    fn render_steps(&self, f: &mut Frame, area: Rect) {
        let title = format!(" Steps ({}) ", self.steps.len());
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Magenta));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let height = inner.height as usize;
        let total = self.steps.len();
        // Auto-scroll so the newest step is always visible
        let scroll_offset = total.saturating_sub(height);

        let items: Vec<ListItem> = self
            .steps
            .iter()
            .skip(scroll_offset)
            .take(height)
            .map(|step| ListItem::new(step.clone()))
            .collect();
        f.render_widget(List::new(items), inner);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let paragraph =
            Paragraph::new(self.status.clone()).style(Style::default().fg(Color::Yellow));
        f.render_widget(paragraph, area);
    }

    fn render_hints(&self, f: &mut Frame, area: Rect) {
        let hints = if self.running() {
            Line::from(vec![
                Span::styled(" Esc ", Style::default().fg(Color::Black).bg(Color::Gray)),
                Span::raw(" Cancel  "),
                Span::styled(" q ", Style::default().fg(Color::Black).bg(Color::Gray)),
                Span::raw(" Quit"),
            ])
        } else {
            Line::from(vec![
                Span::styled(" ←↑↓→ ", Style::default().fg(Color::Black).bg(Color::Gray)),
                Span::raw(" Move  "),
                Span::styled(" Space ", Style::default().fg(Color::Black).bg(Color::Gray)),
                Span::raw(" Click  "),
                Span::styled(" a ", Style::default().fg(Color::Black).bg(Color::Gray)),
                Span::raw(" Algorithm  "),
                Span::styled(" g ", Style::default().fg(Color::Black).bg(Color::Gray)),
                Span::raw(" Graph type  "),
                Span::styled(" r ", Style::default().fg(Color::Black).bg(Color::Gray)),
                Span::raw(" Run  "),
                Span::styled(" d ", Style::default().fg(Color::Black).bg(Color::Gray)),
                Span::raw(" Delete  "),
                Span::styled(" x ", Style::default().fg(Color::Black).bg(Color::Gray)),
                Span::raw(" Unset start  "),
                Span::styled(" c ", Style::default().fg(Color::Black).bg(Color::Gray)),
                Span::raw(" Clear  "),
                Span::styled(" q ", Style::default().fg(Color::Black).bg(Color::Gray)),
                Span::raw(" Quit"),
            ])
        };
        let paragraph = Paragraph::new(hints).style(Style::default().bg(Color::Black).fg(Color::Gray));
        f.render_widget(paragraph, area);
    }
}

fn describe_event(event: &StepEvent) -> String {
    match event {
        StepEvent::RunStarted { algorithm, start } => {
            format!("{} started from node {}", algorithm.as_str(), start)
        }
        StepEvent::Node { id, state } => format!("node {} -> {}", id, state.as_str()),
        StepEvent::Edge {
            source,
            target,
            state,
        } => format!("edge {}-{} -> {}", source, target, state.as_str()),
        StepEvent::RunFinished { visited } => format!("finished, visited {} nodes", visited),
        StepEvent::RunAborted { visited } => format!("aborted after {} nodes", visited),
    }
}

fn state_color(state: VisitState) -> Color {
    match state {
        VisitState::Unvisited => Color::DarkGray,
        VisitState::Visiting => Color::Yellow,
        VisitState::Visited => Color::Green,
    }
}

fn node_color(session: &Session, node: &Node) -> Color {
    if session.selected_node == Some(node.id) {
        return Color::Cyan;
    }
    match node.state {
        VisitState::Visiting => Color::Yellow,
        VisitState::Visited => Color::Green,
        VisitState::Unvisited if session.start_node == Some(node.id) => Color::Blue,
        VisitState::Unvisited => Color::DarkGray,
    }
}

/// Run the interactive visualizer over the given session until the user
/// quits.
pub async fn run(session: SharedSession) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Drain engine events before every frame
        app.process_events();

        terminal.draw(|f| ui(f, app))?;

        // Poll for keyboard events (non-blocking with timeout) so step
        // events keep flowing while a run is live
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    // Split vertically: main area + status line + hints bar
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Main area
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Hints bar
        ])
        .split(f.area());

    // Split main area into canvas (left) and panels (right)
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(70), // Canvas
            Constraint::Percentage(30), // Run + legend + steps
        ])
        .split(vertical_chunks[0]);

    // Split right side into run panel, legend and step log
    let side_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Run panel
            Constraint::Length(5), // Legend
            Constraint::Min(5),    // Steps
        ])
        .split(main_chunks[1]);

    app.render_canvas(f, main_chunks[0]);
    app.render_run_panel(f, side_chunks[0]);
    app.render_legend(f, side_chunks[1]);
    app.render_steps(f, side_chunks[2]);
    app.render_status(f, vertical_chunks[1]);
    app.render_hints(f, vertical_chunks[2]);
}
