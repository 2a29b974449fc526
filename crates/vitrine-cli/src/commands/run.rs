use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info};

use vitrine_core::transport::{InquiryTransport, JsonlTransport};
use vitrine_core::{AppConfig, Capabilities, PageRuntime, PageSpec, SystemClock};
use vitrine_tui::{
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    load_theme, ui, App,
};

pub async fn run(config: Arc<AppConfig>, page_path: &Path, capabilities: Capabilities) -> Result<()> {
    let page = PageSpec::load(page_path)?;
    info!(page = %page_path.display(), title = %page.title, "Opening page");

    let title = format!("vitrine: {}", page.title);
    let runtime = PageRuntime::new(page, &config, capabilities)
        .with_unit_scale(config.header.line_height_px as f64);
    let theme = load_theme(&config.ui.theme);
    let mut app = App::new(runtime, &config, theme, SystemClock::new());

    let transport = JsonlTransport::new(config.inquiry_log_path());
    let events = EventHandler::new(config.ui.tick_rate_ms, config.motion.animation_fps);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange,
        SetTitle(title)
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &events, &transport).await;

    // Restore terminal even if the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &EventHandler,
    transport: &dyn InquiryTransport,
) -> Result<()> {
    loop {
        app.tick();
        terminal.draw(|frame| ui::draw(frame, app))?;

        for payload in app.take_submissions() {
            match transport.submit(payload).await {
                Ok(record) => info!(id = %record.id, "Inquiry stored"),
                Err(e) => {
                    error!(error = %e, "Failed to store inquiry");
                    app.set_status(format!("Could not store inquiry: {}", e));
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        match events.next(app.is_animating())? {
            Some(AppEvent::Key(key)) => {
                let action = handle_key_event(key, app);
                app.apply(action);
            }
            Some(AppEvent::Mouse(mouse)) => app.handle_mouse(mouse),
            Some(AppEvent::PointerLeave) => app.pointer_leave(),
            // The next draw picks up the new size
            Some(AppEvent::Resize(..)) | Some(AppEvent::Tick) | None => {}
        }
    }
}
