//! PIN Prompt Example - Segmented code entry in the terminal
//!
//! This example wires the code input to a real terminal:
//! - crossterm raw mode with bracketed paste
//! - Headless host drawn as a row of boxes
//! - Scheduler advanced by real elapsed time
//! - Tab / arrow keys move between boxes, Esc or Ctrl+C quits
//!
//! Run with: cargo run --example pin_prompt -- [length] [--secret]
//! Logs go to stderr when RUST_LOG is set (e.g. RUST_LOG=spark_pin=trace).

use std::cell::RefCell;
use std::io::{self, Write, stdout};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, MoveToColumn, Show};
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use spark_pin::{
    code_input, BoxState, CodeInput, CodeInputProps, HeadlessHost, InputEvent,
    state::input::{disable_paste, enable_paste, poll_event},
    state::scheduler,
};
use tracing_subscriber::EnvFilter;

const IDLE_POLL: Duration = Duration::from_millis(250);

fn main() -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let code_length = args
        .iter()
        .find_map(|arg| arg.parse::<usize>().ok())
        .unwrap_or(6);
    let secret = args.iter().any(|arg| arg == "--secret");

    // Completed code, filled in by the callback
    let entered = Rc::new(RefCell::new(None::<String>));
    let entered_for_callback = entered.clone();

    let host = Rc::new(HeadlessHost::new());
    let pin = code_input(
        host.clone(),
        CodeInputProps {
            code_length,
            secret,
            on_complete: Some(Rc::new(move |code: &str| {
                *entered_for_callback.borrow_mut() = Some(code.to_string());
            })),
            ..Default::default()
        },
    )
    .map_err(io::Error::other)?;

    terminal::enable_raw_mode()?;
    enable_paste()?;
    queue!(stdout(), Hide)?;

    let result = run(&pin, &host, &entered);

    queue!(stdout(), Show, Print("\r\n"))?;
    stdout().flush()?;
    disable_paste()?;
    terminal::disable_raw_mode()?;
    result?;

    match entered.borrow().as_deref() {
        Some(code) if secret => println!("Code entered ({} characters)", code.chars().count()),
        Some(code) => println!("Code entered: {code}"),
        None => println!("Cancelled"),
    }
    Ok(())
}

fn run(
    pin: &CodeInput<HeadlessHost>,
    host: &HeadlessHost,
    entered: &RefCell<Option<String>>,
) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        draw(pin, host)?;
        if entered.borrow().is_some() {
            return Ok(());
        }

        // Wake up in time for the next deferred task
        let timeout = scheduler::next_due()
            .map(|due| due.saturating_sub(scheduler::now()))
            .unwrap_or(IDLE_POLL);
        let event = poll_event(timeout)?;

        if let Some(ref event) = event {
            if is_quit(event) {
                return Ok(());
            }
            if !navigate(event, pin, host) {
                pin.dispatch(event);
            }
        }

        scheduler::advance(last_tick.elapsed());
        last_tick = Instant::now();
        pin.after_render();
    }
}

fn is_quit(event: &InputEvent) -> bool {
    match event {
        InputEvent::Key(key) if key.is_press() => {
            key.key == "Escape" || (key.modifiers.ctrl && key.key.eq_ignore_ascii_case("c"))
        }
        _ => false,
    }
}

/// Move focus between boxes. Returns true if the event was used.
fn navigate(event: &InputEvent, pin: &CodeInput<HeadlessHost>, host: &HeadlessHost) -> bool {
    let InputEvent::Key(key) = event else {
        return false;
    };
    if !key.is_press() {
        return false;
    }

    let last = pin.box_count().saturating_sub(1);
    let target = match (key.key.as_str(), pin.active_index()) {
        ("Tab" | "ArrowRight", Some(index)) => (index + 1).min(last),
        ("ArrowLeft", Some(index)) => index.saturating_sub(1),
        ("Tab" | "ArrowRight" | "ArrowLeft", None) => 0,
        ("Home", _) => 0,
        ("End", _) => last,
        _ => return false,
    };
    host.click(target);
    true
}

fn draw(pin: &CodeInput<HeadlessHost>, host: &HeadlessHost) -> io::Result<()> {
    let mut out = stdout();
    queue!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print("Enter code: ")
    )?;

    for index in 0..pin.box_count() {
        let shown = pin.display_value(index).unwrap_or_default();
        let cell = if shown.is_empty() { " ".to_string() } else { shown };

        if host.focused_index() == Some(index) {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }
        if pin.box_state(index).is_some_and(BoxState::is_reset) {
            queue!(out, SetForegroundColor(Color::Red))?;
        }
        queue!(
            out,
            Print(format!("[{cell}]")),
            ResetColor,
            SetAttribute(Attribute::Reset),
            Print(" ")
        )?;
    }

    out.flush()
}
