//! End-to-end behaviour of the code input against real hosts.
//!
//! Drives the public API only:
//! - HeadlessHost (synchronous render + notify)
//! - A deferred host that renders on the next scheduler turn
//! - Virtual time for the completion debounce
//!
//! Run with: cargo test --test code_input

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use spark_pin::state::scheduler::{self, advance, reset_scheduler, run_until_idle};
use spark_pin::{
    BoxHandle, BoxListListener, BoxState, Cleanup, CodeInput, CodeInputProps, EventOutcome,
    HeadlessBox, HeadlessHost, InputEvent, KeyboardEvent, RenderHost, ValidationRule,
    COMPLETION_DEBOUNCE, code_input,
};

// =============================================================================
// HELPERS
// =============================================================================

fn setup() {
    reset_scheduler();
}

type Codes = Rc<RefCell<Vec<String>>>;

fn mount_with(props: CodeInputProps) -> (Rc<HeadlessHost>, CodeInput<HeadlessHost>, Codes) {
    let codes: Codes = Rc::new(RefCell::new(Vec::new()));
    let codes_clone = codes.clone();
    let host = Rc::new(HeadlessHost::new());
    let pin = code_input(
        host.clone(),
        CodeInputProps {
            on_complete: Some(Rc::new(move |code: &str| {
                codes_clone.borrow_mut().push(code.to_string());
            })),
            ..props
        },
    )
    .unwrap();
    (host, pin, codes)
}

fn mount(code_length: usize) -> (Rc<HeadlessHost>, CodeInput<HeadlessHost>, Codes) {
    mount_with(CodeInputProps {
        code_length,
        ..Default::default()
    })
}

fn settle() {
    advance(COMPLETION_DEBOUNCE);
}

// =============================================================================
// DEFERRED HOST - renders on the next scheduler turn
// =============================================================================

struct DeferredHost {
    inner: Rc<HeadlessHost>,
    renders: Cell<usize>,
}

impl DeferredHost {
    fn new() -> Self {
        Self {
            inner: Rc::new(HeadlessHost::new()),
            renders: Cell::new(0),
        }
    }
}

impl RenderHost for DeferredHost {
    type Handle = HeadlessBox;

    fn boxes(&self) -> Vec<HeadlessBox> {
        self.inner.boxes()
    }

    fn active_box(&self) -> Option<usize> {
        self.inner.active_box()
    }

    fn subscribe(&self, listener: BoxListListener<HeadlessBox>) -> Cleanup {
        self.inner.subscribe(listener)
    }

    fn request_render(&self, slots: usize) {
        self.renders.set(self.renders.get() + 1);
        let inner = self.inner.clone();
        scheduler::next_turn(move || inner.render(slots));
    }
}

// =============================================================================
// BOX LIST LENGTH
// =============================================================================

#[test]
fn box_list_matches_code_length_after_reconcile() {
    setup();
    for length in 1..=8 {
        let (host, pin, _) = mount(length);
        assert_eq!(pin.box_count(), length);
        assert_eq!(host.len(), length);
        assert_eq!(pin.box_states().len(), length);
    }
}

#[test]
fn shrinking_truncates_to_first_boxes() {
    setup();
    let (host, pin, _) = mount(6);
    let ids: Vec<usize> = host.boxes().iter().map(|b| b.id()).collect();

    pin.set_code_length(4).unwrap();

    let kept: Vec<usize> = host.boxes().iter().map(|b| b.id()).collect();
    assert_eq!(kept, ids[..4]);
    assert_eq!(pin.box_count(), 4);
}

#[test]
fn growing_appends_empty_ready_boxes() {
    setup();
    let (_host, pin, _) = mount(4);
    pin.on_character_input("z", 3);
    assert_eq!(pin.box_state(3), Some(BoxState::Reset));

    pin.set_code_length(6).unwrap();

    assert_eq!(pin.box_count(), 6);
    assert_eq!(pin.values()[4..], ["", ""]);
    assert_eq!(pin.box_state(4), Some(BoxState::Ready));
    assert_eq!(pin.box_state(5), Some(BoxState::Ready));
    // Existing state is carried over
    assert_eq!(pin.box_state(3), Some(BoxState::Reset));
}

#[test]
fn deferred_host_catches_up_on_notification() {
    setup();
    let host = Rc::new(DeferredHost::new());
    let pin = code_input(host.clone(), CodeInputProps::default()).unwrap();

    // Nothing rendered yet, focus could not land
    assert_eq!(pin.box_count(), 0);
    assert!(!pin.is_focus_settled());

    run_until_idle();
    assert_eq!(pin.box_count(), 4);
    assert!(pin.is_focus_settled());
    assert_eq!(host.inner.focused_index(), Some(0));

    pin.set_code_length(5).unwrap();
    assert_eq!(pin.box_count(), 4);
    run_until_idle();
    assert_eq!(pin.box_count(), 5);
    assert_eq!(host.renders.get(), 2);
}

#[test]
fn edits_are_bounded_by_code_length_during_transition() {
    setup();
    let host = Rc::new(DeferredHost::new());
    let pin = code_input(host.clone(), CodeInputProps {
        code_length: 6,
        ..Default::default()
    })
    .unwrap();
    run_until_idle();

    // Length lowered, host has not re-rendered yet
    pin.set_code_length(4).unwrap();
    pin.on_character_input("123456", 0);

    assert_eq!(pin.values(), vec!["1", "2", "3", "4", "", ""]);
}

#[test]
fn repeated_notifications_are_idempotent() {
    setup();
    let (host, pin, _) = mount(4);
    pin.on_character_input("12", 0);
    pin.on_character_input("q", 2);

    host.notify();
    host.notify();
    assert_eq!(pin.values(), vec!["1", "2", "", ""]);

    pin.reconcile();
    pin.reconcile();
    assert_eq!(pin.values(), vec!["1", "2", "", ""]);
    assert_eq!(pin.box_count(), 4);
    assert_eq!(
        pin.box_states(),
        vec![BoxState::Ready, BoxState::Ready, BoxState::Reset, BoxState::Ready]
    );
}

// =============================================================================
// TYPED INPUT
// =============================================================================

#[test]
fn burst_fills_consecutive_boxes_and_drops_overflow() {
    setup();
    for start in 0..4 {
        let (_host, pin, _) = mount(4);
        pin.on_character_input("987", start);

        let values = pin.values();
        let burst = ["9", "8", "7"];
        for (index, value) in values.iter().enumerate() {
            if index >= start && index - start < burst.len() {
                assert_eq!(value, burst[index - start]);
            } else {
                assert_eq!(value, "");
            }
        }
    }
}

#[test]
fn invalid_character_only_touches_origin_box() {
    setup();
    let (_host, pin, _) = mount(4);
    pin.on_paste("1234", 0);

    for index in 0..4 {
        let before = pin.values();
        assert_eq!(pin.on_character_input("#", index), EventOutcome::Rejected);

        let after = pin.values();
        for (i, (b, a)) in before.iter().zip(&after).enumerate() {
            if i == index {
                assert_eq!(a, "");
            } else {
                assert_eq!(a, b);
            }
        }
        assert_eq!(pin.box_state(index), Some(BoxState::Reset));
    }
}

#[test]
fn whitespace_is_trimmed_from_valid_input() {
    setup();
    let (_host, pin, _) = mount_with(CodeInputProps {
        validation: ValidationRule::from_fn(|ch| ch.is_ascii_digit() || ch == ' '),
        ..Default::default()
    });

    pin.on_character_input(" 12 ", 0);
    assert_eq!(pin.values(), vec!["1", "2", "", ""]);
}

// =============================================================================
// PASTE
// =============================================================================

#[test]
fn paste_full_code_emits_once() {
    setup();
    let (host, pin, codes) = mount(4);

    assert_eq!(pin.on_paste("1234", 0), EventOutcome::Applied);
    assert_eq!(pin.values(), vec!["1", "2", "3", "4"]);
    assert_eq!(host.focused_index(), None);

    advance(COMPLETION_DEBOUNCE - Duration::from_millis(1));
    assert!(codes.borrow().is_empty());

    settle();
    settle();
    assert_eq!(*codes.borrow(), vec!["1234".to_string()]);
    assert_eq!(pin.last_code_signal().get(), Some("1234".to_string()));
}

#[test]
fn paste_aborts_after_invalid_character() {
    setup();
    let (host, pin, codes) = mount(4);
    host.box_at(3).unwrap().set_value("7");

    assert_eq!(pin.on_paste("12a4", 0), EventOutcome::Rejected);
    assert_eq!(pin.values(), vec!["1", "2", "", "7"]);
    assert_eq!(pin.box_state(2), Some(BoxState::Reset));

    run_until_idle();
    assert!(codes.borrow().is_empty());
}

#[test]
fn short_paste_fills_from_origin() {
    setup();
    let (_host, pin, codes) = mount(4);

    pin.on_paste("56", 1);
    assert_eq!(pin.values(), vec!["", "5", "6", ""]);

    run_until_idle();
    assert!(codes.borrow().is_empty());
}

#[test]
fn paste_completing_a_partial_code_emits() {
    setup();
    let (_host, pin, codes) = mount(4);
    pin.on_character_input("1", 0);

    pin.on_paste("234567", 1);
    assert_eq!(pin.values(), vec!["1", "2", "3", "4"]);

    run_until_idle();
    assert_eq!(*codes.borrow(), vec!["1234".to_string()]);
}

// =============================================================================
// BACKSPACE / DELETE
// =============================================================================

#[test]
fn backspace_on_empty_box_moves_back() {
    setup();
    let (host, pin, _) = mount(4);
    for index in 1..4 {
        host.click(index);
        pin.on_key_down(&KeyboardEvent::new("Backspace"), index);
        assert_eq!(host.focused_index(), Some(index - 1));
    }
}

#[test]
fn backspace_on_filled_box_clears_in_place() {
    setup();
    let (host, pin, _) = mount(4);
    pin.on_paste("1234", 0);

    host.click(2);
    pin.on_key_down(&KeyboardEvent::from_key_code(8), 2);
    assert_eq!(pin.values(), vec!["1", "2", "", "4"]);
    assert_eq!(host.focused_index(), Some(2));

    // Second press on the now-empty box steps back
    pin.on_key_down(&KeyboardEvent::new("Backspace"), 2);
    assert_eq!(host.focused_index(), Some(1));
}

#[test]
fn deleting_from_a_complete_code_does_not_emit() {
    setup();
    let (_host, pin, codes) = mount(4);
    pin.on_paste("1234", 0);
    pin.on_key_down(&KeyboardEvent::new("Delete"), 3);

    run_until_idle();
    assert!(codes.borrow().is_empty());
}

#[test]
fn typed_keys_through_dispatch() {
    setup();
    let (host, pin, codes) = mount(4);

    for key in ["4", "2", "x", "0"] {
        pin.dispatch(&InputEvent::Key(KeyboardEvent::new(key)));
    }
    // "x" was rejected in box 2, focus stayed there, "0" replaced it
    assert_eq!(pin.values(), vec!["4", "2", "0", ""]);
    assert_eq!(host.focused_index(), Some(3));

    pin.dispatch(&InputEvent::Key(KeyboardEvent::new("9")));
    run_until_idle();
    assert_eq!(*codes.borrow(), vec!["4209".to_string()]);
}

#[test]
fn released_keys_are_not_dispatched() {
    setup();
    let (_host, pin, _) = mount(4);
    let mut event = KeyboardEvent::new("5");
    event.state = spark_pin::KeyState::Release;

    assert_eq!(pin.dispatch(&InputEvent::Key(event)), EventOutcome::Ignored);
    assert_eq!(pin.values()[0], "");
}

// =============================================================================
// DEFAULT VALUE
// =============================================================================

#[test]
fn invalid_default_clears_everything() {
    setup();
    let (_host, pin, _) = mount_with(CodeInputProps {
        default_value: Some("12b4".to_string()),
        ..Default::default()
    });
    assert_eq!(pin.values(), vec![""; 4]);
}

#[test]
fn valid_default_fills_without_emitting() {
    setup();
    let (_host, pin, codes) = mount_with(CodeInputProps {
        default_value: Some("1234".to_string()),
        ..Default::default()
    });
    assert_eq!(pin.values(), vec!["1", "2", "3", "4"]);

    run_until_idle();
    assert!(codes.borrow().is_empty());
    assert_eq!(pin.last_code(), None);
}

#[test]
fn default_follows_length_changes() {
    setup();
    let (_host, pin, _) = mount_with(CodeInputProps {
        code_length: 4,
        default_value: Some("123456".to_string()),
        ..Default::default()
    });
    assert_eq!(pin.values(), vec!["1", "2", "3", "4"]);

    pin.set_code_length(6).unwrap();
    assert_eq!(pin.values(), vec!["1", "2", "3", "4", "5", "6"]);
}

// =============================================================================
// LIFECYCLE
// =============================================================================

#[test]
fn unmounted_widget_ignores_host_changes() {
    setup();
    let (host, pin, _) = mount(4);
    pin.unmount();

    host.render(6);
    assert_eq!(pin.box_count(), 4);
}
