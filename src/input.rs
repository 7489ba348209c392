use egui::{Event, InputState, PointerButton, Pos2};

use crate::surface::ElementId;

/// Host events the drag engine reacts to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown(Pos2),
    PointerMove(Pos2),
    PointerUp(Pos2),

    /// A [`crate::Motion::Animated`] position change of `element` has finished.
    TransitionEnd(ElementId),
}

/// Translate this frame's egui events into [`InputEvent`]s, in order.
///
/// Only the primary button drags. A release outside the window arrives as
/// [`Event::PointerGone`] and is reported as an up at the last known position.
pub fn collect_input_events(input: &InputState) -> Vec<InputEvent> {
    let mut last_pos = input.pointer.latest_pos();
    let mut out = Vec::new();
    for event in &input.events {
        match event {
            Event::PointerMoved(pos) => {
                last_pos = Some(*pos);
                out.push(InputEvent::PointerMove(*pos));
            }
            Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed,
                ..
            } => {
                last_pos = Some(*pos);
                out.push(if *pressed {
                    InputEvent::PointerDown(*pos)
                } else {
                    InputEvent::PointerUp(*pos)
                });
            }
            Event::PointerGone => {
                // An unmatched up is harmless, so no need to know whether a button was held.
                if let Some(pos) = last_pos {
                    out.push(InputEvent::PointerUp(pos));
                }
            }
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use egui::{Modifiers, Rect, Vec2, pos2};

    use super::*;

    fn run_pass(events: Vec<Event>) -> Vec<InputEvent> {
        let ctx = egui::Context::default();
        let raw = egui::RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0))),
            events,
            ..Default::default()
        };
        ctx.begin_pass(raw);
        let collected = ctx.input(collect_input_events);
        let _ = ctx.end_pass();
        collected
    }

    fn button(pos: Pos2, button: PointerButton, pressed: bool) -> Event {
        Event::PointerButton {
            pos,
            button,
            pressed,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn primary_press_move_release() {
        let collected = run_pass(vec![
            button(pos2(10.0, 10.0), PointerButton::Primary, true),
            Event::PointerMoved(pos2(30.0, 12.0)),
            button(pos2(30.0, 12.0), PointerButton::Primary, false),
        ]);
        assert_eq!(
            collected,
            vec![
                InputEvent::PointerDown(pos2(10.0, 10.0)),
                InputEvent::PointerMove(pos2(30.0, 12.0)),
                InputEvent::PointerUp(pos2(30.0, 12.0)),
            ]
        );
    }

    #[test]
    fn secondary_button_is_ignored() {
        let collected = run_pass(vec![
            button(pos2(10.0, 10.0), PointerButton::Secondary, true),
            button(pos2(10.0, 10.0), PointerButton::Secondary, false),
        ]);
        assert!(collected.is_empty());
    }
}
