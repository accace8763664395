use crate::{events::Event, KeyCode};

pub fn map_key(egui_key: egui::Key) -> Option<KeyCode> {
    match egui_key {
        egui::Key::S => Some(KeyCode::S),
        egui::Key::Escape => Some(KeyCode::Escape),
        _ => None,
    }
}
/// Only Ctrl (or Cmd on macOS) is of interest, for saving.
pub fn map_modifiers(modifiers: egui::Modifiers) -> Option<Event> {
    (modifiers.command || modifiers.ctrl).then_some(Event::Held(KeyCode::Ctrl))
}
pub fn map_button(button: egui::PointerButton) -> KeyCode {
    match button {
        egui::PointerButton::Primary => KeyCode::MouseLeft,
        egui::PointerButton::Secondary => KeyCode::MouseRight,
        _ => KeyCode::DontCare,
    }
}

pub fn map_key_events(ui: &mut egui::Ui) -> Vec<Event> {
    let mut events = vec![];
    ui.input(|i| {
        for e in &i.events {
            if let egui::Event::Key {
                key,
                pressed,
                repeat,
                modifiers,
                physical_key: _,
            } = e
            {
                if let Some(k) = map_key(*key) {
                    if !pressed {
                        events.push(Event::Released(k));
                    } else if !repeat {
                        events.push(Event::Pressed(k));
                        events.push(Event::Held(k));
                    } else {
                        events.push(Event::Held(k));
                    }
                }
                events.extend(map_modifiers(*modifiers));
            }
        }
    });
    events
}

/// Presses are only reported when they hit the canvas widget. Releases are
/// always reported, a drag that ends somewhere else must still end the draft.
pub fn map_mouse_events(ui: &mut egui::Ui, canvas_response: &egui::Response) -> Vec<Event> {
    let mut events = vec![];
    let is_canvas_hovered = canvas_response.hovered();
    ui.input(|i| {
        for e in &i.events {
            if let egui::Event::PointerButton {
                pos: _,
                button,
                pressed,
                modifiers,
            } = e
            {
                let btn_code = map_button(*button);
                if btn_code == KeyCode::DontCare {
                    continue;
                }
                if *pressed && is_canvas_hovered {
                    events.push(Event::Pressed(btn_code));
                } else if !*pressed {
                    events.push(Event::Released(btn_code));
                }
                events.extend(map_modifiers(*modifiers));
            }
        }
        if i.pointer.primary_down() {
            events.push(Event::Held(KeyCode::MouseLeft));
        }
        if i.pointer.secondary_down() {
            events.push(Event::Held(KeyCode::MouseRight));
        }
    });
    events
}

#[test]
fn test_map_modifiers() {
    let modifiers = egui::Modifiers {
        ctrl: true,
        shift: true,
        ..Default::default()
    };
    assert!(matches!(
        map_modifiers(modifiers),
        Some(Event::Held(KeyCode::Ctrl))
    ));
    let shift_only = egui::Modifiers {
        shift: true,
        ..Default::default()
    };
    assert!(map_modifiers(shift_only).is_none());
    assert_eq!(map_key(egui::Key::S), Some(KeyCode::S));
    assert_eq!(map_key(egui::Key::A), None);
    assert_eq!(map_button(egui::PointerButton::Middle), KeyCode::DontCare);
}
