use rectdraw_domain::PtF;

macro_rules! action_keycode {
    ($name:ident, $action:ident, $key_code:ident) => {
        pub fn $name(&self) -> bool {
            self.events
                .iter()
                .any(|a| matches!(a, Event::$action(KeyCode::$key_code)))
        }
    };
}

macro_rules! action {
    ($name:ident, $action:ident) => {
        pub fn $name(&self, key_code: KeyCode) -> bool {
            self.events.iter().any(|a| match a {
                Event::$action(k) => k == &key_code,
                _ => false,
            })
        }
    };
}

/// Input of one frame. The mouse position is given in canvas coordinates and
/// is `None` if the pointer is not over the canvas widget.
#[derive(Debug, Clone, Default)]
pub struct Events {
    events: Vec<Event>,
    pub mouse_pos_on_canvas: Option<PtF>,
}

impl Events {
    pub fn mousepos_canvas(mut self, mouse_pos: Option<PtF>) -> Self {
        self.mouse_pos_on_canvas = mouse_pos;
        self
    }
    pub fn events(mut self, mut events: Vec<Event>) -> Self {
        self.events.append(&mut events);
        self
    }
    action_keycode!(held_ctrl, Held, Ctrl);
    action!(pressed, Pressed);
    action!(held, Held);
    action!(released, Released);
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum KeyCode {
    S,
    Escape,
    Ctrl,
    MouseLeft,
    MouseRight,
    DontCare,
}

#[derive(Debug, Clone, Copy)]
pub enum Event {
    Pressed(KeyCode),
    Released(KeyCode),
    Held(KeyCode),
}

#[test]
fn test_events() {
    let events = Events::default()
        .events(vec![Event::Held(KeyCode::Ctrl), Event::Pressed(KeyCode::S)])
        .mousepos_canvas(Some(PtF { x: 1.0, y: 2.0 }));
    assert!(events.held_ctrl());
    assert!(events.pressed(KeyCode::S));
    assert!(!events.released(KeyCode::S));
    assert!(!events.pressed(KeyCode::Escape));
    assert!(!Events::default().held_ctrl());
    assert_eq!(events.mouse_pos_on_canvas, Some(PtF { x: 1.0, y: 2.0 }));
}
