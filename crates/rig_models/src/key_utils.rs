use bevy::prelude::*;

/// Converts a human-readable key name from the config files (e.g. `"F1"`, `"A"`,
/// `"Space"`) into a [`KeyCode`]. Matching ignores case and surrounding whitespace.
///
/// Returns `None` for names that are not known.
pub fn convert(name: &str) -> Option<KeyCode> {
    let name = name.trim().to_ascii_uppercase();

    let key = match name.as_str() {
        "F1" => KeyCode::F1,
        "F2" => KeyCode::F2,
        "F3" => KeyCode::F3,
        "F4" => KeyCode::F4,
        "F5" => KeyCode::F5,
        "F6" => KeyCode::F6,
        "F7" => KeyCode::F7,
        "F8" => KeyCode::F8,
        "F9" => KeyCode::F9,
        "F10" => KeyCode::F10,
        "F11" => KeyCode::F11,
        "F12" => KeyCode::F12,

        "SPACE" => KeyCode::Space,
        "ESCAPE" | "ESC" => KeyCode::Escape,
        "TAB" => KeyCode::Tab,
        "ENTER" | "RETURN" => KeyCode::Enter,
        "BACKSPACE" => KeyCode::Backspace,
        "SHIFT" | "SHIFTLEFT" => KeyCode::ShiftLeft,
        "CTRL" | "CONTROL" | "CONTROLLEFT" => KeyCode::ControlLeft,
        "ALT" | "ALTLEFT" => KeyCode::AltLeft,

        "0" => KeyCode::Digit0,
        "1" => KeyCode::Digit1,
        "2" => KeyCode::Digit2,
        "3" => KeyCode::Digit3,
        "4" => KeyCode::Digit4,
        "5" => KeyCode::Digit5,
        "6" => KeyCode::Digit6,
        "7" => KeyCode::Digit7,
        "8" => KeyCode::Digit8,
        "9" => KeyCode::Digit9,

        "A" => KeyCode::KeyA,
        "B" => KeyCode::KeyB,
        "C" => KeyCode::KeyC,
        "D" => KeyCode::KeyD,
        "E" => KeyCode::KeyE,
        "F" => KeyCode::KeyF,
        "G" => KeyCode::KeyG,
        "H" => KeyCode::KeyH,
        "I" => KeyCode::KeyI,
        "J" => KeyCode::KeyJ,
        "K" => KeyCode::KeyK,
        "L" => KeyCode::KeyL,
        "M" => KeyCode::KeyM,
        "N" => KeyCode::KeyN,
        "O" => KeyCode::KeyO,
        "P" => KeyCode::KeyP,
        "Q" => KeyCode::KeyQ,
        "R" => KeyCode::KeyR,
        "S" => KeyCode::KeyS,
        "T" => KeyCode::KeyT,
        "U" => KeyCode::KeyU,
        "V" => KeyCode::KeyV,
        "W" => KeyCode::KeyW,
        "X" => KeyCode::KeyX,
        "Y" => KeyCode::KeyY,
        "Z" => KeyCode::KeyZ,

        _ => return None,
    };
    Some(key)
}

/// Converts a mouse button name (`"Left"`, `"Right"`, `"Middle"`, `"Back"`,
/// `"Forward"`) or a raw button index (`"5"`) into a [`MouseButton`].
pub fn convert_mouse_button(name: &str) -> Option<MouseButton> {
    let name = name.trim().to_ascii_uppercase();

    match name.as_str() {
        "LEFT" | "PRIMARY" => Some(MouseButton::Left),
        "RIGHT" | "SECONDARY" => Some(MouseButton::Right),
        "MIDDLE" => Some(MouseButton::Middle),
        "BACK" => Some(MouseButton::Back),
        "FORWARD" => Some(MouseButton::Forward),
        other => other.parse::<u16>().ok().map(MouseButton::Other),
    }
}
