/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    KeyQ,
    KeyE,
    KeyC,
    Space,
    Escape,
}

impl Button {
    pub const ALL: [Button; 9] = [
        Button::KeyW,
        Button::KeyA,
        Button::KeyS,
        Button::KeyD,
        Button::KeyQ,
        Button::KeyE,
        Button::KeyC,
        Button::Space,
        Button::Escape,
    ];
}

/// Controller - handles button input states
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Get all currently pressed buttons
    fn get_down_keys(&self) -> &[Button];
}

/// Fixed set of held buttons, for driving bindings without a window
#[derive(Debug, Clone, Default)]
pub struct HeldButtons(pub Vec<Button>);

impl Controller for HeldButtons {
    fn is_down(&self, button: Button) -> bool {
        self.0.contains(&button)
    }

    fn get_down_keys(&self) -> &[Button] {
        &self.0
    }
}
