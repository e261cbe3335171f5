//! Central place for all engine default values.
//! Update these and the whole engine picks them up.

pub struct Defaults;

impl Defaults {
    /* Keyboard reader */
    pub const KEY_POLL_MS: u64 = 250;

    /* Pointer poller */
    pub const POINTER_POLL_MS: u64 = 20;
    pub const CLICK_DEBOUNCE_MS: u64 = 120;
    pub const MOUSE: bool = true;

    /* Text cursor */
    pub const CURSOR_BLINK_PERCENT: u8 = 100;

    /* Confirmation dialog */
    pub const CONFIRM_MIN_WIDTH: u16 = 36;
    pub const CONFIRM_HEIGHT: u16 = 7;

    /* Lists */
    pub const EMPTY_LIST_TEXT: &'static str = "No entries";
    pub const SELECTED_MARK: &'static str = "> ";
    pub const UNSELECTED_MARK: &'static str = "  ";
}
