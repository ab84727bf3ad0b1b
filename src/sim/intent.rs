/// Abstract player intents, produced by the input layer and queued on the
/// session controller. Each is meaningful in only some phases; elsewhere
/// it is dropped.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Intent {
    Confirm,
    Cancel,
    /// Pointer click in canvas cells.
    Click { x: i32, y: i32 },
    TextChar(char),
    Backspace,
    RequestHint,
    Retry,
    Quit,
}
