/// What a mode did with the command line.
#[derive(Debug, PartialEq, Eq)]
pub enum CliModeResult {
    /// The mode handled the request; stop dispatching.
    Finish,
    /// None of this mode's flags were given.
    NothingToDo,
}
