pub enum Action {
    /// Post a user message to the encounter and, on success, open a fresh
    /// streaming session for the reply.
    SubmitMessage(String),
    /// Close any open streaming connection without side effects.
    StreamAbort(),
    /// End the encounter (best effort) and obtain a clinical note, falling
    /// back to the local template when generation fails.
    EndEncounter(),
    CopyNote(String),
    SaveNote(String),
}
