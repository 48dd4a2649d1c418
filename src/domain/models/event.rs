use std::path::PathBuf;

use tui_textarea::Input;

use super::ClinicalNote;
use super::StreamEvent;

pub enum Event {
    /// A new streaming session was opened by the worker. Any prior session
    /// is superseded the moment this arrives.
    StreamOpened(u64),
    /// A payload from the streaming connection, tagged with the id of the
    /// session it belongs to so stale deliveries can be dropped.
    Stream(u64, StreamEvent),
    NoteReady(ClinicalNote),
    NoteCopied(),
    NoteSaved(PathBuf),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardCTRLE(),
    KeyboardEnter(),
    KeyboardPaste(String),
    UIResize(),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
