//! The control-mode viewer state machine
//!
//! A [`Viewer`] follows one tmux client through startup, learns the
//! attached session, lists its windows and keeps a terminal emulator per
//! pane in sync: fresh panes are seeded from `capture-pane` (history first,
//! then the visible screen) and `%output` is streamed into them afterwards.
//!
//! The viewer never performs I/O. Each call to [`Viewer::next`] consumes one
//! notification and returns the actions the caller must carry out, most
//! importantly the command text to write to tmux.
//!
//! Commands are pipelined through a FIFO queue. While the viewer is in
//! [`State::CommandQueue`], the command at the head of the queue has always
//! been sent already: replies arrive in order, so every `%end`/`%error`
//! block belongs to the head, and the next head is sent only after that
//! reply has been handled.

use std::collections::{BTreeMap, VecDeque};

use bytes::Bytes;
use tracing::{debug, info, trace, warn};
use trellis_terminal::{EraseDisplay, ScreenKey, Terminal, DEFAULT_SCROLLBACK};

use crate::{
    control::Notification,
    layout::Layout,
    output::{FormatStruct, WindowRecord},
    TmuxError,
};

/// Screens captured for every new pane, in capture order
const SCREENS: [ScreenKey; 2] = [ScreenKey::Primary, ScreenKey::Alternate];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    /// History rows kept per pane
    pub max_scrollback: usize,
    /// Also capture each pane's alternate screen
    pub capture_alternate: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            max_scrollback: DEFAULT_SCROLLBACK,
            capture_alternate: true,
        }
    }
}

/// The terminal operations the viewer needs from a pane's emulator
pub trait PaneTerminal {
    fn create(cols: u16, rows: u16, max_scrollback: usize) -> Self;

    /// Make `key` active, returning the previously active screen
    fn switch_screen(&mut self, key: ScreenKey) -> ScreenKey;

    /// Run bytes through the VT parser
    fn feed(&mut self, bytes: &[u8]);

    fn carriage_return(&mut self);

    /// Line feed that scrolls at the bottom margin
    fn index(&mut self);

    /// 0-based position
    fn set_cursor_pos(&mut self, row: u16, col: u16);

    fn erase_display(&mut self, mode: EraseDisplay, protected: bool);

    /// Columns and rows of the visible grid
    fn size(&self) -> (u16, u16);

    fn resize(&mut self, cols: u16, rows: u16);
}

impl PaneTerminal for Terminal {
    fn create(cols: u16, rows: u16, max_scrollback: usize) -> Self {
        Terminal::with_scrollback(cols, rows, max_scrollback)
    }

    fn switch_screen(&mut self, key: ScreenKey) -> ScreenKey {
        Terminal::switch_screen(self, key)
    }

    fn feed(&mut self, bytes: &[u8]) {
        self.process(bytes);
    }

    fn carriage_return(&mut self) {
        Terminal::carriage_return(self);
    }

    fn index(&mut self) {
        Terminal::index(self);
    }

    fn set_cursor_pos(&mut self, row: u16, col: u16) {
        Terminal::set_cursor_pos(self, row, col);
    }

    fn erase_display(&mut self, mode: EraseDisplay, protected: bool) {
        Terminal::erase_display(self, mode, protected);
    }

    fn size(&self) -> (u16, u16) {
        self.dimensions()
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        if let Err(e) = Terminal::resize(self, cols, rows) {
            warn!(cols, rows, "failed to resize pane: {e}");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Waiting for the reply to tmux's implicit startup command
    StartupBlock,
    /// Waiting for `%session-changed` to learn the attached session
    StartupSession,
    /// Steady state: the queue head, if any, has been sent
    CommandQueue,
    /// The connection is unusable; every input is ignored
    Defunct,
}

/// A command the viewer has queued for tmux
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ListWindows,
    /// Scrollback of one screen of a pane
    PaneHistory { id: usize, screen: ScreenKey },
    /// Visible area of one screen of a pane
    PaneVisible { id: usize, screen: ScreenKey },
    /// Issued through [`Viewer::queue_command`], output is passed through
    User(String),
}

impl Command {
    /// The newline-terminated text to send to tmux
    pub fn text(&self) -> String {
        let alternate = |screen: &ScreenKey| match screen {
            ScreenKey::Primary => "",
            ScreenKey::Alternate => " -a",
        };

        match self {
            Command::ListWindows => format!("list-windows -F '{}'\n", WindowRecord::format()),
            Command::PaneHistory { id, screen } => {
                format!(
                    "capture-pane -p -e -q{} -S - -E -1 -t %{id}\n",
                    alternate(screen)
                )
            }
            Command::PaneVisible { id, screen } => {
                format!("capture-pane -p -e -q{} -t %{id}\n", alternate(screen))
            }
            Command::User(text) => format!("{text}\n"),
        }
    }
}

/// Something the caller must do after a call into the viewer
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Tear down the connection
    Exit,
    /// Write this text to tmux's stdin
    Command(String),
    /// The complete window list replaces any previous one
    Windows(Vec<Window>),
    /// Reply to a command from [`Viewer::queue_command`]
    CommandOutput { output: Bytes, failed: bool },
}

/// One tmux window of the attached session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub id: usize,
    pub width: usize,
    pub height: usize,
    pub layout: Layout,
}

#[derive(Debug)]
struct Queued {
    command: Command,
    /// Sent for a session that has since been replaced; its reply is discarded
    stale: bool,
}

/// Mirrors one tmux control-mode client
pub struct Viewer<T = Terminal> {
    config: ViewerConfig,
    state: State,
    session_id: Option<usize>,
    /// Session announced before the startup reply arrived
    early_session: Option<usize>,
    windows: Vec<Window>,
    panes: BTreeMap<usize, T>,
    queue: VecDeque<Queued>,
}

impl Viewer<Terminal> {
    pub fn new() -> Self {
        Self::with_config(ViewerConfig::default())
    }
}

impl Default for Viewer<Terminal> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PaneTerminal> Viewer<T> {
    pub fn with_config(config: ViewerConfig) -> Self {
        Self {
            config,
            state: State::StartupBlock,
            session_id: None,
            early_session: None,
            windows: Vec::new(),
            panes: BTreeMap::new(),
            queue: VecDeque::new(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn session_id(&self) -> Option<usize> {
        self.session_id
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn pane(&self, id: usize) -> Option<&T> {
        self.panes.get(&id)
    }

    pub fn pane_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.panes.keys().copied()
    }

    /// Queued commands, the in-flight one first
    pub fn pending_commands(&self) -> impl Iterator<Item = &Command> + '_ {
        self.queue.iter().map(|q| &q.command)
    }

    /// Consume one notification and return the resulting actions
    pub fn next(&mut self, notification: Notification) -> Vec<Action> {
        if self.state == State::Defunct {
            trace!(?notification, "viewer is defunct, ignoring");
            return Vec::new();
        }

        match notification {
            Notification::Exit { reason } => {
                info!(reason = reason.as_deref().unwrap_or(""), "tmux exited control mode");
                self.set_state(State::Defunct);
                vec![Action::Exit]
            }

            Notification::BlockEnd(content) => self.block(content, false),
            Notification::BlockErr(content) => self.block(content, true),

            Notification::SessionChanged { id, name } => self.session_changed(id, &name),

            Notification::Output { pane_id, data } => {
                match self.panes.get_mut(&pane_id) {
                    Some(pane) => pane.feed(&data),
                    None => debug!(pane_id, len = data.len(), "output for unknown pane dropped"),
                }
                Vec::new()
            }

            Notification::Enter
            | Notification::SessionsChanged
            | Notification::LayoutChange { .. }
            | Notification::WindowAdd { .. }
            | Notification::WindowRenamed { .. }
            | Notification::WindowPaneChanged { .. }
            | Notification::ClientDetached { .. }
            | Notification::ClientSessionChanged { .. } => {
                trace!(?notification, "ignoring notification");
                Vec::new()
            }
        }
    }

    /// Queue a command of the caller's own; its reply surfaces as
    /// [`Action::CommandOutput`].
    ///
    /// The text must be a single line. A trailing newline is optional.
    pub fn queue_command(&mut self, text: &str) -> Result<Vec<Action>, TmuxError> {
        let text = text.strip_suffix('\n').unwrap_or(text);
        if text.contains('\n') {
            return Err(TmuxError::Protocol(
                "a queued command must be a single line".to_string(),
            ));
        }

        let mut actions = Vec::new();
        match self.state {
            State::Defunct => debug!("viewer is defunct, dropping command"),
            State::CommandQueue => {
                self.enqueue(Command::User(text.to_string()), &mut actions);
            }
            // Sent once startup completes
            State::StartupBlock | State::StartupSession => self.queue.push_back(Queued {
                command: Command::User(text.to_string()),
                stale: false,
            }),
        }
        Ok(actions)
    }

    /// Ask tmux for the window list again.
    ///
    /// The reply is reconciled like the first one: panes that still exist
    /// keep their terminals, closed panes are dropped and new panes are
    /// captured.
    pub fn refresh_windows(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.state == State::CommandQueue {
            self.enqueue(Command::ListWindows, &mut actions);
        }
        actions
    }

    fn set_state(&mut self, state: State) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "viewer state");
            self.state = state;
        }
    }

    /// Queue a command, sending it right away if nothing is in flight
    fn enqueue(&mut self, command: Command, actions: &mut Vec<Action>) {
        if self.queue.is_empty() {
            actions.push(Action::Command(command.text()));
        }
        self.queue.push_back(Queued {
            command,
            stale: false,
        });
    }

    fn block(&mut self, content: Bytes, failed: bool) -> Vec<Action> {
        match self.state {
            State::StartupBlock => {
                self.set_state(State::StartupSession);
                match self.early_session.take() {
                    Some(id) => self.start_session(id),
                    None => Vec::new(),
                }
            }
            State::StartupSession => {
                warn!(failed, "unexpected reply before the session is known");
                Vec::new()
            }
            State::CommandQueue => match self.reply(content, failed) {
                Ok(actions) => actions,
                Err(err) => {
                    warn!(%err, "command reply could not be handled");
                    self.set_state(State::Defunct);
                    vec![Action::Exit]
                }
            },
            State::Defunct => Vec::new(),
        }
    }

    fn session_changed(&mut self, id: usize, name: &str) -> Vec<Action> {
        match self.state {
            State::StartupBlock => {
                debug!(id, name, "session announced before startup reply");
                self.early_session = Some(id);
                Vec::new()
            }
            State::StartupSession => {
                info!(id, name, "attached to session");
                self.start_session(id)
            }
            State::CommandQueue => {
                info!(id, name, "session changed, resetting");
                self.swap_session(id)
            }
            State::Defunct => Vec::new(),
        }
    }

    /// Enter the steady state with `list-windows` as the first command
    fn start_session(&mut self, id: usize) -> Vec<Action> {
        self.session_id = Some(id);
        self.set_state(State::CommandQueue);

        let list = Command::ListWindows;
        let actions = vec![Action::Command(list.text())];
        self.queue.push_front(Queued {
            command: list,
            stale: false,
        });
        actions
    }

    fn swap_session(&mut self, id: usize) -> Vec<Action> {
        let mut actions = vec![Action::Windows(Vec::new())];

        self.windows.clear();
        self.panes.clear();

        // Only the command already sent can still be answered
        let in_flight = self.queue.pop_front();
        if !self.queue.is_empty() {
            debug!(dropped = self.queue.len(), "discarding queued commands");
            self.queue.clear();
        }
        if let Some(mut head) = in_flight {
            head.stale = true;
            self.queue.push_back(head);
        }

        self.session_id = Some(id);
        self.enqueue(Command::ListWindows, &mut actions);
        actions
    }

    fn reply(&mut self, content: Bytes, failed: bool) -> Result<Vec<Action>, TmuxError> {
        let Some(head) = self.queue.pop_front() else {
            return Err(TmuxError::Protocol(
                "command reply with no command in flight".to_string(),
            ));
        };

        let mut actions = Vec::new();
        if head.stale {
            debug!(command = ?head.command, "discarding reply for a previous session");
        } else {
            match head.command {
                Command::ListWindows => {
                    if failed {
                        return Err(TmuxError::Protocol(format!(
                            "list-windows failed: {}",
                            String::from_utf8_lossy(&content).trim_end()
                        )));
                    }
                    self.list_windows(&content, &mut actions)?;
                }
                Command::PaneHistory { id, screen } => {
                    if failed {
                        warn!(id, ?screen, "history capture failed");
                    } else {
                        self.ingest_history(id, screen, &content);
                    }
                }
                Command::PaneVisible { id, screen } => {
                    if failed {
                        warn!(id, ?screen, "visible capture failed");
                    } else {
                        self.ingest_visible(id, screen, &content);
                    }
                }
                Command::User(_) => actions.push(Action::CommandOutput {
                    output: content,
                    failed,
                }),
            }
        }

        if let Some(next) = self.queue.front() {
            actions.push(Action::Command(next.command.text()));
        }
        Ok(actions)
    }

    /// Adopt a `list-windows` reply, creating and dropping panes to match
    fn list_windows(&mut self, content: &[u8], actions: &mut Vec<Action>) -> Result<(), TmuxError> {
        let text = std::str::from_utf8(content)
            .map_err(|_| TmuxError::Protocol("list-windows output is not UTF-8".to_string()))?;

        let mut windows = Vec::new();
        for line in text.lines().filter(|l| !l.is_empty()) {
            let record = WindowRecord::parse(line)?;
            let layout = Layout::parse_with_checksum(&record.layout)?;
            windows.push(Window {
                id: record.window_id,
                width: record.width,
                height: record.height,
                layout,
            });
        }

        // First rectangle naming a pane decides its size
        let mut seen: BTreeMap<usize, (u16, u16)> = BTreeMap::new();
        let mut order = Vec::new();
        for window in &windows {
            for (id, rect) in window.layout.panes() {
                if !seen.contains_key(&id) {
                    seen.insert(id, (clamp_dimension(rect.width), clamp_dimension(rect.height)));
                    order.push(id);
                }
            }
        }

        self.panes.retain(|id, pane| match seen.get(id) {
            Some(&(cols, rows)) => {
                if pane.size() != (cols, rows) {
                    debug!(pane = id, cols, rows, "pane resized");
                    pane.resize(cols, rows);
                }
                true
            }
            None => {
                debug!(pane = id, "pane closed");
                false
            }
        });

        for id in order {
            if self.panes.contains_key(&id) {
                continue;
            }
            let (cols, rows) = seen[&id];
            debug!(pane = id, cols, rows, "new pane");
            self.panes
                .insert(id, T::create(cols, rows, self.config.max_scrollback));

            for screen in SCREENS {
                if screen == ScreenKey::Alternate && !self.config.capture_alternate {
                    continue;
                }
                for command in [
                    Command::PaneHistory { id, screen },
                    Command::PaneVisible { id, screen },
                ] {
                    self.queue.push_back(Queued {
                        command,
                        stale: false,
                    });
                }
            }
        }

        debug!(windows = windows.len(), panes = self.panes.len(), "windows listed");
        self.windows = windows.clone();
        actions.push(Action::Windows(windows));
        Ok(())
    }

    /// Replay captured history so it ends up in scrollback
    fn ingest_history(&mut self, id: usize, screen: ScreenKey, content: &[u8]) {
        let Some(pane) = self.panes.get_mut(&id) else {
            debug!(pane = id, "history for a closed pane dropped");
            return;
        };
        let content = content.strip_suffix(b"\n").unwrap_or(content);
        if content.is_empty() {
            return;
        }

        let previous = pane.switch_screen(screen);
        pane.feed(content);
        pane.carriage_return();
        for _ in 0..pane.size().1 {
            pane.index();
        }
        pane.set_cursor_pos(0, 0);
        pane.switch_screen(previous);
        trace!(pane = id, ?screen, len = content.len(), "history ingested");
    }

    /// Replace the visible area with captured screen content
    fn ingest_visible(&mut self, id: usize, screen: ScreenKey, content: &[u8]) {
        let Some(pane) = self.panes.get_mut(&id) else {
            debug!(pane = id, "screen capture for a closed pane dropped");
            return;
        };
        // The last row's newline would scroll the screen
        let content = content.strip_suffix(b"\n").unwrap_or(content);

        let previous = pane.switch_screen(screen);
        pane.erase_display(EraseDisplay::Complete, false);
        pane.set_cursor_pos(0, 0);
        pane.feed(content);
        pane.switch_screen(previous);
        trace!(pane = id, ?screen, len = content.len(), "screen ingested");
    }
}

fn clamp_dimension(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TWO_PANES: &str = "$0 @0 83 44 027b,83x44,0,0[83x20,0,0,0,83x23,0,21,1]\n";

    fn block(text: &str) -> Notification {
        Notification::BlockEnd(Bytes::copy_from_slice(text.as_bytes()))
    }

    fn session(id: usize) -> Notification {
        Notification::SessionChanged {
            id,
            name: format!("s{id}"),
        }
    }

    fn commands(actions: &[Action]) -> Vec<&str> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::Command(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn steady() -> Viewer {
        let mut viewer = Viewer::new();
        viewer.next(block(""));
        viewer.next(session(0));
        viewer
    }

    #[test]
    fn test_startup_sequence() {
        let mut viewer = Viewer::new();
        assert_eq!(viewer.state(), State::StartupBlock);

        assert!(viewer.next(block("")).is_empty());
        assert_eq!(viewer.state(), State::StartupSession);

        let actions = viewer.next(session(42));
        assert_eq!(actions.len(), 1);
        assert!(commands(&actions)[0].starts_with("list-windows"));
        assert_eq!(viewer.session_id(), Some(42));
        assert_eq!(viewer.state(), State::CommandQueue);
    }

    #[test]
    fn test_session_before_startup_reply() {
        let mut viewer = Viewer::new();
        assert!(viewer.next(session(3)).is_empty());
        let actions = viewer.next(block(""));
        assert!(commands(&actions)[0].starts_with("list-windows"));
        assert_eq!(viewer.session_id(), Some(3));
    }

    #[test]
    fn test_list_windows_queues_captures_in_order() {
        let mut viewer = steady();
        let actions = viewer.next(block(TWO_PANES));

        let Action::Windows(windows) = &actions[0] else {
            panic!("expected windows first, got {actions:?}");
        };
        assert_eq!(windows.len(), 1);
        assert_eq!(
            commands(&actions),
            vec!["capture-pane -p -e -q -S - -E -1 -t %0\n"]
        );
        assert_eq!(viewer.pane_ids().collect::<Vec<_>>(), vec![0, 1]);

        let pending: Vec<String> = viewer.pending_commands().map(|c| c.text()).collect();
        assert_eq!(
            pending,
            vec![
                "capture-pane -p -e -q -S - -E -1 -t %0\n",
                "capture-pane -p -e -q -t %0\n",
                "capture-pane -p -e -q -a -S - -E -1 -t %0\n",
                "capture-pane -p -e -q -a -t %0\n",
                "capture-pane -p -e -q -S - -E -1 -t %1\n",
                "capture-pane -p -e -q -t %1\n",
                "capture-pane -p -e -q -a -S - -E -1 -t %1\n",
                "capture-pane -p -e -q -a -t %1\n",
            ]
        );
    }

    #[test]
    fn test_each_reply_sends_exactly_the_next_head() {
        let mut viewer = steady();
        viewer.next(block(TWO_PANES));

        for _ in 0..7 {
            let actions = viewer.next(block(""));
            assert_eq!(commands(&actions).len(), 1);
        }
        assert!(viewer.next(block("")).is_empty());
        assert_eq!(viewer.pending_commands().count(), 0);
    }

    #[test]
    fn test_history_lands_in_scrollback() {
        let mut viewer = steady();
        viewer.next(block(TWO_PANES));
        viewer.next(block("Hello, world!\n"));
        viewer.next(block(""));

        let pane = viewer.pane(0).unwrap();
        assert_eq!(pane.scrollback_text(), "Hello, world!");
        assert_eq!(pane.screen_text(), "");
        assert_eq!(pane.dimensions(), (83, 20));
    }

    #[test]
    fn test_without_alternate_captures() {
        let mut viewer: Viewer = Viewer::with_config(ViewerConfig {
            capture_alternate: false,
            ..ViewerConfig::default()
        });
        viewer.next(block(""));
        viewer.next(session(0));
        viewer.next(block(TWO_PANES));
        assert_eq!(viewer.pending_commands().count(), 4);
        assert!(viewer.pending_commands().all(|c| !c.text().contains(" -a")));
    }

    #[test]
    fn test_session_swap_resets_everything() {
        let mut viewer = steady();
        viewer.next(block(TWO_PANES));
        assert_eq!(viewer.pane_ids().count(), 2);

        let actions = viewer.next(session(7));
        assert_eq!(actions[0], Action::Windows(Vec::new()));
        assert_eq!(viewer.pane_ids().count(), 0);
        assert!(viewer.windows().is_empty());
        // A capture is still in flight, so list-windows waits behind it
        assert_eq!(commands(&actions).len(), 0);

        // The stale capture reply is discarded and list-windows goes out
        let actions = viewer.next(block("old session output\n"));
        assert_eq!(commands(&actions).len(), 1);
        assert!(commands(&actions)[0].starts_with("list-windows"));
        assert_eq!(viewer.session_id(), Some(7));
    }

    #[test]
    fn test_exit_makes_viewer_inert() {
        let mut viewer = steady();
        assert_eq!(
            viewer.next(Notification::Exit { reason: None }),
            vec![Action::Exit]
        );
        assert_eq!(viewer.state(), State::Defunct);
        assert!(viewer.next(block(TWO_PANES)).is_empty());
        assert!(viewer.next(session(1)).is_empty());
    }

    #[test]
    fn test_malformed_window_list_is_fatal() {
        let mut viewer = steady();
        let actions = viewer.next(block("$0 @0 83 44 ffff,83x44,0,0,0\n"));
        assert_eq!(actions, vec![Action::Exit]);
        assert_eq!(viewer.state(), State::Defunct);
        assert_eq!(viewer.pane_ids().count(), 0);
    }

    #[test]
    fn test_failed_list_windows_is_fatal() {
        let mut viewer = steady();
        let actions = viewer.next(Notification::BlockErr(Bytes::from_static(b"no server\n")));
        assert_eq!(actions, vec![Action::Exit]);
    }

    #[test]
    fn test_failed_capture_is_tolerated() {
        let mut viewer = steady();
        viewer.next(block(TWO_PANES));
        let actions = viewer.next(Notification::BlockErr(Bytes::from_static(b"can't find pane\n")));
        assert_eq!(commands(&actions), vec!["capture-pane -p -e -q -t %0\n"]);
        assert_eq!(viewer.state(), State::CommandQueue);
    }

    #[test]
    fn test_user_command_round_trip() {
        let mut viewer = steady();
        viewer.next(block("$0 @0 80 24 b264,80x24,0,0,7\n"));
        assert_eq!(viewer.pane_ids().collect::<Vec<_>>(), vec![7]);

        // Captures are in flight, so the user command is only queued
        let actions = viewer.queue_command("display-message -p hi").unwrap();
        assert!(actions.is_empty());
        for _ in 0..4 {
            viewer.next(block(""));
        }
        let actions = viewer.next(block("hi\n"));
        assert_eq!(
            actions,
            vec![Action::CommandOutput {
                output: Bytes::from_static(b"hi\n"),
                failed: false,
            }]
        );

        // With an empty queue it goes out immediately
        let actions = viewer.queue_command("kill-server\n").unwrap();
        assert_eq!(commands(&actions), vec!["kill-server\n"]);
        assert!(viewer.queue_command("a\nb").is_err());
    }

    #[test]
    fn test_output_for_unknown_pane_is_dropped() {
        let mut viewer = steady();
        let actions = viewer.next(Notification::Output {
            pane_id: 99,
            data: Bytes::from_static(b"x"),
        });
        assert!(actions.is_empty());
        assert_eq!(viewer.state(), State::CommandQueue);
    }
}
