//! Render frames to the user's terminal

use color_eyre::eyre::Result;
use termwiz::surface::Change as TermwizChange;
use termwiz::terminal::buffered::BufferedTerminal;
use termwiz::terminal::Terminal as TermwizTerminal;

/// One second in microseconds
pub const ONE_MICROSECOND: u64 = 1_000_000;

/// `Renderer`
pub(crate) struct Renderer<T: TermwizTerminal> {
    /// The user's terminal, buffered so that only the differences between frames are sent.
    terminal: BufferedTerminal<T>,
}

impl Renderer<termwiz::terminal::SystemTerminal> {
    /// Take over the user's terminal: raw mode, the alternate screen and a hidden cursor.
    pub fn start() -> Result<Self> {
        tracing::debug!("Putting user's terminal into raw mode");
        let mut users_terminal = Self::get_termwiz_terminal()?;
        users_terminal.set_raw_mode()?;
        users_terminal.enter_alternate_screen()?;

        let mut terminal = BufferedTerminal::new(users_terminal)?;
        terminal.add_change(TermwizChange::CursorVisibility(
            termwiz::surface::CursorVisibility::Hidden,
        ));
        terminal.flush()?;

        Ok(Self { terminal })
    }

    /// The user's actual terminal.
    fn get_termwiz_terminal() -> Result<termwiz::terminal::SystemTerminal> {
        let capabilities = termwiz::caps::Capabilities::new_from_env()?;
        Ok(termwiz::terminal::SystemTerminal::new(capabilities)?)
    }
}

impl<T: TermwizTerminal> Renderer<T> {
    /// The terminal's size in columns and rows.
    pub fn size(&self) -> (usize, usize) {
        self.terminal.dimensions()
    }

    /// Check whether the user's terminal has changed size. Returns `true` when it has.
    pub fn handle_resize(&mut self) -> Result<bool> {
        let is_resized = self.terminal.check_for_resize()?;
        if !is_resized {
            return Ok(false);
        }

        self.terminal.repaint()?;
        let (width, height) = self.size();
        tracing::debug!("Terminal resized to {width}x{height}");
        Ok(true)
    }

    /// Get the next waiting input event, without blocking.
    pub fn poll_input(&mut self) -> Result<Option<termwiz::input::InputEvent>> {
        Ok(self
            .terminal
            .terminal()
            .poll_input(Some(std::time::Duration::ZERO))?)
    }

    /// Do a single render to the user's actual terminal. It uses a diffing algorithm to make
    /// the minimum number of changes.
    pub fn render(&mut self, frame: &crate::surface::Surface) -> Result<()> {
        self.terminal.draw_from_screen(&frame.surface, 0, 0);
        self.terminal.flush()?;
        Ok(())
    }

    /// Give the user their terminal back just as it was before we started.
    pub fn restore(&mut self) -> Result<()> {
        tracing::debug!("Setting user's terminal to cooked mode");
        self.terminal.add_change(TermwizChange::CursorVisibility(
            termwiz::surface::CursorVisibility::Visible,
        ));
        self.terminal.flush()?;
        self.terminal.terminal().exit_alternate_screen()?;
        self.terminal.terminal().set_cooked_mode()?;
        Ok(())
    }
}
