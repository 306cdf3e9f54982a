//! A representation of the UI to UI-agnostic portions of the code.
//!
//! The core never touches a terminal. Anything that can quit, show a
//! message, and repaint can host an editor; the real screen frontend and
//! the headless stream driver both come in through here.

pub trait Ui {
	/// Exit the program.
	fn quit(&mut self);

	/// Display a notification to the user.
	fn notify(&mut self, message: &str, error: bool);

	/// Repaint after the buffer or cursor changed.
	fn redraw(&mut self);
}
