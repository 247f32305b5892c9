//! Views the login page can navigate between.

use std::fmt;

/// A logical view of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Login,
    /// Post-login view
    Main,
    /// Where "return" leads
    Home,
    Signup,
}

impl View {
    /// Route path of the view
    pub fn path(&self) -> &'static str {
        match self {
            View::Login => "/login",
            View::Main => "/main",
            View::Home => "/home",
            View::Signup => "/signup",
        }
    }

    /// Get the display title for this view.
    pub fn title(&self) -> &'static str {
        match self {
            View::Login => "Login",
            View::Main => "Main",
            View::Home => "Home",
            View::Signup => "Sign up",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
